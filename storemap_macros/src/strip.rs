use storemap_codegen::Marker;
use storemap_codegen::source::strip_markers;
use syn::visit_mut::{self, VisitMut};
use syn::{Fields, Item};

/// Removes marker attributes from the declarations the source host indexes:
/// structs, enums, unions, their variants and fields, and inline modules
pub struct MarkerStripper<'a> {
    pub markers: &'a [Marker],
}

impl MarkerStripper<'_> {
    fn strip_fields(&self, fields: &mut Fields) {
        for field in fields.iter_mut() {
            strip_markers(&mut field.attrs, self.markers);
        }
    }
}

impl VisitMut for MarkerStripper<'_> {
    fn visit_item_mut(&mut self, item: &mut Item) {
        match item {
            Item::Struct(item) => {
                strip_markers(&mut item.attrs, self.markers);
                self.strip_fields(&mut item.fields);
            }
            Item::Enum(item) => {
                strip_markers(&mut item.attrs, self.markers);
                for variant in &mut item.variants {
                    strip_markers(&mut variant.attrs, self.markers);
                    self.strip_fields(&mut variant.fields);
                }
            }
            Item::Union(item) => {
                strip_markers(&mut item.attrs, self.markers);
                for field in &mut item.fields.named {
                    strip_markers(&mut field.attrs, self.markers);
                }
            }
            Item::Mod(_) => visit_mut::visit_item_mut(self, item),
            _ => {}
        }
    }
}
