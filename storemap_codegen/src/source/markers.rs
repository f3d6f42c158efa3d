use syn::Attribute;

use crate::declaration::Marker;

/// An attribute is a marker when its last path segment is the marker name,
/// so `#[table]`, `#[storemap::table]` and `#[table(name = "t")]` all match
pub fn is_marker(attr: &Attribute, marker: &Marker) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| segment.ident == marker.name())
}

pub fn find_marker<'a>(attrs: &'a [Attribute], marker: &Marker) -> Option<&'a Attribute> {
    attrs.iter().find(|attr| is_marker(attr, marker))
}

/// Drop every attribute matching one of `markers`
pub fn strip_markers(attrs: &mut Vec<Attribute>, markers: &[Marker]) {
    attrs.retain(|attr| !markers.iter().any(|marker| is_marker(attr, marker)));
}
