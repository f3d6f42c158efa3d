use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use storemap::codegen::source::SourceHost;
use storemap::codegen::table::TableDomain;
use storemap::codegen::{MemorySink, Processor};
use storemap::{Mapped, MemoryStore, schema};

#[schema]
mod bench_model {
    #[table(name = "events")]
    #[derive(Debug, Default, Clone)]
    pub struct Event {
        #[column(key)]
        pub id: i64,
        #[column]
        pub kind: String,
        #[column]
        pub weight: f64,
        #[column(ignore_null)]
        pub note: Option<String>,
    }
}

/// Source with `tables` marked structs of eight columns each
fn schema_source(tables: usize) -> String {
    let mut source = String::new();
    for table in 0..tables {
        source.push_str(&format!(
            "#[table] #[derive(Default)] pub struct Table{table} {{\n#[column(key)] pub id: i64,\n"
        ));
        for column in 0..7 {
            source.push_str(&format!("#[column] pub c{column}: Option<String>,\n"));
        }
        source.push_str("}\n");
    }
    source
}

fn bench_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_round");
    for tables in [1, 10, 100] {
        let file = syn::parse_file(&schema_source(tables)).unwrap();
        let host = SourceHost::from_file(&file, "crate");

        group.bench_with_input(BenchmarkId::from_parameter(tables), &host, |b, host| {
            b.iter(|| {
                let mut sink = MemorySink::new();
                let mut diagnostics = Vec::new();
                let report =
                    Processor::new(TableDomain).process_round(black_box(host), &mut sink, &mut diagnostics);
                black_box(report)
            });
        });
    }
    group.finish();
}

fn bench_resolvers(c: &mut Criterion) {
    let event = bench_model::Event {
        id: 7,
        kind: "click".to_string(),
        weight: 0.25,
        note: None,
    };

    c.bench_function("store_put_get", |b| {
        let mut store = MemoryStore::new();
        b.iter(|| {
            store.put(black_box(&event)).unwrap();
            black_box(store.get::<bench_model::Event>(&7i64).unwrap())
        });
    });

    c.bench_function("type_mapping", |b| {
        b.iter(|| black_box(bench_model::Event::type_mapping()));
    });
}

criterion_group!(benches, bench_round, bench_resolvers);
criterion_main!(benches);
