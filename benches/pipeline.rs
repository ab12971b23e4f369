//! Performance benchmarks for the dataset pipeline
//!
//! A synthetic dataset of subjects, samples and their catalog folders is generated in memory
//! and measured:
//! - end to end through the async splinter (parse included)
//! - the synchronous graph, merge and layout stages on a preloaded store
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sds_graph::{
    catalog::CatalogEntry,
    config::SdsConfig,
    rdf::{ParseEvent, QuadParser, QuadStore, TurtleQuadParser},
    splinter::{build_views, DatasetSplinter},
};
use std::fmt::Write;
use tokio::sync::mpsc::unbounded_channel;

const BASE: &str = "https://api.example.org/datasets/ds-1";

fn folder_entry(id: &str, parent: Option<&str>, name: &str, mimetype: &str) -> CatalogEntry {
    CatalogEntry {
        remote_id: id.to_string(),
        parent_id: parent.map(str::to_string),
        basename: name.to_string(),
        dataset_relative_path: name.to_string(),
        size_bytes: Some(1024),
        mimetype: mimetype.to_string(),
        timestamp_updated: None,
        status: Some("READY".to_string()),
        uri_api: format!("https://api.example.org/packages/{id}"),
    }
}

/// `subjects` subjects with `samples` samples each, every sample holding three files.
fn synthetic_dataset(subjects: usize, samples: usize) -> (String, Vec<CatalogEntry>) {
    let mut ttl = String::from(
        "@prefix owl: <http://www.w3.org/2002/07/owl#> .\n\
         @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n\
         @prefix sparc: <http://uri.interlex.org/tgbugs/uris/readable/sparc/> .\n\
         @prefix TEMP: <http://uri.interlex.org/temp/uris/> .\n\
         @prefix folder: <https://api.example.org/packages/> .\n\
         <https://api.example.org/ds-1.ttl> a owl:Ontology .\n",
    );
    let _ = writeln!(
        ttl,
        "<{BASE}> a sparc:Resource ; TEMP:hasFolderAboutIt folder:root ."
    );
    let mut catalog = vec![
        folder_entry("root", None, "ds-1", "inode/directory"),
        folder_entry("primary", Some("root"), "primary", "inode/directory"),
    ];
    for s in 0..subjects {
        let subject = format!("{BASE}/subjects/sub-{s}");
        let _ = writeln!(
            ttl,
            "<{subject}> a sparc:Subject ; rdfs:label \"sub-{s}\" ; TEMP:hasFolderAboutIt folder:sub-{s} .\n\
             <{BASE}> TEMP:hasSubject <{subject}> ."
        );
        catalog.push(folder_entry(
            &format!("sub-{s}"),
            Some("primary"),
            &format!("sub-{s}"),
            "inode/directory",
        ));
        for m in 0..samples {
            let sample = format!("{BASE}/samples/sam-{s}-{m}");
            let _ = writeln!(
                ttl,
                "<{sample}> a sparc:Sample ; TEMP:hasFolderAboutIt folder:sam-{s}-{m} ."
            );
            if m > 0 {
                let _ = writeln!(
                    ttl,
                    "<{sample}> TEMP:derivedFrom <{BASE}/samples/sam-{s}-0> ."
                );
            }
            catalog.push(folder_entry(
                &format!("sam-{s}-{m}"),
                Some(&format!("sub-{s}")),
                &format!("sam-{s}-{m}"),
                "inode/directory",
            ));
            for f in 0..3 {
                catalog.push(folder_entry(
                    &format!("file-{s}-{m}-{f}"),
                    Some(&format!("sam-{s}-{m}")),
                    &format!("image-{f}.tif"),
                    "image/tiff",
                ));
            }
        }
    }
    (ttl, catalog)
}

fn load_store(ttl: &str) -> QuadStore {
    let (tx, mut rx) = unbounded_channel();
    TurtleQuadParser::new().parse(ttl, &tx).unwrap();
    let mut store = QuadStore::new();
    while let Ok(event) = rx.try_recv() {
        match event {
            ParseEvent::Prefix { prefix, iri } => store.add_prefix(prefix, iri),
            ParseEvent::Quad(quad) => store.add_quad(quad),
            ParseEvent::End => break,
        }
    }
    store
}

// Benchmark: parse, build, merge, lay out and export through the splinter
fn bench_splinter_end_to_end(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("splinter_end_to_end");
    for subjects in [10, 50] {
        let (ttl, catalog) = synthetic_dataset(subjects, 4);
        group.bench_with_input(BenchmarkId::from_parameter(subjects), &subjects, |b, _| {
            b.to_async(&rt).iter(|| async {
                let splinter =
                    DatasetSplinter::new(&ttl, catalog.clone(), SdsConfig::default());
                splinter.graph().await.unwrap().nodes.len()
            });
        });
    }
    group.finish();
}

// Benchmark: the synchronous stages on an already loaded store
fn bench_build_views(c: &mut Criterion) {
    let (ttl, catalog) = synthetic_dataset(50, 4);
    let store = load_store(&ttl);
    let config = SdsConfig::default();

    c.bench_function("build_views", |b| {
        b.iter(|| {
            build_views(&store, catalog.clone(), &config)
                .unwrap()
                .graph
                .links
                .len()
        });
    });
}

criterion_group!(benches, bench_splinter_end_to_end, bench_build_views);
criterion_main!(benches);
