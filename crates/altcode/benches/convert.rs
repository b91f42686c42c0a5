//! Conversion benchmarks.

use altcode::{convert_document, parse_document, BackendKind, CancellationFlag, RawDocument, RunConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use futures::executor::block_on;

const CARD: &str = include_str!("../tests/fixtures/card.json");

/// A vertical list holding `count` copies of the card's content.
fn card_list(count: usize) -> RawDocument {
    let mut doc = parse_document(CARD).expect("fixture parses");
    let card = doc.nodes[0].clone();
    let mut list = card.clone();
    list.name = "List".to_string();
    list.children = (0..count)
        .map(|i| {
            let mut item = card.clone();
            item.id = format!("2:{}", i);
            item
        })
        .collect();
    doc.nodes = vec![list];
    doc
}

fn convert_card(c: &mut Criterion) {
    let doc = parse_document(CARD).expect("fixture parses");
    let cancel = CancellationFlag::new();
    for backend in [BackendKind::Html, BackendKind::Flutter, BackendKind::Compose] {
        let config = RunConfig::new(backend);
        c.bench_function(&format!("convert_card_{}", backend), |b| {
            b.iter(|| block_on(convert_document(black_box(&doc), &config, &cancel)))
        });
    }
}

fn convert_list(c: &mut Criterion) {
    let doc = card_list(200);
    let cancel = CancellationFlag::new();
    let config = RunConfig::new(BackendKind::Tailwind);
    c.bench_function("convert_list_200", |b| {
        b.iter(|| block_on(convert_document(black_box(&doc), &config, &cancel)))
    });
}

criterion_group!(benches, convert_card, convert_list);
criterion_main!(benches);
