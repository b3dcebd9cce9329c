use criterion::Criterion;
use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use mdtoc::document::Document;
use mdtoc::document::DocumentOptions;
use mdtoc::outline::extract_headings;
use mdtoc_core::theme::Theme;
use std::sync::Arc;

fn sample_docs(sections: usize) -> String {
    let mut s = String::new();
    s.push_str("# Reference Manual\n\n");
    for i in 0..sections {
        s.push_str(&format!("## Section {i}\n\n"));
        s.push_str("A paragraph long enough to stress word wrapping. ");
        for _ in 0..8 {
            s.push_str("The quick brown fox jumps over the lazy dog. ");
        }
        s.push_str("\n\n");
        s.push_str(&format!("### Section {i} details\n\n"));
        s.push_str("```json\n{ \"key\": \"value\" }\n```\n\n");
    }
    s
}

fn bench_extract_headings(c: &mut Criterion) {
    let md = sample_docs(50);
    c.bench_function("extract_headings_50_sections", |b| {
        b.iter(|| {
            let items = extract_headings(black_box(&md));
            black_box(items.len())
        })
    });
}

fn bench_parse_and_layout(c: &mut Criterion) {
    let md = sample_docs(50);
    let theme = Theme::default();
    c.bench_function("parse_and_layout_w100", |b| {
        b.iter(|| {
            let doc = Document::parse(Arc::from(md.as_str()), &DocumentOptions::default());
            let lines = doc.layout(100, &theme);
            black_box(lines.len())
        })
    });
}

criterion_group!(benches, bench_extract_headings, bench_parse_and_layout);
criterion_main!(benches);
