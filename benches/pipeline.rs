use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use lexis::{
    Corpus, Document, NormalizeConfig, Pipeline, PipelineConfig, ReduceConfig, Resources,
    TokenizeConfig, frequency, tokenize,
};

const PARAGRAPH: &str = "Fellow-citizens of the Senate and of the House of Representatives: \
among the vicissitudes incident to life no event could have filled me with greater anxieties \
than that of which the notification was transmitted by your order, and received on the 14th day \
of the present month. See https://example.org/archive for the full text!";

fn bench_corpus(docs: usize) -> Corpus {
    let documents = (0..docs).map(|i| {
        Document::new(i as i64, PARAGRAPH.repeat(1 + i % 4))
            .with_meta("decade", format!("{}0s", 178 + i % 6))
    });
    Corpus::from_documents(documents).expect("bench corpus ids are unique")
}

fn config(use_parallel: bool) -> PipelineConfig {
    PipelineConfig {
        tokenize: TokenizeConfig {
            remove_punct: true,
            remove_numbers: true,
            remove_url: true,
            ..Default::default()
        },
        normalize: NormalizeConfig {
            stopwords: Some("en".into()),
            ..Default::default()
        },
        reduce: ReduceConfig::Stem {
            language: "en".into(),
        },
        use_parallel,
        ..Default::default()
    }
}

fn tokenize_bench(c: &mut Criterion) {
    let text = PARAGRAPH.repeat(20);
    let cfg = TokenizeConfig::default();
    c.bench_function("tokenize_paragraphs", |b| {
        b.iter(|| {
            let toks = tokenize(black_box(&text), &cfg).expect("bench tokenize");
            black_box(toks);
        });
    });
}

fn process_bench(c: &mut Criterion) {
    let pipeline = Pipeline::new(&config(false), &Resources::new()).expect("bench pipeline");
    let text = PARAGRAPH.repeat(20);
    c.bench_function("process_text_stemmed", |b| {
        b.iter(|| {
            let toks = pipeline.process_text(black_box(&text)).expect("bench process");
            black_box(toks);
        });
    });
}

fn dfm_bench(c: &mut Criterion) {
    let corpus = bench_corpus(500);
    let resources = Resources::new();
    let mut group = c.benchmark_group("build_dfm_500_docs");
    for parallel in [false, true] {
        let pipeline = Pipeline::new(&config(parallel), &resources).expect("bench pipeline");
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_function(label, |b| {
            b.iter(|| {
                let dfm = pipeline.build_dfm(black_box(&corpus)).expect("bench dfm");
                black_box(frequency(&dfm));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, tokenize_bench, process_bench, dfm_bench);
criterion_main!(benches);
