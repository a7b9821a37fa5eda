use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use qarag::adapters::embeddings::HashingEmbeddingProvider;
use qarag::domain::models::RecordMetadata;
use qarag::{Record, VectorIndex};

const DIMENSION: usize = 768;

fn build_index(size: usize) -> VectorIndex {
    let embedder = HashingEmbeddingProvider::new(DIMENSION);
    let pairs = (0..size)
        .map(|i| {
            let content = format!("Tema: tema{i}\nPregunta: pregunta {i}\nRespuesta: respuesta {}", i % 97);
            let vector = embedder.embed_text(&content);
            let record = Record::new(content, RecordMetadata::new(format!("tema{i}").as_str(), "p", "r", "bench"));
            (vector, record)
        })
        .collect();
    VectorIndex::build(pairs).expect("non-empty corpus")
}

fn bench_top_k_query(c: &mut Criterion) {
    let query = HashingEmbeddingProvider::new(DIMENSION).embed_text("pregunta 42 respuesta 7");

    let mut group = c.benchmark_group("top_k_query");
    for size in [100, 1_000, 10_000] {
        let index = build_index(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &index, |b, index| {
            b.iter(|| index.query(black_box(&query), black_box(3)).map(|hits| hits.len()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_top_k_query);
criterion_main!(benches);
