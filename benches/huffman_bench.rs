use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use huffpack::{huffman_codec, tree_codec, HuffmanCodec, HuffmanTree};

fn english_text(size: usize) -> Vec<u8> {
    let sentences = [
        "The quick brown fox jumps over the lazy dog. ",
        "Huffman encoding is a greedy algorithm that builds optimal prefix codes. ",
        "It was the best of times, it was the worst of times.\n",
    ];
    sentences
        .iter()
        .cycle()
        .flat_map(|s| s.bytes())
        .take(size)
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tree");
    let data: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();

    group.bench_function("full_alphabet", |b| {
        b.iter(|| HuffmanTree::from_bytes(black_box(&data)).unwrap())
    });
    group.finish();
}

fn bench_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman");

    for size in [1024, 64 * 1024] {
        let data = english_text(size);
        let tree = HuffmanTree::from_bytes(&data).unwrap();
        let table = tree.code_table();
        let payload = huffman_codec::encode(&tree, &data).unwrap();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("encode", size), &data, |b, data| {
            b.iter(|| huffman_codec::encode_with_table(&table, black_box(data)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &payload, |b, payload| {
            b.iter(|| huffman_codec::decode(&tree, black_box(payload)).unwrap())
        });
    }
    group.finish();
}

fn bench_container(c: &mut Criterion) {
    let mut group = c.benchmark_group("container");
    let data = english_text(64 * 1024);
    let bytes = HuffmanCodec::compress(&data).unwrap().serialize().unwrap();
    let tree = HuffmanTree::from_bytes(&data).unwrap();

    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("compress", |b| {
        b.iter(|| HuffmanCodec::compress(black_box(&data)).unwrap())
    });
    group.bench_function("decompress", |b| {
        b.iter(|| {
            let compressed = huffpack::CompressedData::deserialize(black_box(&bytes)).unwrap();
            HuffmanCodec::decompress(&compressed).unwrap()
        })
    });
    group.bench_function("serialize_tree", |b| {
        b.iter(|| tree_codec::serialize(black_box(&tree)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_encode_decode, bench_container);
criterion_main!(benches);
