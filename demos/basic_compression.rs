use huffpack::{CodecConfig, HuffmanCodec};
use std::fs::File;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let sample_text = "Hello, world! This is a sample text for Huffman compression. \
                      The quick brown fox jumps over the lazy dog. \
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes.";

    println!("Sample text: {} bytes", sample_text.len());

    // Compress to a file
    let mut output = File::create("sample.huff")?;
    let compressed = HuffmanCodec::compress_to(sample_text.as_bytes(), &mut output)?;
    drop(output);

    let compressed_size = std::fs::metadata("sample.huff")?.len();
    println!(
        "Compressed to: {} bytes ({:.1}% of original, payload {:.1}% of original bits)",
        compressed_size,
        compressed.stored_ratio() * 100.0,
        compressed.payload.compression_ratio(sample_text.len()) * 100.0
    );

    // Decompress the file
    let mut input = File::open("sample.huff")?;
    let decompressed = HuffmanCodec::decompress_from(&mut input, &CodecConfig::default())?;

    std::fs::remove_file("sample.huff")?;

    if decompressed != sample_text.as_bytes() {
        return Err("Decompression verification failed".into());
    }
    println!("Decompression successful! Data matches exactly.");

    Ok(())
}
