use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tc_compressor::{compress, compress_slice, CompressExt, Token, TokenCompressorStream};

/// Template-shaped token sequence: runs of escaped literals between interpolations.
fn generate_tokens(count: usize) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(count);
    let mut offset = 0;
    for i in 0..count {
        if i % 5 == 4 {
            // `{name}`: braces belong to no token.
            tokens.push(Token::interpolation("name", offset + 1, offset + 5));
            offset += 6;
        } else {
            tokens.push(Token::literal("text ", offset, offset + 5));
            offset += 5;
        }
    }
    tokens
}

fn bench_compress(c: &mut Criterion) {
    for &(name, count) in &[("1k", 1_000), ("10k", 10_000), ("100k", 100_000)] {
        let tokens = generate_tokens(count);
        c.bench_function(&format!("compress_{name}"), |b| {
            b.iter(|| black_box(compress_slice(black_box(&tokens))))
        });
        c.bench_function(&format!("compress_owned_{name}"), |b| {
            b.iter(|| black_box(compress(black_box(tokens.clone()))))
        });
        c.bench_function(&format!("compress_iter_{name}"), |b| {
            b.iter(|| black_box(tokens.iter().cloned().compressed().count()))
        });
    }
}

fn bench_stream(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("tokio runtime");
    let tokens = generate_tokens(10_000);

    for &capacity in &[1usize, 16, 256] {
        c.bench_function(&format!("stream_10k_capacity_{capacity}"), |b| {
            b.iter(|| {
                runtime.block_on(async {
                    let (mut writer, reader) = TokenCompressorStream::with_capacity(capacity).split();
                    let input = tokens.clone();
                    let producer = async move {
                        for token in input {
                            writer.write(token).await?;
                        }
                        writer.close().await
                    };
                    let (written, received) = tokio::join!(producer, reader.collect_all());
                    written.expect("write");
                    black_box(received.expect("read"))
                })
            })
        });
    }
}

criterion_group!(benches, bench_compress, bench_stream);
criterion_main!(benches);
