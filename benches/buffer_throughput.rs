use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jitterbuf::{JitterBuffer, JitterKind, RtpHeader};

fn put_get_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("put/get cycle");

    group.bench_function("audio inorder", |b| {
        b.iter(|| {
            let jb = JitterBuffer::new(JitterKind::Audio, 2, 10);
            for seq in 0u16..64 {
                jb.put_packet(
                    RtpHeader::new(seq, u32::from(seq) * 160),
                    Bytes::from_static(b"payload"),
                );
            }
            for _ in 0u16..64 {
                let _ = black_box(jb.get_packet());
            }
        });
    });

    group.bench_function("video with gaps", |b| {
        b.iter(|| {
            let jb = JitterBuffer::new(JitterKind::Video, 3, 30);
            for seq in 0u16..64 {
                if seq % 7 == 0 {
                    continue;
                }
                jb.put_packet(
                    RtpHeader::new(seq, u32::from(seq) * 3000),
                    Bytes::from_static(b"payload"),
                );
            }
            for _ in 0u16..64 {
                let _ = black_box(jb.get_packet());
                let _ = black_box(jb.pop_nack());
            }
        });
    });

    group.finish();
}

criterion_group!(benches, put_get_cycle);
criterion_main!(benches);
