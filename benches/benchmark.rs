use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use kmerstream::{HashShifter, KmerIterator, WindowedMinimizer};

/// Deterministic pseudo-random DNA of length `len`.
fn generate_dna(len: usize) -> Vec<u8> {
    const SYMBOLS: &[u8] = b"ACGT";
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            SYMBOLS[(state >> 33) as usize % 4]
        })
        .collect()
}

fn bench_rolling_iterator(c: &mut Criterion) {
    let seq = generate_dna(1_000_000);
    let k: u16 = 31;

    let mut group = c.benchmark_group("kmer_hashing");
    group.throughput(Throughput::Bytes(seq.len() as u64));

    group.bench_with_input(BenchmarkId::new("rolling", seq.len()), &seq, |b, seq| {
        b.iter(|| {
            let mut kmers = KmerIterator::new(seq, k).unwrap();
            let mut acc = 0u64;
            while !kmers.done() {
                acc ^= kmers.next().unwrap();
            }
            acc
        })
    });

    // The O(L*K) baseline the rolling scheme exists to beat.
    group.bench_with_input(BenchmarkId::new("rehash", seq.len()), &seq, |b, seq| {
        b.iter(|| {
            let shifter = HashShifter::new(k).unwrap();
            let mut acc = 0u64;
            for i in 0..=seq.len() - k as usize {
                acc ^= shifter.hash(&seq[i..i + k as usize]).unwrap();
            }
            acc
        })
    });

    group.finish();
}

fn bench_gather(c: &mut Criterion) {
    let seq = generate_dna(100_000);
    let k: u16 = 31;

    let mut group = c.benchmark_group("gather");
    group.throughput(Throughput::Elements((seq.len() - k as usize + 1) as u64));

    group.bench_with_input(
        BenchmarkId::new("gather_right", seq.len()),
        &seq,
        |b, seq| {
            b.iter(|| {
                let mut shifter = HashShifter::from_sequence(seq, k).unwrap();
                let mut acc = 0u64;
                for i in 1..=seq.len() - k as usize {
                    for shift in shifter.gather_right().unwrap() {
                        acc ^= shift.hash;
                    }
                    shifter.shift_right(seq[i + k as usize - 1]).unwrap();
                }
                acc
            })
        },
    );

    group.finish();
}

fn bench_minimizers(c: &mut Criterion) {
    let seq = generate_dna(1_000_000);

    let mut group = c.benchmark_group("minimizers");
    group.throughput(Throughput::Bytes(seq.len() as u64));

    group.bench_with_input(BenchmarkId::new("w16_k31", seq.len()), &seq, |b, seq| {
        let minimizer = WindowedMinimizer::new(16, 31).unwrap();
        b.iter(|| minimizer.minimizers(seq).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_rolling_iterator,
    bench_gather,
    bench_minimizers
);
criterion_main!(benches);
