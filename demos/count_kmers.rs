//! Drive the pipeline over an in-memory set of reads with the graph
//! consumer, printing tick events and the distinct k-mer count.

use std::collections::HashSet;

use kmerstream::{
    FileProcessor, GraphConsumer, KmerGraph, KmerIterator, MemoryParser, Result,
    TimeIntervalEvent,
};

/// Toy de Bruijn graph: a set of k-mer hashes.
struct HashSetGraph {
    k: u16,
    kmers: HashSet<u64>,
}

impl KmerGraph for HashSetGraph {
    fn insert_sequence(&mut self, seq: &str) -> Result<u64> {
        let mut inserted = 0;
        let mut kmers = KmerIterator::new(seq.as_bytes(), self.k)?;
        while !kmers.done() {
            if self.kmers.insert(kmers.next()?) {
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

fn main() -> Result<()> {
    let mut parser = MemoryParser::from_seqs([
        "ACGTACGTACGTACGT",
        "TTGACGTACGTAGGCA",
        "GGGTACGTACGGTTAC",
        "ACGTACGTACGTACGT",
    ]);

    let graph = HashSetGraph {
        k: 6,
        kmers: HashSet::new(),
    };
    let mut processor = FileProcessor::with_intervals(GraphConsumer::new(graph), 2, 4, 8);
    processor.register_listener(|event: &TimeIntervalEvent| {
        eprintln!("[{:?}] {} reads processed", event.level, event.t);
    });

    let n_reads = processor.process(&mut parser)?;
    let consumer = processor.into_consumer();
    println!(
        "{} reads, {} distinct 6-mers ({} insertions were new)",
        n_reads,
        consumer.graph().kmers.len(),
        consumer.n_consumed()
    );
    Ok(())
}
