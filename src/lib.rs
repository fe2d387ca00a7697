//! # kmerstream
//!
//! Streaming k-mer processing for DNA sequences: a rolling-hash engine
//! and a read-processing pipeline that feeds pluggable consumers.
//!
//! The crate is built around three layers:
//!
//! - [`hasher`]: cyclic polynomial rolling hashes with O(1) updates as
//!   the k-mer window shifts by one symbol in either direction.
//! - [`shifter`] and [`kmers`]: an exact K-symbol window over a hasher
//!   ([`HashShifter`]), with *gather* operations that enumerate the
//!   hashes of all one-symbol extensions without moving the window, and
//!   a lazy cursor ([`KmerIterator`]) over every k-mer of a sequence.
//! - [`processor`] and [`consumers`]: a pipeline driver
//!   ([`FileProcessor`]) that drains a parser, hands each read to a
//!   consumer (de Bruijn graph, signature store, streaming compactor,
//!   decision-node report, minimizer table), and publishes periodic
//!   tick events to registered listeners.
//!
//! ## Example
//!
//! ```rust
//! use kmerstream::{KmerIterator, Result};
//!
//! fn main() -> Result<()> {
//!     let mut kmers = KmerIterator::new(b"ACGTACGT", 4)?;
//!     while !kmers.done() {
//!         let hash = kmers.next()?;
//!         println!("k-mer {}..{}: {:#x}", kmers.start_pos(), kmers.end_pos(), hash);
//!     }
//!     Ok(())
//! }
//! ```

/// Per-symbol hash seeds and the complement table.
// Not re-exported directly.
mod constants;

pub mod alphabet;
pub mod consumers;
pub mod events;
pub mod hasher;
pub mod kmers;
pub mod minimizer;
pub mod parsing;
pub mod processor;
pub mod shifter;

// ──────────────────────────────────────────────────────────────
// Re-exports: public API surface
// --------------------------------------------------------------------------

pub use alphabet::{Alphabet, DNA_SIMPLE};
pub use consumers::{
    CompactorConsumer, CountSignature, DecisionNodeConsumer, GraphConsumer, KmerGraph,
    MinHashConsumer, MinHashSignature, MinimizerConsumer, NeighborBundle, SequenceConsumer,
    SignatureConsumer, StreamingCompactor,
};
pub use events::{EventListener, EventNotifier, IntervalLevel, TimeIntervalEvent};
pub use hasher::{CanonicalCyclicHasher, CyclicHasher, RollingHasher};
pub use kmers::{KmerHashes, KmerIterator};
pub use minimizer::WindowedMinimizer;
pub use parsing::{
    MemoryPairedParser, MemoryParser, PairedParser, Read, ReadBundle, SequenceParser,
};
pub use processor::{
    FileProcessor, IntervalCounter, IntervalState, DEFAULT_COARSE_INTERVAL,
    DEFAULT_FINE_INTERVAL, DEFAULT_MEDIUM_INTERVAL,
};
pub use shifter::{DefaultShifter, HashShifter, Shift};

// ──────────────────────────────────────────────────────────────
// Crate-wide result and error types
// --------------------------------------------------------------------------

/// Shorthand `Result` alias for this crate's operations.
pub type Result<T, E = KmerStreamError> = std::result::Result<T, E>;

/// Errors raised by the hashing core and the pipeline.
#[derive(thiserror::Error, Debug)]
pub enum KmerStreamError {
    /// `k` was zero.
    #[error("k must be > 0")]
    InvalidK,

    /// A symbol outside the alphabet was presented for validation or
    /// window entry.
    #[error("invalid symbol: {symbol}")]
    InvalidSymbol { symbol: char },

    /// An operation required at least `k` symbols and received fewer.
    #[error("sequence length ({seq_len}) < k ({k})")]
    SequenceTooShort { seq_len: usize, k: u16 },

    /// `next()` was called on an exhausted k-mer iterator.
    #[error("past end of iterator")]
    PastEndOfIterator,

    /// The parser ran out of reads. The pipeline converts this into loop
    /// termination; it only escapes when a parser is polled directly.
    #[error("no more reads available")]
    NoMoreReads,

    /// Failure writing consumer output.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Contract violation outside the specific kinds above.
    #[error("{0}")]
    Pipeline(String),
}
