//! Windowed (w,k)-minimizers over whole sequences.
//!
//! The minimizer of a window of `w` consecutive k-mers is the k-mer with
//! the smallest hash, ties going to the leftmost occurrence. The table is
//! computed with a monotonic deque over a [`KmerIterator`], so a length-L
//! sequence costs O(L) regardless of `w`.

use std::collections::VecDeque;
use std::marker::PhantomData;

use crate::{
    alphabet::DNA_SIMPLE,
    hasher::{CyclicHasher, RollingHasher},
    kmers::KmerIterator,
    shifter::HashShifter,
    KmerStreamError, Result,
};

/// Computes minimizer tables for windows of `window_size` k-mers.
#[derive(Debug, Clone)]
pub struct WindowedMinimizer<H = CyclicHasher> {
    window_size: usize,
    k: u16,
    _hasher: PhantomData<H>,
}

impl WindowedMinimizer<CyclicHasher> {
    /// Minimizer over windows of `window_size` k-mers of width `k`,
    /// hashed with the default forward-strand hasher.
    pub fn new(window_size: usize, k: u16) -> Result<Self> {
        Self::with_hasher(window_size, k)
    }
}

impl<H: RollingHasher> WindowedMinimizer<H> {
    /// Same configuration over an alternative hasher.
    pub fn with_hasher(window_size: usize, k: u16) -> Result<Self> {
        if k == 0 {
            return Err(KmerStreamError::InvalidK);
        }
        if window_size == 0 {
            return Err(KmerStreamError::Pipeline(
                "minimizer window must hold at least one k-mer".into(),
            ));
        }
        Ok(Self {
            window_size,
            k,
            _hasher: PhantomData,
        })
    }

    /// The k-mer width.
    #[inline(always)]
    pub fn k(&self) -> u16 {
        self.k
    }

    /// The number of consecutive k-mers per window.
    #[inline(always)]
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// One `(hash, start_pos)` row per complete window, in window order.
    ///
    /// Sequences holding fewer than `window_size` k-mers produce an empty
    /// table.
    pub fn minimizers(&self, seq: &[u8]) -> Result<Vec<(u64, usize)>> {
        let shifter = HashShifter::<H>::with_alphabet(self.k, &DNA_SIMPLE)?;
        let mut kmers = KmerIterator::from_shifter(seq, shifter)?;
        let mut pending: VecDeque<(u64, usize)> = VecDeque::new();
        let mut table = Vec::new();

        while !kmers.done() {
            let hash = kmers.next()?;
            let pos = kmers.start_pos();
            while pending.back().is_some_and(|&(h, _)| h > hash) {
                pending.pop_back();
            }
            pending.push_back((hash, pos));
            while pending
                .front()
                .is_some_and(|&(_, p)| p + self.window_size <= pos)
            {
                pending.pop_front();
            }
            if pos + 1 >= self.window_size {
                let &(min_hash, min_pos) = pending
                    .front()
                    .expect("window holds at least one k-mer");
                table.push((min_hash, min_pos));
            }
        }
        Ok(table)
    }
}
