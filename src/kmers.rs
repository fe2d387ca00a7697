//! Lazy k-mer cursors over whole sequences.
//!
//! A [`KmerIterator`] walks every k-mer of a borrowed sequence through a
//! [`HashShifter`], paying the O(K) window fill once and O(1) per k-mer
//! after that. Symbol validation is lazy: construction only checks the
//! sequence length, so an invalid symbol surfaces from the `next` call
//! whose window first covers it.

use crate::{
    hasher::{CyclicHasher, RollingHasher},
    shifter::HashShifter,
    KmerStreamError, Result,
};

/// Cursor over all k-mers of a sequence, yielding their hashes in order.
pub struct KmerIterator<'a, H = CyclicHasher> {
    seq: &'a [u8],
    k: u16,
    index: usize,
    initialized: bool,
    shifter: HashShifter<H>,
}

impl<'a> KmerIterator<'a, CyclicHasher> {
    /// Cursor over `seq` with a fresh forward-strand DNA shifter.
    ///
    /// # Errors
    ///
    /// [`KmerStreamError::SequenceTooShort`] if `seq` holds fewer than
    /// `k` symbols, [`KmerStreamError::InvalidK`] if `k == 0`.
    pub fn new(seq: &'a [u8], k: u16) -> Result<Self> {
        Self::from_shifter(seq, HashShifter::new(k)?)
    }
}

impl<'a, H: RollingHasher> KmerIterator<'a, H> {
    /// Cursor over `seq` driving a caller-supplied shifter.
    pub fn from_shifter(seq: &'a [u8], shifter: HashShifter<H>) -> Result<Self> {
        let k = shifter.k();
        if seq.len() < k as usize {
            return Err(KmerStreamError::SequenceTooShort {
                seq_len: seq.len(),
                k,
            });
        }
        Ok(Self {
            seq,
            k,
            index: 0,
            initialized: false,
            shifter,
        })
    }

    /// The hash of the next k-mer.
    ///
    /// The first call positions the shifter on `seq[0..k]`; later calls
    /// advance it one symbol. After the final k-mer this fails with
    /// [`KmerStreamError::PastEndOfIterator`].
    pub fn next(&mut self) -> Result<u64> {
        if !self.initialized {
            return self.first();
        }
        if self.done() {
            return Err(KmerStreamError::PastEndOfIterator);
        }
        let hash = self
            .shifter
            .shift_right(self.seq[self.index + self.k as usize - 1])?;
        self.index += 1;
        Ok(hash)
    }

    fn first(&mut self) -> Result<u64> {
        let hash = self.shifter.set_cursor(&self.seq[..self.k as usize])?;
        self.initialized = true;
        self.index += 1;
        Ok(hash)
    }

    /// True once every k-mer has been yielded.
    pub fn done(&self) -> bool {
        self.index + self.k as usize > self.seq.len()
    }

    /// Inclusive start index of the most recently yielded k-mer.
    pub fn start_pos(&self) -> usize {
        if !self.initialized {
            return 0;
        }
        self.index - 1
    }

    /// Exclusive end index of the most recently yielded k-mer.
    pub fn end_pos(&self) -> usize {
        if !self.initialized {
            return self.k as usize;
        }
        self.index + self.k as usize - 1
    }

    /// The k-mer width.
    #[inline(always)]
    pub fn k(&self) -> u16 {
        self.k
    }

    /// The shifter driven by this cursor.
    pub fn shifter(&self) -> &HashShifter<H> {
        &self.shifter
    }

    /// Consume the cursor, keeping the shifter at its final window.
    pub fn into_shifter(self) -> HashShifter<H> {
        self.shifter
    }

    /// Adapter implementing [`Iterator`] over `(start_pos, hash)` pairs.
    pub fn hashes(self) -> KmerHashes<'a, H> {
        KmerHashes {
            inner: self,
            failed: false,
        }
    }
}

/// [`Iterator`] facade over a [`KmerIterator`].
///
/// Yields `Ok((start_pos, hash))` per k-mer; a hashing error is yielded
/// once and fuses the iterator.
pub struct KmerHashes<'a, H = CyclicHasher> {
    inner: KmerIterator<'a, H>,
    failed: bool,
}

impl<'a, H: RollingHasher> Iterator for KmerHashes<'a, H> {
    type Item = Result<(usize, u64)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.inner.done() {
            return None;
        }
        match self.inner.next() {
            Ok(hash) => Some(Ok((self.inner.start_pos(), hash))),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
