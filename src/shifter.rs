//! Sliding k-mer windows over a rolling hasher.
//!
//! A [`HashShifter`] owns an exact K-symbol window in a small ring buffer
//! plus a [`RollingHasher`], and lets the caller move the window one
//! symbol at a time in either direction. The *gather* operations
//! enumerate the hashes of every one-symbol extension without disturbing
//! the window, which is what de Bruijn graph traversals need when probing
//! a node's neighbors.
//!
//! Every symbol entering the window passes alphabet validation; the
//! window therefore never holds an invalid symbol.

use std::collections::VecDeque;

use crate::{
    alphabet::{Alphabet, DNA_SIMPLE},
    hasher::{CyclicHasher, RollingHasher},
    KmerStreamError, Result,
};

/// The hash a window *would* have after a one-symbol extension.
///
/// Produced by [`HashShifter::gather_right`] and
/// [`HashShifter::gather_left`]; the window itself does not move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub hash: u64,
    pub symbol: u8,
}

/// A K-symbol cursor over sequence space, hashed incrementally.
///
/// Constructed uninitialized; the first [`set_cursor`](Self::set_cursor)
/// fills the window, and the shifter stays initialized for the rest of
/// its life. While initialized, the window holds exactly K valid symbols
/// and the hasher's value always equals the one-shot hash of the window.
#[derive(Debug, Clone)]
pub struct HashShifter<H = CyclicHasher> {
    k: u16,
    alphabet: &'static Alphabet,
    window: VecDeque<u8>,
    hasher: H,
    initialized: bool,
}

/// The pipeline's default shifter: forward-strand cyclic polynomial
/// hashing over unambiguous DNA.
pub type DefaultShifter = HashShifter<CyclicHasher>;

impl HashShifter<CyclicHasher> {
    /// Uninitialized shifter over DNA.
    ///
    /// # Errors
    ///
    /// [`KmerStreamError::InvalidK`] if `k == 0`.
    pub fn new(k: u16) -> Result<Self> {
        Self::with_alphabet(k, &DNA_SIMPLE)
    }

    /// Shifter positioned at the first K symbols of `seq`.
    pub fn from_sequence(seq: &[u8], k: u16) -> Result<Self> {
        let mut shifter = Self::new(k)?;
        shifter.set_cursor(seq)?;
        Ok(shifter)
    }
}

impl<H: RollingHasher> HashShifter<H> {
    /// Uninitialized shifter with an explicit hasher type and alphabet.
    pub fn with_alphabet(k: u16, alphabet: &'static Alphabet) -> Result<Self> {
        if k == 0 {
            return Err(KmerStreamError::InvalidK);
        }
        Ok(Self {
            k,
            alphabet,
            window: VecDeque::with_capacity(k as usize),
            hasher: H::new(k),
            initialized: false,
        })
    }

    /// The window width.
    #[inline(always)]
    pub fn k(&self) -> u16 {
        self.k
    }

    /// The alphabet this shifter validates against.
    #[inline(always)]
    pub fn alphabet(&self) -> &'static Alphabet {
        self.alphabet
    }

    /// Whether the window has been filled.
    #[inline(always)]
    pub fn initialized(&self) -> bool {
        self.initialized
    }

    /// The hash of the current window.
    #[inline(always)]
    pub fn value(&self) -> u64 {
        self.hasher.value()
    }

    /// Whether `c` belongs to this shifter's alphabet.
    #[inline(always)]
    pub fn is_valid(&self, c: u8) -> bool {
        self.alphabet.is_valid(c)
    }

    /// One-shot hash of the first K symbols of `seq`, leaving the shifter
    /// untouched.
    ///
    /// # Errors
    ///
    /// [`KmerStreamError::SequenceTooShort`] if `seq` holds fewer than K
    /// symbols; [`KmerStreamError::InvalidSymbol`] if any symbol of `seq`
    /// is outside the alphabet.
    pub fn hash(&self, seq: &[u8]) -> Result<u64> {
        if seq.len() < self.k as usize {
            return Err(KmerStreamError::SequenceTooShort {
                seq_len: seq.len(),
                k: self.k,
            });
        }
        self.alphabet.validate_seq(seq)?;
        let mut hasher = H::new(self.k);
        for &c in &seq[..self.k as usize] {
            hasher.eat(c);
        }
        Ok(hasher.value())
    }

    /// Position the window on `seq` and return the resulting hash.
    ///
    /// Uninitialized, this loads the first K symbols. Initialized, it
    /// shifts the current window right through *every* symbol of the
    /// input; callers reposition by passing exactly K symbols.
    pub fn set_cursor(&mut self, seq: &[u8]) -> Result<u64> {
        if seq.len() < self.k as usize {
            return Err(KmerStreamError::SequenceTooShort {
                seq_len: seq.len(),
                k: self.k,
            });
        }
        if self.initialized {
            for &c in seq {
                self.shift_right(c)?;
            }
        } else {
            self.load(seq)?;
        }
        Ok(self.value())
    }

    /// Fill the window from the head of a sequence. Leaves the shifter
    /// uninitialized on validation failure so a later `set_cursor` can
    /// retry cleanly.
    fn load(&mut self, seq: &[u8]) -> Result<()> {
        let head = &seq[..self.k as usize];
        self.alphabet.validate_seq(head)?;
        self.window.clear();
        self.window.extend(head.iter().copied());
        self.hasher.reset();
        for &c in head {
            self.hasher.eat(c);
        }
        self.initialized = true;
        Ok(())
    }

    /// Append `c` at the right edge, evicting the leftmost symbol.
    /// Returns the new hash.
    pub fn shift_right(&mut self, c: u8) -> Result<u64> {
        self.alphabet.validate(c)?;
        self.require_window()?;
        let evicted = self
            .window
            .pop_front()
            .expect("window holds k symbols once initialized");
        self.window.push_back(c);
        self.hasher.update(evicted, c);
        Ok(self.value())
    }

    /// Prepend `c` at the left edge, evicting the rightmost symbol.
    /// Returns the new hash.
    pub fn shift_left(&mut self, c: u8) -> Result<u64> {
        self.alphabet.validate(c)?;
        self.require_window()?;
        let evicted = self
            .window
            .pop_back()
            .expect("window holds k symbols once initialized");
        self.window.push_front(c);
        self.hasher.reverse_update(c, evicted);
        Ok(self.value())
    }

    /// For each alphabet symbol, the hash [`shift_right`](Self::shift_right)
    /// would produce, in alphabet order. Window and hash are unchanged on
    /// return.
    pub fn gather_right(&mut self) -> Result<Vec<Shift>> {
        self.require_window()?;
        let front = *self
            .window
            .front()
            .expect("window holds k symbols once initialized");
        let mut shifts = Vec::with_capacity(self.alphabet.symbols().len());
        for &symbol in self.alphabet.symbols() {
            self.hasher.update(front, symbol);
            shifts.push(Shift {
                hash: self.hasher.value(),
                symbol,
            });
            self.hasher.reverse_update(front, symbol);
        }
        Ok(shifts)
    }

    /// For each alphabet symbol, the hash [`shift_left`](Self::shift_left)
    /// would produce, in alphabet order. Window and hash are unchanged on
    /// return.
    pub fn gather_left(&mut self) -> Result<Vec<Shift>> {
        self.require_window()?;
        let back = *self
            .window
            .back()
            .expect("window holds k symbols once initialized");
        let mut shifts = Vec::with_capacity(self.alphabet.symbols().len());
        for &symbol in self.alphabet.symbols() {
            self.hasher.reverse_update(symbol, back);
            shifts.push(Shift {
                hash: self.hasher.value(),
                symbol,
            });
            self.hasher.update(symbol, back);
        }
        Ok(shifts)
    }

    /// A copy of the current window contents.
    pub fn get_cursor(&self) -> String {
        self.window.iter().map(|&c| c as char).collect()
    }

    fn require_window(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(KmerStreamError::Pipeline(
                "shift on an uninitialized shifter".into(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::CanonicalCyclicHasher;

    #[test]
    fn rejects_zero_k() {
        assert!(matches!(
            HashShifter::new(0),
            Err(KmerStreamError::InvalidK)
        ));
    }

    #[test]
    fn set_cursor_loads_the_first_k_symbols() {
        let mut shifter = HashShifter::new(4).unwrap();
        let hash = shifter.set_cursor(b"ACGTTT").unwrap();
        assert!(shifter.initialized());
        assert_eq!(shifter.get_cursor(), "ACGT");
        assert_eq!(hash, shifter.hash(b"ACGT").unwrap());
    }

    #[test]
    fn set_cursor_when_initialized_rolls_through_the_input() {
        let mut shifter = HashShifter::from_sequence(b"ACGT", 4).unwrap();
        shifter.set_cursor(b"TTTT").unwrap();
        assert_eq!(shifter.get_cursor(), "TTTT");
    }

    #[test]
    fn shift_right_tracks_the_one_shot_hash() {
        let seq = b"ACGTACGGTA";
        let mut shifter = HashShifter::from_sequence(seq, 4).unwrap();
        for i in 1..=seq.len() - 4 {
            let hash = shifter.shift_right(seq[i + 3]).unwrap();
            assert_eq!(hash, shifter.hash(&seq[i..i + 4]).unwrap());
            assert_eq!(shifter.get_cursor().as_bytes(), &seq[i..i + 4]);
        }
    }

    #[test]
    fn shift_left_undoes_shift_right() {
        let mut shifter = HashShifter::from_sequence(b"ACGT", 4).unwrap();
        let before = (shifter.value(), shifter.get_cursor());
        let evicted = shifter.get_cursor().as_bytes()[0];
        shifter.shift_right(b'G').unwrap();
        shifter.shift_left(evicted).unwrap();
        assert_eq!((shifter.value(), shifter.get_cursor()), before);
    }

    #[test]
    fn gather_right_leaves_the_window_alone() {
        let mut shifter = HashShifter::from_sequence(b"ACGTT", 4).unwrap();
        let before = (shifter.value(), shifter.get_cursor());
        let shifts = shifter.gather_right().unwrap();
        assert_eq!(shifts.len(), 4);
        assert_eq!((shifter.value(), shifter.get_cursor()), before);
    }

    #[test]
    fn gather_right_matches_actual_shifts() {
        let mut shifter = HashShifter::from_sequence(b"ACG", 3).unwrap();
        let shifts = shifter.gather_right().unwrap();
        for shift in shifts {
            let mut probe = HashShifter::from_sequence(b"ACG", 3).unwrap();
            let hash = probe.shift_right(shift.symbol).unwrap();
            assert_eq!(shift.hash, hash, "extension {}", shift.symbol as char);
        }
    }

    #[test]
    fn gather_left_matches_actual_shifts() {
        let mut shifter = HashShifter::from_sequence(b"ACG", 3).unwrap();
        let shifts = shifter.gather_left().unwrap();
        for shift in shifts {
            let mut probe = HashShifter::from_sequence(b"ACG", 3).unwrap();
            let hash = probe.shift_left(shift.symbol).unwrap();
            assert_eq!(shift.hash, hash, "extension {}", shift.symbol as char);
        }
    }

    #[test]
    fn invalid_symbols_are_refused_everywhere() {
        let mut shifter = HashShifter::from_sequence(b"ACGT", 4).unwrap();
        assert!(matches!(
            shifter.shift_right(b'N'),
            Err(KmerStreamError::InvalidSymbol { symbol: 'N' })
        ));
        assert!(matches!(
            shifter.shift_left(b'N'),
            Err(KmerStreamError::InvalidSymbol { symbol: 'N' })
        ));
        assert!(matches!(
            shifter.hash(b"ACNT"),
            Err(KmerStreamError::InvalidSymbol { symbol: 'N' })
        ));
        // The failed shifts left the window alone.
        assert_eq!(shifter.get_cursor(), "ACGT");
    }

    #[test]
    fn short_input_is_refused() {
        let shifter = HashShifter::new(4).unwrap();
        assert!(matches!(
            shifter.hash(b"ACG"),
            Err(KmerStreamError::SequenceTooShort { seq_len: 3, k: 4 })
        ));
    }

    #[test]
    fn shifting_before_initialization_is_a_contract_violation() {
        let mut shifter = HashShifter::new(4).unwrap();
        assert!(matches!(
            shifter.shift_right(b'A'),
            Err(KmerStreamError::Pipeline(_))
        ));
    }

    #[test]
    fn canonical_shifter_honors_the_same_contract() {
        let seq = b"GATTACAGAT";
        let mut shifter =
            HashShifter::<CanonicalCyclicHasher>::with_alphabet(5, &DNA_SIMPLE).unwrap();
        shifter.set_cursor(seq).unwrap();
        for i in 1..=seq.len() - 5 {
            let hash = shifter.shift_right(seq[i + 4]).unwrap();
            assert_eq!(hash, shifter.hash(&seq[i..i + 5]).unwrap());
        }
    }
}
