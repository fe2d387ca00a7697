//! Per-symbol hash seeds and the nucleotide complement table.
//!
//! Cyclic polynomial hashing needs one random-looking 64-bit word per
//! symbol; these are the classic nucleotide seed constants. Symbols
//! outside the alphabet map to zero in `SEED_TAB`, which is harmless
//! because every symbol is validated before it reaches a hasher.

/// 64-bit hash seed for `A`.
pub(crate) const SEED_A: u64 = 0x3c8b_fbb3_95c6_0474;
/// 64-bit hash seed for `C`.
pub(crate) const SEED_C: u64 = 0x3193_c185_62a0_2b4c;
/// 64-bit hash seed for `G`.
pub(crate) const SEED_G: u64 = 0x2032_3ed0_8257_2324;
/// 64-bit hash seed for `T`.
pub(crate) const SEED_T: u64 = 0x2955_49f5_4be2_4456;

/// Seed lookup keyed by ASCII symbol.
pub(crate) const SEED_TAB: [u64; 256] = build_seed_tab();

const fn build_seed_tab() -> [u64; 256] {
    let mut tab = [0u64; 256];
    tab[b'A' as usize] = SEED_A;
    tab[b'C' as usize] = SEED_C;
    tab[b'G' as usize] = SEED_G;
    tab[b'T' as usize] = SEED_T;
    tab
}

/// Watson-Crick complement keyed by ASCII symbol; identity outside
/// `A`/`C`/`G`/`T`.
pub(crate) const COMPLEMENT_TAB: [u8; 256] = build_complement_tab();

const fn build_complement_tab() -> [u8; 256] {
    let mut tab = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        tab[i] = i as u8;
        i += 1;
    }
    tab[b'A' as usize] = b'T';
    tab[b'T' as usize] = b'A';
    tab[b'C' as usize] = b'G';
    tab[b'G' as usize] = b'C';
    tab
}
