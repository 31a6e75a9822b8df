//! Candidate page routines shipped with the harness.
//!
//! Each takes `(dest, src)` of equal length. The copies only touch the common
//! prefix if lengths ever differ.

use std::ptr;

use crate::registry::TestCase;

/// The cases run by the `page-bench` binary, in report order.
pub static DEFAULT_CASES: &[TestCase] = crate::page_cases![
    memcpy,
    byte_loop,
    word_loop,
    backward_copy,
    volatile_bytes,
    memset_zero,
];

/// `copy_from_slice`, which lowers to the platform `memcpy`.
pub fn memcpy(dest: &mut [u8], src: &[u8]) {
    let n = dest.len().min(src.len());
    dest[..n].copy_from_slice(&src[..n]);
}

/// Byte-at-a-time forward copy.
pub fn byte_loop(dest: &mut [u8], src: &[u8]) {
    for (d, s) in dest.iter_mut().zip(src) {
        *d = *s;
    }
}

/// Eight bytes at a time through `u64`, then the tail byte-wise.
pub fn word_loop(dest: &mut [u8], src: &[u8]) {
    let mut dest_words = dest.chunks_exact_mut(8);
    let mut src_words = src.chunks_exact(8);
    for (d, s) in (&mut dest_words).zip(&mut src_words) {
        let mut word = [0u8; 8];
        word.copy_from_slice(s);
        d.copy_from_slice(&u64::from_ne_bytes(word).to_ne_bytes());
    }
    byte_loop(dest_words.into_remainder(), src_words.remainder());
}

/// Byte copy from the last byte down to the first.
pub fn backward_copy(dest: &mut [u8], src: &[u8]) {
    for (d, s) in dest.iter_mut().zip(src).rev() {
        *d = *s;
    }
}

/// Byte copy through volatile stores, which the compiler may not merge or
/// turn into a `memcpy` call.
pub fn volatile_bytes(dest: &mut [u8], src: &[u8]) {
    for (d, s) in dest.iter_mut().zip(src) {
        // SAFETY: `d` is a valid, exclusive reference to one byte.
        unsafe { ptr::write_volatile(d, *s) };
    }
}

/// Clear the destination page; ignores the source.
pub fn memset_zero(dest: &mut [u8], _src: &[u8]) {
    dest.fill(0);
}
