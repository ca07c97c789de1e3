/* Copyright 2021 Google LLC
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     https://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

/* This code is based on suffix from BurntSushi. The original program was
 * licensed under the MIT license. We have modified it in two ways:
 *
 * 1. Indices are i32 and the text carries no materialized terminator, so
 *    the buffers match the 32-bit layout of the transforms built on top.
 *
 * 2. Spare room at the end of the suffix array is used as scratch space
 *    for the buckets and for the reduced problem of each recursion level.
 */
//! Linear time suffix array construction by induced sorting (SA-IS).
//!
//! The text never carries a materialized terminator. Every suffix is
//! implicitly followed by a sentinel that compares smaller than any symbol,
//! so a suffix that is a proper prefix of another sorts first.
//!
//! Scratch layout: the caller's suffix array buffer may be longer than the
//! text. The extra tail ("free space") holds the bucket arrays when it is big
//! enough. The reduced problem of the recursive step is solved inside the
//! head of the suffix array, with its text stored in the tail, so the only
//! per-level allocations are the suffix type flags and, without enough free
//! space, the buckets.

use crate::alphabet::{count_frequencies, Buckets, Symbol};
use crate::error::{try_filled, Result, SaisError};

/// Longest text the 32-bit index design can address.
pub const MAX_LEN: usize = i32::MAX as usize;

/// Every level at least halves the problem, so a 32-bit text never nests
/// deeper than this.
pub(crate) const MAX_DEPTH: u32 = 32;

const EMPTY: i32 = -1;

/// Constructs the suffix array of `text` into `sa[..text.len()]`.
///
/// `sa` may be longer than the text; the surplus is scratch space and its
/// contents are unspecified afterwards. When `freq` is given it receives the
/// symbol histogram of `text` and must hold at least `S::ALPHABET_SIZE`
/// entries.
///
/// # Example
///
/// ```rust
/// let mut sa = vec![0; 6];
/// sufsort::suffix_array(b"banana", &mut sa, None).unwrap();
/// assert_eq!(sa, vec![5, 3, 1, 0, 4, 2]);
/// ```
pub fn suffix_array<S: Symbol>(text: &[S], sa: &mut [i32], freq: Option<&mut [i32]>) -> Result<()> {
    check_lengths(text.len(), sa.len())?;
    if let Some(freq) = freq {
        count_frequencies(text, freq)?;
    }
    sais(text, sa, S::ALPHABET_SIZE, 0)
}

/// Constructs the suffix array of an integer string over `0..alphabet_size`.
///
/// The input is rewritten while the call runs: a declared alphabet larger
/// than the text is renamed to dense ranks so the buckets stay small. The
/// original symbols are back in place when the call returns.
pub fn suffix_array_int(text: &mut [i32], sa: &mut [i32], alphabet_size: i32) -> Result<()> {
    let n = text.len();
    check_lengths(n, sa.len())?;
    if alphabet_size <= 0 {
        return Err(SaisError::invalid(format!(
            "alphabet size must be positive, got {}",
            alphabet_size
        )));
    }
    if let Some(&c) = text.iter().find(|&&c| c < 0 || c >= alphabet_size) {
        return Err(SaisError::invalid(format!(
            "symbol {} outside alphabet 0..{}",
            c, alphabet_size
        )));
    }

    let k = alphabet_size as usize;
    if k <= n {
        return sais(&Ranks(&text[..]), sa, k, 0);
    }

    let mut used = Vec::new();
    used.try_reserve_exact(n)?;
    used.extend_from_slice(text);
    used.sort_unstable();
    used.dedup();
    log::trace!("renaming sparse alphabet of {} to {} symbols", k, used.len());

    for c in text.iter_mut() {
        // Every symbol is in `used` by construction.
        *c = used.binary_search(c).unwrap_or_default() as i32;
    }
    let result = sais(&Ranks(&text[..]), sa, used.len(), 0);
    for c in text.iter_mut() {
        *c = used[*c as usize];
    }
    result
}

/// Allocate and return the suffix array of `text`.
pub fn sais_table<S: Symbol>(text: &[S]) -> Result<Vec<i32>> {
    let mut sa = try_filled(text.len(), 0)?;
    suffix_array(text, &mut sa, None)?;
    Ok(sa)
}

pub(crate) fn check_lengths(n: usize, sa_len: usize) -> Result<()> {
    if n > MAX_LEN {
        return Err(SaisError::invalid(format!(
            "text of length {} exceeds the 32-bit index limit",
            n
        )));
    }
    if sa_len < n {
        return Err(SaisError::invalid(format!(
            "suffix array has {} slots, text has {} symbols",
            sa_len, n
        )));
    }
    Ok(())
}

/// Encapsulates iteration and indexing over text.
///
/// This gives one interface over symbol slices and over the `i32` rank
/// strings used both for integer input and for the reduced problem.
pub(crate) trait Text {
    fn len(&self) -> usize;

    fn char_at(&self, i: usize) -> usize;
}

impl<S: Symbol> Text for [S] {
    #[inline]
    fn len(&self) -> usize {
        <[S]>::len(self)
    }

    #[inline]
    fn char_at(&self, i: usize) -> usize {
        self[i].as_usize()
    }
}

pub(crate) struct Ranks<'s>(pub(crate) &'s [i32]);

impl Text for Ranks<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    fn char_at(&self, i: usize) -> usize {
        self.0[i] as usize
    }
}

/// S/L classification of every suffix. `true` marks S-type.
struct SuffixTypes {
    stype: Vec<bool>,
}

impl SuffixTypes {
    fn compute<T: Text + ?Sized>(text: &T) -> Result<SuffixTypes> {
        let n = text.len();
        // The last suffix is L-type: it is greater than the empty suffix.
        let mut stype = try_filled(n, false)?;
        let mut next = text.char_at(n - 1);
        for i in (0..n - 1).rev() {
            let c = text.char_at(i);
            stype[i] = c < next || (c == next && stype[i + 1]);
            next = c;
        }
        Ok(SuffixTypes { stype })
    }

    #[inline]
    fn is_s(&self, i: usize) -> bool {
        self.stype[i]
    }

    #[inline]
    fn is_l(&self, i: usize) -> bool {
        !self.stype[i]
    }

    #[inline]
    fn is_lms(&self, i: usize) -> bool {
        i > 0 && self.stype[i] && !self.stype[i - 1]
    }
}

/// Compare the LMS substrings starting at `a` and `b`, both LMS positions.
///
/// A substring that runs into the sentinel equals nothing else.
fn lms_substrings_equal<T: Text + ?Sized>(text: &T, types: &SuffixTypes, a: usize, b: usize) -> bool {
    let n = text.len();
    let mut d = 0;
    loop {
        let (i, j) = (a + d, b + d);
        if i == n || j == n {
            return false;
        }
        if text.char_at(i) != text.char_at(j) || types.is_s(i) != types.is_s(j) {
            return false;
        }
        // Types agree at i-1 and i, so both are LMS or neither is.
        if d > 0 && types.is_lms(i) {
            return true;
        }
        d += 1;
    }
}

/// Induce the order of L-type suffixes left to right, then of S-type
/// suffixes right to left, from whatever is already placed in `sa`.
fn induce<T: Text + ?Sized>(text: &T, types: &SuffixTypes, bins: &mut Buckets, sa: &mut [i32]) {
    let n = text.len();

    bins.find_head_pointers();
    // The sentinel sorts first and induces the last suffix.
    bins.head_insert(sa, (n - 1) as i32, text.char_at(n - 1));
    for i in 0..n {
        let sufi = sa[i];
        if sufi > 0 {
            let prev = sufi as usize - 1;
            if types.is_l(prev) {
                bins.head_insert(sa, prev as i32, text.char_at(prev));
            }
        }
    }

    bins.find_tail_pointers();
    for i in (0..n).rev() {
        let sufi = sa[i];
        if sufi > 0 {
            let prev = sufi as usize - 1;
            if types.is_s(prev) {
                bins.tail_insert(sa, prev as i32, text.char_at(prev));
            }
        }
    }
}

/// Recursive core. `sa[..text.len()]` receives the suffix array, anything
/// past it is free space.
pub(crate) fn sais<T: Text + ?Sized>(text: &T, sa: &mut [i32], k: usize, depth: u32) -> Result<()> {
    let n = text.len();
    debug_assert!(sa.len() >= n);
    debug_assert!(depth <= MAX_DEPTH, "SA-IS recursion too deep");
    match n {
        0 => return Ok(()),
        1 => {
            sa[0] = 0;
            return Ok(());
        }
        _ => {}
    }

    let (sa, free) = sa.split_at_mut(n);
    let types = SuffixTypes::compute(text)?;
    let mut bins = Buckets::new(k, free)?;
    bins.find_sizes((0..n).map(|i| text.char_at(i)));

    // Approximate sort: drop every LMS suffix at the end of its bucket and
    // induce. Afterwards the LMS substrings appear in sorted order.
    sa.fill(EMPTY);
    bins.find_tail_pointers();
    for i in 1..n {
        if types.is_lms(i) {
            bins.tail_insert(sa, i as i32, text.char_at(i));
        }
    }
    induce(text, &types, &mut bins, sa);

    // Move the sorted LMS suffixes to the head of `sa`.
    let mut m = 0;
    for i in 0..n {
        let sufi = sa[i];
        if sufi > 0 && types.is_lms(sufi as usize) {
            sa[m] = sufi;
            m += 1;
        }
    }
    if m == 0 {
        // Only the sentinel is LMS, so the induced order is already exact.
        log::debug!("sais depth={} n={} has no LMS suffixes", depth, n);
        return Ok(());
    }

    // Name each LMS substring by its rank among distinct substrings. LMS
    // positions are at least two apart, so `m + pos / 2` never collides.
    sa[m..].fill(EMPTY);
    let mut name = 0i32;
    let mut prev: Option<usize> = None;
    for r in 0..m {
        let cur = sa[r] as usize;
        if let Some(prev) = prev {
            if !lms_substrings_equal(text, &types, prev, cur) {
                name += 1;
            }
        }
        prev = Some(cur);
        sa[m + cur / 2] = name;
    }
    let names = name as usize + 1;
    log::debug!(
        "sais depth={} n={} lms={} distinct={}",
        depth,
        n,
        m,
        names
    );

    // Squeeze the names to the end of `sa`, keeping text order.
    let mut j = n;
    for i in (m..n).rev() {
        if sa[i] != EMPTY {
            j -= 1;
            sa[j] = sa[i];
        }
    }
    debug_assert_eq!(j, n - m);

    {
        let (head, reduced) = sa.split_at_mut(n - m);
        if names < m {
            sais(&Ranks(&reduced[..]), head, names, depth + 1)?;
        } else {
            // All names are distinct: the reduced string is its own inverse
            // suffix array.
            for (i, &r) in reduced.iter().enumerate() {
                head[r as usize] = i as i32;
            }
        }
    }

    // Translate reduced suffixes back to text positions.
    let mut j = n - m;
    for i in 1..n {
        if types.is_lms(i) {
            sa[j] = i as i32;
            j += 1;
        }
    }
    for r in 0..m {
        sa[r] = sa[n - m + sa[r] as usize];
    }
    sa[m..].fill(EMPTY);

    // Seed the buckets with exactly sorted LMS suffixes and induce again.
    // Going right to left, each suffix lands at or after its current slot.
    bins.find_tail_pointers();
    for r in (0..m).rev() {
        let sufi = sa[r];
        sa[r] = EMPTY;
        bins.tail_insert(sa, sufi, text.char_at(sufi as usize));
    }
    induce(text, &types, &mut bins, sa);
    Ok(())
}
