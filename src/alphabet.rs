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
use std::ops::{Deref, DerefMut};

use crate::error::{try_zeroed, Result, SaisError};

mod private {
    pub trait Sealed {}

    impl Sealed for u8 {}
    impl Sealed for u16 {}
}

/// A fixed-width symbol with a dense alphabet `0..ALPHABET_SIZE`.
///
/// Implemented for bytes and 16-bit code units. Larger alphabets go through
/// [`suffix_array_int`](crate::suffix_array_int) with an explicit size.
pub trait Symbol: Copy + Ord + Send + Sync + std::fmt::Debug + private::Sealed + 'static {
    const ALPHABET_SIZE: usize;

    fn as_usize(self) -> usize;

    /// Narrowing conversion. Callers only pass values produced by `as_usize`.
    fn from_usize(v: usize) -> Self;
}

impl Symbol for u8 {
    const ALPHABET_SIZE: usize = 1 << 8;

    #[inline]
    fn as_usize(self) -> usize {
        self as usize
    }

    #[inline]
    fn from_usize(v: usize) -> Self {
        v as u8
    }
}

impl Symbol for u16 {
    const ALPHABET_SIZE: usize = 1 << 16;

    #[inline]
    fn as_usize(self) -> usize {
        self as usize
    }

    #[inline]
    fn from_usize(v: usize) -> Self {
        v as u16
    }
}

/// Tally every symbol of `text` into `freq[0..S::ALPHABET_SIZE)`.
///
/// Entries past the alphabet are left untouched.
pub fn count_frequencies<S: Symbol>(text: &[S], freq: &mut [i32]) -> Result<()> {
    check_frequency_table(freq.len(), S::ALPHABET_SIZE)?;
    let freq = &mut freq[..S::ALPHABET_SIZE];
    freq.fill(0);
    for &c in text {
        freq[c.as_usize()] += 1;
    }
    Ok(())
}

/// Turn a frequency table into bucket boundaries.
///
/// `starts[c]` is the exclusive prefix sum of `counts` and `ends[c]` the
/// inclusive one, so bucket `c` covers `starts[c]..ends[c]`.
pub fn bucket_bounds(counts: &[i32], starts: &mut [i32], ends: &mut [i32]) -> Result<()> {
    if starts.len() < counts.len() || ends.len() < counts.len() {
        return Err(SaisError::invalid(
            "bucket arrays are shorter than the frequency table",
        ));
    }
    let mut sum = 0i32;
    for (c, &count) in counts.iter().enumerate() {
        if count < 0 {
            return Err(SaisError::invalid("negative symbol count"));
        }
        starts[c] = sum;
        sum = sum
            .checked_add(count)
            .ok_or_else(|| SaisError::invalid("symbol counts overflow"))?;
        ends[c] = sum;
    }
    Ok(())
}

pub(crate) fn check_frequency_table(len: usize, alphabet_size: usize) -> Result<()> {
    if len < alphabet_size {
        return Err(SaisError::invalid(format!(
            "frequency table has {} entries, alphabet needs {}",
            len, alphabet_size
        )));
    }
    Ok(())
}

enum Storage<'a> {
    Borrowed(&'a mut [i32]),
    Owned(Vec<i32>),
}

impl Deref for Storage<'_> {
    type Target = [i32];

    fn deref(&self) -> &[i32] {
        match self {
            Storage::Borrowed(s) => s,
            Storage::Owned(v) => v,
        }
    }
}

impl DerefMut for Storage<'_> {
    fn deref_mut(&mut self) -> &mut [i32] {
        match self {
            Storage::Borrowed(s) => s,
            Storage::Owned(v) => v,
        }
    }
}

/// Bucket sizes and insertion pointers for induced sorting.
///
/// Both arrays share one region of `2 * k` integers: the first half holds
/// the symbol counts, the second the moving pointers. Tail pointers are
/// exclusive, so a tail insert decrements before writing.
pub(crate) struct Buckets<'a> {
    k: usize,
    store: Storage<'a>,
}

impl<'a> Buckets<'a> {
    /// Lay the buckets out in `free` when it is large enough, else allocate.
    pub(crate) fn new(k: usize, free: &'a mut [i32]) -> Result<Self> {
        let store = if free.len() >= 2 * k {
            log::trace!("bucket storage for k={} borrowed from free space", k);
            Storage::Borrowed(&mut free[..2 * k])
        } else {
            log::trace!("bucket storage for k={} allocated", k);
            Storage::Owned(try_zeroed(2 * k)?)
        };
        Ok(Buckets { k, store })
    }

    pub(crate) fn find_sizes<I>(&mut self, chars: I)
    where
        I: Iterator<Item = usize>,
    {
        let sizes = &mut self.store[..self.k];
        sizes.fill(0);
        for c in chars {
            sizes[c] += 1;
        }
    }

    #[cfg(test)]
    fn sizes(&self) -> &[i32] {
        &self.store[..self.k]
    }

    pub(crate) fn find_head_pointers(&mut self) {
        let (sizes, ptrs) = self.store.split_at_mut(self.k);
        let mut sum = 0;
        for (ptr, &size) in ptrs.iter_mut().zip(sizes.iter()) {
            *ptr = sum;
            sum += size;
        }
    }

    pub(crate) fn find_tail_pointers(&mut self) {
        let (sizes, ptrs) = self.store.split_at_mut(self.k);
        let mut sum = 0;
        for (ptr, &size) in ptrs.iter_mut().zip(sizes.iter()) {
            sum += size;
            *ptr = sum;
        }
    }

    #[inline]
    pub(crate) fn head_insert(&mut self, sa: &mut [i32], i: i32, c: usize) {
        let ptr = &mut self.store[self.k + c];
        sa[*ptr as usize] = i;
        *ptr += 1;
    }

    #[inline]
    pub(crate) fn tail_insert(&mut self, sa: &mut [i32], i: i32, c: usize) {
        let ptr = &mut self.store[self.k + c];
        *ptr -= 1;
        sa[*ptr as usize] = i;
    }

    /// Next free head slot of bucket `c`, or `None` once it holds `sizes[c]`
    /// entries.
    #[inline]
    pub(crate) fn take_head(&mut self, c: usize) -> Option<i32> {
        let size = self.store[c];
        if size == 0 {
            return None;
        }
        self.store[c] = size - 1;
        let ptr = &mut self.store[self.k + c];
        let slot = *ptr;
        *ptr += 1;
        Some(slot)
    }

    pub(crate) fn load_sizes(&mut self, counts: &[i32]) {
        self.store[..self.k].copy_from_slice(&counts[..self.k]);
    }
}
