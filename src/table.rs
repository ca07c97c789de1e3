use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::alphabet::Symbol;
use crate::bwt::Bwt;
use crate::error::{try_zeroed, Result};
use crate::lcp::{lcp_in_place, plcp};
use crate::sais::{check_lengths, suffix_array};

/// A suffix table is a sequence of lexicographically sorted suffixes,
/// stored as starting offsets into the text it owns.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SuffixTable<S = u8> {
    text: Box<[S]>,
    table: Box<[i32]>,
}

impl<S: Symbol> SuffixTable<S> {
    /// Creates a new suffix table for `text` in `O(n)` time and space by
    /// induced sorting.
    pub fn new<T>(src: T) -> Result<Self>
    where
        T: Into<Box<[S]>>,
    {
        let text = src.into();
        let mut table = try_zeroed(text.len())?;
        suffix_array(&text, &mut table, None)?;
        Ok(SuffixTable {
            text,
            table: table.into(),
        })
    }

    /// Creates a new suffix table for `text` by comparison sort in
    /// `O(n^2 log n)` worst case time.
    ///
    /// This is the reference model the linear construction is tested
    /// against. Rayon falls back to a sequential sort for small inputs.
    pub fn new_naive<T>(src: T) -> Result<Self>
    where
        T: Into<Box<[S]>>,
    {
        let text = src.into();
        check_lengths(text.len(), text.len())?;
        let mut table: Vec<i32> = (0..text.len() as i32).collect();
        table.par_sort_unstable_by(|&a, &b| text[a as usize..].cmp(&text[b as usize..]));
        Ok(SuffixTable {
            text,
            table: table.into(),
        })
    }

    pub fn from_parts(text: Box<[S]>, table: Box<[i32]>) -> Self {
        SuffixTable { text, table }
    }

    /// Consumes the suffix table and returns the underlying text and table.
    pub fn into_parts(self) -> (Box<[S]>, Box<[i32]>) {
        (self.text, self.table)
    }

    #[inline]
    pub fn text(&self) -> &[S] {
        &self.text
    }

    #[inline]
    pub fn table(&self) -> &[i32] {
        &self.table
    }

    /// Returns the number of suffixes in the table.
    ///
    /// Alternatively, this is the number of symbols in the text.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` iff `self.len() == 0`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the suffix at rank `i`.
    #[inline]
    pub fn suffix(&self, i: usize) -> &[S] {
        &self.text[self.table[i] as usize..]
    }

    /// Checks if the suffix table is lexicographically sorted. This is always
    /// true for valid suffix tables.
    pub fn is_sorted(&self) -> bool {
        self.table
            .par_windows(2)
            .all(|pair| self.text[pair[0] as usize..] <= self.text[pair[1] as usize..])
    }

    /// The LCP of every suffix with the one ranked before it.
    pub fn lcp(&self) -> Result<Vec<i32>> {
        let mut permuted = try_zeroed(self.len())?;
        plcp(&self.text, &self.table, &mut permuted)?;
        let mut lcp = self.table.to_vec();
        lcp_in_place(&permuted, &mut lcp)?;
        Ok(lcp)
    }

    /// The Burrows-Wheeler transform read off this table.
    pub fn bwt(&self) -> Result<Bwt<S>> {
        Bwt::from_suffix_array(&self.text, &self.table)
    }
}

impl SuffixTable<u16> {
    /// Build a table over the UTF-16 code units of `s`.
    pub fn from_utf16(s: &str) -> Result<Self> {
        SuffixTable::new(s.encode_utf16().collect::<Vec<_>>())
    }
}

impl<S: Symbol> fmt::Debug for SuffixTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "\n-----------------------------------------")?;
        writeln!(f, "SUFFIX TABLE")?;
        for (rank, &sufstart) in self.table.iter().enumerate() {
            writeln!(f, "suffix[{}] {}", rank, sufstart,)?;
        }
        writeln!(f, "-----------------------------------------")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SaisError;
    use utf16_literal::utf16;

    fn sais(text: &str) -> SuffixTable<u16> {
        SuffixTable::from_utf16(text).unwrap()
    }

    #[test]
    fn naive_agrees_on_banana() {
        let sa = SuffixTable::<u8>::new(b"banana".to_vec()).unwrap();
        assert_eq!(sa, SuffixTable::new_naive(b"banana".to_vec()).unwrap());
        assert_eq!(sa.table(), &[5, 3, 1, 0, 4, 2]);
        assert!(sa.is_sorted());
    }

    #[test]
    fn suffix_by_rank() {
        let sa = sais("aaab");
        assert_eq!(sa.suffix(0), utf16!("aaab"));
        assert_eq!(sa.suffix(3), utf16!("b"));
    }

    #[test]
    fn lcp_of_wide_text() {
        let sa = sais("abab");
        // ab, abab, b, bab
        assert_eq!(sa.lcp().unwrap(), vec![0, 2, 0, 1]);
    }

    #[test]
    fn bwt_agrees_with_direct_transform() {
        let text: Vec<u8> = b"the rain in spain stays mainly in the plain".to_vec();
        let table = SuffixTable::<u8>::new(text.clone()).unwrap();
        let via_table = table.bwt().unwrap();
        assert_eq!(via_table, Bwt::new(&text).unwrap());
        assert_eq!(via_table.invert().unwrap(), text);
    }

    #[test]
    fn unsorted_table_is_detected() {
        let table = SuffixTable::<u8>::from_parts(b"ba".to_vec().into(), vec![0, 1].into());
        assert!(!table.is_sorted());
    }

    #[test]
    fn mismatched_parts_are_invalid() {
        let table = SuffixTable::<u8>::from_parts(b"ab".to_vec().into(), vec![0, 7].into());
        assert!(matches!(table.bwt(), Err(SaisError::InvalidInput(_))));
        assert!(table.lcp().is_err());

        let table = SuffixTable::<u8>::from_parts(Vec::new().into(), vec![0].into());
        assert!(table.bwt().is_err());
    }

    #[test]
    fn empty_table() {
        let sa = sais("");
        assert!(sa.is_empty());
        assert!(sa.lcp().unwrap().is_empty());
        assert_eq!(sa.bwt().unwrap().primary(), 0);
    }
}
