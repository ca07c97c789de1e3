//! Burrows-Wheeler transform built from the suffix array.
//!
//! Rank `j` of the output holds the symbol cyclically preceding suffix
//! `SA[j]`, so the output is always exactly as long as the input. The rank
//! of suffix 0 is returned as the primary index: its slot holds the last
//! symbol of the text, which is where the implicit terminator would sit in
//! the textbook transform.

use serde::{Deserialize, Serialize};

use crate::alphabet::{check_frequency_table, Symbol};
use crate::error::{try_filled, try_zeroed, Result, SaisError};
use crate::lcp::checked_index;
use crate::sais::suffix_array;
use crate::unbwt::unbwt;

/// Write the BWT of `text` into `out` and return the primary index.
///
/// `scratch` must hold at least `text.len()` integers. Anything beyond that
/// is handed to the suffix sorter as free space. Without `scratch` a buffer
/// is allocated for the duration of the call. When `freq` is given it is
/// filled with the symbol histogram while the output is derived.
///
/// # Example
///
/// ```rust
/// let mut out = [0u8; 6];
/// let primary = sufsort::bwt(b"banana", &mut out, None, None).unwrap();
/// assert_eq!(&out, b"nnbaaa");
/// assert_eq!(primary, 3);
/// ```
pub fn bwt<S: Symbol>(
    text: &[S],
    out: &mut [S],
    scratch: Option<&mut [i32]>,
    freq: Option<&mut [i32]>,
) -> Result<usize> {
    if out.len() != text.len() {
        return Err(SaisError::invalid(format!(
            "output has {} symbols, text has {}",
            out.len(),
            text.len()
        )));
    }
    let n = text.len();
    let mut owned = Vec::new();
    let sa = scratch_or_owned(scratch, n, &mut owned)?;
    let primary = transform(text, sa, freq)?;
    for (o, &c) in out.iter_mut().zip(sa[..n].iter()) {
        *o = S::from_usize(c as usize);
    }
    Ok(primary)
}

/// Like [`bwt`], but replaces `buf` with its own transform.
///
/// Every symbol is read into `scratch` before `buf` is overwritten.
pub fn bwt_in_place<S: Symbol>(
    buf: &mut [S],
    scratch: Option<&mut [i32]>,
    freq: Option<&mut [i32]>,
) -> Result<usize> {
    let n = buf.len();
    let mut owned = Vec::new();
    let sa = scratch_or_owned(scratch, n, &mut owned)?;
    let primary = transform(buf, sa, freq)?;
    for (o, &c) in buf.iter_mut().zip(sa[..n].iter()) {
        *o = S::from_usize(c as usize);
    }
    Ok(primary)
}

fn scratch_or_owned<'a>(
    scratch: Option<&'a mut [i32]>,
    n: usize,
    owned: &'a mut Vec<i32>,
) -> Result<&'a mut [i32]> {
    match scratch {
        Some(s) if s.len() < n => Err(SaisError::invalid(format!(
            "scratch array has {} slots, text has {} symbols",
            s.len(),
            n
        ))),
        Some(s) => Ok(s),
        None => {
            log::trace!("allocating {} scratch slots for bwt", n);
            *owned = try_zeroed(n)?;
            Ok(owned.as_mut_slice())
        }
    }
}

/// Sort the suffixes into `sa`, then overwrite each rank with the symbol
/// preceding its suffix. Returns the rank of suffix 0.
fn transform<S: Symbol>(text: &[S], sa: &mut [i32], freq: Option<&mut [i32]>) -> Result<usize> {
    let n = text.len();
    let mut freq = match freq {
        Some(f) => {
            check_frequency_table(f.len(), S::ALPHABET_SIZE)?;
            let f = &mut f[..S::ALPHABET_SIZE];
            f.fill(0);
            Some(f)
        }
        None => None,
    };

    suffix_array(text, sa, None)?;

    let mut primary = 0;
    for (rank, slot) in sa[..n].iter_mut().enumerate() {
        let sufi = *slot as usize;
        if sufi == 0 {
            primary = rank;
        }
        let c = preceding(text, sufi).as_usize();
        if let Some(freq) = freq.as_deref_mut() {
            freq[c] += 1;
        }
        *slot = c as i32;
    }
    Ok(primary)
}

/// The symbol cyclically before position `sufi`.
#[inline]
fn preceding<S: Symbol>(text: &[S], sufi: usize) -> S {
    if sufi == 0 {
        text[text.len() - 1]
    } else {
        text[sufi - 1]
    }
}

/// An owned transform: the permuted text, its primary index and the symbol
/// histogram needed to invert it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Bwt<S = u8> {
    data: Box<[S]>,
    primary: usize,
    freq: Box<[i32]>,
}

impl<S: Symbol> Bwt<S> {
    /// Transform `text`.
    pub fn new(text: &[S]) -> Result<Self> {
        let mut data = try_filled(text.len(), S::from_usize(0))?;
        let mut freq = try_zeroed(S::ALPHABET_SIZE)?;
        let primary = bwt(text, &mut data, None, Some(&mut freq[..]))?;
        Ok(Bwt {
            data: data.into(),
            primary,
            freq: freq.into(),
        })
    }

    /// Derive the transform from an already sorted suffix array.
    ///
    /// The table may come from `from_parts` or deserialization, so its
    /// length and every entry are checked before the text is indexed.
    pub(crate) fn from_suffix_array(text: &[S], table: &[i32]) -> Result<Self> {
        let n = text.len();
        if table.len() != n {
            return Err(SaisError::invalid(format!(
                "suffix array has {} entries, text has {} symbols",
                table.len(),
                n
            )));
        }
        let mut data = try_filled(n, S::from_usize(0))?;
        let mut freq = try_zeroed(S::ALPHABET_SIZE)?;
        let mut primary = 0;
        for (rank, (o, &sufi)) in data.iter_mut().zip(table.iter()).enumerate() {
            let sufi = checked_index(sufi, n)?;
            if sufi == 0 {
                primary = rank;
            }
            *o = preceding(text, sufi);
            freq[o.as_usize()] += 1;
        }
        Ok(Bwt {
            data: data.into(),
            primary,
            freq: freq.into(),
        })
    }

    pub fn from_parts(data: Box<[S]>, primary: usize, freq: Box<[i32]>) -> Self {
        Bwt {
            data,
            primary,
            freq,
        }
    }

    pub fn into_parts(self) -> (Box<[S]>, usize, Box<[i32]>) {
        (self.data, self.primary, self.freq)
    }

    pub fn data(&self) -> &[S] {
        &self.data
    }

    pub fn primary(&self) -> usize {
        self.primary
    }

    pub fn frequencies(&self) -> &[i32] {
        &self.freq
    }

    /// Recover the original text.
    pub fn invert(&self) -> Result<Vec<S>> {
        let mut out = try_filled(self.data.len(), S::from_usize(0))?;
        unbwt(&self.data, &mut out, self.primary, None, Some(&self.freq[..]))?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sais::sais_table;

    #[test]
    fn banana() {
        let mut out = vec![0u8; 6];
        let mut freq = vec![0; 256];
        let primary = bwt(b"banana", &mut out, None, Some(&mut freq[..])).unwrap();
        assert_eq!(out, b"nnbaaa");
        assert_eq!(primary, 3);
        assert_eq!(freq[b'a' as usize], 3);
        assert_eq!(freq[b'n' as usize], 2);
    }

    #[test]
    fn primary_is_rank_of_first_suffix() {
        let text = b"mississippi";
        let sa = sais_table(text).unwrap();
        let mut out = vec![0u8; text.len()];
        let primary = bwt(text, &mut out, None, None).unwrap();
        assert_eq!(sa[primary], 0);
    }

    #[test]
    fn empty_input() {
        let mut out: Vec<u8> = vec![];
        assert_eq!(bwt::<u8>(&[], &mut out, None, None).unwrap(), 0);
    }

    #[test]
    fn single_symbol() {
        let mut out = vec![0u16];
        assert_eq!(bwt(&[9u16], &mut out, None, None).unwrap(), 0);
        assert_eq!(out, vec![9]);
    }

    #[test]
    fn in_place_matches_out_of_place() {
        let text = b"abracadabra abracadabra".to_vec();
        let mut out = vec![0u8; text.len()];
        let expected = bwt(&text, &mut out, None, None).unwrap();

        let mut buf = text.clone();
        let mut scratch = vec![0; text.len() + 600];
        let primary = bwt_in_place(&mut buf, Some(&mut scratch[..]), None).unwrap();
        assert_eq!(primary, expected);
        assert_eq!(buf, out);
    }

    #[test]
    fn mismatched_lengths_are_invalid() {
        let mut out = vec![0u8; 3];
        assert!(matches!(
            bwt(b"banana", &mut out, None, None),
            Err(SaisError::InvalidInput(_))
        ));
        let mut out = vec![0u8; 6];
        let mut scratch = vec![0; 5];
        assert!(bwt(b"banana", &mut out, Some(&mut scratch[..]), None).is_err());
    }

    #[test]
    fn owned_transform_inverts() {
        let text: Vec<u16> = "ünïcödé text".encode_utf16().collect();
        let t = Bwt::new(&text).unwrap();
        assert_eq!(t.frequencies().iter().sum::<i32>(), text.len() as i32);
        assert_eq!(t.invert().unwrap(), text);
    }

    #[test]
    fn from_suffix_array_agrees_with_new() {
        let text = b"to be or not to be";
        let sa = sais_table(text).unwrap();
        assert_eq!(Bwt::from_suffix_array(text, &sa).unwrap(), Bwt::new(text).unwrap());
    }

    #[test]
    fn table_that_disagrees_with_text_is_invalid() {
        assert!(matches!(
            Bwt::from_suffix_array(b"ab", &[0, 7]),
            Err(SaisError::InvalidInput(_))
        ));
        assert!(Bwt::from_suffix_array(b"a", &[-1]).is_err());
        assert!(Bwt::<u8>::from_suffix_array(&[], &[0]).is_err());
        assert!(Bwt::from_suffix_array(b"abc", &[0, 1]).is_err());
    }
}
