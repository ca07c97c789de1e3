//! Inverse Burrows-Wheeler transform.
//!
//! Conceptually the transform has `n + 1` rows: row 0 is the terminator
//! suffix and row `r + 1` is suffix `SA[r]`. Row 0 is preceded by the last
//! symbol, stored at the primary index, and the terminator itself precedes
//! row `primary + 1`. From the bucket starts we build the successor of every
//! row in text order and walk it from suffix 0.

use crate::alphabet::{check_frequency_table, Buckets, Symbol};
use crate::error::{try_filled, try_zeroed, Result, SaisError};
use crate::sais::MAX_LEN;

/// Rebuild the text whose transform is `bwt` with primary index `primary`.
///
/// `scratch` must hold at least `bwt.len() + 1` integers; the remainder is
/// free space for the bucket arrays. `freq`, when given, is the histogram
/// returned by the forward transform and saves one pass over the input. A
/// histogram that disagrees with `bwt` is rejected.
pub fn unbwt<S: Symbol>(
    bwt: &[S],
    out: &mut [S],
    primary: usize,
    scratch: Option<&mut [i32]>,
    freq: Option<&[i32]>,
) -> Result<()> {
    if out.len() != bwt.len() {
        return Err(SaisError::invalid(format!(
            "output has {} symbols, bwt has {}",
            out.len(),
            bwt.len()
        )));
    }
    let mut owned = Vec::new();
    let scratch = scratch_or_owned(scratch, bwt.len(), &mut owned)?;
    successors(bwt, primary, scratch, freq)?;
    walk(bwt, out, primary, scratch)
}

/// Like [`unbwt`], but replaces `buf` with the original text.
///
/// The walk reads the transform at random while writing the text in order,
/// so the transformed symbols are copied aside first.
pub fn unbwt_in_place<S: Symbol>(
    buf: &mut [S],
    primary: usize,
    scratch: Option<&mut [i32]>,
    freq: Option<&[i32]>,
) -> Result<()> {
    let mut bwt = try_filled(buf.len(), S::from_usize(0))?;
    bwt.copy_from_slice(buf);
    unbwt(&bwt, buf, primary, scratch, freq)
}

fn scratch_or_owned<'a>(
    scratch: Option<&'a mut [i32]>,
    n: usize,
    owned: &'a mut Vec<i32>,
) -> Result<&'a mut [i32]> {
    if n >= MAX_LEN {
        return Err(SaisError::invalid(format!(
            "bwt of length {} exceeds the 32-bit index limit",
            n
        )));
    }
    match scratch {
        Some(s) if s.len() < n + 1 => Err(SaisError::invalid(format!(
            "scratch array has {} slots, inversion needs {}",
            s.len(),
            n + 1
        ))),
        Some(s) => Ok(s),
        None => {
            *owned = try_zeroed(n + 1)?;
            Ok(owned.as_mut_slice())
        }
    }
}

/// Fill `scratch[..=n]` with the row successor map.
fn successors<S: Symbol>(
    bwt: &[S],
    primary: usize,
    scratch: &mut [i32],
    freq: Option<&[i32]>,
) -> Result<()> {
    let n = bwt.len();
    if n == 0 {
        return if primary == 0 {
            Ok(())
        } else {
            Err(SaisError::invalid("primary index of an empty bwt must be 0"))
        };
    }
    if primary >= n {
        return Err(SaisError::invalid(format!(
            "primary index {} out of range for length {}",
            primary, n
        )));
    }

    let (next, free) = scratch.split_at_mut(n + 1);
    let mut bins = Buckets::new(S::ALPHABET_SIZE, free)?;
    match freq {
        Some(freq) => {
            check_frequency_table(freq.len(), S::ALPHABET_SIZE)?;
            let freq = &freq[..S::ALPHABET_SIZE];
            let mut total = 0i64;
            for &count in freq {
                if count < 0 {
                    return Err(SaisError::invalid("negative symbol count"));
                }
                total += count as i64;
            }
            if total != n as i64 {
                return Err(SaisError::invalid(format!(
                    "frequency table sums to {}, bwt has {} symbols",
                    total, n
                )));
            }
            bins.load_sizes(freq);
        }
        None => bins.find_sizes(bwt.iter().map(|c| c.as_usize())),
    }

    bins.find_head_pointers();
    for row in 0..=n {
        if row == primary + 1 {
            // The terminator precedes suffix 0, so row 0 continues here.
            next[0] = row as i32;
            continue;
        }
        let slot = bins
            .take_head(preceding(bwt, primary, row).as_usize())
            .ok_or_else(|| SaisError::invalid("frequency table does not match bwt"))?;
        next[slot as usize + 1] = row as i32;
    }
    Ok(())
}

/// The symbol in front of the suffix at `row`. Undefined for `primary + 1`,
/// whose predecessor is the terminator.
#[inline]
fn preceding<S: Symbol>(bwt: &[S], primary: usize, row: usize) -> S {
    if row == 0 {
        bwt[primary]
    } else {
        bwt[row - 1]
    }
}

/// Follow the successor map from suffix 0. A row starts with the symbol
/// that precedes its successor, so each step reads exactly one symbol.
fn walk<S: Symbol>(bwt: &[S], out: &mut [S], primary: usize, next: &[i32]) -> Result<()> {
    let mut row = primary + 1;
    for o in out.iter_mut() {
        if row == 0 {
            return Err(SaisError::invalid("bwt does not describe a single rotation cycle"));
        }
        let succ = next[row] as usize;
        *o = preceding(bwt, primary, succ);
        row = succ;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bwt::bwt;

    fn transform(text: &[u8]) -> (Vec<u8>, usize) {
        let mut out = vec![0u8; text.len()];
        let primary = bwt(text, &mut out, None, None).unwrap();
        (out, primary)
    }

    #[test]
    fn banana() {
        let mut out = vec![0u8; 6];
        unbwt(b"nnbaaa", &mut out, 3, None, None).unwrap();
        assert_eq!(out, b"banana");
    }

    #[test]
    fn with_frequency_table() {
        let mut freq = vec![0; 256];
        freq[b'a' as usize] = 3;
        freq[b'b' as usize] = 1;
        freq[b'n' as usize] = 2;
        let mut out = vec![0u8; 6];
        unbwt(b"nnbaaa", &mut out, 3, None, Some(&freq[..])).unwrap();
        assert_eq!(out, b"banana");
    }

    #[test]
    fn in_place() {
        let text = b"she sells sea shells by the sea shore";
        let (mut buf, primary) = transform(text);
        let mut scratch = vec![0; text.len() + 1 + 512];
        unbwt_in_place(&mut buf, primary, Some(&mut scratch[..]), None).unwrap();
        assert_eq!(&buf[..], &text[..]);
    }

    #[test]
    fn empty() {
        let mut out: Vec<u8> = vec![];
        unbwt::<u8>(&[], &mut out, 0, None, None).unwrap();
        assert!(unbwt::<u8>(&[], &mut out, 1, None, None).is_err());
    }

    #[test]
    fn primary_out_of_range() {
        let mut out = vec![0u8; 6];
        assert!(matches!(
            unbwt(b"nnbaaa", &mut out, 6, None, None),
            Err(SaisError::InvalidInput(_))
        ));
    }

    #[test]
    fn mismatched_frequency_table() {
        let mut freq = vec![0; 256];
        freq[b'a' as usize] = 2;
        freq[b'b' as usize] = 2;
        freq[b'n' as usize] = 2;
        let mut out = vec![0u8; 6];
        assert!(unbwt(b"nnbaaa", &mut out, 3, None, Some(&freq[..])).is_err());

        freq[b'b' as usize] = 1;
        assert!(unbwt(b"nnbaaa", &mut out, 3, None, Some(&freq[..])).is_err());
    }

    #[test]
    fn short_scratch() {
        let mut out = vec![0u8; 6];
        let mut scratch = vec![0; 6];
        assert!(unbwt(b"nnbaaa", &mut out, 3, Some(&mut scratch[..]), None).is_err());
    }

    #[test]
    fn wide_symbols() {
        let text: Vec<u16> = vec![500, 3, 65535, 3, 500, 3, 0];
        let mut t = vec![0u16; text.len()];
        let primary = bwt(&text, &mut t, None, None).unwrap();
        let mut out = vec![0u16; text.len()];
        unbwt(&t, &mut out, primary, None, None).unwrap();
        assert_eq!(out, text);
    }

    #[test]
    fn wide_in_place_with_frequency_table() {
        let text: Vec<u16> = (0..5000u32).map(|i| ((i * 7919) % 4099) as u16).collect();
        let mut buf = vec![0u16; text.len()];
        let mut freq = vec![0; 1 << 16];
        let primary = bwt(&text, &mut buf, None, Some(&mut freq[..])).unwrap();
        unbwt_in_place(&mut buf, primary, None, Some(&freq[..])).unwrap();
        assert_eq!(buf, text);
    }
}
