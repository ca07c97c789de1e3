//! Longest common prefix arrays.
//!
//! `plcp[p]` is the LCP of suffix `p` with the suffix ranked right before it,
//! `lcp[r]` is the same value indexed by rank. The suffix ranked first has
//! no predecessor and gets 0.

use crate::alphabet::Symbol;
use crate::error::{Result, SaisError};
use crate::sais::check_lengths;

const FIRST: i32 = -1;
const UNSEEN: i32 = -2;

/// Constructs the permuted LCP array of `text` from its suffix array.
///
/// The predecessor of every suffix is staged in `plcp` itself before the
/// lengths are computed, walking the text left to right so each comparison
/// resumes one short of the previous length.
pub fn plcp<S: Symbol>(text: &[S], sa: &[i32], plcp: &mut [i32]) -> Result<()> {
    let n = text.len();
    check_lengths(n, sa.len())?;
    if sa.len() != n || plcp.len() != n {
        return Err(SaisError::invalid(format!(
            "text, suffix array and plcp lengths differ ({}, {}, {})",
            n,
            sa.len(),
            plcp.len()
        )));
    }

    plcp.fill(UNSEEN);
    let mut prev = FIRST;
    for &sufi in sa {
        if sufi < 0 || sufi as usize >= n {
            return Err(SaisError::invalid(format!(
                "suffix array entry {} out of range",
                sufi
            )));
        }
        plcp[sufi as usize] = prev;
        prev = sufi;
    }

    let mut l = 0usize;
    for i in 0..n {
        let j = match plcp[i] {
            FIRST => {
                plcp[i] = 0;
                l = 0;
                continue;
            }
            UNSEEN => {
                return Err(SaisError::invalid("suffix array is not a permutation"));
            }
            j => j as usize,
        };
        while i + l < n && j + l < n && text[i + l] == text[j + l] {
            l += 1;
        }
        plcp[i] = l as i32;
        l = l.saturating_sub(1);
    }
    Ok(())
}

/// Permute `plcp` into rank order: `lcp[r] = plcp[sa[r]]`.
pub fn lcp(plcp: &[i32], sa: &[i32], lcp: &mut [i32]) -> Result<()> {
    check_gather_lengths(plcp.len(), sa.len(), lcp.len())?;
    for (out, &sufi) in lcp.iter_mut().zip(sa.iter()) {
        *out = plcp[checked_index(sufi, plcp.len())?];
    }
    Ok(())
}

/// Like [`lcp`], writing over the suffix array it reads.
///
/// Rank `r` reads `sa[r]` exactly once before replacing it, so processing in
/// rank order never reads an overwritten slot. The suffix array is checked
/// up front and left intact if it fails.
pub fn lcp_in_place(plcp: &[i32], sa: &mut [i32]) -> Result<()> {
    check_gather_lengths(plcp.len(), sa.len(), sa.len())?;
    for &sufi in sa.iter() {
        checked_index(sufi, plcp.len())?;
    }
    for slot in sa.iter_mut() {
        *slot = plcp[*slot as usize];
    }
    Ok(())
}

fn check_gather_lengths(plcp: usize, sa: usize, lcp: usize) -> Result<()> {
    if plcp != sa || plcp != lcp {
        return Err(SaisError::invalid(format!(
            "plcp, suffix array and lcp lengths differ ({}, {}, {})",
            plcp, sa, lcp
        )));
    }
    Ok(())
}

#[inline]
pub(crate) fn checked_index(sufi: i32, n: usize) -> Result<usize> {
    if sufi < 0 || sufi as usize >= n {
        return Err(SaisError::invalid(format!(
            "suffix array entry {} out of range",
            sufi
        )));
    }
    Ok(sufi as usize)
}
