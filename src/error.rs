use std::collections::TryReserveError;

/// Errors returned by every construction in this crate.
///
/// There are only two ways for a call to fail: the caller handed us buffers
/// or parameters that do not fit together, or we could not get the scratch
/// memory needed for the recursive step.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SaisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to allocate working memory")]
    AllocationFailure,
}

impl SaisError {
    /// The signed status code used at a C-style call boundary.
    pub fn code(&self) -> i32 {
        match self {
            SaisError::InvalidInput(_) => -1,
            SaisError::AllocationFailure => -2,
        }
    }

    pub(crate) fn invalid<M: Into<String>>(msg: M) -> Self {
        SaisError::InvalidInput(msg.into())
    }
}

impl From<TryReserveError> for SaisError {
    fn from(_: TryReserveError) -> Self {
        SaisError::AllocationFailure
    }
}

pub type Result<T> = std::result::Result<T, SaisError>;

/// Allocate a zero-filled vector, reporting failure instead of aborting.
pub(crate) fn try_zeroed(len: usize) -> Result<Vec<i32>> {
    try_filled(len, 0)
}

pub(crate) fn try_filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)?;
    v.resize(len, value);
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_negative_and_distinct() {
        let invalid = SaisError::invalid("n too large");
        let alloc = SaisError::AllocationFailure;
        assert!(invalid.code() < 0);
        assert!(alloc.code() < 0);
        assert_ne!(invalid.code(), alloc.code());
    }

    #[test]
    fn display_carries_message() {
        let err = SaisError::invalid("suffix array is shorter than text");
        assert_eq!(
            err.to_string(),
            "invalid input: suffix array is shorter than text"
        );
    }

    #[test]
    fn oversized_reservation_is_allocation_failure() {
        let err = try_filled::<u64>(usize::MAX / 2, 0).unwrap_err();
        assert_eq!(err, SaisError::AllocationFailure);
    }
}
