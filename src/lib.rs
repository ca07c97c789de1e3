//! Suffix arrays, Burrows-Wheeler transforms and LCP arrays in linear time
//! by induced sorting.
//!
//! Every construction writes into caller-owned buffers and reports failure
//! through [`SaisError`]. The owned [`SuffixTable`] and [`Bwt`] types wrap
//! the same routines for callers who would rather not manage buffers.
//!
//! ```rust
//! use sufsort::{Bwt, SuffixTable};
//!
//! let table = SuffixTable::<u8>::new(b"banana".to_vec()).unwrap();
//! assert_eq!(table.table(), &[5, 3, 1, 0, 4, 2]);
//!
//! let transformed = Bwt::new(b"banana").unwrap();
//! assert_eq!(transformed.invert().unwrap(), b"banana");
//! ```

pub mod alphabet;
pub mod bwt;
pub mod error;
pub mod lcp;
pub mod sais;
pub mod table;
pub mod unbwt;

pub use alphabet::{bucket_bounds, count_frequencies, Symbol};
pub use bwt::{bwt, bwt_in_place, Bwt};
pub use error::{Result, SaisError};
pub use lcp::{lcp, lcp_in_place, plcp};
pub use sais::{sais_table, suffix_array, suffix_array_int, MAX_LEN};
pub use table::SuffixTable;
pub use unbwt::{unbwt, unbwt_in_place};
