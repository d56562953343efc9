//! Convert NumPy `.npz` array archives into MATLAB `.mat` files.
//!
//! This crate is the logic core of a small desktop converter. Callers hand
//! it filesystem paths; it hands back either a description of an archive's
//! contents or a report about a freshly written `.mat` file. Path
//! selection and on-screen rendering stay with the caller; the result
//! types implement [`Display`](std::fmt::Display) for that purpose.
//!
//! ```text
//!  archive.npz
//!      │
//!      ▼
//!  ┌───────┐  inspect   ┌────────────────┐
//!  │  npz  │ ──────────▶│ ArchiveSummary │
//!  └───────┘            └────────────────┘
//!      │
//!      │ convert
//!      ▼
//!  ┌───────┐            ┌──────────────────┐
//!  │ mat5  │ ──────────▶│ ConversionResult │
//!  └───────┘            └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use npz2mat::{convert, inspect};
//!
//! # fn main() -> Result<(), npz2mat::ConvertError> {
//! let summary = inspect("data.npz")?;
//! println!("{summary}");
//!
//! let report = convert("data.npz", "data.mat")?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod error;
pub mod mat5;
pub mod model;
pub mod npz;

pub use crate::convert::{convert, inspect};
pub use crate::error::ConvertError;
pub use crate::mat5::{MatWriter, WriteMatError};
pub use crate::model::{
    ArchiveSummary, ArrayData, ArrayEntry, ConversionResult, ElementType, ScalarValue,
    SAMPLE_FULL_MAX, SAMPLE_HEAD,
};
pub use crate::npz::{read_archive, ArchiveContents, ArchiveError, NamedArray};
