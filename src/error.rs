//! Error kinds produced by the frequency model, header codec, and arithmetic
//! coder core.
//!
//! Every fallible operation in this crate returns [`Error`]. Propagation is
//! deliberately shallow: nothing here is recovered except the decoder's
//! bit-underrun substitution described on [`crate::bit_io::BitReader`], which
//! never surfaces as an error at all.

use std::io;
use std::path::PathBuf;

/// The failure modes of encoding and decoding.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Opening the input or output file failed.
    #[error("failed to open {path}: {source}")]
    IoOpen {
        /// Path that could not be opened.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// A read from the input stream failed.
    #[error("read error: {0}")]
    IoRead(#[source] io::Error),

    /// A write to the output stream failed.
    #[error("write error: {0}")]
    IoWrite(#[source] io::Error),

    /// The header was shorter than the wire format requires.
    ///
    /// Note: end-of-stream while priming the decoder's initial code value,
    /// or while renormalizing, is *not* `Truncated` — both substitute a
    /// zero bit, since a short-but-valid payload is expected for small
    /// inputs (see `Decoder::new` in `coder::decoder`).
    #[error("truncated stream: {0}")]
    Truncated(String),

    /// The input byte count, or a single symbol's frequency, exceeds the
    /// precision bounds of the 32-bit code width (`MAX_FREQ_SUM = 2^28`).
    #[error("input too large: {0}")]
    TooLarge(String),

    /// The header's frequency sum and total byte count disagree in a way
    /// that cannot be reconciled (zero one, nonzero the other).
    #[error("inconsistent header: {0}")]
    InconsistentHeader(String),

    /// The arithmetic-coded payload could not be decoded: a symbol lookup
    /// fell below the lowest cumulative boundary, the interval range
    /// collapsed to zero, or fewer bytes were produced than the header
    /// promised.
    #[error("corrupt stream: {0}")]
    Corrupt(String),

    /// An invariant that should be impossible to violate from valid input
    /// was violated; indicates a bug in this crate rather than bad input.
    #[error("internal error: {0}")]
    Internal(String),
}
