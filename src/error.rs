//! Error types surfaced by the reflow pipeline.
//!
//! Reports have a fixed capacity: no message body exceeds
//! [`MSG_CAPACITY`] bytes, and the excerpts embedded in
//! [`Error::BadArgument`] and [`Error::WordTooLong`] are truncated to
//! honour that bound.

use thiserror::Error;

/// Capacity of the report buffer the CLI contract was written
/// against, including its terminating NUL.
pub const MSG_CAPACITY: usize = 163;

/// Longest argument excerpt that fits a "Bad argument: " report.
const ARG_EXCERPT: usize = MSG_CAPACITY - 16;

/// Longest word excerpt that fits a "Word too long: " report.
const WORD_EXCERPT: usize = MSG_CAPACITY - 17;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Bad argument: {0}")]
    BadArgument(String),

    #[error("Bad charset syntax: {0}")]
    BadCharset(String),

    #[error("<width> ({width}) <= <prefix> ({prefix}) + <suffix> ({suffix})")]
    WidthTooSmall {
        width: usize,
        prefix: usize,
        suffix: usize,
    },

    #[error("Line {line} shorter than <prefix> + <suffix> = {prefix} + {suffix} = {affix}")]
    LineTooShort {
        /// 1-based within the paragraph being reflowed.
        line: usize,
        prefix: usize,
        suffix: usize,
        affix: usize,
    },

    #[error("Word too long: {0}")]
    WordTooLong(String),

    #[error("Cannot justify.")]
    CannotJustify,

    #[error("Impossibility #{0} has occurred.  Please report it.")]
    Impossibility(u32),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn excerpt(bytes: &[u8], limit: usize) -> String {
    let cut = bytes.len().min(limit);
    String::from_utf8_lossy(&bytes[..cut]).into_owned()
}

impl Error {
    pub(crate) fn bad_argument(arg: &str) -> Self {
        Error::BadArgument(excerpt(arg.as_bytes(), ARG_EXCERPT))
    }

    pub(crate) fn bad_charset(s: &str) -> Self {
        Error::BadCharset(excerpt(s.as_bytes(), ARG_EXCERPT))
    }

    pub(crate) fn word_too_long(word: &[u8]) -> Self {
        Error::WordTooLong(excerpt(word, WORD_EXCERPT))
    }
}
