//! HTTP `Range` header handling.
//!
//! Only single byte ranges are honored:
//! - `bytes=0-499`
//! - `bytes=500-` (to end of file)
//! - `bytes=-500` (last 500 bytes)
//!
//! A header that does not parse is ignored and the whole file is served.
//! A header that parses but cannot be satisfied against the file size is
//! reported as [`Error::RangeNotSatisfiable`]. An end past the last byte is
//! clamped.

use media_explorer_common::{ByteRange, Error, Result};

/// A syntactically valid range, not yet checked against a file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// `bytes=START-END`
    Bounded { start: u64, end: u64 },
    /// `bytes=START-`
    From { start: u64 },
    /// `bytes=-LEN`
    Suffix { len: u64 },
}

/// Parse a `Range` header value. Returns `None` for anything malformed or
/// for multi-range requests.
pub fn parse_range_header(value: &str) -> Option<RangeSpec> {
    let value = value.trim();
    let (unit, spec) = value.split_once('=')?;
    if !unit.trim().eq_ignore_ascii_case("bytes") || spec.contains(',') {
        return None;
    }

    let (start, end) = spec.split_once('-')?;
    let start = start.trim();
    let end = end.trim();

    match (start.is_empty(), end.is_empty()) {
        (false, false) => Some(RangeSpec::Bounded {
            start: parse_offset(start)?,
            end: parse_offset(end)?,
        }),
        (false, true) => Some(RangeSpec::From {
            start: parse_offset(start)?,
        }),
        (true, false) => Some(RangeSpec::Suffix {
            len: parse_offset(end)?,
        }),
        // bytes=-
        (true, true) => None,
    }
}

/// Digits only; `u64::from_str` would also take a leading `+`.
fn parse_offset(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl RangeSpec {
    /// Resolve against a file of `file_size` bytes.
    pub fn resolve(self, file_size: u64) -> Result<ByteRange> {
        let unsatisfiable = || Error::RangeNotSatisfiable { size: file_size };

        if file_size == 0 {
            return Err(unsatisfiable());
        }
        let last = file_size - 1;

        match self {
            RangeSpec::Bounded { start, end } => {
                if start > end || start > last {
                    return Err(unsatisfiable());
                }
                Ok(ByteRange {
                    start,
                    end: end.min(last),
                })
            }
            RangeSpec::From { start } => {
                if start > last {
                    return Err(unsatisfiable());
                }
                Ok(ByteRange { start, end: last })
            }
            RangeSpec::Suffix { len } => {
                if len == 0 {
                    return Err(unsatisfiable());
                }
                Ok(ByteRange {
                    start: file_size.saturating_sub(len),
                    end: last,
                })
            }
        }
    }
}
