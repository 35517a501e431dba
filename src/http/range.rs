//! HTTP Range request parsing module
//!
//! Range header parsing against a known resource size, compliant with
//! RFC 7233 byte-range semantics.

/// Inclusive byte interval within a resource, `0 <= start <= end < size`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// Start byte position
    pub start: u64,
    /// End byte position, inclusive
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered by this range (inclusive bounds, never zero)
    pub const fn byte_count(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Range header parse result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No Range header, or not a `bytes=` unit (serve full body)
    NoRange,
    /// Syntactically malformed header (treated as absent, serve full body)
    Invalid,
    /// Parsed ranges, each clipped to the resource. An empty list means the
    /// header was understood but no range is satisfiable (answer 416).
    Ranges(Vec<ByteRange>),
}

/// Parse an HTTP Range header value against a resource size.
///
/// Supported spec forms within `bytes=spec1,spec2,...`:
/// - `start-end` - explicit range, end clipped to `size - 1`
/// - `start-` - from start to end of resource
/// - `-suffix` - last `suffix` bytes
///
/// A spec whose end precedes its start, or any spec that is not
/// digits-dash-digits with at most one side empty, invalidates the whole
/// header. A spec that is well-formed but lies beyond the resource is
/// dropped as unsatisfiable rather than treated as a parse error.
///
/// # Examples
/// ```
/// use filestack::http::range::{parse_ranges, ByteRange, RangeOutcome};
///
/// assert_eq!(
///     parse_ranges(Some("bytes=123-456"), 500),
///     RangeOutcome::Ranges(vec![ByteRange { start: 123, end: 456 }])
/// );
/// assert_eq!(parse_ranges(None, 500), RangeOutcome::NoRange);
/// assert_eq!(parse_ranges(Some("bytes=456-123"), 500), RangeOutcome::Invalid);
/// ```
pub fn parse_ranges(header: Option<&str>, size: u64) -> RangeOutcome {
    let Some(header) = header else {
        return RangeOutcome::NoRange;
    };

    let Some(specs) = header.trim().strip_prefix("bytes=") else {
        return RangeOutcome::NoRange; // Not a bytes unit, ignore
    };

    let mut ranges = Vec::new();
    for spec in specs.split(',') {
        match parse_spec(spec.trim(), size) {
            Ok(Some(range)) => ranges.push(range),
            Ok(None) => {} // unsatisfiable after clipping, dropped
            Err(()) => return RangeOutcome::Invalid,
        }
    }
    RangeOutcome::Ranges(ranges)
}

/// Parse one `start?-end?` spec. `Ok(None)` is a well-formed but
/// unsatisfiable spec; `Err` poisons the whole header.
fn parse_spec(spec: &str, size: u64) -> Result<Option<ByteRange>, ()> {
    let Some((start_str, end_str)) = spec.split_once('-') else {
        return Err(());
    };

    let last = size.checked_sub(1);
    let (start, end) = match (start_str.is_empty(), end_str.is_empty()) {
        (true, true) => return Err(()),
        // Suffix form: the last N bytes
        (true, false) => {
            let suffix = parse_digits(end_str)?;
            (size.saturating_sub(suffix), last)
        }
        // Open end: from start to the end of the resource
        (false, true) => (parse_digits(start_str)?, last),
        (false, false) => {
            let start = parse_digits(start_str)?;
            let end = parse_digits(end_str)?;
            if end < start {
                return Err(());
            }
            (start, last.map(|l| end.min(l)))
        }
    };

    match end {
        Some(end) if start <= end => Ok(Some(ByteRange { start, end })),
        _ => Ok(None),
    }
}

fn parse_digits(s: &str) -> Result<u64, ()> {
    if s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse::<u64>().map_err(|_| ())
    } else {
        Err(())
    }
}
