//! HTTP protocol layer module
//!
//! Protocol-level building blocks shared by the serving handlers: range
//! parsing, cache validators, MIME detection, and response builders.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use range::{parse_ranges, ByteRange, RangeOutcome};
pub use response::{build_404_response, build_405_response, build_416_response, build_options_response};
