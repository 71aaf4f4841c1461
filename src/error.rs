//! Unified error type for focus-dial.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` under the `defmt` feature for efficient
//! on-target logging; the session core itself absorbs anomalies with
//! safe defaults and never surfaces an `Error` to the tick loop.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Storage
    /// A stored catalog record did not parse.
    InvalidRecord,

    /// The catalog is at capacity.
    CatalogFull,

    // Parsing
    /// A color string was not of the form `#RRGGBB`.
    InvalidColor,

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,
}
