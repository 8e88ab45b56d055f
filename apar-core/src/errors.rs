//! Error types for rule evaluation failures
//!
//! The engine is a pure function of its inputs, so every error here is an
//! input-validation error surfaced immediately to the caller. There are
//! no transient failure modes, no retries, and no process-level failures
//! distinct from these.
//!
//! Errors are kept small and `Copy`:
//!
//! 1. **No heap allocation**: context is inline — `&'static str` channel
//!    names and plain numeric fields only.
//! 2. **Copy semantics**: evaluations happen per rule per window; errors
//!    move through `?` chains without ownership friction.
//! 3. **Actionable**: each variant carries enough to point at the exact
//!    malformed input without further queries.
//!
//! ## Categories
//!
//! ### Input shape
//! - `LengthMismatch`: channel arrays of unequal length in one evaluation
//! - `MissingChannel`: a rule references a channel the window lacks
//! - `EmptyWindow`: N = 0, where a violation fraction would divide by
//!   zero. This is an explicit error, never a NaN and never a silent 0.
//!
//! ### Configuration
//! - `InvalidParameter`: a parameter value outside its physically
//!   sensible range, reported only by the opt-in strict check
//!   ([`ParameterSet::validate`](crate::params::ParameterSet::validate))
//!
//! ### Lookup
//! - `UnknownRule`: a rule id outside 1..=28

use thiserror_no_std::Error;

/// Result type for engine operations
pub type FddResult<T> = Result<T, FddError>;

/// Input-validation errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FddError {
    /// Channel arrays referenced by one evaluation disagree in length
    #[error("Channel {channel} has {actual} samples, expected {expected}")]
    LengthMismatch {
        /// Display name of the offending channel
        channel: &'static str,
        /// Length established by the first channel checked
        expected: usize,
        /// Actual length of this channel
        actual: usize,
    },

    /// A required channel was not attached to the window
    #[error("Channel {channel} missing from window")]
    MissingChannel {
        /// Display name of the absent channel
        channel: &'static str,
    },

    /// The window holds no samples; violation fractions are undefined
    #[error("Empty sample window")]
    EmptyWindow,

    /// Parameter value outside its physically sensible range
    #[error("Parameter {name} = {value} outside sensible range [{min}, {max}]")]
    InvalidParameter {
        /// Catalog name of the parameter
        name: &'static str,
        /// The offending value
        value: f64,
        /// Lower bound of the sensible range
        min: f64,
        /// Upper bound of the sensible range
        max: f64,
    },

    /// Rule id outside the fixed battery
    #[error("Unknown rule id {id}, valid ids are 1..=28")]
    UnknownRule {
        /// The offending id
        id: u8,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for FddError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::LengthMismatch { channel, expected, actual } =>
                defmt::write!(fmt, "Channel {} has {} samples, expected {}", channel, actual, expected),
            Self::MissingChannel { channel } =>
                defmt::write!(fmt, "Channel {} missing", channel),
            Self::EmptyWindow =>
                defmt::write!(fmt, "Empty sample window"),
            Self::InvalidParameter { name, value, min, max } =>
                defmt::write!(fmt, "Parameter {} = {} outside [{}, {}]", name, value, min, max),
            Self::UnknownRule { id } =>
                defmt::write!(fmt, "Unknown rule id {}", id),
        }
    }
}
