//! Core rule engine for APAR-based AHU fault detection
//!
//! Implements the APAR rule set: 28 threshold rules over air handling
//! unit sensor readings and control signals, gated on the unit's
//! operating regime, with root-cause isolation for rules that fire.
//!
//! The engine is a pure function of its inputs. Feed it a window of
//! synchronized samples and a parameter snapshot; get back 28 fault
//! scores and, above a threshold, findings with plausible physical
//! causes. No I/O, no clocks, no shared state — evaluations for
//! different units or windows can run on any threads the caller likes.
//!
//! ```
//! use apar_core::{
//!     mode, rules, AhuWindow, Channel, DiagnosisEngine, ParameterSet,
//! };
//!
//! // Two samples of a unit stuck heating with cold supply air
//! let uhc = [1.0, 1.0];
//! let ud = [0.0, 0.0];
//! let ucc = [0.0, 0.0];
//! let tsa = [13.0, 13.1];
//! let tma = [21.0, 21.0];
//! let tsas = [18.0, 18.0];
//!
//! let params = ParameterSet::default();
//! let regime = mode::steady_state(&uhc, &ud, &ucc, &params)?;
//!
//! let window = AhuWindow::new()
//!     .with(Channel::HeatingValve, &uhc)
//!     .with(Channel::Damper, &ud)
//!     .with(Channel::CoolingValve, &ucc)
//!     .with(Channel::SupplyAirTemp, &tsa)
//!     .with(Channel::MixedAirTemp, &tma)
//!     .with(Channel::SupplyAirSetpoint, &tsas);
//!
//! let score = rules::rule(1)?.evaluate(regime, &window, &params)?;
//! assert_eq!(score, 1.0);
//!
//! let mut scores = [0.0; 28];
//! scores[0] = score;
//! let findings = DiagnosisEngine::new().diagnose(&scores)?;
//! assert_eq!(findings[0].rule, 1);
//! # Ok::<(), apar_core::FddError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod diagnosis;
pub mod errors;
pub mod mode;
pub mod params;
pub mod rules;
pub mod window;

// Public API
pub use errors::{FddError, FddResult};
pub use mode::OperatingMode;
pub use params::{Parameter, ParameterSet};
pub use window::{AhuWindow, Channel};
pub use diagnosis::{DiagnosisEngine, Finding, RootCause};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
