//! Generic FDD parameters for the APAR rule set
//!
//! Every rule and the mode classifier read their tolerances from a
//! [`ParameterSet`]: a snapshot of the 13 fixed APAR constants. The set
//! is immutable once built — overrides go through the builder-style
//! [`ParameterSet::with`], which returns a new snapshot, so a rule
//! evaluation can never observe a half-updated configuration.
//!
//! The catalog of names is closed. There is no string-keyed lookup and no
//! way to address a parameter outside [`Parameter`]; the unknown-name
//! failure mode of map-based designs is unrepresentable here.
//!
//! ## Advisory ranges
//!
//! Each parameter carries a physically sensible range. Overrides outside
//! the range are accepted — sites do run odd equipment — but logged at
//! warn level when the `log` feature is on. Callers wanting strict
//! behavior run [`ParameterSet::validate`] after building.

use crate::constants::{
    DEFAULT_DTSF, DEFAULT_DTRF, DEFAULT_DTMIN, DEFAULT_QOA_QSA_MIN,
    DEFAULT_ET, DEFAULT_EF, DEFAULT_EHC, DEFAULT_ECC, DEFAULT_ED,
    DEFAULT_MTMAX, DEFAULT_OCC_DLY, DEFAULT_MODE_DLY, DEFAULT_RULE_DLY,
    PARAMETER_COUNT,
};
use crate::errors::{FddError, FddResult};

// Macro for optional logging
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

/// The fixed catalog of generic FDD parameter names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Parameter {
    /// Temperature rise across the supply fan (°C)
    Dtsf = 0,
    /// Temperature rise across the return fan (°C)
    Dtrf = 1,
    /// Minimum return/outdoor temperature split for airflow rules (°C)
    Dtmin = 2,
    /// Design minimum outdoor air fraction
    QoaQsaMin = 3,
    /// Tolerance for errors in temperature measurements (°C)
    Et = 4,
    /// Tolerance for errors in airflow fractions
    Ef = 5,
    /// Threshold for the heating coil valve control signal
    Ehc = 6,
    /// Threshold for the cooling coil valve control signal
    Ecc = 7,
    /// Threshold for the mixing box damper control signal
    Ed = 8,
    /// Maximum mode switches per window before rule 28 fires
    Mtmax = 9,
    /// Occupancy delay (minutes)
    OccDly = 10,
    /// Mode switch delay (minutes)
    ModeDly = 11,
    /// Rule delay (minutes)
    RuleDly = 12,
}

impl Parameter {
    /// All parameters in catalog order
    pub const ALL: [Parameter; PARAMETER_COUNT] = [
        Parameter::Dtsf, Parameter::Dtrf, Parameter::Dtmin,
        Parameter::QoaQsaMin, Parameter::Et, Parameter::Ef,
        Parameter::Ehc, Parameter::Ecc, Parameter::Ed,
        Parameter::Mtmax, Parameter::OccDly, Parameter::ModeDly,
        Parameter::RuleDly,
    ];

    /// Catalog name as it appears in the APAR literature
    pub const fn name(&self) -> &'static str {
        match self {
            Parameter::Dtsf => "DTSF",
            Parameter::Dtrf => "DTRF",
            Parameter::Dtmin => "DTMIN",
            Parameter::QoaQsaMin => "QOA_QSA_MIN",
            Parameter::Et => "ET",
            Parameter::Ef => "EF",
            Parameter::Ehc => "EHC",
            Parameter::Ecc => "ECC",
            Parameter::Ed => "ED",
            Parameter::Mtmax => "MTMAX",
            Parameter::OccDly => "OCC_DLY",
            Parameter::ModeDly => "MODE_DLY",
            Parameter::RuleDly => "RULE_DLY",
        }
    }

    /// Physically sensible range for this parameter
    ///
    /// Advisory only: [`ParameterSet::with`] accepts values outside it,
    /// [`ParameterSet::validate`] rejects them.
    pub const fn sensible_range(&self) -> (f64, f64) {
        match self {
            // Fan heat gains beyond a few kelvin indicate a unit problem,
            // not a tuning choice
            Parameter::Dtsf | Parameter::Dtrf => (0.0, 10.0),
            Parameter::Dtmin => (0.0, 30.0),
            // Fractions of supply airflow
            Parameter::QoaQsaMin | Parameter::Ef => (0.0, 1.0),
            Parameter::Et => (0.0, 10.0),
            // Control signals are normalized to [0, 1]
            Parameter::Ehc | Parameter::Ecc | Parameter::Ed => (0.0, 1.0),
            Parameter::Mtmax => (0.0, 60.0),
            // Delays up to a day
            Parameter::OccDly | Parameter::ModeDly | Parameter::RuleDly => (0.0, 1440.0),
        }
    }
}

/// Immutable snapshot of the 13 generic FDD parameters
///
/// Built once at startup (or per evaluation when experimenting with
/// tolerances) and handed by shared reference to the classifier and the
/// rule battery.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterSet {
    values: [f64; PARAMETER_COUNT],
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            values: [
                DEFAULT_DTSF, DEFAULT_DTRF, DEFAULT_DTMIN,
                DEFAULT_QOA_QSA_MIN, DEFAULT_ET, DEFAULT_EF,
                DEFAULT_EHC, DEFAULT_ECC, DEFAULT_ED,
                DEFAULT_MTMAX, DEFAULT_OCC_DLY, DEFAULT_MODE_DLY,
                DEFAULT_RULE_DLY,
            ],
        }
    }
}

impl ParameterSet {
    /// Snapshot with the published APAR defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a parameter
    pub fn get(&self, parameter: Parameter) -> f64 {
        self.values[parameter as usize]
    }

    /// New snapshot with one parameter overridden
    ///
    /// Out-of-range values are accepted; a warning is logged when the
    /// `log` feature is enabled.
    #[must_use]
    pub fn with(mut self, parameter: Parameter, value: f64) -> Self {
        let (min, max) = parameter.sensible_range();
        if !(min..=max).contains(&value) {
            log_warn!(
                "{} = {} outside sensible range [{}, {}]",
                parameter.name(), value, min, max
            );
        }
        self.values[parameter as usize] = value;
        self
    }

    /// Strict check of every parameter against its sensible range
    ///
    /// Returns the first offender. Opt-in: the engine itself never calls
    /// this, matching the advisory nature of the ranges.
    pub fn validate(&self) -> FddResult<()> {
        for parameter in Parameter::ALL {
            let value = self.get(parameter);
            let (min, max) = parameter.sensible_range();
            if !value.is_finite() || !(min..=max).contains(&value) {
                return Err(FddError::InvalidParameter {
                    name: parameter.name(),
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}
