//! AHU operating mode classification
//!
//! APAR gates every rule on the operating regime of the unit, derived
//! purely from the three normalized control signals: heating coil valve
//! (uhc), mixing box damper (ud) and cooling coil valve (ucc). The modes
//! are:
//!
//! - Mode 1: heating
//! - Mode 2: cooling with outdoor air (economizer)
//! - Mode 3: mechanical cooling with 100% outdoor air
//! - Mode 4: mechanical cooling with minimum outdoor air
//! - Mode 5: unknown
//!
//! [`steady_state`] adds mode 0 (transient) for windows whose samples do
//! not all classify to the same mode.
//!
//! Classification is an ordered sequence of strict threshold tests and
//! the first match wins. The comparisons are deliberately strict: a
//! signal exactly at a threshold falls through to the next case, and a
//! triple matching no case classifies as unknown. This exact tie-break is
//! part of the rule set's published behavior and must not be "fixed".

use crate::params::{Parameter, ParameterSet};
use crate::window::check_lengths;
use crate::errors::FddResult;

/// Operating regime of an air handling unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum OperatingMode {
    /// No consensus across the window; rule evaluation is not meaningful
    Transient = 0,
    /// Heating coil active, damper at minimum
    Heating = 1,
    /// Free cooling with modulating outdoor air damper
    CoolingWithOutdoorAir = 2,
    /// Mechanical cooling with the damper fully open
    FullOutdoorAirCooling = 3,
    /// Mechanical cooling with the damper at minimum
    MinOutdoorAirCooling = 4,
    /// Control signals match no recognized regime
    Unknown = 5,
}

impl OperatingMode {
    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            OperatingMode::Transient => "transient",
            OperatingMode::Heating => "heating",
            OperatingMode::CoolingWithOutdoorAir => "cooling with outdoor air",
            OperatingMode::FullOutdoorAirCooling => "mechanical cooling with 100% outdoor air",
            OperatingMode::MinOutdoorAirCooling => "mechanical cooling with minimum outdoor air",
            OperatingMode::Unknown => "unknown",
        }
    }

    /// Numeric mode as used in the APAR literature
    pub const fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Mode from its numeric value, if in 0..=5
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(OperatingMode::Transient),
            1 => Some(OperatingMode::Heating),
            2 => Some(OperatingMode::CoolingWithOutdoorAir),
            3 => Some(OperatingMode::FullOutdoorAirCooling),
            4 => Some(OperatingMode::MinOutdoorAirCooling),
            5 => Some(OperatingMode::Unknown),
            _ => None,
        }
    }

    /// Whether the unit settled into a single regime (modes 1..=5)
    pub const fn is_steady(&self) -> bool {
        !matches!(self, OperatingMode::Transient)
    }
}

impl core::fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify one sample of control signals into an operating mode
///
/// `uhc`, `ud` and `ucc` are the normalized [0, 1] heating valve, damper
/// and cooling valve signals; the EHC, ED and ECC thresholds come from
/// the supplied parameter snapshot. Total: every triple classifies to
/// exactly one of the five modes.
pub fn classify(uhc: f64, ud: f64, ucc: f64, params: &ParameterSet) -> OperatingMode {
    let ehc = params.get(Parameter::Ehc);
    let ed = params.get(Parameter::Ed);
    let ecc = params.get(Parameter::Ecc);

    if uhc > ehc && ud < ed && ucc < ecc {
        OperatingMode::Heating
    } else if uhc < ehc && ud > ed && ud < (1.0 - ed) && ucc < ecc {
        OperatingMode::CoolingWithOutdoorAir
    } else if uhc < ehc && ud > (1.0 - ed) && ucc > ecc {
        OperatingMode::FullOutdoorAirCooling
    } else if uhc < ehc && ud < ed && ucc > ecc {
        OperatingMode::MinOutdoorAirCooling
    } else {
        OperatingMode::Unknown
    }
}

/// Steady-state mode over a window of control-signal samples
///
/// Returns the consensus mode when every sample classifies identically,
/// otherwise [`OperatingMode::Transient`]. The scan always walks the full
/// window; the result is a flag, not an aggregate, so there is nothing to
/// gain from stopping early and the cost stays O(N) either way.
pub fn steady_state(
    uhc: &[f64],
    ud: &[f64],
    ucc: &[f64],
    params: &ParameterSet,
) -> FddResult<OperatingMode> {
    let n = check_lengths(&[
        ("heating valve signal", uhc),
        ("damper signal", ud),
        ("cooling valve signal", ucc),
    ])?;

    let mut mode = classify(uhc[0], ud[0], ucc[0], params);
    for i in 1..n {
        if mode != classify(uhc[i], ud[i], ucc[i], params) {
            mode = OperatingMode::Transient;
        }
    }
    Ok(mode)
}

/// Number of mode changes across consecutive samples
///
/// A window of one sample has zero transitions. Used by the
/// mode-switch rule, exposed for callers tracking cycling behavior
/// directly.
pub fn transition_count(
    uhc: &[f64],
    ud: &[f64],
    ucc: &[f64],
    params: &ParameterSet,
) -> FddResult<u32> {
    let n = check_lengths(&[
        ("heating valve signal", uhc),
        ("damper signal", ud),
        ("cooling valve signal", ucc),
    ])?;

    let mut switches = 0;
    for i in 1..n {
        let previous = classify(uhc[i - 1], ud[i - 1], ucc[i - 1], params);
        let current = classify(uhc[i], ud[i], ucc[i], params);
        if previous != current {
            switches += 1;
        }
    }
    Ok(switches)
}
