//! The APAR rule battery
//!
//! All 28 rules share one control flow: gate on the steady-state
//! operating mode, walk the window once counting samples that violate a
//! threshold condition, and report the violating fraction as a fault
//! score in [0, 1]. Rather than 28 hand-rolled copies of that loop, the
//! battery is a table of [`Rule`] descriptors — id, mode gate, required
//! channels, the parameter subset the condition reads, and the condition
//! itself — driven by a single evaluator.
//!
//! Two behaviors are deliberate and preserved from the published rule
//! set:
//!
//! - A rule whose mode gate fails scores exactly 0.0. The score does not
//!   distinguish "no fault observed" from "not applicable in this
//!   regime"; callers needing the distinction check the mode themselves.
//! - Rule 28 is the odd one out: it ignores the mode entirely, counts
//!   operating-mode transitions across consecutive samples, and scores a
//!   binary 1.0 when the count exceeds MTMAX.
//!
//! Input shape is validated before the gate, so malformed windows error
//! even for rules the current mode silences.
//!
//! ```
//! use apar_core::mode::OperatingMode;
//! use apar_core::params::ParameterSet;
//! use apar_core::window::{AhuWindow, Channel};
//! use apar_core::rules;
//!
//! let tsa = [13.0, 13.2];
//! let tma = [20.0, 20.1];
//! let window = AhuWindow::new()
//!     .with(Channel::SupplyAirTemp, &tsa)
//!     .with(Channel::MixedAirTemp, &tma);
//! let params = ParameterSet::default();
//!
//! let score = rules::rule(1)
//!     .unwrap()
//!     .evaluate(OperatingMode::Heating, &window, &params)
//!     .unwrap();
//! assert_eq!(score, 1.0);
//! ```

mod predicates;

use crate::constants::RULE_COUNT;
use crate::errors::{FddError, FddResult};
use crate::mode::{self, OperatingMode};
use crate::params::{Parameter, ParameterSet};
use crate::window::{AhuWindow, Channel, Sample};

/// Mode gate of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applicability {
    /// Applies in exactly one steady-state mode
    Mode(OperatingMode),
    /// Applies in any settled mode (1..=5), not during transients
    AnySteady,
    /// Evaluated regardless of the mode
    Always,
}

impl Applicability {
    /// Whether a rule with this gate runs for the given mode
    pub const fn admits(&self, mode: OperatingMode) -> bool {
        match self {
            Applicability::Mode(required) => mode as u8 == *required as u8,
            Applicability::AnySteady => mode.is_steady(),
            Applicability::Always => true,
        }
    }
}

/// How per-sample results collapse into a fault score
#[derive(Clone, Copy)]
pub enum Reduction {
    /// Fraction of window samples violating the condition
    ViolationFraction(fn(&Sample, &ParameterSet) -> bool),
    /// 1.0 iff mode transitions across the window exceed MTMAX
    ModeSwitchCount,
}

impl core::fmt::Debug for Reduction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Reduction::ViolationFraction(_) => f.write_str("ViolationFraction"),
            Reduction::ModeSwitchCount => f.write_str("ModeSwitchCount"),
        }
    }
}

/// One rule of the battery
///
/// Descriptors are static data; evaluating one never mutates anything.
/// The same window and parameter snapshot always produce the same score.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Rule id, 1..=28, indexing the symptom and root-cause tables
    pub id: u8,
    /// Mode gate
    pub applicability: Applicability,
    /// Channels the condition reads; validated before evaluation
    pub channels: &'static [Channel],
    /// Parameters the condition reads, for introspection and reporting
    pub parameters: &'static [Parameter],
    /// Per-sample condition and score reduction
    pub reduction: Reduction,
}

impl Rule {
    /// Fault score of this rule over one window
    ///
    /// `mode` is the steady-state operating mode of the window, as
    /// produced by [`mode::steady_state`] (or forced by the caller).
    /// Returns a score in [0, 1]; exactly 0.0 when the mode gate fails,
    /// and for rule 28 exactly 0.0 or 1.0.
    pub fn evaluate(
        &self,
        mode: OperatingMode,
        window: &AhuWindow<'_>,
        params: &ParameterSet,
    ) -> FddResult<f64> {
        let n = window.samples_for(self.channels)?;

        match self.reduction {
            Reduction::ModeSwitchCount => {
                let uhc = window.require(Channel::HeatingValve)?;
                let ud = window.require(Channel::Damper)?;
                let ucc = window.require(Channel::CoolingValve)?;
                let switches = mode::transition_count(uhc, ud, ucc, params)?;
                let fired = f64::from(switches) > params.get(Parameter::Mtmax);
                Ok(if fired { 1.0 } else { 0.0 })
            }
            Reduction::ViolationFraction(condition) => {
                if !self.applicability.admits(mode) {
                    return Ok(0.0);
                }
                let mut violations = 0usize;
                for i in 0..n {
                    if condition(&window.sample(i), params) {
                        violations += 1;
                    }
                }
                Ok(violations as f64 / n as f64)
            }
        }
    }
}

use Applicability::{AnySteady, Mode};
use OperatingMode::{
    CoolingWithOutdoorAir, FullOutdoorAirCooling, Heating, MinOutdoorAirCooling, Unknown,
};

const TEMPERATURE_TOLERANCE: &[Parameter] = &[Parameter::Et];

/// The full battery, in rule order
///
/// Index `i` holds rule `i + 1`; [`rule`] does the id arithmetic.
pub const RULES: [Rule; RULE_COUNT] = [
    // Heating (mode 1)
    Rule {
        id: 1,
        applicability: Mode(Heating),
        channels: &[Channel::SupplyAirTemp, Channel::MixedAirTemp],
        parameters: &[Parameter::Dtsf, Parameter::Et],
        reduction: Reduction::ViolationFraction(predicates::supply_below_mixed),
    },
    Rule {
        id: 2,
        applicability: Mode(Heating),
        channels: &[Channel::ReturnAirTemp, Channel::OutdoorAirTemp, Channel::MixedAirTemp],
        parameters: &[Parameter::Dtmin, Parameter::QoaQsaMin, Parameter::Ef],
        reduction: Reduction::ViolationFraction(predicates::outdoor_fraction_off_minimum),
    },
    Rule {
        id: 3,
        applicability: Mode(Heating),
        channels: &[Channel::HeatingValve, Channel::SupplyAirSetpoint, Channel::SupplyAirTemp],
        parameters: &[Parameter::Ehc, Parameter::Et],
        reduction: Reduction::ViolationFraction(predicates::heating_valve_saturated_supply_cold),
    },
    Rule {
        id: 4,
        applicability: Mode(Heating),
        channels: &[Channel::HeatingValve],
        parameters: &[Parameter::Ehc],
        reduction: Reduction::ViolationFraction(predicates::heating_valve_saturated),
    },
    // Cooling with outdoor air (mode 2)
    Rule {
        id: 5,
        applicability: Mode(CoolingWithOutdoorAir),
        channels: &[Channel::OutdoorAirTemp, Channel::SupplyAirSetpoint],
        parameters: &[Parameter::Dtsf, Parameter::Et],
        reduction: Reduction::ViolationFraction(predicates::outdoor_too_warm_for_economizer),
    },
    Rule {
        id: 6,
        applicability: Mode(CoolingWithOutdoorAir),
        channels: &[Channel::SupplyAirTemp, Channel::ReturnAirTemp],
        parameters: &[Parameter::Dtrf, Parameter::Et],
        reduction: Reduction::ViolationFraction(predicates::supply_above_return),
    },
    Rule {
        id: 7,
        applicability: Mode(CoolingWithOutdoorAir),
        channels: &[Channel::SupplyAirTemp, Channel::MixedAirTemp],
        parameters: &[Parameter::Dtsf, Parameter::Et],
        reduction: Reduction::ViolationFraction(predicates::supply_mixed_split_off_fan_rise),
    },
    // Mechanical cooling with 100% outdoor air (mode 3)
    Rule {
        id: 8,
        applicability: Mode(FullOutdoorAirCooling),
        channels: &[Channel::OutdoorAirTemp, Channel::SupplyAirSetpoint],
        parameters: &[Parameter::Dtsf, Parameter::Et],
        reduction: Reduction::ViolationFraction(predicates::outdoor_too_cold_for_full_oa),
    },
    Rule {
        id: 9,
        applicability: Mode(FullOutdoorAirCooling),
        channels: &[Channel::OutdoorAirTemp, Channel::ChangeoverTemp],
        parameters: TEMPERATURE_TOLERANCE,
        reduction: Reduction::ViolationFraction(predicates::outdoor_above_changeover),
    },
    Rule {
        id: 10,
        applicability: Mode(FullOutdoorAirCooling),
        channels: &[Channel::OutdoorAirTemp, Channel::MixedAirTemp],
        parameters: TEMPERATURE_TOLERANCE,
        reduction: Reduction::ViolationFraction(predicates::outdoor_mixed_mismatch),
    },
    Rule {
        id: 11,
        applicability: Mode(FullOutdoorAirCooling),
        channels: &[Channel::SupplyAirTemp, Channel::MixedAirTemp],
        parameters: &[Parameter::Dtsf, Parameter::Et],
        reduction: Reduction::ViolationFraction(predicates::supply_above_mixed),
    },
    Rule {
        id: 12,
        applicability: Mode(FullOutdoorAirCooling),
        channels: &[Channel::SupplyAirTemp, Channel::ReturnAirTemp],
        parameters: &[Parameter::Dtrf, Parameter::Et],
        reduction: Reduction::ViolationFraction(predicates::supply_above_return),
    },
    Rule {
        id: 13,
        applicability: Mode(FullOutdoorAirCooling),
        channels: &[Channel::CoolingValve, Channel::SupplyAirTemp, Channel::SupplyAirSetpoint],
        parameters: &[Parameter::Ecc, Parameter::Et],
        reduction: Reduction::ViolationFraction(predicates::cooling_valve_saturated_supply_warm),
    },
    Rule {
        id: 14,
        applicability: Mode(FullOutdoorAirCooling),
        channels: &[Channel::CoolingValve],
        parameters: &[Parameter::Ecc],
        reduction: Reduction::ViolationFraction(predicates::cooling_valve_saturated),
    },
    // Mechanical cooling with minimum outdoor air (mode 4)
    Rule {
        id: 15,
        applicability: Mode(MinOutdoorAirCooling),
        channels: &[Channel::OutdoorAirTemp, Channel::ChangeoverTemp],
        parameters: TEMPERATURE_TOLERANCE,
        reduction: Reduction::ViolationFraction(predicates::outdoor_below_changeover),
    },
    Rule {
        id: 16,
        applicability: Mode(MinOutdoorAirCooling),
        channels: &[Channel::SupplyAirTemp, Channel::MixedAirTemp],
        parameters: &[Parameter::Dtsf, Parameter::Et],
        reduction: Reduction::ViolationFraction(predicates::supply_above_mixed),
    },
    Rule {
        id: 17,
        applicability: Mode(MinOutdoorAirCooling),
        channels: &[Channel::SupplyAirTemp, Channel::ReturnAirTemp],
        parameters: &[Parameter::Dtrf, Parameter::Et],
        reduction: Reduction::ViolationFraction(predicates::supply_above_return),
    },
    Rule {
        id: 18,
        applicability: Mode(MinOutdoorAirCooling),
        channels: &[Channel::ReturnAirTemp, Channel::OutdoorAirTemp, Channel::MixedAirTemp],
        parameters: &[Parameter::Dtmin, Parameter::QoaQsaMin, Parameter::Ef],
        reduction: Reduction::ViolationFraction(predicates::outdoor_fraction_off_minimum),
    },
    Rule {
        id: 19,
        applicability: Mode(MinOutdoorAirCooling),
        channels: &[Channel::CoolingValve, Channel::SupplyAirTemp, Channel::SupplyAirSetpoint],
        parameters: &[Parameter::Ecc, Parameter::Et],
        reduction: Reduction::ViolationFraction(predicates::cooling_valve_saturated_supply_warm),
    },
    Rule {
        id: 20,
        applicability: Mode(MinOutdoorAirCooling),
        channels: &[Channel::CoolingValve],
        parameters: &[Parameter::Ecc],
        reduction: Reduction::ViolationFraction(predicates::cooling_valve_saturated),
    },
    // Unknown regime (mode 5)
    Rule {
        id: 21,
        applicability: Mode(Unknown),
        channels: &[Channel::HeatingValve, Channel::Damper, Channel::CoolingValve],
        parameters: &[Parameter::Ehc, Parameter::Ed, Parameter::Ecc],
        reduction: Reduction::ViolationFraction(predicates::all_actuators_modulating),
    },
    Rule {
        id: 22,
        applicability: Mode(Unknown),
        channels: &[Channel::HeatingValve, Channel::CoolingValve],
        parameters: &[Parameter::Ehc, Parameter::Ecc],
        reduction: Reduction::ViolationFraction(predicates::both_valves_modulating),
    },
    Rule {
        id: 23,
        applicability: Mode(Unknown),
        channels: &[Channel::HeatingValve, Channel::Damper],
        parameters: &[Parameter::Ehc, Parameter::Ed],
        reduction: Reduction::ViolationFraction(predicates::heating_valve_and_damper_modulating),
    },
    Rule {
        id: 24,
        applicability: Mode(Unknown),
        channels: &[Channel::Damper, Channel::CoolingValve],
        parameters: &[Parameter::Ed, Parameter::Ecc],
        reduction: Reduction::ViolationFraction(predicates::damper_and_cooling_valve_modulating),
    },
    // Any settled mode
    Rule {
        id: 25,
        applicability: AnySteady,
        channels: &[Channel::SupplyAirTemp, Channel::SupplyAirSetpoint],
        parameters: TEMPERATURE_TOLERANCE,
        reduction: Reduction::ViolationFraction(predicates::supply_setpoint_tracking_error),
    },
    Rule {
        id: 26,
        applicability: AnySteady,
        channels: &[Channel::MixedAirTemp, Channel::ReturnAirTemp, Channel::OutdoorAirTemp],
        parameters: TEMPERATURE_TOLERANCE,
        reduction: Reduction::ViolationFraction(predicates::mixed_below_return_and_outdoor),
    },
    Rule {
        id: 27,
        applicability: AnySteady,
        channels: &[Channel::MixedAirTemp, Channel::ReturnAirTemp, Channel::OutdoorAirTemp],
        parameters: TEMPERATURE_TOLERANCE,
        reduction: Reduction::ViolationFraction(predicates::mixed_above_return_and_outdoor),
    },
    // Mode cycling, evaluated in every regime
    Rule {
        id: 28,
        applicability: Applicability::Always,
        channels: &[Channel::HeatingValve, Channel::Damper, Channel::CoolingValve],
        parameters: &[Parameter::Mtmax],
        reduction: Reduction::ModeSwitchCount,
    },
];

/// Descriptor for a rule id in 1..=28
pub fn rule(id: u8) -> FddResult<&'static Rule> {
    if (1..=RULE_COUNT as u8).contains(&id) {
        Ok(&RULES[usize::from(id) - 1])
    } else {
        Err(FddError::UnknownRule { id })
    }
}

/// Evaluate the whole battery over one window
///
/// Index `i` of the result holds the score of rule `i + 1`. Fails fast on
/// the first rule whose required channels are missing or malformed; a
/// window feeding the full battery must carry all nine channels.
pub fn evaluate_battery(
    mode: OperatingMode,
    window: &AhuWindow<'_>,
    params: &ParameterSet,
) -> FddResult<[f64; RULE_COUNT]> {
    let mut scores = [0.0; RULE_COUNT];
    for (slot, rule) in scores.iter_mut().zip(RULES.iter()) {
        *slot = rule.evaluate(mode, window, params)?;
    }
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_in_rule_order() {
        for (i, rule) in RULES.iter().enumerate() {
            assert_eq!(usize::from(rule.id), i + 1);
        }
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(rule(1).unwrap().id, 1);
        assert_eq!(rule(28).unwrap().id, 28);
        assert_eq!(rule(0).unwrap_err(), FddError::UnknownRule { id: 0 });
        assert_eq!(rule(29).unwrap_err(), FddError::UnknownRule { id: 29 });
    }

    #[test]
    fn gate_failure_scores_zero() {
        // Data that violates rule 1 in heating scores 0 in any other mode
        let tsa = [50.0, 50.0];
        let tma = [60.0, 60.0];
        let window = AhuWindow::new()
            .with(Channel::SupplyAirTemp, &tsa)
            .with(Channel::MixedAirTemp, &tma);
        let params = ParameterSet::default();

        let r1 = rule(1).unwrap();
        assert_eq!(r1.evaluate(Heating, &window, &params).unwrap(), 1.0);
        assert_eq!(r1.evaluate(CoolingWithOutdoorAir, &window, &params).unwrap(), 0.0);
        assert_eq!(r1.evaluate(OperatingMode::Transient, &window, &params).unwrap(), 0.0);
    }

    #[test]
    fn shape_errors_beat_the_gate() {
        // Even a gated-off rule rejects an empty window
        let empty: [f64; 0] = [];
        let window = AhuWindow::new()
            .with(Channel::SupplyAirTemp, &empty)
            .with(Channel::MixedAirTemp, &empty);
        let params = ParameterSet::default();

        assert_eq!(
            rule(1).unwrap().evaluate(CoolingWithOutdoorAir, &window, &params),
            Err(FddError::EmptyWindow)
        );
    }

    #[test]
    fn partial_violation_is_a_fraction() {
        // One of four samples violates rule 25
        let tsa = [20.0, 20.0, 25.0, 20.0];
        let tsas = [20.0, 20.0, 20.0, 20.0];
        let window = AhuWindow::new()
            .with(Channel::SupplyAirTemp, &tsa)
            .with(Channel::SupplyAirSetpoint, &tsas);
        let params = ParameterSet::default();

        let score = rule(25).unwrap().evaluate(Heating, &window, &params).unwrap();
        assert_eq!(score, 0.25);
    }

    #[test]
    fn any_steady_rules_skip_transients() {
        let tsa = [25.0];
        let tsas = [20.0];
        let window = AhuWindow::new()
            .with(Channel::SupplyAirTemp, &tsa)
            .with(Channel::SupplyAirSetpoint, &tsas);
        let params = ParameterSet::default();

        let r25 = rule(25).unwrap();
        assert_eq!(r25.evaluate(OperatingMode::Transient, &window, &params).unwrap(), 0.0);
        assert_eq!(r25.evaluate(Unknown, &window, &params).unwrap(), 1.0);
    }

    #[test]
    fn mode_switch_rule_ignores_the_gate_mode() {
        // 8 transitions across 9 samples, MTMAX = 7: fires in every mode
        let uhc = [1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
        let ud = [0.0; 9];
        let ucc = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        let window = AhuWindow::new()
            .with(Channel::HeatingValve, &uhc)
            .with(Channel::Damper, &ud)
            .with(Channel::CoolingValve, &ucc);
        let params = ParameterSet::default();

        let r28 = rule(28).unwrap();
        for mode_value in 0..=5 {
            let mode = OperatingMode::from_u8(mode_value).unwrap();
            assert_eq!(r28.evaluate(mode, &window, &params).unwrap(), 1.0);
        }
    }

    #[test]
    fn mode_switch_rule_under_limit_scores_zero() {
        // Steady heating: zero transitions
        let uhc = [1.0, 1.0, 1.0];
        let ud = [0.0; 3];
        let ucc = [0.0; 3];
        let window = AhuWindow::new()
            .with(Channel::HeatingValve, &uhc)
            .with(Channel::Damper, &ud)
            .with(Channel::CoolingValve, &ucc);
        let params = ParameterSet::default();

        assert_eq!(
            rule(28).unwrap().evaluate(Heating, &window, &params).unwrap(),
            0.0
        );
    }

    #[test]
    fn evaluation_is_pure() {
        let tsa = [50.0, 70.0];
        let tma = [60.0, 60.0];
        let window = AhuWindow::new()
            .with(Channel::SupplyAirTemp, &tsa)
            .with(Channel::MixedAirTemp, &tma);
        let params = ParameterSet::default();

        let r1 = rule(1).unwrap();
        let first = r1.evaluate(Heating, &window, &params).unwrap();
        let second = r1.evaluate(Heating, &window, &params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn battery_covers_every_rule() {
        // Full nine-channel window in steady heating
        let n = 4;
        let temps = [20.0; 4];
        let zeros = [0.0; 4];
        let ones = [1.0; 4];
        let window = AhuWindow::new()
            .with(Channel::SupplyAirTemp, &temps[..n])
            .with(Channel::MixedAirTemp, &temps[..n])
            .with(Channel::ReturnAirTemp, &temps[..n])
            .with(Channel::OutdoorAirTemp, &temps[..n])
            .with(Channel::SupplyAirSetpoint, &temps[..n])
            .with(Channel::ChangeoverTemp, &temps[..n])
            .with(Channel::HeatingValve, &ones[..n])
            .with(Channel::Damper, &zeros[..n])
            .with(Channel::CoolingValve, &zeros[..n]);
        let params = ParameterSet::default();

        let scores = evaluate_battery(Heating, &window, &params).unwrap();
        for (i, score) in scores.iter().enumerate() {
            assert!(
                (0.0..=1.0).contains(score),
                "rule {} score {} out of range", i + 1, score
            );
        }
        // Heating valve saturated fully open: rule 4 fires on every sample
        assert_eq!(scores[3], 1.0);
        // Cooling-mode rules are gated off
        assert_eq!(scores[13], 0.0);
    }
}
