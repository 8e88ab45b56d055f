//! Symptom reporting and root-cause isolation
//!
//! The rule battery yields 28 fault scores per window. This module maps
//! scores above a configurable threshold to what a building operator can
//! act on: the symptom the rule watches for, and the catalog of physical
//! faults that plausibly explain it.
//!
//! Both tables are fixed knowledge. The symptom table has one entry per
//! rule; the root-cause catalog names 19 physical fault types, and each
//! rule maps to a subset of them. Several rules map to the empty set —
//! their symptom is well-defined but the rule alone cannot isolate the
//! hardware at fault. That is a valid terminal state, reported as a
//! finding with no causes, not an error.
//!
//! The engine produces data, never output: [`Finding`] implements
//! `Display` so a CLI, dashboard or JSON layer can present it, but
//! nothing here prints or logs.

use heapless::Vec;

use crate::constants::{DEFAULT_FAULT_THRESHOLD, RULE_COUNT};
use crate::errors::{FddError, FddResult};

/// Physical fault types that can explain a triggered symptom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum RootCause {
    /// Supply air temperature sensor reading in error
    SupplyAirTempSensor,
    /// Return air temperature sensor reading in error
    ReturnAirTempSensor,
    /// Mixed air temperature sensor reading in error
    MixedAirTempSensor,
    /// Outdoor air temperature sensor reading in error
    OutdoorAirTempSensor,
    /// Cooling coil valve passing water while commanded closed
    LeakingCoolingCoilValve,
    /// Cooling coil valve not tracking its command
    StuckCoolingCoilValve,
    /// Cooling coil too small for the load
    UndersizedCoolingCoil,
    /// Cooling coil heat transfer degraded by fouling
    FouledCoolingCoil,
    /// Chilled water arriving warmer than design
    ChillerWaterSupplyTooHigh,
    /// Chilled water circulation pump underperforming
    ChilledWaterCircPump,
    /// Chilled water plant not available for the season
    ChilledWaterUnavailable,
    /// Heating coil valve passing water while commanded closed
    LeakingHeatingCoilValve,
    /// Heating coil valve not tracking its command
    StuckHeatingCoilValve,
    /// Heating coil too small for the load
    UndersizedHeatingCoil,
    /// Heating coil heat transfer degraded by fouling
    FouledHeatingCoil,
    /// Hot water arriving colder than design
    HotWaterSupplyTooLow,
    /// Hot water circulation pump underperforming
    HotWaterCircPump,
    /// Mixing box damper passing air while commanded closed
    LeakingMixingBoxDamper,
    /// Mixing box damper not tracking its command
    StuckMixingBoxDamper,
}

impl RootCause {
    /// Display string from the fault catalog
    pub const fn description(&self) -> &'static str {
        match self {
            RootCause::SupplyAirTempSensor => "Supply Air Temperature Sensor Error",
            RootCause::ReturnAirTempSensor => "Return Air Temperature Sensor Error",
            RootCause::MixedAirTempSensor => "Mixed Air Temperature Sensor Error",
            RootCause::OutdoorAirTempSensor => "Outdoor Air Temperature Sensor Error",
            RootCause::LeakingCoolingCoilValve => "Leaking Cooling Coil Valve",
            RootCause::StuckCoolingCoilValve => "Stuck Cooling Coil Valve",
            RootCause::UndersizedCoolingCoil => "Undersized Cooling Coil",
            RootCause::FouledCoolingCoil => "Fouled Cooling Coil",
            RootCause::ChillerWaterSupplyTooHigh => "Chiller Water Temperature Supply too High",
            RootCause::ChilledWaterCircPump => "Problem with Chilled Water Circulation Pump",
            RootCause::ChilledWaterUnavailable => "Chilled Water not Available to Season",
            RootCause::LeakingHeatingCoilValve => "Leaking Heating Coil Valve",
            RootCause::StuckHeatingCoilValve => "Stuck Heating Coil Valve",
            RootCause::UndersizedHeatingCoil => "Undersized Heating Coil",
            RootCause::FouledHeatingCoil => "Fouled Heating Coil",
            RootCause::HotWaterSupplyTooLow => "Hot Water Supply Temperature Too Low",
            RootCause::HotWaterCircPump => "Problem with Hot Water Circulating Pump",
            RootCause::LeakingMixingBoxDamper => "Leaking Mixing Box Damper",
            RootCause::StuckMixingBoxDamper => "Stuck Mixing Box Damper",
        }
    }
}

impl core::fmt::Display for RootCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.description())
    }
}

/// Symptom text per rule, in rule order
const SYMPTOMS: [&str; RULE_COUNT] = [
    "In heating Mode, supply air temperature is lower compared to mixed air temperature.",
    "In heating Mode, outdoor air fraction too low or too high.",
    "In heating Mode, heating coil valve saturated fully open and persistent supply air temperature error exists.",
    "In heating Mode, heating coil valve saturated fully open, if heating load increases supply air temperature will drift from setpoint.",
    "In Cooling Mode with Outdoor Air, outside air temperature too warm for cooling with outside air.",
    "In Cooling Mode with Outdoor Air, supply air temperature is lower compared to the return air temperature.",
    "In Cooling Mode with Outdoor Air, supply air temperature and mixed air temperature are not nearly the same.",
    "In Cooling Mode with 100% Outdoor Air, outside air temperature too low for mechanical cooling with 100% outside air.",
    "In Cooling Mode with 100% Outdoor Air, outside air temperature too high for mechanical cooling with 100% outside air.",
    "In Cooling Mode with 100% Outdoor Air, outside air temperature and mixed air temperature are not nearly the same.",
    "In Cooling Mode with 100% Outdoor Air, supply air temperature is higher compared to the mixed air temperature.",
    "In Cooling Mode with 100% Outdoor Air, supply air temperature is higher compared to the return air temperature.",
    "In Cooling Mode with 100% Outdoor Air, cooling coil valve saturated fully open and persistent supply air temperature error exists.",
    "In Cooling Mode with 100% Outdoor Air, cooling coil valve saturated fully open, if cooling load increases supply air temperature will drift from setpoint.",
    "In Mechanical Cooling Mode with Minimum Outdoor Air, outside air temperature too low for mechanical cooling with minimum outside air.",
    "In Mechanical Cooling Mode with Minimum Outdoor Air, supply air temperature is higher compared to the mixed air temperature.",
    "In Mechanical Cooling Mode with Minimum Outdoor Air, supply air temperature is higher compared to the return air temperature.",
    "In Mechanical Cooling Mode with Minimum Outdoor Air, %outside air too low or too high.",
    "In Mechanical Cooling Mode with Minimum Outdoor Air, cooling coil valve saturated fully open and persistent supply air temperature error exists.",
    "In Mechanical Cooling Mode with Minimum Outdoor Air, cooling coil valve saturated fully open, if cooling load increases supply air temperature will drift from setpoint.",
    "In Unknown Mode, heating coil valve, cooling coil valve and mixing box damper are modulating simultaneously.",
    "In Unknown Mode, heating coil and cooling coil valves are modulating simultaneously.",
    "In Unknown Mode, heating coil valve and mixing box damper are modulating simultaneously.",
    "In Unknown Mode, cooling coil valve and mixing box damper are modulating simultaneously.",
    "In All Modes, persistent supply air temperature error exists.",
    "In All Modes, mixed air temperature should be between return air temperature and outside air temperature (mixed air temperature is too low).",
    "In All Modes, mixed air temperature should be between return air temperature and outside air temperature (mixed air temperature is too high).",
    "In All Modes, too many mode switches per hour.",
];

/// Heating-side delivery faults shared by the saturated-valve rules
const HEATING_DELIVERY: &[RootCause] = &[
    RootCause::SupplyAirTempSensor,
    RootCause::LeakingCoolingCoilValve,
    RootCause::StuckCoolingCoilValve,
    RootCause::StuckHeatingCoilValve,
    RootCause::UndersizedHeatingCoil,
    RootCause::FouledHeatingCoil,
    RootCause::HotWaterSupplyTooLow,
    RootCause::HotWaterCircPump,
];

/// Cooling-side delivery faults shared by the mechanical cooling rules
const COOLING_DELIVERY: &[RootCause] = &[
    RootCause::SupplyAirTempSensor,
    RootCause::StuckCoolingCoilValve,
    RootCause::UndersizedCoolingCoil,
    RootCause::FouledCoolingCoil,
    RootCause::ChillerWaterSupplyTooHigh,
    RootCause::ChilledWaterCircPump,
    RootCause::ChilledWaterUnavailable,
    RootCause::LeakingHeatingCoilValve,
    RootCause::StuckHeatingCoilValve,
];

/// Outdoor air path faults shared by the air-fraction rules
const AIR_PATH: &[RootCause] = &[
    RootCause::ReturnAirTempSensor,
    RootCause::MixedAirTempSensor,
    RootCause::OutdoorAirTempSensor,
    RootCause::LeakingMixingBoxDamper,
    RootCause::StuckMixingBoxDamper,
];

/// Mixing box temperature sensors, for the bracketing rules
const MIXING_SENSORS: &[RootCause] = &[
    RootCause::ReturnAirTempSensor,
    RootCause::MixedAirTempSensor,
    RootCause::OutdoorAirTempSensor,
];

/// No cataloged causes; the symptom stands alone
const UNCATALOGED: &[RootCause] = &[];

/// Plausible root causes per rule, in rule order
const ROOT_CAUSES: [&[RootCause]; RULE_COUNT] = [
    // 1
    &[
        RootCause::SupplyAirTempSensor,
        RootCause::MixedAirTempSensor,
        RootCause::LeakingCoolingCoilValve,
        RootCause::StuckCoolingCoilValve,
        RootCause::StuckHeatingCoilValve,
        RootCause::UndersizedHeatingCoil,
        RootCause::FouledHeatingCoil,
        RootCause::HotWaterSupplyTooLow,
        RootCause::HotWaterCircPump,
    ],
    // 2
    AIR_PATH,
    // 3, 4
    HEATING_DELIVERY,
    HEATING_DELIVERY,
    // 5
    &[RootCause::SupplyAirTempSensor, RootCause::OutdoorAirTempSensor],
    // 6
    &[
        RootCause::SupplyAirTempSensor,
        RootCause::ReturnAirTempSensor,
        RootCause::LeakingHeatingCoilValve,
        RootCause::StuckHeatingCoilValve,
    ],
    // 7
    &[
        RootCause::SupplyAirTempSensor,
        RootCause::MixedAirTempSensor,
        RootCause::LeakingCoolingCoilValve,
        RootCause::StuckCoolingCoilValve,
        RootCause::LeakingHeatingCoilValve,
        RootCause::StuckHeatingCoilValve,
    ],
    // 8
    &[
        RootCause::SupplyAirTempSensor,
        RootCause::OutdoorAirTempSensor,
        RootCause::LeakingCoolingCoilValve,
        RootCause::StuckCoolingCoilValve,
        RootCause::LeakingMixingBoxDamper,
        RootCause::StuckMixingBoxDamper,
    ],
    // 9
    UNCATALOGED,
    // 10
    &[
        RootCause::MixedAirTempSensor,
        RootCause::OutdoorAirTempSensor,
        RootCause::LeakingMixingBoxDamper,
        RootCause::StuckMixingBoxDamper,
    ],
    // 11
    &[
        RootCause::SupplyAirTempSensor,
        RootCause::MixedAirTempSensor,
        RootCause::StuckCoolingCoilValve,
        RootCause::UndersizedCoolingCoil,
        RootCause::FouledCoolingCoil,
        RootCause::ChillerWaterSupplyTooHigh,
        RootCause::ChilledWaterCircPump,
        RootCause::ChilledWaterUnavailable,
        RootCause::LeakingHeatingCoilValve,
        RootCause::StuckHeatingCoilValve,
    ],
    // 12
    &[
        RootCause::SupplyAirTempSensor,
        RootCause::ReturnAirTempSensor,
        RootCause::StuckCoolingCoilValve,
        RootCause::UndersizedCoolingCoil,
        RootCause::FouledCoolingCoil,
        RootCause::ChillerWaterSupplyTooHigh,
        RootCause::ChilledWaterCircPump,
        RootCause::ChilledWaterUnavailable,
        RootCause::LeakingHeatingCoilValve,
        RootCause::StuckHeatingCoilValve,
    ],
    // 13, 14
    COOLING_DELIVERY,
    COOLING_DELIVERY,
    // 15
    UNCATALOGED,
    // 16
    &[
        RootCause::SupplyAirTempSensor,
        RootCause::MixedAirTempSensor,
        RootCause::StuckCoolingCoilValve,
        RootCause::UndersizedCoolingCoil,
        RootCause::FouledCoolingCoil,
        RootCause::ChillerWaterSupplyTooHigh,
        RootCause::ChilledWaterCircPump,
        RootCause::ChilledWaterUnavailable,
        RootCause::LeakingHeatingCoilValve,
        RootCause::StuckHeatingCoilValve,
    ],
    // 17
    &[
        RootCause::SupplyAirTempSensor,
        RootCause::ReturnAirTempSensor,
        RootCause::StuckCoolingCoilValve,
        RootCause::UndersizedCoolingCoil,
        RootCause::FouledCoolingCoil,
        RootCause::ChillerWaterSupplyTooHigh,
        RootCause::ChilledWaterCircPump,
        RootCause::ChilledWaterUnavailable,
        RootCause::LeakingHeatingCoilValve,
        RootCause::StuckHeatingCoilValve,
    ],
    // 18
    AIR_PATH,
    // 19, 20
    COOLING_DELIVERY,
    COOLING_DELIVERY,
    // 21..=25
    UNCATALOGED,
    UNCATALOGED,
    UNCATALOGED,
    UNCATALOGED,
    UNCATALOGED,
    // 26, 27
    MIXING_SENSORS,
    MIXING_SENSORS,
    // 28
    UNCATALOGED,
];

/// Symptom text for a rule id in 1..=28
pub fn symptom(id: u8) -> FddResult<&'static str> {
    table_entry(&SYMPTOMS, id).copied()
}

/// Plausible root causes for a rule id in 1..=28; may be empty
pub fn root_causes(id: u8) -> FddResult<&'static [RootCause]> {
    table_entry(&ROOT_CAUSES, id).copied()
}

fn table_entry<T>(table: &'static [T; RULE_COUNT], id: u8) -> FddResult<&'static T> {
    if (1..=RULE_COUNT as u8).contains(&id) {
        Ok(&table[usize::from(id) - 1])
    } else {
        Err(FddError::UnknownRule { id })
    }
}

/// One diagnosed fault: a rule over threshold with its knowledge entries
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Finding {
    /// The rule that fired, 1..=28
    pub rule: u8,
    /// The rule's fault score over the window
    pub score: f64,
    /// Symptom watched for by the rule
    pub symptom: &'static str,
    /// Plausible physical causes; empty when uncataloged
    pub causes: &'static [RootCause],
}

impl core::fmt::Display for Finding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Rule {}: {}", self.rule, self.symptom)?;
        if self.causes.is_empty() {
            write!(f, " Plausible cause(s): uncataloged.")
        } else {
            write!(f, " Plausible cause(s): ")?;
            for (i, cause) in self.causes.iter().enumerate() {
                if i > 0 {
                    write!(f, "; ")?;
                }
                write!(f, "{cause}")?;
            }
            write!(f, ".")
        }
    }
}

/// Maps rule scores to findings using a global fault threshold
///
/// The threshold is configuration, not a validated input: any value is
/// accepted, and since scores never exceed 1.0 a threshold above 1.0
/// simply reports nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagnosisEngine {
    threshold: f64,
}

impl Default for DiagnosisEngine {
    fn default() -> Self {
        Self { threshold: DEFAULT_FAULT_THRESHOLD }
    }
}

impl DiagnosisEngine {
    /// Engine with the default 0.7 fault threshold
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a caller-chosen fault threshold
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The configured fault threshold
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Findings for every rule whose score reaches the threshold
    ///
    /// `scores` must hold exactly one score per rule, in rule order, as
    /// produced by [`rules::evaluate_battery`](crate::rules::evaluate_battery).
    /// Findings come back in ascending rule order.
    pub fn diagnose(&self, scores: &[f64]) -> FddResult<Vec<Finding, RULE_COUNT>> {
        if scores.len() != RULE_COUNT {
            return Err(FddError::LengthMismatch {
                channel: "fault scores",
                expected: RULE_COUNT,
                actual: scores.len(),
            });
        }

        let mut findings = Vec::new();
        for (i, &score) in scores.iter().enumerate() {
            if score >= self.threshold {
                let id = (i + 1) as u8;
                // Capacity equals the table length, push cannot fail
                let _ = findings.push(Finding {
                    rule: id,
                    score,
                    symptom: SYMPTOMS[i],
                    causes: ROOT_CAUSES[i],
                });
            }
        }
        Ok(findings)
    }
}
