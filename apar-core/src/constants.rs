//! Numeric defaults for the APAR rule set
//!
//! This module centralizes every tuning constant the engine ships with.
//! The values are the published APAR defaults and are deliberately
//! conservative: loose enough to ride out sensor noise, tight enough to
//! catch sustained faults. Site-specific overrides go through
//! [`ParameterSet::with`](crate::params::ParameterSet::with) rather than
//! editing these.
//!
//! ## Units
//!
//! Temperatures are in degrees Celsius, control signals are normalized to
//! [0, 1], delays are in minutes, and the mode-switch limit is a count
//! per window.

/// Number of rules in the APAR battery.
///
/// The rule set is fixed; rule ids run 1..=28 and index the symptom and
/// root-cause tables.
///
/// Source: House, Vaezi-Nejad, Whitcomb, "An Expert Rule Set for Fault
/// Detection in Air-Handling Units", ASHRAE Transactions 107(1), 2001
pub const RULE_COUNT: usize = 28;

/// Number of fixed generic FDD parameters.
pub const PARAMETER_COUNT: usize = 13;

/// Temperature rise across the supply fan (°C).
///
/// Fan motor waste heat warms the air stream; rules comparing supply and
/// mixed air temperatures must account for it.
pub const DEFAULT_DTSF: f64 = 1.1;

/// Temperature rise across the return fan (°C).
pub const DEFAULT_DTRF: f64 = 1.1;

/// Minimum return/outdoor temperature split for airflow rules (°C).
///
/// Below this split the outdoor-air-fraction estimate
/// (Tma - Tra)/(Toa - Tra) divides two small numbers and is too noisy to
/// act on, so the fraction rules gate themselves off.
pub const DEFAULT_DTMIN: f64 = 5.6;

/// Design minimum outdoor air fraction.
///
/// Ventilation minimum expressed as a fraction of supply airflow; typical
/// code-minimum designs land near 20%.
pub const DEFAULT_QOA_QSA_MIN: f64 = 0.2;

/// Tolerance for errors in temperature measurements (°C).
pub const DEFAULT_ET: f64 = 2.0;

/// Tolerance for errors in airflow fractions.
pub const DEFAULT_EF: f64 = 0.3;

/// Threshold for the heating coil valve control signal.
///
/// Signals below this are treated as "closed" when classifying the
/// operating mode.
pub const DEFAULT_EHC: f64 = 0.02;

/// Threshold for the cooling coil valve control signal.
pub const DEFAULT_ECC: f64 = 0.02;

/// Threshold for the mixing box damper control signal.
pub const DEFAULT_ED: f64 = 0.02;

/// Maximum number of mode switches per window before rule 28 fires.
pub const DEFAULT_MTMAX: f64 = 7.0;

/// Occupancy delay (minutes).
///
/// Settling time after an occupancy change before rule evaluation is
/// meaningful. Consumed by schedulers feeding this engine, carried here
/// because it is part of the fixed APAR parameter catalog.
pub const DEFAULT_OCC_DLY: f64 = 90.0;

/// Mode switch delay (minutes).
pub const DEFAULT_MODE_DLY: f64 = 60.0;

/// Rule delay (minutes).
pub const DEFAULT_RULE_DLY: f64 = 60.0;

/// Default fault threshold applied to rule scores.
///
/// A rule's score is the fraction of window samples violating its
/// condition; a fault is reported once at least this fraction violates.
/// 0.7 keeps one-off excursions out of reports while still catching
/// faults present for most of a window.
pub const DEFAULT_FAULT_THRESHOLD: f64 = 0.7;
