//! Per-sample violation conditions for the APAR battery
//!
//! Each function answers one question for one row of the window: does
//! this sample violate the rule's threshold condition? The arithmetic is
//! a fixed, versioned constant of the rule set — transcribed, not
//! derived — including its comparison directions and the places where a
//! saturation test is `<=` in the heating rules but `<` in the cooling
//! rules. Several conditions are shared by rules that differ only in the
//! mode they apply to (the descriptor table binds the mode gate).
//!
//! Absolute values go through `libm` so the predicates evaluate without
//! `std`.

use libm::fabs;

use crate::params::{Parameter, ParameterSet};
use crate::window::Sample;

/// Rule 1: in heating, supply air should sit above mixed air by the fan
/// temperature rise
pub(super) fn supply_below_mixed(s: &Sample, p: &ParameterSet) -> bool {
    s.tsa < s.tma + p.get(Parameter::Dtsf) - p.get(Parameter::Et)
}

/// Rules 2 and 18: outdoor air fraction off the design minimum
///
/// Only meaningful when return and mixed air are far enough apart for
/// the fraction (Tma - Tra)/(Toa - Tra) to be trustworthy.
pub(super) fn outdoor_fraction_off_minimum(s: &Sample, p: &ParameterSet) -> bool {
    if fabs(s.tra - s.tma) < p.get(Parameter::Dtmin) {
        return false;
    }
    let qoa = s.tma - s.tra;
    let qsa = s.toa - s.tra;
    fabs(qoa / qsa - p.get(Parameter::QoaQsaMin)) > p.get(Parameter::Ef)
}

/// Rule 3: heating valve saturated fully open while supply air runs cold
/// of setpoint
pub(super) fn heating_valve_saturated_supply_cold(s: &Sample, p: &ParameterSet) -> bool {
    fabs(s.uhc - 1.0) <= p.get(Parameter::Ehc)
        && s.tsas - s.tsa >= p.get(Parameter::Et)
}

/// Rule 4: heating valve saturated fully open
pub(super) fn heating_valve_saturated(s: &Sample, p: &ParameterSet) -> bool {
    fabs(s.uhc - 1.0) <= p.get(Parameter::Ehc)
}

/// Rule 5: outdoor air too warm for cooling without mechanical cooling
pub(super) fn outdoor_too_warm_for_economizer(s: &Sample, p: &ParameterSet) -> bool {
    s.toa > s.tsas - p.get(Parameter::Dtsf) + p.get(Parameter::Et)
}

/// Rules 6, 12 and 17: supply air above return air less the return fan
/// rise, with no heat source to explain it
pub(super) fn supply_above_return(s: &Sample, p: &ParameterSet) -> bool {
    s.tsa > s.tra - p.get(Parameter::Dtrf) + p.get(Parameter::Et)
}

/// Rule 7: supply and mixed air should differ by the supply fan rise
/// when neither coil is active
pub(super) fn supply_mixed_split_off_fan_rise(s: &Sample, p: &ParameterSet) -> bool {
    fabs(s.tsa - p.get(Parameter::Dtsf) - s.tma) > p.get(Parameter::Et)
}

/// Rule 8: outdoor air too cold for mechanical cooling with 100% outdoor
/// air
pub(super) fn outdoor_too_cold_for_full_oa(s: &Sample, p: &ParameterSet) -> bool {
    s.toa < s.tsas - p.get(Parameter::Dtsf) - p.get(Parameter::Et)
}

/// Rule 9: outdoor air above the economizer changeover temperature
pub(super) fn outdoor_above_changeover(s: &Sample, p: &ParameterSet) -> bool {
    s.toa > s.tco + p.get(Parameter::Et)
}

/// Rule 10: with the damper fully open, outdoor and mixed air should be
/// nearly the same
pub(super) fn outdoor_mixed_mismatch(s: &Sample, p: &ParameterSet) -> bool {
    fabs(s.toa - s.tma) > p.get(Parameter::Et)
}

/// Rules 11 and 16: supply air above mixed air plus the fan rise while
/// mechanically cooling
pub(super) fn supply_above_mixed(s: &Sample, p: &ParameterSet) -> bool {
    s.tsa > s.tma + p.get(Parameter::Dtsf) + p.get(Parameter::Et)
}

/// Rules 13 and 19: cooling valve saturated fully open while supply air
/// runs warm of setpoint
pub(super) fn cooling_valve_saturated_supply_warm(s: &Sample, p: &ParameterSet) -> bool {
    fabs(s.ucc - 1.0) < p.get(Parameter::Ecc)
        && s.tsa - s.tsas >= p.get(Parameter::Et)
}

/// Rules 14 and 20: cooling valve saturated fully open
pub(super) fn cooling_valve_saturated(s: &Sample, p: &ParameterSet) -> bool {
    fabs(s.ucc - 1.0) < p.get(Parameter::Ecc)
}

/// Rule 15: outdoor air below the economizer changeover temperature
pub(super) fn outdoor_below_changeover(s: &Sample, p: &ParameterSet) -> bool {
    s.toa < s.tco - p.get(Parameter::Et)
}

/// Rule 21: heating valve, damper and cooling valve all modulating at
/// once
pub(super) fn all_actuators_modulating(s: &Sample, p: &ParameterSet) -> bool {
    s.uhc > p.get(Parameter::Ehc)
        && s.ud > p.get(Parameter::Ed)
        && s.ucc > p.get(Parameter::Ecc)
}

/// Rule 22: heating and cooling valves modulating at once
pub(super) fn both_valves_modulating(s: &Sample, p: &ParameterSet) -> bool {
    s.uhc > p.get(Parameter::Ehc) && s.ucc > p.get(Parameter::Ecc)
}

/// Rule 23: heating valve and damper modulating at once
pub(super) fn heating_valve_and_damper_modulating(s: &Sample, p: &ParameterSet) -> bool {
    s.uhc > p.get(Parameter::Ehc) && s.ud > p.get(Parameter::Ed)
}

/// Rule 24: damper mid-stroke with the cooling valve modulating
pub(super) fn damper_and_cooling_valve_modulating(s: &Sample, p: &ParameterSet) -> bool {
    let ed = p.get(Parameter::Ed);
    s.ud > ed && s.ud < (1.0 - ed) && s.ucc > p.get(Parameter::Ecc)
}

/// Rule 25: persistent supply air temperature error against setpoint
pub(super) fn supply_setpoint_tracking_error(s: &Sample, p: &ParameterSet) -> bool {
    fabs(s.tsa - s.tsas) > p.get(Parameter::Et)
}

/// Rule 26: mixed air below both return and outdoor air
pub(super) fn mixed_below_return_and_outdoor(s: &Sample, p: &ParameterSet) -> bool {
    s.tma < s.tra.min(s.toa) - p.get(Parameter::Et)
}

/// Rule 27: mixed air above both return and outdoor air
pub(super) fn mixed_above_return_and_outdoor(s: &Sample, p: &ParameterSet) -> bool {
    s.tma > s.tra.max(s.toa) + p.get(Parameter::Et)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Sample {
        Sample {
            tsa: 0.0, tma: 0.0, tra: 0.0, toa: 0.0, tsas: 0.0,
            tco: 0.0, uhc: 0.0, ud: 0.0, ucc: 0.0,
        }
    }

    #[test]
    fn supply_below_mixed_threshold() {
        let p = ParameterSet::default();
        // Violation boundary sits at tma + DTSF - ET = 60 + 1.1 - 2.0
        let mut s = sample();
        s.tma = 60.0;

        s.tsa = 59.0;
        assert!(supply_below_mixed(&s, &p));
        s.tsa = 59.2;
        assert!(!supply_below_mixed(&s, &p));
    }

    #[test]
    fn fraction_rule_gates_on_temperature_split() {
        let p = ParameterSet::default();
        let mut s = sample();
        // Split below DTMIN: fraction is untrustworthy, never a violation
        s.tra = 22.0;
        s.tma = 20.0;
        s.toa = 0.0;
        assert!(!outdoor_fraction_off_minimum(&s, &p));

        // Wide split with mixed air pinned at return: fraction 0 is 0.2
        // off the minimum, within EF = 0.3
        s.tma = 22.0;
        s.tra = 30.0;
        s.toa = 0.0;
        assert!(!outdoor_fraction_off_minimum(&s, &p));

        // Mixed air tracking outdoor air: fraction near 1
        s.tma = 1.0;
        assert!(outdoor_fraction_off_minimum(&s, &p));
    }

    #[test]
    fn heating_saturation_is_inclusive() {
        // Exactly representable threshold so the boundary claim is exact
        let p = ParameterSet::default().with(Parameter::Ehc, 0.25);
        let mut s = sample();
        // |uhc - 1| exactly at EHC still counts as saturated
        s.uhc = 0.75;
        assert!(heating_valve_saturated(&s, &p));
        s.uhc = 0.5;
        assert!(!heating_valve_saturated(&s, &p));
    }

    #[test]
    fn cooling_saturation_is_exclusive() {
        let p = ParameterSet::default().with(Parameter::Ecc, 0.25);
        let mut s = sample();
        // |ucc - 1| exactly at ECC does not count
        s.ucc = 0.75;
        assert!(!cooling_valve_saturated(&s, &p));
        s.ucc = 0.875;
        assert!(cooling_valve_saturated(&s, &p));
    }

    #[test]
    fn mixed_air_bracketing() {
        let p = ParameterSet::default();
        let mut s = sample();
        s.tra = 22.0;
        s.toa = 5.0;

        s.tma = 2.0;
        assert!(mixed_below_return_and_outdoor(&s, &p));
        assert!(!mixed_above_return_and_outdoor(&s, &p));

        s.tma = 25.0;
        assert!(!mixed_below_return_and_outdoor(&s, &p));
        assert!(mixed_above_return_and_outdoor(&s, &p));

        s.tma = 12.0;
        assert!(!mixed_below_return_and_outdoor(&s, &p));
        assert!(!mixed_above_return_and_outdoor(&s, &p));
    }
}
