//! Integration tests for mode classification and the rule battery
//!
//! Exercises the complete evaluation path: control signals to
//! steady-state mode, mode plus window through individual rules and the
//! whole battery.

use apar_core::{
    mode::{self, OperatingMode},
    rules::{self, evaluate_battery, RULES},
    AhuWindow, Channel, FddError, Parameter, ParameterSet,
};

/// Window with every channel attached to the same column count
fn full_window<'a>(temps: &'a [f64], signals: &'a [f64]) -> AhuWindow<'a> {
    AhuWindow::new()
        .with(Channel::SupplyAirTemp, temps)
        .with(Channel::MixedAirTemp, temps)
        .with(Channel::ReturnAirTemp, temps)
        .with(Channel::OutdoorAirTemp, temps)
        .with(Channel::SupplyAirSetpoint, temps)
        .with(Channel::ChangeoverTemp, temps)
        .with(Channel::HeatingValve, signals)
        .with(Channel::Damper, signals)
        .with(Channel::CoolingValve, signals)
}

#[test]
fn heating_with_cold_supply_air_fires_rule_one() {
    let params = ParameterSet::default();
    let uhc = [1.0, 1.0];
    let ud = [0.0, 0.0];
    let ucc = [0.0, 0.0];

    let regime = mode::steady_state(&uhc, &ud, &ucc, &params).unwrap();
    assert_eq!(regime, OperatingMode::Heating);

    // Supply air 50 against mixed air 60: below 60 + DTSF - ET = 59.1
    // on both samples
    let tsa = [50.0, 50.0];
    let tma = [60.0, 60.0];
    let window = AhuWindow::new()
        .with(Channel::SupplyAirTemp, &tsa)
        .with(Channel::MixedAirTemp, &tma);

    let score = rules::rule(1).unwrap().evaluate(regime, &window, &params).unwrap();
    assert_eq!(score, 1.0);
}

#[test]
fn heating_with_warm_supply_air_is_clean() {
    let params = ParameterSet::default();
    let tsa = [70.0, 70.0];
    let tma = [60.0, 60.0];
    let window = AhuWindow::new()
        .with(Channel::SupplyAirTemp, &tsa)
        .with(Channel::MixedAirTemp, &tma);

    let score = rules::rule(1)
        .unwrap()
        .evaluate(OperatingMode::Heating, &window, &params)
        .unwrap();
    assert_eq!(score, 0.0);
}

#[test]
fn excessive_mode_cycling_fires_rule_twenty_eight() {
    let params = ParameterSet::default();
    // Alternating heating / min outdoor air cooling over nine samples:
    // eight transitions against MTMAX = 7
    let uhc = [1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
    let ud = [0.0; 9];
    let ucc = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];

    assert_eq!(mode::transition_count(&uhc, &ud, &ucc, &params), Ok(8));
    assert_eq!(
        mode::steady_state(&uhc, &ud, &ucc, &params),
        Ok(OperatingMode::Transient)
    );

    let window = AhuWindow::new()
        .with(Channel::HeatingValve, &uhc)
        .with(Channel::Damper, &ud)
        .with(Channel::CoolingValve, &ucc);

    let score = rules::rule(28)
        .unwrap()
        .evaluate(OperatingMode::Transient, &window, &params)
        .unwrap();
    assert_eq!(score, 1.0);

    // Raising the switch budget clears it
    let relaxed = params.with(Parameter::Mtmax, 8.0);
    let score = rules::rule(28)
        .unwrap()
        .evaluate(OperatingMode::Transient, &window, &relaxed)
        .unwrap();
    assert_eq!(score, 0.0);
}

#[test]
fn empty_window_is_rejected_by_every_rule() {
    let params = ParameterSet::default();
    let empty: [f64; 0] = [];
    let window = full_window(&empty, &empty);

    for rule in RULES.iter() {
        assert_eq!(
            rule.evaluate(OperatingMode::Heating, &window, &params),
            Err(FddError::EmptyWindow),
            "rule {}",
            rule.id
        );
    }
}

#[test]
fn every_score_stays_in_unit_interval() {
    let params = ParameterSet::default();
    // Deliberately contradictory data: valves fighting, sensors apart
    let temps = [30.0, -5.0, 60.0, 12.5];
    let signals = [1.0, 0.5, 0.0, 1.0];
    let window = full_window(&temps, &signals);

    for mode_value in 0..=5u8 {
        let regime = OperatingMode::from_u8(mode_value).unwrap();
        let scores = evaluate_battery(regime, &window, &params).unwrap();
        for (i, score) in scores.iter().enumerate() {
            assert!(
                (0.0..=1.0).contains(score),
                "mode {} rule {} score {}",
                mode_value,
                i + 1,
                score
            );
        }
    }
}

#[test]
fn battery_is_deterministic() {
    let params = ParameterSet::default();
    let temps = [21.0, 22.0, 23.0];
    let signals = [0.6, 0.6, 0.6];
    let window = full_window(&temps, &signals);

    let first = evaluate_battery(OperatingMode::Unknown, &window, &params).unwrap();
    let second = evaluate_battery(OperatingMode::Unknown, &window, &params).unwrap();
    assert_eq!(first, second);
}

#[test]
fn economizer_regime_flags_stuck_damper_symptoms() {
    let params = ParameterSet::default();
    // Unit claims free cooling, damper mid-stroke, but supply air sits
    // well above return air: rule 6 violation on every sample
    let uhc = [0.0, 0.0, 0.0];
    let ud = [0.5, 0.5, 0.5];
    let ucc = [0.0, 0.0, 0.0];
    let regime = mode::steady_state(&uhc, &ud, &ucc, &params).unwrap();
    assert_eq!(regime, OperatingMode::CoolingWithOutdoorAir);

    let tsa = [26.0, 26.5, 26.2];
    let tra = [22.0, 22.0, 22.1];
    let window = AhuWindow::new()
        .with(Channel::SupplyAirTemp, &tsa)
        .with(Channel::ReturnAirTemp, &tra);

    let score = rules::rule(6).unwrap().evaluate(regime, &window, &params).unwrap();
    assert_eq!(score, 1.0);

    // The same data is silent in the heating regime
    let score = rules::rule(6)
        .unwrap()
        .evaluate(OperatingMode::Heating, &window, &params)
        .unwrap();
    assert_eq!(score, 0.0);
}

#[test]
fn mismatched_channel_lengths_are_rejected() {
    let params = ParameterSet::default();
    let tsa = [20.0, 21.0, 22.0];
    let tma = [20.0, 21.0];
    let window = AhuWindow::new()
        .with(Channel::SupplyAirTemp, &tsa)
        .with(Channel::MixedAirTemp, &tma);

    let err = rules::rule(1)
        .unwrap()
        .evaluate(OperatingMode::Heating, &window, &params)
        .unwrap_err();
    assert!(matches!(err, FddError::LengthMismatch { .. }));
}

#[test]
fn per_rule_parameter_overrides_take_effect() {
    let params = ParameterSet::default();
    // Borderline: tsa = 59.5 against tma + DTSF - ET = 59.1
    let tsa = [59.5, 59.5];
    let tma = [60.0, 60.0];
    let window = AhuWindow::new()
        .with(Channel::SupplyAirTemp, &tsa)
        .with(Channel::MixedAirTemp, &tma);

    let rule = rules::rule(1).unwrap();
    assert_eq!(rule.evaluate(OperatingMode::Heating, &window, &params).unwrap(), 0.0);

    // Tightening the temperature tolerance flips it
    let tight = params.with(Parameter::Et, 0.25);
    assert_eq!(rule.evaluate(OperatingMode::Heating, &window, &tight).unwrap(), 1.0);
}
