//! Sample windows of named AHU channels
//!
//! The engine never owns sensor data. A window is a set of borrowed,
//! column-indexed `&[f64]` slices — one per named channel — supplied by
//! the caller from whatever container the site uses. Rules declare which
//! channels they read; the evaluator checks presence and equal length
//! before touching a single value.
//!
//! Channel naming follows the APAR literature: temperatures at the four
//! air stations (supply, mixed, return, outdoor), the supply setpoint and
//! the economizer changeover temperature, and the three normalized
//! control signals (heating valve, mixing box damper, cooling valve).

use crate::errors::{FddError, FddResult};

/// Named AHU measurement and actuation channels
///
/// Maps to the sensor and command points a BMS exposes for a single
/// air handling unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Channel {
    /// Supply air temperature (Tsa)
    SupplyAirTemp = 0,
    /// Mixed air temperature (Tma)
    MixedAirTemp = 1,
    /// Return air temperature (Tra)
    ReturnAirTemp = 2,
    /// Outdoor air temperature (Toa)
    OutdoorAirTemp = 3,
    /// Supply air temperature setpoint (Tsas)
    SupplyAirSetpoint = 4,
    /// Economizer changeover temperature (Tco)
    ChangeoverTemp = 5,
    /// Normalized heating coil valve control signal (uhc)
    HeatingValve = 6,
    /// Normalized mixing box damper control signal (ud)
    Damper = 7,
    /// Normalized cooling coil valve control signal (ucc)
    CoolingValve = 8,
}

impl Channel {
    /// Number of named channels
    pub const COUNT: usize = 9;

    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            Channel::SupplyAirTemp => "supply air temperature",
            Channel::MixedAirTemp => "mixed air temperature",
            Channel::ReturnAirTemp => "return air temperature",
            Channel::OutdoorAirTemp => "outdoor air temperature",
            Channel::SupplyAirSetpoint => "supply air setpoint",
            Channel::ChangeoverTemp => "changeover temperature",
            Channel::HeatingValve => "heating valve signal",
            Channel::Damper => "damper signal",
            Channel::CoolingValve => "cooling valve signal",
        }
    }

    /// Get expected unit of measurement
    pub const fn unit(&self) -> &'static str {
        match self {
            Channel::SupplyAirTemp
            | Channel::MixedAirTemp
            | Channel::ReturnAirTemp
            | Channel::OutdoorAirTemp
            | Channel::SupplyAirSetpoint
            | Channel::ChangeoverTemp => "°C",
            // Normalized command signals are dimensionless
            Channel::HeatingValve | Channel::Damper | Channel::CoolingValve => "",
        }
    }
}

/// One row of a window, with every channel flattened to a plain value
///
/// Channels absent from the window read as NaN; the evaluator only hands
/// a sample to predicates whose required channels were checked present.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    /// Supply air temperature
    pub tsa: f64,
    /// Mixed air temperature
    pub tma: f64,
    /// Return air temperature
    pub tra: f64,
    /// Outdoor air temperature
    pub toa: f64,
    /// Supply air temperature setpoint
    pub tsas: f64,
    /// Economizer changeover temperature
    pub tco: f64,
    /// Heating coil valve signal
    pub uhc: f64,
    /// Mixing box damper signal
    pub ud: f64,
    /// Cooling coil valve signal
    pub ucc: f64,
}

/// Borrowed, column-indexed sample window
///
/// ```
/// use apar_core::window::{AhuWindow, Channel};
///
/// let tsa = [13.0, 13.2, 12.9];
/// let tma = [21.0, 21.1, 21.0];
/// let window = AhuWindow::new()
///     .with(Channel::SupplyAirTemp, &tsa)
///     .with(Channel::MixedAirTemp, &tma);
///
/// assert_eq!(window.samples_for(&[Channel::SupplyAirTemp]).unwrap(), 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AhuWindow<'a> {
    columns: [Option<&'a [f64]>; Channel::COUNT],
}

impl<'a> Default for AhuWindow<'a> {
    fn default() -> Self {
        Self { columns: [None; Channel::COUNT] }
    }
}

impl<'a> AhuWindow<'a> {
    /// Empty window with no channels attached
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach one channel column
    #[must_use]
    pub fn with(mut self, channel: Channel, data: &'a [f64]) -> Self {
        self.columns[channel as usize] = Some(data);
        self
    }

    /// Column for a channel, if attached
    pub fn channel(&self, channel: Channel) -> Option<&'a [f64]> {
        self.columns[channel as usize]
    }

    /// Column for a channel, or `MissingChannel`
    pub fn require(&self, channel: Channel) -> FddResult<&'a [f64]> {
        self.channel(channel)
            .ok_or(FddError::MissingChannel { channel: channel.name() })
    }

    /// Validate that the given channels are present, equal-length and
    /// non-empty; returns the common sample count
    pub fn samples_for(&self, channels: &[Channel]) -> FddResult<usize> {
        let mut len: Option<usize> = None;
        for &channel in channels {
            let column = self.require(channel)?;
            match len {
                None => len = Some(column.len()),
                Some(expected) if column.len() != expected => {
                    return Err(FddError::LengthMismatch {
                        channel: channel.name(),
                        expected,
                        actual: column.len(),
                    });
                }
                Some(_) => {}
            }
        }
        match len {
            Some(0) | None => Err(FddError::EmptyWindow),
            Some(n) => Ok(n),
        }
    }

    /// Row view at index `i`; absent channels read as NaN
    ///
    /// Out-of-range indices on attached channels panic like any slice
    /// index; the evaluator only iterates up to the validated count.
    pub fn sample(&self, i: usize) -> Sample {
        let read = |channel: Channel| -> f64 {
            self.channel(channel).map_or(f64::NAN, |column| column[i])
        };
        Sample {
            tsa: read(Channel::SupplyAirTemp),
            tma: read(Channel::MixedAirTemp),
            tra: read(Channel::ReturnAirTemp),
            toa: read(Channel::OutdoorAirTemp),
            tsas: read(Channel::SupplyAirSetpoint),
            tco: read(Channel::ChangeoverTemp),
            uhc: read(Channel::HeatingValve),
            ud: read(Channel::Damper),
            ucc: read(Channel::CoolingValve),
        }
    }
}

/// Validate that plain slices are equal-length and non-empty
///
/// Shared by the mode classifier, which takes bare control-signal slices
/// rather than a full window.
pub(crate) fn check_lengths(
    columns: &[(&'static str, &[f64])],
) -> FddResult<usize> {
    let mut len: Option<usize> = None;
    for &(name, column) in columns {
        match len {
            None => len = Some(column.len()),
            Some(expected) if column.len() != expected => {
                return Err(FddError::LengthMismatch {
                    channel: name,
                    expected,
                    actual: column.len(),
                });
            }
            Some(_) => {}
        }
    }
    match len {
        Some(0) | None => Err(FddError::EmptyWindow),
        Some(n) => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_channel_is_reported() {
        let tsa = [13.0];
        let window = AhuWindow::new().with(Channel::SupplyAirTemp, &tsa);

        let err = window
            .samples_for(&[Channel::SupplyAirTemp, Channel::MixedAirTemp])
            .unwrap_err();
        assert_eq!(err, FddError::MissingChannel { channel: "mixed air temperature" });
    }

    #[test]
    fn unequal_lengths_are_reported() {
        let tsa = [13.0, 13.1];
        let tma = [21.0, 21.1, 21.2];
        let window = AhuWindow::new()
            .with(Channel::SupplyAirTemp, &tsa)
            .with(Channel::MixedAirTemp, &tma);

        let err = window
            .samples_for(&[Channel::SupplyAirTemp, Channel::MixedAirTemp])
            .unwrap_err();
        assert_eq!(
            err,
            FddError::LengthMismatch {
                channel: "mixed air temperature",
                expected: 2,
                actual: 3,
            }
        );
    }

    #[test]
    fn empty_window_is_an_error() {
        let empty: [f64; 0] = [];
        let window = AhuWindow::new().with(Channel::SupplyAirTemp, &empty);

        assert_eq!(
            window.samples_for(&[Channel::SupplyAirTemp]),
            Err(FddError::EmptyWindow)
        );
    }

    #[test]
    fn sample_reads_attached_and_nan_for_absent() {
        let tsa = [13.0, 14.0];
        let window = AhuWindow::new().with(Channel::SupplyAirTemp, &tsa);

        let row = window.sample(1);
        assert_eq!(row.tsa, 14.0);
        assert!(row.tma.is_nan());
    }

    #[test]
    fn check_lengths_rejects_empty_set() {
        assert_eq!(check_lengths(&[]), Err(FddError::EmptyWindow));
    }
}
