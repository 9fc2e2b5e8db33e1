/// Display and volume settings, edited from the Parameters menu.

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

pub const DEFAULT_VOLUME: u8 = 50;
pub const DEFAULT_FORMAT: &str = "1080x720";

/// Formats offered by the Parameters menu.
pub const FORMATS: &[&str] = &["800x600", "1080x720", "1920x1080"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    volume: u8,
    display_format: String,
    #[serde(skip)]
    displayed: bool,
}

impl Default for Parameter {
    fn default() -> Self {
        Parameter {
            volume: DEFAULT_VOLUME,
            display_format: DEFAULT_FORMAT.to_string(),
            displayed: false,
        }
    }
}

impl Parameter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Volume in percent, 0..=100.
    pub fn set_volume(&mut self, volume: i32) -> Result<(), ParameterError> {
        if !(0..=100).contains(&volume) {
            return Err(ParameterError::VolumeOutOfRange(volume));
        }
        self.volume = volume as u8;
        Ok(())
    }

    /// Screen size as `WIDTHxHEIGHT` in pixels.
    pub fn set_format(&mut self, format: &str) -> Result<(), ParameterError> {
        parse_format(format)?;
        self.display_format = format.trim().to_string();
        Ok(())
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn display_format(&self) -> &str {
        &self.display_format
    }

    pub fn width(&self) -> i32 {
        parse_format(&self.display_format).map(|(w, _)| w).unwrap_or(1080)
    }

    pub fn height(&self) -> i32 {
        parse_format(&self.display_format).map(|(_, h)| h).unwrap_or(720)
    }

    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    pub fn set_display(&mut self, displayed: bool) {
        self.displayed = displayed;
    }

    /// Next (or previous) entry of `FORMATS` after the current one.
    pub fn cycle_format(&self, delta: i32) -> &'static str {
        let n = FORMATS.len() as i32;
        let cur = FORMATS.iter()
            .position(|f| *f == self.display_format)
            .map(|i| i as i32)
            .unwrap_or(0);
        FORMATS[(cur + delta).rem_euclid(n) as usize]
    }
}

fn parse_format(format: &str) -> Result<(i32, i32), ParameterError> {
    let bad = || ParameterError::BadFormat(format.to_string());
    let (w, h) = format.trim().split_once('x').ok_or_else(bad)?;
    let w: i32 = w.parse().map_err(|_| bad())?;
    let h: i32 = h.parse().map_err(|_| bad())?;
    if w <= 0 || h <= 0 {
        return Err(bad());
    }
    Ok((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = Parameter::new();
        assert_eq!(p.volume(), 50);
        assert_eq!(p.display_format(), "1080x720");
        assert_eq!(p.width(), 1080);
        assert_eq!(p.height(), 720);
        assert!(!p.is_displayed());
    }

    #[test]
    fn volume_range_is_enforced() {
        let mut p = Parameter::new();
        assert_eq!(p.set_volume(101), Err(ParameterError::VolumeOutOfRange(101)));
        assert_eq!(p.set_volume(-1), Err(ParameterError::VolumeOutOfRange(-1)));
        assert!(p.set_volume(0).is_ok());
        assert_eq!(p.volume(), 0);
    }

    #[test]
    fn format_must_be_two_positive_numbers() {
        let mut p = Parameter::new();
        assert!(p.set_format("800x").is_err());
        assert!(p.set_format("0x600").is_err());
        assert!(p.set_format("wide").is_err());
        assert_eq!(p.display_format(), "1080x720");
        assert!(p.set_format("1920x1080").is_ok());
        assert_eq!((p.width(), p.height()), (1920, 1080));
    }

    #[test]
    fn cycle_wraps_both_ways() {
        let p = Parameter::new();
        assert_eq!(p.cycle_format(1), "1920x1080");
        assert_eq!(p.cycle_format(-1), "800x600");
        assert_eq!(p.cycle_format(2), "800x600");
    }
}
