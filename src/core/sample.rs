//! Angle sample types.
//!
//! A sample is one decoded sensor record: pitch and roll, plus yaw when the
//! sensor reports three axes. Values are degrees.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single orientation axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Pitch,
    Roll,
    Yaw,
}

impl Axis {
    /// Lowercase axis name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pitch => "pitch",
            Self::Roll => "roll",
            Self::Yaw => "yaw",
        }
    }
}

/// Which axes a sensor reports, in wire order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AxisSet {
    /// Two fields: pitch, roll.
    PitchRoll,
    /// Three fields: pitch, roll, yaw.
    PitchRollYaw,
}

impl AxisSet {
    const PITCH_ROLL: [Axis; 2] = [Axis::Pitch, Axis::Roll];
    const PITCH_ROLL_YAW: [Axis; 3] = [Axis::Pitch, Axis::Roll, Axis::Yaw];

    /// Number of comma-separated fields per line.
    pub const fn field_count(self) -> usize {
        match self {
            Self::PitchRoll => 2,
            Self::PitchRollYaw => 3,
        }
    }

    /// Axes in wire order.
    pub fn axes(self) -> &'static [Axis] {
        match self {
            Self::PitchRoll => &Self::PITCH_ROLL,
            Self::PitchRollYaw => &Self::PITCH_ROLL_YAW,
        }
    }

    /// Axis set for a field count, if supported.
    pub const fn from_field_count(count: usize) -> Option<Self> {
        match count {
            2 => Some(Self::PitchRoll),
            3 => Some(Self::PitchRollYaw),
            _ => None,
        }
    }
}

impl Default for AxisSet {
    fn default() -> Self {
        Self::PitchRollYaw
    }
}

impl TryFrom<u8> for AxisSet {
    type Error = String;

    fn try_from(count: u8) -> Result<Self, Self::Error> {
        Self::from_field_count(count as usize)
            .ok_or_else(|| format!("unsupported field count {count}, expected 2 or 3"))
    }
}

impl From<AxisSet> for u8 {
    fn from(axes: AxisSet) -> Self {
        axes.field_count() as u8
    }
}

impl fmt::Display for AxisSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.axes().iter().map(|a| a.name()).collect();
        f.write_str(&names.join("/"))
    }
}

/// One decoded orientation record, in degrees.
///
/// All values are finite; the decoder never builds a sample from NaN or
/// infinite fields.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleSample {
    pub pitch: f64,
    pub roll: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaw: Option<f64>,
}

impl AngleSample {
    /// Two-axis sample.
    pub const fn new(pitch: f64, roll: f64) -> Self {
        Self { pitch, roll, yaw: None }
    }

    /// Three-axis sample.
    pub const fn with_yaw(pitch: f64, roll: f64, yaw: f64) -> Self {
        Self { pitch, roll, yaw: Some(yaw) }
    }

    /// Build from values in wire order. Returns None for counts other than 2 or 3.
    pub fn from_fields(fields: &[f64]) -> Option<Self> {
        match *fields {
            [pitch, roll] => Some(Self::new(pitch, roll)),
            [pitch, roll, yaw] => Some(Self::with_yaw(pitch, roll, yaw)),
            _ => None,
        }
    }

    /// Axes present in this sample.
    pub fn axis_set(&self) -> AxisSet {
        if self.yaw.is_some() {
            AxisSet::PitchRollYaw
        } else {
            AxisSet::PitchRoll
        }
    }

    /// Value of one axis, if present.
    pub fn get(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::Pitch => Some(self.pitch),
            Axis::Roll => Some(self.roll),
            Axis::Yaw => self.yaw,
        }
    }

    /// Values in wire order.
    pub fn values(&self) -> impl Iterator<Item = f64> {
        [Some(self.pitch), Some(self.roll), self.yaw].into_iter().flatten()
    }
}

impl fmt::Display for AngleSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pitch: {:.1}°, Roll: {:.1}°", self.pitch, self.roll)?;
        if let Some(yaw) = self.yaw {
            write!(f, ", Yaw: {:.1}°", yaw)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_set_field_counts() {
        assert_eq!(AxisSet::PitchRoll.field_count(), 2);
        assert_eq!(AxisSet::PitchRollYaw.field_count(), 3);
        assert_eq!(AxisSet::from_field_count(3), Some(AxisSet::PitchRollYaw));
        assert_eq!(AxisSet::from_field_count(4), None);
        assert_eq!(AxisSet::PitchRoll.axes(), &[Axis::Pitch, Axis::Roll]);
    }

    #[test]
    fn test_axis_set_serde() {
        let json = serde_json::to_string(&AxisSet::PitchRoll).unwrap();
        assert_eq!(json, "2");
        let axes: AxisSet = serde_json::from_str("3").unwrap();
        assert_eq!(axes, AxisSet::PitchRollYaw);
        assert!(serde_json::from_str::<AxisSet>("5").is_err());
    }

    #[test]
    fn test_sample_from_fields() {
        let s = AngleSample::from_fields(&[1.0, 2.0]).unwrap();
        assert_eq!(s.axis_set(), AxisSet::PitchRoll);
        assert_eq!(s.get(Axis::Yaw), None);

        let s = AngleSample::from_fields(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(s.get(Axis::Yaw), Some(3.0));
        assert_eq!(s.values().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);

        assert!(AngleSample::from_fields(&[1.0]).is_none());
    }

    #[test]
    fn test_sample_display() {
        assert_eq!(AngleSample::new(10.0, -3.5).to_string(), "Pitch: 10.0°, Roll: -3.5°");
        assert!(AngleSample::with_yaw(0.0, 0.0, 45.0).to_string().ends_with("Yaw: 45.0°"));
    }
}
