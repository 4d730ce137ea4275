// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Rendering constants defined by the Direct-SDK.
//!
//! The SDK takes these as plain integers and validates them itself; the
//! enums exist so Rust callers do not have to remember the numbers.

/// False-color palettes (`EnumOptrisColoringPalette`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum Palette {
    AlarmBlue = 1,
    AlarmBlueHi = 2,
    GrayBW = 3,
    GrayWB = 4,
    AlarmGreen = 5,
    Iron = 6,
    IronHi = 7,
    Medical = 8,
    Rainbow = 9,
    RainbowHi = 10,
    AlarmRed = 11,
}

/// Palette scaling methods (`EnumOptrisPaletteScalingMethod`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum PaletteScale {
    /// Use the range given to `set_temperature_range`.
    Manual = 1,
    MinMax = 2,
    Sigma1 = 3,
    Sigma3 = 4,
}

/// Shutter flag control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum ShutterMode {
    Manual = 0,
    Auto = 1,
}

impl From<Palette> for i32 {
    fn from(value: Palette) -> Self {
        value as i32
    }
}

impl From<PaletteScale> for i32 {
    fn from(value: PaletteScale) -> Self {
        value as i32
    }
}

impl From<ShutterMode> for i32 {
    fn from(value: ShutterMode) -> Self {
        value as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sdk_values() {
        assert_eq!(i32::from(Palette::Iron), 6);
        assert_eq!(i32::from(Palette::AlarmRed), 11);
        assert_eq!(i32::from(PaletteScale::Sigma3), 4);
        assert_eq!(i32::from(ShutterMode::Auto), 1);
        assert_eq!(i32::from(PaletteScale::Manual), 1);
        assert_eq!(i32::from(ShutterMode::Manual), 0);
    }
}
