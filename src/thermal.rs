// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Image types returned by the SDK and thermal sample conversion.
//!
//! Thermal samples are unsigned 16-bit values encoding `(s - 1000) / 10`
//! degrees Celsius.

use ndarray::{Array2, Array3, ArrayView2};

/// Thermal samples, shape `(height, width)`.
pub type ThermalImage = Array2<u16>;

/// RGB false-color image, shape `(height, width, 3)`.
pub type PaletteImage = Array3<u8>;

const SAMPLE_OFFSET: f32 = 1000.0;
const SAMPLE_SCALE: f32 = 10.0;

/// Converts one thermal sample to degrees Celsius.
#[inline]
pub fn sample_to_celsius(sample: u16) -> f32 {
    (f32::from(sample) - SAMPLE_OFFSET) / SAMPLE_SCALE
}

/// Converts degrees Celsius to the nearest thermal sample, saturating at the
/// ends of the `u16` range.
pub fn celsius_to_sample(celsius: f32) -> u16 {
    let sample = (celsius * SAMPLE_SCALE + SAMPLE_OFFSET).round();
    sample.clamp(0.0, f32::from(u16::MAX)) as u16
}

/// Converts a whole thermal image to degrees Celsius.
pub fn to_celsius(image: ArrayView2<'_, u16>) -> Array2<f32> {
    image.mapv(sample_to_celsius)
}

/// Summary statistics of a thermal image in degrees Celsius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TemperatureStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

impl TemperatureStats {
    /// Returns `None` for an empty image.
    pub fn of(image: ArrayView2<'_, u16>) -> Option<Self> {
        if image.is_empty() {
            return None;
        }
        let mut min = u16::MAX;
        let mut max = u16::MIN;
        let mut sum = 0u64;
        for &s in image.iter() {
            min = min.min(s);
            max = max.max(s);
            sum += u64::from(s);
        }
        let mean = sum as f64 / image.len() as f64;
        Some(Self {
            min: sample_to_celsius(min),
            max: sample_to_celsius(max),
            mean: ((mean - f64::from(SAMPLE_OFFSET)) / f64::from(SAMPLE_SCALE)) as f32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn conversion() {
        assert_eq!(sample_to_celsius(1000), 0.0);
        assert_eq!(sample_to_celsius(1250), 25.0);
        assert_eq!(sample_to_celsius(0), -100.0);
        assert_eq!(celsius_to_sample(25.0), 1250);
        assert_eq!(celsius_to_sample(-200.0), 0);
        assert_eq!(celsius_to_sample(7000.0), u16::MAX);
    }

    #[test]
    fn stats() {
        let img = array![[1000u16, 1100], [1200, 1300]];
        let stats = TemperatureStats::of(img.view()).unwrap();
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 30.0);
        assert!((stats.mean - 15.0).abs() < 1e-4);

        let celsius = to_celsius(img.view());
        assert_eq!(celsius[[1, 0]], 20.0);

        let empty = ThermalImage::zeros((0, 0));
        assert!(TemperatureStats::of(empty.view()).is_none());
    }
}
