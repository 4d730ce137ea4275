// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! # IRImager Library
//!
//! Safe bindings for the IRImager Direct-SDK used by Optris thermal cameras.
//! The SDK owns camera communication, palette rendering, calibration and the
//! TCP daemon; this library marshals calls into it, maps its integer status
//! codes to typed errors and hands image buffers to the caller without
//! copying.
//!
//! ## Features
//!
//! - **Single-owner session**: [`IrImager`] serializes every SDK call behind
//!   one lock, and only one handle bound to the vendor library may exist per
//!   process.
//! - **Owned image buffers**: thermal and palette frames are returned as
//!   `ndarray` arrays that own the buffer the SDK filled.
//! - **Scripting surface**: [`script`] validates loosely-typed arguments
//!   before anything reaches the SDK.
//! - **Python module** (feature `python`): the same entry points as a NumPy
//!   aware extension module.
//!
//! ## Example
//!
//! ```no_run
//! use irimager::{thermal::TemperatureStats, IrImager, Palette, PaletteScale};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let imager = IrImager::open_default()?;
//! imager.usb_init("generic.xml", None, None)?;
//! imager.set_palette(Palette::Iron)?;
//! imager.set_palette_scale(PaletteScale::MinMax)?;
//!
//! let thermal = imager.thermal_image()?;
//! if let Some(stats) = TemperatureStats::of(thermal.view()) {
//!     println!("min {:.1} max {:.1}", stats.min, stats.max);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Safety
//!
//! `unsafe` code is limited to loading the vendor library in
//! [`IrImager::open`] and to [`sdk`], which forwards to the function pointers
//! resolved by `irimager-sys` after checking buffer lengths.

pub mod error;
pub mod imager;
#[cfg(feature = "jpeg")]
pub mod jpeg;
pub mod palette;
#[cfg(feature = "python")]
mod python;
pub mod script;
pub mod sdk;
pub mod status;
pub mod thermal;

pub use error::{Error, Result};
pub use imager::{library_path, IrImager};
pub use palette::{Palette, PaletteScale, ShutterMode};
pub use sdk::Sdk;
pub use thermal::{PaletteImage, ThermalImage};
