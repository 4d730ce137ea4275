// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::thermal::PaletteImage;
use std::{error::Error, io};
use turbojpeg::OwnedBuf;

/// Encodes an RGB palette image to JPEG using turbojpeg.
///
/// # Arguments
///
/// * `img` - Palette image of shape `(height, width, 3)`
/// * `quality` - JPEG quality, 1 to 100
///
/// # Errors
///
/// Returns an error if the image does not have three channels or if
/// compression fails.
///
/// # Example
///
/// ```no_run
/// use irimager::{jpeg::encode_jpeg, IrImager};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let imager = IrImager::open_default()?;
/// imager.tcp_init("localhost", 1337)?;
/// let jpeg = encode_jpeg(&imager.palette_image()?, 90)?;
/// std::fs::write("frame.jpg", &jpeg)?;
/// # Ok(())
/// # }
/// ```
pub fn encode_jpeg(img: &PaletteImage, quality: i32) -> Result<OwnedBuf, Box<dyn Error>> {
    let (height, width, channels) = img.dim();
    if channels != 3 {
        return Err(Box::new(io::Error::new(
            io::ErrorKind::InvalidInput,
            "palette image must have 3 channels",
        )));
    }
    let pixels = img.as_standard_layout();
    let pixels = match pixels.as_slice() {
        Some(p) => p,
        None => {
            return Err(Box::new(io::Error::new(
                io::ErrorKind::InvalidInput,
                "palette image is not contiguous",
            )));
        }
    };

    let image = turbojpeg::Image {
        pixels,
        width,
        pitch: width * 3,
        height,
        format: turbojpeg::PixelFormat::RGB,
    };

    let res = turbojpeg::compress(image, quality, turbojpeg::Subsamp::Sub2x2);
    match res {
        Ok(buf) => Ok(buf),
        Err(e) => Err(Box::new(e)),
    }
}
