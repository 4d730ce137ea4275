// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    error::{Error, Result},
    sdk::Sdk,
    status::{self, Contract},
    thermal::{PaletteImage, ThermalImage},
};
use irimager_sys::IrImagerLib;
use ndarray::{Array2, Array3};
use parking_lot::Mutex;
use std::{
    ffi::{CString, OsStr, OsString},
    sync::atomic::{AtomicBool, Ordering},
};
use tracing::{debug, instrument, warn};

/// Set while a handle bound to the real SDK exists.
static SESSION_OPEN: AtomicBool = AtomicBool::new(false);

/// Releases [`SESSION_OPEN`] when the owning handle is dropped.
#[derive(Debug)]
struct SessionClaim;

impl SessionClaim {
    fn acquire() -> Result<Self> {
        if SESSION_OPEN.swap(true, Ordering::AcqRel) {
            return Err(Error::SessionInUse);
        }
        Ok(SessionClaim)
    }
}

impl Drop for SessionClaim {
    fn drop(&mut self) {
        SESSION_OPEN.store(false, Ordering::Release);
    }
}

/// Safe handle to the IRImager Direct-SDK.
///
/// The SDK keeps a single implicit camera session per process and makes no
/// thread-safety promises, so every call goes through one mutex owned by the
/// handle. Calls block for as long as the SDK blocks; there is no timeout.
///
/// Dropping the handle terminates the session once. [`IrImager::shutdown`]
/// does the same for handles that live in a `static` and are never dropped.
///
/// # Example
///
/// ```no_run
/// use irimager::{IrImager, Palette};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let imager = IrImager::open_default()?;
/// imager.tcp_init("localhost", 1337)?;
/// imager.set_palette(Palette::Iron)?;
///
/// let thermal = imager.thermal_image()?;
/// let (height, width) = thermal.dim();
/// println!("{width}x{height} thermal frame");
/// # Ok(())
/// # }
/// ```
pub struct IrImager<S: Sdk = IrImagerLib> {
    sdk: Mutex<S>,
    shut_down: AtomicBool,
    _claim: Option<SessionClaim>,
}

impl IrImager<IrImagerLib> {
    /// Loads the SDK from `path` and claims the process-wide session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionInUse`] if another handle bound to the SDK is
    /// alive, or [`Error::Library`] if the library or one of its symbols cannot
    /// be loaded.
    pub fn open<P: AsRef<OsStr>>(path: P) -> Result<Self> {
        let claim = SessionClaim::acquire()?;
        let lib = unsafe { IrImagerLib::new(path.as_ref()) }?;
        debug!(path = ?path.as_ref(), "IRImager library loaded");
        Ok(Self {
            sdk: Mutex::new(lib),
            shut_down: AtomicBool::new(false),
            _claim: Some(claim),
        })
    }

    /// Loads the SDK from `$IRIMAGER_LIB`, falling back to the platform's
    /// default library name.
    pub fn open_default() -> Result<Self> {
        Self::open(library_path())
    }
}

/// Library path taken from `$IRIMAGER_LIB` or [`irimager_sys::DEFAULT_LIBRARY`].
pub fn library_path() -> OsString {
    std::env::var_os(irimager_sys::LIBRARY_ENV)
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| OsString::from(irimager_sys::DEFAULT_LIBRARY))
}

fn c_string(name: &str, value: &str) -> Result<CString> {
    CString::new(value)
        .map_err(|_| Error::BadArguments(format!("{name} must not contain NUL bytes")))
}

/// Validates SDK-reported dimensions and returns the buffer length for
/// `channels` values per pixel.
fn buffer_len(op: &'static str, width: i32, height: i32, channels: usize) -> Result<usize> {
    let invalid = || Error::InvalidSize { op, width, height };
    let w = usize::try_from(width).map_err(|_| invalid())?;
    let h = usize::try_from(height).map_err(|_| invalid())?;
    w.checked_mul(h)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(invalid)
}

/// Allocates a zeroed buffer of exactly `len` elements, reporting allocation
/// failure instead of aborting.
fn alloc<T: Copy + Default>(op: &'static str, len: usize) -> Result<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| Error::OutOfMemory {
        op,
        bytes: len.saturating_mul(std::mem::size_of::<T>()),
    })?;
    data.resize(len, T::default());
    Ok(data)
}

impl<S: Sdk> IrImager<S> {
    /// Wraps an arbitrary [`Sdk`] implementation. No session claim is taken.
    pub fn with_sdk(sdk: S) -> Self {
        Self {
            sdk: Mutex::new(sdk),
            shut_down: AtomicBool::new(false),
            _claim: None,
        }
    }

    fn call(&self, contract: Contract, f: impl FnOnce(&mut S) -> i32) -> Result<()> {
        let code = f(&mut self.sdk.lock());
        contract.check(code)
    }

    /// Initializes a camera connected over USB.
    ///
    /// `formats_def` and `log_file` default to the SDK's own values when
    /// `None`.
    pub fn usb_init(
        &self,
        xml_config: &str,
        formats_def: Option<&str>,
        log_file: Option<&str>,
    ) -> Result<()> {
        let xml_config = c_string("xml_config", xml_config)?;
        let formats_def = formats_def
            .map(|s| c_string("formats_def", s))
            .transpose()?;
        let log_file = log_file.map(|s| c_string("log_file", s)).transpose()?;
        self.call(status::USB_INIT, |sdk| {
            sdk.usb_init(&xml_config, formats_def.as_deref(), log_file.as_deref())
        })
    }

    /// Connects to the IRImager daemon over TCP.
    pub fn tcp_init(&self, ip: &str, port: i32) -> Result<()> {
        let ip = c_string("ip", ip)?;
        self.call(status::TCP_INIT, |sdk| sdk.tcp_init(&ip, port))
    }

    /// Disconnects the camera, USB or TCP.
    pub fn terminate(&self) -> Result<()> {
        self.call(status::TERMINATE, |sdk| sdk.terminate())
    }

    /// Width and height of the thermal image.
    pub fn thermal_image_size(&self) -> Result<(i32, i32)> {
        let (mut width, mut height) = (0, 0);
        self.call(status::THERMAL_IMAGE_SIZE, |sdk| {
            sdk.thermal_image_size(&mut width, &mut height)
        })?;
        Ok((width, height))
    }

    /// Width and height of the false-color palette image.
    pub fn palette_image_size(&self) -> Result<(i32, i32)> {
        let (mut width, mut height) = (0, 0);
        self.call(status::PALETTE_IMAGE_SIZE, |sdk| {
            sdk.palette_image_size(&mut width, &mut height)
        })?;
        Ok((width, height))
    }

    /// Grabs a thermal image of shape `(height, width)`.
    ///
    /// The size query and the fill happen under one lock so the buffer always
    /// matches the dimensions the SDK fills. The returned array owns the
    /// buffer the SDK wrote into. A failed size query is reported with this
    /// call's contract, so a `-2` from it is [`Error::Fatal`].
    #[instrument(skip_all, level = "trace")]
    pub fn thermal_image(&self) -> Result<ThermalImage> {
        let op = status::THERMAL_IMAGE.op;
        let mut sdk = self.sdk.lock();

        let (mut width, mut height) = (0, 0);
        let code = sdk.thermal_image_size(&mut width, &mut height);
        status::THERMAL_IMAGE.check(code)?;

        let len = buffer_len(op, width, height, 1)?;
        let mut data = alloc::<u16>(op, len)?;
        let (w, h) = (width, height);
        let code = sdk.thermal_image(&mut width, &mut height, &mut data);
        drop(sdk);
        status::THERMAL_IMAGE.check(code)?;
        if (width, height) != (w, h) {
            warn!(op, width, height, "SDK reported a different size after filling");
        }

        Array2::from_shape_vec((h as usize, w as usize), data).map_err(|_| Error::InvalidSize {
            op,
            width: w,
            height: h,
        })
    }

    /// Grabs a false-color image of shape `(height, width, 3)`, RGB
    /// interleaved.
    #[instrument(skip_all, level = "trace")]
    pub fn palette_image(&self) -> Result<PaletteImage> {
        let op = status::PALETTE_IMAGE.op;
        let mut sdk = self.sdk.lock();

        let (mut width, mut height) = (0, 0);
        let code = sdk.palette_image_size(&mut width, &mut height);
        status::PALETTE_IMAGE.check(code)?;

        let len = buffer_len(op, width, height, 3)?;
        let mut data = alloc::<u8>(op, len)?;
        let (w, h) = (width, height);
        let code = sdk.palette_image(&mut width, &mut height, &mut data);
        drop(sdk);
        status::PALETTE_IMAGE.check(code)?;
        if (width, height) != (w, h) {
            warn!(op, width, height, "SDK reported a different size after filling");
        }

        Array3::from_shape_vec((h as usize, w as usize, 3), data).map_err(|_| {
            Error::InvalidSize {
                op,
                width: w,
                height: h,
            }
        })
    }

    /// Selects the false-color palette, see [`crate::Palette`].
    pub fn set_palette(&self, id: impl Into<i32>) -> Result<()> {
        let id = id.into();
        self.call(status::SET_PALETTE, |sdk| sdk.set_palette(id))
    }

    /// Selects the palette scaling method, see [`crate::PaletteScale`].
    pub fn set_palette_scale(&self, scale: impl Into<i32>) -> Result<()> {
        let scale = scale.into();
        self.call(status::SET_PALETTE_SCALE, |sdk| sdk.set_palette_scale(scale))
    }

    /// `0` for manual shutter control, `1` for automatic.
    pub fn set_shutter_mode(&self, mode: impl Into<i32>) -> Result<()> {
        let mode = mode.into();
        self.call(status::SET_SHUTTER_MODE, |sdk| sdk.set_shutter_mode(mode))
    }

    pub fn trigger_shutter_flag(&self) -> Result<()> {
        self.call(status::TRIGGER_SHUTTER_FLAG, |sdk| sdk.trigger_shutter_flag())
    }

    /// Sets the camera's temperature range in whole degrees Celsius.
    pub fn set_temperature_range(&self, t_min: i32, t_max: i32) -> Result<()> {
        self.call(status::SET_TEMPERATURE_RANGE, |sdk| {
            sdk.set_temperature_range(t_min, t_max)
        })
    }

    /// Sets emissivity and transmissivity (both `[0, 1]`) and the ambient
    /// temperature. An ambient temperature below -273.15 makes the SDK use its
    /// own measurement. Ranges are checked by the SDK.
    pub fn set_radiation_parameters(
        &self,
        emissivity: f32,
        transmissivity: f32,
        t_ambient: f32,
    ) -> Result<()> {
        self.call(status::SET_RADIATION_PARAMETERS, |sdk| {
            sdk.set_radiation_parameters(emissivity, transmissivity, t_ambient)
        })
    }

    /// Moves the focus motor to `percent`. The SDK reports a camera without a
    /// focus motor the same way as any other failure.
    pub fn set_focus_motor_position(&self, percent: f32) -> Result<()> {
        self.call(status::SET_FOCUS_MOTOR_POSITION, |sdk| {
            sdk.set_focusmotor_pos(percent)
        })
    }

    /// Current focus motor position in percent; negative if the camera has
    /// no focus motor.
    pub fn focus_motor_position(&self) -> Result<f32> {
        let mut pos = 0.0;
        self.call(status::GET_FOCUS_MOTOR_POSITION, |sdk| {
            sdk.get_focusmotor_pos(&mut pos)
        })?;
        Ok(pos)
    }

    pub fn daemon_launch(&self) -> Result<()> {
        self.call(status::DAEMON_LAUNCH, |sdk| sdk.daemon_launch())
    }

    pub fn daemon_is_running(&self) -> Result<bool> {
        let code = self.sdk.lock().daemon_is_running();
        status::daemon_running(code)
    }

    pub fn daemon_kill(&self) -> Result<()> {
        self.call(status::DAEMON_KILL, |sdk| sdk.daemon_kill())
    }

    /// Releases the SDK session. Only the first call reaches the SDK; later
    /// calls return `Ok(())`.
    ///
    /// # Errors
    ///
    /// The status of the teardown `terminate` call, checked like
    /// [`IrImager::terminate`] and logged at `warn`.
    pub fn shutdown(&self) -> Result<()> {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let code = self.sdk.lock().terminate();
        match status::TERMINATE.check(code) {
            Ok(()) => {
                debug!("IRImager session terminated");
                Ok(())
            }
            Err(e) => {
                warn!("IRImager teardown failed: {e}");
                Err(e)
            }
        }
    }
}

impl<S: Sdk> Drop for IrImager<S> {
    fn drop(&mut self) {
        // Already logged by shutdown.
        let _ = self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_lengths() {
        assert_eq!(buffer_len("t", 382, 288, 1).unwrap(), 110016);
        assert_eq!(buffer_len("t", 382, 288, 3).unwrap(), 330048);
        assert_eq!(buffer_len("t", 0, 288, 3).unwrap(), 0);
        assert!(matches!(
            buffer_len("t", -1, 288, 1),
            Err(Error::InvalidSize { width: -1, .. })
        ));
    }

    #[test]
    fn alloc_is_exact() {
        let data = alloc::<u16>("t", 12).unwrap();
        assert_eq!(data.len(), 12);
        assert!(data.iter().all(|&s| s == 0));
    }

    #[test]
    fn nul_bytes_rejected() {
        assert!(matches!(
            c_string("ip", "local\0host"),
            Err(Error::BadArguments(_))
        ));
    }
}
