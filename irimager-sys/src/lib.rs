// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Raw bindings for the IRImager Direct-SDK (`libirimager`).
//!
//! The SDK is loaded at runtime so that builds do not require the vendor
//! headers or import libraries. Every `evo_irimager_*` entry point is resolved
//! when [`IrImagerLib`] is constructed; a missing symbol fails construction
//! rather than the first call.
//!
//! All functions return an integer status: `0` on success, `-1` on error and,
//! for calls that can go over the daemon TCP link, `-2` on fatal error.

#![allow(non_camel_case_types)]

use libc::{c_char, c_float, c_int, c_uchar, c_ushort};
use std::ffi::OsStr;

pub use libloading::Error as LoadError;

/// Default library name searched by the dynamic loader.
#[cfg(windows)]
pub const DEFAULT_LIBRARY: &str = "libirimager.dll";

/// Default library name searched by the dynamic loader.
#[cfg(not(windows))]
pub const DEFAULT_LIBRARY: &str = "libirimager.so";

/// Environment variable overriding [`DEFAULT_LIBRARY`].
pub const LIBRARY_ENV: &str = "IRIMAGER_LIB";

pub type evo_irimager_usb_init_fn =
    unsafe extern "C" fn(*const c_char, *const c_char, *const c_char) -> c_int;
pub type evo_irimager_tcp_init_fn = unsafe extern "C" fn(*const c_char, c_int) -> c_int;
pub type evo_irimager_void_fn = unsafe extern "C" fn() -> c_int;
pub type evo_irimager_size_fn = unsafe extern "C" fn(*mut c_int, *mut c_int) -> c_int;
pub type evo_irimager_get_thermal_image_fn =
    unsafe extern "C" fn(*mut c_int, *mut c_int, *mut c_ushort) -> c_int;
pub type evo_irimager_get_palette_image_fn =
    unsafe extern "C" fn(*mut c_int, *mut c_int, *mut c_uchar) -> c_int;
pub type evo_irimager_int_fn = unsafe extern "C" fn(c_int) -> c_int;
pub type evo_irimager_int2_fn = unsafe extern "C" fn(c_int, c_int) -> c_int;
pub type evo_irimager_set_radiation_parameters_fn =
    unsafe extern "C" fn(c_float, c_float, c_float) -> c_int;
pub type evo_irimager_set_focusmotor_pos_fn = unsafe extern "C" fn(c_float) -> c_int;
pub type evo_irimager_get_focusmotor_pos_fn = unsafe extern "C" fn(*mut c_float) -> c_int;

/// Handle to a loaded `libirimager` with every entry point resolved.
///
/// The library keeps one implicit camera session per process. This type does
/// nothing to serialize access; callers must.
pub struct IrImagerLib {
    __library: libloading::Library,
    pub evo_irimager_usb_init: evo_irimager_usb_init_fn,
    pub evo_irimager_tcp_init: evo_irimager_tcp_init_fn,
    pub evo_irimager_terminate: evo_irimager_void_fn,
    pub evo_irimager_get_thermal_image_size: evo_irimager_size_fn,
    pub evo_irimager_get_palette_image_size: evo_irimager_size_fn,
    pub evo_irimager_get_thermal_image: evo_irimager_get_thermal_image_fn,
    pub evo_irimager_get_palette_image: evo_irimager_get_palette_image_fn,
    pub evo_irimager_set_palette: evo_irimager_int_fn,
    pub evo_irimager_set_palette_scale: evo_irimager_int_fn,
    pub evo_irimager_set_shutter_mode: evo_irimager_int_fn,
    pub evo_irimager_trigger_shutter_flag: evo_irimager_void_fn,
    pub evo_irimager_set_temperature_range: evo_irimager_int2_fn,
    pub evo_irimager_set_radiation_parameters: evo_irimager_set_radiation_parameters_fn,
    pub evo_irimager_set_focusmotor_pos: evo_irimager_set_focusmotor_pos_fn,
    pub evo_irimager_get_focusmotor_pos: evo_irimager_get_focusmotor_pos_fn,
    pub evo_irimager_daemon_launch: evo_irimager_void_fn,
    pub evo_irimager_daemon_is_running: evo_irimager_void_fn,
    pub evo_irimager_daemon_kill: evo_irimager_void_fn,
}

/// Resolve `name` (NUL-terminated) and copy the function pointer out of the
/// symbol. The pointer stays valid for as long as `library` is loaded.
unsafe fn symbol<T: Copy>(library: &libloading::Library, name: &[u8]) -> Result<T, LoadError> {
    library.get::<T>(name).map(|sym| *sym)
}

impl IrImagerLib {
    /// Loads the SDK from `path` and resolves every entry point.
    ///
    /// # Safety
    ///
    /// Loading a shared library runs its initialisers. The library at `path`
    /// must be an IRImager Direct-SDK build whose exported functions match the
    /// signatures declared in this crate.
    pub unsafe fn new<P>(path: P) -> Result<Self, LoadError>
    where
        P: AsRef<OsStr>,
    {
        let library = libloading::Library::new(path)?;
        Self::from_library(library)
    }

    /// Resolves every entry point from an already loaded library.
    ///
    /// # Safety
    ///
    /// See [`IrImagerLib::new`].
    pub unsafe fn from_library<L>(library: L) -> Result<Self, LoadError>
    where
        L: Into<libloading::Library>,
    {
        let __library = library.into();
        Ok(IrImagerLib {
            evo_irimager_usb_init: symbol(&__library, b"evo_irimager_usb_init\0")?,
            evo_irimager_tcp_init: symbol(&__library, b"evo_irimager_tcp_init\0")?,
            evo_irimager_terminate: symbol(&__library, b"evo_irimager_terminate\0")?,
            evo_irimager_get_thermal_image_size: symbol(
                &__library,
                b"evo_irimager_get_thermal_image_size\0",
            )?,
            evo_irimager_get_palette_image_size: symbol(
                &__library,
                b"evo_irimager_get_palette_image_size\0",
            )?,
            evo_irimager_get_thermal_image: symbol(
                &__library,
                b"evo_irimager_get_thermal_image\0",
            )?,
            evo_irimager_get_palette_image: symbol(
                &__library,
                b"evo_irimager_get_palette_image\0",
            )?,
            evo_irimager_set_palette: symbol(&__library, b"evo_irimager_set_palette\0")?,
            evo_irimager_set_palette_scale: symbol(
                &__library,
                b"evo_irimager_set_palette_scale\0",
            )?,
            evo_irimager_set_shutter_mode: symbol(
                &__library,
                b"evo_irimager_set_shutter_mode\0",
            )?,
            evo_irimager_trigger_shutter_flag: symbol(
                &__library,
                b"evo_irimager_trigger_shutter_flag\0",
            )?,
            evo_irimager_set_temperature_range: symbol(
                &__library,
                b"evo_irimager_set_temperature_range\0",
            )?,
            evo_irimager_set_radiation_parameters: symbol(
                &__library,
                b"evo_irimager_set_radiation_parameters\0",
            )?,
            evo_irimager_set_focusmotor_pos: symbol(
                &__library,
                b"evo_irimager_set_focusmotor_pos\0",
            )?,
            evo_irimager_get_focusmotor_pos: symbol(
                &__library,
                b"evo_irimager_get_focusmotor_pos\0",
            )?,
            evo_irimager_daemon_launch: symbol(&__library, b"evo_irimager_daemon_launch\0")?,
            evo_irimager_daemon_is_running: symbol(
                &__library,
                b"evo_irimager_daemon_is_running\0",
            )?,
            evo_irimager_daemon_kill: symbol(&__library, b"evo_irimager_daemon_kill\0")?,
            __library,
        })
    }

    /// Initializes an IRImager connected via USB.
    ///
    /// `formats_def` and `log_file` may be null to use the SDK defaults.
    pub unsafe fn evo_irimager_usb_init(
        &self,
        xml_config: *const c_char,
        formats_def: *const c_char,
        log_file: *const c_char,
    ) -> c_int {
        (self.evo_irimager_usb_init)(xml_config, formats_def, log_file)
    }

    /// Initializes the TCP connection to the daemon process.
    pub unsafe fn evo_irimager_tcp_init(&self, ip: *const c_char, port: c_int) -> c_int {
        (self.evo_irimager_tcp_init)(ip, port)
    }

    pub unsafe fn evo_irimager_terminate(&self) -> c_int {
        (self.evo_irimager_terminate)()
    }

    pub unsafe fn evo_irimager_get_thermal_image_size(&self, w: *mut c_int, h: *mut c_int) -> c_int {
        (self.evo_irimager_get_thermal_image_size)(w, h)
    }

    pub unsafe fn evo_irimager_get_palette_image_size(&self, w: *mut c_int, h: *mut c_int) -> c_int {
        (self.evo_irimager_get_palette_image_size)(w, h)
    }

    /// Fills `data` with `w * h` thermal samples.
    ///
    /// # Safety
    ///
    /// `data` must point to at least `w * h` writable `c_ushort`s.
    pub unsafe fn evo_irimager_get_thermal_image(
        &self,
        w: *mut c_int,
        h: *mut c_int,
        data: *mut c_ushort,
    ) -> c_int {
        (self.evo_irimager_get_thermal_image)(w, h, data)
    }

    /// Fills `data` with `w * h` RGB pixels.
    ///
    /// # Safety
    ///
    /// `data` must point to at least `3 * w * h` writable bytes.
    pub unsafe fn evo_irimager_get_palette_image(
        &self,
        w: *mut c_int,
        h: *mut c_int,
        data: *mut c_uchar,
    ) -> c_int {
        (self.evo_irimager_get_palette_image)(w, h, data)
    }

    pub unsafe fn evo_irimager_set_palette(&self, id: c_int) -> c_int {
        (self.evo_irimager_set_palette)(id)
    }

    pub unsafe fn evo_irimager_set_palette_scale(&self, scale: c_int) -> c_int {
        (self.evo_irimager_set_palette_scale)(scale)
    }

    pub unsafe fn evo_irimager_set_shutter_mode(&self, mode: c_int) -> c_int {
        (self.evo_irimager_set_shutter_mode)(mode)
    }

    pub unsafe fn evo_irimager_trigger_shutter_flag(&self) -> c_int {
        (self.evo_irimager_trigger_shutter_flag)()
    }

    pub unsafe fn evo_irimager_set_temperature_range(&self, t_min: c_int, t_max: c_int) -> c_int {
        (self.evo_irimager_set_temperature_range)(t_min, t_max)
    }

    pub unsafe fn evo_irimager_set_radiation_parameters(
        &self,
        emissivity: c_float,
        transmissivity: c_float,
        t_ambient: c_float,
    ) -> c_int {
        (self.evo_irimager_set_radiation_parameters)(emissivity, transmissivity, t_ambient)
    }

    pub unsafe fn evo_irimager_set_focusmotor_pos(&self, pos: c_float) -> c_int {
        (self.evo_irimager_set_focusmotor_pos)(pos)
    }

    pub unsafe fn evo_irimager_get_focusmotor_pos(&self, pos_out: *mut c_float) -> c_int {
        (self.evo_irimager_get_focusmotor_pos)(pos_out)
    }

    pub unsafe fn evo_irimager_daemon_launch(&self) -> c_int {
        (self.evo_irimager_daemon_launch)()
    }

    pub unsafe fn evo_irimager_daemon_is_running(&self) -> c_int {
        (self.evo_irimager_daemon_is_running)()
    }

    pub unsafe fn evo_irimager_daemon_kill(&self) -> c_int {
        (self.evo_irimager_daemon_kill)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_is_an_error() {
        let res = unsafe { IrImagerLib::new("libirimager-does-not-exist.so") };
        assert!(res.is_err());
    }
}
