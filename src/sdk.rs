// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! The seam between the safe handle and the native SDK.
//!
//! [`Sdk`] mirrors the `evo_irimager_*` entry points one-to-one and returns
//! the raw status. It is implemented for [`IrImagerLib`]; tests substitute a
//! recording stub.

use irimager_sys::IrImagerLib;
use std::{ffi::CStr, ptr::null};

/// One method per native call. Statuses are returned untouched.
pub trait Sdk: Send {
    fn usb_init(
        &mut self,
        xml_config: &CStr,
        formats_def: Option<&CStr>,
        log_file: Option<&CStr>,
    ) -> i32;
    fn tcp_init(&mut self, ip: &CStr, port: i32) -> i32;
    fn terminate(&mut self) -> i32;
    fn thermal_image_size(&mut self, width: &mut i32, height: &mut i32) -> i32;
    fn palette_image_size(&mut self, width: &mut i32, height: &mut i32) -> i32;

    /// `data` holds exactly `width * height` samples.
    fn thermal_image(&mut self, width: &mut i32, height: &mut i32, data: &mut [u16]) -> i32;

    /// `data` holds exactly `width * height * 3` bytes.
    fn palette_image(&mut self, width: &mut i32, height: &mut i32, data: &mut [u8]) -> i32;

    fn set_palette(&mut self, id: i32) -> i32;
    fn set_palette_scale(&mut self, scale: i32) -> i32;
    fn set_shutter_mode(&mut self, mode: i32) -> i32;
    fn trigger_shutter_flag(&mut self) -> i32;
    fn set_temperature_range(&mut self, t_min: i32, t_max: i32) -> i32;
    fn set_radiation_parameters(
        &mut self,
        emissivity: f32,
        transmissivity: f32,
        t_ambient: f32,
    ) -> i32;
    fn set_focusmotor_pos(&mut self, pos: f32) -> i32;
    fn get_focusmotor_pos(&mut self, pos: &mut f32) -> i32;
    fn daemon_launch(&mut self) -> i32;
    fn daemon_is_running(&mut self) -> i32;
    fn daemon_kill(&mut self) -> i32;
}

fn required(width: i32, height: i32, channels: usize) -> usize {
    let width = usize::try_from(width).unwrap_or(0);
    let height = usize::try_from(height).unwrap_or(0);
    width.saturating_mul(height).saturating_mul(channels)
}

impl Sdk for IrImagerLib {
    fn usb_init(
        &mut self,
        xml_config: &CStr,
        formats_def: Option<&CStr>,
        log_file: Option<&CStr>,
    ) -> i32 {
        unsafe {
            self.evo_irimager_usb_init(
                xml_config.as_ptr(),
                formats_def.map_or(null(), CStr::as_ptr),
                log_file.map_or(null(), CStr::as_ptr),
            )
        }
    }

    fn tcp_init(&mut self, ip: &CStr, port: i32) -> i32 {
        unsafe { self.evo_irimager_tcp_init(ip.as_ptr(), port) }
    }

    fn terminate(&mut self) -> i32 {
        unsafe { self.evo_irimager_terminate() }
    }

    fn thermal_image_size(&mut self, width: &mut i32, height: &mut i32) -> i32 {
        unsafe { self.evo_irimager_get_thermal_image_size(width, height) }
    }

    fn palette_image_size(&mut self, width: &mut i32, height: &mut i32) -> i32 {
        unsafe { self.evo_irimager_get_palette_image_size(width, height) }
    }

    fn thermal_image(&mut self, width: &mut i32, height: &mut i32, data: &mut [u16]) -> i32 {
        // The SDK writes width * height samples with no length check of its own.
        assert!(data.len() >= required(*width, *height, 1));
        unsafe { self.evo_irimager_get_thermal_image(width, height, data.as_mut_ptr()) }
    }

    fn palette_image(&mut self, width: &mut i32, height: &mut i32, data: &mut [u8]) -> i32 {
        assert!(data.len() >= required(*width, *height, 3));
        unsafe { self.evo_irimager_get_palette_image(width, height, data.as_mut_ptr()) }
    }

    fn set_palette(&mut self, id: i32) -> i32 {
        unsafe { self.evo_irimager_set_palette(id) }
    }

    fn set_palette_scale(&mut self, scale: i32) -> i32 {
        unsafe { self.evo_irimager_set_palette_scale(scale) }
    }

    fn set_shutter_mode(&mut self, mode: i32) -> i32 {
        unsafe { self.evo_irimager_set_shutter_mode(mode) }
    }

    fn trigger_shutter_flag(&mut self) -> i32 {
        unsafe { self.evo_irimager_trigger_shutter_flag() }
    }

    fn set_temperature_range(&mut self, t_min: i32, t_max: i32) -> i32 {
        unsafe { self.evo_irimager_set_temperature_range(t_min, t_max) }
    }

    fn set_radiation_parameters(
        &mut self,
        emissivity: f32,
        transmissivity: f32,
        t_ambient: f32,
    ) -> i32 {
        unsafe { self.evo_irimager_set_radiation_parameters(emissivity, transmissivity, t_ambient) }
    }

    fn set_focusmotor_pos(&mut self, pos: f32) -> i32 {
        unsafe { self.evo_irimager_set_focusmotor_pos(pos) }
    }

    fn get_focusmotor_pos(&mut self, pos: &mut f32) -> i32 {
        unsafe { self.evo_irimager_get_focusmotor_pos(pos) }
    }

    fn daemon_launch(&mut self) -> i32 {
        unsafe { self.evo_irimager_daemon_launch() }
    }

    fn daemon_is_running(&mut self) -> i32 {
        unsafe { self.evo_irimager_daemon_is_running() }
    }

    fn daemon_kill(&mut self) -> i32 {
        unsafe { self.evo_irimager_daemon_kill() }
    }
}
