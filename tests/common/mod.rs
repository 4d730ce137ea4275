// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Recording stand-in for the vendor SDK.

#![allow(dead_code)]

use irimager::Sdk;
use parking_lot::Mutex;
use std::{
    collections::{HashMap, VecDeque},
    ffi::CStr,
    sync::Arc,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    UsbInit {
        config: String,
        formats: Option<String>,
        log: Option<String>,
    },
    TcpInit {
        ip: String,
        port: i32,
    },
    Terminate,
    ThermalImageSize,
    PaletteImageSize,
    ThermalImage {
        width: i32,
        height: i32,
        len: usize,
    },
    PaletteImage {
        width: i32,
        height: i32,
        len: usize,
    },
    SetPalette(i32),
    SetPaletteScale(i32),
    SetShutterMode(i32),
    TriggerShutterFlag,
    SetTemperatureRange(i32, i32),
    SetRadiationParameters(f32, f32, f32),
    SetFocusmotorPos(f32),
    GetFocusmotorPos,
    DaemonLaunch,
    DaemonIsRunning,
    DaemonKill,
}

pub struct State {
    pub calls: Vec<Call>,
    pub statuses: HashMap<&'static str, VecDeque<i32>>,
    pub thermal_size: (i32, i32),
    pub palette_size: (i32, i32),
    pub focus: f32,
}

/// Returns `0` unless a status was queued for the method with
/// [`StubSdk::push_status`]. Thermal samples follow [`sample`]. Palette pixel
/// `(x, y)` is `[x % 256, y % 256, 7]`.
#[derive(Clone)]
pub struct StubSdk {
    pub state: Arc<Mutex<State>>,
}

impl StubSdk {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                calls: Vec::new(),
                statuses: HashMap::new(),
                thermal_size: (4, 3),
                palette_size: (4, 3),
                focus: 42.5,
            })),
        }
    }

    pub fn push_status(&self, method: &'static str, code: i32) {
        self.state
            .lock()
            .statuses
            .entry(method)
            .or_default()
            .push_back(code);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    fn record(&self, method: &'static str, call: Call) -> i32 {
        let mut state = self.state.lock();
        state.calls.push(call);
        state
            .statuses
            .get_mut(method)
            .and_then(VecDeque::pop_front)
            .unwrap_or(0)
    }
}

/// Thermal sample the stub writes at row-major index `i`: `i` °C, wrapping
/// back to 0 °C past the top of the `u16` range.
pub fn sample(i: usize) -> u16 {
    (1000 + 10 * (i % 6453)) as u16
}

fn owned(s: &CStr) -> String {
    s.to_string_lossy().into_owned()
}

impl Sdk for StubSdk {
    fn usb_init(
        &mut self,
        xml_config: &CStr,
        formats_def: Option<&CStr>,
        log_file: Option<&CStr>,
    ) -> i32 {
        self.record(
            "usb_init",
            Call::UsbInit {
                config: owned(xml_config),
                formats: formats_def.map(owned),
                log: log_file.map(owned),
            },
        )
    }

    fn tcp_init(&mut self, ip: &CStr, port: i32) -> i32 {
        self.record(
            "tcp_init",
            Call::TcpInit {
                ip: owned(ip),
                port,
            },
        )
    }

    fn terminate(&mut self) -> i32 {
        self.record("terminate", Call::Terminate)
    }

    fn thermal_image_size(&mut self, width: &mut i32, height: &mut i32) -> i32 {
        (*width, *height) = self.state.lock().thermal_size;
        self.record("thermal_image_size", Call::ThermalImageSize)
    }

    fn palette_image_size(&mut self, width: &mut i32, height: &mut i32) -> i32 {
        (*width, *height) = self.state.lock().palette_size;
        self.record("palette_image_size", Call::PaletteImageSize)
    }

    fn thermal_image(&mut self, width: &mut i32, height: &mut i32, data: &mut [u16]) -> i32 {
        for (i, s) in data.iter_mut().enumerate() {
            *s = sample(i);
        }
        self.record(
            "thermal_image",
            Call::ThermalImage {
                width: *width,
                height: *height,
                len: data.len(),
            },
        )
    }

    fn palette_image(&mut self, width: &mut i32, height: &mut i32, data: &mut [u8]) -> i32 {
        let w = *width as usize;
        for (i, px) in data.chunks_exact_mut(3).enumerate() {
            px.copy_from_slice(&[(i % w) as u8, (i / w) as u8, 7]);
        }
        self.record(
            "palette_image",
            Call::PaletteImage {
                width: *width,
                height: *height,
                len: data.len(),
            },
        )
    }

    fn set_palette(&mut self, id: i32) -> i32 {
        self.record("set_palette", Call::SetPalette(id))
    }

    fn set_palette_scale(&mut self, scale: i32) -> i32 {
        self.record("set_palette_scale", Call::SetPaletteScale(scale))
    }

    fn set_shutter_mode(&mut self, mode: i32) -> i32 {
        self.record("set_shutter_mode", Call::SetShutterMode(mode))
    }

    fn trigger_shutter_flag(&mut self) -> i32 {
        self.record("trigger_shutter_flag", Call::TriggerShutterFlag)
    }

    fn set_temperature_range(&mut self, t_min: i32, t_max: i32) -> i32 {
        self.record(
            "set_temperature_range",
            Call::SetTemperatureRange(t_min, t_max),
        )
    }

    fn set_radiation_parameters(
        &mut self,
        emissivity: f32,
        transmissivity: f32,
        t_ambient: f32,
    ) -> i32 {
        self.record(
            "set_radiation_parameters",
            Call::SetRadiationParameters(emissivity, transmissivity, t_ambient),
        )
    }

    fn set_focusmotor_pos(&mut self, pos: f32) -> i32 {
        self.record("set_focusmotor_pos", Call::SetFocusmotorPos(pos))
    }

    fn get_focusmotor_pos(&mut self, pos: &mut f32) -> i32 {
        *pos = self.state.lock().focus;
        self.record("get_focusmotor_pos", Call::GetFocusmotorPos)
    }

    fn daemon_launch(&mut self) -> i32 {
        self.record("daemon_launch", Call::DaemonLaunch)
    }

    fn daemon_is_running(&mut self) -> i32 {
        self.record("daemon_is_running", Call::DaemonIsRunning)
    }

    fn daemon_kill(&mut self) -> i32 {
        self.record("daemon_kill", Call::DaemonKill)
    }
}
