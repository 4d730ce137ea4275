// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Loosely-typed call surface.
//!
//! Scripting hosts hand over an operation name and a list of JSON values.
//! [`call`] checks the argument count and types for that operation, and only
//! then calls into the SDK. Argument errors never reach the native layer.
//!
//! The line protocol used by `irimager script` is one [`Request`] per line in
//! and one [`Reply`] per line out:
//!
//! ```text
//! {"op": "tcp_init", "args": ["localhost", 1337]}
//! {"ok":null}
//! {"op": "get_thermal_image_size"}
//! {"ok":[382,288]}
//! {"op": "set_palette", "args": ["iron"]}
//! {"error":{"kind":"bad_arguments","message":"bad argument(s): set_palette: argument 1 must be an integer"}}
//! ```

use crate::{
    error::{Error, Result},
    imager::IrImager,
    sdk::Sdk,
    thermal::{PaletteImage, ThermalImage},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// Every operation exposed to scripting hosts.
pub const OPERATIONS: &[&str] = &[
    "usb_init",
    "tcp_init",
    "terminate",
    "get_thermal_image_size",
    "get_palette_image_size",
    "get_thermal_image",
    "get_palette_image",
    "set_palette",
    "set_palette_scale",
    "set_shutter_mode",
    "trigger_shutter_flag",
    "set_temperature_range",
    "set_radiation_parameters",
    "set_focus_motor_position",
    "get_focus_motor_position",
    "daemon_launch",
    "daemon_is_running",
    "daemon_kill",
];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Request {
    pub op: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reply {
    Ok(Value),
    Error { kind: &'static str, message: String },
}

impl From<Result<Output>> for Reply {
    fn from(res: Result<Output>) -> Self {
        match res {
            Ok(output) => Reply::Ok(output.into_json()),
            Err(e) => Reply::Error {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }
}

/// Successful result of an operation.
#[derive(Debug)]
pub enum Output {
    None,
    Size(i32, i32),
    Float(f32),
    Bool(bool),
    Thermal(ThermalImage),
    Palette(PaletteImage),
}

impl Output {
    pub fn into_json(self) -> Value {
        match self {
            Output::None => Value::Null,
            Output::Size(w, h) => json!([w, h]),
            Output::Float(v) => json!(v),
            Output::Bool(v) => Value::Bool(v),
            Output::Thermal(img) => {
                let shape = img.shape().to_vec();
                let (data, _) = img.into_raw_vec_and_offset();
                json!({ "shape": shape, "dtype": "uint16", "data": data })
            }
            Output::Palette(img) => {
                let shape = img.shape().to_vec();
                let (data, _) = img.into_raw_vec_and_offset();
                json!({ "shape": shape, "dtype": "uint8", "data": data })
            }
        }
    }
}

/// Positional arguments of one call.
struct Args<'a> {
    op: &'a str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    fn bad(&self, msg: impl std::fmt::Display) -> Error {
        Error::BadArguments(format!("{}: {}", self.op, msg))
    }

    fn arity(&self, min: usize, max: usize) -> Result<()> {
        let n = self.values.len();
        if n < min || n > max {
            let expected = if min == max {
                format!("{min}")
            } else {
                format!("{min} to {max}")
            };
            return Err(self.bad(format_args!(
                "expected {expected} argument(s), got {n}"
            )));
        }
        Ok(())
    }

    fn string(&self, i: usize) -> Result<&'a str> {
        self.values[i]
            .as_str()
            .ok_or_else(|| self.bad(format_args!("argument {} must be a string", i + 1)))
    }

    /// Missing or `null` means "use the SDK default".
    fn opt_string(&self, i: usize) -> Result<Option<&'a str>> {
        match self.values.get(i) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(self.bad(format_args!(
                "argument {} must be a string or null",
                i + 1
            ))),
        }
    }

    fn int(&self, i: usize) -> Result<i32> {
        self.values[i]
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| self.bad(format_args!("argument {} must be an integer", i + 1)))
    }

    fn float(&self, i: usize) -> Result<f32> {
        self.values[i]
            .as_f64()
            .map(|v| v as f32)
            .ok_or_else(|| self.bad(format_args!("argument {} must be a number", i + 1)))
    }
}

/// Validates `args` for `op` and forwards the call to `imager`.
pub fn call<S: Sdk>(imager: &IrImager<S>, op: &str, args: &[Value]) -> Result<Output> {
    let a = Args { op, values: args };
    debug!(op, argc = args.len(), "script call");
    match op {
        "usb_init" => {
            a.arity(1, 3)?;
            let (config, formats, log) = (a.string(0)?, a.opt_string(1)?, a.opt_string(2)?);
            imager.usb_init(config, formats, log)?;
            Ok(Output::None)
        }
        "tcp_init" => {
            a.arity(2, 2)?;
            let (ip, port) = (a.string(0)?, a.int(1)?);
            imager.tcp_init(ip, port)?;
            Ok(Output::None)
        }
        "terminate" => {
            a.arity(0, 0)?;
            imager.terminate()?;
            Ok(Output::None)
        }
        "get_thermal_image_size" => {
            a.arity(0, 0)?;
            let (w, h) = imager.thermal_image_size()?;
            Ok(Output::Size(w, h))
        }
        "get_palette_image_size" => {
            a.arity(0, 0)?;
            let (w, h) = imager.palette_image_size()?;
            Ok(Output::Size(w, h))
        }
        "get_thermal_image" => {
            a.arity(0, 0)?;
            Ok(Output::Thermal(imager.thermal_image()?))
        }
        "get_palette_image" => {
            a.arity(0, 0)?;
            Ok(Output::Palette(imager.palette_image()?))
        }
        "set_palette" => {
            a.arity(1, 1)?;
            imager.set_palette(a.int(0)?)?;
            Ok(Output::None)
        }
        "set_palette_scale" => {
            a.arity(1, 1)?;
            imager.set_palette_scale(a.int(0)?)?;
            Ok(Output::None)
        }
        "set_shutter_mode" => {
            a.arity(1, 1)?;
            imager.set_shutter_mode(a.int(0)?)?;
            Ok(Output::None)
        }
        "trigger_shutter_flag" => {
            a.arity(0, 0)?;
            imager.trigger_shutter_flag()?;
            Ok(Output::None)
        }
        "set_temperature_range" => {
            a.arity(2, 2)?;
            let (t_min, t_max) = (a.int(0)?, a.int(1)?);
            imager.set_temperature_range(t_min, t_max)?;
            Ok(Output::None)
        }
        "set_radiation_parameters" => {
            a.arity(3, 3)?;
            let (e, t, ambient) = (a.float(0)?, a.float(1)?, a.float(2)?);
            imager.set_radiation_parameters(e, t, ambient)?;
            Ok(Output::None)
        }
        "set_focus_motor_position" => {
            a.arity(1, 1)?;
            imager.set_focus_motor_position(a.float(0)?)?;
            Ok(Output::None)
        }
        "get_focus_motor_position" => {
            a.arity(0, 0)?;
            Ok(Output::Float(imager.focus_motor_position()?))
        }
        "daemon_launch" => {
            a.arity(0, 0)?;
            imager.daemon_launch()?;
            Ok(Output::None)
        }
        "daemon_is_running" => {
            a.arity(0, 0)?;
            Ok(Output::Bool(imager.daemon_is_running()?))
        }
        "daemon_kill" => {
            a.arity(0, 0)?;
            imager.daemon_kill()?;
            Ok(Output::None)
        }
        other => Err(Error::BadArguments(format!("unknown operation '{other}'"))),
    }
}

/// Handles one line of the script protocol and returns the reply line.
pub fn handle_line<S: Sdk>(imager: &IrImager<S>, line: &str) -> String {
    let reply = match serde_json::from_str::<Request>(line) {
        Ok(req) => Reply::from(call(imager, &req.op, &req.args)),
        Err(e) => Reply::Error {
            kind: "bad_arguments",
            message: format!("bad argument(s): malformed request: {e}"),
        },
    };
    // A reply only holds strings, numbers and nested arrays.
    serde_json::to_string(&reply).unwrap_or_else(|e| {
        json!({ "error": { "kind": "internal", "message": e.to_string() } }).to_string()
    })
}
