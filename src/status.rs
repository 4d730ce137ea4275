// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Interpretation of the SDK's integer status codes.
//!
//! Every native call documents which statuses it may return. A [`Contract`]
//! records that set together with the messages reported for `-1` and `-2`;
//! [`Contract::check`] turns a raw status into a `Result`.

use crate::error::{Error, Result};
use tracing::{debug, error};

/// Decoded native status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error,
    Fatal,
    Unknown(i32),
}

impl From<i32> for Status {
    fn from(code: i32) -> Self {
        match code {
            0 => Status::Ok,
            -1 => Status::Error,
            -2 => Status::Fatal,
            other => Status::Unknown(other),
        }
    }
}

/// The documented status set of one native call.
#[derive(Clone, Copy, Debug)]
pub struct Contract {
    pub op: &'static str,
    pub error: &'static str,
    pub fatal: Option<&'static str>,
}

const ERROR: &str = "Error";
const FATAL: &str = "Fatal error";

impl Contract {
    /// A call documented to return `0` or `-1`.
    pub const fn new(op: &'static str, error: &'static str) -> Self {
        Self {
            op,
            error,
            fatal: None,
        }
    }

    /// A call that may also return `-2`.
    pub const fn with_fatal(self, fatal: &'static str) -> Self {
        Self {
            fatal: Some(fatal),
            ..self
        }
    }

    pub fn check(&self, code: i32) -> Result<()> {
        debug!(op = self.op, status = code, "native call returned");
        match (Status::from(code), self.fatal) {
            (Status::Ok, _) => Ok(()),
            (Status::Error, _) => Err(Error::Operation {
                op: self.op,
                message: self.error,
            }),
            (Status::Fatal, Some(message)) => Err(Error::Fatal {
                op: self.op,
                message,
            }),
            _ => {
                error!(op = self.op, status = code, "status outside the SDK contract");
                Err(Error::UnreachableStatus {
                    op: self.op,
                    status: code,
                })
            }
        }
    }
}

pub const USB_INIT: Contract = Contract::new("usb_init", ERROR);
pub const TCP_INIT: Contract = Contract::new("tcp_init", "Host not found").with_fatal(FATAL);
pub const TERMINATE: Contract = Contract::new("terminate", ERROR);
pub const THERMAL_IMAGE_SIZE: Contract = Contract::new("get_thermal_image_size", ERROR);
pub const PALETTE_IMAGE_SIZE: Contract = Contract::new("get_palette_image_size", ERROR);
pub const THERMAL_IMAGE: Contract = Contract::new("get_thermal_image", ERROR).with_fatal(FATAL);
pub const PALETTE_IMAGE: Contract = Contract::new("get_palette_image", ERROR).with_fatal(FATAL);
pub const SET_PALETTE: Contract = Contract::new("set_palette", ERROR).with_fatal(FATAL);
pub const SET_PALETTE_SCALE: Contract = Contract::new("set_palette_scale", ERROR).with_fatal(FATAL);
pub const SET_SHUTTER_MODE: Contract = Contract::new("set_shutter_mode", ERROR).with_fatal(FATAL);
pub const TRIGGER_SHUTTER_FLAG: Contract =
    Contract::new("trigger_shutter_flag", ERROR).with_fatal(FATAL);
pub const SET_TEMPERATURE_RANGE: Contract =
    Contract::new("set_temperature_range", ERROR).with_fatal(FATAL);
pub const SET_RADIATION_PARAMETERS: Contract =
    Contract::new("set_radiation_parameters", ERROR).with_fatal(FATAL);
pub const SET_FOCUS_MOTOR_POSITION: Contract =
    Contract::new("set_focus_motor_position", "Error or no focus motor available");
pub const GET_FOCUS_MOTOR_POSITION: Contract =
    Contract::new("get_focus_motor_position", "Error or no focus motor available");
pub const DAEMON_LAUNCH: Contract = Contract::new("daemon_launch", ERROR).with_fatal(FATAL);
pub const DAEMON_KILL: Contract = Contract::new("daemon_kill", ERROR).with_fatal(FATAL);

/// `daemon_is_running` answers with its status: `0` running, `-1` not.
pub fn daemon_running(code: i32) -> Result<bool> {
    debug!(op = "daemon_is_running", status = code, "native call returned");
    match Status::from(code) {
        Status::Ok => Ok(true),
        Status::Error => Ok(false),
        _ => {
            error!(op = "daemon_is_running", status = code, "status outside the SDK contract");
            Err(Error::UnreachableStatus {
                op: "daemon_is_running",
                status: code,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode() {
        assert_eq!(Status::from(0), Status::Ok);
        assert_eq!(Status::from(-1), Status::Error);
        assert_eq!(Status::from(-2), Status::Fatal);
        assert_eq!(Status::from(3), Status::Unknown(3));
    }

    #[test]
    fn fatal_only_where_documented() {
        assert!(matches!(TCP_INIT.check(-2), Err(Error::Fatal { .. })));
        assert!(matches!(
            USB_INIT.check(-2),
            Err(Error::UnreachableStatus { status: -2, .. })
        ));
    }

    #[test]
    fn messages() {
        match TCP_INIT.check(-1) {
            Err(Error::Operation { message, .. }) => assert_eq!(message, "Host not found"),
            other => panic!("unexpected {other:?}"),
        }
        match SET_FOCUS_MOTOR_POSITION.check(-1) {
            Err(Error::Operation { message, .. }) => {
                assert_eq!(message, "Error or no focus motor available")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn daemon_status_is_the_answer() {
        assert!(daemon_running(0).unwrap());
        assert!(!daemon_running(-1).unwrap());
        assert!(daemon_running(-2).is_err());
    }
}
