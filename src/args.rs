// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use clap::{Args as ClapArgs, Parser, Subcommand};
use irimager::{Palette, PaletteScale, ShutterMode};
use std::path::PathBuf;

/// False-color palette selection.
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Copy)]
pub enum PaletteSetting {
    AlarmBlue,
    AlarmBlueHi,
    GrayBw,
    GrayWb,
    AlarmGreen,
    Iron,
    IronHi,
    Medical,
    Rainbow,
    RainbowHi,
    AlarmRed,
}

impl From<PaletteSetting> for Palette {
    fn from(value: PaletteSetting) -> Self {
        match value {
            PaletteSetting::AlarmBlue => Palette::AlarmBlue,
            PaletteSetting::AlarmBlueHi => Palette::AlarmBlueHi,
            PaletteSetting::GrayBw => Palette::GrayBW,
            PaletteSetting::GrayWb => Palette::GrayWB,
            PaletteSetting::AlarmGreen => Palette::AlarmGreen,
            PaletteSetting::Iron => Palette::Iron,
            PaletteSetting::IronHi => Palette::IronHi,
            PaletteSetting::Medical => Palette::Medical,
            PaletteSetting::Rainbow => Palette::Rainbow,
            PaletteSetting::RainbowHi => Palette::RainbowHi,
            PaletteSetting::AlarmRed => Palette::AlarmRed,
        }
    }
}

/// Palette scaling method.
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Copy)]
pub enum ScaleSetting {
    /// Scale to the configured temperature range
    Manual,
    /// Scale to the frame's minimum and maximum
    MinMax,
    /// Scale to one standard deviation around the mean
    Sigma1,
    /// Scale to three standard deviations around the mean
    Sigma3,
}

impl From<ScaleSetting> for PaletteScale {
    fn from(value: ScaleSetting) -> Self {
        match value {
            ScaleSetting::Manual => PaletteScale::Manual,
            ScaleSetting::MinMax => PaletteScale::MinMax,
            ScaleSetting::Sigma1 => PaletteScale::Sigma1,
            ScaleSetting::Sigma3 => PaletteScale::Sigma3,
        }
    }
}

/// Shutter flag control.
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Copy)]
pub enum ShutterSetting {
    Manual,
    Auto,
}

impl From<ShutterSetting> for ShutterMode {
    fn from(value: ShutterSetting) -> Self {
        match value {
            ShutterSetting::Manual => ShutterMode::Manual,
            ShutterSetting::Auto => ShutterMode::Auto,
        }
    }
}

/// Command-line arguments for the IRImager tool.
///
/// # Example
///
/// ```bash
/// # Local camera over USB
/// irimager snapshot --usb /etc/irimager/generic.xml --palette iron
///
/// # Camera served by the IRImager daemon
/// irimager daemon launch
/// irimager stream --tcp localhost --frames 100
///
/// # Library path via environment
/// export IRIMAGER_LIB=/usr/local/lib/libirimager.so
/// irimager info --tcp localhost
/// ```
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the IRImager Direct-SDK shared library
    #[arg(long, env = "IRIMAGER_LIB", global = true)]
    pub library: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable Tracy profiler for performance analysis
    #[arg(long, env = "TRACY", global = true)]
    pub tracy: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print image sizes, focus motor position and daemon state
    Info(Connection),

    /// Grab one frame and print temperature statistics
    Snapshot(SnapshotArgs),

    /// Grab frames continuously and report the frame rate
    Stream(StreamArgs),

    /// Control the IRImager TCP daemon
    Daemon {
        #[command(subcommand)]
        action: DaemonAction,
    },

    /// Read JSON requests from stdin, one per line, and write one JSON reply
    /// per line to stdout
    Script,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq)]
pub enum DaemonAction {
    Launch,
    Kill,
    Status,
}

/// How to reach the camera.
#[derive(ClapArgs, Debug, Clone)]
pub struct Connection {
    /// Connect over USB using this XML configuration
    #[arg(
        long,
        env = "IRIMAGER_CONFIG",
        conflicts_with = "tcp",
        required_unless_present = "tcp"
    )]
    pub usb: Option<PathBuf>,

    /// Connect to the IRImager daemon on this host
    #[arg(long, env = "IRIMAGER_HOST")]
    pub tcp: Option<String>,

    /// Formats.def path for USB connections (SDK default when omitted)
    #[arg(long, requires = "usb")]
    pub formats: Option<PathBuf>,

    /// SDK log file for USB connections (SDK default when omitted)
    #[arg(long, requires = "usb")]
    pub log_file: Option<PathBuf>,

    /// Daemon TCP port
    #[arg(long, env = "IRIMAGER_PORT", default_value = "1337")]
    pub port: i32,
}

/// Rendering parameters applied before grabbing.
#[derive(ClapArgs, Debug, Clone)]
pub struct Render {
    /// False-color palette
    #[arg(long, value_enum)]
    pub palette: Option<PaletteSetting>,

    /// Palette scaling method
    #[arg(long, value_enum)]
    pub palette_scale: Option<ScaleSetting>,

    /// Shutter flag control mode
    #[arg(long, value_enum)]
    pub shutter_mode: Option<ShutterSetting>,

    /// Camera temperature range in °C (min max)
    #[arg(long, value_delimiter = ' ', num_args = 2, allow_negative_numbers = true)]
    pub temperature_range: Option<Vec<i32>>,

    /// Emissivity, transmissivity and ambient temperature (°C)
    #[arg(long, value_delimiter = ' ', num_args = 3, allow_negative_numbers = true)]
    pub radiation: Option<Vec<f32>>,

    /// Focus motor position in percent
    #[arg(long)]
    pub focus: Option<f32>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SnapshotArgs {
    #[command(flatten)]
    pub connection: Connection,

    #[command(flatten)]
    pub render: Render,

    /// Write the palette image to this JPEG file
    #[arg(long)]
    pub jpeg: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct StreamArgs {
    #[command(flatten)]
    pub connection: Connection,

    #[command(flatten)]
    pub render: Render,

    /// Stop after this many frames (run until interrupted when omitted)
    #[arg(long)]
    pub frames: Option<u64>,

    /// Also grab the thermal image for every frame
    #[arg(long)]
    pub thermal: bool,

    /// Write palette frames as numbered JPEG files into this directory
    #[arg(long, env = "JPEG_DIR")]
    pub jpeg_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_snapshot() {
        let args = Args::try_parse_from([
            "irimager",
            "snapshot",
            "--usb",
            "generic.xml",
            "--palette",
            "iron",
            "--temperature-range",
            "-20",
            "100",
        ])
        .unwrap();
        let Command::Snapshot(snap) = args.command else {
            panic!("expected snapshot");
        };
        assert_eq!(snap.connection.usb, Some(PathBuf::from("generic.xml")));
        assert_eq!(snap.render.palette, Some(PaletteSetting::Iron));
        assert_eq!(snap.render.temperature_range, Some(vec![-20, 100]));
        assert_eq!(Palette::from(PaletteSetting::Iron), Palette::Iron);
    }

    #[test]
    fn usb_and_tcp_conflict() {
        let res = Args::try_parse_from([
            "irimager", "info", "--usb", "generic.xml", "--tcp", "localhost",
        ]);
        assert!(res.is_err());
    }
}
