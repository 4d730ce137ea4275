// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use args::{Args, Command, Connection, DaemonAction, Render, SnapshotArgs, StreamArgs};
use clap::Parser;
use irimager::{
    script, thermal::TemperatureStats, Error as ImagerError, IrImager, Palette, PaletteScale,
    ShutterMode,
};
use std::{
    error::Error,
    io::{self, BufRead, Write},
    path::Path,
    time::Instant,
};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

mod args;

fn init_logging(args: &Args) -> Result<(), Box<dyn Error>> {
    tracing_log::LogTracer::init()?;

    let level = if args.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    let journald = tracing_journald::layer().ok();

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(journald);

    #[cfg(feature = "tracy")]
    let subscriber = subscriber.with(args.tracy.then(|| {
        tracy_client::Client::start();
        tracing_tracy::TracyLayer::default()
    }));

    tracing::subscriber::set_global_default(subscriber)?;

    #[cfg(not(feature = "tracy"))]
    if args.tracy {
        tracing::warn!("built without the tracy feature, --tracy has no effect");
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let imager = match &args.library {
        Some(path) => IrImager::open(path)?,
        None => IrImager::open_default()?,
    };

    match &args.command {
        Command::Info(conn) => {
            connect(&imager, conn)?;
            print_info(&imager)
        }
        Command::Snapshot(snap) => {
            connect(&imager, &snap.connection)?;
            apply_render(&imager, &snap.render)?;
            snapshot(&imager, snap)
        }
        Command::Stream(stream_args) => {
            connect(&imager, &stream_args.connection)?;
            apply_render(&imager, &stream_args.render)?;
            stream(&imager, stream_args)
        }
        Command::Daemon { action } => daemon(&imager, *action),
        Command::Script => run_script(&imager),
    }
}

fn path_str<'a>(name: &str, path: &'a Path) -> Result<&'a str, ImagerError> {
    path.to_str()
        .ok_or_else(|| ImagerError::BadArguments(format!("{name} is not valid UTF-8")))
}

fn connect(imager: &IrImager, conn: &Connection) -> Result<(), ImagerError> {
    match (&conn.usb, &conn.tcp) {
        (Some(config), _) => {
            let formats = conn
                .formats
                .as_deref()
                .map(|p| path_str("formats", p))
                .transpose()?;
            let log_file = conn
                .log_file
                .as_deref()
                .map(|p| path_str("log file", p))
                .transpose()?;
            imager.usb_init(path_str("usb config", config)?, formats, log_file)?;
            info!(config = %config.display(), "connected over USB");
        }
        (None, Some(host)) => {
            imager.tcp_init(host, conn.port)?;
            info!(host, port = conn.port, "connected to daemon");
        }
        (None, None) => {
            return Err(ImagerError::BadArguments(
                "either --usb or --tcp is required".to_string(),
            ))
        }
    }
    Ok(())
}

fn apply_render(imager: &IrImager, render: &Render) -> Result<(), ImagerError> {
    if let Some(range) = &render.temperature_range {
        imager.set_temperature_range(range[0], range[1])?;
    }
    if let Some(palette) = render.palette {
        imager.set_palette(Palette::from(palette))?;
    }
    if let Some(scale) = render.palette_scale {
        imager.set_palette_scale(PaletteScale::from(scale))?;
    }
    if let Some(mode) = render.shutter_mode {
        imager.set_shutter_mode(ShutterMode::from(mode))?;
    }
    if let Some(radiation) = &render.radiation {
        imager.set_radiation_parameters(radiation[0], radiation[1], radiation[2])?;
    }
    if let Some(focus) = render.focus {
        imager.set_focus_motor_position(focus)?;
    }
    debug!(?render, "render parameters applied");
    Ok(())
}

fn print_info(imager: &IrImager) -> Result<(), Box<dyn Error>> {
    let (tw, th) = imager.thermal_image_size()?;
    let (pw, ph) = imager.palette_image_size()?;
    println!("thermal image: {tw}x{th}");
    println!("palette image: {pw}x{ph}");

    match imager.focus_motor_position() {
        Ok(pos) if pos < 0.0 => println!("focus motor: not available"),
        Ok(pos) => println!("focus motor: {pos:.1}%"),
        Err(e) => println!("focus motor: {e}"),
    }

    let running = imager.daemon_is_running()?;
    println!("daemon: {}", if running { "running" } else { "stopped" });
    Ok(())
}

fn snapshot(imager: &IrImager, args: &SnapshotArgs) -> Result<(), Box<dyn Error>> {
    let now = Instant::now();
    let thermal = imager.thermal_image()?;
    let capture_time = now.elapsed();
    let (height, width) = thermal.dim();

    match TemperatureStats::of(thermal.view()) {
        Some(stats) => println!(
            "thermal {}x{} min: {:.1}°C max: {:.1}°C mean: {:.1}°C capture: {:?}",
            width, height, stats.min, stats.max, stats.mean, capture_time
        ),
        None => println!("thermal image is empty"),
    }

    if let Some(path) = &args.jpeg {
        write_jpeg(imager, path)?;
    }
    Ok(())
}

#[cfg(feature = "jpeg")]
fn write_jpeg(imager: &IrImager, path: &Path) -> Result<(), Box<dyn Error>> {
    let palette = imager.palette_image()?;
    let jpeg = irimager::jpeg::encode_jpeg(&palette, 90)?;
    std::fs::write(path, &jpeg)?;
    let (height, width, _) = palette.dim();
    println!(
        "saved {} resolution: {}x{} size: {}",
        path.display(),
        width,
        height,
        jpeg.len()
    );
    Ok(())
}

#[cfg(not(feature = "jpeg"))]
fn write_jpeg(_imager: &IrImager, path: &Path) -> Result<(), Box<dyn Error>> {
    tracing::warn!(path = %path.display(), "built without the jpeg feature, not writing JPEG");
    Ok(())
}

fn update_fps(prev: &mut Instant, history: &mut [i64], index: &mut usize) -> i64 {
    let now = Instant::now();

    let elapsed = now.duration_since(*prev);
    *prev = now;

    history[*index] = 1e9 as i64 / elapsed.as_nanos().max(1) as i64;
    *index = (*index + 1) % history.len();

    (history.iter().sum::<i64>() as f64 / history.len() as f64).round() as i64
}

fn stream(imager: &IrImager, args: &StreamArgs) -> Result<(), Box<dyn Error>> {
    #[cfg(feature = "jpeg")]
    let writer = match &args.jpeg_dir {
        Some(dir) => Some(writer::JpegWriter::spawn(dir)?),
        None => None,
    };
    #[cfg(not(feature = "jpeg"))]
    if let Some(dir) = &args.jpeg_dir {
        tracing::warn!(dir = %dir.display(), "built without the jpeg feature, not writing JPEGs");
    }

    let mut prev = Instant::now();
    let mut history = vec![0; 30];
    let mut index = 0;
    let mut count = 0u64;

    while args.frames.map_or(true, |n| count < n) {
        let fps = update_fps(&mut prev, &mut history, &mut index);
        let now = Instant::now();
        let palette = imager.palette_image()?;
        let capture_time = now.elapsed();
        let (height, width, _) = palette.dim();

        if args.thermal {
            let thermal = imager.thermal_image()?;
            if let Some(stats) = TemperatureStats::of(thermal.view()) {
                debug!(min = stats.min, max = stats.max, mean = stats.mean, "thermal frame");
            }
        }

        debug!(frame = count, width, height, ?capture_time, fps, "palette frame");

        #[cfg(feature = "jpeg")]
        if let Some(writer) = &writer {
            writer.send(count, palette);
        }

        #[cfg(feature = "tracy")]
        if let Some(client) = tracy_client::Client::running() {
            client.frame_mark();
        }

        count += 1;
    }

    #[cfg(feature = "jpeg")]
    if let Some(writer) = writer {
        writer.finish();
    }

    info!(frames = count, "stream finished");
    Ok(())
}

fn daemon(imager: &IrImager, action: DaemonAction) -> Result<(), Box<dyn Error>> {
    match action {
        DaemonAction::Launch => {
            imager.daemon_launch()?;
            info!("daemon launched");
        }
        DaemonAction::Kill => {
            imager.daemon_kill()?;
            info!("daemon killed");
        }
        DaemonAction::Status => {
            let running = imager.daemon_is_running()?;
            println!("{}", if running { "running" } else { "stopped" });
        }
    }
    Ok(())
}

fn run_script(imager: &IrImager) -> Result<(), Box<dyn Error>> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = script::handle_line(imager, &line);
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

#[cfg(feature = "jpeg")]
mod writer {
    use irimager::{jpeg::encode_jpeg, PaletteImage};
    use std::{fs, io, path::Path, thread};
    use tracing::{debug, warn};

    /// Encodes palette frames to numbered JPEG files on its own thread, since
    /// encoding can be slower than the camera's frame rate.
    pub struct JpegWriter {
        tx: kanal::Sender<(u64, PaletteImage)>,
        handle: thread::JoinHandle<()>,
    }

    impl JpegWriter {
        pub fn spawn(dir: &Path) -> io::Result<Self> {
            fs::create_dir_all(dir)?;
            let dir = dir.to_path_buf();
            let (tx, rx) = kanal::bounded::<(u64, PaletteImage)>(2);
            let handle = thread::spawn(move || {
                while let Ok((index, img)) = rx.recv() {
                    let path = dir.join(format!("frame-{index:06}.jpg"));
                    let jpeg = match encode_jpeg(&img, 90) {
                        Ok(j) => j,
                        Err(e) => {
                            warn!("jpeg encode error: {e:?}");
                            continue;
                        }
                    };
                    match fs::write(&path, &jpeg) {
                        Ok(()) => debug!(path = %path.display(), size = jpeg.len(), "jpeg saved"),
                        Err(e) => warn!(path = %path.display(), "jpeg write error: {e}"),
                    }
                }
            });
            Ok(Self { tx, handle })
        }

        /// Hands a frame to the encoder, dropping it if the encoder is busy.
        pub fn send(&self, index: u64, img: PaletteImage) {
            match self.tx.try_send((index, img)) {
                Ok(true) => {}
                Ok(false) => debug!(frame = index, "jpeg encoder busy, frame dropped"),
                Err(e) => warn!("jpeg send error: {e:?}"),
            }
        }

        pub fn finish(self) {
            drop(self.tx);
            if self.handle.join().is_err() {
                warn!("jpeg writer thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::update_fps;
    use std::time::{Duration, Instant};

    #[test]
    fn fps_average() {
        let mut prev = Instant::now() - Duration::from_millis(100);
        let mut history = vec![10; 4];
        let mut index = 0;
        let fps = update_fps(&mut prev, &mut history, &mut index);
        assert_eq!(index, 1);
        assert!(fps <= 10);
    }
}
