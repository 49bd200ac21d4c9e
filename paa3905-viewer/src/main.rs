//! PAA3905 frame viewer
//!
//! Reads the raw-image stream a PAA3905 sensor board writes to a serial
//! port and shows each 35x35 frame as it completes.

mod config;
mod pipeline;
mod sink;
mod source;

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use paa3905_display::FrameSink;

use crate::config::{SinkKind, ViewerConfig, CONFIG_FILE_NAME};
use crate::pipeline::Pipeline;
use crate::sink::{SinkError, TerminalSink};
use crate::source::SerialSource;

#[derive(Parser)]
#[command(
    name = "paa3905-viewer",
    about = "Displays 35x35 images from a PAA3905 sent over a serial port"
)]
struct Args {
    /// Serial port the sensor board is attached to (e.g. /dev/ttyACM0, COM3)
    port: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    let config = ViewerConfig::load_or_default(Path::new(CONFIG_FILE_NAME))
        .context("failed to load viewer configuration")?;

    let uart = config.uart();
    let source = source::open_serial(&args.port, &uart, config.read_timeout())?;
    log::info!("Reading frames from {} at {} baud", args.port, uart.baudrate);

    match config.sink {
        SinkKind::Terminal => {
            let stop = Arc::new(AtomicBool::new(false));
            let handler_stop = Arc::clone(&stop);
            ctrlc::set_handler(move || handler_stop.store(true, Ordering::Relaxed))
                .context("failed to install Ctrl-C handler")?;
            run(source, TerminalSink::new(io::stdout().lock(), stop))
        }
        #[cfg(feature = "sdl")]
        SinkKind::Sdl => run(source, sink::SdlSink::open(config.scale)?),
        #[cfg(not(feature = "sdl"))]
        SinkKind::Sdl => {
            anyhow::bail!("sink = \"sdl\" requires building with `--features sdl`")
        }
    }
}

fn run<K>(source: SerialSource, sink: K) -> anyhow::Result<()>
where
    K: FrameSink<Error = SinkError>,
{
    let mut pipeline = Pipeline::new(source, sink);
    match pipeline.run() {
        Ok(stats) => {
            log::info!(
                "Stopped after {} frames ({} short, {} overrun, {} bytes)",
                stats.frames,
                stats.short_frames,
                stats.overrun_frames,
                stats.bytes
            );
            Ok(())
        }
        Err(e) => {
            let stats = pipeline.stats();
            log::error!("{e} after {} frames", stats.frames);
            Err(e.into())
        }
    }
}
