use std::process::ExitCode;

use triangle_engine::device::GpuInit;
use triangle_engine::input::KeyBindings;
use triangle_engine::logging::{init_logging, LoggingConfig};
use triangle_engine::render::RendererConfig;
use triangle_engine::window::{Runtime, RuntimeConfig};

/// Exit status for setup or fatal render failures (`-1` as seen by the shell).
const FAILURE: u8 = 255;

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    match Runtime::run(
        RuntimeConfig::default(),
        GpuInit::default(),
        RendererConfig::default(),
        KeyBindings::default(),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("hello-triangle failed: {err:#}");
            ExitCode::from(FAILURE)
        }
    }
}
