// src/logging.rs
//
// fern dispatch for the `log` facade. Output goes to stderr so it never
// interleaves with the shell's own lines on stdout.

use std::time::SystemTime;

use fern::colors::{Color, ColoredLevelConfig};
use fern::Dispatch;

use crate::error::{AppError, AppResult};

/// Initialize the global logger. Call once, before anything logs.
pub fn initialize(level: log::LevelFilter, colored: bool) -> AppResult<()> {
    let dispatch = if colored {
        let colors = ColoredLevelConfig::new()
            .trace(Color::Magenta)
            .debug(Color::Blue)
            .info(Color::Green)
            .warn(Color::Yellow)
            .error(Color::Red);

        Dispatch::new().format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message} [{target}]",
                date = humantime::format_rfc3339_seconds(SystemTime::now()),
                level = colors.color(record.level()),
                message = message,
                target = record.target(),
            ))
        })
    } else {
        Dispatch::new().format(|out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message} [{target}]",
                date = humantime::format_rfc3339_seconds(SystemTime::now()),
                level = record.level(),
                message = message,
                target = record.target(),
            ))
        })
    };

    Dispatch::new()
        .level(level)
        // reqwest/hyper internals are noise at debug
        .level_for("hyper", log::LevelFilter::Warn)
        .level_for("reqwest", log::LevelFilter::Warn)
        .chain(dispatch.chain(std::io::stderr()))
        .apply()
        .map_err(|e| AppError::Config(format!("Failed to initialize logger: {}", e)))?;

    log::info!("Logger initialized: level={:?}", level);
    Ok(())
}
