//! `log` backend writing to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::OnceLock;

struct ConsoleLogger {
    tag: &'static str,
}

static LOGGER: OnceLock<ConsoleLogger> = OnceLock::new();

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(self.tag, record.level(), &record.args().to_string());
        emit(record.level(), &line);
    }

    fn flush(&self) {}
}

fn format_line(tag: &str, level: Level, message: &str) -> String {
    match level {
        Level::Info => format!("{tag} {message}"),
        _ => format!("{tag} {level}: {message}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Info => web_sys::console::log_1(&value),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{line}");
}

/// Install the console logger once; later calls only update the level.
pub fn init(tag: &'static str, level: LevelFilter) {
    let logger = LOGGER.get_or_init(|| ConsoleLogger { tag });
    // Fails only if another logger is already installed.
    let _ = log::set_logger(logger);
    log::set_max_level(level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn info_lines_carry_only_the_tag() {
        assert_eq!(format_line("[IMU]", Level::Info, "ready"), "[IMU] ready");
    }

    #[test]
    fn other_levels_are_spelled_out() {
        assert_eq!(
            format_line("[MIU]", Level::Warn, "no toolbox"),
            "[MIU] WARN: no toolbox"
        );
    }
}
