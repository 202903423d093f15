//! Logger setup for native and browser builds.

use crate::config::LogLevel;

/// Install the global logger at `level`.
///
/// Safe to call more than once; later calls only adjust the max level.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(level: LogLevel) {
    let filter = level.to_level_filter();
    let result = env_logger::Builder::from_default_env()
        .filter_level(filter)
        .format_timestamp_millis()
        .try_init();

    if result.is_err() {
        log::set_max_level(filter);
    }
    log::debug!("🪵 Logging initialized at {:?}", filter);
}

/// Install the console logger and panic hook at `level`.
#[cfg(target_arch = "wasm32")]
pub fn init(level: LogLevel) {
    console_error_panic_hook::set_once();

    let lvl = level
        .to_level_filter()
        .to_level()
        .unwrap_or(log::Level::Error);
    if console_log::init_with_level(lvl).is_err() {
        log::set_max_level(level.to_level_filter());
    }
    log::debug!("🪵 Console logging initialized at {:?}", lvl);
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init(LogLevel::Debug);
        init(LogLevel::Warn);
        assert_eq!(log::max_level(), log::LevelFilter::Warn);
    }
}
