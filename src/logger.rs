//! Colored, timestamped console logging used throughout the glider.
//!
//! Every line is `[TAG][HH:MM:SS.mmm] message`. Millisecond stamps keep
//! frame-by-frame `event!` output readable at 60 fps.

use std::sync::OnceLock;

/// Wall clock stamp for a log line.
pub fn timestamp() -> String { chrono::Utc::now().format("%H:%M:%S%.3f").to_string() }

/// Whether `event!` prints. `LOG_GLIDER_EVENTS` is read once per process.
pub fn events_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var_os("LOG_GLIDER_EVENTS").is_some())
}

#[doc(hidden)]
#[macro_export]
macro_rules! log_line {
    (err $color:literal, $tag:literal, $($arg:tt)*) => {
        eprintln!(concat!("\x1b[", $color, "m[", $tag, "][{}]\x1b[0m {}"), $crate::logger::timestamp(), format!($($arg)*))
    };
    ($color:literal, $tag:literal, $($arg:tt)*) => {
        println!(concat!("\x1b[", $color, "m[", $tag, "][{}]\x1b[0m {}"), $crate::logger::timestamp(), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { $crate::log_line!("32", "INFO ", $($arg)*) };
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => { $crate::log_line!("33", "LOG  ", $($arg)*) };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { $crate::log_line!("35", "WARN ", $($arg)*) };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => { $crate::log_line!(err "31", "ERROR", $($arg)*) };
}

/// Aborts start-up. Only meant for configuration errors the game cannot run without.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {
        panic!("\x1b[1;31m[FATAL][{}]\x1b[0m {}", $crate::logger::timestamp(), format!($($arg)*))
    };
}

/// Per-frame chatter, only printed when `LOG_GLIDER_EVENTS` is set.
#[macro_export]
macro_rules! event {
    ($($arg:tt)*) => {
        if $crate::logger::events_enabled() {
            $crate::log_line!("36", "EVENT", $($arg)*)
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_timestamp_has_millis() {
        let stamp = super::timestamp();
        assert_eq!(stamp.len(), "00:00:00.000".len(), "{stamp}");
        assert_eq!(stamp.matches(':').count(), 2);
        assert!(stamp.contains('.'));
        assert_eq!(super::events_enabled(), super::events_enabled());
        crate::info!("logger smoke line {}", 1);
        crate::error!("logger smoke line {}", 2);
        crate::event!("logger smoke line {}", 3);
    }
}
