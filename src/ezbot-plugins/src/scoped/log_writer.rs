//! Plain-text plugin log files.

use std::borrow::Cow;
use std::path::PathBuf;

use chrono::{DateTime, Local, TimeZone};

use super::normalize_name;
use crate::config::LogLevel;
use crate::host::PluginHost;
use crate::storage;

/// Log name used outside callback context.
pub const DEFAULT_LOG_NAME: &str = "EzBot";

/// Log name used in callback context when the caller cannot be resolved.
pub const PLUGIN_FALLBACK_LOG_NAME: &str = "pluginParent";

/// Format one log line, without the trailing newline.
///
/// `[2024-01-31 08:00:00 INFO][module] content`; the module bracket is left
/// out when `module` is empty. Line breaks in `module` or `content` are written
/// as `\n` and `\r` so every record stays on one line.
pub fn format_log_line<Tz>(
    time: &DateTime<Tz>,
    level: LogLevel,
    module: &str,
    content: &str,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let stamp = time.format("%Y-%m-%d %H:%M:%S");
    let module = escape_line_breaks(module);
    let content = escape_line_breaks(content);
    if module.is_empty() {
        format!("[{} {}] {}", stamp, level, content)
    } else {
        format!("[{} {}][{}] {}", stamp, level, module, content)
    }
}

fn escape_line_breaks(text: &str) -> Cow<'_, str> {
    if text.contains(['\n', '\r']) {
        Cow::Owned(text.replace('\r', "\\r").replace('\n', "\\n"))
    } else {
        Cow::Borrowed(text)
    }
}

impl PluginHost {
    /// Path of the log file for a name.
    pub fn log_path(&self, log_name: &str) -> PathBuf {
        self.logs_dir().join(format!("{}.log", log_name))
    }

    /// Append a line to a plugin log file.
    ///
    /// Lines below the configured minimum level are dropped. With `log_name`
    /// empty, the file is named after the calling plugin in callback context
    /// (or [`PLUGIN_FALLBACK_LOG_NAME`] when the caller is unknown), and
    /// [`DEFAULT_LOG_NAME`] otherwise.
    ///
    /// Returns `false` only when the line could not be written.
    pub fn write_log(
        &self,
        content: &str,
        module: &str,
        log_name: &str,
        level: impl Into<LogLevel>,
    ) -> bool {
        let level = level.into();
        if level < self.config().log_level {
            return true;
        }

        let log_name = self.resolve_log_name(log_name);
        let path = self.log_path(&log_name);
        let line = format_log_line(&Local::now(), level, module, content);

        match storage::append_line_locked(&path, &line) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to write log {}: {}", path.display(), e);
                false
            }
        }
    }

    fn resolve_log_name(&self, log_name: &str) -> String {
        let log_name = normalize_name(log_name);
        if !log_name.is_empty() {
            return log_name;
        }

        if self.in_callback_context() {
            self.whoami()
                .map(|package| normalize_name(&package))
                .filter(|package| !package.is_empty())
                .unwrap_or_else(|| PLUGIN_FALLBACK_LOG_NAME.to_string())
        } else {
            DEFAULT_LOG_NAME.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 31, 8, 5, 9).unwrap()
    }

    #[test]
    fn test_format_with_module() {
        assert_eq!(
            format_log_line(&at(), LogLevel::WARN, "scheduler", "tick missed"),
            "[2024-01-31 08:05:09 WARN][scheduler] tick missed"
        );
    }

    #[test]
    fn test_format_without_module() {
        assert_eq!(
            format_log_line(&at(), LogLevel::INFO, "", "started"),
            "[2024-01-31 08:05:09 INFO] started"
        );
    }

    #[test]
    fn test_format_keeps_record_on_one_line() {
        assert_eq!(
            format_log_line(&at(), LogLevel::ERROR, "sub\nsystem", "first\r\nsecond\nthird"),
            "[2024-01-31 08:05:09 ERROR][sub\\nsystem] first\\r\\nsecond\\nthird"
        );
    }

    #[test]
    fn test_format_unknown_level() {
        assert_eq!(
            format_log_line(&at(), LogLevel(9), "", "odd"),
            "[2024-01-31 08:05:09 UNKNOWN] odd"
        );
    }
}
