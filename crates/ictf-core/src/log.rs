use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the `tracing` filter directive.
pub const LOG_ENV: &str = "ICTF_LOG";

///
/// Level
///

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Display, Serialize, Deserialize)]
pub enum Level {
    Debug, // least severe
    Info,
    Ok,
    Warn,
    Error, // most severe
}

///
/// Topic
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[remain::sorted]
pub enum Topic {
    Config,
    Did,
    Identity,
    Lifecycle,
    Mgmt,
    Payment,
}

#[macro_export]
macro_rules! log {
    // =========================================
    // (1) With topic (normal + trailing comma)
    // =========================================
    ($topic:expr, $level:ident, $fmt:expr $(, $arg:expr)* $(,)?) => {{
        $crate::log!(@inner Some(&$topic.to_string()), $crate::log::Level::$level, $fmt $(, $arg)*);
    }};

    // =========================================
    // (2) No topic (normal + trailing comma)
    // =========================================
    ($level:ident, $fmt:expr $(, $arg:expr)* $(,)?) => {{
        $crate::log!(@inner None::<&str>, $crate::log::Level::$level, $fmt $(, $arg)*);
    }};

    // =========================================
    // INTERNAL
    // =========================================
    (@inner $topic:expr, $level:expr, $fmt:expr $(, $arg:expr)*) => {{
        let level = $level;
        let topic_opt: Option<&str> = $topic;
        let message = format!($fmt $(, $arg)*);

        let final_msg = if let Some(t) = topic_opt {
            format!("[{t}] {message}")
        } else {
            message
        };

        match level {
            $crate::log::Level::Debug => ::tracing::debug!("{final_msg}"),
            $crate::log::Level::Info => ::tracing::info!("{final_msg}"),
            $crate::log::Level::Ok => ::tracing::info!(ok = true, "{final_msg}"),
            $crate::log::Level::Warn => ::tracing::warn!("{final_msg}"),
            $crate::log::Level::Error => ::tracing::error!("{final_msg}"),
        }
    }};
}

static INIT: Once = Once::new();

/// Install the stderr subscriber.
///
/// Terraform reads plugin stdout for its own protocol, so all log output goes
/// to stderr. The filter comes from `ICTF_LOG` and defaults to `info`.
/// Repeated calls are no-ops.
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Ok < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn log_macro_accepts_topic_and_plain_forms() {
        init();
        init();

        let pid = "aaaaa-aa";
        crate::log!(Topic::Mgmt, Info, "status for {pid}");
        crate::log!(Warn, "no topic {}", 1,);
    }
}
