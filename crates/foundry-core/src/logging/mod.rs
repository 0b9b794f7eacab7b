use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LOG_LEVEL_ENV;

/// Initialize logging with optional quiet mode.
///
/// When `quiet` is true, only error-level events are emitted.
/// When `quiet` is false, info-level and above events are emitted (default),
/// or whatever level `FOUNDRY_LOG_LEVEL` names.
/// `RUST_LOG` directives are honoured on top of the default.
pub fn init_logging(quiet: bool) {
    let directive = log_directive(quiet);

    let filter = match directive.parse() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };

    // try_init: a second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .try_init();
}

fn log_directive(quiet: bool) -> String {
    let level = if quiet {
        "error".to_string()
    } else {
        match std::env::var(LOG_LEVEL_ENV) {
            Ok(level) if !level.is_empty() => level,
            _ => "info".to_string(),
        }
    };
    format!("foundry={}", level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serializes tests that modify FOUNDRY_LOG_LEVEL.
    static LOG_LEVEL_ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_log_directive_levels() {
        let _lock = LOG_LEVEL_ENV_LOCK.lock().unwrap();

        // SAFETY: We hold LOG_LEVEL_ENV_LOCK to serialize test access
        unsafe { std::env::remove_var(LOG_LEVEL_ENV) };
        assert_eq!(log_directive(false), "foundry=info");
        assert_eq!(log_directive(true), "foundry=error");

        // SAFETY: We hold LOG_LEVEL_ENV_LOCK to serialize test access
        unsafe { std::env::set_var(LOG_LEVEL_ENV, "debug") };
        assert_eq!(log_directive(false), "foundry=debug");
        assert_eq!(log_directive(true), "foundry=error");

        // SAFETY: We hold LOG_LEVEL_ENV_LOCK to serialize test access
        unsafe { std::env::set_var(LOG_LEVEL_ENV, "") };
        assert_eq!(log_directive(false), "foundry=info");

        // SAFETY: We hold LOG_LEVEL_ENV_LOCK to serialize test access
        unsafe { std::env::remove_var(LOG_LEVEL_ENV) };
    }

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        init_logging(true);
        init_logging(false);
    }
}
