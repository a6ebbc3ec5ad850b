//! Installs `env_logger` behind the `log` macros used throughout the crate.
//!
//! Shader compile/link failures are reported at `error`, GL resource lifetimes at `debug` and
//! per-frame work at `trace`, so `RUST_LOG=mini_gl_shapes=debug` is usually the useful setting.

use std::sync::Once;

/// `env_filter` takes precedence over `RUST_LOG`; `write_style` decides whether output is colored.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Only the first call has any effect. Without a filter from `config` or `RUST_LOG`, everything
/// at `info` and above is shown.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => builder.parse_filters(&filter),
            None => builder.filter_level(log::LevelFilter::Info),
        };

        builder.write_style(config.write_style);

        // A test harness may already have installed a logger.
        if builder.try_init().is_err() {
            log::debug!("logger already installed, keeping it");
            return;
        }

        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig {
            env_filter: Some("mini_gl_shapes=debug".to_string()),
            ..Default::default()
        });
        init_logging(LoggingConfig::default());
        log::info!("still alive after second init");
    }
}
