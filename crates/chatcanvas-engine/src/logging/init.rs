use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "chatcanvas_engine=debug,wgpu=warn"). In the browser only its level part is
/// honoured; `console_log` has no per-module filtering.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,

    /// Used when neither `env_filter` nor `RUST_LOG` is set.
    pub default_level: log::LevelFilter,

    #[cfg(not(target_arch = "wasm32"))]
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: log::LevelFilter::Info,
            #[cfg(not(target_arch = "wasm32"))]
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        install(config);
        log::debug!("logging initialized");
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn install(config: LoggingConfig) {
    let mut builder = env_logger::Builder::new();

    if let Some(filter) = config.env_filter {
        builder.parse_filters(&filter);
    } else if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else {
        builder.filter_level(config.default_level);
    }

    builder.write_style(config.write_style);
    builder.init();
}

#[cfg(target_arch = "wasm32")]
fn install(config: LoggingConfig) {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    let level = config
        .env_filter
        .as_deref()
        .and_then(browser_level)
        .unwrap_or(config.default_level);

    if let Some(level) = level.to_level() {
        // Fails only if another logger is already installed.
        let _ = console_log::init_with_level(level);
    }
}

/// Level of a filter string that is a bare level such as "debug".
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn browser_level(filter: &str) -> Option<log::LevelFilter> {
    filter.trim().parse().ok()
}
