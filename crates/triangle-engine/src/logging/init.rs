use std::sync::Once;

/// Filter used when neither `LoggingConfig::env_filter` nor `RUST_LOG` is set.
///
/// The GPU stack is chatty at `info`, so it is held to `warn`.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Stream log lines are written to.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum LogTarget {
    #[default]
    Stdout,
    Stderr,
}

impl From<LogTarget> for env_logger::Target {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Stdout => env_logger::Target::Stdout,
            LogTarget::Stderr => env_logger::Target::Stderr,
        }
    }
}

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "debug",
/// "triangle_engine=debug,wgpu_core=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Diagnostics go to standard output unless redirected here.
    pub target: LogTarget,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            target: LogTarget::default(),
        }
    }
}

impl LoggingConfig {
    /// The filter string that `init_logging` will apply.
    pub fn resolved_filter(&self) -> String {
        resolve_filter(self.env_filter.as_deref(), std::env::var("RUST_LOG").ok().as_deref())
    }
}

fn resolve_filter(explicit: Option<&str>, env: Option<&str>) -> String {
    explicit
        .or(env)
        .filter(|f| !f.trim().is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
///
/// Call early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.resolved_filter();

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);
        builder.target(config.target.into());

        if let Err(e) = builder.try_init() {
            eprintln!("logger already installed: {e}");
            return;
        }

        log::debug!("logging initialized with filter `{filter}`");
    });
}
