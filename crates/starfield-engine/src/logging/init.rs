use std::sync::Once;

/// Modules that stay at `warn` under the default filter.
const GPU_MODULES: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

/// Logger configuration.
///
/// `filter` uses `env_logger` syntax (e.g. "starfield_widget=debug,wgpu=warn")
/// and wins over `RUST_LOG`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub default_level: log::LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            default_level: log::LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Filter string to install: explicit filter, then `rust_log`, then the
    /// default level with GPU internals quieted.
    pub fn resolve_filter(&self, rust_log: Option<&str>) -> String {
        if let Some(filter) = self.filter.as_deref().or(rust_log) {
            return filter.to_string();
        }

        let level = self.default_level.to_string().to_lowercase();
        let mut spec = level;
        for module in GPU_MODULES {
            spec.push_str(&format!(",{module}=warn"));
        }
        spec
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let rust_log = std::env::var("RUST_LOG").ok();
        let filter = config.resolve_filter(rust_log.as_deref());

        env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .init();

        log::debug!("logging initialized with filter {filter:?}");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_quiets_gpu_internals() {
        let spec = LoggingConfig::default().resolve_filter(None);
        assert_eq!(spec, "info,wgpu_core=warn,wgpu_hal=warn,naga=warn");
    }

    #[test]
    fn rust_log_overrides_default() {
        let spec = LoggingConfig::default().resolve_filter(Some("debug"));
        assert_eq!(spec, "debug");
    }

    #[test]
    fn explicit_filter_wins() {
        let cfg = LoggingConfig {
            filter: Some("starfield_widget=trace".into()),
            ..LoggingConfig::default()
        };
        assert_eq!(cfg.resolve_filter(Some("debug")), "starfield_widget=trace");
    }
}
