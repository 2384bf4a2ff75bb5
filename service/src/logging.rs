use crate::config::Config;
use log::LevelFilter;
use simplelog::{self, ConfigBuilder};

/// Dependency modules silenced unless running at Trace level.
const FILTERED_MODULES: &[&str] = &["hyper", "h2", "reqwest", "rustls", "tower", "axum"];

/// Process-wide terminal logger setup.
pub struct Logger {}

impl Logger {
    /// Initializes the global terminal logger from the configured level filter.
    ///
    /// At Trace every record is shown, including HTTP stack internals. At any
    /// other level the modules in `FILTERED_MODULES` are dropped.
    pub fn init_logger(config: &Config) {
        let log_level_filter = Self::convert_level_filter(config.log_level_filter);
        let apply_filters = Self::should_filter_dependencies(config.log_level_filter);
        let log_config = Self::build_log_config(apply_filters);

        simplelog::TermLogger::init(
            log_level_filter,
            log_config,
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        )
        .expect("Failed to start simplelog");
    }

    /// Maps the `log` level filter onto simplelog's equivalent.
    fn convert_level_filter(level: LevelFilter) -> simplelog::LevelFilter {
        match level {
            LevelFilter::Off => simplelog::LevelFilter::Off,
            LevelFilter::Error => simplelog::LevelFilter::Error,
            LevelFilter::Warn => simplelog::LevelFilter::Warn,
            LevelFilter::Info => simplelog::LevelFilter::Info,
            LevelFilter::Debug => simplelog::LevelFilter::Debug,
            LevelFilter::Trace => simplelog::LevelFilter::Trace,
        }
    }

    /// Dependency output is only wanted at Trace.
    fn should_filter_dependencies(level: LevelFilter) -> bool {
        level != LevelFilter::Trace
    }

    /// RFC 3339 timestamps, plus the dependency filters when `apply_filters` is set.
    fn build_log_config(apply_filters: bool) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if apply_filters {
            for module in FILTERED_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }
}
