use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod request;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use request::{RenderRequest, RenderRequestBuilder};
pub use settings::{Config, Defaults, Logging, Provider, Tickers, View, ViewToggles};

/// Loads the application configuration.
///
/// The TOML file is optional; every key has a default. Environment variables
/// prefixed with `DASHBOARD__` override file values, e.g.
/// `DASHBOARD__DEFAULTS__SMA_WINDOW=50` or `DASHBOARD__TICKERS__BASE=PLTR,CW8.PA`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_with_env(path, None)
}

/// `env` replaces the process environment as the override source when given.
fn load_with_env(path: &Path, env: Option<config::Map<String, String>>) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("tickers.base")
                .source(env),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

/// Checks values that serde cannot express as types.
fn validate(config: &Config) -> Result<(), ConfigError> {
    let window = config.defaults.sma_window;
    if !(settings::MIN_SMA_WINDOW..=settings::MAX_SMA_WINDOW).contains(&window) {
        return Err(ConfigError::ValidationError(format!(
            "defaults.sma_window must be between {} and {}, got {}",
            settings::MIN_SMA_WINDOW,
            settings::MAX_SMA_WINDOW,
            window
        )));
    }
    if config.defaults.initial_investment <= rust_decimal::Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "defaults.initial_investment must be positive".to_string(),
        ));
    }
    if config.provider.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "provider.timeout_secs must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.defaults.sma_window, 200);
        assert_eq!(config.defaults.initial_investment, dec!(1000));
        assert!(config.views.show_price);
        assert!(!config.views.show_sma);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[tickers]
base = ["PLTR", "CW8.PA"]

[defaults]
initial_investment = 2500.0
sma_window = 50
fallback_start_date = "2015-01-01"

[views]
show_sma = true
show_insights = false
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.tickers.base, vec!["PLTR".to_string(), "CW8.PA".to_string()]);
        assert_eq!(config.defaults.initial_investment, dec!(2500));
        assert_eq!(config.defaults.sma_window, 50);
        assert!(config.views.show_sma);
        assert!(!config.views.show_insights);
        assert!(config.views.show_leaderboard);
    }

    #[test]
    fn environment_overrides_file_and_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[defaults]\nsma_window = 100").unwrap();

        let env = [
            ("DASHBOARD__TICKERS__BASE", "PLTR,CW8.PA"),
            ("DASHBOARD__DEFAULTS__SMA_WINDOW", "50"),
            ("DASHBOARD__VIEWS__SHOW_SMA", "true"),
            ("DASHBOARD__VIEWS__SHOW_INSIGHTS", "false"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = load_with_env(file.path(), Some(env)).unwrap();
        assert_eq!(config.tickers.base, vec!["PLTR".to_string(), "CW8.PA".to_string()]);
        assert_eq!(config.defaults.sma_window, 50);
        assert!(config.views.show_sma);
        assert!(!config.views.show_insights);
        assert_eq!(config.defaults.initial_investment, dec!(1000));
    }

    #[test]
    fn invalid_window_in_file_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[defaults]\nsma_window = 500").unwrap();

        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn only_restricts_views() {
        let toggles = ViewToggles::default().only(&[View::Leaderboard]);
        assert!(toggles.is_enabled(View::Leaderboard));
        assert!(!toggles.is_enabled(View::Analysis));
        assert!(!toggles.is_enabled(View::Insights));
        assert_eq!(ViewToggles::default().only(&[]), ViewToggles::default());
    }
}
