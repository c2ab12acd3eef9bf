#![forbid(unsafe_code)]

//! JSON log output for headless hosts.
//!
//! Enabled with the `tracing-json` feature. `runway-web` installs a browser
//! console subscriber from its module start hook instead.

use tracing_subscriber::EnvFilter;

use crate::error::FxError;

/// Install a global JSON subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter` when set and valid.
/// Fails if a global subscriber is already installed.
pub fn init(default_filter: &str) -> Result<(), FxError> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(env.as_deref(), default_filter)?;
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .try_init()
        .map_err(|e| FxError::Host(format!("tracing subscriber: {e}")))
}

fn build_filter(env: Option<&str>, default_filter: &str) -> Result<EnvFilter, FxError> {
    if let Some(filter) = env.and_then(|directives| EnvFilter::try_new(directives).ok()) {
        return Ok(filter);
    }
    EnvFilter::try_new(default_filter)
        .map_err(|e| FxError::InvalidConfig(format!("log filter: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bad_default_filter_is_invalid_config() {
        let err = build_filter(None, "runway_fx=loudest").unwrap_err();
        assert!(matches!(err, FxError::InvalidConfig(ref msg) if msg.starts_with("log filter")), "{err}");
    }

    #[test]
    fn env_directives_override_the_default() {
        let filter = build_filter(Some("runway_fx=debug"), "runway_fx=loudest").unwrap();
        assert!(filter.to_string().contains("runway_fx=debug"), "{filter}");
    }

    #[test]
    fn unparsable_env_falls_back_to_the_default() {
        let filter = build_filter(Some("runway_fx=loudest"), "warn").unwrap();
        let shown = filter.to_string();
        assert!(!shown.contains("runway_fx"), "{shown}");
        assert_eq!(shown, "warn");
    }
}
