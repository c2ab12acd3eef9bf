#![forbid(unsafe_code)]

//! Error type shared by the effect controller, configuration and hosts.

use core::fmt;

/// Errors produced by `runway-fx`.
#[derive(Debug)]
pub enum FxError {
    /// A configuration value is out of range.
    InvalidConfig(String),
    /// Host-supplied JSON options could not be parsed.
    Json(serde_json::Error),
    /// A page element the caller required is absent.
    MissingElement(String),
    /// The embedding host reported a failure (canvas context, DOM call).
    Host(String),
}

impl fmt::Display for FxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Json(err) => write!(f, "invalid options json: {err}"),
            Self::MissingElement(what) => write!(f, "missing page element: {what}"),
            Self::Host(msg) => write!(f, "host error: {msg}"),
        }
    }
}

impl std::error::Error for FxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failure() {
        let err = FxError::MissingElement(".navbar".into());
        assert_eq!(err.to_string(), "missing page element: .navbar");
        let err = FxError::InvalidConfig("fire.particleCount must be > 0".into());
        assert!(err.to_string().starts_with("invalid config"));
    }

    #[test]
    fn json_errors_keep_their_source() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = FxError::from(parse);
        assert!(std::error::Error::source(&err).is_some());
    }
}
