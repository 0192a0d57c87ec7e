//! Environment-driven console configuration.

use std::env;

use clavis_core::{AppError, AppResult};

/// Console settings read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL of the backend REST API.
    pub api_base_url: String,
    /// Bearer token presented to the backend, when set.
    pub api_token: Option<String>,
    /// Per-request HTTP timeout in seconds.
    pub http_timeout_seconds: u64,
    /// Upper bound for one grant/revoke batch in milliseconds.
    pub batch_timeout_ms: u64,
}

impl ConsoleConfig {
    pub fn load() -> AppResult<Self> {
        let api_base_url = env::var("CLAVIS_API_BASE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080".to_owned())
            .trim_end_matches('/')
            .to_owned();
        let api_token = env::var("CLAVIS_API_TOKEN")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        let http_timeout_seconds = parse_env_u64("CLAVIS_HTTP_TIMEOUT_SECONDS", 15)?;
        let batch_timeout_ms = parse_env_u64("CLAVIS_BATCH_TIMEOUT_MS", 10_000)?;

        Ok(Self {
            api_base_url,
            api_token,
            http_timeout_seconds,
            batch_timeout_ms,
        })
    }
}

fn parse_env_u64(name: &str, default: u64) -> AppResult<u64> {
    parse_u64(name, env::var(name).ok().as_deref(), default)
}

/// Parses an optional raw value as a positive integer, falling back to
/// `default` when absent.
fn parse_u64(name: &str, raw: Option<&str>, default: u64) -> AppResult<u64> {
    let value = match raw {
        Some(raw) => raw.parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{raw}': {error}"))
        })?,
        None => default,
    };

    if value == 0 {
        return Err(AppError::Validation(format!(
            "{name} must be greater than zero"
        )));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use clavis_core::AppError;

    use super::parse_u64;

    #[test]
    fn absent_values_fall_back_to_the_default() {
        let parsed = parse_u64("CLAVIS_BATCH_TIMEOUT_MS", None, 10_000);

        assert_eq!(parsed.unwrap_or_default(), 10_000);
    }

    #[test]
    fn non_numeric_values_are_rejected_with_the_variable_name() {
        let parsed = parse_u64("CLAVIS_HTTP_TIMEOUT_SECONDS", Some("soon"), 15);

        assert!(matches!(
            parsed,
            Err(AppError::Validation(message)) if message.contains("CLAVIS_HTTP_TIMEOUT_SECONDS")
        ));
    }

    #[test]
    fn zero_values_are_rejected() {
        for name in ["CLAVIS_HTTP_TIMEOUT_SECONDS", "CLAVIS_BATCH_TIMEOUT_MS"] {
            let parsed = parse_u64(name, Some("0"), 15);

            assert!(matches!(parsed, Err(AppError::Validation(_))));
        }
    }
}
