//! Crate-level error type and message sanitization
//!
//! Each layer owns its error enum (`ApiError`, `ToolError`, `ConfigError`,
//! `TransportError`); `AppError` unifies them for the binary.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Maximum length of an error message handed back to the MCP host
pub const MAX_ERROR_MESSAGE_LEN: usize = 500;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("API client error: {0}")]
    Api(#[from] crate::api::ApiError),

    #[error("Tool error: {0}")]
    Tool(#[from] crate::tools::ToolError),

    #[error("Transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),
}

/// Result type for application operations
pub type AppResult<T> = Result<T, AppError>;

static SECRET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(password|token|key|secret|cookie|session)[=:]\s*[^\s;&]+")
        .expect("secret pattern is valid")
});

static SENSITIVE_PATH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/[a-zA-Z0-9._/-]+/(secrets?|\.ssh|\.aws|\.config)/[a-zA-Z0-9._/-]+")
        .expect("path pattern is valid")
});

/// Sanitize error messages before they leave the process
pub fn sanitize_error_message(message: &str) -> String {
    let mut sanitized = SECRET_PATTERN
        .replace_all(message, "${1}=***")
        .to_string();

    sanitized = SENSITIVE_PATH_PATTERN
        .replace_all(&sanitized, "/***REDACTED***/")
        .to_string();

    if sanitized.len() > MAX_ERROR_MESSAGE_LEN {
        let truncate_suffix = "...[truncated]";
        let mut cut = MAX_ERROR_MESSAGE_LEN - truncate_suffix.len();
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized = format!("{}{}", &sanitized[..cut], truncate_suffix);
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::config::ConfigError;

    #[test]
    fn test_sanitize_redacts_secrets() {
        let sanitized =
            sanitize_error_message("Failed to authenticate: password=secret123 token=abc456");

        assert!(!sanitized.contains("secret123"));
        assert!(!sanitized.contains("abc456"));
        assert!(sanitized.contains("password=***"));
        assert!(sanitized.contains("token=***"));
    }

    #[test]
    fn test_sanitize_redacts_cookie_pairs() {
        let sanitized = sanitize_error_message("rejected session=2f01a06f; cookie: visid=UQk4");
        assert!(!sanitized.contains("2f01a06f"));
        assert!(!sanitized.contains("UQk4"));
    }

    #[test]
    fn test_sanitize_keeps_product_urls() {
        let message = "Error response 404 while requesting https://www.coles.com.au/_next/data/b/en/product/acme-milk-1l-123.json?slug=acme-milk-1l-123";
        assert_eq!(sanitize_error_message(message), message);
    }

    #[test]
    fn test_sanitize_case_insensitive() {
        let sanitized = sanitize_error_message("PASSWORD=secret123 Token=abc Key=xyz");
        assert!(!sanitized.contains("secret123"));
        assert!(!sanitized.contains("abc"));
        assert!(!sanitized.contains("xyz"));
    }

    #[test]
    fn test_file_path_redaction() {
        let sanitized = sanitize_error_message("Failed to read /home/user/.ssh/id_rsa");
        assert!(sanitized.contains("/***REDACTED***/"));
        assert!(!sanitized.contains("id_rsa"));
    }

    #[test]
    fn test_long_message_truncation() {
        let sanitized = sanitize_error_message(&"x".repeat(600));
        assert!(sanitized.len() <= MAX_ERROR_MESSAGE_LEN);
        assert!(sanitized.ends_with("...[truncated]"));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let sanitized = sanitize_error_message(&"é".repeat(400));
        assert!(sanitized.len() <= MAX_ERROR_MESSAGE_LEN);
        assert!(sanitized.ends_with("...[truncated]"));
    }

    #[test]
    fn test_exactly_max_length_untouched() {
        let message = "x".repeat(MAX_ERROR_MESSAGE_LEN);
        assert_eq!(sanitize_error_message(&message), message);
    }

    #[test]
    fn test_app_error_wraps_layers() {
        let error: AppError = ApiError::invalid_input("empty").into();
        assert_eq!(error.to_string(), "API client error: Invalid input: empty");

        let error: AppError = ConfigError::InvalidConfig("bad".to_string()).into();
        assert_eq!(
            error.to_string(),
            "Configuration error: Invalid configuration: bad"
        );
    }
}
