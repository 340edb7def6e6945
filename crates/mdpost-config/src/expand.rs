//! Environment variable expansion for configuration strings.
//!
//! Supports `${VAR}` (errors when unset) and `${VAR:-default}`
//! (falls back to the default when unset).

use std::sync::LazyLock;

use regex::Regex;

use crate::ConfigError;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").unwrap());

/// Expand environment variable references in a configuration value.
///
/// `field` names the config field for error reporting.
///
/// # Errors
///
/// Returns `ConfigError::EnvVar` if a `${VAR}` reference without a
/// default names an unset variable.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let mut error = None;
    let expanded = ENV_VAR.replace_all(value, |caps: &regex::Captures<'_>| {
        let var = &caps[1];
        match std::env::var(var) {
            Ok(found) => found,
            Err(_) => match caps.get(2) {
                Some(default) => default.as_str().to_owned(),
                None => {
                    if error.is_none() {
                        error = Some(ConfigError::EnvVar {
                            field: field.to_owned(),
                            message: format!("${{{var}}} not set"),
                        });
                    }
                    String::new()
                }
            },
        }
    });

    match error {
        Some(err) => Err(err),
        None => Ok(expanded.into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_passthrough() {
        assert_eq!(expand_env("plain value", "f").unwrap(), "plain value");
    }

    #[test]
    fn test_expand_set_variable() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MDPOST_EXPAND_TEST", "hello");
        }
        assert_eq!(
            expand_env("pre-${MDPOST_EXPAND_TEST}-post", "f").unwrap(),
            "pre-hello-post"
        );
        unsafe {
            std::env::remove_var("MDPOST_EXPAND_TEST");
        }
    }

    #[test]
    fn test_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MDPOST_EXPAND_UNSET");
        }
        assert_eq!(
            expand_env("${MDPOST_EXPAND_UNSET:-fallback}", "f").unwrap(),
            "fallback"
        );
    }

    #[test]
    fn test_default_ignored_when_set() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MDPOST_EXPAND_SET", "real");
        }
        assert_eq!(
            expand_env("${MDPOST_EXPAND_SET:-fallback}", "f").unwrap(),
            "real"
        );
        unsafe {
            std::env::remove_var("MDPOST_EXPAND_SET");
        }
    }

    #[test]
    fn test_missing_without_default_is_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MDPOST_EXPAND_MISSING");
        }
        let err = expand_env("${MDPOST_EXPAND_MISSING}", "blog.name").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MDPOST_EXPAND_MISSING"));
        assert!(err.to_string().contains("blog.name"));
    }

    #[test]
    fn test_empty_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MDPOST_EXPAND_EMPTY");
        }
        assert_eq!(expand_env("${MDPOST_EXPAND_EMPTY:-}", "f").unwrap(), "");
    }
}
