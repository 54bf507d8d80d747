use std::env::{self, VarError};
use std::str::FromStr;

use crate::error::{PermadeployStdError, PermadeployStdResult};

/// Returns the value of `key` when it is set to something other than whitespace.
pub fn non_empty(key: &str) -> PermadeployStdResult<Option<String>> {
    match env::var(key) {
        Ok(v) if v.trim().is_empty() => Ok(None),
        Ok(v) => Ok(Some(v.trim().to_string())),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(PermadeployStdError::NotUnicode(key.to_string())),
    }
}

/// Parses `key` when present. Unset or blank variables are `None`, unparseable values are errors.
pub fn parse_optional<T>(key: &str) -> PermadeployStdResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = non_empty(key)? else {
        return Ok(None);
    };

    value
        .parse::<T>()
        .map(Some)
        .map_err(|e| PermadeployStdError::InvalidEnvValue {
            key: key.to_string(),
            value,
            reason: e.to_string(),
        })
}

pub fn as_boolean_truthy(key: &str) -> bool {
    env::var(key)
        .ok()
        .is_some_and(|a| a.to_lowercase() == "true" || a == "1")
}
