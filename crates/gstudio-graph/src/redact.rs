//! Payload redaction and size limiting.
//!
//! [`redact_payload`] masks sensitive keys and bounds strings and arrays in a
//! JSON value. [`sample_payload`] wraps it for arbitrary serializable values
//! and never fails: serialization problems turn into a diagnostic object.
//!
//! Keys are matched by their dotted path from the root. Array elements extend
//! the path as `items[3]`, so `items[3].password` is the path of a password
//! inside the fourth element of `items`.

use std::fmt;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value, json};

pub const REDACTED: &str = "[REDACTED]";
pub const TRUNCATED: &str = "[TRUNCATED]";

/// Arrays longer than this keep only their first elements plus a sentinel.
pub const MAX_ARRAY_ITEMS: usize = 100;

pub const DEFAULT_MAX_SIZE: usize = 1024;

pub const DEFAULT_PATTERNS: &[&str] = &["password", "token", "authorization", "cookie", "secret"];

/// Rule selecting which key paths to redact.
#[derive(Debug, Clone)]
pub enum RedactionPattern {
    /// Matches a path equal to the pattern or ending in `.{pattern}`.
    Exact(String),
    /// Matches when the regex finds a match anywhere in the path.
    Regex(Regex),
}

impl RedactionPattern {
    pub fn exact(pattern: impl Into<String>) -> Self {
        RedactionPattern::Exact(pattern.into())
    }

    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(RedactionPattern::Regex(Regex::new(pattern)?))
    }

    /// `/expr/` becomes a regex pattern, anything else an exact one.
    pub fn parse(pattern: &str) -> Result<Self, regex::Error> {
        match pattern
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
        {
            Some(expr) if pattern.len() >= 2 => Self::regex(expr),
            _ => Ok(Self::exact(pattern)),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            RedactionPattern::Exact(pattern) => {
                path == pattern
                    || path
                        .strip_suffix(pattern.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.'))
            }
            RedactionPattern::Regex(regex) => regex.is_match(path),
        }
    }
}

impl fmt::Display for RedactionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedactionPattern::Exact(pattern) => f.write_str(pattern),
            RedactionPattern::Regex(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

impl From<Regex> for RedactionPattern {
    fn from(regex: Regex) -> Self {
        RedactionPattern::Regex(regex)
    }
}

#[derive(Debug, Clone)]
pub struct RedactionOptions {
    pub patterns: Vec<RedactionPattern>,
    /// Longest string kept intact, in characters.
    pub max_size: usize,
}

impl RedactionOptions {
    pub fn new(patterns: Vec<RedactionPattern>, max_size: usize) -> Self {
        Self { patterns, max_size }
    }

    /// Build options from textual patterns, see [`RedactionPattern::parse`].
    pub fn parse<I, S>(patterns: I, max_size: usize) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| RedactionPattern::parse(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(patterns, max_size))
    }

    pub fn should_redact(&self, path: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(path))
    }
}

impl Default for RedactionOptions {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS
                .iter()
                .map(|pattern| RedactionPattern::exact(*pattern))
                .collect(),
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

/// Redacted copy of `value`.
pub fn redact_payload(value: &Value, options: &RedactionOptions) -> Value {
    redact_at(value, options, "")
}

fn redact_at(value: &Value, options: &RedactionOptions, path: &str) -> Value {
    match value {
        Value::String(text) => Value::String(truncate(text, options.max_size)),
        Value::Array(items) => {
            let mut redacted: Vec<Value> = items
                .iter()
                .take(MAX_ARRAY_ITEMS)
                .enumerate()
                .map(|(index, item)| redact_at(item, options, &format!("{}[{}]", path, index)))
                .collect();
            if items.len() > MAX_ARRAY_ITEMS {
                redacted.push(Value::String(TRUNCATED.to_string()));
            }
            Value::Array(redacted)
        }
        Value::Object(entries) => {
            let mut redacted = Map::new();
            for (key, entry) in entries {
                let current = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };

                let entry = if options.should_redact(&current) {
                    Value::String(REDACTED.to_string())
                } else {
                    redact_at(entry, options, &current)
                };
                redacted.insert(key.clone(), entry);
            }
            Value::Object(redacted)
        }
        other => other.clone(),
    }
}

fn truncate(text: &str, max_size: usize) -> String {
    match text.char_indices().nth(max_size) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATED),
        None => text.to_string(),
    }
}

/// Redact `payload` and bound its serialized size.
///
/// When the redacted JSON is longer than twice `max_size` characters, a
/// summary `{_truncated, _size, _preview}` replaces it.
pub fn sample_payload<T: Serialize + ?Sized>(payload: &T, options: &RedactionOptions) -> Value {
    let redacted = match serde_json::to_value(payload) {
        Ok(value) => redact_payload(&value, options),
        Err(err) => return serialization_failure::<T>(&err),
    };

    let text = match serde_json::to_string(&redacted) {
        Ok(text) => text,
        Err(err) => return serialization_failure::<T>(&err),
    };

    let size = text.chars().count();
    if size > options.max_size.saturating_mul(2) {
        return json!({
            "_truncated": true,
            "_size": size,
            "_preview": text.chars().take(options.max_size).collect::<String>(),
        });
    }

    redacted
}

fn serialization_failure<T: ?Sized>(err: &serde_json::Error) -> Value {
    tracing::debug!(error = %err, "payload could not be serialized");
    json!({
        "_error": "Failed to serialize payload",
        "_type": std::any::type_name::<T>(),
    })
}
