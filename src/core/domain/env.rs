//! Layered env files.
//!
//! Parses `KEY=VALUE` files into an ordered [`Env`] and merges layers so a
//! later layer overrides values without moving keys.

use std::path::Path;

use tracing::debug;

use crate::core::constants::REF_PREFIX;
use crate::error::Result;

/// Whether a raw value is a secret reference (`ref://...`).
///
/// Exact, case-sensitive prefix match. There is no escape syntax: a
/// literal value starting with `ref://` is treated as a reference.
pub fn is_reference(value: &str) -> bool {
    value.starts_with(REF_PREFIX)
}

/// The backend lookup path of a reference, if `value` is one.
pub fn reference_path(value: &str) -> Option<&str> {
    value.strip_prefix(REF_PREFIX)
}

/// A single env entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    /// The value was a reference token before resolution.
    pub was_ref: bool,
}

impl Entry {
    /// Create an entry, tagging it when the value is a reference.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        let was_ref = is_reference(&value);
        Self {
            key: key.into(),
            value,
            was_ref,
        }
    }
}

/// An ordered set of env entries with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Env {
    entries: Vec<Entry>,
}

impl Env {
    /// Create an empty env.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an env file from disk.
    ///
    /// # Errors
    ///
    /// Returns an IO error (`NotFound` kind) if the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading env file");
        let contents = std::fs::read_to_string(path)?;
        let env = Self::parse(&contents);
        debug!(path = %path.display(), entries = env.len(), "env file loaded");
        Ok(env)
    }

    /// Parse an env file, returning an empty env if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load_optional(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(Self::parse(&contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "optional env file absent");
                Ok(Self::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse env file contents.
    ///
    /// Skips empty lines, `#` comments, and lines without `=`. Quotes around
    /// a value are stripped; there is no multi-line or `$VAR` expansion.
    /// A key repeated within one file keeps its first position and last value.
    pub fn parse(contents: &str) -> Self {
        let mut env = Self::new();

        for line in contents.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                env.set(Entry::new(key, parse_env_value(value.trim())));
            }
        }

        env
    }

    /// Build from key-value pairs, in order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut env = Self::new();
        for (key, value) in pairs {
            env.set(Entry::new(key, value));
        }
        env
    }

    /// Merge layers left to right.
    ///
    /// A later layer replaces the value (and the reference tag) of a key but
    /// never its position; keys first seen in a later layer are appended.
    pub fn merge<'a>(layers: impl IntoIterator<Item = &'a Env>) -> Self {
        let mut merged = Self::new();
        for layer in layers {
            for entry in &layer.entries {
                merged.set(entry.clone());
            }
        }
        merged
    }

    /// Insert or replace an entry, keeping the position of an existing key.
    pub fn set(&mut self, entry: Entry) {
        match self.entries.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entry(key).map(|e| e.value.as_str())
    }

    /// Get an entry by key
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// All entries in order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Consume into the ordered entries
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    /// Whether any entry is a reference
    pub fn has_references(&self) -> bool {
        self.entries.iter().any(|e| e.was_ref)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Entry>> for Env {
    fn from(entries: Vec<Entry>) -> Self {
        let mut env = Self::new();
        for entry in entries {
            env.set(entry);
        }
        env
    }
}

/// Render entries in dotenv format.
///
/// Values that came from references are always quoted and escaped; literal
/// values are quoted only when they contain whitespace or special characters.
pub fn to_env_string(entries: &[Entry]) -> String {
    let mut output = String::new();

    for entry in entries {
        if entry.was_ref || needs_quotes(&entry.value) {
            output.push_str(&format!(
                "{}=\"{}\"\n",
                entry.key,
                escape_env_value(&entry.value)
            ));
        } else {
            output.push_str(&format!("{}={}\n", entry.key, entry.value));
        }
    }

    output
}

impl std::fmt::Display for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", to_env_string(&self.entries))
    }
}

fn parse_env_value(raw: &str) -> String {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return unescape_double_quoted(&raw[1..raw.len() - 1]);
    }

    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return raw[1..raw.len() - 1].to_string();
    }

    raw.to_string()
}

fn unescape_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value.chars().any(|ch| ch.is_whitespace())
        || value.contains('#')
        || value.contains('=')
        || value.contains('"')
        || value.contains('\'')
        || value.contains('\\')
}

fn escape_env_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(ch),
        }
    }

    escaped
}
