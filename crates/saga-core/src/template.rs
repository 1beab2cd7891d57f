//! Placeholder templates with inferred delimiters.
//!
//! A [`Template`] is built from a template string and a short sample of one
//! placeholder occurrence (`"<x>"`, `"{{ key }}"`). The opening and closing
//! delimiters are read off the sample, every `open + name + close` occurrence
//! in the template becomes a placeholder, and values are matched to
//! placeholder names case-insensitively.
//!
//! Assigning a value to a name that is not a placeholder of the template is
//! not an error: the value is dropped. Callers rely on this to hand every
//! field of a record to any template and let each template pick the ones it
//! shows.

use std::collections::HashMap;

use regex::Regex;
use tracing::trace;

use crate::error::{CoreError, Result};

/// A template string with named placeholders.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    open: String,
    close: String,
    pattern: Regex,
    /// Distinct placeholder names in order of first appearance.
    keys: Vec<String>,
    /// Values assigned since the last render, keyed by placeholder name.
    values: HashMap<String, String>,
    /// Value for placeholders left unassigned at render time.
    default_value: Option<String>,
}

impl Template {
    /// Creates a template, inferring the delimiters from `delimiter_sample`.
    ///
    /// The sample must look like `(\W+)\w+(\W+)`: the first run of non-word
    /// characters is the opening delimiter, the second the closing one.
    pub fn new(template: &str, delimiter_sample: &str) -> Result<Self> {
        let (open, close) = infer_delimiters(delimiter_sample)?;
        Self::with_delimiters(template, &open, Some(&close))
    }

    /// Creates a template with explicit delimiters. Without a closing
    /// delimiter the opening one is used on both sides.
    pub fn with_delimiters(template: &str, open: &str, close: Option<&str>) -> Result<Self> {
        let close = close.unwrap_or(open);
        if open.is_empty() || close.is_empty() {
            return Err(CoreError::configuration("placeholder delimiters must not be empty"));
        }

        let pattern = Regex::new(&format!(
            "{}(\\S+?){}",
            regex::escape(open),
            regex::escape(close)
        ))
        .map_err(|e| CoreError::configuration(format!("invalid placeholder pattern: {e}")))?;

        let keys = scan_keys(&pattern, template)?;

        Ok(Self {
            source: template.to_string(),
            open: open.to_string(),
            close: close.to_string(),
            pattern,
            keys,
            values: HashMap::new(),
            default_value: None,
        })
    }

    /// Sets the value used for unassigned placeholders.
    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets or clears the value used for unassigned placeholders.
    pub fn set_default_value(&mut self, value: Option<String>) {
        self.default_value = value;
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Returns the template string.
    pub fn template(&self) -> &str {
        &self.source
    }

    /// Replaces the template string and rescans its placeholders.
    ///
    /// On error the previous template stays in place.
    pub fn set_template(&mut self, template: &str) -> Result<()> {
        let keys = scan_keys(&self.pattern, template)?;
        self.source = template.to_string();
        self.keys = keys;
        self.values.retain(|k, _| self.keys.contains(k));
        Ok(())
    }

    /// Placeholder names in order of first appearance, case preserved.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The opening and closing delimiters.
    pub fn delimiters(&self) -> (&str, &str) {
        (&self.open, &self.close)
    }

    /// Assigns a value to the placeholder matching `key`.
    ///
    /// An exact match wins over a case-insensitive one. A key that matches
    /// no placeholder is ignored.
    pub fn assign(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        match self.find_key(key) {
            Some(name) => {
                let name = name.to_string();
                self.values.insert(name, value.into());
            }
            None => trace!(key, "no such placeholder, value dropped"),
        }
        self
    }

    /// Assigns `values`, substitutes every placeholder and clears all
    /// assignments. The default value setting is kept.
    pub fn render<I, K, V>(&mut self, values: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in values {
            self.assign(key.as_ref(), value);
        }
        let text = self.substitute(&self.values);
        self.values.clear();
        text
    }

    /// Renders with the given values without touching the assignments held
    /// by this template.
    pub fn fill<I, K, V>(&self, values: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut merged = self.values.clone();
        for (key, value) in values {
            if let Some(name) = self.find_key(key.as_ref()) {
                merged.insert(name.to_string(), value.into());
            }
        }
        self.substitute(&merged)
    }

    fn find_key(&self, key: &str) -> Option<&str> {
        if let Some(exact) = self.keys.iter().find(|k| k.as_str() == key) {
            return Some(exact);
        }
        let lower = key.to_lowercase();
        self.keys
            .iter()
            .find(|k| k.to_lowercase() == lower)
            .map(String::as_str)
    }

    /// Replaces each placeholder with its value, or the default value, or
    /// leaves it untouched.
    fn substitute(&self, values: &HashMap<String, String>) -> String {
        self.pattern
            .replace_all(&self.source, |caps: &regex::Captures<'_>| {
                let name = &caps[1];
                match values.get(name).or(self.default_value.as_ref()) {
                    Some(value) => value.clone(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// Reads the opening and closing delimiters off a placeholder sample.
fn infer_delimiters(sample: &str) -> Result<(String, String)> {
    let shape = Regex::new(r"(\W+)\w+(\W+)")
        .map_err(|e| CoreError::configuration(format!("invalid delimiter pattern: {e}")))?;

    let caps = shape.captures(sample).ok_or_else(|| {
        CoreError::configuration(format!(
            "cannot infer placeholder delimiters from '{sample}'"
        ))
    })?;

    Ok((caps[1].to_string(), caps[2].to_string()))
}

/// Collects the distinct placeholder names of `template`, rejecting names
/// that differ only by case.
fn scan_keys(pattern: &Regex, template: &str) -> Result<Vec<String>> {
    let mut keys: Vec<String> = Vec::new();
    for caps in pattern.captures_iter(template) {
        let name = &caps[1];
        if !keys.iter().any(|k| k == name) {
            keys.push(name.to_string());
        }
    }

    let mut folded: Vec<String> = keys.iter().map(|k| k.to_lowercase()).collect();
    folded.sort();
    folded.dedup();
    if folded.len() < keys.len() {
        return Err(CoreError::configuration(format!(
            "ambiguous placeholder names in template '{template}'"
        )));
    }

    Ok(keys)
}
