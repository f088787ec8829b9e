//! Key/value properties files
//!
//! Reads and writes the flat `key=value` files used for AVD descriptors
//! (`config.ini`, `hardware.ini`, ...) and the `sdk.info` marker.
//!
//! Keys and values are trimmed, so trailing whitespace in a value is not
//! preserved; escape it as `\t` or similar when it matters.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Local;
use configparser::ini::Ini;
use tracing::debug;

use crate::error::{LocationError, Result};

const DEFAULT_SECTION: &str = "default";

/// Flat set of string properties
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Create an empty property set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse properties text
    pub fn parse(text: &str) -> Result<Self> {
        let body: String = logical_lines(text)
            .into_iter()
            .map(|line| {
                // A bracketed line is a plain key here, not an ini section
                if line.starts_with('[') {
                    format!("\\{}\n", line)
                } else {
                    format!("{}\n", line)
                }
            })
            .collect();

        let mut ini = Ini::new_cs();
        ini.set_comment_symbols(&[]);
        let mut sections = ini.read(body).map_err(LocationError::Config)?;

        let mut entries = BTreeMap::new();
        if let Some(section) = sections.remove(DEFAULT_SECTION) {
            for (key, value) in section {
                entries.insert(unescape(&key), unescape(&value.unwrap_or_default()));
            }
        }
        if !sections.is_empty() {
            debug!("Ignoring {} unexpected section(s) in properties text", sections.len());
        }

        Ok(Self { entries })
    }

    /// Load a properties file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Get a property value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Set a property value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as text, with `comment` and a timestamp as the header
    pub fn to_text(&self, comment: &str) -> String {
        let mut content = String::new();
        content.push_str(&format!("#{}\n", comment));
        content.push_str(&format!("#{}\n", Local::now().format("%a %b %d %H:%M:%S %Z %Y")));

        for (key, value) in &self.entries {
            content.push_str(&format!("{}={}\n", escape(key), escape(value)));
        }

        content
    }

    /// Write to disk, replacing any existing file
    pub fn store(&self, path: &Path, comment: &str) -> Result<()> {
        std::fs::write(path, self.to_text(comment))?;
        Ok(())
    }
}

/// Join continuation lines and drop comments
///
/// A line ending in an odd number of backslashes continues on the next
/// line, whose leading whitespace is dropped. Comments only count at the
/// start of a line, so a `#` inside a value is data.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;

    for raw in text.lines() {
        let trimmed = raw.trim_start();
        let mut line = match pending.take() {
            Some(mut head) => {
                head.push_str(trimmed);
                head
            }
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                trimmed.to_string()
            }
        };

        let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            line.pop();
            pending = Some(line);
        } else {
            lines.push(line);
        }
    }
    if let Some(line) = pending {
        lines.push(line);
    }

    lines
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' | ':' | '=' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
