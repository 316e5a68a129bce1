//! @ai:module:intent Extract, fill and render prompt placeholders
//! @ai:module:layer domain
//! @ai:module:public_api Placeholders
//! @ai:module:depends_on error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use regex::Regex;

/// @ai:intent Insertion-ordered mapping from placeholder name to its value
///
/// Names come from `{name}` slots in prompt text. A prompt is usable only
/// once every value is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    entries: Vec<(String, String)>,
}

impl Placeholders {
    /// @ai:intent Create an empty placeholder set
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Extract placeholder names from prompt text, deduplicated in order
    /// @ai:example ("{src_lang} source: \"{source}\"") -> [src_lang, source]
    /// @ai:effects pure
    pub fn from_template(text: &str) -> Self {
        let re = Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("Invalid regex");

        let mut placeholders = Self::new();
        for capture in re.captures_iter(text) {
            let name = &capture[1];
            if placeholders.get(name).is_none() {
                placeholders.entries.push((name.to_string(), String::new()));
            }
        }
        placeholders
    }

    /// @ai:intent Re-extract names from an edited template, keeping values already entered
    /// @ai:effects state:write
    pub fn sync_with_template(&mut self, text: &str) {
        let mut fresh = Self::from_template(text);
        for (name, value) in &mut fresh.entries {
            if let Some(existing) = self.get(name) {
                *value = existing.to_string();
            }
        }
        *self = fresh;
    }

    /// @ai:intent Assign a placeholder value, uppercasing language codes
    ///
    /// Values for names containing "lang" are language codes and get
    /// normalized to uppercase. Assigning to an unknown name inserts it.
    /// @ai:effects state:write
    pub fn set(&mut self, name: &str, value: &str) {
        let value = if name.contains("lang") {
            value.to_uppercase()
        } else {
            value.to_string()
        };

        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name.to_string(), value));
        }
    }

    /// @ai:intent Look up a placeholder value
    /// @ai:effects pure
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// @ai:intent Iterate names in insertion order
    /// @ai:effects pure
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// @ai:intent Count placeholders whose value is still empty
    /// @ai:effects pure
    pub fn empty_count(&self) -> usize {
        self.entries.iter().filter(|(_, v)| v.is_empty()).count()
    }

    /// @ai:intent Whether every placeholder has a non-empty value
    /// @ai:effects pure
    pub fn is_complete(&self) -> bool {
        self.empty_count() == 0
    }

    /// @ai:intent Refuse finalization while any value is empty, reporting the count
    /// @ai:effects pure
    pub fn ensure_complete(&self) -> Result<()> {
        match self.empty_count() {
            0 => Ok(()),
            count => Err(Error::UnresolvedPlaceholders { count }),
        }
    }

    /// @ai:intent Substitute every `{name}` slot in the template with its value
    /// @ai:pre every placeholder value is non-empty
    /// @ai:effects pure
    pub fn render(&self, template: &str) -> Result<String> {
        self.ensure_complete()?;

        let mut rendered = template.to_string();
        for (name, value) in &self.entries {
            rendered = rendered.replace(&format!("{{{name}}}"), value);
        }
        Ok(rendered)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
