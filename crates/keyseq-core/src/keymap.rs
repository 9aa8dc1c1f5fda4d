//! Key name to key code table.
//!
//! Maps human-readable key names (`"a"`, `"enter"`, `"ctrl"`) to the legacy
//! numeric `keyCode` values carried by dispatched events, plus the inverse
//! mapping. A table never changes after construction; share it with `Arc`.

use std::collections::{BTreeMap, HashMap};

use crate::ParseError;

/// Named keys of the standard US layout, in code order.
///
/// Letters and digits are added separately by [`KeyCodeTable::standard`].
const NAMED_KEYS: &[(&str, u32)] = &[
    ("backspace", 8),
    ("tab", 9),
    ("enter", 13),
    ("shift", 16),
    ("ctrl", 17),
    ("alt", 18),
    ("pause", 19),
    ("capsLock", 20),
    ("escape", 27),
    ("space", 32),
    ("pageUp", 33),
    ("pageDown", 34),
    ("end", 35),
    ("home", 36),
    ("left", 37),
    ("up", 38),
    ("right", 39),
    ("down", 40),
    ("insert", 45),
    ("delete", 46),
    ("meta", 91),
    ("rightMeta", 92),
    ("select", 93),
    ("multiply", 106),
    ("add", 107),
    ("subtract", 109),
    ("decimalPoint", 110),
    ("divide", 111),
    ("numLock", 144),
    ("scrollLock", 145),
    ("semiColon", 186),
    ("equalSign", 187),
    ("comma", 188),
    ("dash", 189),
    ("period", 190),
    ("forwardSlash", 191),
    ("graveAccent", 192),
    ("openBracket", 219),
    ("backSlash", 220),
    ("closeBracket", 221),
    ("singleQuote", 222),
];

/// Immutable bidirectional mapping between key names and key codes.
///
/// Several names may share a code; the inverse lookup returns the first name
/// registered for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCodeTable {
    codes: HashMap<String, u32>,
    names: BTreeMap<u32, String>,
}

impl KeyCodeTable {
    /// Standard US layout: letters, digits, numpad, function and named keys.
    pub fn standard() -> Self {
        let letters = (b'a'..=b'z').map(|c| (char::from(c).to_string(), u32::from(c - b'a') + 65));
        let digits = (0..=9u32).map(|d| (d.to_string(), 48 + d));
        let numpad = (0..=9u32).map(|d| (format!("numpad{d}"), 96 + d));
        let function = (1..=12u32).map(|n| (format!("f{n}"), 111 + n));
        let named = NAMED_KEYS.iter().map(|&(name, code)| (name.to_string(), code));

        Self::build(named.chain(letters).chain(digits).chain(numpad).chain(function))
    }

    /// Build a table from `(name, code)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is empty or registered twice.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut seen = HashMap::new();
        let mut ordered = Vec::new();

        for (name, code) in pairs {
            let name = name.into();
            if name.is_empty() {
                return Err(ParseError::EmptyKeyName { code });
            }
            if seen.insert(name.clone(), code).is_some() {
                return Err(ParseError::DuplicateKeyName { name });
            }
            ordered.push((name, code));
        }

        Ok(Self::build(ordered))
    }

    /// Decode a table from a JSON object of `{"name": code}` entries.
    ///
    /// Aliased codes resolve to the alphabetically first name.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let entries: BTreeMap<String, u32> = serde_json::from_str(json)?;
        Self::from_pairs(entries)
    }

    fn build(pairs: impl IntoIterator<Item = (String, u32)>) -> Self {
        let mut codes = HashMap::new();
        let mut names = BTreeMap::new();

        for (name, code) in pairs {
            names.entry(code).or_insert_with(|| name.clone());
            codes.insert(name, code);
        }

        Self { codes, names }
    }

    /// Key code for `name`, if known.
    pub fn code(&self, name: &str) -> Option<u32> {
        self.codes.get(name).copied()
    }

    /// Key name for `code`, if known.
    pub fn name(&self, code: u32) -> Option<&str> {
        self.names.get(&code).map(String::as_str)
    }

    /// Whether `name` has an entry.
    pub fn contains(&self, name: &str) -> bool {
        self.codes.contains_key(name)
    }

    /// Number of key names.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for KeyCodeTable {
    fn default() -> Self {
        Self::standard()
    }
}
