//! Slot specifiers and the predicates that decide which characters a slot accepts.
//!
//! A [`ValidationTable`] maps a specifier character (e.g. `9`) to a regular
//! expression tested against a single character. Any template character that
//! is a key in the table is a slot; everything else is a literal.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::MaskError;

/// Filler rendered for slots that have no character yet.
pub const DEFAULT_PLACEHOLDER: char = '_';

const LETTER_PATTERN: &str = "[A-Za-z]";
const LOWERCASE_PATTERN: &str = "[a-z]";
const DIGIT_PATTERN: &str = "[0-9]";

fn builtin(cell: &'static OnceLock<Regex>, pattern: &str) -> Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("Invalid built-in validation regex"))
        .clone()
}

/// Tests a regex against one character without allocating.
pub(crate) fn matches_char(validator: &Regex, ch: char) -> bool {
    let mut utf8 = [0u8; 4];
    validator.is_match(ch.encode_utf8(&mut utf8))
}

#[derive(Debug, Clone)]
pub struct ValidationTable {
    entries: BTreeMap<char, Regex>,
}

impl ValidationTable {
    /// A table with no specifiers; every template character is a literal.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register (or replace) the predicate for `specifier`.
    pub fn add_char_validation(&mut self, specifier: char, pattern: &str) -> Result<(), MaskError> {
        let validator = Regex::new(pattern)
            .map_err(|source| MaskError::InvalidPattern { specifier, source })?;
        self.entries.insert(specifier, validator);
        Ok(())
    }

    pub fn remove(&mut self, specifier: char) -> bool {
        self.entries.remove(&specifier).is_some()
    }

    pub fn is_slot(&self, ch: char) -> bool {
        self.entries.contains_key(&ch)
    }

    pub fn validator(&self, specifier: char) -> Option<&Regex> {
        self.entries.get(&specifier)
    }

    /// Whether the slot named by `specifier` accepts `ch`. Unknown specifiers accept nothing.
    pub fn accepts(&self, specifier: char, ch: char) -> bool {
        self.validator(specifier)
            .is_some_and(|validator| matches_char(validator, ch))
    }

    pub fn specifiers(&self) -> impl Iterator<Item = char> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ValidationTable {
    /// `A` letters, `a` lowercase letters, `9` digits.
    fn default() -> Self {
        static LETTER: OnceLock<Regex> = OnceLock::new();
        static LOWERCASE: OnceLock<Regex> = OnceLock::new();
        static DIGIT: OnceLock<Regex> = OnceLock::new();

        let mut entries = BTreeMap::new();
        entries.insert('A', builtin(&LETTER, LETTER_PATTERN));
        entries.insert('a', builtin(&LOWERCASE, LOWERCASE_PATTERN));
        entries.insert('9', builtin(&DIGIT, DIGIT_PATTERN));
        Self { entries }
    }
}

/// Settings shared by every field built from it: the placeholder symbol and
/// the specifier table.
///
/// Fields copy what they need at construction, so changing a config later
/// never reaches into fields that already exist.
#[derive(Debug, Clone)]
pub struct MaskConfig {
    pub placeholder: char,
    pub table: ValidationTable,
}

impl MaskConfig {
    pub fn new(placeholder: char, table: ValidationTable) -> Self {
        Self { placeholder, table }
    }

    pub fn set_placeholder(&mut self, placeholder: char) {
        self.placeholder = placeholder;
    }

    pub fn add_char_validation(&mut self, specifier: char, pattern: &str) -> Result<(), MaskError> {
        self.table.add_char_validation(specifier, pattern)
    }
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER,
            table: ValidationTable::default(),
        }
    }
}
