//! Validation and formatting contract of a single matrix cell.
//!
//! A [`TypeFormat`] is tagged with a [`DataType`] and carries the rules of
//! that variant: decimals and bounds for numbers, selection texts for
//! selection cells, allowed-character / allowed-match patterns and forbidden
//! texts for text cells. Constructors are fallible and never leave a
//! half-initialized format behind.
//!
//! # Example
//!
//! ```
//! use mfsim_model::TypeFormat;
//!
//! let format = TypeFormat::numeric_with_bounds(2, 0.0, 10.0).unwrap();
//! assert!(format.is_value_allowed("3.25"));
//! assert!(!format.is_value_allowed("3.255"));
//! assert_eq!(format.format_value("3.1"), "3.10");
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use regex::Regex;

use crate::definitions::{MAX_UNIQUE_SUFFIX_ATTEMPTS, NOT_DEFINED, NUMERIC_NULL_VALUE};
use crate::enums::DataType;
use crate::error::{ModelError, Result};
use crate::numeric::{check_double_representation, format_double, format_double_str, parse_double, round_double};
use crate::timestamp::is_valid_standard_timestamp;
use crate::xml::XmlElement;

// XML element names
const TYPE_FORMAT: &str = "ValueItemDataTypeFormat";
const TYPE: &str = "Type";
const NUMBER_OF_DECIMALS: &str = "NumberOfDecimals";
const MINIMUM_VALUE: &str = "MinimumValue";
const MAXIMUM_VALUE: &str = "MaximumValue";
const DEFAULT_VALUE: &str = "DefaultValue";
const HAS_EXCLUSIVE_SELECTION_TEXTS: &str = "HasExclusiveSelectionTexts";
const IS_EDITABLE: &str = "IsEditable";
const IS_FIRST_ROW_EDITABLE_ONLY: &str = "IsFirstRowEditableOnly";
const IS_UNIQUE_DEFAULT: &str = "IsUniqueDefault";
const ALLOWED_CHARACTERS: &str = "AllowedCharacters";
const ALLOWED_MATCH: &str = "AllowedMatch";
const SELECTION_TEXTS: &str = "SelectionTexts";
const SELECTION_SINGLE_TEXT: &str = "SelectionSingleText";
const FORBIDDEN_TEXTS: &str = "ForbiddenTexts";
const FORBIDDEN_SINGLE_TEXT: &str = "ForbiddenSingleText";

/// A regular expression matched against the whole input.
///
/// Equality compares the source string, not the compiled automaton.
#[derive(Clone)]
pub struct TextPattern {
    source: String,
    regex: Regex,
}

impl TextPattern {
    /// Compiles `source`; the whole input must match.
    pub fn new(source: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{source})$"))
            .map_err(|error| ModelError::regex(source, error))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_full_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for TextPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Debug for TextPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextPattern").field(&self.source).finish()
    }
}

fn compile_optional(source: &str) -> Result<Option<TextPattern>> {
    if source.is_empty() {
        Ok(None)
    } else {
        TextPattern::new(source).map(Some)
    }
}

fn validate_selection_texts(texts: &[String]) -> Result<()> {
    if texts.is_empty() {
        return Err(ModelError::EmptySelectionSet);
    }
    match texts.iter().position(String::is_empty) {
        Some(index) => Err(ModelError::EmptySelectionText { index }),
        None => Ok(()),
    }
}

fn validate_forbidden_texts(texts: &[String]) -> Result<()> {
    if texts.is_empty() || texts.iter().any(String::is_empty) {
        Err(ModelError::EmptyForbiddenSet)
    } else {
        Ok(())
    }
}

fn validate_bounds(minimum: f64, maximum: f64) -> Result<()> {
    if maximum < minimum || minimum.is_nan() || maximum.is_nan() {
        Err(ModelError::InvalidBounds { minimum, maximum })
    } else {
        Ok(())
    }
}

/// Validation, formatting and selection contract of a cell.
#[derive(Debug, Clone)]
pub struct TypeFormat {
    data_type: DataType,
    number_of_decimals: u32,
    minimum_value: f64,
    maximum_value: f64,
    default_value: String,
    selection_texts: Vec<String>,
    selection_lookup: HashSet<String>,
    forbidden_texts: Vec<String>,
    has_exclusive_selection_texts: bool,
    is_editable: bool,
    is_first_row_editable_only: bool,
    is_unique_default: bool,
    is_highlighted: bool,
    allowed_characters: Option<TextPattern>,
    allowed_match: Option<TextPattern>,
}

impl Default for TypeFormat {
    fn default() -> Self {
        Self {
            data_type: DataType::Numeric,
            number_of_decimals: 0,
            minimum_value: -f64::MAX,
            maximum_value: f64::MAX,
            default_value: String::new(),
            selection_texts: Vec::new(),
            selection_lookup: HashSet::new(),
            forbidden_texts: Vec::new(),
            has_exclusive_selection_texts: false,
            is_editable: true,
            is_first_row_editable_only: false,
            is_unique_default: false,
            is_highlighted: false,
            allowed_characters: None,
            allowed_match: None,
        }
    }
}

impl PartialEq for TypeFormat {
    /// Structural equality; the highlight flag is presentation state and ignored.
    fn eq(&self, other: &Self) -> bool {
        self.data_type == other.data_type
            && self.number_of_decimals == other.number_of_decimals
            && self.minimum_value == other.minimum_value
            && self.maximum_value == other.maximum_value
            && self.selection_texts == other.selection_texts
            && self.forbidden_texts == other.forbidden_texts
            && self.default_value == other.default_value
            && self.has_exclusive_selection_texts == other.has_exclusive_selection_texts
            && self.is_editable == other.is_editable
            && self.is_first_row_editable_only == other.is_first_row_editable_only
            && self.is_unique_default == other.is_unique_default
            && self.allowed_characters == other.allowed_characters
            && self.allowed_match == other.allowed_match
    }
}

impl TypeFormat {
    // =========================================================================
    // CONSTRUCTION
    // =========================================================================

    /// Unbounded `NUMERIC` format with the given number of decimals.
    pub fn numeric(decimals: u32) -> Self {
        Self {
            number_of_decimals: decimals,
            ..Self::default()
        }
    }

    /// `NUMERIC_NULL` format: a number or the `null` sentinel.
    pub fn numeric_null(decimals: u32) -> Self {
        Self {
            data_type: DataType::NumericNull,
            number_of_decimals: decimals,
            ..Self::default()
        }
    }

    /// `NUMERIC` format with bounds rounded to `decimals`.
    pub fn numeric_with_bounds(decimals: u32, minimum: f64, maximum: f64) -> Result<Self> {
        validate_bounds(minimum, maximum)?;
        Ok(Self {
            number_of_decimals: decimals,
            minimum_value: round_double(minimum, decimals),
            maximum_value: round_double(maximum, decimals),
            ..Self::default()
        })
    }

    /// `NUMERIC` format with bounds and a formatted default inside them.
    pub fn numeric_with_default(default: &str, decimals: u32, minimum: f64, maximum: f64) -> Result<Self> {
        let mut format = Self::numeric_with_bounds(decimals, minimum, maximum)?;
        format.default_value = format.checked_numeric_default(default)?;
        Ok(format)
    }

    /// Unconstrained `TEXT` format.
    pub fn text(default: &str) -> Self {
        Self {
            data_type: DataType::Text,
            default_value: default.to_string(),
            ..Self::default()
        }
    }

    /// `TEXT` format with allowed-character and allowed-match patterns.
    ///
    /// Empty pattern strings mean "no constraint".
    pub fn text_with_patterns(
        default: &str,
        allowed_characters: &str,
        allowed_match: &str,
        is_unique_default: bool,
    ) -> Result<Self> {
        Ok(Self {
            data_type: DataType::Text,
            default_value: default.to_string(),
            is_unique_default,
            allowed_characters: compile_optional(allowed_characters)?,
            allowed_match: compile_optional(allowed_match)?,
            ..Self::default()
        })
    }

    /// `TEXT_EMPTY` format that rejects the forbidden texts (case-insensitive).
    pub fn text_empty(allowed_characters: &str, allowed_match: &str, forbidden_texts: Vec<String>) -> Result<Self> {
        validate_forbidden_texts(&forbidden_texts)?;
        Ok(Self {
            data_type: DataType::TextEmpty,
            forbidden_texts,
            allowed_characters: compile_optional(allowed_characters)?,
            allowed_match: compile_optional(allowed_match)?,
            ..Self::default()
        })
    }

    /// `SELECTION_TEXT` format.
    ///
    /// The default must be one of `texts`; without one the first text is used.
    pub fn selection(
        texts: Vec<String>,
        default: Option<&str>,
        has_exclusive_selection_texts: bool,
        is_first_row_editable_only: bool,
    ) -> Result<Self> {
        validate_selection_texts(&texts)?;
        let default_value = match default {
            Some(value) if texts.iter().any(|text| text == value) => value.to_string(),
            Some(value) => {
                return Err(ModelError::invalid_default(value, "not one of the selection texts"));
            }
            None => texts[0].clone(),
        };
        let mut format = Self {
            data_type: DataType::SelectionText,
            default_value,
            has_exclusive_selection_texts,
            is_first_row_editable_only,
            ..Self::default()
        };
        format.replace_selection_texts(texts);
        Ok(format)
    }

    /// Format of the given type with default settings.
    pub fn of_type(data_type: DataType) -> Self {
        Self {
            data_type,
            ..Self::default()
        }
    }

    /// Format of the given type with a formatted default.
    pub fn of_type_with_default(data_type: DataType, default: &str) -> Self {
        let mut format = Self::of_type(data_type);
        format.default_value = format.format_value(default);
        format
    }

    pub fn with_editable(mut self, is_editable: bool) -> Self {
        self.is_editable = is_editable;
        self
    }

    pub fn with_unique_default(mut self, is_unique_default: bool) -> Self {
        self.is_unique_default = is_unique_default;
        self
    }

    pub fn with_first_row_editable_only(mut self, value: bool) -> Self {
        self.is_first_row_editable_only = value;
        self
    }

    pub fn with_highlight(mut self, value: bool) -> Self {
        self.is_highlighted = value;
        self
    }

    // =========================================================================
    // ADMISSION
    // =========================================================================

    /// Returns true if `value` satisfies this format's admission rule.
    pub fn is_value_allowed(&self, value: &str) -> bool {
        match self.data_type {
            DataType::Numeric => self.is_numeric_representation(value),
            DataType::NumericNull => value == NUMERIC_NULL_VALUE || self.is_numeric_representation(value),
            DataType::Text => self.is_match_text(value),
            DataType::TextEmpty => self.is_match_text_empty(value),
            DataType::SelectionText => self.selection_lookup.contains(value),
            DataType::Timestamp => is_valid_standard_timestamp(value),
            DataType::TimestampEmpty => value.trim().is_empty() || is_valid_standard_timestamp(value),
            DataType::Directory => value.is_empty() || Path::new(value).is_dir(),
            DataType::File => value.is_empty() || Path::new(value).is_file(),
            DataType::MolecularStructure | DataType::MonomerStructure => true,
        }
    }

    fn is_numeric_representation(&self, value: &str) -> bool {
        check_double_representation(value, self.minimum_value, self.maximum_value, self.number_of_decimals)
    }

    /// Single-character check for keystroke filtering.
    pub fn is_character_allowed(&self, character: char) -> bool {
        match &self.allowed_characters {
            None => true,
            Some(pattern) => pattern.is_full_match(character.encode_utf8(&mut [0; 4])),
        }
    }

    /// Returns true if every character of `text` is allowed.
    pub fn has_text_allowed_characters(&self, text: &str) -> bool {
        match &self.allowed_characters {
            None => true,
            Some(_) if text.is_empty() => false,
            Some(pattern) => pattern.is_full_match(text),
        }
    }

    /// Non-empty text that matches the allowed-match pattern (if any).
    pub fn is_match_text(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        self.allowed_match
            .as_ref()
            .is_none_or(|pattern| pattern.is_full_match(text))
    }

    /// Empty text, or text that is not forbidden and matches the pattern.
    pub fn is_match_text_empty(&self, text: &str) -> bool {
        if text.is_empty() {
            return true;
        }
        if self.is_in_forbidden_texts(text) {
            return false;
        }
        self.allowed_match
            .as_ref()
            .is_none_or(|pattern| pattern.is_full_match(text))
    }

    /// Case-insensitive membership in the forbidden texts (`TEXT_EMPTY` only).
    pub fn is_in_forbidden_texts(&self, text: &str) -> bool {
        if self.data_type != DataType::TextEmpty || text.is_empty() {
            return false;
        }
        let lowered = text.to_lowercase();
        self.forbidden_texts
            .iter()
            .any(|forbidden| forbidden.to_lowercase() == lowered)
    }

    /// Exact membership in the selection texts (`SELECTION_TEXT` only).
    pub fn has_selection_text(&self, text: &str) -> bool {
        self.data_type == DataType::SelectionText && self.selection_lookup.contains(text)
    }

    /// True if every text is a selection text; false for an empty slice.
    pub fn has_selection_texts<S: AsRef<str>>(&self, texts: &[S]) -> bool {
        self.data_type == DataType::SelectionText
            && !texts.is_empty()
            && texts.iter().all(|text| self.selection_lookup.contains(text.as_ref()))
    }

    // =========================================================================
    // FORMATTING
    // =========================================================================

    /// Renders `value` for storage.
    ///
    /// Numbers are rounded to the decimal count; the `null` sentinel, text
    /// that is not a number and every non-numeric type pass through.
    pub fn format_value(&self, value: &str) -> String {
        if value.is_empty() {
            return String::new();
        }
        match self.data_type {
            DataType::Numeric => format_double_str(value, self.number_of_decimals),
            DataType::NumericNull if value != NUMERIC_NULL_VALUE => {
                format_double_str(value, self.number_of_decimals)
            }
            _ => value.to_string(),
        }
    }

    pub fn minimum_value_representation(&self) -> String {
        if self.minimum_value == -f64::MAX {
            NOT_DEFINED.to_string()
        } else {
            format_double(self.minimum_value, self.number_of_decimals)
        }
    }

    pub fn maximum_value_representation(&self) -> String {
        if self.maximum_value == f64::MAX {
            NOT_DEFINED.to_string()
        } else {
            format_double(self.maximum_value, self.number_of_decimals)
        }
    }

    // =========================================================================
    // DEFAULTS AND SELECTION TEXTS
    // =========================================================================

    /// First selection text that differs from the default.
    pub fn first_non_default_selection_text(&self) -> Option<&str> {
        if self.data_type != DataType::SelectionText || self.default_value.is_empty() {
            return None;
        }
        self.selection_texts
            .iter()
            .find(|text| **text != self.default_value)
            .map(String::as_str)
    }

    /// Derives a default that differs from all `others`.
    ///
    /// Appends an increasing counter to the default. When the result no
    /// longer matches the allowed-match pattern, characters are dropped from
    /// the end of the base until it does. Gives up after a fixed number of
    /// attempts.
    pub fn unique_default_value<S: AsRef<str>>(&self, others: &[S]) -> Result<String> {
        let taken: HashSet<&str> = others.iter().map(AsRef::as_ref).collect();
        if !taken.contains(self.default_value.as_str()) {
            return Ok(self.default_value.clone());
        }
        let base: Vec<char> = self.default_value.chars().collect();
        for counter in 1..=MAX_UNIQUE_SUFFIX_ATTEMPTS {
            let mut candidate = format!("{}{counter}", self.default_value);
            let mut subtract = 1;
            while !self.is_match_text(&candidate) && subtract < base.len() {
                let prefix: String = base[..base.len() - subtract].iter().collect();
                candidate = format!("{prefix}{counter}");
                subtract += 1;
            }
            if !taken.contains(candidate.as_str()) {
                return Ok(candidate);
            }
        }
        Err(ModelError::UniqueValueExhausted {
            base: self.default_value.clone(),
            attempts: MAX_UNIQUE_SUFFIX_ATTEMPTS,
        })
    }

    /// Sets the default; selection formats require a member.
    pub fn set_default_value(&mut self, value: &str) -> Result<()> {
        if self.data_type == DataType::SelectionText && !self.selection_lookup.contains(value) {
            return Err(ModelError::invalid_default(value, "not one of the selection texts"));
        }
        self.default_value = self.format_value(value);
        Ok(())
    }

    /// Replaces default and selection texts in one step; `value` must be a member.
    pub fn set_default_value_and_selection_texts(&mut self, value: &str, texts: Vec<String>) -> Result<()> {
        self.require_type(DataType::SelectionText, "set_default_value_and_selection_texts")?;
        validate_selection_texts(&texts)?;
        if !texts.iter().any(|text| text == value) {
            return Err(ModelError::invalid_default(value, "not one of the selection texts"));
        }
        self.default_value = self.format_value(value);
        self.replace_selection_texts(texts);
        Ok(())
    }

    /// Replaces the selection texts; the default falls back to the first
    /// text when it is no longer a member.
    pub fn set_selection_texts(&mut self, texts: Vec<String>) -> Result<()> {
        self.require_type(DataType::SelectionText, "set_selection_texts")?;
        validate_selection_texts(&texts)?;
        if !texts.iter().any(|text| *text == self.default_value) {
            self.default_value = self.format_value(&texts[0]);
        }
        self.replace_selection_texts(texts);
        Ok(())
    }

    /// Replaces the forbidden texts (`TEXT_EMPTY` only).
    pub fn set_forbidden_texts(&mut self, texts: Vec<String>) -> Result<()> {
        self.require_type(DataType::TextEmpty, "set_forbidden_texts")?;
        validate_forbidden_texts(&texts)?;
        self.forbidden_texts = texts;
        Ok(())
    }

    /// Sets bounds and default together, checking their mutual consistency.
    pub fn set_min_max_default_value(&mut self, minimum: f64, maximum: f64, default: &str) -> Result<()> {
        validate_bounds(minimum, maximum)?;
        let parsed = parse_double(default)
            .ok_or_else(|| ModelError::invalid_default(default, "not a number"))?;
        if parsed < minimum || parsed > maximum {
            return Err(ModelError::invalid_default(default, "outside of the bounds"));
        }
        self.minimum_value = round_double(minimum, self.number_of_decimals);
        self.maximum_value = round_double(maximum, self.number_of_decimals);
        self.default_value = self.format_value(default);
        Ok(())
    }

    pub fn set_minimum_value(&mut self, minimum: f64) -> Result<()> {
        let rounded = round_double(minimum, self.number_of_decimals);
        validate_bounds(rounded, self.maximum_value)?;
        self.minimum_value = rounded;
        Ok(())
    }

    pub fn set_maximum_value(&mut self, maximum: f64) -> Result<()> {
        let rounded = round_double(maximum, self.number_of_decimals);
        validate_bounds(self.minimum_value, rounded)?;
        self.maximum_value = rounded;
        Ok(())
    }

    /// Turns `NUMERIC` into `NUMERIC_NULL`; true if the format is now nullable.
    pub fn convert_to_numeric_null(&mut self) -> bool {
        match self.data_type {
            DataType::Numeric => {
                self.data_type = DataType::NumericNull;
                true
            }
            DataType::NumericNull => true,
            _ => false,
        }
    }

    pub fn set_editable(&mut self, value: bool) {
        self.is_editable = value;
    }

    pub fn set_first_row_editable_only(&mut self, value: bool) {
        self.is_first_row_editable_only = value;
    }

    pub fn set_highlight(&mut self, value: bool) {
        self.is_highlighted = value;
    }

    fn replace_selection_texts(&mut self, texts: Vec<String>) {
        self.selection_lookup = texts.iter().cloned().collect();
        self.selection_texts = texts;
    }

    fn require_type(&self, data_type: DataType, operation: &'static str) -> Result<()> {
        if self.data_type == data_type {
            Ok(())
        } else {
            Err(ModelError::WrongDataType {
                operation,
                data_type: self.data_type,
            })
        }
    }

    fn checked_numeric_default(&self, default: &str) -> Result<String> {
        let formatted = self.format_value(default);
        if formatted.is_empty() || self.is_value_allowed(&formatted) {
            Ok(formatted)
        } else {
            Err(ModelError::invalid_default(default, "not a number within the bounds"))
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn number_of_decimals(&self) -> u32 {
        self.number_of_decimals
    }

    pub fn minimum_value(&self) -> f64 {
        self.minimum_value
    }

    pub fn maximum_value(&self) -> f64 {
        self.maximum_value
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn selection_texts(&self) -> &[String] {
        &self.selection_texts
    }

    pub fn forbidden_texts(&self) -> &[String] {
        &self.forbidden_texts
    }

    pub fn has_exclusive_selection_texts(&self) -> bool {
        self.has_exclusive_selection_texts
    }

    pub fn is_editable(&self) -> bool {
        self.is_editable
    }

    pub fn is_first_row_editable_only(&self) -> bool {
        self.is_first_row_editable_only
    }

    pub fn is_unique_default(&self) -> bool {
        self.is_unique_default
    }

    pub fn is_highlighted(&self) -> bool {
        self.is_highlighted
    }

    /// Numeric format without decimals.
    pub fn is_integer_number(&self) -> bool {
        self.data_type.is_numeric() && self.number_of_decimals == 0
    }

    /// Source of the allowed-characters pattern, empty if unset.
    pub fn allowed_characters(&self) -> &str {
        self.allowed_characters.as_ref().map_or("", TextPattern::source)
    }

    /// Source of the allowed-match pattern, empty if unset.
    pub fn allowed_match(&self) -> &str {
        self.allowed_match.as_ref().map_or("", TextPattern::source)
    }

    // =========================================================================
    // XML
    // =========================================================================

    pub fn to_xml_element(&self) -> XmlElement {
        let mut root = XmlElement::versioned(TYPE_FORMAT);
        root.push_text(TYPE, self.data_type.as_str());
        root.push_text(NUMBER_OF_DECIMALS, self.number_of_decimals.to_string());
        root.push_text(MINIMUM_VALUE, format!("{:?}", self.minimum_value));
        root.push_text(MAXIMUM_VALUE, format!("{:?}", self.maximum_value));
        root.push_text(DEFAULT_VALUE, self.default_value.as_str());
        root.push_text(HAS_EXCLUSIVE_SELECTION_TEXTS, self.has_exclusive_selection_texts.to_string());
        root.push_text(IS_EDITABLE, self.is_editable.to_string());
        root.push_text(IS_FIRST_ROW_EDITABLE_ONLY, self.is_first_row_editable_only.to_string());
        root.push_text(IS_UNIQUE_DEFAULT, self.is_unique_default.to_string());
        root.push_text(ALLOWED_CHARACTERS, self.allowed_characters());
        root.push_text(ALLOWED_MATCH, self.allowed_match());
        root.push_text_list(SELECTION_TEXTS, SELECTION_SINGLE_TEXT, &self.selection_texts);
        root.push_text_list(FORBIDDEN_TEXTS, FORBIDDEN_SINGLE_TEXT, &self.forbidden_texts);
        root
    }

    /// Reads a format element; values are taken as written, not re-validated.
    pub fn from_xml_element(element: &XmlElement) -> Result<Self> {
        element.expect_name(TYPE_FORMAT)?;
        element.check_version()?;

        let type_text = element.child_text(TYPE)?;
        let data_type: DataType = type_text
            .parse()
            .map_err(|_| ModelError::invalid_value(TYPE, type_text))?;
        let decimals: i64 = element.parse_child(NUMBER_OF_DECIMALS)?;
        let number_of_decimals =
            u32::try_from(decimals).map_err(|_| ModelError::InvalidNumberOfDecimals { value: decimals })?;

        let mut format = Self {
            data_type,
            number_of_decimals,
            minimum_value: element.parse_child(MINIMUM_VALUE)?,
            maximum_value: element.parse_child(MAXIMUM_VALUE)?,
            default_value: element.child_text(DEFAULT_VALUE)?.to_string(),
            forbidden_texts: element.text_list(FORBIDDEN_TEXTS),
            has_exclusive_selection_texts: element.bool_child(HAS_EXCLUSIVE_SELECTION_TEXTS)?,
            is_editable: element.bool_child(IS_EDITABLE)?,
            is_first_row_editable_only: element.bool_child(IS_FIRST_ROW_EDITABLE_ONLY)?,
            is_unique_default: element.bool_child(IS_UNIQUE_DEFAULT)?,
            allowed_characters: compile_optional(element.child_text(ALLOWED_CHARACTERS)?)?,
            allowed_match: compile_optional(element.child_text(ALLOWED_MATCH)?)?,
            ..Self::default()
        };
        format.replace_selection_texts(element.text_list(SELECTION_TEXTS));
        Ok(format)
    }
}
