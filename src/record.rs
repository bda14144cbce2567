//! MARC record structures and operations.
//!
//! A [`Record`] owns a [`Leader`] and an ordered list of variable fields.
//! Fields are a tagged variant: [`ControlField`] (tags 001-009, bare data)
//! or [`DataField`] (tags 010-999, two indicators plus subfields). The
//! record/field/subfield relationship is a strict ownership tree; fields
//! keep the order in which they were read (directory order), and subfields
//! keep stream order.
//!
//! # Examples
//!
//! ```
//! use marcstream::{ControlField, DataField, Field, Leader, Record, Subfield};
//!
//! let mut record = Record::new(Leader::default());
//! record.add_field(Field::Control(
//!     ControlField::new("001", "12345").unwrap(),
//! ));
//!
//! let mut title = DataField::new("245", '1', '0').unwrap();
//! title.add_subfield(Subfield::new('a', "Summerland /"));
//! title.add_subfield(Subfield::new('c', "Michael Chabon."));
//! record.add_field(Field::Data(title));
//!
//! assert_eq!(record.control_number(), Some("12345"));
//! assert_eq!(record.fields().len(), 2);
//! ```

use crate::error::{MarcError, Result};
use crate::leader::Leader;
use regex::Regex;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Field terminator octet (ends every variable field and the directory).
pub const FIELD_TERMINATOR: u8 = 0x1E;
/// Record terminator octet (ends every record).
pub const RECORD_TERMINATOR: u8 = 0x1D;
/// Subfield delimiter octet (introduces each subfield code).
pub const SUBFIELD_DELIMITER: u8 = 0x1F;

/// Highest tag value (exclusive) that names a control field.
const CONTROL_TAG_LIMIT: u16 = 10;

/// Parse and validate a three-digit tag, returning its numeric value.
fn parse_tag(tag: &str) -> Result<u16> {
    if tag.len() != 3 || !tag.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MarcError::InvalidTag(format!(
            "{tag} is not a three digit tag"
        )));
    }
    // Three ASCII digits always fit.
    Ok(tag.parse().unwrap_or(0))
}

/// True if the tag names a control field (numeric value below 010).
#[must_use]
pub fn is_control_tag(tag: &str) -> bool {
    matches!(parse_tag(tag), Ok(n) if n < CONTROL_TAG_LIMIT)
}

/// A `(code, data)` pair within a data field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subfield {
    /// Single-character subfield code.
    pub code: char,
    /// Decoded subfield data.
    pub data: String,
}

impl Subfield {
    /// Create a subfield.
    pub fn new(code: char, data: impl Into<String>) -> Self {
        Subfield {
            code,
            data: data.into(),
        }
    }

    /// True if the subfield data matches the pattern.
    #[must_use]
    pub fn find(&self, pattern: &Regex) -> bool {
        pattern.is_match(&self.data)
    }
}

impl std::fmt::Display for Subfield {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}{}", self.code, self.data)
    }
}

/// A control field: tag 001-009, bare data, no indicators or subfields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlField {
    tag: String,
    /// Decoded field data.
    pub data: String,
}

impl ControlField {
    /// Create a control field.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::InvalidTag`] unless the tag is three ASCII
    /// digits with numeric value below 010.
    pub fn new(tag: impl Into<String>, data: impl Into<String>) -> Result<Self> {
        let mut field = ControlField {
            tag: String::new(),
            data: data.into(),
        };
        field.set_tag(tag)?;
        Ok(field)
    }

    /// The field tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Replace the tag, enforcing the control-field tag invariant.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::InvalidTag`] for tags at or above 010.
    pub fn set_tag(&mut self, tag: impl Into<String>) -> Result<()> {
        let tag = tag.into();
        if parse_tag(&tag)? >= CONTROL_TAG_LIMIT {
            return Err(MarcError::InvalidTag(format!(
                "{tag} is not a valid control field tag"
            )));
        }
        self.tag = tag;
        Ok(())
    }
}

impl std::fmt::Display for ControlField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.tag, self.data)
    }
}

/// A compiled subfield selection pattern.
///
/// Mirrors the three string-pattern modes of the query surface: an empty
/// pattern selects everything, a pattern containing `[` compiles as a
/// regular expression over each subfield's one-character code, and anything
/// else is a plain list of candidate codes.
#[derive(Debug, Clone)]
pub enum SubfieldPattern {
    /// Select every subfield.
    All,
    /// Match the one-character code string against a regular expression.
    Regex(Regex),
    /// Select subfields whose code appears in the list.
    CharList(String),
}

impl SubfieldPattern {
    /// Compile a pattern string into its selection mode.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::InvalidPattern`] when a bracketed pattern fails
    /// to compile as a regular expression.
    pub fn parse(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            Ok(Self::All)
        } else if pattern.contains('[') {
            Regex::new(pattern)
                .map(Self::Regex)
                .map_err(|e| MarcError::InvalidPattern(format!("{e} in subfield pattern {pattern}")))
        } else {
            Ok(Self::CharList(pattern.to_string()))
        }
    }

    /// True if the pattern selects the given subfield code.
    #[must_use]
    pub fn matches(&self, code: char) -> bool {
        match self {
            Self::All => true,
            Self::Regex(re) => re.is_match(&code.to_string()),
            Self::CharList(list) => list.contains(code),
        }
    }
}

/// A data field: tag 010-999, two indicators, ordered subfields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataField {
    tag: String,
    /// First indicator.
    pub indicator1: char,
    /// Second indicator.
    pub indicator2: char,
    subfields: SmallVec<[Subfield; 4]>,
}

impl DataField {
    /// Create a data field with the given tag and indicators.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::InvalidTag`] unless the tag is three ASCII
    /// digits with numeric value 010 or above.
    pub fn new(tag: impl Into<String>, indicator1: char, indicator2: char) -> Result<Self> {
        let mut field = DataField {
            tag: String::new(),
            indicator1,
            indicator2,
            subfields: SmallVec::new(),
        };
        field.set_tag(tag)?;
        Ok(field)
    }

    /// The field tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Replace the tag, enforcing the data-field tag invariant.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::InvalidTag`] for tags below 010.
    pub fn set_tag(&mut self, tag: impl Into<String>) -> Result<()> {
        let tag = tag.into();
        if parse_tag(&tag)? < CONTROL_TAG_LIMIT {
            return Err(MarcError::InvalidTag(format!(
                "{tag} is not a valid data field tag"
            )));
        }
        self.tag = tag;
        Ok(())
    }

    /// Append a subfield.
    pub fn add_subfield(&mut self, subfield: Subfield) {
        self.subfields.push(subfield);
    }

    /// Insert a subfield at the given position.
    ///
    /// # Panics
    ///
    /// Panics if `index > self.subfields().len()`.
    pub fn insert_subfield(&mut self, index: usize, subfield: Subfield) {
        self.subfields.insert(index, subfield);
    }

    /// Remove the first subfield equal to the given one. Returns whether a
    /// subfield was removed.
    pub fn remove_subfield(&mut self, subfield: &Subfield) -> bool {
        match self.subfields.iter().position(|sf| sf == subfield) {
            Some(idx) => {
                self.subfields.remove(idx);
                true
            }
            None => false,
        }
    }

    /// All subfields, in stream order.
    #[must_use]
    pub fn subfields(&self) -> &[Subfield] {
        &self.subfields
    }

    /// All subfields with the given code.
    pub fn subfields_by_code(&self, code: char) -> impl Iterator<Item = &Subfield> {
        self.subfields.iter().filter(move |sf| sf.code == code)
    }

    /// The first subfield with the given code.
    #[must_use]
    pub fn subfield(&self, code: char) -> Option<&Subfield> {
        self.subfields.iter().find(|sf| sf.code == code)
    }

    /// All subfields selected by a compiled pattern.
    #[must_use]
    pub fn subfields_matching(&self, pattern: &SubfieldPattern) -> Vec<&Subfield> {
        self.subfields
            .iter()
            .filter(|sf| pattern.matches(sf.code))
            .collect()
    }

    /// Concatenate the data of the subfields a pattern selects.
    ///
    /// Returns `None` when no subfield matches. With a padding character,
    /// the data strings are joined with it. (The reference implementation
    /// appends the subfield data twice instead of padding, which is treated
    /// here as a defect rather than behavior to preserve.)
    #[must_use]
    pub fn subfields_as_string(
        &self,
        pattern: &SubfieldPattern,
        padding: Option<char>,
    ) -> Option<String> {
        let selected = self.subfields_matching(pattern);
        if selected.is_empty() {
            return None;
        }
        let joined = match padding {
            Some(pad) => selected
                .iter()
                .map(|sf| sf.data.as_str())
                .collect::<Vec<_>>()
                .join(&pad.to_string()),
            None => selected.iter().map(|sf| sf.data.as_str()).collect(),
        };
        Some(joined)
    }

    /// True if any subfield's data matches the pattern.
    #[must_use]
    pub fn find(&self, pattern: &Regex) -> bool {
        self.subfields.iter().any(|sf| sf.find(pattern))
    }
}

impl std::fmt::Display for DataField {
    /// Renders as `245 10$aSummerland /$cMichael Chabon.`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}{}", self.tag, self.indicator1, self.indicator2)?;
        for subfield in &self.subfields {
            write!(f, "{subfield}")?;
        }
        Ok(())
    }
}

/// A variable field: either a control field or a data field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    /// Tag 001-009.
    Control(ControlField),
    /// Tag 010-999.
    Data(DataField),
}

impl Field {
    /// The field tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Field::Control(cf) => cf.tag(),
            Field::Data(df) => df.tag(),
        }
    }

    /// This field as a control field, if it is one.
    #[must_use]
    pub fn as_control(&self) -> Option<&ControlField> {
        match self {
            Field::Control(cf) => Some(cf),
            Field::Data(_) => None,
        }
    }

    /// This field as a data field, if it is one.
    #[must_use]
    pub fn as_data(&self) -> Option<&DataField> {
        match self {
            Field::Data(df) => Some(df),
            Field::Control(_) => None,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Control(cf) => std::fmt::Display::fmt(cf, f),
            Field::Data(df) => std::fmt::Display::fmt(df, f),
        }
    }
}

/// A MARC record: one leader plus variable fields in directory order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record leader (24 octets on the wire).
    pub leader: Leader,
    fields: Vec<Field>,
}

impl Record {
    /// Create an empty record with the given leader.
    #[must_use]
    pub fn new(leader: Leader) -> Self {
        Record {
            leader,
            fields: Vec::new(),
        }
    }

    /// Append a field, keeping insertion order.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Remove the first field equal to the given one. Returns whether a
    /// field was removed.
    pub fn remove_field(&mut self, field: &Field) -> bool {
        match self.fields.iter().position(|f| f == field) {
            Some(idx) => {
                self.fields.remove(idx);
                true
            }
            None => false,
        }
    }

    /// All fields, in the order they were read (directory order).
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// All fields with the given tag, in record order.
    pub fn fields_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.iter().filter(move |f| f.tag() == tag)
    }

    /// All control fields, in record order.
    pub fn control_fields(&self) -> impl Iterator<Item = &ControlField> {
        self.fields.iter().filter_map(Field::as_control)
    }

    /// All data fields, in record order.
    pub fn data_fields(&self) -> impl Iterator<Item = &DataField> {
        self.fields.iter().filter_map(Field::as_data)
    }

    /// The first control field with tag 001, if present.
    #[must_use]
    pub fn control_number_field(&self) -> Option<&ControlField> {
        self.control_fields().find(|cf| cf.tag() == "001")
    }

    /// The record's control number (001 data), if present.
    #[must_use]
    pub fn control_number(&self) -> Option<&str> {
        self.control_number_field().map(|cf| cf.data.as_str())
    }

    /// Replace the leader.
    pub fn set_leader(&mut self, leader: Leader) {
        self.leader = leader;
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "LEADER {}", self.leader)?;
        for field in &self.fields {
            writeln!(f, "{field}")?;
        }
        Ok(())
    }
}
