#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Module overview
//!
//! - [`reader`] — streaming ISO 2709 decoder ([`MarcStreamReader`])
//! - [`writer`] — canonical ISO 2709 serializer ([`MarcStreamWriter`])
//! - [`record`] — the record model ([`Record`], [`Field`], [`ControlField`],
//!   [`DataField`], [`Subfield`])
//! - [`leader`] — the 24-octet record leader ([`Leader`])
//! - [`encoding`] — charset schemes and decoding, including MARC-8
//! - [`marc8_tables`] — the MARC-8 designation tables
//! - [`error`] — [`MarcError`] and the crate [`Result`]

pub mod encoding;
pub mod error;
pub mod leader;
pub mod marc8_tables;
pub mod reader;
pub mod record;
pub mod writer;

pub use encoding::CharsetScheme;
pub use error::{MarcError, Result};
pub use leader::Leader;
pub use reader::MarcStreamReader;
pub use record::{
    ControlField, DataField, Field, Record, Subfield, SubfieldPattern, FIELD_TERMINATOR,
    RECORD_TERMINATOR, SUBFIELD_DELIMITER,
};
pub use writer::MarcStreamWriter;
