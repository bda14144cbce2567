//! MARC record leader parsing and manipulation.
//!
//! The leader is a 24-octet fixed-length area at the start of every MARC
//! record. It describes the record's framing (total length, base address of
//! the data area, directory entry map) and its content (status, type,
//! character coding scheme).
//!
//! # Structure
//!
//! - Positions 0-4: record length (5 digits)
//! - Position 5: record status
//! - Position 6: type of record
//! - Positions 7-8: implementation defined
//! - Position 9: character coding scheme (space = MARC-8, 'a' = UCS/Unicode)
//! - Position 10: indicator count (usually 2)
//! - Position 11: subfield code length (usually 2)
//! - Positions 12-16: base address of data (5 digits)
//! - Position 17: encoding level
//! - Position 18: descriptive cataloging form
//! - Position 19: multipart resource record level
//! - Positions 20-23: directory entry map (usually "4500")

use crate::error::{MarcError, Result};
use serde::{Deserialize, Serialize};

/// Number of octets in a MARC leader.
pub const LEADER_LEN: usize = 24;

/// MARC leader - 24 octets at the start of every MARC record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    /// Record length in octets, including the leader, directory, and both
    /// terminators (positions 0-4).
    pub record_length: u32,
    /// Record status (position 5).
    pub record_status: char,
    /// Type of record (position 6).
    pub type_of_record: char,
    /// Implementation-defined values (positions 7-8).
    pub impl_defined1: [char; 2],
    /// Character coding scheme (position 9): space = MARC-8, 'a' = UCS/Unicode.
    pub char_coding_scheme: char,
    /// Indicator count (position 10, usually 2).
    pub indicator_count: u8,
    /// Subfield code length (position 11, usually 2).
    pub subfield_code_length: u8,
    /// Base address of the data area (positions 12-16).
    pub base_address_of_data: u32,
    /// Encoding level (position 17).
    pub encoding_level: char,
    /// Descriptive cataloging form (position 18).
    pub desc_cataloging_form: char,
    /// Multipart resource record level (position 19).
    pub multipart_level: char,
    /// Directory entry map (positions 20-23): length-of-field length,
    /// length-of-starting-character-position length, length of
    /// implementation-defined portion, undefined.
    pub entry_map: [char; 4],
}

impl Leader {
    /// Parse a leader from exactly 24 octets.
    ///
    /// Digit regions tolerate leading space padding (spaces read as zeros),
    /// which some legacy systems emit in the record length.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::MalformedLeader`] if the slice is not 24 octets
    /// long or a numeric position holds a non-digit octet.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != LEADER_LEN {
            return Err(MarcError::MalformedLeader(format!(
                "Leader must be exactly {LEADER_LEN} octets, got {}",
                bytes.len()
            )));
        }

        let record_length = parse_padded_digits(&bytes[0..5], "record length")?;
        let indicator_count = digit_at(bytes, 10, "indicator count")?;
        let subfield_code_length = digit_at(bytes, 11, "subfield code length")?;
        let base_address_of_data = parse_padded_digits(&bytes[12..17], "base address of data")?;

        // Entry map positions must be ASCII digits.
        let mut entry_map = [' '; 4];
        for (i, slot) in entry_map.iter_mut().enumerate() {
            let b = bytes[20 + i];
            if !b.is_ascii_digit() {
                return Err(MarcError::MalformedLeader(format!(
                    "Entry map position {} is not a digit: 0x{b:02X}",
                    20 + i
                )));
            }
            *slot = b as char;
        }

        Ok(Leader {
            record_length,
            record_status: bytes[5] as char,
            type_of_record: bytes[6] as char,
            impl_defined1: [bytes[7] as char, bytes[8] as char],
            char_coding_scheme: bytes[9] as char,
            indicator_count,
            subfield_code_length,
            base_address_of_data,
            encoding_level: bytes[17] as char,
            desc_cataloging_form: bytes[18] as char,
            multipart_level: bytes[19] as char,
            entry_map,
        })
    }

    /// Validate that the leader is suitable for binary record reading.
    ///
    /// Checks that `record_length` and `base_address_of_data` are at least
    /// 24, which is required before performing arithmetic on these fields
    /// during ISO 2709 framing.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::MalformedLeader`] if either length is below 24.
    pub fn validate_for_reading(&self) -> Result<()> {
        if self.record_length < 24 {
            return Err(MarcError::MalformedLeader(format!(
                "Record length must be at least 24, got {}",
                self.record_length
            )));
        }
        if self.base_address_of_data < 24 {
            return Err(MarcError::MalformedLeader(format!(
                "Base address of data must be at least 24, got {}",
                self.base_address_of_data
            )));
        }
        Ok(())
    }

    /// Serialize the leader to its 24-octet form.
    #[must_use]
    pub fn as_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(LEADER_LEN);
        bytes.extend_from_slice(format!("{:05}", self.record_length).as_bytes());
        bytes.push(self.record_status as u8);
        bytes.push(self.type_of_record as u8);
        bytes.push(self.impl_defined1[0] as u8);
        bytes.push(self.impl_defined1[1] as u8);
        bytes.push(self.char_coding_scheme as u8);
        bytes.push(b'0' + self.indicator_count);
        bytes.push(b'0' + self.subfield_code_length);
        bytes.extend_from_slice(format!("{:05}", self.base_address_of_data).as_bytes());
        bytes.push(self.encoding_level as u8);
        bytes.push(self.desc_cataloging_form as u8);
        bytes.push(self.multipart_level as u8);
        for c in self.entry_map {
            bytes.push(c as u8);
        }
        bytes
    }
}

impl Default for Leader {
    /// A blank leader for a new record: lengths zeroed, MARC-8 coding,
    /// two indicators, two-octet subfield codes, "4500" entry map.
    fn default() -> Self {
        Leader {
            record_length: 0,
            record_status: 'n',
            type_of_record: 'a',
            impl_defined1: ['m', ' '],
            char_coding_scheme: ' ',
            indicator_count: 2,
            subfield_code_length: 2,
            base_address_of_data: 0,
            encoding_level: ' ',
            desc_cataloging_form: ' ',
            multipart_level: ' ',
            entry_map: ['4', '5', '0', '0'],
        }
    }
}

impl std::fmt::Display for Leader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Lossless: Display renders the wire form.
        f.write_str(&String::from_utf8_lossy(&self.as_bytes()))
    }
}

/// Parse an ASCII digit region, treating leading spaces as zeros.
fn parse_padded_digits(bytes: &[u8], what: &str) -> Result<u32> {
    let mut value: u32 = 0;
    let mut seen_digit = false;
    for &b in bytes {
        match b {
            b'0'..=b'9' => {
                seen_digit = true;
                value = value * 10 + u32::from(b - b'0');
            }
            // Space padding only before the first digit.
            b' ' if !seen_digit => {}
            _ => {
                return Err(MarcError::MalformedLeader(format!(
                    "Non-digit octet 0x{b:02X} in {what}"
                )));
            }
        }
    }
    Ok(value)
}

/// Read a single ASCII digit at a leader position.
fn digit_at(bytes: &[u8], pos: usize, what: &str) -> Result<u8> {
    let b = bytes[pos];
    if b.is_ascii_digit() {
        Ok(b - b'0')
    } else {
        Err(MarcError::MalformedLeader(format!(
            "Invalid {what} at position {pos}: 0x{b:02X}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leader_from_bytes() {
        let bytes = b"00714cam a2200205 a 4500";
        let leader = Leader::from_bytes(bytes).unwrap();

        assert_eq!(leader.record_length, 714);
        assert_eq!(leader.record_status, 'c');
        assert_eq!(leader.type_of_record, 'a');
        assert_eq!(leader.impl_defined1, ['m', ' ']);
        assert_eq!(leader.char_coding_scheme, 'a');
        assert_eq!(leader.indicator_count, 2);
        assert_eq!(leader.subfield_code_length, 2);
        assert_eq!(leader.base_address_of_data, 205);
        assert_eq!(leader.encoding_level, ' ');
        assert_eq!(leader.desc_cataloging_form, 'a');
        assert_eq!(leader.multipart_level, ' ');
        assert_eq!(leader.entry_map, ['4', '5', '0', '0']);
    }

    #[test]
    fn test_leader_roundtrip() {
        let original = Leader {
            record_length: 2048,
            record_status: 'n',
            type_of_record: 'a',
            impl_defined1: ['m', ' '],
            char_coding_scheme: ' ',
            indicator_count: 2,
            subfield_code_length: 2,
            base_address_of_data: 256,
            encoding_level: ' ',
            desc_cataloging_form: ' ',
            multipart_level: ' ',
            entry_map: ['4', '5', '0', '0'],
        };

        let bytes = original.as_bytes();
        assert_eq!(bytes.len(), LEADER_LEN);
        let parsed = Leader::from_bytes(&bytes).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_leader_space_padded_record_length() {
        // Legacy systems sometimes pad the record length with spaces.
        let bytes = b"  714cam a2200205 a 4500";
        let leader = Leader::from_bytes(bytes).unwrap();
        assert_eq!(leader.record_length, 714);
    }

    #[test]
    fn test_leader_interior_space_rejected() {
        // A space after the first digit is not padding.
        let bytes = b"0 714cam a2200205 a 4500";
        assert!(Leader::from_bytes(bytes).is_err());
    }

    #[test]
    fn test_leader_wrong_length() {
        assert!(Leader::from_bytes(b"0071").is_err());
        assert!(Leader::from_bytes(b"00714cam a2200205 a 45000").is_err());
    }

    #[test]
    fn test_leader_non_digit_record_length() {
        let bytes = b"007X4cam a2200205 a 4500";
        let result = Leader::from_bytes(bytes);
        assert!(result.is_err());
        assert!(matches!(result, Err(MarcError::MalformedLeader(_))));
    }

    #[test]
    fn test_leader_invalid_indicator_count() {
        let bytes = b"00714cam aX200205 a 4500";
        assert!(Leader::from_bytes(bytes).is_err());
    }

    #[test]
    fn test_leader_non_digit_entry_map() {
        let bytes = b"00714cam a2200205 a 45X0";
        let result = Leader::from_bytes(bytes);
        assert!(matches!(result, Err(MarcError::MalformedLeader(_))));
    }

    #[test]
    fn test_validate_for_reading_rejects_small_record_length() {
        let leader = Leader::from_bytes(b"00010cam a2200205 a 4500").unwrap();
        let err = leader.validate_for_reading().unwrap_err();
        assert!(err.to_string().contains("Record length must be at least 24"));
    }

    #[test]
    fn test_validate_for_reading_rejects_small_base_address() {
        let leader = Leader::from_bytes(b"00714cam a2200010 a 4500").unwrap();
        let err = leader.validate_for_reading().unwrap_err();
        assert!(err
            .to_string()
            .contains("Base address of data must be at least 24"));
    }

    #[test]
    fn test_display_is_wire_form() {
        let leader = Leader::from_bytes(b"00714cam a2200205 a 4500").unwrap();
        assert_eq!(leader.to_string(), "00714cam a2200205 a 4500");
    }
}
