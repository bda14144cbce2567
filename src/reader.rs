//! Reading MARC records from binary streams.
//!
//! This module provides [`MarcStreamReader`] for pulling ISO 2709 framed
//! MARC 21 records one at a time from any source implementing
//! [`std::io::Read`]. Records of unbounded count stream without loading the
//! whole input; the peak working set is bounded by the record length (MARC 21
//! caps it at 99999 octets).
//!
//! The reader tolerates the deviations that show up in real-world files:
//! directory entries out of ascending offset order, field terminators
//! embedded inside a field body (the directory length is authoritative), and
//! space-padded numeric fields. Structural damage beyond that surfaces as a
//! [`MarcError`]; after an error the stream position is undefined and the
//! reader should be discarded.
//!
//! # Examples
//!
//! ```no_run
//! use marcstream::MarcStreamReader;
//! use std::fs::File;
//!
//! let file = File::open("records.mrc")?;
//! let mut reader = MarcStreamReader::new(file);
//!
//! while let Some(record) = reader.read_record()? {
//!     println!("{}", record.control_number().unwrap_or("(no 001)"));
//! }
//! # Ok::<(), marcstream::MarcError>(())
//! ```

use crate::encoding::{self, CharsetScheme};
use crate::error::{MarcError, Result};
use crate::leader::{Leader, LEADER_LEN};
use crate::record::{
    is_control_tag, ControlField, DataField, Field, Record, Subfield, FIELD_TERMINATOR,
    RECORD_TERMINATOR, SUBFIELD_DELIMITER,
};
use std::io::Read;

/// Octets per directory entry: 3-digit tag, 4-digit length, 5-digit offset.
const DIRECTORY_ENTRY_LEN: usize = 12;

/// Streaming reader for ISO 2709 binary MARC records.
///
/// Character decoding follows the leader's coding scheme (position 9) unless
/// an explicit charset was supplied at construction; see
/// [`with_encoding`](Self::with_encoding) and
/// [`override_coding_scheme`](Self::override_coding_scheme).
///
/// A reader instance is single-threaded cooperative: no internal threads, no
/// prefetch, not safe for concurrent use. Independent readers over
/// independent sources are independent.
#[derive(Debug)]
pub struct MarcStreamReader<R: Read> {
    source: R,
    peeked: Option<u8>,
    explicit: Option<CharsetScheme>,
    override_coding: bool,
    records_read: usize,
}

impl<R: Read> MarcStreamReader<R> {
    /// Create a reader that infers the charset from each record's leader:
    /// `'a'` at position 9 means UTF-8, anything else MARC-8.
    pub fn new(source: R) -> Self {
        MarcStreamReader {
            source,
            peeked: None,
            explicit: None,
            override_coding: false,
            records_read: 0,
        }
    }

    /// Create a reader with an explicit charset, resolved eagerly.
    ///
    /// Supplying a charset also turns on override mode, so the charset is
    /// used even when a record's leader declares Unicode; call
    /// [`override_coding_scheme`](Self::override_coding_scheme)`(false)` to
    /// let a `'a'` leader win instead.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::UnknownCharset`] if the name resolves nowhere.
    pub fn with_encoding(source: R, encoding: &str) -> Result<Self> {
        let scheme = CharsetScheme::from_name(encoding)?;
        Ok(MarcStreamReader {
            source,
            peeked: None,
            explicit: Some(scheme),
            override_coding: true,
            records_read: 0,
        })
    }

    /// Set whether an explicit charset beats a contradicting leader.
    ///
    /// Has no effect unless the reader was built with
    /// [`with_encoding`](Self::with_encoding).
    #[must_use]
    pub fn override_coding_scheme(mut self, override_coding: bool) -> Self {
        self.override_coding = override_coding;
        self
    }

    /// True if at least one more octet is available.
    ///
    /// Peeks at most one octet; the octet is consumed by the next
    /// [`read_record`](Self::read_record).
    ///
    /// # Errors
    ///
    /// Surfaces an I/O error from the source.
    pub fn has_next(&mut self) -> Result<bool> {
        if self.peeked.is_some() {
            return Ok(true);
        }
        self.peeked = self.read_byte()?;
        Ok(self.peeked.is_some())
    }

    /// Number of records read so far.
    #[must_use]
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Iterate over the remaining records.
    ///
    /// Yields `Result<Record>`; iteration should stop at the first error,
    /// after which the stream position is undefined.
    pub fn records(&mut self) -> RecordIterator<'_, R> {
        RecordIterator { reader: self }
    }

    /// Read the next record, advancing past its record terminator.
    ///
    /// Returns `Ok(None)` at a clean end of input (no pending octets).
    ///
    /// # Errors
    ///
    /// Any of the framing errors of [`MarcError`]; see the module docs for
    /// the tolerance policies. After an error the reader should be
    /// discarded.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        // Leader: exactly 24 octets, or a clean EOF.
        let mut leader_bytes = [0u8; LEADER_LEN];
        let got = self.read_up_to(&mut leader_bytes)?;
        if got == 0 {
            return Ok(None);
        }
        if got < LEADER_LEN {
            return Err(MarcError::TruncatedLeader(format!(
                "Got {got} of {LEADER_LEN} octets at record start"
            )));
        }

        let leader = Leader::from_bytes(&leader_bytes)?;
        leader.validate_for_reading()?;

        let record_length = leader.record_length as usize;
        let base_address = leader.base_address_of_data as usize;
        let Some(data_len) = record_length.checked_sub(base_address) else {
            return Err(MarcError::MalformedLeader(format!(
                "Base address {base_address} exceeds record length {record_length}"
            )));
        };

        // Directory: everything up to the next field terminator.
        let entries = self.read_directory()?;

        // Data area: sliced by directory entries, terminated by RT.
        let mut data = vec![0u8; data_len];
        let got = self.read_up_to(&mut data)?;
        if got < data_len {
            return Err(MarcError::TruncatedRecord(format!(
                "Data area ended after {got} of {data_len} octets"
            )));
        }
        if data.last() != Some(&RECORD_TERMINATOR) {
            return Err(MarcError::MissingRecordTerminator(format!(
                "Data area of {data_len} octets does not end with 0x1D"
            )));
        }

        let scheme = self.resolve_scheme(&leader);
        let indicator_count = usize::from(leader.indicator_count);

        let mut record = Record::new(leader);
        for entry in &entries {
            record.add_field(parse_field(entry, &data, scheme, indicator_count)?);
        }

        self.records_read += 1;
        Ok(Some(record))
    }

    /// Read and parse the directory, consuming its terminator.
    fn read_directory(&mut self) -> Result<Vec<DirectoryEntry>> {
        let mut raw = Vec::new();
        loop {
            match self.read_byte()? {
                Some(FIELD_TERMINATOR) => break,
                Some(b) => raw.push(b),
                None => {
                    return Err(MarcError::MalformedDirectory(
                        "Input ended before the directory terminator".to_string(),
                    ));
                }
            }
        }

        if raw.len() % DIRECTORY_ENTRY_LEN != 0 {
            return Err(MarcError::MalformedDirectory(format!(
                "Directory length {} is not a multiple of {DIRECTORY_ENTRY_LEN}",
                raw.len()
            )));
        }

        raw.chunks_exact(DIRECTORY_ENTRY_LEN)
            .map(DirectoryEntry::parse)
            .collect()
    }

    /// The charset for this record's field bodies.
    fn resolve_scheme(&self, leader: &Leader) -> CharsetScheme {
        match self.explicit {
            Some(scheme) if self.override_coding => scheme,
            Some(scheme) => {
                if leader.char_coding_scheme == 'a' {
                    CharsetScheme::Utf8
                } else {
                    scheme
                }
            }
            None => CharsetScheme::from_leader_char(leader.char_coding_scheme),
        }
    }

    /// Fill as much of `buf` as the source allows, honoring the peeked octet.
    fn read_up_to(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let mut filled = 0;
        if let Some(b) = self.peeked.take() {
            buf[0] = b;
            filled = 1;
        }
        while filled < buf.len() {
            match self.source.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }

    /// One octet, or `None` at end of input.
    fn read_byte(&mut self) -> Result<Option<u8>> {
        if let Some(b) = self.peeked.take() {
            return Ok(Some(b));
        }
        let mut buf = [0u8; 1];
        loop {
            match self.source.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// One 12-octet directory entry.
#[derive(Debug)]
struct DirectoryEntry {
    tag: String,
    length: usize,
    offset: usize,
}

impl DirectoryEntry {
    fn parse(chunk: &[u8]) -> Result<Self> {
        let tag = String::from_utf8_lossy(&chunk[0..3]).into_owned();
        let length = parse_entry_digits(&chunk[3..7], &tag, "length")?;
        let offset = parse_entry_digits(&chunk[7..12], &tag, "offset")?;
        Ok(DirectoryEntry { tag, length, offset })
    }
}

/// Parse an entry's digit region, tolerating leading space padding.
fn parse_entry_digits(bytes: &[u8], tag: &str, what: &str) -> Result<usize> {
    let mut value: usize = 0;
    let mut seen_digit = false;
    for &b in bytes {
        match b {
            b'0'..=b'9' => {
                seen_digit = true;
                value = value * 10 + usize::from(b - b'0');
            }
            b' ' if !seen_digit => {}
            _ => {
                return Err(MarcError::MalformedDirectory(format!(
                    "Non-digit octet 0x{b:02X} in {what} of entry {tag}"
                )));
            }
        }
    }
    Ok(value)
}

/// Slice one field out of the data area and decode it.
///
/// The directory length is authoritative: field terminators embedded before
/// `length - 1` are ignored. Offsets need not be monotonic across entries.
fn parse_field(
    entry: &DirectoryEntry,
    data: &[u8],
    scheme: CharsetScheme,
    indicator_count: usize,
) -> Result<Field> {
    let end = entry.offset.checked_add(entry.length).filter(|&e| e <= data.len());
    let Some(end) = end else {
        return Err(MarcError::TruncatedRecord(format!(
            "Field {} at offset {} with length {} exceeds the data area",
            entry.tag, entry.offset, entry.length
        )));
    };
    let slice = &data[entry.offset..end];

    let Some((&FIELD_TERMINATOR, body)) = slice.split_last() else {
        return Err(MarcError::MalformedField(format!(
            "Field {} is not terminated by 0x1E",
            entry.tag
        )));
    };

    if is_control_tag(&entry.tag) {
        let text = decode_body(body, scheme, &entry.tag)?;
        return Ok(Field::Control(ControlField::new(entry.tag.as_str(), text)?));
    }

    if body.len() < indicator_count {
        return Err(MarcError::MalformedField(format!(
            "Field {} has {} octets, too short for {indicator_count} indicators",
            entry.tag,
            body.len()
        )));
    }
    let indicator1 = if indicator_count >= 1 { body[0] as char } else { ' ' };
    let indicator2 = if indicator_count >= 2 { body[1] as char } else { ' ' };

    let mut field = DataField::new(entry.tag.as_str(), indicator1, indicator2)?;

    // Anything between the indicators and the first subfield delimiter is
    // not wire-legal; it is dropped silently, matching longstanding
    // practice. Subsequent segments start with their one-character code.
    let mut segments = body[indicator_count..].split(|&b| b == SUBFIELD_DELIMITER);
    segments.next();
    for segment in segments {
        let Some((&code, rest)) = segment.split_first() else {
            continue;
        };
        let text = decode_body(rest, scheme, &entry.tag)?;
        field.add_subfield(Subfield::new(code as char, text));
    }

    Ok(Field::Data(field))
}

/// Decode a field or subfield body, folding decode failures into the
/// field-level error.
fn decode_body(body: &[u8], scheme: CharsetScheme, tag: &str) -> Result<String> {
    encoding::decode(body, scheme).map_err(|e| match e {
        MarcError::DecodeError(detail) => {
            MarcError::MalformedField(format!("Field {tag}: {detail}"))
        }
        other => other,
    })
}

/// Iterator adapter over a reader's remaining records.
#[derive(Debug)]
pub struct RecordIterator<'a, R: Read> {
    reader: &'a mut MarcStreamReader<R>,
}

impl<R: Read> Iterator for RecordIterator<'_, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Assemble one record from (tag, field body without terminator) pairs.
    fn build_record(coding: u8, fields: &[(&str, Vec<u8>)]) -> Vec<u8> {
        let mut directory = Vec::new();
        let mut data_area = Vec::new();
        for (tag, body) in fields {
            let start = data_area.len();
            data_area.extend_from_slice(body);
            data_area.push(FIELD_TERMINATOR);
            directory.extend_from_slice(tag.as_bytes());
            directory.extend_from_slice(format!("{:04}", body.len() + 1).as_bytes());
            directory.extend_from_slice(format!("{start:05}").as_bytes());
        }
        directory.push(FIELD_TERMINATOR);
        data_area.push(RECORD_TERMINATOR);

        let base_address = LEADER_LEN + directory.len();
        let record_length = base_address + data_area.len();

        let mut bytes = Vec::new();
        bytes.extend_from_slice(format!("{record_length:05}").as_bytes());
        bytes.extend_from_slice(b"nam ");
        bytes.push(coding);
        bytes.extend_from_slice(b"22");
        bytes.extend_from_slice(format!("{base_address:05}").as_bytes());
        bytes.extend_from_slice(b" a 4500");
        bytes.extend_from_slice(&directory);
        bytes.extend_from_slice(&data_area);
        bytes
    }

    fn title_body() -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(b"10");
        body.push(SUBFIELD_DELIMITER);
        body.extend_from_slice(b"aTest title");
        body
    }

    #[test]
    fn test_read_simple_record() {
        let bytes = build_record(b'a', &[("001", b"12345".to_vec()), ("245", title_body())]);
        let mut reader = MarcStreamReader::new(Cursor::new(bytes));

        let record = reader.read_record().unwrap().unwrap();
        assert_eq!(record.control_number(), Some("12345"));

        let field = record.fields_by_tag("245").next().unwrap().as_data().unwrap();
        assert_eq!(field.indicator1, '1');
        assert_eq!(field.indicator2, '0');
        assert_eq!(field.subfield('a').unwrap().data, "Test title");

        assert!(reader.read_record().unwrap().is_none());
        assert_eq!(reader.records_read(), 1);
    }

    #[test]
    fn test_eof_returns_none() {
        let mut reader = MarcStreamReader::new(Cursor::new(Vec::new()));
        assert!(reader.read_record().unwrap().is_none());
    }

    #[test]
    fn test_has_next_peeks_once() {
        let bytes = build_record(b'a', &[("245", title_body())]);
        let mut reader = MarcStreamReader::new(Cursor::new(bytes));

        assert!(reader.has_next().unwrap());
        assert!(reader.has_next().unwrap());
        let record = reader.read_record().unwrap().unwrap();
        assert_eq!(record.fields().len(), 1);
        assert!(!reader.has_next().unwrap());
    }

    #[test]
    fn test_read_multiple_records() {
        let mut bytes = build_record(b'a', &[("245", title_body())]);
        bytes.extend(build_record(b'a', &[("001", b"two".to_vec())]));
        let mut reader = MarcStreamReader::new(Cursor::new(bytes));

        assert!(reader.read_record().unwrap().is_some());
        let second = reader.read_record().unwrap().unwrap();
        assert_eq!(second.control_number(), Some("two"));
        assert!(reader.read_record().unwrap().is_none());
        assert_eq!(reader.records_read(), 2);
    }

    #[test]
    fn test_records_iterator() {
        let mut bytes = build_record(b'a', &[("245", title_body())]);
        bytes.extend(build_record(b'a', &[("245", title_body())]));
        let mut reader = MarcStreamReader::new(Cursor::new(bytes));

        let records: Vec<_> = reader.records().collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_truncated_leader() {
        let mut reader = MarcStreamReader::new(Cursor::new(b"0012345678".to_vec()));
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, MarcError::TruncatedLeader(_)));
    }

    #[test]
    fn test_malformed_leader_digits() {
        let mut bytes = build_record(b'a', &[("245", title_body())]);
        bytes[2] = b'X';
        let mut reader = MarcStreamReader::new(Cursor::new(bytes));
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, MarcError::MalformedLeader(_)));
    }

    #[test]
    fn test_directory_not_multiple_of_12() {
        let mut bytes = build_record(b'a', &[("245", title_body())]);
        // Slip an extra octet into the directory and grow the framing to match.
        bytes.insert(LEADER_LEN, b'9');
        let record_length: usize =
            String::from_utf8_lossy(&bytes[0..5]).trim().parse().unwrap();
        let base: usize = String::from_utf8_lossy(&bytes[12..17]).trim().parse().unwrap();
        bytes[0..5].copy_from_slice(format!("{:05}", record_length + 1).as_bytes());
        bytes[12..17].copy_from_slice(format!("{:05}", base + 1).as_bytes());

        let mut reader = MarcStreamReader::new(Cursor::new(bytes));
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, MarcError::MalformedDirectory(_)));
    }

    #[test]
    fn test_directory_non_digit_length() {
        let mut bytes = build_record(b'a', &[("245", title_body())]);
        // Octet 3 of the first entry is the length's first digit.
        bytes[LEADER_LEN + 3] = b'x';
        let mut reader = MarcStreamReader::new(Cursor::new(bytes));
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, MarcError::MalformedDirectory(_)));
    }

    #[test]
    fn test_truncated_record() {
        let mut bytes = build_record(b'a', &[("245", title_body())]);
        bytes.truncate(bytes.len() - 4);
        let mut reader = MarcStreamReader::new(Cursor::new(bytes));
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, MarcError::TruncatedRecord(_)));
    }

    #[test]
    fn test_missing_record_terminator() {
        let mut bytes = build_record(b'a', &[("245", title_body())]);
        let last = bytes.len() - 1;
        bytes[last] = 0x00;
        let mut reader = MarcStreamReader::new(Cursor::new(bytes));
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, MarcError::MissingRecordTerminator(_)));
    }

    #[test]
    fn test_embedded_field_terminator_tolerated() {
        // The directory length is authoritative; an FT inside the body is data.
        let mut body = b"embedded".to_vec();
        body.push(FIELD_TERMINATOR);
        body.extend_from_slice(b"rest");
        let bytes = build_record(b'a', &[("001", body)]);
        let mut reader = MarcStreamReader::new(Cursor::new(bytes));
        let record = reader.read_record().unwrap().unwrap();
        let cf = record.control_number_field().unwrap();
        assert_eq!(cf.data, "embedded\u{1E}rest");
    }

    #[test]
    fn test_field_slice_past_data_area() {
        let mut bytes = build_record(b'a', &[("245", title_body())]);
        // Inflate the first entry's length beyond the data area.
        bytes[LEADER_LEN + 3..LEADER_LEN + 7].copy_from_slice(b"9000");
        let mut reader = MarcStreamReader::new(Cursor::new(bytes));
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, MarcError::TruncatedRecord(_)));
    }

    #[test]
    fn test_data_field_too_short_for_indicators() {
        let bytes = build_record(b'a', &[("245", b"1".to_vec())]);
        let mut reader = MarcStreamReader::new(Cursor::new(bytes));
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, MarcError::MalformedField(_)));
    }

    #[test]
    fn test_leading_segment_dropped() {
        let mut body = Vec::new();
        body.extend_from_slice(b"10stray");
        body.push(SUBFIELD_DELIMITER);
        body.extend_from_slice(b"aKept");
        let bytes = build_record(b'a', &[("245", body)]);
        let mut reader = MarcStreamReader::new(Cursor::new(bytes));
        let record = reader.read_record().unwrap().unwrap();
        let field = record.fields_by_tag("245").next().unwrap().as_data().unwrap();
        assert_eq!(field.subfields().len(), 1);
        assert_eq!(field.subfield('a').unwrap().data, "Kept");
    }

    #[test]
    fn test_marc8_default_when_leader_blank() {
        let mut body = Vec::new();
        body.extend_from_slice(b"10");
        body.push(SUBFIELD_DELIMITER);
        body.push(b'a');
        body.extend_from_slice(&[0xE1, 0x61]); // combining grave + 'a'
        let bytes = build_record(b' ', &[("245", body)]);
        let mut reader = MarcStreamReader::new(Cursor::new(bytes));
        let record = reader.read_record().unwrap().unwrap();
        let field = record.fields_by_tag("245").next().unwrap().as_data().unwrap();
        assert_eq!(field.subfield('a').unwrap().data, "à");
    }

    #[test]
    fn test_invalid_utf8_surfaces_as_malformed_field() {
        let mut body = Vec::new();
        body.extend_from_slice(b"10");
        body.push(SUBFIELD_DELIMITER);
        body.push(b'a');
        body.extend_from_slice(&[0xFF, 0xFE]);
        let bytes = build_record(b'a', &[("245", body)]);
        let mut reader = MarcStreamReader::new(Cursor::new(bytes));
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, MarcError::MalformedField(_)));
    }

    #[test]
    fn test_explicit_encoding_without_override_defers_to_unicode_leader() {
        let mut body = Vec::new();
        body.extend_from_slice(b"10");
        body.push(SUBFIELD_DELIMITER);
        body.extend_from_slice(b"acaf\xC3\xA9"); // UTF-8 "café"
        let bytes = build_record(b'a', &[("245", body)]);
        let reader = MarcStreamReader::with_encoding(Cursor::new(bytes), "iso-8859-1").unwrap();
        let mut reader = reader.override_coding_scheme(false);
        let record = reader.read_record().unwrap().unwrap();
        let field = record.fields_by_tag("245").next().unwrap().as_data().unwrap();
        assert_eq!(field.subfield('a').unwrap().data, "café");
    }

    #[test]
    fn test_explicit_encoding_with_override_wins() {
        let mut body = Vec::new();
        body.extend_from_slice(b"10");
        body.push(SUBFIELD_DELIMITER);
        body.extend_from_slice(b"acaf\xE9"); // ISO-8859-1 "café"
        let bytes = build_record(b'a', &[("245", body)]);
        let mut reader =
            MarcStreamReader::with_encoding(Cursor::new(bytes), "iso-8859-1").unwrap();
        let record = reader.read_record().unwrap().unwrap();
        let field = record.fields_by_tag("245").next().unwrap().as_data().unwrap();
        assert_eq!(field.subfield('a').unwrap().data, "café");
    }

    #[test]
    fn test_unknown_charset_at_construction() {
        let err =
            MarcStreamReader::with_encoding(Cursor::new(Vec::new()), "no-such-charset").unwrap_err();
        assert!(matches!(err, MarcError::UnknownCharset(_)));
    }

    #[test]
    fn test_space_padded_record_length() {
        let mut bytes = build_record(b'a', &[("245", title_body())]);
        // Space-pad the record length the way some legacy systems do.
        if bytes[0] == b'0' {
            bytes[0] = b' ';
        }
        let mut reader = MarcStreamReader::new(Cursor::new(bytes));
        assert!(reader.read_record().unwrap().is_some());
    }
}
