//! Writing MARC records to ISO 2709 binary format.
//!
//! [`MarcStreamWriter`] is the canonical inverse of the reader: fields are
//! serialized in record order, directory entries therefore come out in
//! ascending offset order, and the leader's framing values (record length,
//! base address of data, entry map) are recomputed on write. Output is
//! always UTF-8 — records are not re-encoded to MARC-8 — so the emitted
//! leader declares the Unicode coding scheme regardless of what the record
//! was read with.
//!
//! # Examples
//!
//! ```
//! use marcstream::{DataField, Field, Leader, MarcStreamWriter, Record, Subfield};
//!
//! let mut record = Record::new(Leader::default());
//! let mut field = DataField::new("245", '1', '0')?;
//! field.add_subfield(Subfield::new('a', "Test title"));
//! record.add_field(Field::Data(field));
//!
//! let mut writer = MarcStreamWriter::new(Vec::new());
//! writer.write_record(&record)?;
//! let bytes = writer.into_inner();
//! assert_eq!(bytes.last(), Some(&0x1D));
//! # Ok::<(), marcstream::MarcError>(())
//! ```

use crate::error::{MarcError, Result};
use crate::record::{Field, Record, FIELD_TERMINATOR, RECORD_TERMINATOR, SUBFIELD_DELIMITER};
use std::io::Write;

/// MARC 21 caps the record length at five decimal digits.
const MAX_RECORD_LENGTH: usize = 99_999;

/// Writer for ISO 2709 binary MARC records.
#[derive(Debug)]
pub struct MarcStreamWriter<W: Write> {
    sink: W,
    records_written: usize,
}

impl<W: Write> MarcStreamWriter<W> {
    /// Create a writer over any destination implementing [`std::io::Write`].
    pub fn new(sink: W) -> Self {
        MarcStreamWriter {
            sink,
            records_written: 0,
        }
    }

    /// Number of records written so far.
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Consume the writer, returning the destination.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Serialize one record.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::Io`] on a sink failure, or
    /// [`MarcError::TruncatedRecord`] if the assembled record would exceed
    /// the five-digit length the leader can carry.
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        let mut directory = Vec::new();
        let mut data_area = Vec::new();

        for field in record.fields() {
            let start = data_area.len();
            match field {
                Field::Control(cf) => {
                    data_area.extend_from_slice(cf.data.as_bytes());
                }
                Field::Data(df) => {
                    data_area.push(df.indicator1 as u8);
                    data_area.push(df.indicator2 as u8);
                    for sf in df.subfields() {
                        data_area.push(SUBFIELD_DELIMITER);
                        data_area.push(sf.code as u8);
                        data_area.extend_from_slice(sf.data.as_bytes());
                    }
                }
            }
            data_area.push(FIELD_TERMINATOR);

            let field_length = data_area.len() - start;
            if field_length > 9999 {
                return Err(MarcError::MalformedField(format!(
                    "Field {} of {field_length} octets exceeds the 4-digit directory length",
                    field.tag()
                )));
            }
            directory.extend_from_slice(field.tag().as_bytes());
            directory.extend_from_slice(format!("{field_length:04}").as_bytes());
            directory.extend_from_slice(format!("{start:05}").as_bytes());
        }
        directory.push(FIELD_TERMINATOR);
        data_area.push(RECORD_TERMINATOR);

        let base_address = 24 + directory.len();
        let record_length = base_address + data_area.len();
        if record_length > MAX_RECORD_LENGTH {
            return Err(MarcError::TruncatedRecord(format!(
                "Record of {record_length} octets exceeds the MARC 21 maximum of {MAX_RECORD_LENGTH}"
            )));
        }

        // Recompute the framing fields; everything else passes through.
        let mut leader = record.leader.clone();
        leader.record_length = record_length as u32;
        leader.base_address_of_data = base_address as u32;
        leader.char_coding_scheme = 'a';
        leader.indicator_count = 2;
        leader.subfield_code_length = 2;
        leader.entry_map = ['4', '5', '0', '0'];

        self.sink.write_all(&leader.as_bytes())?;
        self.sink.write_all(&directory)?;
        self.sink.write_all(&data_area)?;
        self.records_written += 1;
        Ok(())
    }

    /// Flush the underlying sink.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::Io`] on a sink failure.
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}
