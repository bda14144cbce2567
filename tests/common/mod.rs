//! Common test helpers shared across the integration suite.
//!
//! MARC test data is synthesized in memory: the builders here assemble
//! wire-exact ISO 2709 records from (tag, field body) pairs, with control
//! over the directory entry order so tolerance policies can be exercised.

use marcstream::{FIELD_TERMINATOR, RECORD_TERMINATOR, SUBFIELD_DELIMITER};

/// A data field body: two indicators followed by delimited subfields.
pub fn data_body(indicators: &str, subfields: &[(char, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(indicators.as_bytes());
    for (code, data) in subfields {
        body.push(SUBFIELD_DELIMITER);
        body.push(*code as u8);
        body.extend_from_slice(data);
    }
    body
}

/// Assemble one record with the directory in data-layout order.
pub fn assemble(coding: u8, fields: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let identity: Vec<usize> = (0..fields.len()).collect();
    assemble_with_directory_order(coding, fields, &identity)
}

/// Assemble one record whose directory lists entries in the given
/// permutation of `fields`, while the data area keeps layout order. Offsets
/// stay correct either way, so a compliant reader must produce fields in
/// `dir_order`.
pub fn assemble_with_directory_order(
    coding: u8,
    fields: &[(&str, Vec<u8>)],
    dir_order: &[usize],
) -> Vec<u8> {
    let mut data_area = Vec::new();
    let mut offsets = Vec::with_capacity(fields.len());
    for (_, body) in fields {
        offsets.push(data_area.len());
        data_area.extend_from_slice(body);
        data_area.push(FIELD_TERMINATOR);
    }
    data_area.push(RECORD_TERMINATOR);

    let mut directory = Vec::new();
    for &idx in dir_order {
        let (tag, body) = &fields[idx];
        directory.extend_from_slice(tag.as_bytes());
        directory.extend_from_slice(format!("{:04}", body.len() + 1).as_bytes());
        directory.extend_from_slice(format!("{:05}", offsets[idx]).as_bytes());
    }
    directory.push(FIELD_TERMINATOR);

    let base_address = 24 + directory.len();
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
