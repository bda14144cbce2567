//! Character set decoding for MARC field data.
//!
//! MARC 21 records declare their character coding in leader position 9:
//! a space means MARC-8 (the legacy ISO 2022 code-switching encoding built
//! on ANSEL), `'a'` means UCS/Unicode transmitted as UTF-8. Readers may also
//! be handed an explicit charset name, which resolves here to a
//! [`CharsetScheme`].
//!
//! MARC-8 is the hard case: escape sequences reassign the G0/G1 graphic
//! ranges to other coded sets (Cyrillic, Hebrew, Arabic, Greek, EACC, ...),
//! and diacritics are transmitted *before* the letter they modify. The
//! decoder buffers combining marks until a base character arrives, emits the
//! base first and the marks after it (Unicode order), and normalizes each
//! decoded string to NFC. Unknown octets decode to U+FFFD; MARC-8 decoding
//! never fails.

use crate::error::{MarcError, Result};
use crate::marc8_tables::{self, CharacterSetId};
use unicode_normalization::UnicodeNormalization;

const ESCAPE: u8 = 0x1B;
const REPLACEMENT: char = '\u{FFFD}';

/// A resolved character decoding scheme for field data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharsetScheme {
    /// UTF-8, strict: invalid sequences fail [`MarcError::DecodeError`].
    Utf8,
    /// MARC-8 / ANSEL with G0/G1 code switching.
    Marc8,
    /// ISO-8859-1, a direct octet-to-code-point mapping.
    Iso8859_1,
    /// Any other charset, resolved through the encoding registry.
    Named(&'static encoding_rs::Encoding),
}

impl CharsetScheme {
    /// Resolve a charset name.
    ///
    /// The UTF-8, ISO-8859-1, and MARC-8 spellings are recognized directly;
    /// anything else goes through the encoding registry by label.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::UnknownCharset`] if the label resolves nowhere.
    pub fn from_name(name: &str) -> Result<Self> {
        let squashed: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_uppercase();
        match squashed.as_str() {
            "UTF8" => Ok(Self::Utf8),
            "ISO88591" | "LATIN1" => Ok(Self::Iso8859_1),
            "MARC8" | "ANSEL" => Ok(Self::Marc8),
            _ => encoding_rs::Encoding::for_label(name.as_bytes())
                .map(Self::Named)
                .ok_or_else(|| MarcError::UnknownCharset(name.to_string())),
        }
    }

    /// The scheme inferred from leader position 9.
    #[must_use]
    pub fn from_leader_char(c: char) -> Self {
        if c == 'a' {
            Self::Utf8
        } else {
            Self::Marc8
        }
    }
}

/// Decode a byte slice under the given scheme.
///
/// # Errors
///
/// Returns [`MarcError::DecodeError`] for invalid UTF-8 under
/// [`CharsetScheme::Utf8`]. The other schemes are total: MARC-8 and the
/// registry-backed charsets substitute U+FFFD, and ISO-8859-1 maps every
/// octet.
pub fn decode(bytes: &[u8], scheme: CharsetScheme) -> Result<String> {
    match scheme {
        CharsetScheme::Utf8 => std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| MarcError::DecodeError(format!("Invalid UTF-8: {e}"))),
        CharsetScheme::Iso8859_1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        CharsetScheme::Named(encoding) => {
            let (decoded, _, _) = encoding.decode(bytes);
            Ok(decoded.into_owned())
        }
        CharsetScheme::Marc8 => Ok(decode_marc8(bytes)),
    }
}

/// MARC-8 decoder state: the sets currently designated to G0 and G1.
///
/// Fresh per decode call; designations do not persist across fields.
#[derive(Debug, Clone, Copy)]
struct Designations {
    g0: CharacterSetId,
    g1: CharacterSetId,
}

impl Designations {
    fn initial() -> Self {
        Designations {
            g0: CharacterSetId::BasicLatin,
            g1: CharacterSetId::AnselExtendedLatin,
        }
    }

    /// The set responsible for an octet by its graphic range.
    fn for_byte(self, byte: u8) -> CharacterSetId {
        if byte >= 0xA0 {
            self.g1
        } else {
            self.g0
        }
    }
}

/// Decode MARC-8 octets to a Unicode string.
///
/// Error-tolerant by design: unmapped octets and truncated escape or EACC
/// sequences emit U+FFFD and decoding continues.
fn decode_marc8(bytes: &[u8]) -> String {
    let mut sets = Designations::initial();
    let mut out = String::with_capacity(bytes.len());
    let mut pending_marks: Vec<char> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == ESCAPE {
            i += consume_escape(&bytes[i..], &mut sets);
            continue;
        }

        let byte = bytes[i];

        // Control octets are not graphic characters in either register.
        if byte < 0x20 || byte == 0x7F {
            if byte == 0x0A || byte == 0x0D || byte == 0x09 {
                out.push(byte as char);
            }
            i += 1;
            continue;
        }

        // Space is never reassigned, whatever set holds G0.
        if byte == 0x20 {
            emit(' ', false, &mut out, &mut pending_marks);
            i += 1;
            continue;
        }

        let set = sets.for_byte(byte);

        if set.is_multibyte() {
            if i + 3 <= bytes.len() {
                let key = (u32::from(bytes[i]) << 16)
                    | (u32::from(bytes[i + 1]) << 8)
                    | u32::from(bytes[i + 2]);
                match marc8_tables::eacc_lookup(key) {
                    Some((cp, combining)) => {
                        emit(char_or_replacement(cp), combining, &mut out, &mut pending_marks);
                    }
                    None => out.push(REPLACEMENT),
                }
                i += 3;
            } else {
                // Truncated trailing multi-byte sequence.
                out.push(REPLACEMENT);
                i = bytes.len();
            }
            continue;
        }

        match marc8_tables::lookup(set, byte) {
            Some((cp, combining)) => {
                emit(char_or_replacement(cp), combining, &mut out, &mut pending_marks);
            }
            None => out.push(REPLACEMENT),
        }
        i += 1;
    }

    // Marks with no following base keep stream order at the tail.
    out.extend(pending_marks);

    out.nfc().collect()
}

/// Push a decoded character, reordering buffered combining marks to follow
/// their base character.
fn emit(ch: char, combining: bool, out: &mut String, pending_marks: &mut Vec<char>) {
    if combining {
        pending_marks.push(ch);
    } else {
        out.push(ch);
        out.extend(pending_marks.drain(..));
    }
}

fn char_or_replacement(cp: u32) -> char {
    char::from_u32(cp).unwrap_or(REPLACEMENT)
}

/// Consume one escape sequence starting at `bytes[0] == ESC`, updating the
/// designations. Returns the number of octets consumed (at least 1).
///
/// Recognized forms:
/// - `ESC ( F` and `ESC , F` designate a single-byte set to G0
/// - `ESC ) F` and `ESC - F` designate a single-byte set to G1
/// - `ESC $ F`, `ESC $ , F` designate a multi-byte set to G0
/// - `ESC $ ) F`, `ESC $ - F` designate a multi-byte set to G1
/// - `ESC s` / `ESC g` / `ESC b` / `ESC p` are the single-character MARC
///   designations for ASCII, Greek symbols, subscript, and superscript on G0
///
/// Unknown or truncated sequences consume the ESC octet (plus the
/// intermediate, when present) and leave the designations alone.
fn consume_escape(bytes: &[u8], sets: &mut Designations) -> usize {
    let Some(&kind) = bytes.get(1) else {
        return 1;
    };

    match kind {
        // Single-character designations.
        0x73 => {
            sets.g0 = CharacterSetId::BasicLatin;
            2
        }
        0x67 => {
            sets.g0 = CharacterSetId::GreekSymbols;
            2
        }
        0x62 => {
            sets.g0 = CharacterSetId::Subscript;
            2
        }
        0x70 => {
            sets.g0 = CharacterSetId::Superscript;
            2
        }
        // Single-byte G0 designation.
        0x28 | 0x2C => {
            if let Some(&f) = bytes.get(2) {
                if let Some(set) = CharacterSetId::from_escape_final(f) {
                    sets.g0 = set;
                }
                3
            } else {
                2
            }
        }
        // Single-byte G1 designation.
        0x29 | 0x2D => {
            if let Some(&f) = bytes.get(2) {
                if let Some(set) = CharacterSetId::from_escape_final(f) {
                    sets.g1 = set;
                }
                3
            } else {
                2
            }
        }
        // Multi-byte designation.
        0x24 => match bytes.get(2) {
            Some(&(0x29 | 0x2D)) => {
                if let Some(&f) = bytes.get(3) {
                    if let Some(set) = CharacterSetId::from_escape_final(f) {
                        sets.g1 = set;
                    }
                    4
                } else {
                    3
                }
            }
            Some(&0x2C) => {
                if let Some(&f) = bytes.get(3) {
                    if let Some(set) = CharacterSetId::from_escape_final(f) {
                        sets.g0 = set;
                    }
                    4
                } else {
                    3
                }
            }
            Some(&f) => {
                if let Some(set) = CharacterSetId::from_escape_final(f) {
                    sets.g0 = set;
                }
                3
            }
            None => 2,
        },
        // Unknown escape: skip the pair.
        _ => 2,
    }
}
