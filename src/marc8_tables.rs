//! MARC-8 character set designation tables.
//!
//! MARC-8 is a code-switching encoding: escape sequences designate one of a
//! fixed repertoire of coded character sets into the G0 (0x21-0x7E) or G1
//! (0xA1-0xFE) graphic range. This module holds the designation repertoire
//! ([`CharacterSetId`]) and the per-set code tables mapping an octet to a
//! `(code point, is_combining)` pair, derived from the Library of Congress
//! MARC-8 code tables.
//!
//! Tables are immutable process-wide state, built lazily on first decode and
//! safe for concurrent read. Extended Cyrillic, Extended Arabic, and EACC
//! carry a subset of their repertoires; octets outside the subset decode to
//! U+FFFD upstream.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// A MARC-8 coded character set, identified by its escape-sequence final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterSetId {
    /// ASCII graphics (final `B`), the initial G0 set.
    BasicLatin,
    /// ANSEL extended Latin (final `E`), the initial G1 set.
    AnselExtendedLatin,
    /// Basic Arabic (final `3`).
    BasicArabic,
    /// Extended Arabic (final `4`).
    ExtendedArabic,
    /// Basic Hebrew (final `2`).
    BasicHebrew,
    /// Basic Cyrillic (final `N`).
    BasicCyrillic,
    /// Extended Cyrillic (final `Q`).
    ExtendedCyrillic,
    /// Basic Greek (final `S`).
    BasicGreek,
    /// Greek symbols (final `g`, deprecated designation).
    GreekSymbols,
    /// Subscript digits and operators (final `b`).
    Subscript,
    /// Superscript digits and operators (final `p`).
    Superscript,
    /// East Asian Character Code (final `1`), 3-octet multi-byte.
    Eacc,
}

impl CharacterSetId {
    /// Map an escape-sequence final octet to its character set.
    #[must_use]
    pub fn from_escape_final(byte: u8) -> Option<Self> {
        match byte {
            0x42 => Some(Self::BasicLatin),
            0x45 => Some(Self::AnselExtendedLatin),
            0x33 => Some(Self::BasicArabic),
            0x34 => Some(Self::ExtendedArabic),
            0x32 => Some(Self::BasicHebrew),
            0x4E => Some(Self::BasicCyrillic),
            0x51 => Some(Self::ExtendedCyrillic),
            0x53 => Some(Self::BasicGreek),
            0x67 => Some(Self::GreekSymbols),
            0x62 => Some(Self::Subscript),
            0x70 => Some(Self::Superscript),
            0x31 => Some(Self::Eacc),
            _ => None,
        }
    }

    /// Whether this set encodes characters as 3-octet sequences.
    #[must_use]
    pub fn is_multibyte(self) -> bool {
        matches!(self, Self::Eacc)
    }
}

/// Octet -> (code point, is_combining) for one single-byte set.
pub type CodeTable = HashMap<u8, (u32, bool)>;

/// Look up a single-byte character in the given set.
///
/// Basic Latin is computed (identity over 0x20-0x7E) rather than tabled.
/// For tabled sets the lookup tries the raw octet and then the octet with
/// the high bit flipped, so a set designated into the opposite G register
/// still resolves (ANSEL is tabled in its native G1 positions, the other
/// sets in their native G0 positions).
#[must_use]
pub fn lookup(set: CharacterSetId, byte: u8) -> Option<(u32, bool)> {
    match set {
        CharacterSetId::BasicLatin => {
            let b = byte & 0x7F;
            (0x20..=0x7E).contains(&b).then_some((u32::from(b), false))
        }
        CharacterSetId::Eacc => None,
        _ => {
            let table = code_table(set);
            table
                .get(&byte)
                .or_else(|| table.get(&(byte ^ 0x80)))
                .copied()
        }
    }
}

/// Look up an EACC character by its 3-octet key.
///
/// The key is the big-endian concatenation of the three octets, each masked
/// to 7 bits (EACC codes are defined over 0x21-0x7E per octet; G1
/// transmission sets the high bits).
#[must_use]
pub fn eacc_lookup(key: u32) -> Option<(u32, bool)> {
    let masked = key & 0x007F_7F7F;
    EACC.get(&masked).copied()
}

/// The code table for a tabled single-byte set.
///
/// # Panics
///
/// Panics if called for [`CharacterSetId::BasicLatin`] (computed, not
/// tabled) or [`CharacterSetId::Eacc`] (multi-byte); use [`lookup`] and
/// [`eacc_lookup`] instead.
#[must_use]
pub fn code_table(set: CharacterSetId) -> &'static CodeTable {
    match set {
        CharacterSetId::AnselExtendedLatin => &ANSEL,
        CharacterSetId::BasicArabic => &BASIC_ARABIC,
        CharacterSetId::ExtendedArabic => &EXTENDED_ARABIC,
        CharacterSetId::BasicHebrew => &BASIC_HEBREW,
        CharacterSetId::BasicCyrillic => &BASIC_CYRILLIC,
        CharacterSetId::ExtendedCyrillic => &EXTENDED_CYRILLIC,
        CharacterSetId::BasicGreek => &BASIC_GREEK,
        CharacterSetId::GreekSymbols => &GREEK_SYMBOLS,
        CharacterSetId::Subscript => &SUBSCRIPT,
        CharacterSetId::Superscript => &SUPERSCRIPT,
        CharacterSetId::BasicLatin | CharacterSetId::Eacc => {
            panic!("{set:?} has no single-byte code table")
        }
    }
}

/// Build a table from entry triples alone.
fn table(entries: &[(u8, u32, bool)]) -> CodeTable {
    entries.iter().map(|&(b, cp, c)| (b, (cp, c))).collect()
}

/// Build a table seeded with ASCII punctuation and digits (0x20-0x3F)
/// before overlaying the set's own entries. The non-Latin basic sets share
/// that ASCII region.
fn table_with_ascii_low(entries: &[(u8, u32, bool)]) -> CodeTable {
    let mut t: CodeTable = (0x20u8..=0x3F)
        .map(|b| (b, (u32::from(b), false)))
        .collect();
    for &(b, cp, c) in entries {
        t.insert(b, (cp, c));
    }
    t
}

// ANSEL extended Latin, tabled at its native G1 positions. Spacing
// characters at 0xA1-0xC8, combining diacritics at 0xE0-0xFE.
const ANSEL_ENTRIES: &[(u8, u32, bool)] = &[
    (0xA1, 0x0141, false), // uppercase L with stroke
    (0xA2, 0x00D8, false), // uppercase O with stroke
    (0xA3, 0x0110, false), // uppercase D with crossbar
    (0xA4, 0x00DE, false), // uppercase thorn
    (0xA5, 0x00C6, false), // uppercase AE
    (0xA6, 0x0152, false), // uppercase OE
    (0xA7, 0x02B9, false), // soft sign (prime)
    (0xA8, 0x00B7, false), // middle dot
    (0xA9, 0x266D, false), // musical flat
    (0xAA, 0x00AE, false), // patent mark
    (0xAB, 0x00B1, false), // plus or minus
    (0xAC, 0x01A0, false), // uppercase O with horn
    (0xAD, 0x01AF, false), // uppercase U with horn
    (0xAE, 0x02BC, false), // alif
    (0xB0, 0x02BB, false), // ayn
    (0xB1, 0x0142, false), // lowercase l with stroke
    (0xB2, 0x00F8, false), // lowercase o with stroke
    (0xB3, 0x0111, false), // lowercase d with crossbar
    (0xB4, 0x00FE, false), // lowercase thorn
    (0xB5, 0x00E6, false), // lowercase ae
    (0xB6, 0x0153, false), // lowercase oe
    (0xB7, 0x02BA, false), // hard sign (double prime)
    (0xB8, 0x0131, false), // lowercase dotless i
    (0xB9, 0x00A3, false), // pound sign
    (0xBA, 0x00F0, false), // lowercase eth
    (0xBC, 0x01A1, false), // lowercase o with horn
    (0xBD, 0x01B0, false), // lowercase u with horn
    (0xC0, 0x00B0, false), // degree sign
    (0xC1, 0x2113, false), // script small l
    (0xC2, 0x2117, false), // sound recording copyright
    (0xC3, 0x00A9, false), // copyright sign
    (0xC4, 0x266F, false), // musical sharp
    (0xC5, 0x00BF, false), // inverted question mark
    (0xC6, 0x00A1, false), // inverted exclamation mark
    (0xC7, 0x00DF, false), // eszett
    (0xC8, 0x20AC, false), // euro sign
    (0xE0, 0x0309, true),  // hook above
    (0xE1, 0x0300, true),  // grave
    (0xE2, 0x0301, true),  // acute
    (0xE3, 0x0302, true),  // circumflex
    (0xE4, 0x0303, true),  // tilde
    (0xE5, 0x0304, true),  // macron
    (0xE6, 0x0306, true),  // breve
    (0xE7, 0x0307, true),  // dot above
    (0xE8, 0x0308, true),  // diaeresis
    (0xE9, 0x030C, true),  // caron (hacek)
    (0xEA, 0x030A, true),  // ring above
    (0xEB, 0xFE20, true),  // ligature, left half
    (0xEC, 0xFE21, true),  // ligature, right half
    (0xED, 0x0315, true),  // comma above right
    (0xEE, 0x030B, true),  // double acute
    (0xEF, 0x0310, true),  // candrabindu
    (0xF0, 0x0327, true),  // cedilla
    (0xF1, 0x0328, true),  // right hook (ogonek)
    (0xF2, 0x0323, true),  // dot below
    (0xF3, 0x0324, true),  // double dot below
    (0xF4, 0x0325, true),  // ring below
    (0xF5, 0x0333, true),  // double underscore
    (0xF6, 0x0332, true),  // underscore
    (0xF7, 0x0326, true),  // left hook (comma below)
    (0xF8, 0x031C, true),  // right cedilla
    (0xF9, 0x032E, true),  // upadhmaniya (breve below)
    (0xFA, 0xFE22, true),  // double tilde, left half
    (0xFB, 0xFE23, true),  // double tilde, right half
    (0xFE, 0x0313, true),  // high comma, centered
];

// Basic Cyrillic: lowercase at 0x40-0x5F, uppercase mirrored at 0x60-0x7E.
const BASIC_CYRILLIC_ENTRIES: &[(u8, u32, bool)] = &[
    (0x40, 0x044E, false), // yu
    (0x41, 0x0430, false), // a
    (0x42, 0x0431, false), // be
    (0x43, 0x0446, false), // tse
    (0x44, 0x0434, false), // de
    (0x45, 0x0435, false), // ie
    (0x46, 0x0444, false), // ef
    (0x47, 0x0433, false), // ghe
    (0x48, 0x0445, false), // kha
    (0x49, 0x0438, false), // i
    (0x4A, 0x0439, false), // short i
    (0x4B, 0x043A, false), // ka
    (0x4C, 0x043B, false), // el
    (0x4D, 0x043C, false), // em
    (0x4E, 0x043D, false), // en
    (0x4F, 0x043E, false), // o
    (0x50, 0x043F, false), // pe
    (0x51, 0x044F, false), // ya
    (0x52, 0x0440, false), // er
    (0x53, 0x0441, false), // es
    (0x54, 0x0442, false), // te
    (0x55, 0x0443, false), // u
    (0x56, 0x0436, false), // zhe
    (0x57, 0x0432, false), // ve
    (0x58, 0x044C, false), // soft sign
    (0x59, 0x044B, false), // yeru
    (0x5A, 0x0437, false), // ze
    (0x5B, 0x0448, false), // sha
    (0x5C, 0x044D, false), // e
    (0x5D, 0x0449, false), // shcha
    (0x5E, 0x0447, false), // che
    (0x5F, 0x044A, false), // hard sign
    (0x60, 0x042E, false),
    (0x61, 0x0410, false),
    (0x62, 0x0411, false),
    (0x63, 0x0426, false),
    (0x64, 0x0414, false),
    (0x65, 0x0415, false),
    (0x66, 0x0424, false),
    (0x67, 0x0413, false),
    (0x68, 0x0425, false),
    (0x69, 0x0418, false),
    (0x6A, 0x0419, false),
    (0x6B, 0x041A, false),
    (0x6C, 0x041B, false),
    (0x6D, 0x041C, false),
    (0x6E, 0x041D, false),
    (0x6F, 0x041E, false),
    (0x70, 0x041F, false),
    (0x71, 0x042F, false),
    (0x72, 0x0420, false),
    (0x73, 0x0421, false),
    (0x74, 0x0422, false),
    (0x75, 0x0423, false),
    (0x76, 0x0416, false),
    (0x77, 0x0412, false),
    (0x78, 0x042C, false),
    (0x79, 0x042B, false),
    (0x7A, 0x0417, false),
    (0x7B, 0x0428, false),
    (0x7C, 0x042D, false),
    (0x7D, 0x0429, false),
    (0x7E, 0x0427, false),
];

// Extended Cyrillic subset: the non-Russian letters most common in
// bibliographic data (Ukrainian, Serbian, Macedonian, Belarusian).
const EXTENDED_CYRILLIC_ENTRIES: &[(u8, u32, bool)] = &[
    (0x41, 0x0491, false), // ghe with upturn
    (0x42, 0x0452, false), // dje
    (0x43, 0x0453, false), // gje
    (0x44, 0x0454, false), // ukrainian ie
    (0x45, 0x0455, false), // dze
    (0x46, 0x0456, false), // byelorussian-ukrainian i
    (0x47, 0x0457, false), // yi
    (0x48, 0x0458, false), // je
    (0x49, 0x0459, false), // lje
    (0x4A, 0x045A, false), // nje
    (0x4B, 0x045B, false), // tshe
    (0x4C, 0x045C, false), // kje
    (0x4D, 0x045E, false), // short u
    (0x4E, 0x045F, false), // dzhe
    (0x61, 0x0490, false),
    (0x62, 0x0402, false),
    (0x63, 0x0403, false),
    (0x64, 0x0404, false),
    (0x65, 0x0405, false),
    (0x66, 0x0406, false),
    (0x67, 0x0407, false),
    (0x68, 0x0408, false),
    (0x69, 0x0409, false),
    (0x6A, 0x040A, false),
    (0x6B, 0x040B, false),
    (0x6C, 0x040C, false),
    (0x6D, 0x040E, false),
    (0x6E, 0x040F, false),
];

// Basic Hebrew: points (combining) at 0x40-0x4E, letters at 0x60-0x7A.
const BASIC_HEBREW_ENTRIES: &[(u8, u32, bool)] = &[
    (0x40, 0x05B7, true), // patah
    (0x41, 0x05B8, true), // qamats
    (0x42, 0x05B6, true), // segol
    (0x43, 0x05B5, true), // tsere
    (0x44, 0x05B4, true), // hiriq
    (0x45, 0x05B9, true), // holam
    (0x46, 0x05BB, true), // qubuts
    (0x47, 0x05B0, true), // sheva
    (0x48, 0x05B2, true), // hataf patah
    (0x49, 0x05B3, true), // hataf qamats
    (0x4A, 0x05B1, true), // hataf segol
    (0x4B, 0x05BC, true), // dagesh
    (0x4C, 0x05BF, true), // rafe
    (0x4D, 0x05C1, true), // shin dot
    (0x4E, 0x05C2, true), // sin dot
    (0x60, 0x05D0, false), // alef
    (0x61, 0x05D1, false), // bet
    (0x62, 0x05D2, false), // gimel
    (0x63, 0x05D3, false), // dalet
    (0x64, 0x05D4, false), // he
    (0x65, 0x05D5, false), // vav
    (0x66, 0x05D6, false), // zayin
    (0x67, 0x05D7, false), // het
    (0x68, 0x05D8, false), // tet
    (0x69, 0x05D9, false), // yod
    (0x6A, 0x05DA, false), // final kaf
    (0x6B, 0x05DB, false), // kaf
    (0x6C, 0x05DC, false), // lamed
    (0x6D, 0x05DD, false), // final mem
    (0x6E, 0x05DE, false), // mem
    (0x6F, 0x05DF, false), // final nun
    (0x70, 0x05E0, false), // nun
    (0x71, 0x05E1, false), // samekh
    (0x72, 0x05E2, false), // ayin
    (0x73, 0x05E3, false), // final pe
    (0x74, 0x05E4, false), // pe
    (0x75, 0x05E5, false), // final tsadi
    (0x76, 0x05E6, false), // tsadi
    (0x77, 0x05E7, false), // qof
    (0x78, 0x05E8, false), // resh
    (0x79, 0x05E9, false), // shin
    (0x7A, 0x05EA, false), // tav
];

// Basic Arabic: letters at 0x41-0x6A, harakat (combining) at 0x6B-0x72,
// Arabic punctuation overlaying the ASCII region.
const BASIC_ARABIC_ENTRIES: &[(u8, u32, bool)] = &[
    (0x2C, 0x060C, false), // arabic comma
    (0x3B, 0x061B, false), // arabic semicolon
    (0x3F, 0x061F, false), // arabic question mark
    (0x41, 0x0621, false), // hamza
    (0x42, 0x0622, false), // alef with madda
    (0x43, 0x0623, false), // alef with hamza above
    (0x44, 0x0624, false), // waw with hamza
    (0x45, 0x0625, false), // alef with hamza below
    (0x46, 0x0626, false), // yeh with hamza
    (0x47, 0x0627, false), // alef
    (0x48, 0x0628, false), // beh
    (0x49, 0x0629, false), // teh marbuta
    (0x4A, 0x062A, false), // teh
    (0x4B, 0x062B, false), // theh
    (0x4C, 0x062C, false), // jeem
    (0x4D, 0x062D, false), // hah
    (0x4E, 0x062E, false), // khah
    (0x4F, 0x062F, false), // dal
    (0x50, 0x0630, false), // thal
    (0x51, 0x0631, false), // reh
    (0x52, 0x0632, false), // zain
    (0x53, 0x0633, false), // seen
    (0x54, 0x0634, false), // sheen
    (0x55, 0x0635, false), // sad
    (0x56, 0x0636, false), // dad
    (0x57, 0x0637, false), // tah
    (0x58, 0x0638, false), // zah
    (0x59, 0x0639, false), // ain
    (0x5A, 0x063A, false), // ghain
    (0x60, 0x0640, false), // tatweel
    (0x61, 0x0641, false), // feh
    (0x62, 0x0642, false), // qaf
    (0x63, 0x0643, false), // kaf
    (0x64, 0x0644, false), // lam
    (0x65, 0x0645, false), // meem
    (0x66, 0x0646, false), // noon
    (0x67, 0x0647, false), // heh
    (0x68, 0x0648, false), // waw
    (0x69, 0x0649, false), // alef maksura
    (0x6A, 0x064A, false), // yeh
    (0x6B, 0x064B, true),  // fathatan
    (0x6C, 0x064C, true),  // dammatan
    (0x6D, 0x064D, true),  // kasratan
    (0x6E, 0x064E, true),  // fatha
    (0x6F, 0x064F, true),  // damma
    (0x70, 0x0650, true),  // kasra
    (0x71, 0x0651, true),  // shadda
    (0x72, 0x0652, true),  // sukun
];

// Extended Arabic subset: Persian/Urdu letters.
const EXTENDED_ARABIC_ENTRIES: &[(u8, u32, bool)] = &[
    (0x41, 0x0679, false), // tteh
    (0x42, 0x067E, false), // peh
    (0x43, 0x0686, false), // tcheh
    (0x44, 0x0688, false), // ddal
    (0x45, 0x0691, false), // rreh
    (0x46, 0x0698, false), // jeh
    (0x47, 0x06A9, false), // keheh
    (0x48, 0x06AF, false), // gaf
    (0x49, 0x06BA, false), // noon ghunna
    (0x4A, 0x06BE, false), // heh doachashmee
    (0x4B, 0x06C1, false), // heh goal
    (0x4C, 0x06D2, false), // yeh barree
];

// Basic Greek: uppercase at 0x41-0x58, lowercase at 0x61-0x79 (final sigma
// precedes sigma, matching the alphabet row in the code table).
const BASIC_GREEK_ENTRIES: &[(u8, u32, bool)] = &[
    (0x41, 0x0391, false),
    (0x42, 0x0392, false),
    (0x43, 0x0393, false),
    (0x44, 0x0394, false),
    (0x45, 0x0395, false),
    (0x46, 0x0396, false),
    (0x47, 0x0397, false),
    (0x48, 0x0398, false),
    (0x49, 0x0399, false),
    (0x4A, 0x039A, false),
    (0x4B, 0x039B, false),
    (0x4C, 0x039C, false),
    (0x4D, 0x039D, false),
    (0x4E, 0x039E, false),
    (0x4F, 0x039F, false),
    (0x50, 0x03A0, false),
    (0x51, 0x03A1, false),
    (0x52, 0x03A3, false),
    (0x53, 0x03A4, false),
    (0x54, 0x03A5, false),
    (0x55, 0x03A6, false),
    (0x56, 0x03A7, false),
    (0x57, 0x03A8, false),
    (0x58, 0x03A9, false),
    (0x61, 0x03B1, false),
    (0x62, 0x03B2, false),
    (0x63, 0x03B3, false),
    (0x64, 0x03B4, false),
    (0x65, 0x03B5, false),
    (0x66, 0x03B6, false),
    (0x67, 0x03B7, false),
    (0x68, 0x03B8, false),
    (0x69, 0x03B9, false),
    (0x6A, 0x03BA, false),
    (0x6B, 0x03BB, false),
    (0x6C, 0x03BC, false),
    (0x6D, 0x03BD, false),
    (0x6E, 0x03BE, false),
    (0x6F, 0x03BF, false),
    (0x70, 0x03C0, false),
    (0x71, 0x03C1, false),
    (0x72, 0x03C2, false), // final sigma
    (0x73, 0x03C3, false),
    (0x74, 0x03C4, false),
    (0x75, 0x03C5, false),
    (0x76, 0x03C6, false),
    (0x77, 0x03C7, false),
    (0x78, 0x03C8, false),
    (0x79, 0x03C9, false),
];

// Greek symbols: the three scientific-notation letters.
const GREEK_SYMBOLS_ENTRIES: &[(u8, u32, bool)] = &[
    (0x61, 0x03B1, false), // alpha
    (0x62, 0x03B2, false), // beta
    (0x63, 0x03B3, false), // gamma
];

const SUBSCRIPT_ENTRIES: &[(u8, u32, bool)] = &[
    (0x28, 0x208D, false), // subscript (
    (0x29, 0x208E, false), // subscript )
    (0x2B, 0x208A, false), // subscript +
    (0x2D, 0x208B, false), // subscript -
    (0x30, 0x2080, false),
    (0x31, 0x2081, false),
    (0x32, 0x2082, false),
    (0x33, 0x2083, false),
    (0x34, 0x2084, false),
    (0x35, 0x2085, false),
    (0x36, 0x2086, false),
    (0x37, 0x2087, false),
    (0x38, 0x2088, false),
    (0x39, 0x2089, false),
];

// Superscript digits 1-3 live in Latin-1, the rest in the U+207x block.
const SUPERSCRIPT_ENTRIES: &[(u8, u32, bool)] = &[
    (0x28, 0x207D, false), // superscript (
    (0x29, 0x207E, false), // superscript )
    (0x2B, 0x207A, false), // superscript +
    (0x2D, 0x207B, false), // superscript -
    (0x30, 0x2070, false),
    (0x31, 0x00B9, false),
    (0x32, 0x00B2, false),
    (0x33, 0x00B3, false),
    (0x34, 0x2074, false),
    (0x35, 0x2075, false),
    (0x36, 0x2076, false),
    (0x37, 0x2077, false),
    (0x38, 0x2078, false),
    (0x39, 0x2079, false),
];

// EACC subset: the ideographic punctuation row. Keys are 7-bit triples.
const EACC_ENTRIES: &[(u32, u32, bool)] = &[
    (0x0021_2320, 0x3000, false), // ideographic space
    (0x0021_2321, 0x3001, false), // ideographic comma
    (0x0021_2322, 0x3002, false), // ideographic full stop
    (0x0021_2323, 0x30FB, false), // katakana middle dot
    (0x0021_2328, 0xFF08, false), // fullwidth left parenthesis
    (0x0021_2329, 0xFF09, false), // fullwidth right parenthesis
    (0x0021_232E, 0x300A, false), // left double angle bracket
    (0x0021_232F, 0x300B, false), // right double angle bracket
    (0x0021_2330, 0x3008, false), // left angle bracket
    (0x0021_2331, 0x3009, false), // right angle bracket
    (0x0021_2332, 0x300C, false), // left corner bracket
    (0x0021_2333, 0x300D, false), // right corner bracket
    (0x0021_2334, 0x300E, false), // left white corner bracket
    (0x0021_2335, 0x300F, false), // right white corner bracket
    (0x0021_2336, 0x3010, false), // left black lenticular bracket
    (0x0021_2337, 0x3011, false), // right black lenticular bracket
];

static ANSEL: Lazy<CodeTable> = Lazy::new(|| table(ANSEL_ENTRIES));
static BASIC_CYRILLIC: Lazy<CodeTable> =
    Lazy::new(|| table_with_ascii_low(BASIC_CYRILLIC_ENTRIES));
static EXTENDED_CYRILLIC: Lazy<CodeTable> =
    Lazy::new(|| table_with_ascii_low(EXTENDED_CYRILLIC_ENTRIES));
static BASIC_HEBREW: Lazy<CodeTable> = Lazy::new(|| table_with_ascii_low(BASIC_HEBREW_ENTRIES));
static BASIC_ARABIC: Lazy<CodeTable> = Lazy::new(|| table_with_ascii_low(BASIC_ARABIC_ENTRIES));
static EXTENDED_ARABIC: Lazy<CodeTable> =
    Lazy::new(|| table_with_ascii_low(EXTENDED_ARABIC_ENTRIES));
static BASIC_GREEK: Lazy<CodeTable> = Lazy::new(|| table_with_ascii_low(BASIC_GREEK_ENTRIES));
static GREEK_SYMBOLS: Lazy<CodeTable> = Lazy::new(|| table(GREEK_SYMBOLS_ENTRIES));
static SUBSCRIPT: Lazy<CodeTable> = Lazy::new(|| table(SUBSCRIPT_ENTRIES));
static SUPERSCRIPT: Lazy<CodeTable> = Lazy::new(|| table(SUPERSCRIPT_ENTRIES));
static EACC: Lazy<HashMap<u32, (u32, bool)>> =
    Lazy::new(|| EACC_ENTRIES.iter().map(|&(k, cp, c)| (k, (cp, c))).collect());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_finals_roundtrip() {
        assert_eq!(
            CharacterSetId::from_escape_final(0x42),
            Some(CharacterSetId::BasicLatin)
        );
        assert_eq!(
            CharacterSetId::from_escape_final(0x45),
            Some(CharacterSetId::AnselExtendedLatin)
        );
        assert_eq!(
            CharacterSetId::from_escape_final(0x31),
            Some(CharacterSetId::Eacc)
        );
        assert_eq!(CharacterSetId::from_escape_final(0xFF), None);
    }

    #[test]
    fn test_basic_latin_identity() {
        assert_eq!(lookup(CharacterSetId::BasicLatin, b'A'), Some((0x41, false)));
        assert_eq!(lookup(CharacterSetId::BasicLatin, b' '), Some((0x20, false)));
        // Same set designated into G1: high bit masked off.
        assert_eq!(lookup(CharacterSetId::BasicLatin, 0xC1), Some((0x41, false)));
        assert_eq!(lookup(CharacterSetId::BasicLatin, 0x1F), None);
    }

    #[test]
    fn test_ansel_combining_range() {
        let (cp, combining) = lookup(CharacterSetId::AnselExtendedLatin, 0xE1).unwrap();
        assert_eq!(cp, 0x0300);
        assert!(combining);
        let (cp, combining) = lookup(CharacterSetId::AnselExtendedLatin, 0xA5).unwrap();
        assert_eq!(cp, 0x00C6);
        assert!(!combining);
    }

    #[test]
    fn test_ansel_resolves_from_g0_positions() {
        // ANSEL designated as G0: 0x61 resolves via the 0xE1 entry.
        assert_eq!(
            lookup(CharacterSetId::AnselExtendedLatin, 0x61),
            Some((0x0300, true))
        );
    }

    #[test]
    fn test_cyrillic_case_mirror() {
        assert_eq!(lookup(CharacterSetId::BasicCyrillic, 0x41), Some((0x0430, false)));
        assert_eq!(lookup(CharacterSetId::BasicCyrillic, 0x61), Some((0x0410, false)));
        // G1 designation resolves the same letters.
        assert_eq!(lookup(CharacterSetId::BasicCyrillic, 0xC1), Some((0x0430, false)));
    }

    #[test]
    fn test_hebrew_letters_and_points() {
        assert_eq!(lookup(CharacterSetId::BasicHebrew, 0x60), Some((0x05D0, false)));
        assert_eq!(lookup(CharacterSetId::BasicHebrew, 0x40), Some((0x05B7, true)));
    }

    #[test]
    fn test_arabic_harakat_are_combining() {
        assert_eq!(lookup(CharacterSetId::BasicArabic, 0x41), Some((0x0621, false)));
        assert_eq!(lookup(CharacterSetId::BasicArabic, 0x71), Some((0x0651, true)));
    }

    #[test]
    fn test_ascii_low_region_shared() {
        // Digits and punctuation pass through in the non-Latin basic sets.
        assert_eq!(lookup(CharacterSetId::BasicCyrillic, b'3'), Some((0x33, false)));
        assert_eq!(lookup(CharacterSetId::BasicHebrew, b'!'), Some((0x21, false)));
        // Except where the set overlays them.
        assert_eq!(lookup(CharacterSetId::BasicArabic, b','), Some((0x060C, false)));
    }

    #[test]
    fn test_eacc_lookup_masks_high_bits() {
        assert_eq!(eacc_lookup(0x0021_2320), Some((0x3000, false)));
        // G1 transmission sets the high bit on each octet.
        assert_eq!(eacc_lookup(0x00A1_A3A0), Some((0x3000, false)));
        assert_eq!(eacc_lookup(0x0021_7E7E), None);
    }

    #[test]
    fn test_unknown_octet_misses() {
        assert_eq!(lookup(CharacterSetId::AnselExtendedLatin, 0xFF), None);
        assert_eq!(lookup(CharacterSetId::Subscript, b'A'), None);
    }
}
