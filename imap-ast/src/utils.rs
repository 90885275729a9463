//! Utilities shared between the data model and the parser.

use std::borrow::Cow;

/// Character predicates for the IMAP lexical categories.
pub mod indicators {
    /// `CHAR8 = %x01-ff` (any octet except NUL)
    pub fn is_char8(i: u8) -> bool {
        i != 0
    }

    /// `TEXT-CHAR = <any CHAR except CR and LF>`
    pub fn is_text_char(c: u8) -> bool {
        matches!(c, 0x01..=0x09 | 0x0b | 0x0c | 0x0e..=0x7f)
    }

    /// `quoted-specials = DQUOTE / "\"`
    pub fn is_quoted_specials(c: u8) -> bool {
        c == b'"' || c == b'\\'
    }

    /// `ATOM-CHAR = <any CHAR except atom-specials>`
    pub fn is_atom_char(b: u8) -> bool {
        match b {
            b'(' | b')' | b'{' | b' ' => false,
            0x00..=0x1f | 0x7f => false, // CTL
            b'%' | b'*' => false,        // list-wildcards
            b'"' | b'\\' => false,       // quoted-specials
            b']' => false,               // resp-specials
            _ => b.is_ascii(),
        }
    }

    /// `ASTRING-CHAR = ATOM-CHAR / resp-specials`
    pub fn is_astring_char(b: u8) -> bool {
        is_atom_char(b) || b == b']'
    }

    /// `list-char = ATOM-CHAR / list-wildcards / resp-specials`
    pub fn is_list_char(b: u8) -> bool {
        is_atom_char(b) || b == b'%' || b == b'*' || b == b']'
    }
}

/// Replace `\"` with `"` and `\\` with `\` in a quoted string's content.
pub fn unescape_quoted(escaped: &str) -> Cow<str> {
    let mut unescaped = Cow::Borrowed(escaped);

    if escaped.contains('\\') {
        unescaped = Cow::Owned(escaped.replace("\\\\", "\\").replace("\\\"", "\""));
    }

    unescaped
}

/// Escape `"` and `\` for transmission inside a quoted string.
pub fn escape_quoted(unescaped: &str) -> Cow<str> {
    let mut escaped = Cow::Borrowed(unescaped);

    if escaped.contains('\\') {
        escaped = Cow::Owned(escaped.replace('\\', "\\\\"));
    }

    if escaped.contains('"') {
        escaped = Cow::Owned(escaped.replace('"', "\\\""));
    }

    escaped
}
