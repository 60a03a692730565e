//! C literal tokenizer for data rows.
//!
//! Recognizes character, string, floating and integer constants as defined by
//! C11, with one deliberate extension: numeric literals may carry a leading
//! `+`/`-` sign so that data rows can hold signed values directly.
//!
//! At every position all matchers are tried. The longest match wins; equal
//! lengths are resolved by [`PRECEDENCE`]. The scanner never fails: text that
//! no grammar matches is skipped, and whatever is left after the last token is
//! available through [`Scanner::remainder`].

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralKind {
    Char,
    String,
    FloatDecimal,
    FloatHexadecimal,
    IntegerDecimal,
    IntegerOctal,
    IntegerHexadecimal,
}

/// Tie-break order for matches of equal length, highest priority first.
///
/// Integers come before floats, so `0x1F` and `42` are integers while
/// `0x1F.8`, `0x1Fp3`, `42.` and `42f` (all longer) are floats.
pub const PRECEDENCE: [LiteralKind; 7] = [
    LiteralKind::Char,
    LiteralKind::String,
    LiteralKind::IntegerHexadecimal,
    LiteralKind::IntegerOctal,
    LiteralKind::IntegerDecimal,
    LiteralKind::FloatHexadecimal,
    LiteralKind::FloatDecimal,
];

impl LiteralKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LiteralKind::Char => "char",
            LiteralKind::String => "string",
            LiteralKind::FloatDecimal => "float_dec",
            LiteralKind::FloatHexadecimal => "float_hex",
            LiteralKind::IntegerDecimal => "int_dec",
            LiteralKind::IntegerOctal => "int_oct",
            LiteralKind::IntegerHexadecimal => "int_hex",
        }
    }

    /// Length in bytes of this literal kind at the very start of `text`.
    pub fn match_len(&self, text: &str) -> Option<usize> {
        let bytes = text.as_bytes();
        match self {
            LiteralKind::Char => match_char(text),
            LiteralKind::String => match_string(text),
            LiteralKind::FloatDecimal => match_float_dec(bytes),
            LiteralKind::FloatHexadecimal => match_float_hex(bytes),
            LiteralKind::IntegerDecimal => match_int_dec(bytes),
            LiteralKind::IntegerOctal => match_int_oct(bytes),
            LiteralKind::IntegerHexadecimal => match_int_hex(bytes),
        }
    }
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A literal matched inside a line, with its byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralToken<'a> {
    pub kind: LiteralKind,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Finds the best literal at the start of `text`, if any.
pub fn match_at(text: &str) -> Option<(LiteralKind, usize)> {
    let mut best: Option<(LiteralKind, usize)> = None;
    for kind in PRECEDENCE {
        if let Some(len) = kind.match_len(text) {
            if best.map_or(true, |(_, best_len)| len > best_len) {
                best = Some((kind, len));
            }
        }
    }
    best
}

pub fn scan(line: &str) -> Scanner<'_> {
    Scanner { line, pos: 0 }
}

pub struct Scanner<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Text after the last emitted token.
    pub fn remainder(&self) -> &'a str {
        &self.line[self.pos..]
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = LiteralToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.line;
        let found = (self.pos..line.len())
            .filter(|&start| line.is_char_boundary(start))
            .find_map(|start| match_at(&line[start..]).map(|(kind, len)| (start, kind, len)));

        let (start, kind, len) = found?;
        let end = start + len;
        self.pos = end;
        Some(LiteralToken {
            kind,
            text: &line[start..end],
            start,
            end,
        })
    }
}

fn count_while(bytes: &[u8], pred: impl Fn(u8) -> bool) -> usize {
    bytes.iter().take_while(|&&b| pred(b)).count()
}

fn is_octal(b: u8) -> bool {
    matches!(b, b'0'..=b'7')
}

fn sign_len(bytes: &[u8]) -> usize {
    usize::from(matches!(bytes.first(), Some(b'+' | b'-')))
}

fn hex_prefix_len(bytes: &[u8]) -> usize {
    match bytes {
        [b'0', b'x' | b'X', ..] => 2,
        _ => 0,
    }
}

/// C11 integer suffix: an unsigned suffix and a long/long-long suffix in
/// either order, each optional.
fn int_suffix_len(bytes: &[u8]) -> usize {
    let unsigned = |b: &[u8]| usize::from(matches!(b.first(), Some(b'u' | b'U')));
    let long = |b: &[u8]| match b {
        [b'l', b'l', ..] | [b'L', b'L', ..] => 2,
        [b'l' | b'L', ..] => 1,
        _ => 0,
    };

    let u = unsigned(bytes);
    if u > 0 {
        return u + long(&bytes[u..]);
    }
    let l = long(bytes);
    l + unsigned(&bytes[l..])
}

fn float_suffix_len(bytes: &[u8]) -> usize {
    usize::from(matches!(bytes.first(), Some(b'f' | b'l' | b'F' | b'L')))
}

/// Exponent part: marker, optional sign, at least one decimal digit.
fn exponent_len(bytes: &[u8], markers: [u8; 2]) -> usize {
    match bytes.first() {
        Some(b) if markers.contains(b) => {
            let sign = sign_len(&bytes[1..]);
            let digits = count_while(&bytes[1 + sign..], |b| b.is_ascii_digit());
            if digits == 0 {
                0
            } else {
                1 + sign + digits
            }
        }
        _ => 0,
    }
}

/// Mantissa `digits? . digits | digits . | digits` using `is_digit`.
fn mantissa_len(bytes: &[u8], is_digit: impl Fn(u8) -> bool + Copy) -> Option<usize> {
    let whole = count_while(bytes, is_digit);
    if bytes.get(whole) == Some(&b'.') {
        let fraction = count_while(&bytes[whole + 1..], is_digit);
        if whole == 0 && fraction == 0 {
            return None;
        }
        Some(whole + 1 + fraction)
    } else if whole == 0 {
        None
    } else {
        Some(whole)
    }
}

fn match_float_dec(bytes: &[u8]) -> Option<usize> {
    let mut i = sign_len(bytes);
    i += mantissa_len(&bytes[i..], |b| b.is_ascii_digit())?;
    i += exponent_len(&bytes[i..], [b'e', b'E']);
    i += float_suffix_len(&bytes[i..]);
    Some(i)
}

fn match_float_hex(bytes: &[u8]) -> Option<usize> {
    let mut i = sign_len(bytes);
    let prefix = hex_prefix_len(&bytes[i..]);
    if prefix == 0 {
        return None;
    }
    i += prefix;
    i += mantissa_len(&bytes[i..], |b| b.is_ascii_hexdigit())?;
    i += exponent_len(&bytes[i..], [b'p', b'P']);
    i += float_suffix_len(&bytes[i..]);
    Some(i)
}

fn match_int_dec(bytes: &[u8]) -> Option<usize> {
    let mut i = sign_len(bytes);
    if !matches!(bytes.get(i), Some(b'1'..=b'9')) {
        return None;
    }
    i += 1 + count_while(&bytes[i + 1..], |b| b.is_ascii_digit());
    Some(i + int_suffix_len(&bytes[i..]))
}

fn match_int_oct(bytes: &[u8]) -> Option<usize> {
    let mut i = sign_len(bytes);
    if bytes.get(i) != Some(&b'0') {
        return None;
    }
    i += 1 + count_while(&bytes[i + 1..], is_octal);
    Some(i + int_suffix_len(&bytes[i..]))
}

fn match_int_hex(bytes: &[u8]) -> Option<usize> {
    let mut i = sign_len(bytes);
    let prefix = hex_prefix_len(&bytes[i..]);
    if prefix == 0 {
        return None;
    }
    i += prefix;
    let digits = count_while(&bytes[i..], |b| b.is_ascii_hexdigit());
    if digits == 0 {
        return None;
    }
    i += digits;
    Some(i + int_suffix_len(&bytes[i..]))
}

fn char_len_at(text: &str, i: usize) -> Option<usize> {
    text[i..].chars().next().map(char::len_utf8)
}

/// Escape sequence allowed in a character constant, starting at the backslash.
fn char_escape_len(bytes: &[u8]) -> Option<usize> {
    match bytes.get(1)? {
        b'\'' | b'"' | b'?' | b'\\' | b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' => Some(2),
        b'x' => {
            let digits = count_while(&bytes[2..], |b| b.is_ascii_hexdigit());
            (digits > 0).then_some(2 + digits)
        }
        b if is_octal(*b) => Some(1 + count_while(&bytes[1..], is_octal).min(3)),
        _ => None,
    }
}

fn match_char(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = usize::from(matches!(bytes.first(), Some(b'L' | b'u' | b'U')));
    if bytes.get(i) != Some(&b'\'') {
        return None;
    }
    i += 1;
    i += match bytes.get(i)? {
        b'\'' | b'\n' => return None,
        b'\\' => char_escape_len(&bytes[i..])?,
        _ => char_len_at(text, i)?,
    };
    (bytes.get(i) == Some(&b'\'')).then_some(i + 1)
}

fn match_string(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = if bytes.starts_with(b"u8\"") {
        2
    } else {
        usize::from(matches!(bytes.first(), Some(b'L' | b'u' | b'U')))
    };
    if bytes.get(i) != Some(&b'"') {
        return None;
    }
    i += 1;
    loop {
        match bytes.get(i)? {
            b'"' => return Some(i + 1),
            b'\n' => return None,
            b'\\' => {
                if bytes.get(i + 1) == Some(&b'\n') {
                    return None;
                }
                i += 1 + char_len_at(text, i + 1)?;
            }
            _ => i += char_len_at(text, i)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds_and_texts(line: &str) -> Vec<(LiteralKind, &str)> {
        scan(line).map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn test_precedence_order_is_fixed() {
        assert_eq!(PRECEDENCE[0], LiteralKind::Char);
        assert_eq!(PRECEDENCE[6], LiteralKind::FloatDecimal);
        let hex_int = PRECEDENCE
            .iter()
            .position(|k| *k == LiteralKind::IntegerHexadecimal);
        let hex_float = PRECEDENCE
            .iter()
            .position(|k| *k == LiteralKind::FloatHexadecimal);
        assert!(hex_int < hex_float);
    }

    #[test]
    fn test_decimal_integer() {
        assert_eq!(
            kinds_and_texts("12345 54321"),
            vec![
                (LiteralKind::IntegerDecimal, "12345"),
                (LiteralKind::IntegerDecimal, "54321"),
            ]
        );
    }

    #[test]
    fn test_signed_numbers_keep_sign() {
        assert_eq!(
            kinds_and_texts("-42 +7 -0x10 -1.5e-3"),
            vec![
                (LiteralKind::IntegerDecimal, "-42"),
                (LiteralKind::IntegerDecimal, "+7"),
                (LiteralKind::IntegerHexadecimal, "-0x10"),
                (LiteralKind::FloatDecimal, "-1.5e-3"),
            ]
        );
    }

    #[test]
    fn test_integer_suffixes() {
        assert_eq!(
            kinds_and_texts("10u 10UL 10ll 10LLU 0x1Fu 017L"),
            vec![
                (LiteralKind::IntegerDecimal, "10u"),
                (LiteralKind::IntegerDecimal, "10UL"),
                (LiteralKind::IntegerDecimal, "10ll"),
                (LiteralKind::IntegerDecimal, "10LLU"),
                (LiteralKind::IntegerHexadecimal, "0x1Fu"),
                (LiteralKind::IntegerOctal, "017L"),
            ]
        );
    }

    #[test]
    fn test_octal_and_zero() {
        assert_eq!(
            kinds_and_texts("0 0755"),
            vec![
                (LiteralKind::IntegerOctal, "0"),
                (LiteralKind::IntegerOctal, "0755"),
            ]
        );
    }

    #[test]
    fn test_hex_integer_wins_tie_with_hex_float() {
        assert_eq!(
            match_at("0x1F"),
            Some((LiteralKind::IntegerHexadecimal, 4))
        );
        assert_eq!(LiteralKind::FloatHexadecimal.match_len("0x1F"), Some(4));
    }

    #[test]
    fn test_hex_float_forms() {
        assert_eq!(
            kinds_and_texts("0x1.8p3 0x1Fp-2f 0xA."),
            vec![
                (LiteralKind::FloatHexadecimal, "0x1.8p3"),
                (LiteralKind::FloatHexadecimal, "0x1Fp-2f"),
                (LiteralKind::FloatHexadecimal, "0xA."),
            ]
        );
    }

    #[test]
    fn test_decimal_float_forms() {
        assert_eq!(
            kinds_and_texts(".5 3. 2.25 1e10 6.02E+23f 1f"),
            vec![
                (LiteralKind::FloatDecimal, ".5"),
                (LiteralKind::FloatDecimal, "3."),
                (LiteralKind::FloatDecimal, "2.25"),
                (LiteralKind::FloatDecimal, "1e10"),
                (LiteralKind::FloatDecimal, "6.02E+23f"),
                (LiteralKind::FloatDecimal, "1f"),
            ]
        );
    }

    #[test]
    fn test_dangling_exponent_is_not_consumed() {
        let mut scanner = scan("1e");
        let token = scanner.next().unwrap();
        assert_eq!(token.kind, LiteralKind::IntegerDecimal);
        assert_eq!(token.text, "1");
        assert_eq!(scanner.next(), None);
        assert_eq!(scanner.remainder(), "e");
    }

    #[test]
    fn test_char_literals() {
        assert_eq!(
            kinds_and_texts(r"'a' '\n' '\'' '\x41' '\101' L'b' u'c' U'd'"),
            vec![
                (LiteralKind::Char, "'a'"),
                (LiteralKind::Char, r"'\n'"),
                (LiteralKind::Char, r"'\''"),
                (LiteralKind::Char, r"'\x41'"),
                (LiteralKind::Char, r"'\101'"),
                (LiteralKind::Char, "L'b'"),
                (LiteralKind::Char, "u'c'"),
                (LiteralKind::Char, "U'd'"),
            ]
        );
    }

    #[test]
    fn test_invalid_char_escape_is_not_a_char() {
        assert_eq!(LiteralKind::Char.match_len(r"'\q'"), None);
        assert_eq!(LiteralKind::Char.match_len("''"), None);
    }

    #[test]
    fn test_non_ascii_char_literal() {
        assert_eq!(LiteralKind::Char.match_len("'é'"), Some("'é'".len()));
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(
            kinds_and_texts(r#""hello, " "wor\"ld" u8"utf" L"wide" """#),
            vec![
                (LiteralKind::String, r#""hello, ""#),
                (LiteralKind::String, r#""wor\"ld""#),
                (LiteralKind::String, r#"u8"utf""#),
                (LiteralKind::String, r#"L"wide""#),
                (LiteralKind::String, r#""""#),
            ]
        );
    }

    #[test]
    fn test_string_with_non_ascii_content() {
        assert_eq!(
            kinds_and_texts(r#""héllo" 1"#),
            vec![
                (LiteralKind::String, r#""héllo""#),
                (LiteralKind::IntegerDecimal, "1"),
            ]
        );
    }

    #[test]
    fn test_unterminated_string_is_skipped() {
        let mut scanner = scan(r#""abc"#);
        assert_eq!(scanner.next(), None);
        assert_eq!(scanner.remainder(), r#""abc"#);
    }

    #[test]
    fn test_separators_are_skipped() {
        let tokens: Vec<_> = scan("(12345, 54321)").collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!((tokens[0].start, tokens[0].end), (1, 6));
        assert_eq!((tokens[1].start, tokens[1].end), (8, 13));
    }

    #[test]
    fn test_remainder_after_last_token() {
        let mut scanner = scan("1 2 NULL");
        assert_eq!(scanner.by_ref().count(), 2);
        assert_eq!(scanner.remainder(), " NULL");
    }

    #[test]
    fn test_minus_between_numbers() {
        assert_eq!(
            kinds_and_texts("10-5"),
            vec![
                (LiteralKind::IntegerDecimal, "10"),
                (LiteralKind::IntegerDecimal, "-5"),
            ]
        );
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(LiteralKind::FloatHexadecimal.to_string(), "float_hex");
        assert_eq!(LiteralKind::IntegerOctal.as_str(), "int_oct");
    }
}
