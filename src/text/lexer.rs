//! Hand-written scanner for ARI text (spec.md §4.1). The grammar is small
//! and LALR(1); rather than pull in a parser generator we tokenize with a
//! handful of anchored patterns, tried in the same declaration order the
//! original PLY lexer used, then hand the token stream to a recursive
//! descent parser ([`super::parser`]).

use std::sync::OnceLock;

use regex::Regex;

use super::error::TextError;
use crate::ari::StructType;

/// A lexical token together with the byte offset it started at, used for
/// error reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    AriPrefix,
    Slash,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    /// `(TYPE)` — a parenthesized type name used as an EXPR result type.
    TypeName(StructType),
    /// `TYPE.` — a type name immediately followed by `.`, labelling a
    /// literal or introducing an object identifier.
    TypeDot(StructType),
    Bool(bool),
    Float(f64),
    Int(i128),
    Text(String),
    Bytes(Vec<u8>),
    Name(String),
    Eof,
}

fn ari_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^ari:").unwrap())
}

fn bool_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(true|false)").unwrap())
}

fn float_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^[+-]?(Infinity|NaN|(\d+\.\d*|\.\d+|\d+)([eE][+-]?\d+)?)").unwrap()
    })
}

fn int_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^[+-]?(0x[0-9a-f]+|0b[01]+|\d+)").unwrap())
}

fn tstr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^"([^"]*)""#).unwrap())
}

fn bstr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(h32|h|b32|b64)?'([^']*)'").unwrap())
}

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][^/()\[\],\s]*").unwrap())
}

fn type_names_longest_first() -> &'static Vec<&'static str> {
    static NAMES: OnceLock<Vec<&'static str>> = OnceLock::new();
    NAMES.get_or_init(|| {
        let mut v: Vec<&'static str> = StructType::ALL.iter().map(|t| t.name()).collect();
        v.sort_by_key(|n| std::cmp::Reverse(n.len()));
        v
    })
}

/// Does `input[pos..]` start, case-insensitively, with a known type name
/// (longest match wins so e.g. `TBLT` is not cut short by `TBR`)? Returns
/// the matched `StructType` and its length in bytes.
fn match_type_name(input: &str) -> Option<(StructType, usize)> {
    let upper = input.to_ascii_uppercase();
    for name in type_names_longest_first() {
        if upper.starts_with(name) {
            return Some((StructType::from_name(name).unwrap(), name.len()));
        }
    }
    None
}

fn is_name_continuation(c: char) -> bool {
    c != '/' && c != '(' && c != ')' && c != '[' && c != ']' && c != ',' && !c.is_whitespace()
}

/// Tokenize the full input. The ARI text codec always parses a complete
/// value, so there is no need to support incremental/streaming tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, TextError> {
    let mut tokens = Vec::new();
    let mut pos = 0usize;

    while pos < input.len() {
        let rest = &input[pos..];
        let c = rest.chars().next().unwrap();

        if c.is_whitespace() {
            pos += c.len_utf8();
            continue;
        }

        if let Some(m) = ari_prefix_re().find(rest) {
            tokens.push(Token {
                kind: TokenKind::AriPrefix,
                position: pos,
            });
            pos += m.end();
            continue;
        }

        match c {
            '/' => {
                tokens.push(tok(TokenKind::Slash, pos));
                pos += 1;
                continue;
            }
            ',' => {
                tokens.push(tok(TokenKind::Comma, pos));
                pos += 1;
                continue;
            }
            '[' => {
                tokens.push(tok(TokenKind::LBracket, pos));
                pos += 1;
                continue;
            }
            ']' => {
                tokens.push(tok(TokenKind::RBracket, pos));
                pos += 1;
                continue;
            }
            ')' => {
                tokens.push(tok(TokenKind::RParen, pos));
                pos += 1;
                continue;
            }
            '(' => {
                // Either `(TYPE)` (a parenthesized EXPR result type) or a
                // bare grouping paren in a parameter list.
                if let Some((t, len)) = match_type_name(&rest[1..]) {
                    if rest[1 + len..].starts_with(')') {
                        tokens.push(tok(TokenKind::TypeName(t), pos));
                        pos += 1 + len + 1;
                        continue;
                    }
                }
                tokens.push(tok(TokenKind::LParen, pos));
                pos += 1;
                continue;
            }
            _ => {}
        }

        // TYPEDOT: a known type name immediately followed by `.`. Declared
        // ahead of NAME/BOOL so e.g. `RPTT.full_report` lexes as
        // TypeDot(Rptt) + Name("full_report") rather than one long NAME.
        if let Some((t, len)) = match_type_name(rest) {
            if rest[len..].starts_with('.') {
                tokens.push(tok(TokenKind::TypeDot(t), pos));
                pos += len + 1;
                continue;
            }
        }

        // BOOL, but only if the match isn't just a prefix of a longer NAME
        // (`truest` is a NAME, not `true` followed by `st`).
        if let Some(m) = bool_re().find(rest) {
            let tail = &rest[m.end()..];
            let boundary = tail.chars().next().map_or(true, |c| !is_name_continuation(c));
            if boundary {
                let value = m.as_str().eq_ignore_ascii_case("true");
                tokens.push(tok(TokenKind::Bool(value), pos));
                pos += m.end();
                continue;
            }
        }

        if let Some(m) = float_re().find(rest) {
            let text = m.as_str();
            let value = parse_float(text).ok_or_else(|| {
                TextError::new(format!("malformed float literal: {text}"), pos, input)
            })?;
            tokens.push(tok(TokenKind::Float(value), pos));
            pos += m.end();
            continue;
        }

        if let Some(m) = int_re().find(rest) {
            let text = m.as_str();
            let value = parse_int(text)
                .ok_or_else(|| TextError::new(format!("malformed int literal: {text}"), pos, input))?;
            tokens.push(tok(TokenKind::Int(value), pos));
            pos += m.end();
            continue;
        }

        if let Some(m) = tstr_re().find(rest) {
            let caps = tstr_re().captures(rest).unwrap();
            let value = caps.get(1).unwrap().as_str().to_string();
            tokens.push(tok(TokenKind::Text(value), pos));
            pos += m.end();
            continue;
        }

        if let Some(m) = bstr_re().find(rest) {
            let caps = bstr_re().captures(rest).unwrap();
            let enc = caps.get(1).map(|g| g.as_str().to_ascii_lowercase());
            let body = caps.get(2).unwrap().as_str();
            let value = decode_bstr(enc.as_deref(), body)
                .map_err(|e| TextError::new(e, pos, input))?;
            tokens.push(tok(TokenKind::Bytes(value), pos));
            pos += m.end();
            continue;
        }

        if let Some(m) = name_re().find(rest) {
            tokens.push(tok(TokenKind::Name(m.as_str().to_string()), pos));
            pos += m.end();
            continue;
        }

        return Err(TextError::new(
            format!("unexpected character '{c}'"),
            pos,
            input,
        ));
    }

    tokens.push(tok(TokenKind::Eof, pos));
    Ok(tokens)
}

fn tok(kind: TokenKind, position: usize) -> Token {
    Token { kind, position }
}

fn parse_float(text: &str) -> Option<f64> {
    let (sign, body) = match text.as_bytes().first() {
        Some(b'+') => (1.0, &text[1..]),
        Some(b'-') => (-1.0, &text[1..]),
        _ => (1.0, text),
    };
    if body.eq_ignore_ascii_case("infinity") {
        return Some(sign * f64::INFINITY);
    }
    if body.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    body.parse::<f64>().ok().map(|v| sign * v)
}

fn parse_int(text: &str) -> Option<i128> {
    let (sign, body) = match text.as_bytes().first() {
        Some(b'+') => (1i128, &text[1..]),
        Some(b'-') => (-1i128, &text[1..]),
        _ => (1i128, text),
    };
    if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        return i128::from_str_radix(hex, 16).ok().map(|v| sign * v);
    }
    if let Some(bin) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        return i128::from_str_radix(bin, 2).ok().map(|v| sign * v);
    }
    body.parse::<i128>().ok().map(|v| sign * v)
}

/// Decode a BSTR body per its encoding prefix. `h32` is recognized so the
/// token lexes, but it is not implemented (spec.md §4.1/§9) and is rejected
/// here with a clear error rather than silently misdecoding.
fn decode_bstr(enc: Option<&str>, body: &str) -> Result<Vec<u8>, String> {
    match enc {
        None => Ok(body.as_bytes().to_vec()),
        Some("h") => crate::diag::from_hex(body),
        Some("h32") => Err("base32-hex (h32) byte string encoding is not implemented".into()),
        Some("b32") => decode_base32(body),
        Some("b64") => decode_base64(body),
        Some(other) => Err(format!("unknown byte string encoding prefix: {other}")),
    }
}

const BASE32_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// RFC 4648 base32 decode (no crate in this codebase's dependency stack
/// covers it; the padding rule below matches the original encoder's
/// `rem % 8 in {2, 4, 5, 7}` table).
fn decode_base32(body: &str) -> Result<Vec<u8>, String> {
    let cleaned: String = body.chars().filter(|c| *c != '=').collect();
    let mut bits: u64 = 0;
    let mut bit_count = 0u32;
    let mut out = Vec::new();
    for c in cleaned.chars() {
        let val = BASE32_ALPHABET
            .iter()
            .position(|b| *b as char == c.to_ascii_uppercase())
            .ok_or_else(|| format!("invalid base32 character: {c}"))? as u64;
        bits = (bits << 5) | val;
        bit_count += 5;
        if bit_count >= 8 {
            bit_count -= 8;
            out.push(((bits >> bit_count) & 0xFF) as u8);
        }
    }
    Ok(out)
}

fn decode_base64(body: &str) -> Result<Vec<u8>, String> {
    use base64::Engine as _;
    let padded = pad_base64(body);
    base64::engine::general_purpose::STANDARD
        .decode(padded)
        .map_err(|e| format!("invalid base64 byte string: {e}"))
}

fn pad_base64(body: &str) -> String {
    let rem = body.len() % 4;
    let pad = if rem == 2 || rem == 3 { 4 - rem } else { 0 };
    let mut s = body.to_string();
    s.extend(std::iter::repeat('=').take(pad));
    s
}
