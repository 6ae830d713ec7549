//! ARI CBOR codec (C3): the bit-packed binary wire form, grounded in
//! `original_source/src/ace/ari_cbor.py`.
//!
//! CBOR items themselves are decoded/encoded through [`serde_cbor::Value`];
//! this module only supplies the ARI-specific framing (flag bytes, TNVC
//! layout, AC/EXPR count headers) around them.

mod error;

pub use error::CborError;

use serde_cbor::Value;

use crate::ari::{
    Ac, Ari, Expr, Identity, Literal, LiteralAri, Name, Namespace, Param, ReferenceAri, StructType,
    Tnvc,
};
use crate::diag::is_printable;

const FLAG_HAS_NN: u8 = 0x80;
const FLAG_HAS_PARAMS: u8 = 0x40;
const FLAG_HAS_ISS: u8 = 0x20;
const FLAG_HAS_TAG: u8 = 0x10;

const TNVC_MIXED: u8 = 0x8;
const TNVC_TYPE: u8 = 0x4;
const TNVC_NAME: u8 = 0x2;
const TNVC_VALUE: u8 = 0x1;

/// Maximum item count representable by the AC/EXPR 5-bit count header
/// (spec.md §9 "Count-limit workaround").
pub const MAX_AC_COUNT: usize = 0x1F;

/// Encode an ARI to its canonical CBOR byte string.
pub fn encode(ari: &Ari) -> Result<Vec<u8>, CborError> {
    let mut out = Vec::new();
    encode_ari_framed(ari, &mut out)?;
    Ok(out)
}

/// Decode one ARI from a CBOR byte string. If trailing bytes remain after
/// the first complete ARI, a warning is logged and the decoded value is
/// still returned (spec.md §4.2 "Decoding errors").
pub fn decode(bytes: &[u8]) -> Result<Ari, CborError> {
    let mut cur = Cursor::new(bytes);
    let ari = decode_ari_framed(&mut cur)?;
    if cur.remaining() > 0 {
        log::warn!(
            "ARI decoder handled only the first {} of {} octets",
            cur.pos,
            bytes.len()
        );
    }
    Ok(ari)
}

/// Decode one ARI from the start of `bytes` and report how many bytes it
/// consumed, leaving any trailing bytes unconsumed rather than warning
/// about them. Used to walk a CBOR sequence of back-to-back ARI frames
/// (spec.md §6 `--inform cbor`; SPEC_FULL.md §4.2 "Decoding a CBOR
/// sequence").
pub fn decode_prefix(bytes: &[u8]) -> Result<(Ari, usize), CborError> {
    let mut cur = Cursor::new(bytes);
    let ari = decode_ari_framed(&mut cur)?;
    Ok((ari, cur.pos))
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read_byte(&mut self) -> Result<u8, CborError> {
        let b = *self
            .data
            .get(self.pos)
            .ok_or_else(|| CborError::new("unexpected end of input"))?;
        self.pos += 1;
        Ok(b)
    }

    fn read_value(&mut self) -> Result<Value, CborError> {
        let mut de = serde_cbor::Deserializer::from_slice(&self.data[self.pos..]);
        let value: Value = serde::de::Deserialize::deserialize(&mut de)
            .map_err(|e| CborError::new(format!("failed to decode CBOR item: {e}")))?;
        self.pos += de.byte_offset();
        Ok(value)
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

fn write_value(value: &Value, out: &mut Vec<u8>) -> Result<(), CborError> {
    let bytes = serde_cbor::to_vec(value)?;
    out.extend_from_slice(&bytes);
    Ok(())
}

// --- Encoding -------------------------------------------------------------

/// Encode `ari` as a self-describing frame: a flag byte followed by its
/// payload. Used at the document root and for AC/EXPR items, both of which
/// decode via [`decode_ari_framed`].
fn encode_ari_framed(ari: &Ari, out: &mut Vec<u8>) -> Result<(), CborError> {
    match ari {
        Ari::Reference(r) => encode_reference(r, out),
        Ari::Literal(lit) => encode_literal_framed(lit, out),
    }
}

fn encode_literal_framed(lit: &LiteralAri, out: &mut Vec<u8>) -> Result<(), CborError> {
    let offset = (lit.type_enum as i16) - (StructType::Bool as i16);
    if !(0..=15).contains(&offset) {
        return Err(CborError::new(format!(
            "literal type {:?} cannot be framed (offset {offset} out of nibble range)",
            lit.type_enum
        )));
    }
    let flags = ((offset as u8) << 4) | (StructType::Lit as i16 as u8);
    out.push(flags);
    write_value(&literal_value(lit), out)
}

fn encode_reference(r: &ReferenceAri, out: &mut Vec<u8>) -> Result<(), CborError> {
    let mut flags = (r.ident.type_enum as i16 as u8) & 0x0F;
    if r.ident.namespace.is_some() {
        flags |= FLAG_HAS_NN;
    }
    if r.params.is_some() {
        flags |= FLAG_HAS_PARAMS;
    }
    if r.ident.issuer.is_some() {
        flags |= FLAG_HAS_ISS;
    }
    if r.ident.tag.is_some() {
        flags |= FLAG_HAS_TAG;
    }
    out.push(flags);

    if let Some(ns) = &r.ident.namespace {
        write_value(&namespace_value(ns), out)?;
    }

    write_value(&name_value(&r.ident.name), out)?;

    if let Some(params) = &r.params {
        encode_tnvc(params, out)?;
    }
    if let Some(issuer) = &r.ident.issuer {
        write_value(&Value::Bytes(issuer.clone()), out)?;
    }
    if let Some(tag) = &r.ident.tag {
        write_value(&Value::Bytes(tag.clone()), out)?;
    }
    Ok(())
}

fn namespace_value(ns: &Namespace) -> Value {
    match ns {
        Namespace::Text(s) => Value::Text(s.clone()),
        Namespace::Nickname(n) => Value::Integer(*n as i128),
    }
}

/// The name field is always written as a CBOR byte string on the wire.
fn name_value(name: &Name) -> Value {
    match name {
        Name::Bytes(b) => Value::Bytes(b.clone()),
        Name::Text(s) => Value::Bytes(s.as_bytes().to_vec()),
    }
}

fn literal_value(lit: &LiteralAri) -> Value {
    match &lit.value {
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(i) => Value::Integer(*i),
        Literal::Float(f) => Value::Float(*f),
        Literal::Text(s) => Value::Text(s.clone()),
        Literal::Bytes(b) => Value::Bytes(b.clone()),
    }
}

fn encode_tnvc(params: &[Param], out: &mut Vec<u8>) -> Result<(), CborError> {
    let flags: u8 = if params.is_empty() {
        0
    } else {
        TNVC_TYPE | TNVC_VALUE
    };
    out.push(flags);
    if flags != 0 {
        write_value(&Value::Integer(params.len() as i128), out)?;
    }

    for param in params {
        out.push(tnvc_type_marker(param) as i16 as u8);
    }
    for param in params {
        encode_tnvc_param(param, out)?;
    }
    Ok(())
}

fn tnvc_type_marker(param: &Param) -> StructType {
    match param {
        Param::Ari(Ari::Reference(_)) => StructType::Ari,
        Param::Ari(Ari::Literal(lit)) => lit.type_enum,
        Param::Ac(_) => StructType::Ac,
        Param::Expr(_) => StructType::Expr,
        Param::Tnvc(_) => StructType::Tnvc,
    }
}

/// Encode one TNVC parameter value per its type marker: a reference gets a
/// full nested ARI frame; a literal is written bare (no flag byte — this is
/// the "parameter level" bare encoding spec.md §4.2 calls out for BSTR, and
/// applies uniformly to every literal type in TNVC position).
fn encode_tnvc_param(param: &Param, out: &mut Vec<u8>) -> Result<(), CborError> {
    match param {
        Param::Ari(Ari::Reference(r)) => encode_reference(r, out),
        Param::Ari(Ari::Literal(lit)) => write_value(&literal_value(lit), out),
        Param::Ac(ac) => encode_ac(ac, out),
        Param::Expr(expr) => encode_expr(expr, out),
        Param::Tnvc(tnvc) => encode_tnvc(&tnvc.items, out),
    }
}

fn encode_ac(ac: &Ac, out: &mut Vec<u8>) -> Result<(), CborError> {
    encode_ac_items(&ac.items, out)
}

fn encode_expr(expr: &Expr, out: &mut Vec<u8>) -> Result<(), CborError> {
    write_value(&Value::Integer(expr.type_enum as i16 as i128), out)?;
    encode_ac_items(&expr.items, out)
}

/// Write the 5-bit count header and each item as a full nested ARI frame.
/// AC/EXPR items are always `ari` in the grammar (never a bare AC/EXPR/TNVC
/// themselves), matching `decode_ac_items`.
fn encode_ac_items(items: &[Param], out: &mut Vec<u8>) -> Result<(), CborError> {
    if items.len() > MAX_AC_COUNT {
        return Err(CborError::new(format!(
            "AC/EXPR item count {} exceeds the 5-bit header limit of {MAX_AC_COUNT}",
            items.len()
        )));
    }
    out.push(0x80 | (items.len() as u8));
    for item in items {
        match item {
            Param::Ari(ari) => encode_ari_framed(ari, out)?,
            other => {
                return Err(CborError::new(format!(
                    "AC/EXPR items must be ARI values, found {other:?}"
                )))
            }
        }
    }
    Ok(())
}

// --- Decoding -------------------------------------------------------------

fn decode_ari_framed(cur: &mut Cursor) -> Result<Ari, CborError> {
    let flags = cur.read_byte()?;
    let low = flags & 0x0F;

    if low == (StructType::Lit as i16 as u8) {
        let value = cur.read_value()?;
        let offset = (flags >> 4) as i16;
        let type_enum = StructType::from_i16(offset + StructType::Bool as i16)
            .map_err(|e| CborError::new(e.to_string()))?;
        let literal = decode_literal_value(type_enum, value)?;
        return Ok(Ari::Literal(LiteralAri {
            type_enum,
            value: literal,
        }));
    }

    let type_enum =
        StructType::from_i16(low as i16).map_err(|e| CborError::new(e.to_string()))?;

    let namespace = if flags & FLAG_HAS_NN != 0 {
        Some(decode_namespace(cur.read_value()?)?)
    } else {
        None
    };

    let name = decode_name(cur.read_value()?)?;

    let params = if flags & FLAG_HAS_PARAMS != 0 {
        Some(decode_tnvc(cur)?)
    } else {
        None
    };

    let issuer = if flags & FLAG_HAS_ISS != 0 {
        Some(decode_bytes(cur.read_value()?)?)
    } else {
        None
    };

    let tag = if flags & FLAG_HAS_TAG != 0 {
        Some(decode_bytes(cur.read_value()?)?)
    } else {
        None
    };

    Ok(Ari::Reference(ReferenceAri {
        ident: Identity {
            namespace,
            type_enum,
            name,
            issuer,
            tag,
        },
        params,
    }))
}

fn decode_namespace(value: Value) -> Result<Namespace, CborError> {
    match value {
        Value::Integer(n) => Ok(Namespace::Nickname(n as u64)),
        Value::Text(s) => Ok(Namespace::Text(s)),
        other => Err(CborError::new(format!(
            "namespace must be an integer or text, found {other:?}"
        ))),
    }
}

fn decode_name(value: Value) -> Result<Name, CborError> {
    match value {
        Value::Bytes(b) => {
            if is_printable(&b) {
                String::from_utf8(b)
                    .map(Name::Text)
                    .map_err(|e| CborError::new(format!("name is not valid UTF-8: {e}")))
            } else {
                Ok(Name::Bytes(b))
            }
        }
        Value::Text(s) => Ok(Name::Text(s)),
        other => Err(CborError::new(format!(
            "name must be bytes or text, found {other:?}"
        ))),
    }
}

fn decode_bytes(value: Value) -> Result<Vec<u8>, CborError> {
    match value {
        Value::Bytes(b) => Ok(b),
        other => Err(CborError::new(format!("expected bytes, found {other:?}"))),
    }
}

fn decode_literal_value(type_enum: StructType, value: Value) -> Result<Literal, CborError> {
    match (type_enum, value) {
        (StructType::Bool, Value::Bool(b)) => Ok(Literal::Bool(b)),
        (StructType::Str, Value::Text(s)) => Ok(Literal::Text(s)),
        (StructType::Bstr, Value::Bytes(b)) => Ok(Literal::Bytes(b)),
        (StructType::Real32, Value::Float(f)) | (StructType::Real64, Value::Float(f)) => {
            Ok(Literal::Float(f))
        }
        (t, Value::Integer(i)) if t.numeric_limit().is_some() => Ok(Literal::Int(i)),
        (t, other) => Err(CborError::new(format!(
            "literal value {other:?} does not match declared type {t:?}"
        ))),
    }
}

fn decode_tnvc(cur: &mut Cursor) -> Result<Vec<Param>, CborError> {
    let flags = cur.read_byte()?;
    let count = if flags != 0 {
        decode_uint(cur.read_value()?)? as usize
    } else {
        0
    };

    let mut type_enums = Vec::with_capacity(count);
    if flags & TNVC_TYPE != 0 {
        for _ in 0..count {
            let marker = cur.read_byte()?;
            type_enums.push(
                StructType::from_i16(marker as i16).map_err(|e| CborError::new(e.to_string()))?,
            );
        }
    }

    if flags & TNVC_NAME != 0 {
        return Err(CborError::new(
            "named TNVC entries are not implemented (reserved by spec.md §4.2)",
        ));
    }

    let mut values = Vec::with_capacity(count);
    if flags & TNVC_VALUE != 0 {
        for marker in &type_enums {
            values.push(decode_tnvc_param(*marker, cur)?);
        }
    }

    if flags & TNVC_MIXED != 0 {
        return Err(CborError::new(
            "mixed TNVC sections are not implemented (reserved by spec.md §4.2)",
        ));
    }

    Ok(values)
}

fn decode_tnvc_param(marker: StructType, cur: &mut Cursor) -> Result<Param, CborError> {
    match marker {
        StructType::Ari => Ok(Param::Ari(decode_ari_framed(cur)?)),
        StructType::Ac => Ok(Param::Ac(Ac {
            items: decode_ac_items(cur)?,
        })),
        StructType::Expr => {
            let type_enum = {
                let v = decode_uint(cur.read_value()?)?;
                StructType::from_i16(v as i16).map_err(|e| CborError::new(e.to_string()))?
            };
            Ok(Param::Expr(Expr {
                type_enum,
                items: decode_ac_items(cur)?,
            }))
        }
        // There is no text-level distinction between AC and TNVC (spec.md
        // §3); a nested TNVC marker decodes into a `Tnvc` with the same
        // item shape as an AC.
        StructType::Tnvc => Ok(Param::Tnvc(Tnvc {
            items: decode_tnvc(cur)?,
        })),
        literal_type => {
            let value = cur.read_value()?;
            let literal = decode_literal_value(literal_type, value)?;
            Ok(Param::Ari(Ari::Literal(LiteralAri {
                type_enum: literal_type,
                value: literal,
            })))
        }
    }
}

fn decode_ac_items(cur: &mut Cursor) -> Result<Vec<Param>, CborError> {
    let header = cur.read_byte()?;
    let count = (header & 0x1F) as usize;
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(Param::Ari(decode_ari_framed(cur)?));
    }
    Ok(items)
}

fn decode_uint(value: Value) -> Result<u64, CborError> {
    match value {
        Value::Integer(i) if i >= 0 => Ok(i as u64),
        other => Err(CborError::new(format!(
            "expected a non-negative integer, found {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ari::StructType;

    #[test]
    fn literal_vast_round_trips_and_matches_known_bytes() {
        let ari = Ari::literal(StructType::Vast, Literal::Int(10));
        let bytes = encode(&ari).unwrap();
        assert_eq!(bytes, vec![0x53, 0x0A]);
        assert_eq!(decode(&bytes).unwrap(), ari);
    }

    #[test]
    fn reference_with_params_round_trips() {
        let ari = Ari::Reference(ReferenceAri {
            ident: Identity {
                namespace: Some(Namespace::Text("namespace".into())),
                type_enum: StructType::Var,
                name: Name::Text("hello".into()),
                issuer: None,
                tag: None,
            },
            params: Some(vec![]),
        });
        let bytes = encode(&ari).unwrap();
        assert_eq!(decode(&bytes).unwrap(), ari);
    }

    #[test]
    fn nested_ac_round_trips() {
        let inner = Ari::Reference(ReferenceAri {
            ident: Identity {
                namespace: Some(Namespace::Text("IANA:amp_agent".into())),
                type_enum: StructType::Rptt,
                name: Name::Text("full_report".into()),
                issuer: None,
                tag: None,
            },
            params: None,
        });
        let ari = Ari::Reference(ReferenceAri {
            ident: Identity {
                namespace: Some(Namespace::Text("IANA:amp_agent".into())),
                type_enum: StructType::Ctrl,
                name: Name::Text("gen_rpts".into()),
                issuer: None,
                tag: None,
            },
            params: Some(vec![
                Param::Ac(Ac {
                    items: vec![Param::Ari(inner)],
                }),
                Param::Ac(Ac { items: vec![] }),
            ]),
        });
        let bytes = encode(&ari).unwrap();
        assert_eq!(decode(&bytes).unwrap(), ari);
    }

    #[test]
    fn ac_item_count_over_limit_is_rejected() {
        let items: Vec<Param> = (0..40)
            .map(|i| {
                Param::Ari(Ari::literal(StructType::Vast, Literal::Int(i)))
            })
            .collect();
        let ari = Ari::Reference(ReferenceAri {
            ident: Identity {
                namespace: None,
                type_enum: StructType::Var,
                name: Name::Text("x".into()),
                issuer: None,
                tag: None,
            },
            params: Some(vec![Param::Ac(Ac { items })]),
        });
        assert!(encode(&ari).is_err());
    }

    #[test]
    fn bstr_literal_param_is_bare_in_tnvc() {
        let ari = Ari::Reference(ReferenceAri {
            ident: Identity {
                namespace: None,
                type_enum: StructType::Var,
                name: Name::Text("x".into()),
                issuer: None,
                tag: None,
            },
            params: Some(vec![Param::Ari(Ari::literal(
                StructType::Bstr,
                Literal::Bytes(vec![1, 2, 3]),
            ))]),
        });
        let bytes = encode(&ari).unwrap();
        assert_eq!(decode(&bytes).unwrap(), ari);
    }
}
