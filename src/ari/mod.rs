//! The ARI value model (C1).
//!
//! An [`Ari`] is either a literal value or a reference to a managed object in
//! an Application Data Model (ADM). This module defines the tagged variant
//! type shared by the text codec ([`crate::text`]), the CBOR codec
//! ([`crate::cbor`]), and the nickname resolver ([`crate::nickname`]).

mod struct_type;

pub use struct_type::StructType;

use std::fmt;

/// Numeric range of a `StructType`'s literal-numeric domain, used to
/// range-check [`Literal::Int`]/[`Literal::Float`] values against the
/// declared `type_enum`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericLimit {
    pub min: i128,
    pub max: i128,
}

impl StructType {
    /// Inclusive numeric range for the integer-valued literal types.
    /// `None` for types with no integer domain (e.g. `BOOL`, `STR`, floats).
    pub fn numeric_limit(self) -> Option<NumericLimit> {
        use StructType::*;
        let (min, max) = match self {
            Byte => (0, 2i128.pow(8) - 1),
            Int => (-(2i128.pow(31)), 2i128.pow(31) - 1),
            Uint => (0, 2i128.pow(32) - 1),
            Vast => (-(2i128.pow(63)), 2i128.pow(63) - 1),
            Uvast => (0, 2i128.pow(64) - 1),
            Tv | Ts => (0, 2i128.pow(64) - 1),
            Unk => (0, 0),
            _ => return None,
        };
        Some(NumericLimit { min, max })
    }

    /// Types whose text form is unambiguous without a `TYPE.` label.
    pub fn is_literal(self) -> bool {
        use StructType::*;
        matches!(
            self,
            Bool | Byte | Int | Uint | Vast | Uvast | Real32 | Real64 | Str | Bstr | Tv | Ts | Unk
        )
    }

    /// Types whose text encoding is ambiguous unless labelled with `TYPE.`.
    pub fn is_label_required(self) -> bool {
        use StructType::*;
        matches!(
            self,
            Byte | Int | Uint | Vast | Uvast | Real32 | Real64 | Tv | Ts | Unk
        )
    }
}

/// A literal scalar value carried by a [`LiteralAri`].
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i128),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

/// A literal value in the form of an ARI: `{ type_enum, value }`.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralAri {
    pub type_enum: StructType,
    pub value: Literal,
}

/// Error returned by [`LiteralAri::check_type`] when the value's kind or
/// range does not match its declared `type_enum`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMismatch(pub String);

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TypeMismatch {}

impl LiteralAri {
    /// Validate `value`'s kind and, for numeric types, its range against
    /// `type_enum`. Mirrors `ace.ari.LiteralARI.check_type`.
    pub fn check_type(&self) -> Result<(), TypeMismatch> {
        use StructType::*;
        match (self.type_enum, &self.value) {
            (Bool, Literal::Bool(_)) => Ok(()),
            (Bool, _) => Err(TypeMismatch(
                "literal boolean type without boolean value".into(),
            )),
            (Str, Literal::Text(_)) => Ok(()),
            (Str, _) => Err(TypeMismatch(
                "literal text string with non-text value".into(),
            )),
            (Bstr, Literal::Bytes(_)) => Ok(()),
            (Bstr, _) => Err(TypeMismatch(
                "literal byte string with non-bytes value".into(),
            )),
            (Real32, Literal::Float(_)) | (Real64, Literal::Float(_)) => Ok(()),
            (Real32, _) | (Real64, _) => Err(TypeMismatch(
                "literal floating type without floating value".into(),
            )),
            (t, Literal::Int(v)) if t.numeric_limit().is_some() => {
                let lim = t.numeric_limit().unwrap();
                if *v < lim.min || *v > lim.max {
                    Err(TypeMismatch(format!(
                        "literal integer value {v} outside of valid range for {t:?}"
                    )))
                } else {
                    Ok(())
                }
            }
            (t, _) if t.numeric_limit().is_some() => Err(TypeMismatch(format!(
                "literal integer type {t:?} without integer value"
            ))),
            _ => Ok(()),
        }
    }
}

/// Identity of a reference ARI: `{ namespace, type_enum, name, issuer, tag }`.
///
/// `namespace`/`name` are text in **symbolic** form (e.g.
/// `namespace = Some(Namespace::Text("IANA:AMP.AGENT".into()))`) and become
/// integer/byte-string in **nickname** form after [`crate::nickname`]
/// conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub namespace: Option<Namespace>,
    pub type_enum: StructType,
    pub name: Name,
    pub issuer: Option<Vec<u8>>,
    pub tag: Option<Vec<u8>>,
}

/// The `namespace` component of an [`Identity`]: text before nickname
/// conversion, a packed integer afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Namespace {
    Text(String),
    Nickname(u64),
}

/// The `name` component of an [`Identity`]: text before nickname conversion,
/// a CBOR-encoded unsigned integer (as raw bytes) afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Name {
    Text(String),
    Bytes(Vec<u8>),
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Name::Text(s) => write!(f, "{s}"),
            Name::Bytes(b) => write!(f, "h'{}'", crate::diag::to_hex_lower(b)),
        }
    }
}

/// A reference ARI: `{ ident, params }`. `params = None` is distinct from
/// `params = Some(vec![])` — both are preserved across codecs.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceAri {
    pub ident: Identity,
    pub params: Option<Vec<Param>>,
}

/// The full ARI sum type: a literal value or a reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Ari {
    Literal(LiteralAri),
    Reference(ReferenceAri),
}

/// One parameter carried by a [`ReferenceAri`].
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Ari(Ari),
    Ac(Ac),
    Expr(Expr),
    Tnvc(Tnvc),
}

/// An ARI Collection: an ordered sequence of ARIs, ACs, or EXPRs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ac {
    pub items: Vec<Param>,
}

/// A postfix expression: a result type plus an ordered sequence of items.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub type_enum: StructType,
    pub items: Vec<Param>,
}

/// A Type-Name-Value Collection. Indistinguishable from an [`Ac`] in text
/// form; the nickname resolver promotes an [`Ac`] parameter to a `Tnvc` when
/// the referenced object's parmspec declares that parameter's type as
/// `TNVC`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tnvc {
    pub items: Vec<Param>,
}

impl Ari {
    pub fn reference(ident: Identity, params: Option<Vec<Param>>) -> Self {
        Ari::Reference(ReferenceAri { ident, params })
    }

    pub fn literal(type_enum: StructType, value: Literal) -> Self {
        Ari::Literal(LiteralAri { type_enum, value })
    }
}
