use std::fmt;

/// The closed enumeration of ADM data types (ADM draft §5.4), keyed by
/// integer. Object categories, primitive categories, and compound
/// categories share one numeric space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i16)]
pub enum StructType {
    Mdat = -1,
    Unk = -25,

    Const = 0,
    Ctrl = 1,
    Edd = 2,
    Lit = 3,
    Mac = 4,
    Oper = 5,
    Rptt = 7,
    Sbr = 8,
    Tblt = 10,
    Tbr = 11,
    Var = 12,

    Bool = 16,
    Byte = 17,
    Str = 18,
    Int = 19,
    Uint = 20,
    Vast = 21,
    Uvast = 22,
    Real32 = 23,
    Real64 = 24,

    Tv = 32,
    Ts = 33,
    Tnvc = 35,
    Ari = 36,
    Ac = 37,
    Expr = 38,
    Bstr = 39,
}

/// Error returned when an integer or name does not map to a known
/// [`StructType`] variant.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownStructType(pub String);

impl fmt::Display for UnknownStructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown StructType: {}", self.0)
    }
}

impl std::error::Error for UnknownStructType {}

impl StructType {
    /// All variants, in declaration order, used for name-table lookups and
    /// the lexer's `TYPENAME`/`TYPEDOT` pattern alternation.
    pub const ALL: &'static [StructType] = &[
        StructType::Mdat,
        StructType::Unk,
        StructType::Const,
        StructType::Ctrl,
        StructType::Edd,
        StructType::Lit,
        StructType::Mac,
        StructType::Oper,
        StructType::Rptt,
        StructType::Sbr,
        StructType::Tblt,
        StructType::Tbr,
        StructType::Var,
        StructType::Bool,
        StructType::Byte,
        StructType::Str,
        StructType::Int,
        StructType::Uint,
        StructType::Vast,
        StructType::Uvast,
        StructType::Real32,
        StructType::Real64,
        StructType::Tv,
        StructType::Ts,
        StructType::Tnvc,
        StructType::Ari,
        StructType::Ac,
        StructType::Expr,
        StructType::Bstr,
    ];

    /// The canonical uppercase name used in text ARIs and JSON type fields.
    pub fn name(self) -> &'static str {
        match self {
            StructType::Mdat => "MDAT",
            StructType::Unk => "UNK",
            StructType::Const => "CONST",
            StructType::Ctrl => "CTRL",
            StructType::Edd => "EDD",
            StructType::Lit => "LIT",
            StructType::Mac => "MAC",
            StructType::Oper => "OPER",
            StructType::Rptt => "RPTT",
            StructType::Sbr => "SBR",
            StructType::Tblt => "TBLT",
            StructType::Tbr => "TBR",
            StructType::Var => "VAR",
            StructType::Bool => "BOOL",
            StructType::Byte => "BYTE",
            StructType::Str => "STR",
            StructType::Int => "INT",
            StructType::Uint => "UINT",
            StructType::Vast => "VAST",
            StructType::Uvast => "UVAST",
            StructType::Real32 => "REAL32",
            StructType::Real64 => "REAL64",
            StructType::Tv => "TV",
            StructType::Ts => "TS",
            StructType::Tnvc => "TNVC",
            StructType::Ari => "ARI",
            StructType::Ac => "AC",
            StructType::Expr => "EXPR",
            StructType::Bstr => "BSTR",
        }
    }

    /// Case-insensitive lookup by name, as used for JSON `type` strings and
    /// the text lexer's `TYPENAME`/`TYPEDOT` tokens.
    pub fn from_name(name: &str) -> Result<Self, UnknownStructType> {
        let upper = name.to_ascii_uppercase();
        StructType::ALL
            .iter()
            .copied()
            .find(|t| t.name() == upper)
            .ok_or(UnknownStructType(name.to_string()))
    }

    pub fn from_i16(value: i16) -> Result<Self, UnknownStructType> {
        StructType::ALL
            .iter()
            .copied()
            .find(|t| *t as i16 == value)
            .ok_or(UnknownStructType(value.to_string()))
    }
}

impl fmt::Display for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
