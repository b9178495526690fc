#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Element types understood by the ingestion protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WireType {
    Bool,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Str,
    Date,
    Time,
    Timestamp,
}

/// Which buffer of the column payload a wire type's values live in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    #[serde(rename = "int_col")]
    Int,
    #[serde(rename = "real_col")]
    Real,
    #[serde(rename = "str_col")]
    Str,
}

impl Slot {
    pub const fn as_str(self) -> &'static str {
        match self {
            Slot::Int => "int_col",
            Slot::Real => "real_col",
            Slot::Str => "str_col",
        }
    }
}

/// The value written in place of a missing entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sentinel {
    Int(i64),
    Real(f64),
    Str(&'static str),
}

impl WireType {
    pub const ALL: [WireType; 11] = [
        WireType::Bool,
        WireType::TinyInt,
        WireType::SmallInt,
        WireType::Int,
        WireType::BigInt,
        WireType::Float,
        WireType::Double,
        WireType::Str,
        WireType::Date,
        WireType::Time,
        WireType::Timestamp,
    ];

    /// Protocol name, as used in create-table row descriptors.
    pub const fn as_str(self) -> &'static str {
        match self {
            WireType::Bool => "BOOL",
            WireType::TinyInt => "TINYINT",
            WireType::SmallInt => "SMALLINT",
            WireType::Int => "INT",
            WireType::BigInt => "BIGINT",
            WireType::Float => "FLOAT",
            WireType::Double => "DOUBLE",
            WireType::Str => "STR",
            WireType::Date => "DATE",
            WireType::Time => "TIME",
            WireType::Timestamp => "TIMESTAMP",
        }
    }

    /// The server's null representation for this type.
    ///
    /// Integer widths reserve their minimum value. Floats reserve the smallest positive
    /// normal value of their width (the `f32` one is widened losslessly to `f64`).
    pub fn null_sentinel(self) -> Sentinel {
        match self {
            WireType::Bool | WireType::TinyInt => Sentinel::Int(i8::MIN as i64),
            WireType::SmallInt => Sentinel::Int(i16::MIN as i64),
            WireType::Int => Sentinel::Int(i32::MIN as i64),
            WireType::BigInt | WireType::Date | WireType::Time | WireType::Timestamp => {
                Sentinel::Int(i64::MIN)
            }
            WireType::Float => Sentinel::Real(f32::MIN_POSITIVE as f64),
            WireType::Double => Sentinel::Real(f64::MIN_POSITIVE),
            WireType::Str => Sentinel::Str(""),
        }
    }

    pub const fn slot(self) -> Slot {
        match self {
            WireType::Bool
            | WireType::TinyInt
            | WireType::SmallInt
            | WireType::Int
            | WireType::BigInt
            | WireType::Date
            | WireType::Time
            | WireType::Timestamp => Slot::Int,
            WireType::Float | WireType::Double => Slot::Real,
            WireType::Str => Slot::Str,
        }
    }

    /// Types whose values are normalized to integer seconds before encoding.
    pub const fn is_temporal(self) -> bool {
        matches!(self, WireType::Date | WireType::Time | WireType::Timestamp)
    }

    /// Types stored as 8-byte integers on the wire regardless of logical width.
    pub const fn is_integer_family(self) -> bool {
        matches!(self.slot(), Slot::Int)
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown wire type: {0}")]
pub struct ParseWireTypeError(pub String);

impl FromStr for WireType {
    type Err = ParseWireTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let found = match upper.as_str() {
            "BOOLEAN" => Some(WireType::Bool),
            "INTEGER" => Some(WireType::Int),
            "VARCHAR" | "TEXT" => Some(WireType::Str),
            other => WireType::ALL.into_iter().find(|t| t.as_str() == other),
        };
        found.ok_or_else(|| ParseWireTypeError(s.to_owned()))
    }
}
