//! Source dtype to wire type resolution.
//!
//! Resolution runs in two phases. Primitive dtypes map directly by kind and width. Object
//! columns have no useful declared type, so the first non-missing element is sampled and its
//! runtime type decides for the whole column. Later elements are not checked against the
//! sample: a genuinely mixed object column resolves from its first element and the encoder
//! coerces the rest (see [`crate::encode`]).

use crate::error::{LoadError, LoadResult};
use crate::frame::{DType, Series, Value};
use crate::types::WireType;

/// Wire type for one column.
pub fn resolve_wire_type(series: &Series) -> LoadResult<WireType> {
    match series.dtype() {
        DType::Object => wire_type_from_object(series),
        dtype => wire_type_from_dtype(dtype).ok_or_else(|| LoadError::UnhandledType {
            column: series.name().to_owned(),
            found: dtype.to_string(),
        }),
    }
}

/// Direct mapping for dtypes whose declared type is unambiguous.
pub fn wire_type_from_dtype(dtype: DType) -> Option<WireType> {
    let itemsize = dtype.itemsize()?;
    if dtype == DType::Bool {
        Some(WireType::Bool)
    } else if dtype.is_integer() {
        Some(match itemsize {
            0..=1 => WireType::TinyInt,
            2 => WireType::SmallInt,
            4 => WireType::Int,
            _ => WireType::BigInt,
        })
    } else if dtype.is_float() {
        Some(if itemsize <= 4 {
            WireType::Float
        } else {
            WireType::Double
        })
    } else if dtype == DType::DateTime64 {
        Some(WireType::Timestamp)
    } else {
        None
    }
}

fn wire_type_from_object(series: &Series) -> LoadResult<WireType> {
    let Some(sample) = series.first_valid() else {
        return Err(LoadError::EmptyColumn {
            column: series.name().to_owned(),
        });
    };

    match sample {
        Value::Str(_) => Ok(WireType::Str),
        // A datetime is also a date.
        Value::Date(_) | Value::DateTime(_) => Ok(WireType::Date),
        Value::Time(_) => Ok(WireType::Time),
        // A bool is an int subclass in the source data model.
        Value::Int(_) | Value::Bool(_) => Ok(WireType::Int),
        other => Err(LoadError::UnhandledType {
            column: series.name().to_owned(),
            found: format!("{} ({})", series.dtype(), other.type_name()),
        }),
    }
}
