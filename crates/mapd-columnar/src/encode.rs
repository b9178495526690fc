#![forbid(unsafe_code)]

//! Columnar payload encoding.
//!
//! Each source column becomes one dense buffer plus a null mask. Missing rows hold the wire
//! type's sentinel; every integer-family type (including the normalized DATE, TIME and
//! TIMESTAMP) is widened to `i64` because the payload has a single integer buffer.

use crate::bitmap::NullMask;
use crate::error::LoadResult;
use crate::frame::{DataFrame, Series, Value};
use crate::options::LoadOptions;
use crate::resolve::resolve_wire_type;
use crate::temporal::{self, date_to_seconds, datetime_to_seconds, time_to_seconds};
use crate::types::{Sentinel, Slot, WireType};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;

/// Typed buffer of one encoded column. Exactly one slot is populated per column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
    #[serde(rename = "int_col")]
    Int(Vec<i64>),
    #[serde(rename = "real_col")]
    Real(Vec<f64>),
    #[serde(rename = "str_col")]
    Str(Vec<String>),
}

impl ColumnData {
    pub fn slot(&self) -> Slot {
        match self {
            ColumnData::Int(_) => Slot::Int,
            ColumnData::Real(_) => Slot::Real,
            ColumnData::Str(_) => Slot::Str,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int(v) => v.len(),
            ColumnData::Real(v) => v.len(),
            ColumnData::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_ints(&self) -> Option<&[i64]> {
        match self {
            ColumnData::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_reals(&self) -> Option<&[f64]> {
        match self {
            ColumnData::Real(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_strs(&self) -> Option<&[String]> {
        match self {
            ColumnData::Str(v) => Some(v),
            _ => None,
        }
    }
}

/// One column of the load payload.
///
/// `data.len() == nulls.len()` always holds. Columns without missing values share a single
/// all-valid mask.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedColumn {
    pub name: String,
    pub wire_type: WireType,
    pub data: ColumnData,
    pub nulls: Arc<NullMask>,
}

impl EncodedColumn {
    pub fn len(&self) -> usize {
        self.nulls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nulls.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ColumnarEncoder {
    options: LoadOptions,
}

impl ColumnarEncoder {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Encode every column of `frame`, in order.
    pub fn encode(&self, frame: &DataFrame) -> LoadResult<Vec<EncodedColumn>> {
        let frame = self.options.prepare(frame)?;
        let mut all_valid: Option<Arc<NullMask>> = None;
        let mut out = Vec::with_capacity(frame.column_count());

        for series in frame.columns() {
            let wire_type = resolve_wire_type(series)?;
            log::debug!(
                "encoding column {} ({}) as {wire_type} into {}",
                series.name(),
                series.dtype(),
                wire_type.slot().as_str()
            );

            let nulls = if series.has_missing() {
                Arc::new(series.values().iter().map(Value::is_missing).collect())
            } else {
                all_valid
                    .get_or_insert_with(|| Arc::new(NullMask::all_valid(frame.row_count())))
                    .clone()
            };

            out.push(EncodedColumn {
                name: series.name().to_owned(),
                wire_type,
                data: encode_values(series, wire_type),
                nulls,
            });
        }

        Ok(out)
    }
}

/// Encode `frame` into per-column payloads, optionally materializing its index first.
pub fn build_input_columnar(
    frame: &DataFrame,
    preserve_index: bool,
) -> LoadResult<Vec<EncodedColumn>> {
    ColumnarEncoder::new(LoadOptions::new(preserve_index)).encode(frame)
}

fn encode_values(series: &Series, wire_type: WireType) -> ColumnData {
    let values = if wire_type.is_temporal() {
        temporal::normalize(series.values(), wire_type)
    } else {
        Cow::Borrowed(series.values())
    };
    let mut mismatched = 0usize;

    let data = match wire_type.null_sentinel() {
        Sentinel::Int(sentinel) => ColumnData::Int(
            values
                .iter()
                .map(|v| {
                    if v.is_missing() {
                        return sentinel;
                    }
                    int_value(v).unwrap_or_else(|| {
                        mismatched += 1;
                        sentinel
                    })
                })
                .collect(),
        ),
        Sentinel::Real(sentinel) => ColumnData::Real(
            values
                .iter()
                .map(|v| {
                    if v.is_missing() {
                        return sentinel;
                    }
                    real_value(v).unwrap_or_else(|| {
                        mismatched += 1;
                        sentinel
                    })
                })
                .collect(),
        ),
        Sentinel::Str(sentinel) => ColumnData::Str(
            values
                .iter()
                .map(|v| match v {
                    v if v.is_missing() => sentinel.to_owned(),
                    Value::Str(s) => s.to_string(),
                    other => {
                        mismatched += 1;
                        other.to_string()
                    }
                })
                .collect(),
        ),
    };

    if mismatched > 0 {
        log::warn!(
            "column {}: {mismatched} value(s) do not match the sampled type {wire_type} and were coerced",
            series.name()
        );
    }
    data
}

pub(crate) fn int_value(value: &Value) -> Option<i64> {
    match value {
        Value::Int(v) => Some(*v),
        Value::Bool(v) => Some(i64::from(*v)),
        Value::Float(v) if v.is_finite() => Some(*v as i64),
        Value::Date(d) => Some(date_to_seconds(*d)),
        Value::Time(t) => Some(time_to_seconds(*t)),
        Value::DateTime(dt) => Some(datetime_to_seconds(*dt)),
        Value::Str(s) => s.trim().parse().ok(),
        Value::Float(_) | Value::Null => None,
    }
}

fn real_value(value: &Value) -> Option<f64> {
    match value {
        Value::Float(v) => Some(*v),
        Value::Int(v) => Some(*v as f64),
        Value::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
        Value::Str(s) => s.trim().parse().ok(),
        _ => None,
    }
}
