//! Arrow IPC load payloads.
//!
//! The server's Arrow ingest path takes a single record batch written as an IPC stream. A
//! [`DataFrame`] is converted column by column; a source that is already an IPC stream is
//! passed through untouched.

use crate::encode::int_value;
use crate::error::{LoadError, LoadResult};
use crate::frame::{DType, DataFrame, Series, Value};
use crate::resolve::resolve_wire_type;
use crate::schema::TableSource;
use crate::types::WireType;
use arrow_array::{
    ArrayRef, BooleanArray, Date32Array, Float32Array, Float64Array, Int16Array, Int32Array,
    Int64Array, NullArray, RecordBatch, RecordBatchOptions, StringArray, Time64MicrosecondArray,
    TimestampNanosecondArray, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow_ipc::writer::StreamWriter;
use arrow_schema::{Field, Schema};
use bytes::Bytes;
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use std::sync::Arc;

/// Column name for an unnamed index in Arrow payloads.
pub const ARROW_INDEX_LABEL: &str = "__index_level_0__";

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_FROM_CE: i32 = 719_163;

/// Serialize `source` as an Arrow IPC stream.
pub fn serialize_arrow_payload<'a>(
    source: impl Into<TableSource<'a>>,
    preserve_index: bool,
) -> LoadResult<Bytes> {
    match source.into() {
        TableSource::ArrowStream(bytes) => Ok(Bytes::copy_from_slice(bytes)),
        TableSource::Frame(frame) => write_stream(&frame_to_record_batch(frame, preserve_index)?),
    }
}

/// Convert `frame` into a record batch. With `preserve_index`, the index becomes the last
/// column.
///
/// `Int8` columns are widened to `Int16`; the server has no 8-bit Arrow ingest type.
pub fn frame_to_record_batch(frame: &DataFrame, preserve_index: bool) -> LoadResult<RecordBatch> {
    let index = if preserve_index {
        let label = frame.index_name().unwrap_or(ARROW_INDEX_LABEL);
        if frame.column(label).is_some() {
            return Err(LoadError::DuplicateColumn {
                column: label.to_owned(),
            });
        }
        Some(frame.index_series(label))
    } else {
        None
    };

    let mut fields = Vec::with_capacity(frame.column_count() + 1);
    let mut arrays = Vec::with_capacity(frame.column_count() + 1);
    for series in frame.columns().iter().chain(index.as_ref()) {
        let array = series_to_array(series)?;
        fields.push(Field::new(series.name(), array.data_type().clone(), true));
        arrays.push(array);
    }

    let options = RecordBatchOptions::new().with_row_count(Some(frame.row_count()));
    Ok(RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        arrays,
        &options,
    )?)
}

fn write_stream(batch: &RecordBatch) -> LoadResult<Bytes> {
    let mut writer = StreamWriter::try_new(Vec::new(), &batch.schema())?;
    writer.write(batch)?;
    writer.finish()?;
    Ok(Bytes::from(writer.into_inner()?))
}

fn ints(values: &[Value]) -> impl Iterator<Item = Option<i64>> + '_ {
    values.iter().map(|v| match v {
        Value::Int(i) => Some(*i),
        _ => None,
    })
}

fn floats(values: &[Value]) -> impl Iterator<Item = Option<f64>> + '_ {
    values.iter().map(|v| match v {
        Value::Float(f) if !f.is_nan() => Some(*f),
        _ => None,
    })
}

fn series_to_array(series: &Series) -> LoadResult<ArrayRef> {
    let values = series.values();
    // Dtype constructors guarantee integer values fit their declared width.
    let array: ArrayRef = match series.dtype() {
        DType::Bool => Arc::new(
            values
                .iter()
                .map(|v| match v {
                    Value::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect::<BooleanArray>(),
        ),
        DType::Int8 | DType::Int16 => Arc::new(
            ints(values)
                .map(|v| v.map(|v| v as i16))
                .collect::<Int16Array>(),
        ),
        DType::Int32 => Arc::new(
            ints(values)
                .map(|v| v.map(|v| v as i32))
                .collect::<Int32Array>(),
        ),
        DType::Int64 => Arc::new(ints(values).collect::<Int64Array>()),
        DType::UInt8 => Arc::new(
            ints(values)
                .map(|v| v.map(|v| v as u8))
                .collect::<UInt8Array>(),
        ),
        DType::UInt16 => Arc::new(
            ints(values)
                .map(|v| v.map(|v| v as u16))
                .collect::<UInt16Array>(),
        ),
        DType::UInt32 => Arc::new(
            ints(values)
                .map(|v| v.map(|v| v as u32))
                .collect::<UInt32Array>(),
        ),
        DType::UInt64 => Arc::new(
            ints(values)
                .map(|v| v.map(|v| v as u64))
                .collect::<UInt64Array>(),
        ),
        DType::Float32 => Arc::new(
            floats(values)
                .map(|v| v.map(|v| v as f32))
                .collect::<Float32Array>(),
        ),
        DType::Float64 => Arc::new(floats(values).collect::<Float64Array>()),
        DType::DateTime64 => {
            let nanos = values
                .iter()
                .map(|v| match v {
                    Value::DateTime(dt) => dt
                        .and_utc()
                        .timestamp_nanos_opt()
                        .map(Some)
                        .ok_or_else(|| LoadError::TimestampOutOfRange {
                            column: series.name().to_owned(),
                        }),
                    _ => Ok(None),
                })
                .collect::<LoadResult<Vec<Option<i64>>>>()?;
            Arc::new(TimestampNanosecondArray::from(nanos))
        }
        DType::Object => object_to_array(series)?,
    };
    Ok(array)
}

fn object_to_array(series: &Series) -> LoadResult<ArrayRef> {
    let values = series.values();
    if series.first_valid().is_none() {
        return Ok(Arc::new(NullArray::new(values.len())));
    }

    let array: ArrayRef = match resolve_wire_type(series)? {
        WireType::Str => Arc::new(
            values
                .iter()
                .map(|v| (!v.is_missing()).then(|| v.to_string()))
                .collect::<StringArray>(),
        ),
        WireType::Date => Arc::new(
            values
                .iter()
                .map(|v| match v {
                    Value::Date(d) => Some(days_since_epoch(*d)),
                    Value::DateTime(dt) => Some(days_since_epoch(dt.date())),
                    _ => None,
                })
                .collect::<Date32Array>(),
        ),
        WireType::Time => Arc::new(
            values
                .iter()
                .map(|v| match v {
                    Value::Time(t) => Some(micros_since_midnight(*t)),
                    Value::DateTime(dt) => Some(micros_since_midnight(dt.time())),
                    _ => None,
                })
                .collect::<Time64MicrosecondArray>(),
        ),
        // Same coercion as the columnar encoder; values with no integer reading stay null.
        WireType::Int => Arc::new(
            values
                .iter()
                .map(|v| if v.is_missing() { None } else { int_value(v) })
                .collect::<Int64Array>(),
        ),
        other => {
            return Err(LoadError::UnhandledType {
                column: series.name().to_owned(),
                found: other.to_string(),
            })
        }
    };
    Ok(array)
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_FROM_CE
}

fn micros_since_midnight(time: NaiveTime) -> i64 {
    // Leap seconds report nanosecond() >= 1e9; fold them into the last second.
    let sub_micros = i64::from(time.nanosecond() % 1_000_000_000) / 1_000;
    i64::from(time.num_seconds_from_midnight()) * 1_000_000 + sub_micros
}
