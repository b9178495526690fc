//! In-memory source tables.
//!
//! A [`DataFrame`] is an ordered list of named [`Series`] of equal length plus a positional
//! [`Index`]. Each series carries a declared [`DType`]. Primitive dtypes are homogeneous; the
//! [`DType::Object`] dtype holds arbitrary per-element [`Value`]s and is what the resolver
//! has to sample.

use crate::error::{LoadError, LoadResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use std::sync::Arc;

/// Declared element type of a [`Series`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    /// Naive datetimes with nanosecond resolution.
    DateTime64,
    /// Mixed or dynamically typed elements.
    Object,
}

impl DType {
    /// Storage width in bytes. `None` for [`DType::Object`].
    pub fn itemsize(self) -> Option<usize> {
        match self {
            DType::Bool | DType::Int8 | DType::UInt8 => Some(1),
            DType::Int16 | DType::UInt16 => Some(2),
            DType::Int32 | DType::UInt32 | DType::Float32 => Some(4),
            DType::Int64 | DType::UInt64 | DType::Float64 | DType::DateTime64 => Some(8),
            DType::Object => None,
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            DType::Int8
                | DType::Int16
                | DType::Int32
                | DType::Int64
                | DType::UInt8
                | DType::UInt16
                | DType::UInt32
                | DType::UInt64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, DType::Float32 | DType::Float64)
    }

    fn int_range(self) -> Option<(i64, i64)> {
        match self {
            DType::Int8 => Some((i8::MIN.into(), i8::MAX.into())),
            DType::Int16 => Some((i16::MIN.into(), i16::MAX.into())),
            DType::Int32 => Some((i32::MIN.into(), i32::MAX.into())),
            DType::Int64 => Some((i64::MIN, i64::MAX)),
            DType::UInt8 => Some((0, u8::MAX.into())),
            DType::UInt16 => Some((0, u16::MAX.into())),
            DType::UInt32 => Some((0, u32::MAX.into())),
            DType::UInt64 => Some((0, i64::MAX)),
            _ => None,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Bool => "bool",
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt8 => "uint8",
            DType::UInt16 => "uint16",
            DType::UInt32 => "uint32",
            DType::UInt64 => "uint64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::DateTime64 => "datetime64[ns]",
            DType::Object => "object",
        };
        f.write_str(name)
    }
}

/// A single cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl Value {
    /// `Null` and NaN floats both count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::DateTime(_) => "datetime",
        }
    }

    fn fits(&self, dtype: DType) -> bool {
        if self.is_missing() {
            return true;
        }
        match (dtype, self) {
            (DType::Object, _) => true,
            (DType::Bool, Value::Bool(_)) => true,
            (DType::Float32 | DType::Float64, Value::Float(_)) => true,
            (DType::DateTime64, Value::DateTime(_)) => true,
            (dtype, Value::Int(v)) => dtype
                .int_range()
                .is_some_and(|(lo, hi)| (lo..=hi).contains(v)),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(v) => f.write_str(v),
            Value::Date(v) => write!(f, "{v}"),
            Value::Time(v) => write!(f, "{v}"),
            Value::DateTime(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(Arc::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Value::Time(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A named, typed column.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    name: String,
    dtype: DType,
    values: Vec<Value>,
}

macro_rules! int_constructor {
    ($fn_name:ident, $ty:ty, $dtype:expr) => {
        pub fn $fn_name(
            name: impl Into<String>,
            values: impl IntoIterator<Item = Option<$ty>>,
        ) -> Self {
            Self::unchecked(
                name,
                $dtype,
                values
                    .into_iter()
                    .map(|v| v.map(|v| Value::Int(v.into())).unwrap_or(Value::Null))
                    .collect(),
            )
        }
    };
}

impl Series {
    fn unchecked(name: impl Into<String>, dtype: DType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            dtype,
            values,
        }
    }

    /// Build a series from arbitrary values, checking each one against `dtype`.
    pub fn from_values(
        name: impl Into<String>,
        dtype: DType,
        values: Vec<Value>,
    ) -> LoadResult<Self> {
        let name = name.into();
        if let Some(bad) = values.iter().find(|v| !v.fits(dtype)) {
            return Err(LoadError::DtypeMismatch {
                column: name,
                dtype,
                value: format!("{bad:?}"),
            });
        }
        Ok(Self::unchecked(name, dtype, values))
    }

    /// An object column. Any mix of values is accepted.
    pub fn object(name: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Self {
        Self::unchecked(name, DType::Object, values.into_iter().collect())
    }

    /// An object column of strings.
    pub fn from_strs<'a>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<&'a str>>,
    ) -> Self {
        Self::object(name, values.into_iter().map(Value::from))
    }

    pub fn from_bools(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<bool>>,
    ) -> Self {
        Self::unchecked(
            name,
            DType::Bool,
            values.into_iter().map(Value::from).collect(),
        )
    }

    int_constructor!(from_i8, i8, DType::Int8);
    int_constructor!(from_i16, i16, DType::Int16);
    int_constructor!(from_i32, i32, DType::Int32);
    int_constructor!(from_i64, i64, DType::Int64);
    int_constructor!(from_u8, u8, DType::UInt8);
    int_constructor!(from_u16, u16, DType::UInt16);
    int_constructor!(from_u32, u32, DType::UInt32);

    /// `u64` values above `i64::MAX` are rejected.
    pub fn from_u64(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<u64>>,
    ) -> LoadResult<Self> {
        let name = name.into();
        let mut out = Vec::new();
        for v in values {
            out.push(match v {
                Some(v) => Value::Int(i64::try_from(v).map_err(|_| LoadError::DtypeMismatch {
                    column: name.clone(),
                    dtype: DType::UInt64,
                    value: v.to_string(),
                })?),
                None => Value::Null,
            });
        }
        Ok(Self::unchecked(name, DType::UInt64, out))
    }

    pub fn from_f32(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<f32>>,
    ) -> Self {
        Self::unchecked(
            name,
            DType::Float32,
            values
                .into_iter()
                .map(|v| v.map(|v| Value::Float(v.into())).unwrap_or(Value::Null))
                .collect(),
        )
    }

    pub fn from_f64(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<f64>>,
    ) -> Self {
        Self::unchecked(
            name,
            DType::Float64,
            values.into_iter().map(Value::from).collect(),
        )
    }

    pub fn from_datetimes(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<NaiveDateTime>>,
    ) -> Self {
        Self::unchecked(
            name,
            DType::DateTime64,
            values.into_iter().map(Value::from).collect(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn has_missing(&self) -> bool {
        self.values.iter().any(Value::is_missing)
    }

    /// First non-missing value, if any.
    pub fn first_valid(&self) -> Option<&Value> {
        self.values.iter().find(|v| !v.is_missing())
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Row labels of a [`DataFrame`].
#[derive(Clone, Debug, PartialEq)]
pub enum Index {
    /// `start, start + step, ...`
    Range { start: i64, step: i64 },
    /// Explicit labels. The series name is ignored; see [`DataFrame::with_index_name`].
    Labels(Series),
}

impl Default for Index {
    fn default() -> Self {
        Index::Range { start: 0, step: 1 }
    }
}

impl Index {
    fn to_series(&self, name: &str, rows: usize) -> Series {
        match self {
            Index::Range { start, step } => Series::unchecked(
                name,
                DType::Int64,
                (0..rows as i64)
                    .map(|i| Value::Int(start.wrapping_add(i.wrapping_mul(*step))))
                    .collect(),
            ),
            Index::Labels(series) => series.clone().renamed(name),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataFrame {
    columns: Vec<Series>,
    rows: usize,
    index: Index,
    index_name: Option<String>,
}

impl DataFrame {
    /// Build a frame from equal-length columns.
    pub fn new(columns: Vec<Series>) -> LoadResult<Self> {
        let rows = columns.first().map(Series::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
            return Err(LoadError::LengthMismatch {
                column: bad.name.clone(),
                expected: rows,
                actual: bad.len(),
            });
        }
        Ok(Self {
            columns,
            rows,
            index: Index::default(),
            index_name: None,
        })
    }

    pub fn with_index(mut self, index: Index) -> LoadResult<Self> {
        if let Index::Labels(labels) = &index {
            if labels.len() != self.rows {
                return Err(LoadError::LengthMismatch {
                    column: labels.name.clone(),
                    expected: self.rows,
                    actual: labels.len(),
                });
            }
        }
        self.index = index;
        Ok(self)
    }

    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    pub fn columns(&self) -> &[Series] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Series> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    /// Label the materialized index column gets: the index name if set, else `default_label`,
    /// falling back to `level_0` when that label is already taken by a column.
    pub fn index_label(&self, default_label: &str) -> String {
        if let Some(name) = &self.index_name {
            return name.clone();
        }
        if self.column(default_label).is_some() {
            "level_0".to_owned()
        } else {
            default_label.to_owned()
        }
    }

    /// The index as a standalone series named `label`.
    pub fn index_series(&self, label: &str) -> Series {
        self.index.to_series(label, self.rows)
    }

    /// Move the index into a leading column and replace it with a default range index.
    ///
    /// Fails if the chosen label already names a column.
    pub fn reset_index(&self, default_label: &str) -> LoadResult<DataFrame> {
        let label = self.index_label(default_label);
        if self.column(&label).is_some() {
            return Err(LoadError::DuplicateColumn { column: label });
        }
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(self.index_series(&label));
        columns.extend(self.columns.iter().cloned());
        Ok(DataFrame {
            columns,
            rows: self.rows,
            index: Index::default(),
            index_name: None,
        })
    }
}
