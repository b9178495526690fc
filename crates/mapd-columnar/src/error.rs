use crate::frame::DType;

pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The declared dtype, or the sampled element of an object column, has no wire type.
    #[error("Unhandled type {found} in column {column}")]
    UnhandledType { column: String, found: String },

    /// An object column has no non-missing value to sample.
    #[error("Not any valid values to infer the type of column {column}")]
    EmptyColumn { column: String },

    #[error(
        "Create table is not supported for type {shape}. Use a DataFrame, or perform the create separately"
    )]
    UnsupportedTableShape { shape: &'static str },

    #[error("column {column} has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Materializing the index would add a second column with an existing name.
    #[error("cannot insert {column}, already exists")]
    DuplicateColumn { column: String },

    #[error("value {value} does not fit dtype {dtype} of column {column}")]
    DtypeMismatch {
        column: String,
        dtype: DType,
        value: String,
    },

    #[cfg(feature = "arrow")]
    #[error("timestamp in column {column} is out of range for nanosecond precision")]
    TimestampOutOfRange { column: String },

    #[cfg(feature = "arrow")]
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),
}
