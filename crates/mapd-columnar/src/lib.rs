//! Columnar load payloads for MapD / OmniSci.
//!
//! This crate focuses on:
//! - Resolving each column of an in-memory [`DataFrame`] to a protocol [`WireType`].
//! - Encoding columns into dense typed buffers plus null masks ([`build_input_columnar`]).
//! - Describing a frame as a create-table row descriptor ([`build_row_desc`]).
//! - Optionally (feature `arrow`), writing the frame as an Arrow IPC stream.

#![forbid(unsafe_code)]

#[cfg(feature = "arrow")]
pub mod arrow;
mod bitmap;
mod encode;
mod error;
mod frame;
mod options;
mod resolve;
mod schema;
pub mod temporal;
mod types;

pub use crate::bitmap::NullMask;
pub use crate::encode::{build_input_columnar, ColumnData, ColumnarEncoder, EncodedColumn};
pub use crate::error::{LoadError, LoadResult};
pub use crate::frame::{DType, DataFrame, Index, Series, Value};
pub use crate::options::{LoadOptions, DEFAULT_INDEX_LABEL};
pub use crate::resolve::{resolve_wire_type, wire_type_from_dtype};
pub use crate::schema::{build_row_desc, describe_with, SchemaEntry, TableSource};
pub use crate::types::{ParseWireTypeError, Sentinel, Slot, WireType};
