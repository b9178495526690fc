use crate::error::{LoadError, LoadResult};
use crate::frame::DataFrame;
use crate::options::LoadOptions;
use crate::resolve::resolve_wire_type;
use crate::types::WireType;
use serde::{Deserialize, Serialize};

/// Data handed to a load or create-table call.
#[derive(Clone, Copy, Debug)]
pub enum TableSource<'a> {
    Frame(&'a DataFrame),
    /// An already-serialized Arrow IPC stream.
    ArrowStream(&'a [u8]),
}

impl TableSource<'_> {
    pub fn shape_name(&self) -> &'static str {
        match self {
            TableSource::Frame(_) => "DataFrame",
            TableSource::ArrowStream(_) => "Arrow IPC stream",
        }
    }
}

impl<'a> From<&'a DataFrame> for TableSource<'a> {
    fn from(frame: &'a DataFrame) -> Self {
        TableSource::Frame(frame)
    }
}

impl<'a> From<&'a [u8]> for TableSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        TableSource::ArrowStream(bytes)
    }
}

/// One column of a create-table row descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub name: String,
    pub wire_type: WireType,
}

/// Row descriptor for `source`, one entry per column in table order.
pub fn build_row_desc<'a>(
    source: impl Into<TableSource<'a>>,
    preserve_index: bool,
) -> LoadResult<Vec<SchemaEntry>> {
    describe_with(source.into(), &LoadOptions::new(preserve_index))
}

/// Row descriptor for `source` with explicit [`LoadOptions`].
///
/// Only frames can be described; an Arrow stream fails before any column is looked at.
pub fn describe_with(
    source: TableSource<'_>,
    options: &LoadOptions,
) -> LoadResult<Vec<SchemaEntry>> {
    let TableSource::Frame(frame) = source else {
        return Err(LoadError::UnsupportedTableShape {
            shape: source.shape_name(),
        });
    };

    options
        .prepare(frame)?
        .columns()
        .iter()
        .map(|series| {
            Ok(SchemaEntry {
                name: series.name().to_owned(),
                wire_type: resolve_wire_type(series)?,
            })
        })
        .collect()
}
