use crate::error::LoadResult;
use crate::frame::DataFrame;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Label given to a materialized unnamed index.
pub const DEFAULT_INDEX_LABEL: &str = "index";

/// Settings shared by the encoder and the schema describer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Materialize the frame's index as a leading column.
    pub preserve_index: bool,
    /// Label for an unnamed index. Defaults to [`DEFAULT_INDEX_LABEL`].
    pub index_label: Option<String>,
}

impl LoadOptions {
    pub fn new(preserve_index: bool) -> Self {
        Self {
            preserve_index,
            ..Self::default()
        }
    }

    pub fn index_label(&self) -> &str {
        self.index_label.as_deref().unwrap_or(DEFAULT_INDEX_LABEL)
    }

    /// The frame as it should be loaded: with the index reset when requested.
    pub(crate) fn prepare<'a>(&self, frame: &'a DataFrame) -> LoadResult<Cow<'a, DataFrame>> {
        Ok(if self.preserve_index {
            Cow::Owned(frame.reset_index(self.index_label())?)
        } else {
            Cow::Borrowed(frame)
        })
    }
}
