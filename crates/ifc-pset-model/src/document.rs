// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The final parse result document

use crate::{HeaderInfo, OrderedMap, PropertySet, ReferencedObject};
use serde::{Deserialize, Serialize};

/// Parsing mode reported in every document
pub const PARSING_MODE: &str = "targeted";

/// Default file name when the header carries none
pub const UNKNOWN_FILE_NAME: &str = "unknown.ifc";

/// Default version/schema when the header carries none
pub const UNKNOWN_VERSION: &str = "Unknown";

/// Version/schema reported in the error envelope
pub const ERROR_VERSION: &str = "Error parsing";

/// Convenience block duplicating the header fields with defaults applied
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub version: String,
    pub schema: String,
}

impl FileInfo {
    /// Build from a header, falling back to the documented defaults
    pub fn from_header(header: &HeaderInfo) -> Self {
        Self {
            name: header
                .file_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_FILE_NAME.to_string()),
            version: header
                .file_schema
                .clone()
                .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
            schema: header
                .file_schema
                .clone()
                .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
        }
    }
}

/// Counts and key list over the extracted data
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub property_sets_count: usize,
    pub referenced_objects_count: usize,
    /// Property set keys in insertion order
    pub property_sets_names: Vec<String>,
}

/// The complete parse result
///
/// This is the only value the entry points ever return. A failed parse is
/// the same shape with `error` set and the data maps empty, so callers
/// always inspect a document, never catch an error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Set only on the error envelope
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub error: bool,
    /// Failure description, only on the error envelope
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    pub parsing_mode: String,
    pub header: HeaderInfo,
    pub file_info: FileInfo,
    pub property_sets: OrderedMap<PropertySet>,
    pub referenced_objects: OrderedMap<ReferencedObject>,
    pub summary: Summary,
}

impl Document {
    /// Assemble a successful document from the pipeline outputs
    pub fn new(
        header: HeaderInfo,
        property_sets: OrderedMap<PropertySet>,
        referenced_objects: OrderedMap<ReferencedObject>,
    ) -> Self {
        let file_info = FileInfo::from_header(&header);
        let summary = Summary {
            property_sets_count: property_sets.len(),
            referenced_objects_count: referenced_objects.len(),
            property_sets_names: property_sets.keys().map(str::to_string).collect(),
        };

        Self {
            error: false,
            message: None,
            parsing_mode: PARSING_MODE.to_string(),
            header,
            file_info,
            property_sets,
            referenced_objects,
            summary,
        }
    }

    /// Build the error envelope
    ///
    /// Keeps whatever header fields were recovered before the failure and
    /// reports `Error parsing` for version/schema.
    pub fn error_envelope(message: impl Into<String>, header: HeaderInfo) -> Self {
        let file_info = FileInfo {
            name: header
                .file_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_FILE_NAME.to_string()),
            version: ERROR_VERSION.to_string(),
            schema: ERROR_VERSION.to_string(),
        };

        Self {
            error: true,
            message: Some(message.into()),
            parsing_mode: PARSING_MODE.to_string(),
            header,
            file_info,
            property_sets: OrderedMap::new(),
            referenced_objects: OrderedMap::new(),
            summary: Summary::default(),
        }
    }

    /// Serialize to a compact JSON string
    pub fn to_json(&self) -> String {
        // Serialization of this shape cannot fail; the fallback is unreachable.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Serialize to a pretty-printed JSON string
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
