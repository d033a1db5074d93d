// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Pset Model - Shared types for targeted IFC PropertySet extraction
//!
//! This crate defines the serializable output document produced by the
//! targeted STEP/IFC parser: the file header, the extracted property sets,
//! the referenced objects (materials, units, quantities) and the summary
//! block. It carries no parsing logic; the `ifc-pset-parser` crate fills
//! these structures in.
//!
//! # Example
//!
//! ```ignore
//! use ifc_pset_model::{Document, Property};
//!
//! let doc: Document = get_document();
//! for (name, pset) in doc.property_sets.iter() {
//!     println!("{}: {} properties", name, pset.has_properties.len());
//! }
//! ```

pub mod document;
pub mod error;
pub mod properties;
pub mod types;

// Re-export all public types
pub use document::*;
pub use error::*;
pub use properties::*;
pub use types::*;
