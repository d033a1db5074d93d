// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Final document assembly
//!
//! Pure aggregation: nothing here transforms data, it only attaches the
//! pipeline outputs to the document shape and derives the summary block.

use ifc_pset_model::{Document, HeaderInfo, OrderedMap, PropertySet, ReferencedObject};

/// Assemble the final document from the pipeline outputs
pub fn build_document(
    header: HeaderInfo,
    property_sets: OrderedMap<PropertySet>,
    referenced_objects: OrderedMap<ReferencedObject>,
) -> Document {
    let doc = Document::new(header, property_sets, referenced_objects);
    log::debug!(
        "targeted parse complete: {} property sets, {} referenced objects",
        doc.summary.property_sets_count,
        doc.summary.referenced_objects_count
    );
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_pset_model::EntityId;

    #[test]
    fn test_build_document_derives_summary() {
        let mut psets = OrderedMap::new();
        psets.insert("Pset_One", PropertySet::new(EntityId(1)));
        psets.insert("Pset_Two", PropertySet::new(EntityId(2)));

        let doc = build_document(HeaderInfo::default(), psets, OrderedMap::new());

        assert!(!doc.error);
        assert_eq!(doc.parsing_mode, "targeted");
        assert_eq!(doc.summary.property_sets_count, 2);
        assert_eq!(doc.summary.referenced_objects_count, 0);
        assert_eq!(doc.summary.property_sets_names, vec!["Pset_One", "Pset_Two"]);
    }

    #[test]
    fn test_build_document_applies_file_info_defaults() {
        let doc = build_document(HeaderInfo::default(), OrderedMap::new(), OrderedMap::new());
        assert_eq!(doc.file_info.name, "unknown.ifc");
        assert_eq!(doc.file_info.version, "Unknown");
        assert_eq!(doc.file_info.schema, "Unknown");
    }
}
