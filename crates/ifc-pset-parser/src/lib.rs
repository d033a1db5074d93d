// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Pset Parser - Targeted STEP/IFC PropertySet extraction
//!
//! This crate parses ISO-10303-21 (STEP) files, the physical encoding used
//! by IFC/BIM models, and extracts exactly three things:
//!
//! - the file header metadata (`FILE_DESCRIPTION`, `FILE_NAME`, `FILE_SCHEMA`),
//! - every `IFCPROPERTYSET` entity with its typed property values,
//! - the allow-listed objects those property values reference
//!   (materials, units, quantities).
//!
//! Everything else in the file is ignored. The result is a single
//! JSON-serializable [`Document`].
//!
//! # Tolerance
//!
//! Malformed input never fails the call: missing sections parse as empty,
//! dangling `#N` references are skipped, and entities with too few
//! parameters produce absent fields. The entry points always return a
//! [`Document`]; only a failure of the whole call (an I/O error, or a panic
//! escaping the pipeline) produces the same shape with `error: true`.
//!
//! # Example
//!
//! ```
//! use ifc_pset_parser::parse_content;
//!
//! let content = "\
//! HEADER;
//! FILE_SCHEMA(('IFC4'));
//! ENDSEC;
//! DATA;
//! #1=IFCPROPERTYSET('g',$,'Pset_Demo',$,(#2));
//! #2=IFCPROPERTYSINGLEVALUE('Material',$,'Graphite',$);
//! ENDSEC;
//! ";
//!
//! let doc = parse_content(content);
//! assert_eq!(doc.file_info.schema, "IFC4");
//! assert_eq!(doc.summary.property_sets_count, 1);
//! ```

pub mod document;
pub mod psets;
pub mod resolver;
pub mod scanner;
pub mod splitter;
pub mod strings;

pub use ifc_pset_model::{
    Document, HeaderInfo, ParseError, Property, PropertySet, ReferencedObject,
};
pub use scanner::{EntityRegistry, EntityScanner, RawEntity};

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// Parse IFC content into a targeted document
///
/// Stateless; independent calls may run concurrently. Never panics and
/// never returns an error value: structurally odd input degrades to empty
/// sections, and a panic escaping the pipeline (no code path is expected
/// to take one) is converted into the error envelope, keeping whatever
/// header fields were already extracted.
pub fn parse_content(content: &str) -> Document {
    // The header scan is total; extract it first so the envelope can
    // report recovered fields even if the rest of the pipeline fails.
    let header = scanner::parse_header(content);

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let registry = EntityRegistry::build(content);
        let property_sets = psets::extract_property_sets(&registry);
        let referenced_objects = resolver::resolve_references(&property_sets, &registry);
        document::build_document(header.clone(), property_sets, referenced_objects)
    }));

    match result {
        Ok(doc) => doc,
        Err(_) => {
            log::error!("targeted parse failed with an internal panic");
            Document::error_envelope(
                ParseError::internal("unexpected failure in parse pipeline").to_string(),
                header,
            )
        }
    }
}

/// Parse an IFC file from disk
///
/// The file is read as UTF-8 with invalid byte sequences replaced, never
/// rejected. An I/O failure produces the error envelope instead of an
/// error value.
pub fn parse_file(path: impl AsRef<Path>) -> Document {
    match read_lossy(path.as_ref()) {
        Ok(content) => parse_content(&content),
        Err(err) => {
            log::error!("failed to read {}: {}", path.as_ref().display(), err);
            Document::error_envelope(err.to_string(), HeaderInfo::default())
        }
    }
}

fn read_lossy(path: &Path) -> Result<String, ParseError> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_pset_model::Property;
    use std::io::Write;

    const MINIMAL_IFC: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition[DesignTransferView]'),'2;1');
FILE_NAME('Escovas.ifc','2025-05-19T17:27:26+01:00',(''),(''),'IfcOpenShell 0.8.1','Bonsai 0.8.1','Nobody');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#10650=IFCPROPERTYSET('2tvYLV7_93sQAW9wY7_ii1',$,'Pset_Test',$,(#10652,#10653));
#10652=IFCPROPERTYSINGLEVALUE('Material',$,'Graphite',$);
#10653=IFCPROPERTYSINGLEVALUE('Conductivity',$,0.75,$);
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn test_end_to_end_minimal_fixture() {
        let doc = parse_content(MINIMAL_IFC);

        assert!(!doc.error);
        assert_eq!(doc.file_info.schema, "IFC4");
        assert_eq!(doc.file_info.name, "Escovas.ifc");
        assert_eq!(doc.summary.property_sets_count, 1);

        let pset = doc.property_sets.get("Pset_Test").unwrap();
        assert_eq!(pset.has_properties.len(), 2);

        let names: Vec<&str> = pset
            .has_properties
            .iter()
            .filter_map(Property::name)
            .collect();
        assert_eq!(names, vec!["Material", "Conductivity"]);
    }

    #[test]
    fn test_dangling_reference_tolerated() {
        let content = "DATA;\n#1=IFCPROPERTYSET('g',$,'Pset_D',$,(#2,#99999));\n#2=IFCPROPERTYSINGLEVALUE('A',$,'1',$);\nENDSEC;\n";
        let doc = parse_content(content);

        assert!(!doc.error);
        let pset = doc.property_sets.get("Pset_D").unwrap();
        assert_eq!(pset.has_properties.len(), 1);
    }

    #[test]
    fn test_allow_list_blocks_building_elements() {
        let content = "DATA;\n#1=IFCPROPERTYSET('g',$,'Pset_A',$,(#2));\n#2=IFCPROPERTYSINGLEVALUE('Host',$,#3,$);\n#3=IFCBUILDINGELEMENT('x',$,'Wall',$,$,$,$,$);\nENDSEC;\n";
        let doc = parse_content(content);

        assert!(doc.referenced_objects.is_empty());
        assert_eq!(doc.summary.referenced_objects_count, 0);
    }

    #[test]
    fn test_idempotent_byte_identical_output() {
        let first = parse_content(MINIMAL_IFC).to_json();
        let second = parse_content(MINIMAL_IFC).to_json();
        assert_eq!(first, second);
    }

    #[test]
    fn test_garbage_input_degrades_gracefully() {
        let doc = parse_content("this is not a STEP file at all");

        assert!(!doc.error);
        assert!(doc.property_sets.is_empty());
        assert!(doc.referenced_objects.is_empty());
        assert_eq!(doc.file_info.name, "unknown.ifc");
        assert_eq!(doc.file_info.schema, "Unknown");
    }

    #[test]
    fn test_empty_input() {
        let doc = parse_content("");
        assert!(!doc.error);
        assert_eq!(doc.summary.property_sets_count, 0);
    }

    #[test]
    fn test_header_only_input() {
        let content = "HEADER;\nFILE_SCHEMA(('IFC2X3'));\nENDSEC;\n";
        let doc = parse_content(content);

        assert!(!doc.error);
        assert_eq!(doc.file_info.schema, "IFC2X3");
        assert!(doc.property_sets.is_empty());
    }

    #[test]
    fn test_json_shape_matches_contract() {
        let value = serde_json::to_value(parse_content(MINIMAL_IFC)).unwrap();

        assert_eq!(value["parsing_mode"], "targeted");
        assert_eq!(value["header"]["FILE_SCHEMA"], "IFC4");
        assert_eq!(value["file_info"]["version"], "IFC4");
        assert_eq!(
            value["property_sets"]["Pset_Test"]["Entity"],
            "IFCPROPERTYSET"
        );
        assert_eq!(
            value["property_sets"]["Pset_Test"]["HasProperties"][0]["Type"],
            "IFCPROPERTYSINGLEVALUE"
        );
        assert_eq!(value["summary"]["property_sets_names"][0], "Pset_Test");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_parse_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL_IFC.as_bytes()).unwrap();

        let doc = parse_file(file.path());
        assert!(!doc.error);
        assert_eq!(doc.summary.property_sets_count, 1);
    }

    #[test]
    fn test_parse_file_invalid_utf8_is_replaced() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"DATA;\n#1=IFCPROPERTYSET('g',$,'Pset_\xFF',$,());\nENDSEC;\n")
            .unwrap();

        let doc = parse_file(file.path());
        assert!(!doc.error);
        assert_eq!(doc.summary.property_sets_count, 1);
    }

    #[test]
    fn test_parse_file_missing_path_returns_envelope() {
        let doc = parse_file("/nonexistent/definitely/missing.ifc");

        assert!(doc.error);
        assert!(doc.message.is_some());
        assert_eq!(doc.file_info.version, "Error parsing");
        assert!(doc.property_sets.is_empty());
        assert_eq!(doc.summary.property_sets_count, 0);
    }

    #[test]
    fn test_unicode_escapes_decoded_in_values() {
        let content = "DATA;\n#1=IFCPROPERTYSET('g',$,'Pset_U',$,(#2));\n#2=IFCPROPERTYSINGLEVALUE('Nome',$,'pant\\X2\\00F3\\X0\\grafo',$);\nENDSEC;\n";
        let doc = parse_content(content);

        let pset = doc.property_sets.get("Pset_U").unwrap();
        match &pset.has_properties[0] {
            Property::Single(p) => {
                assert_eq!(p.nominal_value.as_deref(), Some("pantógrafo"));
            }
            other => panic!("expected single value, got {:?}", other),
        }
    }
}
