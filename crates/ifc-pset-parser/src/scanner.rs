// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity segmentation, the entity registry and header extraction
//!
//! The scanner walks the text between `DATA;` and its `ENDSEC;` once,
//! yielding one [`RawEntity`] per `#N=TYPE(...);` statement. Statement ends
//! are located with a quote-aware scan, so a string parameter containing
//! the literal `);` cannot mis-segment the entity.

use ifc_pset_model::{EntityId, HeaderInfo};
use memchr::memchr;
use rustc_hash::FxHashMap;

/// One `#N=TYPE(...);` statement captured from the DATA section
///
/// Immutable once captured; `raw_params` is the untouched text between the
/// entity's outer parentheses.
#[derive(Clone, Debug, PartialEq)]
pub struct RawEntity {
    pub id: EntityId,
    /// Type name, uppercased
    pub entity_type: String,
    pub raw_params: String,
}

/// Map from entity ID to its raw entity, read-only after construction
///
/// Iteration follows file order. A file that redefines an ID keeps the
/// first occurrence's position with the last value (tolerated, not an
/// error).
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: FxHashMap<u32, RawEntity>,
    order: Vec<u32>,
}

impl EntityRegistry {
    /// Build the registry with a single pass over the content
    pub fn build(content: &str) -> Self {
        let mut registry = Self::default();
        let mut scanner = EntityScanner::new(content);

        while let Some(entity) = scanner.next_entity() {
            let id = entity.id.0;
            if registry.entities.insert(id, entity).is_none() {
                registry.order.push(id);
            }
        }

        log::debug!("entity registry built: {} entities", registry.len());
        registry
    }

    /// Look up an entity by ID
    pub fn get(&self, id: EntityId) -> Option<&RawEntity> {
        self.entities.get(&id.0)
    }

    /// Whether the ID is present
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id.0)
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in file order
    pub fn iter(&self) -> impl Iterator<Item = &RawEntity> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Entities of the given (uppercase) type, in file order
    pub fn iter_by_type<'a>(&'a self, entity_type: &'a str) -> impl Iterator<Item = &'a RawEntity> {
        self.iter().filter(move |e| e.entity_type == entity_type)
    }
}

/// Single-pass scanner over the DATA section
///
/// Finite, not restartable. A file without a `DATA;` marker yields zero
/// entities and the rest of the pipeline proceeds as if parsing an empty
/// file.
pub struct EntityScanner<'a> {
    content: &'a str,
    pos: usize,
    end: usize,
    section_start: usize,
}

impl<'a> EntityScanner<'a> {
    /// Create a scanner bounded to the first `DATA;`..`ENDSEC;` region
    pub fn new(content: &'a str) -> Self {
        let (start, end) = match content.find("DATA;") {
            Some(data) => {
                let start = data + "DATA;".len();
                let end = content[start..]
                    .find("ENDSEC;")
                    .map(|off| start + off)
                    .unwrap_or(content.len());
                (start, end)
            }
            None => (0, 0),
        };

        Self {
            content,
            pos: start,
            end,
            section_start: start,
        }
    }

    /// Scan to the next `#N=TYPE(...);` statement
    pub fn next_entity(&mut self) -> Option<RawEntity> {
        let bytes = self.content.as_bytes();

        while self.pos < self.end {
            // Fast scan for the next candidate entity start
            let hash_pos = memchr(b'#', &bytes[self.pos..self.end])?;
            self.pos += hash_pos;

            // Entity definitions start a statement; references inside
            // parameter lists do not.
            let at_statement_start = self.pos == self.section_start
                || matches!(bytes[self.pos - 1], b'\n' | b'\r' | b';');

            if !at_statement_start {
                self.pos += 1;
                continue;
            }

            // Entity ID digits
            self.pos += 1;
            let id_start = self.pos;
            while self.pos < self.end && bytes[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
            if self.pos == id_start {
                continue;
            }
            let id: u32 = match self.content[id_start..self.pos].parse() {
                Ok(id) => id,
                Err(_) => continue,
            };

            self.skip_blanks();
            if self.pos >= self.end || bytes[self.pos] != b'=' {
                continue;
            }
            self.pos += 1;
            self.skip_blanks();

            // Type name
            let type_start = self.pos;
            while self.pos < self.end
                && (bytes[self.pos].is_ascii_alphanumeric() || bytes[self.pos] == b'_')
            {
                self.pos += 1;
            }
            if self.pos == type_start {
                continue;
            }
            let entity_type = self.content[type_start..self.pos].to_ascii_uppercase();

            let body_start = self.pos;
            let term = self.find_statement_end()?;
            let raw_params = extract_param_body(&self.content[body_start..term - 1]);

            return Some(RawEntity {
                id: EntityId(id),
                entity_type,
                raw_params,
            });
        }

        None
    }

    fn skip_blanks(&mut self) {
        let bytes = self.content.as_bytes();
        while self.pos < self.end && matches!(bytes[self.pos], b' ' | b'\t') {
            self.pos += 1;
        }
    }

    /// Find the terminating `;`, skipping single-quoted strings
    ///
    /// Returns the position just past the `;`. STEP escapes a quote inside
    /// a string as `''`, which the toggle handles naturally.
    fn find_statement_end(&mut self) -> Option<usize> {
        let bytes = self.content.as_bytes();
        let mut in_string = false;

        while self.pos < self.end {
            match bytes[self.pos] {
                b'\'' => in_string = !in_string,
                b';' if !in_string => {
                    self.pos += 1;
                    return Some(self.pos);
                }
                _ => {}
            }
            self.pos += 1;
        }

        None
    }
}

/// Slice the text between the first `(` and the last `)` of a statement body
fn extract_param_body(body: &str) -> String {
    let open = match body.find('(') {
        Some(i) => i,
        None => return String::new(),
    };
    let close = match body.rfind(')') {
        Some(i) if i > open => i,
        _ => return String::new(),
    };
    body[open + 1..close].trim().to_string()
}

/// Extract FILE_DESCRIPTION, FILE_NAME and FILE_SCHEMA from the header
///
/// Works on the region between `HEADER;` and its `ENDSEC;`; a missing
/// header section leaves every field absent, which is normal for partial
/// input, not an error.
pub fn parse_header(content: &str) -> HeaderInfo {
    let mut info = HeaderInfo::default();

    let header = match content.find("HEADER;") {
        Some(start) => {
            let start = start + "HEADER;".len();
            let end = content[start..]
                .find("ENDSEC;")
                .map(|off| start + off)
                .unwrap_or(content.len());
            &content[start..end]
        }
        None => return info,
    };

    // FILE_DESCRIPTION: the parenthesized body, verbatim
    if let Some(at) = header.find("FILE_DESCRIPTION") {
        let after = &header[at + "FILE_DESCRIPTION".len()..];
        if let Some(body) = matched_paren_body(after) {
            info.file_description = Some(body.to_string());
        }
    }

    // FILE_NAME: the first quoted string
    if let Some(at) = header.find("FILE_NAME") {
        info.file_name = first_quoted(&header[at + "FILE_NAME".len()..]);
    }

    // FILE_SCHEMA: the first quoted string inside the nested parens
    if let Some(at) = header.find("FILE_SCHEMA") {
        let after = &header[at + "FILE_SCHEMA".len()..];
        if let Some(open) = after.find("((") {
            info.file_schema = first_quoted(&after[open..]);
        }
    }

    info
}

/// Capture the body of the first parenthesized group in `s`
///
/// Quote-aware and depth-matched, so `;` or `)` inside string parameters
/// never cut the capture short.
fn matched_paren_body(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let open = memchr(b'(', bytes)?;

    let mut depth = 0i32;
    let mut in_string = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'\'' => in_string = !in_string,
            b'(' if !in_string => depth += 1,
            b')' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[open + 1..i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// First single-quoted string in `s`
fn first_quoted(s: &str) -> Option<String> {
    let open = s.find('\'')?;
    let rest = &s[open + 1..];
    let close = rest.find('\'')?;
    Some(rest[..close].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_IFC: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('test.ifc','2024-01-01T00:00:00',('Author'),('Org'),'Preprocessor','App','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCPROJECT('guid',$,'Project',$,$,$,$,$,#2);
#2=IFCUNITASSIGNMENT((#3));
#3=IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.);
#4=IFCPROPERTYSET('g',$,'Pset_A',$,(#5));
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn test_scanner_finds_all_entities() {
        let mut scanner = EntityScanner::new(TEST_IFC);
        let mut found = Vec::new();
        while let Some(entity) = scanner.next_entity() {
            found.push((entity.id.0, entity.entity_type.clone()));
        }

        assert_eq!(found.len(), 4);
        assert_eq!(found[0], (1, "IFCPROJECT".to_string()));
        assert_eq!(found[3], (4, "IFCPROPERTYSET".to_string()));
    }

    #[test]
    fn test_scanner_captures_raw_params() {
        let mut scanner = EntityScanner::new(TEST_IFC);
        let first = scanner.next_entity().unwrap();
        assert_eq!(first.raw_params, "'guid',$,'Project',$,$,$,$,$,#2");

        let second = scanner.next_entity().unwrap();
        assert_eq!(second.raw_params, "(#3)");
    }

    #[test]
    fn test_scanner_survives_close_paren_semicolon_in_string() {
        let content = "DATA;\n#1=IFCPROPERTYSINGLEVALUE('weird);name',$,'v',$);\n#2=IFCMATERIAL('Steel',$,$);\nENDSEC;\n";
        let mut scanner = EntityScanner::new(content);

        let first = scanner.next_entity().unwrap();
        assert_eq!(first.id, EntityId(1));
        assert_eq!(first.raw_params, "'weird);name',$,'v',$");

        let second = scanner.next_entity().unwrap();
        assert_eq!(second.id, EntityId(2));
    }

    #[test]
    fn test_scanner_stops_at_endsec() {
        let content = "DATA;\n#1=IFCMATERIAL('A',$,$);\nENDSEC;\n#2=IFCMATERIAL('B',$,$);\n";
        let mut scanner = EntityScanner::new(content);

        assert_eq!(scanner.next_entity().unwrap().id, EntityId(1));
        assert!(scanner.next_entity().is_none());
    }

    #[test]
    fn test_scanner_no_data_section_yields_nothing() {
        let mut scanner = EntityScanner::new("not a step file at all");
        assert!(scanner.next_entity().is_none());
    }

    #[test]
    fn test_scanner_multiline_entity() {
        let content = "DATA;\n#7=IFCPROPERTYSET('g',$,\n'Pset_Split',$,\n(#8,#9));\nENDSEC;\n";
        let mut scanner = EntityScanner::new(content);
        let entity = scanner.next_entity().unwrap();
        assert_eq!(entity.id, EntityId(7));
        assert_eq!(entity.raw_params, "'g',$,\n'Pset_Split',$,\n(#8,#9)");
    }

    #[test]
    fn test_registry_file_order_and_lookup() {
        let registry = EntityRegistry::build(TEST_IFC);
        assert_eq!(registry.len(), 4);
        assert!(registry.contains(EntityId(3)));

        let ids: Vec<u32> = registry.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);

        let psets: Vec<&RawEntity> = registry.iter_by_type("IFCPROPERTYSET").collect();
        assert_eq!(psets.len(), 1);
        assert_eq!(psets[0].id, EntityId(4));
    }

    #[test]
    fn test_registry_redefined_id_last_wins() {
        let content = "DATA;\n#1=IFCMATERIAL('First',$,$);\n#1=IFCMATERIAL('Second',$,$);\nENDSEC;\n";
        let registry = EntityRegistry::build(content);

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get(EntityId(1)).unwrap().raw_params,
            "'Second',$,$"
        );
    }

    #[test]
    fn test_parse_header_all_fields() {
        let info = parse_header(TEST_IFC);
        assert_eq!(
            info.file_description.as_deref(),
            Some("('ViewDefinition [CoordinationView]'),'2;1'")
        );
        assert_eq!(info.file_name.as_deref(), Some("test.ifc"));
        assert_eq!(info.file_schema.as_deref(), Some("IFC4"));
    }

    #[test]
    fn test_parse_header_missing_section() {
        let info = parse_header("DATA;\n#1=IFCMATERIAL('A',$,$);\nENDSEC;\n");
        assert_eq!(info, HeaderInfo::default());
    }

    #[test]
    fn test_parse_header_partial_fields() {
        let content = "HEADER;\nFILE_SCHEMA(('IFC2X3'));\nENDSEC;\nDATA;\nENDSEC;\n";
        let info = parse_header(content);
        assert_eq!(info.file_schema.as_deref(), Some("IFC2X3"));
        assert!(info.file_name.is_none());
        assert!(info.file_description.is_none());
    }
}
