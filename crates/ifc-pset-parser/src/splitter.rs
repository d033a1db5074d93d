// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parameter list splitting and entity reference extraction
//!
//! STEP parameter lists nest: `'G',$,'Name',$,(#10652,#10653)`. Splitting
//! happens on top-level commas only, tracking a quote flag and a paren-depth
//! counter in a single character scan.

use ifc_pset_model::EntityId;
use memchr::memchr;

/// Split a raw parameter list on top-level commas
///
/// Commas inside single-quoted strings or nested parentheses never split.
/// Parameters are trimmed but otherwise untouched (quotes and parens kept).
/// Unterminated quotes or unbalanced parens at end of input flush whatever
/// accumulated as the final parameter.
pub fn split_parameters(raw: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut depth: i32 = 0;

    for c in raw.chars() {
        match c {
            '\'' => in_quotes = !in_quotes,
            '(' if !in_quotes => depth += 1,
            ')' if !in_quotes => depth -= 1,
            ',' if !in_quotes && depth == 0 => {
                params.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }

    let tail = current.trim();
    if !tail.is_empty() {
        params.push(tail.to_string());
    }

    params
}

/// Extract every `#N` reference from a text fragment, in order of appearance
///
/// Duplicates are kept; callers union them into a set where needed.
pub fn extract_references(text: &str) -> Vec<EntityId> {
    let bytes = text.as_bytes();
    let mut refs = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let hash = match memchr(b'#', &bytes[pos..]) {
            Some(offset) => pos + offset,
            None => break,
        };

        let mut end = hash + 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }

        if end > hash + 1 {
            if let Ok(id) = text[hash + 1..end].parse::<u32>() {
                refs.push(EntityId(id));
            }
        }

        pos = end.max(hash + 1);
    }

    refs
}
