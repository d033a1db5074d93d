// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC string decoding and parameter cleaning
//!
//! STEP files encode non-ASCII characters as `\X2\<hex>\X0\` runs. The
//! decoder replaces each run with the character whose code point equals the
//! hex value; anything that does not parse is left verbatim. Both functions
//! here are pure and total.

/// Decode `\X2\<hex>\X0\` runs into native characters
///
/// A run whose hex digits do not parse, or whose value is not a valid
/// Unicode scalar, is copied through unchanged.
pub fn decode_ifc_string(input: &str) -> String {
    const OPEN: &str = "\\X2\\";
    const CLOSE: &str = "\\X0\\";

    if !input.contains(OPEN) {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];

        match after_open.find(CLOSE) {
            Some(end) => {
                let hex = &after_open[..end];
                match decode_code_point(hex) {
                    Some(c) => out.push(c),
                    // Not decodable: keep the whole run as-is
                    None => {
                        out.push_str(OPEN);
                        out.push_str(hex);
                        out.push_str(CLOSE);
                    }
                }
                rest = &after_open[end + CLOSE.len()..];
            }
            // Unterminated run: flush the tail verbatim
            None => {
                out.push_str(OPEN);
                out.push_str(after_open);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_code_point(hex: &str) -> Option<char> {
    if hex.is_empty() {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    char::from_u32(value)
}

/// Clean a single raw parameter
///
/// `$` (IFC's unset token) and empty parameters become `None`; one layer of
/// single-quote delimiters is stripped; the result is decoded. This is the
/// only place where null-like tokens turn into absent values.
pub fn clean_parameter(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "$" {
        return None;
    }

    let unquoted = if trimmed.len() >= 2 && trimmed.starts_with('\'') && trimmed.ends_with('\'') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };

    let decoded = decode_ifc_string(unquoted);
    if decoded.is_empty() {
        None
    } else {
        Some(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_string_unchanged() {
        assert_eq!(decode_ifc_string("Pset_WallCommon"), "Pset_WallCommon");
        assert_eq!(decode_ifc_string(""), "");
    }

    #[test]
    fn test_decode_unicode_run() {
        assert_eq!(
            decode_ifc_string("pant\\X2\\00F3\\X0\\grafo"),
            "pantógrafo"
        );
    }

    #[test]
    fn test_decode_multiple_runs() {
        assert_eq!(
            decode_ifc_string("\\X2\\00E9\\X0\\l\\X2\\00E8\\X0\\ve"),
            "élève"
        );
    }

    #[test]
    fn test_decode_invalid_hex_left_verbatim() {
        let input = "a\\X2\\ZZZZ\\X0\\b";
        assert_eq!(decode_ifc_string(input), input);
    }

    #[test]
    fn test_decode_invalid_scalar_left_verbatim() {
        // Surrogate range is not a valid char
        let input = "x\\X2\\D800\\X0\\y";
        assert_eq!(decode_ifc_string(input), input);
    }

    #[test]
    fn test_decode_unterminated_run_left_verbatim() {
        let input = "name\\X2\\00F3";
        assert_eq!(decode_ifc_string(input), input);
    }

    #[test]
    fn test_clean_unset_and_empty() {
        assert_eq!(clean_parameter("$"), None);
        assert_eq!(clean_parameter("  $  "), None);
        assert_eq!(clean_parameter(""), None);
        assert_eq!(clean_parameter("   "), None);
        assert_eq!(clean_parameter("''"), None);
    }

    #[test]
    fn test_clean_strips_one_quote_layer() {
        assert_eq!(clean_parameter("'Graphite'"), Some("Graphite".to_string()));
        assert_eq!(
            clean_parameter("''nested''"),
            Some("'nested'".to_string())
        );
        assert_eq!(clean_parameter("0.75"), Some("0.75".to_string()));
    }

    #[test]
    fn test_clean_decodes_after_unquoting() {
        assert_eq!(
            clean_parameter("'pant\\X2\\00F3\\X0\\grafo'"),
            Some("pantógrafo".to_string())
        );
    }
}
