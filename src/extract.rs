use serde::Deserialize;
use serde_json::{Map, Value};

use std::{fs, path::Path};

use crate::files;
use crate::row::Row;

/// What one export file contributed: the rows that could be extracted, and
/// the diagnostic notes produced while extracting them.
///
/// Notes are worded ready for printing; the caller decides when to print
/// them.
#[derive(Debug, Default)]
pub struct Extraction {
    pub rows: Vec<Row>,
    pub notes: Vec<String>,
}

impl Extraction {
    fn from_note(note: String) -> Self {
        Self {
            rows: Vec::new(),
            notes: vec![note],
        }
    }
}

/// Which envelope shape the `data` field was found under; decides the
/// wording of the empty-payload warning.
#[derive(Clone, Copy)]
enum Shape {
    Direct,
    Nested,
}

/// Extracts the data rows from one export file.
///
/// The file may carry its payload directly under a top-level `data` field,
/// or wrapped a second time as a JSON-encoded string under `Value`; both
/// shapes are detected automatically. Extraction never fails: an unreadable
/// or malformed file, and any row that does not fit [`Row`], is reported
/// through [`Extraction::notes`] and contributes nothing, so one bad export
/// cannot spoil the rest of the batch.
pub fn read_rows(path: impl AsRef<Path>) -> Extraction {
    let path = path.as_ref();
    let name = files::display_name(path);
    match fs::read_to_string(path) {
        Ok(text) => parse_export(&text, &name),
        Err(e) => Extraction::from_note(format!("Error processing {name}: {e}")),
    }
}

fn parse_export(text: &str, name: &str) -> Extraction {
    let outer: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => return Extraction::from_note(format!("Error processing {name}: {e}")),
    };
    let Value::Object(outer) = outer else {
        return Extraction::from_note(format!(
            "Error processing {name}: top-level JSON is not an object"
        ));
    };
    // A nested envelope holds the real payload JSON-encoded in "Value"; a
    // "Value" field of any other type means the file is a direct payload.
    if let Some(Value::String(inner)) = outer.get("Value") {
        match serde_json::from_str::<Value>(inner) {
            Ok(Value::Object(inner)) => rows_under(&inner, name, Shape::Nested),
            Ok(_) => Extraction::from_note(format!(
                "Error processing {name}: inner JSON is not an object"
            )),
            Err(_) => {
                Extraction::from_note(format!("Error: Could not parse inner JSON in {name}"))
            }
        }
    } else {
        rows_under(&outer, name, Shape::Direct)
    }
}

fn rows_under(payload: &Map<String, Value>, name: &str, shape: Shape) -> Extraction {
    let items = match payload.get("data") {
        Some(Value::Array(items)) if !items.is_empty() => items,
        Some(Value::Array(_) | Value::Null) | None => {
            return Extraction::from_note(match shape {
                Shape::Nested => format!("Warning: No data rows found in inner JSON of {name}"),
                Shape::Direct => format!("Warning: No data rows found directly in {name}"),
            });
        }
        Some(_) => {
            return Extraction::from_note(format!("Error: Field 'data' is not an array in {name}"))
        }
    };
    let mut extraction = Extraction::default();
    for (index, item) in items.iter().enumerate() {
        match Row::deserialize(item) {
            Ok(row) => extraction.rows.push(row),
            Err(e) => extraction
                .notes
                .push(format!("Error: Invalid row {} in {name}: {e}", index + 1)),
        }
    }
    extraction
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn direct_payload_yields_every_row() {
        let extraction = parse_export(
            indoc! {r#"
                {
                    "data": [
                        {"id": "a1", "sequence": 1, "mat_kbob": "concrete", "gwp_relative": 2.0},
                        {"id": "a2", "sequence": 2, "mat_kbob": "timber", "gwp_relative": 0.5}
                    ]
                }
            "#},
            "export.json",
        );
        assert_eq!(extraction.rows.len(), 2);
        assert!(extraction.notes.is_empty());
        assert_eq!(extraction.rows[0].mat_kbob, "concrete");
    }

    #[test]
    fn nested_payload_unwraps_the_value_string() {
        let extraction = parse_export(
            r#"{"Topic": "lca-data", "Value": "{\"data\":[{\"id\":\"a1\",\"sequence\":1,\"mat_kbob\":\"concrete\",\"gwp_relative\":2.0}]}"}"#,
            "export.json",
        );
        assert_eq!(extraction.rows.len(), 1);
        assert!(extraction.notes.is_empty());
        assert_eq!(extraction.rows[0].id, "a1");
        assert_eq!(extraction.rows[0].sequence, "1");
    }

    #[test]
    fn value_field_must_be_a_string_to_count_as_nested() {
        let extraction = parse_export(
            r#"{"Value": 42, "data": [{"id": "a1", "sequence": 1, "mat_kbob": "concrete"}]}"#,
            "export.json",
        );
        assert_eq!(extraction.rows.len(), 1);
        assert!(extraction.notes.is_empty());
    }

    #[test]
    fn empty_direct_payload_warns() {
        let extraction = parse_export(r#"{"data": []}"#, "export.json");
        assert!(extraction.rows.is_empty());
        assert_eq!(
            extraction.notes,
            vec!["Warning: No data rows found directly in export.json"]
        );
    }

    #[test]
    fn missing_data_field_warns() {
        let extraction = parse_export(r#"{"metadata": {}}"#, "export.json");
        assert!(extraction.rows.is_empty());
        assert_eq!(
            extraction.notes,
            vec!["Warning: No data rows found directly in export.json"]
        );
    }

    #[test]
    fn empty_nested_payload_warns() {
        let extraction = parse_export(r#"{"Value": "{\"data\":[]}"}"#, "export.json");
        assert!(extraction.rows.is_empty());
        assert_eq!(
            extraction.notes,
            vec!["Warning: No data rows found in inner JSON of export.json"]
        );
    }

    #[test]
    fn unparseable_inner_json_is_reported() {
        let extraction = parse_export(r#"{"Value": "{not json"}"#, "export.json");
        assert!(extraction.rows.is_empty());
        assert_eq!(
            extraction.notes,
            vec!["Error: Could not parse inner JSON in export.json"]
        );
    }

    #[test]
    fn non_object_inner_json_is_reported() {
        let extraction = parse_export(r#"{"Value": "[1, 2]"}"#, "export.json");
        assert_eq!(
            extraction.notes,
            vec!["Error processing export.json: inner JSON is not an object"]
        );
    }

    #[test]
    fn unparseable_outer_json_is_reported() {
        let extraction = parse_export("{ not json", "export.json");
        assert!(extraction.rows.is_empty());
        assert_eq!(extraction.notes.len(), 1);
        assert!(extraction.notes[0].starts_with("Error processing export.json:"));
    }

    #[test]
    fn non_object_top_level_is_reported() {
        let extraction = parse_export("[1, 2]", "export.json");
        assert_eq!(
            extraction.notes,
            vec!["Error processing export.json: top-level JSON is not an object"]
        );
    }

    #[test]
    fn data_field_of_the_wrong_type_is_reported() {
        let extraction = parse_export(r#"{"data": {"id": "a1"}}"#, "export.json");
        assert_eq!(
            extraction.notes,
            vec!["Error: Field 'data' is not an array in export.json"]
        );
    }

    #[test]
    fn invalid_rows_are_skipped_and_reported() {
        let extraction = parse_export(
            indoc! {r#"
                {
                    "data": [
                        {"id": "a1", "sequence": 1, "mat_kbob": "concrete", "gwp_relative": 2.0},
                        {"id": "a2", "sequence": 2, "mat_kbob": "timber", "gwp_relative": "broken"},
                        {"id": "a3", "sequence": 3, "mat_kbob": "steel", "gwp_relative": 1.0}
                    ]
                }
            "#},
            "export.json",
        );
        assert_eq!(extraction.rows.len(), 2);
        assert_eq!(extraction.rows[1].id, "a3");
        assert_eq!(extraction.notes.len(), 1);
        assert!(extraction.notes[0].starts_with("Error: Invalid row 2 in export.json:"));
    }

    #[test]
    fn read_rows_extracts_from_a_direct_export_file() {
        let extraction = read_rows("testdata/lca_export_1.json");
        assert_eq!(extraction.rows.len(), 3);
        assert!(extraction.notes.is_empty());
    }

    #[test]
    fn read_rows_extracts_from_a_nested_export_file() {
        let extraction = read_rows("testdata/lca_export_2.json");
        assert_eq!(extraction.rows.len(), 2);
        assert!(extraction.notes.is_empty());
        assert_eq!(extraction.rows[1].mat_kbob, "steel");
    }

    #[test]
    fn read_rows_reports_an_unreadable_file() {
        let extraction = read_rows("testdata/absent.json");
        assert!(extraction.rows.is_empty());
        assert_eq!(extraction.notes.len(), 1);
        assert!(extraction.notes[0].starts_with("Error processing absent.json:"));
    }

    #[test]
    fn read_rows_reports_a_file_that_is_not_json() {
        let extraction = read_rows("testdata/lca_export_bad.json");
        assert!(extraction.rows.is_empty());
        assert!(extraction.notes[0].starts_with("Error processing lca_export_bad.json:"));
    }
}
