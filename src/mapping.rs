//! Partner column mapping onto the standard schema
//!
//! A partner declares which of its raw columns feeds each standard field.
//! [`FieldMapping`] validates that declaration once at load time, and
//! [`ColumnMapping`] resolves it against a source header once per file, so a
//! misconfigured partner fails before any row is transformed.

use crate::error::{PipelineError, Result};
use crate::models::StandardField;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Validated standard field to raw column name mapping
///
/// Covers every standard field exactly once, and no raw column is used by
/// more than one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    raw_columns: [String; 6],
}

impl FieldMapping {
    /// Build a mapping from `(standard_field, raw_column)` entries
    ///
    /// Missing fields, unknown field names, repeated fields, empty column
    /// names and columns shared between fields are configuration errors. All
    /// problems found are reported together.
    pub fn from_entries<I, K, V>(partner: &str, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut slots: [Option<String>; 6] = Default::default();
        let mut problems = Vec::new();

        for (key, value) in entries {
            let (key, value) = (key.as_ref(), value.as_ref());
            let Some(field) = StandardField::from_name(key) else {
                problems.push(format!("unknown standard field '{}'", key));
                continue;
            };

            if value.is_empty() {
                problems.push(format!("field '{}' is mapped to an empty column name", field));
                continue;
            }

            let slot = &mut slots[field.index()];
            if slot.is_some() {
                problems.push(format!("field '{}' is mapped more than once", field));
                continue;
            }
            *slot = Some(value.to_string());
        }

        let missing: Vec<&str> = StandardField::ALL
            .iter()
            .filter(|field| slots[field.index()].is_none())
            .map(|field| field.as_str())
            .collect();
        if !missing.is_empty() {
            problems.push(format!("missing mapping for {}", missing.join(", ")));
        }

        let mut users: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for field in StandardField::ALL {
            if let Some(column) = &slots[field.index()] {
                users.entry(column.as_str()).or_default().push(field.as_str());
            }
        }
        for (column, fields) in users.iter().filter(|(_, fields)| fields.len() > 1) {
            problems.push(format!(
                "column '{}' is mapped to more than one field ({})",
                column,
                fields.join(", ")
            ));
        }

        if !problems.is_empty() {
            return Err(PipelineError::configuration(partner, problems.join("; ")));
        }

        let raw_columns = slots.map(|slot| slot.unwrap_or_default());
        Ok(Self { raw_columns })
    }

    /// Raw column feeding a standard field
    pub fn raw_column(&self, field: StandardField) -> &str {
        &self.raw_columns[field.index()]
    }

    /// `(field, raw_column)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (StandardField, &str)> {
        StandardField::ALL
            .into_iter()
            .map(move |field| (field, self.raw_column(field)))
    }
}

/// A field mapping resolved against one source header
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    /// Source column index per standard field
    indices: [usize; 6],
}

impl ColumnMapping {
    /// Resolve each mapped raw column to its index in `header`
    ///
    /// Header names are matched exactly. Columns the mapping does not
    /// reference are ignored.
    pub fn resolve(partner: &str, mapping: &FieldMapping, header: &[String]) -> Result<Self> {
        let name_to_index: HashMap<&str, usize> = header
            .iter()
            .enumerate()
            .map(|(index, name)| (name.as_str(), index))
            .collect();

        let mut indices = [0usize; 6];
        let mut absent = Vec::new();

        for (field, column) in mapping.iter() {
            match name_to_index.get(column) {
                Some(&index) => indices[field.index()] = index,
                None => absent.push(format!("{} -> '{}'", field, column)),
            }
        }

        if !absent.is_empty() {
            return Err(PipelineError::configuration(
                partner,
                format!(
                    "mapped columns not found in source header: {} (header: {})",
                    absent.join(", "),
                    header.join(", ")
                ),
            ));
        }

        debug!(
            "Resolved column mapping for partner '{}': {} source columns, {} projected",
            partner,
            header.len(),
            indices.len()
        );

        Ok(Self { indices })
    }

    /// Raw cells of one row in schema order
    ///
    /// Rows shorter than the header yield absent cells.
    pub fn project<'a>(&self, row: &'a [Option<String>]) -> [Option<&'a str>; 6] {
        self.indices
            .map(|index| row.get(index).and_then(|cell| cell.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<(&'static str, &'static str)> {
        vec![
            ("external_id", "ID"),
            ("first_name", "Given"),
            ("last_name", "Family"),
            ("dob", "Birth"),
            ("email", "Mail"),
            ("phone", "Tel"),
        ]
    }

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn message(error: PipelineError) -> String {
        match error {
            PipelineError::Configuration { partner, message } => {
                assert_eq!(partner, "acme");
                message
            }
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_complete_mapping() {
        let mapping = FieldMapping::from_entries("acme", entries()).unwrap();
        assert_eq!(mapping.raw_column(StandardField::Dob), "Birth");
        let fields: Vec<StandardField> = mapping.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, StandardField::ALL.to_vec());
    }

    #[test]
    fn test_missing_fields_reported_by_name() {
        let partial: Vec<_> = entries().into_iter().take(4).collect();
        let msg = message(FieldMapping::from_entries("acme", partial).unwrap_err());
        assert!(msg.contains("missing mapping for email, phone"), "{}", msg);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut extra = entries();
        extra.push(("middle_name", "Middle"));
        let msg = message(FieldMapping::from_entries("acme", extra).unwrap_err());
        assert!(msg.contains("unknown standard field 'middle_name'"), "{}", msg);
    }

    #[test]
    fn test_partner_code_is_not_mappable() {
        let mut extra = entries();
        extra.push(("partner_code", "Source"));
        assert!(FieldMapping::from_entries("acme", extra).is_err());
    }

    #[test]
    fn test_shared_raw_column_rejected() {
        let mut shared = entries();
        shared[2] = ("last_name", "Given");
        let msg = message(FieldMapping::from_entries("acme", shared).unwrap_err());
        assert!(msg.contains("column 'Given'"), "{}", msg);
        assert!(msg.contains("first_name, last_name"), "{}", msg);
    }

    #[test]
    fn test_empty_column_name_rejected() {
        let mut blank = entries();
        blank[5] = ("phone", "");
        let msg = message(FieldMapping::from_entries("acme", blank).unwrap_err());
        assert!(msg.contains("'phone' is mapped to an empty column name"), "{}", msg);
    }

    #[test]
    fn test_resolve_ignores_unmapped_columns() {
        let mapping = FieldMapping::from_entries("acme", entries()).unwrap();
        let header = header(&["Extra", "Tel", "ID", "Mail", "Birth", "Family", "Given"]);
        let columns = ColumnMapping::resolve("acme", &mapping, &header).unwrap();

        let row: Vec<Option<String>> = header.iter().map(|h| Some(h.to_lowercase())).collect();
        assert_eq!(
            columns.project(&row),
            [
                Some("id"),
                Some("given"),
                Some("family"),
                Some("birth"),
                Some("mail"),
                Some("tel")
            ]
        );
    }

    #[test]
    fn test_resolve_reports_absent_columns() {
        let mapping = FieldMapping::from_entries("acme", entries()).unwrap();
        let header = header(&["ID", "Given", "Family", "DOB", "Mail"]);
        let msg = message(ColumnMapping::resolve("acme", &mapping, &header).unwrap_err());
        assert!(msg.contains("dob -> 'Birth'"), "{}", msg);
        assert!(msg.contains("phone -> 'Tel'"), "{}", msg);
    }

    #[test]
    fn test_header_match_is_exact() {
        let mapping = FieldMapping::from_entries("acme", entries()).unwrap();
        let header = header(&[" ID", "Given", "Family", "Birth", "Mail", "Tel"]);
        assert!(ColumnMapping::resolve("acme", &mapping, &header).is_err());
    }

    #[test]
    fn test_project_short_row_yields_absent() {
        let mapping = FieldMapping::from_entries("acme", entries()).unwrap();
        let header = header(&["ID", "Given", "Family", "Birth", "Mail", "Tel"]);
        let columns = ColumnMapping::resolve("acme", &mapping, &header).unwrap();
        let row = vec![Some("1".to_string()), None, Some(String::new())];
        assert_eq!(
            columns.project(&row),
            [Some("1"), None, Some(""), None, None, None]
        );
    }
}
