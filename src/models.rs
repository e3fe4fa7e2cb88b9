//! Core data structures and types for partner normalization.
//!
//! Defines the closed standard schema, the raw and normalized record shapes,
//! and the statistics reported for each partner and each run.

use crate::constants::columns;
use crate::transform;
use std::path::PathBuf;

/// Fields of the standard schema, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardField {
    ExternalId,
    FirstName,
    LastName,
    Dob,
    Email,
    Phone,
}

impl StandardField {
    /// Every standard field, in schema order
    pub const ALL: [StandardField; 6] = [
        StandardField::ExternalId,
        StandardField::FirstName,
        StandardField::LastName,
        StandardField::Dob,
        StandardField::Email,
        StandardField::Phone,
    ];

    /// Column name used in configuration and output
    pub fn as_str(&self) -> &'static str {
        match self {
            StandardField::ExternalId => columns::EXTERNAL_ID,
            StandardField::FirstName => columns::FIRST_NAME,
            StandardField::LastName => columns::LAST_NAME,
            StandardField::Dob => columns::DOB,
            StandardField::Email => columns::EMAIL,
            StandardField::Phone => columns::PHONE,
        }
    }

    /// Look up a standard field by its column name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }

    /// Position of the field within the schema
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Apply the transformer assigned to this field
    pub fn normalize(&self, raw: Option<&str>) -> Option<String> {
        match self {
            StandardField::ExternalId => transform::normalize_trimmed(raw),
            StandardField::FirstName | StandardField::LastName => {
                transform::normalize_title_case(raw)
            }
            StandardField::Dob => transform::normalize_date(raw),
            StandardField::Email => transform::normalize_lower_case(raw),
            StandardField::Phone => transform::normalize_phone(raw),
        }
    }
}

impl std::fmt::Display for StandardField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A partner source file as read: header plus untyped cells
///
/// `None` marks an absent cell; an empty string is a present value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(header: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { header, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// One row in the standard schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub external_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub partner_code: String,
}

impl NormalizedRecord {
    /// Build a record from values in schema order
    pub fn from_values(values: [Option<String>; 6], partner_code: impl Into<String>) -> Self {
        let [external_id, first_name, last_name, dob, email, phone] = values;
        Self {
            external_id,
            first_name,
            last_name,
            dob,
            email,
            phone,
            partner_code: partner_code.into(),
        }
    }

    /// Output cells in column order, partner code last
    pub fn output_values(&self) -> [Option<&str>; 7] {
        [
            self.external_id.as_deref(),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.dob.as_deref(),
            self.email.as_deref(),
            self.phone.as_deref(),
            Some(self.partner_code.as_str()),
        ]
    }
}

/// Per-partner normalization counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationStats {
    /// Rows read from the source file
    pub rows: usize,

    /// Per standard field: present values the transformer could not normalize
    pub unparseable: [usize; 6],
}

impl NormalizationStats {
    pub fn unparseable_for(&self, field: StandardField) -> usize {
        self.unparseable[field.index()]
    }

    pub fn total_unparseable(&self) -> usize {
        self.unparseable.iter().sum()
    }
}

/// The normalized output of one partner
#[derive(Debug, Clone)]
pub struct PartnerBatch {
    /// Partner identifier from configuration
    pub partner_id: String,

    /// Position of the partner in configuration order
    pub position: usize,

    pub partner_code: String,

    pub records: Vec<NormalizedRecord>,

    pub stats: NormalizationStats,
}

/// Ordered, concatenated records across all partners
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnifiedDataset {
    pub records: Vec<NormalizedRecord>,
}

impl UnifiedDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedRecord> {
        self.records.iter()
    }
}

/// Summary of one processed partner
#[derive(Debug, Clone)]
pub struct PartnerSummary {
    pub partner_id: String,
    pub partner_code: String,
    pub stats: NormalizationStats,
}

/// A partner left out of the run under the skip policy
#[derive(Debug, Clone)]
pub struct SkippedPartner {
    pub partner_id: String,
    pub reason: String,
}

/// Outcome of one normalization run, before anything is written
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub dataset: UnifiedDataset,

    /// Processed partners, in declaration order
    pub partners: Vec<PartnerSummary>,

    /// Partners left out under the skip policy, in declaration order
    pub skipped: Vec<SkippedPartner>,

    /// Rows normalized across all processed partners
    pub rows_read: usize,

    /// Rows removed by the dataset filter
    pub rows_filtered: usize,

    pub processing_time_ms: u128,
}

impl RunReport {
    /// Unparseable values across all processed partners
    pub fn total_unparseable(&self) -> usize {
        self.partners
            .iter()
            .map(|summary| summary.stats.total_unparseable())
            .sum()
    }
}

/// Processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub partners_processed: usize,
    pub partners_skipped: usize,
    pub rows_read: usize,
    pub rows_filtered: usize,
    pub rows_written: usize,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_field_order_matches_columns() {
        let names: Vec<&str> = StandardField::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(names, columns::STANDARD_FIELDS);
        for (position, field) in StandardField::ALL.iter().enumerate() {
            assert_eq!(field.index(), position);
        }
    }

    #[test]
    fn test_from_name_rejects_unknown_and_partner_code() {
        assert_eq!(StandardField::from_name("dob"), Some(StandardField::Dob));
        assert_eq!(StandardField::from_name("partner_code"), None);
        assert_eq!(StandardField::from_name("DOB"), None);
    }

    #[test]
    fn test_field_transform_assignment() {
        assert_eq!(
            StandardField::ExternalId.normalize(Some("  007 ")),
            Some("007".to_string())
        );
        assert_eq!(
            StandardField::LastName.normalize(Some("mcDONALD")),
            Some("Mcdonald".to_string())
        );
        assert_eq!(
            StandardField::Email.normalize(Some("A@B.COM")),
            Some("a@b.com".to_string())
        );
        assert_eq!(
            StandardField::Dob.normalize(Some("7/4/1976")),
            Some("1976-07-04".to_string())
        );
        assert_eq!(
            StandardField::Phone.normalize(Some("(212) 555 1234")),
            Some("212-555-1234".to_string())
        );
        assert_eq!(StandardField::FirstName.normalize(None), None);
    }

    #[test]
    fn test_output_values_put_partner_code_last() {
        let record = NormalizedRecord::from_values(
            [Some("1".to_string()), None, None, None, None, None],
            "P",
        );
        let values = record.output_values();
        assert_eq!(values[0], Some("1"));
        assert_eq!(values[1], None);
        assert_eq!(values[6], Some("P"));
    }
}
