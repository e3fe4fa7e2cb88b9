//! Application constants for the partner normalizer
//!
//! This module contains the standard schema column names, value-format
//! constants and processing defaults used throughout the pipeline.

// =============================================================================
// Standard Schema
// =============================================================================

/// Standard column names, in output order
pub mod columns {
    pub const EXTERNAL_ID: &str = "external_id";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const DOB: &str = "dob";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";

    /// Attached from partner configuration, never read from partner data
    pub const PARTNER_CODE: &str = "partner_code";

    /// The six base fields every partner must map
    pub const STANDARD_FIELDS: &[&str] = &[EXTERNAL_ID, FIRST_NAME, LAST_NAME, DOB, EMAIL, PHONE];

    /// Full output header
    pub const OUTPUT_COLUMNS: &[&str] = &[
        EXTERNAL_ID,
        FIRST_NAME,
        LAST_NAME,
        DOB,
        EMAIL,
        PHONE,
        PARTNER_CODE,
    ];
}

// =============================================================================
// Value Formats
// =============================================================================

/// Canonical output format for dates of birth
pub const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Number of digits in a North American phone number without trunk prefix
pub const PHONE_DIGITS: usize = 10;

/// North American trunk prefix dropped from 11-digit phone numbers
pub const PHONE_TRUNK_PREFIX: char = '1';

// =============================================================================
// Processing Defaults
// =============================================================================

/// Field delimiter of the unified output file
pub const OUTPUT_DELIMITER: u8 = b',';

/// Upper bound on partners read and normalized at the same time
pub const MAX_DEFAULT_CONCURRENT_PARTNERS: usize = 8;

/// Default log filter target
pub const LOG_TARGET: &str = "partner_normalizer";
