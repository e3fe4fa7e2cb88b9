//! Field transformers for partner cell values
//!
//! Every transformer is pure and total: it takes one raw cell (or `None` for an
//! absent cell) and returns either a normalized value or `None` when the value
//! cannot be represented in the standard schema. Malformed input is an expected
//! case in partner data, so nothing in this module returns an error.
//!
//! - [`text`] - whitespace trimming and case normalization
//! - [`date`] - multi-format date parsing to ISO `YYYY-MM-DD`
//! - [`phone`] - North American phone digit normalization

pub mod date;
pub mod phone;
pub mod text;

pub use date::normalize_date;
pub use phone::normalize_phone;
pub use text::{normalize_lower_case, normalize_title_case, normalize_trimmed};
