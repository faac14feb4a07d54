//! pt-BR display of stored dates.
//!
//! Timestamps are shown in their own offset; no conversion to the local
//! zone takes place.

use lead_form::parse_date;

/// `DD/MM/YYYY`, or `None` when `raw` is not a date.
pub fn date_br(raw: &str) -> Option<String> {
    parse_date(raw).map(|dt| dt.format("%d/%m/%Y").to_string())
}

/// `DD/MM/YYYY HH:MM:SS`, or `None` when `raw` is not a date.
pub fn datetime_br(raw: &str) -> Option<String> {
    parse_date(raw).map(|dt| dt.format("%d/%m/%Y %H:%M:%S").to_string())
}

/// [`date_br`], falling back to the raw text.
pub fn display_date(raw: &str) -> String {
    date_br(raw).unwrap_or_else(|| raw.to_string())
}

/// [`datetime_br`], falling back to the raw text.
pub fn display_datetime(raw: &str) -> String {
    datetime_br(raw).unwrap_or_else(|| raw.to_string())
}
