use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::expiry::{ExpiryStatus, classify};

/// Upper bound (in days-to-expiry) of the six-month report window.
pub const SIX_MONTHS_DAYS: i64 = 180;

/// A product record as handed over by the record store.
///
/// `id` and `owner_id` are assigned by the store and immutable; the record
/// carries no derived fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub owner_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub expiry_date: NaiveDate,
}

/// A product with its derived expiry fields attached.
///
/// The derived fields are a function of the report date and are never
/// persisted or cached on the record itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct AnnotatedProduct {
    pub id: i32,
    pub owner_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub expiry_date: NaiveDate,
    /// Whole days until expiry as of the report date; negative once expired.
    pub days_to_expiry: i64,
    pub status: ExpiryStatus,
}

/// Whole days between `today` and `expiry`. Zero on the expiry day itself.
pub fn days_to_expiry(expiry: NaiveDate, today: NaiveDate) -> i64 {
    expiry.signed_duration_since(today).num_days()
}

/// Parse an ISO-8601 (`YYYY-MM-DD`) calendar date.
///
/// The single string-to-date boundary: request payloads and CSV rows all go
/// through here, so date validation failures always carry the same error.
pub fn parse_date(value: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| DomainError::InvalidDate {
        value: value.trim().to_string(),
    })
}

/// Compute days-to-expiry for every record and attach its urgency bucket.
///
/// Length and input order are preserved. `today` is an explicit argument so
/// reports are reproducible; callers pass the current date in production and
/// a fixed date under test.
pub fn annotate(
    products: impl IntoIterator<Item = Product>,
    today: NaiveDate,
) -> Vec<AnnotatedProduct> {
    products
        .into_iter()
        .map(|p| {
            let days = days_to_expiry(p.expiry_date, today);
            AnnotatedProduct {
                id: p.id,
                owner_id: p.owner_id,
                product_name: p.product_name,
                quantity: p.quantity,
                expiry_date: p.expiry_date,
                days_to_expiry: days,
                status: classify(days),
            }
        })
        .collect()
}

/// Keep records whose name contains `query`, case-insensitively.
///
/// An empty (or all-whitespace) query returns the input unchanged; no match
/// returns an empty vector, not an error.
pub fn filter_by_name(records: Vec<AnnotatedProduct>, query: &str) -> Vec<AnnotatedProduct> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| r.product_name.to_lowercase().contains(&needle))
        .collect()
}

/// Named time-window predicate over `days_to_expiry`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportWindow {
    /// No window filtering.
    #[default]
    All,
    /// Expiring within 180 days, already-expired records included.
    #[serde(rename = "within_6_months")]
    Within6Months,
    /// Already-expired records only.
    ExpiredOnly,
}

impl ReportWindow {
    /// All windows, for error messages.
    pub const ALL: &'static [ReportWindow] =
        &[Self::All, Self::Within6Months, Self::ExpiredOnly];

    /// Returns the wire name used in query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Within6Months => "within_6_months",
            Self::ExpiredOnly => "expired_only",
        }
    }

    /// Parse a wire name; `None` for anything unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "within_6_months" => Some(Self::Within6Months),
            "expired_only" => Some(Self::ExpiredOnly),
            _ => None,
        }
    }
}

/// Narrow a report to the given window.
///
/// Operates on the already-annotated `days_to_expiry`, not on a fresh date
/// computation, so callers must annotate before filtering.
pub fn filter_by_window(
    records: Vec<AnnotatedProduct>,
    window: ReportWindow,
) -> Vec<AnnotatedProduct> {
    match window {
        ReportWindow::All => records,
        ReportWindow::Within6Months => records
            .into_iter()
            .filter(|r| r.days_to_expiry <= SIX_MONTHS_DAYS)
            .collect(),
        ReportWindow::ExpiredOnly => records
            .into_iter()
            .filter(|r| r.days_to_expiry < 0)
            .collect(),
    }
}

/// Stable ascending sort by expiry date. Ties keep input order.
pub fn sort_by_expiry(mut records: Vec<AnnotatedProduct>) -> Vec<AnnotatedProduct> {
    records.sort_by_key(|r| r.expiry_date);
    records
}

/// Per-bucket record counts. Zero buckets are reported, never omitted, so
/// summary tiles always show all four values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExpirySummary {
    pub expired: u64,
    pub urgent: u64,
    pub warning: u64,
    pub safe: u64,
}

impl ExpirySummary {
    /// Count for one bucket.
    pub fn count(&self, status: ExpiryStatus) -> u64 {
        match status {
            ExpiryStatus::Expired => self.expired,
            ExpiryStatus::Urgent => self.urgent,
            ExpiryStatus::Warning => self.warning,
            ExpiryStatus::Safe => self.safe,
        }
    }

    /// Total records across all buckets.
    pub fn total(&self) -> u64 {
        self.expired + self.urgent + self.warning + self.safe
    }
}

/// Count annotated records per urgency bucket.
pub fn summarize(records: &[AnnotatedProduct]) -> ExpirySummary {
    let mut summary = ExpirySummary::default();
    for r in records {
        match r.status {
            ExpiryStatus::Expired => summary.expired += 1,
            ExpiryStatus::Urgent => summary.urgent += 1,
            ExpiryStatus::Warning => summary.warning += 1,
            ExpiryStatus::Safe => summary.safe += 1,
        }
    }
    summary
}
