use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use common::report::{self, AnnotatedProduct, ExpirySummary, Product};

use crate::entity::product;
use crate::error::AppError;

/// Maximum product name length in Unicode characters.
pub const MAX_NAME_CHARS: usize = 256;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateProductRequest {
    /// Product name, 1-256 characters after trimming.
    #[schema(example = "Paracetamol 500mg")]
    pub product_name: String,
    /// Units in stock; at least 1 at creation.
    #[schema(example = 10)]
    pub quantity: i32,
    /// Expiry date, ISO-8601 (`YYYY-MM-DD`).
    #[schema(example = "2026-03-01")]
    pub expiry_date: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateQuantityRequest {
    /// New stock level; 0 means depleted but still tracked.
    #[schema(example = 0)]
    pub quantity: i32,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ReportQuery {
    /// Case-insensitive substring filter on product name.
    pub search: Option<String>,
    /// Report window: `all`, `within_6_months` or `expired_only`. Defaults to `all`.
    pub window: Option<String>,
    /// Report date (`YYYY-MM-DD`); defaults to today (UTC). Fix it for
    /// reproducible reports.
    pub as_of: Option<String>,
}

/// An expiry report: annotated rows sorted by expiry date plus the
/// four-bucket summary.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ReportResponse {
    /// Date the derived fields were computed against.
    pub as_of: NaiveDate,
    pub summary: ExpirySummary,
    pub data: Vec<AnnotatedProduct>,
}

impl From<product::Model> for Product {
    fn from(m: product::Model) -> Self {
        Self {
            id: m.id,
            owner_id: m.owner_id,
            product_name: m.product_name,
            quantity: m.quantity,
            expiry_date: m.expiry_date,
        }
    }
}

/// Attach the derived expiry fields to a stored product.
pub fn annotate_model(m: product::Model, today: NaiveDate) -> AnnotatedProduct {
    report::annotate(Some(Product::from(m)), today).remove(0)
}

pub fn validate_product_name(name: &str) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::Validation(
            "Product name must be 1-256 characters".into(),
        ));
    }
    Ok(())
}

/// Validate a creation payload and parse its expiry date.
pub fn validate_create_product(req: &CreateProductRequest) -> Result<NaiveDate, AppError> {
    validate_product_name(&req.product_name)?;
    if req.quantity < 1 {
        return Err(AppError::Validation("Quantity must be at least 1".into()));
    }
    let expiry_date = report::parse_date(&req.expiry_date)?;
    Ok(expiry_date)
}

pub fn validate_update_quantity(req: &UpdateQuantityRequest) -> Result<(), AppError> {
    if req.quantity < 0 {
        return Err(AppError::Validation("Quantity must be >= 0".into()));
    }
    Ok(())
}
