use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use common::csv::{EXPORT_COLUMNS, to_csv};
use common::report::{
    AnnotatedProduct, ExpirySummary, Product, ReportWindow, annotate, filter_by_name,
    filter_by_window, parse_date, sort_by_expiry, summarize,
};

use crate::entity::product;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::product::{ReportQuery, ReportResponse};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/report",
    tag = "Reports",
    operation_id = "getExpiryReport",
    summary = "Build an expiry report",
    description = "Annotates every owned product with days-to-expiry and its urgency bucket, filters by name substring and report window, sorts ascending by expiry date and returns the rows with a four-bucket summary. Zero buckets are reported, never omitted.",
    params(ReportQuery),
    responses(
        (status = 200, description = "Expiry report", body = ReportResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 502, description = "Record store unavailable (EXTERNAL_SERVICE_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(owner_id = %auth_user.owner_id))]
pub async fn get_report(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse>, AppError> {
    let rows = owned_products(&state, auth_user.owner_id).await?;
    let (as_of, data, summary) = run_report(&rows, &query)?;

    Ok(Json(ReportResponse {
        as_of,
        summary,
        data,
    }))
}

#[utoipa::path(
    get,
    path = "/report/export",
    tag = "Reports",
    operation_id = "exportExpiryReport",
    summary = "Export an expiry report as CSV",
    description = "Runs the same pipeline as the report endpoint and serializes the result as UTF-8 CSV with columns `product_name,quantity,expiry_date,status`. The status column holds the undecorated bucket label.",
    params(ReportQuery),
    responses(
        (status = 200, description = "CSV report", content_type = "text/csv", body = String),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 502, description = "Record store unavailable (EXTERNAL_SERVICE_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(owner_id = %auth_user.owner_id))]
pub async fn export_report(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let rows = owned_products(&state, auth_user.owner_id).await?;
    let (_, data, _) = run_report(&rows, &query)?;

    let csv = to_csv(&data, EXPORT_COLUMNS);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"expiry_report.csv\"",
            ),
        ],
        csv,
    ))
}

/// Fetch the owner's full product list, through the cache.
async fn owned_products(
    state: &AppState,
    owner_id: Uuid,
) -> Result<Arc<Vec<product::Model>>, AppError> {
    if let Some(cached) = state.products.get(owner_id) {
        return Ok(cached);
    }

    let rows = product::Entity::find()
        .filter(product::Column::OwnerId.eq(owner_id))
        .order_by_asc(product::Column::Id)
        .all(&state.db)
        .await?;

    Ok(state.products.put(owner_id, rows))
}

/// The report pipeline: annotate against the report date, filter by name,
/// filter by window (which reads the annotated days), stable-sort by expiry
/// date, summarize. The order matters and is shared by the JSON and CSV
/// endpoints.
fn run_report(
    rows: &[product::Model],
    query: &ReportQuery,
) -> Result<(NaiveDate, Vec<AnnotatedProduct>, ExpirySummary), AppError> {
    let as_of = match query.as_of.as_deref() {
        Some(value) => parse_date(value)?,
        None => chrono::Utc::now().date_naive(),
    };

    let window = match query.window.as_deref() {
        None => ReportWindow::All,
        Some(value) => ReportWindow::parse(value).ok_or_else(|| {
            AppError::Validation(
                "window must be one of: all, within_6_months, expired_only".into(),
            )
        })?,
    };

    let products: Vec<Product> = rows.iter().cloned().map(Product::from).collect();
    let mut records = annotate(products, as_of);
    if let Some(ref search) = query.search {
        records = filter_by_name(records, search);
    }
    records = filter_by_window(records, window);
    let records = sort_by_expiry(records);
    let summary = summarize(&records);

    Ok((as_of, records, summary))
}
