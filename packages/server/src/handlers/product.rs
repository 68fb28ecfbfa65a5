use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use common::report::AnnotatedProduct;

use crate::entity::product;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::product::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Products",
    operation_id = "createProduct",
    summary = "Add a product to the inventory",
    description = "Creates a product record owned by the authenticated account. Quantity must be at least 1 at creation; the expiry date is an ISO-8601 calendar date. The response carries the derived days-to-expiry and urgency bucket as of today.",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = AnnotatedProduct),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(owner_id = %auth_user.owner_id))]
pub async fn create_product(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    let expiry_date = validate_create_product(&payload)?;

    let new_product = product::ActiveModel {
        owner_id: Set(auth_user.owner_id),
        product_name: Set(payload.product_name.trim().to_string()),
        quantity: Set(payload.quantity),
        expiry_date: Set(expiry_date),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_product.insert(&state.db).await?;
    state.products.invalidate(auth_user.owner_id);

    let today = chrono::Utc::now().date_naive();
    Ok((StatusCode::CREATED, Json(annotate_model(model, today))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    operation_id = "getProduct",
    summary = "Get one owned product",
    description = "Returns a single product with its derived expiry fields as of today. Records owned by other accounts are indistinguishable from missing ones.",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product details", body = AnnotatedProduct),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Product not found or not owned (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(owner_id = %auth_user.owner_id, id))]
pub async fn get_product(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AnnotatedProduct>, AppError> {
    let model = find_owned_product(&state.db, auth_user.owner_id, id).await?;

    let today = chrono::Utc::now().date_naive();
    Ok(Json(annotate_model(model, today)))
}

#[utoipa::path(
    patch,
    path = "/{id}/quantity",
    tag = "Products",
    operation_id = "updateProductQuantity",
    summary = "Set a product's quantity",
    description = "Sets the stock level of an owned product. Zero is allowed and means depleted stock; name, expiry date and ownership are immutable.",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Quantity updated", body = AnnotatedProduct),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Product not found or not owned (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(owner_id = %auth_user.owner_id, id))]
pub async fn update_quantity(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateQuantityRequest>,
) -> Result<Json<AnnotatedProduct>, AppError> {
    validate_update_quantity(&payload)?;

    let txn = state.db.begin().await?;
    let existing = find_owned_product(&txn, auth_user.owner_id, id).await?;
    let mut active: product::ActiveModel = existing.into();
    active.quantity = Set(payload.quantity);
    let model = active.update(&txn).await?;
    txn.commit().await?;

    state.products.invalidate(auth_user.owner_id);

    let today = chrono::Utc::now().date_naive();
    Ok(Json(annotate_model(model, today)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    operation_id = "deleteProduct",
    summary = "Delete a product",
    description = "Permanently deletes an owned product record. Records are independent; nothing cascades.",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Product not found or not owned (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(owner_id = %auth_user.owner_id, id))]
pub async fn delete_product(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    let existing = find_owned_product(&txn, auth_user.owner_id, id).await?;
    product::Entity::delete_by_id(existing.id).exec(&txn).await?;
    txn.commit().await?;

    state.products.invalidate(auth_user.owner_id);

    Ok(StatusCode::NO_CONTENT)
}

/// Fetch a product by id, scoped to the owner. A record owned by someone
/// else surfaces as NotFound so ids never leak across accounts.
async fn find_owned_product<C: ConnectionTrait>(
    db: &C,
    owner_id: Uuid,
    id: i32,
) -> Result<product::Model, AppError> {
    product::Entity::find_by_id(id)
        .filter(product::Column::OwnerId.eq(owner_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".into()))
}
