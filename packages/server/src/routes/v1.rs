use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest("/products", product_routes())
}

fn product_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::product::create_product))
        .routes(routes!(handlers::report::get_report))
        .routes(routes!(handlers::report::export_report))
        .routes(routes!(
            handlers::product::get_product,
            handlers::product::delete_product
        ))
        .routes(routes!(handlers::product::update_quantity))
}
