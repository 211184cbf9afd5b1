use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use frostline_core::health::{healthz, readyz};
use frostline_core::middleware::request_id_layer;

use crate::handlers::{
    order::{
        advance_status, cancel_order, confirm_payment, create_order, get_order, get_timeline,
        list_my_orders, list_orders,
    },
    product::{
        create_product, delete_product, get_product, list_products, seed_products, update_product,
    },
    upload::upload_image,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Generous slack over the image cap for multipart framing.
    let upload_limit = state.upload_max_bytes + 64 * 1024;
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Products
        .route("/products", get(list_products))
        .route("/products", post(create_product))
        .route("/products/seed", post(seed_products))
        .route("/products/{id}", get(get_product))
        .route("/products/{id}", patch(update_product))
        .route("/products/{id}", delete(delete_product))
        // Uploads
        .route(
            "/uploads",
            post(upload_image)
                .layer::<_, std::convert::Infallible>(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(upload_limit)),
        )
        // Orders
        .route("/orders", post(create_order))
        .route("/orders", get(list_orders))
        .route("/orders/@me", get(list_my_orders))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/timeline", get(get_timeline))
        .route("/orders/{id}/payment", post(confirm_payment))
        .route("/orders/{id}/status", patch(advance_status))
        .route("/orders/{id}/cancel", post(cancel_order))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}
