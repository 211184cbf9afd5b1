use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use frostline_auth_types::identity::IdentityHeaders;
use frostline_auth_types::policy::require_admin;
use frostline_domain::money::Money;

use crate::domain::types::{Product, ProductPatch, ProductSortBy};
use crate::error::StoreServiceError;
use crate::state::AppState;
use crate::usecase::product::{
    CreateProductInput, CreateProductUseCase, DeleteProductUseCase, GetProductUseCase,
    ListProductsUseCase, SeedProductsUseCase, UpdateProductUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub description: String,
    pub price_cents: i64,
    pub images: Vec<String>,
    pub specs: serde_json::Value,
    pub rating: f32,
    pub stock: i32,
    #[serde(serialize_with = "frostline_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "frostline_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name,
            brand: product.brand,
            description: product.description,
            price_cents: product.price.cents(),
            images: product.images,
            specs: product.specs,
            rating: product.rating,
            stock: product.stock,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ProductListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub brand: Option<String>,
    pub sort_by: Option<String>,
}

// ── GET /products ────────────────────────────────────────────────────────────

pub async fn list_products(
    State(state): State<AppState>,
    axum::extract::RawQuery(raw_query): axum::extract::RawQuery,
) -> Result<Json<Vec<ProductResponse>>, StoreServiceError> {
    let query: ProductListQuery = raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|_| StoreServiceError::MissingData)?
        .unwrap_or_default();

    let sort_by = query
        .sort_by
        .as_deref()
        .and_then(ProductSortBy::from_kebab_case)
        .unwrap_or_default();

    let page = frostline_domain::pagination::PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };

    let usecase = ListProductsUseCase {
        repo: state.product_repo(),
    };
    let products = usecase.execute(query.brand.as_deref(), sort_by, page).await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

// ── GET /products/{id} ───────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, StoreServiceError> {
    let usecase = GetProductUseCase {
        repo: state.product_repo(),
    };
    let product = usecase.execute(id).await?;
    Ok(Json(product.into()))
}

// ── POST /products ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub brand: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub specs: serde_json::Value,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub stock: i32,
}

pub async fn create_product(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), StoreServiceError> {
    require_admin(&identity).map_err(|_| StoreServiceError::Forbidden)?;
    let usecase = CreateProductUseCase {
        repo: state.product_repo(),
    };
    let product = usecase
        .execute(CreateProductInput {
            name: body.name,
            brand: body.brand,
            description: body.description,
            price: Money::from_cents(body.price_cents),
            images: body.images,
            specs: body.specs,
            rating: body.rating,
            stock: body.stock,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

// ── PATCH /products/{id} ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub images: Option<Vec<String>>,
    pub specs: Option<serde_json::Value>,
    pub rating: Option<f32>,
    pub stock: Option<i32>,
}

pub async fn update_product(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<StatusCode, StoreServiceError> {
    require_admin(&identity).map_err(|_| StoreServiceError::Forbidden)?;
    let usecase = UpdateProductUseCase {
        repo: state.product_repo(),
    };
    usecase
        .execute(
            id,
            ProductPatch {
                name: body.name,
                brand: body.brand,
                description: body.description,
                price: body.price_cents.map(Money::from_cents),
                images: body.images,
                specs: body.specs,
                rating: body.rating,
                stock: body.stock,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /products/{id} ────────────────────────────────────────────────────

pub async fn delete_product(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StoreServiceError> {
    require_admin(&identity).map_err(|_| StoreServiceError::Forbidden)?;
    let usecase = DeleteProductUseCase {
        repo: state.product_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /products/seed ──────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SeedResponse {
    pub inserted: usize,
}

pub async fn seed_products(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<SeedResponse>, StoreServiceError> {
    require_admin(&identity).map_err(|_| StoreServiceError::Forbidden)?;
    let usecase = SeedProductsUseCase {
        repo: state.product_repo(),
    };
    let inserted = usecase.execute().await?;
    Ok(Json(SeedResponse { inserted }))
}
