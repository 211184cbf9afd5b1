use chrono::Utc;
use uuid::Uuid;

use frostline_domain::money::Money;
use frostline_domain::pagination::PageRequest;

use crate::domain::repository::ProductRepository;
use crate::domain::types::{Product, ProductPatch, ProductSortBy};
use crate::error::StoreServiceError;

fn validate_rating(rating: f32) -> Result<(), StoreServiceError> {
    if !(0.0..=5.0).contains(&rating) {
        return Err(StoreServiceError::InvalidRating);
    }
    Ok(())
}

// ── ListProducts ─────────────────────────────────────────────────────────────

pub struct ListProductsUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> ListProductsUseCase<R> {
    pub async fn execute(
        &self,
        brand: Option<&str>,
        sort_by: ProductSortBy,
        page: PageRequest,
    ) -> Result<Vec<Product>, StoreServiceError> {
        self.repo.list(brand, sort_by, page).await
    }
}

// ── GetProduct ───────────────────────────────────────────────────────────────

pub struct GetProductUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> GetProductUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<Product, StoreServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(StoreServiceError::ProductNotFound)
    }
}

// ── CreateProduct ────────────────────────────────────────────────────────────

pub struct CreateProductInput {
    pub name: String,
    pub brand: String,
    pub description: String,
    pub price: Money,
    pub images: Vec<String>,
    pub specs: serde_json::Value,
    pub rating: f32,
    pub stock: i32,
}

pub struct CreateProductUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> CreateProductUseCase<R> {
    pub async fn execute(&self, input: CreateProductInput) -> Result<Product, StoreServiceError> {
        if input.name.trim().is_empty() || input.brand.trim().is_empty() {
            return Err(StoreServiceError::MissingData);
        }
        if !input.price.is_positive() {
            return Err(StoreServiceError::InvalidPrice);
        }
        validate_rating(input.rating)?;
        if input.stock < 0 {
            return Err(StoreServiceError::InvalidQuantity);
        }
        let now = Utc::now();
        let product = Product {
            id: Uuid::now_v7(),
            name: input.name,
            brand: input.brand,
            description: input.description,
            price: input.price,
            images: input.images,
            specs: input.specs,
            rating: input.rating,
            stock: input.stock,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&product).await?;
        Ok(product)
    }
}

// ── UpdateProduct ────────────────────────────────────────────────────────────

pub struct UpdateProductUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> UpdateProductUseCase<R> {
    pub async fn execute(&self, id: Uuid, patch: ProductPatch) -> Result<(), StoreServiceError> {
        if patch.is_empty() {
            return Err(StoreServiceError::MissingData);
        }
        if let Some(price) = patch.price {
            if !price.is_positive() {
                return Err(StoreServiceError::InvalidPrice);
            }
        }
        if let Some(rating) = patch.rating {
            validate_rating(rating)?;
        }
        if let Some(stock) = patch.stock {
            if stock < 0 {
                return Err(StoreServiceError::InvalidQuantity);
            }
        }
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(StoreServiceError::ProductNotFound);
        }
        self.repo.update(id, &patch).await
    }
}

// ── DeleteProduct ────────────────────────────────────────────────────────────

pub struct DeleteProductUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> DeleteProductUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<(), StoreServiceError> {
        if !self.repo.delete(id).await? {
            return Err(StoreServiceError::ProductNotFound);
        }
        Ok(())
    }
}

// ── SeedProducts ─────────────────────────────────────────────────────────────

/// Bulk-seed the sample catalog. Skips when the table already has rows, so
/// repeated seeding is harmless.
pub struct SeedProductsUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> SeedProductsUseCase<R> {
    pub async fn execute(&self) -> Result<usize, StoreServiceError> {
        if self.repo.count().await? > 0 {
            return Ok(0);
        }
        let products = sample_products();
        self.repo.insert_many(&products).await?;
        Ok(products.len())
    }
}

fn sample_product(
    name: &str,
    brand: &str,
    description: &str,
    price: Money,
    specs: serde_json::Value,
    rating: f32,
    stock: i32,
) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::now_v7(),
        name: name.to_owned(),
        brand: brand.to_owned(),
        description: description.to_owned(),
        price,
        images: vec![],
        specs,
        rating,
        stock,
        created_at: now,
        updated_at: now,
    }
}

/// Built-in sample catalog used by the admin seeding operation.
pub fn sample_products() -> Vec<Product> {
    vec![
        sample_product(
            "CoolWave Inverter Split 1.5T",
            "CoolWave",
            "1.5 ton 5-star inverter split AC with copper condenser",
            Money::from_major(34_990),
            serde_json::json!({"tonnage": "1.5", "energy_rating": "5", "type": "split"}),
            4.5,
            24,
        ),
        sample_product(
            "CoolWave Window 1T",
            "CoolWave",
            "Compact 1 ton 3-star window AC",
            Money::from_major(22_490),
            serde_json::json!({"tonnage": "1.0", "energy_rating": "3", "type": "window"}),
            4.0,
            40,
        ),
        sample_product(
            "Glacier Pro Split 2T",
            "Glacier",
            "2 ton 4-star split AC for large rooms",
            Money::from_major(46_990),
            serde_json::json!({"tonnage": "2.0", "energy_rating": "4", "type": "split"}),
            4.3,
            12,
        ),
        sample_product(
            "NorthWind Lite 1T",
            "NorthWind",
            "Budget 1 ton 3-star split AC",
            Money::from_major(26_990),
            serde_json::json!({"tonnage": "1.0", "energy_rating": "3", "type": "split"}),
            3.9,
            31,
        ),
        sample_product(
            "NorthWind Dual Inverter 1.5T",
            "NorthWind",
            "1.5 ton dual-inverter split AC with low-noise mode",
            Money::from_major(38_490),
            serde_json::json!({"tonnage": "1.5", "energy_rating": "5", "type": "split"}),
            4.7,
            18,
        ),
    ]
}
