//! Product catalog service

use futures::TryStreamExt;
use sqlx::PgPool;

use shared::validation::{validate_name, validate_price, validate_sku};
use shared::{CreateProductInput, Product, ProductId, UpdateProductInput};

use crate::error::{AppError, AppResult};
use crate::store::rows::{product_from_row, skip_undecodable};

const PRODUCT_COLUMNS: &str = "product_id, sku, name, description, category, unit, sale_price, \
                               weight_kg, image_url, supplier_id";

#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// SKU collisions are reported against the `sku` field
fn sku_conflict(err: sqlx::Error) -> AppError {
    match AppError::from(err) {
        AppError::DuplicateEntry(_) => AppError::DuplicateEntry("sku".to_string()),
        other => other,
    }
}

fn check_product_fields(sku: &str, name: &str, price: rust_decimal::Decimal) -> AppResult<()> {
    validate_sku(sku).map_err(|e| AppError::validation("sku", e))?;
    validate_name(name).map_err(|e| AppError::validation("name", e))?;
    validate_price(price).map_err(|e| AppError::validation("sale_price", e))?;
    Ok(())
}

impl ProductService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        let sql = format!("SELECT {} FROM products ORDER BY product_id", PRODUCT_COLUMNS);
        let rows = sqlx::query(&sql).fetch(&self.db);

        let products = skip_undecodable(rows, "product", product_from_row)
            .try_collect()
            .await?;
        Ok(products)
    }

    pub async fn get_product(&self, product_id: ProductId) -> AppResult<Product> {
        let sql = format!("SELECT {} FROM products WHERE product_id = $1", PRODUCT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(product_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product_from_row(&row)?)
    }

    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<Product> {
        check_product_fields(&input.sku, &input.name, input.sale_price)?;

        let sql = format!(
            r#"
            INSERT INTO products (sku, name, description, category, unit, sale_price,
                                  weight_kg, image_url, supplier_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&input.sku)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.unit)
            .bind(input.sale_price)
            .bind(input.weight_kg)
            .bind(&input.image_url)
            .bind(input.supplier_id)
            .fetch_one(&self.db)
            .await
            .map_err(sku_conflict)?;

        let product = product_from_row(&row)?;
        tracing::info!(product_id = product.product_id, sku = %product.sku, "Product created");
        Ok(product)
    }

    pub async fn update_product(
        &self,
        product_id: ProductId,
        input: UpdateProductInput,
    ) -> AppResult<Product> {
        let existing = self.get_product(product_id).await?;

        let sku = input.sku.unwrap_or(existing.sku);
        let name = input.name.unwrap_or(existing.name);
        let sale_price = input.sale_price.unwrap_or(existing.sale_price);
        check_product_fields(&sku, &name, sale_price)?;

        let description = input.description.or(existing.description);
        let category = input.category.or(existing.category);
        let unit = input.unit.unwrap_or(existing.unit);
        let weight_kg = input.weight_kg.or(existing.weight_kg);
        let image_url = input.image_url.or(existing.image_url);
        let supplier_id = input.supplier_id.or(existing.supplier_id);

        let sql = format!(
            r#"
            UPDATE products
            SET sku = $1, name = $2, description = $3, category = $4, unit = $5,
                sale_price = $6, weight_kg = $7, image_url = $8, supplier_id = $9
            WHERE product_id = $10
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&sku)
            .bind(&name)
            .bind(&description)
            .bind(&category)
            .bind(&unit)
            .bind(sale_price)
            .bind(weight_kg)
            .bind(&image_url)
            .bind(supplier_id)
            .bind(product_id)
            .fetch_optional(&self.db)
            .await
            .map_err(sku_conflict)?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product_from_row(&row)?)
    }

    pub async fn delete_product(&self, product_id: ProductId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        tracing::info!(product_id, "Product deleted");
        Ok(())
    }
}
