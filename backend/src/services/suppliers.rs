//! Supplier service

use futures::TryStreamExt;
use sqlx::PgPool;

use shared::validation::{validate_name, validate_rating};
use shared::{Supplier, SupplierId, SupplierInput};

use crate::error::{AppError, AppResult};
use crate::store::rows::{skip_undecodable, supplier_from_row};

#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

fn check_supplier(input: &SupplierInput) -> AppResult<()> {
    validate_name(&input.name).map_err(|e| AppError::validation("name", e))?;
    if let Some(rating) = input.rating {
        validate_rating(rating).map_err(|e| AppError::validation("rating", e))?;
    }
    Ok(())
}

impl SupplierService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query(
            r#"
            SELECT supplier_id, name, address, contact, contact_person, rating
            FROM suppliers
            ORDER BY supplier_id
            "#,
        )
        .fetch(&self.db);

        let suppliers = skip_undecodable(rows, "supplier", supplier_from_row)
            .try_collect()
            .await?;
        Ok(suppliers)
    }

    pub async fn get_supplier(&self, supplier_id: SupplierId) -> AppResult<Supplier> {
        let row = sqlx::query(
            r#"
            SELECT supplier_id, name, address, contact, contact_person, rating
            FROM suppliers
            WHERE supplier_id = $1
            "#,
        )
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        Ok(supplier_from_row(&row)?)
    }

    pub async fn create_supplier(&self, input: SupplierInput) -> AppResult<Supplier> {
        check_supplier(&input)?;

        let row = sqlx::query(
            r#"
            INSERT INTO suppliers (name, address, contact, contact_person, rating)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING supplier_id, name, address, contact, contact_person, rating
            "#,
        )
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.contact)
        .bind(&input.contact_person)
        .bind(input.rating)
        .fetch_one(&self.db)
        .await?;

        let supplier = supplier_from_row(&row)?;
        tracing::info!(supplier_id = supplier.supplier_id, "Supplier created");
        Ok(supplier)
    }

    /// Replace every field of a supplier
    pub async fn update_supplier(
        &self,
        supplier_id: SupplierId,
        input: SupplierInput,
    ) -> AppResult<Supplier> {
        check_supplier(&input)?;

        let row = sqlx::query(
            r#"
            UPDATE suppliers
            SET name = $1, address = $2, contact = $3, contact_person = $4, rating = $5
            WHERE supplier_id = $6
            RETURNING supplier_id, name, address, contact, contact_person, rating
            "#,
        )
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.contact)
        .bind(&input.contact_person)
        .bind(input.rating)
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        Ok(supplier_from_row(&row)?)
    }

    pub async fn delete_supplier(&self, supplier_id: SupplierId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE supplier_id = $1")
            .bind(supplier_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        tracing::info!(supplier_id, "Supplier deleted");
        Ok(())
    }
}
