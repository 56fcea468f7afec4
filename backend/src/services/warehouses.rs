//! Warehouse service

use futures::TryStreamExt;
use sqlx::PgPool;

use shared::validation::validate_name;
use shared::{Warehouse, WarehouseId, WarehouseInput};

use crate::error::{AppError, AppResult};
use crate::store::rows::{skip_undecodable, warehouse_from_row};

#[derive(Clone)]
pub struct WarehouseService {
    db: PgPool,
}

impl WarehouseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list_warehouses(&self) -> AppResult<Vec<Warehouse>> {
        let rows = sqlx::query(
            "SELECT warehouse_id, name, location FROM warehouses ORDER BY warehouse_id",
        )
        .fetch(&self.db);

        let warehouses = skip_undecodable(rows, "warehouse", warehouse_from_row)
            .try_collect()
            .await?;
        Ok(warehouses)
    }

    pub async fn get_warehouse(&self, warehouse_id: WarehouseId) -> AppResult<Warehouse> {
        let row = sqlx::query(
            "SELECT warehouse_id, name, location FROM warehouses WHERE warehouse_id = $1",
        )
        .bind(warehouse_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))?;

        Ok(warehouse_from_row(&row)?)
    }

    pub async fn create_warehouse(&self, input: WarehouseInput) -> AppResult<Warehouse> {
        validate_name(&input.name).map_err(|e| AppError::validation("name", e))?;

        let row = sqlx::query(
            r#"
            INSERT INTO warehouses (name, location)
            VALUES ($1, $2)
            RETURNING warehouse_id, name, location
            "#,
        )
        .bind(&input.name)
        .bind(&input.location)
        .fetch_one(&self.db)
        .await?;

        let warehouse = warehouse_from_row(&row)?;
        tracing::info!(warehouse_id = warehouse.warehouse_id, "Warehouse created");
        Ok(warehouse)
    }

    pub async fn update_warehouse(
        &self,
        warehouse_id: WarehouseId,
        input: WarehouseInput,
    ) -> AppResult<Warehouse> {
        validate_name(&input.name).map_err(|e| AppError::validation("name", e))?;

        let row = sqlx::query(
            r#"
            UPDATE warehouses
            SET name = $1, location = $2
            WHERE warehouse_id = $3
            RETURNING warehouse_id, name, location
            "#,
        )
        .bind(&input.name)
        .bind(&input.location)
        .bind(warehouse_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))?;

        Ok(warehouse_from_row(&row)?)
    }

    pub async fn delete_warehouse(&self, warehouse_id: WarehouseId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM warehouses WHERE warehouse_id = $1")
            .bind(warehouse_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Warehouse".to_string()));
        }

        tracing::info!(warehouse_id, "Warehouse deleted");
        Ok(())
    }
}
