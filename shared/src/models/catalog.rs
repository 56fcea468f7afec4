//! Catalog models: products, suppliers and warehouses

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, SupplierId, WarehouseId};

/// A product that can be purchased and stocked
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub product_id: ProductId,
    /// Business key, unique across the catalog
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Unit of measure (e.g. "pcs", "box", "kg")
    pub unit: String,
    pub sale_price: Decimal,
    pub weight_kg: Option<Decimal>,
    pub image_url: Option<String>,
    pub supplier_id: Option<SupplierId>,
}

/// Input for creating a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductInput {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit: String,
    pub sale_price: Decimal,
    pub weight_kg: Option<Decimal>,
    pub image_url: Option<String>,
    pub supplier_id: Option<SupplierId>,
}

/// Input for updating a product; absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProductInput {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub sale_price: Option<Decimal>,
    pub weight_kg: Option<Decimal>,
    pub image_url: Option<String>,
    pub supplier_id: Option<SupplierId>,
}

/// A supplier of products
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supplier {
    pub supplier_id: SupplierId,
    pub name: String,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub contact_person: Option<String>,
    /// Numeric rating, 0 to 5
    pub rating: Option<Decimal>,
}

/// Input for creating or replacing a supplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierInput {
    pub name: String,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub contact_person: Option<String>,
    pub rating: Option<Decimal>,
}

/// A physical storage location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Warehouse {
    pub warehouse_id: WarehouseId,
    pub name: String,
    pub location: String,
}

/// Input for creating or replacing a warehouse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseInput {
    pub name: String,
    pub location: String,
}
