use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    CategorySummary, NewProduct as DomainNewProduct, Product as DomainProduct, StockStatus,
    UpdateProduct as DomainUpdateProduct,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: i64,
    pub stock: i32,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub price: i64,
    pub stock: i32,
    pub description: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct UpdateProduct<'a> {
    pub name: &'a str,
    pub price: i64,
    pub stock: i32,
    pub description: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::product_categories)]
pub struct ProductCategory {
    pub product_id: i32,
    pub category_id: i32,
}

impl Product {
    pub fn into_domain(self, categories: Vec<CategorySummary>) -> DomainProduct {
        DomainProduct {
            id: self.id,
            name: self.name,
            price: self.price,
            stock: self.stock,
            stock_status: StockStatus::classify(self.stock),
            description: self.description,
            categories,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        value.into_domain(Vec::new())
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            name: value.name.as_str(),
            price: value.price,
            stock: value.stock,
            description: value.description.as_str(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(value: &'a DomainUpdateProduct) -> Self {
        Self {
            name: value.name.as_str(),
            price: value.price,
            stock: value.stock,
            description: value.description.as_str(),
            updated_at: value.updated_at,
        }
    }
}
