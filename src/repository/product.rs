use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::{
    domain::product::{
        CategorySummary, NewProduct as DomainNewProduct, Product as DomainProduct,
        ProductListQuery, UpdateProduct as DomainUpdateProduct,
    },
    models::category::Category as DbCategory,
    models::product::{
        NewProduct as DbNewProduct, Product as DbProduct, ProductCategory as DbProductCategory,
        UpdateProduct as DbUpdateProduct,
    },
    repository::{DieselRepository, ProductReader, ProductWriter, RepositoryError, RepositoryResult},
};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .find(id)
            .select(DbProduct::as_select())
            .first::<DbProduct>(&mut conn)
            .optional()?;

        match product {
            Some(db_product) => Ok(Some(with_categories(&mut conn, db_product)?)),
            None => Ok(None),
        }
    }

    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<DomainProduct>> {
        use crate::schema::{product_categories, products};

        let mut conn = self.conn()?;

        let mut items = products::table
            .select(DbProduct::as_select())
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", escape_like(term.trim()));
            items = items.filter(
                products::name
                    .like(pattern.clone())
                    .escape('\\')
                    .or(products::description.like(pattern).escape('\\')),
            );
        }

        if let Some(category_id) = query.category_id {
            items = items.filter(
                products::id.eq_any(
                    product_categories::table
                        .filter(product_categories::category_id.eq(category_id))
                        .select(product_categories::product_id),
                ),
            );
        }

        let db_products = items
            .order((products::created_at.desc(), products::id.desc()))
            .load::<DbProduct>(&mut conn)?;

        if db_products.is_empty() {
            return Ok(Vec::new());
        }

        let product_ids: Vec<i32> = db_products.iter().map(|product| product.id).collect();
        let mut category_map = load_categories_for_products(&mut conn, &product_ids)?;

        Ok(db_products
            .into_iter()
            .map(|db_product| {
                let categories = category_map.remove(&db_product.id).unwrap_or_default();
                db_product.into_domain(categories)
            })
            .collect())
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_new = DbNewProduct::from(new_product);

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let created = diesel::insert_into(products::table)
                .values(&db_new)
                .returning(DbProduct::as_returning())
                .get_result::<DbProduct>(conn)?;

            replace_product_categories(conn, created.id, &new_product.category_ids)?;
            with_categories(conn, created)
        })
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateProduct::from(updates);

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let updated = diesel::update(products::table.find(product_id))
                .set(&db_updates)
                .returning(DbProduct::as_returning())
                .get_result::<DbProduct>(conn)?;

            replace_product_categories(conn, updated.id, &updates.category_ids)?;
            with_categories(conn, updated)
        })
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        use crate::schema::{order_items, product_categories, products};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let exists = products::table
                .find(product_id)
                .select(products::id)
                .first::<i32>(conn)
                .optional()?;
            if exists.is_none() {
                return Err(RepositoryError::NotFound);
            }

            let referenced = order_items::table
                .filter(order_items::product_id.eq(product_id))
                .count()
                .get_result::<i64>(conn)?;
            if referenced > 0 {
                return Err(RepositoryError::ProductInUse(product_id));
            }

            diesel::delete(
                product_categories::table.filter(product_categories::product_id.eq(product_id)),
            )
            .execute(conn)?;
            diesel::delete(products::table.find(product_id)).execute(conn)?;

            Ok(())
        })
    }
}

fn with_categories(
    conn: &mut SqliteConnection,
    db_product: DbProduct,
) -> RepositoryResult<DomainProduct> {
    let mut categories = load_categories_for_products(conn, &[db_product.id])?;
    let own = categories.remove(&db_product.id).unwrap_or_default();
    Ok(db_product.into_domain(own))
}

fn replace_product_categories(
    conn: &mut SqliteConnection,
    product_id: i32,
    category_ids: &[i32],
) -> RepositoryResult<()> {
    use crate::schema::product_categories;

    diesel::delete(product_categories::table.filter(product_categories::product_id.eq(product_id)))
        .execute(conn)?;

    let mut links: Vec<DbProductCategory> = Vec::with_capacity(category_ids.len());
    for &category_id in category_ids {
        if links.iter().all(|link| link.category_id != category_id) {
            links.push(DbProductCategory {
                product_id,
                category_id,
            });
        }
    }

    if !links.is_empty() {
        diesel::insert_into(product_categories::table)
            .values(&links)
            .execute(conn)?;
    }

    Ok(())
}

fn load_categories_for_products(
    conn: &mut SqliteConnection,
    product_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<CategorySummary>>> {
    use crate::schema::{categories, product_categories};

    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = product_categories::table
        .inner_join(categories::table)
        .filter(product_categories::product_id.eq_any(product_ids))
        .order(categories::name.asc())
        .select((product_categories::product_id, DbCategory::as_select()))
        .load::<(i32, DbCategory)>(conn)?;

    let mut map: HashMap<i32, Vec<CategorySummary>> = HashMap::new();
    for (product_id, category) in rows {
        map.entry(product_id).or_default().push(category.into());
    }

    Ok(map)
}

/// Escape `LIKE` wildcards so the term matches literally under `ESCAPE '\'`.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escape_like_quotes_wildcards() {
        assert_eq!(escape_like("100% roses"), "100\\% roses");
        assert_eq!(escape_like("lily_white"), "lily\\_white");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("Rose Bouquet"), "Rose Bouquet");
    }
}
