use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::{
    domain::category::{
        Category as DomainCategory, NewCategory as DomainNewCategory,
        UpdateCategory as DomainUpdateCategory,
    },
    models::category::{
        Category as DbCategory, NewCategory as DbNewCategory, UpdateCategory as DbUpdateCategory,
    },
    repository::{
        CategoryReader, CategoryWriter, DieselRepository, RepositoryError, RepositoryResult,
    },
};

impl CategoryReader for DieselRepository {
    fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<DomainCategory>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let category = categories::table
            .find(id)
            .select(DbCategory::as_select())
            .first::<DbCategory>(&mut conn)
            .optional()?;

        match category {
            Some(category) => Ok(Some(with_product_count(&mut conn, category)?)),
            None => Ok(None),
        }
    }

    fn get_category_by_name(&self, name: &str) -> RepositoryResult<Option<DomainCategory>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        // The column is declared COLLATE NOCASE, so equality ignores case.
        let category = categories::table
            .filter(categories::name.eq(name))
            .select(DbCategory::as_select())
            .first::<DbCategory>(&mut conn)
            .optional()?;

        match category {
            Some(category) => Ok(Some(with_product_count(&mut conn, category)?)),
            None => Ok(None),
        }
    }

    fn list_categories(&self) -> RepositoryResult<Vec<DomainCategory>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let rows = categories::table
            .order(categories::name.asc())
            .select(DbCategory::as_select())
            .load::<DbCategory>(&mut conn)?;

        let ids: Vec<i32> = rows.iter().map(|category| category.id).collect();
        let counts = product_counts(&mut conn, &ids)?;

        Ok(rows
            .into_iter()
            .map(|category| {
                let count = counts.get(&category.id).copied().unwrap_or_default();
                category.into_domain(count)
            })
            .collect())
    }

    fn existing_category_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<i32>> {
        use crate::schema::categories;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let found = categories::table
            .filter(categories::id.eq_any(ids))
            .select(categories::id)
            .load::<i32>(&mut conn)?;

        Ok(found)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(
        &self,
        new_category: &DomainNewCategory,
    ) -> RepositoryResult<DomainCategory> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_new = DbNewCategory::from(new_category);

        let created = diesel::insert_into(categories::table)
            .values(&db_new)
            .returning(DbCategory::as_returning())
            .get_result::<DbCategory>(&mut conn)?;

        Ok(created.into_domain(0))
    }

    fn update_category(
        &self,
        category_id: i32,
        updates: &DomainUpdateCategory,
    ) -> RepositoryResult<DomainCategory> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateCategory::from(updates);

        let updated = diesel::update(categories::table.find(category_id))
            .set(&db_updates)
            .returning(DbCategory::as_returning())
            .get_result::<DbCategory>(&mut conn)?;

        with_product_count(&mut conn, updated)
    }

    fn delete_category(&self, category_id: i32) -> RepositoryResult<()> {
        use crate::schema::{categories, product_categories};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            diesel::delete(
                product_categories::table.filter(product_categories::category_id.eq(category_id)),
            )
            .execute(conn)?;

            let deleted = diesel::delete(categories::table.find(category_id)).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}

fn with_product_count(
    conn: &mut SqliteConnection,
    category: DbCategory,
) -> RepositoryResult<DomainCategory> {
    let counts = product_counts(conn, &[category.id])?;
    let count = counts.get(&category.id).copied().unwrap_or_default();
    Ok(category.into_domain(count))
}

fn product_counts(
    conn: &mut SqliteConnection,
    category_ids: &[i32],
) -> RepositoryResult<HashMap<i32, i64>> {
    use crate::schema::product_categories;

    if category_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = product_categories::table
        .filter(product_categories::category_id.eq_any(category_ids))
        .group_by(product_categories::category_id)
        .select((
            product_categories::category_id,
            diesel::dsl::count(product_categories::product_id),
        ))
        .load::<(i32, i64)>(conn)?;

    Ok(rows.into_iter().collect())
}
