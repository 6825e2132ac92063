use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::category::Category;
use crate::forms::categories::CategoryForm;
use crate::repository::{CategoryReader, CategoryWriter};
use crate::services::{ServiceError, ServiceResult};

/// Lists every category with its product count.
pub fn list_categories<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.list_categories().map_err(ServiceError::from)
}

/// Loads a single category.
pub fn get_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    category_id: i32,
) -> ServiceResult<Category>
where
    R: CategoryReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    find_category(repo, category_id)
}

/// Creates a category whose name is not taken yet, ignoring case.
pub fn create_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CategoryForm,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_new_category()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if repo
        .get_category_by_name(&payload.name)
        .map_err(ServiceError::from)?
        .is_some()
    {
        return Err(duplicate_name(&payload.name));
    }

    repo.create_category(&payload).map_err(ServiceError::from)
}

/// Renames a category.
pub fn update_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    category_id: i32,
    form: CategoryForm,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let updates = form
        .into_update_category()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    find_category(repo, category_id)?;

    let taken_by_other = repo
        .get_category_by_name(&updates.name)
        .map_err(ServiceError::from)?
        .is_some_and(|existing| existing.id != category_id);
    if taken_by_other {
        return Err(duplicate_name(&updates.name));
    }

    repo.update_category(category_id, &updates)
        .map_err(ServiceError::from)
}

/// Detaches the category from its products and deletes it.
pub fn delete_category<R>(repo: &R, user: &AuthenticatedUser, category_id: i32) -> ServiceResult<()>
where
    R: CategoryWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_category(category_id).map_err(|err| match err {
        crate::repository::RepositoryError::NotFound => {
            ServiceError::NotFound(format!("category {category_id} not found"))
        }
        other => ServiceError::from(other),
    })
}

fn find_category<R>(repo: &R, category_id: i32) -> ServiceResult<Category>
where
    R: CategoryReader + ?Sized,
{
    repo.get_category_by_id(category_id)
        .map_err(ServiceError::from)?
        .ok_or_else(|| ServiceError::NotFound(format!("category {category_id} not found")))
}

fn duplicate_name(name: &str) -> ServiceError {
    ServiceError::Conflict(format!("category `{name}` already exists"))
}
