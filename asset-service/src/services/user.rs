use super::cascade::{self, CascadeSet};
use super::database::{not_deleted, MongoDb};
use super::{find_page, Page};
use crate::dtos::users::{CreateUserRequest, UpdateUserRequest, UserListParams};
use crate::models::{User, UserStatus};
use crate::query::{with_search, ListOptions, ResolvedQuery};
use crate::utils::password::{hash_password, Password};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::doc;
use service_core::error::AppError;

/// Uniqueness check for a user field among live rows, always excluding the
/// user being updated when there is one.
async fn field_taken(
    db: &MongoDb,
    field: &str,
    value: &str,
    exclude_user_id: Option<&str>,
) -> Result<bool, AppError> {
    let mut filter = not_deleted(doc! { field: value });
    if let Some(id) = exclude_user_id {
        filter.insert("_id", doc! { "$ne": id });
    }
    Ok(db.users().find_one(filter, None).await?.is_some())
}

pub async fn create_user(db: &MongoDb, payload: CreateUserRequest) -> Result<User, AppError> {
    let department = db
        .departments()
        .find_one(not_deleted(doc! { "_id": &payload.department_id }), None)
        .await?;
    if department.is_none() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Department does not exist"
        )));
    }

    if field_taken(db, "email", &payload.email, None).await? {
        return Err(AppError::Conflict(anyhow::anyhow!("Email already in use")));
    }
    if field_taken(db, "phone", &payload.phone, None).await? {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Phone number already in use"
        )));
    }

    let password_hash = hash_password(&Password::new(payload.password))?;
    let user = User::new(
        payload.user_name,
        payload.email,
        payload.phone,
        password_hash,
        payload.user_role,
        payload.branch_id,
        payload.department_id,
        payload.company_id,
    );
    db.users().insert_one(&user, None).await?;

    tracing::info!(user_id = %user.id, "User created");
    Ok(user)
}

pub async fn query_users(db: &MongoDb, params: &UserListParams) -> Result<Page<User>, AppError> {
    let options = params.list_options();
    let query = ResolvedQuery::resolve(&options, "createdAt");

    let mut filter = not_deleted(doc! {});
    if let Some(status) = params.status {
        filter.insert("status", mongodb::bson::to_bson(&status)?);
    }
    if let Some(branch_id) = &params.branch_id {
        filter.insert("branchId", branch_id);
    }
    if let Some(department_id) = &params.department_id {
        filter.insert("departmentId", department_id);
    }

    let filter = with_search(filter, &["userName", "email"], options.search_term());
    find_page(&db.users(), filter, query).await
}

pub async fn get_users_by_department_id(
    db: &MongoDb,
    department_id: &str,
    options: &ListOptions,
) -> Result<Page<User>, AppError> {
    let query = ResolvedQuery::resolve(options, "createdAt");
    let filter = with_search(
        not_deleted(doc! { "departmentId": department_id }),
        &["userName", "email"],
        options.search_term(),
    );
    find_page(&db.users(), filter, query).await
}

pub async fn get_user_by_id(db: &MongoDb, id: &str) -> Result<User, AppError> {
    db.users()
        .find_one(not_deleted(doc! { "_id": id }), None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))
}

pub async fn get_user_by_email(db: &MongoDb, email: &str) -> Result<Option<User>, AppError> {
    Ok(db
        .users()
        .find_one(not_deleted(doc! { "email": email }), None)
        .await?)
}

pub async fn update_user_by_id(
    db: &MongoDb,
    id: &str,
    payload: UpdateUserRequest,
) -> Result<User, AppError> {
    let current = get_user_by_id(db, id).await?;

    let mut set = doc! { "updatedAt": Utc::now() };
    if let Some(email) = payload.email {
        if email != current.email && field_taken(db, "email", &email, Some(id)).await? {
            return Err(AppError::Conflict(anyhow::anyhow!("Email already in use")));
        }
        set.insert("email", email);
    }
    if let Some(phone) = payload.phone {
        if phone != current.phone && field_taken(db, "phone", &phone, Some(id)).await? {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Phone number already in use"
            )));
        }
        set.insert("phone", phone);
    }
    if let Some(user_name) = payload.user_name {
        set.insert("userName", user_name);
    }
    if let Some(user_role) = payload.user_role {
        set.insert("userRole", mongodb::bson::to_bson(&user_role)?);
    }
    if let Some(status) = payload.status {
        set.insert("status", mongodb::bson::to_bson(&status)?);
    }
    if let Some(password) = payload.password {
        set.insert("passwordHash", hash_password(&Password::new(password))?);
    }

    db.users()
        .update_one(doc! { "_id": id }, doc! { "$set": set }, None)
        .await?;

    get_user_by_id(db, id).await
}

pub async fn delete_user_by_id(db: &MongoDb, id: &str) -> Result<(), AppError> {
    let user = db
        .users()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;
    if user.deleted {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "User is already deleted"
        )));
    }

    let set = CascadeSet::for_users(vec![id.to_string()]);
    cascade::run(db, &set).await?;

    tracing::info!(user_id = %id, "User soft-deleted");
    Ok(())
}

pub async fn delete_users_by_ids(db: &MongoDb, ids: &[String]) -> Result<(), AppError> {
    let mut found = Vec::new();
    let mut cursor = db
        .users()
        .find(doc! { "_id": { "$in": ids.to_vec() } }, None)
        .await?;
    while let Some(user) = cursor.try_next().await? {
        found.push(user);
    }

    let missing: Vec<&str> = ids
        .iter()
        .filter(|id| !found.iter().any(|u| &u.id == *id))
        .map(|s| s.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Users not found: {}",
            missing.join(", ")
        )));
    }

    let already_deleted: Vec<&str> = found
        .iter()
        .filter(|u| u.deleted)
        .map(|u| u.id.as_str())
        .collect();
    if !already_deleted.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Users already deleted: {}",
            already_deleted.join(", ")
        )));
    }

    let set = CascadeSet::for_users(ids.to_vec());
    cascade::run(db, &set).await?;

    tracing::info!(count = ids.len(), "Users soft-deleted");
    Ok(())
}

/// Users eligible to receive an assignment.
pub async fn get_assignable_users(
    db: &MongoDb,
    options: &ListOptions,
) -> Result<Page<User>, AppError> {
    let query = ResolvedQuery::resolve(options, "createdAt");
    let filter = with_search(
        not_deleted(doc! { "status": mongodb::bson::to_bson(&UserStatus::Active)? }),
        &["userName", "email"],
        options.search_term(),
    );
    find_page(&db.users(), filter, query).await
}
