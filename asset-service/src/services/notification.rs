use super::database::{not_deleted, MongoDb};
use super::{find_page, Page};
use crate::models::Notification;
use crate::query::{ListOptions, ResolvedQuery};
use mongodb::bson::doc;
use service_core::error::AppError;

pub async fn create_user_notification(
    db: &MongoDb,
    user_id: &str,
    message: String,
) -> Result<Notification, AppError> {
    let notification = Notification::new(user_id.to_string(), message);
    db.notifications().insert_one(&notification, None).await?;
    Ok(notification)
}

pub async fn get_user_notifications(
    db: &MongoDb,
    user_id: &str,
    options: &ListOptions,
) -> Result<Page<Notification>, AppError> {
    let query = ResolvedQuery::resolve(options, "createdAt");
    let filter = not_deleted(doc! { "userId": user_id });
    find_page(&db.notifications(), filter, query).await
}

pub async fn mark_notification_read(db: &MongoDb, id: &str) -> Result<(), AppError> {
    let updated = db
        .notifications()
        .update_one(
            not_deleted(doc! { "_id": id }),
            doc! { "$set": { "read": true } },
            None,
        )
        .await?;
    if updated.matched_count == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Notification not found")));
    }
    Ok(())
}
