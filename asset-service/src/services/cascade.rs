//! Cascading soft-delete plumbing shared by the entity services.
//!
//! Deleting a parent entity flips `deleted = true` on every descendant in
//! the ownership hierarchy (Organization → Branch → Department →
//! User/Asset → Assignment/History/Notification). The descendant set is
//! gathered with plain reads first; the flag flips happen inside one
//! transaction so a failed cascade never leaves a partial one behind.

use super::database::{not_deleted, MongoDb};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::ClientSession;
use service_core::error::AppError;

/// Every id the cascade will touch, grouped per collection.
#[derive(Debug, Default)]
pub(crate) struct CascadeSet {
    pub organization_ids: Vec<String>,
    pub branch_ids: Vec<String>,
    pub department_ids: Vec<String>,
    pub user_ids: Vec<String>,
    pub asset_ids: Vec<String>,
}

impl CascadeSet {
    /// Descendants of a batch of organizations.
    pub(crate) async fn for_organizations(
        db: &MongoDb,
        organization_ids: Vec<String>,
    ) -> Result<Self, AppError> {
        let mut set = CascadeSet {
            organization_ids,
            ..Default::default()
        };

        let mut branches = db
            .branches()
            .find(
                not_deleted(doc! { "companyId": { "$in": set.organization_ids.to_vec() } }),
                None,
            )
            .await?;
        while let Some(branch) = branches.try_next().await? {
            set.branch_ids.push(branch.id);
        }

        set.extend_below_branches(db).await?;
        Ok(set)
    }

    /// Descendants of a batch of branches.
    pub(crate) async fn for_branches(
        db: &MongoDb,
        branch_ids: Vec<String>,
    ) -> Result<Self, AppError> {
        let mut set = CascadeSet {
            branch_ids,
            ..Default::default()
        };
        set.extend_below_branches(db).await?;
        Ok(set)
    }

    /// Descendants of a batch of departments.
    pub(crate) async fn for_departments(
        db: &MongoDb,
        department_ids: Vec<String>,
    ) -> Result<Self, AppError> {
        let mut set = CascadeSet {
            department_ids,
            ..Default::default()
        };
        set.extend_below_departments(db).await?;
        Ok(set)
    }

    pub(crate) fn for_users(user_ids: Vec<String>) -> Self {
        CascadeSet {
            user_ids,
            ..Default::default()
        }
    }

    pub(crate) fn for_assets(asset_ids: Vec<String>) -> Self {
        CascadeSet {
            asset_ids,
            ..Default::default()
        }
    }

    async fn extend_below_branches(&mut self, db: &MongoDb) -> Result<(), AppError> {
        let mut departments = db
            .departments()
            .find(
                not_deleted(doc! { "branchId": { "$in": self.branch_ids.to_vec() } }),
                None,
            )
            .await?;
        while let Some(department) = departments.try_next().await? {
            self.department_ids.push(department.id);
        }
        self.extend_below_departments(db).await
    }

    async fn extend_below_departments(&mut self, db: &MongoDb) -> Result<(), AppError> {
        let mut users = db
            .users()
            .find(
                not_deleted(doc! { "departmentId": { "$in": self.department_ids.to_vec() } }),
                None,
            )
            .await?;
        while let Some(user) = users.try_next().await? {
            self.user_ids.push(user.id);
        }

        let mut assets = db
            .assets()
            .find(
                not_deleted(doc! { "departmentId": { "$in": self.department_ids.to_vec() } }),
                None,
            )
            .await?;
        while let Some(asset) = assets.try_next().await? {
            self.asset_ids.push(asset.id);
        }
        Ok(())
    }
}

/// Run a full cascade in its own transaction: apply, then commit, aborting
/// on any failure so no partial cascade is left behind.
pub(crate) async fn run(db: &MongoDb, set: &CascadeSet) -> Result<(), AppError> {
    let mut session = db.start_transaction().await?;
    if let Err(e) = apply(db, &mut session, set).await {
        session.abort_transaction().await.ok();
        return Err(e);
    }
    session.commit_transaction().await?;
    Ok(())
}

/// Flip `deleted` on every row in the set, inside the caller's transaction.
pub(crate) async fn apply(
    db: &MongoDb,
    session: &mut ClientSession,
    set: &CascadeSet,
) -> Result<(), AppError> {
    let now = mongodb::bson::DateTime::from_chrono(Utc::now());
    let tombstone = doc! { "$set": { "deleted": true, "deletedAt": now, "updatedAt": now } };

    db.organizations()
        .update_many_with_session(
            doc! { "_id": { "$in": set.organization_ids.to_vec() } },
            tombstone.clone(),
            None,
            session,
        )
        .await?;

    db.branches()
        .update_many_with_session(
            doc! { "_id": { "$in": set.branch_ids.to_vec() } },
            tombstone.clone(),
            None,
            session,
        )
        .await?;

    db.departments()
        .update_many_with_session(
            doc! { "_id": { "$in": set.department_ids.to_vec() } },
            tombstone.clone(),
            None,
            session,
        )
        .await?;

    db.users()
        .update_many_with_session(
            doc! { "_id": { "$in": set.user_ids.to_vec() } },
            tombstone.clone(),
            None,
            session,
        )
        .await?;

    db.assets()
        .update_many_with_session(
            doc! { "_id": { "$in": set.asset_ids.to_vec() } },
            tombstone.clone(),
            None,
            session,
        )
        .await?;

    db.assignments()
        .update_many_with_session(
            doc! { "$or": [
                { "assetId": { "$in": set.asset_ids.to_vec() } },
                { "userId": { "$in": set.user_ids.to_vec() } },
            ] },
            tombstone.clone(),
            None,
            session,
        )
        .await?;

    db.histories()
        .update_many_with_session(
            doc! { "$or": [
                { "assetId": { "$in": set.asset_ids.to_vec() } },
                { "userId": { "$in": set.user_ids.to_vec() } },
            ] },
            tombstone.clone(),
            None,
            session,
        )
        .await?;

    db.notifications()
        .update_many_with_session(
            doc! { "userId": { "$in": set.user_ids.to_vec() } },
            tombstone,
            None,
            session,
        )
        .await?;

    // Assets that remain live but were assigned to a user the cascade is
    // removing become available again, keeping the mirror consistent.
    db.assets()
        .update_many_with_session(
            doc! {
                "assignedToUserId": { "$in": set.user_ids.to_vec() },
                "_id": { "$nin": set.asset_ids.to_vec() },
            },
            doc! { "$set": {
                "status": "ACTIVE",
                "assignedToUserId": null,
                "updatedAt": now,
            } },
            None,
            session,
        )
        .await?;

    Ok(())
}
