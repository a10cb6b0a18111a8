use crate::models::{
    Asset, AssetAssignment, AssetHistory, Branch, Department, Notification, Organization, Token,
    User,
};
use mongodb::{
    bson::{doc, Document},
    options::{IndexOptions, TransactionOptions},
    Client as MongoClient, ClientSession, Collection, Database, IndexModel,
};
use service_core::error::AppError;
use std::time::Duration;

/// Upper bound on a multi-document transaction. Under lock contention the
/// operation fails fast instead of hanging; callers treat the resulting
/// error as retryable.
const TRANSACTION_MAX_COMMIT_TIME: Duration = Duration::from_secs(15);

/// Soft-delete visibility: merge the implicit `deleted = false` predicate
/// into a filter. Every read that should only see live rows goes through
/// this instead of repeating the condition at call sites.
pub fn not_deleted(mut filter: Document) -> Document {
    filter.insert("deleted", false);
    filter
}

/// Process-wide MongoDB handle. Cheap to clone; the underlying client pools
/// connections.
#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for asset-service");

        self.create_index(
            self.organizations(),
            doc! { "organizationName": 1, "deleted": 1 },
            "organization_name_lookup",
        )
        .await?;
        self.create_index(
            self.branches(),
            doc! { "companyId": 1, "deleted": 1 },
            "branch_company_lookup",
        )
        .await?;
        self.create_index(
            self.departments(),
            doc! { "branchId": 1, "departmentName": 1, "deleted": 1 },
            "department_branch_name_lookup",
        )
        .await?;
        self.create_index(
            self.users(),
            doc! { "email": 1, "deleted": 1 },
            "user_email_lookup",
        )
        .await?;
        self.create_index(
            self.users(),
            doc! { "phone": 1, "deleted": 1 },
            "user_phone_lookup",
        )
        .await?;
        self.create_index(
            self.users(),
            doc! { "departmentId": 1, "deleted": 1 },
            "user_department_lookup",
        )
        .await?;
        self.create_index(
            self.assets(),
            doc! { "uniqueId": 1, "deleted": 1 },
            "asset_unique_id_lookup",
        )
        .await?;
        self.create_index(
            self.assets(),
            doc! { "departmentId": 1, "deleted": 1 },
            "asset_department_lookup",
        )
        .await?;
        self.create_index(
            self.assignments(),
            doc! { "assetId": 1, "status": 1, "deleted": 1 },
            "assignment_asset_status_lookup",
        )
        .await?;
        self.create_index(
            self.histories(),
            doc! { "assetId": 1, "deleted": 1 },
            "history_asset_lookup",
        )
        .await?;
        self.create_index(
            self.notifications(),
            doc! { "userId": 1, "deleted": 1 },
            "notification_user_lookup",
        )
        .await?;
        self.create_index(self.tokens(), doc! { "token": 1 }, "token_lookup")
            .await?;

        Ok(())
    }

    async fn create_index<T>(
        &self,
        collection: Collection<T>,
        keys: Document,
        name: &str,
    ) -> Result<(), AppError> {
        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().name(name.to_string()).build())
            .build();

        collection.create_index(index, None).await.map_err(|e| {
            tracing::error!(
                "Failed to create index {} on {}: {}",
                name,
                collection.name(),
                e
            );
            AppError::from(e)
        })?;
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    /// Open a session with an already-started transaction carrying the
    /// explicit time bound.
    pub async fn start_transaction(&self) -> Result<ClientSession, AppError> {
        let mut session = self.client.start_session(None).await?;
        let options = TransactionOptions::builder()
            .max_commit_time(TRANSACTION_MAX_COMMIT_TIME)
            .build();
        session.start_transaction(options).await?;
        Ok(session)
    }

    pub fn organizations(&self) -> Collection<Organization> {
        self.db.collection("organizations")
    }

    pub fn branches(&self) -> Collection<Branch> {
        self.db.collection("branches")
    }

    pub fn departments(&self) -> Collection<Department> {
        self.db.collection("departments")
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }

    pub fn assets(&self) -> Collection<Asset> {
        self.db.collection("assets")
    }

    pub fn assignments(&self) -> Collection<AssetAssignment> {
        self.db.collection("asset_assignments")
    }

    pub fn histories(&self) -> Collection<AssetHistory> {
        self.db.collection("asset_histories")
    }

    pub fn notifications(&self) -> Collection<Notification> {
        self.db.collection("notifications")
    }

    pub fn tokens(&self) -> Collection<Token> {
        self.db.collection("tokens")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_deleted_merges_predicate() {
        let filter = not_deleted(doc! { "companyId": "c1" });
        assert_eq!(filter.get_bool("deleted").unwrap(), false);
        assert_eq!(filter.get_str("companyId").unwrap(), "c1");
    }

    #[test]
    fn test_not_deleted_overrides_existing_flag() {
        let filter = not_deleted(doc! { "deleted": true });
        assert_eq!(filter.get_bool("deleted").unwrap(), false);
    }
}
