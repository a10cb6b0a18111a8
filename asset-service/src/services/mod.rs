pub mod asset;
pub mod assignment;
pub mod auth;
pub mod branch;
pub mod cascade;
pub mod database;
pub mod department;
pub mod email;
pub mod history;
pub mod jwt;
pub mod notification;
pub mod organization;
pub mod user;

pub use auth::AuthService;
pub use database::{not_deleted, MongoDb};
pub use email::{EmailProvider, EmailService, MockEmailService};
pub use jwt::{AccessTokenClaims, JwtService, RefreshTokenClaims, TokenResponse};

use crate::query::ResolvedQuery;
use futures::TryStreamExt;
use mongodb::bson::Document;
use mongodb::Collection;
use serde::de::DeserializeOwned;
use service_core::error::AppError;

/// One page of a listing query together with the plan that produced it.
#[derive(Debug)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Count for the same filter, unbounded by pagination.
    pub total: u64,
    pub query: ResolvedQuery,
}

/// Run a listing query: the find and the count for the same predicate run
/// in parallel.
pub(crate) async fn find_page<T>(
    collection: &Collection<T>,
    filter: Document,
    query: ResolvedQuery,
) -> Result<Page<T>, AppError>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    let count_fut = collection.count_documents(filter.clone(), None);
    let find_fut = collection.find(filter, query.find_options());
    let (total, mut cursor) = futures::try_join!(count_fut, find_fut)?;

    let mut data = Vec::new();
    while let Some(item) = cursor.try_next().await? {
        data.push(item);
    }

    Ok(Page { data, total, query })
}

/// "1 active branch" / "3 active branches", as used in blocking-dependent
/// rejection messages.
pub(crate) fn count_phrase(count: u64, noun: &str) -> String {
    if count == 1 {
        format!("1 active {}", noun)
    } else {
        format!("{} active {}s", count, noun)
    }
}
