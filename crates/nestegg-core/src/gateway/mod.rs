//! Session/Sync Gateway
//!
//! Everything that talks to the finance API or to local storage:
//!
//! - [`ApiClient`] - REST calls (records, login/register, profile)
//! - [`LocalStore`] - drafts kept while logged out, plus the offline mirror
//! - [`Session`] / [`SessionStore`] - the explicit auth session
//! - [`RecordBook`] - a view's in-memory record list, routing mutations to
//!   the server when logged in and to local drafts otherwise

pub mod api;
pub mod book;
pub mod local;
pub mod session;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Origin, Record, RecordId};

pub use api::{ApiClient, RemoteStore};
pub use book::{RecordBook, SyncReport};
pub use local::{next_local_id, LocalStore};
pub use session::{Session, SessionStore};

/// Where a kind of record is listed and mutated
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Origin tag carried by records from this store
    fn origin(&self) -> Origin;

    async fn list(&self) -> Result<Vec<R>>;

    async fn create(&self, draft: &R::Draft) -> Result<R>;

    async fn update(&self, id: &RecordId, draft: &R::Draft) -> Result<R>;

    async fn delete(&self, id: &RecordId) -> Result<()>;
}
