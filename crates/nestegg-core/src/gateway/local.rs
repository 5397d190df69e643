//! Local storage: drafts kept while logged out, and the offline mirror
//!
//! Layout under the data directory:
//!
//! ```text
//! drafts/transactions.json   records created while logged out
//! drafts/savings.json
//! mirror/transactions.json   last list fetched from the server
//! mirror/savings.json
//! ```
//!
//! Drafts are never merged into the server automatically; see
//! [`RecordBook::upload_local_drafts`](super::RecordBook::upload_local_drafts).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::models::{Origin, Record, RecordId, Resource};

use super::RecordStore;

static LAST_LOCAL_ID: AtomicI64 = AtomicI64::new(0);

/// Next local id: the current time in milliseconds, bumped so ids are
/// strictly increasing within the process.
pub fn next_local_id() -> RecordId {
    let now = Utc::now().timestamp_millis();
    let prev = match LAST_LOCAL_ID.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
        Some(now.max(last + 1))
    }) {
        Ok(prev) | Err(prev) => prev,
    };
    RecordId::new(now.max(prev + 1).to_string())
}

/// Write `value` as pretty JSON, replacing `path` atomically
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| Error::Config(format!("Invalid storage path: {}", path.display())))?;
    fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut file, value)?;
    file.write_all(b"\n")?;
    file.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            root: data_dir.to_path_buf(),
        }
    }

    pub fn drafts_path(&self, resource: Resource) -> PathBuf {
        self.root
            .join("drafts")
            .join(format!("{}.json", resource.path()))
    }

    pub fn mirror_path(&self, resource: Resource) -> PathBuf {
        self.root
            .join("mirror")
            .join(format!("{}.json", resource.path()))
    }

    fn read_list<R: Record>(path: &Path) -> Result<Vec<R>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Records created while logged out
    pub fn list_drafts<R: Record>(&self) -> Result<Vec<R>> {
        Self::read_list(&self.drafts_path(R::RESOURCE))
    }

    fn save_drafts<R: Record>(&self, records: &[R]) -> Result<()> {
        write_json_atomic(&self.drafts_path(R::RESOURCE), records)
    }

    pub fn create_draft<R: Record>(&self, draft: &R::Draft) -> Result<R> {
        let mut records: Vec<R> = self.list_drafts()?;
        let mut id = next_local_id();
        while records.iter().any(|r| r.id() == &id) {
            id = next_local_id();
        }

        let record = R::from_draft(id, Origin::Local, draft.clone());
        records.push(record.clone());
        self.save_drafts(&records)?;
        tracing::debug!(resource = %R::RESOURCE, id = %record.id(), "Saved local draft");
        Ok(record)
    }

    pub fn update_draft<R: Record>(&self, id: &RecordId, draft: &R::Draft) -> Result<R> {
        let mut records: Vec<R> = self.list_drafts()?;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| Error::NotFound(format!("{} {}", R::RESOURCE.label(), id)))?;

        *slot = R::from_draft(id.clone(), Origin::Local, draft.clone());
        let updated = slot.clone();
        self.save_drafts(&records)?;
        Ok(updated)
    }

    pub fn delete_draft<R: Record>(&self, id: &RecordId) -> Result<()> {
        let mut records: Vec<R> = self.list_drafts()?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Err(Error::NotFound(format!("{} {}", R::RESOURCE.label(), id)));
        }
        self.save_drafts(&records)
    }

    /// Best-effort copy of a fetched list for offline display.
    ///
    /// Failures are logged and otherwise ignored.
    pub fn mirror_locally<R: Record>(&self, records: &[R]) {
        let path = self.mirror_path(R::RESOURCE);
        match write_json_atomic(&path, records) {
            Ok(()) => tracing::debug!(
                resource = %R::RESOURCE,
                count = records.len(),
                "Mirrored records locally"
            ),
            Err(e) => tracing::warn!(
                resource = %R::RESOURCE,
                path = %path.display(),
                error = %e,
                "Failed to mirror records locally"
            ),
        }
    }

    /// The last mirrored list, empty if nothing was mirrored yet
    pub fn load_mirror<R: Record>(&self) -> Result<Vec<R>> {
        Self::read_list(&self.mirror_path(R::RESOURCE))
    }

    /// Forget every mirrored list. Drafts are kept.
    pub fn clear_mirror(&self) -> Result<()> {
        match fs::remove_dir_all(self.root.join("mirror")) {
            Ok(()) => {
                tracing::debug!("Cleared offline mirror");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for LocalStore {
    fn origin(&self) -> Origin {
        Origin::Local
    }

    async fn list(&self) -> Result<Vec<R>> {
        self.list_drafts()
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        self.create_draft(draft)
    }

    async fn update(&self, id: &RecordId, draft: &R::Draft) -> Result<R> {
        self.update_draft(id, draft)
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        self.delete_draft::<R>(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Transaction, TransactionDraft, TransactionType};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn draft(description: &str, amount: i64) -> TransactionDraft {
        TransactionDraft {
            description: description.to_string(),
            amount: Decimal::from(amount),
            kind: TransactionType::Expense,
            category: "food".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
        }
    }

    #[test]
    fn test_local_ids_strictly_increase() {
        let ids: Vec<i64> = (0..50)
            .map(|_| next_local_id().as_str().parse().unwrap())
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_draft_lifecycle() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path());
        assert!(store.list_drafts::<Transaction>().unwrap().is_empty());

        let created: Transaction = store.create_draft(&draft("groceries", 120)).unwrap();
        assert_eq!(created.origin, Origin::Local);
        assert_eq!(created.to_draft(), draft("groceries", 120));

        let updated: Transaction = store
            .update_draft(&created.id, &draft("groceries", 150))
            .unwrap();
        assert_eq!(updated.id, created.id);

        let listed: Vec<Transaction> = store.list_drafts().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].amount, Decimal::from(150));
        assert_eq!(listed[0].origin, Origin::Local);

        store.delete_draft::<Transaction>(&created.id).unwrap();
        assert!(store.list_drafts::<Transaction>().unwrap().is_empty());
    }

    #[test]
    fn test_missing_draft_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path());
        let id = RecordId::new("1700000000000");

        let err = store
            .update_draft::<Transaction>(&id, &draft("x", 1))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        let err = store.delete_draft::<Transaction>(&id).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_mirror_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path());
        let records = vec![Transaction::from_draft(
            RecordId::new("64f1c2"),
            Origin::Remote,
            draft("rent", 4000),
        )];

        store.mirror_locally(&records);
        let mirrored: Vec<Transaction> = store.load_mirror().unwrap();
        assert_eq!(mirrored, records);
    }

    #[test]
    fn test_mirror_failure_is_swallowed() {
        let dir = TempDir::new().unwrap();
        // A file where the mirror directory should be
        fs::write(dir.path().join("mirror"), "not a directory").unwrap();
        let store = LocalStore::new(dir.path());

        store.mirror_locally::<Transaction>(&[]);
        assert!(store.load_mirror::<Transaction>().unwrap().is_empty());
    }

    #[test]
    fn test_clear_mirror_keeps_drafts() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path());
        store.create_draft::<Transaction>(&draft("coffee", 12)).unwrap();
        store.mirror_locally(&[Transaction::from_draft(
            RecordId::new("64f1c2"),
            Origin::Remote,
            draft("rent", 4000),
        )]);

        store.clear_mirror().unwrap();
        assert!(store.load_mirror::<Transaction>().unwrap().is_empty());
        assert_eq!(store.list_drafts::<Transaction>().unwrap().len(), 1);

        // Nothing left to clear
        store.clear_mirror().unwrap();
    }
}
