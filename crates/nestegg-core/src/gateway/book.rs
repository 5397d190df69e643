//! In-memory record list for one view

use crate::error::{Error, Result};
use crate::models::{Origin, Record, RecordId};

use super::{ApiClient, LocalStore, RecordStore, RemoteStore, Session};

/// Outcome of [`RecordBook::upload_local_drafts`]
#[derive(Debug)]
pub struct SyncReport<R> {
    /// Server copies of the drafts that were accepted
    pub uploaded: Vec<R>,
    /// Drafts that stayed local, with the reason
    pub failed: Vec<(RecordId, Error)>,
    /// Drafts the server accepted but that could not be removed locally.
    /// They are still in `uploaded`; another sync would send them again.
    pub uncleared: Vec<(RecordId, Error)>,
}

impl<R> SyncReport<R> {
    pub fn is_empty(&self) -> bool {
        self.uploaded.is_empty() && self.failed.is_empty() && self.uncleared.is_empty()
    }
}

impl<R> Default for SyncReport<R> {
    fn default() -> Self {
        Self {
            uploaded: Vec::new(),
            failed: Vec::new(),
            uncleared: Vec::new(),
        }
    }
}

/// The record list behind a view.
///
/// Every mutation goes to the server when the session is logged in and to
/// the local draft store otherwise. The list changes only after the store
/// call succeeds; on failure it is left as it was. Any auth error clears
/// the session.
pub struct RecordBook<R: Record> {
    client: ApiClient,
    local: LocalStore,
    records: Vec<R>,
}

impl<R: Record> RecordBook<R> {
    pub fn new(client: ApiClient, local: LocalStore) -> Self {
        Self {
            client,
            local,
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: &RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn store(&self, session: &Session) -> Box<dyn RecordStore<R>> {
        match session.token() {
            Some(token) => Box::new(RemoteStore::new(self.client.clone(), token)),
            None => Box::new(self.local.clone()),
        }
    }

    /// Reload the list.
    ///
    /// Remote lists are mirrored locally. When the server cannot be reached
    /// the last mirror is shown instead and the network error is still
    /// returned; any other failure empties the list.
    pub async fn refresh(&mut self, session: &mut Session) -> Result<()> {
        let store = self.store(session);
        match store.list().await {
            Ok(records) => {
                if store.origin() == Origin::Remote {
                    self.local.mirror_locally(&records);
                }
                self.records = records;
                Ok(())
            }
            Err(e) => {
                session.clear_on_auth_error(&e);
                self.records = match &e {
                    Error::Network(_) if store.origin() == Origin::Remote => {
                        self.local.load_mirror().unwrap_or_else(|err| {
                            tracing::warn!(error = %err, "Failed to read local mirror");
                            Vec::new()
                        })
                    }
                    _ => Vec::new(),
                };
                Err(e)
            }
        }
    }

    /// Create a record and append it once the store acknowledges it
    pub async fn add(&mut self, session: &mut Session, draft: &R::Draft) -> Result<R> {
        let result = self.store(session).create(draft).await;
        match result {
            Ok(record) => {
                self.records.push(record.clone());
                Ok(record)
            }
            Err(e) => {
                session.clear_on_auth_error(&e);
                Err(e)
            }
        }
    }

    /// Replace the record with `id`
    pub async fn edit(
        &mut self,
        session: &mut Session,
        id: &RecordId,
        draft: &R::Draft,
    ) -> Result<R> {
        let result = self.store(session).update(id, draft).await;
        match result {
            Ok(record) => {
                match self.records.iter_mut().find(|r| r.id() == id) {
                    Some(slot) => *slot = record.clone(),
                    None => self.records.push(record.clone()),
                }
                Ok(record)
            }
            Err(e) => {
                session.clear_on_auth_error(&e);
                Err(e)
            }
        }
    }

    pub async fn remove(&mut self, session: &mut Session, id: &RecordId) -> Result<()> {
        let result = self.store(session).delete(id).await;
        match result {
            Ok(()) => {
                self.records.retain(|r| r.id() != id);
                Ok(())
            }
            Err(e) => {
                session.clear_on_auth_error(&e);
                Err(e)
            }
        }
    }

    /// Push drafts saved while logged out to the server, one at a time.
    ///
    /// Each accepted draft is removed from local storage and appended to
    /// the list. Drafts the server rejects stay local and are reported. An
    /// auth error stops the upload and clears the session.
    pub async fn upload_local_drafts(&mut self, session: &mut Session) -> Result<SyncReport<R>> {
        let local = self.local.clone();
        self.upload_drafts_from(session, &local).await
    }

    async fn upload_drafts_from(
        &mut self,
        session: &mut Session,
        drafts: &dyn RecordStore<R>,
    ) -> Result<SyncReport<R>> {
        let token = session.bearer()?.to_string();
        let pending = drafts.list().await?;
        let mut report = SyncReport::default();

        for draft in pending {
            match self.client.create_remote::<R>(&draft.to_draft(), &token).await {
                Ok(created) => {
                    if let Err(e) = drafts.delete(draft.id()).await {
                        tracing::warn!(
                            id = %draft.id(),
                            error = %e,
                            "Uploaded draft could not be removed locally"
                        );
                        report.uncleared.push((draft.id().clone(), e));
                    }
                    self.records.push(created.clone());
                    report.uploaded.push(created);
                }
                Err(e) if e.is_auth() => {
                    session.clear_on_auth_error(&e);
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!(id = %draft.id(), error = %e, "Draft upload failed");
                    report.failed.push((draft.id().clone(), e));
                }
            }
        }

        tracing::info!(
            resource = %R::RESOURCE,
            uploaded = report.uploaded.len(),
            failed = report.failed.len(),
            uncleared = report.uncleared.len(),
            "Local drafts uploaded"
        );
        Ok(report)
    }
}
