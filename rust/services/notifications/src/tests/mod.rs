mod receivers;

use crate::{directory::UserDirectory, inbox::InboxStore, service::NotificationService};
use api_utils::ApiError;
use async_trait::async_trait;
use bson::oid::ObjectId;
use cache_utils::ByteCache;
use db_utils::{
    schemas::inbox::{Inbox, Notification},
    DbError,
};
use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

pub const USER_ID: &str = "57bf425a34ce5ee85891b914";
pub const FIXED_TIME: u32 = 1_700_000_000;

#[derive(Default)]
pub struct MemoryInboxStore {
    pub inboxes: Mutex<BTreeMap<ObjectId, Inbox>>,
    pub exists_calls: AtomicUsize,
}

impl MemoryInboxStore {
    pub fn snapshot(&self) -> BTreeMap<ObjectId, Inbox> {
        self.inboxes.lock().unwrap().clone()
    }
}

#[async_trait]
impl InboxStore for MemoryInboxStore {
    async fn exists(&self, id: ObjectId) -> Result<bool, DbError> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.inboxes.lock().unwrap().contains_key(&id))
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Inbox>, DbError> {
        Ok(self.inboxes.lock().unwrap().get(&id).cloned())
    }

    async fn create(&self, inbox: Inbox) -> Result<(), DbError> {
        self.inboxes.lock().unwrap().entry(inbox.id).or_insert(inbox);
        Ok(())
    }

    async fn push_front(
        &self,
        id: ObjectId,
        notification: Notification,
    ) -> Result<bool, DbError> {
        match self.inboxes.lock().unwrap().get_mut(&id) {
            Some(inbox) => {
                inbox.notifications.insert(0, notification);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_login(&self, id: ObjectId, login: &str) -> Result<bool, DbError> {
        match self.inboxes.lock().unwrap().get_mut(&id) {
            Some(inbox) => {
                inbox.login = login.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, DbError> {
        Ok(self.inboxes.lock().unwrap().remove(&id).is_some())
    }
}

/// Answers every lookup with a fixed login, or fails when `login` is None.
pub struct FakeDirectory {
    pub login: Option<String>,
    pub calls: AtomicUsize,
}

impl FakeDirectory {
    pub fn answering(login: &str) -> Self {
        Self {
            login: Some(login.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            login: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl UserDirectory for FakeDirectory {
    async fn login_of(&self, _user_id: &str) -> Result<String, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.login
            .clone()
            .ok_or_else(|| ApiError::internal("user service unavailable"))
    }
}

pub struct TestContext {
    pub service: Arc<NotificationService>,
    pub store: Arc<MemoryInboxStore>,
    pub directory: Arc<FakeDirectory>,
    pub known: Arc<ByteCache>,
}

pub fn test_context_with(directory: FakeDirectory) -> TestContext {
    let store = Arc::new(MemoryInboxStore::default());
    let directory = Arc::new(directory);
    let known = Arc::new(ByteCache::new(1024 * 1024));
    let service = Arc::new(
        NotificationService::new(store.clone(), directory.clone(), known.clone())
            .with_clock(|| FIXED_TIME),
    );
    TestContext {
        service,
        store,
        directory,
        known,
    }
}

pub fn test_context() -> TestContext {
    test_context_with(FakeDirectory::answering("username"))
}
