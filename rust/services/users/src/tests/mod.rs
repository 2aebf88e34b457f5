
use crate::{service::UserService, store::UserStore};
use amqp_utils::{AmqpError, EventSender, Publisher, Topology};
use api_utils::ApiError;
use async_trait::async_trait;
use bson::oid::ObjectId;
use db_utils::schemas::user::User;
use std::sync::{Arc, Mutex};

/// Lowest cost bcrypt accepts; keeps hashing fast in tests.
pub const TEST_BCRYPT_COST: u32 = 4;

#[derive(Default)]
pub struct MemoryUserStore {
    pub users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, ApiError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|user| user.login == login).cloned())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, ApiError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|user| user.id == Some(id)).cloned())
    }

    async fn insert(&self, mut user: User) -> Result<ObjectId, ApiError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|existing| existing.login == user.login) {
            return Err(ApiError::conflict("login is already taken"));
        }
        let id = ObjectId::new();
        user.id = Some(id);
        users.push(user);
        Ok(id)
    }

    async fn update_login(&self, id: ObjectId, login: &str) -> Result<bool, ApiError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|user| user.id == Some(id)) {
            Some(user) => {
                user.login = login.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, ApiError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|user| user.id != Some(id));
        Ok(users.len() < before)
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    pub published: Mutex<Vec<(Topology, String)>>,
    pub fail: bool,
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, topology: &Topology, body: Vec<u8>) -> Result<(), AmqpError> {
        if self.fail {
            return Err(AmqpError::Timeout {
                exchange: topology.exchange.to_string(),
                timeout: std::time::Duration::from_secs(5),
            });
        }
        let body = String::from_utf8(body).unwrap();
        self.published.lock().unwrap().push((*topology, body));
        Ok(())
    }
}

pub struct TestContext {
    pub service: Arc<UserService>,
    pub store: Arc<MemoryUserStore>,
    pub publisher: Arc<RecordingPublisher>,
}

pub fn test_context_with(publisher: RecordingPublisher) -> TestContext {
    let store = Arc::new(MemoryUserStore::default());
    let publisher = Arc::new(publisher);
    let service = Arc::new(UserService::new(
        store.clone(),
        EventSender::with_publisher(publisher.clone()),
        TEST_BCRYPT_COST,
    ));
    TestContext {
        service,
        store,
        publisher,
    }
}

pub fn test_context() -> TestContext {
    test_context_with(RecordingPublisher::default())
}
