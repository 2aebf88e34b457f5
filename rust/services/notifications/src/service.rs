use crate::{directory::UserDirectory, inbox::InboxStore};
use amqp_utils::{NotificationMessage, UserDeleted, UserLoginChanged};
use api_utils::Validate;
use bson::oid::ObjectId;
use cache_utils::ByteCache;
use db_utils::schemas::inbox::{Inbox, Notification};
use std::sync::Arc;

/// How long an inbox is remembered as existing.
pub const KNOWN_INBOX_TTL_SECS: u64 = 3600;

fn known_key(id: &ObjectId) -> String {
    format!("inbox:{}", id.to_hex())
}

fn unix_now() -> u32 {
    u32::try_from(chrono::Utc::now().timestamp()).unwrap_or(u32::MAX)
}

/// Materialises events into inboxes. Every handler logs its failures and
/// returns; re-running a handler with the same event leaves the store as the
/// first run did.
pub struct NotificationService {
    inboxes: Arc<dyn InboxStore>,
    directory: Arc<dyn UserDirectory>,
    known: Arc<ByteCache>,
    clock: fn() -> u32,
}

impl NotificationService {
    pub fn new(
        inboxes: Arc<dyn InboxStore>,
        directory: Arc<dyn UserDirectory>,
        known: Arc<ByteCache>,
    ) -> Self {
        Self {
            inboxes,
            directory,
            known,
            clock: unix_now,
        }
    }

    /// Replaces the unix-seconds clock used for `sended`.
    pub fn with_clock(mut self, clock: fn() -> u32) -> Self {
        self.clock = clock;
        self
    }

    pub async fn send_notification(&self, msg: NotificationMessage) {
        if let Err(err) = msg.validate() {
            log::warn!("ignoring invalid notification: {}", err.messages.join("; "));
            return;
        }
        let Ok(id) = ObjectId::parse_str(&msg.userid) else {
            return;
        };
        let key = known_key(&id);

        if self.known.get(&key).is_none() && !self.ensure_inbox(id, &msg.userid).await {
            return;
        }

        let notification = Notification::new(msg.content, msg.kind, (self.clock)());
        match self.inboxes.push_front(id, notification).await {
            Ok(true) => {
                log::debug!("notification stored for {}", msg.userid);
                if let Err(err) = self.known.set(&key, b"1", KNOWN_INBOX_TTL_SECS) {
                    log::warn!("failed to remember inbox {}: {err}", msg.userid);
                }
            }
            Ok(false) => {
                // the inbox went away after it was remembered
                self.known.delete(&key);
                log::warn!("inbox of {} vanished, notification dropped", msg.userid);
            }
            Err(err) => log::error!("failed to store notification for {}: {err}", msg.userid),
        }
    }

    /// Creates the inbox when it does not exist. Returns false when the
    /// notification has to be dropped.
    async fn ensure_inbox(&self, id: ObjectId, userid: &str) -> bool {
        match self.inboxes.exists(id).await {
            Ok(true) => return true,
            Ok(false) => {}
            Err(err) => {
                log::error!("failed to look up inbox of {userid}: {err}");
                return false;
            }
        }

        let login = match self.directory.login_of(userid).await {
            Ok(login) => login,
            Err(err) => {
                log::error!("failed to read login of {userid}: {err}");
                return false;
            }
        };

        match self.inboxes.create(Inbox::new(id, login)).await {
            Ok(()) => {
                log::info!("created inbox for {userid}");
                true
            }
            Err(err) => {
                log::error!("failed to create inbox for {userid}: {err}");
                false
            }
        }
    }

    pub async fn on_user_deleted(&self, event: UserDeleted) {
        if let Err(err) = event.validate() {
            log::warn!("ignoring invalid user deletion: {}", err.messages.join("; "));
            return;
        }
        let Ok(id) = ObjectId::parse_str(&event.0) else {
            return;
        };

        self.known.delete(&known_key(&id));
        match self.inboxes.delete(id).await {
            Ok(true) => log::info!("deleted inbox of {}", event.0),
            Ok(false) => log::debug!("no inbox to delete for {}", event.0),
            Err(err) => log::error!("failed to delete inbox of {}: {err}", event.0),
        }
    }

    pub async fn on_user_login_changed(&self, event: UserLoginChanged) {
        if let Err(err) = event.validate() {
            log::warn!("ignoring invalid login change: {}", err.messages.join("; "));
            return;
        }
        let Ok(id) = ObjectId::parse_str(&event.userid) else {
            return;
        };

        match self.inboxes.update_login(id, &event.newlogin).await {
            Ok(true) => log::info!("inbox of {} renamed to {}", event.userid, event.newlogin),
            Ok(false) => log::debug!("no inbox to rename for {}", event.userid),
            Err(err) => log::error!("failed to rename inbox of {}: {err}", event.userid),
        }
    }
}
