#[cfg(test)]
mod tests {
    use crate::types::{
        Event, NotificationMessage, NotificationType, UserDeleted, UserLoginChanged,
        CONTENT_TYPE_JSON, CONTENT_TYPE_TEXT,
    };
    use api_utils::Validate;
    use std::str::FromStr;

    const USER_ID: &str = "57bf425a34ce5ee85891b914";

    #[test]
    fn should_use_fixed_topologies() {
        assert_eq!(UserLoginChanged::TOPOLOGY.exchange, "UserLoginChangedExchange");
        assert_eq!(UserLoginChanged::TOPOLOGY.queue, "UserLoginChangedQueue");
        assert_eq!(UserLoginChanged::TOPOLOGY.content_type, CONTENT_TYPE_JSON);
        assert_eq!(UserDeleted::TOPOLOGY.exchange, "UserDeletedExchange");
        assert_eq!(UserDeleted::TOPOLOGY.queue, "UserDeletedQueue");
        assert_eq!(UserDeleted::TOPOLOGY.content_type, CONTENT_TYPE_TEXT);
        assert_eq!(NotificationMessage::TOPOLOGY.exchange, "notifications_exchange");
        assert_eq!(NotificationMessage::TOPOLOGY.queue, "NotificationReceiverQuery");
        assert_eq!(NotificationMessage::TOPOLOGY.content_type, CONTENT_TYPE_JSON);
    }

    #[test]
    fn should_encode_wire_bodies_exactly() {
        let login_changed = UserLoginChanged {
            userid: USER_ID.to_string(),
            newlogin: "reader".to_string(),
        };
        assert_eq!(
            String::from_utf8(login_changed.encode().unwrap()).unwrap(),
            r#"{"userid":"57bf425a34ce5ee85891b914","newlogin":"reader"}"#
        );

        let deleted = UserDeleted(USER_ID.to_string());
        assert_eq!(
            String::from_utf8(deleted.encode().unwrap()).unwrap(),
            r#""57bf425a34ce5ee85891b914""#
        );

        let notification = NotificationMessage {
            userid: USER_ID.to_string(),
            content: "hi".to_string(),
            kind: NotificationType::Security,
        };
        assert_eq!(
            String::from_utf8(notification.encode().unwrap()).unwrap(),
            r#"{"userid":"57bf425a34ce5ee85891b914","content":"hi","type":"security"}"#
        );
    }

    #[test]
    fn should_reject_unknown_notification_type() {
        let body = br#"{"userid":"57bf425a34ce5ee85891b914","content":"hi","type":"loud"}"#;
        let err = NotificationMessage::decode(body).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn should_parse_notification_type_names() {
        assert_eq!(NotificationType::from_str("warn").unwrap(), NotificationType::Warn);
        assert_eq!(NotificationType::Info.as_ref(), "info");
        assert!(NotificationType::from_str("Loud").is_err());
    }

    #[test]
    fn should_validate_event_fields() {
        let err = NotificationMessage {
            userid: "nope".to_string(),
            content: String::new(),
            kind: NotificationType::Info,
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            err.messages,
            vec![
                "userid: field must be a valid object id".to_string(),
                "content: field is required".to_string(),
            ]
        );

        assert!(UserLoginChanged {
            userid: USER_ID.to_string(),
            newlogin: String::new(),
        }
        .validate()
        .is_err());
        assert!(UserDeleted(USER_ID.to_string()).validate().is_ok());
    }
}
