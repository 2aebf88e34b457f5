#[cfg(test)]
mod tests {
    use crate::{
        receivers::{LoginChangedConsumer, NotificationSendConsumer, UserDeletedConsumer},
        tests::{test_context, FIXED_TIME, USER_ID},
    };
    use amqp_utils::{
        receiver::consume_deliveries, NotificationMessage, UserDeleted, UserLoginChanged,
    };
    use bson::{doc, oid::ObjectId, Timestamp};
    use futures::stream;
    use std::sync::Arc;

    fn deliveries(bodies: &[&str]) -> stream::Iter<std::vec::IntoIter<Result<Vec<u8>, String>>> {
        let bodies: Vec<Result<Vec<u8>, String>> =
            bodies.iter().map(|body| Ok(body.as_bytes().to_vec())).collect();
        stream::iter(bodies)
    }

    #[tokio::test]
    async fn should_materialise_published_notification() {
        let ctx = test_context();
        let consumer = Arc::new(NotificationSendConsumer(ctx.service.clone()));

        consume_deliveries::<NotificationMessage, _, _>(
            deliveries(&[r#"{"userid":"57bf425a34ce5ee85891b914","content":"hi","type":"info"}"#]),
            || true,
            consumer,
        )
        .await;

        let id = ObjectId::parse_str(USER_ID).unwrap();
        let inbox = ctx.store.snapshot().remove(&id).unwrap();
        assert_eq!(
            bson::to_document(&inbox).unwrap(),
            doc! {
                "_id": id,
                "login": "username",
                "notifications": [{
                    "sended": Timestamp { time: FIXED_TIME, increment: 0 },
                    "content": "hi",
                    "type": "info",
                }],
            }
        );
    }

    #[tokio::test]
    async fn should_tolerate_repeated_user_deletion() {
        let ctx = test_context();
        ctx.service
            .send_notification(NotificationMessage {
                userid: USER_ID.to_string(),
                content: "hi".to_string(),
                kind: Default::default(),
            })
            .await;
        let consumer = Arc::new(UserDeletedConsumer(ctx.service.clone()));

        let body = format!(r#""{USER_ID}""#);
        consume_deliveries::<UserDeleted, _, _>(
            deliveries(&[body.as_str(), body.as_str()]),
            || true,
            consumer,
        )
        .await;

        assert!(ctx.store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn should_drop_malformed_login_change() {
        let ctx = test_context();
        ctx.service
            .send_notification(NotificationMessage {
                userid: USER_ID.to_string(),
                content: "hi".to_string(),
                kind: Default::default(),
            })
            .await;
        let consumer = Arc::new(LoginChangedConsumer(ctx.service.clone()));

        consume_deliveries::<UserLoginChanged, _, _>(
            deliveries(&[
                r#"{"userid":"57bf425a34ce5ee85891b914"}"#,
                r#"{"userid":"57bf425a34ce5ee85891b914","newlogin":"renamed"}"#,
            ]),
            || true,
            consumer,
        )
        .await;

        let id = ObjectId::parse_str(USER_ID).unwrap();
        assert_eq!(ctx.store.snapshot()[&id].login, "renamed");
    }
}
