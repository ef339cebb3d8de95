use tracing::info;
use uuid::Uuid;

use super::repo::{Message, MessageFields};
use crate::{
    db::{self, Record},
    error::{AppError, AppResult},
    state::AppState,
    validate::{non_blank, Required},
};

pub async fn send(st: &AppState, fields: MessageFields) -> AppResult<Record<Message>> {
    let mut req = Required::default();
    let sender_name = req.take("senderName", non_blank(fields.sender_name));
    let subject = req.take("subject", non_blank(fields.subject));
    let message = req.take("message", non_blank(fields.message));
    req.finish()?;

    let msg = Message {
        sender_name,
        subject,
        message,
    };
    let record = db::insert(st.db.as_ref(), &msg).await?;
    info!(message_id = %record.id, "message received");
    Ok(record)
}

pub async fn update(st: &AppState, id: Uuid, fields: MessageFields) -> AppResult<Record<Message>> {
    let fields = MessageFields {
        sender_name: non_blank(fields.sender_name),
        subject: non_blank(fields.subject),
        message: non_blank(fields.message),
    };
    let record = db::update_by_id::<Message>(st.db.as_ref(), id, db::to_patch(&fields)?)
        .await?
        .ok_or(AppError::NotFound("Message"))?;
    info!(message_id = %id, "message updated");
    Ok(record)
}

pub async fn delete(st: &AppState, id: Uuid) -> AppResult<()> {
    if !db::delete_by_id::<Message>(st.db.as_ref(), id).await? {
        return Err(AppError::NotFound("Message"));
    }
    info!(message_id = %id, "message deleted");
    Ok(())
}

pub async fn get(st: &AppState, id: Uuid) -> AppResult<Record<Message>> {
    db::find_by_id::<Message>(st.db.as_ref(), id)
        .await?
        .ok_or(AppError::NotFound("Message"))
}

pub async fn list(st: &AppState) -> AppResult<Vec<Record<Message>>> {
    Ok(db::find_all::<Message>(st.db.as_ref()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestApp;

    fn hello() -> MessageFields {
        MessageFields {
            sender_name: Some("Ada".into()),
            subject: Some("Hello".into()),
            message: Some("Nice portfolio".into()),
        }
    }

    #[tokio::test]
    async fn send_stores_camel_case_document() {
        let app = TestApp::new();
        let sent = send(&app.state, hello()).await.unwrap();

        let raw = app.store.raw("messages", sent.id).unwrap();
        assert_eq!(raw["senderName"], "Ada");
        assert_eq!(get(&app.state, sent.id).await.unwrap().data.message, "Nice portfolio");
    }

    #[tokio::test]
    async fn send_lists_every_missing_field() {
        let app = TestApp::new();
        let err = send(&app.state, MessageFields::default()).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::MissingField(ref n) if n == &vec!["senderName", "subject", "message"]
        ));
        assert_eq!(app.store.writes(), 0);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let app = TestApp::new();
        let sent = send(&app.state, hello()).await.unwrap();

        let updated = update(
            &app.state,
            sent.id,
            MessageFields {
                subject: Some("Hi".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.data.subject, "Hi");
        assert_eq!(updated.data.sender_name, "Ada");

        delete(&app.state, sent.id).await.unwrap();
        assert!(list(&app.state).await.unwrap().is_empty());
        assert!(matches!(delete(&app.state, sent.id).await, Err(AppError::NotFound(_))));
    }
}
