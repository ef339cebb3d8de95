use anyhow::Context;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Raw row of the `documents` table.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub body: Value,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Collection-oriented persistence used by every record service.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: &str, body: Value) -> anyhow::Result<DocumentRow>;
    async fn find_all(&self, collection: &str) -> anyhow::Result<Vec<DocumentRow>>;
    async fn find_by_id(&self, collection: &str, id: Uuid) -> anyhow::Result<Option<DocumentRow>>;
    async fn find_one_by(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> anyhow::Result<Option<DocumentRow>>;
    /// Merges `patch` into the top level of the stored body. Keys absent from
    /// `patch` keep their value; `null` values overwrite.
    async fn update_by_id(
        &self,
        collection: &str,
        id: Uuid,
        patch: Map<String, Value>,
    ) -> anyhow::Result<Option<DocumentRow>>;
    async fn delete_by_id(&self, collection: &str, id: Uuid) -> anyhow::Result<bool>;
    async fn ping(&self) -> anyhow::Result<()>;
    async fn close(&self);
}

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: &str, body: Value) -> anyhow::Result<DocumentRow> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            INSERT INTO documents (id, collection, body)
            VALUES ($1, $2, $3)
            RETURNING id, body, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(collection)
        .bind(body)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("insert into {}", collection))?;
        Ok(row)
    }

    async fn find_all(&self, collection: &str) -> anyhow::Result<Vec<DocumentRow>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, body, created_at, updated_at
              FROM documents
             WHERE collection = $1
             ORDER BY created_at ASC
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("list {}", collection))?;
        Ok(rows)
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> anyhow::Result<Option<DocumentRow>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, body, created_at, updated_at
              FROM documents
             WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("find {} by id", collection))?;
        Ok(row)
    }

    async fn find_one_by(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> anyhow::Result<Option<DocumentRow>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, body, created_at, updated_at
              FROM documents
             WHERE collection = $1 AND body ->> $2 = $3
             ORDER BY created_at ASC
             LIMIT 1
            "#,
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("find {} by {}", collection, field))?;
        Ok(row)
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: Uuid,
        patch: Map<String, Value>,
    ) -> anyhow::Result<Option<DocumentRow>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            UPDATE documents
               SET body = body || $3, updated_at = now()
             WHERE collection = $1 AND id = $2
            RETURNING id, body, created_at, updated_at
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Value::Object(patch))
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("update {}", collection))?;
        Ok(row)
    }

    async fn delete_by_id(&self, collection: &str, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("delete from {}", collection))?;
        Ok(res.rows_affected() > 0)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("ping database")?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

// ---- Typed access ----

/// A record type stored in its own collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;
}

/// A stored document together with its identity and timestamps.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<T> {
    pub id: Uuid,
    #[serde(flatten)]
    pub data: T,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl<T: Document> TryFrom<DocumentRow> for Record<T> {
    type Error = anyhow::Error;

    fn try_from(row: DocumentRow) -> anyhow::Result<Self> {
        let data = serde_json::from_value(row.body)
            .with_context(|| format!("decode {} document {}", T::COLLECTION, row.id))?;
        Ok(Self {
            id: row.id,
            data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub async fn insert<T: Document>(db: &dyn DocumentStore, doc: &T) -> anyhow::Result<Record<T>> {
    let body = serde_json::to_value(doc).context("encode document")?;
    db.insert(T::COLLECTION, body).await?.try_into()
}

pub async fn find_all<T: Document>(db: &dyn DocumentStore) -> anyhow::Result<Vec<Record<T>>> {
    db.find_all(T::COLLECTION)
        .await?
        .into_iter()
        .map(Record::try_from)
        .collect()
}

pub async fn find_by_id<T: Document>(
    db: &dyn DocumentStore,
    id: Uuid,
) -> anyhow::Result<Option<Record<T>>> {
    db.find_by_id(T::COLLECTION, id)
        .await?
        .map(Record::try_from)
        .transpose()
}

pub async fn find_one_by<T: Document>(
    db: &dyn DocumentStore,
    field: &str,
    value: &str,
) -> anyhow::Result<Option<Record<T>>> {
    db.find_one_by(T::COLLECTION, field, value)
        .await?
        .map(Record::try_from)
        .transpose()
}

pub async fn update_by_id<T: Document>(
    db: &dyn DocumentStore,
    id: Uuid,
    patch: Map<String, Value>,
) -> anyhow::Result<Option<Record<T>>> {
    db.update_by_id(T::COLLECTION, id, patch)
        .await?
        .map(Record::try_from)
        .transpose()
}

pub async fn delete_by_id<T: Document>(db: &dyn DocumentStore, id: Uuid) -> anyhow::Result<bool> {
    db.delete_by_id(T::COLLECTION, id).await
}

/// Serializes a partial-update struct into a merge patch. Fields serialized
/// as absent (`skip_serializing_if`) are left out.
pub fn to_patch<P: Serialize>(patch: &P) -> anyhow::Result<Map<String, Value>> {
    match serde_json::to_value(patch).context("encode patch")? {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("patch must be an object, got {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Note {
        title: String,
        body: Option<String>,
    }

    impl Document for Note {
        const COLLECTION: &'static str = "notes";
    }

    #[derive(Serialize)]
    struct NotePatch {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    }

    #[tokio::test]
    async fn update_merges_only_present_keys() {
        let db = MemoryStore::default();
        let created = insert(
            &db,
            &Note {
                title: "a".into(),
                body: Some("keep me".into()),
            },
        )
        .await
        .unwrap();

        let patch = to_patch(&NotePatch {
            title: Some("b".into()),
        })
        .unwrap();
        let updated = update_by_id::<Note>(&db, created.id, patch)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.data.title, "b");
        assert_eq!(updated.data.body.as_deref(), Some("keep me"));
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn empty_patch_serializes_to_empty_map() {
        let patch = to_patch(&NotePatch { title: None }).unwrap();
        assert!(patch.is_empty());
    }

    #[tokio::test]
    async fn find_and_delete_respect_collection() {
        let db = MemoryStore::default();
        let note = insert(&db, &Note { title: "x".into(), body: None }).await.unwrap();

        assert!(db.find_by_id("other", note.id).await.unwrap().is_none());
        assert!(find_by_id::<Note>(&db, note.id).await.unwrap().is_some());
        assert!(find_one_by::<Note>(&db, "title", "x").await.unwrap().is_some());

        assert!(delete_by_id::<Note>(&db, note.id).await.unwrap());
        assert!(!delete_by_id::<Note>(&db, note.id).await.unwrap());
        assert!(find_all::<Note>(&db).await.unwrap().is_empty());
    }

    #[test]
    fn record_serializes_flat_with_camel_case_timestamps() {
        let rec = Record {
            id: Uuid::nil(),
            data: Note { title: "t".into(), body: None },
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["title"], "t");
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00Z");
        assert!(json.get("data").is_none());
    }
}
