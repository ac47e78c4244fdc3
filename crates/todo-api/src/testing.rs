//! In-memory stand-ins for the AWS-backed stores, keyed the same way the
//! table is, plus a forged-token helper.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use domain::{TodoItem, TodoUpdate};
use infrastructure::{ItemStore, StoreError, UploadUrlSigner};

#[derive(Default)]
pub struct InMemoryItemStore {
    rows: Mutex<HashMap<(String, String), TodoItem>>,
}

impl InMemoryItemStore {
    pub fn row(&self, user_id: &str, todo_id: &str) -> Option<TodoItem> {
        self.rows
            .lock()
            .unwrap()
            .get(&(user_id.to_string(), todo_id.to_string()))
            .cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn items_for_user(&self, user_id: &str) -> Result<Vec<TodoItem>, StoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .filter(|item| item.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn put(&self, item: &TodoItem) -> Result<(), StoreError> {
        self.rows
            .lock()
            .unwrap()
            .insert((item.user_id.clone(), item.todo_id.clone()), item.clone());
        Ok(())
    }

    async fn update(
        &self,
        update: &TodoUpdate,
        todo_id: &str,
        user_id: &str,
    ) -> Result<TodoUpdate, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        // Like the real store, an update against an absent key upserts a
        // partial row rather than failing.
        let row = rows
            .entry((user_id.to_string(), todo_id.to_string()))
            .or_insert_with(|| TodoItem {
                user_id: user_id.to_string(),
                todo_id: todo_id.to_string(),
                name: String::new(),
                due_date: None,
                done: false,
                created_at: String::new(),
                attachment_url: String::new(),
            });

        row.name = update.name.clone();
        row.due_date = update.due_date.clone();
        row.done = update.done;

        Ok(TodoUpdate {
            name: row.name.clone(),
            due_date: row.due_date.clone(),
            done: row.done,
        })
    }

    async fn delete(&self, todo_id: &str, user_id: &str) -> Result<(), StoreError> {
        self.rows
            .lock()
            .unwrap()
            .remove(&(user_id.to_string(), todo_id.to_string()));
        Ok(())
    }

    async fn get(&self, todo_id: &str, user_id: &str) -> Result<Option<TodoItem>, StoreError> {
        Ok(self.row(user_id, todo_id))
    }
}

pub struct StaticUrlSigner {
    bucket_name: String,
}

impl StaticUrlSigner {
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
        }
    }
}

#[async_trait]
impl UploadUrlSigner for StaticUrlSigner {
    async fn upload_url(&self, key: &str) -> Result<String, StoreError> {
        Ok(format!(
            "https://{}.s3.amazonaws.com/{}?X-Amz-Expires=1000",
            self.bucket_name, key
        ))
    }
}

/// A structurally valid JWT carrying `sub`; the signature is junk, which is
/// fine because identity extraction never verifies it.
pub fn token_for(user_id: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{user_id}"}}"#));
    format!("{header}.{payload}.sig")
}
