use std::sync::Arc;

use chrono::Utc;
use domain::{CreateTodoRequest, TodoItem, TodoUpdate};
use infrastructure::{ItemStore, UploadUrlSigner};
use shared::auth;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;

/// Application logic over the storage layer: derives the caller's identity
/// from the bearer token, owns item defaults, and issues one storage
/// operation per call.
#[derive(Clone)]
pub struct TodoApp {
    store: Arc<dyn ItemStore>,
    signer: Arc<dyn UploadUrlSigner>,
    bucket_name: String,
}

fn attachment_url(bucket_name: &str, todo_id: &str) -> String {
    format!("https://{bucket_name}.s3.amazonaws.com/{todo_id}")
}

impl TodoApp {
    pub fn new(
        store: Arc<dyn ItemStore>,
        signer: Arc<dyn UploadUrlSigner>,
        bucket_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            signer,
            bucket_name: bucket_name.into(),
        }
    }

    pub async fn list_items(&self, token: &str) -> Result<Vec<TodoItem>, ApiError> {
        let user_id = auth::parse_user_id(token)?;
        Ok(self.store.items_for_user(&user_id).await?)
    }

    pub async fn create_item(
        &self,
        request: CreateTodoRequest,
        token: &str,
    ) -> Result<TodoItem, ApiError> {
        let user_id = auth::parse_user_id(token)?;

        if request.name.trim().is_empty() {
            return Err(ApiError::BadRequest("Name cannot be empty".to_string()));
        }

        let todo_id = Uuid::new_v4().to_string();
        let attachment_url = attachment_url(&self.bucket_name, &todo_id);
        let item = TodoItem {
            user_id,
            todo_id,
            name: request.name,
            due_date: request.due_date,
            done: false,
            created_at: Utc::now().to_rfc3339(),
            attachment_url,
        };

        self.store.put(&item).await?;
        info!(todo_id = %item.todo_id, "Created todo item");
        Ok(item)
    }

    /// Rewrites the mutable triple of the addressed row. The identity from
    /// the token forms half the key, so a foreign `todo_id` addresses a row
    /// in the caller's own partition and upserts there instead of touching
    /// anyone else's data.
    pub async fn update_item(
        &self,
        request: TodoUpdate,
        todo_id: &str,
        token: &str,
    ) -> Result<TodoUpdate, ApiError> {
        let user_id = auth::parse_user_id(token)?;
        Ok(self.store.update(&request, todo_id, &user_id).await?)
    }

    pub async fn delete_item(&self, todo_id: &str, token: &str) -> Result<(), ApiError> {
        let user_id = auth::parse_user_id(token)?;
        self.store.delete(todo_id, &user_id).await?;
        Ok(())
    }

    pub async fn issue_upload_url(&self, todo_id: &str, token: &str) -> Result<String, ApiError> {
        let user_id = auth::parse_user_id(token)?;

        // Presigning is only offered for items the caller owns.
        if self.store.get(todo_id, &user_id).await?.is_none() {
            return Err(ApiError::NotFound);
        }

        Ok(self.signer.upload_url(todo_id).await?)
    }
}
