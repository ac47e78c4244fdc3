use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use domain::{TodoItem, TodoUpdate};
use shared::Config;
use tracing::debug;

use crate::dynamodb::dynamodb_client;
use crate::error::StoreError;
use crate::models;

/// Persistence operations the application layer depends on, one per request
/// the service handles. Each implementation call is a single round trip to
/// the store (listing may page internally).
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Every item owned by `user_id`, in store-native order.
    async fn items_for_user(&self, user_id: &str) -> Result<Vec<TodoItem>, StoreError>;

    /// Unconditional upsert of a fully populated item.
    async fn put(&self, item: &TodoItem) -> Result<(), StoreError>;

    /// Overwrites the mutable fields of the row at (`user_id`, `todo_id`)
    /// and returns the values as confirmed by the store. Absent rows are
    /// not an error.
    async fn update(
        &self,
        update: &TodoUpdate,
        todo_id: &str,
        user_id: &str,
    ) -> Result<TodoUpdate, StoreError>;

    /// Unconditional delete by key; deleting an absent row succeeds.
    async fn delete(&self, todo_id: &str, user_id: &str) -> Result<(), StoreError>;

    /// Single-row lookup, `None` when the key does not exist.
    async fn get(&self, todo_id: &str, user_id: &str) -> Result<Option<TodoItem>, StoreError>;
}

#[derive(Clone)]
pub struct DynamoItemStore {
    client: Client,
    table_name: String,
}

impl DynamoItemStore {
    pub fn new(aws_config: &aws_config::SdkConfig, config: &Config) -> Self {
        Self {
            client: dynamodb_client(aws_config, config),
            table_name: config.todos_table.clone(),
        }
    }
}

#[async_trait]
impl ItemStore for DynamoItemStore {
    async fn items_for_user(&self, user_id: &str) -> Result<Vec<TodoItem>, StoreError> {
        let mut items = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        // A tenant can outgrow a single response page; follow the
        // continuation key until the store reports exhaustion.
        loop {
            let result = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("userId = :userId")
                .expression_attribute_values(":userId", AttributeValue::S(user_id.to_string()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| StoreError::DynamoDb(e.to_string()))?;

            for attrs in result.items() {
                items.push(models::item_from_attrs(attrs)?);
            }

            match result.last_evaluated_key() {
                Some(key) => start_key = Some(key.clone()),
                None => break,
            }
        }

        debug!(user_id = %user_id, count = items.len(), "Fetched todo items");
        Ok(items)
    }

    async fn put(&self, item: &TodoItem) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(models::attrs_from_item(item)))
            .send()
            .await
            .map_err(|e| StoreError::DynamoDb(e.to_string()))?;

        debug!(todo_id = %item.todo_id, "Stored todo item");
        Ok(())
    }

    async fn update(
        &self,
        update: &TodoUpdate,
        todo_id: &str,
        user_id: &str,
    ) -> Result<TodoUpdate, StoreError> {
        // `name` collides with a DynamoDB reserved word, so the mutable
        // fields all go through expression aliases. A request without a due
        // date clears the stored attribute; the update always rewrites the
        // full triple.
        let expression = if update.due_date.is_some() {
            "SET #name = :name, #dueDate = :dueDate, #done = :done"
        } else {
            "SET #name = :name, #done = :done REMOVE #dueDate"
        };

        let mut request = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("userId", AttributeValue::S(user_id.to_string()))
            .key("todoId", AttributeValue::S(todo_id.to_string()))
            .update_expression(expression)
            .expression_attribute_names("#name", "name")
            .expression_attribute_names("#dueDate", "dueDate")
            .expression_attribute_names("#done", "done")
            .expression_attribute_values(":name", AttributeValue::S(update.name.clone()))
            .expression_attribute_values(":done", AttributeValue::Bool(update.done))
            .return_values(ReturnValue::AllNew);

        if let Some(due_date) = &update.due_date {
            request = request
                .expression_attribute_values(":dueDate", AttributeValue::S(due_date.clone()));
        }

        let result = request
            .send()
            .await
            .map_err(|e| StoreError::DynamoDb(e.to_string()))?;

        let attrs = result
            .attributes()
            .ok_or_else(|| StoreError::MalformedItem("attributes".to_string()))?;

        debug!(todo_id = %todo_id, "Updated todo item");
        models::update_from_attrs(attrs)
    }

    async fn delete(&self, todo_id: &str, user_id: &str) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("userId", AttributeValue::S(user_id.to_string()))
            .key("todoId", AttributeValue::S(todo_id.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::DynamoDb(e.to_string()))?;

        debug!(todo_id = %todo_id, "Deleted todo item");
        Ok(())
    }

    async fn get(&self, todo_id: &str, user_id: &str) -> Result<Option<TodoItem>, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("userId", AttributeValue::S(user_id.to_string()))
            .key("todoId", AttributeValue::S(todo_id.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::DynamoDb(e.to_string()))?;

        result
            .item
            .map(|attrs| models::item_from_attrs(&attrs))
            .transpose()
    }
}
