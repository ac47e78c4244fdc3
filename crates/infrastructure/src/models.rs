use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use domain::{TodoItem, TodoUpdate};

use crate::error::StoreError;

// Attribute names are the stored schema and double as the JSON field names,
// so they stay camelCase.

pub fn attrs_from_item(item: &TodoItem) -> HashMap<String, AttributeValue> {
    let mut attrs = HashMap::new();
    attrs.insert("userId".to_string(), AttributeValue::S(item.user_id.clone()));
    attrs.insert("todoId".to_string(), AttributeValue::S(item.todo_id.clone()));
    attrs.insert("name".to_string(), AttributeValue::S(item.name.clone()));
    if let Some(due_date) = &item.due_date {
        attrs.insert("dueDate".to_string(), AttributeValue::S(due_date.clone()));
    }
    attrs.insert("done".to_string(), AttributeValue::Bool(item.done));
    attrs.insert(
        "createdAt".to_string(),
        AttributeValue::S(item.created_at.clone()),
    );
    attrs.insert(
        "attachmentUrl".to_string(),
        AttributeValue::S(item.attachment_url.clone()),
    );
    attrs
}

pub fn item_from_attrs(attrs: &HashMap<String, AttributeValue>) -> Result<TodoItem, StoreError> {
    Ok(TodoItem {
        user_id: get_string(attrs, "userId")?,
        todo_id: get_string(attrs, "todoId")?,
        name: get_string(attrs, "name")?,
        due_date: get_optional_string(attrs, "dueDate"),
        done: get_bool(attrs, "done")?,
        created_at: get_string(attrs, "createdAt")?,
        attachment_url: get_string(attrs, "attachmentUrl")?,
    })
}

pub fn update_from_attrs(
    attrs: &HashMap<String, AttributeValue>,
) -> Result<TodoUpdate, StoreError> {
    Ok(TodoUpdate {
        name: get_string(attrs, "name")?,
        due_date: get_optional_string(attrs, "dueDate"),
        done: get_bool(attrs, "done")?,
    })
}

fn get_string(
    attrs: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<String, StoreError> {
    attrs
        .get(key)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| StoreError::MalformedItem(key.to_string()))
}

fn get_optional_string(attrs: &HashMap<String, AttributeValue>, key: &str) -> Option<String> {
    attrs.get(key).and_then(|v| v.as_s().ok()).cloned()
}

fn get_bool(attrs: &HashMap<String, AttributeValue>, key: &str) -> Result<bool, StoreError> {
    attrs
        .get(key)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .ok_or_else(|| StoreError::MalformedItem(key.to_string()))
}
