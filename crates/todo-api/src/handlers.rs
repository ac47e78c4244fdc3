use domain::{CreateTodoRequest, TodoUpdate};
use lambda_http::{Body, Request, Response};

use crate::error::ApiError;
use crate::todos::TodoApp;

fn json_response(status: u16, body: &impl serde::Serialize) -> Result<Response<Body>, ApiError> {
    let json = serde_json::to_string(body).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::from(json))
        .unwrap())
}

fn request_body(req: &Request) -> Result<String, ApiError> {
    match req.body() {
        Body::Text(s) => Ok(s.clone()),
        Body::Binary(b) => String::from_utf8(b.to_vec())
            .map_err(|_| ApiError::BadRequest("Invalid UTF-8".to_string())),
        Body::Empty => Err(ApiError::BadRequest("Empty body".to_string())),
    }
}

pub async fn list_todos(app: &TodoApp, token: &str) -> Result<Response<Body>, ApiError> {
    let items = app.list_items(token).await?;
    json_response(200, &items)
}

pub async fn create_todo(
    req: Request,
    app: &TodoApp,
    token: &str,
) -> Result<Response<Body>, ApiError> {
    let input: CreateTodoRequest = serde_json::from_str(&request_body(&req)?)?;
    let item = app.create_item(input, token).await?;
    json_response(201, &item)
}

pub async fn update_todo(
    req: Request,
    app: &TodoApp,
    todo_id: &str,
    token: &str,
) -> Result<Response<Body>, ApiError> {
    let input: TodoUpdate = serde_json::from_str(&request_body(&req)?)?;
    let updated = app.update_item(input, todo_id, token).await?;
    json_response(200, &updated)
}

pub async fn delete_todo(
    app: &TodoApp,
    todo_id: &str,
    token: &str,
) -> Result<Response<Body>, ApiError> {
    app.delete_item(todo_id, token).await?;
    Ok(Response::builder().status(204).body(Body::Empty).unwrap())
}

pub async fn issue_upload_url(
    app: &TodoApp,
    todo_id: &str,
    token: &str,
) -> Result<Response<Body>, ApiError> {
    let upload_url = app.issue_upload_url(todo_id, token).await?;
    json_response(200, &serde_json::json!({ "uploadUrl": upload_url }))
}
