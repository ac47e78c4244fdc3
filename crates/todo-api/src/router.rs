use lambda_http::{Body, Request, Response};

use crate::error::ApiError;
use crate::handlers;
use crate::todos::TodoApp;

pub async fn route(req: Request, app: &TodoApp) -> Result<Response<Body>, lambda_http::Error> {
    let path = req.uri().path().to_string();
    let method = req.method().as_str().to_string();

    tracing::info!(path = %path, method = %method, "Incoming request");

    let result = match route_inner(req, app, &path, &method).await {
        Ok(mut resp) => {
            add_cors_headers(&mut resp);
            resp
        }
        Err(e) => {
            tracing::error!(error = %e, "Request failed");
            let mut resp = e.into_response();
            add_cors_headers(&mut resp);
            resp
        }
    };

    Ok(result)
}

async fn route_inner(
    req: Request,
    app: &TodoApp,
    path: &str,
    method: &str,
) -> Result<Response<Body>, ApiError> {
    if method == "OPTIONS" {
        return Ok(Response::builder().status(204).body(Body::Empty).unwrap());
    }

    let token = bearer_token(&req)?;

    match (method, path) {
        ("GET", "/todos") => handlers::list_todos(app, &token).await,
        ("POST", "/todos") => handlers::create_todo(req, app, &token).await,
        (_, p) if p.starts_with("/todos/") => {
            let rest = &p[7..];
            if rest.is_empty() {
                return Err(ApiError::BadRequest("Missing todo ID".to_string()));
            }

            if let Some(todo_id) = rest.strip_suffix("/attachment") {
                return match method {
                    "POST" if !todo_id.is_empty() => {
                        handlers::issue_upload_url(app, todo_id, &token).await
                    }
                    _ => Err(ApiError::NotFound),
                };
            }

            if rest.contains('/') {
                return Err(ApiError::NotFound);
            }

            match method {
                "PATCH" => handlers::update_todo(req, app, rest, &token).await,
                "DELETE" => handlers::delete_todo(app, rest, &token).await,
                _ => Err(ApiError::NotFound),
            }
        }
        _ => Err(ApiError::NotFound),
    }
}

fn bearer_token(req: &Request) -> Result<String, ApiError> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    Ok(token.to_string())
}

fn add_cors_headers(resp: &mut Response<Body>) {
    let headers = resp.headers_mut();
    headers.insert("Access-Control-Allow-Origin", "*".parse().unwrap());
    headers.insert(
        "Access-Control-Allow-Methods",
        "GET,POST,PATCH,DELETE,OPTIONS".parse().unwrap(),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        "Content-Type,Authorization".parse().unwrap(),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::{token_for, InMemoryItemStore, StaticUrlSigner};

    const BUCKET: &str = "todo-attachments";

    fn app() -> TodoApp {
        TodoApp::new(
            Arc::new(InMemoryItemStore::default()),
            Arc::new(StaticUrlSigner::new(BUCKET)),
            BUCKET,
        )
    }

    fn request(
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Request {
        let mut builder = lambda_http::http::Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(v) => Body::Text(v.to_string()),
            None => Body::Empty,
        };
        builder.body(body).unwrap()
    }

    fn body_json(resp: &Response<Body>) -> serde_json::Value {
        match resp.body() {
            Body::Text(s) => serde_json::from_str(s).unwrap(),
            Body::Binary(b) => serde_json::from_slice(b).unwrap(),
            Body::Empty => panic!("Expected a response body"),
        }
    }

    #[tokio::test]
    async fn requests_without_a_token_are_rejected() {
        let app = app();
        let resp = route(request("GET", "/todos", None, None), &app).await.unwrap();
        assert_eq!(resp.status(), 401);
    }

    #[tokio::test]
    async fn create_and_list_over_http() {
        let app = app();
        let token = token_for("user-1");

        let resp = route(
            request(
                "POST",
                "/todos",
                Some(&token),
                Some(serde_json::json!({"name": "Buy milk"})),
            ),
            &app,
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), 201);
        let created = body_json(&resp);
        assert_eq!(created["name"], "Buy milk");
        assert_eq!(created["done"], false);
        let todo_id = created["todoId"].as_str().unwrap().to_string();

        let resp = route(request("GET", "/todos", Some(&token), None), &app)
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let listed = body_json(&resp);
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["todoId"], todo_id.as_str());
    }

    #[tokio::test]
    async fn blank_name_is_a_bad_request() {
        let app = app();
        let resp = route(
            request(
                "POST",
                "/todos",
                Some(&token_for("user-1")),
                Some(serde_json::json!({"name": ""})),
            ),
            &app,
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), 400);
    }

    #[tokio::test]
    async fn update_and_delete_over_http() {
        let app = app();
        let token = token_for("user-1");

        let resp = route(
            request(
                "POST",
                "/todos",
                Some(&token),
                Some(serde_json::json!({"name": "Buy milk"})),
            ),
            &app,
        )
        .await
        .unwrap();
        let todo_id = body_json(&resp)["todoId"].as_str().unwrap().to_string();

        let resp = route(
            request(
                "PATCH",
                &format!("/todos/{todo_id}"),
                Some(&token),
                Some(serde_json::json!({
                    "name": "Buy oat milk",
                    "dueDate": "2024-01-01",
                    "done": true
                })),
            ),
            &app,
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), 200);
        let updated = body_json(&resp);
        assert_eq!(updated["name"], "Buy oat milk");
        assert_eq!(updated["dueDate"], "2024-01-01");
        assert_eq!(updated["done"], true);

        let resp = route(
            request("DELETE", &format!("/todos/{todo_id}"), Some(&token), None),
            &app,
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), 204);

        // Deleting the same key again is still a success.
        let resp = route(
            request("DELETE", &format!("/todos/{todo_id}"), Some(&token), None),
            &app,
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), 204);
    }

    #[tokio::test]
    async fn attachment_route_issues_a_url_for_owned_items() {
        let app = app();
        let token = token_for("user-1");

        let resp = route(
            request(
                "POST",
                "/todos",
                Some(&token),
                Some(serde_json::json!({"name": "Buy milk"})),
            ),
            &app,
        )
        .await
        .unwrap();
        let todo_id = body_json(&resp)["todoId"].as_str().unwrap().to_string();

        let resp = route(
            request(
                "POST",
                &format!("/todos/{todo_id}/attachment"),
                Some(&token),
                None,
            ),
            &app,
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), 200);
        let url = body_json(&resp)["uploadUrl"].as_str().unwrap().to_string();
        assert!(url.contains(&todo_id));

        let resp = route(
            request("POST", "/todos/no-such-id/attachment", Some(&token), None),
            &app,
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        let app = app();
        let resp = route(
            request("GET", "/families", Some(&token_for("user-1")), None),
            &app,
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn preflight_skips_auth_and_carries_cors_headers() {
        let app = app();
        let resp = route(request("OPTIONS", "/todos", None, None), &app)
            .await
            .unwrap();
        assert_eq!(resp.status(), 204);
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );
    }
}
