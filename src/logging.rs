//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// The maximum number of characters of a body logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Fields whose values are never written to the logs.
const REDACTED_FIELDS: &[&str] = &["password"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
/// Passwords in JSON request bodies are redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let is_json = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"));
    let display_text = if is_json {
        redact_json(&body_bytes)
    } else {
        String::from_utf8_lossy(&body_bytes).to_string()
    };
    log_body("Received request", &format!("{parts:#?}"), &display_text);

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            Bytes::new()
        }
    };
    log_body(
        "Sending response",
        &format!("{parts:#?}"),
        &String::from_utf8_lossy(&body_bytes),
    );

    Response::from_parts(parts, Body::from(body_bytes))
}

/// Replace the values of [REDACTED_FIELDS] anywhere in a JSON document.
///
/// Bodies that are not valid JSON are returned as is.
fn redact_json(body: &[u8]) -> String {
    let Ok(mut value) = serde_json::from_slice::<Value>(body) else {
        return String::from_utf8_lossy(body).to_string();
    };

    redact_value(&mut value);

    value.to_string()
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if REDACTED_FIELDS.contains(&key.as_str()) {
                    *field = Value::String("********".to_owned());
                } else {
                    redact_value(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_value),
        _ => {}
    }
}

fn log_body(message: &str, headers: &str, body: &str) {
    match body.char_indices().nth(LOG_BODY_LENGTH_LIMIT) {
        Some((cutoff, _)) => {
            tracing::info!("{message}: {headers}\nbody: {}...", &body[..cutoff]);
            tracing::debug!("Full body: {body:?}");
        }
        None => tracing::info!("{message}: {headers}\nbody: {body:?}"),
    }
}

#[cfg(test)]
mod logging_tests {
    use axum::{Json, Router, middleware, routing::post};
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use super::{logging_middleware, redact_json};

    #[test]
    fn redacts_password_fields() {
        let body = json!({"email": "foo@bar.baz", "password": "hunter2"}).to_string();

        let redacted: Value = serde_json::from_str(&redact_json(body.as_bytes())).unwrap();

        assert_eq!(redacted["email"], "foo@bar.baz");
        assert_eq!(redacted["password"], "********");
    }

    #[test]
    fn redacts_nested_password_fields() {
        let body = json!({"users": [{"password": "hunter2"}]}).to_string();

        let redacted = redact_json(body.as_bytes());

        assert!(!redacted.contains("hunter2"));
    }

    #[test]
    fn leaves_invalid_json_untouched() {
        assert_eq!(redact_json(b"password=hunter2"), "password=hunter2");
    }

    #[tokio::test]
    async fn middleware_passes_body_through() {
        async fn echo(Json(body): Json<Value>) -> Json<Value> {
            Json(body)
        }

        let app = Router::new()
            .route("/echo", post(echo))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");
        let body = json!({"email": "foo@bar.baz", "password": "hunter2"});

        let response = server.post("/echo").json(&body).await;

        response.assert_status_ok();
        response.assert_json(&body);
    }
}
