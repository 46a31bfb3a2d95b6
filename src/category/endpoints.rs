//! Endpoints for listing, creating and seeding categories.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::UserID,
    category::{
        Category, CategoryName, Kind, create_category, get_categories, seed_default_categories,
    },
    validation::{Issues, ValidationIssue},
};

/// The state needed by the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query string for listing categories, e.g. `?type=EXPENSE`.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// The JSON body for creating a category.
#[derive(Debug, Serialize, Deserialize)]
pub struct NewCategoryData {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// The body returned by the seed endpoint.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeedResult {
    pub message: String,
    pub created_count: usize,
}

/// List the user's categories, optionally filtered by the `type` query parameter.
pub async fn get_categories_endpoint(
    State(state): State<CategoryEndpointState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<Category>>, Error> {
    let kind = query
        .kind
        .as_deref()
        .map(str::parse::<Kind>)
        .transpose()
        .map_err(|error| {
            Error::InvalidQuery(vec![ValidationIssue::new("type", error.to_string())])
        })?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_categories(user_id, kind, &connection).map(Json)
}

/// Create a category for the user.
///
/// Responds with 201 and the category, 422 if the name or type is invalid, or 409 if the user
/// already has a category with the same name and type.
pub async fn create_category_endpoint(
    State(state): State<CategoryEndpointState>,
    Extension(user_id): Extension<UserID>,
    payload: Result<Json<NewCategoryData>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(data) = payload?;

    let mut issues = Issues::default();
    let name = issues.check("name", CategoryName::new(&data.name));
    let kind = match data.kind.as_deref() {
        Some(kind) => issues.check("type", kind.parse::<Kind>()),
        None => {
            issues.push("type", "type is required");
            None
        }
    };

    let (Some(name), Some(kind)) = (name, kind) else {
        return Err(Error::InvalidBody(issues.into_vec()));
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = create_category(user_id, name, kind, &connection)?;

    Ok((StatusCode::CREATED, Json(category)).into_response())
}

/// Create the default categories for the user, skipping ones that already exist.
pub async fn seed_categories_endpoint(
    State(state): State<CategoryEndpointState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<SeedResult>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let created_count = seed_default_categories(user_id, &connection)?;
    tracing::info!("seeded {created_count} categories for user {user_id}");

    Ok(Json(SeedResult {
        message: "Default categories created".to_owned(),
        created_count,
    }))
}

#[cfg(test)]
mod category_endpoint_tests {
    use axum::{
        Extension, Router,
        http::StatusCode,
        routing::{get, post},
    };
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{
        category::{Category, DEFAULT_CATEGORIES, Kind},
        test_utils::{create_test_user, get_test_connection_shared},
    };

    use super::{
        CategoryEndpointState, SeedResult, create_category_endpoint, get_categories_endpoint,
        seed_categories_endpoint,
    };

    fn get_test_server() -> TestServer {
        let db_connection = get_test_connection_shared();
        let user_id = create_test_user("foo@bar.baz", "hunter2", &db_connection.lock().unwrap());
        let state = CategoryEndpointState { db_connection };

        let app = Router::new()
            .route(
                "/categories",
                get(get_categories_endpoint).post(create_category_endpoint),
            )
            .route("/categories/seed", post(seed_categories_endpoint))
            .layer(Extension(user_id))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn create_category_returns_created() {
        let server = get_test_server();

        let response = server
            .post("/categories")
            .json(&json!({"name": "  Groceries ", "type": "EXPENSE"}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let category: Category = response.json();
        assert_eq!(category.name.as_ref(), "Groceries");
        assert_eq!(category.kind, Kind::Expense);
    }

    #[tokio::test]
    async fn create_category_reports_every_invalid_field() {
        let server = get_test_server();

        let response = server
            .post("/categories")
            .json(&json!({"name": "", "type": "SAVINGS"}))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        let fields: Vec<&str> = body["issues"]
            .as_array()
            .unwrap()
            .iter()
            .map(|issue| issue["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["name", "type"]);
    }

    #[tokio::test]
    async fn create_duplicate_category_is_conflict() {
        let server = get_test_server();
        let body = json!({"name": "Rent", "type": "EXPENSE"});
        server
            .post("/categories")
            .json(&body)
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.post("/categories").json(&body).await;

        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn list_categories_filters_by_type() {
        let server = get_test_server();
        server.post("/categories/seed").await.assert_status_ok();

        let response = server
            .get("/categories")
            .add_query_param("type", "INCOME")
            .await;

        response.assert_status_ok();
        let categories: Vec<Category> = response.json();
        let want = DEFAULT_CATEGORIES
            .iter()
            .filter(|(_, kind)| *kind == Kind::Income)
            .count();
        assert_eq!(categories.len(), want);
        assert!(categories.iter().all(|category| category.kind == Kind::Income));
    }

    #[tokio::test]
    async fn list_categories_rejects_invalid_type() {
        let server = get_test_server();

        let response = server
            .get("/categories")
            .add_query_param("type", "income")
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(body["issues"][0]["field"], "type");
    }

    #[tokio::test]
    async fn seed_reports_created_count() {
        let server = get_test_server();

        let first: SeedResult = server.post("/categories/seed").await.json();
        let second: SeedResult = server.post("/categories/seed").await.json();

        assert_eq!(first.created_count, DEFAULT_CATEGORIES.len());
        assert_eq!(second.created_count, 0);
    }
}
