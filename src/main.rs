mod models;
mod handlers;
mod services;
mod middleware;
mod config;
mod errors;
mod state;

use anyhow::Context;
use axum::{
    routing::{delete, get, post, put},
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
};
use tower_http::{
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tower_sessions::{MemoryStore, SessionManagerLayer};
use tower_sessions::cookie::SameSite;
use tracing_subscriber::EnvFilter;
use crate::{
    config::Config,
    services::Store,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Storage must answer before we accept any request
    let store = Store::connect(&config.storage)
        .await
        .context("Failed to connect to storage")?;
    store.ping().await.context("Storage did not answer PING")?;
    tracing::info!("Connected to {:?} storage", config.storage.backend);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = app(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on {}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;
    Ok(())
}

fn app(state: AppState) -> Router {
    // Session store setup
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(state.config.session.secure)
        .with_same_site(SameSite::Lax)
        .with_name("session");

    let max_body_size = state.config.server.max_body_size;

    Router::new()
        // Auth routes
        .route("/health", get(handlers::health))
        .route("/login", post(handlers::handle_login))
        .route("/logout", get(handlers::handle_logout))
        .route("/session", get(handlers::whoami))

        // Project routes
        .route("/projects", get(handlers::list_projects).post(handlers::create_project))
        .route(
            "/projects/:project_id",
            get(handlers::get_project)
                .put(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .route("/projects/:project_id/access", get(handlers::project_access))
        .route(
            "/projects/:project_id/comments",
            get(handlers::list_comments).post(handlers::add_comment),
        )

        // User administration routes
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        .route("/users/:username", delete(handlers::deactivate_user))
        .route("/users/:username/access", put(handlers::set_access))
        .route(
            "/users/:username/access/:project_id",
            post(handlers::grant_access).delete(handlers::revoke_access),
        )

        .route("/dashboard", get(handlers::serve_dashboard))

        // Add middleware
        .layer(from_fn_with_state(state.clone(), middleware::require_auth))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())

        // Request body limits from config
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))

        // Add state
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &Router, req: Request<Body>) -> Response {
        app.clone().oneshot(req).await.unwrap()
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, cookie: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, cookie)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str, cookie: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    // Logs in and returns the session cookie pair
    async fn login(app: &Router, username: &str, password: &str) -> String {
        let req = Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("username={}&password={}", username, password)))
            .unwrap();
        let resp = send(app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        resp.headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_requires_session() {
        let app = app(AppState::for_tests());

        let resp = send(&app, Request::builder().uri("/projects").body(Body::empty()).unwrap()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = send(&app, Request::builder().uri("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("username=admin&password=nope"))
            .unwrap();
        let resp = send(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(body_json(resp).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_project_thread_flow() {
        let app = app(AppState::for_tests());
        let admin = login(&app, "admin", "admin123").await;

        let resp = send(&app, json_request("POST", "/projects", &admin, json!({
            "name": "Website",
            "description": "New landing page",
            "owner": "Carla",
            "deadline": "2099-01-31"
        }))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let project = body_json(resp).await;
        let project_id = project["id"].as_str().unwrap().to_string();
        assert_eq!(project["next_actor"], "admin");
        assert_eq!(project["status"], "in_progress");

        let resp = send(&app, json_request("POST", "/users", &admin, json!({
            "username": "ana",
            "password": "pw",
            "role": "user",
            "project_access": [project_id]
        }))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let ana = login(&app, "ana", "pw").await;
        let comments_uri = format!("/projects/{}/comments", project_id);
        let resp = send(&app, json_request("POST", &comments_uri, &ana, json!({ "text": "Draft is up" }))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(body_json(resp).await["next_actor"], "user");

        let resp = send(&app, json_request("POST", "/projects", &ana, json!({
            "name": "Nope",
            "description": "x",
            "owner": "x",
            "deadline": "2099-01-31"
        }))).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = send(&app, get_request("/dashboard", &ana)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["my_turn"], 1);

        let resp = send(&app, get_request(&format!("/projects/{}/access", project_id), &admin)).await;
        assert_eq!(body_json(resp).await, json!(["ana"]));

        let resp = send(&app, get_request("/logout", &ana)).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        let resp = send(&app, get_request("/session", &ana)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_soft_delete_over_http() {
        let app = app(AppState::for_tests());
        let admin = login(&app, "admin", "admin123").await;

        let resp = send(&app, json_request("POST", "/projects", &admin, json!({
            "name": "Archive me",
            "description": "Old work",
            "owner": "Carla",
            "deadline": "2099-06-30"
        }))).await;
        let project_id = body_json(resp).await["id"].as_str().unwrap().to_string();

        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/projects/{}", project_id))
            .header(header::COOKIE, &admin)
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&app, req).await.status(), StatusCode::NO_CONTENT);

        let resp = send(&app, get_request("/projects", &admin)).await;
        assert_eq!(body_json(resp).await, json!([]));
        let resp = send(&app, get_request(&format!("/projects/{}", project_id), &admin)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_deactivated_admin_loses_session() {
        let app = app(AppState::for_tests());
        let admin = login(&app, "admin", "admin123").await;

        let resp = send(&app, json_request("POST", "/users", &admin, json!({
            "username": "chefe",
            "password": "pw",
            "role": "admin"
        }))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let chefe = login(&app, "chefe", "pw").await;

        let req = Request::builder()
            .method("DELETE")
            .uri("/users/chefe")
            .header(header::COOKIE, &admin)
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&app, req).await.status(), StatusCode::NO_CONTENT);

        let resp = send(&app, json_request("POST", "/users", &chefe, json!({
            "username": "intruso",
            "password": "pw",
            "role": "admin"
        }))).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = send(&app, json_request("POST", "/projects", &chefe, json!({
            "name": "Nope",
            "description": "x",
            "owner": "x",
            "deadline": "2099-01-31"
        }))).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = send(&app, get_request("/session", &chefe)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_bodies_get_json_400() {
        let app = app(AppState::for_tests());
        let admin = login(&app, "admin", "admin123").await;

        let resp = send(&app, json_request("POST", "/projects", &admin, json!({
            "description": "No name given",
            "owner": "Carla",
            "deadline": "2099-01-31"
        }))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        assert!(body_json(resp).await["error"].as_str().unwrap().contains("name"));

        let resp = send(&app, json_request("POST", "/projects/x/comments", &admin, json!({}))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await["error"].is_string());

        let req = Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("username=admin"))
            .unwrap();
        let resp = send(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_login_rotates_session_id() {
        let app = app(AppState::for_tests());
        let first = login(&app, "admin", "admin123").await;

        let req = Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::COOKIE, &first)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("username=jose&password=jose123"))
            .unwrap();
        let resp = send(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let second = resp
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .unwrap()
            .to_string();

        assert_ne!(first, second);
        let resp = send(&app, get_request("/session", &first)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let resp = send(&app, get_request("/session", &second)).await;
        assert_eq!(body_json(resp).await["username"], "jose");
    }
}
