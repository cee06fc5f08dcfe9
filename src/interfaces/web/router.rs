use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Method, Request, header},
    middleware,
    middleware::Next,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use super::AppState;
use super::handlers::{
    agents, approvals, apps, connectors, health, messages, tasks, webhooks,
};

fn build_localhost_cors(api_port: u16, web_port: u16) -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        format!("http://127.0.0.1:{}", api_port),
        format!("http://localhost:{}", api_port),
        format!("http://127.0.0.1:{}", web_port),
        format!("http://localhost:{}", web_port),
    ]
    .iter()
    .filter_map(|o| o.parse().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
}

pub fn build_api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/agents", get(agents::list_agents))
        .route("/apps", get(apps::list_apps).post(apps::create_app))
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route("/tasks/run", post(tasks::run_task))
        .route(
            "/approvals",
            get(approvals::list_approvals).post(approvals::create_approval),
        )
        .route("/approvals/{id}/decide", post(approvals::decide_approval))
        .route(
            "/connectors",
            get(connectors::list_connectors).post(connectors::create_connector),
        )
        .route("/connectors/vercel/projects", get(connectors::vercel_projects))
        .route("/connectors/github/repos", get(connectors::github_repos))
        .route("/connectors/github/webhook", post(webhooks::github_webhook))
        .route("/conversations", get(messages::get_conversations))
        .route(
            "/messages",
            get(messages::list_messages).post(messages::create_message),
        )
        .route("/events/github", get(messages::github_events))
        .layer(middleware::from_fn(security_headers))
        .layer(build_localhost_cors(
            state.config.port,
            state.config.web_origin_port,
        ))
        .with_state(state)
}

async fn security_headers(req: Request<Body>, next: Next) -> axum::response::Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'",
        ),
    );
    response
}
