pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;
pub mod ws;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/refresh", post(routes::auth::refresh))
        .route("/me", get(routes::auth::me));

    let dashboard_routes = Router::new()
        .route("/", get(routes::dashboard::landing))
        .route("/admin", get(routes::dashboard::admin))
        .route("/student", get(routes::dashboard::student))
        .route("/parent", get(routes::dashboard::parent));

    let notification_routes = Router::new()
        .route(
            "/",
            get(routes::notification::list).patch(routes::notification::mark_read),
        )
        .route("/{notification_id}", patch(routes::notification::mark_one_read));

    let community_routes = Router::new()
        .route(
            "/posts",
            get(routes::community::list_posts).post(routes::community::create_post),
        )
        .route(
            "/posts/{post_id}/comments",
            get(routes::community::list_comments).post(routes::community::create_comment),
        );

    let class_routes = Router::new()
        .route("/{slug}/materials", post(routes::class::add_material))
        .route(
            "/{slug}/materials/{file_id}",
            delete(routes::class::remove_material),
        );

    // Static segments (`files`, `tasks`) are matched before `{slug}`
    let project_routes = Router::new()
        .route("/", get(routes::project::list).post(routes::project::create))
        .route("/files/{file_id}", delete(routes::project_file::delete))
        .route("/files/{file_id}/preview", get(routes::project_file::preview))
        .route(
            "/tasks/{task_id}",
            patch(routes::project_task::update).delete(routes::project_task::delete),
        )
        .route("/{slug}", get(routes::project::get))
        .route("/{slug}/members", post(routes::project::invite))
        .route(
            "/{slug}/files",
            get(routes::project_file::list).post(routes::project_file::register),
        )
        .route("/{slug}/tasks", post(routes::project_task::create))
        .route(
            "/{slug}/messages",
            get(routes::project_message::list).post(routes::project_message::send),
        );

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/dashboard", dashboard_routes)
        .route("/attendance/calendar", get(routes::attendance::calendar))
        .route("/kiosk/check-in", post(routes::kiosk::check_in))
        .nest("/notifications", notification_routes)
        .nest("/community", community_routes)
        .nest("/classes", class_routes)
        .nest("/projects", project_routes);

    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .route("/ws", get(ws::handler::ws_upgrade))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
