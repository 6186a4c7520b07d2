use super::pages::PageShell;
use axum::{
    response::Html,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::time::SystemTime;

pub(crate) fn routes() -> Router {
    Router::new() //
        .route("/", get(landing))
        .route("/about", get(about))
}

async fn landing() -> Html<String> {
    let shell = PageShell::new("Inclusion Proof Gateway", "/").with_class("text-neutral");

    Html(shell.render(concat!(
        "<h1>Inclusion Proof Gateway</h1>",
        "<p>POST /api/v1/clients/inclusion_proof</p>",
    )))
}

async fn about() -> Json<Value> {
    let now: DateTime<Utc> = SystemTime::now().into();

    Json(json!({
        "app": env!("CARGO_PKG_NAME"),
        "clk": now.to_rfc3339(),
    }))
}
