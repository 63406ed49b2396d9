//! Static HTML pages served from `server.pages_dir`.
//!
//! The list page gets the current total added at the end of its body.

use std::io::ErrorKind;

use axum::extract::State;
use axum::response::Html;
use tokio::fs;

use super::types::ApiError;
use super::AppState;

async fn read_page(state: &AppState, name: &str) -> Result<String, ApiError> {
    let path = state.pages_dir.join(name);
    fs::read_to_string(&path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => ApiError::PageNotFound(name.to_string()),
        _ => ApiError::Internal(format!("failed to read {}: {e}", path.display())),
    })
}

/// GET /
pub async fn home(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    read_page(&state, "home.html").await.map(Html)
}

/// GET /add
pub async fn add(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    read_page(&state, "add.html").await.map(Html)
}

/// GET /list
pub async fn list(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let mut page = read_page(&state, "list.html").await?;
    let total = state.store.total_amount().await;
    insert_total(&mut page, total);
    Ok(Html(page))
}

/// Place the total just before `</body>`, or at the end if there is none.
fn insert_total(page: &mut String, total: i64) {
    let line = format!("<p id=\"total\">Total amount: {total}</p>\n");
    match page.rfind("</body>") {
        Some(at) => page.insert_str(at, &line),
        None => {
            page.push('\n');
            page.push_str(&line);
        }
    }
}

/// GET /delete
pub async fn delete(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    read_page(&state, "delete.html").await.map(Html)
}
