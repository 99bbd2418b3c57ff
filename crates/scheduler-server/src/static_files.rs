//! Serves the web front end from the configured directory.

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use std::path::{Path, PathBuf};

use crate::api::AppState;

/// Maps a request path onto a file under `root`, refusing to leave it.
fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for segment in request_path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            segment if segment.contains('\\') => return None,
            segment => path.push(segment),
        }
    }
    Some(path)
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}

/// Fallback handler: every path the API does not claim is a file lookup.
pub async fn serve(State(state): State<AppState>, uri: Uri) -> Response {
    let Some(mut path) = resolve(&state.web_dir, uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if tokio::fs::metadata(&path).await.is_ok_and(|meta| meta.is_dir()) {
        path.push("index.html");
    }

    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type(&path))], bytes).into_response(),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "static file not served");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
