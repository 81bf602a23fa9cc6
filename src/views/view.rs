//! The renderable unit a route resolves to.

use std::path::Path;

use axum::body::Bytes;

/// A resolved view: an identifier, a content type and the document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    id: String,
    content_type: String,
    body: Bytes,
}

impl View {
    pub fn new(id: impl Into<String>, content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            id: id.into(),
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    /// Shorthand for an HTML document.
    pub fn html(id: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self::new(id, "text/html; charset=utf-8", body)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// Guess a content type from a file extension.
///
/// Unknown extensions fall back to `application/octet-stream`.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("js") | Some("mjs") => "text/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("txt") | Some("md") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
