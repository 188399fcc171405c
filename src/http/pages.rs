//! Fixed documents and static files served from the web root.

use std::path::{Component, Path, PathBuf};

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::observability::metrics;

/// Fallback for files whose type cannot be guessed.
const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// The fixed HTML documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Index,
    Message,
    Error,
}

impl Page {
    pub fn file_name(self) -> &'static str {
        match self {
            Page::Index => "index.html",
            Page::Message => "message.html",
            Page::Error => "error.html",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Page::Index => "index",
            Page::Message => "message",
            Page::Error => "error",
        }
    }
}

/// Reads pages and assets from a directory on each request.
#[derive(Debug, Clone)]
pub struct Pages {
    root: PathBuf,
}

impl Pages {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serve a fixed document as `text/html` with `status`.
    pub async fn fixed(&self, page: Page, status: StatusCode) -> Response {
        let path = self.root.join(page.file_name());
        match tokio::fs::read(&path).await {
            Ok(body) => {
                metrics::record_page(page.label(), status.as_u16());
                (status, [(header::CONTENT_TYPE, "text/html")], body).into_response()
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Fixed page unavailable");
                metrics::record_page(page.label(), 500);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }

    /// Serve the file at `relative` under the root, or the error page with 404.
    pub async fn static_file(&self, relative: &str) -> Response {
        let Some(path) = self.resolve(relative) else {
            tracing::debug!(path = relative, "Rejected path outside web root");
            return self.fixed(Page::Error, StatusCode::NOT_FOUND).await;
        };

        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            return self.fixed(Page::Error, StatusCode::NOT_FOUND).await;
        }

        match tokio::fs::read(&path).await {
            Ok(body) => {
                let content_type = mime_guess::from_path(&path)
                    .first_raw()
                    .unwrap_or(DEFAULT_CONTENT_TYPE);
                metrics::record_page("static", 200);
                ([(header::CONTENT_TYPE, content_type)], body).into_response()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Static file unreadable");
                self.fixed(Page::Error, StatusCode::NOT_FOUND).await
            }
        }
    }

    /// Join `relative` onto the root, refusing anything but plain path segments.
    fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let relative = Path::new(relative);
        if relative.as_os_str().is_empty()
            || !relative.components().all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    fn web_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("error.html"), "<h1>404</h1>").unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
        std::fs::write(dir.path().join("style.css"), "body {}").unwrap();
        std::fs::write(dir.path().join("notes"), "plain").unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        dir
    }

    async fn body(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    #[tokio::test]
    async fn fixed_page_is_html() {
        let dir = web_root();
        let response = Pages::new(dir.path()).fixed(Page::Index, StatusCode::OK).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
        assert_eq!(body(response).await, b"<h1>home</h1>");
    }

    #[tokio::test]
    async fn missing_fixed_page_is_server_error() {
        let dir = web_root();
        let response = Pages::new(dir.path()).fixed(Page::Message, StatusCode::OK).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn static_file_content_type_is_guessed() {
        let dir = web_root();
        let pages = Pages::new(dir.path());

        let css = pages.static_file("style.css").await;
        assert_eq!(css.status(), StatusCode::OK);
        assert_eq!(css.headers()[header::CONTENT_TYPE], "text/css");

        let plain = pages.static_file("notes").await;
        assert_eq!(plain.headers()[header::CONTENT_TYPE], "text/plain");
    }

    #[tokio::test]
    async fn missing_directory_and_traversal_are_not_found() {
        let dir = web_root();
        let pages = Pages::new(dir.path().join("assets"));
        std::fs::write(dir.path().join("assets").join("error.html"), "<h1>404</h1>").unwrap();

        for path in ["nonexistent.png", "", "../index.html"] {
            let response = pages.static_file(path).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "path {path:?}");
            assert_eq!(body(response).await, b"<h1>404</h1>");
        }
    }
}
