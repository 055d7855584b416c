//! Refclass Server - local annotation API
//!
//! HTTP server exposing annotation sessions to the browser UI. One session
//! is kept per group identifier (the `uuid` query parameter).

pub mod http;
pub mod submit;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use refclass_core::{partition_key, AnnotationSession, Catalog, Result, Storage};

pub use submit::{Notification, SubmitError, Submitter};

/// Shared application state
pub struct AppState {
    pub catalog: Catalog,
    pub storage: Arc<dyn Storage>,
    pub submitter: Submitter,
    pub pdf_dir: Option<PathBuf>,
    sessions: RwLock<HashMap<String, AnnotationSession>>,
}

impl AppState {
    pub fn new(catalog: Catalog, storage: Arc<dyn Storage>, submitter: Submitter) -> Self {
        Self {
            catalog,
            storage,
            submitter,
            pdf_dir: None,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Serve PDFs from `dir` under `/pdfs/`
    pub fn with_pdf_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pdf_dir = Some(dir.into());
        self
    }

    /// Run `f` on the group's session, opening it on first use.
    pub async fn with_session<T>(
        &self,
        group: Option<&str>,
        f: impl FnOnce(&mut AnnotationSession) -> Result<T>,
    ) -> Result<T> {
        let mut sessions = self.sessions.write().await;
        let session = match sessions.entry(partition_key(group)) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let mut session =
                    AnnotationSession::open(&self.catalog, self.storage.clone(), group)?;
                // Groups with no references are not cached.
                if session.references().is_empty() {
                    return f(&mut session);
                }
                entry.insert(session)
            }
        };
        f(session)
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/api/vocabulary", get(http::get_vocabulary))
        .route("/api/references", get(http::list_references))
        .route("/api/current", get(http::get_current))
        .route("/api/navigate", post(http::navigate))
        .route("/api/current/article_type", put(http::set_article_type))
        .route("/api/current/topic", put(http::set_topic))
        .route("/api/current/motivation", put(http::set_motivation))
        .route("/api/export", get(http::export))
        .route("/api/import", post(http::import))
        .route("/api/submit", post(http::submit));

    if let Some(dir) = &state.pdf_dir {
        router = router.nest_service("/pdfs", ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the server
pub async fn serve(
    addr: &str,
    state: Arc<AppState>,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Refclass server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use refclass_core::MemoryStorage;

    fn state() -> AppState {
        let catalog = Catalog::from_json(
            r#"[{"id": 1, "year": 2001, "authors": "A", "title": "T", "pdf": "1.pdf", "group": "g-1"}]"#,
        )
        .unwrap();
        AppState::new(catalog, Arc::new(MemoryStorage::new()), Submitter::default())
    }

    #[tokio::test]
    async fn empty_groups_are_not_cached() {
        let state = state();
        for group in ["nobody", "nobody-else", "x"] {
            let len = state
                .with_session(Some(group), |s| Ok(s.references().len()))
                .await
                .unwrap();
            assert_eq!(len, 0);
        }
        assert!(state.sessions.read().await.is_empty());

        state.with_session(Some("g-1"), |s| Ok(s.next())).await.unwrap();
        state.with_session(None, |_| Ok(())).await.unwrap();
        assert_eq!(state.sessions.read().await.len(), 2);
    }
}
