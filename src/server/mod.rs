//! Site server - pre-rendered pages, on-demand generation and preview mode

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::FallbackPolicy;
use crate::error::BlogError;
use crate::generator::{output_path, Generator};
use crate::helpers::post_path;
use crate::preview::{clear_cookie, exit_redirect_target, PreviewState};
use crate::source::ContentSource;
use crate::templates::PageState;
use crate::Blog;

/// Settled outcomes nobody came back for are dropped after this long
const OUTCOME_TTL: Duration = Duration::from_secs(60);

/// State of an on-demand generation that has not produced a page
///
/// `NotFound` and `Failed` are reported to one request and then forgotten,
/// so a later request for the same uid asks the content source again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Pending,
    NotFound(Instant),
    Failed(Instant),
}

impl Resolution {
    fn is_stale(&self) -> bool {
        match self {
            Resolution::Pending => false,
            Resolution::NotFound(at) | Resolution::Failed(at) => at.elapsed() >= OUTCOME_TTL,
        }
    }
}

/// Server state
pub struct ServerState {
    public_dir: PathBuf,
    cookie_name: String,
    fallback: FallbackPolicy,
    source: Arc<dyn ContentSource>,
    generator: Generator,
    /// On-demand generations keyed by uid, removed once written or reported
    resolutions: RwLock<HashMap<String, Resolution>>,
}

impl ServerState {
    pub fn new(blog: &Blog, source: Arc<dyn ContentSource>) -> crate::error::Result<Self> {
        Ok(Self {
            public_dir: blog.public_dir.clone(),
            cookie_name: blog.config.preview.cookie_name.clone(),
            fallback: blog.config.build.fallback,
            generator: Generator::new(blog, source.clone())?,
            source,
            resolutions: RwLock::new(HashMap::new()),
        })
    }

    fn page(&self, status: StatusCode, state: &PageState) -> Response {
        match self.generator.renderer().render(state) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render page: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
        }
    }

    fn loading(&self) -> Response {
        self.page(StatusCode::OK, &PageState::Loading)
    }

    fn not_found(&self, uid: &str) -> Response {
        self.page(
            StatusCode::NOT_FOUND,
            &PageState::NotFound {
                uid: uid.to_string(),
            },
        )
    }

    fn failed(&self) -> Response {
        self.page(StatusCode::INTERNAL_SERVER_ERROR, &PageState::Failed)
    }

    fn error_response(&self, uid: &str, error: &BlogError) -> Response {
        if error.is_not_found() {
            self.not_found(uid)
        } else {
            tracing::error!("Failed to render {}: {}", uid, error);
            self.failed()
        }
    }
}

/// Build the application router
pub fn router(state: Arc<ServerState>) -> Router {
    let public_dir = state.public_dir.clone();
    Router::new()
        .route("/post/:slug", get(post_handler))
        .route("/api/preview", get(enter_preview_handler))
        .route("/api/exit-preview", get(exit_preview_handler))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let source = blog.source()?;
    let state = Arc::new(ServerState::new(blog, source)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Uids are used as directory names, so only plain slugs are accepted
fn is_valid_uid(uid: &str) -> bool {
    !uid.is_empty() && uid.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !is_valid_uid(&slug) {
        return state.not_found(&slug);
    }

    let preview = PreviewState::from_headers(&headers, &state.cookie_name);
    if preview.enabled {
        return match state.generator.assembler().assemble(&slug, &preview).await {
            Ok(view) => state.page(StatusCode::OK, &PageState::Ready(Box::new(view))),
            Err(e) => state.error_response(&slug, &e),
        };
    }

    let path = output_path(&state.public_dir, &slug);
    if let Ok(html) = tokio::fs::read_to_string(&path).await {
        return Html(html).into_response();
    }

    match state.fallback {
        FallbackPolicy::Blocking => match state.generator.generate_post(&slug).await {
            Ok(path) => match tokio::fs::read_to_string(&path).await {
                Ok(html) => Html(html).into_response(),
                Err(e) => state.error_response(&slug, &e.into()),
            },
            Err(e) => state.error_response(&slug, &e),
        },
        FallbackPolicy::Loading => resolve_on_demand(state, slug).await,
    }
}

/// Serve the loading placeholder while the page is generated in the background
async fn resolve_on_demand(state: Arc<ServerState>, uid: String) -> Response {
    let mut resolutions = state.resolutions.write().await;
    match resolutions.get(&uid).copied() {
        Some(Resolution::Pending) => state.loading(),
        // Outcomes are reported once, the next request tries again
        Some(Resolution::NotFound(_)) => {
            resolutions.remove(&uid);
            state.not_found(&uid)
        }
        Some(Resolution::Failed(_)) => {
            resolutions.remove(&uid);
            state.failed()
        }
        None => {
            resolutions.retain(|_, resolution| !resolution.is_stale());
            resolutions.insert(uid.clone(), Resolution::Pending);
            drop(resolutions);

            let task_state = state.clone();
            tokio::spawn(async move {
                let outcome = task_state.generator.generate_post(&uid).await;
                let mut resolutions = task_state.resolutions.write().await;
                match outcome {
                    Ok(_) => {
                        tracing::info!("Generated {} on demand", uid);
                        resolutions.remove(&uid);
                    }
                    Err(e) if e.is_not_found() => {
                        tracing::info!("No post for {}", uid);
                        resolutions.insert(uid, Resolution::NotFound(Instant::now()));
                    }
                    Err(e) => {
                        tracing::error!("On-demand generation of {} failed: {}", uid, e);
                        resolutions.insert(uid, Resolution::Failed(Instant::now()));
                    }
                }
            });

            state.loading()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExitPreviewParams {
    #[serde(rename = "currentUrl")]
    current_url: Option<String>,
}

/// Leave preview mode and go back to `currentUrl`
async fn exit_preview_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<ExitPreviewParams>,
) -> Response {
    let target = exit_redirect_target(params.current_url.as_deref());
    redirect(target, &clear_cookie(&state.cookie_name))
}

#[derive(Debug, Deserialize)]
struct EnterPreviewParams {
    token: Option<String>,
    #[serde(rename = "documentId")]
    document_id: Option<String>,
}

/// Enter preview mode at the ref in `token`, landing on the previewed post
async fn enter_preview_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<EnterPreviewParams>,
) -> Response {
    let Some(token) = params.token.filter(|t| !t.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing preview token").into_response();
    };

    let target = match &params.document_id {
        Some(id) => match state.source.get_by_id(id, Some(&token)).await {
            Ok(Some(doc)) => doc.uid.as_deref().map(post_path),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Could not resolve preview document {}: {}", id, e);
                None
            }
        },
        None => None,
    };

    let preview = PreviewState::with_reference(token);
    redirect(
        target.as_deref().unwrap_or("/"),
        &preview.set_cookie(&state.cookie_name),
    )
}

/// 307 redirect carrying a cookie change
fn redirect(location: &str, set_cookie: &str) -> Response {
    let location =
        HeaderValue::from_str(location).unwrap_or_else(|_| HeaderValue::from_static("/"));
    let mut response = StatusCode::TEMPORARY_REDIRECT.into_response();
    response.headers_mut().insert(header::LOCATION, location);
    if let Ok(cookie) = HeaderValue::from_str(set_cookie) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}
