//! HTTP/JSON front end.
//!
//! One [`Session`] lives behind a mutex for the whole process, so the
//! decay-then-mutate sequence of one request never interleaves with another.
//!
//! | Route                      | Engine call          |
//! |----------------------------|----------------------|
//! | `GET /`, `GET /index.html` | serves the page      |
//! | `GET /api/state`           | `get_state`          |
//! | `GET /api/catalog`         | stages, events       |
//! | `POST /api/start`          | `create_pet`         |
//! | `POST /api/action/{kind}`  | `perform_action`     |

use crate::error::Error as EngineError;
use crate::model::{EvolutionStage, RandomEvent, EVENTS, STAGES};
use crate::session::Session;
use crate::sim::Action;
use anyhow::Context;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use std::error::Error as StdError;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

const ACTION_PREFIX: &str = "/api/action/";

/// Upper bound on a request body; only `POST /api/start` reads one.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not read request body: {0}")]
    Body(BoxError),

    #[error("request body exceeds {MAX_BODY_BYTES} bytes")]
    BodyTooLarge,

    #[error("request body must be a JSON object: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("{path} is not available: {source}")]
    PageMissing {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Body(_) | ApiError::MalformedJson(_) => StatusCode::BAD_REQUEST,
            ApiError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            // a faded pet is answered by `act` itself
            ApiError::Engine(_) => StatusCode::BAD_REQUEST,
            ApiError::PageMissing { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Shared across all connections.
pub struct AppState {
    session: Mutex<Session>,
    page_path: PathBuf,
    default_name: String,
}

impl AppState {
    pub fn new(session: Session, page_path: PathBuf, default_name: String) -> Self {
        Self {
            session: Mutex::new(session),
            page_path,
            default_name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct StartRequest {
    name: Option<String>,
}

#[derive(Serialize)]
struct Catalog {
    stages: &'static [EvolutionStage],
    events: &'static [RandomEvent],
    actions: [Action; 8],
}

fn respond(status: StatusCode, content_type: &'static str, body: Vec<u8>) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(Bytes::from(body)));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    resp
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(bytes) => respond(status, "application/json", bytes),
        Err(e) => {
            error!(error = %e, "response serialization failed");
            respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                "application/json",
                br#"{"error":"serialization failed"}"#.to_vec(),
            )
        }
    }
}

fn error_response(err: &ApiError) -> Response<Full<Bytes>> {
    json_response(err.status(), &json!({ "error": err.to_string() }))
}

fn not_found() -> Response<Full<Bytes>> {
    json_response(StatusCode::NOT_FOUND, &json!({ "error": "not found" }))
}

/// `/api/action/feed` yields `feed`; nested paths yield nothing.
fn action_kind(path: &str) -> Option<&str> {
    path.strip_prefix(ACTION_PREFIX)
        .filter(|kind| !kind.contains('/'))
}

fn wants_body(method: &Method, path: &str) -> bool {
    *method == Method::POST && path == "/api/start"
}

async fn read_body<B>(body: B) -> Result<Bytes, ApiError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(ApiError::BodyTooLarge),
        Err(e) => Err(ApiError::Body(e)),
    }
}

async fn serve_page(state: &AppState) -> Result<Response<Full<Bytes>>, ApiError> {
    let html = tokio::fs::read(&state.page_path)
        .await
        .map_err(|source| ApiError::PageMissing {
            path: state.page_path.display().to_string(),
            source,
        })?;
    Ok(respond(StatusCode::OK, "text/html; charset=utf-8", html))
}

async fn start(state: &AppState, body: &[u8]) -> Result<Response<Full<Bytes>>, ApiError> {
    let req: StartRequest = serde_json::from_slice(body)?;
    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(&state.default_name);
    let mut session = state.session.lock().await;
    let pet = session.create_pet(name);
    Ok(json_response(
        StatusCode::OK,
        &json!({ "success": true, "state": pet }),
    ))
}

async fn act(state: &AppState, kind: &str) -> Result<Response<Full<Bytes>>, ApiError> {
    let mut session = state.session.lock().await;
    match session.perform_named(kind) {
        Ok(result) => Ok(json_response(StatusCode::OK, &result)),
        Err(EngineError::PetDeceased(name)) => Ok(json_response(
            StatusCode::OK,
            &json!({
                "success": false,
                "message": format!("{name}'s spirit has faded..."),
                "state": session.pet(),
            }),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Routes one request. Kept free of hyper's `Incoming` so it can be driven
/// directly.
pub async fn dispatch(
    state: &AppState,
    method: &Method,
    path: &str,
    body: &[u8],
) -> Response<Full<Bytes>> {
    let result = match (method, path) {
        (&Method::GET, "/") | (&Method::GET, "/index.html") => serve_page(state).await,
        (&Method::GET, "/api/state") => {
            let snapshot = state.session.lock().await.get_state();
            Ok(json_response(StatusCode::OK, &snapshot))
        }
        (&Method::GET, "/api/catalog") => Ok(json_response(
            StatusCode::OK,
            &Catalog {
                stages: &STAGES,
                events: &EVENTS,
                actions: Action::ALL,
            },
        )),
        (&Method::POST, "/api/start") => start(state, body).await,
        (&Method::POST, p) => match action_kind(p) {
            Some(kind) => act(state, kind).await,
            None => Ok(not_found()),
        },
        _ => Ok(not_found()),
    };

    result.unwrap_or_else(|e| {
        warn!(error = %e, %method, path, "request failed");
        error_response(&e)
    })
}

async fn handle_request<B>(
    state: Arc<AppState>,
    remote_addr: SocketAddr,
    req: Request<B>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let body = if wants_body(&method, &path) {
        read_body(req.into_body()).await
    } else {
        Ok(Bytes::new())
    };
    let resp = match body {
        Ok(body) => dispatch(&state, &method, &path, &body).await,
        Err(e) => {
            warn!(error = %e, %method, path = %path, "request body rejected");
            error_response(&e)
        }
    };
    info!(
        remote = %remote_addr,
        %method,
        path = %path,
        status = resp.status().as_u16(),
        "request"
    );
    Ok(resp)
}

/// Accepts connections until Ctrl+C.
pub async fn run(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not bind {addr}"))?;
    info!(%addr, "listening on http://{addr}");

    loop {
        let (stream, remote_addr) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    continue;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                return Ok(());
            }
        };

        let state = state.clone();
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| {
                let state = state.clone();
                async move { handle_request(state, remote_addr, req).await }
            });
            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!(error = %e, remote = %remote_addr, "connection closed with error");
            }
        });
    }
}
