//! Local preview server for a built site.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, Uri, header};
use axum::middleware::map_request_with_state;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

const DEFAULT_INDEX_FILENAME: &str = "index.html";
const DEFAULT_PORT: u16 = 8080;

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Serves a directory over HTTP.
///
/// Requests for a directory (`/`-terminated paths) get that directory's
/// index file. Every response carries `Cache-Control: no-cache` so edits
/// show up on reload.
pub struct SiteServer {
    directory: PathBuf,
    index_filename: String,
    listener: Option<TcpListener>,
}

impl SiteServer {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            index_filename: DEFAULT_INDEX_FILENAME.to_string(),
            listener: None,
        }
    }

    /// File served for directory requests (default `index.html`).
    pub fn with_index_filename(mut self, index_filename: impl Into<String>) -> Self {
        self.index_filename = index_filename.into();
        self
    }

    /// Bind the listening socket.
    ///
    /// Returns the url to browse to and the bound port (useful when binding
    /// port 0).
    pub async fn start(&mut self, addr: SocketAddr) -> Result<(String, u16), ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.listener = Some(listener);

        let host = if local.ip().is_unspecified() {
            "localhost".to_string()
        } else {
            local.ip().to_string()
        };
        let url = format!("http://{}:{}", host, local.port());
        log::info!("serving {} at {}", self.directory.display(), url);

        Ok((url, local.port()))
    }

    /// Serve until the process ends.
    ///
    /// Binds `127.0.0.1:8080` if [`SiteServer::start`] was not called.
    pub async fn run(mut self) -> Result<(), ServerError> {
        let listener = match self.listener.take() {
            Some(listener) => listener,
            None => {
                let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT));
                TcpListener::bind(addr)
                    .await
                    .map_err(|source| ServerError::Bind { addr, source })?
            }
        };

        axum::serve(listener, self.router())
            .await
            .map_err(ServerError::Serve)
    }

    fn router(&self) -> Router {
        let index: Arc<str> = Arc::from(self.index_filename.as_str());

        Router::new()
            .fallback_service(ServeDir::new(&self.directory))
            .layer(map_request_with_state(index, rewrite_index))
            .layer(SetResponseHeaderLayer::overriding(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-cache"),
            ))
    }
}

/// `/docs/` -> `/docs/<index>`
async fn rewrite_index(State(index): State<Arc<str>>, mut request: Request) -> Request {
    let uri = request.uri();
    if !uri.path().ends_with('/') {
        return request;
    }

    let mut rewritten = format!("{}{}", uri.path(), index);
    if let Some(query) = uri.query() {
        rewritten.push('?');
        rewritten.push_str(query);
    }
    match rewritten.parse::<Uri>() {
        Ok(uri) => *request.uri_mut() = uri,
        Err(e) => log::warn!("could not rewrite {rewritten}: {e}"),
    }
    request
}
