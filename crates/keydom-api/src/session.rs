// Authenticated session and shared request dispatch
//
// Owns the HTTP client, the base URL and the current access token.
// Resource clients hold a clone of the session handle and go through the
// request helpers here, which attach the token header read at call time
// and fold every response into an `Outcome`.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Error;
use crate::outcome::Outcome;
use crate::resources::{AccessMediaClient, ProfileClient, VisitClient, VisitorClient};
use crate::transport::TransportConfig;

/// Header carrying the access token on every authenticated call.
pub const TOKEN_HEADER: &str = "fio-access-token";

/// Handle to an authenticated (or not yet authenticated) API session.
///
/// Cheaply cloneable via `Arc<SessionInner>`: every clone and every
/// resource client built from it observes the same token. The token is
/// read when a request is built, so a later [`set_token`](Self::set_token)
/// or login is visible to clients created earlier.
#[derive(Clone)]
pub struct AuthSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    http: reqwest::Client,
    /// Base URL as given, without trailing slash.
    base_url: String,
    token: RwLock<Option<SecretString>>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("base_url", &self.inner.base_url)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl AuthSession {
    /// Create a session from a `TransportConfig`.
    ///
    /// `base_url` is the API root (e.g. `https://keydom.example.com/api`).
    /// A trailing slash is ignored.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(base_url, http)
    }

    /// Create a session around a pre-built `reqwest::Client`.
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url)?;
        Ok(Self {
            inner: Arc::new(SessionInner {
                http,
                base_url,
                token: RwLock::new(None),
            }),
        })
    }

    /// The API base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    // ── Token management ──────────────────────────────────────────────

    /// The current access token, if one has been obtained or set.
    pub fn token(&self) -> Option<SecretString> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Install a token directly, e.g. to resume a session without logging in.
    pub fn set_token(&self, token: SecretString) {
        trace!("storing access token");
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Whether a token is currently stored. Says nothing about its validity.
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    // ── Resource clients ─────────────────────────────────────────────

    /// Client for `/accessMedias` (cards, tags, QR codes).
    pub fn access_medias(&self) -> AccessMediaClient {
        AccessMediaClient::new(self.clone())
    }

    /// Client for `/users/visitor` records.
    pub fn visitors(&self) -> VisitorClient {
        VisitorClient::new(self.clone())
    }

    /// Client for the access profile list.
    pub fn profiles(&self) -> ProfileClient {
        ProfileClient::new(self.clone())
    }

    /// Client for `/visits`.
    pub fn visits(&self) -> VisitClient {
        VisitClient::new(self.clone())
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build `{base}{path}`. `path` must start with `/`.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(Url::parse(&format!("{}{path}", self.inner.base_url))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Start a request with the JSON content type and, when a token is
    /// stored, the token header. No token means no header: the server
    /// decides what an unauthenticated call gets.
    fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, Error> {
        let mut builder = self
            .inner
            .http
            .request(method, url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.token() {
            let mut value =
                HeaderValue::from_str(token.expose_secret()).map_err(|_| Error::InvalidHeader)?;
            value.set_sensitive(true);
            builder = builder.header(TOKEN_HEADER, value);
        }

        Ok(builder)
    }

    /// Send a GET request, optionally with a `uuid` query parameter.
    pub(crate) async fn get(&self, path: &str, params: &[(&str, &str)]) -> Outcome {
        self.dispatch(Method::GET, path, params, None::<&()>).await
    }

    /// Send a POST request with a JSON body.
    pub(crate) async fn post(&self, path: &str, body: &(impl Serialize + Sync)) -> Outcome {
        self.dispatch(Method::POST, path, &[], Some(body)).await
    }

    /// Send a PUT request with a JSON body.
    pub(crate) async fn put(&self, path: &str, body: &(impl Serialize + Sync)) -> Outcome {
        self.dispatch(Method::PUT, path, &[], Some(body)).await
    }

    /// Send a DELETE request with query parameters.
    pub(crate) async fn delete(&self, path: &str, params: &[(&str, &str)]) -> Outcome {
        self.dispatch(Method::DELETE, path, params, None::<&()>).await
    }

    async fn dispatch<B: Serialize + Sync + ?Sized>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<&B>,
    ) -> Outcome {
        let url = match self.url(path) {
            Ok(url) => url,
            Err(e) => return Outcome::TransportError(e),
        };
        debug!("{method} {url} params={params:?}");

        let mut builder = match self.request(method, url) {
            Ok(builder) => builder,
            Err(e) => return Outcome::TransportError(e),
        };
        if !params.is_empty() {
            builder = builder.query(params);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let resp = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "request failed");
                return Outcome::TransportError(Error::Transport(e));
            }
        };

        classify(resp).await
    }
}

/// Fold a response into an `Outcome`.
async fn classify(resp: reqwest::Response) -> Outcome {
    let status = resp.status();

    let body = match resp.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "failed to read response body");
            return Outcome::TransportError(Error::Transport(e));
        }
    };

    if !status.is_success() {
        warn!(%status, "remote API rejected the request");
        return Outcome::TransportError(Error::Http {
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        });
    }

    Outcome::from_body(&body)
}
