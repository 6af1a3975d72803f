//! Session-aware HTTP client for the workspace API.

use std::sync::Arc;

use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, instrument, trace, warn};

use crate::auth::Credentials;
use crate::error::{ApiError, AuthError, Error, InvalidInputError};
use crate::types::BaseUrl;

use super::endpoints::{self, CurrentUser, ErrorBody, LoginRequest};
use super::navigator::{Navigator, NoopNavigator};
use super::refresh::{RefreshGate, Ticket};

/// A request against the tenant API: method, path relative to the base
/// URL, optional query parameters, and an optional JSON body.
///
/// Descriptors are reusable; the client re-dispatches the same
/// descriptor when a request is replayed after a session refresh.
#[derive(Debug)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Option<serde_json::Value>,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// Create a request descriptor for a method and relative path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: None,
        }
    }

    /// Attach query parameters.
    pub fn query<Q: Serialize>(mut self, query: &Q) -> Result<Self, Error> {
        self.query = Some(to_value(query)?);
        Ok(self)
    }

    /// Attach a JSON body.
    pub fn body<B: Serialize>(mut self, body: &B) -> Result<Self, Error> {
        self.body = Some(to_value(body)?);
        Ok(self)
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<serde_json::Value, Error> {
    serde_json::to_value(value).map_err(|e| {
        InvalidInputError::Other {
            message: e.to_string(),
        }
        .into()
    })
}

/// HTTP client for the workspace API that transparently recovers from
/// expired sessions.
///
/// The client attaches the session cookie to every request, detects the
/// backend's expired-session signal, and refreshes the session at most
/// once per request. Concurrent requests that expire within the same
/// window share a single refresh call (see [`RefreshGate`]): the first
/// caller performs the refresh, the rest wait for its outcome and then
/// replay their own request.
///
/// # Thread Safety
///
/// Clients are cheap to clone (they use an internal `Arc`) and safe to
/// share across tasks. The refresh coordination is per-client, so
/// separate instances (e.g. in tests) never interfere.
///
/// # Example
///
/// ```no_run
/// use workbay::{ApiClient, BaseUrl, Credentials};
///
/// # async fn example() -> Result<(), workbay::Error> {
/// let base = BaseUrl::new("https://acme.workbay.app")?;
/// let client = ApiClient::new(base);
///
/// client.login(&Credentials::new("alice@acme.test", "password")).await?;
/// let user = client.me().await?;
/// println!("logged in as {}", user.email);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base: BaseUrl,
    gate: RefreshGate,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a client for the given base URL.
    ///
    /// Redirect directives from the server are logged and ignored; use
    /// [`ApiClient::with_navigator`] to act on them.
    pub fn new(base: BaseUrl) -> Self {
        Self::with_navigator(base, Arc::new(NoopNavigator))
    }

    /// Create a client with a navigator that executes server redirect
    /// directives.
    pub fn with_navigator(base: BaseUrl, navigator: Arc<dyn Navigator>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("workbay/", env!("CARGO_PKG_VERSION")))
            .cookie_store(true)
            .build()
            .expect("failed to build HTTP client");

        Self {
            inner: Arc::new(ClientInner {
                http,
                base,
                gate: RefreshGate::default(),
                navigator,
            }),
        }
    }

    /// Returns the base URL this client is configured for.
    pub fn base_url(&self) -> &BaseUrl {
        &self.inner.base
    }

    /// Issue a request, transparently recovering from an expired session.
    ///
    /// On an expired-session response the client refreshes the session
    /// (joining an in-flight refresh if one exists) and re-dispatches the
    /// request exactly once. Any other failure, or a second auth failure
    /// after the replay, is surfaced unchanged.
    #[instrument(skip(self, request), fields(base = %self.inner.base, method = %request.method, path = %request.path))]
    pub async fn issue(&self, request: &ApiRequest) -> Result<reqwest::Response, Error> {
        let mut retried = false;
        loop {
            let response = self.dispatch(request).await?;
            let status = response.status();
            trace!(status = %status, "response received");

            if status.is_success() {
                return Ok(response);
            }

            let error = self.parse_error_response(response).await;

            if error.is_session_expired() && !retried {
                debug!("session expired, refreshing");
                self.refresh_session().await?;
                retried = true;
                continue;
            }

            return Err(self.reject(error));
        }
    }

    /// Build and send the underlying HTTP request. The session cookie is
    /// attached by the transport.
    async fn dispatch(&self, request: &ApiRequest) -> Result<reqwest::Response, Error> {
        let url = self.inner.base.endpoint_url(&request.path);
        let mut builder = self.inner.http.request(request.method.clone(), &url);
        if let Some(query) = &request.query {
            builder = builder.query(query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        Ok(builder.send().await?)
    }

    /// Refresh the session, coordinating concurrent callers so only one
    /// refresh call is ever in flight.
    async fn refresh_session(&self) -> Result<(), Error> {
        // The gate is claimed synchronously, before the first await, so
        // two callers can never both start a refresh.
        match self.inner.gate.enter() {
            Ticket::Leader => {
                info!("refreshing session");
                let outcome = self.call_refresh_endpoint().await.map_err(Arc::new);
                self.inner.gate.settle(outcome.clone());
                match outcome {
                    Ok(()) => {
                        debug!("session refreshed");
                        Ok(())
                    }
                    Err(source) => Err(AuthError::RefreshFailed(source).into()),
                }
            }
            Ticket::Waiter(outcome) => {
                debug!("refresh already in flight, waiting for its outcome");
                match outcome.await {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(source)) => Err(AuthError::RefreshFailed(source).into()),
                    // The leader settles the gate before dropping the
                    // sender, so a closed channel means it panicked.
                    Err(_) => Err(AuthError::RefreshFailed(Arc::new(
                        crate::error::TransportError::Http {
                            message: "refresh outcome channel closed".to_string(),
                        }
                        .into(),
                    ))
                    .into()),
                }
            }
        }
    }

    /// POST the refresh endpoint directly, outside the interception
    /// path, so a failing refresh can never trigger another refresh.
    ///
    /// The endpoint takes no body; success renews the session cookie as
    /// a side effect and the response body is discarded.
    async fn call_refresh_endpoint(&self) -> Result<(), Error> {
        let url = self.inner.base.endpoint_url(endpoints::REFRESH_TOKEN);
        let response = self.inner.http.post(&url).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::Api(self.parse_error_response(response).await))
        }
    }

    /// Apply server redirect directives, then surface the error.
    ///
    /// Errors produced by a failed refresh do not pass through here;
    /// redirect directives are only consulted on responses the caller
    /// will see.
    fn reject(&self, error: ApiError) -> Error {
        if error.is_payment_required() {
            warn!("tenant access restricted, redirecting to payment page");
            self.inner
                .navigator
                .navigate(endpoints::PAYMENT_REQUIRED_PATH);
        }
        if let Some(location) = error.redirect.as_deref() {
            debug!(location, "server requested redirect");
            self.inner.navigator.navigate(location);
        }
        Error::Api(error)
    }

    /// Parse an error response body into an [`ApiError`].
    async fn parse_error_response(&self, response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();

        // Try to parse the backend's error format
        match response.json::<ErrorBody>().await {
            Ok(body) => ApiError::new(status, body.code, body.detail, body.redirect),
            Err(_) => ApiError::new(status, None, None, None),
        }
    }

    // ========================================================================
    // Request Convenience Methods
    // ========================================================================

    /// GET a JSON resource.
    pub async fn get<R>(&self, path: &str) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::GET, path);
        Ok(self.issue(&request).await?.json::<R>().await?)
    }

    /// GET a JSON resource with query parameters.
    pub async fn get_with_query<Q, R>(&self, path: &str, query: &Q) -> Result<R, Error>
    where
        Q: Serialize,
        R: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::GET, path).query(query)?;
        Ok(self.issue(&request).await?.json::<R>().await?)
    }

    /// POST a JSON body and parse the JSON response.
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, Error>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::POST, path).body(body)?;
        Ok(self.issue(&request).await?.json::<R>().await?)
    }

    /// POST a JSON body, ignoring the response body.
    pub async fn post_no_response<B>(&self, path: &str, body: &B) -> Result<(), Error>
    where
        B: Serialize,
    {
        let request = ApiRequest::new(Method::POST, path).body(body)?;
        self.issue(&request).await?;
        Ok(())
    }

    /// DELETE a resource.
    pub async fn delete(&self, path: &str) -> Result<(), Error> {
        let request = ApiRequest::new(Method::DELETE, path);
        self.issue(&request).await?;
        Ok(())
    }

    // ========================================================================
    // Session Lifecycle
    // ========================================================================

    /// Authenticate and establish a session.
    ///
    /// On success the server sets the session cookies; subsequent
    /// requests are authenticated automatically.
    #[instrument(skip(self, credentials), fields(base = %self.inner.base, email = %credentials.email()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<(), Error> {
        info!("creating session");

        let body = LoginRequest {
            email: credentials.email(),
            password: credentials.password(),
        };
        let request = ApiRequest::new(Method::POST, endpoints::OBTAIN_TOKEN).body(&body)?;

        // A 401 here carries a credential-failure detail, not a
        // token-expiry one, so it cannot enter the refresh path.
        self.issue(&request).await?;

        debug!("session created");
        Ok(())
    }

    /// Refresh the session explicitly.
    ///
    /// Joins an in-flight refresh if one exists; only one refresh call
    /// is ever issued per episode.
    #[instrument(skip(self), fields(base = %self.inner.base))]
    pub async fn refresh(&self) -> Result<(), Error> {
        self.refresh_session().await
    }

    /// End the session server-side.
    #[instrument(skip(self), fields(base = %self.inner.base))]
    pub async fn logout(&self) -> Result<(), Error> {
        info!("ending session");
        let request = ApiRequest::new(Method::POST, endpoints::LOGOUT);
        self.issue(&request).await?;
        Ok(())
    }

    /// Fetch the currently authenticated user.
    #[instrument(skip(self), fields(base = %self.inner.base))]
    pub async fn me(&self) -> Result<CurrentUser, Error> {
        debug!("fetching current user");
        self.get(endpoints::ME).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.inner.base)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let base = BaseUrl::new("https://acme.workbay.app").unwrap();
        let client = ApiClient::new(base.clone());
        assert_eq!(client.base_url().as_str(), base.as_str());
    }

    #[test]
    fn request_descriptor_builds_query_and_body() {
        let request = ApiRequest::new(Method::POST, "api/projects/")
            .query(&serde_json::json!({"page": 2}))
            .unwrap()
            .body(&serde_json::json!({"name": "Apollo"}))
            .unwrap();

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "api/projects/");
        assert_eq!(request.query.unwrap()["page"], 2);
        assert_eq!(request.body.unwrap()["name"], "Apollo");
    }
}
