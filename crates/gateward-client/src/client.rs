//! The gateward API client.
//!
//! [`Client`] owns the HTTP transport, the configuration, and the shared
//! [`Session`], and provides the single choke point every backend call passes
//! through: no request is sent while unauthenticated, the credential is
//! attached per the configured scheme, and every response status maps onto
//! exactly one [`ClientError`] kind. Exactly one network call is made per
//! invocation; there are no hidden retries.

use reqwest::header::{HeaderValue, AUTHORIZATION, COOKIE, SET_COOKIE};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{Config, CredentialScheme};
use crate::error::{ClientError, Result};
use crate::groups::Groups;
use crate::rules::Rules;
use crate::session::Session;
use crate::users::Users;

/// Response header carrying a refreshed credential artifact.
const REFRESH_HEADER: &str = "x-refresh-token";

/// Name of the backend's session cookie.
const SESSION_COOKIE: &str = "jwt";

/// Login payload (`POST auth`).
#[derive(Debug, Serialize)]
struct LoginPayload<'a> {
    login: &'a str,
    hash: &'a str,
}

/// Client for the gateward admin API.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    config: Config,
    session: Session,
}

impl Client {
    /// Create a new client for the configured backend.
    ///
    /// The session starts unauthenticated; call [`Client::login`] before using
    /// the resource stores.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should never happen with
    /// default TLS).
    #[must_use]
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            config,
            session: Session::new(),
        }
    }

    /// Create a client with a custom reqwest client.
    #[must_use]
    pub fn with_client(http: reqwest::Client, config: Config) -> Self {
        Self {
            http,
            config,
            session: Session::new(),
        }
    }

    /// The shared session state.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The client configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The Users resource store.
    #[must_use]
    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    /// The Groups resource store.
    #[must_use]
    pub fn groups(&self) -> Groups<'_> {
        Groups::new(self)
    }

    /// The Rules resource store.
    #[must_use]
    pub fn rules(&self) -> Rules<'_> {
        Rules::new(self)
    }

    // =========================================================================
    // Session operations
    // =========================================================================

    /// Authenticate with a login name and password hash.
    ///
    /// On success the returned credential artifact is stored and subsequent
    /// requests carry it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The credentials are rejected (`InvalidCredentials`); the session
    ///   stays unauthenticated
    /// - A network or server error occurs (`Unavailable`)
    /// - The backend accepts the login but returns no credential (`Api`)
    pub async fn login(&self, login: &str, hash: &str) -> Result<()> {
        let response = self
            .http
            .post(self.config.auth_url())
            .json(&LoginPayload { login, hash })
            .send()
            .await
            .map_err(|e| ClientError::Unavailable(format!("login request failed: {e}")))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(ClientError::Unavailable(format!("HTTP {status}")));
        }
        if status.is_success() {
            let token = extract_credential(&response).ok_or_else(|| {
                ClientError::Api("login response carried no credential".to_string())
            })?;
            self.session.store(token);
            tracing::debug!(login, "session established");
            return Ok(());
        }

        tracing::debug!(login, status = %status, "login rejected");
        match status.as_u16() {
            401 | 403 => Err(ClientError::InvalidCredentials),
            code => {
                let body = response.text().await.unwrap_or_default();
                Err(ClientError::from_status(code, body))
            }
        }
    }

    /// Check whether the session is still valid, revalidating with the backend.
    ///
    /// A locally held credential is never trusted on its own: this performs a
    /// `GET auth` round trip. An expired or revoked session degrades to
    /// `Ok(false)` (clearing the stored credential) rather than erroring,
    /// since that is an expected steady-state condition. With no credential
    /// held, returns `Ok(false)` without any network call.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` on network failure or a server-side error.
    pub async fn is_authenticated(&self) -> Result<bool> {
        let Some(token) = self.session.credential() else {
            return Ok(false);
        };

        let request = self.attach_credential(self.http.get(self.config.auth_url()), &token)?;
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Unavailable(format!("auth check failed: {e}")))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(ClientError::Unavailable(format!("HTTP {status}")));
        }
        if status.is_success() {
            self.persist_refresh(&response);
            return Ok(true);
        }

        tracing::debug!(status = %status, "session no longer valid");
        self.session.clear();
        Ok(false)
    }

    /// Check whether the authenticated account has super-user privileges.
    ///
    /// Performs a `GET auth/super` round trip. A denial (any non-5xx
    /// rejection) degrades to `Ok(false)` without touching the session, since
    /// an ordinary admin account is a normal state, not a stale credential.
    /// With no credential held, returns `Ok(false)` without any network call.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` on network failure or a server-side error.
    pub async fn is_super(&self) -> Result<bool> {
        let Some(token) = self.session.credential() else {
            return Ok(false);
        };

        let request = self.attach_credential(self.http.get(self.config.super_url()), &token)?;
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Unavailable(format!("super check failed: {e}")))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(ClientError::Unavailable(format!("HTTP {status}")));
        }
        Ok(status.is_success())
    }

    /// End the session.
    ///
    /// Best-effort notifies the backend's logout endpoint (the outcome is
    /// ignored), then clears the stored credential. A no-op when already
    /// unauthenticated; always safe to call.
    pub async fn logout(&self) {
        if let Some(token) = self.session.credential() {
            let request = self.attach_credential(self.http.get(self.config.logout_url()), &token);
            let notified = match request {
                Ok(request) => request.send().await.is_ok(),
                Err(_) => false,
            };
            if !notified {
                tracing::debug!("logout notification not delivered");
            }
            self.session.clear();
        }
    }

    // =========================================================================
    // Authenticated request choke point
    // =========================================================================

    /// Perform an authenticated request and decode the JSON response body.
    ///
    /// This is the generic entry point behind every resource store operation.
    /// Only `GET`, `POST`, `PATCH`, and `DELETE` are accepted; any other
    /// method is a caller bug and fails with `Usage` before anything is sent.
    ///
    /// # Errors
    ///
    /// - `NotAuthenticated` if no credential is held (nothing is sent)
    /// - `Usage` for an unsupported method (nothing is sent)
    /// - `Unavailable` on transport failure or a 5xx response
    /// - `NotAuthorized` / `NotFound` / `Validation` per the status table
    /// - `Api` for any other non-success status or a malformed body
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&serde_json::Value>,
    ) -> Result<T> {
        let response = self.dispatch(method, path, payload).await?;
        decode(response).await
    }

    /// Typed GET returning a decoded body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.dispatch(Method::GET, path, None::<&()>).await?;
        decode(response).await
    }

    /// Typed POST returning a decoded body.
    pub(crate) async fn post<T, B>(&self, path: &str, payload: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let response = self.dispatch(Method::POST, path, Some(payload)).await?;
        decode(response).await
    }

    /// Typed PATCH returning a decoded body.
    pub(crate) async fn patch<T, B>(&self, path: &str, payload: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let response = self.dispatch(Method::PATCH, path, Some(payload)).await?;
        decode(response).await
    }

    /// POST whose response body is discarded (several backend endpoints
    /// answer plain text such as `"added."`).
    pub(crate) async fn post_unit<B>(&self, path: &str, payload: &B) -> Result<()>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.dispatch(Method::POST, path, Some(payload)).await?;
        Ok(())
    }

    /// DELETE whose response body is discarded.
    pub(crate) async fn delete_unit(&self, path: &str) -> Result<()> {
        self.dispatch(Method::DELETE, path, None::<&()>).await?;
        Ok(())
    }

    /// The single dispatch path: authentication gate, method gate, credential
    /// attachment, one network call, status mapping, refresh persistence.
    async fn dispatch<B>(&self, method: Method, path: &str, payload: Option<&B>) -> Result<Response>
    where
        B: Serialize + Sync + ?Sized,
    {
        let Some(token) = self.session.credential() else {
            return Err(ClientError::NotAuthenticated);
        };

        let supported = method == Method::GET
            || method == Method::POST
            || method == Method::PATCH
            || method == Method::DELETE;
        if !supported {
            return Err(ClientError::Usage(format!("unsupported method {method}")));
        }

        let url = self.config.api_url(path);
        let mut request = self.http.request(method.clone(), url.as_str());
        request = self.attach_credential(request, &token)?;
        if let Some(body) = payload {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(method = %method, url = %url, error = %e, "request failed");
            ClientError::Unavailable(format!("request failed: {e}"))
        })?;

        let status = response.status();
        if status.is_server_error() {
            tracing::error!(method = %method, url = %url, status = %status, "server error");
            return Err(ClientError::Unavailable(format!("HTTP {status}")));
        }
        if status.is_success() {
            self.persist_refresh(&response);
            tracing::debug!(method = %method, url = %url, status = %status, "request ok");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(method = %method, url = %url, status = %status, body = %body, "request refused");

        // The backend has revoked access; drop the stale credential so the
        // next call fails fast as NotAuthenticated.
        if status.as_u16() == 403 {
            self.session.clear();
        }

        Err(ClientError::from_status(status.as_u16(), body))
    }

    /// Attach the session credential per the configured scheme.
    fn attach_credential(&self, request: RequestBuilder, token: &str) -> Result<RequestBuilder> {
        let (name, value) = match self.config.credential_scheme {
            CredentialScheme::Bearer => (AUTHORIZATION, format!("Bearer {token}")),
            CredentialScheme::Cookie => (COOKIE, format!("{SESSION_COOKIE}={token}")),
        };
        let value = HeaderValue::from_str(&value)
            .map_err(|_| ClientError::Api("credential is not header-safe".to_string()))?;
        Ok(request.header(name, value))
    }

    /// Store a refreshed credential carried on a successful response.
    fn persist_refresh(&self, response: &Response) {
        if let Some(token) = response
            .headers()
            .get(REFRESH_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            tracing::debug!("credential refreshed by backend");
            self.session.store(token);
        }
    }
}

/// Decode a successful response body as JSON.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| ClientError::Api(format!("invalid response body: {e}")))
}

/// Pull the credential artifact out of a login response: the refresh header
/// when present, otherwise the backend's session cookie.
fn extract_credential(response: &Response) -> Option<String> {
    if let Some(token) = response
        .headers()
        .get(REFRESH_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        return Some(token.to_string());
    }

    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookie| {
            let value = cookie.strip_prefix(SESSION_COOKIE)?.strip_prefix('=')?;
            let end = value.find(';').unwrap_or(value.len());
            Some(value[..end].to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = Client::new(Config::new("http://localhost:8080"));
        assert!(!client.session().has_credential());
        assert_eq!(client.config().auth_url(), "http://localhost:8080/auth");
    }

    #[test]
    fn login_payload_shape() {
        let payload = LoginPayload {
            login: "alice",
            hash: "abc123",
        };
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"login":"alice","hash":"abc123"}"#
        );
    }
}
