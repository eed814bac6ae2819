//! Typed backend client.
//!
//! [`Endpoint`] enumerates every backend operation; [`ApiSurface`] is the
//! seam the scanner and auditor probe through, and [`ApiClient`] is its
//! production implementation on top of the [`Dispatcher`].

mod args;
mod endpoint;

pub use args::{CallArgs, Route};
pub use endpoint::{Endpoint, EndpointDescriptor, PROBE_EMAIL, PROBE_ID, PROBE_PASSWORD};

use crate::dispatch::{ApiError, Dispatcher};
use crate::session::SessionStore;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Something endpoints can be resolved against and invoked on.
#[async_trait]
pub trait ApiSurface: Send + Sync {
    /// HTTP binding for `endpoint`, or `None` when it is not wired.
    fn resolve(&self, endpoint: Endpoint) -> Option<Route>;

    async fn invoke(&self, endpoint: Endpoint, args: CallArgs) -> Result<Value, ApiError>;
}

/// Client for the LiveGo backend.
pub struct ApiClient {
    dispatcher: Arc<Dispatcher>,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(dispatcher: Arc<Dispatcher>, session: Arc<SessionStore>) -> Self {
        Self {
            dispatcher,
            session,
        }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Log in and persist the returned token and user.
    pub async fn login(&self, email: &str, password: &str) -> Result<Value, ApiError> {
        let response = self
            .invoke(Endpoint::AuthLogin, CallArgs::credentials(email, password))
            .await?;

        if let Some(token) = response.get("token").and_then(Value::as_str) {
            if let Err(e) = self.session.set_token(token) {
                tracing::warn!(error = %e, "Failed to persist session token");
            }
        }
        if let Some(user) = response.get("user") {
            if let Err(e) = self.session.set_user(user.clone()) {
                tracing::warn!(error = %e, "Failed to persist current user");
            }
        }
        Ok(response)
    }

    /// Log out; the local session is cleared even when the backend call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.invoke(Endpoint::AuthLogout, CallArgs::None).await;
        if let Err(e) = self.session.clear() {
            tracing::warn!(error = %e, "Failed to clear session");
        }
        result.map(|_| ())
    }

    pub async fn me(&self) -> Result<Value, ApiError> {
        self.invoke(Endpoint::AuthMe, CallArgs::None).await
    }
}

#[async_trait]
impl ApiSurface for ApiClient {
    fn resolve(&self, endpoint: Endpoint) -> Option<Route> {
        Some(endpoint.route())
    }

    async fn invoke(&self, endpoint: Endpoint, args: CallArgs) -> Result<Value, ApiError> {
        let route = self
            .resolve(endpoint)
            .ok_or_else(|| ApiError::Unwired(endpoint.path().to_string()))?;
        let (path, body) = route.render(&args)?;
        self.dispatcher.request(route.method, &path, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::MockTransport;
    use crate::tracker::{ApiTracker, HttpMethod};
    use std::time::Duration;

    fn mock_client() -> ApiClient {
        let tracker = Arc::new(ApiTracker::new());
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::new(MockTransport::new()),
            tracker,
            Duration::from_secs(10),
        ));
        ApiClient::new(dispatcher, Arc::new(SessionStore::in_memory()))
    }

    #[tokio::test]
    async fn test_invoke_renders_route() {
        let client = mock_client();
        client
            .invoke(Endpoint::UsersFollow, CallArgs::id("7"))
            .await
            .unwrap();

        let logs = client.dispatcher().tracker().logs();
        assert_eq!(logs[0].method, HttpMethod::Post);
        assert_eq!(logs[0].endpoint, "/users/7/follow");
    }

    #[tokio::test]
    async fn test_invoke_without_id_never_dispatches() {
        let client = mock_client();
        let err = client
            .invoke(Endpoint::StreamsGet, CallArgs::None)
            .await
            .unwrap_err();
        assert!(err.is_wiring());
        assert!(client.dispatcher().tracker().logs().is_empty());
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let client = mock_client();
        client.login("host@livego.com", "secret").await.unwrap();

        let token = client.session().token().unwrap();
        assert!(token.starts_with("mock-"));
        assert_eq!(client.session().user().unwrap()["email"], "host@livego.com");

        client.logout().await.unwrap();
        assert!(client.session().token().is_none());
    }

    #[tokio::test]
    async fn test_login_rejected_without_password() {
        let client = mock_client();
        let err = client.login("host@livego.com", "").await.unwrap_err();
        assert_eq!(err.status_code(), Some(400));
        assert!(client.session().token().is_none());
    }
}
