//! Session Gateway
//!
//! Turns backend sign-in/sign-out calls into session store updates and
//! navigation. Sign-out fails open: the local session is cleared whether or
//! not the backend hears about it.

use crate::api::ApiClient;
use crate::routing::{Route, Router};
use crate::session::{SessionStore, SessionUser};
use async_trait::async_trait;
use campusdesk_core::{
    log_operation_error, log_operation_start, log_operation_success, CampusError, CampusResult,
    ErrorContext,
};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Sign-in form
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `data` of a successful sign-in
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub user: SessionUser,
    #[serde(alias = "token")]
    pub access_token: String,
}

/// Backend authentication endpoints
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> CampusResult<LoginPayload>;

    async fn logout(&self, access_token: Option<&str>) -> CampusResult<()>;

    /// Current user for `access_token`, used to refresh the profile
    async fn current_user(&self, access_token: &str) -> CampusResult<SessionUser>;
}

/// [`AuthApi`] over the REST backend
pub struct HttpAuthApi {
    client: Arc<ApiClient>,
}

impl HttpAuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    fn missing_data(operation: &str) -> CampusError {
        CampusError::Api {
            message: format!("{} response carried no data", operation),
            status: None,
            context: ErrorContext::new("auth_api").with_operation(operation),
        }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> CampusResult<LoginPayload> {
        let request = self
            .client
            .request(Method::POST, "auth/login", None)
            .json(credentials);
        self.client
            .execute(request, "login")
            .await?
            .ok_or_else(|| Self::missing_data("login"))
    }

    async fn logout(&self, access_token: Option<&str>) -> CampusResult<()> {
        let request = self
            .client
            .request(Method::POST, "auth/logout", access_token);
        self.client
            .execute::<serde_json::Value>(request, "logout")
            .await?;
        Ok(())
    }

    async fn current_user(&self, access_token: &str) -> CampusResult<SessionUser> {
        let request = self
            .client
            .request(Method::GET, "auth/me", Some(access_token));
        self.client
            .execute(request, "current_user")
            .await?
            .ok_or_else(|| Self::missing_data("current_user"))
    }
}

pub struct SessionGateway {
    api: Arc<dyn AuthApi>,
}

impl SessionGateway {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self { api }
    }

    /// Sign in and go to the role's home page.
    ///
    /// On failure the session is left as it was and the error is returned
    /// for the login form to show.
    pub async fn login(
        &self,
        session: &mut SessionStore,
        router: &mut Router,
        credentials: &Credentials,
    ) -> CampusResult<Route> {
        log_operation_start!("login", email = %credentials.email);

        let payload = match self.api.login(credentials).await {
            Ok(payload) => payload,
            Err(e) => {
                log_operation_error!("login", e);
                return Err(e);
            }
        };

        let home = Route::home_for(payload.user.role);
        session.login(payload.user, payload.access_token);
        router.navigate(home);

        log_operation_success!("login", home = %home);
        Ok(home)
    }

    /// Sign out locally, go to `/login`, then tell the backend.
    ///
    /// The local clear happens before the network call, so neither a
    /// backend failure nor a dropped future can leave the client signed in.
    /// Backend errors are logged and not retried.
    pub async fn logout(&self, session: &mut SessionStore, router: &mut Router) {
        log_operation_start!("logout");

        let token = session.access_token().map(str::to_owned);
        session.logout();
        router.navigate(Route::Login);

        match self.api.logout(token.as_deref()).await {
            Ok(()) => {
                log_operation_success!("logout");
            }
            Err(e) => warn!(error = %e, "Backend logout failed; local session already cleared"),
        }
    }

    /// Reload the user record from the backend.
    ///
    /// A rejected token signs the user out locally.
    pub async fn refresh_profile(
        &self,
        session: &mut SessionStore,
        router: &mut Router,
    ) -> CampusResult<()> {
        let Some(token) = session.access_token().map(str::to_owned) else {
            return Ok(());
        };

        match self.api.current_user(&token).await {
            Ok(user) => {
                session.set_user(user);
                Ok(())
            }
            Err(e @ CampusError::Authentication { .. }) => {
                warn!(error = %e, "Access token rejected; signing out");
                session.logout();
                router.navigate(Route::Login);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}
