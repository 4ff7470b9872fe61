//! 应用上下文 - 会话与取消令牌
//!
//! `AppContext` is the single owner of the logged-in session. Views borrow
//! it through [`ViewScope`], which ties each request to the view's
//! lifetime.

use std::sync::Arc;

use parking_lot::RwLock;
use shared::client::{LoginRequest, LoginResponse, UserInfo};
use shared::{AppError, Capabilities, ErrorCode};
use tokio_util::sync::CancellationToken;

use crate::{ClientError, ClientResult, HttpClient, ViewScope};

/// Logged-in session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug)]
struct Inner {
    http: HttpClient,
    session: RwLock<Option<Session>>,
    /// Parent of every view token; replaced on logout
    root: RwLock<CancellationToken>,
}

/// Explicit application context
///
/// Cheap to clone; all clones share one session.
#[derive(Debug, Clone)]
pub struct AppContext {
    inner: Arc<Inner>,
}

impl AppContext {
    pub fn new(http: HttpClient) -> Self {
        Self {
            inner: Arc::new(Inner {
                http,
                session: RwLock::new(None),
                root: RwLock::new(CancellationToken::new()),
            }),
        }
    }

    pub fn http(&self) -> &HttpClient {
        &self.inner.http
    }

    /// Log in and store the session
    ///
    /// Empty credentials are refused before anything is sent.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<UserInfo> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ClientError::Validation(AppError::validation(
                "Email and password are required",
            )));
        }

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.inner.http.post("/api/auth/login", None, &request).await?;

        tracing::info!(user_id = response.user.id, "Logged in");
        let user = response.user.clone();
        *self.inner.session.write() = Some(Session {
            token: response.token,
            user: response.user,
        });
        Ok(user)
    }

    /// Resume a session from a stored token
    ///
    /// The token is checked against `/api/auth/me`; on failure the context
    /// stays logged out.
    pub async fn resume(&self, token: impl Into<String>) -> ClientResult<UserInfo> {
        let token = token.into();
        let user: UserInfo = self.inner.http.get("/api/auth/me", Some(&token)).await?;
        *self.inner.session.write() = Some(Session {
            token,
            user: user.clone(),
        });
        Ok(user)
    }

    /// Refresh the cached user from the server
    pub async fn refresh_user(&self) -> ClientResult<UserInfo> {
        let token = self.token()?;
        let user: UserInfo = self.inner.http.get("/api/auth/me", Some(&token)).await?;
        if let Some(session) = self.inner.session.write().as_mut() {
            session.user = user.clone();
        }
        Ok(user)
    }

    /// Log out
    ///
    /// The server call is best effort. The local session is always cleared
    /// and every open view is cancelled.
    pub async fn logout(&self) {
        let token = self.inner.session.read().as_ref().map(|s| s.token.clone());
        if let Some(token) = token
            && let Err(e) = self
                .inner
                .http
                .post_empty::<()>("/api/auth/logout", Some(&token))
                .await
        {
            tracing::warn!(error = %e, "Server logout failed; clearing session anyway");
        }

        *self.inner.session.write() = None;
        let old = std::mem::replace(&mut *self.inner.root.write(), CancellationToken::new());
        old.cancel();
        tracing::info!("Logged out");
    }

    pub fn session(&self) -> Option<Session> {
        self.inner.session.read().clone()
    }

    pub fn current_user(&self) -> Option<UserInfo> {
        self.inner.session.read().as_ref().map(|s| s.user.clone())
    }

    /// Capabilities of the current user; all false when logged out
    pub fn capabilities(&self) -> Capabilities {
        self.inner
            .session
            .read()
            .as_ref()
            .map(|s| s.user.capabilities)
            .unwrap_or_default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.session.read().is_some()
    }

    /// Bearer token of the current session
    pub fn token(&self) -> ClientResult<String> {
        self.inner
            .session
            .read()
            .as_ref()
            .map(|s| s.token.clone())
            .ok_or(ClientError::NotLoggedIn)
    }

    /// Open a scope for one view
    ///
    /// Dropping the scope, calling [`ViewScope::cancel`] or logging out
    /// cancels its in-flight requests.
    pub fn scope(&self) -> ViewScope {
        let token = self.inner.root.read().child_token();
        ViewScope::new(self.clone(), token)
    }

    /// Error for an action the current user may not perform
    pub(crate) fn not_permitted(action: &str) -> ClientError {
        ClientError::Validation(AppError::with_message(
            ErrorCode::PermissionDenied,
            format!("Not allowed to {action}"),
        ))
    }
}
