//! Cookie-backed browser sessions
//!
//! The whole session lives client side in one signed cookie, so the server
//! keeps no session table. A session carries at most two things:
//!
//! - the signed-in username
//! - a one-shot flash message, shown by the next rendered page and then dropped
//!
//! Handlers take a [`Session`] extractor, mutate it, and hand it back as part of
//! their response; the cookie is only rewritten when something changed.
//! [`SignedIn`] guards routes that need an authenticated user.

use std::convert::Infallible;

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, IntoResponseParts, Response, ResponseParts};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::html::page::redirect_home;

pub const SESSION_COOKIE: &str = "flatcms_session";
pub const SIGN_IN_REQUIRED: &str = "You must be signed in to do that.";

/// Serialized cookie payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flash: Option<String>,
}

impl SessionData {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.flash.is_none()
    }

    fn encode(&self) -> Result<String, serde_json::Error> {
        Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(self)?))
    }

    fn decode(value: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

pub struct Session {
    jar: SignedCookieJar,
    data: SessionData,
    changed: bool,
}

impl Session {
    pub fn current_user(&self) -> Option<&str> {
        self.data.username.as_deref()
    }

    pub fn sign_in(&mut self, username: impl Into<String>) {
        self.data.username = Some(username.into());
        self.changed = true;
    }

    pub fn sign_out(&mut self) {
        self.data.username = None;
        self.changed = true;
    }

    /// Queue `message` for the next rendered page, replacing any pending one.
    pub fn set_flash(&mut self, message: impl Into<String>) {
        self.data.flash = Some(message.into());
        self.changed = true;
    }

    /// Consume the pending flash message.
    pub fn take_flash(&mut self) -> Option<String> {
        let flash = self.data.flash.take();
        if flash.is_some() {
            self.changed = true;
        }
        flash
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }
}

fn session_cookie(value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::<Key>::from_request_parts(parts, state).await?;
        // unsigned, tampered or unreadable cookies all start a fresh session
        let data = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| SessionData::decode(cookie.value()))
            .unwrap_or_default();

        Ok(Self {
            jar,
            data,
            changed: false,
        })
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if !self.changed {
            return Ok(res);
        }

        let jar = if self.data.is_empty() {
            self.jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
        } else {
            match self.data.encode() {
                Ok(value) => self.jar.add(session_cookie(value)),
                Err(e) => {
                    tracing::error!("failed to encode session: {}", e);
                    self.jar
                }
            }
        };

        jar.into_response_parts(res)
    }
}

/// Username of the signed-in user.
///
/// Rejects with a redirect to `/` carrying the "must be signed in" flash, so the
/// handler (and whatever it would have changed) never runs.
#[derive(Debug, Clone)]
pub struct SignedIn(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for SignedIn
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let mut session = match Session::from_request_parts(parts, state).await {
            Ok(session) => session,
            Err(never) => match never {},
        };

        if let Some(username) = session.current_user() {
            return Ok(SignedIn(username.to_string()));
        }

        tracing::info!(
            method = %parts.method,
            path = %parts.uri.path(),
            "rejecting request without a signed-in user"
        );
        session.set_flash(SIGN_IN_REQUIRED);
        Err((session, redirect_home()).into_response())
    }
}
