use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::{cookies, jwt};

/// Caller identified by the session cookies issued at login.
///
/// Add this as a handler parameter to require a session. The `token` cookie
/// must carry a valid session JWT; when a `uid` cookie is also sent it must
/// name the same subject.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: String,
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = jar
            .get(cookies::TOKEN)
            .map(|c| c.value())
            .filter(|v| !v.is_empty())
            .ok_or(AppError::TokenMissing)?;

        let claims = jwt::verify(token, &state.config.auth.session_secret)
            .map_err(|_| AppError::TokenInvalid)?;

        if jar
            .get(cookies::UID)
            .is_some_and(|uid| uid.value() != claims.sub)
        {
            return Err(AppError::TokenInvalid);
        }

        Ok(SessionUser {
            user_id: claims.sub,
        })
    }
}
