use axum::{Json, extract::State};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::auth::{
    LoginRequest, LoginResponse, MessageResponse, UserProfile, validate_login_request,
};
use crate::state::AppState;
use crate::store::NewUser;
use crate::utils::cookies::{self, ProfileCookies};
use crate::utils::jwt;

/// Sign in with an identity-provider ID token.
#[utoipa::path(
    post,
    path = "/auth/google",
    tag = "Auth",
    operation_id = "loginWithGoogle",
    summary = "Sign in with a Google ID token",
    description = "Verifies the ID token, creates the user on first login and sets the session \
        cookies (`token`, `uid`) together with readable `name`, `email` and `picture` cookies.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed body (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Rejected ID token (INVALID_ID_TOKEN)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, payload), fields(user_id))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    // The prediction service scales to zero; wake it while the user signs in.
    let predictor = state.predictor.clone();
    tokio::spawn(async move { predictor.warm_up().await });

    validate_login_request(&payload)?;

    let identity = state
        .identity
        .verify_credential(payload.id_token.trim())
        .await?;
    tracing::Span::current().record("user_id", identity.subject.as_str());

    let created = state
        .records
        .ensure_user(&NewUser {
            id: identity.subject.clone(),
            display_name: identity.display_name.clone(),
            email: identity.email.clone(),
            picture_url: identity.picture_url.clone(),
        })
        .await?;
    if created {
        info!("Created user on first login");
    }

    let token = jwt::sign(&identity.subject, &state.config.auth.session_secret)
        .map_err(|e| AppError::Internal(format!("JWT sign error: {e}")))?;

    let jar = cookies::with_session(
        jar,
        token,
        &identity.subject,
        &ProfileCookies {
            name: &identity.display_name,
            email: &identity.email,
            picture: identity.picture_url.as_deref(),
        },
        state.config.auth.cookie_secure,
    );

    Ok((
        jar,
        Json(LoginResponse {
            message: "Login successful".into(),
            user: UserProfile::from(identity),
        }),
    ))
}

/// Clear the session cookies.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    operation_id = "logout",
    summary = "Sign out",
    responses((status = 200, description = "Logout successful", body = MessageResponse)),
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    (
        cookies::without_session(jar, state.config.auth.cookie_secure),
        Json(MessageResponse::new("Logout successful")),
    )
}
