//! Session and profile cookies set at login.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::jwt::SESSION_TTL_DAYS;

/// Signed session JWT. HttpOnly.
pub const TOKEN: &str = "token";
/// Subject of the session. HttpOnly.
pub const UID: &str = "uid";
/// Profile cookies readable by the frontend.
pub const NAME: &str = "name";
pub const EMAIL: &str = "email";
pub const PICTURE: &str = "picture";

const ALL: [&str; 5] = [TOKEN, UID, NAME, EMAIL, PICTURE];

/// Profile shown to the frontend through readable cookies.
pub struct ProfileCookies<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub picture: Option<&'a str>,
}

fn build(name: &'static str, value: String, http_only: bool, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(http_only)
        .secure(secure)
        .same_site(SameSite::None)
        .path("/")
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .build()
}

/// Add the session pair and the profile cookies to `jar`.
pub fn with_session(
    jar: CookieJar,
    token: String,
    user_id: &str,
    profile: &ProfileCookies<'_>,
    secure: bool,
) -> CookieJar {
    jar.add(build(TOKEN, token, true, secure))
        .add(build(UID, user_id.to_string(), true, secure))
        .add(build(NAME, profile.name.to_string(), false, secure))
        .add(build(EMAIL, profile.email.to_string(), false, secure))
        .add(build(
            PICTURE,
            profile.picture.unwrap_or_default().to_string(),
            false,
            secure,
        ))
}

/// Expire every cookie set by [`with_session`], whether or not the request
/// carried it.
pub fn without_session(jar: CookieJar, secure: bool) -> CookieJar {
    ALL.into_iter().fold(jar, |jar, name| {
        let mut cookie = Cookie::build((name, ""))
            .secure(secure)
            .same_site(SameSite::None)
            .path("/")
            .build();
        cookie.make_removal();
        jar.add(cookie)
    })
}
