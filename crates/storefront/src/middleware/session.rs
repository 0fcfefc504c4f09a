//! Session cookie configuration.
//!
//! The cookie carries the signed session token and nothing else. Its lifetime
//! matches the token expiry, so the browser drops it around the time the
//! server would start rejecting it anyway.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::services::auth::token::SESSION_TTL_DAYS;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "angora_session";

/// Build the session cookie for a freshly issued token.
///
/// `secure` should be set in production, where the site is served over HTTPS.
#[must_use]
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .build()
}

/// Add the session cookie to the jar.
#[must_use]
pub fn set_session(jar: CookieJar, token: String, secure: bool) -> CookieJar {
    jar.add(session_cookie(token, secure))
}

/// Replace the session cookie with an expired one (logout).
///
/// The removal cookie is always emitted, whether or not the request carried
/// a session.
#[must_use]
pub fn clear_session(jar: CookieJar, secure: bool) -> CookieJar {
    let mut cookie = session_cookie(String::new(), secure);
    cookie.make_removal();
    jar.add(cookie)
}

/// Read the raw session token, if the browser sent one.
#[must_use]
pub fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE_NAME).map(Cookie::value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::header::SET_COOKIE;
    use axum::response::IntoResponse;

    use super::*;

    fn set_cookie_headers(jar: CookieJar) -> Vec<String> {
        let response = (jar, ()).into_response();
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_owned())
            .collect()
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok".to_owned(), false);
        assert_eq!(cookie.name(), "angora_session");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
    }

    #[test]
    fn test_secure_in_production() {
        let cookie = session_cookie("tok".to_owned(), true);
        assert_eq!(cookie.secure(), Some(true));
        assert!(cookie.to_string().contains("Secure"));
    }

    #[test]
    fn test_set_session_is_readable() {
        let jar = set_session(CookieJar::new(), "tok".to_owned(), false);
        assert_eq!(session_token(&jar), Some("tok"));
        assert_eq!(session_token(&CookieJar::new()), None);
    }

    #[test]
    fn test_clear_session_emits_expired_cookie() {
        let headers = set_cookie_headers(clear_session(CookieJar::new(), false));
        assert_eq!(headers.len(), 1);

        let header = headers.first().unwrap();
        assert!(header.starts_with("angora_session=;"), "{header}");
        assert!(header.contains("Path=/"), "{header}");
        assert!(header.contains("Max-Age=0"), "{header}");
    }
}
