//! Log-out route handler that invalidates the session cookie.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use serde_json::json;

use crate::auth::cookie::invalidate_auth_cookie;

/// Invalidate the session cookie.
///
/// Always succeeds, even when the client was not logged in.
pub async fn post_log_out(jar: PrivateCookieJar) -> Response {
    let jar = invalidate_auth_cookie(jar);

    (jar, Json(json!({ "message": "Logged out" }))).into_response()
}

#[cfg(test)]
mod log_out_tests {
    use axum::{
        body::Body,
        http::{Response, StatusCode, header::SET_COOKIE},
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::auth::{
        DEFAULT_COOKIE_DURATION, UserID,
        cookie::{COOKIE_TOKEN, set_auth_cookie},
    };

    use super::post_log_out;

    #[tokio::test]
    async fn log_out_expires_session_cookie() {
        let jar = PrivateCookieJar::new(Key::from(&Sha512::digest("42")));
        let jar = set_auth_cookie(jar, UserID::new(123), DEFAULT_COOKIE_DURATION).unwrap();

        let response = post_log_out(jar).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_session_cookie_expired(&response);
    }

    fn assert_session_cookie_expired(response: &Response<Body>) {
        let mut found = false;

        for cookie_header in response.headers().get_all(SET_COOKIE) {
            let cookie = Cookie::parse(cookie_header.to_str().unwrap()).unwrap();

            if cookie.name() != COOKIE_TOKEN {
                continue;
            }

            found = true;
            assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
            assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        }

        assert!(found, "no session cookie in the response");
    }
}
