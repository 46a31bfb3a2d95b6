//! Session handling with encrypted private cookies.
//!
//! The session cookie holds a JSON [Token] naming the user and when the session
//! expires. The cookie is encrypted and signed by [PrivateCookieJar], so clients
//! can neither read nor forge it.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::UserID};

/// The name of the cookie holding the session token.
pub(crate) const COOKIE_TOKEN: &str = "session";

/// The default duration for which sessions are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::days(30);

/// The contents of the session cookie.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub(crate) struct Token {
    pub user_id: UserID,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

/// Add a session cookie for `user_id` to the cookie jar that expires `duration` from now.
///
/// # Errors
///
/// Returns an error if the expiry overflows or the token cannot be serialized.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or_else(|| Error::SessionError("session expiry overflowed".to_owned()))?;

    set_token(jar, &Token {
        user_id,
        expires_at,
    })
}

fn set_token(jar: PrivateCookieJar, token: &Token) -> Result<PrivateCookieJar, Error> {
    let value =
        serde_json::to_string(token).map_err(|error| Error::SessionError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, value))
            .expires(token.expires_at)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Set the session cookie to an invalid value and set its max age to zero, which should delete
/// the cookie on the client side.
pub(crate) fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the session token from `jar`.
///
/// # Errors
///
/// Returns [Error::Unauthorized] if the cookie is missing, malformed or expired.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::Unauthorized)?;
    let token: Token =
        serde_json::from_str(cookie.value_trimmed()).map_err(|_| Error::Unauthorized)?;

    if token.expires_at <= OffsetDateTime::now_utc() {
        return Err(Error::Unauthorized);
    }

    Ok(token)
}

/// Set the expiry of the session in `jar` to the later of now plus `duration`
/// and the current expiry.
///
/// The cookie jar is not modified if an error is returned.
pub(crate) fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;
    let new_expiry = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or(Error::Unauthorized)?;

    set_token(jar, &Token {
        user_id: token.user_id,
        expires_at: max(token.expires_at, new_expiry),
    })
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime, macros::datetime};

    use crate::{Error, auth::UserID};

    use super::{
        COOKIE_TOKEN, Token, extend_auth_cookie_duration_if_needed, get_token_from_cookies,
        invalidate_auth_cookie, set_auth_cookie,
    };

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        let key = Key::from(&hash);
        PrivateCookieJar::new(key)
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(1),
            "got date time {left:?}, want {right:?}"
        );
    }

    #[test]
    fn set_cookie_round_trips_user_id() {
        let jar = set_auth_cookie(get_jar(), UserID::new(42), Duration::minutes(5)).unwrap();

        let token = get_token_from_cookies(&jar).unwrap();

        assert_eq!(token.user_id, UserID::new(42));
        assert_date_time_close(
            token.expires_at,
            OffsetDateTime::now_utc() + Duration::minutes(5),
        );
    }

    #[test]
    fn cookie_is_secure() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::minutes(5)).unwrap();
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn missing_cookie_is_unauthorized() {
        assert_eq!(get_token_from_cookies(&get_jar()), Err(Error::Unauthorized));
    }

    #[test]
    fn garbage_cookie_is_unauthorized() {
        let jar = get_jar().add(Cookie::new(COOKIE_TOKEN, "FOOBAR"));

        assert_eq!(get_token_from_cookies(&jar), Err(Error::Unauthorized));
    }

    #[test]
    fn expired_cookie_is_unauthorized() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::seconds(-5)).unwrap();

        assert_eq!(get_token_from_cookies(&jar), Err(Error::Unauthorized));
    }

    #[test]
    fn invalidated_cookie_is_unauthorized() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::minutes(5)).unwrap();

        let jar = invalidate_auth_cookie(jar);

        assert_eq!(get_token_from_cookies(&jar), Err(Error::Unauthorized));
    }

    #[test]
    fn extend_moves_expiry_forward() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::seconds(5)).unwrap();

        let jar = extend_auth_cookie_duration_if_needed(jar, Duration::minutes(5)).unwrap();

        let token = get_token_from_cookies(&jar).unwrap();
        assert_date_time_close(
            token.expires_at,
            OffsetDateTime::now_utc() + Duration::minutes(5),
        );
    }

    #[test]
    fn extend_keeps_later_expiry() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::days(7)).unwrap();

        let jar = extend_auth_cookie_duration_if_needed(jar, Duration::minutes(5)).unwrap();

        let token = get_token_from_cookies(&jar).unwrap();
        assert_date_time_close(token.expires_at, OffsetDateTime::now_utc() + Duration::days(7));
    }

    #[test]
    fn token_serializes_expiry_as_rfc3339() {
        let token = Token {
            user_id: UserID::new(1),
            expires_at: datetime!(2025-12-21 00:00:00 UTC),
        };

        let json = serde_json::to_string(&token).unwrap();

        assert_eq!(json, r#"{"user_id":1,"expires_at":"2025-12-21T00:00:00Z"}"#);
        assert_eq!(serde_json::from_str::<Token>(&json).unwrap(), token);
    }
}
