// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session cookie handling.
//!
//! The session token travels in the `accessToken` cookie. It is `HttpOnly`
//! and `SameSite=Lax`, expires together with the token, and gets `Secure`
//! when the deployment is served over HTTPS (`SESSION_COOKIE_SECURE`).

use axum::http::{
    header::{InvalidHeaderValue, AUTHORIZATION, COOKIE},
    HeaderMap, HeaderValue,
};
use chrono::DateTime;

use super::{AuthError, IdentitySeed, SessionToken, TokenCodec};

/// Name of the session cookie.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Cookie `Expires` format (RFC 7231 IMF-fixdate).
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Issue a session token for `seed` and return the `Set-Cookie` value carrying it.
pub fn issue_session_cookie(
    tokens: &TokenCodec,
    seed: &IdentitySeed,
    secure: bool,
) -> Result<HeaderValue, AuthError> {
    let session = tokens.issue(seed)?;
    Ok(session_cookie(&session, secure)?)
}

/// Build the `Set-Cookie` value carrying a freshly issued token.
pub fn session_cookie(session: &SessionToken, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age = session.claims.exp - session.claims.iat;
    let mut cookie = format!(
        "{ACCESS_TOKEN_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}",
        session.token
    );
    if let Some(expires) = DateTime::from_timestamp(session.claims.exp, 0) {
        cookie.push_str(&format!("; Expires={}", expires.format(HTTP_DATE_FORMAT)));
    }
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Build a `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{ACCESS_TOKEN_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; \
         Expires=Thu, 01 Jan 1970 00:00:00 GMT"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Find the session token: `Authorization: Bearer` first, then the cookie.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    extract_bearer_token(headers).or_else(|| extract_cookie_token(headers))
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn extract_cookie_token(headers: &HeaderMap) -> Option<String> {
    // Browsers may send several Cookie headers over HTTP/2.
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let Some((key, val)) = pair.trim().split_once('=') else {
                continue;
            };
            let val = val.trim();
            if key.trim() == ACCESS_TOKEN_COOKIE && !val.is_empty() {
                return Some(val.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{IdentityClaims, SESSION_TTL_SECS};
    use uuid::Uuid;

    fn session(exp_offset: i64) -> SessionToken {
        let iat = 1_700_000_000;
        SessionToken {
            token: "header.payload.signature".to_string(),
            claims: IdentityClaims {
                id: Uuid::new_v4(),
                name: "A".to_string(),
                iat,
                exp: iat + exp_offset,
            },
        }
    }

    #[test]
    fn cookie_is_http_only_and_expires_with_token() {
        let cookie = session_cookie(&session(SESSION_TTL_SECS), false).unwrap();
        let cookie = cookie.to_str().unwrap();

        assert!(cookie.starts_with("accessToken=header.payload.signature;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=604800"));
        // 1_700_000_000 + 7 days
        assert!(cookie.contains("Expires=Tue, 21 Nov 2023 22:13:20 GMT"), "{cookie}");
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn secure_flag_is_configurable() {
        let cookie = session_cookie(&session(SESSION_TTL_SECS), true).unwrap();
        assert!(cookie.to_str().unwrap().ends_with("; Secure"));

        let cleared = clear_session_cookie(true).unwrap();
        assert!(cleared.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn clearing_cookie_expires_it_immediately() {
        let cookie = clear_session_cookie(false).unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("accessToken=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn issued_cookie_carries_a_decodable_token() {
        let tokens = TokenCodec::new(b"session-test-secret-session-test-secret");
        let seed = IdentitySeed {
            id: Uuid::new_v4(),
            name: "A".to_string(),
        };

        let cookie = issue_session_cookie(&tokens, &seed, false).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, cookie.to_str().unwrap().split(';').next().unwrap().parse().unwrap());

        let token = extract_session_token(&headers).unwrap();
        assert_eq!(tokens.decode(&token).unwrap().seed(), seed);
    }

    #[test]
    fn token_from_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_session_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; accessToken=abc.def.ghi; lang=en"),
        );
        assert_eq!(extract_session_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn header_takes_precedence_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        headers.insert(COOKIE, HeaderValue::from_static("accessToken=from-cookie"));
        assert_eq!(extract_session_token(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn no_token_when_absent_or_empty() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_session_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        headers.insert(COOKIE, HeaderValue::from_static("accessToken="));
        assert_eq!(extract_session_token(&headers), None);
    }
}
