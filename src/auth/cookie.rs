use axum::http::header::{InvalidHeaderValue, COOKIE};
use axum::http::{HeaderMap, HeaderValue};

pub const AUTH_COOKIE: &str = "auth_token";

/// Build the `Set-Cookie` value carrying the session token. `HttpOnly`
/// keeps it away from scripts; `Secure` is appended per configuration.
pub fn session_cookie(
    token: &str,
    max_age_secs: u64,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie =
        format!("{AUTH_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// The matching clearing cookie. Logout is purely a client instruction, so
/// this is all it takes.
pub fn clear_session_cookie(secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{AUTH_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub fn extract_auth_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == AUTH_COOKIE {
            return Some(val.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_sets_attributes() {
        let value = session_cookie("abc.def.ghi", 3600, false).expect("valid cookie");
        let s = value.to_str().unwrap();
        assert!(s.starts_with("auth_token=abc.def.ghi;"));
        assert!(s.contains("HttpOnly"));
        assert!(s.contains("SameSite=Lax"));
        assert!(s.contains("Max-Age=3600"));
        assert!(!s.contains("Secure"));
    }

    #[test]
    fn session_cookie_appends_secure_when_configured() {
        let value = session_cookie("tok", 60, true).expect("valid cookie");
        assert!(value.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let value = clear_session_cookie(false).expect("valid cookie");
        let s = value.to_str().unwrap();
        assert!(s.starts_with("auth_token=;"));
        assert!(s.contains("Max-Age=0"));
    }

    #[test]
    fn extract_finds_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; auth_token=abc.def; lang=en"),
        );
        assert_eq!(extract_auth_token(&headers).as_deref(), Some("abc.def"));
    }

    #[test]
    fn extract_returns_none_without_cookie_header() {
        assert_eq!(extract_auth_token(&HeaderMap::new()), None);
    }

    #[test]
    fn extract_returns_none_for_other_cookies_only() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; lang=en"));
        assert_eq!(extract_auth_token(&headers), None);
    }
}
