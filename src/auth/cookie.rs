use axum::http::header::COOKIE;
use axum::http::HeaderMap;

pub const SESSION_COOKIE: &str = "SID";

/// Set-Cookie value for a fresh session. Lax works for the dev frontend on
/// localhost; the hosted frontend sits on another origin and needs
/// None+Secure for the browser to send the cookie at all.
pub fn session_cookie(token: &str, max_age_seconds: u64, dev_mode: bool) -> String {
    let site = if dev_mode {
        "SameSite=Lax"
    } else {
        "SameSite=None; Secure"
    };
    format!("{SESSION_COOKIE}={token}; Max-Age={max_age_seconds}; Path=/; HttpOnly; {site}")
}

/// Set-Cookie value that clears the session cookie. Attributes must match
/// the ones used when setting it, or the browser keeps the old cookie.
pub fn clear_session_cookie(dev_mode: bool) -> String {
    session_cookie("", 0, dev_mode)
}

/// Pull the session token out of the Cookie header, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn dev_cookie_is_lax_and_http_only() {
        let cookie = session_cookie("tok123", 86400, true);
        assert_eq!(
            cookie,
            "SID=tok123; Max-Age=86400; Path=/; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn production_cookie_is_cross_site_and_secure() {
        let cookie = session_cookie("tok123", 86400, false);
        assert!(cookie.contains("SameSite=None"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("HttpOnly"));
    }

    #[test]
    fn clearing_zeroes_the_lifetime() {
        let cookie = clear_session_cookie(true);
        assert!(cookie.starts_with("SID=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn token_is_found_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; SID=abc-123; lang=en"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn missing_or_empty_token_is_none() {
        assert_eq!(session_token(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("SID=; theme=dark"));
        assert_eq!(session_token(&headers), None);
    }
}
