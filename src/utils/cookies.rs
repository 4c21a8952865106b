use cookie::{Cookie, SameSite, time::Duration};
use http::{HeaderMap, header};

use crate::config::Environment;

pub const SESSION_COOKIE: &str = "session";
pub const OAUTH_VERIFIER_COOKIE: &str = "oauth_verifier";

const SESSION_MAX_AGE_DAYS: i64 = 7;
const OAUTH_VERIFIER_MAX_AGE_MINUTES: i64 = 10;

/// Cookie attributes shared by every Set-Cookie this service writes.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    secure: bool,
}

impl CookiePolicy {
    pub fn new(environment: Environment) -> Self {
        Self {
            secure: environment.is_production(),
        }
    }

    fn same_site(&self) -> SameSite {
        // Cross-site front-ends need None, which browsers only accept with Secure.
        if self.secure {
            SameSite::None
        } else {
            SameSite::Lax
        }
    }

    fn session_base(&self, value: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, value))
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site())
            .path("/")
            .build()
    }

    pub fn session_cookie(&self, token: &str) -> String {
        let mut cookie = self.session_base(token.to_string());
        cookie.set_max_age(Duration::days(SESSION_MAX_AGE_DAYS));
        cookie.to_string()
    }

    pub fn clear_session_cookie(&self) -> String {
        let mut cookie = self.session_base(String::new());
        cookie.make_removal();
        cookie.to_string()
    }

    fn verifier_base(&self, value: String) -> Cookie<'static> {
        // Lax so the cookie survives the top-level redirect back from the provider.
        Cookie::build((OAUTH_VERIFIER_COOKIE, value))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/auth")
            .build()
    }

    pub fn verifier_cookie(&self, verifier: &str) -> String {
        let mut cookie = self.verifier_base(verifier.to_string());
        cookie.set_max_age(Duration::minutes(OAUTH_VERIFIER_MAX_AGE_MINUTES));
        cookie.to_string()
    }

    pub fn clear_verifier_cookie(&self) -> String {
        let mut cookie = self.verifier_base(String::new());
        cookie.make_removal();
        cookie.to_string()
    }
}

pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(|cookie| cookie.ok())
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// Session token from the `session` cookie, falling back to a bearer header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    read_cookie(headers, SESSION_COOKIE).or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn development_session_cookie_is_lax_and_http_only() {
        let cookie = CookiePolicy::new(Environment::Development).session_cookie("abc");

        assert!(cookie.starts_with("session=abc"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn production_session_cookie_is_cross_site() {
        let cookie = CookiePolicy::new(Environment::Production).session_cookie("abc");

        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=None"));
    }

    #[test]
    fn clearing_keeps_attributes_and_expires() {
        let cookie = CookiePolicy::new(Environment::Production).clear_session_cookie();

        assert!(cookie.starts_with("session=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("SameSite=None"));
        assert!(cookie.contains("Path=/"));
    }

    #[test]
    fn reads_named_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=tok.en.value; lang=en"),
        );

        assert_eq!(
            read_cookie(&headers, SESSION_COOKIE).as_deref(),
            Some("tok.en.value")
        );
        assert!(read_cookie(&headers, OAUTH_VERIFIER_COOKIE).is_none());
    }

    #[test]
    fn bearer_header_is_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(session_token(&headers).as_deref(), Some("xyz"));

        headers.insert(header::COOKIE, HeaderValue::from_static("session=from-cookie"));
        assert_eq!(session_token(&headers).as_deref(), Some("from-cookie"));
    }
}
