//! Client identifier derivation.

use axum::http::HeaderMap;

/// Identifier used when no client-identifying header is present.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derive the rate-limit key for a request from its headers.
///
/// Prefers the first entry of `x-forwarded-for` (the original client when the
/// request passed through proxies), then `x-real-ip`, then [`UNKNOWN_CLIENT`].
/// All requests sharing a key share one quota window.
pub fn client_key(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    UNKNOWN_CLIENT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_forwarded_for_single_value() {
        let headers = headers(&[("x-forwarded-for", "203.0.113.7")]);
        assert_eq!(client_key(&headers), "203.0.113.7");
    }

    #[test]
    fn test_forwarded_for_takes_first_of_list() {
        let headers = headers(&[("x-forwarded-for", "203.0.113.7, 10.0.0.1, 10.0.0.2")]);
        assert_eq!(client_key(&headers), "203.0.113.7");
    }

    #[test]
    fn test_forwarded_for_preferred_over_real_ip() {
        let headers = headers(&[
            ("x-forwarded-for", "203.0.113.7"),
            ("x-real-ip", "198.51.100.4"),
        ]);
        assert_eq!(client_key(&headers), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_fallback() {
        let headers = headers(&[("x-real-ip", "198.51.100.4")]);
        assert_eq!(client_key(&headers), "198.51.100.4");
    }

    #[test]
    fn test_no_headers_is_unknown() {
        assert_eq!(client_key(&HeaderMap::new()), UNKNOWN_CLIENT);
    }

    #[test]
    fn test_empty_forwarded_for_falls_through() {
        let headers = headers(&[("x-forwarded-for", "  "), ("x-real-ip", "198.51.100.4")]);
        assert_eq!(client_key(&headers), "198.51.100.4");
    }

    #[test]
    fn test_whitespace_trimmed() {
        let headers = headers(&[("x-forwarded-for", "  203.0.113.7 , 10.0.0.1")]);
        assert_eq!(client_key(&headers), "203.0.113.7");
    }
}
