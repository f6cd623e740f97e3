use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};

pub const UNKNOWN_CLIENT: &str = "unknown";

const FORWARDED_FOR: &str = "x-forwarded-for";
const REAL_IP: &str = "x-real-ip";
const REMOTE_ADDR: &str = "remote-addr";

/// Best-effort client identity from forwarded-address headers.
///
/// These headers are client-supplied and trivially spoofed, so the result is
/// only good for approximate telemetry. Never use it for access control.
pub fn client_id(headers: &HeaderMap) -> String {
    let forwarded = header(headers, FORWARDED_FOR)
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    forwarded
        .or_else(|| header(headers, REAL_IP))
        .or_else(|| header(headers, REMOTE_ADDR))
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Extractor wrapper around [`client_id`]. Never rejects.
pub struct ClientId(pub String);

impl<S> FromRequestParts<S> for ClientId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientId(client_id(&parts.headers)))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn test_forwarded_for_first_value() {
        let map = headers(&[
            ("x-forwarded-for", " 1.2.3.4 , 10.0.0.1"),
            ("x-real-ip", "9.9.9.9"),
        ]);
        assert_eq!(client_id(&map), "1.2.3.4");
    }

    #[test]
    fn test_header_precedence() {
        let map = headers(&[("x-real-ip", "9.9.9.9"), ("remote-addr", "8.8.8.8")]);
        assert_eq!(client_id(&map), "9.9.9.9");

        let map = headers(&[("remote-addr", "8.8.8.8")]);
        assert_eq!(client_id(&map), "8.8.8.8");
    }

    #[test]
    fn test_blank_values_fall_through() {
        let map = headers(&[("x-forwarded-for", " , 1.1.1.1"), ("x-real-ip", "9.9.9.9")]);
        assert_eq!(client_id(&map), "9.9.9.9");

        let map = headers(&[("x-real-ip", "  ")]);
        assert_eq!(client_id(&map), UNKNOWN_CLIENT);
    }

    #[test]
    fn test_no_headers() {
        assert_eq!(client_id(&HeaderMap::new()), UNKNOWN_CLIENT);
    }

    #[test]
    fn test_non_ascii_header_ignored() {
        let mut map = HeaderMap::new();
        map.insert(
            "x-forwarded-for",
            HeaderValue::from_bytes(b"\xff\xfe").unwrap(),
        );
        map.insert("remote-addr", HeaderValue::from_static("8.8.8.8"));

        assert_eq!(client_id(&map), "8.8.8.8");
    }
}
