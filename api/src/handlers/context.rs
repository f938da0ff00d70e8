//! Extractor for the caller's address and user agent

use std::future::{ready, Ready};
use std::net::IpAddr;

use actix_web::{dev::Payload, http::header, web, Error, FromRequest, HttpRequest};
use sg_core::RequestContext;

use crate::state::HttpSettings;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// [`RequestContext`] resolved from the request
///
/// Proxy headers are only honoured when [`HttpSettings::trust_proxy_headers`]
/// is set. Otherwise the socket peer address is used. A header value that
/// does not parse as an IP address is ignored.
#[derive(Debug, Clone)]
pub struct ClientContext(pub RequestContext);

impl ClientContext {
    pub fn from_request_parts(req: &HttpRequest, trust_proxy_headers: bool) -> Self {
        let ip = if trust_proxy_headers {
            forwarded_ip(req).or_else(|| peer_ip(req))
        } else {
            peer_ip(req)
        };
        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        ClientContext(RequestContext::new(ip.unwrap_or_default(), user_agent))
    }
}

fn forwarded_ip(req: &HttpRequest) -> Option<String> {
    let header_value = |name: &str| req.headers().get(name).and_then(|v| v.to_str().ok());

    // Right-most entry is the one our proxy appended
    header_value(X_FORWARDED_FOR)
        .and_then(|list| list.rsplit(',').next())
        .and_then(parse_ip)
        .or_else(|| header_value(X_REAL_IP).and_then(parse_ip))
}

fn parse_ip(value: &str) -> Option<String> {
    value.trim().parse::<IpAddr>().ok().map(|ip| ip.to_string())
}

fn peer_ip(req: &HttpRequest) -> Option<String> {
    req.peer_addr().map(|addr| addr.ip().to_string())
}

impl FromRequest for ClientContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let trust = req
            .app_data::<web::Data<HttpSettings>>()
            .map(|s| s.trust_proxy_headers)
            .unwrap_or(false);
        ready(Ok(Self::from_request_parts(req, trust)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn peer() -> std::net::SocketAddr {
        "10.0.0.9:50000".parse().unwrap()
    }

    #[test]
    fn test_peer_address_when_proxies_untrusted() {
        let req = TestRequest::default()
            .peer_addr(peer())
            .insert_header((X_FORWARDED_FOR, "203.0.113.7"))
            .insert_header((header::USER_AGENT, "curl/8.0"))
            .to_http_request();
        let ClientContext(ctx) = ClientContext::from_request_parts(&req, false);
        assert_eq!(ctx.ip, "10.0.0.9");
        assert_eq!(ctx.user_agent, "curl/8.0");
    }

    #[test]
    fn test_forwarded_for_takes_proxy_appended_hop() {
        let req = TestRequest::default()
            .peer_addr(peer())
            .insert_header((X_FORWARDED_FOR, "1.1.1.1, 203.0.113.7"))
            .to_http_request();
        let ClientContext(ctx) = ClientContext::from_request_parts(&req, true);
        assert_eq!(ctx.ip, "203.0.113.7");
    }

    #[test]
    fn test_spoofed_left_hops_do_not_change_address() {
        let resolve = |chain: &str| {
            let req = TestRequest::default()
                .peer_addr(peer())
                .insert_header((X_FORWARDED_FOR, chain))
                .to_http_request();
            ClientContext::from_request_parts(&req, true).0.ip
        };
        assert_eq!(resolve("9.9.9.1, 203.0.113.7"), "203.0.113.7");
        assert_eq!(resolve("9.9.9.2, 203.0.113.7"), "203.0.113.7");
    }

    #[test]
    fn test_unparseable_forwarded_value_falls_back_to_peer() {
        let req = TestRequest::default()
            .peer_addr(peer())
            .insert_header((X_FORWARDED_FOR, "203.0.113.7, not-an-ip:*"))
            .to_http_request();
        let ClientContext(ctx) = ClientContext::from_request_parts(&req, true);
        assert_eq!(ctx.ip, "10.0.0.9");

        let req = TestRequest::default()
            .peer_addr(peer())
            .insert_header((X_REAL_IP, "fake ip value"))
            .to_http_request();
        let ClientContext(ctx) = ClientContext::from_request_parts(&req, true);
        assert_eq!(ctx.ip, "10.0.0.9");
    }

    #[test]
    fn test_forwarded_ipv6_is_normalized() {
        let req = TestRequest::default()
            .peer_addr(peer())
            .insert_header((X_FORWARDED_FOR, " 2001:DB8::1 "))
            .to_http_request();
        let ClientContext(ctx) = ClientContext::from_request_parts(&req, true);
        assert_eq!(ctx.ip, "2001:db8::1");
    }

    #[test]
    fn test_real_ip_fallback() {
        let req = TestRequest::default()
            .peer_addr(peer())
            .insert_header((X_REAL_IP, "198.51.100.2"))
            .to_http_request();
        let ClientContext(ctx) = ClientContext::from_request_parts(&req, true);
        assert_eq!(ctx.ip, "198.51.100.2");
    }

    #[test]
    fn test_unknown_address_is_empty() {
        let req = TestRequest::default().to_http_request();
        let ClientContext(ctx) = ClientContext::from_request_parts(&req, false);
        assert!(!ctx.has_ip());
    }
}
