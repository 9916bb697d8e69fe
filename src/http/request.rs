//! Request identity.
//!
//! A UUID v4 request ID is attached as early as possible so every log line
//! and the response share one correlation handle.

use axum::http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID end to end.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates a UUID v4 request ID for each incoming request.
#[derive(Clone, Copy, Default)]
pub struct GatewayRequestId;

impl MakeRequestId for GatewayRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_is_a_uuid() {
        let mut maker = GatewayRequestId;
        let request = Request::builder().body(()).unwrap();

        let id = maker.make_request_id(&request).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut maker = GatewayRequestId;
        let request = Request::builder().body(()).unwrap();

        let a = maker.make_request_id(&request).unwrap();
        let b = maker.make_request_id(&request).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
