//! Request ids: one per request, echoed back in `X-Request-ID`.

use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use tracing::Instrument;
use uuid::Uuid;

pub static REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied id that is reused as-is.
const MAX_INCOMING_LEN: usize = 128;

/// The id of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    fn generate() -> Self {
        RequestId(Uuid::new_v4().to_string())
    }

    /// Caller-supplied id, if it is short printable ASCII.
    fn incoming(req: &ServiceRequest) -> Option<Self> {
        req.headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| {
                !v.is_empty()
                    && v.len() <= MAX_INCOMING_LEN
                    && v.bytes().all(|b| b.is_ascii_graphic())
            })
            .map(|v| RequestId(v.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Attaches a [`RequestId`] to every request and runs the rest of the
/// chain inside a span carrying it.
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestIdService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService { service }))
    }
}

pub struct RequestIdService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = RequestId::incoming(&req).unwrap_or_else(RequestId::generate);
        req.extensions_mut().insert(request_id.clone());

        let span = tracing::info_span!(
            "request_id",
            request_id = %request_id.as_str(),
            method = %req.method(),
            path = %req.path(),
        );
        let fut = self.service.call(req);

        Box::pin(
            async move {
                let mut res = fut.await?;
                if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
                    res.headers_mut()
                        .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                }
                Ok(res)
            }
            .instrument(span),
        )
    }
}

impl actix_web::FromRequest for RequestId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    /// Outside the middleware (tests, misconfigured apps) a fresh id is made.
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let request_id = req
            .extensions()
            .get::<RequestId>()
            .cloned()
            .unwrap_or_else(RequestId::generate);

        ready(Ok(request_id))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpResponse, test, web};

    use super::*;

    async fn echo(id: RequestId) -> HttpResponse {
        HttpResponse::Ok().body(id.0)
    }

    async fn call(req: test::TestRequest) -> (String, String) {
        let app = test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .route("/", web::get().to(echo)),
        )
        .await;
        let resp = test::call_service(&app, req.uri("/").to_request()).await;
        let header = resp
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        (header, body)
    }

    #[actix_rt::test]
    async fn reuses_incoming_id() {
        let (header, body) =
            call(test::TestRequest::get().insert_header((REQUEST_ID_HEADER, "abc-123"))).await;
        assert_eq!(header, "abc-123");
        assert_eq!(body, "abc-123");
    }

    #[actix_rt::test]
    async fn generates_id_when_missing_or_unusable() {
        let (header, body) = call(test::TestRequest::get()).await;
        assert!(Uuid::parse_str(&header).is_ok());
        assert_eq!(header, body);

        let long = "x".repeat(MAX_INCOMING_LEN + 1);
        let (header, _) =
            call(test::TestRequest::get().insert_header((REQUEST_ID_HEADER, long.as_str()))).await;
        assert!(Uuid::parse_str(&header).is_ok());
    }
}
