//! CORS middleware.
//!
//! Only configured origins are echoed back. Preflight `OPTIONS` requests are
//! answered with `204 No Content` without reaching the routes.

use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::sync::Arc;

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::{
        Method,
        header::{self, HeaderMap, HeaderValue},
    },
};

const ALLOW_METHODS: &str = "GET, PUT, POST, PATCH, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization, X-Requested-With";
const MAX_AGE_SECONDS: &str = "86400";

/// CORS middleware factory.
pub struct CorsMiddleware {
    allowed_origins: Arc<Vec<String>>,
}

impl CorsMiddleware {
    pub fn new(allowed_origins: Vec<String>) -> Self {
        Self {
            allowed_origins: Arc::new(allowed_origins),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CorsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = CorsMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsMiddlewareService {
            service,
            allowed_origins: self.allowed_origins.clone(),
        }))
    }
}

pub struct CorsMiddlewareService<S> {
    service: S,
    allowed_origins: Arc<Vec<String>>,
}

fn apply_headers(headers: &mut HeaderMap, origin: Option<&HeaderValue>) {
    if let Some(origin) = origin {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(MAX_AGE_SECONDS),
    );
    headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("Content-Disposition"),
    );
}

impl<S, B> Service<ServiceRequest> for CorsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let allowed_origin = req
            .headers()
            .get(header::ORIGIN)
            .filter(|value| {
                value
                    .to_str()
                    .is_ok_and(|o| self.allowed_origins.iter().any(|a| a == o))
            })
            .cloned();

        if req.method() == Method::OPTIONS {
            let mut response = HttpResponse::NoContent().finish();
            apply_headers(response.headers_mut(), allowed_origin.as_ref());

            let (http_req, _payload) = req.into_parts();
            let srv_response = ServiceResponse::new(http_req, response);
            return Box::pin(async move { Ok(srv_response.map_into_right_body()) });
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            apply_headers(res.headers_mut(), allowed_origin.as_ref());
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test, web};

    fn app_origins() -> Vec<String> {
        vec!["https://lab.io".to_string()]
    }

    #[actix_web::test]
    async fn preflight_short_circuits() {
        let app = test::init_service(
            App::new()
                .wrap(CorsMiddleware::new(app_origins()))
                .route("/x", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/x")
            .insert_header((header::ORIGIN, "https://lab.io"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://lab.io"
        );
        assert_eq!(resp.headers().get(header::ACCESS_CONTROL_MAX_AGE).unwrap(), "86400");
    }

    #[actix_web::test]
    async fn unknown_origin_is_not_echoed() {
        let app = test::init_service(
            App::new()
                .wrap(CorsMiddleware::new(app_origins()))
                .route("/x", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/x")
            .insert_header((header::ORIGIN, "https://evil.example"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_EXPOSE_HEADERS).unwrap(),
            "Content-Disposition"
        );
    }
}
