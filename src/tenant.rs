use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};

/// Header carrying the tenant identifier
pub const TENANT_ID_HEADER: &str = "x-tenant-id";
/// Header carrying the deployment stage identifier
pub const STAGE_ID_HEADER: &str = "x-stage-id";

/// The two-part isolation key scoping every read and write. Derived per
/// request, passed explicitly into every store/service call, never ambient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    pub tenant_id: String,
    pub stage_id: String,
}

impl TenantContext {
    pub fn new(tenant_id: impl Into<String>, stage_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            stage_id: stage_id.into(),
        }
    }

    /// Derives the context from request headers, falling back to the
    /// configured defaults. Extraction never fails: a missing, empty, or
    /// non-UTF-8 header simply yields the default.
    pub fn from_headers(headers: &HeaderMap, defaults: &TenantDefaults) -> Self {
        let tenant_id = header_value(headers, TENANT_ID_HEADER)
            .unwrap_or_else(|| defaults.tenant_id.clone());
        let stage_id =
            header_value(headers, STAGE_ID_HEADER).unwrap_or_else(|| defaults.stage_id.clone());
        Self {
            tenant_id,
            stage_id,
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Fallback identifiers applied when the isolation headers are absent.
#[derive(Clone, Debug)]
pub struct TenantDefaults {
    pub tenant_id: String,
    pub stage_id: String,
}

impl From<&crate::config::AppConfig> for TenantDefaults {
    fn from(cfg: &crate::config::AppConfig) -> Self {
        Self {
            tenant_id: cfg.default_tenant_id.clone(),
            stage_id: cfg.default_stage_id.clone(),
        }
    }
}

/// Middleware deriving the tenant context for every request and exposing it
/// to handlers via request extensions.
pub async fn tenant_context_middleware(
    State(defaults): State<TenantDefaults>,
    mut request: Request,
    next: Next,
) -> Response {
    let ctx = TenantContext::from_headers(request.headers(), &defaults);
    tracing::debug!(tenant_id = %ctx.tenant_id, stage_id = %ctx.stage_id, "tenant context resolved");
    request.extensions_mut().insert(ctx);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        extract::Extension,
        http::{Request as HttpRequest, StatusCode},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn defaults() -> TenantDefaults {
        TenantDefaults {
            tenant_id: "default".into(),
            stage_id: "dev".into(),
        }
    }

    async fn echo_context(Extension(ctx): Extension<TenantContext>) -> (StatusCode, String) {
        (StatusCode::OK, format!("{}/{}", ctx.tenant_id, ctx.stage_id))
    }

    fn app() -> Router {
        Router::new()
            .route("/", get(echo_context))
            .layer(axum::middleware::from_fn_with_state(
                defaults(),
                tenant_context_middleware,
            ))
    }

    async fn body_string(request: HttpRequest<Body>) -> String {
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn headers_present_take_precedence() {
        let request = HttpRequest::builder()
            .uri("/")
            .header(TENANT_ID_HEADER, "acme")
            .header(STAGE_ID_HEADER, "prod")
            .body(Body::empty())
            .unwrap();
        assert_eq!(body_string(request).await, "acme/prod");
    }

    #[tokio::test]
    async fn missing_headers_fall_back_to_defaults() {
        let request = HttpRequest::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(body_string(request).await, "default/dev");
    }

    #[tokio::test]
    async fn blank_header_is_treated_as_absent() {
        let request = HttpRequest::builder()
            .uri("/")
            .header(TENANT_ID_HEADER, "   ")
            .header(STAGE_ID_HEADER, "qa")
            .body(Body::empty())
            .unwrap();
        assert_eq!(body_string(request).await, "default/qa");
    }

    #[test]
    fn from_headers_never_fails_on_binary_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            TENANT_ID_HEADER,
            axum::http::HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap(),
        );
        let ctx = TenantContext::from_headers(&headers, &defaults());
        assert_eq!(ctx.tenant_id, "default");
    }
}
