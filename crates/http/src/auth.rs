//! Role guard for gated route groups.
//!
//! The console never checks credentials itself; the upstream gateway
//! authenticates the session and injects the account's role into a trusted
//! header. This guard only maps that header onto the module's declared
//! [`RouteAccess`].

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use boek_kernel::roles::{Role, RouteAccess};

use crate::error::AppError;

/// Enforce `access` against the role header on one request.
pub async fn enforce(
    access: RouteAccess,
    header_name: &str,
    request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(header_name)
        .and_then(|value| value.to_str().ok());

    let Some(value) = header else {
        return AppError::unauthorized("missing role header").into_response();
    };

    match Role::from_header_value(value) {
        Some(role) if access.permits(role) => next.run(request).await,
        Some(_) => AppError::forbidden("this console area is restricted to another role")
            .into_response(),
        None => AppError::unauthorized(format!("unknown role '{value}'")).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use boek_kernel::roles::SYSTEM_ONLY;
    use tower::util::ServiceExt;

    fn guarded_router() -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn(
                move |request: Request, next: Next| async move {
                    enforce(SYSTEM_ONLY, "x-boek-role", request, next).await
                },
            ))
    }

    async fn status_for(role: Option<&str>) -> StatusCode {
        let mut request = HttpRequest::builder().uri("/");
        if let Some(role) = role {
            request = request.header("x-boek-role", role);
        }
        let response = guarded_router()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        assert_eq!(status_for(None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_role_is_forbidden() {
        assert_eq!(status_for(Some("issuer")).await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn matching_role_passes_through() {
        assert_eq!(status_for(Some("system")).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_role_is_unauthorized() {
        assert_eq!(status_for(Some("customer")).await, StatusCode::UNAUTHORIZED);
    }
}
