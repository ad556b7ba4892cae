use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use patient_cell::router::create_patient_router;
use physician_cell::router::physician_routes;
use shared_database::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic API is running!" }))
        .merge(auth_routes(state.clone()))
        .nest("/patients", create_patient_router(state.clone()))
        .nest("/physicians", physician_routes(state.clone()))
        .nest("/appointments", appointment_routes(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};
    use tower::ServiceExt;

    fn app() -> (Router, String) {
        let config = TestConfig::default().to_arc();
        let token = JwtTestUtils::create_test_token(&TestUser::default(), &config, None);
        (create_router(Arc::new(AppState::in_memory(config))), token)
    }

    #[tokio::test]
    async fn root_is_public() {
        let (app, _) = app();
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn cells_are_mounted_under_their_prefixes() {
        let (app, token) = app();

        for uri in ["/patients", "/physicians?page=0&size=5"] {
            let request = Request::builder()
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        }

        let request = Request::builder()
            .uri(format!("/appointments/{}", uuid_like()))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    fn uuid_like() -> &'static str {
        "00000000-0000-4000-8000-000000000000"
    }
}
