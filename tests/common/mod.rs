#![allow(dead_code)]

use axum_test::TestServer;
use huddle::core::AppState;
use sqlx::SqlitePool;
use std::sync::Arc;

pub const TEST_JWT_SECRET: &str = "test-secret-not-for-production";

/// Creates an AppState for the tests, default policies.
pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState::new(pool, TEST_JWT_SECRET.to_string()))
}

/// Creates a TestServer over the real router.
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = huddle::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Mints a session token the way the platform's session provider would.
pub fn create_test_jwt(user_id: &str) -> String {
    huddle::core::auth::encode_token(user_id, TEST_JWT_SECRET)
        .expect("Failed to create session token")
}
