use chrono::Duration;
use facemark_api::auth::JwtAuthenticator;
use facemark_core::Principal;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-0123456789abcdefghijklmnop";

/// A fresh principal and a valid bearer token for it.
pub fn test_user() -> (Principal, String) {
    let principal = Principal::new(Uuid::new_v4());
    (principal, token_for(principal))
}

pub fn token_for(principal: Principal) -> String {
    JwtAuthenticator::new(TEST_JWT_SECRET)
        .issue_token(principal, Duration::minutes(10))
        .expect("Failed to sign test token")
}

pub fn expired_token_for(principal: Principal) -> String {
    JwtAuthenticator::new(TEST_JWT_SECRET)
        .issue_token(principal, Duration::minutes(-10))
        .expect("Failed to sign test token")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
