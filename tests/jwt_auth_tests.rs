// SPDX-License-Identifier: MIT

//! JWT authentication tests.
//!
//! These tests verify that JWT tokens created by the auth routes can be
//! decoded by the auth middleware, catching compatibility issues early.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use podium_api::middleware::auth::{create_jwt, Claims};

#[test]
fn test_jwt_roundtrip() {
    // This test verifies that a JWT created by the auth flow can be decoded
    // by the middleware. If either side changes the Claims structure or
    // algorithm, this test will fail.

    let signing_key = b"test_signing_key_32_bytes_long!!";
    let uid = "5e3f0c1a-user";

    // Create token (like routes/auth.rs does)
    let token = create_jwt(uid, signing_key).expect("Failed to create JWT");

    // Decode token (like middleware does)
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(&token, &key, &validation)
        .expect("Failed to decode JWT - check Claims struct compatibility");

    // Verify the claims match
    assert_eq!(token_data.claims.sub, uid);
    assert!(token_data.claims.exp > 0);
    assert!(token_data.claims.iat > 0);
    assert!(token_data.claims.exp > token_data.claims.iat);
}

#[test]
fn test_jwt_rejects_wrong_key() {
    let token = create_jwt("u1", b"key_one_32_bytes_long_exactly!!!").unwrap();

    let key = DecodingKey::from_secret(b"key_two_32_bytes_long_exactly!!!");
    let validation = Validation::new(Algorithm::HS256);

    assert!(decode::<Claims>(&token, &key, &validation).is_err());
}

#[test]
fn test_jwt_expiration_is_future() {
    use std::time::{SystemTime, UNIX_EPOCH};

    let signing_key = b"test_signing_key_32_bytes_long!!";
    let token = create_jwt("u1", signing_key).unwrap();

    let key = DecodingKey::from_secret(signing_key);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false; // We'll check manually

    let token_data = decode::<Claims>(&token, &key, &validation).unwrap();

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    // Token should expire at least 29 days in the future
    assert!(
        token_data.claims.exp > now + 86400 * 29,
        "Token expiration should be ~30 days in the future"
    );
}
