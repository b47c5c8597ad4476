//! Integration tests for the Firebase identity gateway using a wiremock server

use std::sync::Arc;

use async_trait::async_trait;
use movie_watchlist::domain::LinkedProvider;
use movie_watchlist::events::EventBus;
use movie_watchlist::integrations::{
    AccessTokenSource, FederatedCredentialSource, FirebaseEndpoints, FirebaseIdentityGateway,
    IdentityGateway,
};
use movie_watchlist::services::SessionController;
use movie_watchlist::{AppError, AppResult, AuthErrorKind};

use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const SIGN_IN: &str = "/identitytoolkit/accounts:signInWithPassword";
const LOOKUP: &str = "/identitytoolkit/accounts:lookup";
const DELETE: &str = "/identitytoolkit/accounts:delete";

fn gateway(server: &MockServer) -> FirebaseIdentityGateway {
    FirebaseIdentityGateway::with_endpoints(
        "web-key".to_string(),
        FirebaseEndpoints::single(&server.uri()),
        Arc::new(EventBus::new()),
    )
    .unwrap()
}

fn error_body(message: &str) -> serde_json::Value {
    json!({ "error": { "code": 400, "message": message } })
}

async fn mount_sign_in(server: &MockServer, local_id: &str, id_token: &str) {
    Mock::given(method("POST"))
        .and(path(SIGN_IN))
        .and(query_param("key", "web-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": local_id,
            "idToken": id_token,
            "refreshToken": "refresh-1",
            "expiresIn": "3600"
        })))
        .mount(server)
        .await;
}

async fn mount_lookup(server: &MockServer, providers: &[&str]) {
    let infos: Vec<_> = providers
        .iter()
        .map(|p| json!({ "providerId": p }))
        .collect();

    Mock::given(method("POST"))
        .and(path(LOOKUP))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{
                "localId": "uid-1",
                "email": "ada@example.com",
                "providerUserInfo": infos
            }]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sign_in_notifies_session_and_reads_providers() {
    let server = MockServer::start().await;
    mount_sign_in(&server, "uid-1", "id-token-1").await;
    mount_lookup(&server, &["password", "google.com"]).await;

    let gateway = gateway(&server);
    let session = SessionController::activate(&gateway);
    assert!(!session.session().loading);
    assert!(session.session().identity.is_none());

    let identity = gateway
        .sign_in_with_password("ada@example.com", "secret1")
        .await
        .unwrap();

    assert_eq!(identity.uid, "uid-1");
    assert!(identity.providers.contains(&LinkedProvider::Password));
    assert!(identity.has_federated_provider());
    assert_eq!(session.current_user_id().as_deref(), Some("uid-1"));
    assert_eq!(gateway.access_token().await.unwrap(), "id-token-1");
}

#[tokio::test]
async fn test_error_codes_are_parsed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SIGN_IN))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body("INVALID_LOGIN_CREDENTIALS")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/identitytoolkit/accounts:signUp"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            "WEAK_PASSWORD : Password should be at least 6 characters",
        )))
        .mount(&server)
        .await;

    let gateway = gateway(&server);

    assert!(matches!(
        gateway.sign_in_with_password("ada@example.com", "nope").await,
        Err(AppError::Auth(AuthErrorKind::InvalidCredentials))
    ));
    assert!(matches!(
        gateway.sign_up_with_password("ada@example.com", "abc").await,
        Err(AppError::Auth(AuthErrorKind::WeakPassword))
    ));
}

#[tokio::test]
async fn test_stale_session_delete_requires_reauth() {
    let server = MockServer::start().await;
    mount_sign_in(&server, "uid-1", "id-token-1").await;
    mount_lookup(&server, &["password"]).await;

    Mock::given(method("POST"))
        .and(path(DELETE))
        .and(body_partial_json(json!({ "idToken": "id-token-1" })))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(error_body("CREDENTIAL_TOO_OLD_LOGIN_AGAIN")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway(&server);
    gateway
        .sign_in_with_password("ada@example.com", "secret1")
        .await
        .unwrap();

    let result = gateway.delete_current_identity().await;
    assert!(matches!(result, Err(AppError::ReauthRequired)));
    assert!(gateway.current_identity().is_some());
}

#[tokio::test]
async fn test_delete_signs_out() {
    let server = MockServer::start().await;
    mount_sign_in(&server, "uid-1", "id-token-1").await;
    mount_lookup(&server, &["password"]).await;

    Mock::given(method("POST"))
        .and(path(DELETE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "kind": "identitytoolkit#DeleteAccountResponse" })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway(&server);
    let session = SessionController::activate(&gateway);
    gateway
        .sign_in_with_password("ada@example.com", "secret1")
        .await
        .unwrap();

    gateway.delete_current_identity().await.unwrap();

    assert!(gateway.current_identity().is_none());
    assert!(session.session().identity.is_none());
}

#[tokio::test]
async fn test_reauth_with_other_account_is_rejected() {
    let server = MockServer::start().await;
    mount_lookup(&server, &["password"]).await;

    Mock::given(method("POST"))
        .and(path(SIGN_IN))
        .and(body_partial_json(json!({ "password": "secret1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-1",
            "idToken": "id-token-1",
            "refreshToken": "refresh-1"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(SIGN_IN))
        .and(body_partial_json(json!({ "password": "other" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-2",
            "idToken": "id-token-2",
            "refreshToken": "refresh-2"
        })))
        .mount(&server)
        .await;

    let gateway = gateway(&server);
    gateway
        .sign_in_with_password("ada@example.com", "secret1")
        .await
        .unwrap();

    assert!(matches!(
        gateway.reauthenticate_with_password("other").await,
        Err(AppError::Auth(AuthErrorKind::UserMismatch))
    ));
    assert!(gateway.reauthenticate_with_password("secret1").await.is_ok());
}

struct CancellingSource;

#[async_trait]
impl FederatedCredentialSource for CancellingSource {
    async fn obtain_google_id_token(&self) -> AppResult<Option<String>> {
        Ok(None)
    }
}

#[tokio::test]
async fn test_federated_without_source_or_token() {
    let server = MockServer::start().await;

    let plain = gateway(&server);
    assert!(matches!(
        plain.sign_in_federated().await,
        Err(AppError::Auth(AuthErrorKind::FederatedUnavailable))
    ));

    let cancelling = gateway(&server).with_federated_source(Arc::new(CancellingSource));
    assert!(matches!(
        cancelling.sign_in_federated().await,
        Err(AppError::Auth(AuthErrorKind::FederatedCancelled))
    ));
}

#[tokio::test]
async fn test_password_reset_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/identitytoolkit/accounts:sendOobCode"))
        .and(body_partial_json(json!({
            "requestType": "PASSWORD_RESET",
            "email": "ada@example.com"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "email": "ada@example.com" })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(gateway(&server)
        .send_password_reset("ada@example.com")
        .await
        .is_ok());
}
