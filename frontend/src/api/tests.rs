use super::*;
use rolegate_shared::protocol::HttpMethod;
use crate::test_support::{
    BASE_URL, Failure, FakeBackend, MemoryTokenStore, seeded_backend, test_api,
};

// =========================================================
// 请求构建
// =========================================================

#[tokio::test]
async fn test_base_url_is_normalised() {
    let backend = seeded_backend();
    let tokens = MemoryTokenStore::default();
    let api = ApiClient::new("http://backend.test/api///", backend.clone(), tokens);

    assert_eq!(api.base_url(), "http://backend.test/api");
    let _ = api.obtain_token("alice", "good-pw").await;

    let requests = backend.requests();
    assert_eq!(requests[0].url, format!("{}token/", BASE_URL));
}

#[tokio::test]
async fn test_token_exchange_is_anonymous() {
    let backend = seeded_backend();
    let tokens = MemoryTokenStore::with_token("stale");
    let api = test_api(&backend, &tokens);

    let token = api.obtain_token("alice", "good-pw").await.unwrap();
    assert!(!token.is_empty());

    let req = &backend.requests()[0];
    assert_eq!(req.method, HttpMethod::Post);
    assert!(req.header(HEADER_AUTHORIZATION).is_none());
    assert_eq!(req.header("Content-Type"), Some("application/json"));

    let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "username": "alice", "password": "good-pw" })
    );

    // 换取令牌不会写入存储
    assert_eq!(tokens.current().as_deref(), Some("stale"));
}

#[tokio::test]
async fn test_stored_token_is_sent_as_bearer() {
    let backend = seeded_backend();
    let token = backend.issue_token("alice");
    let tokens = MemoryTokenStore::with_token(&token);
    let api = test_api(&backend, &tokens);

    let users = api.list_users().await.unwrap();
    assert_eq!(users.len(), 3);

    let req = &backend.requests()[0];
    assert_eq!(req.method, HttpMethod::Get);
    assert_eq!(req.url, format!("{}users/", BASE_URL));
    assert_eq!(
        req.header(HEADER_AUTHORIZATION),
        Some(format!("Bearer {}", token).as_str())
    );
    assert!(req.body.is_none());
}

#[tokio::test]
async fn test_explicit_token_overrides_store() {
    let backend = seeded_backend();
    let fresh = backend.issue_token("amy");
    let tokens = MemoryTokenStore::default();
    let api = test_api(&backend, &tokens);

    let me = api.identity_with_token(&fresh).await.unwrap();
    assert_eq!(me.username, "amy");
    assert_eq!(me.role, Role::Manager);
    assert!(tokens.current().is_none());
}

#[tokio::test]
async fn test_update_role_sends_role_only_body() {
    let backend = seeded_backend();
    let tokens = MemoryTokenStore::with_token(&backend.issue_token("alice"));
    let api = test_api(&backend, &tokens);
    let bob = backend.id_of("bob");

    let updated = api.update_role(bob, Role::Manager).await.unwrap();
    assert_eq!(updated.role, Role::Manager);

    let req = backend.requests().pop().unwrap();
    assert_eq!(req.method, HttpMethod::Put);
    assert_eq!(req.url, format!("{}users/{}/", BASE_URL, bob));
    assert_eq!(req.body.as_deref(), Some(r#"{"role":"manager"}"#));
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let backend = seeded_backend();
    let tokens = MemoryTokenStore::with_token(&backend.issue_token("alice"));
    let api = test_api(&backend, &tokens);

    api.delete_user(backend.id_of("bob")).await.unwrap();
    assert_eq!(backend.users().len(), 2);
}

// =========================================================
// 错误分类
// =========================================================

#[tokio::test]
async fn test_bad_credentials_are_authentication_errors() {
    let backend = seeded_backend();
    let api = test_api(&backend, &MemoryTokenStore::default());

    let err = api.obtain_token("alice", "wrong").await.unwrap_err();
    assert_eq!(err, ApiError::Authentication);

    let err = api.obtain_token("nobody", "good-pw").await.unwrap_err();
    assert_eq!(err, ApiError::Authentication);
    // 不区分是用户名还是密码出错
    assert_eq!(err.to_string(), "Invalid username or password");

    backend.fail_next(Failure::Status(400, r#"{"password":["required"]}"#.to_string()));
    let err = api.obtain_token("alice", "").await.unwrap_err();
    assert_eq!(err, ApiError::Authentication);
}

#[tokio::test]
async fn test_rejected_token_is_session_expired() {
    let backend = seeded_backend();
    let tokens = MemoryTokenStore::with_token(&backend.issue_token("alice"));
    let api = test_api(&backend, &tokens);

    backend.revoke_all_tokens();
    let err = api.list_users().await.unwrap_err();
    assert!(err.is_session_expired());

    let err = test_api(&backend, &MemoryTokenStore::default())
        .current_identity()
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::SessionExpired);
}

#[tokio::test]
async fn test_policy_refusal_is_forbidden() {
    let backend = seeded_backend();
    let tokens = MemoryTokenStore::with_token(&backend.issue_token("amy"));
    let api = test_api(&backend, &tokens);

    let err = api
        .update_role(backend.id_of("bob"), Role::Admin)
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Forbidden);
    assert_eq!(backend.users()[2].role, Role::User);
}

#[tokio::test]
async fn test_server_errors_keep_status_and_message() {
    let backend = seeded_backend();
    let tokens = MemoryTokenStore::with_token(&backend.issue_token("alice"));
    let api = test_api(&backend, &tokens);

    backend.fail_next(Failure::Status(500, "  boom  ".to_string()));
    let err = api.list_users().await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Server {
            status: 500,
            message: "boom".to_string()
        }
    );
    assert_eq!(err.to_string(), "Server error (500): boom");

    backend.fail_next(Failure::Status(502, "x".repeat(1000)));
    match api.list_users().await.unwrap_err() {
        ApiError::Server { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message.len(), MAX_ERROR_MESSAGE_CHARS);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_network_and_decode_failures() {
    let backend = seeded_backend();
    let tokens = MemoryTokenStore::with_token(&backend.issue_token("alice"));
    let api = test_api(&backend, &tokens);

    backend.fail_next(Failure::Network);
    assert!(matches!(
        api.list_users().await.unwrap_err(),
        ApiError::Network(_)
    ));

    backend.fail_next(Failure::Status(200, "<html>oops</html>".to_string()));
    assert!(matches!(
        api.list_users().await.unwrap_err(),
        ApiError::Decode(_)
    ));
}

#[tokio::test]
async fn test_unknown_routes_are_server_errors() {
    let backend = FakeBackend::new().with_user("alice", Role::Admin, "pw");
    let tokens = MemoryTokenStore::with_token(&backend.issue_token("alice"));
    let api = test_api(&backend, &tokens);

    let err = api.delete_user(999).await.unwrap_err();
    assert!(matches!(err, ApiError::Server { status: 404, .. }));
}
