//! Tests for the suite fixtures against a mock commerce API.

use super::*;
use serde_json::json;
use wiremock::matchers::{bearer_token, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADMIN_TOKEN: &str = "fixture-admin-token";

fn context_for(server: &MockServer) -> SuiteContext {
    let config = ApiConfig::new(format!("{}/V1", server.uri()), ADMIN_TOKEN);
    SuiteContext::new(config, CommerceClient::new().unwrap())
}

async fn mount_registration(server: &MockServer, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/V1/customers"))
        .and(bearer_token(ADMIN_TOKEN))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_register_fresh_user_succeeds_on_200() {
    let server = MockServer::start().await;
    mount_registration(&server, 200, json!({ "id": 1 })).await;
    let suite = context_for(&server);

    let user = suite.register_fresh_user().await.unwrap();

    assert!(user.email.contains('@'));
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["customer"]["email"], json!(user.email));
    assert_eq!(sent["password"], json!(user.password));
}

#[tokio::test]
async fn test_register_user_fails_when_platform_rejects() {
    let server = MockServer::start().await;
    mount_registration(
        &server,
        400,
        json!({ "message": "The customer email is missing. Enter and try again." }),
    )
    .await;
    let suite = context_for(&server);

    let error = suite.register_fresh_user().await.unwrap_err();

    let message = error.to_string();
    assert!(message.contains("400"));
    assert!(message.contains("The customer email is missing"));
}

/// Answers one registration with a 400 whose body is cut short, so reading
/// the body fails.
async fn serve_truncated_rejection() -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buffer = [0u8; 4096];
        loop {
            let read = socket.read(&mut buffer).await.unwrap();
            request.extend_from_slice(&buffer[..read]);
            let text = String::from_utf8_lossy(&request);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if request.len() >= header_end + 4 + content_length {
                    break;
                }
            }
            if read == 0 {
                break;
            }
        }

        socket
            .write_all(
                b"HTTP/1.1 400 Bad Request\r\n\
                  Content-Type: application/json\r\n\
                  Content-Length: 200\r\n\r\n\
                  {\"message\": \"The customer",
            )
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{}/V1", address)
}

#[tokio::test]
async fn test_register_user_reports_unreadable_rejection_body() {
    let base_url = serve_truncated_rejection().await;
    let suite = SuiteContext::new(
        ApiConfig::new(base_url, ADMIN_TOKEN),
        CommerceClient::new().unwrap(),
    );

    let error = suite.register_fresh_user().await.unwrap_err();

    assert_eq!(error.to_string(), "Failed to read registration response body");
    assert!(error.chain().count() > 1);
}

#[tokio::test]
async fn test_login_fresh_user_returns_token() {
    let server = MockServer::start().await;
    mount_registration(&server, 200, json!({ "id": 1 })).await;
    Mock::given(method("POST"))
        .and(path("/V1/integration/customer/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("\"fresh-customer-token\""))
        .expect(1)
        .mount(&server)
        .await;
    let suite = context_for(&server);

    let (user, token) = suite.login_fresh_user().await.unwrap();

    assert!(!user.email.is_empty());
    assert_eq!(token.expose(), "fresh-customer-token");
}

#[tokio::test]
async fn test_obtain_token_fails_on_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/V1/integration/customer/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "The account sign-in was incorrect or your account is disabled temporarily. Please wait and try again later."
        })))
        .mount(&server)
        .await;
    let suite = context_for(&server);
    let credentials = Credentials {
        email: "nobody@example.com".to_string(),
        password: "Password123!".to_string(),
    };

    let error = suite.obtain_token(&credentials).await.unwrap_err();

    assert!(error.to_string().contains("401"));
}

#[tokio::test]
async fn test_obtain_token_fails_on_empty_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/V1/integration/customer/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("\"\""))
        .mount(&server)
        .await;
    let suite = context_for(&server);
    let credentials = Credentials {
        email: "someone@example.com".to_string(),
        password: "Password123!".to_string(),
    };

    assert!(suite.obtain_token(&credentials).await.is_err());
}

#[tokio::test]
async fn test_read_error_and_read_customer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/V1/customers/me"))
        .and(bearer_token("good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "email": "jane.doe+test@example.com",
            "firstname": "Jane",
            "lastname": "Doe"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/V1/customers/me"))
        .and(bearer_token("bad"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "The consumer isn't authorized to access %resources.",
            "parameters": { "resources": "self" }
        })))
        .mount(&server)
        .await;
    let suite = context_for(&server);

    let customer = read_customer(suite.profile("good").await.unwrap())
        .await
        .unwrap();
    assert_eq!(customer.email, "jane.doe+test@example.com");

    let error = read_error(suite.profile("bad").await.unwrap())
        .await
        .unwrap();
    assert!(error.message.contains("isn't authorized to access"));
    assert_eq!(
        error.rendered_message(),
        "The consumer isn't authorized to access self."
    );
}

#[tokio::test]
async fn test_read_error_rejects_non_envelope_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/V1/integration/customer/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("\"token\""))
        .mount(&server)
        .await;
    let suite = context_for(&server);

    let response = suite.login("a@example.com", "secret").await.unwrap();

    assert!(read_error(response).await.is_err());
}
