//! Integration tests for the email library
//!
//! Providers are pointed at a local wiremock server so the full HTTP exchange
//! (auth header, payload shape, error bodies) is exercised.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use email::{
    BodyTemplate, BulkDispatcher, EmailProvider, GmailProvider, ResendProvider, SendError,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod gmail_tests {
    use super::*;

    #[tokio::test]
    async fn test_send_posts_raw_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/gmail/v1/users/me/messages/send"))
            .and(header("authorization", "Bearer ya29.token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "18c2f0a1b2",
                "threadId": "18c2f0a1b2",
                "labelIds": ["SENT"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = GmailProvider::new("ya29.token").with_base_url(server.uri());
        let result = provider
            .send("ada@example.com", "Bienvenida", "<p>Hola Ada</p>")
            .await
            .unwrap();
        assert_eq!(result.message_id.as_deref(), Some("18c2f0a1b2"));

        let requests = server.received_requests().await.unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let raw = payload["raw"].as_str().unwrap();
        let decoded = String::from_utf8(URL_SAFE_NO_PAD.decode(raw).unwrap()).unwrap();

        assert!(decoded.starts_with("To: ada@example.com\r\n"));
        assert!(decoded.contains("Subject: =?UTF-8?B?"));
        assert!(decoded.contains("Content-Type: text/html; charset=UTF-8\r\n\r\n"));
        assert!(decoded.ends_with("<p>Hola Ada</p>"));
    }

    #[tokio::test]
    async fn test_api_error_body_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/gmail/v1/users/me/messages/send"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid Credentials"))
            .mount(&server)
            .await;

        let provider = GmailProvider::new("expired").with_base_url(server.uri());
        let err = provider
            .send("ada@example.com", "Hi", "<p>Hi</p>")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "Gmail API error: Invalid Credentials");
    }

    #[tokio::test]
    async fn test_accepted_without_json_body_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/gmail/v1/users/me/messages/send"))
            .respond_with(ResponseTemplate::new(202).set_body_string("accepted"))
            .expect(1)
            .mount(&server)
            .await;

        let provider = GmailProvider::new("ya29.token").with_base_url(server.uri());
        let result = provider
            .send("ada@example.com", "Hi", "<p>Hi</p>")
            .await
            .unwrap();

        assert_eq!(result.message_id, None);
    }

    #[tokio::test]
    async fn test_health_check_reads_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gmail/v1/users/me/profile"))
            .and(header("authorization", "Bearer ya29.token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "emailAddress": "me@example.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = GmailProvider::new("ya29.token").with_base_url(server.uri());
        assert!(provider.health_check().await.is_ok());
    }
}

mod resend_tests {
    use super::*;

    #[tokio::test]
    async fn test_send_posts_json_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("authorization", "Bearer re_key"))
            .and(body_json(json!({
                "from": "team@example.com",
                "to": ["ada@example.com"],
                "subject": "Welcome",
                "html": "<p>Hello</p>"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "id": "49a3999c-0ce1-4ea6-ab68-afcd6dc2e794" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let provider = ResendProvider::new("re_key", "team@example.com").with_base_url(server.uri());
        let result = provider
            .send("ada@example.com", "Welcome", "<p>Hello</p>")
            .await
            .unwrap();

        assert_eq!(
            result.message_id.as_deref(),
            Some("49a3999c-0ce1-4ea6-ab68-afcd6dc2e794")
        );
    }

    #[tokio::test]
    async fn test_empty_success_body_counts_as_delivered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let provider = ResendProvider::new("re_key", "team@example.com").with_base_url(server.uri());
        let records = vec![
            domain_contacts::Contact::new("ada@example.com", "Ada", "Hi").unwrap(),
            domain_contacts::Contact::new("bob@example.com", "Bob", "Hey").unwrap(),
        ];

        let outcome = BulkDispatcher::new(provider)
            .with_pacing(Duration::ZERO)
            .send_bulk(&records, "Welcome", email::render_default)
            .await;

        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.failure_count, 0);
        assert!(outcome.failures.is_empty());
    }

    #[tokio::test]
    async fn test_validation_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(422).set_body_string(
                r#"{"statusCode":422,"name":"validation_error","message":"Invalid `from` field"}"#,
            ))
            .mount(&server)
            .await;

        let provider = ResendProvider::new("re_key", "team@example.com").with_base_url(server.uri());
        let err = provider
            .send("ada@example.com", "Welcome", "<p>Hello</p>")
            .await
            .unwrap_err();

        assert!(matches!(err, SendError::Api { status: 422, .. }));
        assert!(err.to_string().starts_with("Resend API error: "));
        assert!(err.to_string().contains("Invalid `from` field"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_transport_error() {
        let provider = ResendProvider::new("re_key", "team@example.com")
            .with_base_url("http://127.0.0.1:1");
        let err = provider
            .send("ada@example.com", "Welcome", "<p>Hello</p>")
            .await
            .unwrap_err();

        assert!(matches!(err, SendError::Transport { .. }));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_health_check_rejects_bad_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(401).set_body_string("API key is invalid"))
            .mount(&server)
            .await;

        let provider = ResendProvider::new("bad", "team@example.com").with_base_url(server.uri());
        let err = provider.health_check().await.unwrap_err();
        assert_eq!(err.to_string(), "Resend API error: API key is invalid");
    }
}

mod dispatch_tests {
    use super::*;

    #[tokio::test]
    async fn test_file_to_inbox_with_one_rejected_recipient() {
        let csv = b"Correo,Nombre,Mensaje\n\
            ana@example.com,Ana,Tu pedido fue enviado\n\
            broken,Beto,Hola\n\
            bounce@example.com,Carla,Factura lista\n\
            dan@example.com,Dan,Gracias\n";
        let parsed = domain_contacts::parse(csv, "clientes.csv");
        assert_eq!(parsed.records.len(), 3);
        assert_eq!(parsed.diagnostics, vec!["Row 3: invalid email (broken)"]);

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(body_partial_json(json!({ "to": ["bounce@example.com"] })))
            .respond_with(ResponseTemplate::new(422).set_body_string("recipient suppressed"))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "ok" })))
            .expect(2)
            .mount(&server)
            .await;

        let provider = ResendProvider::new("re_key", "team@example.com").with_base_url(server.uri());
        let template = BodyTemplate::from_message(Some("{name}: {description}"));
        let outcome = BulkDispatcher::new(provider)
            .with_pacing(Duration::ZERO)
            .send_bulk(&parsed.records, "Novedades", |c| template.render(c))
            .await;

        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.failure_count, 1);
        assert_eq!(outcome.failures[0].recipient, "bounce@example.com");
        assert_eq!(
            outcome.failures[0].message,
            "Resend API error: recipient suppressed"
        );

        let requests = server.received_requests().await.unwrap();
        let recipients: Vec<String> = requests
            .iter()
            .map(|r| {
                let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
                body["to"][0].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(
            recipients,
            vec!["ana@example.com", "bounce@example.com", "dan@example.com"]
        );

        let first: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(first["html"]
            .as_str()
            .unwrap()
            .contains("<p>Ana: Tu pedido fue enviado</p>"));
    }
}
