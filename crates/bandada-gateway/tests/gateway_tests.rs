// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Evolution gateway adapter against a mock HTTP
//! server.

use bandada_core::types::{MediaDescriptor, MediaKind, SendOptions, SendingConfig};
use bandada_core::{BandadaError, MessageGateway};
use bandada_gateway::EvolutionGateway;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(server: &MockServer) -> EvolutionGateway {
    EvolutionGateway::new(server.uri(), "secret-key", "instawha_ana").expect("client")
}

#[tokio::test]
async fn text_send_posts_normalized_number_and_delay() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/message/sendText/instawha_ana"))
        .and(header("apikey", "secret-key"))
        .and(body_partial_json(json!({
            "number": "5491122334455",
            "text": "hola",
            "delay": 3000,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": { "id": "msg-1" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ack = gateway(&server)
        .send_text(
            "+54 (911) 2233-4455",
            "hola",
            &SendingConfig::default(),
            &SendOptions::default(),
        )
        .await
        .expect("send must succeed");
    assert_eq!(ack.message_id.as_deref(), Some("msg-1"));
}

#[tokio::test]
async fn unregistered_recipient_maps_to_the_distinct_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/message/sendText/instawha_ana"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "response": { "message": [{ "exists": false, "number": "5491122334455" }] }
        })))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .send_text(
            "+5491122334455",
            "hola",
            &SendingConfig::default(),
            &SendOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BandadaError::RecipientNotRegistered { ref number } if number == "5491122334455"
    ));
}

#[tokio::test]
async fn other_gateway_errors_surface_the_body_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/message/sendText/instawha_ana"))
        .respond_with(ResponseTemplate::new(500).set_body_string("instance offline"))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .send_text(
            "+5491122334455",
            "hola",
            &SendingConfig::default(),
            &SendOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("instance offline"));
}

#[tokio::test]
async fn media_send_uses_the_media_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/message/sendMedia/instawha_ana"))
        .and(body_partial_json(json!({
            "mediatype": "image",
            "media": "https://example.com/promo.png",
            "caption": "nueva promo",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let ack = gateway(&server)
        .send_media(
            "+5491122334455",
            &MediaDescriptor {
                kind: MediaKind::Image,
                media: "https://example.com/promo.png".into(),
                mime_type: Some("image/png".into()),
                caption: Some("nueva promo".into()),
                file_name: Some("promo.png".into()),
            },
            &SendingConfig::default(),
            &SendOptions::default(),
        )
        .await
        .expect("send must succeed");
    assert_eq!(ack.message_id, None);
}

#[tokio::test]
async fn voice_send_uses_the_audio_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/message/sendWhatsAppAudio/instawha_ana"))
        .and(body_partial_json(json!({
            "audio": "data:audio/ogg;base64,AAAA",
            "encoding": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    gateway(&server)
        .send_voice(
            "+5491122334455",
            "data:audio/ogg;base64,AAAA",
            true,
            &SendingConfig::default(),
            &SendOptions::default(),
        )
        .await
        .expect("send must succeed");
}

#[tokio::test]
async fn blank_number_is_skipped_without_a_request() {
    let server = MockServer::start().await;
    // No mock mounted: any request would 404 and fail the send.
    let ack = gateway(&server)
        .send_text(
            "   ",
            "hola",
            &SendingConfig::default(),
            &SendOptions::default(),
        )
        .await
        .expect("blank number must be skipped");
    assert_eq!(ack.message_id, None);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn invalid_number_fails_before_any_request() {
    let server = MockServer::start().await;
    let err = gateway(&server)
        .send_text(
            "12345",
            "hola",
            &SendingConfig::default(),
            &SendOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("invalid phone number"));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
