//! HTTP route handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use gatherbot_core::types::IncomingMessage;

use super::server::AppState;

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "ok": true,
        "service": "gatherbot",
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// Twilio WhatsApp inbound form post.
///
/// Twilio sends many fields; only the message body and sender matter here.
#[derive(Debug, Deserialize)]
pub struct TwilioInbound {
    #[serde(default, rename = "Body")]
    pub body: String,
    #[serde(default, rename = "From")]
    pub from: String,
}

/// WhatsApp webhook handler (POST): receives one message per request.
///
/// Blank messages are rejected with 400. Everything the bot understands is
/// answered through the outbound channel, so the HTTP response stays an
/// empty 200; only infrastructure faults surface as 500.
pub async fn whatsapp_webhook(
    State(state): State<Arc<AppState>>,
    Form(inbound): Form<TwilioInbound>,
) -> Response {
    let text = inbound.body.trim();
    if text.is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }

    tracing::info!("[whatsapp] Message from {}: {}", inbound.from, text);

    let message = IncomingMessage::new("whatsapp", &inbound.from, text);
    match state.router.handle(&message).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            tracing::error!("[whatsapp] Command handling failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{AppState, build_router};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Mutex;
    use std::time::Duration;
    use tower::ServiceExt;

    use gatherbot_core::error::Result;
    use gatherbot_core::traits::Channel;
    use gatherbot_core::types::OutgoingMessage;
    use gatherbot_proposals::{CommandRouter, ProposalEngine, ProposalStore};

    #[derive(Default)]
    struct RecordingChannel {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Channel for RecordingChannel {
        fn name(&self) -> &str {
            "recording"
        }
        async fn connect(&mut self) -> Result<()> {
            Ok(())
        }
        fn is_connected(&self) -> bool {
            true
        }
        async fn send(&self, message: OutgoingMessage) -> Result<()> {
            self.sent.lock().unwrap().push(message.content);
            Ok(())
        }
    }

    fn test_state(tag: &str) -> (AppState, Arc<RecordingChannel>) {
        let dir = std::env::temp_dir().join(format!("gatherbot-test-gateway-{tag}"));
        std::fs::remove_dir_all(&dir).ok();
        let store = ProposalStore::new(&dir.join("proposals.json"), Duration::from_secs(5));
        let channel = Arc::new(RecordingChannel::default());
        let engine = Arc::new(ProposalEngine::new(store, channel.clone()));
        let router = Arc::new(CommandRouter::new(engine, channel.clone()));
        (AppState::new(router), channel)
    }

    fn form_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/webhook/whatsapp")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (state, _) = test_state("health");
        let app = build_router(state);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_blank_body_is_rejected() {
        let (state, channel) = test_state("blank");
        let app = build_router(state);

        let response = app
            .oneshot(form_request("Body=++&From=whatsapp%3A%2B15551234567"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(channel.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_propose_command_roundtrip() {
        let (state, channel) = test_state("propose");
        let app = build_router(state);

        let response = app
            .oneshot(form_request(
                "Body=propose+2024-06-01+18%3A00&From=whatsapp%3A%2B15551234567",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let sent = channel.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("Proposal 1: 2024-06-01 18:00 by whatsapp:+15551234567"));
    }

    #[tokio::test]
    async fn test_invalid_vote_id_is_answered_not_errored() {
        let (state, channel) = test_state("invalid-vote");
        let app = build_router(state);

        let response = app
            .oneshot(form_request(
                "Body=vote+abc+yes&From=whatsapp%3A%2B15551234567",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*channel.sent.lock().unwrap(), vec!["Invalid proposal id"]);
    }
}
