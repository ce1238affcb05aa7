//! HTTP adapter for the coaching backend.
//!
//! JSON over `fetch()` via gloo-net. Every non-2xx answer becomes
//! `CoachError::Http` with the response body; a request that never reached
//! the server becomes `CoachError::Network`.

use async_trait::async_trait;
use futures::future::{self, Either};
use futures::pin_mut;
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;

use coach_core::ports::{ConversationPort, TurnRequest};
use coach_types::{
    CoachError, Result,
    config::ApiConfig,
    message::Message,
    session::{SessionGrant, SessionSummary},
    turn::ChatTurn,
};
use super::dto::*;

pub struct HttpConversationService {
    config: ApiConfig,
}

impl HttpConversationService {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base(), path)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let request = Request::post(&self.url(path))
            .header("Content-Type", "application/json")
            .json(body)
            .map_err(|e| CoachError::Serialization(e.to_string()))?;
        let response = self.dispatch(request).await?;
        read_json(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = Request::get(&self.url(path))
            .header("Accept", "application/json")
            .build()
            .map_err(|e| CoachError::Network(e.to_string()))?;
        let response = self.dispatch(request).await?;
        read_json(response).await
    }

    /// Send the request, racing it against the configured timeout if any
    async fn dispatch(&self, request: Request) -> Result<Response> {
        let url = request.url();
        let send = request.send();

        let response = match self.config.request_timeout_ms {
            None => send.await.map_err(|e| CoachError::Network(e.to_string()))?,
            Some(ms) => {
                let timeout = TimeoutFuture::new(u32::try_from(ms).unwrap_or(u32::MAX));
                pin_mut!(send, timeout);
                match future::select(send, timeout).await {
                    Either::Left((result, _)) => {
                        result.map_err(|e| CoachError::Network(e.to_string()))?
                    }
                    Either::Right(_) => {
                        log::warn!("Request to {} timed out after {}ms", url, ms);
                        return Err(CoachError::Timeout(ms));
                    }
                }
            }
        };

        if !response.ok() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            log::warn!("HTTP {} from {}", status, url);
            return Err(CoachError::Http { status, body });
        }
        Ok(response)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| CoachError::Serialization(e.to_string()))
}

/// Percent-encode one path segment
fn segment(raw: &str) -> String {
    String::from(js_sys::encode_uri_component(raw))
}

#[async_trait(?Send)]
impl ConversationPort for HttpConversationService {
    async fn resolve_or_create_session(&self, user_id: &str, force_new: bool) -> Result<SessionGrant> {
        let response: InitSessionResponse = self
            .post_json("/session/init", &InitSessionRequest { user_id, force_new })
            .await?;
        Ok(response.into_grant())
    }

    async fn send_turn(&self, req: TurnRequest) -> Result<ChatTurn> {
        let body = ChatRequest {
            user_id: &req.user_id,
            thread_id: &req.thread_id,
            message: &req.message,
            session_type: req.session_type.as_str(),
        };
        let response: ChatResponse = self.post_json("/chat", &body).await?;
        Ok(response.into_turn())
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>> {
        let rows: Vec<SessionSummaryDto> = self
            .get_json(&format!("/sessions/{}", segment(user_id)))
            .await?;
        Ok(rows.into_iter().map(SessionSummaryDto::into_summary).collect())
    }

    async fn get_transcript(&self, user_id: &str, thread_id: &str) -> Result<Vec<Message>> {
        let rows: Vec<TranscriptEntry> = self
            .get_json(&format!(
                "/sessions/{}/{}/messages",
                segment(user_id),
                segment(thread_id)
            ))
            .await?;
        Ok(rows.into_iter().map(TranscriptEntry::into_message).collect())
    }

    async fn reset_program(&self, user_id: &str) -> Result<SessionGrant> {
        let response: InitSessionResponse = self
            .post_json("/session/reset", &ResetRequest { user_id })
            .await?;
        Ok(response.into_grant())
    }
}
