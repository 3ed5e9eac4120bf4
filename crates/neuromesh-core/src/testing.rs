//! A scripted [`GenerativeService`] for unit tests.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::asset::EncodedPayload;
use crate::error::ServiceError;
use crate::traits::{Credential, GenerativeService, ServiceRequest};

#[derive(Clone)]
pub enum Reply {
    Text(String),
    Empty,
    Status(u16, String),
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub credential: String,
    pub image: EncodedPayload,
    pub instruction: String,
    pub response_mime_type: String,
    pub response_schema: Value,
}

/// Holds a call open until released, so tests can observe the pending state.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

pub struct FakeService {
    reply: Reply,
    calls: AtomicUsize,
    last_request: Mutex<Option<RecordedRequest>>,
    gate: Option<Arc<Gate>>,
}

impl FakeService {
    pub fn new(reply: Reply) -> Self {
        FakeService { reply, calls: AtomicUsize::new(0), last_request: Mutex::new(None), gate: None }
    }

    pub fn gated(reply: Reply, gate: Arc<Gate>) -> Self {
        FakeService { gate: Some(gate), ..FakeService::new(reply) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeService for FakeService {
    async fn generate_content(
        &self,
        request: &ServiceRequest<'_>,
        credential: &Credential,
    ) -> Result<Option<String>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(RecordedRequest {
            model: request.model.to_string(),
            credential: credential.expose().to_string(),
            image: request.image.clone(),
            instruction: request.instruction.to_string(),
            response_mime_type: request.response_mime_type.to_string(),
            response_schema: request.response_schema.clone(),
        });

        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        match &self.reply {
            Reply::Text(text) => Ok(Some(text.clone())),
            Reply::Empty => Ok(None),
            Reply::Status(code, message) => Err(ServiceError::Status { code: *code, message: message.clone() }),
        }
    }
}
