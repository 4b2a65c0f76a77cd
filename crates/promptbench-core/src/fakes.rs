//! In-memory model backend (testing only)
//!
//! `ScriptedBackend` replays a fixed queue of responses and records every
//! request it receives, so harness behaviour can be checked without a
//! network or credentials.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::{MessageRequest, MessageResponse, ModelBackend};
use crate::error::BackendError;

pub const SCRIPTED_LABEL: &str = "scripted";
pub const SCRIPTED_MODEL: &str = "scripted-model";

/// Backend that answers from a pre-loaded script.
///
/// Once the script runs out every call fails with a transport error.
#[derive(Debug)]
pub struct ScriptedBackend {
    label: String,
    model_id: String,
    script: Mutex<VecDeque<Result<MessageResponse, BackendError>>>,
    requests: Mutex<Vec<MessageRequest>>,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Result<MessageResponse, BackendError>>) -> Self {
        Self {
            label: SCRIPTED_LABEL.to_string(),
            model_id: SCRIPTED_MODEL.to_string(),
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_identity(mut self, label: &str, model_id: &str) -> Self {
        self.label = label.to_string();
        self.model_id = model_id.to_string();
        self
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<MessageRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    fn label(&self) -> &str {
        &self.label
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn invoke(&self, request: &MessageRequest) -> Result<MessageResponse, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Transport("script exhausted".to_string())))
    }
}
