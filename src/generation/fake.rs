//! Scripted `Transport` for generation and orchestrator tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;

use super::transport::Transport;
use super::{GenerationRequest, TransportError};

type Outcome = Result<Value, &'static str>;

pub struct ScriptedTransport {
    script: Mutex<VecDeque<Outcome>>,
    /// Used once the script runs out
    fallback: Outcome,
    calls: Mutex<Vec<Instant>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Outcome>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: Err("script exhausted"),
            calls: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding(response: Value) -> Self {
        let mut transport = Self::new(Vec::new());
        transport.fallback = Ok(response);
        transport
    }

    /// Fails every call with "`message` (attempt n)".
    pub fn failing(message: &'static str) -> Self {
        let mut transport = Self::new(Vec::new());
        transport.fallback = Err(message);
        transport
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &GenerationRequest) -> Result<Value, TransportError> {
        let attempt = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Instant::now());
            calls.len()
        };
        self.prompts.lock().unwrap().push(request.prompt.clone());

        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        outcome.map_err(|message| TransportError::Provider {
            status: 503,
            message: format!("{message} (attempt {attempt})"),
        })
    }
}
