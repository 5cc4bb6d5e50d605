use std::sync::{Arc, Mutex};

use reqwest::StatusCode;

use crate::backend::Backend;
use crate::request::{PreparedRequest, RawResponse};

/// Backend double that records every request and replays one canned answer.
#[derive(Clone)]
pub struct RecordingBackend {
    requests: Arc<Mutex<Vec<PreparedRequest>>>,
    answer: Result<RawResponse, String>,
}

impl RecordingBackend {
    pub fn new(status: u16, content_type: Option<&str>, body: &str) -> Self {
        let status_text = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string();

        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            answer: Ok(RawResponse {
                status,
                status_text,
                content_type: content_type.map(str::to_string),
                body: body.to_string(),
            }),
        }
    }

    pub fn json(body: &str) -> Self {
        Self::new(200, Some("application/json; charset=utf-8"), body)
    }

    pub fn failing(message: &str) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            answer: Err(message.to_string()),
        }
    }

    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    pub fn single(&self) -> PreparedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

impl Backend for RecordingBackend {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn send(&self, request: &PreparedRequest) -> Result<RawResponse, String> {
        self.requests.lock().unwrap().push(request.clone());
        self.answer.clone()
    }
}
