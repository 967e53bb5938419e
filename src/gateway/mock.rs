use super::client::CompletionGateway;
use super::error::GatewayError;
use super::types::{CompletionRequest, CompletionResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Scripted gateway for tests
///
/// Responses are served either from keyword routes (matched against the user
/// prompt, useful when calls race in parallel mode) or from a FIFO queue.
/// Routes are checked first. Every call is logged on dispatch and on
/// resolution so tests can assert ordering across concurrent calls.
pub struct MockGateway {
    routes: Mutex<Vec<(String, MockCompletion)>>,
    responses: Mutex<VecDeque<MockCompletion>>,
    log: Mutex<Vec<String>>,
    delay: Mutex<Option<Duration>>,
    name: String,
}

#[derive(Debug, Clone)]
pub struct MockCompletion {
    pub content: String,
    pub error: Option<GatewayError>,
}

impl MockCompletion {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            error: None,
        }
    }

    pub fn error(error: GatewayError) -> Self {
        Self {
            content: String::new(),
            error: Some(error),
        }
    }
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
            log: Mutex::new(Vec::new()),
            delay: Mutex::new(None),
            name: "MockGateway".to_string(),
        }
    }

    /// Queues a response served in FIFO order when no route matches
    pub fn enqueue(&self, completion: MockCompletion) {
        self.responses.lock().unwrap().push_back(completion);
    }

    pub fn enqueue_all(&self, completions: impl IntoIterator<Item = MockCompletion>) {
        let mut queue = self.responses.lock().unwrap();
        for completion in completions {
            queue.push_back(completion);
        }
    }

    /// Serves `completion` whenever the user prompt contains `keyword`
    pub fn route(&self, keyword: impl Into<String>, completion: MockCompletion) {
        self.routes.lock().unwrap().push((keyword.into(), completion));
    }

    /// Delays every response, letting tests observe in-flight overlap
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn remaining_responses(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    /// Dispatch/resolve log entries, in the order they occurred
    pub fn call_log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn label_for(&self, request: &CompletionRequest) -> String {
        let prompt = request.user_content().unwrap_or_default();
        self.routes
            .lock()
            .unwrap()
            .iter()
            .find(|(keyword, _)| prompt.contains(keyword.as_str()))
            .map(|(keyword, _)| keyword.clone())
            .unwrap_or_else(|| "queued".to_string())
    }

    fn take_response(&self, request: &CompletionRequest) -> Result<MockCompletion, GatewayError> {
        let prompt = request.user_content().unwrap_or_default();

        let routed = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .find(|(keyword, _)| prompt.contains(keyword.as_str()))
            .map(|(_, completion)| completion.clone());

        if let Some(completion) = routed {
            return Ok(completion);
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| GatewayError::Other {
                message: "MockGateway: No more responses in queue".to_string(),
            })
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionGateway for MockGateway {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, GatewayError> {
        let label = self.label_for(&request);
        self.log.lock().unwrap().push(format!("dispatch:{}", label));

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let completion = self.take_response(&request)?;
        self.log.lock().unwrap().push(format!("resolve:{}", label));

        if let Some(error) = completion.error {
            return Err(error);
        }

        Ok(CompletionResponse::text(
            completion.content,
            Duration::from_millis(10),
        ))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model_info(&self) -> Option<String> {
        Some("mock-model".to_string())
    }
}

impl std::fmt::Debug for MockGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockGateway")
            .field("name", &self.name)
            .field("remaining_responses", &self.remaining_responses())
            .finish()
    }
}
