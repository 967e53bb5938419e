use super::error::GatewayError;
use super::types::{CompletionRequest, CompletionResponse};
use async_trait::async_trait;

/// Shared interface for LLM completion endpoints
///
/// The pipeline treats the gateway as stateless and safe for unlimited
/// concurrent use; implementations must be shareable via `Arc`.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, request: CompletionRequest)
        -> Result<CompletionResponse, GatewayError>;

    fn name(&self) -> &str;

    fn model_info(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct TestGateway;

    #[async_trait]
    impl CompletionGateway for TestGateway {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, GatewayError> {
            Ok(CompletionResponse::text(
                "Test response",
                Duration::from_millis(10),
            ))
        }

        fn name(&self) -> &str {
            "TestGateway"
        }
    }

    #[tokio::test]
    async fn test_gateway_trait() {
        let gateway = TestGateway;
        assert_eq!(gateway.name(), "TestGateway");
        assert!(gateway.model_info().is_none());

        let response = gateway
            .complete(CompletionRequest::new(vec![]))
            .await
            .unwrap();
        assert_eq!(response.content, "Test response");
    }
}
