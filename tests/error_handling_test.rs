//! Error surface tests across the library

use std::sync::Arc;

use pageforge::gateway::MockCompletion;
use pageforge::{
    BusinessData, CompletionGateway, GatewayError, MockGateway, PipelineError, PipelineOptions,
    PipelineOrchestrator,
};

fn business() -> BusinessData {
    BusinessData::minimal("Shop", "Retail", "1 Ave", "555-0100")
}

#[tokio::test]
async fn test_synthesis_gateway_error_is_terminal() {
    // Analysis and strategy degrade on error, but a dead gateway at the
    // synthesis stage fails the run
    let gateway = MockGateway::new();
    gateway.route(
        "Design a landing page",
        MockCompletion::error(GatewayError::Network {
            message: "connection refused".to_string(),
        }),
    );

    let orchestrator = PipelineOrchestrator::new(Arc::new(gateway), PipelineOptions::fast());
    let result = orchestrator.generate(&business()).await;

    match result {
        Err(PipelineError::Gateway(GatewayError::Network { message })) => {
            assert!(message.contains("connection refused"))
        }
        other => panic!("expected gateway error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_exhausted_mock_queue_reports_typed_error() {
    let gateway = MockGateway::new();
    let result = gateway
        .complete(pageforge::CompletionRequest::prompt("sys", "user"))
        .await;
    assert!(matches!(result, Err(GatewayError::Other { .. })));
}

#[test]
fn test_pipeline_error_messages_are_actionable() {
    let err = PipelineError::InvalidHtml {
        reason: "missing <body>".to_string(),
    };
    assert!(err.to_string().contains("missing <body>"));

    let err = PipelineError::MissingThemeOrLayout {
        missing: "layout".to_string(),
    };
    assert!(err.to_string().contains("layout"));

    let err = PipelineError::IncompleteContent { field: "headline" };
    assert!(err.to_string().contains("headline"));
}

#[test]
fn test_gateway_error_serializes_for_logs() {
    let err = GatewayError::RateLimit {
        retry_after: Some(30),
    };
    let json = serde_json::to_string(&err).unwrap();
    let back: GatewayError = serde_json::from_str(&json).unwrap();
    assert!(matches!(
        back,
        GatewayError::RateLimit {
            retry_after: Some(30)
        }
    ));
}
