//! Page store integration tests

use std::sync::Arc;

use pageforge::gateway::MockCompletion;
use pageforge::{
    BusinessData, MockGateway, PageStore, PipelineOptions, PipelineOrchestrator, StoreError,
};

fn pizza_place() -> BusinessData {
    BusinessData::minimal(
        "Delicious Pizza Place",
        "Restaurant",
        "123 Main St, Downtown, NY 10001",
        "+1 (555) 123-4567",
    )
}

/// Generates real content through the fast pipeline with prose-only mock
/// responses, then persists and reloads it.
#[tokio::test]
async fn test_generated_page_round_trips_through_store() {
    let gateway = MockGateway::new();
    gateway.route("", MockCompletion::text("no json here"));

    let orchestrator = PipelineOrchestrator::new(Arc::new(gateway), PipelineOptions::fast());
    let business = pizza_place();
    let content = orchestrator.generate(&business).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let store = PageStore::open(dir.path()).unwrap();

    let id = store.save(business.clone(), content.clone()).unwrap();
    let page = store.get(&id).unwrap();

    assert_eq!(page.business.name, business.name);
    assert_eq!(page.content.headline, content.headline);
    assert_eq!(page.content.html_document, content.html_document);
    assert_eq!(page.content.theme, content.theme);

    let listed = store.list_all().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);

    store.delete(&id).unwrap();
    assert!(matches!(store.get(&id), Err(StoreError::NotFound { .. })));
    assert!(store.list_all().unwrap().is_empty());
}

#[tokio::test]
async fn test_store_survives_reopen() {
    let gateway = MockGateway::new();
    gateway.route("", MockCompletion::text("prose"));
    let orchestrator = PipelineOrchestrator::new(Arc::new(gateway), PipelineOptions::fast());

    let business = pizza_place();
    let content = orchestrator.generate(&business).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let id = {
        let store = PageStore::open(dir.path()).unwrap();
        store.save(business, content).unwrap()
    };

    let reopened = PageStore::open(dir.path()).unwrap();
    let page = reopened.get(&id).unwrap();
    assert_eq!(page.id, id);
    assert!(page.content.html_document.contains("<html"));
}
