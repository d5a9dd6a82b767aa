//! Test data builders and seeded fixtures

use serde_json::json;
use std::sync::Arc;
use usability_core::{
    CascadeMode, InMemoryGateway, StoreConfig, Test, TestLifecycleCoordinator, TestType,
};

use super::RecordingGateway;

/// Builder for test records as the presentation layer would hand them over
#[derive(Debug, Default)]
pub struct TestRecordBuilder {
    test: Test,
}

impl TestRecordBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            test: Test {
                id: Some(id.to_string()),
                ..Test::default()
            },
        }
    }

    pub fn without_id() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.test.test_title = title.to_string();
        self
    }

    pub fn with_type(mut self, test_type: TestType) -> Self {
        self.test.test_type = test_type;
        self
    }

    pub fn with_reports(mut self, id: &str) -> Self {
        self.test.reports = Some(id.to_string());
        self
    }

    pub fn with_answers(mut self, id: &str) -> Self {
        self.test.answers = Some(id.to_string());
        self
    }

    pub fn with_cooperators(mut self, id: &str) -> Self {
        self.test.cooperators = Some(id.to_string());
        self
    }

    pub fn build(self) -> Test {
        self.test
    }
}

/// Seed test `t1` with report `r1`, answers `a1` and cooperator list `c1`
///
/// `u1` holds access level 1 and references the test from `myTests`; `u2`
/// holds level 2 and references it from `myAnswers` next to another test.
pub fn seed_cascade_fixture(store: &InMemoryGateway) -> Test {
    store
        .put(
            "Tests",
            "t1",
            json!({
                "testTitle": "T1",
                "testType": "HEURISTICS",
                "reports": "r1",
                "answers": "a1",
                "cooperators": "c1"
            }),
        )
        .unwrap();
    store
        .put("reports", "r1", json!({"testDocId": "t1"}))
        .unwrap();
    store
        .put("answers", "a1", json!({"testDocId": "t1"}))
        .unwrap();
    store
        .put(
            "cooperators",
            "c1",
            json!({"cooperators": [
                {"id": "u1", "email": "owner@example.com", "accessLevel": {"value": 1, "text": "Manager"}},
                {"id": "u2", "email": "guest@example.com", "accessLevel": {"value": 2, "text": "Guest"}}
            ]}),
        )
        .unwrap();
    store
        .put(
            "users",
            "u1",
            json!({
                "email": "owner@example.com",
                "myTests": [{"id": "t1", "title": "T1", "type": "HEURISTICS"}]
            }),
        )
        .unwrap();
    store
        .put(
            "users",
            "u2",
            json!({
                "email": "guest@example.com",
                "myAnswers": [
                    {"id": "t1", "title": "T1", "type": "HEURISTICS"},
                    {"id": "t2", "title": "T2", "type": "User"}
                ]
            }),
        )
        .unwrap();

    TestRecordBuilder::new("t1")
        .with_title("T1")
        .with_reports("r1")
        .with_answers("a1")
        .with_cooperators("c1")
        .build()
}

pub fn coordinator_for(gateway: Arc<RecordingGateway>, mode: CascadeMode) -> TestLifecycleCoordinator {
    let config = StoreConfig {
        environment: "test".to_string(),
        cascade_mode: mode,
        ..StoreConfig::default()
    };
    TestLifecycleCoordinator::from_gateway(gateway, config)
}
