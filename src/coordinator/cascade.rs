//! Cascading delete steps and the aggregated report they produce.
//!
//! A cascade is best-effort: every step is attempted even after an earlier
//! one failed, nothing is retried and nothing is rolled back. The report is
//! the only place the per-step outcomes are preserved; the state slice only
//! ever sees the collapsed error flag.

use crate::error::Result;
use crate::models::{DocumentId, ListKind};
use futures::future::BoxFuture;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum CascadeStep {
    FetchCooperators,
    /// Entry `index` of the cooperator list that could not be decoded
    DecodeCooperator {
        index: usize,
    },
    DeleteTest,
    DeleteReport,
    DeleteAnswers,
    RemoveReference {
        cooperator_id: DocumentId,
        list: ListKind,
    },
    DeleteCooperators,
}

impl CascadeStep {
    pub fn name(&self) -> &'static str {
        match self {
            CascadeStep::FetchCooperators => "fetch_cooperators",
            CascadeStep::DecodeCooperator { .. } => "decode_cooperator",
            CascadeStep::DeleteTest => "delete_test",
            CascadeStep::DeleteReport => "delete_report",
            CascadeStep::DeleteAnswers => "delete_answers",
            CascadeStep::RemoveReference { .. } => "remove_reference",
            CascadeStep::DeleteCooperators => "delete_cooperators",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    /// The test record carried no reference for this step
    Skipped,
    Failed(String),
}

impl StepStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StepStatus::Completed => "completed",
            StepStatus::Skipped => "skipped",
            StepStatus::Failed(_) => "failed",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StepStatus::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeStepOutcome {
    pub step: CascadeStep,
    /// Id of the document the step acted on
    pub target: Option<DocumentId>,
    pub status: StepStatus,
}

/// Aggregated result of a cascading delete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    /// `None` when the record was rejected before any step ran
    pub test_id: Option<DocumentId>,
    pub outcomes: Vec<CascadeStepOutcome>,
}

impl CascadeReport {
    pub fn new(test_id: impl Into<DocumentId>) -> Self {
        Self {
            test_id: Some(test_id.into()),
            outcomes: Vec::new(),
        }
    }

    pub fn rejected() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: CascadeStepOutcome) {
        self.outcomes.push(outcome);
    }

    /// True when at least one step ran and none failed
    pub fn is_clean(&self) -> bool {
        !self.outcomes.is_empty() && self.failures().next().is_none()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CascadeStepOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_failed())
    }

    /// First outcome recorded under `name`, see [`CascadeStep::name`]
    pub fn outcome(&self, name: &str) -> Option<&CascadeStepOutcome> {
        self.outcomes.iter().find(|o| o.step.name() == name)
    }

    /// Reference removals in the order they were recorded
    pub fn removals(&self) -> impl Iterator<Item = (&str, ListKind, &StepStatus)> {
        self.outcomes.iter().filter_map(|o| match &o.step {
            CascadeStep::RemoveReference {
                cooperator_id,
                list,
            } => Some((cooperator_id.as_str(), *list, &o.status)),
            _ => None,
        })
    }
}

/// A step waiting to run; `action` is `None` when the step is skipped
pub(crate) struct PlannedStep<'a> {
    pub step: CascadeStep,
    pub target: Option<DocumentId>,
    pub action: Option<BoxFuture<'a, Result<()>>>,
}

impl<'a> PlannedStep<'a> {
    pub fn new(
        step: CascadeStep,
        target: impl Into<DocumentId>,
        action: BoxFuture<'a, Result<()>>,
    ) -> Self {
        Self {
            step,
            target: Some(target.into()),
            action: Some(action),
        }
    }

    /// Step acting on an optional reference; skipped when the reference is absent
    pub fn optional<F>(step: CascadeStep, target: Option<&'a str>, action: F) -> Self
    where
        F: FnOnce(&'a str) -> BoxFuture<'a, Result<()>>,
    {
        Self {
            step,
            target: target.map(str::to_string),
            action: target.map(action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use serde_json::json;

    fn outcome(step: CascadeStep, status: StepStatus) -> CascadeStepOutcome {
        CascadeStepOutcome {
            step,
            target: None,
            status,
        }
    }

    #[test]
    fn test_report_queries() {
        let mut report = CascadeReport::new("t1");
        assert!(!report.is_clean());

        report.push(outcome(CascadeStep::DeleteTest, StepStatus::Completed));
        report.push(outcome(
            CascadeStep::RemoveReference {
                cooperator_id: "u1".to_string(),
                list: ListKind::Owned,
            },
            StepStatus::Completed,
        ));
        assert!(report.is_clean());

        report.push(outcome(
            CascadeStep::DeleteReport,
            StepStatus::Failed("boom".to_string()),
        ));
        assert!(!report.is_clean());
        assert_eq!(report.failures().count(), 1);
        assert_eq!(
            report.outcome("delete_report").map(|o| o.status.label()),
            Some("failed")
        );

        let removals: Vec<_> = report.removals().collect();
        assert_eq!(removals, vec![("u1", ListKind::Owned, &StepStatus::Completed)]);
    }

    #[test]
    fn test_report_serializes() {
        let mut report = CascadeReport::new("t1");
        report.push(CascadeStepOutcome {
            step: CascadeStep::RemoveReference {
                cooperator_id: "u2".to_string(),
                list: ListKind::Answered,
            },
            target: Some("u2".to_string()),
            status: StepStatus::Failed("denied".to_string()),
        });

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "test_id": "t1",
                "outcomes": [{
                    "step": {"step": "remove_reference", "cooperator_id": "u2", "list": "answered"},
                    "target": "u2",
                    "status": {"status": "failed", "error": "denied"}
                }]
            })
        );
    }

    #[test]
    fn test_optional_step_without_target_is_skipped() {
        let planned =
            PlannedStep::optional(CascadeStep::DeleteReport, None, |_| async { Ok(()) }.boxed());
        assert!(planned.action.is_none());
        assert!(planned.target.is_none());
    }
}
