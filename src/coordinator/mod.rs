//! # Test Lifecycle Coordinator
//!
//! Orchestrates creation, retrieval, update and cascading deletion of tests
//! against a [`PersistenceGateway`], keeping a [`TestState`] slice current.
//!
//! ## Failure Model
//!
//! Every public operation absorbs its own failures. An error is logged,
//! collapsed into a [`StoreFailure`] and raised on the state's sticky error
//! flag; it is never returned to the caller. The loading flag is held by a
//! [`LoadingGuard`](crate::state::LoadingGuard) for the whole operation and
//! released on every exit path.
//!
//! ## Cascading Delete
//!
//! [`TestLifecycleCoordinator::delete_test`] awaits every dependent step
//! before refreshing the test list and returns a [`CascadeReport`]. The
//! dependent steps either run in a fixed order or are dispatched together,
//! see [`CascadeMode`].

pub mod cascade;

use crate::config::{CascadeMode, StoreConfig};
use crate::constants::operations;
use crate::controller::TestController;
use crate::error::{Result, StoreError};
use crate::gateway::PersistenceGateway;
use crate::logging::{log_cascade_step, log_error, log_test_operation};
use crate::models::{
    Cooperator, CooperatorRoster, DocumentId, HeuristicTest, NewTest, Test, TestPatch,
    TestReference, TestView,
};
use crate::related::RelatedEntities;
use crate::state::{StatePublisher, StoreFailure, TestState};
use crate::validation::validate_collection_name;
use futures::future::join_all;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub use cascade::{CascadeReport, CascadeStep, CascadeStepOutcome, StepStatus};
use cascade::PlannedStep;

const COMPONENT: &str = "test_lifecycle_coordinator";

pub struct TestLifecycleCoordinator {
    gateway: Arc<dyn PersistenceGateway>,
    controller: TestController,
    related: RelatedEntities,
    state: TestState,
    config: StoreConfig,
}

impl fmt::Debug for TestLifecycleCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestLifecycleCoordinator")
            .field("controller", &self.controller)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TestLifecycleCoordinator {
    /// Create a coordinator from explicit collaborators
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        related: RelatedEntities,
        state: TestState,
        config: StoreConfig,
    ) -> Self {
        let controller = TestController::new(gateway.clone(), config.collections.tests.clone());
        info!(
            tests_collection = %config.collections.tests,
            cascade_mode = ?config.cascade_mode,
            "COORDINATOR: TestLifecycleCoordinator created"
        );
        Self {
            gateway,
            controller,
            related,
            state,
            config,
        }
    }

    /// Create a coordinator whose related entities and state are all derived
    /// from one gateway and the configuration
    pub fn from_gateway(gateway: Arc<dyn PersistenceGateway>, config: StoreConfig) -> Self {
        let related = RelatedEntities::from_gateway(gateway.clone(), &config.collections);
        let state = TestState::with_publisher(StatePublisher::new(config.event_channel_capacity));
        Self::new(gateway, related, state, config)
    }

    pub fn state(&self) -> &TestState {
        &self.state
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Clear the sticky error flag
    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    /// Normalize `input` into a heuristic test and store it in `collection`
    ///
    /// On success the test list is replaced with the stored document and its
    /// id is returned.
    #[instrument(skip(self, input))]
    pub async fn create_test(&self, collection: &str, input: &NewTest) -> Option<DocumentId> {
        let _loading = self.state.begin_loading();

        match self.try_create(collection, input).await {
            Ok(created) => {
                let id = created.id.clone();
                log_test_operation(
                    operations::CREATE_TEST,
                    collection,
                    id.as_deref(),
                    "created",
                    None,
                );
                self.state.set_test_list(vec![created]);
                id
            }
            Err(err) => {
                self.fail(operations::CREATE_TEST, &err, None);
                None
            }
        }
    }

    async fn try_create(&self, collection: &str, input: &NewTest) -> Result<Test> {
        validate_collection_name(collection)?;
        let document = HeuristicTest::from_input(input).to_document()?;
        self.controller.create_test(collection, document).await
    }

    /// Delete a test and detach everything that depends on it
    ///
    /// Steps: fetch the cooperator list, delete the test document, delete the
    /// report and answer set, remove each cooperator's back-reference, delete
    /// the cooperator list. A failed step never stops the steps after it.
    #[instrument(skip(self, record), fields(test_id = ?record.id))]
    pub async fn delete_test(&self, record: &Test) -> CascadeReport {
        let _loading = self.state.begin_loading();

        let Some(reference) = record.reference() else {
            let err = StoreError::validation("test record has no id");
            self.fail(operations::DELETE_TEST, &err, None);
            return CascadeReport::rejected();
        };
        let test_id = reference.id.clone();
        let mut report = CascadeReport::new(test_id.clone());

        let cooperators = self
            .fetch_cooperators(&test_id, record.cooperators.as_deref(), &mut report)
            .await;

        let test_step = PlannedStep::new(
            CascadeStep::DeleteTest,
            test_id.clone(),
            self.gateway.delete(&self.config.collections.tests, &test_id),
        );
        report.push(self.run_step(&test_id, test_step).await);

        let dependents = self.plan_dependents(record, &reference, &cooperators);
        match self.config.cascade_mode {
            CascadeMode::Sequential => {
                for step in dependents {
                    report.push(self.run_step(&test_id, step).await);
                }
            }
            CascadeMode::Concurrent => {
                let outcomes =
                    join_all(dependents.into_iter().map(|step| self.run_step(&test_id, step)))
                        .await;
                report.outcomes.extend(outcomes);
            }
        }

        match self.controller.list_tests(TestView::Full).await {
            Ok(tests) => self.state.set_test_list(tests),
            Err(err) => self.fail(operations::DELETE_TEST, &err, Some("refresh")),
        }

        info!(
            test_id = %test_id,
            steps = report.outcomes.len(),
            failures = report.failures().count(),
            "COORDINATOR: Cascading delete finished"
        );
        report
    }

    async fn fetch_cooperators(
        &self,
        test_id: &str,
        list_id: Option<&str>,
        report: &mut CascadeReport,
    ) -> Vec<Cooperator> {
        let Some(list_id) = list_id else {
            report.push(self.record_outcome(
                test_id,
                CascadeStep::FetchCooperators,
                None,
                StepStatus::Skipped,
            ));
            return Vec::new();
        };

        let (roster, status) = match self.related.cooperators.fetch_cooperators(list_id).await {
            Ok(roster) => (roster, StepStatus::Completed),
            Err(err) => {
                self.fail(operations::DELETE_TEST, &err, Some("fetch_cooperators"));
                (CooperatorRoster::default(), StepStatus::Failed(err.to_string()))
            }
        };

        report.push(self.record_outcome(
            test_id,
            CascadeStep::FetchCooperators,
            Some(list_id.to_string()),
            status,
        ));

        for rejected in roster.rejected {
            let err = StoreError::validation(format!(
                "cooperator entry {} in list {list_id}: {}",
                rejected.index, rejected.reason
            ));
            self.fail(operations::DELETE_TEST, &err, Some("decode_cooperator"));
            report.push(self.record_outcome(
                test_id,
                CascadeStep::DecodeCooperator {
                    index: rejected.index,
                },
                rejected.id,
                StepStatus::Failed(err.to_string()),
            ));
        }
        roster.cooperators
    }

    /// Steps that run after the test document itself is deleted
    fn plan_dependents<'a>(
        &'a self,
        record: &'a Test,
        reference: &'a TestReference,
        cooperators: &'a [Cooperator],
    ) -> Vec<PlannedStep<'a>> {
        let related = &self.related;
        let mut steps = vec![
            PlannedStep::optional(CascadeStep::DeleteReport, record.reports.as_deref(), |id| {
                related.reports.delete_by_id(id)
            }),
            PlannedStep::optional(CascadeStep::DeleteAnswers, record.answers.as_deref(), |id| {
                related.answers.delete_by_id(id)
            }),
        ];

        steps.extend(cooperators.iter().map(|cooperator| {
            let list = cooperator.list_kind();
            PlannedStep::new(
                CascadeStep::RemoveReference {
                    cooperator_id: cooperator.id.clone(),
                    list,
                },
                cooperator.id.clone(),
                related
                    .cooperators
                    .remove_reference(&cooperator.id, reference, list),
            )
        }));

        steps.push(PlannedStep::optional(
            CascadeStep::DeleteCooperators,
            record.cooperators.as_deref(),
            |id| related.cooperators.delete_by_id(id),
        ));
        steps
    }

    async fn run_step(&self, test_id: &str, planned: PlannedStep<'_>) -> CascadeStepOutcome {
        let PlannedStep {
            step,
            target,
            action,
        } = planned;

        let status = match action {
            None => StepStatus::Skipped,
            Some(action) => match action.await {
                Ok(()) => StepStatus::Completed,
                Err(err) => {
                    self.fail(operations::DELETE_TEST, &err, Some(step.name()));
                    StepStatus::Failed(err.to_string())
                }
            },
        };

        self.record_outcome(test_id, step, target, status)
    }

    fn record_outcome(
        &self,
        test_id: &str,
        step: CascadeStep,
        target: Option<DocumentId>,
        status: StepStatus,
    ) -> CascadeStepOutcome {
        log_cascade_step(test_id, step.name(), target.as_deref(), status.label());
        CascadeStepOutcome {
            step,
            target,
            status,
        }
    }

    /// Write `patch` to the test and, independently, stamp it through the
    /// controller and refresh the test list
    #[instrument(skip(self, patch))]
    pub async fn update_test(&self, collection: &str, id: &str, patch: TestPatch) {
        let _loading = self.state.begin_loading();

        let (generic, secondary) = tokio::join!(
            self.gateway.update(collection, id, patch.into_document()),
            self.controller.touch_test(id),
        );

        match generic {
            Ok(()) => log_test_operation(
                operations::UPDATE_TEST,
                collection,
                Some(id),
                "updated",
                None,
            ),
            Err(err) => self.fail(operations::UPDATE_TEST, &err, Some("update")),
        }

        match secondary {
            Ok(tests) => self.state.set_test_list(tests),
            Err(err) => self.fail(operations::UPDATE_TEST, &err, Some("touch")),
        }
    }

    /// Load one test into the current-test slot
    #[instrument(skip(self))]
    pub async fn get_test(&self, id: &str) {
        let _loading = self.state.begin_loading();

        match self.controller.get_test(id, TestView::Full).await {
            Ok(test) => self.state.set_current_test(Some(test)),
            Err(err) => self.fail(operations::GET_TEST, &err, None),
        }
    }

    /// Load every test into the test list
    #[instrument(skip(self))]
    pub async fn get_all_tests(&self) {
        self.refresh_list(operations::GET_ALL_TESTS, TestView::Full)
            .await;
    }

    /// Load one test projected through `view` into the test list
    #[instrument(skip(self))]
    pub async fn load_test_view(&self, id: &str, view: TestView) {
        let _loading = self.state.begin_loading();

        match self.controller.get_test(id, view).await {
            Ok(test) => self.state.set_test_list(vec![test]),
            Err(err) => self.fail(operations::LOAD_TEST_VIEW, &err, None),
        }
    }

    /// Load every test projected through `view` into the test list
    #[instrument(skip(self))]
    pub async fn load_all_tests(&self, view: TestView) {
        self.refresh_list(operations::LOAD_ALL_TESTS, view).await;
    }

    async fn refresh_list(&self, operation: &str, view: TestView) {
        let _loading = self.state.begin_loading();

        match self.controller.list_tests(view).await {
            Ok(tests) => {
                debug!(count = tests.len(), view = ?view, "COORDINATOR: Test list refreshed");
                self.state.set_test_list(tests);
            }
            Err(err) => self.fail(operation, &err, None),
        }
    }

    fn fail(&self, operation: &str, err: &StoreError, context: Option<&str>) {
        let message = err.to_string();
        log_error(COMPONENT, operation, &message, context);
        self.state.set_error(StoreFailure::new(operation, message));
    }
}
