//! View projections over test documents.
//!
//! Each view keeps the fields one screen needs and drops the rest, so the
//! admin console, the structure editors and the template publisher can share
//! a single retrieval path.

use super::usability_test::Test;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestView {
    /// Document as stored
    #[default]
    Full,
    /// Identity, ownership and dependent document references
    Admin,
    /// Identity plus heuristic or task structure
    Structure,
    /// Structure plus response options
    StructureWithOptions,
    /// Everything needed to publish the test as a reusable template
    TemplateDoc,
}

impl TestView {
    pub fn apply(self, test: Test) -> Test {
        match self {
            TestView::Full => test,
            TestView::Admin => Test {
                id: test.id,
                test_title: test.test_title,
                test_description: test.test_description,
                test_type: test.test_type,
                test_admin: test.test_admin,
                creation_date: test.creation_date,
                update_date: test.update_date,
                answers: test.answers,
                cooperators: test.cooperators,
                reports: test.reports,
                template: test.template,
                ..Test::default()
            },
            TestView::Structure => Test {
                id: test.id,
                test_title: test.test_title,
                test_type: test.test_type,
                test_structure: test.test_structure,
                test_tasks: test.test_tasks,
                ..Test::default()
            },
            TestView::StructureWithOptions => Test {
                id: test.id,
                test_title: test.test_title,
                test_type: test.test_type,
                test_structure: test.test_structure,
                test_tasks: test.test_tasks,
                test_options: test.test_options,
                ..Test::default()
            },
            TestView::TemplateDoc => Test {
                test_title: test.test_title,
                test_description: test.test_description,
                test_type: test.test_type,
                test_structure: test.test_structure,
                test_tasks: test.test_tasks,
                test_options: test.test_options,
                pre_test: test.pre_test,
                post_test: test.post_test,
                ..Test::default()
            },
        }
    }
}
