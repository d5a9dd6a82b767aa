pub mod cooperator;
pub mod patch;
pub mod view;

// Re-export models for easy access
pub use cooperator::{
    AccessLevel, Cooperator, CooperatorList, CooperatorRoster, ListKind, RejectedCooperator,
};
pub use heuristic_test::{HeuristicTest, NewTest};
pub use patch::TestPatch;
pub use usability_test::{
    AnswersSheet, DocumentId, PostTest, PreTest, Test, TestAdmin, TestOption, TestReference,
    TestType,
};
pub use view::TestView;
