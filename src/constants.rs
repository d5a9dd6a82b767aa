//! # System Constants
//!
//! Collection names, document field names and thresholds shared by the
//! gateway, controller and coordinator.

/// Default collection names in the document database
pub mod collections {
    pub const TESTS: &str = "Tests";
    pub const REPORTS: &str = "reports";
    pub const ANSWERS: &str = "answers";
    pub const COOPERATORS: &str = "cooperators";
    pub const USERS: &str = "users";
}

/// Field names used when patching documents directly
pub mod fields {
    pub const ID: &str = "id";
    pub const MY_TESTS: &str = "myTests";
    pub const MY_ANSWERS: &str = "myAnswers";
    pub const UPDATE_DATE: &str = "updateDate";
}

/// Operation names used in logs and error reports
pub mod operations {
    pub const CREATE_TEST: &str = "create_test";
    pub const DELETE_TEST: &str = "delete_test";
    pub const UPDATE_TEST: &str = "update_test";
    pub const GET_TEST: &str = "get_test";
    pub const GET_ALL_TESTS: &str = "get_all_tests";
    pub const LOAD_TEST_VIEW: &str = "load_test_view";
    pub const LOAD_ALL_TESTS: &str = "load_all_tests";
}

/// Highest access level that still belongs to the owner/manager tier
pub const OWNER_ACCESS_LEVEL_MAX: u32 = 1;

/// Default capacity of the state change broadcast channel
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;
