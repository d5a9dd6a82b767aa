use proptest::prelude::*;
use usability_core::models::TestAdmin;
use usability_core::NewTest;

/// Strategy for optional free-text fields, including empty strings
pub fn text_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-zA-Z0-9 .,!?]{0,80}")
}

pub fn admin_strategy() -> impl Strategy<Value = Option<TestAdmin>> {
    prop::option::of(
        ("[a-zA-Z0-9]{1,20}", "[a-z]{1,10}@[a-z]{1,10}\\.com")
            .prop_map(|(user_doc_id, email)| TestAdmin { user_doc_id, email }),
    )
}

/// Strategy for raw creation input with any subset of fields present
pub fn new_test_strategy() -> impl Strategy<Value = NewTest> {
    (text_strategy(), text_strategy(), admin_strategy()).prop_map(
        |(title, description, admin)| NewTest {
            title,
            description,
            admin,
        },
    )
}

/// Strategy for cooperator access levels around the owner threshold
pub fn access_level_strategy() -> impl Strategy<Value = u32> {
    0u32..10
}

/// Strategy for valid collection names
pub fn collection_name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_-]{0,30}"
}
