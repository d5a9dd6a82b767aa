//! # Cooperator Model
//!
//! Users sharing access to a test. The access level decides which list on
//! the user document holds their reference to the test.

use super::usability_test::DocumentId;
use crate::constants::{fields, OWNER_ACCESS_LEVEL_MAX};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cooperator {
    /// Id of the cooperator's user document
    pub id: DocumentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub access_level: AccessLevel,
}

/// Ordinal permission tier; `value <= 1` is the owner/manager tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLevel {
    #[serde(deserialize_with = "deserialize_level")]
    pub value: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Document stored in the cooperators collection
///
/// Entries stay raw until [`into_roster`](Self::into_roster) decodes them one
/// at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CooperatorList {
    #[serde(default)]
    pub cooperators: Vec<Value>,
}

/// Cooperator list entry that could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedCooperator {
    /// Position of the entry in the stored list
    pub index: usize,
    /// User id, when the entry carried a string one
    pub id: Option<DocumentId>,
    pub reason: String,
}

/// Decoded cooperator list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CooperatorRoster {
    pub cooperators: Vec<Cooperator>,
    pub rejected: Vec<RejectedCooperator>,
}

impl CooperatorList {
    /// Decode every entry on its own
    pub fn into_roster(self) -> CooperatorRoster {
        let mut roster = CooperatorRoster::default();
        for (index, entry) in self.cooperators.into_iter().enumerate() {
            let id = entry
                .get(fields::ID)
                .and_then(Value::as_str)
                .map(str::to_string);
            match serde_json::from_value::<Cooperator>(entry) {
                Ok(cooperator) => roster.cooperators.push(cooperator),
                Err(err) => roster.rejected.push(RejectedCooperator {
                    index,
                    id,
                    reason: err.to_string(),
                }),
            }
        }
        roster
    }
}

/// Accepts any JSON number as a level
///
/// Fractions round up and negatives clamp to 0, so `value <= 1` agrees with
/// the raw number.
fn deserialize_level<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    if let Some(value) = number.as_u64() {
        return Ok(u32::try_from(value).unwrap_or(u32::MAX));
    }
    if number.is_i64() {
        return Ok(0);
    }
    match number.as_f64() {
        Some(value) if value.is_finite() => Ok(value.ceil().clamp(0.0, f64::from(u32::MAX)) as u32),
        _ => Err(D::Error::custom(format!("invalid access level: {number}"))),
    }
}

/// Which back-reference list on a user document points at a test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    /// Tests the user owns or manages (`myTests`)
    Owned,
    /// Tests the user answers (`myAnswers`)
    Answered,
}

impl ListKind {
    pub fn field(self) -> &'static str {
        match self {
            ListKind::Owned => fields::MY_TESTS,
            ListKind::Answered => fields::MY_ANSWERS,
        }
    }
}

impl AccessLevel {
    pub fn new(value: u32) -> Self {
        Self { value, text: None }
    }

    pub fn is_owner_tier(&self) -> bool {
        self.value <= OWNER_ACCESS_LEVEL_MAX
    }
}

impl Cooperator {
    pub fn new(id: impl Into<DocumentId>, access_level: u32) -> Self {
        Self {
            id: id.into(),
            email: None,
            access_level: AccessLevel::new(access_level),
        }
    }

    /// List holding this cooperator's reference to the test
    pub fn list_kind(&self) -> ListKind {
        if self.access_level.is_owner_tier() {
            ListKind::Owned
        } else {
            ListKind::Answered
        }
    }
}
