use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const ACCOUNT_TYPE: &str = "accounts";

/// Single resource wrapped in the API's `{"data": ...}` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource<T> {
    pub data: T,
}

impl<T> Resource<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

/// Sequence of resources wrapped in the `{"data": [...]}` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ResourceList<T> {
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub data: Vec<T>,
}

impl<T> ResourceList<T> {
    pub fn into_inner(self) -> Vec<T> {
        self.data
    }
}

/// A bank account registered with Form3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "type", default = "default_account_type")]
    pub resource_type: String,
    pub id: String,
    pub organisation_id: String,
    /// Incremented by the server on every mutation; required to delete.
    #[serde(default)]
    pub version: u64,
    pub attributes: AccountAttributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,
}

impl Account {
    pub fn new(
        id: impl Into<String>,
        organisation_id: impl Into<String>,
        attributes: AccountAttributes,
    ) -> Self {
        Self {
            resource_type: ACCOUNT_TYPE.to_string(),
            id: id.into(),
            organisation_id: organisation_id.into(),
            version: 0,
            attributes,
            created_on: None,
            modified_on: None,
        }
    }
}

/// Banking details of an account. Which fields are mandatory depends on the
/// country and scheme; only `country` is always required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAttributes {
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_null_as_empty"
    )]
    pub name: Vec<String>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_null_as_empty"
    )]
    pub alternative_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_classification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joint_account: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_matching_opt_out: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_identification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switched: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
}

impl AccountAttributes {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            ..Self::default()
        }
    }
}

/// Account status as reported by the server. Values this crate does not
/// know about are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountStatus {
    Pending,
    Confirmed,
    Failed,
    Other(String),
}

impl AccountStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AccountStatus::Pending => "pending",
            AccountStatus::Confirmed => "confirmed",
            AccountStatus::Failed => "failed",
            AccountStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for AccountStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => AccountStatus::Pending,
            "confirmed" => AccountStatus::Confirmed,
            "failed" => AccountStatus::Failed,
            _ => AccountStatus::Other(raw),
        }
    }
}

impl From<AccountStatus> for String {
    fn from(status: AccountStatus) -> Self {
        match status {
            AccountStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Body of a non-2xx response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) error_message: Option<String>,
}

fn default_account_type() -> String {
    ACCOUNT_TYPE.to_string()
}

fn deserialize_null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw: Option<Vec<T>> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default())
}
