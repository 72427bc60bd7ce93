use crate::utils::error::{ContactError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A persisted contact. `id` is the primary key; `name` is searchable but not unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unvalidated contact fields, from a create request or a CSV row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl NewContact {
    /// Validates the fields and builds a record with a fresh id.
    ///
    /// `name` falls back to `firstName lastName` when it is blank.
    pub fn into_record(self, owner: Option<&str>) -> Result<ContactRecord> {
        let first_name = clean(self.first_name);
        let last_name = clean(self.last_name);
        let name = clean(self.name).or_else(|| match (&first_name, &last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            _ => None,
        });

        let Some(name) = name else {
            return Err(ContactError::validation("missing required field: name"));
        };

        let now = Utc::now();
        Ok(ContactRecord {
            id: Uuid::new_v4(),
            user_id: owner.map(str::to_string),
            name,
            first_name,
            last_name,
            email: clean(self.email),
            phone: clean(self.phone),
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPatch {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(ContactError::validation("no fields to update"));
        }
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(ContactError::validation("name cannot be empty"));
        }
        Ok(())
    }

    pub fn apply(&self, record: &mut ContactRecord) {
        if let Some(name) = &self.name {
            record.name = name.trim().to_string();
        }
        // a blank optional field clears it
        if self.first_name.is_some() {
            record.first_name = clean(self.first_name.clone());
        }
        if self.last_name.is_some() {
            record.last_name = clean(self.last_name.clone());
        }
        if self.email.is_some() {
            record.email = clean(self.email.clone());
        }
        if self.phone.is_some() {
            record.phone = clean(self.phone.clone());
        }
        record.updated_at = Utc::now();
    }
}

/// How a caller addresses a single contact in a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactKey {
    Id(Uuid),
    Name(String),
}

impl ContactKey {
    pub fn parse(raw: &str) -> Self {
        match Uuid::parse_str(raw) {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Name(raw.to_string()),
        }
    }
}

impl fmt::Display for ContactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Name(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub user_id: Option<String>,
}

impl ContactFilter {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &ContactRecord) -> bool {
        self.name.as_ref().map_or(true, |name| &record.name == name)
            && self
                .email
                .as_ref()
                .map_or(true, |email| record.email.as_ref() == Some(email))
            && self
                .user_id
                .as_ref()
                .map_or(true, |user_id| record.user_id.as_ref() == Some(user_id))
    }
}

/// A CSV row that was excluded from the import. `row` counts data rows from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub rows_seen: usize,
    pub inserted: usize,
    pub rejected: Vec<RowError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
