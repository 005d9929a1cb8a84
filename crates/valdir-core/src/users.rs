use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Columns that never leave the backend row once it is deserialized.
const SECRET_COLUMNS: [&str; 2] = ["senha", "password"];

/// Backend user ids are integers or text (e.g. UUIDs) depending on the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Int(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Int(id) => write!(f, "{id}"),
            UserId::Text(id) => f.write_str(id),
        }
    }
}

/// An authenticated admin, as persisted in the client session.
///
/// Unknown backend columns are kept in `extra`; password columns are dropped
/// during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AdminUserRow")]
pub struct AdminUser {
    pub id: UserId,
    pub email: String,
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct AdminUserRow {
    id: UserId,
    email: String,
    #[serde(rename = "nome", alias = "name", default)]
    name: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<AdminUserRow> for AdminUser {
    fn from(row: AdminUserRow) -> Self {
        let mut extra = row.extra;
        for column in SECRET_COLUMNS {
            extra.remove(column);
        }
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            extra,
        }
    }
}

impl AdminUser {
    /// Name to greet the admin with, falling back to the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }
}
