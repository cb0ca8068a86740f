//! User domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    /// Tender executive
    TenderExecutive,
    /// Team leader
    TeamLeader,
    /// Accounts
    Accounts,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::TenderExecutive => "TE",
            Role::TeamLeader => "TL",
            Role::Accounts => "AC",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "TE" => Some(Role::TenderExecutive),
            "TL" => Some(Role::TeamLeader),
            "AC" => Some(Role::Accounts),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: i64,

    #[validate(length(min = 2, max = 200))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: Option<String>,

    pub role: Role,
    pub team_id: Option<i64>,
    pub is_active: bool,

    #[serde(skip_serializing)]
    pub refresh_token_hash: Option<String>,

    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn can_login(&self) -> bool {
        self.is_active && self.password_hash.is_some()
    }
}

/// Authenticated requester, carried through request extensions.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: i64,
    pub role: Role,
    pub team_id: Option<i64>,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
