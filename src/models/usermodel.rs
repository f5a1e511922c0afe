use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    Constructor,
    Supplier,
    Architect,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Constructor => "constructor",
            UserRole::Supplier => "supplier",
            UserRole::Architect => "architect",
        }
    }
}

// Read model only: account creation and authentication live in a separate
// service, this one just joins against the table for display names and
// notification addressing.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: Option<DateTime<Utc>>, // Database has DEFAULT NOW(), can be NULL
    pub updated_at: Option<DateTime<Utc>>,
}
