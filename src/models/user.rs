use serde::{Deserialize, Serialize};

// Full user row, never serialized directly since it carries the password hash
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: Option<String>, // "%Y-%m-%d %H:%M:%S"
}

/// Shape shown to anyone.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub is_admin: bool,
    pub created_at: Option<String>,
}

/// Shape shown to the account owner and to admins.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub is_admin: bool,
    pub created_at: Option<String>,
    pub email: String,
    pub is_active: bool,
}

impl User {
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            name: self.name.clone(),
            is_admin: self.is_admin,
            created_at: self.created_at.clone(),
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            name: self.name.clone(),
            is_admin: self.is_admin,
            created_at: self.created_at.clone(),
            email: self.email.clone(),
            is_active: self.is_active,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Registration {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

// Fields a user may change on their own account
#[derive(Deserialize, Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UserGrowth {
    pub year: i32,
    pub month: u32,
    pub total: i64,
}
