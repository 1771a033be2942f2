use serde::{Deserialize, Serialize};
use std::fmt;

/// Row of the `user_model` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,  // PRIMARY KEY - generated by SQLite
    pub name: String,
    pub email: String,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User(name = {}, email = {})", self.name, self.email)
    }
}

/// Validated write payload for create/update
#[derive(Debug, Clone, PartialEq, Eq, utoipa::ToSchema)]
pub struct UserInput {
    #[schema(example = "alice")]
    pub name: String,
    #[schema(example = "a@x.com")]
    pub email: String,
}

/// Wire representation of a user: always exactly `{id, name, email}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "alice")]
    pub name: String,
    #[schema(example = "a@x.com")]
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

pub fn serialize(user: User) -> UserResponse {
    UserResponse::from(user)
}

pub fn serialize_many(users: Vec<User>) -> Vec<UserResponse> {
    users.into_iter().map(UserResponse::from).collect()
}
