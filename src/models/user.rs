use std::collections::HashSet;

use anyhow::{Error, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, DispatchResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

impl User {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Read-only set of known users, fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Directory {
    users: Vec<User>,
}

impl Directory {
    pub fn new(users: Vec<User>) -> Result<Self, Error> {
        let mut seen = HashSet::with_capacity(users.len());

        for user in &users {
            if !seen.insert(user.id) {
                return Err(anyhow!("Duplicate user id {} in directory", user.id));
            }
        }

        Ok(Self { users })
    }

    pub fn default_users() -> Self {
        Self {
            users: vec![
                User::new(1, "Emma"),
                User::new(2, "Bruno"),
                User::new(3, "Rick"),
                User::new(4, "Lena"),
            ],
        }
    }

    pub fn find(&self, id: i64) -> DispatchResult<&User> {
        find_user_by_id(id, &self.users)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

pub fn find_user_by_id(id: i64, users: &[User]) -> DispatchResult<&User> {
    users
        .iter()
        .find(|user| user.id == id)
        .ok_or(DispatchError::UserNotFound { id })
}
