//! User API Surface
//!
//! Closed set of procedure names and their input/output types. The server
//! defines one procedure per variant; the SDK addresses them the same way.

use crate::kind::ProcedureKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserProcedure {
    /// userList - query, no input, `Vec<User>`
    List,
    /// userById - query, input id string, `Option<User>`
    ById,
    /// userCreate - mutation, input `CreateUserInput`, `User`
    Create,
}

impl UserProcedure {
    pub const ALL: [UserProcedure; 3] = [
        UserProcedure::List,
        UserProcedure::ById,
        UserProcedure::Create,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UserProcedure::List => "userList",
            UserProcedure::ById => "userById",
            UserProcedure::Create => "userCreate",
        }
    }

    pub fn kind(&self) -> ProcedureKind {
        match self {
            UserProcedure::List | UserProcedure::ById => ProcedureKind::Query,
            UserProcedure::Create => ProcedureKind::Mutation,
        }
    }
}

impl std::fmt::Display for UserProcedure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// userCreate input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserInput {
    pub name: String,
}
