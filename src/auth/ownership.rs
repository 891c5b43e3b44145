use thiserror::Error;

use super::AuthenticatedContext;
use crate::database::models::{Course, User};

/// A record with a single owning user.
pub trait Owned {
    fn owner_id(&self) -> i64;
}

impl Owned for Course {
    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

/// Users own their own account.
impl Owned for User {
    fn owner_id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("user {caller} does not own this record (owner {owner})")]
pub struct Forbidden {
    pub caller: i64,
    pub owner: i64,
}

/// Allow the mutation only when the caller owns the record. The record must
/// already have been loaded: a missing record is "not found", not forbidden.
pub fn authorize<R: Owned + ?Sized>(ctx: &AuthenticatedContext, record: &R) -> Result<(), Forbidden> {
    let owner = record.owner_id();
    if ctx.user_id() == owner {
        Ok(())
    } else {
        Err(Forbidden {
            caller: ctx.user_id(),
            owner,
        })
    }
}
