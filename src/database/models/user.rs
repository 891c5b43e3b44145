use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::auth::password;
use crate::database::StoreError;

pub const FIRST_NAME_REQUIRED: &str = "A first name is required";
pub const LAST_NAME_REQUIRED: &str = "A last name is required";
pub const EMAIL_REQUIRED: &str = "An email address is required";
pub const EMAIL_INVALID: &str = "Please provide a valid email address";
pub const EMAIL_TAKEN: &str = "The email address you entered already exists";
pub const PASSWORD_REQUIRED: &str = "A password is required";

/// A registered user as the API exposes it. The password hash is not part of
/// this type, so it can never be serialized into a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A user together with the stored password hash. Only the credential
/// verifier consumes this.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: User,
    pub password_hash: String,
}

#[derive(FromRow)]
pub(crate) struct IdentityRow {
    #[sqlx(flatten)]
    pub user: User,
    pub password: String,
}

impl From<IdentityRow> for Identity {
    fn from(row: IdentityRow) -> Self {
        Self {
            user: row.user,
            password_hash: row.password,
        }
    }
}

/// Body of `POST /api/users`. Every field is optional at the wire level so
/// that missing fields surface as validation messages instead of a JSON
/// rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
    pub password: Option<String>,
}

/// A `NewUser` that passed validation, with its password already hashed.
#[derive(Debug, Clone)]
pub struct ValidUser {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub password_hash: String,
}

impl NewUser {
    /// Checks every field constraint, collecting one message per violation
    /// in field order, then hashes the password off the async workers.
    pub async fn validate(self) -> Result<ValidUser, StoreError> {
        let mut errors = Vec::new();

        let first_name = required(self.first_name, FIRST_NAME_REQUIRED, &mut errors);
        let last_name = required(self.last_name, LAST_NAME_REQUIRED, &mut errors);
        let email_address = required(self.email_address, EMAIL_REQUIRED, &mut errors);
        if let Some(email) = &email_address {
            if !is_email(email) {
                errors.push(EMAIL_INVALID.to_string());
            }
        }
        let password = required(self.password, PASSWORD_REQUIRED, &mut errors);

        match (first_name, last_name, email_address, password) {
            (Some(first_name), Some(last_name), Some(email_address), Some(password))
                if errors.is_empty() =>
            {
                let password_hash = password::spawn_hash(password).await?;
                Ok(ValidUser {
                    first_name,
                    last_name,
                    email_address,
                    password_hash,
                })
            }
            _ => Err(StoreError::Validation(errors)),
        }
    }
}

/// Trims the value and records `message` when it is absent or blank.
pub(crate) fn required(
    value: Option<String>,
    message: &str,
    errors: &mut Vec<String>,
) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            errors.push(message.to_string());
            None
        }
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
