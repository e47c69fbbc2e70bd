//! User DTOs - Data Transfer Objects for accounts and identities

use crate::domain::{AuraError, AuraResult, Field, Identity};
use crate::entities::User;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_TIMEZONE: &str = "Europe/Stockholm";

impl From<User> for Identity {
    fn from(value: User) -> Self {
        Self {
            id: value.user_id,
            name: value.name,
            email: value.email,
            timezone: value.timezone,
            // password never leaves the server
        }
    }
}

/// Body of POST /auth/register
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct RegisterDTO {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 140))]
    pub name: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl RegisterDTO {
    /// Validates the body and reports the first failing field in the order
    /// email, name, password.
    pub fn check(&self) -> AuraResult<()> {
        let trimmed = RegisterDTO {
            email: self.email.trim().to_string(),
            name: self.name.trim().to_string(),
            password: self.password.clone(),
            timezone: self.timezone.clone(),
        };
        match trimmed.validate() {
            Ok(()) => Ok(()),
            Err(errors) => {
                let by_field = errors.field_errors();
                let field = [Field::Email, Field::Name, Field::Password]
                    .into_iter()
                    .find(|f| by_field.contains_key(f.as_str()))
                    .unwrap_or(Field::Email);
                Err(AuraError::validation(field))
            }
        }
    }
}

/// Body of POST /auth/login
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginDTO {
    pub email: String,
    pub password: String,
}

/// Response of login and register
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TokenDTO {
    pub access_token: String,
}

/// DTO to insert a new user (password already hashed)
#[derive(Debug, Clone)]
pub struct CreateUserDTO {
    pub email: String,
    pub name: String,
    pub password: String,
    pub timezone: Option<String>,
}
