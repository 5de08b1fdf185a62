//! User and authentication payloads.

use generix_core::{Registration, User, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ErrorBody, from_value, take_field};
use crate::error::{ClientError, Result};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub mobile_no: &'a str,
    pub password: &'a str,
}

impl<'a> RegisterRequest<'a> {
    /// Request body for an already-validated form and its normalized email.
    #[must_use]
    pub fn new(form: &'a Registration, email: &'a str) -> Self {
        Self {
            first_name: form.first_name.trim(),
            last_name: form.last_name.trim(),
            email,
            mobile_no: form.mobile_no.trim(),
            password: &form.password,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUser {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    mobile_no: Option<String>,
    #[serde(default)]
    is_admin: bool,
}

impl From<WireUser> for User {
    fn from(wire: WireUser) -> Self {
        Self {
            id: UserId::new(wire.id),
            first_name: wire.first_name,
            last_name: wire.last_name,
            email: wire.email,
            mobile_no: wire.mobile_no,
            is_admin: wire.is_admin,
        }
    }
}

/// Convert a `users/details` response.
///
/// Some deployments wrap the document as `{ user: {...} }`.
///
/// # Errors
///
/// Returns `ClientError::DataShape` if no user document can be read.
pub fn convert_user(body: Value) -> Result<User> {
    let body = match body {
        Value::Object(mut object) if !object.contains_key("_id") => {
            take_field(&mut object, &["user"]).unwrap_or(Value::Object(object))
        }
        other => other,
    };
    from_value::<WireUser>(body, "user").map(User::from)
}

/// Read `{ updatedUser }` from a `set-as-admin` response.
///
/// # Errors
///
/// Returns `ClientError::DataShape` if `updatedUser` is missing.
pub fn convert_promoted_user(body: Value) -> Result<User> {
    match body {
        Value::Object(mut object) => take_field(&mut object, &["updatedUser"])
            .ok_or_else(|| ClientError::DataShape("missing updatedUser".to_string()))
            .and_then(convert_user),
        _ => Err(ClientError::DataShape("set-as-admin response is not an object".to_string())),
    }
}

/// Read `{ access }` from a login response.
///
/// The API answers a bad password with a 2xx body lacking `access`; that
/// case maps to `ClientError::Unauthorized` carrying the server's message.
///
/// # Errors
///
/// Returns `ClientError::Unauthorized` when no token is present.
pub fn convert_access_token(body: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct LoginResponse {
        #[serde(default)]
        access: Option<String>,
        #[serde(flatten)]
        error: ErrorBody,
    }

    let response: LoginResponse = from_value(body, "login response")?;
    response
        .access
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ClientError::Unauthorized(response.error.into_message()))
}
