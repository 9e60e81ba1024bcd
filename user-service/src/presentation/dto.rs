use dealer_core::Role;
use dealer_core::pagination::Pagination;
use dealer_core::validation::Schema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::user::UserView;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 100, message = "name must be between 3 and 100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: Option<String>,
    pub role: Option<Role>,
}

impl Schema for CreateUserRequest {
    const FIELDS: &'static [&'static str] = &["name", "email", "password", "role"];
    const REQUIRED: &'static [&'static str] = &["name", "email", "password"];

    fn is_present(&self, field: &str) -> bool {
        match field {
            "name" => self.name.is_some(),
            "email" => self.email.is_some(),
            "password" => self.password.is_some(),
            "role" => self.role.is_some(),
            _ => false,
        }
    }
}

/// Profile changes. Password and role are not updatable through this route.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 100, message = "name must be between 3 and 100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
}

impl Schema for UpdateUserRequest {
    const FIELDS: &'static [&'static str] = &["name", "email"];
    const REQUIRED: &'static [&'static str] = &["name", "email"];

    fn is_present(&self, field: &str) -> bool {
        match field {
            "name" => self.name.is_some(),
            "email" => self.email.is_some(),
            _ => false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UserCreatedResponse {
    pub message: &'static str,
    pub user: UserView,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserView,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserView>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
