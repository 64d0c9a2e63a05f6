//! Register / login payloads

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RegisterUser {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "The Email field is required."),
        email(message = "The Email field is not a valid e-mail address.")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, max = 100, message = "The Password must be between 6 and 100 characters."))]
    pub password: String,

    #[serde(default)]
    #[validate(must_match(other = "password", message = "The passwords do not match."))]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoginUser {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "The Email field is required."),
        email(message = "The Email field is not a valid e-mail address.")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, max = 100, message = "The Password must be between 6 and 100 characters."))]
    pub password: String,
}
