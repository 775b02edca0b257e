//! User and variation forms

use std::collections::HashSet;

use super::state::{FieldErrors, Form};
use super::validators::{
    email, max_length, min_length, optional_text, phone, required, FieldError,
};
use crate::models::{User, UserRequest, VariationRequest};
use crate::util::sanitize_phone;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;
const PASSWORD_MIN: usize = 8;
const NAME_MAX: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct UserForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub phone: String,
    /// Required for new users; blank on edit keeps the current password
    pub password: String,
    pub is_active: bool,
    is_new: bool,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            role: String::new(),
            phone: String::new(),
            password: String::new(),
            is_active: true,
            is_new: true,
        }
    }
}

impl UserForm {
    pub fn from_entity(user: &User) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            username: user.username.clone(),
            email: text(&user.email),
            first_name: text(&user.first_name),
            last_name: text(&user.last_name),
            role: text(&user.role),
            phone: text(&user.phone),
            password: String::new(),
            is_active: user.is_active,
            is_new: false,
        }
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }
}

impl Form for UserForm {
    type Request = UserRequest;

    const FIELDS: &'static [&'static str] = &[
        "username",
        "email",
        "firstName",
        "lastName",
        "role",
        "phone",
        "password",
        "isActive",
    ];

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("username", required(&self.username));
        errors.check("username", min_length(&self.username, USERNAME_MIN));
        errors.check("username", max_length(&self.username, USERNAME_MAX));
        errors.check("email", required(&self.email));
        errors.check("email", email(&self.email));
        errors.check("firstName", max_length(&self.first_name, NAME_MAX));
        errors.check("lastName", max_length(&self.last_name, NAME_MAX));
        errors.check("phone", phone(&self.phone));
        if self.is_new {
            errors.check("password", required(&self.password));
        }
        errors.check("password", min_length(&self.password, PASSWORD_MIN));
        errors
    }

    fn to_request(&self) -> UserRequest {
        UserRequest {
            username: self.username.trim().to_string(),
            email: optional_text(&self.email),
            first_name: optional_text(&self.first_name),
            last_name: optional_text(&self.last_name),
            role: optional_text(&self.role),
            phone: optional_text(&sanitize_phone(&self.phone)),
            password: (!self.password.is_empty()).then(|| self.password.clone()),
            is_active: self.is_active,
        }
    }
}

/// A variation axis and its option values, one per line in the UI
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariationForm {
    pub name: String,
    pub options: Vec<String>,
}

impl VariationForm {
    fn option_values(&self) -> Vec<String> {
        self.options
            .iter()
            .filter_map(|o| optional_text(o))
            .collect()
    }
}

impl Form for VariationForm {
    type Request = VariationRequest;

    const FIELDS: &'static [&'static str] = &["name", "options"];

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("name", required(&self.name));
        errors.check("name", max_length(&self.name, NAME_MAX));

        let values = self.option_values();
        if values.is_empty() {
            errors.add("options", FieldError::Required);
        }
        let mut seen = HashSet::new();
        if !values.iter().all(|v| seen.insert(v.to_lowercase())) {
            errors.add("options", FieldError::Duplicate);
        }
        errors
    }

    fn to_request(&self) -> VariationRequest {
        VariationRequest {
            name: self.name.trim().to_string(),
            options: self.option_values(),
        }
    }
}
