//! Form state
//!
//! A [`FormState`] wraps one typed form with the touched/error bookkeeping a
//! screen needs. Errors on a field are only shown once it has been touched;
//! submitting touches every field and refuses to reach the backend while any
//! field is invalid.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::validators::{FieldError, FieldResult};
use crate::api::{ApiError, ResourceService};

/// A typed form that can check itself and build a request body
pub trait Form {
    type Request: Serialize + Sync;

    /// Every field name, in display order
    const FIELDS: &'static [&'static str];

    fn validate(&self) -> FieldErrors;

    /// Only called once `validate` came back clean
    fn to_request(&self) -> Self::Request;
}

/// Errors keyed by field name, at most one per field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<&'static str, FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the first failure for `field`
    pub fn check<T>(&mut self, field: &'static str, result: FieldResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.0.entry(field).or_insert(e);
                None
            }
        }
    }

    pub fn add(&mut self, field: &'static str, error: FieldError) {
        self.0.entry(field).or_insert(error);
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldError)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }
}

/// Submission was blocked by invalid fields
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} field(s) need attention: {}", .0.len(), field_list(.0))]
pub struct ValidationError(pub FieldErrors);

fn field_list(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, e)| format!("{} ({})", field, e))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone)]
pub struct FormState<F> {
    form: F,
    touched: HashSet<&'static str>,
    errors: FieldErrors,
    submitting: bool,
}

impl<F: Form> FormState<F> {
    pub fn new(form: F) -> Self {
        Self {
            form,
            touched: HashSet::new(),
            errors: FieldErrors::new(),
            submitting: false,
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    /// Edit the form; errors are recomputed afterwards
    pub fn edit(&mut self, f: impl FnOnce(&mut F)) {
        f(&mut self.form);
        self.errors = self.form.validate();
    }

    /// Mark a field as visited (blur)
    pub fn touch(&mut self, field: &'static str) {
        self.touched.insert(field);
        self.errors = self.form.validate();
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    pub fn all_touched(&self) -> bool {
        F::FIELDS.iter().all(|f| self.touched.contains(f))
    }

    /// The error to display next to `field`, if it has been touched
    pub fn visible_error(&self, field: &str) -> Option<&FieldError> {
        if self.is_touched(field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.form.validate().is_empty()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Touch every field and build the request if the form is clean
    pub fn submit(&mut self) -> Result<F::Request, ValidationError> {
        self.touched.extend(F::FIELDS.iter().copied());
        self.errors = self.form.validate();

        if !self.errors.is_empty() {
            tracing::debug!(invalid = self.errors.len(), "Form submission blocked");
            return Err(ValidationError(self.errors.clone()));
        }
        Ok(self.form.to_request())
    }

    /// `POST` the form; nothing is sent while it is invalid
    pub async fn submit_create<E>(
        &mut self,
        service: &ResourceService<E, F::Request>,
    ) -> Result<E, SubmitError>
    where
        E: DeserializeOwned,
    {
        let request = self.submit()?;
        self.submitting = true;
        let result = service.create(&request).await;
        self.submitting = false;
        Ok(result?)
    }

    /// `PUT` the form over entity `id`; nothing is sent while it is invalid
    pub async fn submit_update<E>(
        &mut self,
        service: &ResourceService<E, F::Request>,
        id: i64,
    ) -> Result<(), SubmitError>
    where
        E: DeserializeOwned,
    {
        let request = self.submit()?;
        self.submitting = true;
        let result = service.update(id, &request).await;
        self.submitting = false;
        Ok(result?)
    }
}
