//! Entity forms
//!
//! Typed add/edit forms with local, synchronous validation. A form never
//! reaches the backend while any field is invalid.
//!
//! ```
//! use depot::forms::{CustomerForm, FieldError, FormState};
//!
//! let mut state = FormState::new(CustomerForm::default());
//! let err = state.submit().unwrap_err();
//! assert_eq!(err.0.get("companyName"), Some(&FieldError::Required));
//! assert!(state.all_touched());
//! ```

mod customer;
mod fleet;
mod state;
mod user;
pub mod validators;

pub use customer::{CustomerForm, LocationForm};
pub use fleet::{ScannerForm, VanForm, WarehouseForm};
pub use state::{FieldErrors, Form, FormState, SubmitError, ValidationError};
pub use user::{UserForm, VariationForm};
pub use validators::{FieldError, FieldResult};
