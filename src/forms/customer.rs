//! Customer and location forms

use super::state::{FieldErrors, Form};
use super::validators::{
    email, max_length, optional_text, phone, required, zip_code, FieldError,
};
use crate::models::{Customer, CustomerRequest, Location, LocationRequest};
use crate::util::sanitize_phone;

const NAME_MAX: usize = 100;
const NOTES_MAX: usize = 500;

/// Raw input of the add/edit customer screen
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerForm {
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub notes: String,
    pub is_active: bool,
}

impl Default for CustomerForm {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            contact_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            notes: String::new(),
            is_active: true,
        }
    }
}

impl CustomerForm {
    /// Pre-fill from an existing customer for editing
    pub fn from_entity(customer: &Customer) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            company_name: customer.company_name.clone(),
            contact_name: text(&customer.contact_name),
            email: text(&customer.email),
            phone: text(&customer.phone),
            address: text(&customer.address),
            city: text(&customer.city),
            state: text(&customer.state),
            zip_code: text(&customer.zip_code),
            notes: text(&customer.notes),
            is_active: customer.is_active,
        }
    }
}

impl Form for CustomerForm {
    type Request = CustomerRequest;

    const FIELDS: &'static [&'static str] = &[
        "companyName",
        "contactName",
        "email",
        "phone",
        "address",
        "city",
        "state",
        "zipCode",
        "notes",
        "isActive",
    ];

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("companyName", required(&self.company_name));
        errors.check("companyName", max_length(&self.company_name, NAME_MAX));
        errors.check("contactName", max_length(&self.contact_name, NAME_MAX));
        errors.check("email", email(&self.email));
        errors.check("phone", phone(&self.phone));
        errors.check("zipCode", zip_code(&self.zip_code));
        errors.check("notes", max_length(&self.notes, NOTES_MAX));
        errors
    }

    fn to_request(&self) -> CustomerRequest {
        CustomerRequest {
            company_name: self.company_name.trim().to_string(),
            contact_name: optional_text(&self.contact_name),
            email: optional_text(&self.email),
            phone: optional_text(&sanitize_phone(&self.phone)),
            address: optional_text(&self.address),
            city: optional_text(&self.city),
            state: optional_text(&self.state),
            zip_code: optional_text(&self.zip_code),
            notes: optional_text(&self.notes),
            is_active: self.is_active,
        }
    }
}

/// Raw input of the add/edit location screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationForm {
    /// Picked from a customer dropdown
    pub customer_id: Option<i64>,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub contact_name: String,
}

impl LocationForm {
    pub fn from_entity(location: &Location) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            customer_id: Some(location.customer_id),
            name: location.name.clone(),
            address: text(&location.address),
            city: text(&location.city),
            state: text(&location.state),
            zip_code: text(&location.zip_code),
            phone: text(&location.phone),
            contact_name: text(&location.contact_name),
        }
    }
}

impl Form for LocationForm {
    type Request = LocationRequest;

    const FIELDS: &'static [&'static str] = &[
        "customerId",
        "name",
        "address",
        "city",
        "state",
        "zipCode",
        "phone",
        "contactName",
    ];

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if !self.customer_id.is_some_and(|id| id > 0) {
            errors.add("customerId", FieldError::Required);
        }
        errors.check("name", required(&self.name));
        errors.check("name", max_length(&self.name, NAME_MAX));
        errors.check("zipCode", zip_code(&self.zip_code));
        errors.check("phone", phone(&self.phone));
        errors.check("contactName", max_length(&self.contact_name, NAME_MAX));
        errors
    }

    fn to_request(&self) -> LocationRequest {
        LocationRequest {
            customer_id: self.customer_id.unwrap_or_default(),
            name: self.name.trim().to_string(),
            address: optional_text(&self.address),
            city: optional_text(&self.city),
            state: optional_text(&self.state),
            zip_code: optional_text(&self.zip_code),
            phone: optional_text(&sanitize_phone(&self.phone)),
            contact_name: optional_text(&self.contact_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormState;

    #[test]
    fn test_missing_company_name_blocks_submit() {
        let mut state = FormState::new(CustomerForm {
            email: "ops@acme.io".to_string(),
            ..Default::default()
        });
        assert!(state.visible_error("companyName").is_none());

        let err = state.submit().unwrap_err();
        assert_eq!(err.0.get("companyName"), Some(&FieldError::Required));
        assert!(state.all_touched());
        assert_eq!(state.visible_error("companyName"), Some(&FieldError::Required));
        assert!(state.visible_error("email").is_none());
    }

    #[test]
    fn test_customer_request_is_normalized() {
        let form = CustomerForm {
            company_name: "  Acme Vending ".to_string(),
            phone: "(555) 123-4567".to_string(),
            city: "   ".to_string(),
            ..Default::default()
        };
        assert!(form.validate().is_empty());
        let req = form.to_request();
        assert_eq!(req.company_name, "Acme Vending");
        assert_eq!(req.phone.as_deref(), Some("5551234567"));
        assert_eq!(req.city, None);
        assert!(req.is_active);
    }

    #[test]
    fn test_edit_round_trips_entity() {
        let customer = Customer {
            id: 3,
            company_name: "Acme".to_string(),
            contact_name: None,
            email: Some("a@b.co".to_string()),
            phone: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            notes: None,
            is_active: false,
            location_count: None,
        };
        let form = CustomerForm::from_entity(&customer);
        assert_eq!(form.email, "a@b.co");
        assert!(!form.to_request().is_active);
    }

    #[test]
    fn test_location_requires_customer() {
        let form = LocationForm {
            name: "Lobby".to_string(),
            ..Default::default()
        };
        let errors = form.validate();
        assert_eq!(errors.get("customerId"), Some(&FieldError::Required));
        assert_eq!(errors.len(), 1);

        let form = LocationForm {
            customer_id: Some(4),
            ..form
        };
        assert!(form.validate().is_empty());
        assert_eq!(form.to_request().customer_id, 4);
    }
}
