//! Warehouse, van and scanner forms

use super::state::{FieldErrors, Form};
use super::validators::{
    integer_in_range, max_length, min_length, optional_text, phone, required, zip_code,
};
use crate::models::{ScannerRequest, VanRequest, WarehouseRequest};
use crate::util::sanitize_phone;

const NAME_MAX: usize = 100;
const PLATE_MAX: usize = 10;
const SERIAL_MIN: usize = 4;
const SERIAL_MAX: usize = 50;
const VAN_CAPACITY_MAX: i64 = 100_000;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarehouseForm {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub manager_name: String,
}

impl Form for WarehouseForm {
    type Request = WarehouseRequest;

    const FIELDS: &'static [&'static str] = &[
        "name",
        "address",
        "city",
        "state",
        "zipCode",
        "phone",
        "managerName",
    ];

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("name", required(&self.name));
        errors.check("name", max_length(&self.name, NAME_MAX));
        errors.check("zipCode", zip_code(&self.zip_code));
        errors.check("phone", phone(&self.phone));
        errors.check("managerName", max_length(&self.manager_name, NAME_MAX));
        errors
    }

    fn to_request(&self) -> WarehouseRequest {
        WarehouseRequest {
            name: self.name.trim().to_string(),
            address: optional_text(&self.address),
            city: optional_text(&self.city),
            state: optional_text(&self.state),
            zip_code: optional_text(&self.zip_code),
            phone: optional_text(&sanitize_phone(&self.phone)),
            manager_name: optional_text(&self.manager_name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VanForm {
    pub name: String,
    pub license_plate: String,
    pub driver_id: Option<i64>,
    pub warehouse_id: Option<i64>,
    /// Free text; blank means unknown
    pub capacity: String,
}

impl Form for VanForm {
    type Request = VanRequest;

    const FIELDS: &'static [&'static str] =
        &["name", "licensePlate", "driverId", "warehouseId", "capacity"];

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("name", required(&self.name));
        errors.check("name", max_length(&self.name, NAME_MAX));
        errors.check("licensePlate", max_length(&self.license_plate, PLATE_MAX));
        if !self.capacity.trim().is_empty() {
            errors.check("capacity", integer_in_range(&self.capacity, 1, VAN_CAPACITY_MAX));
        }
        errors
    }

    fn to_request(&self) -> VanRequest {
        VanRequest {
            name: self.name.trim().to_string(),
            license_plate: optional_text(&self.license_plate).map(|p| p.to_uppercase()),
            driver_id: self.driver_id,
            warehouse_id: self.warehouse_id,
            capacity: self.capacity.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScannerForm {
    pub name: String,
    pub serial_number: String,
    pub assigned_user_id: Option<i64>,
    pub is_active: bool,
}

impl Default for ScannerForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            serial_number: String::new(),
            assigned_user_id: None,
            is_active: true,
        }
    }
}

impl Form for ScannerForm {
    type Request = ScannerRequest;

    const FIELDS: &'static [&'static str] = &["name", "serialNumber", "assignedUserId", "isActive"];

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("name", required(&self.name));
        errors.check("name", max_length(&self.name, NAME_MAX));
        errors.check("serialNumber", required(&self.serial_number));
        errors.check("serialNumber", min_length(&self.serial_number, SERIAL_MIN));
        errors.check("serialNumber", max_length(&self.serial_number, SERIAL_MAX));
        errors
    }

    fn to_request(&self) -> ScannerRequest {
        ScannerRequest {
            name: self.name.trim().to_string(),
            serial_number: self.serial_number.trim().to_string(),
            assigned_user_id: self.assigned_user_id,
            is_active: self.is_active,
        }
    }
}
