//! Small parsing and formatting helpers shared by forms, tables and the CLI.

mod dates;
mod phone;

pub use dates::{
    display_or_dash, format_display_date, parse_date, parse_to_yyyymmdd, to_iso_date,
    today_yyyymmdd, yyyymmdd_to_date,
};
pub use phone::{format_phone, is_complete_phone, sanitize_phone, PHONE_DIGITS};
