//! User feedback: toast notifications and confirmation prompts.

mod confirm;
mod toast;

pub use confirm::{delete_prompt, Confirm, FixedAnswer, TerminalConfirm};
pub use toast::{Toast, ToastConfig, ToastLevel, ToastQueue};
