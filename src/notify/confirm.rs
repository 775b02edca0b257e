//! Confirmation prompts
//!
//! Destructive actions ask first. The CLI answers through a terminal
//! prompt; tests use [`FixedAnswer`].

/// Asks the user to confirm an action
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Always gives the same answer
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

/// Terminal prompt, defaulting to "no"
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

/// Prompt text for deleting one row
pub fn delete_prompt(label: &str, name: &str) -> String {
    format!("Are you sure you want to delete {} \"{}\"?", label, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_answer() {
        assert!(FixedAnswer(true).confirm("anything"));
        assert!(!FixedAnswer(false).confirm("anything"));
    }

    #[test]
    fn test_delete_prompt() {
        assert_eq!(
            delete_prompt("van", "Van 7"),
            "Are you sure you want to delete van \"Van 7\"?"
        );
    }
}
