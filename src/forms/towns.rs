use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::town::NewTown;
use crate::forms::sanitize_inline_text;

const NAME_MAX_LEN: u64 = 64;

pub type TownFormResult<T> = Result<T, TownFormError>;

#[derive(Debug, Error)]
pub enum TownFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("town name cannot be empty")]
    EmptyName,
}

/// Payload of the "Add town" admin action.
#[derive(Debug, Deserialize, Validate)]
pub struct AddTownForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
}

impl AddTownForm {
    pub fn into_new_town(self, hub_id: i32) -> TownFormResult<NewTown> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(TownFormError::EmptyName);
        }

        Ok(NewTown::new(hub_id, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_town_form_sanitizes_name() {
        let form = AddTownForm {
            name: "  New \t Delhi ".to_string(),
        };

        let town = form.into_new_town(3).expect("town");

        assert_eq!(town.hub_id, 3);
        assert_eq!(town.name, "New Delhi");
    }

    #[test]
    fn add_town_form_rejects_blank_name() {
        let form = AddTownForm {
            name: "   ".to_string(),
        };

        assert!(matches!(form.into_new_town(3), Err(TownFormError::EmptyName)));
    }
}
