use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::toggle::VariantSnapshot;
use crate::forms::sanitize_optional;

const VARIANT_MAX_LEN: u64 = 64;

pub type ToggleFormResult<T> = Result<T, ToggleFormError>;

#[derive(Debug, Error)]
pub enum ToggleFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Variant details submitted with a wishlist or booking toggle. All fields
/// are optional and only recorded when the entry is created.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ToggleForm {
    #[validate(length(max = VARIANT_MAX_LEN))]
    pub size: Option<String>,
    #[validate(length(max = VARIANT_MAX_LEN))]
    pub variant: Option<String>,
    #[validate(length(max = VARIANT_MAX_LEN))]
    pub color: Option<String>,
}

impl ToggleForm {
    pub fn into_snapshot(self) -> ToggleFormResult<VariantSnapshot> {
        self.validate()?;

        Ok(VariantSnapshot {
            size: sanitize_optional(self.size.as_deref()),
            variant: sanitize_optional(self.variant.as_deref()),
            color: sanitize_optional(self.color.as_deref()),
        })
    }
}
