use manifesto_core::HouseholdInput;
use manifesto_core::Year;
use manifesto_core::situation::{FIRST_YEAR, LAST_YEAR};

use crate::error::{ApiError, ApiResult};

/// Validate a household form before any simulation is requested
pub fn validate_household(input: &HouseholdInput) -> ApiResult<()> {
    input.validate()?;
    Ok(())
}

/// Validate a snapshot year filter
pub fn validate_year(year: Option<Year>) -> ApiResult<()> {
    match year {
        Some(year) if !(FIRST_YEAR..=LAST_YEAR).contains(&year) => Err(ApiError::ValidationError {
            field: "year".to_string(),
            message: format!("Year must be between {FIRST_YEAR} and {LAST_YEAR}"),
        }),
        _ => Ok(()),
    }
}

/// Round to pence for display
pub fn round_to_pence(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
