use app_error::{AppError, AppResult, validation_error};
use lazy_static::lazy_static;
use regex::Regex;

pub const MAX_NAME_LENGTH: usize = 100;

lazy_static! {
    // Printable text only; control characters end up in logs and exports
    static ref PARTICIPANT_NAME_REGEX: Regex = Regex::new(r"^[^\p{Cc}]+$").unwrap();
}

/// Validates a participant name and returns it trimmed
pub fn validate_participant_name(name: &str) -> AppResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(AppError::validation("name", "Name cannot be empty"));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::validation(
            "name",
            &format!("Name cannot exceed {} characters", MAX_NAME_LENGTH),
        ));
    }

    if !PARTICIPANT_NAME_REGEX.is_match(name) {
        return Err(AppError::validation(
            "name",
            "Name cannot contain control characters",
        ));
    }

    Ok(name.to_string())
}

/// Validates the numbers a participant wants, all within `0..=max_number`
pub fn validate_numbers(numbers: &[u32], max_number: u32) -> AppResult<()> {
    if numbers.is_empty() {
        return validation_error!("numbers", "Select at least one number");
    }

    if let Some(out_of_range) = numbers.iter().find(|n| **n > max_number) {
        return Err(AppError::validation(
            "numbers",
            &format!(
                "Number {} is outside the raffle range 0-{}",
                out_of_range, max_number
            ),
        ));
    }

    Ok(())
}
