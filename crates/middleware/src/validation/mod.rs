pub mod raffle_entry;

pub use raffle_entry::{validate_numbers, validate_participant_name};
