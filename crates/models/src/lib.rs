pub mod rifa;

pub use rifa::{CreateRaffleInput, MessageResponse, PaymentInfo, RaffleEntry, RaffleEntryView, RaffleSummary};
