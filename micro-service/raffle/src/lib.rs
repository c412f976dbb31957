pub mod handlers;
pub mod routes;
pub mod service;

pub use routes::create_routes;
pub use service::{RaffleService, RaffleServiceTrait, SharedRaffleService};
