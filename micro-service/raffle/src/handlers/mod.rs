pub mod rifa;
