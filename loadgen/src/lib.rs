mod checkout;
mod task;

pub mod errors;

pub use checkout::{CheckoutSimulator, CHECKOUT_DURATION_SECONDS, CHECKOUT_EVENTS_TOTAL};
pub use task::PeriodicTask;
