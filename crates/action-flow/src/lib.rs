//! The Controller / Action Dispatcher. See [`controller::Controller`].

mod classify;
mod controller;
mod page_effects;

pub use classify::is_critical;
pub use controller::Controller;
