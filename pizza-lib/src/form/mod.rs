//! Form controller: values, messages, banners and the submit state machine.

mod controller;
mod outcome;

pub use controller::*;
pub use outcome::*;
