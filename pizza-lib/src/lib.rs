//! Pizza order form library
//!
//! Topping catalog, order model, declarative validation schema, the form
//! controller state machine and the HTTP client that places orders.

pub mod config;
pub mod error;
pub mod form;
pub mod model;
pub mod validation;

mod client;

pub use client::*;
pub use config::FormConfig;
pub use form::{FieldChange, FormController, Outcome, Phase};
pub use model::{OrderResponse, OrderValues, Size, TOPPINGS, Topping};
pub use validation::{Field, Schema};
