//! Order data model

mod order;
mod size;
mod topping;

pub use order::*;
pub use size::*;
pub use topping::*;
