//! Declarative validation for the order form.
//!
//! A [`Schema`] holds an ordered rule list per [`Field`]. Rules are declared
//! with a fluent builder, and the first failing rule supplies the field's
//! message.
//!
//! # Example
//!
//! ```
//! use pizza_lib::validation::{Field, Schema};
//!
//! let schema = Schema::builder()
//!     .field(Field::Name, |v| v.name.trim().to_string())
//!         .min_length(3, "full name must be at least 3 characters")
//!     .field(Field::Size, |v| v.size.clone())
//!         .one_of(&["S", "M", "L"], "size must be S or M or L")
//!     .build();
//!
//! let result = schema.validate(&Default::default());
//! assert!(result.is_invalid());
//! ```

mod field;
mod result;
mod rules;
mod schema;

pub use field::{Field, FieldErrors};
pub use result::ValidationResult;
pub use rules::{FieldBuilder, Schema, SchemaBuilder};
pub use schema::*;
