//! Form fields and their error messages

use std::fmt;

/// A validated field on the order form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Size,
    Toppings,
}

impl Field {
    /// All fields in form order.
    pub const ALL: [Field; 3] = [Field::Name, Field::Size, Field::Toppings];

    /// The field's name as used on the form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Size => "size",
            Self::Toppings => "toppings",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Name => 0,
            Self::Size => 1,
            Self::Toppings => 2,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current message per field. An empty string means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: String,
    pub size: String,
    pub toppings: String,
}

impl FieldErrors {
    /// Returns the message for a field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Size => &self.size,
            Field::Toppings => &self.toppings,
        }
    }

    /// Stores a message for a field; `None` marks it valid.
    pub fn set(&mut self, field: Field, message: Option<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Size => &mut self.size,
            Field::Toppings => &mut self.toppings,
        };
        *slot = message.unwrap_or_default();
    }

    /// Returns `true` if no field carries a message.
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    /// Clears every message.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
