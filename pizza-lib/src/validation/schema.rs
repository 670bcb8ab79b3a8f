//! The order form's schema

use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::{Field, Schema};

/// Name shorter than three characters after trimming.
pub const NAME_TOO_SHORT: &str = "full name must be at least 3 characters";
/// Name longer than twenty characters after trimming.
pub const NAME_TOO_LONG: &str = "full name must be at most 20 characters";
/// Size outside S, M and L.
pub const SIZE_INCORRECT: &str = "size must be S or M or L";
/// A topping identifier that is not all digits.
pub const TOPPING_INCORRECT: &str = "toppings must be numeric topping ids";

/// Shortest accepted name.
pub const NAME_MIN_LENGTH: usize = 3;
/// Longest accepted name.
pub const NAME_MAX_LENGTH: usize = 20;

static TOPPING_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("Invalid topping id pattern"));

static ORDER_SCHEMA: LazyLock<Arc<Schema>> = LazyLock::new(|| Arc::new(order_schema()));

/// Builds the schema for the order form.
///
/// - name: trimmed, 3 to 20 characters
/// - size: exactly "S", "M" or "L"
/// - toppings: optional, every id all digits
pub fn order_schema() -> Schema {
    Schema::builder()
        .field(Field::Name, |v| v.name.trim().to_string())
        .min_length(NAME_MIN_LENGTH, NAME_TOO_SHORT)
        .max_length(NAME_MAX_LENGTH, NAME_TOO_LONG)
        .field(Field::Size, |v| v.size.clone())
        .one_of(&["S", "M", "L"], SIZE_INCORRECT)
        .field(Field::Toppings, |v| {
            v.toppings.iter().cloned().collect::<Vec<_>>()
        })
        .each_matches(TOPPING_ID.clone(), TOPPING_INCORRECT)
        .build()
}

impl Schema {
    /// The process-wide order schema, built on first use.
    pub fn shared() -> Arc<Schema> {
        Arc::clone(&ORDER_SCHEMA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderValues;

    fn order(name: &str, size: &str, toppings: &[&str]) -> OrderValues {
        let mut values = OrderValues {
            name: name.to_string(),
            size: size.to_string(),
            ..Default::default()
        };
        for id in toppings {
            values.set_topping(*id, true);
        }
        values
    }

    #[test]
    fn test_name_length_bounds() {
        let schema = order_schema();
        let check = |name: &str| schema.validate_field(Field::Name, &order(name, "S", &[]));

        assert_eq!(check(""), Err(NAME_TOO_SHORT.to_string()));
        assert_eq!(check("Al"), Err(NAME_TOO_SHORT.to_string()));
        assert_eq!(check("   Al   "), Err(NAME_TOO_SHORT.to_string()));
        assert_eq!(check("Ali"), Ok(()));
        assert_eq!(check(&"x".repeat(20)), Ok(()));
        assert_eq!(check(&format!("  {}  ", "x".repeat(20))), Ok(()));
        assert_eq!(check(&"x".repeat(21)), Err(NAME_TOO_LONG.to_string()));
    }

    #[test]
    fn test_name_counts_characters() {
        let schema = order_schema();
        let name = "é".repeat(20);
        assert_eq!(schema.validate_field(Field::Name, &order(&name, "S", &[])), Ok(()));
    }

    #[test]
    fn test_size_set() {
        let schema = order_schema();
        for size in ["S", "M", "L"] {
            assert_eq!(schema.validate_field(Field::Size, &order("Ali", size, &[])), Ok(()));
        }
        for size in ["", "s", "XL", " M", "Medium"] {
            assert_eq!(
                schema.validate_field(Field::Size, &order("Ali", size, &[])),
                Err(SIZE_INCORRECT.to_string())
            );
        }
    }

    #[test]
    fn test_toppings_are_digits() {
        let schema = order_schema();
        assert_eq!(schema.validate_field(Field::Toppings, &order("Ali", "S", &[])), Ok(()));
        assert_eq!(
            schema.validate_field(Field::Toppings, &order("Ali", "S", &["1", "42"])),
            Ok(())
        );
        for bad in ["pepperoni", "1a", "", "-1", "٣"] {
            assert_eq!(
                schema.validate_field(Field::Toppings, &order("Ali", "S", &[bad])),
                Err(TOPPING_INCORRECT.to_string()),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_whole_record_matches_fields() {
        let schema = order_schema();
        let cases = [
            order("Alice Smith", "L", &["1", "3"]),
            order("Al", "M", &[]),
            order("Alice", "", &[]),
            order("Alice", "S", &["x"]),
            order("", "", &[]),
        ];

        for values in cases {
            let each = Field::ALL
                .iter()
                .all(|f| schema.validate_field(*f, &values).is_ok());
            assert_eq!(schema.is_valid(&values), each, "{values:?}");
        }
    }

    #[test]
    fn test_invalid_record_reports_each_field() {
        let result = order_schema().validate(&order("Al", "XL", &["x"]));
        assert_eq!(result.message_for(Field::Name), Some(NAME_TOO_SHORT));
        assert_eq!(result.message_for(Field::Size), Some(SIZE_INCORRECT));
        assert_eq!(result.message_for(Field::Toppings), Some(TOPPING_INCORRECT));
    }

    #[test]
    fn test_shared_is_single_instance() {
        assert!(Arc::ptr_eq(&Schema::shared(), &Schema::shared()));
    }
}
