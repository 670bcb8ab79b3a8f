//! Order values and the endpoint's reply

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Size;

/// The in-progress order as entered on the form.
///
/// `size` keeps the raw select value so the schema can reject blanks and
/// unknown codes. Serializes to the payload the order endpoint expects:
///
/// ```json
/// { "fullName": "Alice Smith", "size": "L", "toppings": ["1", "3"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderValues {
    /// Customer name.
    #[serde(rename = "fullName")]
    pub name: String,
    /// Size code, or empty when nothing is selected.
    pub size: String,
    /// Selected topping identifiers.
    pub toppings: BTreeSet<String>,
}

impl OrderValues {
    /// Adds or removes a topping, the way a checkbox toggles.
    pub fn set_topping(&mut self, id: impl Into<String>, checked: bool) {
        let id = id.into();
        if checked {
            self.toppings.insert(id);
        } else {
            self.toppings.remove(&id);
        }
    }

    /// Returns `true` if the topping is selected.
    pub fn has_topping(&self, id: &str) -> bool {
        self.toppings.contains(id)
    }

    /// The selected size, if the raw value is a known code.
    pub fn parsed_size(&self) -> Option<Size> {
        self.size.parse().ok()
    }
}

/// Successful reply from the order endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrderResponse {
    /// Confirmation text chosen by the server.
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let mut values = OrderValues {
            name: "Alice Smith".to_string(),
            size: "L".to_string(),
            ..Default::default()
        };
        values.set_topping("3", true);
        values.set_topping("1", true);

        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "fullName": "Alice Smith", "size": "L", "toppings": ["1", "3"] })
        );
    }

    #[test]
    fn test_topping_toggle() {
        let mut values = OrderValues::default();
        values.set_topping("2", true);
        values.set_topping("2", true);
        assert_eq!(values.toppings.len(), 1);

        values.set_topping("2", false);
        assert!(!values.has_topping("2"));
    }

    #[test]
    fn test_parsed_size() {
        let values = OrderValues {
            size: "M".to_string(),
            ..Default::default()
        };
        assert_eq!(values.parsed_size(), Some(Size::Medium));
        assert_eq!(OrderValues::default().parsed_size(), None);
    }

    #[test]
    fn test_response_without_message() {
        let response: OrderResponse = serde_json::from_str("{}").unwrap();
        assert!(response.message.is_empty());
    }
}
