//! Fixed topping catalog

/// A topping offered on the order form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topping {
    /// Identifier sent to the order endpoint.
    pub id: &'static str,
    /// Label shown next to the checkbox.
    pub text: &'static str,
}

/// Every topping the form offers, in display order.
pub static TOPPINGS: [Topping; 5] = [
    Topping { id: "1", text: "Pepperoni" },
    Topping { id: "2", text: "Green Peppers" },
    Topping { id: "3", text: "Pineapple" },
    Topping { id: "4", text: "Mushrooms" },
    Topping { id: "5", text: "Ham" },
];
