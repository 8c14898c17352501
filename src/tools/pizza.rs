//! Pizza order sizing.

use serde::{Deserialize, Serialize};

/// Fixed pizza size the recommendation is expressed in.
pub const PIZZA_SIZE: &str = "large";

/// A pizza order recommendation for a party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PizzaRecommendation {
    pub num_people: i64,
    pub pizzas_needed: i64,
    pub pizza_size: String,
    pub recommendation: String,
}

/// Calculate the number of large pizzas needed for a party.
///
/// One large pizza serves four people (2 adults + 2 children), so the count
/// is `ceil(num_people / 4)`. Callers must pass a positive count; the
/// tool-registry boundary rejects anything else before it reaches here.
pub fn calculate_pizza_needed(num_people: i64) -> PizzaRecommendation {
    let pizzas_needed = (num_people + 3) / 4;
    PizzaRecommendation {
        num_people,
        pizzas_needed,
        pizza_size: PIZZA_SIZE.to_string(),
        recommendation: format!(
            "We recommend {} large pizza(s) for {} people.",
            pizzas_needed, num_people
        ),
    }
}
