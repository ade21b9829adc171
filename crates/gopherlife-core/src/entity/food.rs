//! Food items.

use serde::{Deserialize, Serialize};

/// A food item. Its nutrition is fixed for its whole life.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FoodItem {
    /// Energy gained by eating it
    pub nutrition: u32,
}

impl FoodItem {
    /// Create a food item.
    #[must_use]
    pub const fn new(nutrition: u32) -> Self {
        Self { nutrition }
    }
}
