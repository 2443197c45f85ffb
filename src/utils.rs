//! Utility functions for the ladder

/// Format a fraction as a percentage, e.g. `0.256` with 1 place is `25.6%`
pub fn percentage(value: f64, decimal_places: usize) -> String {
    format!("{:.*}%", decimal_places, value * 100.0)
}
