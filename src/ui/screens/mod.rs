pub mod calculator;

pub use calculator::{CalculatorScreen, FormField};
