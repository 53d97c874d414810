pub mod gauge;
pub mod input;

pub use gauge::depletion_gauge;
pub use input::{InputWidget, SelectWidget};
