pub mod crop;
pub mod schedule;
pub mod soil;
pub mod weather;

pub use crop::*;
pub use schedule::*;
pub use soil::*;
pub use weather::*;
