pub mod location;
pub mod metno;

pub use location::LocationResolver;
pub use metno::MetNoClient;

use crate::error::Result;
use crate::models::{Coordinates, WeatherSample};
use std::future::Future;

/// Source of current weather conditions for a point
pub trait WeatherProvider {
    fn fetch_current(
        &self,
        coordinates: Coordinates,
    ) -> impl Future<Output = Result<WeatherSample>> + Send;
}
