pub mod calculations;
pub mod estimator;
pub mod scheduler;

pub use estimator::WeatherEstimator;
pub use scheduler::IrrigationScheduler;
