pub mod controller;
pub mod trend;

pub use controller::DashboardController;
