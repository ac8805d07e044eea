pub mod analysis;
pub mod controller;
pub mod history;
pub mod validation;

pub use controller::PredictionController;
pub use validation::PredictionForm;
