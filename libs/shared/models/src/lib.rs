pub mod auth;
pub mod error;
pub mod goal;
pub mod meal_prep;
pub mod timestamp;
pub mod user;
pub mod validation;
pub mod workout;

pub use error::AppError;
pub use validation::FieldErrors;
