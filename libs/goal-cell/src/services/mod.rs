pub mod goal;
pub mod validation;
