pub mod checker;
pub mod result;
