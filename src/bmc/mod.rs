pub mod bmc;
pub mod unroller;
