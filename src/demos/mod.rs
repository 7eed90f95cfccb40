pub mod models;
pub mod mus_demo;
