pub mod geo;
pub mod id_generator;
pub mod money;
