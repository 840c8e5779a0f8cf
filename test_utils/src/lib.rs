pub mod keys;
#[macro_use]
pub mod serialization;
