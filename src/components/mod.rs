pub mod field;
pub mod gauge;
