pub mod segment;
pub mod validate;
pub mod view;
