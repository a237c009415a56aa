pub mod spans;
pub mod stylesheet;
