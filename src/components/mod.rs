pub mod array;
pub mod display;
pub mod dtype;
pub mod iter;
pub mod layout;
pub mod serialize;

pub use dtype::{DType, DataType};
