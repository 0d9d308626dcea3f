pub mod entities;
pub mod error;
pub mod records;
pub mod value_objects;
