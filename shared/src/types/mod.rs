//! Wire types shared by list endpoints

pub mod pagination;

pub use pagination::{Page, PageRequest};
