//! Test fixtures and utilities

pub mod backend;
pub mod books;

#[allow(unused_imports)]
pub use backend::*;
#[allow(unused_imports)]
pub use books::*;
