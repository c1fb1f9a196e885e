//! ShelfSync member client library exports

pub mod api;
pub mod cli;
pub mod core;
pub mod member;

#[cfg(test)]
pub mod test_support;
