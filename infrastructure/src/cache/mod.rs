//! Result cache adapters

mod memory;

pub use memory::InMemoryResultCache;
