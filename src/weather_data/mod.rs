pub mod batcher;
pub mod client;
pub mod error;
pub mod orchestrator;
pub mod reshaper;

#[cfg(test)]
pub(crate) mod mock;
