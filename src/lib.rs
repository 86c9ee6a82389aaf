//! Provider catalog cache for kaze, a memory-minimal AI coding agent for the terminal.
//!
//! [`catalog::ProviderRegistry`] loads the provider list once per registry,
//! from a fresh cache or the remote catalog, adds the local Ollama provider
//! when one is running, and keeps the cache up to date in the background.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod listing;
