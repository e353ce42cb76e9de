//! High-level client API for A2A protocol

pub mod agent;
pub mod builder;
pub mod config;

pub use agent::{drive, AgentClient};
pub use builder::{A2AClient, A2AClientBuilder};
pub use config::ClientConfig;
