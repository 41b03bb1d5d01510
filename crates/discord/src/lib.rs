//! Discord adapter for the mimic relay.
//!
//! Implements the relay's platform capability traits over serenity and
//! exposes the authorization-gated `/sync` trigger command.

pub mod access;
pub mod gateway;
pub mod handler;

pub use {gateway::DiscordGateway, handler::MimicHandler};
