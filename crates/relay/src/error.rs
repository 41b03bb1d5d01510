use std::error::Error as StdError;

use crate::platform::{ChannelId, MessageId};

/// Crate-wide result type for relay operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed faults raised while driving a sync run.
///
/// Everything except [`Error::Store`] is isolated to the channel pair it
/// occurred in; a store fault means an in-memory update may no longer be
/// durable and aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configured channel could not be looked up on the platform.
    #[error("channel {channel} lookup failed: {source}")]
    Resolve {
        channel: ChannelId,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// Creating or validating a delivery endpoint failed.
    #[error("delivery endpoint for channel {channel}: {source}")]
    Endpoint {
        channel: ChannelId,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// Fetching source history failed.
    #[error("history fetch for channel {channel}: {source}")]
    History {
        channel: ChannelId,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// A message could not be converted into a delivery payload.
    #[error("transcode of message {message}: {source}")]
    Transcode {
        message: MessageId,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// A webhook send failed.
    #[error("delivery of message {message}: {source}")]
    Deliver {
        message: MessageId,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// Ledger or webhook-cache persistence failed.
    #[error(transparent)]
    Store(#[from] mimic_store::Error),
}

impl Error {
    #[must_use]
    pub fn resolve(channel: ChannelId, source: anyhow::Error) -> Self {
        Self::Resolve {
            channel,
            source: source.into(),
        }
    }

    #[must_use]
    pub fn endpoint(channel: ChannelId, source: anyhow::Error) -> Self {
        Self::Endpoint {
            channel,
            source: source.into(),
        }
    }

    #[must_use]
    pub fn history(channel: ChannelId, source: anyhow::Error) -> Self {
        Self::History {
            channel,
            source: source.into(),
        }
    }

    #[must_use]
    pub fn transcode(message: MessageId, source: anyhow::Error) -> Self {
        Self::Transcode {
            message,
            source: source.into(),
        }
    }

    #[must_use]
    pub fn deliver(message: MessageId, source: anyhow::Error) -> Self {
        Self::Deliver {
            message,
            source: source.into(),
        }
    }
}
