//! Narrow capability traits the sync engine depends on.
//!
//! The engine never sees the chat client's full surface: only channel
//! resolution, history access, and webhook-style delivery endpoints.

use {anyhow::Result, async_trait::async_trait};

/// Opaque 64-bit platform channel identifier.
pub type ChannelId = u64;

/// Opaque 64-bit platform message identifier.
pub type MessageId = u64;

/// A named attachment whose bytes can be read in full.
#[async_trait]
pub trait AttachmentSource: Send + Sync {
    /// Original filename, reproduced verbatim on delivery.
    fn filename(&self) -> &str;

    /// Read the complete attachment into memory.
    async fn read(&self) -> Result<Vec<u8>>;
}

/// A message fetched from a source channel.
pub struct SourceMessage {
    pub id: MessageId,
    pub author_display_name: String,
    pub author_avatar_url: Option<String>,
    pub content: String,
    pub attachments: Vec<Box<dyn AttachmentSource>>,
    /// Platform-opaque embed objects, forwarded unmodified.
    pub embeds: Vec<serde_json::Value>,
    /// Authored by a bot or posted through a webhook. Such messages are
    /// never re-relayed, which prevents loops when a target channel is also
    /// configured as a source.
    pub self_originated: bool,
}

/// A fully materialized attachment ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayAttachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// The payload delivered through an endpoint.
#[derive(Debug, Clone)]
pub struct RelayPayload {
    /// `None` rather than an empty string when the source had no text.
    pub content: Option<String>,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub attachments: Vec<RelayAttachment>,
    pub embeds: Vec<serde_json::Value>,
    /// Relayed messages must never ping users, roles, or everyone.
    pub suppress_mentions: bool,
}

/// A resolved channel: identity plus history access.
#[async_trait]
pub trait ChannelHandle: Send + Sync {
    fn id(&self) -> ChannelId;

    /// Full message history, oldest first. Pagination is the
    /// implementation's concern; callers see one ordered sequence.
    async fn fetch_history(&self) -> Result<Vec<SourceMessage>>;
}

/// A reusable, revocable delivery endpoint bound to one channel.
#[async_trait]
pub trait DeliveryEndpoint: Send + Sync {
    /// Stable locator persisted in the webhook cache.
    fn locator(&self) -> &str;

    async fn send(&self, payload: RelayPayload) -> Result<()>;
}

/// Minimal chat-platform surface the engine depends on.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Resolve a channel by ID. `Ok(None)` when the platform does not know
    /// it; `Err` only on transport faults.
    async fn channel(&self, id: ChannelId) -> Result<Option<Box<dyn ChannelHandle>>>;

    /// Create a new delivery endpoint scoped to `channel`.
    async fn create_endpoint(
        &self,
        channel: ChannelId,
        name: &str,
    ) -> Result<Box<dyn DeliveryEndpoint>>;

    /// Resolve a stored locator. `Ok(None)` when the endpoint no longer
    /// exists on the platform, distinguished from transport failure.
    async fn resolve_endpoint(&self, locator: &str) -> Result<Option<Box<dyn DeliveryEndpoint>>>;
}
