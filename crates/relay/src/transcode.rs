//! Source message → delivery payload conversion.

use anyhow::Context;

use crate::{
    error::{Error, Result},
    platform::{RelayAttachment, RelayPayload, SourceMessage},
};

/// Convert a fetched message into a webhook payload.
///
/// Attachments are read fully into memory before anything is sent; a read
/// failure fails the whole message, so it stays out of the ledger and is
/// retried on the next run instead of being delivered incomplete. Author
/// identity is captured as it is at transcode time.
pub async fn to_payload(message: &SourceMessage) -> Result<RelayPayload> {
    let mut attachments = Vec::with_capacity(message.attachments.len());
    for source in &message.attachments {
        let bytes = source
            .read()
            .await
            .with_context(|| format!("attachment {}", source.filename()))
            .map_err(|e| Error::transcode(message.id, e))?;
        attachments.push(RelayAttachment {
            filename: source.filename().to_string(),
            bytes,
        });
    }

    // The protocol wants null, not "", for a text-less message.
    let content = if message.content.is_empty() {
        None
    } else {
        Some(message.content.clone())
    };

    Ok(RelayPayload {
        content,
        display_name: message.author_display_name.clone(),
        avatar_url: message.author_avatar_url.clone(),
        attachments,
        embeds: message.embeds.clone(),
        suppress_mentions: true,
    })
}
