//! Serenity-backed implementation of the relay's platform traits.

use std::sync::Arc;

use {
    anyhow::Context as _,
    async_trait::async_trait,
    serenity::all::{
        Attachment, CreateAllowedMentions, CreateAttachment, CreateEmbed, CreateWebhook, Embed,
        ExecuteWebhook, GetMessages, Http, HttpError, Message, Webhook,
    },
    tracing::debug,
};

use mimic_relay::platform::{
    AttachmentSource, ChannelHandle, ChannelId, ChatGateway, DeliveryEndpoint, RelayPayload,
    SourceMessage,
};

/// Discord history pages are capped at 100 messages per request.
const HISTORY_PAGE: u8 = 100;

/// Chat-platform surface backed by the serenity HTTP client.
pub struct DiscordGateway {
    http: Arc<Http>,
}

impl DiscordGateway {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ChatGateway for DiscordGateway {
    async fn channel(&self, id: ChannelId) -> anyhow::Result<Option<Box<dyn ChannelHandle>>> {
        let channel_id = serenity::all::ChannelId::new(id);
        match self.http.get_channel(channel_id).await {
            Ok(_) => Ok(Some(Box::new(DiscordChannel {
                id: channel_id,
                http: Arc::clone(&self.http),
            }))),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_endpoint(
        &self,
        channel: ChannelId,
        name: &str,
    ) -> anyhow::Result<Box<dyn DeliveryEndpoint>> {
        let webhook = serenity::all::ChannelId::new(channel)
            .create_webhook(&self.http, CreateWebhook::new(name))
            .await
            .context("create webhook")?;
        let locator = webhook.url().context("webhook has no url")?;
        Ok(Box::new(DiscordEndpoint {
            locator,
            webhook,
            http: Arc::clone(&self.http),
        }))
    }

    async fn resolve_endpoint(
        &self,
        locator: &str,
    ) -> anyhow::Result<Option<Box<dyn DeliveryEndpoint>>> {
        match Webhook::from_url(&self.http, locator).await {
            Ok(webhook) => Ok(Some(Box::new(DiscordEndpoint {
                locator: locator.to_string(),
                webhook,
                http: Arc::clone(&self.http),
            }))),
            // Deleted on the platform, or a corrupt cache entry: both are
            // stale and repairable by creating a replacement.
            Err(e) if is_not_found(&e) => Ok(None),
            Err(serenity::Error::Url(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

struct DiscordChannel {
    id: serenity::all::ChannelId,
    http: Arc<Http>,
}

#[async_trait]
impl ChannelHandle for DiscordChannel {
    fn id(&self) -> ChannelId {
        self.id.get()
    }

    async fn fetch_history(&self) -> anyhow::Result<Vec<SourceMessage>> {
        // The API serves pages newest-first; walk backwards with a `before`
        // cursor, then reverse into chronological order.
        let mut newest_first: Vec<Message> = Vec::new();
        let mut cursor: Option<serenity::all::MessageId> = None;

        loop {
            let mut filter = GetMessages::new().limit(HISTORY_PAGE);
            if let Some(before) = cursor {
                filter = filter.before(before);
            }
            let batch = self.id.messages(&self.http, filter).await?;
            let Some(oldest) = batch.last() else { break };
            cursor = Some(oldest.id);

            let full_page = batch.len() == usize::from(HISTORY_PAGE);
            debug!(channel = self.id.get(), page = batch.len(), "fetched history page");
            newest_first.extend(batch);
            if !full_page {
                break;
            }
        }

        newest_first.reverse();
        Ok(newest_first.into_iter().map(source_message).collect())
    }
}

fn source_message(message: Message) -> SourceMessage {
    // Bot and webhook authorship both mark a message as relay-originated.
    let self_originated = message.author.bot || message.webhook_id.is_some();
    let embeds = message
        .embeds
        .iter()
        .filter_map(|embed| serde_json::to_value(embed).ok())
        .collect();
    let attachments = message
        .attachments
        .into_iter()
        .map(|attachment| Box::new(DiscordAttachment(attachment)) as Box<dyn AttachmentSource>)
        .collect();

    SourceMessage {
        id: message.id.get(),
        author_display_name: message.author.display_name().to_string(),
        author_avatar_url: Some(message.author.face()),
        content: message.content,
        attachments,
        embeds,
        self_originated,
    }
}

struct DiscordAttachment(Attachment);

#[async_trait]
impl AttachmentSource for DiscordAttachment {
    fn filename(&self) -> &str {
        &self.0.filename
    }

    async fn read(&self) -> anyhow::Result<Vec<u8>> {
        self.0
            .download()
            .await
            .with_context(|| format!("download {}", self.0.filename))
    }
}

struct DiscordEndpoint {
    locator: String,
    webhook: Webhook,
    http: Arc<Http>,
}

#[async_trait]
impl DeliveryEndpoint for DiscordEndpoint {
    fn locator(&self) -> &str {
        &self.locator
    }

    async fn send(&self, payload: RelayPayload) -> anyhow::Result<()> {
        let mut builder = ExecuteWebhook::new().username(payload.display_name);
        if payload.suppress_mentions {
            // An empty allowed-mentions set disables every ping.
            builder = builder.allowed_mentions(CreateAllowedMentions::new());
        }
        if let Some(content) = payload.content {
            builder = builder.content(content);
        }
        if let Some(avatar) = payload.avatar_url {
            builder = builder.avatar_url(avatar);
        }
        for attachment in payload.attachments {
            builder = builder.add_file(CreateAttachment::bytes(attachment.bytes, attachment.filename));
        }
        if !payload.embeds.is_empty() {
            let embeds = payload
                .embeds
                .into_iter()
                .map(|value| serde_json::from_value::<Embed>(value).map(CreateEmbed::from))
                .collect::<Result<Vec<_>, _>>()
                .context("embed conversion")?;
            builder = builder.embeds(embeds);
        }

        // wait=true: only a confirmed creation counts as delivered.
        self.webhook
            .execute(&self.http, true, builder)
            .await
            .context("webhook execute")?;
        Ok(())
    }
}

fn is_not_found(error: &serenity::Error) -> bool {
    match error {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
            response.status_code == 404
        },
        _ => false,
    }
}
