//! Discord event handler: command registration and the `/sync` trigger.

use std::{sync::Arc, time::Duration};

use {
    serenity::{
        all::{
            Command, CommandInteraction, Context, CreateCommand,
            CreateInteractionResponseFollowup, EventHandler, GatewayIntents, Interaction, Ready,
        },
        async_trait,
    },
    tokio::sync::Mutex,
    tracing::{error, info, warn},
};

use {
    mimic_config::MimicConfig,
    mimic_relay::{ChannelPair, SyncEngine},
    mimic_store::{CrashLog, MapStore},
};

use crate::{access, gateway::DiscordGateway};

/// Handler for Discord gateway events.
///
/// Holds the immutable process configuration and the single-flight guard:
/// at most one sync run may be active at a time, enforced here at the
/// trigger layer so the engine itself needs no locking.
pub struct MimicHandler {
    config: Arc<MimicConfig>,
    run_lock: Mutex<()>,
}

impl MimicHandler {
    pub fn new(config: Arc<MimicConfig>) -> Self {
        Self {
            config,
            run_lock: Mutex::new(()),
        }
    }

    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
    }

    async fn handle_sync(&self, ctx: &Context, command: &CommandInteraction) {
        if let Err(e) = command.defer_ephemeral(&ctx.http).await {
            warn!(error = %e, "failed to defer interaction");
            return;
        }

        // Authorization comes before any engine or store work: a denied
        // caller causes zero deliveries and zero ledger mutations.
        let is_admin = command
            .member
            .as_ref()
            .and_then(|member| member.permissions)
            .is_some_and(|permissions| permissions.administrator());
        let user_id = command.user.id.get();
        if !access::is_authorized(user_id, is_admin, &self.config.discord.allowlist) {
            warn!(user = user_id, "unauthorized /sync attempt");
            self.followup(ctx, command, "You are not authorized to run this command.")
                .await;
            return;
        }

        let Ok(_guard) = self.run_lock.try_lock() else {
            self.followup(ctx, command, "A sync run is already in progress.")
                .await;
            return;
        };

        info!(user = user_id, "sync run triggered");
        let engine = self.build_engine(ctx);
        match engine.run().await {
            Ok(report) => {
                let notice = format!(
                    "Sync complete: {} pair(s) synced, {} skipped, {} errored, {} message(s) relayed.",
                    report.pairs_synced,
                    report.pairs_skipped,
                    report.pairs_errored,
                    report.messages_delivered,
                );
                self.followup(ctx, command, &notice).await;
            },
            Err(e) => {
                // Full detail goes to the operator log; the caller only
                // ever sees a generic notice.
                let detail = format!("{:?}", anyhow::Error::new(e));
                CrashLog::new(&self.config.storage.log_dir)
                    .record("sync run", &detail)
                    .await;
                error!("sync run failed, detail archived");
                self.followup(ctx, command, "An error occurred during sync. See logs.")
                    .await;
            },
        }
    }

    fn build_engine(&self, ctx: &Context) -> SyncEngine {
        let pairs = mimic_config::dedup_pairs(&self.config.pairs)
            .into_iter()
            .map(|pair| ChannelPair {
                source: pair.source,
                target: pair.target,
            })
            .collect();

        SyncEngine::new(
            Arc::new(DiscordGateway::new(Arc::clone(&ctx.http))),
            pairs,
            MapStore::new(&self.config.storage.webhooks_file),
            MapStore::new(&self.config.storage.ledger_file),
            CrashLog::new(&self.config.storage.log_dir),
            Duration::from_millis(self.config.sync.pace_ms),
            self.config.sync.webhook_name.clone(),
        )
    }

    async fn followup(&self, ctx: &Context, command: &CommandInteraction, content: &str) {
        let builder = CreateInteractionResponseFollowup::new()
            .content(content)
            .ephemeral(true);
        if let Err(e) = command.create_followup(&ctx.http, builder).await {
            warn!(error = %e, "failed to send followup");
        }
    }
}

#[async_trait]
impl EventHandler for MimicHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            "discord bot ready"
        );

        let command = CreateCommand::new("sync")
            .description("Relay new messages from source channels to their targets");
        if let Err(e) = Command::create_global_command(&ctx.http, command).await {
            warn!(error = %e, "failed to register /sync command");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        if command.data.name != "sync" {
            return;
        }
        self.handle_sync(&ctx, &command).await;
    }
}
