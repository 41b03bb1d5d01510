//! The sync orchestrator: replays source history into target channels.

use std::{sync::Arc, time::Duration};

use tracing::{debug, info, warn};

use mimic_store::{CrashLog, MapStore};

use crate::{
    endpoints::EndpointManager,
    error::{Error, Result},
    ledger::SyncLedger,
    platform::{ChannelId, ChatGateway},
    transcode,
};

/// One configured source → target relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelPair {
    pub source: ChannelId,
    pub target: ChannelId,
}

/// Outcome counts for one sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub pairs_synced: usize,
    pub pairs_skipped: usize,
    pub pairs_errored: usize,
    pub messages_delivered: usize,
    pub messages_skipped: usize,
}

enum PairOutcome {
    Synced,
    Skipped,
}

/// Drives one synchronization pass. Everything a run needs is injected up
/// front; no ambient process-wide state is consulted.
pub struct SyncEngine {
    gateway: Arc<dyn ChatGateway>,
    pairs: Vec<ChannelPair>,
    webhook_store: MapStore,
    ledger_store: MapStore,
    crash_log: CrashLog,
    pace: Duration,
    endpoint_name: String,
}

impl SyncEngine {
    pub fn new(
        gateway: Arc<dyn ChatGateway>,
        pairs: Vec<ChannelPair>,
        webhook_store: MapStore,
        ledger_store: MapStore,
        crash_log: CrashLog,
        pace: Duration,
        endpoint_name: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            pairs,
            webhook_store,
            ledger_store,
            crash_log,
            pace,
            endpoint_name: endpoint_name.into(),
        }
    }

    /// Run one synchronization pass over every configured pair.
    ///
    /// Pairs are processed strictly sequentially, and messages within a
    /// pair strictly in source chronological order. A fault inside one pair
    /// is recorded to the crash log and the run moves on to the next pair;
    /// a persistence fault aborts the run, since the in-memory ledger can
    /// no longer be trusted to be durable.
    pub async fn run(&self) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        let mut endpoints = EndpointManager::load(
            self.gateway.as_ref(),
            &self.webhook_store,
            &self.endpoint_name,
        )
        .await?;
        let mut ledger = SyncLedger::load(&self.ledger_store).await?;

        for pair in &self.pairs {
            info!(source = pair.source, target = pair.target, "syncing channel pair");
            match self
                .sync_pair(*pair, &mut endpoints, &mut ledger, &mut report)
                .await
            {
                Ok(PairOutcome::Synced) => report.pairs_synced += 1,
                Ok(PairOutcome::Skipped) => report.pairs_skipped += 1,
                Err(e @ Error::Store(_)) => return Err(e),
                Err(e) => {
                    report.pairs_errored += 1;
                    warn!(
                        source = pair.source,
                        target = pair.target,
                        error = %e,
                        "channel pair failed, continuing with next pair"
                    );
                    let context = format!("sync {} -> {}", pair.source, pair.target);
                    self.crash_log.record(&context, &error_chain(&e)).await;
                },
            }
        }

        info!(
            pairs_synced = report.pairs_synced,
            pairs_skipped = report.pairs_skipped,
            pairs_errored = report.pairs_errored,
            messages_delivered = report.messages_delivered,
            messages_skipped = report.messages_skipped,
            "sync run complete"
        );
        Ok(report)
    }

    async fn sync_pair(
        &self,
        pair: ChannelPair,
        endpoints: &mut EndpointManager<'_>,
        ledger: &mut SyncLedger<'_>,
        report: &mut SyncReport,
    ) -> Result<PairOutcome> {
        let Some(source) = self
            .gateway
            .channel(pair.source)
            .await
            .map_err(|e| Error::resolve(pair.source, e))?
        else {
            warn!(channel = pair.source, "source channel not found, skipping pair");
            return Ok(PairOutcome::Skipped);
        };
        if self
            .gateway
            .channel(pair.target)
            .await
            .map_err(|e| Error::resolve(pair.target, e))?
            .is_none()
        {
            warn!(channel = pair.target, "target channel not found, skipping pair");
            return Ok(PairOutcome::Skipped);
        }

        let endpoint = endpoints.get_or_create(pair.target).await?;

        let history = source
            .fetch_history()
            .await
            .map_err(|e| Error::history(pair.source, e))?;
        info!(
            source = pair.source,
            messages = history.len(),
            "fetched source history"
        );

        for message in &history {
            if ledger.contains(pair.source, message.id) || message.self_originated {
                report.messages_skipped += 1;
                continue;
            }

            let payload = transcode::to_payload(message).await?;
            endpoint
                .send(payload)
                .await
                .map_err(|e| Error::deliver(message.id, e))?;

            // Only a confirmed send reaches the ledger; the full document is
            // persisted before moving on so a crash resumes mid-pair.
            ledger.append(pair.source, message.id).await?;
            report.messages_delivered += 1;
            debug!(source = pair.source, message = message.id, "message relayed");

            // Fixed pacing is the whole rate-limit policy.
            tokio::time::sleep(self.pace).await;
        }

        Ok(PairOutcome::Synced)
    }
}

/// Flatten an error and its causes into the crash-report body.
fn error_chain(error: &Error) -> String {
    use std::error::Error as _;

    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        out.push_str("\ncaused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
