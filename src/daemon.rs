use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::page::Page;
use crate::session::{Session, Trigger};
use crate::settings::{ChannelMessage, Settings};
use crate::store::SettingsStore;

/// Watch loop intervals.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Periodic re-evaluation tick; restriction window boundaries are only
    /// honored to this granularity.
    pub tick_interval: Duration,

    /// How often the settings store is polled for external edits.
    pub poll_interval: Duration,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(60),
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// Run the restriction loop in the foreground.
///
/// Three trigger sources drive re-application: the evaluation tick, settings
/// changes detected by polling the store, and externally injected triggers
/// standing in for cross-tab messages and page-mutation observations. The
/// loop runs until the trigger channel closes; a failing application is
/// logged and the loop keeps going.
pub async fn run_watch_loop<P: Page>(
    session: &mut Session<P>,
    store: &dyn SettingsStore,
    config: WatchConfig,
    mut external: mpsc::Receiver<Trigger>,
) -> Result<()> {
    session.load_from(store)?;
    let mut last_hash = stored_hash(store);
    info!(
        "restriction loop started (tick every {}s)",
        config.tick_interval.as_secs()
    );

    let mut tick = tokio::time::interval(config.tick_interval);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut poll = tokio::time::interval(config.poll_interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                dispatch(session, Trigger::Tick);
            }
            _ = poll.tick() => {
                match store.load() {
                    Ok(Some(settings)) => match settings_hash(&settings) {
                        Ok(hash) => {
                            if last_hash.as_deref() != Some(hash.as_str()) {
                                info!("settings change detected (hash: {})", &hash[..16]);
                                last_hash = Some(hash);
                                dispatch(session, Trigger::SettingsUpdated(settings));
                            }
                        }
                        Err(e) => error!("failed to hash settings: {:#}", e),
                    },
                    Ok(None) => {
                        // Store emptied out from under us; keep the current settings
                    }
                    Err(e) => {
                        debug!("settings store unreadable, keeping current settings: {:#}", e);
                    }
                }
            }
            trigger = external.recv() => {
                match trigger {
                    Some(trigger) => dispatch(session, trigger),
                    None => {
                        info!("trigger channel closed, stopping restriction loop");
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Feed update envelopes from stdin into a trigger channel.
///
/// Each line is one JSON envelope of the shape the settings editor
/// broadcasts to open tabs. Malformed lines are logged and skipped; the
/// reader stops at end of input.
pub fn spawn_envelope_reader(tx: mpsc::Sender<Trigger>) {
    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<ChannelMessage>(line) {
                        Ok(ChannelMessage::UpdateSettings { settings }) => {
                            if tx.send(Trigger::SettingsUpdated(settings)).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("ignoring malformed update envelope: {:#}", e),
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("failed to read update envelopes: {:#}", e);
                    break;
                }
            }
        }
    });
}

fn dispatch<P: Page>(session: &mut Session<P>, trigger: Trigger) {
    // Malformed schedules fail loudly here but never tear the loop down
    if let Err(e) = session.handle(trigger) {
        error!("failed to apply restrictions: {:#}", e);
    }
}

fn stored_hash(store: &dyn SettingsStore) -> Option<String> {
    match store.load() {
        Ok(Some(settings)) => settings_hash(&settings).ok(),
        _ => None,
    }
}

/// Compute a content hash of a settings object for change detection.
fn settings_hash(settings: &Settings) -> Result<String> {
    let json =
        serde_json::to_string(settings).context("Failed to serialize settings for hashing")?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    let result = hasher.finalize();

    Ok(format!("sha256:{}", hex::encode(&result)))
}

// Helper module for hex encoding
mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
