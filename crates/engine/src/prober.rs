// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The liveness prober: publishes a self-`ping` on every iteration and escalates if its own
//! pings stop round-tripping back through the dispatch loop, which signals a broken bus.

use crate::context::LcmContext;
use crate::error::LcmError;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const WARMUP_SLEEP: Duration = Duration::from_secs(5);
const STEADY_STATE_SLEEP: Duration = Duration::from_secs(120);
const STARTUP_BACKOFF: Duration = Duration::from_secs(5);
const STEADY_STATE_BACKOFF: Duration = Duration::from_secs(2);
const STARTUP_ERROR_THRESHOLD: u32 = 30;
const STEADY_STATE_ERROR_THRESHOLD: u32 = 8;

/// Raised when `pings_not_received` exceeds the tolerance — the caller should terminate the
/// process, since it signals the bus is no longer round-tripping messages at all.
const DEAD_BUS_THRESHOLD: u32 = 10;

/// Runs forever, publishing self-pings, until the bus looks dead (returns `Err`) or the
/// consecutive-write-error budget is exhausted (also `Err`).
pub async fn run(ctx: Arc<LcmContext>) -> Result<(), LcmError> {
    let mut consecutive_errors: u32 = 0;
    let mut seen_a_write = false;

    loop {
        // Read before this round's own ping is counted as outstanding: reflects whether the
        // *previous* round trip landed, which is what decides how long we can safely sleep.
        let missed_before_this_round = ctx.pings_not_received();

        match ctx.msg.write("admin", "ping", json!({"from": "lcm", "to": "lcm"})).await {
            Ok(()) => {
                consecutive_errors = 0;
                seen_a_write = true;
            }
            Err(e) => {
                consecutive_errors += 1;
                let threshold = if seen_a_write {
                    STEADY_STATE_ERROR_THRESHOLD
                } else {
                    STARTUP_ERROR_THRESHOLD
                };
                tracing::warn!(error = %e, consecutive_errors, threshold, "self-ping publish failed");
                if consecutive_errors >= threshold {
                    return Err(LcmError::Validation(format!(
                        "bus unusable after {consecutive_errors} consecutive self-ping failures: {e}"
                    )));
                }
                let backoff = if seen_a_write { STEADY_STATE_BACKOFF } else { STARTUP_BACKOFF };
                tokio::time::sleep(backoff).await;
                continue;
            }
        }

        ctx.note_ping_sent();
        if ctx.pings_not_received() > DEAD_BUS_THRESHOLD {
            return Err(LcmError::Validation(format!(
                "{} consecutive self-pings were never observed coming back: bus appears dead",
                ctx.pings_not_received()
            )));
        }

        let sleep_for = if missed_before_this_round > 0 { WARMUP_SLEEP } else { STEADY_STATE_SLEEP };
        tokio::time::sleep(sleep_for).await;
    }
}

#[cfg(test)]
#[path = "prober_tests.rs"]
mod tests;
