// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The explicit `LcmContext` that replaces the source's global mutable state: every
//! workflow, the dispatch loop, and the liveness prober take a `&LcmContext` instead of
//! reaching for module-level singletons.

use crate::registry::{TaskHandle, TaskRegistry, Topic};
use lcm_adapters::{Db, Fs, Msg, Ro, Vca};
use lcm_core::Clock;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

pub struct LcmContext {
    pub db: Arc<dyn Db>,
    pub fs: Arc<dyn Fs>,
    pub msg: Arc<dyn Msg>,
    pub ro: Arc<dyn Ro>,
    pub vca: Arc<dyn Vca>,
    pub clock: Arc<dyn Clock>,
    pub registry: Arc<TaskRegistry>,
    /// Starts at 1 per the liveness prober's contract; reset to 0 on every received self-ping.
    pings_not_received: AtomicU32,
}

impl LcmContext {
    pub fn new(
        db: Arc<dyn Db>,
        fs: Arc<dyn Fs>,
        msg: Arc<dyn Msg>,
        ro: Arc<dyn Ro>,
        vca: Arc<dyn Vca>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            db,
            fs,
            msg,
            ro,
            vca,
            clock,
            registry: Arc::new(TaskRegistry::new()),
            pings_not_received: AtomicU32::new(1),
        }
    }

    pub fn pings_not_received(&self) -> u32 {
        self.pings_not_received.load(Ordering::SeqCst)
    }

    pub fn note_ping_sent(&self) {
        self.pings_not_received.fetch_add(1, Ordering::SeqCst);
    }

    pub fn note_ping_received(&self) {
        self.pings_not_received.store(0, Ordering::SeqCst);
    }

    /// Registers `fut` as a cancellable task under `(topic, entity_id, order_id, task_name)`
    /// and spawns it. `fut` races the task's own cancellation token, so `cancel_tasks` aborts
    /// it at its next `.await` point without the caller threading the token through itself.
    pub fn spawn_supervised<F>(&self, topic: Topic, entity_id: &str, order_id: u64, task_name: &str, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = TaskHandle::new();
        let token = handle.token.clone();
        self.registry.register(topic, entity_id, order_id, task_name, handle);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = fut => {}
            }
        });
    }
}
