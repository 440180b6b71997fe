// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixture construction for workflow tests across this crate.

#![cfg(test)]

use crate::context::LcmContext;
use chrono::Utc;
use lcm_adapters::{FakeDb, FakeFs, FakeMsg, FakeRo, FakeVca};
use lcm_core::FakeClock;
use std::sync::Arc;

pub struct Fixture {
    pub ctx: LcmContext,
    pub db: Arc<FakeDb>,
    pub fs: Arc<FakeFs>,
    pub ro: Arc<FakeRo>,
    pub vca: Arc<FakeVca>,
    pub clock: Arc<FakeClock>,
}

pub fn fixture() -> Fixture {
    let db = Arc::new(FakeDb::new());
    let fs = Arc::new(FakeFs::new("/var/osm"));
    let msg = Arc::new(FakeMsg::new());
    let ro = Arc::new(FakeRo::new());
    let vca = Arc::new(FakeVca::default());
    let clock = Arc::new(FakeClock::new(Utc::now()));
    let ctx = LcmContext::new(
        db.clone(),
        fs.clone(),
        msg,
        ro.clone(),
        vca.clone(),
        clock.clone(),
    );
    Fixture { ctx, db, fs, ro, vca, clock }
}
