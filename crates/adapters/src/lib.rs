// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pluggable drivers for the LCM's external collaborators: the document database, the
//! object-blob filesystem, the command bus, the Resource Orchestrator, and the VCA engine.
//! The engine crate only ever names the traits here; concrete backends (real or fake) are
//! wired in by the daemon binary.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod db;
pub mod error;
pub mod fs;
pub mod msg;
pub mod ro;
pub mod vca;

pub use db::local::LocalDb;
pub use db::Db;
pub use error::{DbError, FsError, MsgError, RoError, VcaError};
pub use fs::local::LocalFs;
pub use fs::{Fs, FsParams};
pub use msg::local::LocalMsg;
pub use msg::{BusMessage, Msg};
pub use ro::http::RoHttpClient;
pub use ro::{NsRoState, Ro, VduInfo, VnfInfo};
pub use vca::http::VcaHttpClient;
pub use vca::Vca;

#[cfg(feature = "test-support")]
pub use db::fake::FakeDb;
#[cfg(feature = "test-support")]
pub use fs::fake::FakeFs;
#[cfg(feature = "test-support")]
pub use msg::fake::FakeMsg;
#[cfg(feature = "test-support")]
pub use ro::fake::FakeRo;
#[cfg(feature = "test-support")]
pub use vca::fake::{FakeVca, VcaCall};
