// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entity types, identifiers, and the time source abstraction shared by every other crate.
//!
//! Nothing here knows about RO, VCA, the bus, or the database — those are the adapters'
//! and the engine's concern. This crate only models the documents those collaborators
//! exchange.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod clock;
pub mod id;
pub mod nslcmop;
pub mod nsr;
pub mod sdn;
pub mod vim_account;
pub mod vnfd;
pub mod vnfr;

pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{NslcmOpId, NsrId, RoId, SdnId, VimAccountId, VnfdId};
pub use nslcmop::{LcmOperationType, NsLcmOp, OperationParams, OperationState};
pub use nsr::{
    ConfigStatus, ConstituentVnfd, Deployed, DeployedRo, NsDescriptor, NsState, Nsr, NsrAdmin,
    OperationalStatus, VcaDeployment, VcaOperationalStatus, VduIp, VnfIp,
};
pub use sdn::{Sdn, SdnAdmin};
pub use vim_account::{VimAccount, VimAdmin, VimAdminDeployed, VimConfig};
pub use vim_account::OperationalState as VimOperationalState;
pub use vnfd::{Configuration, JujuCharm, Vdu, Vnfd};
pub use vnfr::{Vdur, VnfRecord};
