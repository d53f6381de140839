//! Core session functionality
//!
//! This module contains the network registry, the bounded activity log,
//! contract call encoding and the wallet session that ties them together.

pub mod activity;
pub mod registry;
pub mod transactions;
pub mod wallet;

pub use activity::BoundedLog;
pub use registry::{NetworkRegistry, BUILTIN_NETWORKS};
pub use transactions::ContractCalls;
pub use wallet::{apply_event, event_channel, SwitchOutcome, Transition, WalletEvent, WalletSession};
