//! Hackathon lifecycle and access control.
//!
//! A hackathon's phase is derived from its timestamps and approval flag
//! ([`phase`]); what a caller may do in that phase is decided by the [`gate`];
//! the [`engine`] runs guarded operations against injected collaborators
//! ([`store::EntityStore`], [`notify::Notifier`], [`clock::Clock`]).

pub mod account;
pub mod approval;
pub mod catalogue;
pub mod clock;
pub mod engine;
pub mod error;
pub mod gate;
pub mod model;
pub mod notify;
pub mod phase;
pub mod ranking;
pub mod store;

pub use approval::{ApprovalDecision, ApprovalOutcome};
pub use engine::LifecycleEngine;
pub use error::{LifecycleError, Unavailable};
pub use phase::Phase;
