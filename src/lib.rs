//! Waypoint Core Library
//!
//! Orchestration core for Waypoint - private circle location sharing.
//! This crate turns the multi-step protocol flows of the external group
//! engine and relay transport into all-or-nothing user-visible operations:
//! circle creation, invitation polling, and the location sharing pipeline.
//!
//! The cryptographic group engine, the relay wire protocol, and the local
//! contact directory are consumed through the narrow contracts in
//! [`engine`], [`relay`], and [`directory`]. This crate never touches wire
//! bytes or key material itself.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

pub mod circle;
pub mod directory;
pub mod engine;
pub mod error;
pub mod location;
pub mod notify;
pub mod relay;

pub use circle::{CircleCreationOrchestrator, InvitationPoller, MemberValidator};
pub use error::{CoreError, Result};
pub use location::LocationPipeline;
pub use notify::{CacheInvalidation, ChangeNotifier};
