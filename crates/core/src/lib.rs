//! Core types for the Courier outbound notification dispatcher.
//!
//! This crate defines the data model shared by every other Courier crate:
//! the [`OutboundMessage`] submitted by callers, the [`DispatchOutcome`]
//! produced per dispatch, and the [`DeliveryRecord`] tracked asynchronously
//! from carrier webhook callbacks.

pub mod delivery;
pub mod message;
pub mod outcome;

pub use delivery::{DeliveryRecord, DeliveryStatus, DeliveryUpdate};
pub use message::{OutboundMessage, Urgency};
pub use outcome::{BatchReport, BatchSummary, DispatchOutcome};
