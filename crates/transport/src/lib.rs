//! Carrier transport abstraction for Courier.
//!
//! The gateway never talks to a carrier API directly; it consumes the
//! [`Transport`] capability, which models the minimum Courier assumes about
//! any carrier: fallible, costs money per call, returns a message identifier.

pub mod error;
pub mod transport;

pub use error::TransportError;
pub use transport::{CarrierReceipt, DynTransport, SendRequest, Transport};
