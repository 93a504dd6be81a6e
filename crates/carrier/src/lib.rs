//! HTTP SMS carrier transport for the Courier gateway.
//!
//! This crate implements the [`Transport`](courier_transport::Transport)
//! trait against a Twilio-compatible REST messaging API, letting Courier
//! place real SMS messages through a carrier account.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use courier_carrier::{CarrierConfig, HttpCarrierTransport};
//!
//! let config = CarrierConfig::new("ACXXXXXXXX", "auth_token");
//! let transport = HttpCarrierTransport::new(config);
//! ```

pub mod config;
pub mod error;
pub mod transport;
pub mod types;

pub use config::CarrierConfig;
pub use error::CarrierError;
pub use transport::HttpCarrierTransport;
pub use types::{CarrierApiResponse, CarrierSendForm};
