//! Client tooling for the Echo marketplace order API.
//!
//! The API is an opaque HTTP JSON service: one POST endpoint returning the details of a single order (no batch
//! endpoint exists), plus a status-aggregation endpoint reporting which orders are still incomplete. Requests carry a
//! fixed set of device/app identity headers and three per-run credential headers; credentials are supplied once per
//! run and reused unchanged.
mod api;
mod config;
mod data_objects;
mod error;
pub mod helpers;

pub use api::EchoApi;
pub use config::{DeviceProfile, EchoApiConfig, RunCredentials};
pub use data_objects::{OrderDetail, ProductLine};
pub use error::EchoApiError;
