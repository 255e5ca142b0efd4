//! Clusterforge: cluster configuration engine for a Kubernetes provisioning wizard
//!
//! Derives, validates and assembles a cluster configuration from a cascade of
//! user selections over a static catalog of providers, regions, operating
//! systems, Kubernetes distributions, storage engines and add-ons, and maps the
//! result to and from persisted templates.

pub mod backend;
pub mod catalog;
pub mod cluster;
pub mod error;
pub mod session;
pub mod settings;
pub mod template;
pub mod wizard;

pub use crate::error::{Error, Result};
