//! Selfie Sync Adapters - External adapters for selfie-sync.
//!
//! This crate provides:
//! - Opensheet roster source and Google Drive client (blocking HTTP)
//! - JSON flat-file state store
//! - SeetaFace frontal-face detector and its model download/cache

pub mod detector;
pub mod drive;
pub mod models;
pub mod sheet;
pub mod store;

pub use detector::{DetectorParams, SeetaDetector};
pub use drive::HttpDriveClient;
pub use sheet::OpensheetSource;
pub use store::JsonStateStore;
