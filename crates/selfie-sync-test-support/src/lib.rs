//! Test support utilities for selfie-sync.
//!
//! Provides mocks for every core port plus synthetic image builders, so the
//! sync and crop engines can be exercised without network, detector model or
//! real state files.

mod builders;
mod mocks;

pub use builders::SyntheticImageBuilder;
pub use mocks::{
    MemoryStateStore, MockDriveClient, MockFaceDetector, MockProgressSink, MockRosterSource,
};
