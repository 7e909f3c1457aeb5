//! Port traits decoupling the engines from network, filesystem and detector.

mod drive_client;
mod face_detector;
mod progress;
mod roster_source;
mod state_store;

pub use drive_client::{DriveClient, DriveFetch};
pub use face_detector::FaceDetector;
pub use progress::{NoProgress, ProgressEvent, ProgressSink};
pub use roster_source::RosterSource;
pub use state_store::StateStore;
