//! Storage seams consumed by the pin placer.
//!
//! Camera and pin CRUD lives outside this crate; the placer only needs a
//! camera lookup, a per-camera pin listing, and a pin sink.

pub mod memory;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::model::{Camera, CameraId, Pin, PinInput};

pub use memory::InMemoryStore;

#[derive(thiserror::Error, Debug)]
pub enum RepositoryError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("detection {0} is already stored")]
    Conflict(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

pub trait CameraRepository: Send + Sync {
    /// First camera whose stream URL or name matches `identifier`.
    fn find_by_stream_identifier(
        &self,
        identifier: &str,
    ) -> impl Future<Output = RepositoryResult<Option<Camera>>> + Send;
}

pub trait PinRepository: Send + Sync {
    fn list_by_camera(
        &self,
        camera_id: CameraId,
    ) -> impl Future<Output = RepositoryResult<Vec<Pin>>> + Send;

    fn create(&self, pin: PinInput) -> impl Future<Output = RepositoryResult<Pin>> + Send;
}

impl<T: CameraRepository> CameraRepository for Arc<T> {
    fn find_by_stream_identifier(
        &self,
        identifier: &str,
    ) -> impl Future<Output = RepositoryResult<Option<Camera>>> + Send {
        (**self).find_by_stream_identifier(identifier)
    }
}

impl<T: PinRepository> PinRepository for Arc<T> {
    fn list_by_camera(
        &self,
        camera_id: CameraId,
    ) -> impl Future<Output = RepositoryResult<Vec<Pin>>> + Send {
        (**self).list_by_camera(camera_id)
    }

    fn create(&self, pin: PinInput) -> impl Future<Output = RepositoryResult<Pin>> + Send {
        (**self).create(pin)
    }
}
