//! # Cameras
//!
//! A Camera is a capability handed to the pool: it knows where it is looking
//! and where its snapshots go. The pool decides which worker photographs it.
//!
//! Cameras are shared as `Arc<Camera<I>>`. The caller keeps a clone to flip
//! [`Camera::set_on`]; the owning worker samples the flag every pass.

use std::fmt;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::math::CameraPose;
use crate::token::Token;

type PoseProvider = Box<dyn Fn() -> CameraPose + Send + Sync>;
type Sink<I> = Box<dyn Fn(I) + Send + Sync>;

/// A registered vantage point that receives rendered snapshots.
pub struct Camera<I> {
    token: Token,
    pixel_size: NonZeroU32,
    on: AtomicBool,
    pose_provider: PoseProvider,
    sink: Sink<I>,
}

impl<I> Camera<I> {
    /// Creates a Camera that starts switched on.
    ///
    /// * `pixel_size` - edge length of the square snapshot
    /// * `pose_provider` - queried once per snapshot, on the worker thread
    /// * `sink` - receives each snapshot, on the worker thread
    #[must_use]
    pub fn new<P, S>(token: Token, pixel_size: NonZeroU32, pose_provider: P, sink: S) -> Self
    where
        P: Fn() -> CameraPose + Send + Sync + 'static,
        S: Fn(I) + Send + Sync + 'static,
    {
        Self {
            token,
            pixel_size,
            on: AtomicBool::new(true),
            pose_provider: Box::new(pose_provider),
            sink: Box::new(sink),
        }
    }

    /// Sets the initial on/off state.
    #[must_use]
    pub fn with_on(self, on: bool) -> Self {
        self.on.store(on, Ordering::Relaxed);
        self
    }

    /// Returns the Camera's token.
    #[inline]
    #[must_use]
    pub fn token(&self) -> Token {
        self.token
    }

    /// Returns the snapshot edge length in pixels.
    #[inline]
    #[must_use]
    pub fn pixel_size(&self) -> NonZeroU32 {
        self.pixel_size
    }

    /// Returns whether the Camera is currently photographed.
    #[inline]
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.on.load(Ordering::Acquire)
    }

    /// Switches the Camera on or off. Takes effect on the owner's next pass.
    #[inline]
    pub fn set_on(&self, on: bool) {
        self.on.store(on, Ordering::Release);
    }

    /// Queries the current vantage point.
    #[must_use]
    pub fn pose(&self) -> CameraPose {
        (self.pose_provider)()
    }

    /// Hands a snapshot to the Camera's sink.
    pub fn deliver(&self, image: I) {
        (self.sink)(image);
    }
}

impl<I> fmt::Debug for Camera<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("token", &self.token)
            .field("pixel_size", &self.pixel_size)
            .field("on", &self.is_on())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use std::sync::atomic::AtomicU32;
    use std::sync::Arc;

    fn size(px: u32) -> NonZeroU32 {
        NonZeroU32::new(px).unwrap()
    }

    #[test]
    fn test_camera_toggle() {
        let camera: Camera<u32> = Camera::new(Token::new(1), size(64), CameraPose::default, |_| {});
        assert!(camera.is_on());
        camera.set_on(false);
        assert!(!camera.is_on());

        let off: Camera<u32> =
            Camera::new(Token::new(2), size(64), CameraPose::default, |_| {}).with_on(false);
        assert!(!off.is_on());
    }

    #[test]
    fn test_camera_pose_and_sink() {
        let received = Arc::new(AtomicU32::new(0));
        let sink_count = Arc::clone(&received);
        let camera = Camera::new(
            Token::new(9),
            size(32),
            || CameraPose::at(Vec3::new(0.0, 10.0, 0.0)),
            move |px: u32| {
                sink_count.fetch_add(px, Ordering::Relaxed);
            },
        );

        assert_eq!(camera.pose().position.y, 10.0);
        camera.deliver(5);
        camera.deliver(6);
        assert_eq!(received.load(Ordering::Relaxed), 11);
        assert_eq!(camera.pixel_size().get(), 32);
    }
}
