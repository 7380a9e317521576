//! # Visuals
//!
//! A Visual is a renderable scene object mirrored into every worker. It is
//! immutable once built; cloning only bumps reference counts, so the pool can
//! hand one copy to each worker's inbox.

use std::fmt;
use std::sync::Arc;

use crate::math::Pose;
use crate::token::Token;

/// Source of a Visual's current world pose.
///
/// Sampled by each worker once per pass, on the worker's own thread.
pub trait PoseSource: Send + Sync {
    /// Returns the current pose.
    fn pose(&self) -> Pose;
}

impl<F> PoseSource for F
where
    F: Fn() -> Pose + Send + Sync,
{
    fn pose(&self) -> Pose {
        self()
    }
}

/// Descriptor of a renderable object.
pub struct Visual<T> {
    token: Token,
    content: Arc<T>,
    pose_source: Option<Arc<dyn PoseSource>>,
}

impl<T> Visual<T> {
    /// Creates a Visual that never moves (lights, terrain, ...).
    #[must_use]
    pub fn new_static(token: Token, content: T) -> Self {
        Self {
            token,
            content: Arc::new(content),
            pose_source: None,
        }
    }

    /// Creates a Visual whose pose is refreshed from `source` every pass.
    #[must_use]
    pub fn new_posed(token: Token, content: T, source: impl PoseSource + 'static) -> Self {
        let source: Arc<dyn PoseSource> = Arc::new(source);
        Self {
            token,
            content: Arc::new(content),
            pose_source: Some(source),
        }
    }

    /// Returns the Visual's token.
    #[inline]
    #[must_use]
    pub fn token(&self) -> Token {
        self.token
    }

    /// Returns the content payload.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &T {
        &self.content
    }

    /// Returns the pose source, if any.
    #[inline]
    #[must_use]
    pub fn pose_source(&self) -> Option<&dyn PoseSource> {
        self.pose_source.as_deref()
    }

    /// Returns true if the Visual has no pose source.
    #[inline]
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.pose_source.is_none()
    }
}

impl<T> Clone for Visual<T> {
    fn clone(&self) -> Self {
        Self {
            token: self.token,
            content: Arc::clone(&self.content),
            pose_source: self.pose_source.clone(),
        }
    }
}

impl<T> fmt::Debug for Visual<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Visual")
            .field("token", &self.token)
            .field("static", &self.is_static())
            .finish_non_exhaustive()
    }
}
