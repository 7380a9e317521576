//! Inbox protocol between the pool and a worker.

use std::fmt;
use std::sync::Arc;

use prism_core::{Camera, RenderContext, Token, Visual};

/// One instruction for a worker. Applied in enqueue order.
pub(crate) enum Command<R: RenderContext> {
    /// Instantiate a Visual into the worker's scene.
    AddVisual(Visual<R::Content>),
    /// Release the Visual with this token, if present.
    RemoveVisual(Token),
    /// Start photographing a Camera.
    AddCamera(Arc<Camera<R::Image>>),
    /// Stop photographing this exact Camera (matched by identity).
    RemoveCamera(Arc<Camera<R::Image>>),
}

impl<R: RenderContext> Command<R> {
    pub(crate) fn touches_cameras(&self) -> bool {
        matches!(self, Self::AddCamera(_) | Self::RemoveCamera(_))
    }
}

impl<R: RenderContext> fmt::Debug for Command<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddVisual(visual) => write!(f, "AddVisual({})", visual.token()),
            Self::RemoveVisual(token) => write!(f, "RemoveVisual({token})"),
            Self::AddCamera(camera) => write!(f, "AddCamera({})", camera.token()),
            Self::RemoveCamera(camera) => write!(f, "RemoveCamera({})", camera.token()),
        }
    }
}
