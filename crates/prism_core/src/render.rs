//! # Render Context Contract
//!
//! The renderer is an external collaborator. PRISM only needs four things from
//! it, all called from a single worker thread:
//!
//! ```text
//! instantiate(content) ──> handle      (add Visual)
//! apply_pose(handle, pose)             (pose refresh, posed Visuals only)
//! render(camera pose, pixel size) ──> image
//! release(handle)                      (remove Visual)
//! ```
//!
//! A [`RenderContext`] is thread-affine: it is created on its worker thread by
//! a [`RenderBackend`] and never leaves that thread, so it has no `Send` bound.

use std::num::NonZeroU32;

use crate::error::RenderResult;
use crate::math::{CameraPose, Pose};
use crate::token::Token;

/// Per-worker render state.
///
/// Every method runs on the owning worker's thread. Returning an error from any
/// of them is a worker fault: the worker stops and its Cameras go dark.
pub trait RenderContext {
    /// Opaque scene payload carried by a Visual.
    type Content: Send + Sync + 'static;
    /// Context-local handle to an instantiated Visual.
    type Handle;
    /// Rendered snapshot delivered to Camera sinks.
    type Image: Send + 'static;

    /// Builds `content` into this context's scene.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be instantiated.
    fn instantiate(&mut self, token: Token, content: &Self::Content) -> RenderResult<Self::Handle>;

    /// Removes a previously instantiated Visual from the scene.
    fn release(&mut self, handle: Self::Handle);

    /// Moves a posed Visual.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is not valid for this context.
    fn apply_pose(&mut self, handle: &Self::Handle, pose: Pose) -> RenderResult<()>;

    /// Renders a square `pixel_size` x `pixel_size` image from `view`.
    ///
    /// # Errors
    ///
    /// Returns an error if the renderer fails.
    fn render(&mut self, view: &CameraPose, pixel_size: NonZeroU32) -> RenderResult<Self::Image>;
}

/// Shared configuration that seeds one [`RenderContext`] per worker.
///
/// The backend is shared by all worker threads; each thread calls
/// [`RenderBackend::create_context`] once, on itself, during pool startup.
pub trait RenderBackend: Send + Sync + 'static {
    /// The context type built for each worker.
    type Context: RenderContext + 'static;

    /// Creates the render context for worker `worker_index`.
    ///
    /// # Errors
    ///
    /// Any error here aborts pool construction.
    fn create_context(&self, worker_index: usize) -> RenderResult<Self::Context>;
}

impl<C, F> RenderBackend for F
where
    C: RenderContext + 'static,
    F: Fn(usize) -> RenderResult<C> + Send + Sync + 'static,
{
    type Context = C;

    fn create_context(&self, worker_index: usize) -> RenderResult<C> {
        self(worker_index)
    }
}
