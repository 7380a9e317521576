//! # Worker Loop
//!
//! Everything a worker owns lives here, on the worker thread:
//!
//! ```text
//! ┌──────────────── loop ────────────────┐
//! │ stop?          ──> exit              │
//! │ drain inbox    ──> visuals / cameras │
//! │ no cameras?    ──> jittered idle     │
//! │ refresh poses  (posed visuals only)  │
//! │ per camera     stop? off? render sink│
//! │ pass pause                           │
//! └──────────────────────────────────────┘
//! ```
//!
//! Any error returned from here ends the loop; the caller turns it into a
//! worker fault.

use std::collections::HashMap;
use std::sync::Arc;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use prism_core::{Camera, RenderContext, RenderResult, Token, Visual};

use super::command::Command;
use super::pacing::Pacing;
use super::shared::WorkerShared;

/// Outcome of one photography pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Pass {
    /// Every attached camera was visited.
    Complete,
    /// The stop signal was seen before a camera.
    Interrupted,
}

struct LocalVisual<R: RenderContext> {
    visual: Visual<R::Content>,
    handle: R::Handle,
}

pub(crate) struct WorkerState<R: RenderContext> {
    context: R,
    visuals: HashMap<Token, LocalVisual<R>>,
    cameras: Vec<Arc<Camera<R::Image>>>,
    shared: Arc<WorkerShared>,
}

impl<R: RenderContext> WorkerState<R> {
    pub(crate) fn new(context: R, shared: Arc<WorkerShared>) -> Self {
        Self {
            context,
            visuals: HashMap::new(),
            cameras: Vec::new(),
            shared,
        }
    }

    /// Runs until stopped or until the inbox disconnects.
    pub(crate) fn run(&mut self, inbox: &Receiver<Command<R>>, pacing: &mut Pacing) -> RenderResult<()> {
        loop {
            if self.shared.stop_requested() {
                return Ok(());
            }

            self.drain(inbox)?;

            if self.cameras.is_empty() {
                // Idle: sleep, but let the next command cut the sleep short.
                match inbox.recv_timeout(pacing.idle_backoff()) {
                    Ok(command) => self.apply_batch(std::iter::once(command))?,
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => return Ok(()),
                }
                continue;
            }

            if self.photograph()? == Pass::Interrupted {
                return Ok(());
            }
            pacing.pass_pause();
        }
    }

    /// Applies the commands queued when the drain starts. Anything enqueued
    /// meanwhile waits for the next pass, so a busy producer cannot starve
    /// photography.
    pub(crate) fn drain(&mut self, inbox: &Receiver<Command<R>>) -> RenderResult<()> {
        let queued = inbox.len();
        self.apply_batch(inbox.try_iter().take(queued))
    }

    /// Applies commands in order. Recounts cameras once if any camera command
    /// was among them.
    pub(crate) fn apply_batch<I>(&mut self, commands: I) -> RenderResult<()>
    where
        I: IntoIterator<Item = Command<R>>,
    {
        let mut cameras_changed = false;
        for command in commands {
            cameras_changed |= command.touches_cameras();
            self.apply(command)?;
        }
        let cameras = cameras_changed.then_some(self.cameras.len());
        self.shared.publish_counts(cameras, self.visuals.len());
        Ok(())
    }

    fn apply(&mut self, command: Command<R>) -> RenderResult<()> {
        tracing::trace!(command = ?command, "applying");
        match command {
            Command::AddVisual(visual) => {
                let token = visual.token();
                let handle = self.context.instantiate(token, visual.content())?;
                if let Some(previous) = self.visuals.insert(token, LocalVisual { visual, handle }) {
                    self.context.release(previous.handle);
                }
            }
            Command::RemoveVisual(token) => {
                if let Some(local) = self.visuals.remove(&token) {
                    self.context.release(local.handle);
                }
            }
            Command::AddCamera(camera) => self.cameras.push(camera),
            Command::RemoveCamera(camera) => {
                if let Some(index) = self.cameras.iter().position(|c| Arc::ptr_eq(c, &camera)) {
                    self.cameras.remove(index);
                }
            }
        }
        Ok(())
    }

    /// Refreshes posed visuals, then photographs every camera that is on, in
    /// attachment order.
    pub(crate) fn photograph(&mut self) -> RenderResult<Pass> {
        for local in self.visuals.values() {
            if let Some(source) = local.visual.pose_source() {
                self.context.apply_pose(&local.handle, source.pose())?;
            }
        }

        let mut snapshots = 0;
        let mut skipped = 0;
        for camera in &self.cameras {
            if self.shared.stop_requested() {
                return Ok(Pass::Interrupted);
            }
            if !camera.is_on() {
                skipped += 1;
                continue;
            }
            let view = camera.pose();
            let image = self.context.render(&view, camera.pixel_size())?;
            camera.deliver(image);
            snapshots += 1;
        }

        self.shared.record_pass(snapshots, skipped);
        Ok(Pass::Complete)
    }

    #[cfg(test)]
    fn camera_tokens(&self) -> Vec<Token> {
        self.cameras.iter().map(|c| c.token()).collect()
    }

    #[cfg(test)]
    fn context(&self) -> &R {
        &self.context
    }
}
