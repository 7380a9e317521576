//! # PRISM Core
//!
//! Contracts shared by the snapshot pool and the renderers plugged into it:
//!
//! - [`Visual`]: a scene object mirrored into every worker
//! - [`Camera`]: a vantage point whose snapshots go to a caller-supplied sink
//! - [`RenderContext`] / [`RenderBackend`]: what a renderer must provide
//!
//! ## Example
//!
//! ```rust,ignore
//! use prism_core::{Camera, CameraPose, Token, Visual};
//!
//! let ship = Visual::new_posed(Token::new(1), mesh, move || ship_pose());
//! let eye = Camera::new(Token::new(100), size, agent_view, move |img| inbox.push(img));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod camera;
pub mod error;
pub mod math;
pub mod render;
pub mod token;
pub mod visual;

pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use math::{CameraPose, Pose, Quaternion, Vec3};
pub use render::{RenderBackend, RenderContext};
pub use token::Token;
pub use visual::{PoseSource, Visual};
