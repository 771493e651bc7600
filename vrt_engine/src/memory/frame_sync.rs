//! Frame fence tracking and the proof-of-completion token.
//!
//! Destroying a resource frees GPU objects that the previous frame's command
//! buffer may still reference. Managers therefore only flush when handed a
//! `FrameComplete`, and the only way to get one is to wait on the frame
//! fence (or on device idle) through `FrameSync`.
//!
//! The token mutably borrows its `FrameSync`, so a new frame cannot begin
//! while a token is alive:
//!
//! ```compile_fail
//! # use vrt_engine::vrt::memory::{FrameFence, FrameSync};
//! # use vrt_engine::vrt::Result;
//! # struct Fence;
//! # impl FrameFence for Fence {
//! #     fn wait(&mut self, _: u64) -> Result<()> { Ok(()) }
//! #     fn reset(&mut self) -> Result<()> { Ok(()) }
//! # }
//! let mut sync = FrameSync::new(Fence);
//! let token = sync.wait_for_frame().unwrap();
//! sync.begin_frame();
//! drop(token);
//! ```

use std::marker::PhantomData;
use crate::config::FrameConfig;
use crate::engine::Engine;
use crate::error::Result;
use crate::graphics_device::GraphicsDevice;

/// Fence signaled by the GPU when a submitted frame has finished executing
pub trait FrameFence {
    /// Block until the fence is signaled or `timeout_ns` elapses
    ///
    /// # Errors
    ///
    /// `Error::FenceWaitFailed` on timeout or device loss.
    fn wait(&mut self, timeout_ns: u64) -> Result<()>;

    /// Return the fence to the unsignaled state for the next submission
    fn reset(&mut self) -> Result<()>;
}

/// Proof that no in-flight GPU work can observe resources released so far.
///
/// Cannot be built outside this module.
#[derive(Debug)]
pub struct FrameComplete<'a> {
    frame_index: u64,
    _sync: PhantomData<&'a mut ()>,
}

impl FrameComplete<'_> {
    /// Index of the frame whose completion this token proves
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> FrameComplete<'static> {
        FrameComplete { frame_index: 0, _sync: PhantomData }
    }
}

/// Owner of the per-frame fence
pub struct FrameSync<F: FrameFence> {
    fence: F,
    timeout_ns: u64,
    /// Frames submitted so far
    frame_index: u64,
    /// Whether a submitted frame has not been waited on yet
    in_flight: bool,
}

impl<F: FrameFence> FrameSync<F> {
    /// Wrap `fence`, taking the timeout from the engine configuration
    pub fn new(fence: F) -> Self {
        Self::with_config(fence, &Engine::config().frame)
    }

    /// Wrap `fence` with an explicit frame configuration
    pub fn with_config(fence: F, config: &FrameConfig) -> Self {
        Self {
            fence,
            timeout_ns: config.fence_timeout_ns,
            frame_index: 0,
            in_flight: false,
        }
    }

    /// Mark the start of a new frame submission. Returns its index.
    pub fn begin_frame(&mut self) -> u64 {
        self.frame_index += 1;
        self.in_flight = true;
        self.frame_index
    }

    /// Wait on the frame fence, reset it, and hand out the completion token
    pub fn wait_for_frame(&mut self) -> Result<FrameComplete<'_>> {
        if self.in_flight {
            if let Err(error) = self.fence.wait(self.timeout_ns) {
                crate::engine_error!("vrt::FrameSync",
                    "Waiting on frame {} failed: {}", self.frame_index, error);
                return Err(error);
            }
            self.fence.reset()?;
            self.in_flight = false;
        }

        crate::engine_trace!("vrt::FrameSync", "Frame {} complete", self.frame_index);
        Ok(FrameComplete {
            frame_index: self.frame_index,
            _sync: PhantomData,
        })
    }

    /// Wait until the whole device is idle
    ///
    /// The fence of an in-flight frame is reset, so the next submission
    /// starts from an unsignaled fence.
    pub fn wait_idle(&mut self, device: &mut dyn GraphicsDevice) -> Result<FrameComplete<'_>> {
        device.wait_idle()?;
        if self.in_flight {
            self.fence.reset()?;
            self.in_flight = false;
        }

        crate::engine_debug!("vrt::FrameSync", "Device idle after frame {}", self.frame_index);
        Ok(FrameComplete {
            frame_index: self.frame_index,
            _sync: PhantomData,
        })
    }

    /// Number of frames begun so far
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Whether the last begun frame has not been waited on
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Wrapped fence
    pub fn fence(&self) -> &F {
        &self.fence
    }

    /// Wrapped fence, mutably
    pub fn fence_mut(&mut self) -> &mut F {
        &mut self.fence
    }
}

#[cfg(test)]
#[path = "frame_sync_tests.rs"]
mod tests;
