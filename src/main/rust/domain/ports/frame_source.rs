use crate::domain::errors::Result;
use crate::domain::value_objects::{Frame, SourceConfig};

/// Port for camera transport implementations.
///
/// Implementations capture every underlying transport error and report it
/// through the `Result`; nothing panics across this boundary. `connect` and
/// `read_frame` may block on network I/O and are only ever called from the
/// ingestion loop's own task.
pub trait FrameSource: Send {
    /// Establish the transport to the remote source
    fn connect(&mut self) -> Result<()>;

    /// Pull and decode the next frame from an established transport
    fn read_frame(&mut self) -> Result<Frame>;

    /// Release all transport resources. Idempotent: safe to call multiple
    /// times or on a connector that was never opened.
    fn close(&mut self);

    /// Get the source configuration
    fn config(&self) -> &SourceConfig;
}
