//! System control trait

/// Whole-process control operations
pub trait SystemControl {
    /// Request a full restart of the node
    ///
    /// On embedded targets this does not return. The trait method still
    /// returns `()` so hosts and mocks can observe the request.
    fn restart(&mut self);
}
