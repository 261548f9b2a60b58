/// Identifies one scheduled frame callback.
///
/// The controller hands a fresh token to every `schedule` call and only acts
/// on a callback carrying the token it is waiting for, so a callback that
/// slips through after cancellation is recognized and dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

impl FrameToken {
    pub fn id(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub(crate) fn first() -> Self {
        Self(1)
    }
}

/// Display-frame primitive (requestAnimationFrame in the browser).
pub trait FrameScheduler {
    type Handle;

    /// Arrange for the controller's `on_frame(token)` to run on the next
    /// display frame. `None` when the platform refused.
    fn schedule(&mut self, token: FrameToken) -> Option<Self::Handle>;

    fn cancel(&mut self, handle: Self::Handle);

    /// Host page is hidden/backgrounded.
    fn host_hidden(&self) -> bool {
        false
    }
}
