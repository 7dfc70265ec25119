//! Request tagging so that only the latest response of each kind is applied.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Tag attached to an issued request.
pub struct RequestTag(u64);

#[derive(Debug, Default)]
/// Issues monotonically increasing tags and remembers the latest one.
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    /// Issue a new tag, superseding every tag issued before.
    pub fn issue(&mut self) -> RequestTag {
        self.latest += 1;
        RequestTag(self.latest)
    }

    /// Whether `tag` is the most recently issued one.
    #[must_use]
    pub fn is_current(&self, tag: RequestTag) -> bool {
        tag.0 == self.latest
    }

    /// Invalidate every outstanding tag without issuing a new request.
    pub fn cancel(&mut self) {
        self.latest += 1;
    }
}
