/// How many body bytes the decoder should frame after a request header.
///
/// The size is always already clamped to the request budget, see
/// [`PayloadSize::clamp`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PayloadSize {
    /// Wait for exactly this many bytes (from `Content-Length`)
    Length(usize),
    /// No length declared: take whatever arrived with the header, up to this many bytes
    Buffered(usize),
    /// No body at all
    Empty,
}

impl PayloadSize {
    /// Picks the payload size for a declared `Content-Length` and the bytes left in
    /// the request budget.
    ///
    /// Returns the size and whether the declared length had to be truncated.
    pub fn clamp(content_length: Option<usize>, budget: usize) -> (Self, bool) {
        match content_length {
            Some(0) => (PayloadSize::Empty, false),
            Some(length) if length > budget => (PayloadSize::Length(budget), true),
            Some(length) => (PayloadSize::Length(length), false),
            None if budget == 0 => (PayloadSize::Empty, false),
            None => (PayloadSize::Buffered(budget), false),
        }
    }

    /// Returns true if the payload is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, PayloadSize::Empty | PayloadSize::Length(0) | PayloadSize::Buffered(0))
    }
}
