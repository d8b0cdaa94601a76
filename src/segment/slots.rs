/// Rotating segment slot counter: 0, 1, .., count - 1, 0, ..
///
/// Bounds the number of segment files on disk. A slot comes around again only after every
/// other slot was built and handed to the player, so the player is never pointed at a file
/// that is being rewritten for the next window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotRing {
    count: usize,
    next: usize,
}

impl SlotRing {
    pub fn new(count: usize) -> Self {
        Self {
            count: count.max(1),
            next: 0,
        }
    }

    /// Slot the next build will use.
    pub fn peek(&self) -> usize {
        self.next
    }

    /// Take the next slot and move the counter on.
    pub fn advance(&mut self) -> usize {
        let slot = self.next;
        self.next = (self.next + 1) % self.count;
        slot
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
#[path = "../../tests/unit/segment/slots.rs"]
mod tests;
