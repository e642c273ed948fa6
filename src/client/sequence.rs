/// Largest sequence number SMPP allows; the counter wraps back to 1 after it.
pub const MAX_SEQUENCE_NUMBER: u32 = 0x7FFF_FFFF;

/// Per-connection sequence number generator.
///
/// Starts at zero and pre-increments, so the first allocated value is 1.
/// Zero is never handed out.
#[derive(Debug, Default)]
pub struct SequenceCounter {
    current: u32,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next sequence number.
    pub fn allocate(&mut self) -> u32 {
        self.current = if self.current >= MAX_SEQUENCE_NUMBER {
            1
        } else {
            self.current + 1
        };
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_one_and_steps_by_one() {
        let mut counter = SequenceCounter::new();
        let values: Vec<u32> = (0..5).map(|_| counter.allocate()).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn wraps_after_max() {
        let mut counter = SequenceCounter {
            current: MAX_SEQUENCE_NUMBER - 1,
        };
        assert_eq!(counter.allocate(), MAX_SEQUENCE_NUMBER);
        assert_eq!(counter.allocate(), 1);
    }
}
