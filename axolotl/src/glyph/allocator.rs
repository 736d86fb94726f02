//! Codepoint allocation for font glyphs.

/// First codepoint handed out to glyphs.
pub const MIN_CODEPOINT: u32 = 42000;

/// Hands out unique codepoints for one build.
///
/// Allocation scans upward from the minimum, skipping the surrogate block
/// (which cannot be a `char`). The cursor never moves backwards, so every
/// codepoint below it has been handed out at most once.
#[derive(Debug, Clone)]
pub struct CodepointAllocator {
    next: u32,
    allocated: usize,
}

impl Default for CodepointAllocator {
    fn default() -> Self {
        Self::new(MIN_CODEPOINT)
    }
}

impl CodepointAllocator {
    /// Create an allocator starting at `min`.
    pub fn new(min: u32) -> Self {
        Self {
            next: min,
            allocated: 0,
        }
    }

    /// Number of codepoints handed out.
    pub fn len(&self) -> usize {
        self.allocated
    }

    /// True when nothing has been allocated yet.
    pub fn is_empty(&self) -> bool {
        self.allocated == 0
    }

    /// Allocate the first valid codepoint at or above the cursor.
    ///
    /// Returns `None` once the codepoint space is exhausted.
    pub fn allocate(&mut self) -> Option<char> {
        let mut candidate = self.next;
        loop {
            if candidate > char::MAX as u32 {
                return None;
            }
            if let Some(c) = char::from_u32(candidate) {
                self.next = candidate + 1;
                self.allocated += 1;
                return Some(c);
            }
            candidate += 1;
        }
    }
}
