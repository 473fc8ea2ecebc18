//! Bounded ordered buffer that counts what it had to drop

/// Keeps the first `capacity` pushed items in order and counts the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CappedBuffer<T> {
    items: Vec<T>,
    capacity: usize,
    overflow: usize,
}

impl<T> CappedBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity.min(64)),
            capacity,
            overflow: 0,
        }
    }

    /// Store `item` if there is room. Returns false when it was only counted.
    pub fn push(&mut self, item: T) -> bool {
        if self.items.len() < self.capacity {
            self.items.push(item);
            true
        } else {
            self.overflow += 1;
            false
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Number of items pushed after the buffer was full
    pub fn overflow(&self) -> usize {
        self.overflow
    }

    /// Everything ever pushed, kept or not
    pub fn total(&self) -> usize {
        self.items.len() + self.overflow
    }
}
