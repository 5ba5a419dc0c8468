//! Ring buffer for LZ type compression windows
use num_traits::PrimInt;

/// Fixed capacity ring holding the most recently pushed values.
/// Pushing onto a full ring evicts the oldest value and advances the
/// logical origin, so index 0 always addresses the oldest retained value.
pub struct RingBuffer<T: PrimInt> {
    buf: Vec<T>,
    origin: usize,
    len: usize,
    capacity: usize
}

impl <T: PrimInt> RingBuffer<T> {
    /// `capacity` must be positive
    pub fn create(capacity: usize) -> Self {
        Self {
            buf: vec![T::zero();capacity],
            origin: 0,
            len: 0,
            capacity
        }
    }
    /// count of retained values, at most the capacity
    pub fn len(&self) -> usize {
        self.len
    }
    /// push a value, evicting the oldest one if the ring is full
    pub fn push(&mut self,val: T) {
        if self.len == self.capacity {
            self.buf[self.origin] = val;
            self.origin = (self.origin + 1) % self.capacity;
        } else {
            self.buf[(self.origin + self.len) % self.capacity] = val;
            self.len += 1;
        }
    }
    /// get value at logical index, 0 is the oldest retained value,
    /// `idx` must be less than `len()`
    pub fn get(&self,idx: usize) -> T {
        self.buf[(self.origin + idx) % self.capacity]
    }
    /// contiguous snapshot in oldest-to-newest order
    pub fn view(&self) -> Vec<T> {
        (0..self.len).map(|i| self.get(i)).collect()
    }
    /// logical index of the leftmost occurrence of `pattern`, or None.
    /// The leftmost occurrence is the one farthest behind the insertion point.
    pub fn find(&self,pattern: &[T]) -> Option<usize> {
        if pattern.is_empty() || pattern.len() > self.len {
            return None;
        }
        self.view().windows(pattern.len()).position(|run| run == pattern)
    }
}

#[test]
fn eviction() {
    let mut ring: RingBuffer<u8> = RingBuffer::create(4);
    for v in [1,2,3] {
        ring.push(v);
    }
    assert_eq!(ring.len(),3);
    assert_eq!(ring.view(),vec![1,2,3]);
    ring.push(4);
    ring.push(5);
    ring.push(6);
    assert_eq!(ring.len(),4);
    assert_eq!(ring.view(),vec![3,4,5,6]);
    assert_eq!(ring.get(0),3);
    assert_eq!(ring.get(3),6);
}

#[test]
fn leftmost_find() {
    let mut ring: RingBuffer<u8> = RingBuffer::create(6);
    for v in b"BanBan" {
        ring.push(*v);
    }
    assert_eq!(ring.find(b"Ban"),Some(0));
    assert_eq!(ring.find(b"an"),Some(1));
    assert_eq!(ring.find(b"nB"),Some(2));
    assert_eq!(ring.find(b"BanB"),Some(0));
    assert_eq!(ring.find(b"Bana"),None);
    assert_eq!(ring.find(b""),None);
}

#[test]
fn find_across_wrap() {
    let mut ring: RingBuffer<u8> = RingBuffer::create(4);
    for v in b"abcdef" {
        ring.push(*v);
    }
    // physical layout is e f c d, logical view is c d e f
    assert_eq!(ring.view(),b"cdef".to_vec());
    assert_eq!(ring.find(b"def"),Some(1));
    assert_eq!(ring.find(b"fc"),None);
}
