use std::{cell::RefCell, rc::Rc};

use crate::components::{DType, DataType};

/// Handle through which every view of a [Buffer] reaches it.
pub type SharedBuffer<T> = Rc<RefCell<Buffer<T>>>;

/// Flat storage behind one or more arrays.
///
/// Positions are not bounds checked here beyond what slice indexing does,
/// arrays resolve and validate them before reading or writing.
#[derive(Debug)]
pub struct Buffer<T> {
    data: Box<[T]>,
}

impl<T: DataType> Buffer<T> {
    pub fn new_zeroed(len: usize) -> Self {
        Self {
            data: vec![T::zero(); len].into_boxed_slice(),
        }
    }

    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    pub fn into_shared(self) -> SharedBuffer<T> {
        Rc::new(RefCell::new(self))
    }
}

impl<T> From<Vec<T>> for Buffer<T> {
    fn from(value: Vec<T>) -> Self {
        Self {
            data: value.into_boxed_slice(),
        }
    }
}

impl<T: Copy> Buffer<T> {
    pub(crate) fn read(&self, position: usize) -> T {
        self.data[position]
    }

    pub(crate) fn write(&mut self, position: usize, value: T) {
        self.data[position] = value
    }
}

impl<T> Buffer<T> {
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_buffer_has_requested_length() {
        let buffer = Buffer::<f64>::new_zeroed(12);
        assert_eq!(buffer.len(), 12);
        assert!(buffer.as_slice().iter().all(|value| *value == 0.));
        assert_eq!(buffer.dtype(), DType::Float64);
    }

    #[test]
    fn writes_are_seen_through_every_handle() {
        let shared = Buffer::from(vec![1u32, 2, 3]).into_shared();
        let alias = Rc::clone(&shared);
        alias.borrow_mut().write(1, 7);
        assert_eq!(shared.borrow().read(1), 7);
        assert_eq!(Rc::strong_count(&shared), 2);
    }
}
