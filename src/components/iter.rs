use std::iter::FusedIterator;

use crate::{
    buffer::SharedBuffer,
    components::{
        array::Array,
        layout::{Layout, Positions},
        DataType,
    },
    errors::Result,
    indexes::AxisIndex,
};

/// Single index along the first axis.
///
/// Rank one arrays yield scalars, higher ranks yield views with one axis
/// less that share the parent's buffer.
pub trait IndexAxis: Sized {
    type Item;

    fn index_axis(&self, index: isize) -> Result<Self::Item>;

    /// Extent of the first axis.
    fn outer_len(&self) -> usize;

    fn outer_iter(&self) -> OuterIter<'_, Self> {
        OuterIter {
            array: self,
            index: 0,
            len: self.outer_len(),
        }
    }
}

impl<T: DataType> IndexAxis for Array<T, 1> {
    type Item = T;

    fn index_axis(&self, index: isize) -> Result<T> {
        self.get([index])
    }

    fn outer_len(&self) -> usize {
        self.shape()[0]
    }
}

macro_rules! impl_index_axis {
    ($($n:literal => $m:literal),*) => {
        $(
            impl<T: DataType> IndexAxis for Array<T, $n> {
                type Item = Array<T, $m>;

                fn index_axis(&self, index: isize) -> Result<Array<T, $m>> {
                    self.slice(&[AxisIndex::Index(index)])
                }

                fn outer_len(&self) -> usize {
                    self.shape()[0]
                }
            }
        )*
    };
}

impl_index_axis!(2 => 1, 3 => 2, 4 => 3, 5 => 4, 6 => 5);

/// Items of an array along its first axis, see [IndexAxis].
#[derive(Debug)]
pub struct OuterIter<'a, A> {
    array: &'a A,
    index: usize,
    len: usize,
}

impl<A: IndexAxis> Iterator for OuterIter<'_, A> {
    type Item = A::Item;

    fn next(&mut self) -> Option<A::Item> {
        if self.index >= self.len {
            return None;
        }
        let item = self.array.index_axis(self.index as isize).ok()?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl<A: IndexAxis> ExactSizeIterator for OuterIter<'_, A> {}

impl<A: IndexAxis> FusedIterator for OuterIter<'_, A> {}

impl<'a, T: DataType, const N: usize> IntoIterator for &'a Array<T, N>
where
    Array<T, N>: IndexAxis,
{
    type Item = <Array<T, N> as IndexAxis>::Item;
    type IntoIter = OuterIter<'a, Array<T, N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.outer_iter()
    }
}

/// Scalars of a view in row-major logical order.
pub struct Elements<'a, T> {
    buffer: &'a SharedBuffer<T>,
    positions: Positions,
}

impl<'a, T: DataType> Elements<'a, T> {
    pub(crate) fn new(buffer: &'a SharedBuffer<T>, layout: Layout) -> Self {
        Self {
            buffer,
            positions: layout.into_positions(),
        }
    }
}

impl<T: DataType> Iterator for Elements<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let position = self.positions.next()?;
        Some(self.buffer.borrow().read(position))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl<T: DataType> ExactSizeIterator for Elements<'_, T> {}
