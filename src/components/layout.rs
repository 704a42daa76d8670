use log::trace;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{ArrayError, Result},
    indexes::{AxisIndex, Resolved},
};

/// Storage order used when allocating a fresh buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Order {
    /// Last axis varies fastest (C order).
    #[default]
    RowMajor,
    /// First axis varies fastest (Fortran order).
    ColumnMajor,
}

impl Order {
    pub fn strides<const N: usize>(&self, shape: &[usize; N]) -> [isize; N] {
        let mut strides = [0isize; N];
        let mut step = 1isize;
        match self {
            Order::RowMajor => {
                for axis in (0..N).rev() {
                    strides[axis] = step;
                    step *= shape[axis] as isize;
                }
            }
            Order::ColumnMajor => {
                for axis in 0..N {
                    strides[axis] = step;
                    step *= shape[axis] as isize;
                }
            }
        }
        strides
    }
}

/// Element count of a shape, `None` on overflow.
pub fn checked_size(shape: &[usize]) -> Option<usize> {
    shape
        .iter()
        .try_fold(1usize, |size, extent| size.checked_mul(*extent))
}

/// Largest stride a fresh layout of `shape` needs, with empty axes counted
/// as one. `None` when it does not fit an `isize`.
pub fn checked_span(shape: &[usize]) -> Option<usize> {
    shape
        .iter()
        .try_fold(1usize, |span, extent| span.checked_mul((*extent).max(1)))
        .filter(|span| *span <= isize::MAX as usize)
}

/// Rank erased view descriptor.
///
/// Slicing can drop an arbitrary number of axes, so the arithmetic is done
/// here and the result is converted back into a fixed rank by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub shape: Vec<usize>,
    pub strides: Vec<isize>,
    pub offset: usize,
}

impl Layout {
    pub fn new(shape: &[usize], strides: &[isize], offset: usize) -> Self {
        Self {
            shape: shape.to_vec(),
            strides: strides.to_vec(),
            offset,
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn size(&self) -> usize {
        self.shape.iter().product()
    }

    /// Applies one subscript per leading axis.
    ///
    /// Missing trailing subscripts select the whole axis.
    pub fn slice(&self, info: &[AxisIndex]) -> Result<Layout> {
        if info.len() > self.ndim() {
            return Err(ArrayError::TooManyIndices {
                given: info.len(),
                ndim: self.ndim(),
            });
        }
        let mut offset = self.offset as isize;
        let mut shape = Vec::with_capacity(self.ndim());
        let mut strides = Vec::with_capacity(self.ndim());
        let full = AxisIndex::all();
        let subscripts = info.iter().chain(std::iter::repeat(&full));
        for (axis, (index, (extent, stride))) in subscripts
            .zip(self.shape.iter().zip(self.strides.iter()))
            .enumerate()
        {
            match index.resolve(axis, *extent)? {
                Resolved::Index(index) => offset += index as isize * stride,
                Resolved::Slice { start, len, step } => {
                    offset += start as isize * stride;
                    shape.push(len);
                    // A step only moves between elements, which needs two of them.
                    strides.push(if len > 1 { stride * step } else { *stride });
                }
            }
        }
        // Empty slices add no offset, so a reversed empty axis can not push
        // it below zero.
        let layout = Layout {
            shape,
            strides,
            offset: offset as usize,
        };
        trace!("sliced {:?} with {:?} into {:?}", self, info, layout);
        Ok(layout)
    }

    /// Whether walking the layout in row-major order visits consecutive
    /// buffer positions.
    pub fn is_standard(&self) -> bool {
        if self.size() <= 1 {
            return true;
        }
        let mut expected = 1isize;
        for (extent, stride) in self.shape.iter().zip(self.strides.iter()).rev() {
            if *extent != 1 && *stride != expected {
                return false;
            }
            expected *= *extent as isize;
        }
        true
    }

    /// Buffer positions in row-major logical order.
    pub fn positions(&self) -> Positions {
        self.clone().into_positions()
    }

    pub fn into_positions(self) -> Positions {
        Positions::new(self)
    }
}

/// Walks the multi-indices of a [Layout] like an odometer, last axis fastest.
#[derive(Debug, Clone)]
pub struct Positions {
    layout: Layout,
    index: Vec<usize>,
    position: isize,
    remaining: usize,
}

impl Positions {
    fn new(layout: Layout) -> Self {
        Self {
            index: vec![0; layout.ndim()],
            position: layout.offset as isize,
            remaining: layout.size(),
            layout,
        }
    }
}

impl Iterator for Positions {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.position as usize;
        self.remaining -= 1;
        if self.remaining > 0 {
            for axis in (0..self.index.len()).rev() {
                let stride = self.layout.strides[axis];
                self.index[axis] += 1;
                self.position += stride;
                if self.index[axis] < self.layout.shape[axis] {
                    break;
                }
                self.position -= stride * self.index[axis] as isize;
                self.index[axis] = 0;
            }
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Positions {}
