use itertools::Itertools;
use log::debug;
use std::{fmt::Debug, rc::Rc};

use crate::{
    buffer::{Buffer, SharedBuffer},
    components::{
        iter::Elements,
        layout::{checked_size, checked_span, Layout, Order},
        DType, DataType,
    },
    errors::{ArrayError, Result},
    indexes::{AxisIndex, Resolved},
};

/// Rank `N` view over a shared [Buffer].
///
/// Cloning an array clones the view, not the data: both keep pointing at
/// the same buffer and see each other's writes. Use
/// [to_contiguous](Array::to_contiguous) for an independent copy.
pub struct Array<T: DataType, const N: usize> {
    buffer: SharedBuffer<T>,
    shape: [usize; N],
    strides: [isize; N],
    offset: usize,
}

pub type Array1<T> = Array<T, 1>;
pub type Array2<T> = Array<T, 2>;
pub type Array3<T> = Array<T, 3>;

/// Conversion into a rank `N` shape.
pub trait IntoShape<const N: usize> {
    fn into_shape(self) -> Result<[usize; N]>;
}

impl<const N: usize> IntoShape<N> for [usize; N] {
    fn into_shape(self) -> Result<[usize; N]> {
        Ok(self)
    }
}

macro_rules! impl_into_shape_signed {
    ($($t:ty),*) => {
        $(
            impl<const N: usize> IntoShape<N> for [$t; N] {
                fn into_shape(self) -> Result<[usize; N]> {
                    if self.iter().any(|extent| *extent < 0) {
                        return Err(ArrayError::invalid_shape(
                            self.iter().map(|extent| *extent as i64),
                            "extents can not be negative",
                        ));
                    }
                    Ok(self.map(|extent| extent as usize))
                }
            }
        )*
    };
}

impl_into_shape_signed!(isize, i32, i64);

impl<const N: usize> IntoShape<N> for &[usize] {
    fn into_shape(self) -> Result<[usize; N]> {
        self.try_into().map_err(|_| ArrayError::RankMismatch {
            expected: N,
            got: self.len(),
        })
    }
}

impl<const N: usize> IntoShape<N> for Vec<usize> {
    fn into_shape(self) -> Result<[usize; N]> {
        self.as_slice().into_shape()
    }
}

/// Element count of a root array shape.
///
/// Every stride of the shape has to fit an `isize`, including the ones
/// spanning axes next to an empty one.
fn root_size<const N: usize>(shape: &[usize; N]) -> Result<usize> {
    checked_span(shape)
        .map(|_| shape.iter().product())
        .ok_or_else(|| {
            ArrayError::invalid_shape(
                shape.iter().map(|extent| *extent as i64),
                "strides overflow",
            )
        })
}

impl<T: DataType, const N: usize> Array<T, N> {
    /// Zero filled array in row-major order.
    pub fn new(shape: impl IntoShape<N>) -> Result<Self> {
        Self::new_in(shape, Order::RowMajor)
    }

    /// Zero filled array laid out in the given storage order.
    pub fn new_in(shape: impl IntoShape<N>, order: Order) -> Result<Self> {
        if N == 0 {
            return Err(ArrayError::invalid_shape([], "arrays need at least one axis"));
        }
        let shape = shape.into_shape()?;
        let size = root_size(&shape)?;
        debug!(
            "allocating {size} {} elements for shape {shape:?} in {order:?}",
            T::DTYPE
        );
        Ok(Self::root(Buffer::new_zeroed(size), shape, order))
    }

    /// Array over `data`, read in row-major order.
    ///
    /// A rank zero shape holds exactly one element.
    pub fn from_shape_vec(shape: impl IntoShape<N>, data: Vec<T>) -> Result<Self> {
        let shape = shape.into_shape()?;
        let size = root_size(&shape)?;
        if data.len() != size {
            return Err(ArrayError::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
            });
        }
        Ok(Self::root(Buffer::from(data), shape, Order::RowMajor))
    }

    fn root(buffer: Buffer<T>, shape: [usize; N], order: Order) -> Self {
        Self {
            buffer: buffer.into_shared(),
            strides: order.strides(&shape),
            shape,
            offset: 0,
        }
    }

    /// View of the same buffer with a layout of rank `M`.
    fn with_layout<const M: usize>(&self, layout: Layout) -> Result<Array<T, M>> {
        let rank_mismatch = || ArrayError::RankMismatch {
            expected: M,
            got: layout.ndim(),
        };
        let shape: [usize; M] = layout.shape.as_slice().try_into().map_err(|_| rank_mismatch())?;
        let strides: [isize; M] = layout
            .strides
            .as_slice()
            .try_into()
            .map_err(|_| rank_mismatch())?;
        Ok(Array {
            buffer: Rc::clone(&self.buffer),
            shape,
            strides,
            offset: layout.offset,
        })
    }

    pub(crate) fn layout(&self) -> Layout {
        Layout::new(&self.shape, &self.strides, self.offset)
    }

    pub fn ndim(&self) -> usize {
        N
    }

    pub fn shape(&self) -> [usize; N] {
        self.shape
    }

    pub fn strides(&self) -> [isize; N] {
        self.strides
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of elements in the view.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Whether both arrays are views of the same buffer.
    pub fn shares_buffer<const M: usize>(&self, other: &Array<T, M>) -> bool {
        Rc::ptr_eq(&self.buffer, &other.buffer)
    }

    /// Row-major walk over the view visits consecutive buffer positions.
    pub fn is_standard_layout(&self) -> bool {
        self.layout().is_standard()
    }

    /// Row-major walk over the view visits every buffer element once, in order.
    pub fn is_contiguous(&self) -> bool {
        self.is_standard_layout() && self.len() == self.buffer.borrow().len()
    }

    fn position(&self, index: &[isize; N]) -> Result<usize> {
        let mut position = self.offset as isize;
        for (axis, index) in index.iter().enumerate() {
            if let Resolved::Index(index) = AxisIndex::Index(*index).resolve(axis, self.shape[axis])? {
                position += index as isize * self.strides[axis];
            }
        }
        Ok(position as usize)
    }

    /// Element at `index`; negative indices count from the end of their axis.
    pub fn get(&self, index: [isize; N]) -> Result<T> {
        let position = self.position(&index)?;
        Ok(self.buffer.borrow().read(position))
    }

    pub fn set(&self, index: [isize; N], value: T) -> Result<()> {
        let position = self.position(&index)?;
        self.buffer.borrow_mut().write(position, value);
        Ok(())
    }

    /// Sub-view selected by `info`, sharing this array's buffer.
    ///
    /// `M` has to match the number of axes left after single indexes drop
    /// theirs. Subscripts missing for trailing axes select the whole axis.
    pub fn slice<const M: usize>(&self, info: &[AxisIndex]) -> Result<Array<T, M>> {
        self.with_layout(self.layout().slice(info)?)
    }

    /// Writes `values` into the region selected by `info`, in row-major order.
    ///
    /// Nothing is written unless `values` holds exactly one element per
    /// position in the region.
    pub fn assign(&self, info: &[AxisIndex], values: &[T]) -> Result<()> {
        let region = self.layout().slice(info)?;
        if region.size() != values.len() {
            return Err(ArrayError::ShapeMismatch {
                expected: region.shape,
                got: vec![values.len()],
            });
        }
        let mut buffer = self.buffer.borrow_mut();
        region
            .into_positions()
            .zip_eq(values)
            .for_each(|(position, value)| buffer.write(position, *value));
        Ok(())
    }

    /// Writes `values` over the whole view.
    pub fn assign_all(&self, values: &[T]) -> Result<()> {
        self.assign(&[], values)
    }

    /// Copies the elements of `other`, which must have the same shape.
    ///
    /// `other` may overlap this view.
    pub fn assign_from(&self, other: &Array<T, N>) -> Result<()> {
        if self.shape != other.shape {
            return Err(ArrayError::ShapeMismatch {
                expected: self.shape.to_vec(),
                got: other.shape.to_vec(),
            });
        }
        let values = other.to_vec();
        self.assign_all(&values)
    }

    pub fn fill(&self, value: T) {
        let mut buffer = self.buffer.borrow_mut();
        self.layout()
            .into_positions()
            .for_each(|position| buffer.write(position, value));
    }

    /// Changes the shape of this view in place.
    ///
    /// Only contiguous views can be reshaped, other views of the buffer keep
    /// their own shape.
    pub fn reshape(&mut self, shape: impl IntoShape<N>) -> Result<()> {
        let shape = shape.into_shape()?;
        if checked_size(&shape) != Some(self.len()) {
            return Err(ArrayError::ShapeMismatch {
                expected: self.shape.to_vec(),
                got: shape.to_vec(),
            });
        }
        root_size(&shape)?;
        if !self.is_contiguous() {
            return Err(ArrayError::invalid_shape(
                self.shape.iter().map(|extent| *extent as i64),
                "only contiguous views can be reshaped in place",
            ));
        }
        debug!("reshaping {:?} into {:?}", self.shape, shape);
        self.strides = Order::RowMajor.strides(&shape);
        self.shape = shape;
        Ok(())
    }

    /// Elements in row-major logical order.
    pub fn elements(&self) -> Elements<'_, T> {
        Elements::new(&self.buffer, self.layout())
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.elements().collect()
    }

    /// Copy of this view in a fresh row-major buffer.
    pub fn to_contiguous(&self) -> Self {
        Self::root(Buffer::from(self.to_vec()), self.shape, Order::RowMajor)
    }
}

impl<T: DataType> Array<T, 0> {
    /// Value of a fully indexed view.
    pub fn scalar(&self) -> T {
        self.buffer.borrow().read(self.offset)
    }
}

impl<T: DataType, const N: usize> Clone for Array<T, N> {
    fn clone(&self) -> Self {
        Self {
            buffer: Rc::clone(&self.buffer),
            shape: self.shape,
            strides: self.strides,
            offset: self.offset,
        }
    }
}

impl<T: DataType, const N: usize> PartialEq for Array<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.elements().eq(other.elements())
    }
}

impl<T: DataType, const N: usize> Debug for Array<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Array")
            .field("dtype", &T::DTYPE)
            .field("shape", &self.shape)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .finish()
    }
}
