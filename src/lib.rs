//! Fixed-rank strided arrays over shared, reference counted buffers.
//!
//! An [Array] is a view: a shape, per-axis strides and an offset into a
//! [Buffer](buffer::Buffer) that any number of views may share. Slicing with
//! [s!] never copies; writes through one view are visible through all the
//! others.
//!
//! ```
//! use strand::{s, Array2};
//!
//! let x = Array2::<f64>::new([8, 8]).unwrap();
//! x.assign_all(&(0..64).map(f64::from).collect::<Vec<_>>()).unwrap();
//!
//! let inner: Array2<f64> = x.slice(&s![2..-2, 2..-2]).unwrap();
//! assert_eq!(inner.shape(), [4, 4]);
//! assert_eq!(inner.get([0, 0]).unwrap(), 18.);
//!
//! inner.set([0, 0], -1.).unwrap();
//! assert_eq!(x.get([2, 2]).unwrap(), -1.);
//! ```

pub mod buffer;
mod components;
mod errors;
mod indexes;

pub use components::{
    array::{Array, Array1, Array2, Array3, IntoShape},
    display::DEFAULT_WIDTH,
    iter::{Elements, IndexAxis, OuterIter},
    layout::Order,
    serialize::{deserialize, serialize, ArrayRecord},
    DType, DataType,
};
pub use errors::{ArrayError, Result};
pub use indexes::AxisIndex;
