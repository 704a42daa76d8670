use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use crate::errors::{ArrayError, Result};

/// Subscript for a single axis.
///
/// `Index` selects one position and drops the axis, `Slice` keeps the axis
/// and selects `start..stop` every `step` positions. Negative values count
/// from the end of the axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum AxisIndex {
    Index(isize),
    Slice {
        start: Option<isize>,
        stop: Option<isize>,
        step: isize,
    },
}

/// [AxisIndex] resolved against a concrete axis extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Resolved {
    Index(usize),
    Slice { start: usize, len: usize, step: isize },
}

impl AxisIndex {
    /// Full range over the axis.
    pub fn all() -> Self {
        AxisIndex::Slice {
            start: None,
            stop: None,
            step: 1,
        }
    }

    pub fn range(start: Option<isize>, stop: Option<isize>) -> Self {
        AxisIndex::Slice {
            start,
            stop,
            step: 1,
        }
    }

    /// Sets the step of a slice. Single indexes are returned unchanged.
    pub fn step_by(self, step: isize) -> Self {
        match self {
            AxisIndex::Slice { start, stop, .. } => AxisIndex::Slice { start, stop, step },
            index => index,
        }
    }

    /// Normalizes negative values and clamps slice bounds into the axis.
    ///
    /// Single indexes outside the axis are an error, slice bounds never are.
    pub(crate) fn resolve(self, axis: usize, extent: usize) -> Result<Resolved> {
        let signed_extent = extent as isize;
        match self {
            AxisIndex::Index(index) => {
                let normalized = if index < 0 { index + signed_extent } else { index };
                if (0..signed_extent).contains(&normalized) {
                    Ok(Resolved::Index(normalized as usize))
                } else {
                    Err(ArrayError::IndexOutOfBounds {
                        index,
                        axis,
                        extent,
                    })
                }
            }
            AxisIndex::Slice { step: 0, .. } => Err(ArrayError::InvalidStep { axis }),
            AxisIndex::Slice { start, stop, step } if step > 0 => {
                let clamp = |bound: isize| clamp_bound(bound, signed_extent, 0, signed_extent);
                let start = start.map_or(0, clamp);
                let stop = stop.map_or(signed_extent, clamp);
                let len = if stop > start {
                    (stop - start - 1) / step + 1
                } else {
                    0
                };
                Ok(Resolved::slice(start, len, step))
            }
            AxisIndex::Slice { start, stop, step } => {
                let clamp = |bound: isize| clamp_bound(bound, signed_extent, -1, signed_extent - 1);
                let start = start.map_or(signed_extent - 1, clamp);
                // An omitted stop runs past index 0.
                let stop = stop.map_or(-1, clamp);
                let len = if start > stop {
                    ((start - stop - 1) as usize / step.unsigned_abs()) as isize + 1
                } else {
                    0
                };
                Ok(Resolved::slice(start, len, step))
            }
        }
    }
}

fn clamp_bound(bound: isize, extent: isize, lower: isize, upper: isize) -> isize {
    let bound = if bound < 0 { bound + extent } else { bound };
    bound.clamp(lower, upper)
}

impl Resolved {
    fn slice(start: isize, len: isize, step: isize) -> Self {
        if len > 0 {
            Resolved::Slice {
                start: start as usize,
                len: len as usize,
                step,
            }
        } else {
            Resolved::Slice {
                start: 0,
                len: 0,
                step,
            }
        }
    }
}

impl From<RangeFull> for AxisIndex {
    fn from(_: RangeFull) -> Self {
        AxisIndex::all()
    }
}

/// Integer subscripts that saturate at `isize::MAX` instead of wrapping.
trait ToIsize: Copy {
    fn to_isize(self) -> isize;
}

impl ToIsize for isize {
    fn to_isize(self) -> isize {
        self
    }
}

impl ToIsize for i32 {
    fn to_isize(self) -> isize {
        self as isize
    }
}

impl ToIsize for usize {
    fn to_isize(self) -> isize {
        isize::try_from(self).unwrap_or(isize::MAX)
    }
}

/// Exclusive stop of an inclusive end; `-1` and `isize::MAX` run to the end.
fn inclusive_stop(end: isize) -> Option<isize> {
    if end == -1 {
        None
    } else {
        end.checked_add(1)
    }
}

macro_rules! impl_axis_index_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for AxisIndex {
                fn from(value: $t) -> Self {
                    AxisIndex::Index(value.to_isize())
                }
            }

            impl From<Range<$t>> for AxisIndex {
                fn from(value: Range<$t>) -> Self {
                    AxisIndex::range(Some(value.start.to_isize()), Some(value.end.to_isize()))
                }
            }

            impl From<RangeFrom<$t>> for AxisIndex {
                fn from(value: RangeFrom<$t>) -> Self {
                    AxisIndex::range(Some(value.start.to_isize()), None)
                }
            }

            impl From<RangeTo<$t>> for AxisIndex {
                fn from(value: RangeTo<$t>) -> Self {
                    AxisIndex::range(None, Some(value.end.to_isize()))
                }
            }

            impl From<RangeInclusive<$t>> for AxisIndex {
                fn from(value: RangeInclusive<$t>) -> Self {
                    AxisIndex::range(Some(value.start().to_isize()), inclusive_stop(value.end().to_isize()))
                }
            }

            impl From<RangeToInclusive<$t>> for AxisIndex {
                fn from(value: RangeToInclusive<$t>) -> Self {
                    AxisIndex::range(None, inclusive_stop(value.end.to_isize()))
                }
            }
        )*
    };
}

impl_axis_index_from!(isize, usize, i32);

/// Builds an array of [AxisIndex] from index and range expressions.
///
/// ```
/// use strand::{s, Array};
///
/// let x = Array::from_shape_vec([4, 4], (0..16).map(f64::from).collect()).unwrap();
/// let inner = x.slice::<2>(&s![1..-1, 1..-1]).unwrap();
/// assert_eq!(inner.shape(), [2, 2]);
/// let column = x.slice::<1>(&s![.., 2]).unwrap();
/// assert_eq!(column.to_vec(), vec![2., 6., 10., 14.]);
/// let reversed = x.slice::<1>(&s![0, ..;-1]).unwrap();
/// assert_eq!(reversed.to_vec(), vec![3., 2., 1., 0.]);
/// ```
#[macro_export]
macro_rules! s {
    (@parse [$($acc:expr,)*]) => {
        [$($acc,)*]
    };
    (@parse [$($acc:expr,)*] $r:expr ; $step:expr) => {
        [$($acc,)* $crate::AxisIndex::from($r).step_by($step),]
    };
    (@parse [$($acc:expr,)*] $r:expr ; $step:expr , $($rest:tt)*) => {
        $crate::s![@parse [$($acc,)* $crate::AxisIndex::from($r).step_by($step),] $($rest)*]
    };
    (@parse [$($acc:expr,)*] $r:expr) => {
        [$($acc,)* $crate::AxisIndex::from($r),]
    };
    (@parse [$($acc:expr,)*] $r:expr , $($rest:tt)*) => {
        $crate::s![@parse [$($acc,)* $crate::AxisIndex::from($r),] $($rest)*]
    };
    ($($t:tt)*) => {
        $crate::s![@parse [] $($t)*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn slice(start: Option<isize>, stop: Option<isize>, step: isize) -> AxisIndex {
        AxisIndex::Slice { start, stop, step }
    }

    #[rstest]
    #[case(0, 0)]
    #[case(7, 7)]
    #[case(-1, 7)]
    #[case(-8, 0)]
    fn index_normalization(#[case] index: isize, #[case] expected: usize) {
        assert_eq!(
            AxisIndex::Index(index).resolve(0, 8).unwrap(),
            Resolved::Index(expected)
        );
    }

    #[rstest]
    #[case(8)]
    #[case(-9)]
    #[case(100)]
    fn index_out_of_bounds(#[case] index: isize) {
        assert!(matches!(
            AxisIndex::Index(index).resolve(1, 8),
            Err(ArrayError::IndexOutOfBounds { axis: 1, extent: 8, .. })
        ));
    }

    #[rstest]
    #[case(slice(Some(2), Some(-2), 1), 2, 4)]
    #[case(slice(Some(-2), None, 1), 6, 2)]
    #[case(slice(None, Some(3), 1), 0, 3)]
    #[case(slice(Some(-100), Some(100), 1), 0, 8)]
    #[case(slice(Some(5), Some(2), 1), 0, 0)]
    #[case(slice(Some(9), None, 1), 0, 0)]
    #[case(slice(None, None, 3), 0, 3)]
    #[case(slice(Some(1), Some(7), 2), 1, 3)]
    fn slice_clamping(#[case] index: AxisIndex, #[case] start: usize, #[case] len: usize) {
        match index.resolve(0, 8).unwrap() {
            Resolved::Slice { start: s, len: l, .. } => assert_eq!((s, l), (start, len)),
            resolved => panic!("expected a slice, got {resolved:?}"),
        }
    }

    #[rstest]
    #[case(slice(None, None, -1), 7, 8)]
    #[case(slice(Some(3), None, -1), 3, 4)]
    #[case(slice(None, Some(-3), -1), 7, 2)]
    #[case(slice(Some(100), Some(-100), -2), 7, 4)]
    #[case(slice(Some(2), Some(5), -1), 0, 0)]
    fn negative_step(#[case] index: AxisIndex, #[case] start: usize, #[case] len: usize) {
        assert_eq!(
            index.resolve(0, 8).unwrap(),
            Resolved::Slice { start, len, step: index_step(index) }
        );
    }

    fn index_step(index: AxisIndex) -> isize {
        match index {
            AxisIndex::Slice { step, .. } => step,
            AxisIndex::Index(_) => 1,
        }
    }

    #[test]
    fn extreme_negative_step_takes_one_element() {
        assert_eq!(
            slice(None, None, isize::MIN).resolve(0, 8).unwrap(),
            Resolved::Slice { start: 7, len: 1, step: isize::MIN }
        );
        assert_eq!(
            slice(Some(-1), Some(-9), -3).resolve(0, 8).unwrap(),
            Resolved::Slice { start: 7, len: 3, step: -3 }
        );
    }

    #[test]
    fn large_unsigned_subscripts_saturate() {
        assert_eq!(AxisIndex::from(usize::MAX), AxisIndex::Index(isize::MAX));
        assert!(matches!(
            AxisIndex::from(usize::MAX).resolve(1, 8),
            Err(ArrayError::IndexOutOfBounds { index: isize::MAX, axis: 1, extent: 8 })
        ));
        assert_eq!(
            AxisIndex::from(0usize..usize::MAX).resolve(0, 8).unwrap(),
            Resolved::Slice { start: 0, len: 8, step: 1 }
        );
        assert_eq!(AxisIndex::from(2usize..=usize::MAX), slice(Some(2), None, 1));
        assert_eq!(AxisIndex::from(..=isize::MAX), slice(None, None, 1));
    }

    #[test]
    fn zero_step_is_rejected() {
        assert!(matches!(
            slice(None, None, 0).resolve(2, 4),
            Err(ArrayError::InvalidStep { axis: 2 })
        ));
    }

    #[test]
    fn empty_axis_slices_to_nothing() {
        assert_eq!(
            AxisIndex::all().resolve(0, 0).unwrap(),
            Resolved::Slice { start: 0, len: 0, step: 1 }
        );
        assert_eq!(
            AxisIndex::all().step_by(-1).resolve(0, 0).unwrap(),
            Resolved::Slice { start: 0, len: 0, step: -1 }
        );
    }

    #[test]
    fn macro_builds_subscripts() {
        let info = s![2..-2, .., 3, -2.., ..4, 1..=2, ..;-1];
        assert_eq!(
            info,
            [
                slice(Some(2), Some(-2), 1),
                AxisIndex::all(),
                AxisIndex::Index(3),
                slice(Some(-2), None, 1),
                slice(None, Some(4), 1),
                slice(Some(1), Some(3), 1),
                slice(None, None, -1),
            ]
        );
        assert_eq!(s![0..;2], [slice(Some(0), None, 2)]);
        assert_eq!(s![1usize], [AxisIndex::Index(1)]);
    }

    #[test]
    fn inclusive_range_to_last() {
        assert_eq!(AxisIndex::from(-3..=-1), slice(Some(-3), None, 1));
        assert_eq!(AxisIndex::from(..=-1), slice(None, None, 1));
    }
}
