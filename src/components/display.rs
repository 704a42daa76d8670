use itertools::Itertools;
use std::fmt::{Display, Formatter, Result};

use crate::components::{array::Array, iter::IndexAxis, DataType};

/// Field width used when the formatter does not set one.
pub const DEFAULT_WIDTH: usize = 3;

/// Values right-justified in fixed-width fields, separated by a space.
impl<T: DataType> Display for Array<T, 1> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let width = f.width().unwrap_or(DEFAULT_WIDTH);
        let row = self
            .outer_iter()
            .format_with(" ", |value, g| g(&format_args!("{value:>width$}")));
        write!(f, "{row}")
    }
}

/// One row per line, each formatted as a rank one array.
impl<T: DataType> Display for Array<T, 2> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let width = f.width().unwrap_or(DEFAULT_WIDTH);
        let rows = self
            .outer_iter()
            .format_with("\n", |row, g| g(&format_args!("{row:width$}")));
        write!(f, "{rows}")
    }
}
