use log::debug;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    components::{array::Array, DType, DataType},
    errors::{ArrayError, Result},
};

/// Flattened form of an array: element tag, shape, and values in row-major
/// logical order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayRecord<T> {
    pub dtype: DType,
    pub shape: Vec<usize>,
    pub data: Vec<T>,
}

impl<T: DataType, const N: usize> From<&Array<T, N>> for ArrayRecord<T> {
    fn from(value: &Array<T, N>) -> Self {
        ArrayRecord {
            dtype: T::DTYPE,
            shape: value.shape().to_vec(),
            data: value.to_vec(),
        }
    }
}

impl<T: DataType, const N: usize> TryFrom<ArrayRecord<T>> for Array<T, N> {
    type Error = ArrayError;

    fn try_from(value: ArrayRecord<T>) -> Result<Self> {
        let ArrayRecord { dtype, shape, data } = value;
        if dtype != T::DTYPE {
            return Err(ArrayError::DTypeMismatch {
                expected: T::DTYPE,
                got: dtype,
            });
        }
        debug!("restoring {} {dtype} elements with shape {shape:?}", data.len());
        Array::from_shape_vec(shape, data)
    }
}

impl<T: DataType, const N: usize> Serialize for Array<T, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        ArrayRecord::from(self).serialize(serializer)
    }
}

impl<'de, T: DataType, const N: usize> Deserialize<'de> for Array<T, N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let record = ArrayRecord::<T>::deserialize(deserializer)?;
        Array::try_from(record).map_err(D::Error::custom)
    }
}

/// Encodes the logical contents of `array`, whatever its layout.
pub fn serialize<T: DataType, const N: usize>(array: &Array<T, N>) -> Result<Vec<u8>> {
    Ok(bincode::serialize(&ArrayRecord::from(array))?)
}

/// Decodes bytes from [serialize] into a fresh row-major array.
pub fn deserialize<T: DataType, const N: usize>(bytes: &[u8]) -> Result<Array<T, N>> {
    let record: ArrayRecord<T> = bincode::deserialize(bytes)?;
    Array::try_from(record)
}

impl<T: DataType, const N: usize> Array<T, N> {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        deserialize(bytes)
    }
}
