use num_traits::Num;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt::{Debug, Display};

/// Runtime tag of the element type stored in a [Buffer](crate::buffer::Buffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    Float32,
    Float64,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
}

impl DType {
    /// Size in bytes.
    pub fn size(&self) -> usize {
        match self {
            DType::UInt8 => 1,
            DType::UInt16 => 2,
            DType::Float32 | DType::Int32 | DType::UInt32 => 4,
            DType::Float64 | DType::Int64 | DType::UInt64 => 8,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt8 => "uint8",
            DType::UInt16 => "uint16",
            DType::UInt32 => "uint32",
            DType::UInt64 => "uint64",
        }
    }
}

impl Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-width numeric element that can live in an array.
pub trait DataType:
    Num + Copy + PartialEq + Debug + Display + Serialize + DeserializeOwned + 'static
{
    const DTYPE: DType;
}

macro_rules! impl_data_type {
    ($($t:ty => $dtype:ident),* $(,)?) => {
        $(
            impl DataType for $t {
                const DTYPE: DType = DType::$dtype;
            }
        )*
    };
}

impl_data_type!(
    f32 => Float32,
    f64 => Float64,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
);
