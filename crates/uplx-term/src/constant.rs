//! Typed UPLC constants.

use crate::Data;
use num_bigint::BigInt;
use num_traits::Zero;
use std::fmt;

/// A typed literal carried by a `(con ...)` term.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Unit,
    Bool(bool),
    /// Arbitrary-precision integer.
    Integer(BigInt),
    ByteString(Vec<u8>),
    String(String),
    List(Vec<Constant>),
    Pair(Box<Constant>, Box<Constant>),
    /// Structured contract-level data.
    Data(Data),
}

impl Constant {
    pub fn integer(n: impl Into<BigInt>) -> Self {
        Constant::Integer(n.into())
    }

    pub fn byte_string(bytes: impl Into<Vec<u8>>) -> Self {
        Constant::ByteString(bytes.into())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Constant::String(s.into())
    }

    pub fn pair(fst: Constant, snd: Constant) -> Self {
        Constant::Pair(Box::new(fst), Box::new(snd))
    }

    /// Short name of the constant's kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Constant::Unit => "unit",
            Constant::Bool(_) => "bool",
            Constant::Integer(_) => "integer",
            Constant::ByteString(_) => "bytestring",
            Constant::String(_) => "string",
            Constant::List(_) => "list",
            Constant::Pair(_, _) => "pair",
            Constant::Data(_) => "data",
        }
    }

    /// Abstract memory footprint in 64-bit words, the size measure cost
    /// formulas are evaluated over.
    pub fn mem_size(&self) -> u64 {
        match self {
            Constant::Unit | Constant::Bool(_) => 1,
            Constant::Integer(n) => int_words(n),
            Constant::ByteString(bs) => byte_words(bs.len()),
            Constant::String(s) => byte_words(s.len()),
            Constant::List(items) => items.iter().map(Constant::mem_size).sum::<u64>().max(1),
            Constant::Pair(fst, snd) => fst.mem_size() + snd.mem_size(),
            Constant::Data(d) => d.mem_size(),
        }
    }
}

/// Occupied 64-bit words of an integer's magnitude (zero occupies one).
pub(crate) fn int_words(n: &BigInt) -> u64 {
    if n.is_zero() {
        1
    } else {
        (n.bits() + 63) / 64
    }
}

/// Occupied 64-bit words of a byte payload (empty occupies one).
pub(crate) fn byte_words(len: usize) -> u64 {
    if len == 0 {
        1
    } else {
        ((len as u64) - 1) / 8 + 1
    }
}

impl From<i32> for Constant {
    fn from(n: i32) -> Self {
        Constant::Integer(BigInt::from(n))
    }
}

impl From<i64> for Constant {
    fn from(n: i64) -> Self {
        Constant::Integer(BigInt::from(n))
    }
}

impl From<BigInt> for Constant {
    fn from(n: BigInt) -> Self {
        Constant::Integer(n)
    }
}

impl From<bool> for Constant {
    fn from(b: bool) -> Self {
        Constant::Bool(b)
    }
}

impl From<&str> for Constant {
    fn from(s: &str) -> Self {
        Constant::String(s.to_string())
    }
}

impl From<Vec<u8>> for Constant {
    fn from(bytes: Vec<u8>) -> Self {
        Constant::ByteString(bytes)
    }
}

impl From<Data> for Constant {
    fn from(d: Data) -> Self {
        Constant::Data(d)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Unit => write!(f, "unit ()"),
            Constant::Bool(b) => write!(f, "bool {b}"),
            Constant::Integer(n) => write!(f, "integer {n}"),
            Constant::ByteString(bs) => {
                write!(f, "bytestring #")?;
                for b in bs {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
            Constant::String(s) => write!(f, "string {s:?}"),
            Constant::List(items) => {
                write!(f, "list [")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "({item})")?;
                }
                write!(f, "]")
            }
            Constant::Pair(fst, snd) => write!(f, "pair (({fst}), ({snd}))"),
            Constant::Data(d) => write!(f, "data {d}"),
        }
    }
}
