//! Structured contract-level data.
//!
//! `Data` is the universal value shape scripts receive their datum,
//! redeemer, and context through: constructor applications, maps, lists,
//! integers, and byte strings.

use crate::constant::{byte_words, int_words};
use num_bigint::BigInt;
use std::fmt;

/// A structured data value.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    /// Constructor application: alternative tag plus field list.
    Constr { tag: u64, fields: Vec<Data> },
    /// Association list of key/value pairs (order-preserving).
    Map(Vec<(Data, Data)>),
    List(Vec<Data>),
    Int(BigInt),
    Bytes(Vec<u8>),
}

impl Data {
    pub fn int(n: impl Into<BigInt>) -> Self {
        Data::Int(n.into())
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Data::Bytes(bytes.into())
    }

    pub fn constr(tag: u64, fields: Vec<Data>) -> Self {
        Data::Constr { tag, fields }
    }

    /// Abstract memory footprint in 64-bit words. Every node carries a
    /// fixed four-word overhead plus its payload.
    pub fn mem_size(&self) -> u64 {
        const NODE: u64 = 4;
        match self {
            Data::Constr { fields, .. } => {
                NODE + fields.iter().map(Data::mem_size).sum::<u64>()
            }
            Data::Map(entries) => {
                NODE + entries
                    .iter()
                    .map(|(k, v)| k.mem_size() + v.mem_size())
                    .sum::<u64>()
            }
            Data::List(items) => NODE + items.iter().map(Data::mem_size).sum::<u64>(),
            Data::Int(n) => NODE + int_words(n),
            Data::Bytes(bs) => NODE + byte_words(bs.len()),
        }
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Data::Constr { tag, fields } => {
                write!(f, "(constr {tag}")?;
                for field in fields {
                    write!(f, " {field}")?;
                }
                write!(f, ")")
            }
            Data::Map(entries) => {
                write!(f, "(map")?;
                for (k, v) in entries {
                    write!(f, " ({k} . {v})")?;
                }
                write!(f, ")")
            }
            Data::List(items) => {
                write!(f, "(list")?;
                for item in items {
                    write!(f, " {item}")?;
                }
                write!(f, ")")
            }
            Data::Int(n) => write!(f, "(int {n})"),
            Data::Bytes(bs) => {
                write!(f, "(bytes #")?;
                for b in bs {
                    write!(f, "{b:02x}")?;
                }
                write!(f, ")")
            }
        }
    }
}
