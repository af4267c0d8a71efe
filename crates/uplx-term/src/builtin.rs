//! The closed set of builtin operations.
//!
//! Every builtin has a fixed arity declared here; evaluation and costing
//! live in the machine crate. The names are the canonical on-chain names,
//! used in diagnostics and when loading cost models from protocol
//! parameters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag of a builtin operation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum BuiltinFun {
    // Integer arithmetic
    AddInteger,
    SubtractInteger,
    MultiplyInteger,
    /// Floor division (rounds toward negative infinity); paired with
    /// [`BuiltinFun::ModInteger`].
    DivideInteger,
    /// Truncating division (rounds toward zero); paired with
    /// [`BuiltinFun::RemainderInteger`].
    QuotientInteger,
    RemainderInteger,
    ModInteger,
    // Integer comparisons
    EqualsInteger,
    LessThanInteger,
    LessThanEqualsInteger,
    // Byte strings
    AppendByteString,
    ConsByteString,
    SliceByteString,
    LengthOfByteString,
    IndexByteString,
    EqualsByteString,
    LessThanByteString,
    LessThanEqualsByteString,
    // Delegated cryptography
    Sha2_256,
    Sha3_256,
    Blake2b_256,
    VerifyEd25519Signature,
    VerifyEcdsaSecp256k1Signature,
    VerifySchnorrSecp256k1Signature,
    // Text
    AppendString,
    EqualsString,
    EncodeUtf8,
    DecodeUtf8,
    // Control
    IfThenElse,
    ChooseUnit,
    Trace,
    // Pairs
    FstPair,
    SndPair,
    // Lists
    ChooseList,
    MkCons,
    HeadList,
    TailList,
    NullList,
    // Structured data
    ChooseData,
    ConstrData,
    MapData,
    ListData,
    IData,
    BData,
    UnConstrData,
    UnMapData,
    UnListData,
    UnIData,
    UnBData,
    EqualsData,
    MkPairData,
    MkNilData,
    MkNilPairData,
}

impl BuiltinFun {
    /// Every builtin tag, in declaration order. Used to build cost tables.
    pub const ALL: [BuiltinFun; 53] = [
        BuiltinFun::AddInteger,
        BuiltinFun::SubtractInteger,
        BuiltinFun::MultiplyInteger,
        BuiltinFun::DivideInteger,
        BuiltinFun::QuotientInteger,
        BuiltinFun::RemainderInteger,
        BuiltinFun::ModInteger,
        BuiltinFun::EqualsInteger,
        BuiltinFun::LessThanInteger,
        BuiltinFun::LessThanEqualsInteger,
        BuiltinFun::AppendByteString,
        BuiltinFun::ConsByteString,
        BuiltinFun::SliceByteString,
        BuiltinFun::LengthOfByteString,
        BuiltinFun::IndexByteString,
        BuiltinFun::EqualsByteString,
        BuiltinFun::LessThanByteString,
        BuiltinFun::LessThanEqualsByteString,
        BuiltinFun::Sha2_256,
        BuiltinFun::Sha3_256,
        BuiltinFun::Blake2b_256,
        BuiltinFun::VerifyEd25519Signature,
        BuiltinFun::VerifyEcdsaSecp256k1Signature,
        BuiltinFun::VerifySchnorrSecp256k1Signature,
        BuiltinFun::AppendString,
        BuiltinFun::EqualsString,
        BuiltinFun::EncodeUtf8,
        BuiltinFun::DecodeUtf8,
        BuiltinFun::IfThenElse,
        BuiltinFun::ChooseUnit,
        BuiltinFun::Trace,
        BuiltinFun::FstPair,
        BuiltinFun::SndPair,
        BuiltinFun::ChooseList,
        BuiltinFun::MkCons,
        BuiltinFun::HeadList,
        BuiltinFun::TailList,
        BuiltinFun::NullList,
        BuiltinFun::ChooseData,
        BuiltinFun::ConstrData,
        BuiltinFun::MapData,
        BuiltinFun::ListData,
        BuiltinFun::IData,
        BuiltinFun::BData,
        BuiltinFun::UnConstrData,
        BuiltinFun::UnMapData,
        BuiltinFun::UnListData,
        BuiltinFun::UnIData,
        BuiltinFun::UnBData,
        BuiltinFun::EqualsData,
        BuiltinFun::MkPairData,
        BuiltinFun::MkNilData,
        BuiltinFun::MkNilPairData,
    ];

    /// Number of arguments the builtin consumes before it evaluates.
    pub fn arity(self) -> usize {
        match self {
            BuiltinFun::LengthOfByteString
            | BuiltinFun::Sha2_256
            | BuiltinFun::Sha3_256
            | BuiltinFun::Blake2b_256
            | BuiltinFun::EncodeUtf8
            | BuiltinFun::DecodeUtf8
            | BuiltinFun::FstPair
            | BuiltinFun::SndPair
            | BuiltinFun::HeadList
            | BuiltinFun::TailList
            | BuiltinFun::NullList
            | BuiltinFun::MapData
            | BuiltinFun::ListData
            | BuiltinFun::IData
            | BuiltinFun::BData
            | BuiltinFun::UnConstrData
            | BuiltinFun::UnMapData
            | BuiltinFun::UnListData
            | BuiltinFun::UnIData
            | BuiltinFun::UnBData
            | BuiltinFun::MkNilData
            | BuiltinFun::MkNilPairData => 1,
            BuiltinFun::AddInteger
            | BuiltinFun::SubtractInteger
            | BuiltinFun::MultiplyInteger
            | BuiltinFun::DivideInteger
            | BuiltinFun::QuotientInteger
            | BuiltinFun::RemainderInteger
            | BuiltinFun::ModInteger
            | BuiltinFun::EqualsInteger
            | BuiltinFun::LessThanInteger
            | BuiltinFun::LessThanEqualsInteger
            | BuiltinFun::AppendByteString
            | BuiltinFun::ConsByteString
            | BuiltinFun::IndexByteString
            | BuiltinFun::EqualsByteString
            | BuiltinFun::LessThanByteString
            | BuiltinFun::LessThanEqualsByteString
            | BuiltinFun::AppendString
            | BuiltinFun::EqualsString
            | BuiltinFun::ChooseUnit
            | BuiltinFun::Trace
            | BuiltinFun::MkCons
            | BuiltinFun::ConstrData
            | BuiltinFun::EqualsData
            | BuiltinFun::MkPairData => 2,
            BuiltinFun::SliceByteString
            | BuiltinFun::VerifyEd25519Signature
            | BuiltinFun::VerifyEcdsaSecp256k1Signature
            | BuiltinFun::VerifySchnorrSecp256k1Signature
            | BuiltinFun::IfThenElse
            | BuiltinFun::ChooseList => 3,
            BuiltinFun::ChooseData => 6,
        }
    }

    /// The canonical on-chain name.
    pub fn name(self) -> &'static str {
        match self {
            BuiltinFun::AddInteger => "addInteger",
            BuiltinFun::SubtractInteger => "subtractInteger",
            BuiltinFun::MultiplyInteger => "multiplyInteger",
            BuiltinFun::DivideInteger => "divideInteger",
            BuiltinFun::QuotientInteger => "quotientInteger",
            BuiltinFun::RemainderInteger => "remainderInteger",
            BuiltinFun::ModInteger => "modInteger",
            BuiltinFun::EqualsInteger => "equalsInteger",
            BuiltinFun::LessThanInteger => "lessThanInteger",
            BuiltinFun::LessThanEqualsInteger => "lessThanEqualsInteger",
            BuiltinFun::AppendByteString => "appendByteString",
            BuiltinFun::ConsByteString => "consByteString",
            BuiltinFun::SliceByteString => "sliceByteString",
            BuiltinFun::LengthOfByteString => "lengthOfByteString",
            BuiltinFun::IndexByteString => "indexByteString",
            BuiltinFun::EqualsByteString => "equalsByteString",
            BuiltinFun::LessThanByteString => "lessThanByteString",
            BuiltinFun::LessThanEqualsByteString => "lessThanEqualsByteString",
            BuiltinFun::Sha2_256 => "sha2_256",
            BuiltinFun::Sha3_256 => "sha3_256",
            BuiltinFun::Blake2b_256 => "blake2b_256",
            BuiltinFun::VerifyEd25519Signature => "verifyEd25519Signature",
            BuiltinFun::VerifyEcdsaSecp256k1Signature => "verifyEcdsaSecp256k1Signature",
            BuiltinFun::VerifySchnorrSecp256k1Signature => "verifySchnorrSecp256k1Signature",
            BuiltinFun::AppendString => "appendString",
            BuiltinFun::EqualsString => "equalsString",
            BuiltinFun::EncodeUtf8 => "encodeUtf8",
            BuiltinFun::DecodeUtf8 => "decodeUtf8",
            BuiltinFun::IfThenElse => "ifThenElse",
            BuiltinFun::ChooseUnit => "chooseUnit",
            BuiltinFun::Trace => "trace",
            BuiltinFun::FstPair => "fstPair",
            BuiltinFun::SndPair => "sndPair",
            BuiltinFun::ChooseList => "chooseList",
            BuiltinFun::MkCons => "mkCons",
            BuiltinFun::HeadList => "headList",
            BuiltinFun::TailList => "tailList",
            BuiltinFun::NullList => "nullList",
            BuiltinFun::ChooseData => "chooseData",
            BuiltinFun::ConstrData => "constrData",
            BuiltinFun::MapData => "mapData",
            BuiltinFun::ListData => "listData",
            BuiltinFun::IData => "iData",
            BuiltinFun::BData => "bData",
            BuiltinFun::UnConstrData => "unConstrData",
            BuiltinFun::UnMapData => "unMapData",
            BuiltinFun::UnListData => "unListData",
            BuiltinFun::UnIData => "unIData",
            BuiltinFun::UnBData => "unBData",
            BuiltinFun::EqualsData => "equalsData",
            BuiltinFun::MkPairData => "mkPairData",
            BuiltinFun::MkNilData => "mkNilData",
            BuiltinFun::MkNilPairData => "mkNilPairData",
        }
    }
}

impl fmt::Display for BuiltinFun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
