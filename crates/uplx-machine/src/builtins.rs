//! Builtin evaluation.
//!
//! Each builtin is a total function from its exact argument tuple to a
//! result or a terminal failure. Wrong constant kinds are
//! [`MachineError::TypeMismatch`]; arguments of the right kind but outside
//! the operation's domain (division by zero, head of an empty list, ...)
//! are [`MachineError::BuiltinFailure`]. Cryptographic primitives are
//! delegated to external libraries; this module only wires arguments and
//! results.

use crate::error::{EvalResult, MachineError};
use crate::machine::Machine;
use crate::value::Value;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};
use uplx_term::{BuiltinFun, Constant, Data};

use blake2::digest::consts::U32;
use blake2::Blake2b;
use ed25519_dalek::{Signature as EdSignature, Verifier, VerifyingKey as EdVerifyingKey};
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{Signature as EcdsaSignature, VerifyingKey as EcdsaVerifyingKey};
use k256::schnorr::{Signature as SchnorrSignature, VerifyingKey as SchnorrVerifyingKey};
use sha2::{Digest, Sha256};
use sha3::Sha3_256 as Sha3Hasher;

impl Machine {
    /// Evaluate a saturated builtin. `args.len()` equals the declared
    /// arity by construction.
    pub(crate) fn eval_builtin(&mut self, fun: BuiltinFun, args: &[Value]) -> EvalResult<Value> {
        use BuiltinFun::*;
        match fun {
            // ── Integer arithmetic ──────────────────────────────────────
            AddInteger => {
                let (a, b) = (int_arg(fun, args, 0)?, int_arg(fun, args, 1)?);
                Ok(Value::integer(a + b))
            }
            SubtractInteger => {
                let (a, b) = (int_arg(fun, args, 0)?, int_arg(fun, args, 1)?);
                Ok(Value::integer(a - b))
            }
            MultiplyInteger => {
                let (a, b) = (int_arg(fun, args, 0)?, int_arg(fun, args, 1)?);
                Ok(Value::integer(a * b))
            }
            // Floor family: rounds toward negative infinity. Not
            // interchangeable with the truncating family below.
            DivideInteger => {
                let (a, b) = (int_arg(fun, args, 0)?, int_arg(fun, args, 1)?);
                if b.is_zero() {
                    return Err(domain(fun, "division by zero"));
                }
                Ok(Value::integer(a.div_floor(b)))
            }
            ModInteger => {
                let (a, b) = (int_arg(fun, args, 0)?, int_arg(fun, args, 1)?);
                if b.is_zero() {
                    return Err(domain(fun, "modulo by zero"));
                }
                Ok(Value::integer(a.mod_floor(b)))
            }
            // Truncating family: rounds toward zero.
            QuotientInteger => {
                let (a, b) = (int_arg(fun, args, 0)?, int_arg(fun, args, 1)?);
                if b.is_zero() {
                    return Err(domain(fun, "division by zero"));
                }
                Ok(Value::integer(a / b))
            }
            RemainderInteger => {
                let (a, b) = (int_arg(fun, args, 0)?, int_arg(fun, args, 1)?);
                if b.is_zero() {
                    return Err(domain(fun, "division by zero"));
                }
                Ok(Value::integer(a % b))
            }
            EqualsInteger => {
                let (a, b) = (int_arg(fun, args, 0)?, int_arg(fun, args, 1)?);
                Ok(Value::bool(a == b))
            }
            LessThanInteger => {
                let (a, b) = (int_arg(fun, args, 0)?, int_arg(fun, args, 1)?);
                Ok(Value::bool(a < b))
            }
            LessThanEqualsInteger => {
                let (a, b) = (int_arg(fun, args, 0)?, int_arg(fun, args, 1)?);
                Ok(Value::bool(a <= b))
            }

            // ── Byte strings ────────────────────────────────────────────
            AppendByteString => {
                let (a, b) = (bytes_arg(fun, args, 0)?, bytes_arg(fun, args, 1)?);
                let mut out = Vec::with_capacity(a.len() + b.len());
                out.extend_from_slice(a);
                out.extend_from_slice(b);
                Ok(Value::Constant(Constant::ByteString(out)))
            }
            ConsByteString => {
                let byte = int_arg(fun, args, 0)?;
                let rest = bytes_arg(fun, args, 1)?;
                let byte = byte
                    .to_u8()
                    .ok_or_else(|| domain(fun, "first argument is not a byte (0..=255)"))?;
                let mut out = Vec::with_capacity(rest.len() + 1);
                out.push(byte);
                out.extend_from_slice(rest);
                Ok(Value::Constant(Constant::ByteString(out)))
            }
            SliceByteString => {
                let start = int_arg(fun, args, 0)?;
                let count = int_arg(fun, args, 1)?;
                let bytes = bytes_arg(fun, args, 2)?;
                // Clamping semantics: out-of-range bounds never fail.
                let len = bytes.len();
                let start = if start.is_negative() {
                    0
                } else {
                    start.to_usize().map_or(len, |s| s.min(len))
                };
                let take = if count.is_negative() {
                    0
                } else {
                    count.to_usize().map_or(len - start, |n| n.min(len - start))
                };
                Ok(Value::Constant(Constant::ByteString(
                    bytes[start..start + take].to_vec(),
                )))
            }
            LengthOfByteString => {
                let bytes = bytes_arg(fun, args, 0)?;
                Ok(Value::integer(bytes.len() as i64))
            }
            IndexByteString => {
                let bytes = bytes_arg(fun, args, 0)?;
                let index = int_arg(fun, args, 1)?;
                let byte = index
                    .to_usize()
                    .and_then(|i| bytes.get(i))
                    .ok_or_else(|| domain(fun, "index out of range"))?;
                Ok(Value::integer(i64::from(*byte)))
            }
            EqualsByteString => {
                let (a, b) = (bytes_arg(fun, args, 0)?, bytes_arg(fun, args, 1)?);
                Ok(Value::bool(a == b))
            }
            LessThanByteString => {
                let (a, b) = (bytes_arg(fun, args, 0)?, bytes_arg(fun, args, 1)?);
                Ok(Value::bool(a < b))
            }
            LessThanEqualsByteString => {
                let (a, b) = (bytes_arg(fun, args, 0)?, bytes_arg(fun, args, 1)?);
                Ok(Value::bool(a <= b))
            }

            // ── Delegated cryptography ──────────────────────────────────
            Sha2_256 => {
                let bytes = bytes_arg(fun, args, 0)?;
                Ok(Value::Constant(Constant::ByteString(
                    Sha256::digest(bytes).to_vec(),
                )))
            }
            Sha3_256 => {
                let bytes = bytes_arg(fun, args, 0)?;
                Ok(Value::Constant(Constant::ByteString(
                    Sha3Hasher::digest(bytes).to_vec(),
                )))
            }
            Blake2b_256 => {
                let bytes = bytes_arg(fun, args, 0)?;
                Ok(Value::Constant(Constant::ByteString(
                    Blake2b::<U32>::digest(bytes).to_vec(),
                )))
            }
            VerifyEd25519Signature => {
                let key = bytes_arg(fun, args, 0)?;
                let message = bytes_arg(fun, args, 1)?;
                let signature = bytes_arg(fun, args, 2)?;
                let key: [u8; 32] = key
                    .as_slice()
                    .try_into()
                    .map_err(|_| domain(fun, "verification key must be 32 bytes"))?;
                let key = EdVerifyingKey::from_bytes(&key)
                    .map_err(|_| domain(fun, "malformed verification key"))?;
                let signature: [u8; 64] = signature
                    .as_slice()
                    .try_into()
                    .map_err(|_| domain(fun, "signature must be 64 bytes"))?;
                let signature = EdSignature::from_bytes(&signature);
                Ok(Value::bool(key.verify(message, &signature).is_ok()))
            }
            VerifyEcdsaSecp256k1Signature => {
                let key = bytes_arg(fun, args, 0)?;
                let message = bytes_arg(fun, args, 1)?;
                let signature = bytes_arg(fun, args, 2)?;
                if message.len() != 32 {
                    return Err(domain(fun, "message must be a 32-byte hash"));
                }
                let key = EcdsaVerifyingKey::from_sec1_bytes(key)
                    .map_err(|_| domain(fun, "malformed verification key"))?;
                let signature = EcdsaSignature::from_slice(signature)
                    .map_err(|_| domain(fun, "malformed signature"))?;
                Ok(Value::bool(key.verify_prehash(message, &signature).is_ok()))
            }
            VerifySchnorrSecp256k1Signature => {
                let key = bytes_arg(fun, args, 0)?;
                let message = bytes_arg(fun, args, 1)?;
                let signature = bytes_arg(fun, args, 2)?;
                let key = SchnorrVerifyingKey::from_bytes(key)
                    .map_err(|_| domain(fun, "malformed verification key"))?;
                let signature = SchnorrSignature::try_from(signature.as_slice())
                    .map_err(|_| domain(fun, "malformed signature"))?;
                Ok(Value::bool(key.verify_raw(message, &signature).is_ok()))
            }

            // ── Text ────────────────────────────────────────────────────
            AppendString => {
                let (a, b) = (str_arg(fun, args, 0)?, str_arg(fun, args, 1)?);
                Ok(Value::Constant(Constant::String(format!("{a}{b}"))))
            }
            EqualsString => {
                let (a, b) = (str_arg(fun, args, 0)?, str_arg(fun, args, 1)?);
                Ok(Value::bool(a == b))
            }
            EncodeUtf8 => {
                let s = str_arg(fun, args, 0)?;
                Ok(Value::Constant(Constant::ByteString(s.as_bytes().to_vec())))
            }
            DecodeUtf8 => {
                let bytes = bytes_arg(fun, args, 0)?;
                let s = String::from_utf8(bytes.clone())
                    .map_err(|_| domain(fun, "invalid UTF-8"))?;
                Ok(Value::Constant(Constant::String(s)))
            }

            // ── Control ─────────────────────────────────────────────────
            IfThenElse => {
                // Branches arrive as values; delayed branches stay
                // suspended, so only the selected one is ever forced.
                let condition = bool_arg(fun, args, 0)?;
                Ok(if condition {
                    args[1].clone()
                } else {
                    args[2].clone()
                })
            }
            ChooseUnit => {
                unit_arg(fun, args, 0)?;
                Ok(args[1].clone())
            }
            Trace => {
                let message = str_arg(fun, args, 0)?;
                self.logs.push(message.to_string());
                Ok(args[1].clone())
            }

            // ── Pairs ───────────────────────────────────────────────────
            FstPair => {
                let (fst, _) = pair_arg(fun, args, 0)?;
                Ok(Value::Constant(fst.clone()))
            }
            SndPair => {
                let (_, snd) = pair_arg(fun, args, 0)?;
                Ok(Value::Constant(snd.clone()))
            }

            // ── Lists ───────────────────────────────────────────────────
            ChooseList => {
                let items = list_arg(fun, args, 0)?;
                Ok(if items.is_empty() {
                    args[1].clone()
                } else {
                    args[2].clone()
                })
            }
            MkCons => {
                let head = constant_arg(fun, args, 0)?;
                let tail = list_arg(fun, args, 1)?;
                if let Some(existing) = tail.first() {
                    if existing.kind_name() != head.kind_name() {
                        return Err(MachineError::TypeMismatch(format!(
                            "{fun}: cannot cons a {} onto a list of {}",
                            head.kind_name(),
                            existing.kind_name()
                        )));
                    }
                }
                let mut items = Vec::with_capacity(tail.len() + 1);
                items.push(head.clone());
                items.extend_from_slice(tail);
                Ok(Value::Constant(Constant::List(items)))
            }
            HeadList => {
                let items = list_arg(fun, args, 0)?;
                let head = items
                    .first()
                    .ok_or_else(|| domain(fun, "head of an empty list"))?;
                Ok(Value::Constant(head.clone()))
            }
            TailList => {
                let items = list_arg(fun, args, 0)?;
                if items.is_empty() {
                    return Err(domain(fun, "tail of an empty list"));
                }
                Ok(Value::Constant(Constant::List(items[1..].to_vec())))
            }
            NullList => {
                let items = list_arg(fun, args, 0)?;
                Ok(Value::bool(items.is_empty()))
            }

            // ── Structured data ─────────────────────────────────────────
            ChooseData => {
                let d = data_arg(fun, args, 0)?;
                let branch = match d {
                    Data::Constr { .. } => 1,
                    Data::Map(_) => 2,
                    Data::List(_) => 3,
                    Data::Int(_) => 4,
                    Data::Bytes(_) => 5,
                };
                Ok(args[branch].clone())
            }
            ConstrData => {
                let tag = int_arg(fun, args, 0)?;
                let tag = tag
                    .to_u64()
                    .ok_or_else(|| domain(fun, "constructor tag must fit in a u64"))?;
                let fields = data_list_arg(fun, args, 1)?;
                Ok(Value::Constant(Constant::Data(Data::Constr { tag, fields })))
            }
            MapData => {
                let items = list_arg(fun, args, 0)?;
                let mut entries = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Constant::Pair(k, v) => match (k.as_ref(), v.as_ref()) {
                            (Constant::Data(k), Constant::Data(v)) => {
                                entries.push((k.clone(), v.clone()));
                            }
                            _ => {
                                return Err(MachineError::TypeMismatch(format!(
                                    "{fun}: map entries must be pairs of data"
                                )))
                            }
                        },
                        other => {
                            return Err(MachineError::TypeMismatch(format!(
                                "{fun}: expected a list of pairs, got element of kind {}",
                                other.kind_name()
                            )))
                        }
                    }
                }
                Ok(Value::Constant(Constant::Data(Data::Map(entries))))
            }
            ListData => {
                let items = data_list_arg(fun, args, 0)?;
                Ok(Value::Constant(Constant::Data(Data::List(items))))
            }
            IData => {
                let n = int_arg(fun, args, 0)?;
                Ok(Value::Constant(Constant::Data(Data::Int(n.clone()))))
            }
            BData => {
                let bytes = bytes_arg(fun, args, 0)?;
                Ok(Value::Constant(Constant::Data(Data::Bytes(bytes.clone()))))
            }
            UnConstrData => match data_arg(fun, args, 0)? {
                Data::Constr { tag, fields } => Ok(Value::Constant(Constant::pair(
                    Constant::integer(*tag),
                    Constant::List(
                        fields.iter().cloned().map(Constant::Data).collect(),
                    ),
                ))),
                other => Err(domain(fun, &format!("expected constr data, got {other}"))),
            },
            UnMapData => match data_arg(fun, args, 0)? {
                Data::Map(entries) => Ok(Value::Constant(Constant::List(
                    entries
                        .iter()
                        .map(|(k, v)| {
                            Constant::pair(Constant::Data(k.clone()), Constant::Data(v.clone()))
                        })
                        .collect(),
                ))),
                other => Err(domain(fun, &format!("expected map data, got {other}"))),
            },
            UnListData => match data_arg(fun, args, 0)? {
                Data::List(items) => Ok(Value::Constant(Constant::List(
                    items.iter().cloned().map(Constant::Data).collect(),
                ))),
                other => Err(domain(fun, &format!("expected list data, got {other}"))),
            },
            UnIData => match data_arg(fun, args, 0)? {
                Data::Int(n) => Ok(Value::integer(n.clone())),
                other => Err(domain(fun, &format!("expected integer data, got {other}"))),
            },
            UnBData => match data_arg(fun, args, 0)? {
                Data::Bytes(bytes) => Ok(Value::Constant(Constant::ByteString(bytes.clone()))),
                other => Err(domain(fun, &format!("expected bytestring data, got {other}"))),
            },
            EqualsData => {
                let (a, b) = (data_arg(fun, args, 0)?, data_arg(fun, args, 1)?);
                Ok(Value::bool(a == b))
            }
            MkPairData => {
                let (a, b) = (data_arg(fun, args, 0)?, data_arg(fun, args, 1)?);
                Ok(Value::Constant(Constant::pair(
                    Constant::Data(a.clone()),
                    Constant::Data(b.clone()),
                )))
            }
            MkNilData => {
                unit_arg(fun, args, 0)?;
                Ok(Value::Constant(Constant::List(Vec::new())))
            }
            MkNilPairData => {
                unit_arg(fun, args, 0)?;
                Ok(Value::Constant(Constant::List(Vec::new())))
            }
        }
    }
}

fn domain(fun: BuiltinFun, message: &str) -> MachineError {
    MachineError::BuiltinFailure {
        fun,
        message: message.to_string(),
    }
}

fn mismatch(fun: BuiltinFun, index: usize, expected: &str, got: &Value) -> MachineError {
    MachineError::TypeMismatch(format!(
        "{fun}: argument {index} must be {expected}, got {}",
        got.kind_name()
    ))
}

fn constant_arg<'a>(fun: BuiltinFun, args: &'a [Value], index: usize) -> EvalResult<&'a Constant> {
    args[index]
        .as_constant()
        .ok_or_else(|| mismatch(fun, index, "a constant", &args[index]))
}

fn int_arg<'a>(fun: BuiltinFun, args: &'a [Value], index: usize) -> EvalResult<&'a BigInt> {
    match constant_arg(fun, args, index)? {
        Constant::Integer(n) => Ok(n),
        _ => Err(mismatch(fun, index, "an integer", &args[index])),
    }
}

fn bytes_arg<'a>(fun: BuiltinFun, args: &'a [Value], index: usize) -> EvalResult<&'a Vec<u8>> {
    match constant_arg(fun, args, index)? {
        Constant::ByteString(bytes) => Ok(bytes),
        _ => Err(mismatch(fun, index, "a bytestring", &args[index])),
    }
}

fn str_arg<'a>(fun: BuiltinFun, args: &'a [Value], index: usize) -> EvalResult<&'a str> {
    match constant_arg(fun, args, index)? {
        Constant::String(s) => Ok(s),
        _ => Err(mismatch(fun, index, "a string", &args[index])),
    }
}

fn bool_arg(fun: BuiltinFun, args: &[Value], index: usize) -> EvalResult<bool> {
    match constant_arg(fun, args, index)? {
        Constant::Bool(b) => Ok(*b),
        _ => Err(mismatch(fun, index, "a bool", &args[index])),
    }
}

fn unit_arg(fun: BuiltinFun, args: &[Value], index: usize) -> EvalResult<()> {
    match constant_arg(fun, args, index)? {
        Constant::Unit => Ok(()),
        _ => Err(mismatch(fun, index, "unit", &args[index])),
    }
}

fn list_arg<'a>(
    fun: BuiltinFun,
    args: &'a [Value],
    index: usize,
) -> EvalResult<&'a Vec<Constant>> {
    match constant_arg(fun, args, index)? {
        Constant::List(items) => Ok(items),
        _ => Err(mismatch(fun, index, "a list", &args[index])),
    }
}

fn pair_arg<'a>(
    fun: BuiltinFun,
    args: &'a [Value],
    index: usize,
) -> EvalResult<(&'a Constant, &'a Constant)> {
    match constant_arg(fun, args, index)? {
        Constant::Pair(fst, snd) => Ok((fst, snd)),
        _ => Err(mismatch(fun, index, "a pair", &args[index])),
    }
}

fn data_arg<'a>(fun: BuiltinFun, args: &'a [Value], index: usize) -> EvalResult<&'a Data> {
    match constant_arg(fun, args, index)? {
        Constant::Data(d) => Ok(d),
        _ => Err(mismatch(fun, index, "a data value", &args[index])),
    }
}

/// A list constant whose every element is a data constant.
fn data_list_arg(fun: BuiltinFun, args: &[Value], index: usize) -> EvalResult<Vec<Data>> {
    let items = list_arg(fun, args, index)?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Constant::Data(d) => out.push(d.clone()),
            other => {
                return Err(MachineError::TypeMismatch(format!(
                    "{fun}: expected a list of data, got element of kind {}",
                    other.kind_name()
                )))
            }
        }
    }
    Ok(out)
}
