//! Versioned per-builtin cost models.
//!
//! A cost model maps every supported builtin to a pair of costing formulas
//! (memory and CPU) evaluated over the sizes of the finalized arguments.
//! Two historical protocol eras are provided; the caller selects one per
//! evaluation. A builtin missing from the selected model is a
//! configuration error surfaced before evaluation starts, never a silent
//! default.

use crate::budget::ExBudget;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uplx_term::BuiltinFun;

/// The protocol era a cost model belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CostModelVersion {
    V1,
    V2,
}

impl fmt::Display for CostModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostModelVersion::V1 => f.write_str("V1"),
            CostModelVersion::V2 => f.write_str("V2"),
        }
    }
}

/// A costing formula over argument sizes.
///
/// `X`, `Y`, `Z` refer to the sizes (in 64-bit words) of the first, second,
/// and third argument; a missing position contributes zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostingFun {
    Constant(u64),
    LinearInX { intercept: u64, slope: u64 },
    LinearInY { intercept: u64, slope: u64 },
    LinearInZ { intercept: u64, slope: u64 },
    LinearInTotal { intercept: u64, slope: u64 },
    LinearInMax { intercept: u64, slope: u64 },
    LinearInMin { intercept: u64, slope: u64 },
}

impl CostingFun {
    /// Evaluate the formula against the argument sizes.
    pub fn eval(&self, sizes: &[u64]) -> u64 {
        let at = |i: usize| sizes.get(i).copied().unwrap_or(0);
        match *self {
            CostingFun::Constant(c) => c,
            CostingFun::LinearInX { intercept, slope } => {
                intercept.saturating_add(slope.saturating_mul(at(0)))
            }
            CostingFun::LinearInY { intercept, slope } => {
                intercept.saturating_add(slope.saturating_mul(at(1)))
            }
            CostingFun::LinearInZ { intercept, slope } => {
                intercept.saturating_add(slope.saturating_mul(at(2)))
            }
            CostingFun::LinearInTotal { intercept, slope } => {
                let total = sizes.iter().fold(0u64, |acc, s| acc.saturating_add(*s));
                intercept.saturating_add(slope.saturating_mul(total))
            }
            CostingFun::LinearInMax { intercept, slope } => {
                let max = sizes.iter().copied().max().unwrap_or(0);
                intercept.saturating_add(slope.saturating_mul(max))
            }
            CostingFun::LinearInMin { intercept, slope } => {
                let min = sizes.iter().copied().min().unwrap_or(0);
                intercept.saturating_add(slope.saturating_mul(min))
            }
        }
    }
}

/// The memory and CPU formulas for one builtin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltinCost {
    pub mem: CostingFun,
    pub cpu: CostingFun,
}

impl BuiltinCost {
    /// Charge for one application with the given finalized argument sizes.
    pub fn charge(&self, sizes: &[u64]) -> ExBudget {
        ExBudget {
            mem: self.mem.eval(sizes),
            cpu: self.cpu.eval(sizes),
        }
    }
}

/// A complete per-builtin cost table for one protocol era.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    version: CostModelVersion,
    table: BTreeMap<BuiltinFun, BuiltinCost>,
}

impl CostModel {
    pub fn version(&self) -> CostModelVersion {
        self.version
    }

    /// Whether the model costs the given builtin at all.
    pub fn supports(&self, fun: BuiltinFun) -> bool {
        self.table.contains_key(&fun)
    }

    pub fn cost_of(&self, fun: BuiltinFun) -> Option<&BuiltinCost> {
        self.table.get(&fun)
    }

    fn set(&mut self, fun: BuiltinFun, mem: CostingFun, cpu: CostingFun) {
        self.table.insert(fun, BuiltinCost { mem, cpu });
    }

    /// The first-era cost model. Does not cost the secp256k1 verifiers.
    pub fn v1() -> CostModel {
        use BuiltinFun::*;
        use CostingFun::*;

        let mut m = CostModel {
            version: CostModelVersion::V1,
            table: BTreeMap::new(),
        };

        let max11 = LinearInMax {
            intercept: 1,
            slope: 1,
        };
        let size_cell = Constant(32);

        m.set(
            AddInteger,
            max11,
            LinearInMax {
                intercept: 205_665,
                slope: 812,
            },
        );
        m.set(
            SubtractInteger,
            max11,
            LinearInMax {
                intercept: 205_665,
                slope: 812,
            },
        );
        m.set(
            MultiplyInteger,
            LinearInTotal {
                intercept: 0,
                slope: 1,
            },
            LinearInTotal {
                intercept: 69_522,
                slope: 11_687,
            },
        );
        for fun in [DivideInteger, QuotientInteger, RemainderInteger, ModInteger] {
            m.set(
                fun,
                LinearInMax {
                    intercept: 0,
                    slope: 1,
                },
                LinearInTotal {
                    intercept: 196_500,
                    slope: 453,
                },
            );
        }
        for fun in [EqualsInteger, LessThanInteger, LessThanEqualsInteger] {
            m.set(
                fun,
                Constant(1),
                LinearInMin {
                    intercept: 208_512,
                    slope: 421,
                },
            );
        }

        m.set(
            AppendByteString,
            LinearInTotal {
                intercept: 0,
                slope: 1,
            },
            LinearInTotal {
                intercept: 1_000,
                slope: 571,
            },
        );
        m.set(
            ConsByteString,
            LinearInTotal {
                intercept: 0,
                slope: 1,
            },
            LinearInY {
                intercept: 221_973,
                slope: 511,
            },
        );
        m.set(
            SliceByteString,
            LinearInZ {
                intercept: 4,
                slope: 1,
            },
            Constant(265_318),
        );
        m.set(LengthOfByteString, Constant(10), Constant(1_000));
        m.set(IndexByteString, Constant(4), Constant(57_667));
        for fun in [
            EqualsByteString,
            LessThanByteString,
            LessThanEqualsByteString,
        ] {
            m.set(
                fun,
                Constant(1),
                LinearInMin {
                    intercept: 197_145,
                    slope: 156,
                },
            );
        }

        m.set(
            Sha2_256,
            Constant(4),
            LinearInX {
                intercept: 806_990,
                slope: 30_482,
            },
        );
        m.set(
            Sha3_256,
            Constant(4),
            LinearInX {
                intercept: 1_927_926,
                slope: 82_523,
            },
        );
        m.set(
            Blake2b_256,
            Constant(4),
            LinearInX {
                intercept: 117_366,
                slope: 10_475,
            },
        );
        m.set(
            VerifyEd25519Signature,
            Constant(10),
            LinearInY {
                intercept: 57_996_947,
                slope: 18_975,
            },
        );

        m.set(
            AppendString,
            LinearInTotal {
                intercept: 4,
                slope: 1,
            },
            LinearInTotal {
                intercept: 1_000,
                slope: 24_177,
            },
        );
        m.set(
            EqualsString,
            Constant(1),
            LinearInMin {
                intercept: 187_000,
                slope: 1_000,
            },
        );
        m.set(
            EncodeUtf8,
            LinearInX {
                intercept: 4,
                slope: 2,
            },
            LinearInX {
                intercept: 1_000,
                slope: 28_662,
            },
        );
        m.set(
            DecodeUtf8,
            LinearInX {
                intercept: 4,
                slope: 2,
            },
            LinearInX {
                intercept: 497_525,
                slope: 14_068,
            },
        );

        m.set(IfThenElse, Constant(1), Constant(80_556));
        m.set(ChooseUnit, Constant(4), Constant(46_417));
        m.set(Trace, size_cell, Constant(212_342));

        m.set(FstPair, size_cell, Constant(80_436));
        m.set(SndPair, size_cell, Constant(80_436));

        m.set(ChooseList, size_cell, Constant(175_354));
        m.set(MkCons, size_cell, Constant(65_493));
        m.set(HeadList, size_cell, Constant(43_249));
        m.set(TailList, size_cell, Constant(41_182));
        m.set(NullList, size_cell, Constant(60_091));

        m.set(ChooseData, size_cell, Constant(19_537));
        m.set(ConstrData, size_cell, Constant(89_141));
        m.set(MapData, size_cell, Constant(64_832));
        m.set(ListData, size_cell, Constant(52_467));
        m.set(IData, size_cell, Constant(1_000));
        m.set(BData, size_cell, Constant(1_000));
        m.set(UnConstrData, size_cell, Constant(32_696));
        m.set(UnMapData, size_cell, Constant(38_314));
        m.set(UnListData, size_cell, Constant(32_247));
        m.set(UnIData, size_cell, Constant(43_357));
        m.set(UnBData, size_cell, Constant(31_220));
        m.set(
            EqualsData,
            Constant(1),
            LinearInMin {
                intercept: 1_060_367,
                slope: 12_586,
            },
        );
        m.set(MkPairData, size_cell, Constant(76_511));
        m.set(MkNilData, size_cell, Constant(22_558));
        m.set(MkNilPairData, size_cell, Constant(16_563));

        m
    }

    /// The second-era cost model: the V1 table with re-tuned crypto and
    /// division costs, plus the secp256k1 verifiers.
    pub fn v2() -> CostModel {
        use BuiltinFun::*;
        use CostingFun::*;

        let mut m = CostModel::v1();
        m.version = CostModelVersion::V2;

        for fun in [DivideInteger, QuotientInteger, RemainderInteger, ModInteger] {
            m.set(
                fun,
                LinearInMax {
                    intercept: 0,
                    slope: 1,
                },
                LinearInTotal {
                    intercept: 85_848,
                    slope: 123,
                },
            );
        }
        m.set(
            Blake2b_256,
            Constant(4),
            LinearInX {
                intercept: 201_305,
                slope: 8_356,
            },
        );
        m.set(
            VerifyEd25519Signature,
            Constant(10),
            LinearInY {
                intercept: 57_996_947,
                slope: 18_975,
            },
        );
        m.set(
            VerifyEcdsaSecp256k1Signature,
            Constant(10),
            Constant(35_892_428),
        );
        m.set(
            VerifySchnorrSecp256k1Signature,
            Constant(10),
            LinearInY {
                intercept: 38_887_044,
                slope: 32_947,
            },
        );

        m
    }
}
