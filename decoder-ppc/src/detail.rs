//! the per-instruction detail record and the branch condition model.

use std::fmt;

use decoder::{encode_hex, Access, IdList, Operands};

use crate::groups::Group;
use crate::regs::Reg;

pub const MAX_OPERANDS: usize = 8;

/// bit of a condition register field that a branch tests.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CrBit {
    Lt,
    Gt,
    Eq,
    /// summary overflow, or unordered after a floating point compare.
    So,
}

impl CrBit {
    fn from_bits(bits: u8) -> CrBit {
        match bits & 0b11 {
            0 => CrBit::Lt,
            1 => CrBit::Gt,
            2 => CrBit::Eq,
            _ => CrBit::So,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CrBit::Lt => "lt",
            CrBit::Gt => "gt",
            CrBit::Eq => "eq",
            CrBit::So => "so",
        }
    }
}

/// condition on the tested condition register bit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PredCr {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
    Ne,
    Un,
    Nu,
}

impl PredCr {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredCr::Lt => "lt",
            PredCr::Le => "le",
            PredCr::Eq => "eq",
            PredCr::Ge => "ge",
            PredCr::Gt => "gt",
            PredCr::Ne => "ne",
            PredCr::Un => "un",
            PredCr::Nu => "nu",
        }
    }
}

/// condition on the decremented count register.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PredCtr {
    /// branch if `ctr == 0`.
    Z,
    /// branch if `ctr != 0`.
    Nz,
}

/// static branch prediction hint.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Hint {
    #[default]
    None,
    Unlikely,
    Likely,
}

impl Hint {
    /// hint from the two `at` bits.
    pub fn from_at(at: u8) -> Hint {
        match at & 0b11 {
            0b10 => Hint::Unlikely,
            0b11 => Hint::Likely,
            _ => Hint::None,
        }
    }
}

/// the condition of a conditional branch, decoded from its `bo` and `bi` fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BranchCond {
    pub bo: u8,
    pub bi: u8,
    /// condition register field holding the tested bit.
    pub crx: Reg,
    pub crx_bit: CrBit,
    /// `None` when the condition register is ignored.
    pub pred_cr: Option<PredCr>,
    /// `None` when the count register isn't decremented.
    pub pred_ctr: Option<PredCtr>,
    pub hint: Hint,
}

impl BranchCond {
    pub fn decode(bo: u8, bi: u8) -> BranchCond {
        let bo = bo & 0b11111;
        let bi = bi & 0b11111;
        let crx_bit = CrBit::from_bits(bi);

        let pred_cr = (bo & 0b10000 == 0).then(|| {
            let set = bo & 0b01000 != 0;
            match (crx_bit, set) {
                (CrBit::Lt, true) => PredCr::Lt,
                (CrBit::Lt, false) => PredCr::Ge,
                (CrBit::Gt, true) => PredCr::Gt,
                (CrBit::Gt, false) => PredCr::Le,
                (CrBit::Eq, true) => PredCr::Eq,
                (CrBit::Eq, false) => PredCr::Ne,
                (CrBit::So, true) => PredCr::Un,
                (CrBit::So, false) => PredCr::Nu,
            }
        });

        let pred_ctr = (bo & 0b00100 == 0).then(|| {
            if bo & 0b00010 != 0 {
                PredCtr::Z
            } else {
                PredCtr::Nz
            }
        });

        // `at` sits in the low bits when only the condition register is tested, and is split
        // around the `ctr` condition bit when only the count register is
        let at = match bo & 0b10100 {
            0b00100 => bo & 0b11,
            0b10000 => ((bo >> 2) & 0b10) | (bo & 1),
            _ => 0,
        };

        BranchCond {
            bo,
            bi,
            crx: Reg::cr(bi >> 2),
            crx_bit,
            pred_cr,
            pred_ctr,
            hint: Hint::from_at(at),
        }
    }

    pub fn decrements_ctr(&self) -> bool {
        self.pred_ctr.is_some()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MemOperand {
    /// invalid when the base reads as zero.
    pub base: Reg,
    /// index register of the indexed forms.
    pub offset: Reg,
    pub disp: i64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum OpKind {
    #[default]
    Invalid,
    Reg(Reg),
    Imm(i64),
    Mem(MemOperand),
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PpcOperand {
    pub kind: OpKind,
    pub access: Access,
}

impl PpcOperand {
    pub fn reg(&self) -> Option<Reg> {
        match self.kind {
            OpKind::Reg(reg) => Some(reg),
            _ => None,
        }
    }

    pub fn imm(&self) -> Option<i64> {
        match self.kind {
            OpKind::Imm(imm) => Some(imm),
            _ => None,
        }
    }

    pub fn mem(&self) -> Option<&MemOperand> {
        match &self.kind {
            OpKind::Mem(mem) => Some(mem),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PpcDetail {
    pub operands: Operands<PpcOperand, MAX_OPERANDS>,
    pub bc: Option<BranchCond>,
    /// the instruction records its result in `cr0`.
    pub update_cr0: bool,
    pub writeback: bool,
    pub regs_read: IdList<Reg, 20>,
    pub regs_write: IdList<Reg, 20>,
    pub groups: IdList<Group, 8>,
}

impl fmt::Display for PpcDetail {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "\top_count: {}", self.operands.len())?;

        for (i, op) in self.operands.iter().enumerate() {
            match op.kind {
                OpKind::Invalid => {}
                OpKind::Reg(reg) => writeln!(f, "\t\toperands[{i}].type: REG = {reg}")?,
                OpKind::Imm(imm) => {
                    writeln!(f, "\t\toperands[{i}].type: IMM = {}", encode_hex(imm))?
                }
                OpKind::Mem(mem) => {
                    writeln!(f, "\t\toperands[{i}].type: MEM")?;
                    if mem.base.is_valid() {
                        writeln!(f, "\t\t\toperands[{i}].mem.base: REG = {}", mem.base)?;
                    }
                    if mem.offset.is_valid() {
                        writeln!(f, "\t\t\toperands[{i}].mem.offset: REG = {}", mem.offset)?;
                    }
                    if mem.disp != 0 {
                        writeln!(f, "\t\t\toperands[{i}].mem.disp: {}", encode_hex(mem.disp))?;
                    }
                }
            }

            if let Some(access) = op.access.as_str() {
                writeln!(f, "\t\toperands[{i}].access: {access}")?;
            }
        }

        if let Some(bc) = self.bc {
            writeln!(f, "\tBranch:")?;
            writeln!(f, "\t\tbi: {}", bc.bi)?;
            writeln!(f, "\t\tbo: {}", bc.bo)?;
            if let Some(pred) = bc.pred_cr {
                writeln!(f, "\t\tcrX bit: {}", bc.crx_bit.as_str())?;
                writeln!(f, "\t\tcrX: {}", bc.crx)?;
                writeln!(f, "\t\tpred CR-bit: {}", pred.as_str())?;
            }
            if let Some(pred) = bc.pred_ctr {
                let pred = if pred == PredCtr::Z { "z" } else { "nz" };
                writeln!(f, "\t\tpred CTR: {pred}")?;
            }
            match bc.hint {
                Hint::None => {}
                Hint::Unlikely => writeln!(f, "\t\thint: -")?,
                Hint::Likely => writeln!(f, "\t\thint: +")?,
            }
        }

        if self.update_cr0 {
            writeln!(f, "\tUpdate-CR0: True")?;
        }

        if !self.regs_read.is_empty() {
            f.write_str("\tRegisters read:")?;
            for reg in self.regs_read.iter() {
                write!(f, " {reg}")?;
            }
            writeln!(f)?;
        }

        if !self.regs_write.is_empty() {
            f.write_str("\tRegisters modified:")?;
            for reg in self.regs_write.iter() {
                write!(f, " {reg}")?;
            }
            writeln!(f)?;
        }

        if !self.groups.is_empty() {
            f.write_str("\tGroups:")?;
            for group in self.groups.iter() {
                write!(f, " {}", group.as_str())?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
