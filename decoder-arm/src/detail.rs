//! the per-instruction detail record and its operand model.

use std::fmt;

use bitflags::bitflags;
use decoder::{encode_hex, Access, IdList, Operands};

use crate::groups::Group;
use crate::regs::Reg;

/// the largest number of operands any instruction reports.
pub const MAX_OPERANDS: usize = 36;

/// a condition code for an `arm` instruction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConditionCode {
    EQ,
    NE,
    HS,
    LO,
    MI,
    PL,
    VS,
    VC,
    HI,
    LS,
    GE,
    LT,
    GT,
    LE,
    AL,
    /// the reserved encoding `0b1111`.
    Undef,
}

impl ConditionCode {
    pub fn build(value: u8) -> ConditionCode {
        match value & 0b1111 {
            0b0000 => ConditionCode::EQ,
            0b0001 => ConditionCode::NE,
            0b0010 => ConditionCode::HS,
            0b0011 => ConditionCode::LO,
            0b0100 => ConditionCode::MI,
            0b0101 => ConditionCode::PL,
            0b0110 => ConditionCode::VS,
            0b0111 => ConditionCode::VC,
            0b1000 => ConditionCode::HI,
            0b1001 => ConditionCode::LS,
            0b1010 => ConditionCode::GE,
            0b1011 => ConditionCode::LT,
            0b1100 => ConditionCode::GT,
            0b1101 => ConditionCode::LE,
            0b1110 => ConditionCode::AL,
            _ => ConditionCode::Undef,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionCode::EQ => "eq",
            ConditionCode::NE => "ne",
            ConditionCode::HS => "hs",
            ConditionCode::LO => "lo",
            ConditionCode::MI => "mi",
            ConditionCode::PL => "pl",
            ConditionCode::VS => "vs",
            ConditionCode::VC => "vc",
            ConditionCode::HI => "hi",
            ConditionCode::LS => "ls",
            ConditionCode::GE => "ge",
            ConditionCode::LT => "lt",
            ConditionCode::GT => "gt",
            ConditionCode::LE => "le",
            ConditionCode::AL => "al",
            ConditionCode::Undef => "<und>",
        }
    }
}

/// `mve` vector predication.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Vcc {
    Then,
    Else,
}

/// option of a `dmb`, `dsb`, `isb` or `tsb`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Barrier {
    OshLd,
    OshSt,
    Osh,
    NshLd,
    NshSt,
    Nsh,
    IshLd,
    IshSt,
    Ish,
    Ld,
    St,
    Sy,
    Csync,
    /// an encoding without a name, printed as `#imm`.
    Reserved(u8),
}

impl Barrier {
    /// `dmb`/`dsb` option. the load variants only exist from armv8 onwards.
    pub fn memory(option: u8, v8: bool) -> Barrier {
        match option & 0b1111 {
            0b1111 => Barrier::Sy,
            0b1110 => Barrier::St,
            0b1101 if v8 => Barrier::Ld,
            0b1011 => Barrier::Ish,
            0b1010 => Barrier::IshSt,
            0b1001 if v8 => Barrier::IshLd,
            0b0111 => Barrier::Nsh,
            0b0110 => Barrier::NshSt,
            0b0101 if v8 => Barrier::NshLd,
            0b0011 => Barrier::Osh,
            0b0010 => Barrier::OshSt,
            0b0001 if v8 => Barrier::OshLd,
            reserved => Barrier::Reserved(reserved),
        }
    }

    /// `isb` option.
    pub fn instruction(option: u8) -> Barrier {
        match option {
            0b1111 => Barrier::Sy,
            reserved => Barrier::Reserved(reserved),
        }
    }

    /// `tsb` option.
    pub fn trace(option: u8) -> Barrier {
        match option {
            0 => Barrier::Csync,
            reserved => Barrier::Reserved(reserved),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CpsMode {
    /// interrupt enable.
    Ie,
    /// interrupt disable.
    Id,
}

bitflags! {
    /// interrupt masks affected by a `cps`.
    #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
    pub struct CpsFlags: u8 {
        const F = 0b001;
        const I = 0b010;
        const A = 0b100;
    }
}

bitflags! {
    /// fields of a status register written by an `msr`.
    #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
    pub struct PsrFields: u8 {
        const C = 0b0001;
        const X = 0b0010;
        const S = 0b0100;
        const F = 0b1000;
    }
}

/// a register bank for a banked register.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Bank {
    Usr,
    Fiq,
    Irq,
    Svc,
    Abt,
    Und,
    Mon,
    Hyp,
}

impl Bank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bank::Usr => "usr",
            Bank::Fiq => "fiq",
            Bank::Irq => "irq",
            Bank::Svc => "svc",
            Bank::Abt => "abt",
            Bank::Und => "und",
            Bank::Mon => "mon",
            Bank::Hyp => "hyp",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BankedReg {
    Reg(Bank, Reg),
    Spsr(Bank),
    ElrHyp,
}

impl BankedReg {
    /// look up the 6-bit `R:SYSm` encoding of `mrs`/`msr` (banked register).
    #[allow(non_snake_case)]
    pub fn from_encoding(encoding: u8) -> Option<BankedReg> {
        let R = encoding & 0b10_0000 != 0;
        let SYSm = encoding & 0b1_1111;

        if R {
            let bank = match SYSm {
                0b01110 => Bank::Fiq,
                0b10000 => Bank::Irq,
                0b10010 => Bank::Svc,
                0b10100 => Bank::Abt,
                0b10110 => Bank::Und,
                0b11100 => Bank::Mon,
                0b11110 => Bank::Hyp,
                _ => return None,
            };

            return Some(BankedReg::Spsr(bank));
        }

        let banked = match SYSm {
            0b00000..=0b00110 => BankedReg::Reg(Bank::Usr, Reg::gpr(8 + SYSm)),
            0b01000..=0b01110 => BankedReg::Reg(Bank::Fiq, Reg::gpr(SYSm)),
            0b10000 => BankedReg::Reg(Bank::Irq, Reg::LR),
            0b10001 => BankedReg::Reg(Bank::Irq, Reg::SP),
            0b10010 => BankedReg::Reg(Bank::Svc, Reg::LR),
            0b10011 => BankedReg::Reg(Bank::Svc, Reg::SP),
            0b10100 => BankedReg::Reg(Bank::Abt, Reg::LR),
            0b10101 => BankedReg::Reg(Bank::Abt, Reg::SP),
            0b10110 => BankedReg::Reg(Bank::Und, Reg::LR),
            0b10111 => BankedReg::Reg(Bank::Und, Reg::SP),
            0b11100 => BankedReg::Reg(Bank::Mon, Reg::LR),
            0b11101 => BankedReg::Reg(Bank::Mon, Reg::SP),
            0b11110 => BankedReg::ElrHyp,
            0b11111 => BankedReg::Reg(Bank::Hyp, Reg::SP),
            _ => return None,
        };

        Some(banked)
    }
}

impl fmt::Display for BankedReg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BankedReg::Reg(bank, reg) => match reg.number() {
                Some(n @ 8..=12) => write!(f, "r{n}_{}", bank.as_str()),
                _ => write!(f, "{reg}_{}", bank.as_str()),
            },
            BankedReg::Spsr(bank) => write!(f, "spsr_{}", bank.as_str()),
            BankedReg::ElrHyp => f.write_str("elr_hyp"),
        }
    }
}

/// flag combinations `msr` can write through the `apsr` alias.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ApsrMask {
    Nzcvq,
    G,
    Nzcvqg,
}

/// a system register operand.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SysReg {
    Apsr(ApsrMask),
    Cpsr(PsrFields),
    Spsr(PsrFields),
    /// `SYSm` value of an m-profile special register.
    MClass(u16),
    Banked(BankedReg),
}

impl fmt::Display for SysReg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (name, fields) = match self {
            SysReg::Apsr(ApsrMask::Nzcvq) => return f.write_str("apsr_nzcvq"),
            SysReg::Apsr(ApsrMask::G) => return f.write_str("apsr_g"),
            SysReg::Apsr(ApsrMask::Nzcvqg) => return f.write_str("apsr_nzcvqg"),
            SysReg::MClass(sysm) => return write!(f, "sysm_{sysm:#x}"),
            SysReg::Banked(banked) => return write!(f, "{banked}"),
            SysReg::Cpsr(fields) => ("cpsr", fields),
            SysReg::Spsr(fields) => ("spsr", fields),
        };

        f.write_str(name)?;
        if !fields.is_empty() {
            f.write_str("_")?;
        }

        for (flag, chr) in [
            (PsrFields::F, "f"),
            (PsrFields::S, "s"),
            (PsrFields::X, "x"),
            (PsrFields::C, "c"),
        ] {
            if fields.contains(flag) {
                f.write_str(chr)?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Endian {
    Big,
    Little,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum ShiftKind {
    #[default]
    Invalid,
    Asr,
    Lsl,
    Lsr,
    Ror,
    Rrx,
    Uxtw,
    /// shifted by the register whose id is the shift value.
    AsrReg,
    LslReg,
    LsrReg,
    RorReg,
    RrxReg,
}

impl ShiftKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftKind::Invalid => "invalid",
            ShiftKind::Asr | ShiftKind::AsrReg => "asr",
            ShiftKind::Lsl | ShiftKind::LslReg => "lsl",
            ShiftKind::Lsr | ShiftKind::LsrReg => "lsr",
            ShiftKind::Ror | ShiftKind::RorReg => "ror",
            ShiftKind::Rrx | ShiftKind::RrxReg => "rrx",
            ShiftKind::Uxtw => "uxtw",
        }
    }

    pub fn by_register(&self) -> bool {
        matches!(
            self,
            ShiftKind::AsrReg
                | ShiftKind::LslReg
                | ShiftKind::LsrReg
                | ShiftKind::RorReg
                | ShiftKind::RrxReg
        )
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Shift {
    pub kind: ShiftKind,
    pub value: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MemOperand {
    pub base: Reg,
    pub index: Reg,
    pub scale: i32,
    pub disp: i32,
    /// left shift applied to the index register.
    pub lshift: u32,
    /// alignment of the access in bytes, zero if unspecified.
    pub align: u32,
}

impl Default for MemOperand {
    fn default() -> Self {
        Self {
            base: Reg::INVALID,
            index: Reg::INVALID,
            scale: 1,
            disp: 0,
            lshift: 0,
            align: 0,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub enum OpKind {
    #[default]
    Invalid,
    Reg(Reg),
    Imm(i64),
    /// coprocessor register `c{n}`.
    CImm(u8),
    /// coprocessor `p{n}`.
    PImm(u8),
    Fp(f64),
    Mem(MemOperand),
    SysReg(SysReg),
    SetEnd(Endian),
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ArmOperand {
    pub kind: OpKind,
    pub access: Access,
    pub shift: Shift,
    /// lane selected by a scalar `d[x]` operand.
    pub vector_index: Option<u8>,
    /// lane of a neon load/store single element.
    pub neon_lane: Option<u8>,
    /// offset or index register is subtracted from the base.
    pub subtracted: bool,
}

impl ArmOperand {
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
pub struct ArmDetail {
    pub operands: Operands<ArmOperand, MAX_OPERANDS>,
    /// condition of a predicated instruction, `None` if it can't be predicated.
    pub cc: Option<ConditionCode>,
    pub vcc: Option<Vcc>,
    pub update_flags: bool,
    pub writeback: bool,
    pub post_index: bool,
    /// load/store with user mode privileges (`ldrt`, `strbt`, ...).
    pub usermode: bool,
    pub mem_barrier: Option<Barrier>,
    pub cps_mode: Option<CpsMode>,
    pub cps_flag: Option<CpsFlags>,
    /// `it`/`vpt` block mask, as encoded.
    pub pred_mask: u8,
    pub regs_read: IdList<Reg, 20>,
    pub regs_write: IdList<Reg, 20>,
    pub groups: IdList<Group, 8>,
}

impl ArmDetail {
    /// then (`true`) / else (`false`) sequence of the instructions following an `it` or `vpt`.
    pub fn pred_block(&self) -> Vec<bool> {
        let mask = self.pred_mask & 0b1111;
        if mask == 0 {
            return Vec::new();
        }

        let tz = mask.trailing_zeros();
        (tz + 1..4).rev().map(|pos| (mask >> pos) & 1 == 0).collect()
    }
}

impl fmt::Display for ArmDetail {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "\top_count: {}", self.operands.len())?;

        for (i, op) in self.operands.iter().enumerate() {
            match op.kind {
                OpKind::Invalid => {}
                OpKind::Reg(reg) => writeln!(f, "\t\toperands[{i}].type: REG = {reg}")?,
                OpKind::Imm(imm) => {
                    writeln!(f, "\t\toperands[{i}].type: IMM = {}", encode_hex(imm))?
                }
                OpKind::CImm(imm) => writeln!(f, "\t\toperands[{i}].type: C-IMM = {imm}")?,
                OpKind::PImm(imm) => writeln!(f, "\t\toperands[{i}].type: P-IMM = {imm}")?,
                OpKind::Fp(fp) => writeln!(f, "\t\toperands[{i}].type: FP = {fp:.6}")?,
                OpKind::SysReg(sysreg) => writeln!(f, "\t\toperands[{i}].type: SYSREG = {sysreg}")?,
                OpKind::SetEnd(Endian::Big) => writeln!(f, "\t\toperands[{i}].type: SETEND = be")?,
                OpKind::SetEnd(Endian::Little) => {
                    writeln!(f, "\t\toperands[{i}].type: SETEND = le")?
                }
                OpKind::Mem(mem) => {
                    writeln!(f, "\t\toperands[{i}].type: MEM")?;
                    if mem.base.is_valid() {
                        writeln!(f, "\t\t\toperands[{i}].mem.base: REG = {}", mem.base)?;
                    }
                    if mem.index.is_valid() {
                        writeln!(f, "\t\t\toperands[{i}].mem.index: REG = {}", mem.index)?;
                    }
                    if mem.scale != 1 {
                        writeln!(f, "\t\t\toperands[{i}].mem.scale: {}", mem.scale)?;
                    }
                    if mem.disp != 0 {
                        writeln!(f, "\t\t\toperands[{i}].mem.disp: {:#x}", mem.disp)?;
                    }
                    if mem.lshift != 0 {
                        writeln!(f, "\t\t\toperands[{i}].mem.lshift: {:#x}", mem.lshift)?;
                    }
                    if mem.align != 0 {
                        writeln!(f, "\t\t\toperands[{i}].mem.align: {}", mem.align)?;
                    }
                }
            }

            if let Some(access) = op.access.as_str() {
                writeln!(f, "\t\toperands[{i}].access: {access}")?;
            }

            if let Some(lane) = op.neon_lane {
                writeln!(f, "\t\toperands[{i}].neon_lane = {lane}")?;
            }

            if op.shift.kind != ShiftKind::Invalid {
                if op.shift.kind.by_register() {
                    let reg = Reg::from_id(op.shift.value as u16).unwrap_or(Reg::INVALID);
                    writeln!(f, "\t\t\tShift: {} = {reg}", op.shift.kind.as_str())?;
                } else {
                    let (kind, value) = (op.shift.kind.as_str(), op.shift.value);
                    writeln!(f, "\t\t\tShift: {kind} = {value}")?;
                }
            }

            if let Some(idx) = op.vector_index {
                writeln!(f, "\t\toperands[{i}].vector_index = {idx}")?;
            }

            if op.subtracted {
                writeln!(f, "\t\tSubtracted: True")?;
            }
        }

        if let Some(cc) = self.cc.filter(|cc| *cc != ConditionCode::AL) {
            writeln!(f, "\tCode condition: {}", cc.as_str())?;
        }

        if let Some(vcc) = self.vcc {
            let vcc = if vcc == Vcc::Then { "t" } else { "e" };
            writeln!(f, "\tVector code condition: {vcc}")?;
        }

        if self.update_flags {
            writeln!(f, "\tUpdate-flags: True")?;
        }

        if self.writeback {
            if self.post_index {
                writeln!(f, "\tWrite-back: Post")?;
            } else {
                writeln!(f, "\tWrite-back: Pre")?;
            }
        }

        if let Some(mode) = self.cps_mode {
            let mode = if mode == CpsMode::Ie { "ie" } else { "id" };
            writeln!(f, "\tCPSI-mode: {mode}")?;
        }

        if let Some(flags) = self.cps_flag {
            writeln!(f, "\tCPSI-flag: {:#x}", flags.bits())?;
        }

        if let Some(barrier) = self.mem_barrier {
            writeln!(f, "\tMemory-barrier: {barrier:?}")?;
        }

        if self.pred_mask != 0 {
            writeln!(f, "\tPredicate Mask: {:#x}", self.pred_mask)?;
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
