//! Shared behaviour required between the per-architecture detail crates.

mod lists;
mod operands;
mod table;

use std::fmt;

use bitflags::bitflags;

pub use lists::{writes_any, IdList, Registers};
pub use operands::Operands;
pub use table::{access_of, info_of, is_tied, is_tying, Access, OpInfo, OpType};

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Error {
    /// What kind of error happened while building an instruction's detail.
    pub kind: ErrorKind,

    /// Index of the offending operand, if there is one.
    operand: Option<u8>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            operand: None,
        }
    }

    pub fn at(kind: ErrorKind, operand: usize) -> Self {
        Self {
            kind,
            operand: Some(operand as u8),
        }
    }

    pub fn operand(&self) -> Option<usize> {
        self.operand.map(|idx| idx as usize)
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ErrorKind {
    /// Opcode in instruction is impossible/unknown.
    InvalidOpcode,

    /// Operand in instruction is impossible/unknown.
    InvalidOperand,

    /// Register in instruction is impossible/unknown.
    InvalidRegister,

    /// Instruction carries fewer raw operands than its operand table describes.
    OperandCount,

    /// Detail was requested from an instruction decoded without it.
    DetailDisabled,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let what = match self.kind {
            ErrorKind::InvalidOpcode => "invalid opcode",
            ErrorKind::InvalidOperand => "invalid operand",
            ErrorKind::InvalidRegister => "invalid register",
            ErrorKind::OperandCount => "operand count doesn't match the operand table",
            ErrorKind::DetailDisabled => "instruction was decoded without detail",
        };

        match self.operand {
            Some(idx) => write!(f, "{what} (operand {idx})"),
            None => f.write_str(what),
        }
    }
}

impl std::error::Error for Error {}

bitflags! {
    /// Decoding mode the instruction was produced under.
    #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
    pub struct Mode: u32 {
        const THUMB      = 0b00001;
        const V8         = 0b00010;
        const MCLASS     = 0b00100;
        const BIG_ENDIAN = 0b01000;
        const MODE_64    = 0b10000;
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::empty()
    }
}

/// A decoded operand, before any interpretation by an operand printer group.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum RawOperand {
    /// Architecture register id. Zero stands for "no register".
    Reg(u16),
    Imm(i64),
    Empty,
}

/// A decoded instruction together with its (optional) detail record.
///
/// The detail record only exists when the instruction was decoded with detail requested,
/// every detail writing operation is a no-op otherwise.
#[derive(Debug, Clone)]
pub struct Instruction<O, D> {
    opcode: O,
    operands: Vec<RawOperand>,
    address: u64,
    mode: Mode,
    detail: Option<D>,
}

impl<O: Copy, D: Default> Instruction<O, D> {
    pub fn new(opcode: O, operands: Vec<RawOperand>, address: u64, mode: Mode) -> Self {
        Self {
            opcode,
            operands,
            address,
            mode,
            detail: Some(D::default()),
        }
    }

    /// Same as [`Instruction::new`] but without a detail record.
    pub fn without_detail(opcode: O, operands: Vec<RawOperand>, address: u64, mode: Mode) -> Self {
        Self {
            opcode,
            operands,
            address,
            mode,
            detail: None,
        }
    }

    pub fn opcode(&self) -> O {
        self.opcode
    }

    pub fn operands(&self) -> &[RawOperand] {
        &self.operands
    }

    pub fn address(&self) -> u64 {
        self.address
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn detail(&self) -> Option<&D> {
        self.detail.as_ref()
    }

    pub fn has_detail(&self) -> bool {
        self.detail.is_some()
    }

    /// Split the instruction into its read-only decoded half and its writable detail half.
    pub fn parts_mut(&mut self) -> (Raw<'_, O>, Option<&mut D>) {
        let raw = Raw {
            opcode: self.opcode,
            operands: &self.operands,
            address: self.address,
            mode: self.mode,
        };

        (raw, self.detail.as_mut())
    }
}

/// Read-only view of a decoded instruction.
#[derive(Debug, Clone, Copy)]
pub struct Raw<'i, O> {
    pub opcode: O,
    pub operands: &'i [RawOperand],
    pub address: u64,
    pub mode: Mode,
}

impl<'i, O: Copy> Raw<'i, O> {
    pub fn len(&self) -> usize {
        self.operands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }

    /// Raw operand at `idx`, [`RawOperand::Empty`] past the end.
    pub fn op(&self, idx: usize) -> RawOperand {
        self.operands.get(idx).copied().unwrap_or(RawOperand::Empty)
    }

    pub fn is_reg(&self, idx: usize) -> bool {
        matches!(self.op(idx), RawOperand::Reg(_))
    }

    pub fn is_imm(&self, idx: usize) -> bool {
        matches!(self.op(idx), RawOperand::Imm(_))
    }

    /// Register id at `idx`, zero if the operand isn't a register.
    pub fn reg(&self, idx: usize) -> u16 {
        match self.op(idx) {
            RawOperand::Reg(reg) => reg,
            _ => 0,
        }
    }

    /// Immediate at `idx`, zero if the operand isn't an immediate.
    pub fn imm(&self, idx: usize) -> i64 {
        match self.op(idx) {
            RawOperand::Imm(imm) => imm,
            _ => 0,
        }
    }

    pub fn is_thumb(&self) -> bool {
        self.mode.contains(Mode::THUMB)
    }
}

/// Encode 64-bit number with a leading '0x' and in lowercase.
pub fn encode_hex(imm: i64) -> String {
    if imm.is_negative() {
        format!("-{:#x}", imm.unsigned_abs())
    } else {
        format!("{imm:#x}")
    }
}
