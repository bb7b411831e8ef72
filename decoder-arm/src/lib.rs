//! # `arm`, operand detail for `arm`, `thumb`, `neon` and `mve` instructions.
//!
//! an instruction arrives as an [`Opcode`] with its raw operands. the operand table of the
//! opcode lists the printing sites of the instruction, [`ArmMapper::fill`] walks them and
//! builds the [`ArmDetail`] record: typed operands with their access, shifts and memory
//! components, plus the implicit register effects and groups.

pub mod addressing;
pub mod detail;
pub mod groups;
pub mod mapping;
pub mod regs;
pub mod table;

use decoder::{info_of, Error, ErrorKind, Instruction, Mode, OpType, RawOperand};
use detail::MAX_OPERANDS;

pub use detail::{ArmDetail, ArmOperand, ConditionCode, MemOperand, OpKind, Shift, ShiftKind};
pub use groups::{Group, OpGroup};
pub use mapping::{regs_access, ArmMapper};
pub use regs::Reg;
pub use table::Opcode;

pub type ArmInstruction = Instruction<Opcode, ArmDetail>;

/// a register list names each core register at most once.
const MAX_LIST_REGS: usize = 16;

/// check that `operands` fit the operand table of `opcode`.
pub fn validate(opcode: Opcode, operands: &[RawOperand]) -> Result<(), Error> {
    let desc = opcode.desc();
    let expected = desc.operands.len();

    if operands.len() < expected || (!desc.variadic && operands.len() != expected) {
        return Err(Error::new(ErrorKind::OperandCount));
    }

    // the list starts at the last slot of the table
    if desc.variadic {
        let list = operands.len() + 1 - expected;
        if list > MAX_LIST_REGS || operands.len() > MAX_OPERANDS {
            return Err(Error::new(ErrorKind::OperandCount));
        }
    }

    for (idx, op) in operands.iter().enumerate() {
        let kind = info_of(desc.operands, idx).kind;
        match (*op, kind) {
            (RawOperand::Empty, _) => {}
            (RawOperand::Reg(id), OpType::Reg | OpType::MemReg) => {
                if Reg::from_id(id).is_none() {
                    return Err(Error::at(ErrorKind::InvalidRegister, idx));
                }
            }
            // a label stands in for the base register of pc relative loads
            (RawOperand::Imm(_), OpType::Imm | OpType::MemImm | OpType::MemReg) => {}
            _ => return Err(Error::at(ErrorKind::InvalidOperand, idx)),
        }
    }

    Ok(())
}

/// a checked instruction, with an empty detail record when `detail` is set.
pub fn instruction(
    opcode: Opcode,
    operands: Vec<RawOperand>,
    address: u64,
    mode: Mode,
    detail: bool,
) -> Result<ArmInstruction, Error> {
    validate(opcode, &operands)?;

    Ok(if detail {
        Instruction::new(opcode, operands, address, mode)
    } else {
        Instruction::without_detail(opcode, operands, address, mode)
    })
}
