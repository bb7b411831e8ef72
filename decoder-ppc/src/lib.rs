//! # `ppc`, operand detail for `powerpc` instructions.
//!
//! same model as the `arm` crate: the operand table of an [`Opcode`] lists its printing sites,
//! [`PpcMapper::fill`] walks them to build a [`PpcDetail`]. on top of the operands the record
//! carries the decoded branch condition and whether a record form updated `cr0`.

pub mod detail;
pub mod groups;
pub mod mapping;
pub mod regs;
pub mod table;

use decoder::{info_of, Error, ErrorKind, Instruction, Mode, OpType, RawOperand};

pub use detail::{BranchCond, CrBit, Hint, MemOperand, OpKind, PpcDetail, PpcOperand, PredCr, PredCtr};
pub use groups::{Group, OpGroup, PredPart};
pub use mapping::{regs_access, PpcMapper};
pub use regs::Reg;
pub use table::Opcode;

pub type PpcInstruction = Instruction<Opcode, PpcDetail>;

/// check that `operands` fit the operand table of `opcode`.
pub fn validate(opcode: Opcode, operands: &[RawOperand]) -> Result<(), Error> {
    let desc = opcode.desc();
    if operands.len() != desc.operands.len() {
        return Err(Error::new(ErrorKind::OperandCount));
    }

    for (idx, op) in operands.iter().enumerate() {
        match (*op, info_of(desc.operands, idx).kind) {
            (RawOperand::Empty, _) => {}
            (RawOperand::Reg(id), OpType::Reg | OpType::MemReg) => {
                if Reg::from_id(id).is_none() {
                    return Err(Error::at(ErrorKind::InvalidRegister, idx));
                }
            }
            // symbolic bases come through as immediates
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
) -> Result<PpcInstruction, Error> {
    validate(opcode, &operands)?;

    Ok(if detail {
        Instruction::new(opcode, operands, address, mode)
    } else {
        Instruction::without_detail(opcode, operands, address, mode)
    })
}
