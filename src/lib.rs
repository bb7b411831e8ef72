//! # `opdetail`, per-operand detail for decoded `arm` and `powerpc` instructions.
//!
//! a [`Handle`] fixes the architecture, the decoding mode and whether detail is wanted, either
//! explicitly or from the user's `config.yaml`. it checks raw decoded instructions against the
//! operand tables of their opcode and fills their detail record.
//!
//! ```ignore
//! let handle = Handle::new(Arch::Ppc, Mode::BIG_ENDIAN);
//! let insn = handle.decode(ppc::Opcode::LWZ as u16, operands, 0x1000)?;
//! println!("{}", insn.detail()?);
//! ```

use std::fmt;

pub use config::{Arch, Config};
pub use decoder::{Error, ErrorKind, Mode, RawOperand, Registers};

/// a decoded instruction of either architecture.
#[derive(Debug, Clone)]
pub enum Instruction {
    Arm(arm::ArmInstruction),
    Ppc(ppc::PpcInstruction),
}

/// borrowed detail record of an [`Instruction`].
#[derive(Debug, Clone, Copy)]
pub enum Detail<'a> {
    Arm(&'a arm::ArmDetail),
    Ppc(&'a ppc::PpcDetail),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    Arm(arm::Reg),
    Ppc(ppc::Reg),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle {
    arch: Arch,
    mode: Mode,
    detail: bool,
}

impl Handle {
    pub fn new(arch: Arch, mode: Mode) -> Self {
        Self {
            arch,
            mode,
            detail: true,
        }
    }

    /// handle described by the user's `config.yaml`.
    pub fn from_config() -> Self {
        Self::from(&*config::CONFIG)
    }

    pub fn with_detail(mut self, detail: bool) -> Self {
        self.detail = detail;
        self
    }

    pub fn arch(&self) -> Arch {
        self.arch
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn detail(&self) -> bool {
        self.detail
    }

    /// build an instruction from its opcode id and raw operands, and fill its detail.
    pub fn decode(
        &self,
        opcode: u16,
        operands: Vec<RawOperand>,
        address: u64,
    ) -> Result<Instruction, Error> {
        let invalid = || Error::new(ErrorKind::InvalidOpcode);

        match self.arch {
            Arch::Arm => self.arm(arm::Opcode::from_id(opcode).ok_or_else(invalid)?, operands, address),
            Arch::Ppc => self.ppc(ppc::Opcode::from_id(opcode).ok_or_else(invalid)?, operands, address),
        }
    }

    pub fn arm(
        &self,
        opcode: arm::Opcode,
        operands: Vec<RawOperand>,
        address: u64,
    ) -> Result<Instruction, Error> {
        if self.arch != Arch::Arm {
            log::trace!("[opdetail::arm] handle is set up for {:?}", self.arch);
            return Err(Error::new(ErrorKind::InvalidOpcode));
        }

        let mut insn = arm::instruction(opcode, operands, address, self.mode, self.detail)?;
        arm::ArmMapper::fill(&mut insn);
        Ok(Instruction::Arm(insn))
    }

    pub fn ppc(
        &self,
        opcode: ppc::Opcode,
        operands: Vec<RawOperand>,
        address: u64,
    ) -> Result<Instruction, Error> {
        if self.arch != Arch::Ppc {
            log::trace!("[opdetail::ppc] handle is set up for {:?}", self.arch);
            return Err(Error::new(ErrorKind::InvalidOpcode));
        }

        let mut insn = ppc::instruction(opcode, operands, address, self.mode, self.detail)?;
        ppc::PpcMapper::fill(&mut insn);
        Ok(Instruction::Ppc(insn))
    }
}

impl From<&Config> for Handle {
    fn from(config: &Config) -> Self {
        Handle::new(config.arch, config.mode).with_detail(config.detail)
    }
}

impl Instruction {
    pub fn arch(&self) -> Arch {
        match self {
            Instruction::Arm(_) => Arch::Arm,
            Instruction::Ppc(_) => Arch::Ppc,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Arm(insn) => insn.opcode().mnemonic(),
            Instruction::Ppc(insn) => insn.opcode().mnemonic(),
        }
    }

    pub fn address(&self) -> u64 {
        match self {
            Instruction::Arm(insn) => insn.address(),
            Instruction::Ppc(insn) => insn.address(),
        }
    }

    pub fn detail(&self) -> Result<Detail<'_>, Error> {
        let disabled = || Error::new(ErrorKind::DetailDisabled);

        match self {
            Instruction::Arm(insn) => insn.detail().map(Detail::Arm).ok_or_else(disabled),
            Instruction::Ppc(insn) => insn.detail().map(Detail::Ppc).ok_or_else(disabled),
        }
    }

    /// every register read and written, implicit ones first and without duplicates.
    pub fn regs_access(&self) -> Result<Registers<Reg>, Error> {
        Ok(match self.detail()? {
            Detail::Arm(detail) => wrap(arm::regs_access(detail), Reg::Arm),
            Detail::Ppc(detail) => wrap(ppc::regs_access(detail), Reg::Ppc),
        })
    }
}

fn wrap<R>(regs: Registers<R>, f: fn(R) -> Reg) -> Registers<Reg> {
    Registers {
        read: regs.read.into_iter().map(f).collect(),
        write: regs.write.into_iter().map(f).collect(),
    }
}

impl fmt::Display for Detail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Detail::Arm(detail) => detail.fmt(f),
            Detail::Ppc(detail) => detail.fmt(f),
        }
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Reg::Arm(reg) => reg.fmt(f),
            Reg::Ppc(reg) => reg.fmt(f),
        }
    }
}
