use bitflags::bitflags;

bitflags! {
    /// How an operand is accessed by the instruction.
    #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
    pub struct Access: u8 {
        const READ  = 0b01;
        const WRITE = 0b10;
    }
}

impl Default for Access {
    fn default() -> Self {
        Access::empty()
    }
}

impl Access {
    pub const READ_WRITE: Access = Access::READ.union(Access::WRITE);

    /// Name used by detail listings, `None` for an operand that's neither read nor written.
    pub fn as_str(self) -> Option<&'static str> {
        if self == Access::READ_WRITE {
            Some("READ | WRITE")
        } else if self == Access::READ {
            Some("READ")
        } else if self == Access::WRITE {
            Some("WRITE")
        } else {
            None
        }
    }
}

/// Semantic type of a sub-operand slot.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub enum OpType {
    #[default]
    Invalid,
    Reg,
    Imm,
    /// Register that forms part of a memory operand.
    MemReg,
    /// Immediate that forms part of a memory operand.
    MemImm,
}

impl OpType {
    pub fn is_mem(self) -> bool {
        matches!(self, OpType::MemReg | OpType::MemImm)
    }
}

/// Static description of one sub-operand slot of an instruction.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub struct OpInfo {
    pub kind: OpType,
    pub access: Access,
    /// Slot this one is constrained to be equal to.
    pub tied_to: Option<u8>,
}

impl OpInfo {
    pub const fn reg(access: Access) -> Self {
        Self {
            kind: OpType::Reg,
            access,
            tied_to: None,
        }
    }

    pub const fn imm() -> Self {
        Self {
            kind: OpType::Imm,
            access: Access::READ,
            tied_to: None,
        }
    }

    pub const fn mem_reg(access: Access) -> Self {
        Self {
            kind: OpType::MemReg,
            access,
            tied_to: None,
        }
    }

    pub const fn mem_imm(access: Access) -> Self {
        Self {
            kind: OpType::MemImm,
            access,
            tied_to: None,
        }
    }

    pub const fn tied(mut self, to: u8) -> Self {
        self.tied_to = Some(to);
        self
    }
}

/// Slot description for `slot`. Slots past the end of the table belong to a trailing
/// variadic operand (register lists) and share the last entry.
pub fn info_of(ops: &[OpInfo], slot: usize) -> OpInfo {
    ops.get(slot).or(ops.last()).copied().unwrap_or_default()
}

/// Slot is constrained to another slot.
pub fn is_tied(ops: &[OpInfo], slot: usize) -> bool {
    ops.get(slot).map_or(false, |info| info.tied_to.is_some())
}

/// Another slot is constrained to this one.
pub fn is_tying(ops: &[OpInfo], slot: usize) -> bool {
    ops.iter().any(|info| info.tied_to == Some(slot as u8))
}

/// Access of `slot`, widened to read+write when the slot is part of a tied pair.
pub fn access_of(ops: &[OpInfo], slot: usize) -> Access {
    let mut access = info_of(ops, slot).access;

    if is_tied(ops, slot) || is_tying(ops, slot) {
        access |= if access == Access::READ {
            Access::WRITE
        } else {
            Access::READ
        };
    }

    access
}
