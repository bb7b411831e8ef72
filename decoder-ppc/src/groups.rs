//! operand printer groups and instruction groups.

/// which part of a `cc`/`pm`/`reg` predicate operand a site prints.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum PredPart {
    /// the condition.
    Cc,
    /// the `+`/`-` prediction hint.
    Pm,
    /// the condition register field.
    Reg,
}

/// the shape of one operand printing site.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum OpGroup {
    Operand,
    /// `ra, rb` with `ra` possibly the literal zero.
    MemRegReg,
    /// `d(ra)` with a 16 bit displacement.
    MemRegImm,
    /// `d(ra)` of the hash instructions, displacement kept as decoded.
    MemRegImmHash,
    /// `d(ra)` with a 34 bit displacement.
    MemRegImm34,
    MemRegImm34PcRel,
    UImm { bits: u8 },
    SImm { bits: u8 },
    ImmZero,
    BranchOperand,
    AbsBranchOperand,
    PredicateOperand { part: PredPart },
    CrBitMask,
    TlsCall,
    AtBitsAsHint,
}

impl OpGroup {
    /// number of consecutive raw operands the printer consumes, starting at the site's operand.
    pub fn width(&self) -> usize {
        match self {
            OpGroup::MemRegReg
            | OpGroup::MemRegImm
            | OpGroup::MemRegImmHash
            | OpGroup::MemRegImm34
            | OpGroup::MemRegImm34PcRel
            | OpGroup::PredicateOperand { .. }
            | OpGroup::TlsCall => 2,
            _ => 1,
        }
    }

    pub fn is_memory(&self) -> bool {
        matches!(
            self,
            OpGroup::MemRegReg
                | OpGroup::MemRegImm
                | OpGroup::MemRegImmHash
                | OpGroup::MemRegImm34
                | OpGroup::MemRegImm34PcRel
        )
    }
}

/// instruction group.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, Hash, PartialOrd, Ord)]
pub enum Group {
    #[default]
    Invalid,
    Jump,
    Call,
    Ret,
    Int,
    Privilege,
    BranchRelative,
    Is64Bit,
    HasFpu,
    HasAltivec,
    HasVsx,
    HasP8Vector,
    HasP9Vector,
    IsIsa3_0,
    IsIsa3_1,
    PrefixInstrs,
}

impl Group {
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Invalid => "invalid",
            Group::Jump => "jump",
            Group::Call => "call",
            Group::Ret => "return",
            Group::Int => "int",
            Group::Privilege => "privilege",
            Group::BranchRelative => "branch_relative",
            Group::Is64Bit => "is64bit",
            Group::HasFpu => "fpu",
            Group::HasAltivec => "altivec",
            Group::HasVsx => "vsx",
            Group::HasP8Vector => "p8vector",
            Group::HasP9Vector => "p9vector",
            Group::IsIsa3_0 => "isa3_0",
            Group::IsIsa3_1 => "isa3_1",
            Group::PrefixInstrs => "prefixinstrs",
        }
    }
}
