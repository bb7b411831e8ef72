//! static per-opcode operand layout, printing sites and implicit effects.

use bitflags::bitflags;
use decoder::{Access, OpInfo, OpType};

use crate::groups::{Group, OpGroup, PredPart};
use crate::regs::Reg;

bitflags! {
    #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
    pub struct InsnFlags: u16 {
        const BRANCH          = 1 << 0;
        const INDIRECT_BRANCH = 1 << 1;
        const CALL            = 1 << 2;
        const RETURN          = 1 << 3;
        /// the `u` forms, the effective address is written back to the base register.
        const WRITEBACK       = 1 << 4;
        const STORE           = 1 << 5;
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct Site {
    pub group: OpGroup,
    pub op: u8,
}

/// where a field of the branch condition comes from.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Field {
    /// fixed by the opcode (`bdnz`, `bt`).
    Const(u8),
    /// taken from a raw operand, an immediate or a condition register bit.
    Slot(u8),
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct BcFields {
    pub bo: Field,
    pub bi: Field,
}

#[derive(Debug)]
pub struct InsnDesc {
    pub mnemonic: &'static str,
    pub operands: &'static [OpInfo],
    pub sites: &'static [Site],
    pub uses: &'static [Reg],
    pub defs: &'static [Reg],
    pub groups: &'static [Group],
    pub flags: InsnFlags,
    /// `bo`/`bi` of branches that spell them out instead of through a predicate operand.
    pub bc: Option<BcFields>,
    /// slots of a vsx register class, bit `n` for slot `n`.
    pub vsx: u8,
}

const fn insn(
    mnemonic: &'static str,
    operands: &'static [OpInfo],
    sites: &'static [Site],
) -> InsnDesc {
    InsnDesc {
        mnemonic,
        operands,
        sites,
        uses: &[],
        defs: &[],
        groups: &[],
        flags: InsnFlags::empty(),
        bc: None,
        vsx: 0,
    }
}

impl InsnDesc {
    const fn uses(mut self, uses: &'static [Reg]) -> Self {
        self.uses = uses;
        self
    }

    const fn defs(mut self, defs: &'static [Reg]) -> Self {
        self.defs = defs;
        self
    }

    const fn groups(mut self, groups: &'static [Group]) -> Self {
        self.groups = groups;
        self
    }

    const fn flags(mut self, flags: InsnFlags) -> Self {
        self.flags = flags;
        self
    }

    const fn bc(mut self, bo: Field, bi: Field) -> Self {
        self.bc = Some(BcFields { bo, bi });
        self
    }

    const fn vsx(mut self, slots: u8) -> Self {
        self.vsx = slots;
        self
    }

    pub fn is_branch(&self) -> bool {
        self.flags.intersects(InsnFlags::BRANCH | InsnFlags::INDIRECT_BRANCH)
    }

    pub fn is_vsx_slot(&self, slot: usize) -> bool {
        slot < 8 && self.vsx & (1 << slot) != 0
    }
}

const DEF: OpInfo = OpInfo::reg(Access::WRITE);
const USE: OpInfo = OpInfo::reg(Access::READ);
const IMM: OpInfo = OpInfo::imm();
const MEM_REG: OpInfo = OpInfo::mem_reg(Access::READ);
const MEM_IMM: OpInfo = OpInfo::mem_imm(Access::READ);
/// predicate code, `(bi << 5) | bo`.
const PRED: OpInfo = OpInfo::imm();

macro_rules! tied {
    ($kind:ident, $to:literal) => {
        OpInfo {
            kind: OpType::$kind,
            access: Access::READ,
            tied_to: Some($to),
        }
    };
}

macro_rules! s {
    ($group:ident, $op:literal) => {
        Site {
            group: OpGroup::$group,
            op: $op,
        }
    };
    ($group:ident { $($field:ident: $value:expr),* }, $op:literal) => {
        Site {
            group: OpGroup::$group { $($field: $value),* },
            op: $op,
        }
    };
}

macro_rules! opcodes {
    ($($name:ident => $desc:expr,)*) => {
        #[allow(non_camel_case_types)]
        #[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum Opcode {
            $($name,)*
        }

        impl Opcode {
            pub const ALL: &'static [Opcode] = &[$(Opcode::$name,)*];
        }

        static INSNS: &[InsnDesc] = &[$($desc,)*];
    };
}

impl Opcode {
    pub fn from_id(id: u16) -> Option<Opcode> {
        Opcode::ALL.get(id as usize).copied()
    }

    pub fn desc(self) -> &'static InsnDesc {
        &INSNS[self as usize]
    }

    pub fn mnemonic(self) -> &'static str {
        self.desc().mnemonic
    }

    /// branch whose target field is an absolute address (`aa` set).
    pub fn is_abs_branch(self) -> bool {
        ABS_BRANCHES.contains(&self)
    }
}

pub static ABS_BRANCHES: &[Opcode] = &[
    Opcode::BA,
    Opcode::BCCA,
    Opcode::BCCLA,
    Opcode::BDNZA,
    Opcode::BDZA,
    Opcode::BLA,
    Opcode::gBCA,
    Opcode::gBCLA,
];

const OPS3: &[Site] = &[s!(Operand, 0), s!(Operand, 1), s!(Operand, 2)];
const PREDICATE: &[Site] = &[
    s!(PredicateOperand { part: PredPart::Cc }, 0),
    s!(PredicateOperand { part: PredPart::Pm }, 0),
    s!(PredicateOperand { part: PredPart::Reg }, 0),
];
const PREDICATE_REL: &[Site] = &[
    s!(PredicateOperand { part: PredPart::Cc }, 0),
    s!(PredicateOperand { part: PredPart::Pm }, 0),
    s!(PredicateOperand { part: PredPart::Reg }, 0),
    s!(BranchOperand, 2),
];
const PREDICATE_ABS: &[Site] = &[
    s!(PredicateOperand { part: PredPart::Cc }, 0),
    s!(PredicateOperand { part: PredPart::Pm }, 0),
    s!(PredicateOperand { part: PredPart::Reg }, 0),
    s!(AbsBranchOperand, 2),
];

const BO_CTR_NZ: Field = Field::Const(16);
const BO_CTR_Z: Field = Field::Const(18);
const BO_TRUE: Field = Field::Const(12);
const BO_FALSE: Field = Field::Const(4);

const CR0: &[Reg] = &[Reg::CR0];
const CR1: &[Reg] = &[Reg::CR1];
const CARRY: &[Reg] = &[Reg::CARRY];
const CTR: &[Reg] = &[Reg::CTR];
const LR: &[Reg] = &[Reg::LR];
const RM: &[Reg] = &[Reg::RM];

const REL: &[Group] = &[Group::BranchRelative];
const CALL_REL: &[Group] = &[Group::Call, Group::BranchRelative];
const CALL: &[Group] = &[Group::Call];
const RET: &[Group] = &[Group::Ret];
const PPC64: &[Group] = &[Group::Is64Bit];
const FPU: &[Group] = &[Group::HasFpu];
const VSX: &[Group] = &[Group::HasVsx];
const P9_VECTOR: &[Group] = &[Group::HasVsx, Group::HasP9Vector];
const PREFIXED: &[Group] = &[Group::IsIsa3_1, Group::PrefixInstrs];

const BRANCH: InsnFlags = InsnFlags::BRANCH;
const INDIRECT: InsnFlags = InsnFlags::BRANCH.union(InsnFlags::INDIRECT_BRANCH);
const RETURN: InsnFlags = INDIRECT.union(InsnFlags::RETURN);
const CALLS: InsnFlags = InsnFlags::CALL;

opcodes! {
    // fixed point
    ADDI => insn("addi", &[DEF, USE, IMM], &[
        s!(Operand, 0), s!(Operand, 1), s!(SImm { bits: 16 }, 2),
    ]),
    ADDIS => insn("addis", &[DEF, USE, IMM], &[
        s!(Operand, 0), s!(Operand, 1), s!(SImm { bits: 16 }, 2),
    ]),
    ADD4 => insn("add", &[DEF, USE, USE], OPS3),
    ADD4_rec => insn("add.", &[DEF, USE, USE], OPS3).defs(CR0),
    SUBF => insn("subf", &[DEF, USE, USE], OPS3),
    OR => insn("or", &[DEF, USE, USE], OPS3),
    OR_rec => insn("or.", &[DEF, USE, USE], OPS3).defs(CR0),
    ADDIC => insn("addic", &[DEF, USE, IMM], &[
        s!(Operand, 0), s!(Operand, 1), s!(SImm { bits: 16 }, 2),
    ]).defs(CARRY),
    ADDIC_rec => insn("addic.", &[DEF, USE, IMM], &[
        s!(Operand, 0), s!(Operand, 1), s!(SImm { bits: 16 }, 2),
    ]).defs(&[Reg::CARRY, Reg::CR0]),
    ANDI_rec => insn("andi.", &[DEF, USE, IMM], &[
        s!(Operand, 0), s!(Operand, 1), s!(UImm { bits: 16 }, 2),
    ]).defs(CR0),
    ORI => insn("ori", &[DEF, USE, IMM], &[
        s!(Operand, 0), s!(Operand, 1), s!(UImm { bits: 16 }, 2),
    ]),
    ORIS => insn("oris", &[DEF, USE, IMM], &[
        s!(Operand, 0), s!(Operand, 1), s!(UImm { bits: 16 }, 2),
    ]),
    RLWINM => insn("rlwinm", &[DEF, USE, IMM, IMM, IMM], &[
        s!(Operand, 0), s!(Operand, 1),
        s!(UImm { bits: 5 }, 2), s!(UImm { bits: 5 }, 3), s!(UImm { bits: 5 }, 4),
    ]),
    RLWINM_rec => insn("rlwinm.", &[DEF, USE, IMM, IMM, IMM], &[
        s!(Operand, 0), s!(Operand, 1),
        s!(UImm { bits: 5 }, 2), s!(UImm { bits: 5 }, 3), s!(UImm { bits: 5 }, 4),
    ]).defs(CR0),
    SRAWI => insn("srawi", &[DEF, USE, IMM], &[
        s!(Operand, 0), s!(Operand, 1), s!(UImm { bits: 5 }, 2),
    ]).defs(CARRY),
    RLDICL => insn("rldicl", &[DEF, USE, IMM, IMM], &[
        s!(Operand, 0), s!(Operand, 1), s!(UImm { bits: 6 }, 2), s!(UImm { bits: 6 }, 3),
    ]).groups(PPC64),
    CMPW => insn("cmpw", &[DEF, USE, USE], OPS3),
    CMPWI => insn("cmpwi", &[DEF, USE, IMM], &[
        s!(Operand, 0), s!(Operand, 1), s!(SImm { bits: 16 }, 2),
    ]),
    CMPLWI => insn("cmplwi", &[DEF, USE, IMM], &[
        s!(Operand, 0), s!(Operand, 1), s!(UImm { bits: 16 }, 2),
    ]),

    // load/store
    LWZ => insn("lwz", &[DEF, MEM_IMM, MEM_REG], &[s!(Operand, 0), s!(MemRegImm, 1)]),
    LWZU => insn("lwzu", &[DEF, DEF, MEM_IMM, tied!(MemReg, 1)], &[
        s!(Operand, 0), s!(MemRegImm, 2),
    ]).flags(InsnFlags::WRITEBACK),
    LWZX => insn("lwzx", &[DEF, MEM_REG, MEM_REG], &[s!(Operand, 0), s!(MemRegReg, 1)]),
    LD => insn("ld", &[DEF, MEM_IMM, MEM_REG], &[s!(Operand, 0), s!(MemRegImm, 1)])
        .groups(PPC64),
    STW => insn("stw", &[USE, MEM_IMM, MEM_REG], &[s!(Operand, 0), s!(MemRegImm, 1)])
        .flags(InsnFlags::STORE),
    STWU => insn("stwu", &[DEF, USE, MEM_IMM, tied!(MemReg, 0)], &[
        s!(Operand, 1), s!(MemRegImm, 2),
    ]).flags(InsnFlags::STORE.union(InsnFlags::WRITEBACK)),
    STWX => insn("stwx", &[USE, MEM_REG, MEM_REG], &[s!(Operand, 0), s!(MemRegReg, 1)])
        .flags(InsnFlags::STORE),
    PLWZ => insn("plwz", &[DEF, MEM_IMM, MEM_REG], &[s!(Operand, 0), s!(MemRegImm34, 1)])
        .groups(PREFIXED),
    PLWZpc => insn("plwz", &[DEF, MEM_IMM, MEM_IMM], &[
        s!(Operand, 0), s!(MemRegImm34PcRel, 1),
    ]).groups(PREFIXED),
    PLI => insn("pli", &[DEF, IMM], &[s!(Operand, 0), s!(SImm { bits: 34 }, 1)])
        .groups(PREFIXED),
    PADDIpc => insn("paddi", &[DEF, IMM, IMM], &[
        s!(Operand, 0), s!(ImmZero, 1), s!(SImm { bits: 34 }, 2),
    ]).groups(PREFIXED),
    HASHST => insn("hashst", &[USE, MEM_IMM, MEM_REG], &[s!(Operand, 0), s!(MemRegImmHash, 1)])
        .flags(InsnFlags::STORE)
        .groups(&[Group::IsIsa3_1]),
    HASHCHK => insn("hashchk", &[USE, MEM_IMM, MEM_REG], &[s!(Operand, 0), s!(MemRegImmHash, 1)])
        .groups(&[Group::IsIsa3_1]),

    // branches
    B => insn("b", &[IMM], &[s!(BranchOperand, 0)]).flags(BRANCH).groups(REL),
    BA => insn("ba", &[IMM], &[s!(AbsBranchOperand, 0)]).flags(BRANCH),
    BL => insn("bl", &[IMM], &[s!(BranchOperand, 0)]).defs(LR).flags(CALLS).groups(CALL_REL),
    BLA => insn("bla", &[IMM], &[s!(AbsBranchOperand, 0)]).defs(LR).flags(CALLS).groups(CALL),
    BLR => insn("blr", &[], &[]).uses(LR).flags(RETURN).groups(RET),
    BCTR => insn("bctr", &[], &[]).uses(CTR).flags(INDIRECT),
    BCTRL => insn("bctrl", &[], &[]).uses(CTR).defs(LR).flags(CALLS).groups(CALL),
    BCC => insn("b", &[PRED, USE, IMM], PREDICATE_REL)
        .flags(BRANCH)
        .groups(REL),
    BCCA => insn("b", &[PRED, USE, IMM], PREDICATE_ABS)
        .flags(BRANCH),
    BCCL => insn("b", &[PRED, USE, IMM], PREDICATE_REL)
        .defs(LR)
        .flags(CALLS)
        .groups(CALL_REL),
    BCCLA => insn("b", &[PRED, USE, IMM], PREDICATE_ABS)
        .defs(LR)
        .flags(CALLS)
        .groups(CALL),
    BCCLR => insn("b", &[PRED, USE], PREDICATE).uses(LR).flags(RETURN).groups(RET),
    BCCCTR => insn("b", &[PRED, USE], PREDICATE).uses(CTR).flags(INDIRECT),
    BDNZ => insn("bdnz", &[IMM], &[s!(BranchOperand, 0)])
        .bc(BO_CTR_NZ, Field::Const(0))
        .flags(BRANCH)
        .groups(REL),
    BDZ => insn("bdz", &[IMM], &[s!(BranchOperand, 0)])
        .bc(BO_CTR_Z, Field::Const(0))
        .flags(BRANCH)
        .groups(REL),
    BDNZA => insn("bdnza", &[IMM], &[s!(AbsBranchOperand, 0)])
        .bc(BO_CTR_NZ, Field::Const(0))
        .flags(BRANCH),
    BDZA => insn("bdza", &[IMM], &[s!(AbsBranchOperand, 0)])
        .bc(BO_CTR_Z, Field::Const(0))
        .flags(BRANCH),
    BDNZL => insn("bdnzl", &[IMM], &[s!(BranchOperand, 0)])
        .bc(BO_CTR_NZ, Field::Const(0))
        .defs(LR)
        .flags(CALLS)
        .groups(CALL_REL),
    BDNZLR => insn("bdnzlr", &[], &[])
        .bc(BO_CTR_NZ, Field::Const(0))
        .uses(LR)
        .flags(RETURN)
        .groups(RET),
    gBC => insn("bc", &[IMM, USE, IMM], &[s!(Operand, 0), s!(Operand, 1), s!(BranchOperand, 2)])
        .bc(Field::Slot(0), Field::Slot(1))
        .flags(BRANCH)
        .groups(REL),
    gBCA => insn("bca", &[IMM, USE, IMM], &[s!(Operand, 0), s!(Operand, 1), s!(AbsBranchOperand, 2)])
        .bc(Field::Slot(0), Field::Slot(1))
        .flags(BRANCH),
    gBCL => insn("bcl", &[IMM, USE, IMM], &[s!(Operand, 0), s!(Operand, 1), s!(BranchOperand, 2)])
        .bc(Field::Slot(0), Field::Slot(1))
        .defs(LR)
        .flags(CALLS)
        .groups(CALL_REL),
    gBCLA => insn("bcla", &[IMM, USE, IMM], &[s!(Operand, 0), s!(Operand, 1), s!(AbsBranchOperand, 2)])
        .bc(Field::Slot(0), Field::Slot(1))
        .defs(LR)
        .flags(CALLS)
        .groups(CALL),
    gBCat => insn("bc", &[IMM, IMM, USE, IMM], &[
        s!(AtBitsAsHint, 1), s!(Operand, 0), s!(Operand, 2), s!(BranchOperand, 3),
    ])
        .bc(Field::Slot(0), Field::Slot(2))
        .flags(BRANCH)
        .groups(REL),
    BC => insn("bt", &[USE, IMM], &[s!(Operand, 0), s!(BranchOperand, 1)])
        .bc(BO_TRUE, Field::Slot(0))
        .flags(BRANCH)
        .groups(REL),
    BCn => insn("bf", &[USE, IMM], &[s!(Operand, 0), s!(BranchOperand, 1)])
        .bc(BO_FALSE, Field::Slot(0))
        .flags(BRANCH)
        .groups(REL),
    BL_TLS => insn("bl", &[IMM, IMM], &[s!(TlsCall, 0)]).defs(LR).flags(CALLS).groups(CALL_REL),

    // condition and special purpose registers
    MFOCRF => insn("mfocrf", &[DEF, USE], &[s!(Operand, 0), s!(CrBitMask, 1)]),
    MTOCRF => insn("mtocrf", &[DEF, USE], &[s!(CrBitMask, 0), s!(Operand, 1)]),
    CRAND => insn("crand", &[DEF, USE, USE], OPS3),
    MFLR => insn("mflr", &[DEF], &[s!(Operand, 0)]).uses(LR),
    MTLR => insn("mtlr", &[USE], &[s!(Operand, 0)]).defs(LR),
    MFCTR => insn("mfctr", &[DEF], &[s!(Operand, 0)]).uses(CTR),
    MTCTR => insn("mtctr", &[USE], &[s!(Operand, 0)]).defs(CTR),
    SC => insn("sc", &[IMM], &[s!(UImm { bits: 7 }, 0)]).groups(&[Group::Int]),

    // floating point and vector
    FADD => insn("fadd", &[DEF, USE, USE], OPS3).uses(RM).groups(FPU),
    FADD_rec => insn("fadd.", &[DEF, USE, USE], OPS3).uses(RM).defs(CR1).groups(FPU),
    MTFSFI => insn("mtfsfi", &[IMM, IMM, IMM], &[
        s!(UImm { bits: 3 }, 0), s!(UImm { bits: 4 }, 1), s!(UImm { bits: 1 }, 2),
    ]).defs(RM).groups(FPU),
    XSADDDP => insn("xsadddp", &[DEF, USE, USE], OPS3).vsx(0b111).uses(RM).groups(VSX),
    XXLOR => insn("xxlor", &[DEF, USE, USE], OPS3).vsx(0b111).groups(VSX),
    XXPERMDI => insn("xxpermdi", &[DEF, USE, USE, IMM], &[
        s!(Operand, 0), s!(Operand, 1), s!(Operand, 2), s!(UImm { bits: 2 }, 3),
    ]).vsx(0b111).groups(VSX),
    XXSPLTIB => insn("xxspltib", &[DEF, IMM], &[s!(Operand, 0), s!(UImm { bits: 8 }, 1)])
        .vsx(0b1)
        .groups(P9_VECTOR),
    LXV => insn("lxv", &[DEF, MEM_IMM, MEM_REG], &[s!(Operand, 0), s!(MemRegImm, 1)])
        .vsx(0b1)
        .groups(P9_VECTOR),
    LXVX => insn("lxvx", &[DEF, MEM_REG, MEM_REG], &[s!(Operand, 0), s!(MemRegReg, 1)])
        .vsx(0b1)
        .groups(P9_VECTOR),
    VADDUWM => insn("vadduwm", &[DEF, USE, USE], OPS3).groups(&[Group::HasAltivec]),
    VSPLTISW => insn("vspltisw", &[DEF, IMM], &[s!(Operand, 0), s!(SImm { bits: 5 }, 1)])
        .groups(&[Group::HasAltivec]),
}
