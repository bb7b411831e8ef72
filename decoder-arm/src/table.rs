//! static per-opcode operand layout, printing sites and implicit effects.

use bitflags::bitflags;
use decoder::{Access, OpInfo, OpType};

use crate::groups::{Group, OpGroup};
use crate::regs::Reg;

bitflags! {
    #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
    pub struct InsnFlags: u16 {
        const BRANCH          = 1 << 0;
        const INDIRECT_BRANCH = 1 << 1;
        const CALL            = 1 << 2;
        const RETURN          = 1 << 3;
        const WRITEBACK       = 1 << 4;
        const POST_INDEX      = 1 << 5;
        /// load/store performed with user mode privileges.
        const USERMODE        = 1 << 6;
    }
}

/// one operand printing site: the group that prints it and the first raw operand it reads.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct Site {
    pub group: OpGroup,
    pub op: u8,
}

#[derive(Debug)]
pub struct InsnDesc {
    pub mnemonic: &'static str,
    pub operands: &'static [OpInfo],
    /// printing sites in the order operands are rendered.
    pub sites: &'static [Site],
    pub uses: &'static [Reg],
    pub defs: &'static [Reg],
    pub groups: &'static [Group],
    pub flags: InsnFlags,
    /// the last operand repeats for every remaining raw operand (register lists).
    pub variadic: bool,
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
        variadic: false,
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

    const fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn is_branch(&self) -> bool {
        self.flags.intersects(InsnFlags::BRANCH | InsnFlags::INDIRECT_BRANCH)
    }
}

const DEF: OpInfo = OpInfo::reg(Access::WRITE);
const USE: OpInfo = OpInfo::reg(Access::READ);
const IMM: OpInfo = OpInfo::imm();
const MEM_REG: OpInfo = OpInfo::mem_reg(Access::READ);
const MEM_IMM: OpInfo = OpInfo::mem_imm(Access::READ);
/// base of a memory operand that is written to.
const MEM_STORE: OpInfo = OpInfo::mem_reg(Access::WRITE);
/// the optional `s` suffix, `cpsr` when flags are set.
const CC_OUT: OpInfo = OpInfo::reg(Access::WRITE);
const PRED: OpInfo = OpInfo::imm();
const PRED_REG: OpInfo = OpInfo::reg(Access::READ);

/// a read slot constrained to the same register as slot `$to`.
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

    /// pc relative branch whose target is reported as an absolute address.
    pub fn is_relative_branch(self) -> bool {
        REL_BRANCHES.contains(&self)
    }

    /// thumb `blx` switching to arm, the target is relative to the word aligned pc.
    pub fn is_blx_to_arm(self) -> bool {
        BLX_TO_ARM.contains(&self)
    }
}

pub static REL_BRANCHES: &[Opcode] = &[
    Opcode::BL,
    Opcode::BLX_pred,
    Opcode::Bcc,
    Opcode::t2B,
    Opcode::t2Bcc,
    Opcode::tB,
    Opcode::tBcc,
    Opcode::tCBNZ,
    Opcode::tCBZ,
    Opcode::BL_pred,
    Opcode::BLXi,
    Opcode::tBL,
    Opcode::tBLXi,
];

pub static BLX_TO_ARM: &[Opcode] = &[Opcode::tBLXi];

const ARM: &[Group] = &[Group::IsArm];
const THUMB: &[Group] = &[Group::IsThumb];
const THUMB2: &[Group] = &[Group::IsThumb2];
const VFP2: &[Group] = &[Group::HasVfp2];
const NEON: &[Group] = &[Group::HasNeon];
const MVE: &[Group] = &[Group::HasMveInt, Group::IsThumb2];

const CPSR: &[Reg] = &[Reg::CPSR];
const LR: &[Reg] = &[Reg::LR];
const SP: &[Reg] = &[Reg::SP];
const VPR: &[Reg] = &[Reg::VPR];

opcodes! {
    // data processing
    ADDri => insn("add", &[DEF, USE, IMM, PRED, PRED_REG, CC_OUT], &[
        s!(SBitModifierOperand, 5), s!(PredicateOperand, 3),
        s!(Operand, 0), s!(Operand, 1), s!(ModImmOperand, 2),
    ]).groups(ARM),
    ADDrr => insn("add", &[DEF, USE, USE, PRED, PRED_REG, CC_OUT], &[
        s!(SBitModifierOperand, 5), s!(PredicateOperand, 3),
        s!(Operand, 0), s!(Operand, 1), s!(Operand, 2),
    ]).groups(ARM),
    ADDrsi => insn("add", &[DEF, USE, USE, IMM, PRED, PRED_REG, CC_OUT], &[
        s!(SBitModifierOperand, 6), s!(PredicateOperand, 4),
        s!(Operand, 0), s!(Operand, 1), s!(SORegImmOperand, 2),
    ]).groups(ARM),
    ADDrsr => insn("add", &[DEF, USE, USE, USE, IMM, PRED, PRED_REG, CC_OUT], &[
        s!(SBitModifierOperand, 7), s!(PredicateOperand, 5),
        s!(Operand, 0), s!(Operand, 1), s!(SORegRegOperand, 2),
    ]).groups(ARM),
    SUBrr => insn("sub", &[DEF, USE, USE, PRED, PRED_REG, CC_OUT], &[
        s!(SBitModifierOperand, 5), s!(PredicateOperand, 3),
        s!(Operand, 0), s!(Operand, 1), s!(Operand, 2),
    ]).groups(ARM),
    ADCri => insn("adc", &[DEF, USE, IMM, PRED, PRED_REG, CC_OUT], &[
        s!(SBitModifierOperand, 5), s!(PredicateOperand, 3),
        s!(Operand, 0), s!(Operand, 1), s!(ModImmOperand, 2),
    ]).uses(CPSR).groups(ARM),
    MOVr => insn("mov", &[DEF, USE, PRED, PRED_REG, CC_OUT], &[
        s!(SBitModifierOperand, 4), s!(PredicateOperand, 2),
        s!(Operand, 0), s!(Operand, 1),
    ]).groups(ARM),
    MOVi => insn("mov", &[DEF, IMM, PRED, PRED_REG, CC_OUT], &[
        s!(SBitModifierOperand, 4), s!(PredicateOperand, 2),
        s!(Operand, 0), s!(ModImmOperand, 1),
    ]).groups(ARM),
    MOVi16 => insn("movw", &[DEF, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 2), s!(Operand, 0), s!(Operand, 1),
    ]).groups(&[Group::IsArm, Group::HasV6T2]),
    MOVTi16 => insn("movt", &[DEF, tied!(Reg, 0), IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0), s!(Operand, 2),
    ]).groups(&[Group::IsArm, Group::HasV6T2]),
    CMPri => insn("cmp", &[USE, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 2), s!(Operand, 0), s!(ModImmOperand, 1),
    ]).defs(CPSR).groups(ARM),
    CMPrr => insn("cmp", &[USE, USE, PRED, PRED_REG], &[
        s!(PredicateOperand, 2), s!(Operand, 0), s!(Operand, 1),
    ]).defs(CPSR).groups(ARM),
    MUL => insn("mul", &[DEF, USE, USE, PRED, PRED_REG, CC_OUT], &[
        s!(SBitModifierOperand, 5), s!(PredicateOperand, 3),
        s!(Operand, 0), s!(Operand, 1), s!(Operand, 2),
    ]).groups(&[Group::IsArm, Group::HasV6]),
    BFC => insn("bfc", &[DEF, tied!(Reg, 0), IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0), s!(BitfieldInvMaskImmOperand, 2),
    ]).groups(&[Group::IsArm, Group::HasV6T2]),
    BFI => insn("bfi", &[DEF, tied!(Reg, 0), USE, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 4), s!(Operand, 0), s!(Operand, 2),
        s!(BitfieldInvMaskImmOperand, 3),
    ]).groups(&[Group::IsArm, Group::HasV6T2]),
    PKHBT => insn("pkhbt", &[DEF, USE, USE, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 4), s!(Operand, 0), s!(Operand, 1), s!(Operand, 2),
        s!(PKHLSLShiftImm, 3),
    ]).groups(&[Group::IsArm, Group::HasV6]),
    PKHTB => insn("pkhtb", &[DEF, USE, USE, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 4), s!(Operand, 0), s!(Operand, 1), s!(Operand, 2),
        s!(PKHASRShiftImm, 3),
    ]).groups(&[Group::IsArm, Group::HasV6]),
    SSAT => insn("ssat", &[DEF, IMM, USE, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 4), s!(Operand, 0), s!(ImmPlusOneOperand, 1),
        s!(Operand, 2), s!(ShiftImmOperand, 3),
    ]).defs(CPSR).groups(&[Group::IsArm, Group::HasV6]),
    USAT => insn("usat", &[DEF, IMM, USE, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 4), s!(Operand, 0), s!(Operand, 1),
        s!(Operand, 2), s!(ShiftImmOperand, 3),
    ]).defs(CPSR).groups(&[Group::IsArm, Group::HasV6]),
    SXTB => insn("sxtb", &[DEF, USE, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0), s!(Operand, 1), s!(RotImmOperand, 2),
    ]).groups(&[Group::IsArm, Group::HasV6]),

    // system
    SETEND => insn("setend", &[IMM], &[s!(SetendOperand, 0)])
        .groups(&[Group::IsArm, Group::HasV6]),
    CPS2p => insn("cps", &[IMM, IMM], &[s!(CPSIMod, 0), s!(CPSIFlag, 1)])
        .groups(&[Group::IsArm, Group::Privilege]),
    CPS3p => insn("cps", &[IMM, IMM, IMM], &[s!(CPSIMod, 0), s!(CPSIFlag, 1), s!(Operand, 2)])
        .groups(&[Group::IsArm, Group::Privilege]),
    MSR => insn("msr", &[IMM, USE, PRED, PRED_REG], &[
        s!(PredicateOperand, 2), s!(MSRMaskOperand, 0), s!(Operand, 1),
    ]).groups(ARM),
    MSRbanked => insn("msr", &[IMM, USE, PRED, PRED_REG], &[
        s!(PredicateOperand, 2), s!(BankedRegOperand, 0), s!(Operand, 1),
    ]).groups(&[Group::IsArm, Group::Privilege]),
    MRSbanked => insn("mrs", &[DEF, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 2), s!(Operand, 0), s!(BankedRegOperand, 1),
    ]).groups(&[Group::IsArm, Group::Privilege]),
    t2MSR_M => insn("msr", &[IMM, USE, PRED, PRED_REG], &[
        s!(PredicateOperand, 2), s!(MSRMaskOperand, 0), s!(Operand, 1),
    ]).groups(&[Group::IsThumb2, Group::IsMClass]),
    DMB => insn("dmb", &[IMM], &[s!(MemBOption, 0)]).groups(&[Group::IsArm, Group::HasDb]),
    DSB => insn("dsb", &[IMM], &[s!(MemBOption, 0)]).groups(&[Group::IsArm, Group::HasDb]),
    ISB => insn("isb", &[IMM], &[s!(InstSyncBOption, 0)]).groups(&[Group::IsArm, Group::HasDb]),
    t2TSB => insn("tsb", &[IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 1), s!(TraceSyncBOption, 0),
    ]).groups(THUMB2),
    SVC => insn("svc", &[IMM, PRED, PRED_REG], &[s!(PredicateOperand, 1), s!(Operand, 0)])
        .groups(&[Group::IsArm, Group::Int]),
    BKPT => insn("bkpt", &[IMM], &[s!(Operand, 0)]).groups(ARM),
    MCR => insn("mcr", &[IMM, IMM, USE, IMM, IMM, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 6), s!(PImmediate, 0), s!(Operand, 1), s!(Operand, 2),
        s!(CImmediate, 3), s!(CImmediate, 4), s!(Operand, 5),
    ]).groups(ARM),
    FMSTAT => insn("vmrs", &[PRED, PRED_REG], &[s!(PredicateOperand, 0)])
        .uses(&[Reg::FPSCR_NZCV])
        .defs(CPSR)
        .groups(VFP2),
    VMRS => insn("vmrs", &[DEF, PRED, PRED_REG], &[s!(PredicateOperand, 1), s!(Operand, 0)])
        .uses(&[Reg::FPSCR])
        .groups(VFP2),

    // branches
    Bcc => insn("b", &[IMM, PRED, PRED_REG], &[s!(PredicateOperand, 1), s!(Operand, 0)])
        .uses(CPSR)
        .groups(&[Group::IsArm, Group::BranchRelative])
        .flags(InsnFlags::BRANCH),
    BL => insn("bl", &[IMM], &[s!(Operand, 0)])
        .uses(SP)
        .defs(LR)
        .groups(&[Group::IsArm, Group::Call, Group::BranchRelative])
        .flags(InsnFlags::CALL),
    BL_pred => insn("bl", &[IMM, PRED, PRED_REG], &[s!(PredicateOperand, 1), s!(Operand, 0)])
        .uses(SP)
        .defs(LR)
        .groups(&[Group::IsArm, Group::Call, Group::BranchRelative])
        .flags(InsnFlags::CALL),
    BLXi => insn("blx", &[IMM], &[s!(Operand, 0)])
        .uses(SP)
        .defs(LR)
        .groups(&[Group::IsArm, Group::Call, Group::BranchRelative])
        .flags(InsnFlags::CALL),
    BLX => insn("blx", &[USE], &[s!(Operand, 0)])
        .uses(SP)
        .defs(LR)
        .groups(&[Group::IsArm, Group::Call])
        .flags(InsnFlags::CALL),
    BLX_pred => insn("blx", &[IMM, PRED, PRED_REG], &[s!(PredicateOperand, 1), s!(Operand, 0)])
        .uses(SP)
        .defs(LR)
        .groups(&[Group::IsArm, Group::Call, Group::BranchRelative])
        .flags(InsnFlags::CALL),
    BX => insn("bx", &[USE], &[s!(Operand, 0)])
        .groups(ARM)
        .flags(InsnFlags::BRANCH.union(InsnFlags::INDIRECT_BRANCH)),
    BX_RET => insn("bx", &[PRED, PRED_REG], &[s!(PredicateOperand, 0)])
        .uses(LR)
        .groups(&[Group::IsArm, Group::Ret])
        .flags(InsnFlags::BRANCH.union(InsnFlags::RETURN)),

    // loads and stores
    LDRi12 => insn("ldr", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0),
        s!(AddrModeImm12Operand { always_print_imm0: false }, 1),
    ]).groups(ARM),
    STRi12 => insn("str", &[USE, MEM_STORE, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0),
        s!(AddrModeImm12Operand { always_print_imm0: false }, 1),
    ]).groups(ARM),
    LDRrs => insn("ldr", &[DEF, MEM_REG, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 4), s!(Operand, 0), s!(AddrMode2Operand, 1),
    ]).groups(ARM),
    LDR_PRE_IMM => insn("ldr", &[DEF, DEF, tied!(MemReg, 1), MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 4), s!(Operand, 0),
        s!(AddrModeImm12Operand { always_print_imm0: true }, 2),
    ]).groups(ARM).flags(InsnFlags::WRITEBACK),
    LDR_POST_IMM => insn("ldr", &[DEF, DEF, tied!(MemReg, 1), USE, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 5), s!(Operand, 0), s!(AddrMode7Operand, 2),
        s!(AddrMode2OffsetOperand, 3),
    ]).groups(ARM).flags(InsnFlags::WRITEBACK.union(InsnFlags::POST_INDEX)),
    LDR_POST_REG => insn("ldr", &[DEF, DEF, tied!(MemReg, 1), USE, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 5), s!(Operand, 0), s!(AddrMode7Operand, 2),
        s!(AddrMode2OffsetOperand, 3),
    ]).groups(ARM).flags(InsnFlags::WRITEBACK.union(InsnFlags::POST_INDEX)),
    LDRT_POST_IMM => insn("ldrt", &[DEF, DEF, tied!(MemReg, 1), USE, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 5), s!(Operand, 0), s!(AddrMode7Operand, 2),
        s!(AddrMode2OffsetOperand, 3),
    ]).groups(ARM).flags(
        InsnFlags::WRITEBACK.union(InsnFlags::POST_INDEX).union(InsnFlags::USERMODE)
    ),
    LDRH => insn("ldrh", &[DEF, MEM_REG, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 4), s!(Operand, 0),
        s!(AddrMode3Operand { always_print_imm0: false }, 1),
    ]).groups(ARM),
    LDRD => insn("ldrd", &[DEF, DEF, MEM_REG, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 5), s!(Operand, 0), s!(Operand, 1),
        s!(AddrMode3Operand { always_print_imm0: false }, 2),
    ]).groups(&[Group::IsArm, Group::HasV5T]),
    LDRH_POST => insn("ldrh", &[DEF, DEF, tied!(MemReg, 1), USE, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 5), s!(Operand, 0), s!(AddrMode7Operand, 2),
        s!(AddrMode3OffsetOperand, 3),
    ]).groups(ARM).flags(InsnFlags::WRITEBACK.union(InsnFlags::POST_INDEX)),
    LDRHTr => insn("ldrht", &[DEF, DEF, tied!(MemReg, 1), USE, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 5), s!(Operand, 0), s!(AddrMode7Operand, 2),
        s!(PostIdxRegOperand, 3),
    ]).groups(ARM).flags(
        InsnFlags::WRITEBACK.union(InsnFlags::POST_INDEX).union(InsnFlags::USERMODE)
    ),
    LDRHTi => insn("ldrht", &[DEF, DEF, tied!(MemReg, 1), IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 4), s!(Operand, 0), s!(AddrMode7Operand, 2),
        s!(PostIdxImm8Operand, 3),
    ]).groups(ARM).flags(
        InsnFlags::WRITEBACK.union(InsnFlags::POST_INDEX).union(InsnFlags::USERMODE)
    ),
    LDMIA => insn("ldm", &[USE, PRED, PRED_REG, DEF], &[
        s!(PredicateOperand, 1), s!(Operand, 0), s!(RegisterList, 3),
    ]).groups(ARM).variadic(),
    LDMIA_UPD => insn("ldm", &[DEF, tied!(Reg, 0), PRED, PRED_REG, DEF], &[
        s!(PredicateOperand, 2), s!(Operand, 1), s!(RegisterList, 4),
    ]).groups(ARM).flags(InsnFlags::WRITEBACK).variadic(),
    STMDB_UPD => insn("stmdb", &[DEF, tied!(Reg, 0), PRED, PRED_REG, USE], &[
        s!(PredicateOperand, 2), s!(Operand, 1), s!(RegisterList, 4),
    ]).groups(ARM).flags(InsnFlags::WRITEBACK).variadic(),
    LDREXD => insn("ldrexd", &[DEF, MEM_REG, PRED, PRED_REG], &[
        s!(PredicateOperand, 2), s!(GPRPairOperand, 0), s!(AddrMode7Operand, 1),
    ]).groups(&[Group::IsArm, Group::HasV6K]),

    // coprocessor
    LDC_OFFSET => insn("ldc", &[IMM, IMM, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 4), s!(PImmediate, 0), s!(CImmediate, 1),
        s!(AddrMode5Operand { always_print_imm0: false }, 2),
    ]).groups(ARM),
    LDC_OPTION => insn("ldc", &[IMM, IMM, MEM_REG, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 4), s!(PImmediate, 0), s!(CImmediate, 1),
        s!(AddrMode7Operand, 2), s!(CoprocOptionImm, 3),
    ]).groups(ARM),
    LDC_POST => insn("ldc", &[IMM, IMM, MEM_REG, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 4), s!(PImmediate, 0), s!(CImmediate, 1),
        s!(AddrMode7Operand, 2), s!(PostIdxImm8s4Operand, 3),
    ]).groups(ARM).flags(InsnFlags::WRITEBACK.union(InsnFlags::POST_INDEX)),

    // vfp
    VLDRD => insn("vldr", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0),
        s!(AddrMode5Operand { always_print_imm0: false }, 1),
    ]).groups(VFP2),
    VLDRH => insn("vldr", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0),
        s!(AddrMode5FP16Operand { always_print_imm0: false }, 1),
    ]).groups(&[Group::HasFullFp16]),
    FCONSTS => insn("vmov", &[DEF, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 2), s!(Operand, 0), s!(FPImmOperand, 1),
    ]).groups(&[Group::HasVfp3]),
    FCONSTD => insn("vmov", &[DEF, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 2), s!(Operand, 0), s!(FPImmOperand, 1),
    ]).groups(&[Group::HasVfp3]),
    VMOVRRD => insn("vmov", &[DEF, DEF, USE, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0), s!(Operand, 1), s!(Operand, 2),
    ]).groups(VFP2),
    VTOSHS => insn("vcvt", &[DEF, tied!(Reg, 0), IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0), s!(Operand, 1), s!(FBits16, 2),
    ]).groups(&[Group::HasVfp3]),
    VTOSLS => insn("vcvt", &[DEF, tied!(Reg, 0), IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0), s!(Operand, 1), s!(FBits32, 2),
    ]).groups(&[Group::HasVfp3]),

    // neon
    VMOVv4i32 => insn("vmov", &[DEF, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 2), s!(Operand, 0), s!(VMOVModImmOperand, 1),
    ]).groups(NEON),
    VGETLNi32 => insn("vmov", &[DEF, USE, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0), s!(Operand, 1), s!(VectorIndex, 2),
    ]).groups(VFP2),
    VMULslfd => insn("vmul", &[DEF, USE, USE, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 4), s!(Operand, 0), s!(Operand, 1), s!(Operand, 2),
        s!(VectorIndex, 3),
    ]).groups(NEON),
    VCMLAv4f32 => insn("vcmla", &[DEF, tied!(Reg, 0), USE, USE, IMM], &[
        s!(Operand, 0), s!(Operand, 2), s!(Operand, 3),
        s!(ComplexRotationOp { angle: 90, remainder: 0 }, 4),
    ]).groups(&[Group::HasNeon, Group::HasV8_3A]),
    VCADDv4f32 => insn("vcadd", &[DEF, USE, USE, IMM], &[
        s!(Operand, 0), s!(Operand, 1), s!(Operand, 2),
        s!(ComplexRotationOp { angle: 180, remainder: 90 }, 3),
    ]).groups(&[Group::HasNeon, Group::HasV8_3A]),
    VLD1d32 => insn("vld1", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(VectorListOne, 0), s!(AddrMode6Operand, 1),
    ]).groups(NEON),
    VLD1q32 => insn("vld1", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(VectorListTwo, 0), s!(AddrMode6Operand, 1),
    ]).groups(NEON),
    VLD1d32T => insn("vld1", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(VectorListThree, 0), s!(AddrMode6Operand, 1),
    ]).groups(NEON),
    VLD1d32Q => insn("vld1", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(VectorListFour, 0), s!(AddrMode6Operand, 1),
    ]).groups(NEON),
    VLD1d32wb_fixed => insn("vld1", &[DEF, DEF, tied!(MemReg, 1), MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 4), s!(VectorListOne, 0), s!(AddrMode6Operand, 2),
    ]).groups(NEON).flags(InsnFlags::WRITEBACK),
    VLD1d32wb_register => insn(
        "vld1",
        &[DEF, DEF, tied!(MemReg, 1), MEM_IMM, USE, PRED, PRED_REG],
        &[
            s!(PredicateOperand, 5), s!(VectorListOne, 0), s!(AddrMode6Operand, 2),
            s!(AddrMode6OffsetOperand, 4),
        ],
    ).groups(NEON).flags(InsnFlags::WRITEBACK),
    VLD1LNd32 => insn("vld1", &[DEF, MEM_REG, MEM_IMM, tied!(Reg, 0), IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 5), s!(Operand, 0), s!(NoHashImmediate, 4),
        s!(AddrMode6Operand, 1),
    ]).groups(NEON),
    VLD1DUPd32 => insn("vld1", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(VectorListOneAllLanes, 0), s!(AddrMode6Operand, 1),
    ]).groups(NEON),
    VLD2b32 => insn("vld2", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(VectorListTwoSpaced, 0), s!(AddrMode6Operand, 1),
    ]).groups(NEON),
    VLD2DUPd32 => insn("vld2", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(VectorListTwoAllLanes, 0), s!(AddrMode6Operand, 1),
    ]).groups(NEON),
    VLD2DUPd32x2 => insn("vld2", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(VectorListTwoSpacedAllLanes, 0), s!(AddrMode6Operand, 1),
    ]).groups(NEON),
    VLD3q32 => insn("vld3", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(VectorListThreeSpaced, 0), s!(AddrMode6Operand, 1),
    ]).groups(NEON),
    VLD3DUPd32 => insn("vld3", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(VectorListThreeAllLanes, 0), s!(AddrMode6Operand, 1),
    ]).groups(NEON),
    VLD3DUPq32 => insn("vld3", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(VectorListThreeSpacedAllLanes, 0),
        s!(AddrMode6Operand, 1),
    ]).groups(NEON),
    VLD4q32 => insn("vld4", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(VectorListFourSpaced, 0), s!(AddrMode6Operand, 1),
    ]).groups(NEON),
    VLD4DUPd32 => insn("vld4", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(VectorListFourAllLanes, 0), s!(AddrMode6Operand, 1),
    ]).groups(NEON),
    VLD4DUPq32 => insn("vld4", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(VectorListFourSpacedAllLanes, 0),
        s!(AddrMode6Operand, 1),
    ]).groups(NEON),

    // thumb
    tADDi8 => insn("add", &[DEF, CC_OUT, tied!(Reg, 0), IMM, PRED, PRED_REG], &[
        s!(SBitModifierOperand, 1), s!(PredicateOperand, 4), s!(Operand, 0), s!(Operand, 3),
    ]).groups(THUMB),
    tMOVi8 => insn("mov", &[DEF, CC_OUT, IMM, PRED, PRED_REG], &[
        s!(SBitModifierOperand, 1), s!(PredicateOperand, 3), s!(Operand, 0), s!(Operand, 2),
    ]).groups(THUMB),
    tLSRri => insn("lsr", &[DEF, CC_OUT, USE, IMM, PRED, PRED_REG], &[
        s!(SBitModifierOperand, 1), s!(PredicateOperand, 4), s!(Operand, 0), s!(Operand, 2),
        s!(ThumbSRImm, 3),
    ]).groups(THUMB),
    tASRri => insn("asr", &[DEF, CC_OUT, USE, IMM, PRED, PRED_REG], &[
        s!(SBitModifierOperand, 1), s!(PredicateOperand, 4), s!(Operand, 0), s!(Operand, 2),
        s!(ThumbSRImm, 3),
    ]).groups(THUMB),
    tADDspi => insn("add", &[DEF, tied!(Reg, 0), IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0), s!(ThumbS4ImmOperand, 2),
    ]).groups(THUMB),
    tADR => insn("adr", &[DEF, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 2), s!(Operand, 0), s!(AdrLabelOperand { scale: 2 }, 1),
    ]).groups(THUMB),
    ADR => insn("adr", &[DEF, IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 2), s!(Operand, 0), s!(AdrLabelOperand { scale: 0 }, 1),
    ]).groups(ARM),
    tB => insn("b", &[IMM, PRED, PRED_REG], &[s!(PredicateOperand, 1), s!(Operand, 0)])
        .groups(&[Group::IsThumb, Group::BranchRelative])
        .flags(InsnFlags::BRANCH),
    tBcc => insn("b", &[IMM, PRED, PRED_REG], &[s!(PredicateOperand, 1), s!(Operand, 0)])
        .uses(CPSR)
        .groups(&[Group::IsThumb, Group::BranchRelative])
        .flags(InsnFlags::BRANCH),
    tBL => insn("bl", &[PRED, PRED_REG, IMM], &[s!(PredicateOperand, 0), s!(Operand, 2)])
        .uses(SP)
        .defs(LR)
        .groups(&[Group::IsThumb, Group::Call, Group::BranchRelative])
        .flags(InsnFlags::CALL),
    tBLXi => insn("blx", &[PRED, PRED_REG, IMM], &[s!(PredicateOperand, 0), s!(Operand, 2)])
        .uses(SP)
        .defs(LR)
        .groups(&[Group::IsThumb, Group::Call, Group::BranchRelative])
        .flags(InsnFlags::CALL),
    tCBZ => insn("cbz", &[USE, IMM], &[s!(Operand, 0), s!(Operand, 1)])
        .groups(&[Group::IsThumb2, Group::BranchRelative])
        .flags(InsnFlags::BRANCH),
    tCBNZ => insn("cbnz", &[USE, IMM], &[s!(Operand, 0), s!(Operand, 1)])
        .groups(&[Group::IsThumb2, Group::BranchRelative])
        .flags(InsnFlags::BRANCH),
    tPUSH => insn("push", &[PRED, PRED_REG, USE], &[
        s!(PredicateOperand, 0), s!(RegisterList, 2),
    ]).uses(SP).defs(SP).groups(THUMB).variadic(),
    tPOP => insn("pop", &[PRED, PRED_REG, DEF], &[
        s!(PredicateOperand, 0), s!(RegisterList, 2),
    ]).uses(SP).defs(SP).groups(THUMB).variadic(),
    tLDRi => insn("ldr", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0), s!(ThumbAddrModeImm5S4Operand, 1),
    ]).groups(THUMB),
    tLDRHi => insn("ldrh", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0), s!(ThumbAddrModeImm5S2Operand, 1),
    ]).groups(THUMB),
    tLDRBi => insn("ldrb", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0), s!(ThumbAddrModeImm5S1Operand, 1),
    ]).groups(THUMB),
    tLDRr => insn("ldr", &[DEF, MEM_REG, MEM_REG, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0), s!(ThumbAddrModeRROperand, 1),
    ]).groups(THUMB),
    tLDRspi => insn("ldr", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0), s!(ThumbAddrModeSPOperand, 1),
    ]).groups(THUMB),
    tLDRpci => insn("ldr", &[DEF, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 2), s!(Operand, 0), s!(ThumbLdrLabelOperand, 1),
    ]).groups(THUMB),

    // thumb2
    t2B => insn("b", &[IMM, PRED, PRED_REG], &[s!(PredicateOperand, 1), s!(Operand, 0)])
        .groups(&[Group::IsThumb2, Group::BranchRelative])
        .flags(InsnFlags::BRANCH),
    t2Bcc => insn("b", &[IMM, PRED, PRED_REG], &[s!(PredicateOperand, 1), s!(Operand, 0)])
        .uses(CPSR)
        .groups(&[Group::IsThumb2, Group::BranchRelative])
        .flags(InsnFlags::BRANCH),
    t2IT => insn("it", &[IMM, IMM], &[s!(ThumbITMask, 1), s!(MandatoryPredicateOperand, 0)])
        .defs(&[Reg::ITSTATE])
        .groups(THUMB2),
    t2ADDri => insn("add", &[DEF, USE, IMM, PRED, PRED_REG, CC_OUT], &[
        s!(SBitModifierOperand, 5), s!(PredicateOperand, 3),
        s!(Operand, 0), s!(Operand, 1), s!(Operand, 2),
    ]).groups(THUMB2),
    t2ADDrs => insn("add", &[DEF, USE, USE, IMM, PRED, PRED_REG, CC_OUT], &[
        s!(SBitModifierOperand, 6), s!(PredicateOperand, 4),
        s!(Operand, 0), s!(Operand, 1), s!(T2SOOperand, 2),
    ]).groups(THUMB2),
    t2MOVsrl_flag => insn("lsrs", &[DEF, USE, PRED, PRED_REG], &[
        s!(PredicateOperand, 2), s!(Operand, 0), s!(Operand, 1),
        s!(RegImmShift { opc: 3, imm: 1 }, 1),
    ]).defs(CPSR).groups(THUMB2),
    t2LDRi12 => insn("ldr", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0),
        s!(AddrModeImm12Operand { always_print_imm0: false }, 1),
    ]).groups(THUMB2),
    t2LDRi8 => insn("ldr", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0),
        s!(T2AddrModeImm8Operand { always_print_imm0: false }, 1),
    ]).groups(THUMB2),
    t2LDR_PRE => insn("ldr", &[DEF, DEF, tied!(MemReg, 1), MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 4), s!(Operand, 0),
        s!(T2AddrModeImm8Operand { always_print_imm0: true }, 2),
    ]).groups(THUMB2).flags(InsnFlags::WRITEBACK),
    t2LDR_POST => insn("ldr", &[DEF, DEF, tied!(MemReg, 1), IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 4), s!(Operand, 0), s!(AddrMode7Operand, 2),
        s!(T2AddrModeImm8OffsetOperand, 3),
    ]).groups(THUMB2).flags(InsnFlags::WRITEBACK.union(InsnFlags::POST_INDEX)),
    t2LDRs => insn("ldr", &[DEF, MEM_REG, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 4), s!(Operand, 0), s!(T2AddrModeSoRegOperand, 1),
    ]).groups(THUMB2),
    t2LDRDi8 => insn("ldrd", &[DEF, DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 4), s!(Operand, 0), s!(Operand, 1),
        s!(T2AddrModeImm8s4Operand { always_print_imm0: false }, 2),
    ]).groups(THUMB2),
    t2LDRD_PRE => insn("ldrd", &[DEF, DEF, DEF, tied!(MemReg, 2), MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 5), s!(Operand, 0), s!(Operand, 1),
        s!(T2AddrModeImm8s4Operand { always_print_imm0: true }, 3),
    ]).groups(THUMB2).flags(InsnFlags::WRITEBACK),
    t2LDRD_POST => insn("ldrd", &[DEF, DEF, DEF, tied!(MemReg, 2), IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 5), s!(Operand, 0), s!(Operand, 1), s!(AddrMode7Operand, 3),
        s!(T2AddrModeImm8s4OffsetOperand, 4),
    ]).groups(THUMB2).flags(InsnFlags::WRITEBACK.union(InsnFlags::POST_INDEX)),
    t2LDREX => insn("ldrex", &[DEF, MEM_REG, MEM_IMM, PRED, PRED_REG], &[
        s!(PredicateOperand, 3), s!(Operand, 0), s!(T2AddrModeImm0_1020s4Operand, 1),
    ]).groups(THUMB2),
    t2TBB => insn("tbb", &[MEM_REG, MEM_REG, PRED, PRED_REG], &[
        s!(PredicateOperand, 2), s!(AddrModeTBB, 0),
    ]).groups(THUMB2).flags(InsnFlags::BRANCH.union(InsnFlags::INDIRECT_BRANCH)),
    t2TBH => insn("tbh", &[MEM_REG, MEM_REG, PRED, PRED_REG], &[
        s!(PredicateOperand, 2), s!(AddrModeTBH, 0),
    ]).groups(THUMB2).flags(InsnFlags::BRANCH.union(InsnFlags::INDIRECT_BRANCH)),

    // mve
    MVE_VADDVs32no_acc => insn("vaddv", &[DEF, USE, PRED, PRED_REG, PRED_REG], &[
        s!(VPTPredicateOperand, 2), s!(Operand, 0), s!(Operand, 1),
    ]).groups(MVE),
    MVE_VPTv4i32 => insn("vpt", &[IMM, PRED, USE, USE], &[
        s!(VPTMask, 0), s!(MandatoryPredicateOperand, 1), s!(Operand, 2), s!(Operand, 3),
    ]).defs(VPR).groups(MVE),
    MVE_VCMPi32 => insn("vcmp", &[DEF, USE, USE, PRED, PRED, PRED_REG, PRED_REG], &[
        s!(VPTPredicateOperand, 4), s!(MandatoryRestrictedPredicateOperand, 3),
        s!(Operand, 1), s!(Operand, 2),
    ]).defs(VPR).groups(MVE),
    MVE_VLDRWU32_rq => insn("vldrw", &[DEF, MEM_REG, MEM_REG, PRED, PRED_REG, PRED_REG], &[
        s!(VPTPredicateOperand, 3), s!(Operand, 0),
        s!(MveAddrModeRQOperand { shift: 2 }, 1),
    ]).groups(MVE),
    MVE_VLD20_32 => insn("vld20", &[DEF, MEM_REG], &[
        s!(MveVectorList { regs: 2 }, 0), s!(AddrMode7Operand, 1),
    ]).groups(MVE),
    MVE_VLD40_32 => insn("vld40", &[DEF, MEM_REG], &[
        s!(MveVectorList { regs: 4 }, 0), s!(AddrMode7Operand, 1),
    ]).groups(MVE),
    MVE_SQRSHRL => insn(
        "sqrshrl",
        &[DEF, DEF, tied!(Reg, 0), tied!(Reg, 1), USE, IMM, PRED, PRED_REG],
        &[
            s!(PredicateOperand, 6), s!(Operand, 0), s!(Operand, 1),
            s!(MveSaturateOp, 5), s!(Operand, 4),
        ],
    ).groups(&[Group::HasMveInt, Group::HasV8_1M]),
}
