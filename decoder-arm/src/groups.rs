//! operand printer groups and instruction groups.

/// the shape of one operand printing site.
///
/// a group covers every instruction that spells an operand the same way, template arguments
/// of the printer are carried as fields.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum OpGroup {
    /// shift applied to the previous operand, or to the open memory operand.
    RegImmShift { opc: u8, imm: u32 },
    Operand,
    SBitModifierOperand,
    PredicateOperand,
    SORegRegOperand,
    ModImmOperand,
    SORegImmOperand,
    T2SOOperand,
    ThumbS4ImmOperand,
    ThumbSRImm,
    BitfieldInvMaskImmOperand,
    MandatoryPredicateOperand,
    MandatoryRestrictedPredicateOperand,
    PImmediate,
    CImmediate,
    RegisterList,
    CPSIMod,
    CPSIFlag,
    GPRPairOperand,
    MemBOption,
    InstSyncBOption,
    TraceSyncBOption,
    FPImmOperand,
    VectorIndex,
    ThumbITMask,
    VPTMask,
    VPTPredicateOperand,
    AddrMode7Operand,
    CoprocOptionImm,
    PostIdxImm8Operand,
    PostIdxImm8s4Operand,
    PostIdxRegOperand,
    ThumbLdrLabelOperand,
    ThumbAddrModeImm5S1Operand,
    ThumbAddrModeImm5S2Operand,
    ThumbAddrModeImm5S4Operand,
    ThumbAddrModeRROperand,
    ThumbAddrModeSPOperand,
    AddrMode2Operand,
    AddrMode2OffsetOperand,
    AddrMode3Operand { always_print_imm0: bool },
    AddrMode3OffsetOperand,
    AddrMode5Operand { always_print_imm0: bool },
    AddrMode5FP16Operand { always_print_imm0: bool },
    AddrMode6Operand,
    AddrMode6OffsetOperand,
    AddrModeImm12Operand { always_print_imm0: bool },
    T2AddrModeSoRegOperand,
    T2AddrModeImm8Operand { always_print_imm0: bool },
    T2AddrModeImm8s4Operand { always_print_imm0: bool },
    T2AddrModeImm8OffsetOperand,
    T2AddrModeImm8s4OffsetOperand,
    T2AddrModeImm0_1020s4Operand,
    AddrModeTBB,
    AddrModeTBH,
    MveAddrModeRQOperand { shift: u8 },
    AdrLabelOperand { scale: u8 },
    BankedRegOperand,
    MSRMaskOperand,
    PKHLSLShiftImm,
    PKHASRShiftImm,
    ImmPlusOneOperand,
    SetendOperand,
    MveSaturateOp,
    ShiftImmOperand,
    RotImmOperand,
    VMOVModImmOperand,
    FBits16,
    FBits32,
    NoHashImmediate,
    ComplexRotationOp { angle: u32, remainder: u32 },
    VectorListOne,
    VectorListTwo,
    VectorListThree,
    VectorListFour,
    VectorListOneAllLanes,
    VectorListTwoAllLanes,
    VectorListThreeAllLanes,
    VectorListFourAllLanes,
    VectorListTwoSpaced,
    VectorListThreeSpaced,
    VectorListFourSpaced,
    VectorListTwoSpacedAllLanes,
    VectorListThreeSpacedAllLanes,
    VectorListFourSpacedAllLanes,
    MveVectorList { regs: u8 },
}

impl OpGroup {
    /// number of consecutive raw operands the printer consumes, starting at the site's operand.
    pub fn width(&self) -> usize {
        match self {
            OpGroup::RegImmShift { .. } => 0,
            OpGroup::PredicateOperand
            | OpGroup::SORegImmOperand
            | OpGroup::T2SOOperand
            | OpGroup::PostIdxRegOperand
            | OpGroup::AddrMode2OffsetOperand
            | OpGroup::AddrMode3OffsetOperand
            | OpGroup::AddrMode5Operand { .. }
            | OpGroup::AddrMode5FP16Operand { .. }
            | OpGroup::AddrMode6Operand
            | OpGroup::AddrModeImm12Operand { .. }
            | OpGroup::T2AddrModeImm8Operand { .. }
            | OpGroup::T2AddrModeImm8s4Operand { .. }
            | OpGroup::T2AddrModeImm0_1020s4Operand
            | OpGroup::ThumbAddrModeImm5S1Operand
            | OpGroup::ThumbAddrModeImm5S2Operand
            | OpGroup::ThumbAddrModeImm5S4Operand
            | OpGroup::ThumbAddrModeRROperand
            | OpGroup::ThumbAddrModeSPOperand
            | OpGroup::AddrModeTBB
            | OpGroup::AddrModeTBH
            | OpGroup::MveAddrModeRQOperand { .. } => 2,
            OpGroup::SORegRegOperand
            | OpGroup::AddrMode2Operand
            | OpGroup::AddrMode3Operand { .. }
            | OpGroup::T2AddrModeSoRegOperand => 3,
            _ => 1,
        }
    }

    /// whether the printer reports a `mem` operand.
    pub fn is_memory(&self) -> bool {
        matches!(
            self,
            OpGroup::AddrMode2Operand
                | OpGroup::AddrMode3Operand { .. }
                | OpGroup::AddrMode5Operand { .. }
                | OpGroup::AddrMode5FP16Operand { .. }
                | OpGroup::AddrMode6Operand
                | OpGroup::AddrMode7Operand
                | OpGroup::AddrModeImm12Operand { .. }
                | OpGroup::T2AddrModeSoRegOperand
                | OpGroup::T2AddrModeImm8Operand { .. }
                | OpGroup::T2AddrModeImm8s4Operand { .. }
                | OpGroup::T2AddrModeImm0_1020s4Operand
                | OpGroup::ThumbLdrLabelOperand
                | OpGroup::ThumbAddrModeImm5S1Operand
                | OpGroup::ThumbAddrModeImm5S2Operand
                | OpGroup::ThumbAddrModeImm5S4Operand
                | OpGroup::ThumbAddrModeRROperand
                | OpGroup::ThumbAddrModeSPOperand
                | OpGroup::AddrModeTBB
                | OpGroup::AddrModeTBH
                | OpGroup::MveAddrModeRQOperand { .. }
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
    IsArm,
    IsThumb,
    IsThumb1Only,
    IsThumb2,
    IsNotMClass,
    IsMClass,
    HasV4T,
    HasV5T,
    HasV6,
    HasV6K,
    HasV6T2,
    HasV7,
    HasV8,
    HasV8_1M,
    HasVfp2,
    HasVfp3,
    HasFullFp16,
    HasNeon,
    HasDsp,
    HasDb,
    HasMveInt,
    HasMveFloat,
    HasFpArmV8,
    HasV8_3A,
    HasAcquireRelease,
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
            Group::IsArm => "arm",
            Group::IsThumb => "thumb",
            Group::IsThumb1Only => "thumb1only",
            Group::IsThumb2 => "thumb2",
            Group::IsNotMClass => "notmclass",
            Group::IsMClass => "mclass",
            Group::HasV4T => "v4t",
            Group::HasV5T => "v5t",
            Group::HasV6 => "v6",
            Group::HasV6K => "v6k",
            Group::HasV6T2 => "v6t2",
            Group::HasV7 => "v7",
            Group::HasV8 => "v8",
            Group::HasV8_1M => "v8_1m",
            Group::HasVfp2 => "vfp2",
            Group::HasVfp3 => "vfp3",
            Group::HasFullFp16 => "fullfp16",
            Group::HasNeon => "neon",
            Group::HasDsp => "dsp",
            Group::HasDb => "db",
            Group::HasMveInt => "mve",
            Group::HasMveFloat => "mvefloat",
            Group::HasFpArmV8 => "fparmv8",
            Group::HasV8_3A => "v8_3a",
            Group::HasAcquireRelease => "acquirerelease",
        }
    }
}
