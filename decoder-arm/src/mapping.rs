//! turns the printing sites of an instruction into [`ArmDetail`] operands.

use decoder::{access_of, info_of, writes_any, Access, IdList, Raw, RawOperand, Registers};

use crate::addressing::{self, IndexMode, ShiftOpc};
use crate::detail::{
    ApsrMask, ArmDetail, ArmOperand, Barrier, BankedReg, ConditionCode, CpsFlags, CpsMode,
    Endian, MemOperand, OpKind, PsrFields, Shift, ShiftKind, SysReg, Vcc,
};
use crate::groups::{Group, OpGroup};
use crate::regs::{sub_reg_or_self, Reg, SubRegIdx};
use crate::table::{InsnDesc, InsnFlags, Opcode};
use crate::ArmInstruction;

/// registers whose write means the condition flags are updated.
const FLAG_REGS: &[Reg] = &[Reg::CPSR, Reg::APSR, Reg::APSR_NZCV];

/// fills the detail record of a single instruction.
///
/// every operation is a no-op on an instruction decoded without detail.
pub struct ArmMapper<'i> {
    ctx: Option<Ctx<'i>>,
}

impl<'i> ArmMapper<'i> {
    pub fn new(insn: &'i mut ArmInstruction) -> Self {
        let (raw, detail) = insn.parts_mut();
        let ctx = detail.map(|detail| Ctx {
            raw,
            desc: raw.opcode.desc(),
            detail,
        });

        Self { ctx }
    }

    /// run every printing site of the instruction, in rendering order.
    pub fn fill(insn: &mut ArmInstruction) {
        let mut mapper = ArmMapper::new(insn);
        mapper.init();

        if let Some(ctx) = mapper.ctx.as_mut() {
            for site in ctx.desc.sites {
                ctx.dispatch(site.group, site.op as usize);
            }
        }

        mapper.finalize();
    }

    /// reset the detail record and copy the static implicit effects into it.
    pub fn init(&mut self) {
        let Some(ctx) = self.ctx.as_mut() else { return };
        ctx.init();
    }

    pub fn add_group(&mut self, group: OpGroup, op: usize) {
        let Some(ctx) = self.ctx.as_mut() else { return };
        ctx.dispatch(group, op);
    }

    /// open (`true`) or close (`false`) a memory operand.
    pub fn set_mem_access(&mut self, on: bool) {
        let Some(ctx) = self.ctx.as_mut() else { return };
        if on {
            ctx.begin_mem(0);
        } else {
            ctx.end_mem();
        }
    }

    pub fn finalize(&mut self) {
        let Some(ctx) = self.ctx.as_mut() else { return };
        ctx.finalize();
    }
}

struct Ctx<'i> {
    raw: Raw<'i, Opcode>,
    desc: &'static InsnDesc,
    detail: &'i mut ArmDetail,
}

impl Ctx<'_> {
    fn init(&mut self) {
        let flags = self.desc.flags;

        *self.detail = ArmDetail {
            regs_read: IdList::from_slice(self.desc.uses),
            regs_write: IdList::from_slice(self.desc.defs),
            groups: IdList::from_slice(self.desc.groups),
            writeback: flags.contains(InsnFlags::WRITEBACK),
            post_index: flags.contains(InsnFlags::POST_INDEX),
            usermode: flags.contains(InsnFlags::USERMODE),
            ..ArmDetail::default()
        };
    }

    fn finalize(&mut self) {
        assert!(
            !self.detail.operands.is_open(),
            "{:?} left a memory operand open",
            self.raw.opcode
        );

        let explicit = self.detail.operands.iter().any(|op| {
            op.access.contains(Access::WRITE)
                && matches!(op.kind, OpKind::Reg(reg) if FLAG_REGS.contains(&reg))
        });

        self.detail.update_flags = explicit || writes_any(self.detail.regs_write.as_slice(), FLAG_REGS);

        if self.desc.is_branch() {
            self.detail.groups.add(Group::Jump);
        }
    }

    fn dispatch(&mut self, group: OpGroup, op: usize) {
        match group {
            OpGroup::RegImmShift { opc, imm } => self.reg_imm_shift(ShiftOpc::from_bits(opc), imm),
            OpGroup::Operand => self.operand(op),
            OpGroup::SBitModifierOperand => {
                if self.raw.reg(op) == 0 {
                    self.detail.regs_write.remove(Reg::CPSR);
                } else {
                    self.detail.regs_write.add(Reg::CPSR);
                }
            }
            OpGroup::PredicateOperand => {
                let cc = ConditionCode::build(self.imm(op) as u8);
                self.detail.cc = Some(cc);
                if cc != ConditionCode::AL {
                    self.detail.regs_read.add(Reg::CPSR);
                }
            }
            OpGroup::MandatoryPredicateOperand | OpGroup::MandatoryRestrictedPredicateOperand => {
                self.detail.cc = Some(ConditionCode::build(self.imm(op) as u8));
            }
            OpGroup::VPTPredicateOperand => {
                let vcc = match self.imm(op) {
                    1 => Some(Vcc::Then),
                    2 => Some(Vcc::Else),
                    _ => None,
                };

                self.detail.vcc = vcc;
                if vcc.is_some() {
                    self.detail.regs_read.add(Reg::VPR);
                }
            }
            OpGroup::SORegRegOperand => {
                self.push_reg(op);

                let so = addressing::so_reg(self.imm(op + 2) as u32);
                let shift = match so.shift {
                    ShiftOpc::Rrx => Shift {
                        kind: ShiftKind::Rrx,
                        value: 0,
                    },
                    opc => Shift {
                        kind: reg_shift_kind(opc),
                        value: self.reg(op + 1).id() as u32,
                    },
                };

                self.target_mut().shift = shift;
            }
            OpGroup::SORegImmOperand | OpGroup::T2SOOperand => {
                self.push_reg(op);

                let so = addressing::so_reg(self.imm(op + 1) as u32);
                self.reg_imm_shift(so.shift, so.amount);
            }
            OpGroup::ModImmOperand => {
                let bits = self.imm(op) as u32;
                let value = addressing::mod_imm(bits);

                if addressing::encode_mod_imm(value) == Some(bits) {
                    self.push_imm(value as i64);
                } else {
                    self.push_imm((bits & 0xff) as i64);
                    self.push_imm(((bits & 0xf00) >> 7) as i64);
                }
            }
            OpGroup::ThumbS4ImmOperand => self.push_imm(self.imm(op).wrapping_mul(4)),
            OpGroup::ThumbSRImm => {
                let imm = self.imm(op) as u32;
                self.push_imm(addressing::translate_shift_imm(imm) as i64);
            }
            OpGroup::BitfieldInvMaskImmOperand => {
                let (lsb, width) = addressing::bitfield_inv_mask(self.imm(op) as u32);
                self.push_imm(lsb as i64);
                self.push_imm(width as i64);
            }
            OpGroup::PImmediate => self.push(OpKind::PImm(self.imm(op) as u8), Access::READ),
            OpGroup::CImmediate => self.push(OpKind::CImm(self.imm(op) as u8), Access::READ),
            OpGroup::RegisterList => {
                for idx in op..self.raw.len() {
                    let reg = self.reg(idx);
                    if reg.is_valid() {
                        let access = info_of(self.desc.operands, idx).access;
                        self.push(OpKind::Reg(reg), access);
                    }
                }
            }
            OpGroup::CPSIMod => {
                self.detail.cps_mode = match self.imm(op) {
                    2 => Some(CpsMode::Ie),
                    3 => Some(CpsMode::Id),
                    _ => None,
                };
            }
            OpGroup::CPSIFlag => {
                self.detail.cps_flag = Some(CpsFlags::from_bits_truncate(self.imm(op) as u8));
            }
            OpGroup::GPRPairOperand => {
                self.push_sub_regs(op, &[SubRegIdx::Gsub(0), SubRegIdx::Gsub(1)]);
            }
            OpGroup::MemBOption => {
                let v8 = self.raw.mode.contains(decoder::Mode::V8);
                self.detail.mem_barrier = Some(Barrier::memory(self.imm(op) as u8, v8));
            }
            OpGroup::InstSyncBOption => {
                self.detail.mem_barrier = Some(Barrier::instruction(self.imm(op) as u8));
            }
            OpGroup::TraceSyncBOption => {
                self.detail.mem_barrier = Some(Barrier::trace(self.imm(op) as u8));
            }
            OpGroup::FPImmOperand => {
                let fp = addressing::fp_imm(self.imm(op) as u8);
                self.push(OpKind::Fp(fp as f64), Access::READ);
            }
            OpGroup::VectorIndex => {
                let lane = self.imm(op) as u8;
                self.target_mut().vector_index = Some(lane);
            }
            OpGroup::NoHashImmediate => {
                let lane = self.imm(op) as u8;
                self.target_mut().neon_lane = Some(lane);
            }
            OpGroup::ThumbITMask | OpGroup::VPTMask => {
                self.detail.pred_mask = self.imm(op) as u8;
            }
            OpGroup::AddrMode7Operand => {
                self.begin_mem(op);
                self.mem().base = self.reg(op);
                self.end_mem();
            }
            OpGroup::CoprocOptionImm => self.push_imm(self.imm(op)),
            OpGroup::PostIdxImm8Operand => {
                let imm = self.imm(op);
                self.push_imm(imm & 0xff);
                self.target_mut().subtracted = imm & 256 == 0;
            }
            OpGroup::PostIdxImm8s4Operand => {
                let imm = self.imm(op);
                self.push_imm((imm & 0xff) << 2);
                self.target_mut().subtracted = imm & 256 == 0;
            }
            OpGroup::PostIdxRegOperand => {
                self.push_reg(op);
                self.target_mut().subtracted = self.imm(op + 1) == 0;
            }
            OpGroup::ThumbLdrLabelOperand => {
                let (offset, sub) = signed_offset(self.imm(op));

                self.begin_mem(op);
                self.mem().base = Reg::PC;
                self.mem().disp = offset;
                self.current().subtracted = sub;
                self.end_mem();
            }
            OpGroup::ThumbAddrModeImm5S1Operand => self.thumb_imm5(op, 1),
            OpGroup::ThumbAddrModeImm5S2Operand => self.thumb_imm5(op, 2),
            OpGroup::ThumbAddrModeImm5S4Operand | OpGroup::ThumbAddrModeSPOperand => {
                self.thumb_imm5(op, 4)
            }
            OpGroup::ThumbAddrModeRROperand => {
                if !self.raw.is_reg(op) {
                    return self.operand(op);
                }

                self.begin_mem(op);
                self.mem().base = self.reg(op);
                self.mem().index = self.reg(op + 1);
                self.end_mem();
            }
            OpGroup::AddrMode2Operand => self.addr_mode2(op),
            OpGroup::AddrMode2OffsetOperand => {
                let am = addressing::am2(self.imm(op + 1) as u32);

                if self.raw.reg(op) == 0 {
                    self.push_imm(am.offset as i64);
                    self.target_mut().subtracted = am.op.is_sub();
                } else {
                    self.push_reg(op);
                    self.target_mut().subtracted = am.op.is_sub();
                    self.reg_imm_shift(am.shift, am.offset);
                }
            }
            OpGroup::AddrMode3Operand { always_print_imm0 } => self.addr_mode3(op, always_print_imm0),
            OpGroup::AddrMode3OffsetOperand => self.am3_offset(op),
            OpGroup::AddrMode5Operand { always_print_imm0 } => self.addr_mode5(op, always_print_imm0, 4),
            OpGroup::AddrMode5FP16Operand { always_print_imm0 } => {
                self.addr_mode5(op, always_print_imm0, 2)
            }
            OpGroup::AddrMode6Operand => {
                self.begin_mem(op);
                self.mem().base = self.reg(op);
                self.mem().align = self.imm(op + 1) as u32;
                self.end_mem();
            }
            OpGroup::AddrMode6OffsetOperand => {
                if self.raw.reg(op) != 0 {
                    self.push_reg(op);
                }
            }
            OpGroup::AddrModeImm12Operand { always_print_imm0 }
            | OpGroup::T2AddrModeImm8Operand { always_print_imm0 }
            | OpGroup::T2AddrModeImm8s4Operand { always_print_imm0 } => {
                self.imm_offset(op, always_print_imm0)
            }
            OpGroup::T2AddrModeImm8OffsetOperand | OpGroup::T2AddrModeImm8s4OffsetOperand => {
                let (offset, sub) = signed_offset(self.imm(op));
                self.push_imm(offset as i64);
                self.target_mut().subtracted = sub;
            }
            OpGroup::T2AddrModeImm0_1020s4Operand => {
                self.begin_mem(op);
                self.mem().base = self.reg(op);
                self.mem().disp = (self.imm(op + 1) as i32).wrapping_mul(4);
                self.end_mem();
            }
            OpGroup::T2AddrModeSoRegOperand => {
                let amount = self.imm(op + 2) as u32;

                self.begin_mem(op);
                self.mem().base = self.reg(op);
                self.mem().index = self.reg(op + 1);
                if amount != 0 {
                    self.mem().lshift = amount;
                    self.reg_imm_shift(ShiftOpc::Lsl, amount);
                }
                self.end_mem();
            }
            OpGroup::AddrModeTBB | OpGroup::AddrModeTBH => {
                self.begin_mem(op);
                self.mem().base = self.reg(op);
                self.mem().index = self.reg(op + 1);
                if group == OpGroup::AddrModeTBH {
                    self.mem().lshift = 1;
                    self.reg_imm_shift(ShiftOpc::Lsl, 1);
                }
                self.end_mem();
            }
            OpGroup::MveAddrModeRQOperand { shift } => {
                self.begin_mem(op);
                self.mem().base = self.reg(op);
                self.mem().index = self.reg(op + 1);
                if shift > 0 {
                    self.mem().lshift = shift as u32;
                    self.reg_imm_shift(ShiftOpc::Uxtw, shift as u32);
                }
                self.end_mem();
            }
            OpGroup::AdrLabelOperand { scale } => {
                let offset = (self.imm(op) as i32).wrapping_shl(scale as u32);
                if offset == i32::MIN {
                    self.push_imm(0);
                    self.target_mut().subtracted = true;
                } else {
                    self.push_imm(offset as i64);
                }
            }
            OpGroup::BankedRegOperand => {
                let encoding = self.imm(op);
                match u8::try_from(encoding).ok().and_then(BankedReg::from_encoding) {
                    Some(banked) => self.push(OpKind::SysReg(SysReg::Banked(banked)), self.access(op)),
                    None => {
                        log::trace!("[arm::mapping] unknown banked register {encoding:#x}");
                        self.push_imm(encoding);
                    }
                }
            }
            OpGroup::MSRMaskOperand => {
                let sysreg = self.msr_mask(self.imm(op) as u32);
                self.push(OpKind::SysReg(sysreg), Access::WRITE);
            }
            OpGroup::PKHLSLShiftImm => {
                let imm = self.imm(op) as u32;
                if imm != 0 {
                    self.shift_last(ShiftKind::Lsl, imm);
                }
            }
            OpGroup::PKHASRShiftImm => {
                let imm = self.imm(op) as u32;
                self.shift_last(ShiftKind::Asr, addressing::translate_shift_imm(imm));
            }
            OpGroup::ImmPlusOneOperand => self.push_imm(self.imm(op).wrapping_add(1)),
            OpGroup::SetendOperand => {
                let endian = if self.imm(op) != 0 { Endian::Big } else { Endian::Little };
                self.push(OpKind::SetEnd(endian), Access::READ);
            }
            OpGroup::MveSaturateOp => {
                let sat = if self.imm(op) == 1 { 48 } else { 64 };
                self.push_imm(sat);
            }
            OpGroup::ShiftImmOperand => {
                let imm = self.imm(op) as u32;
                let amount = imm & 0x1f;

                if imm & (1 << 5) != 0 {
                    self.shift_last(ShiftKind::Asr, addressing::translate_shift_imm(amount));
                } else if amount != 0 {
                    self.shift_last(ShiftKind::Lsl, amount);
                }
            }
            OpGroup::RotImmOperand => {
                let imm = self.imm(op) as u32;
                if imm != 0 {
                    self.shift_last(ShiftKind::Ror, imm.wrapping_mul(8));
                }
            }
            OpGroup::VMOVModImmOperand => {
                let encoded = self.imm(op);
                match addressing::vmov_mod_imm(encoded as u32) {
                    Some((value, _)) => self.push_imm(value as i64),
                    None => {
                        log::trace!("[arm::mapping] vmov immediate {encoded:#x} isn't expanded");
                        self.push_imm(encoded);
                    }
                }
            }
            OpGroup::FBits16 => self.push_imm(16i64.wrapping_sub(self.imm(op))),
            OpGroup::FBits32 => self.push_imm(32i64.wrapping_sub(self.imm(op))),
            OpGroup::ComplexRotationOp { angle, remainder } => {
                let rot = self.imm(op).wrapping_mul(angle as i64);
                self.push_imm(rot.wrapping_add(remainder as i64));
            }
            OpGroup::VectorListOne | OpGroup::VectorListOneAllLanes => self.push_reg(op),
            OpGroup::VectorListTwo | OpGroup::VectorListTwoAllLanes => {
                self.push_sub_regs(op, &[SubRegIdx::Dsub(0), SubRegIdx::Dsub(1)]);
            }
            OpGroup::VectorListTwoSpaced | OpGroup::VectorListTwoSpacedAllLanes => {
                self.push_sub_regs(op, &[SubRegIdx::Dsub(0), SubRegIdx::Dsub(2)]);
            }
            OpGroup::VectorListThree | OpGroup::VectorListThreeAllLanes => self.push_list(op, 3, 1),
            OpGroup::VectorListFour | OpGroup::VectorListFourAllLanes => self.push_list(op, 4, 1),
            OpGroup::VectorListThreeSpaced | OpGroup::VectorListThreeSpacedAllLanes => {
                self.push_list(op, 3, 2)
            }
            OpGroup::VectorListFourSpaced | OpGroup::VectorListFourSpacedAllLanes => {
                self.push_list(op, 4, 2)
            }
            OpGroup::MveVectorList { regs } => {
                let subs = [
                    SubRegIdx::Qsub(0),
                    SubRegIdx::Qsub(1),
                    SubRegIdx::Qsub(2),
                    SubRegIdx::Qsub(3),
                ];
                self.push_sub_regs(op, &subs[..regs.min(4) as usize]);
            }
        }
    }

    fn reg(&self, op: usize) -> Reg {
        // raw registers are checked when the instruction is built
        Reg::from_id(self.raw.reg(op)).unwrap_or(Reg::INVALID)
    }

    fn imm(&self, op: usize) -> i64 {
        self.raw.imm(op)
    }

    fn access(&self, op: usize) -> Access {
        access_of(self.desc.operands, op)
    }

    fn push(&mut self, kind: OpKind, access: Access) {
        self.detail.operands.push(ArmOperand {
            kind,
            access,
            ..ArmOperand::default()
        });
    }

    fn push_reg(&mut self, op: usize) {
        let reg = self.reg(op);
        self.push(OpKind::Reg(reg), self.access(op));
    }

    fn push_imm(&mut self, imm: i64) {
        self.push(OpKind::Imm(imm), Access::READ);
    }

    /// open a memory operand, accessed the way the table describes slot `op`.
    fn begin_mem(&mut self, op: usize) {
        let access = info_of(self.desc.operands, op).access;
        self.detail.operands.begin_mem(ArmOperand {
            kind: OpKind::Mem(MemOperand::default()),
            access,
            ..ArmOperand::default()
        });
    }

    fn end_mem(&mut self) {
        self.detail.operands.end_mem();
    }

    fn current(&mut self) -> &mut ArmOperand {
        self.detail.operands.current_mut()
    }

    fn mem(&mut self) -> &mut MemOperand {
        match &mut self.current().kind {
            OpKind::Mem(mem) => mem,
            kind => unreachable!("open operand {kind:?} isn't a memory operand"),
        }
    }

    /// the open memory operand, or else the last operand written.
    fn target_mut(&mut self) -> &mut ArmOperand {
        if self.detail.operands.is_open() {
            self.detail.operands.current_mut()
        } else {
            self.detail.operands.at_mut(-1)
        }
    }

    fn shift_last(&mut self, kind: ShiftKind, value: u32) {
        self.target_mut().shift = Shift { kind, value };
    }

    fn reg_imm_shift(&mut self, opc: ShiftOpc, imm: u32) {
        if opc == ShiftOpc::NoShift || (opc == ShiftOpc::Lsl && imm == 0) {
            return;
        }

        let shift = match opc {
            ShiftOpc::Rrx => Shift {
                kind: ShiftKind::Rrx,
                value: 0,
            },
            opc => Shift {
                kind: imm_shift_kind(opc),
                value: addressing::translate_shift_imm(imm),
            },
        };

        self.target_mut().shift = shift;
    }

    fn operand(&mut self, op: usize) {
        match self.raw.op(op) {
            RawOperand::Reg(0) | RawOperand::Empty => {}
            RawOperand::Reg(_) => {
                let reg = self.reg(op);
                if self.detail.operands.is_open() {
                    let mem = self.mem();
                    if mem.base.is_valid() {
                        mem.index = reg;
                    } else {
                        mem.base = reg;
                    }
                } else {
                    self.push_reg(op);
                }
            }
            RawOperand::Imm(imm) => {
                if self.detail.operands.is_open() {
                    self.mem().disp = imm as i32;
                } else if self.raw.opcode.is_relative_branch() {
                    self.push_imm(self.branch_target(imm));
                } else {
                    self.push_imm(imm);
                }
            }
        }
    }

    /// absolute target of a pc relative branch.
    fn branch_target(&self, imm: i64) -> i64 {
        let address = self.raw.address as u32;
        let pc = if self.raw.is_thumb() {
            let pc = address.wrapping_add(4);
            if self.raw.opcode.is_blx_to_arm() {
                pc & !3
            } else {
                pc
            }
        } else {
            address.wrapping_add(8)
        };

        pc.wrapping_add(imm as u32) as i64
    }

    fn push_sub_regs(&mut self, op: usize, idxs: &[SubRegIdx]) {
        let reg = self.reg(op);
        if !reg.is_aggregate() {
            log::trace!("[arm::mapping] {reg} isn't a register tuple");
            return self.push_reg(op);
        }

        let access = self.access(op);
        for idx in idxs {
            self.push(OpKind::Reg(sub_reg_or_self(reg, *idx)), access);
        }
    }

    /// vector lists described by their first `d` register.
    fn push_list(&mut self, op: usize, count: u8, stride: u8) {
        let first = self.reg(op);
        let access = self.access(op);

        let regs: Option<Vec<Reg>> = (0..count).map(|n| first.offset(n * stride)).collect();
        match regs {
            Some(regs) => regs.into_iter().for_each(|reg| self.push(OpKind::Reg(reg), access)),
            None => {
                log::trace!("[arm::mapping] list of {count} starting at {first} runs out of registers");
                self.push(OpKind::Reg(first), access);
            }
        }
    }

    fn thumb_imm5(&mut self, op: usize, scale: i64) {
        if !self.raw.is_reg(op) {
            return self.operand(op);
        }

        self.begin_mem(op);
        self.mem().base = self.reg(op);
        let offset = self.imm(op + 1);
        if offset != 0 {
            self.mem().disp = (offset as i32).wrapping_mul(scale as i32);
        }
        self.end_mem();
    }

    fn addr_mode2(&mut self, op: usize) {
        if !self.raw.is_reg(op) {
            return self.operand(op);
        }

        let am = addressing::am2(self.imm(op + 2) as u32);

        self.begin_mem(op);
        self.mem().base = self.reg(op);

        if self.raw.reg(op + 1) == 0 {
            if am.offset != 0 {
                self.mem().disp = am.offset as i32;
                self.current().subtracted = am.op.is_sub();
            }
        } else {
            self.mem().index = self.reg(op + 1);
            self.current().subtracted = am.op.is_sub();
            self.reg_imm_shift(am.shift, am.offset);
        }

        self.end_mem();
    }

    fn addr_mode3(&mut self, op: usize, always_print_imm0: bool) {
        if !self.raw.is_reg(op) {
            return self.operand(op);
        }

        let am = addressing::am3(self.imm(op + 2) as u32);

        self.begin_mem(op);
        self.mem().base = self.reg(op);

        if am.index_mode == IndexMode::Post {
            self.end_mem();
            return self.am3_offset(op + 1);
        }

        if self.raw.reg(op + 1) != 0 {
            self.mem().index = self.reg(op + 1);
            self.current().subtracted = am.op.is_sub();
        } else if always_print_imm0 || am.offset != 0 || am.op.is_sub() {
            self.mem().disp = am.offset as i32;
            self.current().subtracted = am.op.is_sub();
        }

        self.end_mem();
    }

    fn am3_offset(&mut self, op: usize) {
        let am = addressing::am3(self.imm(op + 1) as u32);

        if self.raw.reg(op) != 0 {
            self.push_reg(op);
        } else {
            self.push_imm(am.offset as i64);
        }

        self.target_mut().subtracted = am.op.is_sub();
    }

    fn addr_mode5(&mut self, op: usize, always_print_imm0: bool, scale: u32) {
        if !self.raw.is_reg(op) {
            return self.operand(op);
        }

        let am = addressing::am5(self.imm(op + 1) as u32);

        self.begin_mem(op);
        self.mem().base = self.reg(op);

        let offset = am.offset * scale;
        if always_print_imm0 || offset != 0 || am.op.is_sub() {
            self.mem().disp = offset as i32;
            self.current().subtracted = am.op.is_sub();
        }

        self.end_mem();
    }

    /// `[rn, #+/-imm]` with a signed immediate where `i32::MIN` stands for `#-0`.
    fn imm_offset(&mut self, op: usize, always_print_imm0: bool) {
        if !self.raw.is_reg(op) {
            return self.operand(op);
        }

        let (offset, sub) = signed_offset(self.imm(op + 1));

        self.begin_mem(op);
        self.mem().base = self.reg(op);

        if sub {
            self.mem().disp = offset;
            self.current().subtracted = true;
        } else if always_print_imm0 || offset > 0 {
            self.mem().disp = offset;
        }

        self.end_mem();
    }

    fn msr_mask(&self, imm: u32) -> SysReg {
        if self.raw.mode.contains(decoder::Mode::MCLASS) {
            return SysReg::MClass((imm & 0xfff) as u16);
        }

        let spsr = (imm >> 4) != 0;
        let mask = imm & 0xf;

        if !spsr {
            match mask {
                8 => return SysReg::Apsr(ApsrMask::Nzcvq),
                4 => return SysReg::Apsr(ApsrMask::G),
                12 => return SysReg::Apsr(ApsrMask::Nzcvqg),
                _ => {}
            }
        }

        let fields = PsrFields::from_bits_truncate(mask as u8);
        if spsr {
            SysReg::Spsr(fields)
        } else {
            SysReg::Cpsr(fields)
        }
    }
}

/// split an offset into its magnitude and sign, `i32::MIN` encodes `-0`.
fn signed_offset(imm: i64) -> (i32, bool) {
    let offset = imm as i32;
    if offset == i32::MIN {
        return (0, true);
    }

    (offset.abs(), offset < 0)
}

fn imm_shift_kind(opc: ShiftOpc) -> ShiftKind {
    match opc {
        ShiftOpc::NoShift => ShiftKind::Invalid,
        ShiftOpc::Asr => ShiftKind::Asr,
        ShiftOpc::Lsl => ShiftKind::Lsl,
        ShiftOpc::Lsr => ShiftKind::Lsr,
        ShiftOpc::Ror => ShiftKind::Ror,
        ShiftOpc::Rrx => ShiftKind::Rrx,
        ShiftOpc::Uxtw => ShiftKind::Uxtw,
    }
}

fn reg_shift_kind(opc: ShiftOpc) -> ShiftKind {
    match opc {
        ShiftOpc::Asr => ShiftKind::AsrReg,
        ShiftOpc::Lsl => ShiftKind::LslReg,
        ShiftOpc::Lsr => ShiftKind::LsrReg,
        ShiftOpc::Ror => ShiftKind::RorReg,
        ShiftOpc::Rrx => ShiftKind::RrxReg,
        ShiftOpc::NoShift | ShiftOpc::Uxtw => ShiftKind::Invalid,
    }
}

/// registers read and written by an instruction, implicit ones first.
pub fn regs_access(detail: &ArmDetail) -> Registers<Reg> {
    let mut regs = Registers::from_implicit(detail.regs_read.as_slice(), detail.regs_write.as_slice());

    for op in detail.operands.iter() {
        match op.kind {
            OpKind::Reg(reg) => regs.access(reg, op.access),
            OpKind::Mem(mem) => {
                if mem.base.is_valid() {
                    let access = if detail.writeback { Access::READ_WRITE } else { Access::READ };
                    regs.access(mem.base, access);
                }
                if mem.index.is_valid() {
                    regs.read(mem.index);
                }
            }
            _ => {}
        }

        if op.shift.kind.by_register() {
            if let Some(reg) = Reg::from_id(op.shift.value as u16).filter(|reg| reg.is_valid()) {
                regs.read(reg);
            }
        }
    }

    regs
}
