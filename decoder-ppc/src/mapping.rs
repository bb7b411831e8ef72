//! turns the printing sites of an instruction into [`PpcDetail`] operands.

use decoder::{access_of, writes_any, Access, IdList, Mode, Raw, RawOperand, Registers};

use crate::detail::{BranchCond, Hint, MemOperand, OpKind, PpcDetail, PpcOperand};
use crate::groups::{Group, OpGroup, PredPart};
use crate::regs::{vsx_of, Reg, RegClass};
use crate::table::{Field, InsnDesc, InsnFlags, Opcode};
use crate::PpcInstruction;

/// registers whose write means the record form updated `cr0`.
const CR0_ALIASES: &[Reg] = &[Reg::CR0];

/// predicate codes of branches on a single condition register bit.
const PRED_BIT_SET: i64 = 1024;
const PRED_BIT_UNSET: i64 = 1025;

/// fills the detail record of a single instruction.
///
/// every operation is a no-op on an instruction decoded without detail.
pub struct PpcMapper<'i> {
    ctx: Option<Ctx<'i>>,
}

impl<'i> PpcMapper<'i> {
    pub fn new(insn: &'i mut PpcInstruction) -> Self {
        let (raw, detail) = insn.parts_mut();
        let ctx = detail.map(|detail| Ctx {
            raw,
            desc: raw.opcode.desc(),
            detail,
        });

        Self { ctx }
    }

    pub fn fill(insn: &mut PpcInstruction) {
        let mut mapper = PpcMapper::new(insn);
        mapper.init();

        if let Some(ctx) = mapper.ctx.as_mut() {
            for site in ctx.desc.sites {
                ctx.dispatch(site.group, site.op as usize);
            }
        }

        mapper.finalize();
    }

    pub fn init(&mut self) {
        let Some(ctx) = self.ctx.as_mut() else { return };
        ctx.init();
    }

    pub fn add_group(&mut self, group: OpGroup, op: usize) {
        let Some(ctx) = self.ctx.as_mut() else { return };
        ctx.dispatch(group, op);
    }

    pub fn set_mem_access(&mut self, on: bool) {
        let Some(ctx) = self.ctx.as_mut() else { return };
        if on {
            ctx.begin_mem();
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
    detail: &'i mut PpcDetail,
}

impl Ctx<'_> {
    fn init(&mut self) {
        let bc = self
            .desc
            .bc
            .map(|bc| BranchCond::decode(self.field(bc.bo), self.field(bc.bi)));

        *self.detail = PpcDetail {
            bc,
            writeback: self.desc.flags.contains(InsnFlags::WRITEBACK),
            regs_read: IdList::from_slice(self.desc.uses),
            regs_write: IdList::from_slice(self.desc.defs),
            groups: IdList::from_slice(self.desc.groups),
            ..PpcDetail::default()
        };
    }

    fn finalize(&mut self) {
        assert!(
            !self.detail.operands.is_open(),
            "{:?} left a memory operand open",
            self.raw.opcode
        );

        if self.detail.bc.map_or(false, |bc| bc.decrements_ctr()) {
            self.detail.regs_read.add(Reg::CTR);
            self.detail.regs_write.add(Reg::CTR);
        }

        self.detail.update_cr0 = writes_any(self.detail.regs_write.as_slice(), CR0_ALIASES);

        if self.desc.is_branch() {
            self.detail.groups.add(Group::Jump);
        }
    }

    fn dispatch(&mut self, group: OpGroup, op: usize) {
        match group {
            OpGroup::Operand => self.operand(op),
            OpGroup::MemRegReg => {
                if !self.raw.is_reg(op) {
                    log::trace!("[ppc::mapping] {:?} has no base register", self.raw.opcode);
                    self.operand(op);
                    return self.operand(op + 1);
                }

                self.begin_mem();
                self.mem().base = self.base(op);
                self.mem().offset = self.reg(op + 1);
                self.end_mem();
            }
            OpGroup::MemRegImm => self.disp_base(op, sign_extend(self.imm(op), 16)),
            OpGroup::MemRegImmHash => self.disp_base(op, self.imm(op)),
            OpGroup::MemRegImm34 => self.disp_base(op, sign_extend(self.imm(op), 34)),
            OpGroup::MemRegImm34PcRel => {
                self.begin_mem();
                self.mem().disp = sign_extend(self.imm(op), 34);
                self.end_mem();
            }
            OpGroup::UImm { bits } => self.push_imm(zero_extend(self.imm(op), bits)),
            OpGroup::SImm { bits } => self.push_imm(sign_extend(self.imm(op), bits)),
            OpGroup::ImmZero => {
                if self.imm(op) != 0 {
                    log::trace!("[ppc::mapping] {:?} expects a zero immediate", self.raw.opcode);
                }
                self.push_imm(0);
            }
            OpGroup::BranchOperand | OpGroup::TlsCall => {
                if !self.raw.is_imm(op) {
                    return self.operand(op);
                }

                let offset = branch_offset(self.imm(op));
                if self.raw.opcode.is_abs_branch() {
                    return self.push_imm(offset);
                }

                let target = (self.raw.address as i64).wrapping_add(offset);
                self.push_imm(self.address(target));
            }
            // absolute targets keep their sign in every mode
            OpGroup::AbsBranchOperand => self.push_imm(branch_offset(self.imm(op))),
            OpGroup::PredicateOperand { part } => self.predicate(op, part),
            OpGroup::CrBitMask => self.push_reg(op),
            OpGroup::AtBitsAsHint => {
                let hint = Hint::from_at(self.imm(op) as u8);
                if let Some(bc) = self.detail.bc.as_mut() {
                    bc.hint = hint;
                }
            }
        }
    }

    fn reg(&self, op: usize) -> Reg {
        Reg::from_id(self.raw.reg(op)).unwrap_or(Reg::INVALID)
    }

    fn imm(&self, op: usize) -> i64 {
        self.raw.imm(op)
    }

    /// base register of a memory operand, invalid when it reads as zero.
    fn base(&self, op: usize) -> Reg {
        let reg = self.reg(op);
        if reg.is_literal_zero() {
            Reg::INVALID
        } else {
            reg
        }
    }

    fn field(&self, field: Field) -> u8 {
        let slot = match field {
            Field::Const(value) => return value,
            Field::Slot(slot) => slot as usize,
        };

        match self.raw.op(slot) {
            RawOperand::Imm(imm) => imm as u8,
            RawOperand::Reg(_) => {
                let reg = self.reg(slot);
                match reg.class() {
                    RegClass::CrBit => reg.number().unwrap_or(0),
                    _ => {
                        log::trace!("[ppc::mapping] {reg} isn't a condition register bit");
                        0
                    }
                }
            }
            RawOperand::Empty => 0,
        }
    }

    /// truncate to the address size of the mode.
    fn address(&self, addr: i64) -> i64 {
        if self.raw.mode.contains(Mode::MODE_64) {
            addr
        } else {
            addr as u32 as i64
        }
    }

    fn push(&mut self, kind: OpKind, access: Access) {
        self.detail.operands.push(PpcOperand { kind, access });
    }

    fn push_reg(&mut self, op: usize) {
        let reg = self.reg(op);
        let reg = if self.desc.is_vsx_slot(op) { vsx_of(reg) } else { reg };
        self.push(OpKind::Reg(reg), access_of(self.desc.operands, op));
    }

    fn push_imm(&mut self, imm: i64) {
        self.push(OpKind::Imm(imm), Access::READ);
    }

    fn begin_mem(&mut self) {
        let access = if self.desc.flags.contains(InsnFlags::STORE) {
            Access::WRITE
        } else {
            Access::READ
        };

        self.detail.operands.begin_mem(PpcOperand {
            kind: OpKind::Mem(MemOperand::default()),
            access,
        });
    }

    fn end_mem(&mut self) {
        self.detail.operands.end_mem();
    }

    fn mem(&mut self) -> &mut MemOperand {
        match &mut self.detail.operands.current_mut().kind {
            OpKind::Mem(mem) => mem,
            kind => unreachable!("open operand {kind:?} isn't a memory operand"),
        }
    }

    fn operand(&mut self, op: usize) {
        match self.raw.op(op) {
            RawOperand::Reg(0) | RawOperand::Empty => {}
            RawOperand::Reg(_) => self.push_reg(op),
            RawOperand::Imm(imm) => self.push_imm(imm),
        }
    }

    /// `disp(ra)`, the displacement at `op` and the base after it.
    fn disp_base(&mut self, op: usize, disp: i64) {
        if !self.raw.is_reg(op + 1) {
            log::trace!("[ppc::mapping] {:?} has no base register", self.raw.opcode);
            return self.push_imm(disp);
        }

        self.begin_mem();
        self.mem().disp = disp;
        self.mem().base = self.base(op + 1);
        self.end_mem();
    }

    fn predicate(&mut self, op: usize, part: PredPart) {
        let code = self.imm(op);

        match part {
            PredPart::Cc => {
                let cr = self.reg(op + 1);
                let (bo, bi) = match code {
                    PRED_BIT_SET => (12, cr.number().unwrap_or(0)),
                    PRED_BIT_UNSET => (4, cr.number().unwrap_or(0)),
                    code => {
                        let field = match cr.class() {
                            RegClass::Cr => cr.number().unwrap_or(0),
                            _ => 0,
                        };
                        ((code & 0x1f) as u8, field * 4 + ((code >> 5) & 0b11) as u8)
                    }
                };

                self.detail.bc = Some(BranchCond::decode(bo, bi));
            }
            PredPart::Pm => {
                if code == PRED_BIT_SET || code == PRED_BIT_UNSET {
                    return;
                }

                if let Some(bc) = self.detail.bc.as_mut() {
                    bc.hint = Hint::from_at(code as u8);
                }
            }
            PredPart::Reg => {
                if self.raw.reg(op + 1) != 0 {
                    self.push_reg(op + 1);
                }
            }
        }
    }
}

/// byte offset of a branch target field, counted in words.
fn branch_offset(imm: i64) -> i64 {
    ((imm as u32) << 2) as i32 as i64
}

fn sign_extend(imm: i64, bits: u8) -> i64 {
    let shift = 64 - bits as u32;
    (imm << shift) >> shift
}

fn zero_extend(imm: i64, bits: u8) -> i64 {
    imm & ((1i64 << bits) - 1)
}

/// registers read and written by an instruction, implicit ones first.
pub fn regs_access(detail: &PpcDetail) -> Registers<Reg> {
    let mut regs = Registers::from_implicit(detail.regs_read.as_slice(), detail.regs_write.as_slice());

    for op in detail.operands.iter() {
        match op.kind {
            OpKind::Reg(reg) => regs.access(reg, op.access),
            OpKind::Mem(mem) => {
                if mem.base.is_valid() {
                    let access = if detail.writeback { Access::READ_WRITE } else { Access::READ };
                    regs.access(mem.base, access);
                }
                if mem.offset.is_valid() {
                    regs.read(mem.offset);
                }
            }
            OpKind::Imm(_) | OpKind::Invalid => {}
        }
    }

    regs
}
