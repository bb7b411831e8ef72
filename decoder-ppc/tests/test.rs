use decoder::{Access, ErrorKind, Mode, OpInfo, OpType, RawOperand};
use ppc::regs::Reg;
use ppc::{
    regs_access, CrBit, Group, Hint, MemOperand, Opcode, PpcDetail, PpcMapper, PredCr, PredCtr,
};
use proptest::prelude::*;

fn r(n: u8) -> RawOperand {
    RawOperand::Reg(Reg::r(n).id())
}

fn reg(reg: Reg) -> RawOperand {
    RawOperand::Reg(reg.id())
}

fn imm(imm: i64) -> RawOperand {
    RawOperand::Imm(imm)
}

fn fill_under(opcode: Opcode, ops: Vec<RawOperand>, address: u64, mode: Mode) -> PpcDetail {
    let mut insn = match ppc::instruction(opcode, ops, address, mode, true) {
        Ok(insn) => insn,
        Err(e) => panic!("failed to build {opcode:?}: {e}"),
    };

    PpcMapper::fill(&mut insn);
    insn.detail().cloned().expect("instruction was built with detail")
}

fn fill_at(opcode: Opcode, ops: Vec<RawOperand>, address: u64) -> PpcDetail {
    fill_under(opcode, ops, address, Mode::BIG_ENDIAN)
}

fn fill(opcode: Opcode, ops: Vec<RawOperand>) -> PpcDetail {
    fill_at(opcode, ops, 0)
}

fn regs_of(detail: &PpcDetail) -> Vec<Reg> {
    detail.operands.iter().filter_map(|op| op.reg()).collect()
}

fn imms_of(detail: &PpcDetail) -> Vec<i64> {
    detail.operands.iter().filter_map(|op| op.imm()).collect()
}

fn mem_of(detail: &PpcDetail) -> MemOperand {
    let mut mems = detail.operands.iter().filter_map(|op| op.mem());
    match (mems.next(), mems.next()) {
        (Some(mem), None) => *mem,
        _ => panic!("expected a single memory operand in {detail:#?}"),
    }
}

/// `(bi << 5) | bo` predicate codes.
const PRED_LT_PLUS: i64 = 15;
const PRED_GE_MINUS: i64 = 6;
const PRED_EQ: i64 = (2 << 5) | 12;
const PRED_BIT_SET: i64 = 1024;
const PRED_BIT_UNSET: i64 = 1025;

#[test]
fn arithmetic() {
    let detail = fill(Opcode::ADDI, vec![r(3), r(1), imm(0xfff0)]);

    assert_eq!(regs_of(&detail), [Reg::r(3), Reg::r(1)]);
    assert_eq!(imms_of(&detail), [-16]);
    assert_eq!(detail.operands[0].access, Access::WRITE);
    assert_eq!(detail.operands[1].access, Access::READ);
    assert!(detail.bc.is_none());

    // li
    let detail = fill(Opcode::ADDI, vec![r(3), reg(Reg::ZERO), imm(5)]);
    assert_eq!(regs_of(&detail), [Reg::r(3), Reg::ZERO]);
}

#[test]
fn record_forms_update_cr0() {
    let detail = fill(Opcode::ADD4_rec, vec![r(3), r(4), r(5)]);
    assert!(detail.update_cr0);
    assert_eq!(detail.regs_write.as_slice(), [Reg::CR0]);

    assert!(!fill(Opcode::ADD4, vec![r(3), r(4), r(5)]).update_cr0);

    let detail = fill(Opcode::ADDIC_rec, vec![r(3), r(4), imm(1)]);
    assert!(detail.update_cr0);
    assert_eq!(detail.regs_write.as_slice(), [Reg::CARRY, Reg::CR0]);

    // floating point record forms go to cr1
    let detail = fill(Opcode::FADD_rec, vec![reg(Reg::f(1)), reg(Reg::f(2)), reg(Reg::f(3))]);
    assert!(!detail.update_cr0);
    assert!(detail.regs_write.contains(Reg::CR1));
}

#[test]
fn immediate_widths() {
    assert_eq!(imms_of(&fill(Opcode::ORI, vec![r(3), r(3), imm(-1)])), [0xffff]);
    assert_eq!(
        imms_of(&fill(Opcode::RLWINM, vec![r(3), r(4), imm(33), imm(0), imm(31)])),
        [1, 0, 31]
    );
    assert_eq!(imms_of(&fill(Opcode::VSPLTISW, vec![reg(Reg::v(1)), imm(0x1f)])), [-1]);
    assert_eq!(imms_of(&fill(Opcode::XXSPLTIB, vec![reg(Reg::vs(40)), imm(0x1ff)])), [0xff]);
    assert_eq!(imms_of(&fill(Opcode::PLI, vec![r(3), imm(0x2_0000_0000)])), [-0x2_0000_0000]);

    let detail = fill(Opcode::MTFSFI, vec![imm(7), imm(15), imm(1)]);
    assert_eq!(imms_of(&detail), [7, 15, 1]);
    assert_eq!(detail.regs_write.as_slice(), [Reg::RM]);

    let detail = fill(Opcode::PADDIpc, vec![r(3), imm(0), imm(42)]);
    assert_eq!(imms_of(&detail), [0, 42]);
}

#[test]
fn displacement_forms() {
    let detail = fill(Opcode::LWZ, vec![r(3), imm(0xfff8), r(1)]);

    assert_eq!(detail.operands.len(), 2);
    assert_eq!(
        mem_of(&detail),
        MemOperand {
            base: Reg::r(1),
            offset: Reg::INVALID,
            disp: -8,
        }
    );
    assert_eq!(detail.operands[1].access, Access::READ);

    // r0 as a base reads as zero
    let detail = fill(Opcode::LWZ, vec![r(3), imm(0x10), r(0)]);
    assert_eq!(mem_of(&detail).base, Reg::INVALID);
    assert_eq!(mem_of(&detail).disp, 0x10);

    let detail = fill(Opcode::STW, vec![r(3), imm(4), r(1)]);
    assert_eq!(detail.operands[0].access, Access::READ);
    assert_eq!(detail.operands[1].access, Access::WRITE);

    let detail = fill(Opcode::PLWZ, vec![r(3), imm(0x3_ffff_fff0), r(4)]);
    assert_eq!((mem_of(&detail).base, mem_of(&detail).disp), (Reg::r(4), -16));

    let detail = fill(Opcode::PLWZpc, vec![r(3), imm(0x100), imm(0)]);
    assert_eq!((mem_of(&detail).base, mem_of(&detail).disp), (Reg::INVALID, 0x100));

    let detail = fill(Opcode::HASHST, vec![r(5), imm(-8), r(1)]);
    assert_eq!((mem_of(&detail).base, mem_of(&detail).disp), (Reg::r(1), -8));
    assert_eq!(detail.operands[1].access, Access::WRITE);
}

#[test]
fn indexed_forms() {
    let detail = fill(Opcode::LWZX, vec![r(3), r(5), r(4)]);
    assert_eq!((mem_of(&detail).base, mem_of(&detail).offset), (Reg::r(5), Reg::r(4)));

    let detail = fill(Opcode::LWZX, vec![r(3), r(0), r(4)]);
    assert_eq!((mem_of(&detail).base, mem_of(&detail).offset), (Reg::INVALID, Reg::r(4)));

    let detail = fill(Opcode::LXVX, vec![reg(Reg::vs(1)), reg(Reg::ZERO8), r(9)]);
    assert_eq!(mem_of(&detail).base, Reg::INVALID);
}

#[test]
fn update_forms_write_the_base() {
    let detail = fill(Opcode::LWZU, vec![r(3), r(1), imm(8), r(1)]);
    assert_eq!(detail.operands.len(), 2);
    assert!(detail.writeback);

    let regs = regs_access(&detail);
    assert_eq!(regs.read, [Reg::r(1)]);
    assert_eq!(regs.write, [Reg::r(3), Reg::r(1)]);

    let detail = fill(Opcode::STWU, vec![r(1), r(3), imm(-16), r(1)]);
    assert_eq!(regs_of(&detail), [Reg::r(3)]);
    assert_eq!((mem_of(&detail).base, mem_of(&detail).disp), (Reg::r(1), -16));

    let regs = regs_access(&detail);
    assert_eq!(regs.read, [Reg::r(3), Reg::r(1)]);
    assert_eq!(regs.write, [Reg::r(1)]);
}

#[test]
fn relative_branch_targets() {
    let detail = fill_at(Opcode::B, vec![imm(0x10)], 0x1000);
    assert_eq!(imms_of(&detail), [0x1040]);
    assert!(detail.groups.contains(Group::Jump));
    assert!(detail.groups.contains(Group::BranchRelative));

    assert_eq!(imms_of(&fill_at(Opcode::B, vec![imm(-4)], 0x1000)), [0xff0]);

    // 32 bit targets wrap
    assert_eq!(imms_of(&fill_at(Opcode::B, vec![imm(-0x401)], 0)), [0xffff_effc]);

    let detail = fill_at(Opcode::BL, vec![imm(0x10)], 0x1000);
    assert_eq!(imms_of(&detail), [0x1040]);
    assert!(detail.groups.contains(Group::Call));
    assert!(!detail.groups.contains(Group::Jump));
    assert_eq!(detail.regs_write.as_slice(), [Reg::LR]);

    let detail = fill_at(Opcode::BL_TLS, vec![imm(0x10), imm(0)], 0x1000);
    assert_eq!(imms_of(&detail), [0x1040]);
}

#[test]
fn absolute_branch_targets() {
    assert_eq!(imms_of(&fill_at(Opcode::BA, vec![imm(0x100)], 0x5000)), [0x400]);
    assert_eq!(imms_of(&fill_at(Opcode::BLA, vec![imm(0x40)], 0x5000)), [0x100]);

    let detail = fill_at(Opcode::BCCA, vec![imm(PRED_EQ), reg(Reg::CR0), imm(0x8)], 0x5000);
    assert_eq!(imms_of(&detail), [0x20]);

    // negative targets aren't truncated to 32 bits
    assert_eq!(imms_of(&fill_at(Opcode::BA, vec![imm(-4)], 0x5000)), [-16]);
    assert_eq!(imms_of(&fill_under(Opcode::BA, vec![imm(-4)], 0, Mode::MODE_64)), [-16]);
    assert_eq!(imms_of(&fill_at(Opcode::gBCA, vec![imm(12), reg(Reg::cr_bit(2)), imm(-1)], 0)), [12, -4]);
}

#[test]
fn conditional_branches() {
    let detail = fill_at(Opcode::BCC, vec![imm(PRED_EQ), reg(Reg::cr(1)), imm(8)], 0x2000);

    assert_eq!(regs_of(&detail), [Reg::cr(1)]);
    assert_eq!(imms_of(&detail), [0x2020]);
    assert_eq!(detail.operands[0].access, Access::READ);

    let bc = detail.bc.expect("branch condition");
    assert_eq!((bc.bo, bc.bi), (12, 6));
    assert_eq!(bc.crx, Reg::cr(1));
    assert_eq!(bc.crx_bit, CrBit::Eq);
    assert_eq!(bc.pred_cr, Some(PredCr::Eq));
    assert_eq!(bc.pred_ctr, None);
    assert_eq!(bc.hint, Hint::None);
    assert!(!detail.regs_read.contains(Reg::CTR));
    assert!(detail.groups.contains(Group::Jump));

    let bc = fill(Opcode::BCC, vec![imm(PRED_LT_PLUS), reg(Reg::CR0), imm(2)]).bc.expect("bc");
    assert_eq!((bc.pred_cr, bc.hint), (Some(PredCr::Lt), Hint::Likely));

    let bc = fill(Opcode::BCC, vec![imm(PRED_GE_MINUS), reg(Reg::CR0), imm(2)]).bc.expect("bc");
    assert_eq!((bc.pred_cr, bc.hint), (Some(PredCr::Ge), Hint::Unlikely));
}

#[test]
fn branches_on_a_single_bit() {
    let detail = fill(Opcode::BCC, vec![imm(PRED_BIT_SET), reg(Reg::cr_bit(9)), imm(2)]);
    let bc = detail.bc.expect("branch condition");
    assert_eq!((bc.bo, bc.bi, bc.crx), (12, 9, Reg::cr(2)));
    assert_eq!(bc.pred_cr, Some(PredCr::Gt));
    assert_eq!(regs_of(&detail), [Reg::cr_bit(9)]);

    let bc = fill(Opcode::BCC, vec![imm(PRED_BIT_UNSET), reg(Reg::cr_bit(9)), imm(2)])
        .bc
        .expect("bc");
    assert_eq!(bc.pred_cr, Some(PredCr::Le));

    let bc = fill(Opcode::BC, vec![reg(Reg::cr_bit(5)), imm(2)]).bc.expect("bc");
    assert_eq!((bc.crx, bc.crx_bit, bc.pred_cr), (Reg::cr(1), CrBit::Gt, Some(PredCr::Gt)));

    let bc = fill(Opcode::BCn, vec![reg(Reg::cr_bit(5)), imm(2)]).bc.expect("bc");
    assert_eq!(bc.pred_cr, Some(PredCr::Le));
}

#[test]
fn conditional_returns() {
    let detail = fill(Opcode::BCCLR, vec![imm(PRED_EQ), reg(Reg::CR0)]);

    assert_eq!(regs_of(&detail), [Reg::CR0]);
    assert_eq!(detail.bc.map(|bc| bc.pred_cr), Some(Some(PredCr::Eq)));
    assert_eq!(detail.regs_read.as_slice(), [Reg::LR]);
    assert!(detail.groups.contains(Group::Ret));
    assert!(detail.groups.contains(Group::Jump));
}

#[test]
fn count_register_branches() {
    let detail = fill_at(Opcode::BDNZ, vec![imm(-4)], 0x100);

    assert_eq!(imms_of(&detail), [0xf0]);
    let bc = detail.bc.expect("branch condition");
    assert_eq!((bc.pred_ctr, bc.pred_cr), (Some(PredCtr::Nz), None));
    assert!(detail.regs_read.contains(Reg::CTR));
    assert!(detail.regs_write.contains(Reg::CTR));

    let detail = fill(Opcode::BDZA, vec![imm(0x10)]);
    assert_eq!(imms_of(&detail), [0x40]);
    assert_eq!(detail.bc.and_then(|bc| bc.pred_ctr), Some(PredCtr::Z));

    let detail = fill(Opcode::BDNZLR, vec![]);
    assert_eq!(detail.regs_read.as_slice(), [Reg::LR, Reg::CTR]);
    assert_eq!(detail.regs_write.as_slice(), [Reg::CTR]);
}

#[test]
fn spelled_out_conditions() {
    // bdnzt eq
    let detail = fill_at(Opcode::gBC, vec![imm(8), reg(Reg::cr_bit(2)), imm(4)], 0x100);

    assert_eq!(imms_of(&detail), [8, 0x110]);
    assert_eq!(regs_of(&detail), [Reg::cr_bit(2)]);
    let bc = detail.bc.expect("branch condition");
    assert_eq!((bc.pred_ctr, bc.pred_cr), (Some(PredCtr::Nz), Some(PredCr::Eq)));
    assert!(detail.regs_write.contains(Reg::CTR));

    let detail = fill(Opcode::gBCat, vec![imm(12), imm(3), reg(Reg::cr_bit(0)), imm(4)]);
    let bc = detail.bc.expect("branch condition");
    assert_eq!((bc.pred_cr, bc.hint), (Some(PredCr::Lt), Hint::Likely));
    assert_eq!(imms_of(&detail), [12, 0x10]);
}

#[test]
fn condition_register_fields() {
    let detail = fill(Opcode::MFOCRF, vec![r(3), reg(Reg::cr(2))]);
    assert_eq!(regs_of(&detail), [Reg::r(3), Reg::cr(2)]);
    assert_eq!(detail.operands[1].access, Access::READ);

    let detail = fill(Opcode::MTOCRF, vec![reg(Reg::cr(7)), r(3)]);
    assert_eq!(regs_of(&detail), [Reg::cr(7), Reg::r(3)]);
    assert_eq!(detail.operands[0].access, Access::WRITE);

    let detail = fill(Opcode::CMPWI, vec![reg(Reg::cr(1)), r(3), imm(-1)]);
    assert_eq!(imms_of(&detail), [-1]);
    assert!(!detail.update_cr0);
}

#[test]
fn vsx_overlaps() {
    let detail = fill(Opcode::XSADDDP, vec![reg(Reg::f(1)), reg(Reg::f(2)), reg(Reg::vs(3))]);
    assert_eq!(regs_of(&detail), [Reg::vs(1), Reg::vs(2), Reg::vs(3)]);

    let detail = fill(Opcode::XXLOR, vec![reg(Reg::v(0)), reg(Reg::v(1)), reg(Reg::vs(2))]);
    assert_eq!(regs_of(&detail), [Reg::vs(32), Reg::vs(33), Reg::vs(2)]);

    let detail = fill(Opcode::FADD, vec![reg(Reg::f(1)), reg(Reg::f(2)), reg(Reg::f(3))]);
    assert_eq!(regs_of(&detail), [Reg::f(1), Reg::f(2), Reg::f(3)]);

    let detail = fill(Opcode::LXV, vec![reg(Reg::v(2)), imm(16), r(3)]);
    assert_eq!(regs_of(&detail), [Reg::vs(34)]);
    assert_eq!((mem_of(&detail).base, mem_of(&detail).disp), (Reg::r(3), 16));
}

#[test]
fn implicit_registers_come_first() {
    let regs = regs_access(&fill(Opcode::MTLR, vec![r(3)]));
    assert_eq!(regs.read, [Reg::r(3)]);
    assert_eq!(regs.write, [Reg::LR]);

    let regs = regs_access(&fill(Opcode::BCTRL, vec![]));
    assert_eq!(regs.read, [Reg::CTR]);
    assert_eq!(regs.write, [Reg::LR]);

    let regs = regs_access(&fill(Opcode::ADD4_rec, vec![r(3), r(3), r(4)]));
    assert_eq!(regs.read, [Reg::r(3), Reg::r(4)]);
    assert_eq!(regs.write, [Reg::CR0, Reg::r(3)]);
}

#[test]
fn disabled_detail_is_left_alone() {
    let mut insn = ppc::instruction(Opcode::BDNZ, vec![imm(4)], 0, Mode::default(), false)
        .expect("valid operands");

    PpcMapper::fill(&mut insn);
    assert!(insn.detail().is_none());

    let mut mapper = PpcMapper::new(&mut insn);
    mapper.set_mem_access(true);
    mapper.finalize();
    assert!(!insn.has_detail());
}

#[test]
fn operand_tables_are_checked() {
    let err = ppc::instruction(Opcode::ADDI, vec![r(3), r(1)], 0, Mode::default(), true)
        .expect_err("missing operand");
    assert_eq!(err.kind, ErrorKind::OperandCount);

    let err = ppc::instruction(Opcode::ADDI, vec![r(3), r(1), r(2)], 0, Mode::default(), true)
        .expect_err("register in an immediate slot");
    assert_eq!((err.kind, err.operand()), (ErrorKind::InvalidOperand, Some(2)));

    let err = ppc::validate(Opcode::ADDI, &[RawOperand::Reg(999), r(1), imm(0)])
        .expect_err("unknown register");
    assert_eq!((err.kind, err.operand()), (ErrorKind::InvalidRegister, Some(0)));
}

#[test]
fn cstool_style_listing() {
    let detail = fill_at(Opcode::BCC, vec![imm(PRED_EQ), reg(Reg::cr(1)), imm(8)], 0x2000);

    let expected = "\top_count: 2\n\
        \t\toperands[0].type: REG = cr1\n\
        \t\toperands[0].access: READ\n\
        \t\toperands[1].type: IMM = 0x2020\n\
        \t\toperands[1].access: READ\n\
        \tBranch:\n\
        \t\tbi: 6\n\
        \t\tbo: 12\n\
        \t\tcrX bit: eq\n\
        \t\tcrX: cr1\n\
        \t\tpred CR-bit: eq\n\
        \tGroups: branch_relative jump\n";

    assert_eq!(detail.to_string(), expected);
}

fn raw_for(info: &OpInfo, value: u8) -> RawOperand {
    match info.kind {
        OpType::Reg | OpType::MemReg => r(value % 32),
        _ => imm(value as i64),
    }
}

proptest! {
    #[test]
    fn memory_operands_are_balanced(
        values in proptest::collection::vec(any::<u8>(), 8),
        wide in any::<bool>(),
    ) {
        let mode = if wide { Mode::MODE_64 } else { Mode::default() };

        for opcode in Opcode::ALL {
            let desc = opcode.desc();
            let ops = desc
                .operands
                .iter()
                .zip(values.iter().cycle())
                .map(|(info, value)| raw_for(info, *value))
                .collect();

            let detail = fill_under(*opcode, ops, 0x1000_0000, mode);
            let expected = desc.sites.iter().filter(|site| site.group.is_memory()).count();
            let mems = detail.operands.iter().filter(|op| op.mem().is_some()).count();

            prop_assert_eq!(mems, expected, "{:?}", opcode);
            prop_assert!(!detail.operands.is_open());
            prop_assert_eq!(detail.groups.contains(Group::Jump), desc.is_branch());
        }
    }
}
