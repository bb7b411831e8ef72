use super::{fill, fill_under, imm, r, reg, AL, NOREG};

use arm::regs::Reg;
use arm::{regs_access, ArmDetail, Group, MemOperand, Opcode, ShiftKind};
use decoder::{Access, Mode, OpInfo, OpType, RawOperand};
use proptest::prelude::*;

fn mem_of(detail: &ArmDetail) -> MemOperand {
    let mut mems = detail.operands.iter().filter_map(|op| op.mem());
    match (mems.next(), mems.next()) {
        (Some(mem), None) => *mem,
        _ => panic!("expected a single memory operand in {detail:#?}"),
    }
}

fn mem_index(detail: &ArmDetail) -> usize {
    detail
        .operands
        .iter()
        .position(|op| op.mem().is_some())
        .expect("no memory operand")
}

#[test]
fn immediate_offsets() {
    let detail = fill(Opcode::LDRi12, vec![r(0), r(1), imm(-4), AL, NOREG]);
    let mem = mem_of(&detail);
    assert_eq!((mem.base, mem.index, mem.scale, mem.disp), (Reg::gpr(1), Reg::INVALID, 1, 4));
    assert!(detail.operands[1].subtracted);
    assert_eq!(detail.operands[1].access, Access::READ);

    let detail = fill(Opcode::LDRi12, vec![r(0), r(1), imm(0), AL, NOREG]);
    assert_eq!(mem_of(&detail).disp, 0);
    assert!(!detail.operands[1].subtracted);

    // #-0
    let detail = fill(Opcode::LDRi12, vec![r(0), r(1), imm(i32::MIN as i64), AL, NOREG]);
    assert_eq!(mem_of(&detail).disp, 0);
    assert!(detail.operands[1].subtracted);

    let detail = fill(Opcode::STRi12, vec![r(0), r(1), imm(8), AL, NOREG]);
    assert_eq!(mem_of(&detail).disp, 8);
    assert_eq!(detail.operands[0].access, Access::READ);
    assert_eq!(detail.operands[1].access, Access::WRITE);
}

#[test]
fn addressing_mode_2() {
    // ldr r0, [r1, r2]
    let detail = fill(Opcode::LDRrs, vec![r(0), r(1), r(2), imm(0), AL, NOREG]);
    let mem = mem_of(&detail);
    assert_eq!((mem.base, mem.index), (Reg::gpr(1), Reg::gpr(2)));
    assert_eq!(detail.operands[1].shift.kind, ShiftKind::Invalid);
    assert!(!detail.operands[1].subtracted);

    // ldr r0, [r1, -r2, lsl #2]
    let am2 = (1 << 12) | (2 << 13) | 2;
    let detail = fill(Opcode::LDRrs, vec![r(0), r(1), r(2), imm(am2), AL, NOREG]);
    assert_eq!(detail.operands[1].shift.kind, ShiftKind::Lsl);
    assert_eq!(detail.operands[1].shift.value, 2);
    assert!(detail.operands[1].subtracted);

    // ldr r0, [r1, #-0x10]
    let am2 = (1 << 12) | 0x10;
    let detail = fill(Opcode::LDRrs, vec![r(0), r(1), NOREG, imm(am2), AL, NOREG]);
    let mem = mem_of(&detail);
    assert_eq!((mem.index, mem.disp), (Reg::INVALID, 0x10));
    assert!(detail.operands[1].subtracted);

    // ldr r0, [r1]
    let detail = fill(Opcode::LDRrs, vec![r(0), r(1), NOREG, imm(0), AL, NOREG]);
    let mem = mem_of(&detail);
    assert_eq!((mem.base, mem.index, mem.disp, mem.lshift), (Reg::gpr(1), Reg::INVALID, 0, 0));
    assert_eq!(detail.operands[1].shift.kind, ShiftKind::Invalid);
    assert_eq!(detail.operands[1].shift.value, 0);
    assert!(!detail.operands[1].subtracted);

    // a label instead of a base register
    let detail = fill(Opcode::LDRrs, vec![r(0), imm(0x100), NOREG, imm(0), AL, NOREG]);
    assert_eq!(detail.operands.len(), 2);
    assert_eq!(detail.operands[1].imm(), Some(0x100));
}

#[test]
fn pre_and_post_indexing() {
    let detail = fill(Opcode::LDR_PRE_IMM, vec![r(0), r(1), r(1), imm(4), AL, NOREG]);
    assert_eq!(mem_of(&detail).disp, 4);
    assert!(detail.writeback);
    assert!(!detail.post_index);

    let regs = regs_access(&detail);
    assert_eq!(regs.read, vec![Reg::gpr(1)]);
    assert_eq!(regs.write, vec![Reg::gpr(0), Reg::gpr(1)]);

    // ldr r0, [r1], #-4
    let am2 = (1 << 12) | 4;
    let detail = fill(Opcode::LDR_POST_IMM, vec![r(0), r(1), r(1), NOREG, imm(am2), AL, NOREG]);
    assert_eq!(detail.operands.len(), 3);
    assert_eq!(mem_of(&detail).base, Reg::gpr(1));
    assert_eq!(detail.operands[2].imm(), Some(4));
    assert!(detail.operands[2].subtracted);
    assert!(detail.writeback && detail.post_index);

    // ldr r0, [r1], r2, lsl #2
    let am2 = (2 << 13) | 2;
    let detail = fill(Opcode::LDR_POST_REG, vec![r(0), r(1), r(1), r(2), imm(am2), AL, NOREG]);
    assert_eq!(detail.operands[2].reg(), Some(Reg::gpr(2)));
    assert_eq!(detail.operands[2].shift.kind, ShiftKind::Lsl);
    assert!(!detail.operands[2].subtracted);

    let detail = fill(Opcode::LDRT_POST_IMM, vec![r(0), r(1), r(1), NOREG, imm(0), AL, NOREG]);
    assert!(detail.usermode);
}

#[test]
fn addressing_mode_3() {
    let ldrh = |rm, am3| fill(Opcode::LDRH, vec![r(0), r(1), rm, imm(am3), AL, NOREG]);

    let detail = ldrh(NOREG, 0);
    assert_eq!(mem_of(&detail).disp, 0);
    assert!(!detail.operands[1].subtracted);

    let detail = ldrh(NOREG, (1 << 8) | 6);
    assert_eq!(mem_of(&detail).disp, 6);
    assert!(detail.operands[1].subtracted);

    let detail = ldrh(r(2), 1 << 8);
    assert_eq!(mem_of(&detail).index, Reg::gpr(2));
    assert!(detail.operands[1].subtracted);

    // post indexed forms print the offset outside the brackets
    let detail = ldrh(r(2), 2 << 9);
    assert_eq!(detail.operands.len(), 3);
    assert_eq!(mem_of(&detail).index, Reg::INVALID);
    assert_eq!(detail.operands[2].reg(), Some(Reg::gpr(2)));

    let ops = vec![r(0), r(1), r(1), NOREG, imm((1 << 8) | 4), AL, NOREG];
    let detail = fill(Opcode::LDRH_POST, ops);
    assert_eq!(detail.operands[2].imm(), Some(4));
    assert!(detail.operands[2].subtracted);

    let detail = fill(Opcode::LDRHTr, vec![r(0), r(1), r(1), r(2), imm(0), AL, NOREG]);
    assert_eq!(detail.operands[2].reg(), Some(Reg::gpr(2)));
    assert!(detail.operands[2].subtracted);

    let detail = fill(Opcode::LDRHTi, vec![r(0), r(1), r(1), imm(0x104), AL, NOREG]);
    assert_eq!(detail.operands[2].imm(), Some(4));
    assert!(!detail.operands[2].subtracted);
    assert!(detail.usermode);

    let detail = fill(Opcode::LDRHTi, vec![r(0), r(1), r(1), imm(4), AL, NOREG]);
    assert!(detail.operands[2].subtracted);
}

#[test]
fn coprocessor_and_vfp_offsets() {
    let ldc = |am5| fill(Opcode::LDC_OFFSET, vec![imm(14), imm(5), r(1), imm(am5), AL, NOREG]);
    assert_eq!(mem_of(&ldc(2)).disp, 8);
    assert_eq!(mem_of(&ldc(0)).disp, 0);

    let detail = ldc(0x102);
    assert_eq!(mem_of(&detail).disp, 8);
    assert!(detail.operands[mem_index(&detail)].subtracted);

    let detail = fill(Opcode::VLDRH, vec![reg(Reg::s(0)), r(1), imm(2), AL, NOREG]);
    assert_eq!(mem_of(&detail).disp, 4);

    let detail = fill(Opcode::VLDRD, vec![reg(Reg::d(0)), r(1), imm(0x102), AL, NOREG]);
    assert_eq!(mem_of(&detail).disp, 8);
    assert!(detail.operands[1].subtracted);

    let detail = fill(Opcode::LDC_OPTION, vec![imm(14), imm(5), r(1), imm(3), AL, NOREG]);
    assert_eq!(detail.operands[3].imm(), Some(3));

    let detail = fill(Opcode::LDC_POST, vec![imm(14), imm(5), r(1), imm(0x101), AL, NOREG]);
    assert_eq!(detail.operands[3].imm(), Some(4));
    assert!(!detail.operands[3].subtracted);
}

#[test]
fn thumb2_offsets() {
    let detail = fill(Opcode::t2LDRi8, vec![r(0), r(1), imm(-8), AL, NOREG]);
    assert_eq!(mem_of(&detail).disp, 8);
    assert!(detail.operands[1].subtracted);

    let detail = fill(Opcode::t2LDRi12, vec![r(0), r(1), imm(0xfff), AL, NOREG]);
    assert_eq!(mem_of(&detail).disp, 0xfff);

    let detail = fill(Opcode::t2LDR_PRE, vec![r(0), r(1), r(1), imm(0), AL, NOREG]);
    assert_eq!(mem_of(&detail).disp, 0);
    assert!(detail.writeback);

    let detail = fill(Opcode::t2LDR_POST, vec![r(0), r(1), r(1), imm(-4), AL, NOREG]);
    assert_eq!(detail.operands[2].imm(), Some(4));
    assert!(detail.operands[2].subtracted);

    let detail = fill(Opcode::t2LDRs, vec![r(0), r(1), r(2), imm(2), AL, NOREG]);
    let mem = mem_of(&detail);
    assert_eq!((mem.base, mem.index, mem.lshift), (Reg::gpr(1), Reg::gpr(2), 2));
    assert_eq!(detail.operands[1].shift.kind, ShiftKind::Lsl);

    let detail = fill(Opcode::t2LDRs, vec![r(0), r(1), r(2), imm(0), AL, NOREG]);
    assert_eq!(mem_of(&detail).lshift, 0);
    assert_eq!(detail.operands[1].shift.kind, ShiftKind::Invalid);

    let detail = fill(Opcode::t2LDRDi8, vec![r(0), r(1), r(2), imm(8), AL, NOREG]);
    assert_eq!(mem_of(&detail).disp, 8);

    let ops = vec![r(0), r(1), r(2), r(2), imm(-8), AL, NOREG];
    let detail = fill(Opcode::t2LDRD_POST, ops);
    assert_eq!(detail.operands[3].imm(), Some(8));
    assert!(detail.operands[3].subtracted);

    let detail = fill(Opcode::t2LDREX, vec![r(0), r(1), imm(3), AL, NOREG]);
    assert_eq!(mem_of(&detail).disp, 12);
}

#[test]
fn table_branches() {
    let detail = fill_under(Opcode::t2TBB, vec![r(0), r(1), AL, NOREG], 0, Mode::THUMB);
    let mem = mem_of(&detail);
    assert_eq!((mem.base, mem.index, mem.lshift), (Reg::gpr(0), Reg::gpr(1), 0));
    assert!(detail.groups.contains(Group::Jump));

    let detail = fill_under(Opcode::t2TBH, vec![r(0), r(1), AL, NOREG], 0, Mode::THUMB);
    assert_eq!(mem_of(&detail).lshift, 1);
    assert_eq!(detail.operands[0].shift.kind, ShiftKind::Lsl);
    assert_eq!(detail.operands[0].shift.value, 1);
}

#[test]
fn thumb_offsets() {
    let load = |opcode, offset| fill(opcode, vec![r(0), r(1), imm(offset), AL, NOREG]);

    assert_eq!(mem_of(&load(Opcode::tLDRi, 3)).disp, 12);
    assert_eq!(mem_of(&load(Opcode::tLDRHi, 3)).disp, 6);
    assert_eq!(mem_of(&load(Opcode::tLDRBi, 3)).disp, 3);

    let detail = fill(Opcode::tLDRspi, vec![r(0), reg(Reg::SP), imm(2), AL, NOREG]);
    assert_eq!(mem_of(&detail).base, Reg::SP);
    assert_eq!(mem_of(&detail).disp, 8);

    let detail = fill(Opcode::tLDRr, vec![r(0), r(1), r(2), AL, NOREG]);
    let mem = mem_of(&detail);
    assert_eq!((mem.base, mem.index), (Reg::gpr(1), Reg::gpr(2)));

    let detail = fill(Opcode::tLDRpci, vec![r(0), imm(-8), AL, NOREG]);
    let mem = mem_of(&detail);
    assert_eq!((mem.base, mem.disp), (Reg::PC, 8));
    assert!(detail.operands[1].subtracted);
}

#[test]
fn vector_addressing() {
    let d0 = reg(Reg::d(0));

    let ops = vec![d0, r(1), r(1), imm(16), r(3), AL, NOREG];
    let detail = fill(Opcode::VLD1d32wb_register, ops);
    assert_eq!(detail.operands.len(), 3);
    assert_eq!(mem_of(&detail).align, 16);
    assert_eq!(detail.operands[2].reg(), Some(Reg::gpr(3)));
    assert!(detail.writeback);

    let ops = vec![d0, r(1), r(1), imm(0), NOREG, AL, NOREG];
    let detail = fill(Opcode::VLD1d32wb_register, ops);
    assert_eq!(detail.operands.len(), 2);

    let q = |n| reg(Reg::q(n));
    let ops = vec![q(0), r(0), q(1), imm(0), NOREG, NOREG];
    let detail = fill_under(Opcode::MVE_VLDRWU32_rq, ops, 0, Mode::THUMB);
    let mem = mem_of(&detail);
    assert_eq!((mem.base, mem.index, mem.lshift), (Reg::gpr(0), Reg::q(1), 2));
    assert_eq!(detail.operands[1].shift.kind, ShiftKind::Uxtw);
    assert_eq!(detail.operands[1].shift.value, 2);
    assert_eq!(detail.vcc, None);
}

fn raw_for(info: &OpInfo, value: u8) -> RawOperand {
    match info.kind {
        OpType::Reg | OpType::MemReg => RawOperand::Reg(Reg::gpr(value % 13).id()),
        _ => RawOperand::Imm(value as i64),
    }
}

proptest! {
    #[test]
    fn memory_operands_are_balanced(
        values in proptest::collection::vec(any::<u8>(), 8),
        thumb in any::<bool>(),
    ) {
        let mode = if thumb { Mode::THUMB } else { Mode::default() };

        for opcode in Opcode::ALL {
            let desc = opcode.desc();
            let ops = desc
                .operands
                .iter()
                .zip(values.iter().cycle())
                .map(|(info, value)| raw_for(info, *value))
                .collect();

            let detail = fill_under(*opcode, ops, 0x8000, mode);
            let expected = desc.sites.iter().filter(|site| site.group.is_memory()).count();
            let mems = detail.operands.iter().filter(|op| op.mem().is_some()).count();

            prop_assert_eq!(mems, expected, "{:?}", opcode);
            prop_assert!(!detail.operands.is_open());
        }
    }
}
