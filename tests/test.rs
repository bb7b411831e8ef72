use opdetail::{Arch, Config, Detail, ErrorKind, Handle, Instruction, Mode, RawOperand, Reg};

fn imm(imm: i64) -> RawOperand {
    RawOperand::Imm(imm)
}

fn arm_reg(reg: arm::Reg) -> RawOperand {
    RawOperand::Reg(reg.id())
}

fn ppc_reg(reg: ppc::Reg) -> RawOperand {
    RawOperand::Reg(reg.id())
}

fn decode(handle: &Handle, opcode: u16, ops: Vec<RawOperand>, address: u64) -> Instruction {
    match handle.decode(opcode, ops, address) {
        Ok(insn) => insn,
        Err(e) => panic!("failed to decode opcode {opcode}: {e}"),
    }
}

#[test]
fn arm_instructions() {
    let handle = Handle::new(Arch::Arm, Mode::default());
    let ops = vec![imm(0x10), imm(0), RawOperand::Reg(0)];
    let insn = decode(&handle, arm::Opcode::Bcc as u16, ops, 0x1000);

    assert_eq!(insn.arch(), Arch::Arm);
    assert_eq!(insn.mnemonic(), "b");
    assert_eq!(insn.address(), 0x1000);

    match insn.detail() {
        Ok(Detail::Arm(detail)) => assert_eq!(detail.operands[0].imm(), Some(0x1018)),
        other => panic!("expected an arm detail record, got {other:?}"),
    }
}

#[test]
fn ppc_instructions() {
    let handle = Handle::new(Arch::Ppc, Mode::BIG_ENDIAN);
    let insn = decode(&handle, ppc::Opcode::MTLR as u16, vec![ppc_reg(ppc::Reg::r(3))], 0);

    assert_eq!(insn.arch(), Arch::Ppc);
    assert_eq!(insn.mnemonic(), "mtlr");

    let regs = insn.regs_access().unwrap();
    assert_eq!(regs.read, [Reg::Ppc(ppc::Reg::r(3))]);
    assert_eq!(regs.write, [Reg::Ppc(ppc::Reg::LR)]);
    assert_eq!(regs.write[0].to_string(), "lr");
}

#[test]
fn implicit_registers_come_first() {
    let handle = Handle::new(Arch::Arm, Mode::THUMB);
    let ops = vec![imm(14), RawOperand::Reg(0), arm_reg(arm::Reg::gpr(4))];
    let insn = handle.arm(arm::Opcode::tPOP, ops, 0).unwrap();

    let regs = insn.regs_access().unwrap();
    assert_eq!(regs.read, [Reg::Arm(arm::Reg::SP)]);
    assert_eq!(regs.write, [Reg::Arm(arm::Reg::SP), Reg::Arm(arm::Reg::gpr(4))]);
}

#[test]
fn opcodes_belong_to_the_handle_arch() {
    let handle = Handle::new(Arch::Ppc, Mode::BIG_ENDIAN);
    let err = handle.arm(arm::Opcode::tPOP, vec![], 0).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidOpcode);

    let err = handle.decode(u16::MAX, vec![], 0).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidOpcode);
}

#[test]
fn operand_tables_are_checked() {
    let handle = Handle::new(Arch::Ppc, Mode::BIG_ENDIAN);
    let err = handle.ppc(ppc::Opcode::MTLR, vec![], 0).unwrap_err();
    assert_eq!(err.kind, ErrorKind::OperandCount);
}

#[test]
fn disabled_detail() {
    let handle = Handle::new(Arch::Ppc, Mode::BIG_ENDIAN).with_detail(false);
    let insn = decode(&handle, ppc::Opcode::BDNZ as u16, vec![imm(4)], 0);

    assert_eq!(insn.mnemonic(), "bdnz");
    assert_eq!(insn.detail().unwrap_err().kind, ErrorKind::DetailDisabled);
    assert_eq!(insn.regs_access().unwrap_err().kind, ErrorKind::DetailDisabled);
}

#[test]
fn handles_from_config() {
    let config: Config = "arch: powerpc\nmode: [big_endian, mode_64]\ndetail: false\n".parse().unwrap();
    let handle = Handle::from(&config);

    assert_eq!(handle.arch(), Arch::Ppc);
    assert_eq!(handle.mode(), Mode::BIG_ENDIAN | Mode::MODE_64);
    assert!(!handle.detail());

    let handle = Handle::from(&"".parse::<Config>().unwrap());
    assert_eq!(handle, Handle::new(Arch::Arm, Mode::default()));
}

#[test]
fn listing() {
    let handle = Handle::new(Arch::Ppc, Mode::BIG_ENDIAN);
    let insn = decode(&handle, ppc::Opcode::MTLR as u16, vec![ppc_reg(ppc::Reg::r(3))], 0);
    let listing = insn.detail().unwrap().to_string();

    assert!(listing.starts_with("\top_count: 1\n"));
    assert!(listing.contains("\t\toperands[0].type: REG = r3\n"));
}
