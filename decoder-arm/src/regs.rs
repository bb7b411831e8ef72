//! registers, register classes and the sub-register hierarchy.

use rustc_hash::FxHashMap;
use std::fmt;

use once_cell::sync::Lazy;

const SPECIAL_NAMES: [&str; 22] = [
    "apsr",
    "apsr_nzcv",
    "cpsr",
    "fpcxtns",
    "fpcxts",
    "fpexc",
    "fpinst",
    "fpinst2",
    "fpscr",
    "fpscr_nzcv",
    "fpscr_nzcvqc",
    "fpsid",
    "itstate",
    "lr",
    "pc",
    "sp",
    "spsr",
    "vpr",
    "mvfr0",
    "mvfr1",
    "mvfr2",
    "zr",
];

const GPR_BASE: u16 = 32;
const SPR_BASE: u16 = 48;
const DPR_BASE: u16 = 80;
const QPR_BASE: u16 = 112;
const DPAIR_BASE: u16 = 128;
const DPAIR_SPC_BASE: u16 = 160;
const DQUAD_BASE: u16 = 192;
const GPR_PAIR_BASE: u16 = 224;
const MQQ_BASE: u16 = 232;
const MQQQQ_BASE: u16 = 240;
const END: u16 = 245;

/// an `arm` register id.
///
/// id `0` is the invalid register, which doubles as the terminator of implicit register lists.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Reg {
    id: u16,
}

impl Reg {
    pub const INVALID: Reg = Reg { id: 0 };
    pub const APSR: Reg = Reg { id: 1 };
    pub const APSR_NZCV: Reg = Reg { id: 2 };
    pub const CPSR: Reg = Reg { id: 3 };
    pub const FPCXTNS: Reg = Reg { id: 4 };
    pub const FPCXTS: Reg = Reg { id: 5 };
    pub const FPEXC: Reg = Reg { id: 6 };
    pub const FPINST: Reg = Reg { id: 7 };
    pub const FPINST2: Reg = Reg { id: 8 };
    pub const FPSCR: Reg = Reg { id: 9 };
    pub const FPSCR_NZCV: Reg = Reg { id: 10 };
    pub const FPSCR_NZCVQC: Reg = Reg { id: 11 };
    pub const FPSID: Reg = Reg { id: 12 };
    pub const ITSTATE: Reg = Reg { id: 13 };
    pub const LR: Reg = Reg { id: 14 };
    pub const PC: Reg = Reg { id: 15 };
    pub const SP: Reg = Reg { id: 16 };
    pub const SPSR: Reg = Reg { id: 17 };
    pub const VPR: Reg = Reg { id: 18 };
    pub const MVFR0: Reg = Reg { id: 19 };
    pub const MVFR1: Reg = Reg { id: 20 };
    pub const MVFR2: Reg = Reg { id: 21 };
    pub const ZR: Reg = Reg { id: 22 };

    /// register from its raw id, as produced by the decoder.
    pub fn from_id(id: u16) -> Option<Reg> {
        let reg = Reg { id };
        (reg.class() != RegClass::Invalid || id == 0).then_some(reg)
    }

    pub const fn id(self) -> u16 {
        self.id
    }

    pub fn is_valid(self) -> bool {
        self.id != 0
    }

    /// general purpose register `r{n}`, where 13, 14 and 15 are `sp`, `lr` and `pc`.
    pub const fn gpr(n: u8) -> Reg {
        match n {
            0..=12 => Reg { id: GPR_BASE + n as u16 },
            13 => Reg::SP,
            14 => Reg::LR,
            15 => Reg::PC,
            _ => panic!("register number out of range"),
        }
    }

    pub const fn s(n: u8) -> Reg {
        assert!(n < 32, "register number out of range");
        Reg { id: SPR_BASE + n as u16 }
    }

    pub const fn d(n: u8) -> Reg {
        assert!(n < 32, "register number out of range");
        Reg { id: DPR_BASE + n as u16 }
    }

    pub const fn q(n: u8) -> Reg {
        assert!(n < 16, "register number out of range");
        Reg { id: QPR_BASE + n as u16 }
    }

    /// `d{first}_d{first + 1}`.
    pub const fn dpair(first: u8) -> Reg {
        assert!(first < 31, "register number out of range");
        Reg { id: DPAIR_BASE + first as u16 }
    }

    /// `d{first}_d{first + 2}`.
    pub const fn dpair_spc(first: u8) -> Reg {
        assert!(first < 30, "register number out of range");
        Reg { id: DPAIR_SPC_BASE + first as u16 }
    }

    /// `d{first}` through `d{first + 3}`.
    pub const fn dquad(first: u8) -> Reg {
        assert!(first < 29, "register number out of range");
        Reg { id: DQUAD_BASE + first as u16 }
    }

    /// `r{first}_r{first + 1}`, `first` has to be even.
    pub const fn gpr_pair(first: u8) -> Reg {
        assert!(first < 14 && first % 2 == 0, "register pair out of range");
        Reg { id: GPR_PAIR_BASE + first as u16 / 2 }
    }

    /// `q{first}_q{first + 1}`.
    pub const fn mqq(first: u8) -> Reg {
        assert!(first < 7, "register number out of range");
        Reg { id: MQQ_BASE + first as u16 }
    }

    /// `q{first}` through `q{first + 3}`.
    pub const fn mqqqq(first: u8) -> Reg {
        assert!(first < 5, "register number out of range");
        Reg { id: MQQQQ_BASE + first as u16 }
    }

    pub fn class(self) -> RegClass {
        match self.id {
            1..=22 => RegClass::Special,
            id if (GPR_BASE..GPR_BASE + 13).contains(&id) => RegClass::Gpr,
            id if (SPR_BASE..SPR_BASE + 32).contains(&id) => RegClass::Spr,
            id if (DPR_BASE..DPR_BASE + 32).contains(&id) => RegClass::Dpr,
            id if (QPR_BASE..QPR_BASE + 16).contains(&id) => RegClass::Qpr,
            id if (DPAIR_BASE..DPAIR_BASE + 31).contains(&id) => RegClass::DPair,
            id if (DPAIR_SPC_BASE..DPAIR_SPC_BASE + 30).contains(&id) => RegClass::DPairSpc,
            id if (DQUAD_BASE..DQUAD_BASE + 29).contains(&id) => RegClass::DQuad,
            id if (GPR_PAIR_BASE..GPR_PAIR_BASE + 7).contains(&id) => RegClass::GprPair,
            id if (MQQ_BASE..MQQ_BASE + 7).contains(&id) => RegClass::Mqq,
            id if (MQQQQ_BASE..END).contains(&id) => RegClass::Mqqqq,
            _ => RegClass::Invalid,
        }
    }

    /// whether the register names a group of physical registers.
    pub fn is_aggregate(self) -> bool {
        matches!(
            self.class(),
            RegClass::DPair
                | RegClass::DPairSpc
                | RegClass::DQuad
                | RegClass::GprPair
                | RegClass::Mqq
                | RegClass::Mqqqq
        )
    }

    /// index of the register within its class, `r13`..`r15` for `sp`, `lr` and `pc`.
    pub fn number(self) -> Option<u8> {
        let base = match self.class() {
            RegClass::Gpr => GPR_BASE,
            RegClass::Spr => SPR_BASE,
            RegClass::Dpr => DPR_BASE,
            RegClass::Qpr => QPR_BASE,
            RegClass::DPair => DPAIR_BASE,
            RegClass::DPairSpc => DPAIR_SPC_BASE,
            RegClass::DQuad => DQUAD_BASE,
            RegClass::GprPair => return Some(((self.id - GPR_PAIR_BASE) * 2) as u8),
            RegClass::Mqq => MQQ_BASE,
            RegClass::Mqqqq => MQQQQ_BASE,
            RegClass::Special => {
                return match self {
                    Reg::SP => Some(13),
                    Reg::LR => Some(14),
                    Reg::PC => Some(15),
                    _ => None,
                }
            }
            RegClass::Invalid => return None,
        };

        Some((self.id - base) as u8)
    }

    /// register `delta` steps further along in the same single register class.
    ///
    /// used for vector lists that are described by their first `d` register.
    pub fn offset(self, delta: u8) -> Option<Reg> {
        let n = self.number()?.checked_add(delta)?;
        match self.class() {
            RegClass::Dpr if n < 32 => Some(Reg::d(n)),
            RegClass::Qpr if n < 16 => Some(Reg::q(n)),
            RegClass::Spr if n < 32 => Some(Reg::s(n)),
            RegClass::Gpr | RegClass::Special if n < 16 => Some(Reg::gpr(n)),
            _ => None,
        }
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let n = self.number().unwrap_or(0);
        match self.class() {
            RegClass::Invalid => f.write_str("invalid"),
            RegClass::Special => f.write_str(SPECIAL_NAMES[self.id as usize - 1]),
            RegClass::Gpr => match n {
                9 => f.write_str("sb"),
                10 => f.write_str("sl"),
                11 => f.write_str("fp"),
                12 => f.write_str("ip"),
                n => write!(f, "r{n}"),
            },
            RegClass::Spr => write!(f, "s{n}"),
            RegClass::Dpr => write!(f, "d{n}"),
            RegClass::Qpr => write!(f, "q{n}"),
            RegClass::DPair => write!(f, "d{n}_d{}", n + 1),
            RegClass::DPairSpc => write!(f, "d{n}_d{}", n + 2),
            RegClass::DQuad => write!(f, "d{n}_d{}_d{}_d{}", n + 1, n + 2, n + 3),
            RegClass::GprPair => write!(f, "{}_{}", Reg::gpr(n), Reg::gpr(n + 1)),
            RegClass::Mqq => write!(f, "q{n}_q{}", n + 1),
            RegClass::Mqqqq => write!(f, "q{n}_q{}_q{}_q{}", n + 1, n + 2, n + 3),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RegClass {
    Invalid,
    Special,
    Gpr,
    Spr,
    Dpr,
    Qpr,
    DPair,
    DPairSpc,
    DQuad,
    GprPair,
    Mqq,
    Mqqqq,
}

/// sub-register specifier, e.g. `dsub_1` selects the second `d` register of an aggregate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SubRegIdx {
    Ssub(u8),
    Dsub(u8),
    Qsub(u8),
    Gsub(u8),
}

static SUB_REGS: Lazy<FxHashMap<(Reg, SubRegIdx), Reg>> = Lazy::new(|| {
    let mut table = FxHashMap::default();

    for n in 0..16 {
        table.insert((Reg::d(n), SubRegIdx::Ssub(0)), Reg::s(2 * n));
        table.insert((Reg::d(n), SubRegIdx::Ssub(1)), Reg::s(2 * n + 1));
    }

    for n in 0..16 {
        table.insert((Reg::q(n), SubRegIdx::Dsub(0)), Reg::d(2 * n));
        table.insert((Reg::q(n), SubRegIdx::Dsub(1)), Reg::d(2 * n + 1));

        if n < 8 {
            for k in 0..4 {
                table.insert((Reg::q(n), SubRegIdx::Ssub(k)), Reg::s(4 * n + k));
            }
        }
    }

    for first in 0..31 {
        table.insert((Reg::dpair(first), SubRegIdx::Dsub(0)), Reg::d(first));
        table.insert((Reg::dpair(first), SubRegIdx::Dsub(1)), Reg::d(first + 1));
    }

    for first in 0..30 {
        table.insert((Reg::dpair_spc(first), SubRegIdx::Dsub(0)), Reg::d(first));
        table.insert((Reg::dpair_spc(first), SubRegIdx::Dsub(2)), Reg::d(first + 2));
    }

    for first in 0..29 {
        for k in 0..4 {
            table.insert((Reg::dquad(first), SubRegIdx::Dsub(k)), Reg::d(first + k));
        }

        if first % 2 == 0 {
            table.insert((Reg::dquad(first), SubRegIdx::Qsub(0)), Reg::q(first / 2));
            table.insert((Reg::dquad(first), SubRegIdx::Qsub(1)), Reg::q(first / 2 + 1));
        }
    }

    for first in (0..14).step_by(2) {
        table.insert((Reg::gpr_pair(first), SubRegIdx::Gsub(0)), Reg::gpr(first));
        table.insert((Reg::gpr_pair(first), SubRegIdx::Gsub(1)), Reg::gpr(first + 1));
    }

    for first in 0..7 {
        table.insert((Reg::mqq(first), SubRegIdx::Qsub(0)), Reg::q(first));
        table.insert((Reg::mqq(first), SubRegIdx::Qsub(1)), Reg::q(first + 1));

        for k in 0..4 {
            table.insert((Reg::mqq(first), SubRegIdx::Dsub(k)), Reg::d(2 * first + k));
        }
    }

    for first in 0..5 {
        for k in 0..4 {
            table.insert((Reg::mqqqq(first), SubRegIdx::Qsub(k)), Reg::q(first + k));
        }
    }

    table
});

/// physical sub-register of `reg` selected by `idx`.
pub fn sub_reg(reg: Reg, idx: SubRegIdx) -> Option<Reg> {
    SUB_REGS.get(&(reg, idx)).copied()
}

/// like [`sub_reg`], but a register without that sub-register is passed through.
pub fn sub_reg_or_self(reg: Reg, idx: SubRegIdx) -> Reg {
    match sub_reg(reg, idx) {
        Some(sub) => sub,
        None => {
            log::trace!("[arm::sub_reg] {reg} has no {idx:?}, passing it through");
            reg
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes() {
        assert_eq!(Reg::gpr(3).class(), RegClass::Gpr);
        assert_eq!(Reg::gpr(13), Reg::SP);
        assert_eq!(Reg::dquad(28).class(), RegClass::DQuad);
        assert_eq!(Reg::mqqqq(4).id(), END - 1);
        assert_eq!(Reg::from_id(END), None);
        assert_eq!(Reg::from_id(23), None);
        assert_eq!(Reg::from_id(0), Some(Reg::INVALID));
        assert!(Reg::gpr_pair(12).is_aggregate());
        assert!(!Reg::q(3).is_aggregate());
    }

    #[test]
    fn names() {
        assert_eq!(Reg::gpr(0).to_string(), "r0");
        assert_eq!(Reg::gpr(9).to_string(), "sb");
        assert_eq!(Reg::PC.to_string(), "pc");
        assert_eq!(Reg::APSR_NZCV.to_string(), "apsr_nzcv");
        assert_eq!(Reg::dpair(4).to_string(), "d4_d5");
        assert_eq!(Reg::dpair_spc(4).to_string(), "d4_d6");
        assert_eq!(Reg::gpr_pair(12).to_string(), "ip_sp");
        assert_eq!(Reg::mqqqq(1).to_string(), "q1_q2_q3_q4");
    }

    #[test]
    fn hierarchy() {
        assert_eq!(sub_reg(Reg::q(3), SubRegIdx::Dsub(1)), Some(Reg::d(7)));
        assert_eq!(sub_reg(Reg::d(3), SubRegIdx::Ssub(0)), Some(Reg::s(6)));
        assert_eq!(sub_reg(Reg::d(16), SubRegIdx::Ssub(0)), None);
        assert_eq!(sub_reg(Reg::dpair_spc(1), SubRegIdx::Dsub(2)), Some(Reg::d(3)));
        assert_eq!(sub_reg(Reg::dpair_spc(1), SubRegIdx::Dsub(1)), None);
        assert_eq!(sub_reg(Reg::gpr_pair(12), SubRegIdx::Gsub(1)), Some(Reg::SP));
        assert_eq!(sub_reg(Reg::mqq(2), SubRegIdx::Dsub(3)), Some(Reg::d(7)));
        assert_eq!(sub_reg(Reg::dquad(2), SubRegIdx::Qsub(1)), Some(Reg::q(2)));
    }

    #[test]
    fn scalar_passes_through() {
        assert_eq!(sub_reg_or_self(Reg::gpr(4), SubRegIdx::Gsub(0)), Reg::gpr(4));
        assert_eq!(sub_reg_or_self(Reg::INVALID, SubRegIdx::Dsub(0)), Reg::INVALID);
    }

    #[test]
    fn offsets() {
        assert_eq!(Reg::d(30).offset(1), Some(Reg::d(31)));
        assert_eq!(Reg::d(31).offset(1), None);
        assert_eq!(Reg::gpr(12).offset(1), Some(Reg::SP));
    }
}
