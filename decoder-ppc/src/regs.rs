//! registers of the `powerpc` register file and their overlaps.

use rustc_hash::FxHashMap;
use std::fmt;

use once_cell::sync::Lazy;

const SPECIAL_NAMES: [&str; 8] = ["carry", "ctr", "lr", "rm", "vrsave", "xer", "zero", "zero8"];

const GPR_BASE: u16 = 9;
const FPR_BASE: u16 = 41;
const VR_BASE: u16 = 73;
const VSX_BASE: u16 = 105;
const CR_BASE: u16 = 169;
const CR_BIT_BASE: u16 = 177;
const END: u16 = 209;

const CR_BIT_NAMES: [&str; 4] = ["lt", "gt", "eq", "un"];

/// a `powerpc` register id, `0` being the invalid register.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Reg {
    id: u16,
}

impl Reg {
    pub const INVALID: Reg = Reg { id: 0 };
    pub const CARRY: Reg = Reg { id: 1 };
    pub const CTR: Reg = Reg { id: 2 };
    pub const LR: Reg = Reg { id: 3 };
    pub const RM: Reg = Reg { id: 4 };
    pub const VRSAVE: Reg = Reg { id: 5 };
    pub const XER: Reg = Reg { id: 6 };
    /// `r0` read as the literal zero.
    pub const ZERO: Reg = Reg { id: 7 };
    pub const ZERO8: Reg = Reg { id: 8 };
    pub const CR0: Reg = Reg::cr(0);
    pub const CR1: Reg = Reg::cr(1);

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

    pub const fn r(n: u8) -> Reg {
        assert!(n < 32, "register number out of range");
        Reg { id: GPR_BASE + n as u16 }
    }

    pub const fn f(n: u8) -> Reg {
        assert!(n < 32, "register number out of range");
        Reg { id: FPR_BASE + n as u16 }
    }

    pub const fn v(n: u8) -> Reg {
        assert!(n < 32, "register number out of range");
        Reg { id: VR_BASE + n as u16 }
    }

    pub const fn vs(n: u8) -> Reg {
        assert!(n < 64, "register number out of range");
        Reg { id: VSX_BASE + n as u16 }
    }

    /// condition register field `cr{n}`.
    pub const fn cr(n: u8) -> Reg {
        assert!(n < 8, "register number out of range");
        Reg { id: CR_BASE + n as u16 }
    }

    /// condition register bit `n`, counted from `cr0lt`.
    pub const fn cr_bit(n: u8) -> Reg {
        assert!(n < 32, "register number out of range");
        Reg { id: CR_BIT_BASE + n as u16 }
    }

    pub fn class(self) -> RegClass {
        match self.id {
            1..=8 => RegClass::Special,
            id if (GPR_BASE..FPR_BASE).contains(&id) => RegClass::Gpr,
            id if (FPR_BASE..VR_BASE).contains(&id) => RegClass::Fpr,
            id if (VR_BASE..VSX_BASE).contains(&id) => RegClass::Vr,
            id if (VSX_BASE..CR_BASE).contains(&id) => RegClass::Vsx,
            id if (CR_BASE..CR_BIT_BASE).contains(&id) => RegClass::Cr,
            id if (CR_BIT_BASE..END).contains(&id) => RegClass::CrBit,
            _ => RegClass::Invalid,
        }
    }

    pub fn number(self) -> Option<u8> {
        let base = match self.class() {
            RegClass::Gpr => GPR_BASE,
            RegClass::Fpr => FPR_BASE,
            RegClass::Vr => VR_BASE,
            RegClass::Vsx => VSX_BASE,
            RegClass::Cr => CR_BASE,
            RegClass::CrBit => CR_BIT_BASE,
            RegClass::Special | RegClass::Invalid => return None,
        };

        Some((self.id - base) as u8)
    }

    /// base registers that read as zero instead of their contents.
    pub fn is_literal_zero(self) -> bool {
        matches!(self, Reg::ZERO | Reg::ZERO8) || self == Reg::r(0)
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let n = self.number().unwrap_or(0);
        match self.class() {
            RegClass::Invalid => f.write_str("invalid"),
            RegClass::Special => f.write_str(SPECIAL_NAMES[self.id as usize - 1]),
            RegClass::Gpr => write!(f, "r{n}"),
            RegClass::Fpr => write!(f, "f{n}"),
            RegClass::Vr => write!(f, "v{n}"),
            RegClass::Vsx => write!(f, "vs{n}"),
            RegClass::Cr => write!(f, "cr{n}"),
            RegClass::CrBit => write!(f, "cr{}{}", n / 4, CR_BIT_NAMES[n as usize % 4]),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RegClass {
    Invalid,
    Special,
    Gpr,
    Fpr,
    Vr,
    Vsx,
    Cr,
    CrBit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SubRegIdx {
    Lt,
    Gt,
    Eq,
    Un,
    /// the floating point half of `vs0`..`vs31`.
    Sub64,
    /// the vector register behind `vs32`..`vs63`.
    Sub128,
}

impl SubRegIdx {
    const CR_BITS: [SubRegIdx; 4] = [SubRegIdx::Lt, SubRegIdx::Gt, SubRegIdx::Eq, SubRegIdx::Un];
}

static SUB_REGS: Lazy<FxHashMap<(Reg, SubRegIdx), Reg>> = Lazy::new(|| {
    let mut table = FxHashMap::default();

    for n in 0..8 {
        for (k, idx) in SubRegIdx::CR_BITS.into_iter().enumerate() {
            table.insert((Reg::cr(n), idx), Reg::cr_bit(n * 4 + k as u8));
        }
    }

    for n in 0..32 {
        table.insert((Reg::vs(n), SubRegIdx::Sub64), Reg::f(n));
        table.insert((Reg::vs(n + 32), SubRegIdx::Sub128), Reg::v(n));
    }

    table
});

static SUPER_REGS: Lazy<FxHashMap<Reg, Reg>> =
    Lazy::new(|| SUB_REGS.iter().map(|(&(sup, _), &sub)| (sub, sup)).collect());

pub fn sub_reg(reg: Reg, idx: SubRegIdx) -> Option<Reg> {
    SUB_REGS.get(&(reg, idx)).copied()
}

/// the register `reg` is part of: the field of a condition bit, the vsx register over a
/// floating point or vector register.
pub fn super_reg(reg: Reg) -> Option<Reg> {
    SUPER_REGS.get(&reg).copied()
}

/// the vsx register overlapping `reg`, which passes through if it has none.
pub fn vsx_of(reg: Reg) -> Reg {
    match reg.class() {
        RegClass::Fpr | RegClass::Vr => super_reg(reg).unwrap_or(reg),
        RegClass::Vsx => reg,
        _ => {
            log::trace!("[ppc::regs] {reg} doesn't overlap a vsx register");
            reg
        }
    }
}
