//! bit-exact decoders for the packed immediates `arm` instructions carry around: shifter
//! operands, the load/store addressing modes and the various encoded immediates.

use bitvec::prelude::*;

macro_rules! fields {
    ($imm:expr) => {{
        let mut bits = bitarr![Lsb0, u32; 0u32; 32];
        bits[0..32].store::<u32>($imm);
        bits
    }};
}

/// shift operation packed into shifter operands.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum ShiftOpc {
    NoShift = 0,
    Asr = 1,
    Lsl = 2,
    Lsr = 3,
    Ror = 4,
    Rrx = 5,
    Uxtw = 6,
}

impl ShiftOpc {
    pub fn from_bits(bits: u8) -> ShiftOpc {
        match bits {
            0 => ShiftOpc::NoShift,
            1 => ShiftOpc::Asr,
            2 => ShiftOpc::Lsl,
            3 => ShiftOpc::Lsr,
            4 => ShiftOpc::Ror,
            5 => ShiftOpc::Rrx,
            6 => ShiftOpc::Uxtw,
            // 7 is unallocated
            _ => ShiftOpc::NoShift,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftOpc::NoShift => "",
            ShiftOpc::Asr => "asr",
            ShiftOpc::Lsl => "lsl",
            ShiftOpc::Lsr => "lsr",
            ShiftOpc::Ror => "ror",
            ShiftOpc::Rrx => "rrx",
            ShiftOpc::Uxtw => "uxtw",
        }
    }
}

/// whether the offset is added to or subtracted from the base.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum AddrOpc {
    Sub,
    Add,
}

impl AddrOpc {
    fn from_sub_bit(sub: bool) -> AddrOpc {
        if sub {
            AddrOpc::Sub
        } else {
            AddrOpc::Add
        }
    }

    pub fn is_sub(self) -> bool {
        self == AddrOpc::Sub
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum IndexMode {
    Offset,
    Pre,
    Post,
}

impl IndexMode {
    fn from_bits(bits: u8) -> IndexMode {
        match bits {
            1 => IndexMode::Pre,
            2 => IndexMode::Post,
            _ => IndexMode::Offset,
        }
    }
}

/// register shifted by an immediate or by a register.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct SoReg {
    pub shift: ShiftOpc,
    pub amount: u32,
}

pub fn so_reg(imm: u32) -> SoReg {
    let bits = fields!(imm);

    SoReg {
        shift: ShiftOpc::from_bits(bits[0..3].load::<u8>()),
        amount: bits[3..32].load::<u32>(),
    }
}

/// addressing mode 2, word and unsigned byte loads/stores.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Am2 {
    /// 12-bit immediate offset, or the shift amount when there's an offset register.
    pub offset: u32,
    pub op: AddrOpc,
    pub shift: ShiftOpc,
    pub index_mode: IndexMode,
}

pub fn am2(imm: u32) -> Am2 {
    let bits = fields!(imm);

    Am2 {
        offset: bits[0..12].load::<u32>(),
        op: AddrOpc::from_sub_bit(bits[12]),
        shift: ShiftOpc::from_bits(bits[13..16].load::<u8>()),
        index_mode: IndexMode::from_bits(bits[16..18].load::<u8>()),
    }
}

/// addressing mode 3, halfword, signed byte and doubleword loads/stores.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Am3 {
    pub offset: u32,
    pub op: AddrOpc,
    pub index_mode: IndexMode,
}

pub fn am3(imm: u32) -> Am3 {
    let bits = fields!(imm);

    Am3 {
        offset: bits[0..8].load::<u32>(),
        op: AddrOpc::from_sub_bit(bits[8]),
        index_mode: IndexMode::from_bits(bits[9..11].load::<u8>()),
    }
}

/// addressing mode 5, coprocessor and vfp loads/stores. the offset is in words, or in
/// halfwords for the fp16 variant.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Am5 {
    pub offset: u32,
    pub op: AddrOpc,
}

pub fn am5(imm: u32) -> Am5 {
    let bits = fields!(imm);

    Am5 {
        offset: bits[0..8].load::<u32>(),
        op: AddrOpc::from_sub_bit(bits[8]),
    }
}

/// value of a 12-bit modified immediate: an 8-bit value rotated right by twice the 4-bit
/// rotation field.
pub fn mod_imm(encoded: u32) -> u32 {
    let bits = fields!(encoded);
    let value = bits[0..8].load::<u32>();
    let rot = bits[8..12].load::<u32>() * 2;

    value.rotate_right(rot)
}

fn mod_imm_rotation(imm: u32) -> u32 {
    if imm & !0xff == 0 {
        return 0;
    }

    // rotation has to be even
    let rot = imm.trailing_zeros() & !1;
    if imm.rotate_right(rot) & !0xff == 0 {
        return (32 - rot) & 31;
    }

    // values like 0xf000000f wrap around, ignore the low 6 bits and retry
    if imm & 63 != 0 {
        let rot = (imm & !63).trailing_zeros() & !1;
        if imm.rotate_right(rot) & !0xff == 0 {
            return (32 - rot) & 31;
        }
    }

    (32 - rot) & 31
}

/// canonical modified immediate encoding of `value`, if it has one.
pub fn encode_mod_imm(value: u32) -> Option<u32> {
    if value & !0xff == 0 {
        return Some(value);
    }

    let rot = mod_imm_rotation(value);
    if (!0xffu32).rotate_right(rot) & value != 0 {
        return None;
    }

    Some(value.rotate_left(rot) | ((rot >> 1) << 8))
}

/// expand a vfp 8-bit floating point immediate (`abcdefgh`) into a single precision float.
pub fn fp_imm(imm: u8) -> f32 {
    let sign = (imm >> 7) as u32 & 1;
    let exp = (imm >> 4) as u32 & 0b111;
    let mantissa = imm as u32 & 0b1111;

    let (b, bbbbb) = if exp & 0b100 != 0 { (0, 0x1f) } else { (1, 0) };

    let mut bits = sign << 31;
    bits |= b << 30;
    bits |= bbbbb << 25;
    bits |= (exp & 0b11) << 23;
    bits |= mantissa << 19;

    f32::from_bits(bits)
}

/// expand a neon/mve `vmov` modified immediate. returns the element value and the element
/// size in bits.
pub fn vmov_mod_imm(encoded: u32) -> Option<(u64, u8)> {
    let op_cmode = (encoded >> 8) & 0x1f;
    let imm8 = encoded as u64 & 0xff;

    if op_cmode == 0xe {
        return Some((imm8, 8));
    }

    if op_cmode & 0xc == 0x8 {
        let byte = (op_cmode & 0x6) >> 1;
        return Some((imm8 << (8 * byte), 16));
    }

    if op_cmode & 0x8 == 0 {
        let byte = (op_cmode & 0x6) >> 1;
        return Some((imm8 << (8 * byte), 32));
    }

    if op_cmode & 0xe == 0xc {
        let byte = 1 + (op_cmode & 0x1);
        return Some(((imm8 << (8 * byte)) | (0xffff >> (8 * (2 - byte))), 32));
    }

    if op_cmode == 0x1e {
        let value = (0..8)
            .filter(|&byte| (encoded >> byte) & 1 != 0)
            .fold(0u64, |acc, byte| acc | 0xff << (8 * byte));
        return Some((value, 64));
    }

    None
}

/// the `(lsb, width)` of the bitfield cleared by an inverted mask.
pub fn bitfield_inv_mask(mask: u32) -> (u32, u32) {
    let bits = !mask;
    let lsb = bits.trailing_zeros();
    let width = (32 - bits.leading_zeros()).saturating_sub(lsb);

    (lsb, width)
}

/// shift amounts of zero encode a shift by 32.
pub fn translate_shift_imm(imm: u32) -> u32 {
    if imm == 0 {
        32
    } else {
        imm
    }
}
