//! Register and mnemonic lookup tables shared by the lexer and the
//! parser so both sweeps agree on what a name or mnemonic resolves to.

use std::fmt;
use std::str::FromStr;

pub const RTYPE_TAG: u32 = 0x0000_0000;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Register {
    Zero,
    At,
    V0,
    V1,
    A0,
    A1,
    A2,
    A3,
    T0,
    T1,
    T2,
    T3,
    T4,
    T5,
    T6,
    T7,
    S0,
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    T8,
    T9,
    K0,
    K1,
    Gp,
    Sp,
    Fp,
    Ra,
}

impl Register {
    pub fn number(self) -> u32 {
        use Register::*;
        match self {
            Zero => 0,
            At => 1,
            V0 => 2,
            V1 => 3,
            A0 => 4,
            A1 => 5,
            A2 => 6,
            A3 => 7,
            T0 => 8,
            T1 => 9,
            T2 => 10,
            T3 => 11,
            T4 => 12,
            T5 => 13,
            T6 => 14,
            T7 => 15,
            S0 => 16,
            S1 => 17,
            S2 => 18,
            S3 => 19,
            S4 => 20,
            S5 => 21,
            S6 => 22,
            S7 => 23,
            T8 => 24,
            T9 => 25,
            K0 => 26,
            K1 => 27,
            Gp => 28,
            Sp => 29,
            Fp => 30,
            Ra => 31,
        }
    }
}

impl FromStr for Register {
    type Err = ();

    fn from_str(s: &str) -> Result<Register, ()> {
        use Register::*;
        match s {
            "$zero" => Ok(Zero),
            "$at" => Ok(At),
            "$v0" => Ok(V0),
            "$v1" => Ok(V1),
            "$a0" => Ok(A0),
            "$a1" => Ok(A1),
            "$a2" => Ok(A2),
            "$a3" => Ok(A3),
            "$t0" => Ok(T0),
            "$t1" => Ok(T1),
            "$t2" => Ok(T2),
            "$t3" => Ok(T3),
            "$t4" => Ok(T4),
            "$t5" => Ok(T5),
            "$t6" => Ok(T6),
            "$t7" => Ok(T7),
            "$t8" => Ok(T8),
            "$t9" => Ok(T9),
            "$s0" => Ok(S0),
            "$s1" => Ok(S1),
            "$s2" => Ok(S2),
            "$s3" => Ok(S3),
            "$s4" => Ok(S4),
            "$s5" => Ok(S5),
            "$s6" => Ok(S6),
            "$s7" => Ok(S7),
            "$k0" => Ok(K0),
            "$k1" => Ok(K1),
            "$gp" => Ok(Gp),
            "$sp" => Ok(Sp),
            "$fp" => Ok(Fp),
            "$ra" => Ok(Ra),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Register::*;
        let name = match self {
            Zero => "$zero",
            At => "$at",
            V0 => "$v0",
            V1 => "$v1",
            A0 => "$a0",
            A1 => "$a1",
            A2 => "$a2",
            A3 => "$a3",
            T0 => "$t0",
            T1 => "$t1",
            T2 => "$t2",
            T3 => "$t3",
            T4 => "$t4",
            T5 => "$t5",
            T6 => "$t6",
            T7 => "$t7",
            T8 => "$t8",
            T9 => "$t9",
            S0 => "$s0",
            S1 => "$s1",
            S2 => "$s2",
            S3 => "$s3",
            S4 => "$s4",
            S5 => "$s5",
            S6 => "$s6",
            S7 => "$s7",
            K0 => "$k0",
            K1 => "$k1",
            Gp => "$gp",
            Sp => "$sp",
            Fp => "$fp",
            Ra => "$ra",
        };
        f.write_str(name)
    }
}

/// The operand shape a mnemonic dispatches to. Distinct from the wire
/// format (R/I/J) because, e.g., `addi` and `beq` are both encoded as
/// I-type words but read their tokens in a different order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Shape {
    /// `add`, `sub`, `and`, `or`, `slt`: `[mnem, rd, rs, rt]`.
    RType,
    /// `jr`: `[mnem, rs]`, encoded as R-type with `rt = rd = $zero`.
    Jr,
    /// `addi`, `slti`, `andi`, `ori`: `[mnem, rt, rs, imm]`.
    IArith,
    /// `beq`, `bne`: `[mnem, rs, rt, target]`.
    IBranch,
    /// `lw`, `sw`: `[mnem, rt, offset(reg)]`, rewritten to `[mnem, rt, offset, reg]`.
    IMem,
    /// `j`: target resolved against labels.
    J,
    /// `jal`: target resolved against functions.
    Jal,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MnemonicDef {
    pub tag: u32,
    pub funct: u8,
    pub shape: Shape,
}

pub fn lookup_mnemonic(name: &str) -> Option<MnemonicDef> {
    use Shape::*;
    let (tag, funct, shape) = match name {
        "add" => (RTYPE_TAG, 0x20, RType),
        "sub" => (RTYPE_TAG, 0x22, RType),
        "and" => (RTYPE_TAG, 0x24, RType),
        "or" => (RTYPE_TAG, 0x25, RType),
        "slt" => (RTYPE_TAG, 0x2a, RType),
        "jr" => (RTYPE_TAG, 0x08, Jr),
        "addi" => (0x2000_0000, 0, IArith),
        "slti" => (0x2800_0000, 0, IArith),
        "andi" => (0x3000_0000, 0, IArith),
        "ori" => (0x3400_0000, 0, IArith),
        "beq" => (0x1000_0000, 0, IBranch),
        "bne" => (0x1400_0000, 0, IBranch),
        "lw" => (0x8c00_0000, 0, IMem),
        "sw" => (0xac00_0000, 0, IMem),
        "j" => (0x0800_0000, 0, J),
        "jal" => (0x0c00_0000, 0, Jal),
        _ => return None,
    };
    Some(MnemonicDef { tag, funct, shape })
}

/// Parses an immediate token: decimal (optional leading `-`) or
/// hexadecimal `0x[0-9a-f]+`.
pub fn parse_immediate(token: &str) -> Option<i64> {
    if let Some(digits) = token.strip_prefix("0x") {
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)) {
            return None;
        }
        return i64::from_str_radix(digits, 16).ok();
    }
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i64>().ok().map(|v| if negative { -v } else { v })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_round_trip() {
        for n in 0u32..32 {
            let reg = Register::from_str(&name_for(n)).unwrap();
            assert_eq!(reg.number(), n);
        }
    }

    fn name_for(n: u32) -> String {
        // Build the canonical name by looking it up through Display,
        // going the other direction from the table above.
        use Register::*;
        let reg = [
            Zero, At, V0, V1, A0, A1, A2, A3, T0, T1, T2, T3, T4, T5, T6, T7, S0, S1, S2, S3, S4,
            S5, S6, S7, T8, T9, K0, K1, Gp, Sp, Fp, Ra,
        ][n as usize];
        reg.to_string()
    }

    #[test]
    fn ra_is_31() {
        assert_eq!(Register::Ra.number(), 31);
        assert_eq!(Register::Fp.number(), 30);
    }

    #[test]
    fn unknown_register_rejected() {
        assert!(Register::from_str("$bogus").is_err());
    }

    #[test]
    fn immediate_parses_hex_and_decimal() {
        assert_eq!(parse_immediate("0x10"), Some(0x10));
        assert_eq!(parse_immediate("0xffff"), Some(0xffff));
        assert_eq!(parse_immediate("-1"), Some(-1));
        assert_eq!(parse_immediate("42"), Some(42));
        assert_eq!(parse_immediate("0xFF"), None);
        assert_eq!(parse_immediate("abc"), None);
    }

    #[test]
    fn lookup_mnemonic_covers_table() {
        assert_eq!(lookup_mnemonic("add").unwrap().funct, 0x20);
        assert_eq!(lookup_mnemonic("jr").unwrap().tag, RTYPE_TAG);
        assert_eq!(lookup_mnemonic("jal").unwrap().tag, 0x0c00_0000);
        assert!(lookup_mnemonic("nop").is_none());
    }
}
