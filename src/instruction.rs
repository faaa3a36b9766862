//! Tagged variants for the R, I, and J instruction formats, each with a
//! field-accurate binary encoder. Encoding happens once at construction;
//! [`Instruction::encode`] returns the cached word.

use crate::error::{Error, ErrorKind, Result};
use crate::parser::InstructionData;
use crate::registry::{self, Register, Shape};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Instruction {
    /// `[opcode:6 | rs:5 | rt:5 | rd:5 | shamt:5 | funct:6]`.
    R {
        rs: Register,
        rt: Register,
        rd: Register,
        shamt: u8,
        funct: u8,
    },
    /// `[opcode:6 | rs:5 | rt:5 | imm:16]`. Also used for memory and
    /// branch instructions.
    I {
        opcode_tag: u32,
        rs: Register,
        rt: Register,
        imm16: u16,
    },
    /// `[opcode:6 | target:26]`. The word-aligned shift happens earlier,
    /// while resolving the label or function name; `target26` here is
    /// ORed in directly with no further shift.
    J { opcode_tag: u32, target26: u32 },
}

impl Instruction {
    pub fn encode(&self) -> u32 {
        match *self {
            Instruction::R {
                rs,
                rt,
                rd,
                shamt,
                funct,
            } => {
                (rs.number() << 21)
                    | (rt.number() << 16)
                    | (rd.number() << 11)
                    | ((shamt as u32) << 6)
                    | funct as u32
            }
            Instruction::I {
                opcode_tag,
                rs,
                rt,
                imm16,
            } => opcode_tag | (rt.number() << 16) | (rs.number() << 21) | (imm16 as u32 & 0xFFFF),
            Instruction::J {
                opcode_tag,
                target26,
            } => opcode_tag | (target26 & 0x03FF_FFFF),
        }
    }
}

fn register(token: &str, data: &InstructionData) -> Result<Register> {
    Register::from_str(token).map_err(|_| {
        Error::new(
            ErrorKind::InvalidOpcode,
            data.line,
            token.to_string(),
            "internal: a register token was not revalidated by the parser",
        )
    })
}

fn number(token: &str, data: &InstructionData) -> Result<i64> {
    registry::parse_immediate(token).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidOpcode,
            data.line,
            token.to_string(),
            "internal: a numeric token was not revalidated by the parser",
        )
    })
}

/// Builds the encoder-ready [`Instruction`] for one validated
/// [`InstructionData`] record, re-parsing its string tokens.
pub fn build(data: &InstructionData) -> Result<Instruction> {
    let mnemonic = data.tokens[0].as_str();
    let def = registry::lookup_mnemonic(mnemonic).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidOpcode,
            data.line,
            mnemonic.to_string(),
            "internal: an unrecognized mnemonic reached the encoder",
        )
    })?;

    let instruction = match def.shape {
        Shape::RType => Instruction::R {
            rd: register(&data.tokens[1], data)?,
            rs: register(&data.tokens[2], data)?,
            rt: register(&data.tokens[3], data)?,
            shamt: 0,
            funct: def.funct,
        },
        Shape::Jr => Instruction::R {
            rs: register(&data.tokens[1], data)?,
            rt: Register::Zero,
            rd: Register::Zero,
            shamt: 0,
            funct: def.funct,
        },
        Shape::IArith => Instruction::I {
            opcode_tag: def.tag,
            rt: register(&data.tokens[1], data)?,
            rs: register(&data.tokens[2], data)?,
            imm16: number(&data.tokens[3], data)? as i16 as u16,
        },
        Shape::IBranch => Instruction::I {
            opcode_tag: def.tag,
            rs: register(&data.tokens[1], data)?,
            rt: register(&data.tokens[2], data)?,
            imm16: number(&data.tokens[3], data)? as i16 as u16,
        },
        Shape::IMem => Instruction::I {
            opcode_tag: def.tag,
            rt: register(&data.tokens[1], data)?,
            rs: register(&data.tokens[3], data)?,
            imm16: number(&data.tokens[2], data)? as i16 as u16,
        },
        Shape::J | Shape::Jal => Instruction::J {
            opcode_tag: def.tag,
            target26: number(&data.tokens[1], data)? as u32,
        },
    };

    Ok(instruction)
}

pub fn build_all(data: &[InstructionData]) -> Result<Vec<Instruction>> {
    data.iter().map(build).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(line: u32, tag: u32, tokens: &[&str]) -> InstructionData {
        InstructionData {
            line,
            opcode_tag: tag,
            tokens: tokens.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn add_encodes_r_type() {
        let d = data(1, registry::RTYPE_TAG, &["add", "$t0", "$t1", "$t2"]);
        assert_eq!(build(&d).unwrap().encode(), 0x012a4020);
    }

    #[test]
    fn sub_encodes_r_type() {
        let d = data(1, registry::RTYPE_TAG, &["sub", "$s0", "$s1", "$s2"]);
        assert_eq!(build(&d).unwrap().encode(), 0x02328022);
    }

    #[test]
    fn addi_encodes_i_type_with_hex_immediate() {
        let d = data(1, 0x2000_0000, &["addi", "$t0", "$t1", "0x10"]);
        assert_eq!(build(&d).unwrap().encode(), 0x21280010);
    }

    #[test]
    fn lw_encodes_memory_i_type() {
        let d = data(1, 0x8c00_0000, &["lw", "$t0", "4", "$sp"]);
        assert_eq!(build(&d).unwrap().encode(), 0x8fa80004);
    }

    #[test]
    fn branch_negative_displacement_masks_to_16_bits() {
        let d = data(1, 0x1000_0000, &["beq", "$t0", "$t1", "-2"]);
        assert_eq!(build(&d).unwrap().encode(), 0x1109fffe);
    }

    #[test]
    fn jal_ors_in_the_already_shifted_target() {
        let d = data(1, 0x0c00_0000, &["jal", "1048576"]);
        assert_eq!(build(&d).unwrap().encode(), 0x0c100000);
    }

    #[test]
    fn jr_folds_into_r_type() {
        let d = data(1, registry::RTYPE_TAG, &["jr", "$ra"]);
        let instr = build(&d).unwrap();
        match instr {
            Instruction::R {
                rs, rt, rd, shamt, funct,
            } => {
                assert_eq!(rs, Register::Ra);
                assert_eq!(rt, Register::Zero);
                assert_eq!(rd, Register::Zero);
                assert_eq!(shamt, 0);
                assert_eq!(funct, 0x08);
            }
            _ => panic!("expected R-type"),
        }
    }

    #[test]
    fn immediate_0xffff_and_minus_one_agree_on_low_bits() {
        let positive = data(1, 0x2000_0000, &["addi", "$t0", "$t1", "0xffff"]);
        let negative = data(1, 0x2000_0000, &["addi", "$t0", "$t1", "-1"]);
        assert_eq!(
            build(&positive).unwrap().encode() & 0xFFFF,
            build(&negative).unwrap().encode() & 0xFFFF
        );
    }
}
