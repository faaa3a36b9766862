//! Pass 2: converts each instruction line into a validated
//! `InstructionData` tuple, resolving label and function references to
//! numeric operands using the pass-1 symbol table.

use crate::error::{Error, ErrorKind, Result};
use crate::lexer::{Body, ClassifiedLine};
use crate::registry::{self, Shape};
use crate::symtab::SymbolTable;

/// `tokens[0]` is the mnemonic; the rest are validated operands, with
/// label/function references already substituted by decimal strings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstructionData {
    pub line: u32,
    pub opcode_tag: u32,
    pub tokens: Vec<String>,
}

pub fn parse(lines: &[(u32, ClassifiedLine)], symtab: &SymbolTable) -> Result<Vec<InstructionData>> {
    let mut instruction_index: u32 = 0;
    let mut out = Vec::new();

    for (line_no, line) in lines {
        if let Body::Instruction(tokens) = &line.body {
            let data = parse_instruction(*line_no, tokens, symtab, instruction_index)?;
            log::trace!(
                "line {}: instruction index {} dispatched mnemonic \"{}\"",
                line_no,
                instruction_index,
                tokens[0]
            );
            out.push(data);
            instruction_index += 1;
        }
    }

    Ok(out)
}

fn expect_arity<'t>(tokens: &'t [&'t str], want: usize, line_no: u32) -> Result<()> {
    if tokens.len() == want {
        return Ok(());
    }
    let lexeme = tokens.last().copied().unwrap_or("").to_string();
    Err(Error::new(
        ErrorKind::UnexpectedSymbol,
        line_no,
        lexeme,
        format!("expected {} operand(s) for \"{}\"", want - 1, tokens[0]),
    ))
}

fn expect_register(token: &str, line_no: u32) -> Result<()> {
    token
        .parse::<registry::Register>()
        .map(|_| ())
        .map_err(|_| {
            Error::new(
                ErrorKind::RegisterNameExpected,
                line_no,
                token.to_string(),
                "expected a register name",
            )
        })
}

fn expect_immediate(token: &str, line_no: u32) -> Result<()> {
    if registry::parse_immediate(token).is_some() {
        Ok(())
    } else {
        Err(Error::new(
            ErrorKind::UnexpectedSymbol,
            line_no,
            token.to_string(),
            "expected an immediate value",
        ))
    }
}

fn resolve_branch_target(
    target: &str,
    symtab: &SymbolTable,
    instruction_index: u32,
    line_no: u32,
) -> Result<String> {
    if registry::parse_immediate(target).is_some() {
        return Ok(target.to_string());
    }
    let (index_plus_one, _) = symtab.labels.get(target).ok_or_else(|| {
        Error::new(
            ErrorKind::UnexpectedSymbol,
            line_no,
            target.to_string(),
            "expected an immediate value or a previously defined label",
        )
    })?;
    let displacement = *index_plus_one as i64 - instruction_index as i64 - 2;
    Ok(displacement.to_string())
}

fn resolve_jump_target(
    mnemonic: &str,
    target: &str,
    symtab: &SymbolTable,
    line_no: u32,
) -> Result<String> {
    if registry::parse_immediate(target).is_some() {
        return Ok(target.to_string());
    }
    if mnemonic == "jal" {
        symtab
            .functions
            .get(target)
            .map(|address| (address >> 2).to_string())
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::UnexpectedSymbol,
                    line_no,
                    target.to_string(),
                    "expected an immediate value or a previously defined function name",
                )
            })
    } else {
        symtab
            .labels
            .get(target)
            .map(|(_, address)| (address >> 2).to_string())
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::UnexpectedSymbol,
                    line_no,
                    target.to_string(),
                    "expected an immediate value or a previously defined label",
                )
            })
    }
}

fn parse_instruction(
    line_no: u32,
    tokens: &[&str],
    symtab: &SymbolTable,
    instruction_index: u32,
) -> Result<InstructionData> {
    let mnemonic = tokens[0];
    let def = registry::lookup_mnemonic(mnemonic).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidInstruction,
            line_no,
            mnemonic.to_string(),
            "unrecognized mnemonic",
        )
    })?;

    let out_tokens = match def.shape {
        Shape::RType => {
            expect_arity(tokens, 4, line_no)?;
            expect_register(tokens[1], line_no)?;
            expect_register(tokens[2], line_no)?;
            expect_register(tokens[3], line_no)?;
            vec![
                mnemonic.to_string(),
                tokens[1].to_string(),
                tokens[2].to_string(),
                tokens[3].to_string(),
            ]
        }
        Shape::Jr => {
            expect_arity(tokens, 2, line_no)?;
            expect_register(tokens[1], line_no)?;
            vec![mnemonic.to_string(), tokens[1].to_string()]
        }
        Shape::IArith => {
            expect_arity(tokens, 4, line_no)?;
            expect_register(tokens[1], line_no)?;
            expect_register(tokens[2], line_no)?;
            expect_immediate(tokens[3], line_no)?;
            vec![
                mnemonic.to_string(),
                tokens[1].to_string(),
                tokens[2].to_string(),
                tokens[3].to_string(),
            ]
        }
        Shape::IBranch => {
            expect_arity(tokens, 4, line_no)?;
            expect_register(tokens[1], line_no)?;
            expect_register(tokens[2], line_no)?;
            let resolved = resolve_branch_target(tokens[3], symtab, instruction_index, line_no)?;
            vec![
                mnemonic.to_string(),
                tokens[1].to_string(),
                tokens[2].to_string(),
                resolved,
            ]
        }
        Shape::IMem => {
            expect_arity(tokens, 3, line_no)?;
            expect_register(tokens[1], line_no)?;
            let operand = tokens[2];
            let open = operand.find('(').ok_or_else(|| {
                Error::new(
                    ErrorKind::UnexpectedSymbol,
                    line_no,
                    operand.to_string(),
                    "expected \"(\"",
                )
            })?;
            let close = operand.find(')').ok_or_else(|| {
                Error::new(
                    ErrorKind::UnexpectedSymbol,
                    line_no,
                    operand.to_string(),
                    "expected \")\"",
                )
            })?;
            if close <= open {
                return Err(Error::new(
                    ErrorKind::UnexpectedSymbol,
                    line_no,
                    operand.to_string(),
                    "expected \")\" after \"(\"",
                ));
            }
            let reg = &operand[open + 1..close];
            expect_register(reg, line_no)?;
            let offset = if open == 0 { "0" } else { &operand[..open] };
            expect_immediate(offset, line_no)?;
            vec![
                mnemonic.to_string(),
                tokens[1].to_string(),
                offset.to_string(),
                reg.to_string(),
            ]
        }
        Shape::J | Shape::Jal => {
            expect_arity(tokens, 2, line_no)?;
            let resolved = resolve_jump_target(mnemonic, tokens[1], symtab, line_no)?;
            vec![mnemonic.to_string(), resolved]
        }
    };

    Ok(InstructionData {
        line: line_no,
        opcode_tag: def.tag,
        tokens: out_tokens,
    })
}
