//! A two-pass assembler for a small MIPS-I instruction subset: source
//! text in, one lowercase hex machine word per line out.
//!
//! The pipeline mirrors a classic two-pass assembler: [`lexer`] splits
//! and classifies each line, [`symtab`] sweeps the classified lines once
//! to resolve every label and function address, [`parser`] validates
//! each instruction line and substitutes resolved targets, and
//! [`instruction`] encodes the result into machine words that
//! [`emitter`] renders as text.

pub mod emitter;
pub mod error;
pub mod instruction;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod symtab;

pub use error::{Error, ErrorKind, Result};

/// The address the first instruction word is placed at.
pub const CODE_SEGMENT_OFFSET: u32 = 0x0040_0000;

/// Assembles `source` using the default code segment offset.
pub fn assemble(source: &str) -> Result<String> {
    assemble_with_offset(source, CODE_SEGMENT_OFFSET)
}

/// Reads `path` and assembles its contents. A read failure is reported
/// as [`ErrorKind::FileNotFound`] rather than bubbling up the
/// underlying I/O error, matching the assembler's own error taxonomy.
pub fn assemble_file(path: &str) -> Result<String> {
    let source = std::fs::read_to_string(path).map_err(|_| Error::file_not_found(path))?;
    assemble(&source)
}

/// Assembles `source`, placing the first instruction word at
/// `code_segment_offset` instead of the default.
pub fn assemble_with_offset(source: &str, code_segment_offset: u32) -> Result<String> {
    let lines: Vec<(u32, lexer::ClassifiedLine)> = source
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let line_no = (i + 1) as u32;
            lexer::classify_line(line, line_no).map(|classified| (line_no, classified))
        })
        .collect::<Result<_>>()?;

    log::debug!("classified {} source line(s)", lines.len());

    let symtab = symtab::build(&lines, code_segment_offset)?;
    log::debug!(
        "pass 1 complete: {} label(s), {} function(s)",
        symtab.labels.len(),
        symtab.functions.len()
    );

    let instruction_data = parser::parse(&lines, &symtab)?;
    log::debug!("pass 2 complete: {} instruction(s)", instruction_data.len());

    let instructions = instruction::build_all(&instruction_data)?;
    Ok(emitter::emit(&instructions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_instruction_program_matches_worked_scenario() {
        let source = "add $t0, $t1, $t2\naddi $t0, $t1, 0x10\nsub $s0, $s1, $s2\n";
        let out = assemble(source).unwrap();
        assert_eq!(out, "012a4020\n21280010\n02328022\n");
    }

    #[test]
    fn backward_branch_loop_matches_worked_scenario() {
        let source = "loop: add $t0, $t0, $t1\nbeq $t0, $t1, loop\n";
        let out = assemble(source).unwrap();
        assert_eq!(out, "01094020\n1109fffe\n");
    }

    #[test]
    fn function_call_matches_worked_scenario() {
        let source =
            "fn:   add $v0, $zero, $a0\n      jr  $ra\n      .end fn\nmain: jal fn\n";
        let out = assemble(source).unwrap();
        assert_eq!(out, "00041020\n03e00008\n0c100000\n");
    }

    #[test]
    fn memory_access_matches_worked_scenario() {
        let out = assemble("lw $t0, 4($sp)\n").unwrap();
        assert_eq!(out, "8fa80004\n");
    }

    #[test]
    fn undefined_label_is_reported_with_kind() {
        let err = assemble("beq $t0, $t1, nowhere\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedSymbol);
    }

    #[test]
    fn custom_code_segment_offset_shifts_function_addresses() {
        let source = "fn: jr $ra\n.end fn\nmain: jal fn\n";
        let out = assemble_with_offset(source, 0x0080_0000).unwrap();
        assert_eq!(out, "03e00008\n0c200000\n");
    }
}
