//! Pass 1: sweeps the classified source once, assigning each instruction
//! a sequential index and recording label and function addresses.

use crate::error::{Error, ErrorKind, Result};
use crate::lexer::{Body, ClassifiedLine};
use std::collections::HashMap;

/// `name -> (instruction_index + 1, absolute_address)`.
pub type LabelMap = HashMap<String, (u32, u32)>;
/// `name -> absolute_address`.
pub type FunctionMap = HashMap<String, u32>;

#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    pub labels: LabelMap,
    pub functions: FunctionMap,
}

pub fn build(lines: &[(u32, ClassifiedLine)], code_segment_offset: u32) -> Result<SymbolTable> {
    let mut instruction_index: u32 = 0;
    let mut labels = LabelMap::new();
    let mut functions = FunctionMap::new();
    let mut pending_labels: Vec<(String, u32)> = Vec::new();

    for (line_no, line) in lines {
        if let Some(name) = line.label {
            if labels.contains_key(name) {
                return Err(Error::new(
                    ErrorKind::UnexpectedSymbol,
                    *line_no,
                    name.to_string(),
                    "label is already defined",
                ));
            }
            pending_labels.push((name.to_string(), instruction_index));
            let address = code_segment_offset + instruction_index * 4;
            labels.insert(name.to_string(), (instruction_index + 1, address));
            log::trace!(
                "line {}: label \"{}\" recorded at instruction index {} (address 0x{:08x})",
                line_no,
                name,
                instruction_index,
                address
            );
        }

        match &line.body {
            Body::None => {}
            Body::Instruction(_) => {
                instruction_index += 1;
            }
            Body::FunctionEnd(name) => {
                let found = pending_labels.iter().find(|(n, _)| n == name);
                match found {
                    Some((_, idx)) => {
                        let address = code_segment_offset + idx * 4;
                        functions.insert(name.to_string(), address);
                        log::trace!(
                            "line {}: \".end {}\" resolved to address 0x{:08x}",
                            line_no,
                            name,
                            address
                        );
                        pending_labels.clear();
                    }
                    None => {
                        return Err(Error::new(
                            ErrorKind::UnexpectedSymbol,
                            *line_no,
                            name.to_string(),
                            "expected a previously defined label name",
                        ));
                    }
                }
            }
        }
    }

    Ok(SymbolTable { labels, functions })
}
