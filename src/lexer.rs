//! Splits a single source line into tokens, strips comments, and
//! recognizes the label-definition and function-boundary line shapes.
//! Shared verbatim by the symbol-table pass and the parser pass so both
//! sweeps agree on where instruction boundaries fall.
//!
//! A label may either stand alone on its line or prefix an instruction
//! on the same line (`loop: add $t0, $t0, $t1`); both shapes assign the
//! label to the same instruction index.

use crate::error::{Error, ErrorKind, Result};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Body<'i> {
    None,
    Instruction(Vec<&'i str>),
    FunctionEnd(&'i str),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClassifiedLine<'i> {
    pub label: Option<&'i str>,
    pub body: Body<'i>,
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '\t' | ' ' | ',' | ';')
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split(is_delimiter).filter(|s| !s.is_empty()).collect()
}

fn is_valid_label_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Classifies one source line. `line_no` is the 1-based line number
/// used for error reporting.
pub fn classify_line(line: &str, line_no: u32) -> Result<ClassifiedLine<'_>> {
    let code = match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    };
    if code.trim().is_empty() {
        return Ok(ClassifiedLine {
            label: None,
            body: Body::None,
        });
    }

    if let Some(idx) = code.find(':') {
        let name = code[..idx].trim();
        if !is_valid_label_name(name) {
            return Err(Error::new(
                ErrorKind::UnexpectedSymbol,
                line_no,
                name.to_string(),
                "a label name must contain only letters, digits, and underscores",
            ));
        }
        let rest = &code[idx + 1..];
        let tokens = tokenize(rest);
        let body = if tokens.is_empty() {
            Body::None
        } else {
            Body::Instruction(tokens)
        };
        return Ok(ClassifiedLine {
            label: Some(name),
            body,
        });
    }

    let trimmed = code.trim_start();
    let leading_tokens = tokenize(trimmed);
    if leading_tokens.first() == Some(&".end") {
        return match leading_tokens.as_slice() {
            [_end, name] => Ok(ClassifiedLine {
                label: None,
                body: Body::FunctionEnd(name),
            }),
            _ => Err(Error::new(
                ErrorKind::UnexpectedSymbol,
                line_no,
                leading_tokens.last().copied().unwrap_or("").to_string(),
                "expected \".end\" followed by exactly one function name",
            )),
        };
    }

    let tokens = tokenize(code);
    let body = if tokens.is_empty() {
        Body::None
    } else {
        Body::Instruction(tokens)
    };
    Ok(ClassifiedLine { label: None, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_comment_lines() {
        assert_eq!(
            classify_line("", 1).unwrap(),
            ClassifiedLine {
                label: None,
                body: Body::None
            }
        );
        assert_eq!(
            classify_line("   ", 1).unwrap(),
            ClassifiedLine {
                label: None,
                body: Body::None
            }
        );
        assert_eq!(
            classify_line("  # a comment", 1).unwrap(),
            ClassifiedLine {
                label: None,
                body: Body::None
            }
        );
    }

    #[test]
    fn label_only_line() {
        let c = classify_line("loop:", 1).unwrap();
        assert_eq!(c.label, Some("loop"));
        assert_eq!(c.body, Body::None);
    }

    #[test]
    fn label_prefixing_an_instruction() {
        let c = classify_line("loop: add $t0, $t0, $t1", 1).unwrap();
        assert_eq!(c.label, Some("loop"));
        assert_eq!(c.body, Body::Instruction(vec!["add", "$t0", "$t0", "$t1"]));
    }

    #[test]
    fn invalid_label_name_is_rejected() {
        assert!(classify_line("not-valid:", 1).is_err());
    }

    #[test]
    fn function_end_line() {
        let c = classify_line(".end main", 1).unwrap();
        assert_eq!(c.label, None);
        assert_eq!(c.body, Body::FunctionEnd("main"));
    }

    #[test]
    fn function_end_line_with_surplus_token_is_rejected() {
        assert!(classify_line(".end main extra", 1).is_err());
    }

    #[test]
    fn token_merely_prefixed_with_dot_end_is_not_a_function_end_line() {
        let c = classify_line(".endfoo bar", 1).unwrap();
        assert_eq!(c.label, None);
        assert_eq!(c.body, Body::Instruction(vec![".endfoo", "bar"]));
    }

    #[test]
    fn instruction_line_strips_inline_comment_and_collapses_delimiters() {
        let c = classify_line("add  $t0,, $t1 ;$t2   # add them up", 1).unwrap();
        assert_eq!(c.label, None);
        assert_eq!(c.body, Body::Instruction(vec!["add", "$t0", "$t1", "$t2"]));
    }
}
