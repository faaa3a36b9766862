use std::fmt;

/// The five fatal error kinds the assembler can report, per the error
/// taxonomy: the first one encountered terminates assembly.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    FileNotFound,
    InvalidInstruction,
    RegisterNameExpected,
    UnexpectedSymbol,
    /// Dispatch fell through to an opcode tag the registry doesn't know
    /// about. Indicates a registry inconsistency, never a user error.
    InvalidOpcode,
}

/// A single assembler diagnostic: the kind of failure, the 1-based
/// source line it occurred on (0 for errors that precede any line, such
/// as a missing input file), the offending lexeme, and an optional hint
/// describing what was expected instead.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    pub kind: ErrorKind,
    pub line: u32,
    pub lexeme: String,
    pub hint: Option<String>,
}

impl Error {
    pub(crate) fn new(
        kind: ErrorKind,
        line: u32,
        lexeme: impl Into<String>,
        hint: impl Into<String>,
    ) -> Error {
        Error {
            kind,
            line,
            lexeme: lexeme.into(),
            hint: Some(hint.into()),
        }
    }

    /// A [`ErrorKind::FileNotFound`] carries no source line; the lexeme
    /// holds the path that could not be opened.
    pub fn file_not_found(path: impl Into<String>) -> Error {
        Error {
            kind: ErrorKind::FileNotFound,
            line: 0,
            lexeme: path.into(),
            hint: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::FileNotFound => {
                write!(f, "file \"{}\" was not found", self.lexeme)
            }
            ErrorKind::InvalidInstruction => {
                write!(
                    f,
                    "line {}: invalid instruction \"{}\"",
                    self.line, self.lexeme
                )?;
                if let Some(hint) = &self.hint {
                    write!(f, " ({})", hint)?;
                }
                Ok(())
            }
            ErrorKind::RegisterNameExpected => {
                write!(
                    f,
                    "line {}: register name expected, found \"{}\"",
                    self.line, self.lexeme
                )?;
                if let Some(hint) = &self.hint {
                    write!(f, " ({})", hint)?;
                }
                Ok(())
            }
            ErrorKind::UnexpectedSymbol => {
                write!(
                    f,
                    "line {}: unexpected symbol \"{}\"",
                    self.line, self.lexeme
                )?;
                if let Some(hint) = &self.hint {
                    write!(f, " ({})", hint)?;
                }
                Ok(())
            }
            ErrorKind::InvalidOpcode => {
                write!(
                    f,
                    "line {}: internal error, invalid opcode for \"{}\"",
                    self.line, self.lexeme
                )
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
