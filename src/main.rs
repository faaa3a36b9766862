use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug)]
enum Error {
    Usage,
    WriteOutput(std::io::Error, PathBuf),
    Mipsasm(mipsasm::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Usage => write!(f, "usage: mipsasm [<input> -o <output>]"),
            Error::WriteOutput(err, path) => {
                write!(f, "writing output file \"{}\" failed: {}", path.display(), err)
            }
            Error::Mipsasm(err) => write!(f, "{}", err),
        }
    }
}

struct Args {
    input: PathBuf,
    output: PathBuf,
}

fn parse_args(argv: &[String]) -> Result<Args, Error> {
    match argv.len() {
        1 => Ok(Args {
            input: PathBuf::from("test.s"),
            output: PathBuf::from("code.mem"),
        }),
        4 if argv[2] == "-o" => Ok(Args {
            input: PathBuf::from(&argv[1]),
            output: PathBuf::from(&argv[3]),
        }),
        _ => Err(Error::Usage),
    }
}

fn mipsasm(args: &Args) -> Result<(), Error> {
    let input = args.input.to_str().ok_or(Error::Usage)?;
    let encoded = mipsasm::assemble_file(input).map_err(Error::Mipsasm)?;

    std::fs::write(&args.output, encoded)
        .map_err(|err| Error::WriteOutput(err, args.output.clone()))
}

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().collect();
    let result = parse_args(&argv).and_then(|args| mipsasm(&args));

    if let Err(err) = result {
        eprintln!("{}", err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_uses_defaults() {
        let args = parse_args(&argv(&["mipsasm"])).ok().unwrap();
        assert_eq!(args.input, Path::new("test.s"));
        assert_eq!(args.output, Path::new("code.mem"));
    }

    #[test]
    fn four_arguments_with_dash_o_uses_custom_paths() {
        let args = parse_args(&argv(&["mipsasm", "prog.s", "-o", "out.mem"]))
            .ok()
            .unwrap();
        assert_eq!(args.input, Path::new("prog.s"));
        assert_eq!(args.output, Path::new("out.mem"));
    }

    #[test]
    fn wrong_arity_is_usage_error() {
        assert!(parse_args(&argv(&["mipsasm", "prog.s"])).is_err());
    }

    #[test]
    fn missing_dash_o_flag_is_usage_error() {
        assert!(parse_args(&argv(&["mipsasm", "prog.s", "-x", "out.mem"])).is_err());
    }
}
