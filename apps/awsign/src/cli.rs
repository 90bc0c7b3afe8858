//! Command-line arguments.

use anyhow::{Result, bail};

/// Usage text printed for `--help`.
pub const USAGE: &str = "\
Usage: awsign [--json] [--stamp] [FILE]

Sign a raw HTTP/1.1 request read from FILE (or stdin when FILE is absent or `-`).

Options:
  --json     Print the canonical request, string to sign, signature, and
             Authorization header as JSON instead of the signed request
  --stamp    Add an X-Amz-Date header with the current time when the request
             carries neither X-Amz-Date nor Date
  -h, --help Print this help
";

/// Parsed command-line arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    /// Emit signing artifacts as JSON.
    pub json: bool,
    /// Stamp unstamped requests with the current time.
    pub stamp: bool,
    /// Print usage and exit.
    pub help: bool,
    /// Input file; `None` reads stdin.
    pub input: Option<String>,
}

impl CliArgs {
    /// Parse arguments, excluding the program name.
    ///
    /// # Errors
    ///
    /// Fails on an unknown flag or a second positional argument.
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        for arg in args {
            match arg.as_str() {
                "--json" => parsed.json = true,
                "--stamp" => parsed.stamp = true,
                "-h" | "--help" => parsed.help = true,
                "-" => parsed.set_input(None)?,
                flag if flag.starts_with('-') => bail!("unknown option: {flag}\n\n{USAGE}"),
                _ => parsed.set_input(Some(arg))?,
            }
        }
        Ok(parsed)
    }

    fn set_input(&mut self, input: Option<String>) -> Result<()> {
        if self.input.is_some() {
            bail!("only one input file may be given\n\n{USAGE}");
        }
        self.input = input;
        Ok(())
    }
}
