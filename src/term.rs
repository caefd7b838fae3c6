// Console abstraction used by the session. The interactive version goes
// through `dialoguer`; the line version reads any `BufRead`, which covers
// piped stdin and scripted sessions in tests.

use std::io::{self, BufRead, Write};

use crossterm::style::{style, Stylize};
use dialoguer::Input;

pub trait Console {
    /// Shows `prompt` and returns the raw line the user typed.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    fn say(&mut self, text: &str) -> io::Result<()>;

    /// Like `say`, for things the user got wrong.
    fn warn(&mut self, text: &str) -> io::Result<()>;
}

/// Terminal console: prompts with `dialoguer`, colours warnings.
#[derive(Default)]
pub struct DialoguerConsole;

impl Console for DialoguerConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        // `allow_empty` so an empty answer reaches the validator instead of
        // being swallowed by dialoguer.
        Input::<String>::new()
            .with_prompt(prompt.trim_end().trim_end_matches(':'))
            .allow_empty(true)
            .interact_text()
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        println!("{}", text);
        Ok(())
    }

    fn warn(&mut self, text: &str) -> io::Result<()> {
        println!("{}", style(text).red());
        Ok(())
    }
}

/// Plain line-oriented console. Running out of input is reported as
/// `UnexpectedEof` so a prompt loop can't spin forever.
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LineConsole { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        writeln!(self.output)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    fn warn(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_lines_then_eof() {
        let mut console = LineConsole::new(Cursor::new("first\r\nsecond\n"), Vec::new());
        assert_eq!(console.read_line("> ").unwrap(), "first");
        assert_eq!(console.read_line("> ").unwrap(), "second");
        let err = console.read_line("> ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

        let output = String::from_utf8(console.into_output()).unwrap();
        assert!(output.starts_with("> \n> \n"));
    }
}
