use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Where the REPL and interactive commands read their lines from.
pub trait InputSource: Send {
    /// Show `prompt` and read one line without its line ending.
    /// `Ok(None)` means end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Read a secret such as a password. Masking is up to the implementation;
    /// the default reads a plain line.
    fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.read_line(prompt)
    }
}

/// Reads from the process's stdin
#[derive(Debug, Default)]
pub struct StdinInput;

impl InputSource for StdinInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Pre-recorded answers, consumed in order. Used by tests and scripted runs.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts that have been shown so far
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}

/// Read a line, treating end of input as an error. Interactive commands use
/// this: running out of input halfway through a form aborts the command.
pub fn require_line(input: &mut dyn InputSource, prompt: &str) -> io::Result<String> {
    input
        .read_line(prompt)?
        .map(|l| l.trim().to_string())
        .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"))
}

pub fn require_secret(input: &mut dyn InputSource, prompt: &str) -> io::Result<String> {
    input
        .read_secret(prompt)?
        .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"))
}
