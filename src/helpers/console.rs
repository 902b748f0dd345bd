use std::io::{BufRead, Write};
use anyhow::{bail, Context};

/// Line based prompting over any reader/writer pair, stdin/stdout in the binary.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, line: impl AsRef<str>) -> anyhow::Result<()> {
        writeln!(self.output, "{}", line.as_ref()).context("Failed to write to terminal")
    }

    pub fn blank(&mut self) -> anyhow::Result<()> {
        self.say(" ")
    }

    /// Prints `prompt` and reads one trimmed line. A closed input is an error, otherwise the
    /// reprompt loops would spin forever.
    pub fn ask(&mut self, prompt: &str) -> anyhow::Result<String> {
        write!(self.output, "{}", prompt).context("Failed to write to terminal")?;
        self.output.flush().context("Failed to flush terminal")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from terminal")?;
        if read == 0 {
            bail!("Input closed before the session finished");
        }
        Ok(line.trim().to_string())
    }

    /// Asks until `parse` accepts the answer, printing its message after every rejection.
    pub fn ask_until<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> anyhow::Result<T> {
        loop {
            let answer = self.ask(prompt)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(message) => self.say(message)?,
            }
        }
    }

    pub fn confirm(&mut self, question: &str) -> anyhow::Result<bool> {
        let prompt = format!("{} (yes/no): ", question);
        self.ask_until(&prompt, parse_yes_no)
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

fn parse_yes_no(answer: &str) -> Result<bool, String> {
    match answer.to_lowercase().as_str() {
        "yes" => Ok(true),
        "no" => Ok(false),
        _ => Err("Invalid input. Please enter yes or no.".to_string()),
    }
}
