//! Line-oriented prompts over any reader/writer pair, so the wizard can be
//! driven from a terminal or from a script.

use std::io::{self, BufRead, Write};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    /// Print a prompt and read one trimmed line; `None` at end of input.
    pub fn line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut input = String::new();
        if self.input.read_line(&mut input)? == 0 {
            return Ok(None);
        }
        Ok(Some(input.trim().to_string()))
    }

    /// Text with a default used for an empty answer
    pub fn text(&mut self, prompt: &str, default: &str) -> io::Result<Option<String>> {
        Ok(self.line(&format!("{} [{}]: ", prompt, default))?.map(|s| {
            if s.is_empty() {
                default.to_string()
            } else {
                s
            }
        }))
    }

    pub fn f64(&mut self, prompt: &str, default: f64) -> io::Result<Option<f64>> {
        loop {
            let Some(answer) = self.line(&format!("{} [{}]: ", prompt, default))? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(default));
            }
            match answer.replace(',', ".").parse::<f64>() {
                Ok(v) if v.is_finite() => return Ok(Some(v)),
                _ => writeln!(self.output, "  Please enter a number.")?,
            }
        }
    }

    pub fn u32(&mut self, prompt: &str, default: u32) -> io::Result<Option<u32>> {
        loop {
            let Some(answer) = self.line(&format!("{} [{}]: ", prompt, default))? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(default));
            }
            match answer.parse::<u32>() {
                Ok(v) => return Ok(Some(v)),
                Err(_) => writeln!(self.output, "  Please enter a whole number.")?,
            }
        }
    }

    pub fn yes_no(&mut self, prompt: &str, default: bool) -> io::Result<Option<bool>> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            let Some(answer) = self.line(&format!("{} [{}]: ", prompt, hint))? else {
                return Ok(None);
            };
            match answer.to_lowercase().as_str() {
                "" => return Ok(Some(default)),
                "y" | "yes" | "o" | "oui" => return Ok(Some(true)),
                "n" | "no" | "non" => return Ok(Some(false)),
                _ => writeln!(self.output, "  Please answer y or n.")?,
            }
        }
    }

    /// Pick one of `choices` by 1-based number; an empty answer picks `default`.
    pub fn choose(&mut self, prompt: &str, choices: &[String], default: usize) -> io::Result<Option<usize>> {
        writeln!(self.output, "{}", prompt)?;
        for (i, choice) in choices.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, choice)?;
        }
        loop {
            let Some(answer) = self.line(&format!("Choice [{}]: ", default + 1))? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(default));
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => writeln!(self.output, "  Please enter a number between 1 and {}.", choices.len())?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompter(script: &str) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(script.as_bytes(), Vec::new())
    }

    #[test]
    fn test_defaults_on_empty_answer() {
        let mut p = prompter("\n\n\n");
        assert_eq!(p.f64("Width", 15.0).unwrap(), Some(15.0));
        assert_eq!(p.u32("Levels", 5).unwrap(), Some(5));
        assert_eq!(p.yes_no("Shop", true).unwrap(), Some(true));
    }

    #[test]
    fn test_retries_until_valid() {
        let mut p = prompter("abc\n12,5\n");
        assert_eq!(p.f64("Width", 15.0).unwrap(), Some(12.5));
        let output = String::from_utf8(p.output).unwrap();
        assert!(output.contains("Please enter a number."));
    }

    #[test]
    fn test_end_of_input() {
        let mut p = prompter("");
        assert_eq!(p.line("?").unwrap(), None);
        assert_eq!(p.u32("Levels", 5).unwrap(), None);
    }

    #[test]
    fn test_choose() {
        let choices = vec!["a".to_string(), "b".to_string()];
        let mut p = prompter("3\n2\n");
        assert_eq!(p.choose("Pick", &choices, 0).unwrap(), Some(1));
    }
}
