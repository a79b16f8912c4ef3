use std::io::{self, BufRead, Write};

/// Ask a yes/no `question` until a valid answer is given.
///
/// An empty line returns `default`. End of input counts as "no".
pub fn confirm<R: BufRead, W: Write>(
    question: &str,
    default: bool,
    reader: &mut R,
    writer: &mut W,
) -> io::Result<bool> {
    let hint = if default { "[Y]/n" } else { "y/[N]" };
    loop {
        write!(writer, "{} {} ", question, hint)?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            writeln!(writer)?;
            return Ok(false);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(writer, "Please respond with 'y' or 'n'")?,
        }
    }
}

/// [`confirm`] on the process stdin/stdout.
pub fn confirm_stdin(question: &str, default: bool) -> io::Result<bool> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    confirm(question, default, &mut stdin.lock(), &mut stdout.lock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(input: &str, default: bool) -> (bool, String) {
        let mut out = Vec::new();
        let answer = confirm("Overwrite?", default, &mut Cursor::new(input), &mut out).unwrap();
        (answer, String::from_utf8(out).unwrap())
    }

    #[test]
    fn empty_line_takes_default() {
        assert!(ask("\n", true).0);
        assert!(!ask("\n", false).0);
    }

    #[test]
    fn answers_are_case_insensitive() {
        assert!(ask("YES\n", false).0);
        assert!(!ask("N\n", true).0);
    }

    #[test]
    fn invalid_input_reprompts() {
        let (answer, transcript) = ask("maybe\nsure\ny\n", false);
        assert!(answer);
        assert_eq!(transcript.matches("Please respond with 'y' or 'n'").count(), 2);
        assert_eq!(transcript.matches("Overwrite? y/[N]").count(), 3);
    }

    #[test]
    fn end_of_input_declines() {
        assert!(!ask("", true).0);
        assert!(!ask("what\n", true).0);
    }
}
