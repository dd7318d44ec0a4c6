//! Line tokenizer shared by the text material formats.

use std::io::BufRead;

use anyhow::{Context, Result};
use corelib::{Color, FormatError, FormatResult};

/// One non-blank input line split on whitespace.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    /// 1-based line number in the source.
    pub number: usize,
    pub tokens: Vec<String>,
}

impl Line {
    pub fn directive(&self) -> &str {
        &self.tokens[0]
    }

    /// Tokens following the directive keyword.
    pub fn args(&self) -> Args<'_> {
        Args {
            directive: self.directive(),
            rest: &self.tokens[1..],
        }
    }
}

/// Read every non-blank line of `reader` into tokens.
pub fn tokenize<R: BufRead>(reader: R) -> Result<Vec<Line>> {
    let mut lines = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        let tokens: Vec<String> = line.split_whitespace().map(str::to_owned).collect();
        if tokens.is_empty() {
            continue;
        }
        lines.push(Line {
            number: line_no + 1,
            tokens,
        });
    }
    Ok(lines)
}

/// Typed accessors over a directive's argument tokens.
#[derive(Clone, Copy, Debug)]
pub struct Args<'a> {
    directive: &'a str,
    rest: &'a [String],
}

impl<'a> Args<'a> {
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.rest.get(index).map(String::as_str)
    }

    pub fn token(&self, index: usize, what: &'static str) -> FormatResult<&'a str> {
        self.get(index).ok_or_else(|| FormatError::MissingToken {
            directive: self.directive.to_owned(),
            what,
        })
    }

    pub fn scalar(&self, index: usize, what: &'static str) -> FormatResult<f64> {
        let token = self.token(index, what)?;
        token.parse::<f64>().map_err(|_| FormatError::InvalidNumber {
            directive: self.directive.to_owned(),
            token: token.to_owned(),
        })
    }

    /// Three consecutive scalars starting at `index`.
    pub fn color(&self, index: usize) -> FormatResult<Color> {
        let r = self.scalar(index, "red channel")?;
        let g = self.scalar(index + 1, "green channel")?;
        let b = self.scalar(index + 2, "blue channel")?;
        Ok(Color::new(r, g, b))
    }

    /// `true` only for the literal token `true`.
    pub fn flag(&self, index: usize) -> FormatResult<bool> {
        Ok(self.token(index, "flag")? == "true")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn skips_blank_lines_and_keeps_numbers() {
        let src = "\n  Kd 1 0.5  0\n\t\nd 0.25\n";
        let lines = tokenize(Cursor::new(src)).expect("tokenize");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 2);
        assert_eq!(lines[0].tokens, vec!["Kd", "1", "0.5", "0"]);
        assert_eq!(lines[1].number, 4);
        assert_eq!(lines[1].directive(), "d");
    }

    #[test]
    fn color_reads_three_channels() {
        let lines = tokenize(Cursor::new("color 0.1 0.2 0.3")).expect("tokenize");
        let color = lines[0].args().color(0).expect("color");
        assert_eq!(color, Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn missing_channel_is_reported() {
        let lines = tokenize(Cursor::new("Kd 1 1")).expect("tokenize");
        let err = lines[0].args().color(0).unwrap_err();
        assert_eq!(
            err,
            FormatError::MissingToken {
                directive: "Kd".into(),
                what: "blue channel"
            }
        );
    }

    #[test]
    fn malformed_number_is_reported() {
        let lines = tokenize(Cursor::new("d half")).expect("tokenize");
        let err = lines[0].args().scalar(0, "alpha").unwrap_err();
        assert!(matches!(err, FormatError::InvalidNumber { token, .. } if token == "half"));
    }

    #[test]
    fn flag_is_true_only_for_literal_true() {
        let lines = tokenize(Cursor::new("transparent true\ntransparent yes")).expect("tokenize");
        assert!(lines[0].args().flag(0).unwrap());
        assert!(!lines[1].args().flag(0).unwrap());
    }
}
