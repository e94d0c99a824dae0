//! Line-oriented interactive front end for a [`Session`].
//!
//! Each input line is one command. The resulting view (or an error message)
//! is written back after every command; errors never end the shell.

use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use super::{Command, Direction, Session};
use crate::canvas::{parse_canvas_json, CanvasShape};
use crate::error::BoxlabelError;
use crate::export::{ExportOptions, ExportReport};
use crate::split::SplitRatios;

/// Help text printed by the `help` command.
pub const SHELL_HELP: &str = "\
Commands:
  rect <left> <top> <width> <height>   draw a rectangle on the current image
  canvas <json>                        draw shapes from a canvas JSON payload
  label <box> <text>                   label box number <box> (1-based)
  next | prev                          move to the next / previous image
  show                                 show the current image again
  split [<val> <test>]                 split the batch and write the archive
  help                                 show this help
  quit                                 leave the shell
";

/// A parsed shell command.
#[derive(Clone, Debug, PartialEq)]
pub enum ShellInput {
    Draw(Vec<CanvasShape>),
    Label { number: usize, text: String },
    Next,
    Previous,
    Show,
    Split(Option<SplitRatios>),
    Help,
    Quit,
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_shell_line(line: &str) -> Result<Option<ShellInput>, BoxlabelError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = split_word(trimmed);
    let invalid = |message: String| BoxlabelError::ShellCommand {
        line: trimmed.to_string(),
        message,
    };

    let input = match word {
        "rect" => {
            let values = parse_numbers(rest).map_err(invalid)?;
            let [left, top, width, height] = values[..] else {
                return Err(invalid(format!("expected 4 numbers, found {}", values.len())));
            };
            ShellInput::Draw(vec![CanvasShape::rect(left, top, width, height)])
        }
        "canvas" => {
            let doc = parse_canvas_json(rest).map_err(|err| invalid(err.to_string()))?;
            ShellInput::Draw(doc.objects)
        }
        "label" => {
            let (number, text) = split_word(rest);
            let number = number
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| invalid(format!("invalid box number '{number}'")))?;
            ShellInput::Label {
                number,
                text: text.to_string(),
            }
        }
        "next" | "n" => ShellInput::Next,
        "prev" | "previous" | "p" => ShellInput::Previous,
        "show" => ShellInput::Show,
        "split" => {
            let values = parse_numbers(rest).map_err(invalid)?;
            match values[..] {
                [] => ShellInput::Split(None),
                [validation, test] => ShellInput::Split(Some(SplitRatios { validation, test })),
                _ => {
                    return Err(invalid(format!(
                        "expected 0 or 2 ratios, found {}",
                        values.len()
                    )))
                }
            }
        }
        "help" | "?" => ShellInput::Help,
        "quit" | "exit" | "q" => ShellInput::Quit,
        other => return Err(invalid(format!("unknown command '{other}'; try 'help'"))),
    };

    Ok(Some(input))
}

/// Run the shell until `quit` or end of input.
///
/// `defaults` supplies the ratios for a bare `split` and the shuffle seed for
/// every split. Each successful split overwrites `archive_path`. Returns the
/// report of the last archive written, if any.
pub fn run_shell<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    out: &mut W,
    defaults: &ExportOptions,
    archive_path: &Path,
) -> Result<Option<ExportReport>, BoxlabelError> {
    let mut last_report = None;

    if let Ok(view) = session.current_view() {
        write!(out, "{view}")?;
    }

    for line in input.lines() {
        let line = line?;
        let parsed = match parse_shell_line(&line) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => continue,
            Err(err) => {
                writeln!(out, "Error: {err}")?;
                continue;
            }
        };

        let command = match parsed {
            ShellInput::Quit => break,
            ShellInput::Help => {
                write!(out, "{SHELL_HELP}")?;
                continue;
            }
            ShellInput::Show => {
                match session.current_view() {
                    Ok(view) => write!(out, "{view}")?,
                    Err(err) => writeln!(out, "Error: {err}")?,
                }
                continue;
            }
            ShellInput::Draw(shapes) => Command::DrawShapes(shapes),
            ShellInput::Label { number, text } => Command::SetLabel {
                box_index: number - 1,
                label: text,
            },
            ShellInput::Next => Command::Navigate(Direction::Next),
            ShellInput::Previous => Command::Navigate(Direction::Previous),
            ShellInput::Split(ratios) => Command::RequestSplit(ExportOptions {
                ratios: ratios.unwrap_or(defaults.ratios),
                seed: defaults.seed,
            }),
        };

        match session.handle(command) {
            Ok(view) => {
                write!(out, "{view}")?;
                if let Some(export) = &view.export {
                    match fs::write(archive_path, &export.bytes) {
                        Ok(()) => {
                            writeln!(out, "Wrote {}", archive_path.display())?;
                            last_report = Some(export.report.clone());
                        }
                        Err(err) => writeln!(out, "Error: IO error: {err}")?,
                    }
                }
            }
            Err(err) => writeln!(out, "Error: {err}")?,
        }
    }

    Ok(last_report)
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(pos) => (&input[..pos], input[pos..].trim()),
        None => (input, ""),
    }
}

fn parse_numbers(input: &str) -> Result<Vec<f64>, String> {
    input
        .split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| format!("invalid number '{token}'"))
        })
        .collect()
}
