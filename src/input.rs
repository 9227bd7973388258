// src/input.rs
// =============================================================================
// Reads the pasted text that contains the repository URLs.
//
// The user pastes a block of text and finishes with two empty lines in a row
// (or Ctrl+D / end of a pipe). One empty line inside the paste is kept, so
// blank lines between paragraphs don't cut the input short.
// =============================================================================

use std::io::{self, BufRead};

// Reads lines until two consecutive empty lines or EOF
//
// Parameters:
//   reader: any buffered reader (stdin lock, file, or a byte slice in tests)
//
// Returns: the lines joined with '\n', without the terminating empty lines
pub fn read_pasted_text<R: BufRead>(reader: R) -> io::Result<String> {
    let mut lines: Vec<String> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.is_empty() && lines.last().is_some_and(|last| last.is_empty()) {
            lines.pop();
            break;
        }
        lines.push(line);
    }

    Ok(lines.join("\n"))
}
