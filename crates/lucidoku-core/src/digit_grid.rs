//! Textual representation of a (partially) filled Sudoku board.

use std::{fmt, str::FromStr};

use crate::{Digit, Position, error::ParseError};

/// A 9x9 grid of decided digits, with blanks for unknown cells.
///
/// Unlike [`crate::CandidateGrid`], this type carries no candidate
/// information: it is the plain "what's written on the page" view, used for
/// parsing puzzle input and rendering output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DigitGrid {
    cells: [Option<Digit>; 81],
}

impl DigitGrid {
    /// Returns an all-blank grid.
    #[must_use]
    pub fn empty() -> Self {
        Self { cells: [None; 81] }
    }

    /// Returns the digit at `pos`, or `None` if the cell is blank.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Digit> {
        self.cells[usize::from(pos.y()) * 9 + usize::from(pos.x())]
    }

    /// Sets the cell at `pos` to `digit`, or blanks it if `None`.
    pub fn set(&mut self, pos: Position, digit: Option<Digit>) {
        self.cells[usize::from(pos.y()) * 9 + usize::from(pos.x())] = digit;
    }

    /// Iterates over every `(Position, Option<Digit>)` cell, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Option<Digit>)> + '_ {
        Position::ROWS
            .iter()
            .flatten()
            .copied()
            .map(|pos| (pos, self.get(pos)))
    }

    /// Renders this grid as a flat string, substituting `blank` for empty
    /// cells and inserting a newline after every ninth character when
    /// `newlines` is `true`.
    ///
    /// `blank` is only honored if it is not itself a digit or a line
    /// terminator; otherwise blanks render as `0`, matching the source
    /// format's own guard on its `blankChar` parameter.
    #[must_use]
    pub fn render_flat(&self, blank: char, newlines: bool) -> String {
        let blank = if matches!(blank, '1'..='9' | '\n' | '\r') {
            '0'
        } else {
            blank
        };
        let mut out = String::new();
        for (index, (_, digit)) in self.cells().enumerate() {
            let ch = digit.map_or(blank, |d| char::from(b'0' + d.value()));
            out.push(ch);
            if newlines && index % 9 == 8 {
                out.push('\n');
            }
        }
        out
    }

    /// Renders this grid as a human-readable 9x9 console block, with row and
    /// column separators every three cells.
    #[must_use]
    pub fn render_console(&self) -> String {
        let mut out = String::new();
        for y in 0..9u8 {
            if y > 0 && y % 3 == 0 {
                out.push_str("------+-------+------\n");
            }
            for x in 0..9u8 {
                if x > 0 && x % 3 == 0 {
                    out.push_str("| ");
                }
                let ch = self
                    .get(Position::new(x, y))
                    .map_or('.', |d| char::from(b'0' + d.value()));
                out.push(ch);
                out.push(' ');
            }
            out.push('\n');
        }
        out.pop();
        out
    }
}

impl fmt::Display for DigitGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_flat('.', false))
    }
}

impl FromStr for DigitGrid {
    type Err = ParseError;

    /// Parses a grid from either an 81-character flat string or exactly 9
    /// lines of exactly 9 characters each. `.`, `_`, `0`, and a literal space
    /// all denote a blank cell; `1`-`9` denote a decided digit.
    ///
    /// A space is a data character, not whitespace to be discarded: it
    /// occupies a cell the same way `.` does, so it counts toward both the
    /// 81-character total and each line's 9-character length.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let flat: String = if s.contains('\n') || s.contains('\r') {
            let lines: Vec<&str> = s.lines().collect();
            if lines.len() != 9 {
                return Err(ParseError::WrongLineCount { found: lines.len() });
            }
            for (line, text) in lines.iter().enumerate() {
                let found = text.chars().count();
                if found != 9 {
                    return Err(ParseError::WrongLineLength { line, found });
                }
            }
            lines.concat()
        } else {
            s.to_string()
        };

        let chars: Vec<char> = flat.chars().collect();
        if chars.len() != 81 {
            return Err(ParseError::WrongCellCount { found: chars.len() });
        }

        let mut grid = Self::empty();
        for (index, &ch) in chars.iter().enumerate() {
            let digit = match ch {
                '.' | '_' | '0' | ' ' => None,
                '1'..='9' => Digit::from_value(ch as u8 - b'0'),
                _ => return Err(ParseError::InvalidChar { char: ch, index }),
            };
            let pos = Position::new((index % 9) as u8, (index / 9) as u8);
            grid.set(pos, digit);
        }
        Ok(grid)
    }
}
