//! Virtual character LCD.
//!
//! This module provides a virtual 2-line × 16-column character display that
//! stands in for the HD44780-style module at the gate. It keeps the rendered
//! buffer and a bounded journal of every frame shown, which is what the
//! simulator prints and what tests assert against.
//!
//! # Character Encoding - ASCII Only
//!
//! Character LCD controllers only have a ROM for printable ASCII. Text
//! containing anything else is rejected with
//! [`HardwareError::InvalidData`] instead of being silently mangled.
//! Control characters are stripped and text longer than a line is truncated.
//!
//! # Examples
//!
//! ```
//! use parkade_hardware::lcd::VirtualLcd;
//!
//! let mut lcd = VirtualLcd::new(2, 16);
//! lcd.set_lines("Available Slots:", "05").unwrap();
//!
//! assert_eq!(lcd.get_line(0).unwrap(), "Available Slots:");
//! assert_eq!(lcd.get_line(1).unwrap(), "05              ");
//! ```

use std::collections::VecDeque;

use parkade_core::constants::{DISPLAY_COLUMNS, DISPLAY_LINES};

use crate::{HardwareError, Result, traits::Display};

/// Maximum number of frames kept in the journal.
const MAX_FRAMES: usize = 256;

/// Virtual character display.
#[derive(Debug, Clone)]
pub struct VirtualLcd {
    /// Number of lines in the display.
    lines: usize,

    /// Number of columns per line.
    columns: usize,

    /// Current display buffer, each line padded to `columns`.
    buffer: Vec<String>,

    /// Every frame passed to [`Display::show`], oldest first, trimmed.
    frames: VecDeque<(String, String)>,
}

impl VirtualLcd {
    /// Create a blank display with the given dimensions.
    pub fn new(lines: usize, columns: usize) -> Self {
        Self {
            lines,
            columns,
            buffer: vec![" ".repeat(columns); lines],
            frames: VecDeque::new(),
        }
    }

    /// Set text on a specific line, starting at column 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the line index is out of bounds or the text is
    /// not ASCII.
    pub fn set_line(&mut self, line: usize, text: &str) -> Result<()> {
        if line >= self.lines {
            return Err(HardwareError::InvalidLine {
                line,
                max: self.lines.saturating_sub(1),
            });
        }
        if !text.is_ascii() {
            return Err(HardwareError::invalid_data(format!(
                "display text must be ASCII, got {text:?}"
            )));
        }

        let sanitized = sanitize_text(text);
        self.buffer[line] = pad_text(&sanitized, self.columns);
        Ok(())
    }

    /// Set the first two lines at once.
    ///
    /// # Errors
    ///
    /// Returns an error if the display has fewer than 2 lines or either text
    /// is not ASCII.
    pub fn set_lines(&mut self, line1: &str, line2: &str) -> Result<()> {
        self.set_line(0, line1)?;
        self.set_line(1, line2)?;
        Ok(())
    }

    /// Clear all lines by filling them with spaces.
    pub fn clear(&mut self) {
        for line in &mut self.buffer {
            *line = " ".repeat(self.columns);
        }
    }

    /// Get text from a specific line, padded to the column width.
    ///
    /// # Errors
    ///
    /// Returns an error if the line index is out of bounds.
    pub fn get_line(&self, line: usize) -> Result<&str> {
        self.buffer
            .get(line)
            .map(String::as_str)
            .ok_or(HardwareError::InvalidLine {
                line,
                max: self.lines.saturating_sub(1),
            })
    }

    /// Get all lines.
    pub fn get_all_lines(&self) -> Vec<&str> {
        self.buffer.iter().map(String::as_str).collect()
    }

    /// Frames shown so far, oldest first, with trailing padding removed.
    pub fn frames(&self) -> impl Iterator<Item = (&str, &str)> {
        self.frames.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// The most recent frame, if any.
    pub fn last_frame(&self) -> Option<(&str, &str)> {
        self.frames.back().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// Number of frames with `line1` as their first line.
    pub fn count_frames_with(&self, line1: &str) -> usize {
        self.frames.iter().filter(|(a, _)| a == line1).count()
    }

    /// Render the buffer inside a box, one string per terminal row.
    pub fn render(&self) -> Vec<String> {
        let border = format!("+{}+", "-".repeat(self.columns));
        let mut out = Vec::with_capacity(self.lines + 2);
        out.push(border.clone());
        out.extend(self.buffer.iter().map(|line| format!("|{line}|")));
        out.push(border);
        out
    }

    fn record_frame(&mut self) {
        let line = |i: usize| {
            self.buffer
                .get(i)
                .map(|l| l.trim_end().to_string())
                .unwrap_or_default()
        };
        let frame = (line(0), line(1));
        self.frames.push_back(frame);
        if self.frames.len() > MAX_FRAMES {
            self.frames.pop_front();
        }
    }
}

impl Default for VirtualLcd {
    fn default() -> Self {
        Self::new(DISPLAY_LINES, DISPLAY_COLUMNS)
    }
}

impl Display for VirtualLcd {
    async fn show(&mut self, line1: &str, line2: &str) -> Result<()> {
        self.set_lines(line1, line2)?;
        self.record_frame();
        Ok(())
    }
}

/// Truncate ASCII text to a maximum number of characters.
///
/// # Examples
///
/// ```
/// use parkade_hardware::lcd::truncate_text;
///
/// assert_eq!(truncate_text("Available Slots:", 9), "Available");
/// assert_eq!(truncate_text("Short", 10), "Short");
/// ```
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Fit ASCII text to a fixed width: truncate or pad with spaces.
///
/// # Examples
///
/// ```
/// use parkade_hardware::lcd::pad_text;
///
/// assert_eq!(pad_text("05", 4), "05  ");
/// assert_eq!(pad_text("PARKING FULL", 7), "PARKING");
/// ```
pub fn pad_text(text: &str, width: usize) -> String {
    let mut fitted = truncate_text(text, width);
    let padding = width - fitted.chars().count();
    fitted.push_str(&" ".repeat(padding));
    fitted
}

/// Remove control characters and surrounding whitespace.
fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}
