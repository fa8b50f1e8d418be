use std::io::Write;

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
};

use crate::color::Rgb;

// The page turns warm once the show is over.
pub const PAGE_BG: Rgb = (255, 235, 238);
const PANEL_BG: Rgb = (255, 255, 255);
const TEXT: Rgb = (183, 28, 28);

fn rgb((r, g, b): Rgb) -> Color {
    Color::Rgb { r, g, b }
}

/// Replace the animation with the static greeting: fill the page background
/// and draw a bordered panel with the message centered in the terminal.
pub fn draw<W: Write>(out: &mut W, cols: u16, rows: u16, message: &str) -> std::io::Result<()> {
    queue!(out, SetBackgroundColor(rgb(PAGE_BG)))?;
    let blank = " ".repeat(cols as usize);
    for row in 0..rows {
        queue!(out, MoveTo(0, row), Print(&blank))?;
    }

    let msg_width = message.chars().count().min(cols.saturating_sub(6) as usize);
    let message: String = message.chars().take(msg_width).collect();
    let inner = msg_width + 4;
    let left = (cols as usize).saturating_sub(inner + 2) / 2;
    let top = rows.saturating_sub(5) / 2;

    let pad = (inner - msg_width) / 2;
    let lines = [
        format!("┌{}┐", "─".repeat(inner)),
        format!("│{}│", " ".repeat(inner)),
        format!(
            "│{}{}{}│",
            " ".repeat(pad),
            message,
            " ".repeat(inner - msg_width - pad)
        ),
        format!("│{}│", " ".repeat(inner)),
        format!("└{}┘", "─".repeat(inner)),
    ];

    queue!(
        out,
        SetBackgroundColor(rgb(PANEL_BG)),
        SetForegroundColor(rgb(TEXT))
    )?;
    for (i, line) in lines.iter().enumerate() {
        queue!(out, MoveTo(left as u16, top + i as u16), Print(line))?;
    }

    out.flush()
}
