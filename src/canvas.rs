use std::io::Write;

use crate::color::Rgb;

/// Side length of one half-block cell in virtual pixels. Physics runs in
/// virtual pixels so the entity constants behave like they would on a
/// browser-sized surface; rendering divides back down to cells.
pub const CELL_PX: f64 = 6.0;

/// Persistent drawing surface at half-block resolution. Each terminal row
/// holds two vertically stacked cells rendered with "▄". Contents survive
/// between frames and are faded toward the background each frame, which is
/// what leaves the firework trails behind.
pub struct Canvas {
    cols: usize,
    rows: usize,
    buffer: Vec<(f32, f32, f32)>,
    bg: Rgb,
    output_buf: Vec<u8>,
}

impl Canvas {
    pub fn new(cols: usize, rows: usize, bg: Rgb) -> Self {
        let bg_f = (bg.0 as f32, bg.1 as f32, bg.2 as f32);
        Self {
            cols,
            rows,
            buffer: vec![bg_f; cols * rows],
            bg,
            output_buf: Vec::with_capacity(cols * rows * 25),
        }
    }

    /// Scene width in virtual pixels.
    pub fn width(&self) -> f64 {
        self.cols as f64 * CELL_PX
    }

    /// Scene height in virtual pixels.
    pub fn height(&self) -> f64 {
        self.rows as f64 * CELL_PX
    }

    /// Blend every cell toward the background color. Equivalent to painting
    /// a translucent background-colored rectangle over the whole surface.
    pub fn fade(&mut self, alpha: f32) {
        let keep = 1.0 - alpha;
        let bg = (
            self.bg.0 as f32 * alpha,
            self.bg.1 as f32 * alpha,
            self.bg.2 as f32 * alpha,
        );
        for cell in &mut self.buffer {
            cell.0 = cell.0 * keep + bg.0;
            cell.1 = cell.1 * keep + bg.1;
            cell.2 = cell.2 * keep + bg.2;
        }
    }

    /// Alpha-composite a single cell. Out-of-bounds plots are dropped.
    pub fn plot(&mut self, cx: isize, cy: isize, color: Rgb, alpha: f32) {
        if cx < 0 || cy < 0 || cx >= self.cols as isize || cy >= self.rows as isize {
            return;
        }
        let alpha = alpha.clamp(0.0, 1.0);
        let keep = 1.0 - alpha;
        let cell = &mut self.buffer[cy as usize * self.cols + cx as usize];
        cell.0 = cell.0 * keep + color.0 as f32 * alpha;
        cell.1 = cell.1 * keep + color.1 as f32 * alpha;
        cell.2 = cell.2 * keep + color.2 as f32 * alpha;
    }

    /// Filled circle at (x, y) with the given radius, all in virtual pixels.
    /// Radii below half a cell collapse to a single cell.
    pub fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgb, alpha: f32) {
        let cx = x / CELL_PX;
        let cy = y / CELL_PX;
        let r = radius / CELL_PX;

        if r <= 0.5 {
            self.plot(cx.floor() as isize, cy.floor() as isize, color, alpha);
            return;
        }

        let min_x = (cx - r).floor() as isize;
        let max_x = (cx + r).ceil() as isize;
        let min_y = (cy - r).floor() as isize;
        let max_y = (cy + r).ceil() as isize;
        for gy in min_y..=max_y {
            for gx in min_x..=max_x {
                let dx = gx as f64 + 0.5 - cx;
                let dy = gy as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    self.plot(gx, gy, color, alpha);
                }
            }
        }
    }

    /// Stroke a straight segment between two virtual-pixel points by sampling
    /// roughly once per cell along its length.
    pub fn stroke_line(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        color: Rgb,
        alpha: f32,
    ) {
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        let steps = ((dx.abs().max(dy.abs()) / CELL_PX).ceil() as usize).max(1);
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.fill_circle(from.0 + dx * t, from.1 + dy * t, width * 0.5, color, alpha);
        }
    }

    /// Write the surface as half-blocks with 24-bit color, emitting escape
    /// codes only when the color changes between neighboring cells.
    pub fn present<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let mut prev_top: Rgb = (255, 255, 255);
        let mut prev_bot: Rgb = (255, 255, 255);

        for y in (0..self.rows).step_by(2) {
            for x in 0..self.cols {
                let top = Self::quantize(self.buffer[y * self.cols + x]);
                let bot = if y + 1 < self.rows {
                    Self::quantize(self.buffer[(y + 1) * self.cols + x])
                } else {
                    self.bg
                };

                if top != prev_top {
                    write!(
                        self.output_buf,
                        "\x1b[48;2;{};{};{}m",
                        top.0, top.1, top.2
                    )?;
                    prev_top = top;
                }
                if bot != prev_bot {
                    write!(
                        self.output_buf,
                        "\x1b[38;2;{};{};{}m",
                        bot.0, bot.1, bot.2
                    )?;
                    prev_bot = bot;
                }
                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top = (255, 255, 255);
            prev_bot = (255, 255, 255);
            if y + 2 < self.rows {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&self.output_buf)?;
        out.flush()
    }

    fn quantize(cell: (f32, f32, f32)) -> Rgb {
        (
            cell.0.clamp(0.0, 255.0) as u8,
            cell.1.clamp(0.0, 255.0) as u8,
            cell.2.clamp(0.0, 255.0) as u8,
        )
    }
}
