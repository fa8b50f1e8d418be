pub type Rgb = (u8, u8, u8);

/// Full-saturation, half-lightness color at a random hue.
pub fn random_hue() -> Rgb {
    hsl_to_rgb(fastrand::u32(0..360) as f64, 1.0, 0.5)
}

pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let h = h % 360.0;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}
