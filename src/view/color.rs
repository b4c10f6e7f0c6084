//! Diverging red-yellow-green color scale for sentiment values.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

/// Eleven-class red-yellow-green stops, most negative first.
const RD_YL_GN: [&str; 11] = [
    "#a50026", "#d73027", "#f46d43", "#fdae61", "#fee08b", "#ffffbf", "#d9ef8b", "#a6d96a", "#66bd63", "#1a9850",
    "#006837",
];

/// Neutral (yellow) used when a stop fails to parse.
const NEUTRAL: (u8, u8, u8) = (255, 255, 191);

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => Some((
            channel(&hex[0..1].repeat(2))?,
            channel(&hex[1..2].repeat(2))?,
            channel(&hex[2..3].repeat(2))?,
        )),
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}

fn channel(pair: &str) -> Option<u8> {
    match u8::from_str_radix(pair, 16) {
        Ok(value) => Some(value),
        Err(_) => None,
    }
}

/// Color for a sentiment value, centered on neutral at 0.
///
/// Values are clamped to `[-1, 1]` before interpolating between stops.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn diverging_color(value: f64) -> String {
    let t = (value.clamp(-1.0, 1.0) + 1.0) / 2.0;
    let scaled = t * (RD_YL_GN.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(RD_YL_GN.len() - 1);
    let upper = (lower + 1).min(RD_YL_GN.len() - 1);
    let frac = scaled - lower as f64;

    let stop = |i: usize| parse_hex_rgb(RD_YL_GN[i]).unwrap_or(NEUTRAL);
    let (r0, g0, b0) = stop(lower);
    let (r1, g1, b1) = stop(upper);
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;

    format!("#{:02x}{:02x}{:02x}", mix(r0, r1), mix(g0, g1), mix(b0, b1))
}
