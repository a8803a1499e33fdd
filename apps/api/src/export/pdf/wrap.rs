//! Fixed-width word wrapping.
//!
//! Widths are estimated as `chars × font_size × ratio`, not measured from
//! glyph metrics. Output must stay line-for-line compatible with earlier
//! exports, so words are split on single spaces and runs of spaces produce
//! empty words exactly as before.

/// Estimated width of `s` at `font_size`.
pub fn estimated_width(s: &str, font_size: f32, ratio: f32) -> f32 {
    s.chars().count() as f32 * font_size * ratio
}

/// Greedy wrap. A line is closed when adding the next word would make it
/// wider than `max_width`; a single word wider than the line stays whole.
pub fn wrap_text(text: &str, font_size: f32, max_width: f32, ratio: f32) -> Vec<String> {
    let mut words = text.split(' ');
    let mut lines = Vec::new();
    let mut current = words.next().unwrap_or_default().to_string();

    for word in words {
        let candidate = format!("{current} {word}");
        if estimated_width(&candidate, font_size, ratio) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    lines.push(current);
    lines
}
