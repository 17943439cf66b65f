//! Text measurement and wrapping for legend and label layout.

/// Heuristic pixel width of `text` (plotters cannot measure text up front).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Cut `text` to fit `max_px`, ending in a single ellipsis when shortened.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out: String = text.chars().collect();
    while !out.is_empty() && estimate_text_width_px(&format!("{out}…"), font_px) > max_px {
        out.pop();
    }
    if out.is_empty() {
        return String::new();
    }
    out.push('…');
    out
}

/// Greedy word wrap into lines no wider than `max_px`.
///
/// A word that alone exceeds the width is truncated rather than split.
pub fn wrap_text_to_width(text: &str, font_px: u32, max_px: u32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        let candidate = if cur.is_empty() {
            word.to_string()
        } else {
            format!("{cur} {word}")
        };
        if estimate_text_width_px(&candidate, font_px) <= max_px {
            cur = candidate;
            continue;
        }
        if !cur.is_empty() {
            lines.push(std::mem::take(&mut cur));
        }
        if estimate_text_width_px(word, font_px) <= max_px {
            cur = word.to_string();
        } else {
            lines.push(truncate_to_width(word, font_px, max_px));
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_words() {
        // 10px font: each char ~6px, so 60px holds 10 chars.
        let lines = wrap_text_to_width("United States Breast cancer", 10, 60);
        assert_eq!(lines, vec!["United", "States", "Breast", "cancer"]);
        let lines = wrap_text_to_width("All cancers", 10, 120);
        assert_eq!(lines, vec!["All cancers"]);
    }

    #[test]
    fn truncates_long_word() {
        let s = truncate_to_width("Mesothelioma", 10, 30);
        assert!(s.ends_with('…'));
        assert!(estimate_text_width_px(&s, 10) <= 30);
    }
}
