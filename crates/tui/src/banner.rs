use std::collections::HashMap;

use once_cell::sync::Lazy;

const FONT_HEIGHT: usize = 5;
const FONT_WIDTH: usize = 4;
const FILL_CHAR: char = '█';
const EDGE_CHAR: char = '▀';

type Glyph = [&'static str; FONT_HEIGHT];

static GLYPHS: Lazy<HashMap<char, Glyph>> = Lazy::new(|| {
    HashMap::from([
        ('A', [" 11 ", "1  1", "1111", "1  1", "1  1"]),
        ('D', ["111 ", "1  1", "1  1", "1  1", "111 "]),
        ('E', ["1111", "1   ", "111 ", "1   ", "1111"]),
        ('F', ["1111", "1   ", "111 ", "1   ", "1   "]),
        ('P', ["111 ", "1  1", "111 ", "1   ", "1   "]),
        ('R', ["111 ", "1  1", "111 ", "1 1 ", "1  1"]),
        ('T', ["1111", " 11 ", " 11 ", " 11 ", " 11 "]),
        ('X', ["1  1", "1  1", " 11 ", "1  1", "1  1"]),
        (' ', ["    ", "    ", "    ", "    ", "    "]),
        ('?', ["111 ", "   1", " 11 ", "    ", " 1  "]),
    ])
});

/// Number of rows produced by [`render`].
pub const HEIGHT: usize = FONT_HEIGHT;

/// Render `text` in block letters, one string per row.
///
/// The bottom row of each glyph uses a half block so the title sits on a
/// thin baseline.
pub fn render(text: &str) -> Vec<String> {
    let content: Vec<char> = text.chars().map(|c| c.to_ascii_uppercase()).collect();
    if content.is_empty() {
        return vec![String::new(); FONT_HEIGHT];
    }

    let fallback = GLYPHS.get(&'?');
    let mut rows = vec![String::new(); FONT_HEIGHT];
    for (index, ch) in content.iter().enumerate() {
        let Some(glyph) = GLYPHS.get(ch).or(fallback) else {
            continue;
        };
        for (row_idx, row) in glyph.iter().enumerate() {
            if index > 0 {
                rows[row_idx].push(' ');
            }
            let mark = if row_idx + 1 == FONT_HEIGHT {
                EDGE_CHAR
            } else {
                FILL_CHAR
            };
            rows[row_idx].extend(
                row.chars()
                    .map(|symbol| if symbol == '1' { mark } else { ' ' }),
            );
        }
    }

    rows.into_iter()
        .map(|row| row.trim_end().to_string())
        .collect()
}

/// Widest row of `lines`, in characters.
pub fn width(lines: &[String]) -> usize {
    lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_fixed_height_rows() {
        let lines = render("ApexDraft");
        assert_eq!(lines.len(), HEIGHT);
        assert_eq!(width(&lines), 9 * FONT_WIDTH + 8);
        assert!(lines[0].starts_with(' '));
        assert!(lines[4].contains(EDGE_CHAR));
    }

    #[test]
    fn unknown_letters_fall_back() {
        assert_eq!(render("Z"), render("?"));
        assert!(render("").iter().all(String::is_empty));
    }
}
