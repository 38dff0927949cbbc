//! Font metrics and text fitting
//!
//! Sheets use the PDF base-14 Helvetica faces, so widths come from the
//! standard AFM metrics (units of 1/1000 em). Text is encoded as WinAnsi when
//! written to the PDF.

use crate::render::surface::FontWeight;

pub const ELLIPSIS: char = '…';

/// Helvetica advance widths for ASCII 32..=126.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Helvetica-Bold advance widths for ASCII 32..=126.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

fn char_width(c: char, weight: FontWeight) -> u16 {
    let code = c as u32;
    if (32..=126).contains(&code) {
        let table = match weight {
            FontWeight::Regular => &HELVETICA,
            FontWeight::Bold => &HELVETICA_BOLD,
        };
        return table[(code - 32) as usize];
    }
    match c {
        '·' => 278,
        '–' => 556,
        '—' | '…' => 1000,
        '•' => 350,
        '‘' | '’' => match weight {
            FontWeight::Regular => 222,
            FontWeight::Bold => 278,
        },
        '“' | '”' => 500,
        '²' | '³' | '°' => 333,
        _ => 556,
    }
}

/// Width of `text` in points.
pub fn text_width(text: &str, size: f64, weight: FontWeight) -> f64 {
    let units: u32 = text.chars().map(|c| char_width(c, weight) as u32).sum();
    units as f64 * size / 1000.0
}

/// Map to a WinAnsi byte; unsupported characters become '?'.
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

/// Greedy word wrap. Words wider than the line are broken by character.
pub fn wrap_text(text: &str, size: f64, weight: FontWeight, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if text_width(&candidate, size, weight) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if text_width(word, size, weight) <= max_width {
                current = word.to_string();
            } else {
                for c in word.chars() {
                    let mut next = current.clone();
                    next.push(c);
                    if !current.is_empty() && text_width(&next, size, weight) > max_width {
                        lines.push(std::mem::take(&mut current));
                        current.push(c);
                    } else {
                        current = next;
                    }
                }
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Trim `line` until `line + …` fits.
pub fn ellipsize(line: &str, size: f64, weight: FontWeight, max_width: f64) -> String {
    let mut chars: Vec<char> = line.trim_end().chars().collect();
    loop {
        let mut candidate: String = chars.iter().collect();
        candidate = candidate.trim_end().to_string();
        candidate.push(ELLIPSIS);
        if chars.is_empty() || text_width(&candidate, size, weight) <= max_width {
            return candidate;
        }
        chars.pop();
    }
}

/// Keep at most `max_lines`; the last kept line is ellipsised when text was cut.
pub fn clamp_lines(
    mut lines: Vec<String>,
    max_lines: usize,
    size: f64,
    weight: FontWeight,
    max_width: f64,
) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        *last = ellipsize(last, size, weight, max_width);
    }
    lines
}

/// Wrap then clamp.
pub fn fit_text(
    text: &str,
    size: f64,
    weight: FontWeight,
    max_width: f64,
    max_lines: usize,
) -> Vec<String> {
    clamp_lines(wrap_text(text, size, weight, max_width), max_lines, size, weight, max_width)
}
