//! Terminal output for styled lines and classification spans.

use std::fmt::Write as _;

use csql_syntax::{ClassificationSpan, Snapshot};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;

const RESET: &str = "\x1b[0m";

/// Renders styled lines as ANSI-escaped text, one `\n`-terminated line each.
pub fn lines_to_ansi(lines: &[Line<'_>]) -> String {
    let mut out = String::new();
    for line in lines {
        for span in &line.spans {
            let sgr = sgr_codes(span.style);
            if sgr.is_empty() {
                out.push_str(&span.content);
            } else {
                let _ = write!(out, "\x1b[{sgr}m{}{RESET}", span.content);
            }
        }
        out.push('\n');
    }
    out
}

/// Renders styled lines without any escapes.
pub fn lines_to_plain(lines: &[Line<'_>]) -> String {
    let mut out = String::new();
    for line in lines {
        for span in &line.spans {
            out.push_str(&span.content);
        }
        out.push('\n');
    }
    out
}

/// One span per line: `line:column range category text`.
pub fn format_spans(snapshot: &Snapshot, spans: &[ClassificationSpan]) -> String {
    let mut out = String::new();
    for span in spans {
        let line = snapshot.line_number_at(span.range.start);
        let column = snapshot
            .line(line)
            .map_or(0, |l| span.range.start - l.start);
        let _ = writeln!(
            out,
            "{}:{}\t{}..{}\t{}\t{:?}",
            line + 1,
            column + 1,
            span.range.start,
            span.range.end,
            span.category,
            snapshot.slice(span.range.clone()),
        );
    }
    out
}

fn sgr_codes(style: Style) -> String {
    let mut codes: Vec<String> = Vec::new();

    let modifiers = [
        (Modifier::BOLD, "1"),
        (Modifier::DIM, "2"),
        (Modifier::ITALIC, "3"),
        (Modifier::UNDERLINED, "4"),
        (Modifier::REVERSED, "7"),
        (Modifier::CROSSED_OUT, "9"),
    ];
    for (modifier, code) in modifiers {
        if style.add_modifier.contains(modifier) {
            codes.push(code.to_string());
        }
    }
    if let Some(fg) = style.fg.and_then(|c| color_code(c, false)) {
        codes.push(fg);
    }
    if let Some(bg) = style.bg.and_then(|c| color_code(c, true)) {
        codes.push(bg);
    }
    codes.join(";")
}

fn color_code(color: Color, background: bool) -> Option<String> {
    let base = if background { 40 } else { 30 };
    let basic = |n: u8| Some((base + n).to_string());
    let bright = |n: u8| Some((base + 60 + n).to_string());
    match color {
        Color::Reset => None,
        Color::Black => basic(0),
        Color::Red => basic(1),
        Color::Green => basic(2),
        Color::Yellow => basic(3),
        Color::Blue => basic(4),
        Color::Magenta => basic(5),
        Color::Cyan => basic(6),
        Color::Gray => basic(7),
        Color::DarkGray => bright(0),
        Color::LightRed => bright(1),
        Color::LightGreen => bright(2),
        Color::LightYellow => bright(3),
        Color::LightBlue => bright(4),
        Color::LightMagenta => bright(5),
        Color::LightCyan => bright(6),
        Color::White => bright(7),
        Color::Rgb(r, g, b) => Some(format!("{};2;{r};{g};{b}", base + 8)),
        Color::Indexed(i) => Some(format!("{};5;{i}", base + 8)),
    }
}
