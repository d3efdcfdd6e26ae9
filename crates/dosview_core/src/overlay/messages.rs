use super::kind::OverlayKind;

/// Text shown on the bottom row. Digits after a space are drawn as hotkeys.
pub const ACTION_BAR: &str =
    " 1Help   2Wrap   3Open   4Goto   5Stats  6Lib    7Search 8       9Menu  10Quit";

/// Inner width of the boxes built by [`frame`].
const FRAME_WIDTH: usize = 46;

const WELCOME: &str = "\
╔══════════════════ DOSVIEW ═══════════════════╗
║                                              ║
║ CP866 text viewer  v%version%                ║
║                                              ║
║ No document is loaded.                       ║
║                                              ║
║ F3  open a file                              ║
║ F1  keys and commands                        ║
║                                              ║
╟──────────────────────────────────────────────╢
║                Press any key                 ║
╚══════════════════════════════════════════════╝";

const HELP: &str = "\
╔════════════════════ Help ════════════════════╗
║ F1   this help        F7   search            ║
║ F2   word wrap        F4   go to line        ║
║ F3   open file        F5   statistics        ║
║ F9   menu             F6   library           ║
║ F11  about            F10  quit              ║
║ Home/End        first / last line            ║
║ Up/Down PgUp/PgDn      scroll                ║
╟──────────────────────────────────────────────╢
║              F1 or Esc to close              ║
╚══════════════════════════════════════════════╝";

const QUIT: &str = "\
╔════════════════════ Quit ════════════════════╗
║                                              ║
║ Leave DOSVIEW?                               ║
║                                              ║
╟──────────────────────────────────────────────╢
║              [Y] Yes    [N] No               ║
╚══════════════════════════════════════════════╝";

const ABOUT: &str = "\
╔═══════════════════ About ════════════════════╗
║                                              ║
║ DOSVIEW %version%                            ║
║ Retro CP866 text viewer                      ║
║ 8x16 bitmap font, 80x24 screen               ║
║                                              ║
╟──────────────────────────────────────────────╢
║                 Esc to close                 ║
╚══════════════════════════════════════════════╝";

const SEARCH: &str = "\
╔═══════════════════ Search ═══════════════════╗
║                                              ║
║ Find: %query_____________________________%   ║
║                                              ║
╟──────────────────────────────────────────────╢
║           Enter find    Esc cancel           ║
╚══════════════════════════════════════════════╝";

const GOTO: &str = "\
╔═════════════════ Go to line ═════════════════╗
║                                              ║
║ Line:       %query______%                    ║
║ Last line:  %totalLines%                     ║
║                                              ║
╟──────────────────────────────────────────────╢
║           Enter jump    Esc cancel           ║
╚══════════════════════════════════════════════╝";

const MENU: &str = "\
╔════════════════════ Menu ════════════════════╗
║  1  Help            6  Library               ║
║  2  Word wrap       7  Search                ║
║  3  Open file       9  Menu                  ║
║  4  Go to line     10  Quit                  ║
║  5  Statistics     11  About                 ║
╟──────────────────────────────────────────────╢
║              F9 or Esc to close              ║
╚══════════════════════════════════════════════╝";

const STATISTICS: &str = "\
╔═════════════════ Statistics ═════════════════╗
║ File:       %fileName_______________________%║
╟──────────────────────────────────────────────╢
║ Lines:      %totalLines%                     ║
║ Words:      %totalWords%                     ║
║ Characters: %totalChars%                     ║
║ Word wrap:  %wrap%                           ║
╟──────────────────────────────────────────────╢
║              F5 or Esc to close              ║
╚══════════════════════════════════════════════╝";

/// Static template for `kind`. The library box is built at runtime by [`frame`].
pub fn template(kind: OverlayKind) -> &'static str {
    match kind {
        OverlayKind::Welcome => WELCOME,
        OverlayKind::Help => HELP,
        OverlayKind::Quit => QUIT,
        OverlayKind::About => ABOUT,
        OverlayKind::Search => SEARCH,
        OverlayKind::Goto => GOTO,
        OverlayKind::Menu => MENU,
        OverlayKind::Statistics => STATISTICS,
        OverlayKind::Library => "",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// Right-aligned within the placeholder.
    Number(usize),
    /// Left-aligned within the placeholder.
    Text(String),
}

/// Live values substituted into `%name%` placeholders.
#[derive(Clone, Debug, Default)]
pub struct TemplateValues {
    entries: Vec<(&'static str, Value)>,
}

impl TemplateValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number(mut self, name: &'static str, value: usize) -> Self {
        self.entries.push((name, Value::Number(value)));
        self
    }

    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.entries.push((name, Value::Text(value.into())));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().rev().find(|(key, _)| *key == name).map(|(_, value)| value)
    }
}

/// Replaces placeholders, keeping each one's width so box edges stay put.
///
/// A placeholder is `%name%`, optionally widened with underscores before the
/// closing `%` (`%query_____%`). Unknown names are left untouched.
pub fn format(template: &str, values: &TemplateValues) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        output.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match parse_placeholder(candidate) {
            Some((name, width, len)) => match values.get(name) {
                Some(value) => {
                    output.push_str(&fit(value, width));
                    rest = &candidate[len..];
                },
                None => {
                    output.push_str(&candidate[..len]);
                    rest = &candidate[len..];
                },
            },
            None => {
                output.push('%');
                rest = &candidate[1..];
            },
        }
    }

    output.push_str(rest);
    output
}

/// Returns the name, display width and byte length of a leading placeholder.
fn parse_placeholder(text: &str) -> Option<(&str, usize, usize)> {
    let body = text.strip_prefix('%')?;
    let name_len = body.find(|ch: char| !ch.is_ascii_alphabetic())?;
    if name_len == 0 {
        return None;
    }

    let padding = body[name_len..].find(|ch: char| ch != '_')?;
    if !body[name_len + padding..].starts_with('%') {
        return None;
    }

    let len = name_len + padding + 2;
    Some((&body[..name_len], len, len))
}

fn fit(value: &Value, width: usize) -> String {
    let (text, right_align) = match value {
        Value::Number(number) => (number.to_string(), true),
        Value::Text(text) => (text.clone(), false),
    };

    let truncated: String = text.chars().take(width).collect();
    if right_align {
        format!("{truncated:>width$}")
    } else {
        format!("{truncated:<width$}")
    }
}

/// Draws a box in the same style as the static templates.
pub fn frame(title: &str, body: &[String], footer: &str) -> String {
    let width = FRAME_WIDTH;
    let heading = format!(" {title} ");
    let heading_len = heading.chars().count().min(width);
    let left = (width - heading_len) / 2;

    let mut lines = Vec::with_capacity(body.len() + 4);
    lines.push(format!(
        "╔{}{}{}╗",
        "═".repeat(left),
        heading.chars().take(heading_len).collect::<String>(),
        "═".repeat(width - left - heading_len)
    ));
    for line in body {
        let text: String = format!(" {line}").chars().take(width).collect();
        lines.push(format!("║{text:<width$}║"));
    }
    lines.push(format!("╟{}╢", "─".repeat(width)));
    let footer: String = footer.chars().take(width).collect();
    lines.push(format!("║{footer:^width$}║"));
    lines.push(format!("╚{}╝", "═".repeat(width)));
    lines.join("\n")
}
