use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::font::codepage;
use crate::DosViewError;

const TAB_WIDTH: usize = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    pub lines: usize,
    pub words: usize,
    pub characters: usize,
}

/// Decoded text plus the viewport onto it.
#[derive(Clone, Debug)]
pub struct Document {
    name: Option<String>,
    lines: Vec<String>,
    display: Vec<String>,
    /// Source line of each display line.
    origins: Vec<usize>,
    word_wrap: bool,
    width: usize,
    page: usize,
    top: usize,
    last_match: Option<usize>,
}

impl Document {
    pub fn empty(width: usize, page: usize) -> Self {
        Self {
            name: None,
            lines: Vec::new(),
            display: Vec::new(),
            origins: Vec::new(),
            word_wrap: false,
            width: width.max(1),
            page: page.max(1),
            top: 0,
            last_match: None,
        }
    }

    pub fn from_text(name: Option<String>, text: &str, width: usize, page: usize) -> Self {
        let mut document = Self::empty(width, page);
        document.name = name;
        document.lines = text.trim_start_matches('\u{FEFF}').lines().map(clean_line).collect();
        document.rebuild();
        document
    }

    /// Decodes UTF-8, or CP866 when the bytes are not valid UTF-8.
    pub fn from_bytes(name: Option<String>, bytes: &[u8], width: usize, page: usize) -> Self {
        let text = match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => {
                debug!("decoding {} as CP866", name.as_deref().unwrap_or("document"));
                codepage::decode_cp866(bytes)
            },
        };
        Self::from_text(name, &text, width, page)
    }

    pub fn open<P: AsRef<Path>>(path: P, width: usize, page: usize) -> Result<Self, DosViewError> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .map_err(|source| DosViewError::Io { path: path.to_path_buf(), source })?;
        let name = path.file_name().map(|name| name.to_string_lossy().into_owned());
        let document = Self::from_bytes(name, &bytes, width, page);
        info!("opened {} ({} lines)", path.display(), document.lines.len());
        Ok(document)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn has_content(&self) -> bool {
        !self.lines.is_empty()
    }

    pub fn word_wrap(&self) -> bool {
        self.word_wrap
    }

    /// Re-wraps the text, keeping the top source line in view.
    pub fn set_word_wrap(&mut self, enabled: bool) {
        if self.word_wrap == enabled {
            return;
        }
        let anchor = self.origins.get(self.top).copied().unwrap_or(0);
        self.word_wrap = enabled;
        self.rebuild();
        self.top = self.first_display_line(anchor);
        self.clamp_top();
    }

    pub fn toggle_word_wrap(&mut self) -> bool {
        self.set_word_wrap(!self.word_wrap);
        self.word_wrap
    }

    pub fn display_lines(&self) -> &[String] {
        &self.display
    }

    /// Lines inside the viewport.
    pub fn visible_lines(&self) -> &[String] {
        let end = (self.top + self.page).min(self.display.len());
        &self.display[self.top.min(end)..end]
    }

    pub fn top(&self) -> usize {
        self.top
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.top = self.top.saturating_add_signed(delta);
        self.last_match = None;
        self.clamp_top();
    }

    pub fn page_down(&mut self) {
        self.scroll_by(self.page as isize);
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-(self.page as isize));
    }

    pub fn goto_start(&mut self) {
        self.top = 0;
        self.last_match = None;
    }

    pub fn goto_end(&mut self) {
        self.top = self.max_top();
        self.last_match = None;
    }

    /// Scrolls so 1-based source line `line` is at the top.
    pub fn goto_line(&mut self, line: usize) -> bool {
        if line == 0 || line > self.lines.len() {
            return false;
        }
        self.top = self.first_display_line(line - 1);
        self.last_match = None;
        self.clamp_top();
        true
    }

    /// Finds the next display line containing `query`, wrapping around.
    ///
    /// Starts after the previous match, or after the top line.
    ///
    /// Returns the 1-based source line of the match.
    pub fn search(&mut self, query: &str) -> Option<usize> {
        if query.is_empty() || self.display.is_empty() {
            return None;
        }

        let needle = query.to_lowercase();
        let count = self.display.len();
        let start = self.last_match.unwrap_or(self.top);
        let found = (1..=count)
            .map(|offset| (start + offset) % count)
            .find(|&index| self.display[index].to_lowercase().contains(&needle))?;

        self.top = found;
        self.last_match = Some(found);
        self.clamp_top();
        Some(self.origins[found] + 1)
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            lines: self.lines.len(),
            words: self.lines.iter().map(|line| line.split_whitespace().count()).sum(),
            characters: self.lines.iter().map(|line| line.chars().count()).sum(),
        }
    }

    fn rebuild(&mut self) {
        self.display.clear();
        self.origins.clear();
        self.last_match = None;
        for (index, line) in self.lines.iter().enumerate() {
            if self.word_wrap {
                for piece in wrap_line(line, self.width) {
                    self.display.push(piece);
                    self.origins.push(index);
                }
            } else {
                self.display.push(line.clone());
                self.origins.push(index);
            }
        }
        self.clamp_top();
    }

    fn first_display_line(&self, source: usize) -> usize {
        self.origins.iter().position(|&origin| origin == source).unwrap_or(0)
    }

    fn max_top(&self) -> usize {
        self.display.len().saturating_sub(self.page)
    }

    fn clamp_top(&mut self) {
        self.top = self.top.min(self.max_top());
    }
}

/// Expands tabs and blanks out control characters.
pub fn clean_line(line: &str) -> String {
    let mut cleaned = String::with_capacity(line.len());
    let mut column = 0;
    for ch in line.chars() {
        match ch {
            '\r' => continue,
            '\t' => {
                let spaces = TAB_WIDTH - column % TAB_WIDTH;
                cleaned.extend(std::iter::repeat(' ').take(spaces));
                column += spaces;
                continue;
            },
            ch if ch.is_control() => cleaned.push(' '),
            ch => cleaned.push(ch),
        }
        column += 1;
    }
    cleaned
}

/// Splits `line` into pieces of at most `width` characters, preferring spaces.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut chars: &[char] = &line.chars().collect::<Vec<_>>();
    let mut pieces = Vec::new();

    while chars.len() > width {
        let split = chars[..=width].iter().rposition(|&ch| ch == ' ').filter(|&pos| pos > 0);
        match split {
            Some(pos) => {
                pieces.push(chars[..pos].iter().collect());
                chars = &chars[pos + 1..];
            },
            None => {
                pieces.push(chars[..width].iter().collect());
                chars = &chars[width..];
            },
        }
    }

    pieces.push(chars.iter().collect());
    pieces
}
