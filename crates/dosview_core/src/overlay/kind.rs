use std::fmt;

/// Every modal overlay the viewer can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Welcome,
    Help,
    Quit,
    About,
    Search,
    Goto,
    Menu,
    Statistics,
    Library,
}

impl OverlayKind {
    pub const ALL: [OverlayKind; 9] = [
        OverlayKind::Welcome,
        OverlayKind::Help,
        OverlayKind::Quit,
        OverlayKind::About,
        OverlayKind::Search,
        OverlayKind::Goto,
        OverlayKind::Menu,
        OverlayKind::Statistics,
        OverlayKind::Library,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OverlayKind::Welcome => "welcome",
            OverlayKind::Help => "help",
            OverlayKind::Quit => "quit",
            OverlayKind::About => "about",
            OverlayKind::Search => "search",
            OverlayKind::Goto => "goto",
            OverlayKind::Menu => "menu",
            OverlayKind::Statistics => "statistics",
            OverlayKind::Library => "library",
        }
    }

    /// Overlays with a single-line text field.
    pub fn takes_query(self) -> bool {
        matches!(self, OverlayKind::Search | OverlayKind::Goto)
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
