use log::debug;

use super::keys::{KeyCode, KeyEvent};
use crate::overlay::kind::OverlayKind;
use crate::overlay::policy::DismissPolicy;

/// Everything the host can ask of the viewer.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Key(KeyEvent),
    SecondaryClick,
    /// Menu-driven open/close of an overlay.
    Toggle(OverlayKind),
    /// Closes whichever overlay is active.
    Dismiss,
    ToggleWordWrap,
    GotoStart,
    GotoEnd,
    OpenFile,
}

/// Side effect requested by a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Replaces every shown overlay with `kind`.
    Show(OverlayKind),
    Hide(OverlayKind),
    QueryChanged,
    SubmitSearch(String),
    SubmitGoto(String),
    ToggleWordWrap,
    GotoStart,
    GotoEnd,
    ScrollLines(isize),
    ScrollPages(isize),
    OpenFilePicker,
    Terminate,
}

/// Answer returned to the host for each command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Stop propagating the event.
    Consumed,
    /// Nothing handled the event; the host may route it elsewhere.
    PassThrough,
    /// The host should present its file picker.
    OpenFilePicker,
    /// The user confirmed quitting.
    Terminate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub dispatch: Dispatch,
    pub actions: Vec<Action>,
}

impl Outcome {
    fn consumed(actions: Vec<Action>) -> Self {
        Self { dispatch: Dispatch::Consumed, actions }
    }

    fn pass_through() -> Self {
        Self { dispatch: Dispatch::PassThrough, actions: Vec::new() }
    }
}

/// Modal key dispatch: at most one overlay owns the keyboard.
#[derive(Clone, Debug, Default)]
pub struct KeyHandler {
    active: Option<OverlayKind>,
    quit_pending: bool,
    terminated: bool,
    query: String,
}

impl KeyHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `kind` already open, as when no document is loaded.
    pub fn with_active(kind: OverlayKind) -> Self {
        Self { active: Some(kind), quit_pending: kind == OverlayKind::Quit, ..Self::default() }
    }

    pub fn active(&self) -> Option<OverlayKind> {
        self.active
    }

    pub fn quit_pending(&self) -> bool {
        self.quit_pending
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Text typed into the search or goto field.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn handle(&mut self, command: Command) -> Outcome {
        if self.terminated {
            return Outcome::consumed(Vec::new());
        }

        match command {
            Command::Key(event) => self.key(event),
            Command::SecondaryClick => match self.active {
                Some(kind) if DismissPolicy::for_kind(kind).secondary_click => {
                    Outcome::consumed(self.close())
                },
                Some(_) => Outcome::consumed(Vec::new()),
                None => Outcome::pass_through(),
            },
            Command::Toggle(kind) => match self.active {
                Some(OverlayKind::Quit) if kind == OverlayKind::Quit => {
                    Outcome::consumed(Vec::new())
                },
                Some(active) if active == kind => Outcome::consumed(self.close()),
                _ => Outcome::consumed(self.open(kind)),
            },
            Command::Dismiss => match self.active {
                Some(_) => Outcome::consumed(self.close()),
                None => Outcome::pass_through(),
            },
            Command::ToggleWordWrap => self.global(Action::ToggleWordWrap),
            Command::GotoStart => self.global(Action::GotoStart),
            Command::GotoEnd => self.global(Action::GotoEnd),
            Command::OpenFile => match self.active {
                Some(_) => Outcome::consumed(Vec::new()),
                None => Outcome {
                    dispatch: Dispatch::OpenFilePicker,
                    actions: vec![Action::OpenFilePicker],
                },
            },
        }
    }

    /// Document commands run only while no overlay is active.
    fn global(&mut self, action: Action) -> Outcome {
        match self.active {
            Some(_) => Outcome::consumed(Vec::new()),
            None => Outcome::consumed(vec![action]),
        }
    }

    fn key(&mut self, event: KeyEvent) -> Outcome {
        match self.active {
            None => self.hotkey(event),
            Some(OverlayKind::Welcome) => self.welcome_key(event),
            Some(OverlayKind::Quit) => self.quit_key(event),
            Some(kind) if kind.takes_query() => self.query_key(kind, event),
            Some(kind) => {
                if DismissPolicy::for_kind(kind).dismisses(event.code) {
                    Outcome::consumed(self.close())
                } else {
                    Outcome::consumed(Vec::new())
                }
            },
        }
    }

    fn hotkey(&mut self, event: KeyEvent) -> Outcome {
        if let Some(kind) = overlay_hotkey(event.code) {
            return Outcome::consumed(self.open(kind));
        }

        let action = match event.code {
            KeyCode::F3 => return self.handle(Command::OpenFile),
            KeyCode::F2 => Action::ToggleWordWrap,
            KeyCode::HOME => Action::GotoStart,
            KeyCode::END => Action::GotoEnd,
            KeyCode::UP => Action::ScrollLines(-1),
            KeyCode::DOWN => Action::ScrollLines(1),
            KeyCode::PAGE_UP => Action::ScrollPages(-1),
            KeyCode::PAGE_DOWN => Action::ScrollPages(1),
            _ => return Outcome::pass_through(),
        };
        Outcome::consumed(vec![action])
    }

    /// Any key leaves the welcome screen; overlay hot-keys and F3 then run as usual.
    fn welcome_key(&mut self, event: KeyEvent) -> Outcome {
        if !DismissPolicy::for_kind(OverlayKind::Welcome).dismisses(event.code) {
            return Outcome::consumed(Vec::new());
        }

        let mut actions = self.close();
        if event.code != KeyCode::F3 && overlay_hotkey(event.code).is_none() {
            return Outcome::consumed(actions);
        }

        let outcome = self.hotkey(event);
        actions.extend(outcome.actions);
        Outcome { dispatch: outcome.dispatch, actions }
    }

    fn quit_key(&mut self, event: KeyEvent) -> Outcome {
        if event.code == KeyCode::Y {
            debug!("quit confirmed");
            self.terminated = true;
            return Outcome { dispatch: Dispatch::Terminate, actions: vec![Action::Terminate] };
        }

        if event.code == KeyCode::N
            || DismissPolicy::for_kind(OverlayKind::Quit).dismisses(event.code)
        {
            return Outcome::consumed(self.close());
        }

        Outcome::consumed(Vec::new())
    }

    fn query_key(&mut self, kind: OverlayKind, event: KeyEvent) -> Outcome {
        if DismissPolicy::for_kind(kind).dismisses(event.code) {
            return Outcome::consumed(self.close());
        }

        match event.code {
            KeyCode::RETURN => {
                let query = std::mem::take(&mut self.query);
                let mut actions = self.close();
                actions.push(match kind {
                    OverlayKind::Goto => Action::SubmitGoto(query),
                    _ => Action::SubmitSearch(query),
                });
                Outcome::consumed(actions)
            },
            KeyCode::BACKSPACE => {
                let changed = self.query.pop().is_some();
                Outcome::consumed(if changed { vec![Action::QueryChanged] } else { Vec::new() })
            },
            _ => match event.printable() {
                Some(ch) if kind != OverlayKind::Goto || ch.is_ascii_digit() => {
                    self.query.push(ch);
                    Outcome::consumed(vec![Action::QueryChanged])
                },
                _ => Outcome::consumed(Vec::new()),
            },
        }
    }

    fn open(&mut self, kind: OverlayKind) -> Vec<Action> {
        debug!("opening {kind} overlay");
        self.active = Some(kind);
        self.quit_pending = kind == OverlayKind::Quit;
        self.query.clear();
        vec![Action::Show(kind)]
    }

    fn close(&mut self) -> Vec<Action> {
        let Some(kind) = self.active.take() else {
            return Vec::new();
        };

        debug!("closing {kind} overlay");
        self.query.clear();
        let mut actions = vec![Action::Hide(kind)];
        if kind == OverlayKind::Quit {
            self.quit_pending = false;
            actions.extend([Action::Hide(OverlayKind::Welcome), Action::Hide(OverlayKind::Help)]);
        }
        actions
    }
}

fn overlay_hotkey(code: KeyCode) -> Option<OverlayKind> {
    let kind = match code {
        KeyCode::F1 => OverlayKind::Help,
        KeyCode::F4 => OverlayKind::Goto,
        KeyCode::F5 => OverlayKind::Statistics,
        KeyCode::F6 => OverlayKind::Library,
        KeyCode::F7 => OverlayKind::Search,
        KeyCode::F9 => OverlayKind::Menu,
        KeyCode::F10 => OverlayKind::Quit,
        KeyCode::F11 => OverlayKind::About,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(handler: &mut KeyHandler, code: KeyCode) -> Outcome {
        handler.handle(Command::Key(KeyEvent::new(code)))
    }

    fn type_char(handler: &mut KeyHandler, ch: char) -> Outcome {
        let code = KeyCode::for_char(ch).unwrap_or(KeyCode(KeyCode::MAX));
        handler.handle(Command::Key(KeyEvent::with_text(code, ch)))
    }

    #[test]
    fn help_hotkey_toggles() {
        let mut handler = KeyHandler::new();
        let outcome = press(&mut handler, KeyCode::F1);
        assert_eq!(outcome.actions, vec![Action::Show(OverlayKind::Help)]);
        assert_eq!(handler.active(), Some(OverlayKind::Help));

        let outcome = press(&mut handler, KeyCode::F1);
        assert_eq!(outcome.actions, vec![Action::Hide(OverlayKind::Help)]);
        assert_eq!(handler.active(), None);
    }

    #[test]
    fn overlays_swallow_unrelated_keys() {
        let mut handler = KeyHandler::new();
        press(&mut handler, KeyCode::F1);
        for code in [KeyCode::F2, KeyCode::DOWN, KeyCode::END, KeyCode::Y, KeyCode::F10] {
            let outcome = press(&mut handler, code);
            assert_eq!(outcome, Outcome::consumed(Vec::new()), "{code}");
        }
        assert_eq!(handler.active(), Some(OverlayKind::Help));
    }

    #[test]
    fn word_wrap_is_gated_by_overlays() {
        let mut handler = KeyHandler::with_active(OverlayKind::About);
        assert!(handler.handle(Command::ToggleWordWrap).actions.is_empty());
        press(&mut handler, KeyCode::ESCAPE);
        assert_eq!(press(&mut handler, KeyCode::F2).actions, vec![Action::ToggleWordWrap]);
    }

    #[test]
    fn about_closes_on_escape_only() {
        let mut handler = KeyHandler::new();
        press(&mut handler, KeyCode::F11);
        press(&mut handler, KeyCode::F11);
        assert_eq!(handler.active(), Some(OverlayKind::About));
        press(&mut handler, KeyCode::ESCAPE);
        assert_eq!(handler.active(), None);
    }

    #[test]
    fn welcome_closes_on_any_key() {
        let mut handler = KeyHandler::with_active(OverlayKind::Welcome);
        let outcome = press(&mut handler, KeyCode::DOWN);
        assert_eq!(outcome.actions, vec![Action::Hide(OverlayKind::Welcome)]);
        assert_eq!(handler.active(), None);

        let mut handler = KeyHandler::with_active(OverlayKind::Welcome);
        handler.handle(Command::SecondaryClick);
        assert_eq!(handler.active(), None);
    }

    #[test]
    fn welcome_forwards_hotkeys() {
        let mut handler = KeyHandler::with_active(OverlayKind::Welcome);
        let outcome = press(&mut handler, KeyCode::F1);
        assert_eq!(outcome.dispatch, Dispatch::Consumed);
        assert_eq!(
            outcome.actions,
            vec![Action::Hide(OverlayKind::Welcome), Action::Show(OverlayKind::Help)]
        );
        assert_eq!(handler.active(), Some(OverlayKind::Help));

        let mut handler = KeyHandler::with_active(OverlayKind::Welcome);
        let outcome = press(&mut handler, KeyCode::F3);
        assert_eq!(outcome.dispatch, Dispatch::OpenFilePicker);
        assert_eq!(
            outcome.actions,
            vec![Action::Hide(OverlayKind::Welcome), Action::OpenFilePicker]
        );
        assert_eq!(handler.active(), None);

        let mut handler = KeyHandler::with_active(OverlayKind::Welcome);
        press(&mut handler, KeyCode::F10);
        assert!(handler.quit_pending());
    }

    #[test]
    fn quit_cancel_clears_pending_flag() {
        let mut handler = KeyHandler::new();
        press(&mut handler, KeyCode::F10);
        assert!(handler.quit_pending());

        let outcome = press(&mut handler, KeyCode::F1);
        assert!(outcome.actions.is_empty());

        let outcome = press(&mut handler, KeyCode::N);
        assert_eq!(outcome.actions[0], Action::Hide(OverlayKind::Quit));
        assert!(outcome.actions.contains(&Action::Hide(OverlayKind::Welcome)));
        assert!(!handler.quit_pending());
        assert_eq!(handler.active(), None);
    }

    #[test]
    fn quit_confirm_is_terminal() {
        let mut handler = KeyHandler::new();
        press(&mut handler, KeyCode::F10);
        let outcome = press(&mut handler, KeyCode::Y);
        assert_eq!(outcome.dispatch, Dispatch::Terminate);
        assert!(handler.is_terminated());

        let outcome = press(&mut handler, KeyCode::F1);
        assert!(outcome.actions.is_empty());
        assert_eq!(handler.active(), Some(OverlayKind::Quit));
    }

    #[test]
    fn quit_ignores_its_hotkey() {
        let mut handler = KeyHandler::new();
        handler.handle(Command::Toggle(OverlayKind::Quit));
        let outcome = handler.handle(Command::Toggle(OverlayKind::Quit));
        assert_eq!(outcome, Outcome::consumed(Vec::new()));
        assert_eq!(handler.active(), Some(OverlayKind::Quit));
        assert!(handler.quit_pending());
    }

    #[test]
    fn opening_replaces_the_active_overlay() {
        let mut handler = KeyHandler::with_active(OverlayKind::Welcome);
        let outcome = handler.handle(Command::Toggle(OverlayKind::Help));
        assert_eq!(outcome.actions, vec![Action::Show(OverlayKind::Help)]);
        assert_eq!(handler.active(), Some(OverlayKind::Help));
    }

    #[test]
    fn goto_collects_digits_and_submits() {
        let mut handler = KeyHandler::new();
        press(&mut handler, KeyCode::F4);
        type_char(&mut handler, '4');
        type_char(&mut handler, 'x');
        type_char(&mut handler, '2');
        assert_eq!(handler.query(), "42");
        press(&mut handler, KeyCode::BACKSPACE);
        type_char(&mut handler, '7');

        let outcome = press(&mut handler, KeyCode::RETURN);
        assert_eq!(
            outcome.actions,
            vec![Action::Hide(OverlayKind::Goto), Action::SubmitGoto("47".into())]
        );
        assert_eq!(handler.active(), None);
    }

    #[test]
    fn search_takes_any_text() {
        let mut handler = KeyHandler::new();
        press(&mut handler, KeyCode::F7);
        for ch in "ёлка y".chars() {
            assert_eq!(type_char(&mut handler, ch).dispatch, Dispatch::Consumed);
        }
        assert_eq!(handler.query(), "ёлка y");
        press(&mut handler, KeyCode::ESCAPE);
        assert_eq!(handler.query(), "");
    }

    #[test]
    fn unhandled_keys_pass_through() {
        let mut handler = KeyHandler::new();
        assert_eq!(press(&mut handler, KeyCode::A).dispatch, Dispatch::PassThrough);
        assert_eq!(handler.handle(Command::Dismiss).dispatch, Dispatch::PassThrough);
        assert_eq!(press(&mut handler, KeyCode::F3).dispatch, Dispatch::OpenFilePicker);
    }

    #[test]
    fn at_most_one_overlay_is_active() {
        let mut handler = KeyHandler::new();
        let keys = [
            KeyCode::F1, KeyCode::F5, KeyCode::ESCAPE, KeyCode::F5, KeyCode::ESCAPE, KeyCode::F6,
            KeyCode::F6, KeyCode::F9, KeyCode::ESCAPE, KeyCode::F10, KeyCode::N, KeyCode::F7,
            KeyCode::F7, KeyCode::F11,
        ];
        let mut shown = 0usize;
        for code in keys {
            for action in press(&mut handler, code).actions {
                match action {
                    Action::Show(_) => shown += 1,
                    Action::Hide(kind) if Some(kind) != handler.active() => {
                        shown = shown.saturating_sub(1)
                    },
                    _ => (),
                }
            }
            assert!(shown <= 1);
            assert_eq!(shown == 1, handler.active().is_some());
        }
    }
}
