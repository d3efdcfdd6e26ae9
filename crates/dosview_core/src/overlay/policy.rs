use super::kind::OverlayKind;
use crate::input::keys::KeyCode;

/// How an overlay can be closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DismissPolicy {
    pub keys: &'static [KeyCode],
    pub any_key: bool,
    pub secondary_click: bool,
}

impl DismissPolicy {
    pub fn for_kind(kind: OverlayKind) -> Self {
        match kind {
            OverlayKind::Welcome => Self {
                keys: &[KeyCode::ESCAPE, KeyCode::RETURN, KeyCode::SPACE],
                any_key: true,
                secondary_click: true,
            },
            OverlayKind::Help => Self::keys(&[KeyCode::F1, KeyCode::ESCAPE]),
            OverlayKind::Quit => Self::keys(&[KeyCode::ESCAPE]),
            OverlayKind::About => Self::keys(&[KeyCode::ESCAPE]),
            OverlayKind::Search => Self::keys(&[KeyCode::F7, KeyCode::ESCAPE]),
            OverlayKind::Goto => Self::keys(&[KeyCode::F4, KeyCode::ESCAPE]),
            OverlayKind::Menu => Self::keys(&[KeyCode::F9, KeyCode::ESCAPE]),
            OverlayKind::Statistics => Self::keys(&[KeyCode::F5, KeyCode::ESCAPE]),
            OverlayKind::Library => Self::keys(&[KeyCode::F6, KeyCode::ESCAPE, KeyCode::RETURN]),
        }
    }

    const fn keys(keys: &'static [KeyCode]) -> Self {
        Self { keys, any_key: false, secondary_click: false }
    }

    pub fn dismisses(&self, code: KeyCode) -> bool {
        self.any_key || self.keys.contains(&code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_valid_keys() {
        for kind in OverlayKind::ALL {
            let policy = DismissPolicy::for_kind(kind);
            assert!(policy.any_key || !policy.keys.is_empty(), "{kind} cannot be closed");
            assert!(policy.keys.iter().all(|code| code.is_valid()), "{kind}");
        }
    }

    #[test]
    fn quit_answers_are_not_generic_dismiss_keys() {
        for kind in OverlayKind::ALL {
            let policy = DismissPolicy::for_kind(kind);
            if kind != OverlayKind::Welcome {
                assert!(!policy.dismisses(KeyCode::Y), "{kind}");
                assert!(!policy.dismisses(KeyCode::N), "{kind}");
            }
        }
    }

    #[test]
    fn only_welcome_accepts_any_key() {
        let lenient: Vec<_> =
            OverlayKind::ALL.into_iter().filter(|&kind| DismissPolicy::for_kind(kind).any_key).collect();
        assert_eq!(lenient, vec![OverlayKind::Welcome]);
        assert!(DismissPolicy::for_kind(OverlayKind::Welcome).secondary_click);
    }
}
