use std::time::Duration;

use log::debug;

use super::kind::OverlayKind;
use crate::screen::layer::{LayerId, ScreenLayer};

pub const DEFAULT_FADE: Duration = Duration::from_millis(150);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FadePhase {
    FadingIn { since: Duration },
    Shown,
    /// Removed from the stack once the fade completes.
    FadingOut { since: Duration, from: f32 },
}

#[derive(Clone, Debug)]
struct Entry {
    layer: ScreenLayer,
    phase: FadePhase,
}

/// Ordered stack of overlay layers with fade in/out driven by [`tick`].
///
/// [`tick`]: OverlayManager::tick
#[derive(Clone, Debug)]
pub struct OverlayManager {
    entries: Vec<Entry>,
    next_id: u64,
    clock: Duration,
    fade: Duration,
}

impl OverlayManager {
    pub fn new(fade: Duration) -> Self {
        Self { entries: Vec::new(), next_id: 1, clock: Duration::ZERO, fade }
    }

    /// Reserves an id for a layer about to be built.
    pub fn next_id(&mut self) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add(&mut self, mut layer: ScreenLayer) -> LayerId {
        let id = layer.id;
        let phase = if self.fade.is_zero() {
            layer.opacity = 1.0;
            FadePhase::Shown
        } else {
            layer.opacity = 0.0;
            FadePhase::FadingIn { since: self.clock }
        };
        debug!("adding overlay layer {} ({:?})", id.0, layer.tag);
        self.entries.push(Entry { layer, phase });
        id
    }

    /// Starts fading out `id`. Unknown or already departing layers are ignored.
    pub fn remove(&mut self, id: LayerId) -> bool {
        let Some(index) = self.entries.iter().position(|entry| entry.layer.id == id) else {
            debug!("overlay layer {} already removed", id.0);
            return false;
        };

        let entry = &mut self.entries[index];
        if matches!(entry.phase, FadePhase::FadingOut { .. }) {
            return false;
        }

        if self.fade.is_zero() {
            self.entries.remove(index);
        } else {
            entry.phase = FadePhase::FadingOut { since: self.clock, from: entry.layer.opacity };
        }
        true
    }

    /// Starts fading out every live layer tagged `kind`.
    pub fn remove_kind(&mut self, kind: OverlayKind) -> usize {
        let ids: Vec<LayerId> =
            self.live().filter(|layer| layer.tag == Some(kind)).map(|layer| layer.id).collect();
        ids.into_iter().filter(|&id| self.remove(id)).count()
    }

    pub fn remove_all(&mut self) -> usize {
        let ids: Vec<LayerId> = self.live().map(|layer| layer.id).collect();
        ids.into_iter().filter(|&id| self.remove(id)).count()
    }

    /// Swaps the cells of `id`, keeping its fade state.
    pub fn replace_content(&mut self, id: LayerId, mut layer: ScreenLayer) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.layer.id == id) else {
            return false;
        };
        layer.id = id;
        layer.opacity = entry.layer.opacity;
        entry.layer = layer;
        true
    }

    /// Advances the fade clock by `delta`.
    pub fn tick(&mut self, delta: Duration) {
        self.clock += delta;
        let clock = self.clock;
        let fade = self.fade;

        for entry in &mut self.entries {
            match entry.phase {
                FadePhase::FadingIn { since } => {
                    let progress = progress(clock, since, fade);
                    entry.layer.opacity = progress;
                    if progress >= 1.0 {
                        entry.phase = FadePhase::Shown;
                    }
                },
                FadePhase::FadingOut { since, from } => {
                    entry.layer.opacity = from * (1.0 - progress(clock, since, fade));
                },
                FadePhase::Shown => (),
            }
        }

        self.entries.retain(|entry| match entry.phase {
            FadePhase::FadingOut { since, .. } if progress(clock, since, fade) >= 1.0 => {
                debug!("overlay layer {} faded out", entry.layer.id.0);
                false
            },
            _ => true,
        });
    }

    /// Every layer still on screen, bottom first.
    pub fn layers(&self) -> impl Iterator<Item = &ScreenLayer> {
        self.entries.iter().map(|entry| &entry.layer)
    }

    /// Layers that are not fading out.
    pub fn live(&self) -> impl Iterator<Item = &ScreenLayer> {
        self.entries
            .iter()
            .filter(|entry| !matches!(entry.phase, FadePhase::FadingOut { .. }))
            .map(|entry| &entry.layer)
    }

    pub fn live_layer(&self, kind: OverlayKind) -> Option<LayerId> {
        self.live().find(|layer| layer.tag == Some(kind)).map(|layer| layer.id)
    }

    pub fn phase(&self, id: LayerId) -> Option<FadePhase> {
        self.entries.iter().find(|entry| entry.layer.id == id).map(|entry| entry.phase)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.phase(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for OverlayManager {
    fn default() -> Self {
        Self::new(DEFAULT_FADE)
    }
}

fn progress(clock: Duration, since: Duration, fade: Duration) -> f32 {
    if fade.is_zero() {
        return 1.0;
    }
    (clock.saturating_sub(since).as_secs_f32() / fade.as_secs_f32()).clamp(0.0, 1.0)
}
