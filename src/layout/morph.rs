// src/layout/morph.rs
//
// Timed blend from the current layout to the next one.
// Only one morph runs at a time; a request while morphing is ignored and the
// running morph completes on its own schedule.

use super::LayoutId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphEvent {
    Finished(LayoutId),
}

#[derive(Debug, Clone)]
pub struct MorphController {
    current: LayoutId,
    next: Option<LayoutId>,
    elapsed: f32,
    duration: f32,
}

impl MorphController {
    pub fn new(initial: LayoutId) -> Self {
        Self {
            current: initial,
            next: None,
            elapsed: 0.0,
            duration: 0.0,
        }
    }

    pub fn current(&self) -> LayoutId {
        self.current
    }

    pub fn next(&self) -> Option<LayoutId> {
        self.next
    }

    pub fn is_morphing(&self) -> bool {
        self.next.is_some()
    }

    /// 0.0 when idle, otherwise clamp(elapsed / duration, 0, 1).
    pub fn progress(&self) -> f32 {
        if self.next.is_none() || self.duration <= 0.0 {
            return 0.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Returns false when the request was ignored.
    pub fn start(&mut self, to: LayoutId, duration: f32) -> bool {
        if self.is_morphing() || !(duration > 0.0) {
            return false;
        }
        self.next = Some(to);
        self.elapsed = 0.0;
        self.duration = duration;
        true
    }

    /// Switch with no blend. Ignored while a morph is running.
    pub fn jump_to(&mut self, to: LayoutId) -> bool {
        if self.is_morphing() {
            return false;
        }
        self.current = to;
        true
    }

    #[cfg(test)]
    pub(crate) fn seek(&mut self, elapsed: f32) {
        self.elapsed = elapsed;
    }

    pub fn update(&mut self, dt: f32) -> Option<MorphEvent> {
        let next = self.next?;
        if dt > 0.0 {
            self.elapsed += dt;
        }
        if self.elapsed >= self.duration {
            self.current = next;
            self.next = None;
            self.elapsed = 0.0;
            self.duration = 0.0;
            return Some(MorphEvent::Finished(next));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_requests() {
        let mut morph = MorphController::new(LayoutId::Grid);
        assert!(!morph.start(LayoutId::Sphere, 0.0));
        assert!(!morph.start(LayoutId::Sphere, -1.0));
        assert!(!morph.start(LayoutId::Sphere, f32::NAN));
        assert!(!morph.is_morphing());

        assert!(morph.start(LayoutId::Sphere, 1.0));
        // already morphing
        assert!(!morph.start(LayoutId::Helix, 1.0));
        assert_eq!(morph.next(), Some(LayoutId::Sphere));
        assert!(!morph.jump_to(LayoutId::Line));
    }

    #[test]
    fn test_progress_is_monotonic_and_clamped() {
        let mut morph = MorphController::new(LayoutId::Grid);
        morph.start(LayoutId::Helix, 2.0);
        let mut previous = morph.progress();
        assert_eq!(previous, 0.0);
        for _ in 0..10 {
            morph.update(0.15);
            let progress = morph.progress();
            assert!(progress >= previous);
            assert!((0.0..=1.0).contains(&progress));
            previous = progress;
        }
        // negative dt never rewinds
        morph.update(-5.0);
        assert_eq!(morph.progress(), previous);
    }

    #[test]
    fn test_finishing_snaps_to_next() {
        let mut morph = MorphController::new(LayoutId::Grid);
        morph.start(LayoutId::Chaos, 0.5);
        assert_eq!(morph.update(0.25), None);
        assert_eq!(morph.update(0.3), Some(MorphEvent::Finished(LayoutId::Chaos)));
        assert_eq!(morph.current(), LayoutId::Chaos);
        assert_eq!(morph.next(), None);
        assert_eq!(morph.progress(), 0.0);
        assert_eq!(morph.update(1.0), None);
    }
}
