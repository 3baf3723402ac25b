// src/layout/engine.rs
//
// The FieldLayoutEngine answers "where is every cell at time T".
// It owns the morph state and the layout context; the per-frame query writes
// into caller-owned slots so a running wall never allocates for layout.

use glam::Vec3;
use rayon::prelude::*;

use super::{ContextPatch, LayoutContext, LayoutDefinition, LayoutId, MorphController, MorphEvent};

// below this, thread fan-out costs more than it saves
const PARALLEL_THRESHOLD: usize = 4096;

pub struct FieldLayoutEngine {
    context: LayoutContext,
    morph: MorphController,
}

impl FieldLayoutEngine {
    pub fn new(initial: LayoutId, context: LayoutContext) -> Self {
        Self {
            context,
            morph: MorphController::new(initial),
        }
    }

    pub fn context(&self) -> &LayoutContext {
        &self.context
    }

    pub fn set_context(&mut self, patch: &ContextPatch) {
        self.context = self.context.merged(patch);
    }

    /*************************** Morphing ***************************/

    pub fn start_morph_to(&mut self, layout: LayoutId, duration: f32) -> bool {
        let started = self.morph.start(layout, duration);
        if started {
            log::info!(
                "Morphing {} -> {} over {:.2}s",
                self.morph.current(),
                layout,
                duration
            );
        } else {
            log::debug!("Ignored morph request to {} ({:.2}s)", layout, duration);
        }
        started
    }

    pub fn jump_to(&mut self, layout: LayoutId) -> bool {
        self.morph.jump_to(layout)
    }

    pub fn update(&mut self, dt: f32) -> Option<MorphEvent> {
        let event = self.morph.update(dt);
        if let Some(MorphEvent::Finished(layout)) = event {
            log::info!("Morph finished, now showing {}", layout);
        }
        event
    }

    pub fn is_morphing(&self) -> bool {
        self.morph.is_morphing()
    }

    pub fn progress(&self) -> f32 {
        self.morph.progress()
    }

    pub fn current_layout(&self) -> LayoutId {
        self.morph.current()
    }

    pub fn next_layout(&self) -> Option<LayoutId> {
        self.morph.next()
    }

    /*************************** Sampling ***************************/

    /// Blended position of one cell. Orientation is never blended.
    pub fn sample(&self, index: usize, time: f32) -> Vec3 {
        let from = self.morph.current().sample(index, time, &self.context);
        match self.morph.next() {
            Some(next) => {
                let to = next.sample(index, time, &self.context);
                from.lerp(to, self.morph.progress())
            }
            None => from,
        }
    }

    /// Fills every slot with the position of the cell at that index.
    pub fn sample_into(&self, time: f32, out: &mut [Vec3]) {
        if out.len() >= PARALLEL_THRESHOLD {
            out.par_iter_mut()
                .enumerate()
                .for_each(|(index, slot)| *slot = self.sample(index, time));
        } else {
            for (index, slot) in out.iter_mut().enumerate() {
                *slot = self.sample(index, time);
            }
        }
    }

    pub fn sample_all(&self, total: usize, time: f32) -> Vec<Vec3> {
        let mut out = vec![Vec3::ZERO; total];
        self.sample_into(time, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(total: usize, columns: usize) -> FieldLayoutEngine {
        let context = LayoutContext::default().merged(&ContextPatch {
            total: Some(total),
            columns: Some(columns),
            ..Default::default()
        });
        FieldLayoutEngine::new(LayoutId::Grid, context)
    }

    #[test]
    fn test_sample_all_counts() {
        let engine = engine(25, 5);
        for total in [0, 1, 7, 25, 40] {
            assert_eq!(engine.sample_all(total, 1.0).len(), total);
        }
        assert!(engine.sample_all(0, 3.0).is_empty());
    }

    #[test]
    fn test_sample_all_is_deterministic() {
        let mut engine = engine(25, 5);
        engine.start_morph_to(LayoutId::Chaos, 2.0);
        engine.update(0.7);
        assert_eq!(engine.sample_all(25, 4.2), engine.sample_all(25, 4.2));
    }

    #[test]
    fn test_parallel_path_matches_serial() {
        let total = PARALLEL_THRESHOLD + 10;
        let engine = engine(total, 64);
        let parallel = engine.sample_all(total, 0.9);
        for index in [0, 1, 999, total - 1] {
            assert_eq!(parallel[index], engine.sample(index, 0.9));
        }
    }

    #[test]
    fn test_morph_endpoints_match_layouts() {
        let mut engine = engine(16, 4);
        let ctx = engine.context().clone();
        engine.start_morph_to(LayoutId::Sphere, 1.0);

        // progress 0
        for index in 0..16 {
            let expected = LayoutId::Grid.sample(index, 0.5, &ctx);
            assert!(engine.sample(index, 0.5).abs_diff_eq(expected, 1e-5));
        }

        // progress 1, before the snap
        engine.morph.seek(1.0);
        assert_eq!(engine.progress(), 1.0);
        for index in 0..16 {
            let expected = LayoutId::Sphere.sample(index, 0.5, &ctx);
            assert!(engine.sample(index, 0.5).abs_diff_eq(expected, 1e-4));
        }
    }

    #[test]
    fn test_update_snaps_to_next_layout() {
        let mut engine = engine(9, 3);
        assert!(engine.start_morph_to(LayoutId::Line, 0.5));
        assert!(!engine.start_morph_to(LayoutId::Helix, 0.5));
        assert_eq!(engine.update(0.6), Some(MorphEvent::Finished(LayoutId::Line)));
        assert_eq!(engine.current_layout(), LayoutId::Line);
        assert!(!engine.is_morphing());
    }

    #[test]
    fn test_set_context_changes_samples() {
        let mut engine = engine(9, 3);
        let before = engine.sample(0, 0.0);
        engine.set_context(&ContextPatch {
            scale: Some(3.0),
            ..Default::default()
        });
        assert!(engine.sample(0, 0.0).abs_diff_eq(before * 3.0, 1e-5));
    }
}
