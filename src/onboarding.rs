use crate::catalog::{FIRST_STEP, LAST_STEP};
use crate::models::{CatColor, FocusArea, OnboardingState};
use crate::storage::Store;
use tracing::debug;

/// Four-step setup wizard. Nothing is persisted until [`load`](Self::load)
/// has run, so in-memory defaults never overwrite a stored record.
#[derive(Debug, Default)]
pub struct OnboardingManager {
    state: OnboardingState,
    loaded: bool,
}

impl OnboardingManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, store: &mut Store) {
        self.state = store.get_onboarding_state();
        self.state.step = self.state.step.clamp(FIRST_STEP, LAST_STEP);
        dedup_focus_areas(&mut self.state.focus_areas);
        self.loaded = true;
    }

    pub fn state(&self) -> &OnboardingState {
        &self.state
    }

    pub fn focus_areas(&self) -> &[FocusArea] {
        &self.state.focus_areas
    }

    pub fn is_complete(&self) -> bool {
        self.state.completed
    }

    pub fn set_step(&mut self, store: &mut Store, step: u8) {
        self.state.step = step.clamp(FIRST_STEP, LAST_STEP);
        self.persist(store);
    }

    pub fn next_step(&mut self, store: &mut Store) {
        self.state.step = self.state.step.saturating_add(1).min(LAST_STEP);
        self.persist(store);
    }

    pub fn previous_step(&mut self, store: &mut Store) {
        self.state.step = self.state.step.saturating_sub(1).max(FIRST_STEP);
        self.persist(store);
    }

    pub fn set_cat_name(&mut self, store: &mut Store, name: impl Into<String>) {
        self.state.cat_name = name.into();
        self.persist(store);
    }

    pub fn set_cat_color(&mut self, store: &mut Store, color: CatColor) {
        self.state.cat_color = color;
        self.persist(store);
    }

    pub fn set_focus_areas(&mut self, store: &mut Store, mut areas: Vec<FocusArea>) {
        dedup_focus_areas(&mut areas);
        self.state.focus_areas = areas;
        self.persist(store);
    }

    pub fn toggle_focus_area(&mut self, store: &mut Store, area: FocusArea) {
        let areas = &mut self.state.focus_areas;
        if let Some(index) = areas.iter().position(|selected| *selected == area) {
            areas.remove(index);
        } else {
            areas.push(area);
        }
        self.persist(store);
    }

    /// Latches `completed`; the step is left where it was.
    pub fn complete(&mut self, store: &mut Store) {
        self.state.completed = true;
        self.persist(store);
    }

    pub fn reset(&mut self, store: &mut Store) {
        self.state = OnboardingState::default();
        self.persist(store);
    }

    fn persist(&self, store: &mut Store) {
        if !self.loaded {
            debug!("onboarding not loaded yet, skipping persist");
            return;
        }
        store.set_onboarding_state(&self.state);
    }
}

fn dedup_focus_areas(areas: &mut Vec<FocusArea>) {
    let mut seen = Vec::with_capacity(areas.len());
    areas.retain(|area| {
        if seen.contains(area) {
            false
        } else {
            seen.push(*area);
            true
        }
    });
}
