//! The cat companion: happiness, daily care flags and mood.
//!
//! Happiness stays inside `[HAPPINESS_MIN, HAPPINESS_MAX]`. It drops by
//! `DAILY_DECAY` once per calendar day, rises with care actions, and is
//! pulled up to a floor that grows with the number of tasks completed today.

use crate::catalog::{
    BANNER_THRESHOLD, BRUSH_BONUS, BRUSH_UNLOCK, DAILY_DECAY, FEED_BONUS, FEED_UNLOCK,
    HAPPINESS_BASELINE, HAPPINESS_MAX, HAPPINESS_MIN, PLAY_BONUS, PLAY_UNLOCK, TASK_BONUS,
};
use crate::clock::is_new_day;
use crate::models::{CareAction, CatColor, CatMood, CatState};
use crate::storage::Store;
use tracing::{debug, info};

/// Mood rules, first match wins.
pub fn derive_mood(cat: &CatState) -> CatMood {
    if !cat.fed_today && cat.happiness < 40 {
        CatMood::Hungry
    } else if !cat.brushed_today && cat.happiness < 50 {
        CatMood::Messy
    } else if cat.happiness > 70 && cat.fed_today {
        CatMood::Happy
    } else {
        CatMood::Calm
    }
}

/// The cat after the daily reset, if `today` is later than the last day the
/// reset was applied for. `None` also covers a cat that has never been
/// stamped; [`CompanionManager::load`] adopts today for those.
pub fn check_rollover(cat: &CatState, today: &str) -> Option<CatState> {
    let last = cat.last_update_date.as_deref()?;
    if !is_new_day(last, today) {
        return None;
    }
    let mut next = cat.clone();
    next.happiness = cat.happiness.saturating_sub(DAILY_DECAY).max(HAPPINESS_MIN);
    next.fed_today = false;
    next.brushed_today = false;
    next.played_today = false;
    next.days_active = cat.days_active.saturating_add(1);
    next.last_update_date = Some(today.to_string());
    next.state = derive_mood(&next);
    Some(next)
}

pub fn task_happiness_floor(tasks_completed: usize) -> u8 {
    let bonus = tasks_completed.saturating_mul(usize::from(TASK_BONUS));
    let floor = usize::from(HAPPINESS_BASELINE).saturating_add(bonus);
    floor.min(usize::from(HAPPINESS_MAX)) as u8
}

pub fn can_feed(tasks_completed: usize) -> bool {
    tasks_completed >= FEED_UNLOCK
}

pub fn can_brush(tasks_completed: usize) -> bool {
    tasks_completed >= BRUSH_UNLOCK
}

pub fn can_play(tasks_completed: usize) -> bool {
    tasks_completed >= PLAY_UNLOCK
}

pub fn is_unlocked(action: CareAction, tasks_completed: usize) -> bool {
    match action {
        CareAction::Feed => can_feed(tasks_completed),
        CareAction::Brush => can_brush(tasks_completed),
        CareAction::Play => can_play(tasks_completed),
    }
}

#[derive(Debug, Default)]
pub struct CompanionManager {
    cat: CatState,
    loaded: bool,
    tasks_seen: usize,
}

impl CompanionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, store: &mut Store, today: &str) {
        let mut cat = store.get_cat_state();
        cat.happiness = cat.happiness.clamp(HAPPINESS_MIN, HAPPINESS_MAX);
        self.cat = match check_rollover(&cat, today) {
            Some(next) => {
                info!(
                    "new day {today}, cat happiness {} -> {}",
                    cat.happiness, next.happiness
                );
                next
            }
            None => {
                if cat.last_update_date.is_none() {
                    cat.last_update_date = Some(today.to_string());
                }
                cat
            }
        };
        self.tasks_seen = 0;
        self.loaded = true;
        self.save(store);
    }

    /// Applies the daily reset if the day has moved on since the last one.
    /// Safe to call from every trigger; a second call for the same day is a
    /// no-op.
    pub fn refresh(&mut self, store: &mut Store, today: &str) -> bool {
        if !self.loaded {
            return false;
        }
        let Some(next) = check_rollover(&self.cat, today) else {
            return false;
        };
        info!("new day detected, cat happiness {} -> {}", self.cat.happiness, next.happiness);
        self.cat = next;
        self.tasks_seen = 0;
        self.save(store);
        true
    }

    pub fn cat(&self) -> &CatState {
        &self.cat
    }

    pub fn happiness(&self) -> u8 {
        self.cat.happiness
    }

    pub fn mood(&self) -> CatMood {
        self.cat.state
    }

    pub fn feed(&mut self, store: &mut Store) {
        self.care(store, CareAction::Feed);
    }

    pub fn brush(&mut self, store: &mut Store) {
        self.care(store, CareAction::Brush);
    }

    pub fn play(&mut self, store: &mut Store) {
        self.care(store, CareAction::Play);
    }

    /// Unlock thresholds are not checked here; callers gate on
    /// [`is_unlocked`].
    pub fn care(&mut self, store: &mut Store, action: CareAction) {
        let (bonus, flag) = match action {
            CareAction::Feed => (FEED_BONUS, &mut self.cat.fed_today),
            CareAction::Brush => (BRUSH_BONUS, &mut self.cat.brushed_today),
            CareAction::Play => (PLAY_BONUS, &mut self.cat.played_today),
        };
        *flag = true;
        self.cat.happiness = self.cat.happiness.saturating_add(bonus).min(HAPPINESS_MAX);
        debug!("care action {action:?}, happiness now {}", self.cat.happiness);
        self.save(store);
    }

    /// Raises happiness to the task floor when more tasks are done than
    /// last reported. Never lowers it.
    pub fn sync_task_progress(&mut self, store: &mut Store, tasks_completed: usize) {
        if !self.loaded {
            return;
        }
        let increased = tasks_completed > self.tasks_seen;
        self.tasks_seen = tasks_completed;
        if !increased {
            return;
        }
        let floor = task_happiness_floor(tasks_completed);
        if self.cat.happiness < floor {
            self.cat.happiness = floor;
            self.save(store);
        }
    }

    pub fn set_name(&mut self, store: &mut Store, name: impl Into<String>) {
        self.cat.name = name.into();
        self.save(store);
    }

    pub fn set_color(&mut self, store: &mut Store, color: CatColor) {
        self.cat.color = color;
        self.save(store);
    }

    pub fn should_show_banner(&self, tasks_completed: usize) -> bool {
        tasks_completed >= BANNER_THRESHOLD
            && !self.cat.fed_today
            && !self.cat.brushed_today
            && !self.cat.played_today
    }

    fn save(&mut self, store: &mut Store) {
        self.cat.state = derive_mood(&self.cat);
        if !self.loaded {
            debug!("cat not loaded yet, skipping persist");
            return;
        }
        store.set_cat_state(&self.cat);
    }
}
