use crate::clock::Clock;
use crate::companion::CompanionManager;
use crate::models::{
    CareAction, CatColor, CharityCommitment, FocusArea, RolloverResponse, Settings,
};
use crate::onboarding::OnboardingManager;
use crate::storage::Store;
use crate::tasks::TaskManager;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Application root: owns the store and wires the managers together.
///
/// Task progress flows one way into the companion after every task change.
pub struct Nafs {
    store: Store,
    clock: Arc<dyn Clock>,
    pub onboarding: OnboardingManager,
    pub tasks: TaskManager,
    pub cat: CompanionManager,
}

impl Nafs {
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        let today = clock.today();
        Self {
            store,
            clock,
            onboarding: OnboardingManager::new(),
            tasks: TaskManager::new(&today),
            cat: CompanionManager::new(),
        }
    }

    /// Constructs and loads every manager from `store`.
    pub fn open(store: Store, clock: Arc<dyn Clock>) -> Self {
        let mut nafs = Self::new(store, clock);
        nafs.load();
        nafs
    }

    pub fn load(&mut self) {
        let today = self.clock.today();
        self.onboarding.load(&mut self.store);
        self.tasks
            .load(&mut self.store, &today, self.onboarding.focus_areas());
        self.cat.load(&mut self.store, &today);
        self.sync_cat();
        info!(
            "loaded state for {today}: {} of {} tasks done, happiness {}",
            self.tasks.completed_count(),
            self.tasks.total_count(),
            self.cat.happiness()
        );
    }

    pub fn tasks_completed_today(&self) -> usize {
        self.tasks.completed_count()
    }

    /// Foreground regained: run the daily reset for tasks and cat if the date
    /// moved on. Repeated calls on the same day change nothing.
    pub fn on_visibility_regained(&mut self) -> RolloverResponse {
        self.roll_to_today()
    }

    /// Brings tasks and cat up to the clock's date. Every operation touching
    /// either runs this first, so nothing is ever recorded against a stale day.
    pub(crate) fn roll_to_today(&mut self) -> RolloverResponse {
        let today = self.clock.today();
        let tasks_reset = self
            .tasks
            .refresh(&mut self.store, &today, self.onboarding.focus_areas());
        let cat_decayed = self.cat.refresh(&mut self.store, &today);
        self.sync_cat();
        RolloverResponse {
            tasks_reset,
            cat_decayed,
            date: today,
        }
    }

    pub fn refresh_tasks(&mut self) -> bool {
        self.roll_to_today().tasks_reset
    }

    pub fn reset_tasks(&mut self) {
        self.roll_to_today();
        let today = self.clock.today();
        self.tasks
            .reset(&mut self.store, &today, self.onboarding.focus_areas());
        self.sync_cat();
    }

    pub fn toggle_task(&mut self, id: &str) -> bool {
        self.roll_to_today();
        let found = self.tasks.toggle(&mut self.store, id);
        self.sync_cat();
        found
    }

    pub fn complete_task(&mut self, id: &str) -> bool {
        self.roll_to_today();
        let found = self.tasks.complete(&mut self.store, id);
        self.sync_cat();
        found
    }

    pub fn uncomplete_task(&mut self, id: &str) -> bool {
        self.roll_to_today();
        let found = self.tasks.uncomplete(&mut self.store, id);
        self.sync_cat();
        found
    }

    fn sync_cat(&mut self) {
        let completed = self.tasks.completed_count();
        self.cat.sync_task_progress(&mut self.store, completed);
    }

    pub fn care(&mut self, action: CareAction) {
        self.roll_to_today();
        self.cat.care(&mut self.store, action);
    }

    pub fn next_step(&mut self) {
        self.onboarding.next_step(&mut self.store);
    }

    pub fn previous_step(&mut self) {
        self.onboarding.previous_step(&mut self.store);
    }

    pub fn set_step(&mut self, step: u8) {
        self.onboarding.set_step(&mut self.store, step);
    }

    pub fn set_cat_name(&mut self, name: String) {
        self.onboarding.set_cat_name(&mut self.store, name);
    }

    pub fn set_cat_color(&mut self, color: CatColor) {
        self.onboarding.set_cat_color(&mut self.store, color);
    }

    pub fn set_focus_areas(&mut self, areas: Vec<FocusArea>) {
        self.onboarding.set_focus_areas(&mut self.store, areas);
    }

    pub fn toggle_focus_area(&mut self, area: FocusArea) {
        self.onboarding.toggle_focus_area(&mut self.store, area);
    }

    /// Latches onboarding and hands the chosen name and color to the cat.
    pub fn complete_onboarding(&mut self) {
        self.onboarding.complete(&mut self.store);
        let state = self.onboarding.state().clone();
        self.cat.set_name(&mut self.store, state.cat_name);
        self.cat.set_color(&mut self.store, state.cat_color);
    }

    pub fn reset_onboarding(&mut self) {
        self.onboarding.reset(&mut self.store);
    }

    pub fn charity(&mut self) -> CharityCommitment {
        self.store.get_charity_commitment()
    }

    pub fn set_charity(&mut self, commitment: &CharityCommitment) -> bool {
        self.store.set_charity_commitment(commitment)
    }

    pub fn settings(&mut self) -> Settings {
        self.store.get_settings()
    }

    pub fn set_settings(&mut self, settings: &Settings) -> bool {
        self.store.set_settings(settings)
    }

    /// Wipes every record and starts over from defaults.
    pub fn clear_all(&mut self) {
        self.store.clear_all();
        let today = self.clock.today();
        self.onboarding = OnboardingManager::new();
        self.tasks = TaskManager::new(&today);
        self.cat = CompanionManager::new();
        self.load();
    }
}

#[derive(Clone)]
pub struct AppState {
    pub nafs: Arc<Mutex<Nafs>>,
}

impl AppState {
    pub fn new(nafs: Nafs) -> Self {
        Self {
            nafs: Arc::new(Mutex::new(nafs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{CatMood, CatState, DailyTasks};

    fn open_at(store: Store, date: &str) -> (Nafs, FixedClock) {
        let clock = FixedClock::new(date);
        (Nafs::open(store, Arc::new(clock.clone())), clock)
    }

    #[test]
    fn completing_tasks_lifts_cat_happiness() {
        let (mut nafs, _) = open_at(Store::in_memory(), "2024-01-01");
        for id in ["task-fajr", "task-dhuhr", "task-asr", "task-maghrib", "task-isha"] {
            assert!(nafs.complete_task(id));
        }
        assert_eq!(nafs.cat.happiness(), 60);
        assert!(!nafs.toggle_task("task-missing"));
        assert_eq!(nafs.cat.happiness(), 60);
    }

    #[test]
    fn stale_day_resets_tasks_and_decays_cat_once() {
        let mut store = Store::in_memory();
        let mut tasks = crate::catalog::default_tasks();
        tasks[0].completed = true;
        store.set_daily_tasks(&DailyTasks {
            date: "2024-01-01".to_string(),
            tasks,
        });
        store.set_cat_state(&CatState {
            happiness: 80,
            fed_today: true,
            last_update_date: Some("2024-01-01".to_string()),
            ..CatState::default()
        });

        let (mut nafs, _) = open_at(store, "2024-01-02");
        assert_eq!(nafs.tasks.date(), "2024-01-02");
        assert_eq!(nafs.tasks_completed_today(), 0);
        assert_eq!(nafs.cat.happiness(), 75);
        assert_eq!(nafs.cat.cat().days_active, 1);

        let rollover = nafs.on_visibility_regained();
        assert!(!rollover.tasks_reset);
        assert!(!rollover.cat_decayed);
        assert_eq!(nafs.cat.happiness(), 75);
        assert_eq!(nafs.cat.cat().days_active, 1);
    }

    #[test]
    fn visibility_after_midnight_rolls_both_over() {
        let (mut nafs, clock) = open_at(Store::in_memory(), "2024-01-01");
        nafs.complete_task("task-salam");
        nafs.care(CareAction::Feed);

        clock.set("2024-01-02");
        let rollover = nafs.on_visibility_regained();
        assert!(rollover.tasks_reset && rollover.cat_decayed);
        assert_eq!(rollover.date, "2024-01-02");
        assert_eq!(nafs.tasks_completed_today(), 0);
        assert!(!nafs.cat.cat().fed_today);

        let again = nafs.on_visibility_regained();
        assert!(!again.tasks_reset && !again.cat_decayed);
        assert_eq!(nafs.cat.cat().days_active, 1);
    }

    #[test]
    fn actions_after_midnight_land_on_the_new_day() {
        let (mut nafs, clock) = open_at(Store::in_memory(), "2024-01-01");
        for id in ["task-fajr", "task-dhuhr", "task-asr", "task-maghrib", "task-isha", "task-salam"] {
            nafs.complete_task(id);
        }

        clock.set("2024-01-02");
        nafs.care(CareAction::Feed);
        assert!(nafs.complete_task("task-kindness"));
        assert_eq!(nafs.tasks.date(), "2024-01-02");

        let rollover = nafs.on_visibility_regained();
        assert!(!rollover.tasks_reset && !rollover.cat_decayed);
        assert_eq!(nafs.tasks_completed_today(), 1);
        assert!(nafs.cat.cat().fed_today);
        assert_eq!(nafs.cat.cat().days_active, 1);
        assert_eq!(nafs.cat.cat().last_update_date.as_deref(), Some("2024-01-02"));
    }

    #[test]
    fn manual_refresh_reports_a_new_day_once() {
        let (mut nafs, clock) = open_at(Store::in_memory(), "2024-01-01");
        nafs.complete_task("task-fajr");
        assert!(!nafs.refresh_tasks());

        clock.set("2024-01-02");
        assert!(nafs.refresh_tasks());
        assert!(!nafs.refresh_tasks());
        assert_eq!(nafs.tasks_completed_today(), 0);
    }

    #[test]
    fn completing_onboarding_names_the_cat() {
        let (mut nafs, _) = open_at(Store::in_memory(), "2024-01-01");
        nafs.set_cat_name("Miski".to_string());
        nafs.set_cat_color(CatColor::Calico);
        nafs.toggle_focus_area(FocusArea::Duas);
        nafs.complete_onboarding();

        assert!(nafs.onboarding.is_complete());
        assert_eq!(nafs.cat.cat().name, "Miski");
        assert_eq!(nafs.cat.cat().color, CatColor::Calico);

        nafs.reset_tasks();
        assert_eq!(nafs.tasks.tasks()[0].id, "task-dua-eating");
    }

    #[test]
    fn clear_all_returns_to_fresh_install() {
        let (mut nafs, _) = open_at(Store::in_memory(), "2024-01-01");
        nafs.complete_onboarding();
        nafs.complete_task("task-fajr");
        nafs.set_settings(&Settings {
            prayer_reminders: true,
            ..Settings::default()
        });

        nafs.clear_all();
        assert!(!nafs.onboarding.is_complete());
        assert_eq!(nafs.tasks_completed_today(), 0);
        assert_eq!(nafs.settings(), Settings::default());
        assert_eq!(nafs.cat.mood(), CatMood::Calm);
    }
}
