use crate::catalog::default_tasks;
use crate::clock::is_new_day;
use crate::models::{DailyTasks, FocusArea, Task, TaskCategory, TaskStats};
use crate::storage::Store;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Today's tasks from the catalog, with categories picked in onboarding
/// moved to the front. Order inside each group is the catalog order.
pub fn initialize(focus_areas: &[FocusArea]) -> Vec<Task> {
    let mut tasks = default_tasks();
    if focus_areas.is_empty() {
        return tasks;
    }

    let prioritized: Vec<TaskCategory> = focus_areas
        .iter()
        .filter_map(|area| area.task_category())
        .collect();
    tasks.sort_by_key(|task| !prioritized.contains(&task.category));
    tasks
}

/// Fresh task set when `current` belongs to an earlier day.
pub fn check_rollover(current: &DailyTasks, today: &str, focus_areas: &[FocusArea]) -> Option<DailyTasks> {
    if !is_new_day(&current.date, today) {
        return None;
    }
    Some(DailyTasks {
        date: today.to_string(),
        tasks: initialize(focus_areas),
    })
}

#[derive(Debug)]
pub struct TaskManager {
    daily: DailyTasks,
    loaded: bool,
}

impl TaskManager {
    pub fn new(today: &str) -> Self {
        Self {
            daily: DailyTasks {
                date: today.to_string(),
                tasks: Vec::new(),
            },
            loaded: false,
        }
    }

    pub fn load(&mut self, store: &mut Store, today: &str, focus_areas: &[FocusArea]) {
        let stored = store.get_daily_tasks(today);
        self.loaded = true;
        match check_rollover(&stored, today, focus_areas) {
            Some(fresh) => {
                info!("new day {today} (tasks were for {}), resetting tasks", stored.date);
                self.daily = fresh;
                self.persist(store);
            }
            None => self.daily = stored,
        }
    }

    /// Regenerates the list if the day has moved on. Returns whether it did.
    pub fn refresh(&mut self, store: &mut Store, today: &str, focus_areas: &[FocusArea]) -> bool {
        if !self.loaded {
            return false;
        }
        match check_rollover(&self.daily, today, focus_areas) {
            Some(fresh) => {
                info!("new day detected, resetting tasks for {today}");
                self.daily = fresh;
                self.persist(store);
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self, store: &mut Store, today: &str, focus_areas: &[FocusArea]) {
        self.daily = DailyTasks {
            date: today.to_string(),
            tasks: initialize(focus_areas),
        };
        self.persist(store);
    }

    pub fn date(&self) -> &str {
        &self.daily.date
    }

    pub fn tasks(&self) -> &[Task] {
        &self.daily.tasks
    }

    pub fn toggle(&mut self, store: &mut Store, id: &str) -> bool {
        self.update(store, id, |completed| !completed)
    }

    pub fn complete(&mut self, store: &mut Store, id: &str) -> bool {
        self.update(store, id, |_| true)
    }

    pub fn uncomplete(&mut self, store: &mut Store, id: &str) -> bool {
        self.update(store, id, |_| false)
    }

    fn update(&mut self, store: &mut Store, id: &str, next: impl FnOnce(bool) -> bool) -> bool {
        let Some(task) = self.daily.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("ignoring unknown task id {id}");
            return false;
        };
        task.completed = next(task.completed);
        self.persist(store);
        true
    }

    pub fn completed_count(&self) -> usize {
        self.daily.tasks.iter().filter(|task| task.completed).count()
    }

    pub fn total_count(&self) -> usize {
        self.daily.tasks.len()
    }

    pub fn goals_left(&self) -> usize {
        self.total_count() - self.completed_count()
    }

    pub fn completion_percentage(&self) -> f64 {
        let total = self.total_count();
        if total == 0 {
            return 0.0;
        }
        self.completed_count() as f64 / total as f64 * 100.0
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats {
            completed_count: self.completed_count(),
            total_count: self.total_count(),
            goals_left: self.goals_left(),
            completion_percentage: self.completion_percentage(),
        }
    }

    pub fn tasks_by_category(&self) -> BTreeMap<TaskCategory, Vec<Task>> {
        let mut groups: BTreeMap<TaskCategory, Vec<Task>> = BTreeMap::new();
        for task in &self.daily.tasks {
            groups.entry(task.category).or_default().push(task.clone());
        }
        groups
    }

    pub fn tasks_in_category(&self, category: TaskCategory) -> Vec<&Task> {
        self.daily
            .tasks
            .iter()
            .filter(|task| task.category == category)
            .collect()
    }

    fn persist(&self, store: &mut Store) {
        if !self.loaded {
            debug!("tasks not loaded yet, skipping persist");
            return;
        }
        store.set_daily_tasks(&self.daily);
    }
}
