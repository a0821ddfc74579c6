use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Prayer,
    Dua,
    Manners,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub category: TaskCategory,
    pub label: String,
    pub emoji: String,
    pub points: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTasks {
    pub date: String,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatColor {
    #[default]
    Cream,
    Ginger,
    Gray,
    Black,
    Calico,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatMood {
    Happy,
    Hungry,
    Messy,
    #[default]
    Calm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CareAction {
    Feed,
    Brush,
    Play,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatState {
    pub name: String,
    pub color: CatColor,
    pub happiness: u8,
    pub state: CatMood,
    pub fed_today: bool,
    pub brushed_today: bool,
    pub played_today: bool,
    pub days_active: u32,
    /// Date the daily reset was last applied for; `None` until first load.
    #[serde(default)]
    pub last_update_date: Option<String>,
}

impl Default for CatState {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: CatColor::Cream,
            happiness: 50,
            state: CatMood::Calm,
            fed_today: false,
            brushed_today: false,
            played_today: false,
            days_active: 0,
            last_update_date: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusArea {
    Prayers,
    Duas,
    Manners,
    Quran,
    Charity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingState {
    pub completed: bool,
    pub step: u8,
    pub cat_name: String,
    pub cat_color: CatColor,
    pub focus_areas: Vec<FocusArea>,
}

impl Default for OnboardingState {
    fn default() -> Self {
        Self {
            completed: false,
            step: 1,
            cat_name: String::new(),
            cat_color: CatColor::Cream,
            focus_areas: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharityCommitment {
    pub enabled: bool,
    pub amount: Option<f64>,
    pub currency: String,
}

impl Default for CharityCommitment {
    fn default() -> Self {
        Self {
            enabled: false,
            amount: None,
            currency: "GBP".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub prayer_reminders: bool,
    pub cat_care_reminders: bool,
    pub prayer_method: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StepRequest {
    pub step: u8,
}

#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ColorRequest {
    pub color: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusAreasRequest {
    pub focus_areas: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub completed_count: usize,
    pub total_count: usize,
    pub goals_left: usize,
    pub completion_percentage: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksResponse {
    pub date: String,
    pub tasks: Vec<Task>,
    pub tasks_by_category: BTreeMap<TaskCategory, Vec<Task>>,
    #[serde(flatten)]
    pub stats: TaskStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatResponse {
    #[serde(flatten)]
    pub cat: CatState,
    pub tasks_completed_today: usize,
    pub can_feed: bool,
    pub can_brush: bool,
    pub can_play: bool,
    pub should_show_banner: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloverResponse {
    pub tasks_reset: bool,
    pub cat_decayed: bool,
    pub date: String,
}
