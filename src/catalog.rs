//! Static content: the daily task catalog, onboarding choices and the
//! numbers that drive the companion.

use crate::models::{CatColor, FocusArea, Task, TaskCategory};
use serde::Serialize;

pub const FEED_UNLOCK: usize = 2;
pub const BRUSH_UNLOCK: usize = 4;
pub const PLAY_UNLOCK: usize = 6;
pub const BANNER_THRESHOLD: usize = 3;

pub const HAPPINESS_MIN: u8 = 20;
pub const HAPPINESS_MAX: u8 = 100;
pub const HAPPINESS_BASELINE: u8 = 50;
pub const DAILY_DECAY: u8 = 5;
pub const TASK_BONUS: u8 = 2;
pub const FEED_BONUS: u8 = 8;
pub const BRUSH_BONUS: u8 = 6;
pub const PLAY_BONUS: u8 = 10;

pub const FIRST_STEP: u8 = 1;
pub const LAST_STEP: u8 = 4;

struct TaskTemplate {
    id: &'static str,
    category: TaskCategory,
    label: &'static str,
    emoji: &'static str,
    points: u32,
}

const DEFAULT_TASKS: [TaskTemplate; 12] = [
    TaskTemplate { id: "task-fajr", category: TaskCategory::Prayer, label: "Fajr prayer", emoji: "🌅", points: 5 },
    TaskTemplate { id: "task-dhuhr", category: TaskCategory::Prayer, label: "Dhuhr prayer", emoji: "☀️", points: 5 },
    TaskTemplate { id: "task-asr", category: TaskCategory::Prayer, label: "Asr prayer", emoji: "🌤️", points: 5 },
    TaskTemplate { id: "task-maghrib", category: TaskCategory::Prayer, label: "Maghrib prayer", emoji: "🌆", points: 5 },
    TaskTemplate { id: "task-isha", category: TaskCategory::Prayer, label: "Isha prayer", emoji: "🌙", points: 5 },
    TaskTemplate { id: "task-dua-eating", category: TaskCategory::Dua, label: "Before eating: Bismillah", emoji: "🍽️", points: 3 },
    TaskTemplate {
        id: "task-dua-sleeping",
        category: TaskCategory::Dua,
        label: "Before sleeping: Allahumma bismika amutu wa ahya",
        emoji: "😴",
        points: 3,
    },
    TaskTemplate { id: "task-dua-morning", category: TaskCategory::Dua, label: "Morning adhkar", emoji: "🌄", points: 3 },
    TaskTemplate { id: "task-salam", category: TaskCategory::Manners, label: "Say Salam to family", emoji: "🤝", points: 2 },
    TaskTemplate { id: "task-bismillah", category: TaskCategory::Manners, label: "Say Bismillah before actions", emoji: "📿", points: 2 },
    TaskTemplate { id: "task-smile", category: TaskCategory::Manners, label: "Smile at someone", emoji: "😊", points: 2 },
    TaskTemplate { id: "task-kindness", category: TaskCategory::Manners, label: "Do an act of kindness", emoji: "💚", points: 2 },
];

/// Fresh, uncompleted copy of the catalog in its canonical order.
pub fn default_tasks() -> Vec<Task> {
    DEFAULT_TASKS
        .iter()
        .map(|template| Task {
            id: template.id.to_string(),
            category: template.category,
            label: template.label.to_string(),
            emoji: template.emoji.to_string(),
            points: template.points,
            completed: false,
        })
        .collect()
}

impl FocusArea {
    pub const ALL: [FocusArea; 5] = [
        FocusArea::Prayers,
        FocusArea::Duas,
        FocusArea::Manners,
        FocusArea::Quran,
        FocusArea::Charity,
    ];

    pub fn id(self) -> &'static str {
        match self {
            FocusArea::Prayers => "prayers",
            FocusArea::Duas => "duas",
            FocusArea::Manners => "manners",
            FocusArea::Quran => "quran",
            FocusArea::Charity => "charity",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|area| area.id() == id)
    }

    pub fn label(self) -> &'static str {
        match self {
            FocusArea::Prayers => "Keep up with daily prayers",
            FocusArea::Duas => "Learn daily du'as",
            FocusArea::Manners => "Build good habits & manners",
            FocusArea::Quran => "Read more Quran",
            FocusArea::Charity => "Give more charity",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            FocusArea::Prayers => "🕌",
            FocusArea::Duas => "📿",
            FocusArea::Manners => "🤲",
            FocusArea::Quran => "📖",
            FocusArea::Charity => "💝",
        }
    }

    /// Task category this focus area prioritises. Quran and charity have no
    /// tasks in the catalog yet.
    pub fn task_category(self) -> Option<TaskCategory> {
        match self {
            FocusArea::Prayers => Some(TaskCategory::Prayer),
            FocusArea::Duas => Some(TaskCategory::Dua),
            FocusArea::Manners => Some(TaskCategory::Manners),
            FocusArea::Quran | FocusArea::Charity => None,
        }
    }
}

impl CatColor {
    pub const ALL: [CatColor; 5] = [
        CatColor::Cream,
        CatColor::Ginger,
        CatColor::Gray,
        CatColor::Black,
        CatColor::Calico,
    ];

    pub fn id(self) -> &'static str {
        match self {
            CatColor::Cream => "cream",
            CatColor::Ginger => "ginger",
            CatColor::Gray => "gray",
            CatColor::Black => "black",
            CatColor::Calico => "calico",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|color| color.id() == id)
    }

    pub fn hex(self) -> &'static str {
        match self {
            CatColor::Cream => "#F9E4C8",
            CatColor::Ginger => "#E39756",
            CatColor::Gray => "#A8A8A8",
            CatColor::Black => "#3D3D3D",
            CatColor::Calico => "#D9956A",
        }
    }
}

impl TaskCategory {
    pub fn heading(self) -> &'static str {
        match self {
            TaskCategory::Prayer => "Start the day",
            TaskCategory::Dua => "Daily Du'a",
            TaskCategory::Manners => "Good Manners",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TaskCategory::Prayer => "Daily prayers",
            TaskCategory::Dua => "Remembrance and supplications",
            TaskCategory::Manners => "Islamic etiquettes and character",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub emoji: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ColorEntry {
    pub id: &'static str,
    pub hex: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CategoryEntry {
    pub id: TaskCategory,
    pub heading: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub focus_areas: Vec<CatalogEntry>,
    pub colors: Vec<ColorEntry>,
    pub categories: Vec<CategoryEntry>,
    pub tasks: Vec<Task>,
}

pub fn describe() -> CatalogResponse {
    CatalogResponse {
        focus_areas: FocusArea::ALL
            .into_iter()
            .map(|area| CatalogEntry {
                id: area.id(),
                label: area.label(),
                emoji: area.emoji(),
            })
            .collect(),
        colors: CatColor::ALL
            .into_iter()
            .map(|color| ColorEntry {
                id: color.id(),
                hex: color.hex(),
            })
            .collect(),
        categories: [TaskCategory::Prayer, TaskCategory::Dua, TaskCategory::Manners]
            .into_iter()
            .map(|category| CategoryEntry {
                id: category,
                heading: category.heading(),
                description: category.description(),
            })
            .collect(),
        tasks: default_tasks(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_twelve_unique_tasks() {
        let tasks = default_tasks();
        assert_eq!(tasks.len(), 12);
        let mut ids: Vec<_> = tasks.iter().map(|task| task.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 12);
        assert!(tasks.iter().all(|task| !task.completed && task.points > 0));
    }

    #[test]
    fn only_three_focus_areas_map_to_categories() {
        let mapped: Vec<_> = FocusArea::ALL
            .into_iter()
            .filter_map(FocusArea::task_category)
            .collect();
        assert_eq!(
            mapped,
            vec![TaskCategory::Prayer, TaskCategory::Dua, TaskCategory::Manners]
        );
        assert_eq!(FocusArea::parse("quran"), Some(FocusArea::Quran));
        assert_eq!(FocusArea::parse("fasting"), None);
        assert_eq!(CatColor::parse("calico"), Some(CatColor::Calico));
    }
}
