pub mod app;
pub mod catalog;
pub mod clock;
pub mod companion;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod onboarding;
pub mod state;
pub mod storage;
pub mod tasks;

pub use app::router;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use state::{AppState, Nafs};
pub use storage::Store;
