pub mod activity_editor;
pub mod activity_service;
pub mod dirty_tracker;
pub mod general_config_service;
pub mod statistics_service;
pub mod wheel_editor;

pub use activity_editor::ActivityEditor;
pub use activity_service::ActivityService;
pub use dirty_tracker::{DirtyTracker, TrackedRow};
pub use general_config_service::GeneralConfigService;
pub use statistics_service::StatisticsService;
pub use wheel_editor::{EditContext, EditOutcome};
