pub mod activity;
pub mod common;
pub mod draw_record;
pub mod editor;
pub mod general_config;
pub mod pagination;
pub mod reward_output;
pub mod statistics;
pub mod wheel;

pub use activity::*;
pub use common::*;
pub use draw_record::*;
pub use editor::*;
pub use general_config::*;
pub use pagination::*;
pub use reward_output::*;
pub use statistics::*;
pub use wheel::*;
