pub mod clock;
pub mod datetime;
pub mod id_generator;

pub use clock::{Clock, FixedClock, SystemClock};
pub use datetime::{format_datetime, parse_datetime};
pub use id_generator::{generate_activity_id, generate_reward_id, generate_upgrade_reward_id};
