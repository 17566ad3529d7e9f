pub mod types;
pub mod week;
pub mod roles;

pub use types::{ColumnSpan, RoleLabel, ScheduleLayout, WeekBlock, WeekRoster};
pub use week::{locate_week, parse_date};
pub use roles::week_roster;
