pub mod ratelimit;

pub use ratelimit::{check_cooldown, get_cooldown_seconds};
