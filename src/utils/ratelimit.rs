use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use lazy_static::lazy_static;
use serenity::model::id::UserId;
use tokio::sync::Mutex;

lazy_static! {
    static ref COMMAND_COOLDOWNS: Mutex<HashMap<(UserId, String), u64>> =
        Mutex::new(HashMap::new());

    // Last cooldown warning per (user, command), so retries don't spam the channel
    static ref COOLDOWN_WARNINGS: Mutex<HashMap<(UserId, String), u64>> =
        Mutex::new(HashMap::new());
}

const COOLDOWN_SECONDS: u64 = 5;

/// Check if a user can execute a command (cooldown not active)
/// Returns Ok(()) if cooldown has passed
/// Returns Err((remaining_seconds, should_send_warning_message)) if still on cooldown
pub async fn check_cooldown(user_id: UserId, command: &str) -> Result<(), (u64, bool)> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    check_cooldown_at(user_id, command, now).await
}

async fn check_cooldown_at(user_id: UserId, command: &str, now: u64) -> Result<(), (u64, bool)> {
    let key = (user_id, command.to_string());

    let mut cooldowns = COMMAND_COOLDOWNS.lock().await;
    if let Some(&last_time) = cooldowns.get(&key) {
        let elapsed = now.saturating_sub(last_time);
        if elapsed < COOLDOWN_SECONDS {
            let remaining = COOLDOWN_SECONDS - elapsed;

            let mut warnings = COOLDOWN_WARNINGS.lock().await;
            // Only warn once per cooldown period
            let should_warn = match warnings.get(&key) {
                Some(&last_warning) => last_warning < last_time,
                None => true,
            };
            if should_warn {
                warnings.insert(key, now);
            }

            return Err((remaining, should_warn));
        }
    }

    cooldowns.insert(key, now);
    Ok(())
}

/// Get the cooldown seconds constant
pub fn get_cooldown_seconds() -> u64 {
    COOLDOWN_SECONDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cooldown_blocks_then_releases() {
        let user = UserId::new(9_000_001);

        assert!(check_cooldown_at(user, "$pizza", 1000).await.is_ok());
        assert_eq!(check_cooldown_at(user, "$pizza", 1002).await, Err((3, true)));
        // second violation in the same period is silent
        assert_eq!(check_cooldown_at(user, "$pizza", 1003).await, Err((2, false)));
        assert!(check_cooldown_at(user, "$pizza", 1005).await.is_ok());
    }

    #[tokio::test]
    async fn test_cooldown_is_per_command() {
        let user = UserId::new(9_000_002);

        assert!(check_cooldown_at(user, "$pizza", 500).await.is_ok());
        assert!(check_cooldown_at(user, "$ping", 500).await.is_ok());
        assert!(check_cooldown_at(UserId::new(9_000_003), "$pizza", 500).await.is_ok());
    }
}
