pub mod help;
pub mod ping;
pub mod pizza;

use serenity::model::channel::Message;
use serenity::prelude::Context;
use crate::utils::check_cooldown;

pub async fn handle_message(ctx: &Context, msg: &Message) {
    if msg.author.bot {
        return;
    }

    // Parse command and arguments
    let parts: Vec<&str> = msg.content.split_whitespace().collect();
    let (command, args) = match parts.split_first() {
        Some((command, args)) if command.starts_with('$') => (*command, args),
        _ => return,
    };

    // Aliases share one cooldown window
    let command = match canonical_command(command) {
        Some(c) => c,
        None => return,
    };

    if let Err((remaining, should_warn)) = check_cooldown(msg.author.id, command).await {
        if should_warn {
            let _ = msg.channel_id.send_message(
                ctx,
                serenity::builder::CreateMessage::default().embed(
                    serenity::builder::CreateEmbed::default()
                        .title("Command Cooldown")
                        .description(format!("⏳ Please wait {} seconds before using this command again.", remaining))
                        .color(0xffa500)
                )
            ).await;
        }
        return;
    }

    let result = match command {
        "$pizza" => pizza::execute(ctx, msg, args).await,
        "$ping" => ping::execute(ctx, msg).await,
        "$help" => help::execute(ctx, msg).await,
        _ => return,
    };

    if let Err(e) = result {
        tracing::error!("❌ Error executing command {}: {}", command, e);

        let user_message = if e.contains("429") || e.contains("rate limit") {
            "⚠️ **Rate Limited**: Discord is rate limiting us. Please try again in a moment.".to_string()
        } else if e.contains("HTTP request") {
            "⚠️ **Network Error**: Having trouble connecting to Discord. Please try again.".to_string()
        } else if !e.is_empty() {
            format!("❌ {}", e)
        } else {
            "❌ An error occurred while executing the command.".to_string()
        };

        let embed = serenity::builder::CreateEmbed::default()
            .title("Command Error")
            .description(user_message)
            .color(0xff0000);

        let _ = msg.channel_id
            .send_message(ctx, serenity::builder::CreateMessage::default().embed(embed))
            .await;
    }
}

fn canonical_command(command: &str) -> Option<&'static str> {
    match command {
        "$pizza" | "$pizzas" | "$slice" => Some("$pizza"),
        "$ping" => Some("$ping"),
        "$help" => Some("$help"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_commands() {
        assert_eq!(canonical_command("$ping"), Some("$ping"));
        assert_eq!(canonical_command("$help"), Some("$help"));
        assert_eq!(canonical_command("$price"), None);
        assert_eq!(canonical_command("pizza"), None);
    }

    #[test]
    fn test_pizza_aliases_share_a_name() {
        for alias in ["$pizza", "$pizzas", "$slice"] {
            assert_eq!(canonical_command(alias), Some("$pizza"));
        }
    }

    #[tokio::test]
    async fn test_pizza_aliases_share_a_cooldown() {
        let user = serenity::model::id::UserId::new(9_000_100);
        let pizza = canonical_command("$pizza").unwrap();
        let slice = canonical_command("$slice").unwrap();

        assert!(check_cooldown(user, pizza).await.is_ok());
        assert!(check_cooldown(user, slice).await.is_err());
    }
}
