use serenity::builder::CreateEmbed;
use serenity::model::channel::Message;
use serenity::prelude::Context;
use crate::utils::get_cooldown_seconds;

pub async fn execute(ctx: &Context, msg: &Message) -> Result<(), String> {
    let embed = CreateEmbed::default()
        .title("📖 Bitcoin Pizza Counter Help")
        .description("Analyzes Bitcoin transactions to estimate how many pizzas might have been bought on a given day.\nThe estimate is based on transaction amounts, fees and keywords.")
        .color(0x00b0f4)
        .field(
            "🍕 Pizza",
            "`$pizza [YYYY-MM-DD]` - Estimate pizzas bought on a day (default: 2010-05-22)\n`$pizza help` - Explain the heuristics",
            false,
        )
        .field(
            "🎯 General",
            "`$ping` - Check bot latency\n`$help` - Show this help message",
            false,
        )
        .field(
            "⚡ Rate Limiting",
            format!("{}-second cooldown per command per user", get_cooldown_seconds()),
            false,
        );

    msg.channel_id
        .send_message(ctx, serenity::builder::CreateMessage::default().embed(embed))
        .await
        .map_err(|e| format!("Failed to send help message: {}", e))?;

    Ok(())
}
