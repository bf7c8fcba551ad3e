use serenity::prelude::*;
use std::time::{Duration, Instant};
use crate::models::PingMetrics;

pub async fn get_ping_metrics(ctx: &Context, start_time: Instant) -> PingMetrics {
    let response_roundtrip = start_time.elapsed().as_millis() as u64;

    let uptime = {
        let data = ctx.data.read().await;
        match data.get::<crate::BotData>() {
            Some(&bot_start_time) => format_uptime(bot_start_time.elapsed()),
            None => "Unknown".to_string(),
        }
    };

    PingMetrics {
        response_roundtrip,
        uptime,
    }
}

fn format_uptime(elapsed: Duration) -> String {
    let hours = elapsed.as_secs() / 3600;
    let minutes = (elapsed.as_secs() % 3600) / 60;
    let seconds = elapsed.as_secs() % 60;
    format!("{}h {}m {}s", hours, minutes, seconds)
}

pub fn create_ping_embed(metrics: &PingMetrics) -> serenity::builder::CreateEmbed {
    serenity::builder::CreateEmbed::default()
        .title("Pong! 🏓")
        .field("Response Roundtrip", format!("{}ms", metrics.response_roundtrip), true)
        .field("Uptime", &metrics.uptime, false)
        .color(0x00b0f4)
}
