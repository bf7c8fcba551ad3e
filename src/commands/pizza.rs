use chrono::Local;
use serenity::model::channel::Message;
use serenity::prelude::Context;
use crate::services::pizza_service;

pub async fn execute(ctx: &Context, msg: &Message, args: &[&str]) -> Result<(), String> {
    tracing::info!("🍕 Pizza command called with args: {:?}", args);

    if args.first().map(|a| a.eq_ignore_ascii_case("help")).unwrap_or(false) {
        msg.channel_id
            .send_message(ctx, serenity::builder::CreateMessage::default().embed(pizza_service::create_usage_embed()))
            .await
            .map_err(|e| e.to_string())?;
        return Ok(());
    }

    let today = Local::now().date_naive();
    let request = match pizza_service::parse_request(args, today) {
        Ok(request) => request,
        Err(reply) => {
            msg.channel_id
                .send_message(ctx, serenity::builder::CreateMessage::default().embed(reply))
                .await
                .map_err(|e| e.to_string())?;
            return Ok(());
        }
    };
    let date = request.date_string();

    let client = {
        let data = ctx.data.read().await;
        data.get::<crate::ExplorerClient>()
            .ok_or("Blockchair client not initialized".to_string())?
            .clone()
    };

    // Typing indicator stands in for a spinner while the explorer answers
    if let Err(e) = msg.channel_id.broadcast_typing(ctx.http.as_ref()).await {
        tracing::warn!("Failed to broadcast typing: {}", e);
    }

    let embed = match pizza_service::analyze(&client, &request).await.map_err(|e| e.to_string())? {
        Some(report) => pizza_service::create_report_embed(&report),
        None => {
            tracing::warn!("No transaction data for {}", date);
            pizza_service::create_fetch_failure_embed(&date)
        }
    };

    msg.channel_id
        .send_message(ctx, serenity::builder::CreateMessage::default().embed(embed))
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
