//! Backend API commands: search, monitors, pricing, products, templates,
//! notifications and the scheduler.
use std::fmt::Write as _;
use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use sedori_core::{format_price, PLACEHOLDER};
use sedori_engine::dto::{
    EstimateRequest, MonitorAddRequest, MonitorItem, NotificationItem, PricingRequest,
    SuggestRequest, TemplateDraft, TemplatePatch,
};
use sedori_engine::BackendClient;
use sedori_logging::{sedori_debug, sedori_info, sedori_warn};
use tokio::time::MissedTickBehavior;

use super::Context;
use crate::cli::{
    AmazonCommand, CostArgs, MonitorCommand, NotificationCommand, PricingCommand,
    SchedulerCommand, TemplateCommand,
};

pub async fn search(ctx: &Context, keyword: &str) -> Result<()> {
    let results = ctx.client()?.search_yahoo(keyword).await?;
    ctx.emit(&results, |results| {
        let mut text = format!("{} result(s) for '{keyword}'", results.len());
        for result in results {
            let _ = write!(
                text,
                "\n  {}  {}  現在:{}  即決:{}  入札:{}  残り:{}",
                result.auction_id,
                result.title,
                format_price(result.current_price),
                format_price(result.buy_now_price.filter(|price| *price != 0)),
                result.bid_count.unwrap_or(0),
                result.end_time_text.as_deref().unwrap_or(PLACEHOLDER),
            );
        }
        text
    })
}

pub async fn history(ctx: &Context, keyword: &str, count: u32) -> Result<()> {
    let history = ctx.client()?.auction_history(keyword, count).await?;
    ctx.emit(&history, |history| {
        let mut text = format!(
            "{} closed auction(s) for '{keyword}', median {}, average {}",
            history.count,
            format_price(history.median_price.map(|p| p.round() as i64)),
            format_price(history.average_price.map(|p| p.round() as i64)),
        );
        for result in &history.results {
            let _ = write!(
                text,
                "\n  {}  {}  {}  {}",
                result.end_date.as_deref().unwrap_or(PLACEHOLDER),
                format_price(Some(result.winning_price)),
                result.auction_id,
                result.title
            );
        }
        text
    })
}

pub async fn detail(ctx: &Context, auction_id: &str) -> Result<()> {
    let detail = ctx.client()?.auction_detail(auction_id).await?;
    ctx.emit(&detail, |d| {
        format!(
            "{}\n  現在: {}  即決: {}  開始: {}  入札: {}\n  出品者: {}  終了: {}\n  {}",
            d.title,
            format_price(d.current_price),
            format_price(d.buy_now_price),
            format_price(d.start_price),
            d.bid_count.unwrap_or(0),
            d.seller_name
                .as_deref()
                .or(d.seller_id.as_deref())
                .unwrap_or(PLACEHOLDER),
            d.end_time.as_deref().unwrap_or(PLACEHOLDER),
            d.url
        )
    })
}

pub async fn monitor(ctx: &Context, command: MonitorCommand) -> Result<()> {
    let client = ctx.client()?;
    match command {
        MonitorCommand::Add {
            asin,
            product_title,
            auction_id,
            auction_title,
            current_price,
            buy_now_price,
            image_url,
            url,
        } => {
            let request = MonitorAddRequest {
                asin,
                product_title,
                auction_id,
                auction_title,
                current_price,
                buy_now_price,
                image_url,
                url,
            };
            let item = client.add_monitor(&request).await?;
            sedori_info!("Monitoring auction {} as #{}", item.yahoo_auction_id, item.id);
            ctx.emit(&item, monitor_line)
        }
        MonitorCommand::List { status } => {
            let list = client.list_monitors(status).await?;
            ctx.emit(&list, |list| {
                let mut text = format!("{} {status} monitor(s)", list.total);
                for item in &list.items {
                    let _ = write!(text, "\n  {}", monitor_line(item));
                }
                text
            })
        }
        MonitorCommand::Show { id } => {
            let item = client.monitor(id).await?;
            ctx.emit(&item, monitor_line)
        }
        MonitorCommand::Remove { id } => {
            let message = client.remove_monitor(id).await?;
            ctx.emit(&message, |m| m.message.clone())
        }
    }
}

fn monitor_line(item: &MonitorItem) -> String {
    format!(
        "#{} [{}] {} ({}) -> {} {} 現在:{} 即決:{}",
        item.id,
        item.status,
        item.product_title,
        item.asin,
        item.yahoo_auction_id,
        item.auction_title,
        format_price(item.current_price),
        format_price(item.buy_now_price),
    )
}

pub async fn pricing(ctx: &Context, command: PricingCommand) -> Result<()> {
    let client = ctx.client()?;
    match command {
        PricingCommand::Calculate {
            selling_price,
            winning_price,
            costs,
        } => {
            let CostArgs {
                category,
                fee_rate,
                shipping_cost,
                other_cost,
            } = costs;
            let result = client
                .calculate_pricing(&PricingRequest {
                    selling_price,
                    expected_winning_price: winning_price,
                    category,
                    fee_rate,
                    shipping_cost,
                    other_cost,
                })
                .await?;
            ctx.emit(&result, |r| {
                format!(
                    "profit {} ({:.1}%)\n  selling {}  winning {}  fee {} ({:.1}%)  shipping {}  other {}",
                    format_price(Some(r.profit)),
                    r.profit_rate,
                    format_price(Some(r.selling_price)),
                    format_price(Some(r.expected_winning_price)),
                    format_price(Some(r.amazon_fee)),
                    r.amazon_fee_rate * 100.0,
                    format_price(Some(r.shipping_cost)),
                    format_price(Some(r.other_cost)),
                )
            })
        }
        PricingCommand::Suggest {
            winning_price,
            target_profit_rate,
            costs,
        } => {
            let CostArgs {
                category,
                fee_rate,
                shipping_cost,
                other_cost,
            } = costs;
            let suggestion = client
                .suggest_price(&SuggestRequest {
                    expected_winning_price: winning_price,
                    category,
                    fee_rate,
                    shipping_cost,
                    other_cost,
                    target_profit_rate,
                })
                .await?;
            ctx.emit(&suggestion, |s| {
                format!(
                    "suggested {} (profit {}, {:.1}%)",
                    format_price(Some(s.suggested_price)),
                    format_price(Some(s.profit)),
                    s.actual_profit_rate
                )
            })
        }
        PricingCommand::Estimate {
            prices,
            buy_now_price,
        } => {
            let estimate = client
                .estimate_winning_price(&EstimateRequest {
                    history_prices: prices,
                    buy_now_price,
                })
                .await?;
            ctx.emit(&estimate, |e| {
                format!(
                    "expected winning price {} from {} data point(s) ({})",
                    format_price(e.expected_winning_price),
                    e.data_count,
                    e.source
                )
            })
        }
    }
}

pub async fn amazon(ctx: &Context, command: AmazonCommand) -> Result<()> {
    let client = ctx.client()?;
    match command {
        AmazonCommand::Product { asin } => {
            let product = client.amazon_product(&asin).await?;
            ctx.emit(&product, |p| {
                format!(
                    "{} {}\n  price {}  brand {}  model {}",
                    p.asin,
                    p.title.as_deref().unwrap_or(PLACEHOLDER),
                    format_price(p.price),
                    p.brand.as_deref().unwrap_or(PLACEHOLDER),
                    p.model_number.as_deref().unwrap_or(PLACEHOLDER),
                )
            })
        }
        AmazonCommand::Save { asin } => {
            let stored = client.save_amazon_product(&asin).await?;
            ctx.emit(&stored, |s| {
                format!("saved {} as #{} at {}", s.product.asin, s.id, s.created_at)
            })
        }
        AmazonCommand::Competitors { asin } => {
            let competitors = client.competitors(&asin).await?;
            ctx.emit(&competitors, |c| {
                let mut text = format!(
                    "{} offer(s) for {}: lowest new {}, lowest used {}",
                    c.offers.len(),
                    c.asin,
                    format_price(c.lowest_new_price),
                    format_price(c.lowest_used_price),
                );
                for offer in &c.offers {
                    let _ = write!(
                        text,
                        "\n  {} {} (+{}) {}{}",
                        format_price(Some(offer.total_price)),
                        offer.condition,
                        format_price(Some(offer.shipping_cost)),
                        offer.seller_name.as_deref().unwrap_or(PLACEHOLDER),
                        if offer.is_fba { " FBA" } else { "" },
                    );
                }
                text
            })
        }
    }
}

pub async fn templates(ctx: &Context, command: TemplateCommand) -> Result<()> {
    let client = ctx.client()?;
    match command {
        TemplateCommand::List => {
            let templates = client.list_templates().await?;
            ctx.emit(&templates, |templates| {
                let mut text = format!("{} template(s)", templates.len());
                for template in templates {
                    let _ = write!(text, "\n  #{} {}", template.id, template.name);
                }
                text
            })
        }
        TemplateCommand::Show { id } => {
            let template = client.template(id).await?;
            ctx.emit(&template, |t| format!("#{} {}\n\n{}", t.id, t.name, t.body))
        }
        TemplateCommand::Create { name, body } => {
            let template = client.create_template(&TemplateDraft { name, body }).await?;
            ctx.emit(&template, |t| format!("created template #{}", t.id))
        }
        TemplateCommand::Update { id, name, body } => {
            let patch = TemplatePatch { name, body };
            if patch.is_empty() {
                bail!("nothing to update: pass --name and/or --body");
            }
            let template = client.update_template(id, &patch).await?;
            ctx.emit(&template, |t| format!("updated template #{}", t.id))
        }
        TemplateCommand::Delete { id } => {
            let detail = client.delete_template(id).await?;
            ctx.emit(&detail, |d| d.detail.clone())
        }
    }
}

pub async fn notifications(ctx: &Context, command: NotificationCommand) -> Result<()> {
    let client = ctx.client()?;
    match command {
        NotificationCommand::List { limit, unread } => {
            let list = client.list_notifications(limit, unread).await?;
            ctx.emit(&list, |list| {
                let mut text = format!("{} notification(s), {} unread", list.total, list.unread_count);
                for item in &list.items {
                    let _ = write!(text, "\n  {}", notification_line(item));
                }
                text
            })
        }
        NotificationCommand::Read { id } => {
            let detail = client.mark_notification_read(id).await?;
            ctx.emit(&detail, |d| d.detail.clone())
        }
        NotificationCommand::ReadAll => {
            let detail = client.mark_all_notifications_read().await?;
            ctx.emit(&detail, |d| d.detail.clone())
        }
        NotificationCommand::Unread => {
            let count = client.unread_count().await?;
            ctx.emit(&count, |c| format!("{} unread", c.unread_count))
        }
        NotificationCommand::Poll {
            interval_secs,
            polls,
        } => poll_notifications(ctx, &client, Duration::from_secs(interval_secs.max(1)), polls).await,
    }
}

fn notification_line(item: &NotificationItem) -> String {
    format!(
        "{}#{} [{}] {} {}: {}",
        if item.is_read { " " } else { "*" },
        item.id,
        item.created_at,
        item.kind,
        item.title,
        item.message
    )
}

/// Polls the unread count and prints the newest unread notifications each
/// time it grows. Failed polls are logged and retried on the next tick.
async fn poll_notifications(
    ctx: &Context,
    client: &BackendClient,
    interval: Duration,
    polls: Option<u64>,
) -> Result<()> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_seen: Option<usize> = None;
    let mut done = 0u64;

    while polls.map_or(true, |limit| done < limit) {
        ticker.tick().await;
        done += 1;

        let unread = match client.unread_count().await {
            Ok(count) => count.unread_count,
            Err(err) => {
                sedori_warn!("Unread count poll failed: {}", err);
                continue;
            }
        };
        sedori_debug!("Poll {}: {} unread", done, unread);

        let grown = new_unread(last_seen, unread);
        last_seen = Some(unread);
        if grown == 0 {
            continue;
        }
        let limit = u32::try_from(grown).unwrap_or(u32::MAX);
        let list = client
            .list_notifications(limit, true)
            .await
            .context("failed to fetch new notifications")?;
        for item in &list.items {
            ctx.emit(item, notification_line)?;
        }
    }
    Ok(())
}

/// Number of notifications to show for a poll: all unread on the first poll,
/// then only the growth since the previous one.
fn new_unread(previous: Option<usize>, current: usize) -> usize {
    match previous {
        None => current,
        Some(previous) => current.saturating_sub(previous),
    }
}

pub async fn scheduler(ctx: &Context, command: SchedulerCommand) -> Result<()> {
    let client = ctx.client()?;
    let detail = match command {
        SchedulerCommand::Status => {
            let status = client.scheduler_status().await?;
            return ctx.emit(&status, |s| {
                format!(
                    "{} every {} min, next run {}",
                    if s.running { "running" } else { "stopped" },
                    s.interval_minutes,
                    s.next_run.as_deref().unwrap_or(PLACEHOLDER)
                )
            });
        }
        SchedulerCommand::Start => client.start_scheduler().await?,
        SchedulerCommand::Stop => client.stop_scheduler().await?,
        SchedulerCommand::RunNow => client.run_scheduler_now().await?,
    };
    ctx.emit(&detail, |d| d.detail.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_poll_shows_every_unread_notification() {
        assert_eq!(new_unread(None, 3), 3);
        assert_eq!(new_unread(Some(3), 5), 2);
        assert_eq!(new_unread(Some(5), 1), 0);
    }

    #[test]
    fn unread_notifications_are_starred() {
        let item = NotificationItem {
            id: 4,
            kind: "auction_ending".into(),
            title: "終了間近".into(),
            message: "TH-32J300 残り1時間".into(),
            link_url: None,
            is_read: false,
            created_at: "2026-03-01T10:00:00".into(),
        };
        assert_eq!(
            notification_line(&item),
            "*#4 [2026-03-01T10:00:00] auction_ending 終了間近: TH-32J300 残り1時間"
        );
    }
}
