//! Quota command - daily analysis usage dashboard.

use super::{get_config, get_database};
use anyhow::Result;
use colored::Colorize;
use vidvoice_core::QuotaStore;
use vidvoice_db::DailyQuota;

fn open_store() -> Result<DailyQuota> {
    let config = get_config()?;
    let db = get_database()?;
    Ok(DailyQuota::new(db, config.analysis.daily_frame_limit))
}

pub fn show() -> Result<()> {
    let quota = open_store()?;
    let stats = quota.read();

    println!("{}", "Daily API Quota".cyan().bold());
    println!("{}", "─".repeat(50));

    let percent = if stats.limit > 0 {
        (stats.used as u64 * 100 / stats.limit as u64) as u32
    } else {
        0
    };
    let filled = (percent as usize * 30 / 100).min(30);
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(30 - filled));
    let bar = if percent > 90 { bar.red() } else { bar.green() };

    println!("  {} {}%", bar, percent);
    println!(
        "  {} / {} frames used, {} remaining",
        stats.used,
        stats.limit,
        if stats.remaining < 100 {
            stats.remaining.to_string().red()
        } else {
            stats.remaining.to_string().green()
        }
    );
    println!("  Resets at {}", stats.resets.dimmed());

    if stats.exhausted() {
        println!();
        println!(
            "{}",
            "The daily limit is used up. Come back tomorrow or run 'vidvoice quota reset'."
                .yellow()
        );
    }

    Ok(())
}

pub fn reset() -> Result<()> {
    let quota = open_store()?;
    quota.reset();

    let stats = quota.read();
    println!(
        "{} Quota reset: {} / {} frames used today.",
        "✓".green(),
        stats.used,
        stats.limit
    );
    Ok(())
}
