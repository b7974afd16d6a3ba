// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::DateRange;
use crate::session::Session;
use crate::utils::{fmt_money, parse_decimal, pretty_table};
use anyhow::{Context, Result};
use chrono::NaiveDate;

pub fn handle(session: &mut Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let year = *sub.get_one::<i32>("year").unwrap();
            let month = *sub.get_one::<u32>("month").unwrap();
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            session.set_monthly_goal(year, month, amount)?;
            println!("Goal for {}-{:02} set to {}", year, month, amount);
        }
        Some(("set-year", sub)) => {
            let year = *sub.get_one::<i32>("year").unwrap();
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            session.set_yearly_goal(year, amount)?;
            println!("Goal for {} set to {} (spread over 12 months)", year, amount);
        }
        Some(("show", sub)) => show(session, sub)?,
        _ => {}
    }
    Ok(())
}

fn period(year: i32, month: Option<u32>) -> Result<DateRange> {
    let (start, end) = match month {
        Some(m) => {
            let start = NaiveDate::from_ymd_opt(year, m, 1)
                .with_context(|| format!("Invalid month {}-{}", year, m))?;
            let next = if m == 12 {
                NaiveDate::from_ymd_opt(year + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(year, m + 1, 1)
            }
            .with_context(|| format!("Invalid month {}-{}", year, m))?;
            (start, next.pred_opt().unwrap_or(next))
        }
        None => (
            NaiveDate::from_ymd_opt(year, 1, 1).with_context(|| format!("Invalid year {}", year))?,
            NaiveDate::from_ymd_opt(year, 12, 31)
                .with_context(|| format!("Invalid year {}", year))?,
        ),
    };
    Ok(DateRange::between(start, end))
}

/// Goal versus realized profit for a month or a whole year.
fn show(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let year = *sub.get_one::<i32>("year").unwrap();
    let month = sub.get_one::<u32>("month").copied();
    let goal = match month {
        Some(m) => session.monthly_goal(year, m)?,
        None => session.yearly_goal(year)?,
    };
    let actual = session.aggregate_total(&period(year, month)?, None)?;
    let label = match month {
        Some(m) => format!("{}-{:02}", year, m),
        None => year.to_string(),
    };
    let ccy = &session.config().base_currency;
    let rows = vec![vec![
        label,
        fmt_money(&goal, ccy),
        fmt_money(&actual, ccy),
        fmt_money(&(actual - goal), ccy),
    ]];
    println!(
        "{}",
        pretty_table(&["Period", "Goal", "Realized", "Difference"], rows)
    );
    Ok(())
}
