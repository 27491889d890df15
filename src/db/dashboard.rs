/// Monthly spending aggregates for the dashboard.
use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;

use super::transaction::{DATE_FORMAT, query_recent_transactions};
use crate::month::YearMonth;
use crate::types::{DashboardData, TopCategory, TrendPoint};

const TOP_CATEGORY_LIMIT: usize = 5;
const RECENT_LIMIT: usize = 5;

fn month_bounds(month: YearMonth) -> (NaiveDateTime, NaiveDateTime) {
    (
        month.first_day().and_time(chrono::NaiveTime::MIN),
        month.next().first_day().and_time(chrono::NaiveTime::MIN),
    )
}

fn bound_params(month: YearMonth) -> (String, String) {
    let (start, end) = month_bounds(month);
    (
        start.format(DATE_FORMAT).to_string(),
        end.format(DATE_FORMAT).to_string(),
    )
}

pub fn query_total_spent(month: YearMonth, conn: &Connection) -> rusqlite::Result<f64> {
    conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM transactions
         WHERE type = 'debit' AND txn_date >= ?1 AND txn_date < ?2",
        bound_params(month),
        |row| row.get(0),
    )
}

/// Debit totals keyed by `YYYY-MM-DD`.
fn query_daily_totals(month: YearMonth, conn: &Connection) -> rusqlite::Result<HashMap<String, f64>> {
    let mut stmt = conn.prepare(
        "SELECT substr(txn_date, 1, 10) AS day, SUM(amount) FROM transactions
         WHERE type = 'debit' AND txn_date >= ?1 AND txn_date < ?2
         GROUP BY day",
    )?;
    let rows = stmt.query_map(bound_params(month), |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
    })?;
    let mut totals = HashMap::new();
    for row in rows {
        let (day, amount) = row?;
        totals.insert(day, amount);
    }
    Ok(totals)
}

pub fn query_top_categories(
    month: YearMonth,
    limit: usize,
    conn: &Connection,
) -> rusqlite::Result<Vec<TopCategory>> {
    let (start, end) = bound_params(month);
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, SUM(t.amount) AS spent
         FROM transactions t
         JOIN categories c ON c.id = t.category_id
         WHERE t.type = 'debit' AND t.txn_date >= ?1 AND t.txn_date < ?2
         GROUP BY c.id, c.name
         ORDER BY spent DESC, c.name
         LIMIT ?3",
    )?;
    let rows = stmt.query_map((start, end, limit as i64), |row| {
        Ok(TopCategory {
            id: row.get(0)?,
            category: row.get(1)?,
            amount: row.get(2)?,
        })
    })?;
    let mut top = Vec::new();
    for row in rows {
        top.push(row?);
    }
    Ok(top)
}

/// Days of `month` that have elapsed as of `today`.
fn elapsed_days(month: YearMonth, today: NaiveDate) -> u32 {
    let current = YearMonth::containing(today);
    if month < current {
        month.days()
    } else if month == current {
        chrono::Datelike::day(&today)
    } else {
        0
    }
}

/// Builds the dashboard aggregate for `month`, counting debits only.
pub fn month_summary(
    month: YearMonth,
    today: NaiveDate,
    conn: &Connection,
) -> rusqlite::Result<DashboardData> {
    let total_spent = query_total_spent(month, conn)?;
    let previous_total = query_total_spent(month.prev(), conn)?;

    let elapsed = elapsed_days(month, today);
    let daily_average_spend = if elapsed == 0 {
        0.0
    } else {
        total_spent / f64::from(elapsed)
    };
    let projected_monthly_spend = daily_average_spend * f64::from(month.days());
    let percent_change_from_last_month = if previous_total > 0.0 {
        Some((total_spent - previous_total) / previous_total * 100.0)
    } else {
        None
    };

    let daily = query_daily_totals(month, conn)?;
    let spending_trend = (0..elapsed)
        .filter_map(|offset| {
            month
                .first_day()
                .checked_add_days(chrono::Days::new(u64::from(offset)))
        })
        .map(|day| {
            let date = day.format("%Y-%m-%d").to_string();
            let amount = daily.get(&date).copied().unwrap_or(0.0);
            TrendPoint { date, amount }
        })
        .collect();

    let (start, end) = month_bounds(month);
    Ok(DashboardData {
        total_spent,
        daily_average_spend,
        projected_monthly_spend,
        percent_change_from_last_month,
        spending_trend,
        top_spending_categories: query_top_categories(month, TOP_CATEGORY_LIMIT, conn)?,
        recent_transactions: query_recent_transactions(start, end, RECENT_LIMIT, conn)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_account, create_category, create_transaction, migrations};
    use crate::types::{AccountPayload, CategoryPayload, TransactionKind, TransactionPayload};

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrations::run_migrations(&conn).unwrap();
        create_account(
            &AccountPayload {
                name: "Wallet".to_string(),
                kind: "cash".to_string(),
                provider: "self".to_string(),
                account_number: None,
            },
            &conn,
        )
        .unwrap();
        conn
    }

    fn add_category(conn: &Connection, name: &str) -> i64 {
        create_category(
            &CategoryPayload {
                name: name.to_string(),
                icon_name: None,
                is_income: false,
            },
            conn,
        )
        .unwrap()
        .id
    }

    fn add_txn(
        conn: &Connection,
        date: &str,
        amount: f64,
        kind: TransactionKind,
        category_id: Option<i64>,
    ) {
        create_transaction(
            &TransactionPayload {
                txn_date: NaiveDateTime::parse_from_str(date, DATE_FORMAT).unwrap(),
                description: format!("txn {date}"),
                amount,
                kind,
                source: "manual".to_string(),
                account_id: 1,
                category_id,
            },
            conn,
        )
        .unwrap();
    }

    fn march() -> YearMonth {
        YearMonth::new(2025, 3).unwrap()
    }

    #[test]
    fn past_month_averages_over_every_day() {
        let conn = setup();
        let food = add_category(&conn, "Food");
        add_txn(&conn, "2025-03-02T09:00:00", 100.0, TransactionKind::Debit, Some(food));
        add_txn(&conn, "2025-03-20T09:00:00", 210.0, TransactionKind::Debit, None);
        add_txn(&conn, "2025-03-21T09:00:00", 5000.0, TransactionKind::Credit, None);

        let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let data = month_summary(march(), today, &conn).unwrap();

        assert_eq!(data.total_spent, 310.0);
        assert_eq!(data.daily_average_spend, 10.0);
        assert_eq!(data.projected_monthly_spend, 310.0);
        assert_eq!(data.spending_trend.len(), 31);
        assert_eq!(data.spending_trend[1].amount, 100.0);
        assert_eq!(data.spending_trend[0].amount, 0.0);
    }

    #[test]
    fn current_month_uses_days_so_far() {
        let conn = setup();
        add_txn(&conn, "2025-03-01T08:00:00", 50.0, TransactionKind::Debit, None);
        add_txn(&conn, "2025-03-10T08:00:00", 50.0, TransactionKind::Debit, None);

        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let data = month_summary(march(), today, &conn).unwrap();

        assert_eq!(data.daily_average_spend, 10.0);
        assert_eq!(data.projected_monthly_spend, 310.0);
        assert_eq!(data.spending_trend.len(), 10);
    }

    #[test]
    fn future_month_has_no_average() {
        let conn = setup();
        let today = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        let data = month_summary(march(), today, &conn).unwrap();
        assert_eq!(data.daily_average_spend, 0.0);
        assert!(data.spending_trend.is_empty());
    }

    #[test]
    fn percent_change_needs_previous_spending() {
        let conn = setup();
        add_txn(&conn, "2025-03-05T08:00:00", 150.0, TransactionKind::Debit, None);
        let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        assert_eq!(
            month_summary(march(), today, &conn)
                .unwrap()
                .percent_change_from_last_month,
            None
        );

        add_txn(&conn, "2025-02-05T08:00:00", 100.0, TransactionKind::Debit, None);
        let change = month_summary(march(), today, &conn)
            .unwrap()
            .percent_change_from_last_month
            .unwrap();
        assert!((change - 50.0).abs() < 1e-9);
    }

    #[test]
    fn top_categories_are_ranked_and_capped() {
        let conn = setup();
        for (i, name) in ["A", "B", "C", "D", "E", "F"].iter().enumerate() {
            let id = add_category(&conn, name);
            add_txn(
                &conn,
                "2025-03-03T08:00:00",
                10.0 * (i as f64 + 1.0),
                TransactionKind::Debit,
                Some(id),
            );
        }
        let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let top = month_summary(march(), today, &conn)
            .unwrap()
            .top_spending_categories;
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].category, "F");
        assert_eq!(top[4].category, "B");
    }

    #[test]
    fn recent_transactions_are_newest_first() {
        let conn = setup();
        for day in 1..=7 {
            add_txn(
                &conn,
                &format!("2025-03-{day:02}T08:00:00"),
                1.0,
                TransactionKind::Debit,
                None,
            );
        }
        add_txn(&conn, "2025-04-01T08:00:00", 1.0, TransactionKind::Debit, None);
        let today = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
        let recent = month_summary(march(), today, &conn)
            .unwrap()
            .recent_transactions;
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].description, "txn 2025-03-07T08:00:00");
        assert_eq!(recent[4].description, "txn 2025-03-03T08:00:00");
    }
}
