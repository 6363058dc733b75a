use chrono::TimeZone;
use minijinja::{context, Environment};
use serde::Serialize;
use std::fmt::Display;

use crate::core::range::TimeRange;

/// A free range as shown to the user, in local time.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct Slot {
    date: String,
    weekday: String,
    start: String,
    end: String,
    minutes: i64,
}

impl Slot {
    pub fn from_range<Z>(range: &TimeRange, tz: &Z) -> Self
    where
        Z: TimeZone,
        Z::Offset: Display,
    {
        let start = range.start().with_timezone(tz);
        let end = range.end().with_timezone(tz);

        Self {
            date: start.format("%Y-%m-%d").to_string(),
            weekday: start.format("%A").to_string(),
            start: start.format("%H:%M").to_string(),
            end: end.format("%H:%M").to_string(),
            minutes: range.duration().num_minutes(),
        }
    }
}

pub fn generate(template: &str, slots: Vec<Slot>, lookahead_days: u32) -> anyhow::Result<String> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);

    env.add_template("slots", template)?;
    let tmpl = env.get_template("slots")?;

    let rendered = tmpl.render(context! {
        slots => slots,
        lookahead_days => lookahead_days,
    })?;

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::templates::slots::{LIST, TABLE};
    use chrono::{FixedOffset, Utc};

    fn cst() -> FixedOffset {
        FixedOffset::west_opt(6 * 3600).unwrap()
    }

    fn range(d: u32, start: (u32, u32), end: (u32, u32)) -> TimeRange {
        let tz = cst();
        TimeRange::new(
            tz.with_ymd_and_hms(2025, 3, d, start.0, start.1, 0)
                .unwrap()
                .with_timezone(&Utc),
            tz.with_ymd_and_hms(2025, 3, d, end.0, end.1, 0)
                .unwrap()
                .with_timezone(&Utc),
        )
        .unwrap()
    }

    #[test]
    fn test_slot_from_range_uses_local_time() {
        let slot = Slot::from_range(&range(17, (10, 0), (12, 30)), &cst());

        assert_eq!(
            slot,
            Slot {
                date: "2025-03-17".to_string(),
                weekday: "Monday".to_string(),
                start: "10:00".to_string(),
                end: "12:30".to_string(),
                minutes: 150,
            }
        );
    }

    #[test]
    fn test_generate_table() -> anyhow::Result<()> {
        let slots = vec![
            Slot::from_range(&range(17, (10, 0), (12, 0)), &cst()),
            Slot::from_range(&range(17, (13, 0), (18, 0)), &cst()),
        ];

        let rendered = generate(TABLE, slots, 3)?;

        let expected = "| Day | Date | Start | End | Minutes |
|-----|------|-------|-----|---------|
| Monday | 2025-03-17 | 10:00 | 12:00 | 120 |
| Monday | 2025-03-17 | 13:00 | 18:00 | 300 |
";
        assert_eq!(rendered, expected);

        Ok(())
    }

    #[test]
    fn test_generate_table_without_slots() -> anyhow::Result<()> {
        let rendered = generate(TABLE, vec![], 3)?;

        assert!(rendered.contains("(No free time in the next 3 workdays)"));

        Ok(())
    }

    #[test]
    fn test_generate_list() -> anyhow::Result<()> {
        let slots = vec![Slot::from_range(&range(18, (15, 0), (16, 45)), &cst())];

        let rendered = generate(LIST, slots, 2)?;

        assert_eq!(
            rendered,
            "Free time over the next 2 workdays:\n- Tuesday 2025-03-18: 15:00 - 16:45\n"
        );

        Ok(())
    }
}
