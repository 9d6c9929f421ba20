use chrono::Datelike;
use timeline_common::{ChartLayout, Event, GridPoint, MonthBucket, Tick};

/// Years divisible by this get a major tick.
pub const MAJOR_TICK_INTERVAL: i32 = 5;

/// Place every event on the chart grid.
///
/// Each bucket is a column; its events stack vertically, centred within the
/// tallest column. Odd-sized columns are centred as if they held one more
/// event, so columns of 3 and 4 start on the same row.
///
/// Returns the coordinate-annotated events in bucket order along with the
/// layout metadata.
pub fn layout_chart(buckets: Vec<MonthBucket>) -> (Vec<Event>, ChartLayout) {
    let rows = buckets.iter().map(MonthBucket::len).max().unwrap_or(0);
    let columns = buckets.len();

    let ticks: Vec<Tick> = buckets
        .iter()
        .filter(|b| b.month.month() == 1)
        .map(|b| {
            let year = b.month.year();
            Tick {
                label: year,
                x: b.x,
                major: year % MAJOR_TICK_INTERVAL == 0,
            }
        })
        .collect();

    let mut events = Vec::new();
    for bucket in buckets {
        let top = top_row(rows, bucket.len());
        let x = bucket.x as i64;
        for (i, mut event) in bucket.events.into_iter().enumerate() {
            event.x = x;
            event.y = top + i as i64;
            events.push(event);
        }
    }

    let data = events
        .iter()
        .map(|e| GridPoint {
            id: e.id.clone(),
            x: e.x,
            y: e.y,
        })
        .collect();

    let layout = ChartLayout {
        columns,
        rows,
        ticks,
        data,
    };
    (events, layout)
}

/// First row of a column holding `count` events. Floors toward negative
/// infinity, so a full odd column starts at -1.
fn top_row(rows: usize, count: usize) -> i64 {
    let padded = if count % 2 == 1 { count + 1 } else { count };
    (rows as i64 - padded as i64).div_euclid(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(id: &str, date: NaiveDate) -> Event {
        Event {
            id: id.into(),
            date,
            area: vec![],
            campaign: vec![],
            headline: String::new(),
            summary: String::new(),
            city: String::new(),
            country: vec![],
            region: vec![],
            target: vec![],
            sources: vec![],
            x: 0,
            y: 0,
        }
    }

    fn bucket(x: usize, year: i32, month: u32, count: usize) -> MonthBucket {
        let day = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
        MonthBucket {
            month: day,
            x,
            events: (0..count).map(|i| event(&format!("{x}-{i}"), day)).collect(),
        }
    }

    #[test]
    fn test_top_row_padding() {
        assert_eq!(top_row(6, 3), 1);
        assert_eq!(top_row(6, 4), 1);
        assert_eq!(top_row(6, 6), 0);
        assert_eq!(top_row(6, 0), 3);
        assert_eq!(top_row(3, 3), -1);
    }

    #[test]
    fn test_three_events_in_six_rows() {
        let buckets = vec![bucket(0, 2020, 1, 6), bucket(1, 2020, 2, 3)];
        let (events, layout) = layout_chart(buckets);

        assert_eq!(layout.rows, 6);
        assert_eq!(layout.columns, 2);
        let second: Vec<_> = events.iter().filter(|e| e.x == 1).map(|e| e.y).collect();
        assert_eq!(second, [1, 2, 3]);
        let first: Vec<_> = events.iter().filter(|e| e.x == 0).map(|e| e.y).collect();
        assert_eq!(first, [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_data_projects_coordinates() {
        let (events, layout) = layout_chart(vec![bucket(0, 2021, 3, 2)]);
        assert_eq!(layout.data.len(), events.len());
        assert_eq!(layout.data[1].id, events[1].id);
        assert_eq!((layout.data[1].x, layout.data[1].y), (0, 1));
    }

    #[test]
    fn test_ticks_only_in_january() {
        let buckets = vec![
            bucket(0, 2019, 12, 1),
            bucket(1, 2020, 1, 0),
            bucket(2, 2020, 2, 1),
            bucket(13, 2021, 1, 1),
        ];
        let (_, layout) = layout_chart(buckets);
        assert_eq!(
            layout.ticks,
            vec![
                Tick { label: 2020, x: 1, major: true },
                Tick { label: 2021, x: 13, major: false },
            ]
        );
    }

    #[test]
    fn test_empty_buckets() {
        let (events, layout) = layout_chart(Vec::new());
        assert!(events.is_empty());
        assert_eq!(layout, ChartLayout::default());
    }
}
