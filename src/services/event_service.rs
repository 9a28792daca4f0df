use chrono::NaiveDate;

use crate::{
    dto::events::{EventListResponse, EventQuery},
    models::Event,
};

const CATALOG: &[(i32, &str, (i32, u32, u32), &str, &str, i64)] = &[
    (
        1,
        "Summer Music Festival",
        (2026, 7, 22),
        "Hyde Park, London",
        "Music",
        50,
    ),
    (
        2,
        "Tech Innovators Conference",
        (2026, 9, 15),
        "Manchester Central Convention Complex",
        "Conference",
        75,
    ),
    (
        3,
        "London Marathon",
        (2027, 4, 25),
        "London, United Kingdom",
        "Sports",
        40,
    ),
];

pub fn catalog() -> Vec<Event> {
    CATALOG
        .iter()
        .filter_map(|&(id, name, (y, m, d), location, category, price)| {
            Some(Event {
                id,
                name: name.to_string(),
                date: NaiveDate::from_ymd_opt(y, m, d)?,
                location: location.to_string(),
                category: category.to_string(),
                price,
            })
        })
        .collect()
}

pub fn list_events(query: &EventQuery) -> EventListResponse {
    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
        .map(str::to_lowercase);
    let needle = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let events = catalog()
        .into_iter()
        .filter(|e| {
            category
                .as_ref()
                .is_none_or(|c| e.category.to_lowercase() == *c)
        })
        .filter(|e| {
            needle.as_ref().is_none_or(|n| {
                e.name.to_lowercase().contains(n) || e.location.to_lowercase().contains(n)
            })
        })
        .collect();

    EventListResponse {
        success: true,
        events,
    }
}
