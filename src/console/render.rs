use comfy_table::presets::{UTF8_FULL_CONDENSED, UTF8_HORIZONTAL_ONLY};
use comfy_table::{Cell, Color, ContentArrangement, Table};

use crate::browser::{AssetFeed, FeedSnapshot, UserFeed};
use crate::models::{AssetEventType, AuditSummary, TIMESTAMP_FORMAT, UserEventType};
use crate::navigation::Route;
use crate::theme::ThemeMode;

/// Colours for the current theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub header: Color,
    pub muted: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Palette {
                header: Color::DarkBlue,
                muted: Color::DarkGrey,
                error: Color::DarkRed,
            },
            ThemeMode::Dark => Palette {
                header: Color::Cyan,
                muted: Color::Grey,
                error: Color::Red,
            },
        }
    }
}

fn table(mode: ThemeMode) -> Table {
    let mut table = Table::new();
    table.load_preset(match mode {
        ThemeMode::Light => UTF8_HORIZONTAL_ONLY,
        ThemeMode::Dark => UTF8_FULL_CONDENSED,
    });
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header(table: &mut Table, palette: Palette, names: &[&str]) {
    table.set_header(names.iter().map(|n| Cell::new(n).fg(palette.header)));
}

pub fn user_event_color(t: &UserEventType) -> Color {
    match t {
        UserEventType::UserCreated => Color::Green,
        UserEventType::UserDeactivated => Color::Red,
        UserEventType::UserReactivated => Color::Blue,
        UserEventType::RoleChanged => Color::Magenta,
        UserEventType::RequestCreated => Color::Yellow,
        UserEventType::RequestApproved => Color::DarkGreen,
        UserEventType::RequestDenied => Color::DarkYellow,
        UserEventType::PasswordChanged => Color::Grey,
        UserEventType::Other(_) => Color::Reset,
    }
}

pub fn asset_event_color(t: &AssetEventType) -> Color {
    match t {
        AssetEventType::Create => Color::Green,
        AssetEventType::Assign => Color::Blue,
        AssetEventType::Return => Color::DarkYellow,
        AssetEventType::Move => Color::Magenta,
        AssetEventType::Update => Color::DarkCyan,
        AssetEventType::Other(_) => Color::Reset,
    }
}

pub fn summary(summary: &AuditSummary, mode: ThemeMode) -> String {
    let palette = Palette::for_mode(mode);
    let mut t = table(mode);
    header(&mut t, palette, &["Metric", "Value", "Detail"]);

    t.add_row(vec![
        Cell::new("Users"),
        Cell::new(summary.total_users),
        Cell::new(format!(
            "{} active, {} inactive",
            summary.active_users, summary.inactive_users
        )),
    ]);
    t.add_row(vec![
        Cell::new("Assets"),
        Cell::new(summary.total_assets),
        Cell::new(format!(
            "{} HW, {} SW",
            summary.hardware_count, summary.software_count
        )),
    ]);
    t.add_row(vec![
        Cell::new("Asset status"),
        Cell::new(""),
        Cell::new(format!(
            "{} in stock, {} assigned, {} retired",
            summary.in_stock_assets, summary.assigned_assets, summary.retired_assets
        )),
    ]);
    t.add_row(vec![
        Cell::new("Software seats"),
        Cell::new(format!("{}%", summary.seat_utilization_percent())),
        Cell::new(format!(
            "{} used / {} total, {} available",
            summary.software_seats_used,
            summary.software_seats_total,
            summary.software_seats_available
        )),
    ]);
    t.add_row(vec![
        Cell::new("User events"),
        Cell::new(summary.user_events_week),
        Cell::new(format!(
            "{} today / {} this week",
            summary.user_events_today, summary.user_events_week
        )),
    ]);
    t.add_row(vec![
        Cell::new("Asset events"),
        Cell::new(summary.asset_events_week),
        Cell::new(format!(
            "{} today / {} this week",
            summary.asset_events_today, summary.asset_events_week
        )),
    ]);

    t.to_string()
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

pub fn user_events(feed: &FeedSnapshot<UserFeed>, mode: ThemeMode) -> String {
    let palette = Palette::for_mode(mode);
    let mut t = table(mode);
    header(
        &mut t,
        palette,
        &["Timestamp", "Event", "Target User", "Actor", "Change", "Notes"],
    );

    for e in &feed.items {
        let change = match (&e.old_value, &e.new_value) {
            (None, None) => "-".to_string(),
            (old, new) => format!("{} -> {}", opt(old), opt(new)),
        };
        t.add_row(vec![
            Cell::new(e.timestamp.format(TIMESTAMP_FORMAT)),
            Cell::new(e.event_type.label()).fg(user_event_color(&e.event_type)),
            Cell::new(opt(&e.target_user_name)),
            Cell::new(opt(&e.actor_user_name)),
            Cell::new(change),
            Cell::new(opt(&e.notes)),
        ]);
    }

    let filter = feed
        .filters
        .event_type
        .as_ref()
        .map(|t| t.label())
        .unwrap_or_else(|| "All Event Types".to_string());
    format!(
        "{t}\n{}",
        footer(feed.items.len(), &feed.filters.search, &filter, feed.has_more, feed.is_loading)
    )
}

pub fn asset_events(feed: &FeedSnapshot<AssetFeed>, mode: ThemeMode) -> String {
    let palette = Palette::for_mode(mode);
    let mut t = table(mode);
    header(
        &mut t,
        palette,
        &["Timestamp", "Asset", "Event", "From", "To", "Actor", "Notes"],
    );

    for e in &feed.items {
        let from = join_pair(&e.from_user_name, &e.from_location_name);
        let to = join_pair(&e.to_user_name, &e.to_location_name);
        t.add_row(vec![
            Cell::new(e.timestamp.format(TIMESTAMP_FORMAT)),
            Cell::new(&e.asset_tag),
            Cell::new(e.event_type.label()).fg(asset_event_color(&e.event_type)),
            Cell::new(from),
            Cell::new(to),
            Cell::new(opt(&e.actor_user_name)),
            Cell::new(opt(&e.notes)),
        ]);
    }

    let filter = feed
        .filters
        .event_type
        .as_ref()
        .map(|t| t.label())
        .unwrap_or_else(|| "All Event Types".to_string());
    format!(
        "{t}\n{}",
        footer(feed.items.len(), &feed.filters.search, &filter, feed.has_more, feed.is_loading)
    )
}

fn join_pair(user: &Option<String>, location: &Option<String>) -> String {
    match (user.as_deref(), location.as_deref()) {
        (Some(u), Some(l)) => format!("{u} @ {l}"),
        (Some(u), None) => u.to_string(),
        (None, Some(l)) => l.to_string(),
        (None, None) => "-".to_string(),
    }
}

fn footer(count: usize, search: &str, filter: &str, has_more: bool, loading: bool) -> String {
    let mut line = format!("showing {count} | type: {filter}");
    if !search.is_empty() {
        line.push_str(&format!(" | search: \"{search}\""));
    }
    if loading {
        line.push_str(" | Loading...");
    } else if has_more {
        line.push_str(&format!(" | 'more' for next page (showing {count})"));
    }
    line
}

pub fn failure(message: &str, recovery: &Route, mode: ThemeMode) -> String {
    let palette = Palette::for_mode(mode);
    let mut t = table(mode);
    t.set_header(vec![Cell::new("Error").fg(palette.error)]);
    t.add_row(vec![Cell::new(message)]);
    t.add_row(vec![Cell::new(format!("Go to Login ({recovery}): run 'login'")).fg(palette.muted)]);
    t.to_string()
}
