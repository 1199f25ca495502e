//! Plain-text rendering of the catalog for the terminal.
//!
//! Every piece of user-supplied text passes through `strip_control_chars`
//! before it reaches the output, since imported catalogs are untrusted.
use std::borrow::Cow;
use std::fmt::Write;

use crate::catalog::{App, FieldUpdate, ValidationErrors};
use crate::util::{pad_to_width, strip_control_chars};

const NAME_WIDTH: usize = 24;
const CATEGORY_WIDTH: usize = 10;
const STATUS_WIDTH: usize = 8;

const STAR: &str = "★";
const NO_STAR: &str = " ";

/// Date shown in listings.
pub fn format_date(app: &App) -> String {
    app.created_at.format("%Y-%m-%d").to_string()
}

/// Cleaned text for a single table cell: line breaks and tabs become spaces
/// so one app always occupies one row.
fn single_line(s: &str) -> Cow<'_, str> {
    match strip_control_chars(s) {
        Cow::Borrowed(b) if !b.contains(['\n', '\t']) => Cow::Borrowed(b),
        cleaned => Cow::Owned(cleaned.replace(['\n', '\t'], " ")),
    }
}

/// One listing row: star, icon, name, status, category, date, id.
pub fn list_row(app: &App) -> String {
    let star = if app.favorite { STAR } else { NO_STAR };
    let icon = single_line(&app.icon);
    let name = single_line(&app.name);
    let category = single_line(&app.category);

    format!(
        "{} {} {} {} {} {}  {}",
        star,
        pad_to_width(&icon, 2),
        pad_to_width(&name, NAME_WIDTH),
        pad_to_width(app.status.as_str(), STATUS_WIDTH),
        pad_to_width(&category, CATEGORY_WIDTH),
        format_date(app),
        single_line(&app.id),
    )
}

/// Full listing with footer.
///
/// `filtered` distinguishes "nothing matches" from "nothing stored" in the
/// empty-state hint.
pub fn list(apps: &[&App], filtered: bool) -> String {
    if apps.is_empty() {
        return if filtered {
            "No apps match the current filters.\n".to_string()
        } else {
            "No apps yet. Add one with `appshelf add`.\n".to_string()
        };
    }

    let mut out = String::new();
    for app in apps {
        out.push_str(&list_row(app));
        out.push('\n');
    }
    let noun = if apps.len() == 1 { "app" } else { "apps" };
    let _ = writeln!(out, "{} {} found", apps.len(), noun);
    out
}

/// All fields of one app.
pub fn detail(app: &App) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}{}",
        single_line(&app.icon),
        single_line(&app.name),
        if app.favorite { format!(" {STAR}") } else { String::new() }
    );
    let rows = [
        ("id", single_line(&app.id).into_owned()),
        ("category", single_line(&app.category).into_owned()),
        ("status", app.status.as_str().to_string()),
        ("url", single_line(&app.url).into_owned()),
        ("created", app.created_at.format("%Y-%m-%d %H:%M UTC").to_string()),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "  {:<9}{}", format!("{label}:"), value);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", strip_control_chars(&app.description));
    out
}

/// Comma-separated names of the fields an edit touches, e.g. `name, url`.
pub fn changed_fields(updates: &[FieldUpdate]) -> String {
    updates
        .iter()
        .map(|update| update.field().as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line per offending field, in field order.
pub fn validation_errors(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}\n"))
        .collect()
}
