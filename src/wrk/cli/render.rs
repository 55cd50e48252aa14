//! Turns a [`CmdResult`] into terminal text.
//!
//! Rendering is pure: it returns a string and reads the clock only through its `now`
//! argument, so output can be asserted on with colors switched off.

use super::styles::label_color;
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::fmt::Write;
use wrk::api::{CmdMessage, MessageLevel};
use wrk::commands::{CmdResult, CommentEntry, Heading, ListedEntity};
use wrk::model::{EntitySummary, Label};

/// Titles longer than this are cut with an ellipsis in listings.
const TITLE_WIDTH: usize = 72;

pub fn render(result: &CmdResult, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    if let Some(heading) = &result.heading {
        push_line(&mut out, &heading_line(heading));
    }
    if let Some(summary) = &result.described {
        push_summary(&mut out, summary);
    }
    for entry in &result.listed {
        push_listed(&mut out, entry);
    }
    for comment in &result.comments {
        push_comment(&mut out, comment, now);
    }
    for message in &result.messages {
        push_line(&mut out, &message_line(message));
    }
    out
}

fn push_line(out: &mut String, line: &str) {
    let _ = writeln!(out, "{}", line);
}

fn heading_line(heading: &Heading) -> String {
    format!("{} {}:", heading.label, heading.subject.bold())
}

fn message_line(message: &CmdMessage) -> String {
    match message.level {
        MessageLevel::Info => message.content.dimmed().to_string(),
        MessageLevel::Error => message.content.red().to_string(),
    }
}

/// `[closed] title [label] | id`
fn summary_line(summary: &EntitySummary, title: &str) -> String {
    let title = if summary.closed {
        format!("{}{}", "[closed] ".dimmed(), title)
    } else {
        title.bold().to_string()
    };
    format!(
        "{}{} {}",
        title,
        labels(&summary.labels),
        format!("| {}", summary.remote_id).dimmed()
    )
}

fn labels(labels: &[Label]) -> String {
    labels
        .iter()
        .filter_map(|label| {
            let text = label.text()?;
            let color = label_color(label.color.as_deref().unwrap_or_default());
            Some(format!(" {}", format!("[{}]", text).color(color)))
        })
        .collect()
}

fn push_summary(out: &mut String, summary: &EntitySummary) {
    push_line(out, &format!("  {}", summary_line(summary, &summary.title)));
    if let Some(description) = &summary.description {
        for line in description.lines() {
            push_line(out, &format!("    {}", line));
        }
    }
    for (label, value) in &summary.details {
        push_line(out, &format!("    {} {}", label.dimmed(), value));
    }
    if let Some(url) = &summary.url {
        push_line(out, &format!("    {}", url.dimmed()));
    }
}

fn push_listed(out: &mut String, entry: &ListedEntity) {
    let summary = &entry.summary;
    let title = console::truncate_str(&summary.title, TITLE_WIDTH, "…");
    push_line(
        out,
        &format!(
            "  {} {}",
            entry.short_id.to_string().yellow(),
            summary_line(summary, &title)
        ),
    );
    if let Some(url) = &summary.url {
        push_line(out, &format!("    {}", url.dimmed()));
    }
}

fn push_comment(out: &mut String, comment: &CommentEntry, now: DateTime<Utc>) {
    let mut header = format!(
        "  {} {}",
        comment.author.bold(),
        format!("({})", comment.username).dimmed()
    );
    if let Some(date) = comment.date {
        let _ = write!(header, " {}", time_ago(date, now).dimmed());
    }
    push_line(out, &header);
    for line in comment.text.lines() {
        push_line(out, &format!("    {}", line));
    }
}

fn time_ago(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(date).to_std().unwrap_or_default();
    timeago::Formatter::new().convert(elapsed)
}
