use chrono::{DateTime, Utc};
use console::{Color, style};
use std::time::Duration;

use portfolio_feedback::common::Comment;
use portfolio_feedback::feedback::{FeedbackViewModel, SyncState, Tracked};

fn format_time_ago(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    if total_seconds < 60 {
        return format!(
            "{} second{}",
            total_seconds,
            if total_seconds == 1 { "" } else { "s" }
        );
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" });
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{} hour{}", hours, if hours == 1 { "" } else { "s" });
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{} day{}", days, if days == 1 { "" } else { "s" });
    }

    let months = days / 30;
    if months < 12 {
        return format!("{} month{}", months, if months == 1 { "" } else { "s" });
    }

    let years = months / 12;
    format!("{} year{}", years, if years == 1 { "" } else { "s" })
}

fn truncate_to_first_paragraph(text: &str) -> (String, Option<usize>) {
    if text.is_empty() {
        return (String::new(), None);
    }

    let paragraphs: Vec<&str> = text.split("\n\n").collect();

    if paragraphs.len() <= 1 {
        return (text.to_string(), None);
    }

    let first_paragraph = paragraphs[0].trim();
    let remaining_text = paragraphs[1..].join("\n\n");
    let remaining_words = remaining_text.split_whitespace().count();

    if remaining_words > 0 {
        (first_paragraph.to_string(), Some(remaining_words))
    } else {
        (first_paragraph.to_string(), None)
    }
}

fn format_when(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(timestamp) => {
            let since = Utc::now() - timestamp;
            format!(
                "{} ago ({})",
                format_time_ago(since.to_std().unwrap_or_default()),
                timestamp.format("%Y-%m-%d %H:%M")
            )
        }
        None => style("undated").dim().to_string(),
    }
}

pub fn format_stars(count: u8) -> String {
    let filled = usize::from(count.min(5));
    format!(
        "{}{}",
        style("★".repeat(filled)).fg(Color::Yellow),
        style("☆".repeat(5 - filled)).dim()
    )
}

pub fn format_rating_summary(view_model: &FeedbackViewModel) -> String {
    format!(
        "Rating: {} (from {})",
        style(view_model.average_rating()).bold(),
        view_model.voter_label()
    )
}

pub fn format_comment(entry: &Tracked<Comment>, compact: bool) -> String {
    let comment = &entry.record;
    let mut output = String::new();

    let avatar = comment
        .initial()
        .map(|c| style(format!("[{}]", c)).bold().cyan().to_string())
        .unwrap_or_default();
    let marker = match entry.state {
        SyncState::Pending => format!(" {}", style("(sending)").dim()),
        SyncState::Failed => format!(" {}", style("(not saved)").red()),
        SyncState::Confirmed | SyncState::Unsynced => String::new(),
    };

    output.push_str(&format!(
        "{} {}, {}{}\n",
        avatar,
        style(&comment.name).green(),
        format_when(comment.timestamp),
        marker
    ));

    if compact {
        let (first_paragraph, remaining_words) = truncate_to_first_paragraph(&comment.comment);
        output.push_str(&format!("    {}\n", first_paragraph));
        if let Some(word_count) = remaining_words {
            output.push_str(&format!(
                "    {}\n",
                style(format!("[{} more words]", word_count)).dim()
            ));
        }
    } else {
        for line in comment.comment.lines() {
            output.push_str(&format!("    {}\n", line));
        }
    }

    output
}

pub fn format_comments(view_model: &FeedbackViewModel, limit: Option<usize>, compact: bool) -> String {
    let comments = view_model.comments();
    if comments.is_empty() {
        return format!(
            "{}\n",
            style("No comments yet. Be the first to share your thoughts!").dim()
        );
    }

    let shown = limit.unwrap_or(comments.len()).min(comments.len());
    let mut output = String::new();
    for entry in &comments[..shown] {
        output.push_str(&format_comment(entry, compact));
    }
    if shown < comments.len() {
        output.push_str(&format!(
            "{}\n",
            style(format!("[{} older comments not shown]", comments.len() - shown)).dim()
        ));
    }
    output
}

pub fn success_message(message: &str) -> String {
    format!("{} {}", style("✓").green().bold(), message)
}

pub fn error_message(message: &str) -> String {
    format!("{} {}", style("✗").red().bold(), message)
}

pub fn warning_message(message: &str) -> String {
    format!("{} {}", style("⚠").yellow().bold(), message)
}

pub fn info_message(message: &str) -> String {
    format!("{} {}", style("ℹ").blue().bold(), message)
}
