use crate::duration::{format_minutes, parse_duration};
use crate::error::{Result, WeeklogError};
use crate::models::Issue;
use crate::week::WeeklySummary;
use chrono::{Duration, Local, NaiveDate};
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, FuzzySelect, Input, Select};

/// Prompt user to select an issue from their assigned work
pub fn prompt_issue_selection(issues: &[Issue]) -> Result<&Issue> {
    if issues.is_empty() {
        return Err(WeeklogError::NoIssuesFound);
    }

    // Build display items
    let items: Vec<String> = issues
        .iter()
        .map(|issue| format!("{} - {} ({})", issue.key, issue.summary, issue.project))
        .collect();

    let selection = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select issue (type to search)")
        .items(&items)
        .default(0)
        .interact()
        .map_err(|_| WeeklogError::UserCancelled)?;

    Ok(&issues[selection])
}

/// Prompt for time spent with live validation
pub fn prompt_time_spent() -> Result<u32> {
    let time_str: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Time spent (e.g. 2h 30m)")
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            match parse_duration(input.trim()) {
                Ok(0) => Err("Time spent must be greater than zero".to_string()),
                Ok(_) => Ok(()),
                Err(e) => Err(e.to_string()),
            }
        })
        .interact_text()
        .map_err(|_| WeeklogError::UserCancelled)?;

    parse_duration(time_str.trim())
}

/// Prompt user to select a date for the worklog
pub fn prompt_started_date() -> Result<NaiveDate> {
    let today = Local::now().date_naive();

    // Build list of recent dates
    let mut items = Vec::new();
    items.push(format!("Today ({})", today.format("%Y-%m-%d")));
    items.push(format!(
        "Yesterday ({})",
        (today - Duration::days(1)).format("%Y-%m-%d")
    ));

    for i in 2..=6 {
        let date = today - Duration::days(i);
        items.push(format!("{} days ago ({})", i, date.format("%Y-%m-%d")));
    }

    items.push("Custom date...".to_string());

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select date for the worklog")
        .items(&items)
        .default(0)
        .interact()
        .map_err(|_| WeeklogError::UserCancelled)?;

    if selection == 7 {
        prompt_custom_date()
    } else {
        Ok(today - Duration::days(selection as i64))
    }
}

/// Prompt for custom date input with validation
fn prompt_custom_date() -> Result<NaiveDate> {
    let today = Local::now().date_naive();
    let min_date = today - Duration::days(90); // 90 days back limit

    let date_str: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter date (YYYY-MM-DD)")
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            match NaiveDate::parse_from_str(input, "%Y-%m-%d") {
                Ok(date) => {
                    if date > today {
                        Err("Date cannot be in the future")
                    } else if date < min_date {
                        Err("Date must be within the last 90 days")
                    } else {
                        Ok(())
                    }
                }
                Err(_) => Err("Invalid date format. Use YYYY-MM-DD (e.g., 2026-08-20)"),
            }
        })
        .interact_text()
        .map_err(|_| WeeklogError::UserCancelled)?;

    NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| WeeklogError::InvalidDate(date_str))
}

/// Prompt for an optional worklog comment
pub fn prompt_comment() -> Result<Option<String>> {
    let comment: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Comment (optional)")
        .allow_empty(true)
        .interact_text()
        .map_err(|_| WeeklogError::UserCancelled)?;

    let comment = comment.trim().to_string();
    if comment.is_empty() {
        Ok(None)
    } else {
        Ok(Some(comment))
    }
}

/// Confirm worklog submission with full details
pub fn confirm_submission(
    issue_key: &str,
    summary: Option<&str>,
    minutes: u32,
    date: Option<NaiveDate>,
    comment: Option<&str>,
) -> Result<bool> {
    println!();
    println!("{}", style("=".repeat(60)).cyan().bold());
    println!("{}", style("Worklog Summary").cyan().bold());
    println!("{}", style("=".repeat(60)).cyan().bold());
    println!("Issue:      {}", style(issue_key).white());
    if let Some(summary) = summary {
        println!("Summary:    {}", style(summary).white());
    }
    println!(
        "Time spent: {}",
        style(format_minutes(minutes)).green().bold()
    );
    if let Some(date) = date {
        println!("Date:       {}", style(date.format("%Y-%m-%d")).white());
    }
    if let Some(comment) = comment {
        println!("Comment:    {}", style(comment).white());
    }
    println!("{}", style("=".repeat(60)).cyan().bold());
    println!();

    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Log this work?")
        .default(true)
        .interact()
        .map_err(|_| WeeklogError::UserCancelled)
}

/// Render the weekly total with the per-issue table underneath
pub fn display_week_summary(summary: &WeeklySummary) {
    if summary.by_issue.is_empty() {
        display_info("No assigned issues found.");
        return;
    }

    println!();
    println!(
        "Time worked so far this week: {}",
        style(format_minutes(summary.total_minutes)).green().bold()
    );
    println!();

    println!(
        "{}",
        style(format!(
            "{:<8} {:<12} {:<44} {:<16} {:>10}",
            "ID", "Key", "Summary", "Project", "Time"
        ))
        .bold()
    );
    println!("{}", style("-".repeat(92)).dim());

    for issue in &summary.by_issue {
        println!(
            "{:<8} {:<12} {:<44} {:<16} {:>10}",
            issue.id,
            issue.key,
            truncate(&issue.summary, 42),
            truncate(&issue.project, 14),
            format_minutes(issue.minutes_this_week)
        );
    }
}

/// Display a success message
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), style(message).green());
}

/// Display an info message
pub fn display_info(message: &str) {
    println!("{} {}", style("ℹ").cyan().bold(), style(message).cyan());
}

/// Display a warning message
pub fn display_warning(message: &str) {
    println!("{} {}", style("⚠").yellow().bold(), style(message).yellow());
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
