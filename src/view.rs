//! Text rendering of each screen. Pure functions of state; callers print.

use chrono::{Datelike, NaiveDate};
use colored::{ColoredString, Colorize};

use crate::catalog::{self, CATEGORIES};
use crate::models::{UserProfile, WorkoutSession, WorkoutVideo};
use crate::progress::{ProgressSummary, WEEK_TARGET};
use crate::router::Tab;
use crate::session::ActiveSession;
use crate::types::Theme;
use crate::utils::{format_file_size, format_minutes, progress_bar};

const HOME_QUOTES: [&str; 5] = [
    "You're stronger than you think! 💪",
    "Every rep counts! Keep pushing! 🔥",
    "Strong women lift each other up! 💕",
    "Progress, not perfection! ✨",
    "Your only competition is who you were yesterday! 🌟",
];

const PROFILE_QUOTES: [&str; 5] = [
    "Strong women lift each other up! 💕",
    "You are capable of amazing things! ✨",
    "Progress, not perfection! 🌟",
    "Your body can do it. It's your mind you need to convince! 💪",
    "Every workout is a step closer to your goals! 🎯",
];

const BEGINNER_TIPS: [&str; 5] = [
    "Start with 2-3 workouts per week",
    "Focus on form over weight",
    "Listen to your body and rest when needed",
    "Stay hydrated and get enough sleep",
    "Celebrate small victories! 🎉",
];

/// Sunday picks the first quote, Monday the second, and so on.
pub fn quote_of_the_day(quotes: &[&'static str], today: NaiveDate) -> &'static str {
    quotes[today.weekday().num_days_from_sunday() as usize % quotes.len()]
}

fn accent(s: &str, theme: Theme) -> ColoredString {
    match theme {
        Theme::Light => s.magenta().bold(),
        Theme::Dark => s.bright_magenta().bold(),
    }
}

/// One screen's worth of lines, newline-terminated.
fn screen(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn nav_bar(current: Tab, theme: Theme) -> String {
    Tab::ALL
        .iter()
        .map(|t| {
            if *t == current {
                accent(&format!("[{}]", t.label()), theme).to_string()
            } else {
                format!(" {} ", t.label()).dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn home(today: NaiveDate, theme: Theme) -> String {
    let mut lines = vec![
        accent("Hey Beautiful! 💕", theme).to_string(),
        "Ready to crush your workout today?".dimmed().to_string(),
        String::new(),
        format!("{} {}", "Daily Motivation:".cyan().bold(), quote_of_the_day(&HOME_QUOTES, today)),
        String::new(),
        "Choose Your Focus:".cyan().bold().to_string(),
    ];

    lines.extend(CATEGORIES.iter().map(|c| {
        format!(
            "  {} {} {} {}",
            c.emoji,
            c.name.bold(),
            format!("({})", c.id).yellow(),
            format!("- {}", c.description).dimmed()
        )
    }));

    lines.push(String::new());
    lines.push(format!(
        "{} Start with lighter weights and focus on proper form. \
         It's better to do fewer reps correctly than many reps incorrectly!",
        "💡 Beginner Tip:".cyan().bold()
    ));
    screen(lines)
}

pub fn workout(session: &ActiveSession, theme: Theme) -> String {
    let mut lines = vec![
        accent(&format!("{} Workout", catalog::display_name(&session.category)), theme).to_string(),
    ];

    let Some(category) = session.category() else {
        lines.push("  (unknown category)".dimmed().to_string());
        return screen(lines);
    };

    lines.push(format!(
        "{} {}/{} sets {}",
        "Progress:".cyan().bold(),
        session.completed_sets_count(),
        session.total_sets(),
        progress_bar(session.progress_percentage(), None).green()
    ));
    lines.push(String::new());

    for (i, e) in category.exercises.iter().enumerate() {
        let done = session.completed_for(e.id);
        let is_active = session.current_exercise.as_deref() == Some(e.id);
        let badge = format!("{}/{} sets", done, e.sets);
        let badge = if done >= e.sets { badge.green().bold() } else { badge.normal() };
        let marker = if is_active { "▶".yellow().bold() } else { " ".normal() };

        lines.push(format!(
            "{} {} • {} {} {}",
            marker,
            format!("{}", i + 1).yellow(),
            e.name.bold(),
            format!("({})", e.id).dimmed(),
            badge
        ));
        lines.push(format!("      {}", e.description));
        lines.push(format!(
            "      {} {}   {} {}s",
            "reps:".dimmed(),
            e.reps,
            "rest:".dimmed(),
            e.rest_time
        ));
        if is_active {
            lines.push(format!("      {} {}", "tip:".cyan(), e.tips));
            if done > 0 {
                let dots: String = (0..e.sets).map(|i| if i < done { '●' } else { '○' }).collect();
                lines.push(format!("      {}", dots.green()));
            }
        }
    }

    if session.is_complete() {
        lines.push(String::new());
        lines.push(accent("Workout Complete! 🎉", theme).to_string());
        lines.push("Amazing job! You crushed it today!".to_string());
        lines.push(format!(
            "{} Don't forget to stretch! Hold each stretch for 15-30 seconds to help your muscles recover.",
            "Cool Down Reminder:".cyan().bold()
        ));
    }
    screen(lines)
}

pub fn progress(summary: &ProgressSummary, theme: Theme) -> String {
    let mut lines = vec![
        accent("Your Progress", theme).to_string(),
        String::new(),
        format!("{}: {}", "Total workouts".cyan().bold(), summary.total_workouts),
        format!("{}: {} days", "Day streak".cyan().bold(), summary.streak),
        format!(
            "{}: {}/{} {}",
            "This week".cyan().bold(),
            summary.this_week_workouts,
            WEEK_TARGET,
            progress_bar(summary.week_percentage(), None).green()
        ),
    ];

    if !summary.category_stats.is_empty() {
        lines.push(String::new());
        lines.push("Workout categories:".cyan().bold().to_string());
        for (category, count) in &summary.category_stats {
            lines.push(format!("  {}: {} workouts", catalog::display_name(category).bold(), count));
        }
    }

    lines.push(String::new());
    lines.push("Achievements:".cyan().bold().to_string());
    for a in &summary.achievements {
        let mark = if a.earned { "★".yellow().bold() } else { "☆".dimmed() };
        let title = if a.earned { a.title.bold() } else { a.title.dimmed() };
        lines.push(format!("  {} {} {}", mark, title, format!("- {}", a.description).dimmed()));
    }
    screen(lines)
}

pub fn profile(profile: &UserProfile, total_workouts: usize, today: NaiveDate, theme: Theme) -> String {
    let greeting = if profile.name.is_empty() {
        "Welcome to FitGirl!".to_string()
    } else {
        format!("Hi, {}!", profile.name)
    };
    let or_unset = |s: &str| {
        if s.is_empty() { "(not set)".dimmed().to_string() } else { s.to_string() }
    };

    let mut lines = vec![
        accent(&greeting, theme).to_string(),
        quote_of_the_day(&PROFILE_QUOTES, today).dimmed().to_string(),
        String::new(),
        "Profile Information:".cyan().bold().to_string(),
        format!("  {}: {}", "Name".green(), or_unset(&profile.name)),
        format!("  {}: {}", "Goal".green(), or_unset(&profile.goal)),
        format!("  {}: {}", "Level".green(), profile.level),
        format!("  {}: {}", "Favorite workout".green(), or_unset(&profile.favorite_workout)),
    ];
    if let Some(url) = &profile.profile_picture {
        lines.push(format!("  {}: {}", "Picture".green(), url));
    }

    let favorite = if profile.favorite_workout.is_empty() { "Not set" } else { profile.favorite_workout.as_str() };
    lines.push(String::new());
    lines.push("Quick stats:".cyan().bold().to_string());
    lines.push(format!("  {} workouts completed", total_workouts));
    lines.push(format!("  favorite: {}", favorite));

    lines.push(String::new());
    lines.push("Beginner tips:".cyan().bold().to_string());
    lines.extend(BEGINNER_TIPS.iter().map(|tip| format!("  • {}", tip)));
    screen(lines)
}

pub fn history(sessions: &[WorkoutSession]) -> String {
    if sessions.is_empty() {
        return screen(vec!["  (no workouts recorded yet)".dimmed().to_string()]);
    }

    let mut lines = vec!["Recent workouts:".cyan().bold().to_string()];
    lines.extend(sessions.iter().rev().map(|s| {
        format!(
            "  {} {}: {}/{} sets in {}",
            s.date.green(),
            s.category_name.bold(),
            s.completed_sets,
            s.total_sets,
            format_minutes(s.duration)
        )
    }));
    screen(lines)
}

pub fn videos(videos: &[WorkoutVideo]) -> String {
    if videos.is_empty() {
        return screen(vec!["  (no workout videos uploaded yet)".dimmed().to_string()]);
    }

    let mut lines = vec!["Workout videos:".cyan().bold().to_string()];
    for v in videos {
        lines.push(format!("  {} {}", v.title.bold(), format!("[{}]", v.id).dimmed()));
        lines.push(format!("    {} • {}", v.upload_date, format_file_size(v.size)));
        lines.push(format!("    {}", v.url.underline()));
    }
    screen(lines)
}
