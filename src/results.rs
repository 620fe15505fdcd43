use crate::app_dirs::AppDirs;
use crate::config::TestSettings;
use crate::session::TestSummary;
use chrono::Local;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub fn wpm_rating(wpm: f64) -> &'static str {
    if wpm >= 70.0 {
        "Excellent"
    } else if wpm >= 50.0 {
        "Good"
    } else if wpm >= 30.0 {
        "Average"
    } else {
        "Needs Practice"
    }
}

pub fn accuracy_rating(accuracy: f64) -> &'static str {
    if accuracy >= 95.0 {
        "Perfect"
    } else if accuracy >= 85.0 {
        "Great"
    } else if accuracy >= 75.0 {
        "Good"
    } else {
        "Needs Work"
    }
}

pub fn share_text(summary: &TestSummary) -> String {
    format!(
        "I just completed a typing test on keystroke!\n\nSpeed: {} WPM\nAccuracy: {}%\n\nTry it yourself!",
        summary.wpm, summary.accuracy
    )
}

pub fn tweet_url(summary: &TestSummary) -> String {
    format!(
        "https://twitter.com/intent/tweet?text={}%20wpm%20%2F%20{}%25%20acc%20on%20keystroke",
        summary.wpm, summary.accuracy
    )
}

#[derive(Serialize)]
struct ResultsExport {
    timestamp: String,
    #[serde(flatten)]
    summary: TestSummary,
}

/// Write the summary as a dated JSON file into `dir` and return its path.
pub fn export_json_to(dir: &Path, summary: &TestSummary) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let export = ResultsExport {
        timestamp: Local::now().to_rfc3339(),
        summary: *summary,
    };
    let path = dir.join(format!(
        "keystroke-results-{}.json",
        Local::now().format("%Y-%m-%d")
    ));

    let data = serde_json::to_vec_pretty(&export).unwrap_or_default();
    std::fs::write(&path, data)?;
    Ok(path)
}

pub fn export_json(summary: &TestSummary) -> io::Result<PathBuf> {
    let dir = AppDirs::export_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no export directory"))?;
    export_json_to(&dir, summary)
}

/// Append one line per completed test to the CSV history, emitting the
/// header on first write.
pub fn append_history_to(
    path: &Path,
    summary: &TestSummary,
    settings: &TestSettings,
) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let needs_header = !path.exists();

    let mut log_file = OpenOptions::new().append(true).create(true).open(path)?;

    if needs_header {
        writeln!(
            log_file,
            "date,duration_secs,word_count,difficulty,elapsed_secs,wpm,accuracy"
        )?;
    }

    writeln!(
        log_file,
        "{},{},{},{},{:.2},{},{}",
        Local::now().format("%c"),
        settings.duration_secs,
        settings.word_count,
        settings.difficulty.to_string().to_lowercase(),
        summary.elapsed_secs,
        summary.wpm,
        summary.accuracy,
    )
}

pub fn append_history(summary: &TestSummary, settings: &TestSettings) -> io::Result<()> {
    if let Some(path) = AppDirs::history_path() {
        append_history_to(&path, summary, settings)?;
    }
    Ok(())
}
