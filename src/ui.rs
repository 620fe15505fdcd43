use itertools::Itertools;
use keystroke::session::{CharStatus, Session, WordStatus};
use keystroke::time_series::TimeSeriesPoint;
use keystroke::util::format_time;
use keystroke::results;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;
use webbrowser::Browser;

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Typing => render_typing(self, area, buf),
            AppState::Results => render_results(self, area, buf),
        }
    }
}

fn char_style(status: CharStatus) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match status {
        CharStatus::Pending => bold.add_modifier(Modifier::DIM),
        CharStatus::Correct => bold.fg(Color::Green),
        CharStatus::Incorrect => bold.fg(Color::Red),
    }
}

/// One styled span per character, one word grid for the whole prompt.
fn word_spans(session: &Session) -> Vec<Span<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut spans = Vec::new();

    for (wi, word) in session.words.iter().enumerate() {
        if wi > 0 {
            spans.push(Span::raw(" "));
        }

        match word.status {
            WordStatus::Correct => {
                spans.push(Span::styled(word.text.clone(), bold.fg(Color::Green)));
            }
            WordStatus::Incorrect => {
                spans.push(Span::styled(
                    word.text.clone(),
                    bold.fg(Color::Red).add_modifier(Modifier::CROSSED_OUT),
                ));
            }
            WordStatus::Current => {
                let cursor = session.cursor_in_word();
                for (ci, cs) in word.chars.iter().enumerate() {
                    let mut style = char_style(cs.status);
                    if ci == cursor {
                        style = style.add_modifier(Modifier::UNDERLINED);
                    }
                    spans.push(Span::styled(cs.char.to_string(), style));
                }
            }
            WordStatus::Pending => {
                spans.push(Span::styled(
                    word.text.clone(),
                    bold.add_modifier(Modifier::DIM),
                ));
            }
        }
    }

    spans
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let prompt_text = session.words.iter().map(|w| w.text.as_str()).join(" ");
    let mut prompt_occupied_lines =
        ((prompt_text.width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16;

    if prompt_text.width() <= max_chars_per_line as usize {
        prompt_occupied_lines = 1;
    }

    let fixed_lines = prompt_occupied_lines + 4; // stats + spacer + prompt + spacer + input
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length((area.height.saturating_sub(fixed_lines)) / 2),
                Constraint::Length(1), // stats bar
                Constraint::Length(1),
                Constraint::Length(prompt_occupied_lines),
                Constraint::Length(1),
                Constraint::Length(1), // input buffer
            ]
            .as_ref(),
        )
        .split(area);

    let (word_pos, word_total) = session.progress();
    let stats = Line::from(vec![
        Span::styled(format_time(session.seconds_remaining), bold.fg(Color::Cyan)),
        Span::raw("   "),
        Span::styled(
            format!("{} wpm", session.live_wpm()),
            bold.fg(Color::Green),
        ),
        Span::raw("   "),
        Span::styled(
            format!("{}% acc", session.live_accuracy()),
            bold.fg(Color::Magenta),
        ),
        Span::raw("   "),
        Span::styled(
            format!("{word_pos}/{word_total}"),
            bold.fg(Color::Yellow),
        ),
    ]);
    Paragraph::new(stats)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let prompt = Paragraph::new(Line::from(word_spans(session)))
        .alignment(if prompt_occupied_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true });
    prompt.render(chunks[3], buf);

    let input = Paragraph::new(Span::styled(
        format!("> {}_", session.input),
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    input.render(chunks[5], buf);
}

fn chart_bounds(series: &[TimeSeriesPoint], duration_secs: u64) -> (f64, f64) {
    let overall_duration = series
        .last()
        .map(|p| p.t)
        .unwrap_or(duration_secs as f64)
        .max(1.0);
    let highest_wpm = series
        .iter()
        .map(|p| p.wpm)
        .fold(0.0, f64::max)
        .max(10.0);
    (overall_duration, highest_wpm)
}

fn format_label(value: f64) -> String {
    format!("{value:.0}")
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let summary = match session.summary {
        Some(summary) => summary,
        None => return,
    };

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let italic = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Min(1),    // wpm chart
                Constraint::Length(1), // headline stats
                Constraint::Length(1), // ratings
                Constraint::Length(1), // char counts
                Constraint::Length(2), // settings info
                Constraint::Length(1), // padding
                Constraint::Length(1), // legend
            ]
            .as_ref(),
        )
        .split(area);

    let (overall_duration, highest_wpm) = chart_bounds(&session.wpm_series, session.duration_secs);
    let points: Vec<(f64, f64)> = session.wpm_series.iter().map(|p| (p.t, p.wpm)).collect();
    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(Style::default().fg(Color::Magenta))
        .graph_type(GraphType::Line)
        .data(&points)];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([1.0, overall_duration])
                .labels(vec![
                    Span::styled("1", bold),
                    Span::styled(format_label(overall_duration), bold),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm])
                .labels(vec![
                    Span::styled("0", bold),
                    Span::styled(format_label(highest_wpm), bold),
                ]),
        );
    chart.render(chunks[0], buf);

    let stats = Paragraph::new(Span::styled(
        format!(
            "{} wpm   {}% acc   {:.1}s elapsed",
            summary.wpm, summary.accuracy, summary.elapsed_secs
        ),
        bold,
    ))
    .alignment(Alignment::Center);
    stats.render(chunks[1], buf);

    let ratings = Paragraph::new(Span::styled(
        format!(
            "speed: {}   accuracy: {}",
            results::wpm_rating(summary.wpm),
            results::accuracy_rating(summary.accuracy)
        ),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    ratings.render(chunks[2], buf);

    let counts = Paragraph::new(Span::styled(
        format!(
            "{} correct / {} incorrect / {} total chars",
            summary.correct_chars, summary.incorrect_chars, summary.total_chars
        ),
        Style::default().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center);
    counts.render(chunks[3], buf);

    let tier_stats = app.settings.difficulty.stats();
    let settings_text = format!(
        "Settings: {} | {} words | {} ({}, {} words avg {:.1} chars)\n(1) duration (2) difficulty (3) words",
        format_time(app.settings.duration_secs),
        app.settings.word_count,
        app.settings.difficulty.to_string().to_lowercase(),
        tier_stats.description,
        tier_stats.total_words,
        tier_stats.avg_length,
    );
    let settings_widget = Paragraph::new(settings_text)
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    settings_widget.render(chunks[4], buf);

    let legend = Paragraph::new(Span::styled(
        String::from(if Browser::is_available() {
            "(r)etry / (n)ew / (e)xport / (t)weet / (esc)ape"
        } else {
            "(r)etry / (n)ew / (e)xport / (esc)ape"
        }),
        italic,
    ));
    legend.render(chunks[6], buf);
}
