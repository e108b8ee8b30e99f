use super::theme::OneDark;
use chrono::{Datelike, Weekday};
use loop_core::{
    CategoryEffect, DayActivity, DayCell, EmotionColorAssigner, EntryKind, FrequencyResult,
    JournalEntry, SpeakingHighlight, SpeakingHighlights, schedule::rating_label,
};
use strum::IntoEnumIterator;
use termimad::{
    MadSkin,
    crossterm::style::{Color, Stylize},
};

#[derive(Clone)]
pub struct RenderOptions {
    pub date_format: String,
    pub use_color: bool,
    pub first_weekday: Weekday,
}

pub struct Renderer {
    skin: MadSkin,
    opts: RenderOptions,
}

impl Renderer {
    pub fn new(opts: RenderOptions) -> Self {
        Self {
            skin: OneDark::loop_skin(),
            opts,
        }
    }

    pub fn print_md(&self, md: &str) {
        if self.opts.use_color {
            self.skin.print_text(md);
        } else {
            println!("{md}");
        }
    }

    pub fn print_info(&self, message: &str) {
        if self.opts.use_color {
            let md = format!("|-|\n| {message} |\n|-|\n");
            self.skin.print_text(&md);
        } else {
            println!("{message}");
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.opts.use_color {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn swatch(&self, color: loop_core::Color) -> String {
        if self.opts.use_color {
            "●".with(term_color(color)).to_string()
        } else {
            "-".to_string()
        }
    }

    pub fn print_day(&self, day: &DayActivity) {
        let date = day.date.format(&self.opts.date_format).to_string();
        self.print_md(&format!("## {date}"));
        match day.rating {
            Some(rating) => self.print_md(&format!(
                "Rating: **{rating:.1}** ({})",
                rating_label(rating)
            )),
            None => self.print_md("Rating: *none*"),
        }

        if day.is_empty() {
            self.print_info("No loops recorded on this day.");
            return;
        }

        for kind in EntryKind::iter() {
            let bucket = day.bucket(kind);
            if bucket.is_empty() {
                continue;
            }
            self.print_md(&format!("### {} ({})", kind_heading(kind), bucket.len()));
            for entry in bucket {
                self.print_entry_line(entry);
            }
        }
    }

    pub fn print_entry_line(&self, entry: &JournalEntry) {
        let time = self.paint(&entry.timestamp.format("%H:%M").to_string(), OneDark::BLUE);
        let prompt = self.paint(entry.prompt_text.trim(), OneDark::YELLOW);
        let mut details = Vec::new();
        if let Some(mood) = entry.normalized_mood() {
            details.push(self.paint(&mood, OneDark::PURPLE));
        }
        if let Some(words) = entry.word_count() {
            details.push(format!("{words} words"));
        }
        if entry.is_video {
            details.push("video".to_string());
        }
        let id = self.paint(&entry.id, OneDark::COMMENT);
        if details.is_empty() {
            println!("{time} {prompt} {id}");
        } else {
            println!("{time} {prompt} [{}] {id}", details.join(", "));
        }
    }

    pub fn print_top_emotions(&self, top: &[FrequencyResult], colors: &EmotionColorAssigner) {
        self.print_md("### Top emotions");
        if top.is_empty() {
            self.print_info("No moods recorded in this window.");
            return;
        }
        for result in top {
            println!(
                "{} {:<14} {:>3}  {:>5.1}%",
                self.swatch(colors.color_for(&result.value)),
                result.value,
                result.count,
                result.percentage * 100.0
            );
        }
    }

    pub fn print_highlights(&self, highlights: &SpeakingHighlights) {
        self.print_md("### Speaking highlights");
        if highlights.fastest.is_none() && highlights.longest.is_none() {
            self.print_info("No speaking metrics in this window.");
            return;
        }
        if let Some(fastest) = &highlights.fastest {
            println!("Fastest: {}", self.highlight_line(fastest));
        }
        if let Some(longest) = &highlights.longest {
            println!("Longest: {}", self.highlight_line(longest));
        }
    }

    fn highlight_line(&self, h: &SpeakingHighlight) -> String {
        let mut parts = vec![h.date.format(&self.opts.date_format).to_string()];
        if let Some(wpm) = h.wpm {
            parts.push(format!("{wpm:.0} wpm"));
        }
        if let Some(words) = h.word_count {
            parts.push(format!("{words} words"));
        }
        if let Some(secs) = h.duration {
            parts.push(format_duration(secs));
        }
        if let Some(emotion) = &h.emotion {
            parts.push(self.paint(emotion, OneDark::PURPLE));
        }
        parts.join(", ")
    }

    pub fn print_correlations(&self, category: &str, effects: &[CategoryEffect]) {
        self.print_md(&format!("### Mood by {category}"));
        if effects.is_empty() {
            self.print_info("Not enough rated days to compare.");
            return;
        }
        for effect in effects {
            let signed = format!("{:+.2}", effect.effect);
            let signed = if effect.effect >= 0.0 {
                self.paint(&signed, OneDark::GREEN)
            } else {
                self.paint(&signed, OneDark::RED)
            };
            println!(
                "{} {:<16} {signed:>6}  ({} days)",
                self.swatch(effect.color),
                effect.name,
                effect.support
            );
        }
    }

    /// Month grid, one row per week. Rated days take their rating color.
    pub fn print_calendar(&self, title: &str, cells: &[Option<DayCell>]) {
        self.print_md(&format!("## {title}"));
        println!("{}", weekday_header(self.opts.first_weekday));
        for row in cells.chunks(7) {
            let line: Vec<String> = row.iter().map(|cell| self.calendar_cell(cell)).collect();
            println!("{}", line.join(" "));
        }
    }

    fn calendar_cell(&self, cell: &Option<DayCell>) -> String {
        match cell {
            None => "   ".to_string(),
            Some(cell) => {
                let day = format!("{:>2}", cell.date.day());
                match cell.color {
                    Some(color) if self.opts.use_color => {
                        format!("{} ", day.with(term_color(color)).bold())
                    }
                    Some(_) => format!("{day}*"),
                    None => format!("{day} "),
                }
            }
        }
    }

    pub fn print_week(&self, week: &[DayCell]) {
        self.print_md("## Last 7 days");
        for cell in week {
            let date = cell.date.format("%a %d %b").to_string();
            match (cell.rating, cell.color) {
                (Some(rating), color) => {
                    let bar = rating_bar(rating);
                    let bar = match color {
                        Some(color) if self.opts.use_color => {
                            bar.with(term_color(color)).to_string()
                        }
                        _ => bar,
                    };
                    println!("{date}  {bar:<10} {rating:>4.1} {}", rating_label(rating));
                }
                (None, _) => println!("{date}  {}", self.paint("·", OneDark::COMMENT)),
            }
        }
    }
}

fn term_color(color: loop_core::Color) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

fn kind_heading(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Daily => "Daily loops",
        EntryKind::Thematic => "Thematic loops",
        EntryKind::FollowUp => "Follow-ups",
    }
}

/// Two-letter weekday names starting on `first_weekday`.
fn weekday_header(first_weekday: Weekday) -> String {
    std::iter::successors(Some(first_weekday), |day| Some(day.succ()))
        .take(7)
        .map(|day| day.to_string()[..2].to_string())
        .collect::<Vec<_>>()
        .join("  ")
}

/// One block per rating point, rounded.
fn rating_bar(rating: f64) -> String {
    "█".repeat(rating.clamp(0.0, 10.0).round() as usize)
}

fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0).round() as u64;
    if total >= 60 {
        format!("{}m {:02}s", total / 60, total % 60)
    } else {
        format!("{total}s")
    }
}
