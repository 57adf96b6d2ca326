//! Markdown rendering
//!
//! Pure functions from grouped documents to markdown text. Rendering is
//! deterministic given identical input; the index timestamp is supplied by
//! the caller instead of being read from the clock here.

use crate::library::{Bucket, Library};
use crate::types::Document;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Number of cells in the textual progress bar
const PROGRESS_BAR_WIDTH: usize = 10;

/// Render a reading-progress fraction as a textual bar
///
/// `None` and zero both render as "not started"; values outside `0.0..=1.0`
/// are clamped.
#[must_use]
pub fn progress_bar(progress: Option<f64>) -> String {
    let Some(fraction) = progress.filter(|p| *p > 0.0) else {
        return "not started".to_string();
    };
    let fraction = fraction.clamp(0.0, 1.0);
    let percent = (fraction * 100.0).round() as u32;
    let filled = ((fraction * PROGRESS_BAR_WIDTH as f64) as usize).min(PROGRESS_BAR_WIDTH);
    format!(
        "{}{} {percent}%",
        "█".repeat(filled),
        "░".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}

/// Render one document as a markdown block
#[must_use]
pub fn document_block(document: &Document) -> String {
    let title = document.title.as_deref().unwrap_or("Untitled");
    let url = document.source_url.as_deref().unwrap_or("");

    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("### [{title}]({url})"));
    lines.push(String::new());

    let mut meta = Vec::new();
    if let Some(author) = nonempty(document.author.as_deref()) {
        if author != "Unknown" {
            meta.push(format!("**{author}**"));
        }
    }
    if let Some(site) = nonempty(document.site_name.as_deref()) {
        meta.push(format!("_{site}_"));
    }
    if !meta.is_empty() {
        lines.push(meta.join(" · "));
        lines.push(String::new());
    }

    let mut details = vec![format!("📂 {}", document.category.as_str())];
    if let Some(words) = document.word_count.filter(|w| *w > 0) {
        details.push(format!("📝 {} words", group_thousands(words)));
    }
    if let Some(reading_time) = nonempty(document.reading_time.as_deref()) {
        details.push(format!("⏱️ {reading_time}"));
    }
    lines.push(details.join(" | "));

    if document.reading_progress.is_some_and(|p| p > 0.0) {
        lines.push(format!(
            "📖 Progress: {}",
            progress_bar(document.reading_progress)
        ));
    }
    if let Some(saved) = document.saved_at {
        lines.push(format!("📅 Saved: {}", saved.format("%Y-%m-%d")));
    }
    if let Some(published) = nonempty(document.published_date.as_deref()) {
        lines.push(format!("📰 Published: {}", format_date(published)));
    }
    if !document.tags.is_empty() {
        let tags = document
            .tags
            .iter()
            .map(|t| format!("`{t}`"))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("🏷️ Tags: {tags}"));
    }
    lines.push(String::new());

    if let Some(summary) = nonempty(document.summary.as_deref()) {
        lines.push(format!("> {summary}"));
        lines.push(String::new());
    }
    if let Some(notes) = nonempty(document.notes.as_deref()) {
        lines.push(format!("**Notes:** {notes}"));
        lines.push(String::new());
    }

    if !document.highlights.is_empty() {
        lines.push("#### Highlights".to_string());
        lines.push(String::new());
        for highlight in &document.highlights {
            lines.push(format!("> {}", highlight.content));
            if let Some(note) = nonempty(highlight.note.as_deref()) {
                lines.push(format!(">\n> — _{note}_"));
            }
            lines.push(String::new());
        }
    }

    lines.push("---".to_string());
    lines.push(String::new());
    lines.join("\n")
}

/// Render one bucket's markdown file
///
/// Documents are grouped by category (alphabetical category headers); within
/// a group the caller-supplied order is preserved, so a bucket sorted
/// newest-first stays newest-first.
#[must_use]
pub fn bucket_section(bucket: Bucket, documents: &[Document]) -> String {
    let (title, emoji, description) = bucket_heading(bucket);

    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("# {emoji} {title}"));
    lines.push(String::new());
    lines.push(format!("_{description}_"));
    lines.push(String::new());
    lines.push(format!("**{} items**", documents.len()));
    lines.push(String::new());

    if documents.is_empty() {
        lines.push("_Nothing here yet!_".to_string());
        return lines.join("\n");
    }

    let mut by_category: BTreeMap<&'static str, Vec<&Document>> = BTreeMap::new();
    for document in documents {
        by_category
            .entry(document.category.as_str())
            .or_default()
            .push(document);
    }

    for (category_name, group) in by_category {
        let emoji = category_emoji_by_name(category_name);
        lines.push(format!(
            "## {emoji} {} ({})",
            capitalize(category_name),
            group.len()
        ));
        lines.push(String::new());
        for document in group {
            lines.push(document_block(document));
        }
    }

    lines.join("\n")
}

/// Render the top-level index (README.md)
///
/// Reports the count of every bucket, including empty ones; only non-empty
/// buckets are linked, since empty buckets produce no file.
#[must_use]
pub fn index(library: &Library, generated_at: DateTime<Utc>) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("# 📚 Reader Library".to_string());
    lines.push(String::new());
    lines.push(format!(
        "_Last updated: {}_",
        generated_at.format("%Y-%m-%d %H:%M")
    ));
    lines.push(String::new());
    lines.push("| Section | Count |".to_string());
    lines.push("|---------|-------|".to_string());
    for bucket in [Bucket::Queue, Bucket::Archive, Bucket::Feed] {
        let documents = library.bucket(bucket);
        let (title, emoji, _) = bucket_heading(bucket);
        let label = if documents.is_empty() {
            format!("{emoji} {title}")
        } else {
            format!("[{emoji} {title}]({})", bucket.file_name())
        };
        lines.push(format!("| {label} | {} |", documents.len()));
    }
    lines.push(String::new());

    lines.push("## Stats".to_string());
    lines.push(String::new());
    lines.push(format!("- **Total items:** {}", library.len()));

    let all = library
        .queue
        .iter()
        .chain(&library.archive)
        .chain(&library.feed);
    let total_words: u64 = all.clone().filter_map(|d| d.word_count).sum();
    lines.push(format!("- **Total words:** {}", group_thousands(total_words)));

    let mut category_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for document in all {
        *category_counts.entry(document.category.as_str()).or_default() += 1;
    }
    if !category_counts.is_empty() {
        let mut counts: Vec<(&'static str, usize)> = category_counts.into_iter().collect();
        // most frequent first, name as tie-break
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        let summary = counts
            .iter()
            .map(|(name, count)| format!("{name} ({count})"))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("- **Categories:** {summary}"));
    }
    lines.push(String::new());

    lines.join("\n")
}

fn bucket_heading(bucket: Bucket) -> (&'static str, &'static str, &'static str) {
    match bucket {
        Bucket::Queue => (
            "Reading Queue",
            "📋",
            "Articles and documents waiting to be read.",
        ),
        Bucket::Archive => ("Archive", "✅", "Finished reading or archived for reference."),
        Bucket::Feed => ("Feed", "📡", "Items from RSS feeds and subscriptions."),
    }
}

fn category_emoji_by_name(name: &str) -> &'static str {
    match name {
        "article" => "📄",
        "email" => "📧",
        "rss" => "📡",
        "pdf" => "📑",
        "epub" => "📖",
        "tweet" => "🐦",
        "video" => "🎬",
        "highlight" => "💡",
        "note" => "📝",
        _ => "📄",
    }
}

/// Format a raw date string from the API
///
/// Accepts RFC 3339 timestamps; anything else is truncated to its first ten
/// characters, which covers the plain `YYYY-MM-DD` form the API also emits.
fn format_date(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%Y-%m-%d").to_string();
    }
    raw.get(..10).unwrap_or(raw).to_string()
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn nonempty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
