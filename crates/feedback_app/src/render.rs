use feedback_core::{FeedViewModel, NoticeSeverity};

/// Paints the whole feedback section. Idempotent: the section is rebuilt
/// from the view model on every call, never patched incrementally.
pub fn paint(view: &FeedViewModel) {
    for line in render_lines(view) {
        println!("{line}");
    }
}

pub fn show_section_banner() {
    println!();
    println!("--- Feedback ---");
}

pub fn render_lines(view: &FeedViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("=== Recent Feedback ===".to_string());

    if let Some(stats_label) = &view.stats_label {
        lines.push(format!("Total feedback: {stats_label}"));
    }

    if let Some(notice) = &view.notice {
        let prefix = match notice.severity {
            NoticeSeverity::Success => "ok",
            NoticeSeverity::Warning => "warn",
            NoticeSeverity::Error => "error",
        };
        lines.push(format!("[{prefix}] {}", notice.text));
    }

    if view.sending {
        lines.push("Sending...".to_string());
    }

    if view.empty {
        lines.push("No feedback yet. Be the first to share your thoughts!".to_string());
        return lines;
    }

    for row in &view.rows {
        let mut header = row.who.clone();
        if let Some(priority) = &row.priority_flag {
            header.push_str(&format!(" [{priority}]"));
        }
        if !row.time_label.is_empty() {
            header.push_str(&format!(" - {}", row.time_label));
        }
        lines.push(format!("* {header}"));
        lines.push(format!("  {}", row.quote));
        if !row.tags.is_empty() {
            lines.push(format!("  tags: {}", row.tags.join(", ")));
        }
    }
    lines
}
