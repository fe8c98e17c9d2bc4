use chrono::Local;
use toolkit_core::{AlertLevel, AppViewModel, FormView, ProgressView, ZoneView};

const BAR_WIDTH: usize = 20;

/// Flattens the view into display lines, one per visible element.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    for zone in &view.zones {
        lines.push(zone_line(zone));
    }
    for form in &view.forms {
        form_lines(form, &mut lines);
    }
    for alert in &view.alerts {
        lines.push(format!("{}: {}", alert_label(alert.level), alert.message));
    }
    lines
}

fn zone_line(zone: &ZoneView) -> String {
    let marker = if zone.drag_active {
        "*"
    } else if zone.file_selected {
        "+"
    } else {
        "-"
    };
    if zone.hint_text.is_empty() {
        format!("{marker} {}", zone.label_text)
    } else {
        format!("{marker} {} ({})", zone.label_text, zone.hint_text)
    }
}

fn form_lines(form: &FormView, lines: &mut Vec<String>) {
    if let Some(button) = &form.button {
        let state = if button.enabled { "" } else { " (disabled)" };
        lines.push(format!("[{}]{}", button.label, state));
    }
    if let Some(progress) = form.progress.as_ref().filter(|p| p.visible) {
        lines.push(progress_line(progress));
    }
    if let Some(result) = form.result.as_ref().filter(|r| r.visible) {
        let class = result.kind.map(|kind| kind.class_name()).unwrap_or("");
        lines.push(format!("{} [{}] {}", result.title, class, result.message));
        if let Some(href) = &result.download_href {
            lines.push(format!("Download File: {href}"));
        }
    }
}

fn progress_line(progress: &ProgressView) -> String {
    let filled = ((progress.width_percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!(
        "[{}{}] {:>3.0}% {}",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        progress.width_percent,
        progress.text
    )
}

fn alert_label(level: AlertLevel) -> &'static str {
    match level {
        AlertLevel::Info => "info",
        AlertLevel::Success => "success",
        AlertLevel::Warning => "warning",
        AlertLevel::Error => "error",
    }
}

/// Prints rendered lines, skipping those unchanged since the previous frame.
#[derive(Default)]
pub struct TerminalSurface {
    last: Vec<String>,
}

impl TerminalSurface {
    pub fn present(&mut self, view: &AppViewModel) {
        let lines = render(view);
        for line in changed_lines(&self.last, &lines) {
            println!("{} {}", Local::now().format("%H:%M:%S"), line);
        }
        self.last = lines;
    }
}

fn changed_lines<'a>(previous: &[String], current: &'a [String]) -> Vec<&'a String> {
    current
        .iter()
        .filter(|line| !previous.contains(line))
        .collect()
}
