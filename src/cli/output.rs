//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

use crate::application::services::NodeSummary;

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print labelled value (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Tree label suffix: `*` on the selected node, `+` on its ancestors.
pub fn selection_label(label: String, selected: bool, has_selected_child: bool) -> String {
    if selected {
        format!("{} {}", label, "*".green().bold())
    } else if has_selected_child {
        format!("{} {}", label, "+".yellow())
    } else {
        label
    }
}

/// Print one node: id as header line, then its fields indented
pub fn node_summary(summary: &NodeSummary) {
    action("id", &summary.id);
    detail(&format!("label:    {}", summary.label));
    detail(&format!("level:    {}", summary.level));
    detail(&format!(
        "parent:   {}",
        summary.parent_id.as_deref().unwrap_or("-")
    ));
    detail(&format!("children: {}", summary.children));
}
