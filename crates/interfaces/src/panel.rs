/// Side panel listing the tasks still waiting to run.
#[derive(Debug, Default, Clone, Copy)]
pub struct TaskPanel;

impl TaskPanel {
    pub const TITLE: &'static str = "📋 Current tasks";

    pub fn render(&self, pending: &[String]) -> String {
        let mut lines = vec![Self::TITLE.to_string()];
        if pending.is_empty() {
            lines.push("  (none)".to_string());
        }
        lines.extend(pending.iter().map(|task| format!("  - {}", task)));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_pending_in_order() {
        let pending = vec!["Book venue".to_string(), "Send invites".to_string()];
        assert_eq!(
            TaskPanel.render(&pending),
            "📋 Current tasks\n  - Book venue\n  - Send invites"
        );
    }

    #[test]
    fn test_empty_panel() {
        assert_eq!(TaskPanel.render(&[]), "📋 Current tasks\n  (none)");
    }
}
