//! Console output formatter for finished discussions

use colored::Colorize;
use roundtable_domain::{MessageKind, PersonaRegistry, RoundtableSnapshot, Sender};

/// Formats a session snapshot for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete transcript
    pub fn format(snapshot: &RoundtableSnapshot) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("圆桌讨论记录"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "研究标题:".cyan().bold(),
            snapshot.title
        ));
        output.push_str(&format!(
            "{} {}\n",
            "临床问题:".cyan().bold(),
            snapshot.clinical_question
        ));
        output.push_str(&format!(
            "{} {} ({} 轮)\n\n",
            "状态:".cyan().bold(),
            snapshot.status,
            snapshot.current_round
        ));

        for msg in &snapshot.messages {
            let label = Self::sender_label(&msg.sender);
            let stage = msg
                .meta
                .stage
                .map(|s| format!(" · {}", s))
                .unwrap_or_default();
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {}{} ──", label, stage).yellow().bold(),
                msg.content
            ));
        }

        output.push_str(&Self::references(snapshot));
        output.push_str(&Self::footer());
        output
    }

    /// Format only the closing summary and references
    pub fn format_summary_only(snapshot: &RoundtableSnapshot) -> String {
        let mut output = String::new();

        match snapshot
            .messages
            .iter()
            .rev()
            .find(|m| m.kind == MessageKind::Summary)
        {
            Some(summary) => {
                output.push_str(&Self::header("研究方案共识"));
                output.push_str(&format!(
                    "\n{}\n\n{}\n",
                    format!("主持人: {}", Self::sender_label(&summary.sender))
                        .yellow()
                        .bold(),
                    summary.content
                ));
            }
            None => {
                output.push_str(&format!(
                    "{}\n",
                    "讨论尚未形成总结。".yellow()
                ));
            }
        }

        output.push_str(&Self::references(snapshot));
        output
    }

    /// JSON rendering of the snapshot
    pub fn format_json(snapshot: &RoundtableSnapshot) -> String {
        serde_json::to_string_pretty(snapshot)
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    fn sender_label(sender: &Sender) -> String {
        match sender {
            Sender::Agent(role) => {
                let persona = PersonaRegistry::get(*role);
                format!("{} {}", persona.avatar, persona.name)
            }
            Sender::User => "用户".to_string(),
            Sender::System => "系统".to_string(),
        }
    }

    fn references(snapshot: &RoundtableSnapshot) -> String {
        if snapshot.references.is_empty() {
            return String::new();
        }
        let mut output = format!("\n{}\n", "参考文献:".cyan().bold());
        for reference in &snapshot.references {
            output.push_str(&format!("  [{}] {}\n", reference.number, reference.citation));
        }
        output
    }

    fn header(title: &str) -> String {
        format!(
            "\n{}\n{}\n",
            "=".repeat(60),
            format!("  {}", title).bold()
        )
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::{Message, MessageKind, Recipient, Roundtable, Sender};
    use roundtable_domain::AgentRole;

    fn snapshot_with_summary() -> RoundtableSnapshot {
        let mut rt = Roundtable::new("Metformin CV outcomes", "二甲双胍与心血管结局");
        let summary = Message::new(
            rt.id(),
            Sender::Agent(AgentRole::ClinicalDirector),
            Recipient::All,
            MessageKind::Summary,
            "讨论总结内容",
        );
        rt.append(summary);
        rt.snapshot()
    }

    #[test]
    fn test_full_format_contains_transcript() {
        let text = ConsoleFormatter::format(&snapshot_with_summary());
        assert!(text.contains("Metformin CV outcomes"));
        assert!(text.contains("讨论总结内容"));
        assert!(text.contains("资深临床主任"));
    }

    #[test]
    fn test_summary_only_picks_summary_message() {
        let text = ConsoleFormatter::format_summary_only(&snapshot_with_summary());
        assert!(text.contains("讨论总结内容"));
        assert!(!text.contains("状态:"));
    }

    #[test]
    fn test_json_round_trips() {
        let json = ConsoleFormatter::format_json(&snapshot_with_summary());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Metformin CV outcomes");
    }
}
