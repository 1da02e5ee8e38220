//! Prompt templates for roundtable turns

use crate::session::message::Message;
use crate::stage::{Stage, TurnContext};

/// How many trailing context messages are quoted in a turn prompt
const CONTEXT_WINDOW: usize = 5;

/// Longest quoted excerpt per context message, in characters
const EXCERPT_CHARS: usize = 200;

/// Templates for building generation prompts
pub struct PromptTemplate;

impl PromptTemplate {
    /// Seed prompt a stage leader opens with
    pub fn stage_seed(stage: Stage) -> &'static str {
        match stage {
            Stage::ProblemPresentation => {
                "请介绍本次圆桌会要讨论的临床问题，说明初步假设和临床价值。"
            }
            Stage::LiteratureReview => {
                "请汇报围绕本研究问题的文献检索结果，指出现有证据和研究空白。"
            }
            Stage::StudyDesign => {
                "请基于前面的讨论提出研究设计方案，包括研究类型、纳入排除标准和偏倚控制。"
            }
            Stage::StatisticalPlan => {
                "请制定统计分析计划，包括样本量计算、主要分析方法和图表方案。"
            }
            Stage::ExecutionPlan => {
                "请制定研究执行计划，包括人员分工、研究流程和质量控制。"
            }
            Stage::Consensus => "请对本次讨论进行总结，形成研究方案共识。",
        }
    }

    /// Composite prompt for one persona turn.
    ///
    /// Embeds the session identity, a quoted excerpt of the recent
    /// discussion, the triggering message, and a closing instruction to
    /// answer in-context and in role.
    pub fn persona_turn(ctx: &TurnContext, context: &[Message], trigger: &Message) -> String {
        let mut prompt = format!(
            "研究标题: {}\n临床问题: {}\n当前阶段: {}\n",
            ctx.title, ctx.clinical_question, ctx.stage
        );

        let tail_start = context.len().saturating_sub(CONTEXT_WINDOW);
        let tail = &context[tail_start..];
        if !tail.is_empty() {
            prompt.push_str("\n=== 最近讨论 ===\n");
            for msg in tail {
                prompt.push_str(&format!(
                    "【{}】{}\n",
                    msg.sender.display_name(),
                    excerpt(&msg.content, EXCERPT_CHARS)
                ));
            }
        }

        prompt.push_str(&format!(
            "\n=== 当前发言 ===\n【{}】{}\n",
            trigger.sender.display_name(),
            trigger.content
        ));

        prompt.push_str("\n请结合上述讨论，紧扣研究主题，以符合你角色的口吻作出回应。");
        prompt
    }

    /// Composition prompt for the closing summary
    pub fn summary(ctx: &TurnContext, context: &[Message]) -> String {
        let mut prompt = format!(
            "研究标题: {}\n临床问题: {}\n\n=== 讨论记录 ===\n",
            ctx.title, ctx.clinical_question
        );

        for msg in context {
            prompt.push_str(&format!(
                "【{}】{}\n",
                msg.sender.display_name(),
                excerpt(&msg.content, EXCERPT_CHARS)
            ));
        }

        prompt.push_str(
            "\n请作为会议主持人对本次圆桌讨论进行总结，内容包括：\n\
             1. 研究设计共识\n\
             2. 关键决策（样本量、纳入排除标准、干预分组、主要终点、统计方法）\n\
             3. 各位专家的主要贡献\n\
             4. 下一步工作\n\
             5. 临床意义\n",
        );
        prompt
    }
}

/// Truncate to at most `max` characters, marking the cut
pub fn excerpt(content: &str, max: usize) -> String {
    if content.chars().count() <= max {
        return content.to_string();
    }
    let cut: String = content.chars().take(max).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::message::{MessageKind, Recipient, Sender};
    use crate::stage::TurnStage;

    fn ctx() -> TurnContext {
        TurnContext {
            stage: TurnStage::StudyDesign,
            round: 3,
            title: "Metformin CV outcomes".to_string(),
            clinical_question: "二甲双胍对心血管结局的影响".to_string(),
        }
    }

    fn msg(content: &str) -> Message {
        Message::new("s1", Sender::User, Recipient::All, MessageKind::Question, content)
    }

    #[test]
    fn test_persona_turn_embeds_identity_and_trigger() {
        let trigger = msg("样本量如何确定？");
        let prompt = PromptTemplate::persona_turn(&ctx(), &[], &trigger);
        assert!(prompt.contains("研究标题: Metformin CV outcomes"));
        assert!(prompt.contains("临床问题: 二甲双胍对心血管结局的影响"));
        assert!(prompt.contains("当前阶段: study_design"));
        assert!(prompt.contains("样本量如何确定？"));
        assert!(prompt.contains("以符合你角色的口吻"));
    }

    #[test]
    fn test_persona_turn_quotes_at_most_five_messages() {
        let context: Vec<Message> = (0..8).map(|i| msg(&format!("第{}条", i))).collect();
        let trigger = msg("继续");
        let prompt = PromptTemplate::persona_turn(&ctx(), &context, &trigger);
        assert!(!prompt.contains("第2条"));
        assert!(prompt.contains("第3条"));
        assert!(prompt.contains("第7条"));
    }

    #[test]
    fn test_excerpt_truncates_long_content() {
        let long = "很".repeat(300);
        let cut = excerpt(&long, 200);
        assert_eq!(cut.chars().count(), 203);
        assert!(cut.ends_with("..."));
        assert_eq!(excerpt("短", 200), "短");
    }

    #[test]
    fn test_summary_lists_requirements() {
        let prompt = PromptTemplate::summary(&ctx(), &[msg("讨论内容")]);
        assert!(prompt.contains("研究设计共识"));
        assert!(prompt.contains("样本量"));
        assert!(prompt.contains("主要终点"));
        assert!(prompt.contains("临床意义"));
    }
}
