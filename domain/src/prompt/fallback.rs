//! Canned persona replies
//!
//! Last line of defense when the generation backend fails: a templated,
//! role-appropriate reply built from the question profile. Always returns
//! a non-empty string.

use super::analysis::QuestionProfile;
use crate::persona::AgentRole;

/// Render a role-appropriate canned reply.
///
/// The match is exhaustive over the closed role set, so adding a role
/// forces a new arm here at compile time.
pub fn fallback_reply(role: AgentRole, profile: &QuestionProfile, question: &str) -> String {
    let QuestionProfile {
        disease,
        intervention,
        endpoint,
    } = profile;

    match role {
        AgentRole::ClinicalDirector => format!(
            "针对\"{question}\"这一临床问题，我从临床实践角度提出以下意见：\n\n\
             1. {disease}的{intervention}研究具有重要的临床价值，若取得阳性结果，\
             将为诊疗提供新的循证依据。\n\
             2. 建议明确{disease}的诊断标准，确保研究人群同质；以{endpoint}作为主要疗效指标。\n\
             3. 建议采用多中心设计并建立独立的数据安全监察委员会。\n\n\
             期待与各位专家深入讨论这个研究方案。"
        ),
        AgentRole::PhdStudent => format!(
            "针对\"{question}\"，我已进行系统的文献检索：\n\n\
             1. 现有证据多来自欧美人群，高质量的中国人群研究较少；\
             以{endpoint}作为终点指标的报道不多。\n\
             2. 现有研究普遍存在随访时间短、样本量计算依据不足的问题。\n\n\
             我将重点跟进{disease}领域关于{intervention}的最新研究进展，\
             为方案设计补充证据。"
        ),
        AgentRole::Epidemiologist => format!(
            "从流行病学和方法学角度，针对\"{question}\"我建议：\n\n\
             1. 研究类型：随机对照试验或前瞻性队列研究，结合{intervention}的性质选择。\n\
             2. 偏倚控制：严格的纳入排除标准、标准化操作流程、盲法终点评估。\n\
             3. 基于{endpoint}进行样本量估算，预设期中分析计划。\n\n\
             请统计专家进一步细化样本量计算。"
        ),
        AgentRole::Statistician => format!(
            "关于\"{question}\"的统计分析方案：\n\n\
             1. 分析人群：意向性治疗分析(ITT)和符合方案分析(PP)。\n\
             2. 主要终点{endpoint}按数据类型选择检验方法；\
             时间-事件变量采用Kaplan-Meier法和Log-rank检验。\n\
             3. 样本量：α=0.05（双侧），Power=80%，考虑20%脱落率估算。\n\
             4. 亚组分析预先设定，采用交互作用检验。"
        ),
        AgentRole::ResearchNurse => format!(
            "针对\"{question}\"的研究执行，我从操作层面建议：\n\n\
             1. 筛选入组需评估{endpoint}等关键指标；知情同意要充分告知\
             {intervention}的获益和风险。\n\
             2. 数据管理：电子数据采集系统、关键数据双人录入、逻辑校验。\n\
             3. 患者管理：多渠道随访提醒，失访率控制在20%以内；\
             不良事件24小时报告机制。"
        ),
    }
}

/// Canned closing summary used when the backend cannot synthesize one
pub fn fallback_summary(profile: &QuestionProfile, title: &str) -> String {
    let QuestionProfile {
        disease,
        intervention,
        endpoint,
    } = profile;

    format!(
        "本次圆桌会围绕\"{title}\"完成了全部讨论，形成以下共识：\n\n\
         **研究设计共识**：针对{disease}开展{intervention}的多中心前瞻性研究，\
         以{endpoint}为主要终点。\n\n\
         **关键决策**：\n\
         - 样本量按α=0.05、Power=80%并考虑20%脱落率估算\n\
         - 纳入排除标准以诊断明确、无严重合并症为原则\n\
         - 统计方法依终点数据类型选择，时间-事件终点采用生存分析\n\n\
         **各方贡献**：临床主任提出研究问题，博士生完成文献调研，\
         流行病学专家确定研究设计，统计专家制定分析计划，\
         研究护士落实执行方案。\n\n\
         **下一步工作**：完善研究方案、提交伦理审查、启动中心筛选。\n\n\
         **临床意义**：研究结果将为{disease}的诊疗决策提供循证依据。"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_has_nonempty_reply() {
        let profile = QuestionProfile::analyze("二甲双胍对心血管结局的影响");
        for role in AgentRole::ALL {
            let reply = fallback_reply(role, &profile, "二甲双胍对心血管结局的影响");
            assert!(!reply.trim().is_empty());
        }
    }

    #[test]
    fn test_reply_stays_on_topic() {
        let profile = QuestionProfile::analyze("二甲双胍对2型糖尿病患者血糖控制的影响");
        let reply = fallback_reply(AgentRole::ClinicalDirector, &profile, "问题");
        assert!(reply.contains("糖尿病"));
        assert!(reply.contains("二甲双胍药物治疗"));
    }

    #[test]
    fn test_statistician_mentions_power() {
        let profile = QuestionProfile::analyze("随访一年的住院率");
        let reply = fallback_reply(AgentRole::Statistician, &profile, "问题");
        assert!(reply.contains("Power=80%"));
        assert!(reply.contains("住院率"));
    }
}
