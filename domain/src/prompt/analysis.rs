//! Clinical question analysis for fallback replies
//!
//! A pure keyword scan that extracts the disease area, intervention and
//! likely primary endpoint from the clinical question, so canned replies
//! stay on topic when the generation backend is unavailable.

/// Disease categories and the cue words that indicate them
static DISEASE_CUES: &[(&str, &[&str])] = &[
    ("糖尿病", &["血糖", "HbA1c", "胰岛素", "二甲双胍", "低血糖", "2型糖尿病", "1型糖尿病"]),
    ("高血压", &["血压", "收缩压", "舒张压", "降压药", "降压"]),
    ("肿瘤", &["癌症", "化疗", "放疗", "靶向", "生存期", "OS", "PFS", "肿瘤"]),
    ("心血管疾病", &["心梗", "心衰", "冠心病", "支架", "溶栓", "心绞痛", "心血管"]),
    ("呼吸系统疾病", &["哮喘", "COPD", "肺功能", "氧疗", "慢阻肺"]),
    ("神经系统疾病", &["卒中", "癫痫", "帕金森", "认知", "痴呆", "脑梗", "脑出血"]),
    ("骨科疾病", &["骨折", "关节置换", "骨密度", "骨质疏松", "关节"]),
    ("感染性疾病", &["抗生素", "病毒", "细菌", "感染", "抗病毒"]),
    ("消化系统疾病", &["胃炎", "溃疡", "肝病", "肝硬化", "脂肪肝", "消化"]),
    ("内分泌疾病", &["甲状腺", "甲亢", "甲减", "激素", "内分泌"]),
];

/// Endpoint cues in priority order; the first hit wins
static ENDPOINT_CUES: &[(&str, &[&str])] = &[
    ("总生存期(OS)", &["死亡率", "生存"]),
    ("无复发生存期(RFS)", &["复发"]),
    ("住院率", &["住院"]),
    ("并发症发生率", &["并发症"]),
    ("生活质量评分", &["生活质量", "QoL"]),
    ("糖化血红蛋白(HbA1c)水平", &["血糖", "HbA1c"]),
    ("血压控制率", &["血压"]),
];

/// Key facts extracted from a clinical question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionProfile {
    pub disease: String,
    pub intervention: String,
    pub endpoint: String,
}

impl QuestionProfile {
    /// Analyze a clinical question, falling back to neutral defaults
    pub fn analyze(clinical_question: &str) -> Self {
        let disease = DISEASE_CUES
            .iter()
            .find(|(_, cues)| cues.iter().any(|cue| clinical_question.contains(cue)))
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| "相关疾病".to_string());

        let mut interventions = Vec::new();
        if clinical_question.contains("二甲双胍") {
            interventions.push("二甲双胍药物治疗");
        } else if clinical_question.contains("药物") || clinical_question.contains("治疗") {
            interventions.push("药物治疗");
        }
        if clinical_question.contains("手术") {
            interventions.push("手术治疗");
        }
        if clinical_question.contains("康复") || clinical_question.contains("训练") {
            interventions.push("康复治疗");
        }
        if clinical_question.contains("预防") {
            interventions.push("预防措施");
        }
        let intervention = if interventions.is_empty() {
            "干预措施".to_string()
        } else {
            interventions.join("、")
        };

        let endpoint = ENDPOINT_CUES
            .iter()
            .find(|(_, cues)| cues.iter().any(|cue| clinical_question.contains(cue)))
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| "主要临床疗效指标".to_string());

        Self {
            disease,
            intervention,
            endpoint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_metformin_question() {
        let profile = QuestionProfile::analyze("二甲双胍对2型糖尿病患者心血管结局的影响");
        assert_eq!(profile.disease, "糖尿病");
        assert_eq!(profile.intervention, "二甲双胍药物治疗");
    }

    #[test]
    fn test_analyze_defaults() {
        let profile = QuestionProfile::analyze("一个很模糊的问题");
        assert_eq!(profile.disease, "相关疾病");
        assert_eq!(profile.intervention, "干预措施");
        assert_eq!(profile.endpoint, "主要临床疗效指标");
    }

    #[test]
    fn test_endpoint_priority_first_hit_wins() {
        let profile = QuestionProfile::analyze("比较两组患者的死亡率和住院率");
        assert_eq!(profile.endpoint, "总生存期(OS)");
    }
}
