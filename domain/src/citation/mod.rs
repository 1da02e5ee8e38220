//! Literature citation augmentation
//!
//! Persona contributions are scanned for domain keywords against a small
//! built-in reference table; up to two matches get bracketed numbered
//! markers inserted into the text. Each session owns its own
//! [`CitationBook`], so concurrent sessions never share citation state.

use serde::{Deserialize, Serialize};

/// A bibliographic reference record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub id: &'static str,
    pub authors: &'static str,
    pub title: &'static str,
    pub journal: &'static str,
    pub year: u16,
    pub volume: &'static str,
    pub pages: &'static str,
    pub doi: &'static str,
}

impl Reference {
    /// Vancouver-ish single-line rendering
    pub fn format(&self) -> String {
        let mut text = format!("{}. {}. {}", self.authors, self.title, self.journal);
        if self.year > 0 {
            text.push_str(&format!(" {}", self.year));
        }
        if !self.volume.is_empty() {
            text.push_str(&format!(";{}", self.volume));
        }
        if !self.pages.is_empty() {
            text.push_str(&format!(":{}", self.pages));
        }
        if !self.doi.is_empty() {
            text.push_str(&format!(". doi:{}", self.doi));
        }
        text
    }
}

/// Built-in reference table keyed by domain keyword
static REFERENCE_TABLE: &[(&str, &[Reference])] = &[
    (
        "糖尿病",
        &[
            Reference {
                id: "ref1",
                authors: "UK Prospective Diabetes Study Group",
                title: "Intensive blood-glucose control with sulphonylureas or insulin compared with conventional treatment and risk of complications in patients with type 2 diabetes",
                journal: "Lancet",
                year: 1998,
                volume: "352",
                pages: "837-853",
                doi: "10.1016/S0140-6736(98)07019-6",
            },
            Reference {
                id: "ref2",
                authors: "American Diabetes Association",
                title: "Standards of Medical Care in Diabetes—2023",
                journal: "Diabetes Care",
                year: 2023,
                volume: "46",
                pages: "S1-S291",
                doi: "10.2337/dc23-Srev",
            },
            Reference {
                id: "ref3",
                authors: "Zheng Y, Ley SH, Hu FB",
                title: "Global aetiology and epidemiology of type 2 diabetes mellitus and its complications",
                journal: "Nat Rev Endocrinol",
                year: 2018,
                volume: "14",
                pages: "88-98",
                doi: "10.1038/nrendo.2017.151",
            },
        ],
    ),
    (
        "二甲双胍",
        &[
            Reference {
                id: "ref4",
                authors: "Sanchez-Rangel E, Inzucchi SE",
                title: "Metformin: Clinical Use in Type 2 Diabetes",
                journal: "Diabetologia",
                year: 2017,
                volume: "60",
                pages: "1586-1593",
                doi: "10.1007/s00125-017-4336-x",
            },
            Reference {
                id: "ref5",
                authors: "Foretz M, Guigas B, Bertrand L, et al.",
                title: "Metformin: from mechanisms of action to therapies",
                journal: "Cell Metab",
                year: 2014,
                volume: "20",
                pages: "953-966",
                doi: "10.1016/j.cmet.2014.09.018",
            },
        ],
    ),
    (
        "随机对照试验",
        &[
            Reference {
                id: "ref6",
                authors: "Schulz KF, Altman DG, Moher D",
                title: "CONSORT 2010 Statement: updated guidelines for reporting parallel group randomised trials",
                journal: "BMJ",
                year: 2010,
                volume: "340",
                pages: "c332",
                doi: "10.1136/bmj.c332",
            },
            Reference {
                id: "ref7",
                authors: "Moher D, Hopewell S, Schulz KF, et al.",
                title: "CONSORT 2010 explanation and elaboration: updated guidelines for reporting parallel group randomised trials",
                journal: "BMJ",
                year: 2010,
                volume: "340",
                pages: "c869",
                doi: "10.1136/bmj.c869",
            },
        ],
    ),
    (
        "样本量",
        &[Reference {
            id: "ref8",
            authors: "Julious SA",
            title: "Sample size of 12 per group rule of thumb for a pilot study",
            journal: "Pharm Stat",
            year: 2005,
            volume: "4",
            pages: "287-291",
            doi: "10.1002/pst.185",
        }],
    ),
    (
        "统计分析",
        &[Reference {
            id: "ref9",
            authors: "Altman DG",
            title: "Practical Statistics for Medical Research",
            journal: "Chapman and Hall/CRC",
            year: 1991,
            volume: "",
            pages: "611",
            doi: "",
        }],
    ),
];

/// Find references whose keyword appears in the content, in table order
pub fn find_relevant(content: &str) -> Vec<&'static Reference> {
    let mut relevant = Vec::new();
    for (keyword, refs) in REFERENCE_TABLE {
        if content.contains(keyword) {
            for reference in refs.iter() {
                if !relevant.iter().any(|r: &&Reference| r.id == reference.id) {
                    relevant.push(reference);
                }
            }
        }
    }
    relevant
}

/// A reference cited by this session, with its assigned number
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitedReference {
    pub number: u32,
    pub id: String,
    pub citation: String,
}

/// Per-session citation accumulator
///
/// Assigns stable numbers in first-cited order and deduplicates by
/// reference id.
#[derive(Debug, Clone, Default)]
pub struct CitationBook {
    entries: Vec<CitedReference>,
}

impl CitationBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotate a persona contribution with up to two citation markers.
    ///
    /// Returns the annotated text and the ids of the references cited in
    /// it. Re-citing a reference reuses its existing number.
    pub fn annotate(&mut self, content: &str) -> (String, Vec<String>) {
        let relevant = find_relevant(content);
        if relevant.is_empty() {
            return (content.to_string(), Vec::new());
        }

        let selected: Vec<&'static Reference> = relevant.into_iter().take(2).collect();
        let numbers: Vec<u32> = selected.iter().map(|&r| self.cite(r)).collect();
        let ids: Vec<String> = selected.iter().map(|r| r.id.to_string()).collect();

        (insert_markers(content, &numbers), ids)
    }

    fn cite(&mut self, reference: &'static Reference) -> u32 {
        if let Some(existing) = self.entries.iter().find(|e| e.id == reference.id) {
            return existing.number;
        }
        let number = self.entries.len() as u32 + 1;
        self.entries.push(CitedReference {
            number,
            id: reference.id.to_string(),
            citation: reference.format(),
        });
        number
    }

    pub fn entries(&self) -> &[CitedReference] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Render the accumulated reference list
    pub fn reference_list(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        let mut out = String::from("## 参考文献\n\n");
        for entry in &self.entries {
            out.push_str(&format!("[{}] {}\n\n", entry.number, entry.citation));
        }
        out
    }
}

/// Insert bracketed markers at heuristic sentence midpoints.
///
/// Splits on the full-width period; with enough sentences the first marker
/// lands after the middle sentence and the second before the tail,
/// otherwise markers are appended.
fn insert_markers(content: &str, numbers: &[u32]) -> String {
    let marks: Vec<String> = numbers.iter().map(|n| format!("[{}]", n)).collect();
    let mut sentences: Vec<String> = content.split('。').map(|s| s.to_string()).collect();

    if sentences.len() > 2 {
        let mid = sentences.len() / 2;
        sentences[mid].push_str(&marks[0]);
        if marks.len() > 1 && sentences.len() > 3 {
            let tail = sentences.len() - 2;
            sentences[tail].push_str(&marks[1]);
        }
        sentences.join("。")
    } else {
        let mut out = content.to_string();
        out.push(' ');
        out.push_str(&marks[0]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_relevant_by_keyword() {
        let refs = find_relevant("我们研究二甲双胍的心血管获益");
        assert!(refs.iter().any(|r| r.id == "ref4"));
        assert!(refs.iter().any(|r| r.id == "ref5"));
    }

    #[test]
    fn test_find_relevant_empty_when_no_keyword() {
        assert!(find_relevant("与引用无关的内容").is_empty());
    }

    #[test]
    fn test_annotate_inserts_marker() {
        let mut book = CitationBook::new();
        let (annotated, ids) = book.annotate("样本量需要重新计算");
        assert!(annotated.contains("[1]"));
        assert_eq!(ids, vec!["ref8".to_string()]);
    }

    #[test]
    fn test_deduplicates_by_reference_id() {
        let mut book = CitationBook::new();
        let (_, first) = book.annotate("二甲双胍的研究");
        let (_, second) = book.annotate("继续讨论二甲双胍");
        assert!(first.contains(&"ref4".to_string()));
        assert!(second.contains(&"ref4".to_string()));
        // ref4 and ref5 appear once each despite two citing responses
        assert_eq!(book.len(), 2);
        assert_eq!(book.entries()[0].number, 1);
    }

    #[test]
    fn test_marker_lands_mid_sentence() {
        let mut book = CitationBook::new();
        let content = "第一句。第二句提到样本量。第三句。第四句结束。";
        let (annotated, _) = book.annotate(content);
        assert!(annotated.contains("[1]"));
        // marker attached inside the text, not only at the very end
        assert!(!annotated.ends_with("[1]"));
    }

    #[test]
    fn test_reference_list_rendering() {
        let mut book = CitationBook::new();
        book.annotate("样本量");
        let list = book.reference_list();
        assert!(list.starts_with("## 参考文献"));
        assert!(list.contains("[1] Julious SA"));
    }
}
