use serde::{Deserialize, Serialize};

/// 占位值：字段未知时统一使用 "N/A"
pub const NA: &str = "N/A";

fn na() -> String {
    NA.to_string()
}

fn na3() -> Vec<String> {
    vec![na(), na(), na()]
}

/// 相关工作及其未解决的问题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedWork {
    #[serde(default = "na")]
    pub work: String,
    #[serde(default = "na")]
    pub challenge: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motivation {
    #[serde(default = "na")]
    pub overview: String,
    #[serde(default)]
    pub related_work_challenges: Vec<RelatedWork>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    #[serde(default = "na")]
    pub pipeline: String,
    #[serde(default = "na")]
    pub architecture_loss_training: String,
    #[serde(default = "na")]
    pub complexity_resources: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiments {
    #[serde(default = "na")]
    pub datasets_and_metrics: String,
    #[serde(default)]
    pub baselines: Vec<String>,
    #[serde(default = "na")]
    pub main_results: String,
    #[serde(default = "na")]
    pub ablations: String,
    #[serde(default = "na")]
    pub limitations_tests: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Takeaways {
    #[serde(default = "na3")]
    pub pros_3: Vec<String>,
    #[serde(default = "na3")]
    pub cons_3: Vec<String>,
    #[serde(default = "na3")]
    pub future_3: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default)]
    pub code_links: Vec<String>,
    #[serde(default)]
    pub model_or_data_links: Vec<String>,
}

/// 单个文本窗口的结构化摘要结果。
///
/// 所有字段必定存在：模型响应中缺失的字段在反序列化边界填入占位值，
/// 因此下游合并逻辑不需要处理 null/缺字段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryFragment {
    #[serde(default = "na")]
    pub paper_title: String,
    #[serde(default = "na")]
    pub task: String,
    #[serde(default)]
    pub motivation_and_gaps: Motivation,
    #[serde(default = "na")]
    pub core_idea: String,
    #[serde(default)]
    pub method: Method,
    #[serde(default)]
    pub experiments: Experiments,
    #[serde(default)]
    pub takeaways: Takeaways,
    #[serde(default)]
    pub resources: Resources,
}

/// 整篇文档的规范摘要，由全部窗口片段按顺序折叠得到，形状与片段一致
pub type CanonicalSummary = SummaryFragment;

impl Default for Motivation {
    fn default() -> Self {
        Self {
            overview: na(),
            related_work_challenges: Vec::new(),
        }
    }
}

impl Default for Method {
    fn default() -> Self {
        Self {
            pipeline: na(),
            architecture_loss_training: na(),
            complexity_resources: na(),
        }
    }
}

impl Default for Experiments {
    fn default() -> Self {
        Self {
            datasets_and_metrics: na(),
            baselines: Vec::new(),
            main_results: na(),
            ablations: na(),
            limitations_tests: na(),
        }
    }
}

impl Default for Takeaways {
    fn default() -> Self {
        Self {
            pros_3: na3(),
            cons_3: na3(),
            future_3: na3(),
        }
    }
}

impl Default for SummaryFragment {
    fn default() -> Self {
        Self {
            paper_title: na(),
            task: na(),
            motivation_and_gaps: Motivation::default(),
            core_idea: na(),
            method: Method::default(),
            experiments: Experiments::default(),
            takeaways: Takeaways::default(),
            resources: Resources::default(),
        }
    }
}

/// 解析模型响应为摘要片段，永不失败。
///
/// 顺序：整体按JSON解析 -> 截取首个 '{' 到末个 '}' 的子串再解析 ->
/// 两者都失败时返回全占位骨架。
pub fn parse_fragment(text: &str) -> SummaryFragment {
    let text = text.trim();

    if let Ok(fragment) = serde_json::from_str::<SummaryFragment>(text) {
        return fragment;
    }

    // 模型偶尔在JSON前后附加说明文字或代码围栏，尝试截取修复
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end > start {
            if let Ok(fragment) = serde_json::from_str::<SummaryFragment>(&text[start..=end]) {
                return fragment;
            }
        }
    }

    SummaryFragment::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_all_placeholder() {
        let f = SummaryFragment::default();
        assert_eq!(f.paper_title, NA);
        assert_eq!(f.task, NA);
        assert_eq!(f.motivation_and_gaps.overview, NA);
        assert!(f.motivation_and_gaps.related_work_challenges.is_empty());
        assert_eq!(f.method.pipeline, NA);
        assert!(f.experiments.baselines.is_empty());
        assert_eq!(f.takeaways.pros_3, vec![NA, NA, NA]);
        assert!(f.resources.code_links.is_empty());
    }

    #[test]
    fn missing_fields_become_placeholders() {
        let f = parse_fragment(r#"{"task": "image classification"}"#);
        assert_eq!(f.task, "image classification");
        assert_eq!(f.paper_title, NA);
        assert_eq!(f.method.pipeline, NA);
        assert_eq!(f.takeaways.cons_3, vec![NA, NA, NA]);
    }

    #[test]
    fn recovers_json_wrapped_in_prose() {
        let resp = "Here is the summary:\n```json\n{\"core_idea\": \"use attention\"}\n```\nDone.";
        let f = parse_fragment(resp);
        assert_eq!(f.core_idea, "use attention");
    }

    #[test]
    fn garbage_degrades_to_skeleton() {
        let f = parse_fragment("not json at all");
        assert_eq!(f, SummaryFragment::default());
    }

    #[test]
    fn nested_partial_objects_filled() {
        let f = parse_fragment(
            r#"{"experiments": {"baselines": ["ResNet"], "main_results": "+2.1 mAP"}}"#,
        );
        assert_eq!(f.experiments.baselines, vec!["ResNet"]);
        assert_eq!(f.experiments.main_results, "+2.1 mAP");
        assert_eq!(f.experiments.ablations, NA);
    }
}
