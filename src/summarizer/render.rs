use super::schema::{CanonicalSummary, NA};

/// 把规范摘要渲染为带折叠块的Markdown。
///
/// 纯格式化：固定小节顺序 Task -> Motivation & Gaps -> Core Idea ->
/// Method -> Experiments -> Takeaways，列表字段非空时逗号拼接，否则占位值。
pub fn summary_to_markdown(s: &CanonicalSummary) -> String {
    let mut md = String::new();

    md.push_str("<details>\n");
    md.push_str("<summary>📄 Paper Summary (click to expand)</summary>\n\n");

    md.push_str("### 1. Task / Problem\n");
    md.push_str(&s.task);
    md.push_str("\n\n### 2. Motivation & Gaps\n");
    md.push_str(&s.motivation_and_gaps.overview);
    md.push('\n');

    if !s.motivation_and_gaps.related_work_challenges.is_empty() {
        md.push_str("\n**Related work challenges:**\n");
        for item in &s.motivation_and_gaps.related_work_challenges {
            md.push_str(&format!("- {}: {}\n", item.work, item.challenge));
        }
    }

    md.push_str("\n### 3. Core Idea\n");
    md.push_str(&s.core_idea);

    md.push_str("\n\n### 4. Method\n");
    md.push_str(&format!("- **Pipeline**: {}\n", s.method.pipeline));
    md.push_str(&format!(
        "- **Architecture / Loss / Training**: {}\n",
        s.method.architecture_loss_training
    ));
    md.push_str(&format!(
        "- **Complexity / Resources**: {}\n",
        s.method.complexity_resources
    ));

    md.push_str("\n### 5. Experiments\n");
    md.push_str(&format!(
        "- **Datasets & Metrics**: {}\n",
        s.experiments.datasets_and_metrics
    ));
    md.push_str(&format!(
        "- **Baselines**: {}\n",
        join_or_na(&s.experiments.baselines)
    ));
    md.push_str(&format!("- **Main Results**: {}\n", s.experiments.main_results));
    md.push_str(&format!("- **Ablations**: {}\n", s.experiments.ablations));
    md.push_str(&format!(
        "- **Limitations / Stress Tests**: {}\n",
        s.experiments.limitations_tests
    ));

    md.push_str("\n### 6. Takeaways\n");
    md.push_str(&format!("- **Pros**: {}\n", join_or_na(&s.takeaways.pros_3)));
    md.push_str(&format!("- **Cons**: {}\n", join_or_na(&s.takeaways.cons_3)));
    md.push_str(&format!(
        "- **Future Work**: {}\n",
        join_or_na(&s.takeaways.future_3)
    ));

    md.push_str("\n</details>\n");
    md
}

fn join_or_na(items: &[String]) -> String {
    if items.is_empty() {
        NA.to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarizer::schema::{RelatedWork, SummaryFragment};

    #[test]
    fn placeholder_summary_renders_all_sections() {
        let md = summary_to_markdown(&SummaryFragment::default());
        assert!(md.starts_with("<details>"));
        assert!(md.trim_end().ends_with("</details>"));
        for heading in [
            "### 1. Task / Problem",
            "### 2. Motivation & Gaps",
            "### 3. Core Idea",
            "### 4. Method",
            "### 5. Experiments",
            "### 6. Takeaways",
        ] {
            assert!(md.contains(heading), "缺少小节: {}", heading);
        }
        // 空列表渲染为占位值
        assert!(md.contains("- **Baselines**: N/A"));
        // 全占位摘要不渲染相关工作列表
        assert!(!md.contains("Related work challenges"));
    }

    #[test]
    fn lists_are_comma_joined() {
        let mut s = SummaryFragment::default();
        s.experiments.baselines = vec!["A".to_string(), "B".to_string()];
        s.takeaways.pros_3 = vec!["p1".to_string(), "p2".to_string(), "p3".to_string()];
        let md = summary_to_markdown(&s);
        assert!(md.contains("- **Baselines**: A, B"));
        assert!(md.contains("- **Pros**: p1, p2, p3"));
    }

    #[test]
    fn related_work_renders_as_bullets() {
        let mut s = SummaryFragment::default();
        s.motivation_and_gaps.related_work_challenges = vec![RelatedWork {
            work: "NeRF".to_string(),
            challenge: "slow training".to_string(),
        }];
        let md = summary_to_markdown(&s);
        assert!(md.contains("**Related work challenges:**"));
        assert!(md.contains("- NeRF: slow training"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let s = SummaryFragment::default();
        assert_eq!(summary_to_markdown(&s), summary_to_markdown(&s));
    }
}
