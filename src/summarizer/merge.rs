use std::collections::BTreeSet;

use super::schema::{CanonicalSummary, SummaryFragment, NA};

/// 按窗口顺序把摘要片段折叠为一份规范摘要。
///
/// 标量字段：先写者胜，占位值不算写入；
/// related_work_challenges：无条件追加，不去重；
/// baselines / code_links / model_or_data_links：追加后去重并排序；
/// pros_3 / cons_3 / future_3：首个含非占位项的片段整体取用，此后不再改动。
/// 纯函数，对任意片段序列（含空序列）都有定义。
pub fn merge_fragments(fragments: &[SummaryFragment]) -> CanonicalSummary {
    let mut result = CanonicalSummary::default();

    for f in fragments {
        take_scalar(&mut result.paper_title, &f.paper_title);
        take_scalar(&mut result.task, &f.task);
        take_scalar(&mut result.core_idea, &f.core_idea);

        take_scalar(
            &mut result.motivation_and_gaps.overview,
            &f.motivation_and_gaps.overview,
        );
        result
            .motivation_and_gaps
            .related_work_challenges
            .extend(f.motivation_and_gaps.related_work_challenges.iter().cloned());

        take_scalar(&mut result.method.pipeline, &f.method.pipeline);
        take_scalar(
            &mut result.method.architecture_loss_training,
            &f.method.architecture_loss_training,
        );
        take_scalar(
            &mut result.method.complexity_resources,
            &f.method.complexity_resources,
        );

        take_scalar(
            &mut result.experiments.datasets_and_metrics,
            &f.experiments.datasets_and_metrics,
        );
        take_scalar(&mut result.experiments.main_results, &f.experiments.main_results);
        take_scalar(&mut result.experiments.ablations, &f.experiments.ablations);
        take_scalar(
            &mut result.experiments.limitations_tests,
            &f.experiments.limitations_tests,
        );
        result
            .experiments
            .baselines
            .extend(f.experiments.baselines.iter().cloned());

        take_triple(&mut result.takeaways.pros_3, &f.takeaways.pros_3);
        take_triple(&mut result.takeaways.cons_3, &f.takeaways.cons_3);
        take_triple(&mut result.takeaways.future_3, &f.takeaways.future_3);

        result
            .resources
            .code_links
            .extend(f.resources.code_links.iter().cloned());
        result
            .resources
            .model_or_data_links
            .extend(f.resources.model_or_data_links.iter().cloned());
    }

    result.experiments.baselines = dedup_sorted(&result.experiments.baselines);
    result.resources.code_links = dedup_sorted(&result.resources.code_links);
    result.resources.model_or_data_links = dedup_sorted(&result.resources.model_or_data_links);

    result
}

/// 标量合并规则：结果仍是占位值且候选非空非占位时才写入
fn take_scalar(slot: &mut String, candidate: &str) {
    if slot == NA && !candidate.is_empty() && candidate != NA {
        *slot = candidate.to_string();
    }
}

/// 三元组数组只取用一次：首个含非占位项的候选整体替换，占位项过滤，至多保留3项
fn take_triple(slot: &mut Vec<String>, candidate: &[String]) {
    if !slot.iter().all(|x| x == NA) {
        return;
    }
    if candidate.iter().any(|x| !x.is_empty() && x != NA) {
        *slot = candidate
            .iter()
            .filter(|x| !x.is_empty() && *x != NA)
            .take(3)
            .cloned()
            .collect();
    }
}

/// 集合语义：去重并按字典序排序（区分大小写）
fn dedup_sorted(items: &[String]) -> Vec<String> {
    items
        .iter()
        .cloned()
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}
