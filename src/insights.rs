use serde::{Deserialize, Serialize};

use crate::catalog::{QuestionCatalog, Strategy};
use crate::scoring::{CategoryScore, ClassificationResult, Mode, Selection, Tier};

pub const STRENGTH_FALLBACK: &str = "이 영역에서 뛰어난 역량을 보여주고 있습니다.";
pub const WEAKNESS_FALLBACK: &str = "이 영역에서 개선이 필요합니다.";

/// Descriptive copy for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierProfile {
    pub characteristics: &'static [&'static str; 4],
    pub recommendations: &'static [&'static str; 4],
}

pub fn tier_profile(tier: Tier) -> TierProfile {
    match tier {
        Tier::Beginner => TierProfile {
            characteristics: &[
                "AI 기술에 대한 기본적인 이해가 부족합니다.",
                "AI 도구 사용 경험이 제한적입니다.",
                "AI 시대 변화에 대한 불안감이 있을 수 있습니다.",
                "디지털 역량이 제한적일 수 있습니다.",
            ],
            recommendations: &[
                "기초 AI 개념과 용어를 학습하세요.",
                "ChatGPT와 같은 기본적인 AI 도구 사용법을 익히세요.",
                "일상 업무에 AI 도구를 점진적으로 통합해보세요.",
                "AI 시대에 필요한 기초 디지털 역량을 강화하세요.",
            ],
        },
        Tier::Explorer => TierProfile {
            characteristics: &[
                "AI 기술의 기본 개념을 이해하고 있습니다.",
                "일부 AI 도구를 업무에 활용하고 있습니다.",
                "AI 시대 변화에 적응하려는 의지가 있습니다.",
                "AI 활용 범위를 확장하고자 합니다.",
            ],
            recommendations: &[
                "다양한 AI 도구를 실험하고 비교해보세요.",
                "프롬프트 엔지니어링 기술을 향상시키세요.",
                "AI와 협업하는 워크플로우를 개발하세요.",
                "특정 도메인에서 AI 활용 사례를 연구하세요.",
            ],
        },
        Tier::Adapter => TierProfile {
            characteristics: &[
                "다양한 AI 도구를 효과적으로 활용하고 있습니다.",
                "AI와 협업하여 창의적인 결과물을 만들 수 있습니다.",
                "AI 시대 변화에 적극적으로 대응하고 있습니다.",
                "AI 활용에 있어 자신만의 방법론을 개발하고 있습니다.",
            ],
            recommendations: &[
                "AI 도구를 조합한 복잡한 워크플로우를 구축해보세요.",
                "AI와 인간의 강점을 결합한 하이브리드 접근법을 개발하세요.",
                "특정 도메인에서 AI 활용 전문성을 키우세요.",
                "AI 윤리와 책임에 대한 이해를 심화하세요.",
            ],
        },
        Tier::Leader => TierProfile {
            characteristics: &[
                "AI 기술을 전략적으로 활용하여 혁신을 주도합니다.",
                "AI와 인간의 시너지를 극대화하는 방법을 이해하고 있습니다.",
                "AI 시대의 변화를 기회로 전환할 수 있습니다.",
                "AI 활용에 있어 다른 사람들을 지도하고 영감을 줄 수 있습니다.",
            ],
            recommendations: &[
                "AI 기반 혁신 프로젝트를 주도해보세요.",
                "AI 시대 리더십 역량을 개발하세요.",
                "AI 지식과 경험을 다른 사람들과 공유하세요.",
                "AI 기술 트렌드를 예측하고 선제적으로 대응하세요.",
            ],
        },
    }
}

/// A strength or weakness with the sentence explaining it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNote {
    pub category: String,
    pub label: String,
    pub score: u8,
    pub note: String,
}

/// Everything the results view shows, assembled from a classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub mode: Mode,
    pub score: u8,
    pub tier: Tier,
    pub tier_label: String,
    pub characteristics: Vec<String>,
    pub recommendations: Vec<String>,
    pub strengths: Vec<CategoryNote>,
    pub weaknesses: Vec<CategoryNote>,
    pub risk_factors: Vec<String>,
    pub opportunities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
}

#[derive(Clone, Copy)]
enum Side {
    Strength,
    Weakness,
}

fn annotate(scores: &[CategoryScore], catalog: &QuestionCatalog, side: Side) -> Vec<CategoryNote> {
    scores
        .iter()
        .map(|score| {
            let def = catalog.category(score.category.as_str());
            let note = match side {
                Side::Strength => def
                    .and_then(|d| d.strength_note.clone())
                    .unwrap_or_else(|| STRENGTH_FALLBACK.to_string()),
                Side::Weakness => def
                    .and_then(|d| d.weakness_note.clone())
                    .unwrap_or_else(|| WEAKNESS_FALLBACK.to_string()),
            };
            CategoryNote {
                category: score.category.to_string(),
                label: score.label.clone(),
                score: score.score,
                note,
            }
        })
        .collect()
}

pub fn build_report(
    result: &ClassificationResult,
    catalog: &QuestionCatalog,
    selection: &Selection,
) -> AnalysisReport {
    let profile = tier_profile(result.tier);
    // Specialized scores are keyed by the job or industry id, which never
    // matches a general category, so they take the fallback notes.
    let (strengths, weaknesses) = match selection.mode {
        Mode::General => (
            annotate(&result.strengths, catalog, Side::Strength),
            annotate(&result.weaknesses, catalog, Side::Weakness),
        ),
        Mode::Job | Mode::Industry => {
            let empty = QuestionCatalog::default();
            (
                annotate(&result.strengths, &empty, Side::Strength),
                annotate(&result.weaknesses, &empty, Side::Weakness),
            )
        }
    };

    AnalysisReport {
        mode: selection.mode,
        score: result.score,
        tier: result.tier,
        tier_label: result.tier.label().to_string(),
        characteristics: profile.characteristics.iter().map(|s| s.to_string()).collect(),
        recommendations: profile.recommendations.iter().map(|s| s.to_string()).collect(),
        strengths,
        weaknesses,
        risk_factors: result.risk_factors.clone(),
        opportunities: result.opportunities.clone(),
        strategy: catalog
            .specialized(selection)
            .and_then(|def| def.strategy.clone()),
    }
}
