use serde::{Deserialize, Serialize};
use std::fmt;

/// Readiness tiers, ordered lowest to highest.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Beginner,
    Explorer,
    Adapter,
    Leader,
}

const LEADER_MIN: f64 = 80.0;
const ADAPTER_MIN: f64 = 60.0;
const EXPLORER_MIN: f64 = 40.0;

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Beginner, Tier::Explorer, Tier::Adapter, Tier::Leader];

    /// Threshold ladder, top-down, first match wins. Lower band edges are inclusive.
    pub fn from_percentage(percentage: f64) -> Tier {
        if percentage >= LEADER_MIN {
            Tier::Leader
        } else if percentage >= ADAPTER_MIN {
            Tier::Adapter
        } else if percentage >= EXPLORER_MIN {
            Tier::Explorer
        } else {
            Tier::Beginner
        }
    }

    /// Display name used in product copy and stored with history records.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Beginner => "AI 초보자",
            Tier::Explorer => "AI 탐색자",
            Tier::Adapter => "AI 적응자",
            Tier::Leader => "AI 시대 선도자",
        }
    }

    pub fn risk_factors(&self) -> &'static [&'static str; 4] {
        match self {
            Tier::Leader => &[
                "과도한 AI 의존성으로 인한 비판적 사고 약화",
                "인간 고유의 가치와 직관 상실 위험",
                "AI 기술 변화에 따른 지속적 학습 부담",
                "윤리적 판단과 책임 문제에 대한 고민 필요",
            ],
            Tier::Adapter => &[
                "급변하는 AI 기술 변화 속도 따라가기 어려움",
                "특정 분야에 국한된 AI 활용 능력",
                "AI 결과물에 대한 과신 위험",
                "창의적 활용보다 기본적 활용에 머무름",
            ],
            Tier::Explorer => &[
                "AI 기술 이해 부족으로 인한 활용 제한",
                "업무 자동화로 인한 역할 축소 위험",
                "AI 도구 선택과 활용에 대한 불확실성",
                "변화 적응에 대한 심리적 부담",
            ],
            Tier::Beginner => &[
                "AI에 의한 직무 대체 위험 증가",
                "디지털 역량 부족으로 인한 경쟁력 약화",
                "변화에 대한 두려움과 저항",
                "AI 시대 적응을 위한 출발점 부재",
            ],
        }
    }

    pub fn opportunities(&self) -> &'static [&'static str; 4] {
        match self {
            Tier::Leader => &[
                "AI 활용 전문가로서 조직 내 리더십 발휘",
                "AI와 인간 협업 시스템 구축 및 최적화",
                "AI 기반 혁신 프로젝트 주도",
                "AI 윤리와 거버넌스 분야 전문성 개발",
            ],
            Tier::Adapter => &[
                "AI 활용 심화 학습을 통한 전문성 강화",
                "다양한 AI 도구 실험 및 통합 활용",
                "창의적 문제 해결 능력과 AI 결합",
                "특정 도메인에서 AI 활용 전문가로 성장",
            ],
            Tier::Explorer => &[
                "AI 기초 학습을 통한 이해도 향상",
                "일상 업무에 AI 도구 점진적 통합",
                "AI 활용 커뮤니티 참여 및 네트워킹",
                "특정 AI 도구 집중 학습 및 마스터",
            ],
            Tier::Beginner => &[
                "기초 디지털 역량 강화 프로그램 참여",
                "AI 이해 및 기초 학습 시작",
                "AI 도구 체험 및 실험적 활용",
                "AI 시대 적응을 위한 마인드셋 개발",
            ],
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
