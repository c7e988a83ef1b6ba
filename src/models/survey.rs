// 问卷数据模型
// 定义问卷答案、建议与洞察请求的数据结构

use serde::{Deserialize, Serialize};

/// 问卷答案
///
/// M1-M5 为成熟度分数 (0-10，核心逻辑视为不透明字符串)，
/// M6-M8 为开放式问题的自由文本。前端可能提交大小写两种键名。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyAnswers {
    /// M1 交接成熟度分数
    #[serde(alias = "M1")]
    pub m1: Option<String>,
    /// M2 追溯成熟度分数
    #[serde(alias = "M2")]
    pub m2: Option<String>,
    /// M3 变更成熟度分数
    #[serde(alias = "M3")]
    pub m3: Option<String>,
    /// M4 验收成熟度分数
    #[serde(alias = "M4")]
    pub m4: Option<String>,
    /// M5 沟通成熟度分数
    #[serde(alias = "M5")]
    pub m5: Option<String>,
    /// M6 主要挑战 (自由文本)
    #[serde(alias = "M6")]
    pub m6: Option<String>,
    /// M7 期望改善 (自由文本)
    #[serde(alias = "M7")]
    pub m7: Option<String>,
    /// M8 其他资讯 (自由文本)
    #[serde(alias = "M8")]
    pub m8: Option<String>,
}

/// 界面语言
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// 台湾正体中文 (默认)
    ZhTw,
    /// 英文
    EnUs,
}

impl Language {
    /// 从请求中的语言标签解析，未知或缺失时回退 zh-TW
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("en-US") => Language::EnUs,
            _ => Language::ZhTw,
        }
    }

    /// 语言标签
    pub fn tag(&self) -> &'static str {
        match self {
            Language::ZhTw => "zh-TW",
            Language::EnUs => "en-US",
        }
    }

    pub fn is_english(&self) -> bool {
        matches!(self, Language::EnUs)
    }
}

/// M1-M5 分数集合，缺失的分数按 "0" 处理
#[derive(Debug, Clone)]
pub struct MaturityScores {
    pub m1: String,
    pub m2: String,
    pub m3: String,
    pub m4: String,
    pub m5: String,
}

/// M6-M8 开放式问题答案，缺失按空字符串处理
#[derive(Debug, Clone)]
pub struct OpenAnswers {
    pub m6: String,
    pub m7: String,
    pub m8: String,
}

impl OpenAnswers {
    /// 三个开放式问题是否全部为空
    pub fn is_blank(&self) -> bool {
        self.m6.trim().is_empty() && self.m7.trim().is_empty() && self.m8.trim().is_empty()
    }
}

fn score_or_zero(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "0".to_string())
}

fn text_or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// 风险改善建议请求 (基于 M1-M5 分数)
#[derive(Debug, Clone, Deserialize)]
pub struct AdviceRequest {
    /// 界面语言标签 (zh-TW / en-US)
    pub lang: Option<String>,
    #[serde(alias = "M1")]
    pub m1: Option<String>,
    #[serde(alias = "M2")]
    pub m2: Option<String>,
    #[serde(alias = "M3")]
    pub m3: Option<String>,
    #[serde(alias = "M4")]
    pub m4: Option<String>,
    #[serde(alias = "M5")]
    pub m5: Option<String>,
}

impl AdviceRequest {
    pub fn language(&self) -> Language {
        Language::from_tag(self.lang.as_deref())
    }

    pub fn scores(&self) -> MaturityScores {
        MaturityScores {
            m1: score_or_zero(&self.m1),
            m2: score_or_zero(&self.m2),
            m3: score_or_zero(&self.m3),
            m4: score_or_zero(&self.m4),
            m5: score_or_zero(&self.m5),
        }
    }
}

/// AI 洞察请求 (M1-M5 分数 + M6-M8 开放式问题)
#[derive(Debug, Clone, Deserialize)]
pub struct InsightsRequest {
    /// 界面语言标签 (zh-TW / en-US)
    pub lang: Option<String>,
    #[serde(alias = "M1")]
    pub m1: Option<String>,
    #[serde(alias = "M2")]
    pub m2: Option<String>,
    #[serde(alias = "M3")]
    pub m3: Option<String>,
    #[serde(alias = "M4")]
    pub m4: Option<String>,
    #[serde(alias = "M5")]
    pub m5: Option<String>,
    #[serde(alias = "M6")]
    pub m6: Option<String>,
    #[serde(alias = "M7")]
    pub m7: Option<String>,
    #[serde(alias = "M8")]
    pub m8: Option<String>,
}

impl InsightsRequest {
    pub fn language(&self) -> Language {
        Language::from_tag(self.lang.as_deref())
    }

    pub fn scores(&self) -> MaturityScores {
        MaturityScores {
            m1: score_or_zero(&self.m1),
            m2: score_or_zero(&self.m2),
            m3: score_or_zero(&self.m3),
            m4: score_or_zero(&self.m4),
            m5: score_or_zero(&self.m5),
        }
    }

    pub fn answers(&self) -> OpenAnswers {
        OpenAnswers {
            m6: text_or_empty(&self.m6),
            m7: text_or_empty(&self.m7),
            m8: text_or_empty(&self.m8),
        }
    }
}

/// 问卷查询响应 ({success, data, timestamp})
#[derive(Debug, Serialize)]
pub struct SurveyDataResponse {
    pub success: bool,
    pub data: SurveyAnswers,
    pub timestamp: Option<String>,
}

/// 风险改善建议响应
#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    pub advice: String,
}

/// AI 洞察响应
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: String,
}
