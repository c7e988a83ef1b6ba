// OpenAI对话补全服务
// 负责生成风险改善建议、AI洞察以及中译英的出站调用

use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::OpenAiConfig;
use crate::models::{Language, MaturityScores, OpenAnswers};

/// 对话补全调用错误
#[derive(Debug, Error)]
pub enum ChatApiError {
    /// 上游返回非2xx状态码
    #[error("OpenAI API error: {status} - {body}")]
    Api { status: u16, body: String },
    /// 网络传输失败 (含超时)
    #[error("OpenAI request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// 响应缺少预期字段
    #[error("OpenAI response malformed: {0}")]
    Parse(String),
}

/// 风险改善建议系统提示词 (基于 M1-M5 分数，输出精简可执行建议)
const ADVICE_SYSTEM_PROMPT: &str = "\
你是資深的專案管理和文件風險評估專家。請根據用戶的風險評估分數，\
提供風險改善建議，並確保建議可執行。請嚴格使用台灣繁體中文正式用語。\n\n\
分析要求：\n\
1. 根據 M1-M5 的成熟度分數（0-10分），識別最弱的領域\n\
2. 提供具體、可執行的改善建議\n\
3. 優先關注最關鍵的問題\n\n\
輸出格式：\n\
提供 1-2 句精簡、可執行的建議（使用台灣繁體中文正式用語）。";

/// 建议翻译系统提示词
const ADVICE_TRANSLATION_PROMPT: &str = "\
You are a professional translator specializing in technical and business \
documents. Translate the following Traditional Chinese text to English while \
maintaining the exact same meaning and tone, professional business English \
appropriate for government and enterprise contexts, and the original length \
(1-2 sentences).\n\nTranslate the following text:";

/// AI洞察系统提示词 (繁体中文版)
const INSIGHTS_SYSTEM_PROMPT_ZH: &str = "\
你是資深的專案管理和文件風險評估專家，專門服務台灣企業。請深入分析用戶的\
風險評估結果，結合量化分數和質性描述，識別問題的根本原因，並提供具體、\
可執行的建議。請嚴格使用台灣繁體中文正式用語。\n\n\
分析要求：\n\
1. 結合 M1-M5 的成熟度分數（0-10分）和 M6-M8 的文字描述進行深度分析\n\
2. 識別問題的根本原因，而非表面症狀\n\
3. 提供 3-5 個優先級排序的具體改善建議，每個建議下包含多個可執行的行動項目\n\
4. 總字數控制在約 600-800 字，使用條列式表達，確保完整輸出不中途截斷\n\n\
輸出格式（使用台灣繁體中文）：\n\
【核心問題】\n\
用 2-3 句話總結最關鍵的問題，說明根本原因。\n\n\
【改善建議1】優先級最高的建議標題\n\
• 具體行動項目\n\n\
【改善建議2】次優先的建議標題\n\
• 具體行動項目\n\n\
【總結】\n\
用 1-2 句話總結實施這些建議後的預期效果。";

/// AI洞察系统提示词 (英文版，无中文缓存可译时直接生成)
const INSIGHTS_SYSTEM_PROMPT_EN: &str = "\
You are a senior project management and documentation risk assessment expert. \
Deeply analyze the user's risk assessment results, combining quantitative \
scores and qualitative descriptions to identify root causes and provide \
specific, actionable recommendations.\n\n\
Analysis requirements:\n\
1. Combine M1-M5 maturity scores (0-10) and M6-M8 text descriptions\n\
2. Identify root causes, not surface symptoms\n\
3. Provide 3-5 prioritized recommendations, each with bulleted action items\n\
4. Keep the total around 600-800 words and finish all thoughts\n\n\
Output format (in English):\n\
【Core Issue】\n\
Summarize the most critical problem in 2-3 sentences.\n\n\
【Recommendation 1】Title\n\
• Specific action item\n\n\
【Recommendation 2】Title\n\
• Specific action item\n\n\
【Summary】\n\
Summarize the expected effects in 1-2 sentences.";

/// 洞察翻译系统提示词
const INSIGHTS_TRANSLATION_PROMPT: &str = "\
You are a professional translator specializing in technical and business \
documents. Translate the following Traditional Chinese text to English while \
maintaining the exact same structure and formatting (including section \
headings with 【】 and bullet points), the same number of recommendations and \
action items, and professional business English appropriate for government \
and enterprise contexts.\n\nTranslate the following text:";

/// OpenAI对话补全服务
pub struct OpenAiService {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiService {
    /// 创建新的服务实例
    ///
    /// # Arguments
    /// * `client` - 共享的HTTP客户端 (超时已在构建时设定)
    /// * `config` - OpenAI API配置
    pub fn new(client: Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }

    /// 发起一次对话补全调用
    ///
    /// 单次出站请求，不重试；非2xx响应连同状态码与响应体作为错误返回。
    ///
    /// # Arguments
    /// * `system_prompt` - 系统角色提示词
    /// * `user_prompt` - 用户角色内容
    /// * `temperature` - 采样温度
    /// * `max_tokens` - 生成上限
    ///
    /// # Returns
    /// * 生成的文本 (choices[0].message.content)
    pub async fn chat_completion(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, ChatApiError> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt }
            ],
            "temperature": temperature,
            "max_tokens": max_tokens
        });

        let url = format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'));
        let mut request = self.client.post(&url).json(&body);
        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatApiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await?;
        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                ChatApiError::Parse("missing choices[0].message.content".to_string())
            })
    }

    /// 生成风险改善建议 (繁体中文)
    pub async fn generate_advice(
        &self,
        scores: &MaturityScores,
    ) -> Result<String, ChatApiError> {
        let user_prompt = format!(
            "風險評估分數：\n\
             • M1 交接：{} 分\n\
             • M2 追溯：{} 分\n\
             • M3 變更：{} 分\n\
             • M4 驗收：{} 分\n\
             • M5 溝通：{} 分\n\n\
             請提供風險改善建議。",
            scores.m1, scores.m2, scores.m3, scores.m4, scores.m5
        );
        self.chat_completion(ADVICE_SYSTEM_PROMPT, &user_prompt, 0.8, 200)
            .await
    }

    /// 将中文建议翻译为英文
    ///
    /// 翻译失败时返回原始中文文本，不向调用方传播错误。
    pub async fn translate_advice_to_english(&self, chinese_advice: &str) -> String {
        match self
            .chat_completion(ADVICE_TRANSLATION_PROMPT, chinese_advice, 0.3, 300)
            .await
        {
            Ok(translated) => translated,
            Err(e) => {
                log::error!("Advice translation failed, returning original text: {}", e);
                chinese_advice.to_string()
            }
        }
    }

    /// 生成AI洞察
    ///
    /// 根据请求语言选择提示词；仅中文结果会被调用方缓存。
    pub async fn generate_insights(
        &self,
        scores: &MaturityScores,
        answers: &OpenAnswers,
        lang: Language,
    ) -> Result<String, ChatApiError> {
        let (system_prompt, user_prompt) = if lang.is_english() {
            (
                INSIGHTS_SYSTEM_PROMPT_EN,
                format!(
                    "Risk Assessment Results:\n\n\
                     Quantitative Indicators (Maturity Score 0-10):\n\
                     • M1 Handover: {} points\n\
                     • M2 Traceability: {} points\n\
                     • M3 Change: {} points\n\
                     • M4 Acceptance: {} points\n\
                     • M5 Communication: {} points\n\n\
                     Qualitative Descriptions (Open-ended Questions):\n\
                     • Question 6 - Main Challenges: {}\n\
                     • Question 7 - Areas to Improve: {}\n\
                     • Question 8 - Other Information: {}\n\n\
                     Please conduct a deep analysis and provide improvement recommendations.",
                    scores.m1, scores.m2, scores.m3, scores.m4, scores.m5,
                    answers.m6, answers.m7, answers.m8
                ),
            )
        } else {
            (
                INSIGHTS_SYSTEM_PROMPT_ZH,
                format!(
                    "風險評估結果：\n\n\
                     量化指標（成熟度分數 0-10）：\n\
                     • M1 交接：{} 分\n\
                     • M2 追溯：{} 分\n\
                     • M3 變更：{} 分\n\
                     • M4 驗收：{} 分\n\
                     • M5 溝通：{} 分\n\n\
                     質性描述（開放式問題）：\n\
                     • 問題6 - 主要挑戰：{}\n\
                     • 問題7 - 期望改善：{}\n\
                     • 問題8 - 其他資訊：{}\n\n\
                     請進行深度分析並提供改善建議。",
                    scores.m1, scores.m2, scores.m3, scores.m4, scores.m5,
                    answers.m6, answers.m7, answers.m8
                ),
            )
        };

        self.chat_completion(system_prompt, &user_prompt, 0.8, 1200)
            .await
    }

    /// 将中文洞察翻译为英文，失败时返回原始中文文本
    pub async fn translate_insights_to_english(&self, chinese_insights: &str) -> String {
        match self
            .chat_completion(INSIGHTS_TRANSLATION_PROMPT, chinese_insights, 0.3, 1500)
            .await
        {
            Ok(translated) => translated,
            Err(e) => {
                log::error!("Insights translation failed, returning original text: {}", e);
                chinese_insights.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// 启动只处理一个请求的HTTP桩服务器，返回其基础地址
    fn spawn_one_shot_server(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut data = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).unwrap_or(0);
                if n == 0 {
                    break;
                }
                data.extend_from_slice(&buf[..n]);
                if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&data[..pos]).to_string();
                    let content_length = head
                        .lines()
                        .filter_map(|line| {
                            let line = line.to_ascii_lowercase();
                            line.strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                        })
                        .next()
                        .unwrap_or(0);
                    if data.len() >= pos + 4 + content_length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).ok();
            stream.flush().ok();
        });
        format!("http://{}", addr)
    }

    fn service_for(api_base: String) -> OpenAiService {
        let config = OpenAiConfig {
            api_key: "test-key".to_string(),
            api_base,
            model: "gpt-3.5-turbo".to_string(),
            timeout_secs: 5,
        };
        OpenAiService::new(Client::new(), config)
    }

    #[tokio::test]
    async fn test_chat_completion_extracts_content() {
        let base = spawn_one_shot_server(
            "200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"建議加強交接文件"}}]}"#,
        );
        let service = service_for(base);

        let result = service
            .chat_completion("system", "user", 0.8, 200)
            .await
            .unwrap();
        assert_eq!(result, "建議加強交接文件");
    }

    #[tokio::test]
    async fn test_chat_completion_surfaces_upstream_error() {
        let base = spawn_one_shot_server(
            "500 Internal Server Error",
            r#"{"error":{"message":"boom"}}"#,
        );
        let service = service_for(base);

        let err = service
            .chat_completion("system", "user", 0.8, 200)
            .await
            .unwrap_err();
        match err {
            ChatApiError::Api { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("unexpected error variant: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_chat_completion_rejects_malformed_response() {
        let base = spawn_one_shot_server("200 OK", r#"{"choices":[]}"#);
        let service = service_for(base);

        let err = service
            .chat_completion("system", "user", 0.8, 200)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatApiError::Parse(_)));
    }

    #[tokio::test]
    async fn test_translation_falls_back_to_original() {
        // 目标端口不可达，翻译失败时应返回原文
        let service = service_for("http://127.0.0.1:9".to_string());
        let original = "建議加強交接文件";
        assert_eq!(service.translate_advice_to_english(original).await, original);
        assert_eq!(
            service.translate_insights_to_english(original).await,
            original
        );
    }
}
