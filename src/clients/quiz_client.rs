//! 测验后端 API 客户端
//!
//! 封装所有与测验后端相关的调用：拉取任务测验、拉取机构评分卡库、
//! 保存草稿、发布。重试 / 退避策略不在核心范围内。

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::dto::{PublishPayload, QuizResource, SaveDraftPayload, ScorecardResource};
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};

/// 后端统一响应信封
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    code: u64,
    message: Option<String>,
    data: Option<T>,
}

/// 测验后端客户端
pub struct QuizApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl QuizApiClient {
    /// 创建新的后端客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            token: config.api_token.clone(),
        })
    }

    /// 拉取任务对应的测验（标题 + 题目列表）
    pub async fn fetch_task(&self, task_id: &str) -> AppResult<QuizResource> {
        self.get_json(&format!("task/{}/quiz", task_id)).await
    }

    /// 拉取机构级评分卡库
    pub async fn fetch_org_scorecards(&self, org_id: i64) -> AppResult<Vec<ScorecardResource>> {
        self.get_json(&format!("org/{}/scorecards", org_id)).await
    }

    /// 保存草稿（不改变发布状态，可反复调用）
    pub async fn save_draft(&self, payload: &SaveDraftPayload) -> AppResult<()> {
        debug!("保存草稿: 任务 {}，共 {} 题", payload.task_id, payload.questions.len());
        let _: serde_json::Value = self.post_json("quiz/draft/save", payload).await?;
        Ok(())
    }

    /// 发布测验，返回已反映发布状态的资源
    pub async fn publish(&self, payload: &PublishPayload) -> AppResult<QuizResource> {
        debug!("发布测验: 任务 {}，共 {} 题", payload.task_id, payload.questions.len());
        self.post_json("quiz/publish", payload).await
    }

    // ========== HTTP 辅助方法 ==========

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> AppResult<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .http
            .get(&url)
            .header("quiztoken", &self.token)
            .send()
            .await?;
        let envelope: ApiEnvelope<T> = response.json().await?;
        Self::unwrap_envelope(endpoint, envelope)
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> AppResult<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .http
            .post(&url)
            .header("quiztoken", &self.token)
            .json(body)
            .send()
            .await?;
        let envelope: ApiEnvelope<T> = response.json().await?;
        Self::unwrap_envelope(endpoint, envelope)
    }

    fn unwrap_envelope<T>(endpoint: &str, envelope: ApiEnvelope<T>) -> AppResult<T> {
        if envelope.code != 200 {
            return Err(AppError::bad_response(
                endpoint,
                Some(envelope.code),
                envelope.message,
            ));
        }
        envelope.data.ok_or_else(|| {
            AppError::Api(ApiError::EmptyResponse {
                endpoint: endpoint.to_string(),
            })
        })
    }
}
