/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 后端 API 基础地址
    pub api_base_url: String,
    /// 后端 API 访问令牌
    pub api_token: String,
    /// 机构 id，用于拉取机构级评分卡库
    pub org_id: i64,
    /// 校验失败高亮的自动清除延迟（毫秒）
    pub highlight_clear_ms: u64,
    /// HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            api_token: String::new(),
            org_id: 1,
            highlight_clear_ms: 3000,
            request_timeout_secs: 15,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("QUIZ_API_BASE_URL").unwrap_or(default.api_base_url),
            api_token: std::env::var("QUIZ_API_TOKEN").unwrap_or(default.api_token),
            org_id: std::env::var("QUIZ_ORG_ID").ok().and_then(|v| v.parse().ok()).unwrap_or(default.org_id),
            highlight_clear_ms: std::env::var("HIGHLIGHT_CLEAR_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.highlight_clear_ms),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}
