use thiserror::Error;

/// Mock API 的业务失败，`code` 与响应信封中的 code 一致
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("邮箱或密码错误")]
    InvalidCredentials,
    #[error("两次输入的密码不一致")]
    PasswordMismatch,
    #[error("用户不存在")]
    UserNotFound,
    #[error("角色不存在")]
    RoleNotFound,
    #[error("文档不存在")]
    DocumentNotFound,
    #[error("任务不存在")]
    TaskNotFound,
    #[error("未登录或登录已过期")]
    Unauthorized,
    #[error("没有权限访问该资源")]
    Forbidden,
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn code(&self) -> u16 {
        match self {
            Self::InvalidCredentials | Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::UserNotFound | Self::DocumentNotFound | Self::TaskNotFound => 404,
            Self::PasswordMismatch | Self::RoleNotFound | Self::BadRequest(_) => 400,
        }
    }
}

/// 从非 200 信封还原出的失败信息
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct ApiFailure {
    pub code: u16,
    pub message: String,
}

impl From<ApiError> for ApiFailure {
    fn from(e: ApiError) -> Self {
        Self {
            code: e.code(),
            message: e.to_string(),
        }
    }
}

/// 本地存储读写失败
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("存储读写失败：{0}")]
    Io(#[from] std::io::Error),
    #[error("存储数据序列化失败：{0}")]
    Json(#[from] serde_json::Error),
    #[error("非法的存储键名：{0}")]
    InvalidKey(String),
}
