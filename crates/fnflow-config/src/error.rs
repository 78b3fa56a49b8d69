use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("環境変数 {0} が設定されていません")]
    MissingVar(String),

    #[error("環境変数 COMPARTMENT_ID が設定されていません (COMPARTMENT_NAME でも指定できます)")]
    MissingCompartment,

    #[error("環境変数 {var} の値が不正です: '{value}' ({reason})")]
    InvalidValue {
        var: String,
        value: String,
        reason: String,
    },

    #[error("ホームディレクトリが見つかりません")]
    HomeDirNotFound,

    #[error(
        "OCI 設定ファイルが見つかりません: {0}\n\
        `oci setup config` で作成するか、OCI_CONFIG_PATH 環境変数で指定してください"
    )]
    OciConfigNotFound(PathBuf),

    #[error("OCI 設定ファイル {path} にプロファイル [{profile}] がありません")]
    ProfileNotFound { profile: String, path: PathBuf },

    #[error("プロファイル [{0}] に tenancy が設定されていません")]
    TenancyNotFound(String),

    #[error("OCI 設定ファイルの読み込みに失敗しました: {0}")]
    OciConfig(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
