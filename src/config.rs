use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

/// 設定ファイルを置くディレクトリ名。
const CONFIG_DIR_NAME: &str = "toggl-time-reporter";

/// Toggl APIに接続するための設定。
///
/// コマンドライン引数で指定しない場合は環境変数から読み込む。
#[derive(Clone, clap::Args)]
pub struct ApiConfig {
    #[clap(
        long = "api-key",
        env = "API_TOKEN",
        hide_env_values = true,
        help = "API token, found in Toggl profile settings"
    )]
    pub api_token: String,

    #[clap(long = "email", env = "EMAIL", help = "Your email address")]
    pub email: String,

    #[clap(
        long = "workspace-id",
        env = "WORKSPACE_ID",
        help = "Id of the Toggl workspace"
    )]
    pub workspace_id: String,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_token", &"***")
            .field("email", &self.email)
            .field("workspace_id", &self.workspace_id)
            .finish()
    }
}

/// `.env`ファイルを環境変数として読み込む。
///
/// カレントディレクトリ、設定ディレクトリの順に読み込み、既に設定されている環境変数は上書きしない。
/// 読み込んだファイルのパスを返す。
pub fn load_env_files() -> Result<Vec<PathBuf>> {
    let mut candidates = vec![PathBuf::from(".env")];
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join(CONFIG_DIR_NAME).join(".env"));
    }

    let mut loaded = Vec::new();
    for path in candidates {
        if load_env_file(&path)? {
            loaded.push(path);
        }
    }

    Ok(loaded)
}

/// 1つの`.env`ファイルを読み込む。ファイルが存在しない場合は`false`を返す。
fn load_env_file(path: &Path) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    dotenvy::from_path(path)
        .with_context(|| format!("Failed to load environment file: {}", path.display()))?;
    debug!("Loaded environment file: {}", path.display());

    Ok(true)
}
