use std::env;
use std::path::PathBuf;

use manifest::ManifestStore;
use tracing::info;

use crate::fs::LocalFileSystem;
use crate::settings::{ProjectPaths, Settings};
use crate::walker::DeployWalker;
use crate::wallet::load_wallet;
use crate::CliResult;

const USER_AGENT: &str = concat!("permadeploy/", env!("CARGO_PKG_VERSION"));

/// Deploys the project's build output and returns the message to show once it completes.
pub fn invoke(cwd: Option<PathBuf>) -> CliResult<Option<String>> {
    let cwd = match cwd {
        Some(dir) => dir,
        None => env::current_dir()?,
    };
    let paths = ProjectPaths::new(cwd);

    let settings = Settings::from_path(&paths.settings())?;
    let wallet = load_wallet(&paths.wallet())?;
    let client = turbo::Client::authenticated(USER_AGENT, wallet, settings.upload_url()?)?;
    info!(
        "deploying {} from {}",
        paths.build_output().to_string_lossy(),
        client.owner()
    );

    let walker = DeployWalker::new(
        &LocalFileSystem,
        &client,
        paths.build_output(),
        ManifestStore::new(paths.manifest()),
    );
    let deployment = walker.deploy()?;

    let id = deployment.manifest_id;
    Ok(Some(format!(
        "\nDeployment Complete! 🎉\nTransaction ID: {id}\nView your deployment at: {}\n",
        settings.viewer_url(&id)?
    )))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::cmd::deploy::invoke;
    use crate::settings::{GATEWAY_URL_ENV, UPLOAD_URL_ENV};
    use crate::PermadeployCliError;

    const WALLET_JSON: &str = include_str!("../../tests/fixtures/wallet.json");

    #[test]
    fn missing_wallet_should_return_error() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("dist")).unwrap();

        temp_env::with_vars_unset([UPLOAD_URL_ENV, GATEWAY_URL_ENV], || {
            let result = invoke(Some(dir.path().to_path_buf()));
            assert!(matches!(result, Err(PermadeployCliError::MissingWallet(_))));
        });

        dir.close().unwrap();
    }

    #[test]
    fn invalid_wallet_should_return_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("wallet.json"), "definitely not a wallet").unwrap();

        temp_env::with_vars_unset([UPLOAD_URL_ENV, GATEWAY_URL_ENV], || {
            let result = invoke(Some(dir.path().to_path_buf()));
            assert!(matches!(result, Err(PermadeployCliError::InvalidWallet)));
        });

        dir.close().unwrap();
    }

    #[test]
    fn missing_build_output_should_return_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("wallet.json"), WALLET_JSON).unwrap();

        temp_env::with_vars_unset([UPLOAD_URL_ENV, GATEWAY_URL_ENV], || {
            let result = invoke(Some(dir.path().to_path_buf()));
            assert!(matches!(
                result,
                Err(PermadeployCliError::MissingBuildOutput(p)) if p.ends_with("dist")
            ));
        });

        assert!(!dir.path().join("manifest.json").exists());

        dir.close().unwrap();
    }
}
