use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    about = "Upload the contents of the build output folder and publish a manifest for it",
    long_about = "Uploads every file under dist/ that is not yet listed in manifest.json, \
    updates manifest.json and uploads it. Requires wallet.json in the project root, given either \
    as JWK JSON or base64 encoded JWK JSON."
)]
pub struct DeployCommand {
    #[arg(
        long,
        short,
        help = "The project directory holding wallet.json, dist and manifest.json. Defaults to current directory."
    )]
    pub cwd: Option<PathBuf>,
}
