use anyhow::Result;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use webp_binaries::commands;
use webp_binaries::config::{
    BINARY_DIR_ENV, CHMOD_TIMEOUT, DEFAULT_LIBWEBP_VERSION, ExecBitStrategy, LIBWEBP_VERSION_ENV,
    PLATFORM_ENV, RESOURCES_ENV, Settings,
};
use webp_binaries::install::Installer;
use webp_binaries::resource;
use webp_binaries::runtime::RealRuntime;

/// webp-binaries - locate and install the packaged webp tools
///
/// Picks the cwebp/dwebp/... build for this platform from a resource root
/// (a directory, a .zip/.jar bundle or a .tar.gz tarball), copies it to a
/// temporary executable file and prints its path.
///
/// Examples:
///   webp-binaries candidates cwebp
///   webp-binaries --resources bundle.jar install cwebp
#[derive(Parser, Debug)]
#[command(author, version = env!("WEBP_BINARIES_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory with pre-installed binaries, used instead of packaged ones
    #[arg(long = "binary-dir", env = BINARY_DIR_ENV, value_name = "DIR", global = true)]
    pub binary_dir: Option<PathBuf>,

    /// Force a platform layout ("mac_arm64" selects the Apple silicon binaries)
    #[arg(long, env = PLATFORM_ENV, value_name = "PLATFORM", global = true)]
    pub platform: Option<String>,

    /// Resource root: directory, .zip/.jar or .tar.gz/.tgz
    #[arg(long, env = RESOURCES_ENV, value_name = "PATH", global = true)]
    pub resources: Option<PathBuf>,

    /// libwebp release used in the dist_webp_binaries layout
    #[arg(
        long = "libwebp-version",
        env = LIBWEBP_VERSION_ENV,
        value_name = "VERSION",
        default_value = DEFAULT_LIBWEBP_VERSION,
        global = true
    )]
    pub libwebp_version: String,

    /// Mark binaries executable by running chmod instead of setting permissions directly
    #[arg(long, global = true)]
    pub chmod: bool,

    /// Seconds to wait for chmod before carrying on
    #[arg(
        long = "chmod-timeout",
        value_name = "SECS",
        requires = "chmod",
        global = true
    )]
    pub chmod_timeout: Option<u64>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print the resource paths tried for a binary, highest priority first
    Candidates(NameArgs),

    /// Print the binary from the override directory, if it is usable
    Resolve(ResolveArgs),

    /// Install a binary to a temporary file and print its path
    Install(NameArgs),
}

#[derive(clap::Args, Debug)]
pub struct NameArgs {
    /// Binary name, e.g. cwebp or dwebp
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Print a JSON report instead of plain text
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// Binary name, e.g. cwebp or dwebp
    #[arg(value_name = "NAME")]
    pub name: String,
}

impl Cli {
    fn settings(&self) -> Settings {
        let exec_bit = if self.chmod {
            ExecBitStrategy::Chmod(
                self.chmod_timeout
                    .map(Duration::from_secs)
                    .unwrap_or(CHMOD_TIMEOUT),
            )
        } else {
            ExecBitStrategy::default()
        };

        Settings {
            binary_dir: self
                .binary_dir
                .clone()
                .filter(|p| !p.as_os_str().is_empty()),
            platform: self.platform.clone().filter(|p| !p.trim().is_empty()),
            resources: self
                .resources
                .clone()
                .filter(|p| !p.as_os_str().is_empty()),
            libwebp_version: self.libwebp_version.clone(),
            exec_bit,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;
    let settings = cli.settings();
    let mut out = io::stdout().lock();

    match &cli.command {
        Commands::Candidates(args) => {
            let resources = resource::SourceChain::new();
            let installer = Installer::new(&runtime, &resources, &settings);
            commands::candidates(&installer, &args.name, args.json, &mut out)?
        }
        Commands::Resolve(args) => {
            let resources = resource::SourceChain::new();
            let installer = Installer::new(&runtime, &resources, &settings);
            commands::resolve(&installer, &args.name, &mut out)?
        }
        Commands::Install(args) => {
            let resources = resource::from_settings(&runtime, &settings)?;
            let installer = Installer::new(&runtime, resources.as_ref(), &settings);
            commands::install(&installer, &args.name, args.json, &mut out)?
        }
    }
    Ok(())
}
