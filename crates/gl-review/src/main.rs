use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use gl_review_config::AppConfig;
use gl_review_diff::{DiffRefs, ReviewAddress, ReviewId};
use std::path::PathBuf;

mod commands;
mod logger;
mod snapshot;

#[derive(Parser)]
#[command(name = "gl-review", version, about = "Resolve merge request comment positions")]
struct Cli {
    /// Config file to use instead of `.gl-review.toml` or the user config.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode the address of a file at a commit of a merge request.
    EncodeAddress {
        /// Repository-relative path; empty for a placeholder document.
        #[arg(long, default_value = "")]
        path: String,
        #[arg(long)]
        commit: String,
        #[arg(long)]
        repository_root: String,
        #[command(flatten)]
        review: ReviewArgs,
    },
    /// Decode an address and print its fields as JSON.
    DecodeAddress { address: String },
    /// Print the commenting ranges of a document.
    Ranges {
        #[arg(short, long)]
        snapshot: PathBuf,
        address: String,
        /// Number of lines the document shows.
        #[arg(long)]
        line_count: u32,
    },
    /// Print the comment anchor for a click on a document line.
    Position {
        #[arg(short, long)]
        snapshot: PathBuf,
        address: String,
        /// Clicked display line (0-based).
        #[arg(long)]
        line: u32,
    },
    /// Split `git diff` output into a snapshot.
    ParsePatch {
        /// Patch file, or `-` for stdin.
        #[arg(default_value = "-")]
        patch: PathBuf,
        #[command(flatten)]
        review: ReviewArgs,
        #[arg(long)]
        base_sha: String,
        #[arg(long)]
        head_sha: String,
        #[arg(long)]
        start_sha: String,
    },
}

#[derive(Args)]
struct ReviewArgs {
    #[arg(long)]
    project_id: u64,
    #[arg(long)]
    mr_id: u64,
}

impl From<ReviewArgs> for ReviewId {
    fn from(args: ReviewArgs) -> Self {
        ReviewId::new(args.project_id, args.mr_id)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    logger::init(cli.verbose, config.log_level.as_deref());
    log::debug!("Using config {:?}", config);

    let output = match cli.command {
        Command::EncodeAddress {
            path,
            commit,
            repository_root,
            review,
        } => commands::encode_address(
            &config,
            &ReviewAddress {
                path,
                commit,
                repository_root,
                project_id: review.project_id,
                mr_id: review.mr_id,
            },
        ),
        Command::DecodeAddress { address } => commands::decode_address(&config, &address)?,
        Command::Ranges {
            snapshot,
            address,
            line_count,
        } => commands::ranges(&config, &snapshot, &address, line_count)?,
        Command::Position {
            snapshot,
            address,
            line,
        } => commands::position(&config, &snapshot, &address, line)?,
        Command::ParsePatch {
            patch,
            review,
            base_sha,
            head_sha,
            start_sha,
        } => commands::parse_patch_file(
            &patch,
            review.into(),
            DiffRefs::new(base_sha, head_sha, start_sha),
        )?,
    };

    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_position_command() {
        let cli = Cli::try_parse_from([
            "gl-review",
            "-vv",
            "position",
            "--snapshot",
            "mr.json",
            "gl-review:a.rs?x",
            "--line",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Position { line, address, .. } => {
                assert_eq!(line, 3);
                assert_eq!(address, "gl-review:a.rs?x");
            }
            _ => panic!("expected position command"),
        }
    }

    #[test]
    fn test_parse_patch_defaults_to_stdin() {
        let cli = Cli::try_parse_from([
            "gl-review",
            "parse-patch",
            "--project-id",
            "1",
            "--mr-id",
            "2",
            "--base-sha",
            "b",
            "--head-sha",
            "h",
            "--start-sha",
            "s",
        ])
        .unwrap();

        match cli.command {
            Command::ParsePatch { patch, review, .. } => {
                assert_eq!(patch, PathBuf::from("-"));
                assert_eq!(ReviewId::from(review), ReviewId::new(1, 2));
            }
            _ => panic!("expected parse-patch command"),
        }
    }
}
