use clap::{Parser, Subcommand, ValueEnum};
use codec_matrix_bench::benches;
use codec_matrix_bench::harness::{BenchConfig, Profile};
use codec_matrix_bench::report::{self, REPORT_FILE};
use codec_matrix_bench::schema::{MatrixReport, RunMeta};
use codec_matrix_bench::{BenchError, CodecKind, FixtureSelection};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProfileArg {
    Quick,
    Full,
}

impl From<ProfileArg> for Profile {
    fn from(v: ProfileArg) -> Self {
        match v {
            ProfileArg::Quick => Profile::Quick,
            ProfileArg::Full => Profile::Full,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Time write/read of every fixture through every codec and write the report.
    Run,

    /// Encode each fixture once per codec and print sizes only (no timing, no report file).
    Sizes,
}

#[derive(Parser, Debug)]
#[command(name = "codec-matrix-bench")]
#[command(about = "Serialization codec matrix benchmark (write/read time, encoded size)")]
struct Args {
    /// Iteration profile; defaults to full for optimized builds, quick otherwise.
    #[arg(long, value_enum, global = true)]
    profile: Option<ProfileArg>,

    #[arg(long, default_value_t = 0, global = true)]
    seed: u64,

    /// Record fixture iterations (overrides the profile).
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    iterations: Option<u64>,

    /// Vector fixture iterations (default: one-tenth of record iterations).
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    vector_iterations: Option<u64>,

    /// Elements per vector fixture.
    #[arg(long, default_value_t = codec_matrix_bench::fixture::DEFAULT_VECTOR_LEN, global = true)]
    vector_len: usize,

    /// Which fixture families to run.
    #[arg(long, value_enum, default_value_t = FixtureSelection::All, global = true)]
    fixture: FixtureSelection,

    /// Codecs to run. Can be provided multiple times; defaults to all.
    #[arg(long, value_enum, action = clap::ArgAction::Append, global = true)]
    codec: Vec<CodecKind>,

    /// Codec every ratio is normalized against.
    #[arg(long, value_enum, default_value_t = CodecKind::Bincode, global = true)]
    baseline: CodecKind,

    /// Where to write the markdown report.
    #[arg(long, default_value = REPORT_FILE, global = true)]
    out: PathBuf,

    /// Also write the raw records as JSON.
    #[arg(long, value_name = "FILE", global = true)]
    json: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

fn now_unix_stamp() -> String {
    // Format: unix:<secs>
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("unix:{secs}")
}

fn git_sha_short() -> Option<String> {
    // Best-effort: read from environment set by CI/build scripts.
    std::env::var("GIT_SHA")
        .ok()
        .or_else(|| std::env::var("GITHUB_SHA").ok())
        .map(|s| s.chars().take(12).collect())
}

/// Selected codecs in canonical matrix order, deduplicated.
fn selected_codecs(requested: &[CodecKind]) -> Vec<CodecKind> {
    if requested.is_empty() {
        return CodecKind::ALL.to_vec();
    }
    CodecKind::ALL
        .into_iter()
        .filter(|c| requested.contains(c))
        .collect()
}

fn run_meta(cfg: &BenchConfig, baseline: CodecKind) -> RunMeta {
    RunMeta {
        schema_version: 1,
        bench_version: env!("CARGO_PKG_VERSION").to_string(),
        profile: cfg.profile.as_str().to_string(),
        build: if cfg!(debug_assertions) { "debug" } else { "release" }.to_string(),
        seed: cfg.seed,
        record_iters: cfg.record_iters(),
        vector_iters: cfg.vector_iters(),
        vector_len: cfg.vector_len(),
        baseline,
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        parallelism: std::thread::available_parallelism().ok().map(|n| n.get()),
        timestamp_utc: now_unix_stamp(),
        git_sha: git_sha_short(),
    }
}

fn main() -> Result<(), BenchError> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cfg = BenchConfig {
        profile: args.profile.map(Profile::from).unwrap_or_else(Profile::for_build),
        seed: args.seed,
        record_iters: args.iterations,
        vector_iters: args.vector_iterations,
        vector_len: args.vector_len,
    };

    let codecs = selected_codecs(&args.codec);
    if !codecs.contains(&args.baseline) {
        return Err(BenchError::Config(format!(
            "baseline {} is not among the selected codecs",
            args.baseline
        )));
    }

    if let Some(Command::Sizes) = args.cmd {
        let table = benches::sizes::run(&cfg, args.fixture, &codecs, args.baseline)?;
        println!("\n{}:", table.title);
        print!("{}", table.to_text());
        return Ok(());
    }

    info!(
        profile = cfg.profile.as_str(),
        record_iters = cfg.record_iters(),
        vector_iters = cfg.vector_iters(),
        vector_len = cfg.vector_len(),
        "starting codec matrix"
    );

    let records = benches::run_suite(&cfg, args.fixture, &codecs)?;
    let meta = run_meta(&cfg, args.baseline);

    let rendered = report::render(&records, args.baseline, &meta)?;
    print!("{}", rendered.console_summary());

    rendered.write_markdown(&args.out)?;
    info!(path = %args.out.display(), "report written");

    if let Some(path) = args.json {
        let export = MatrixReport { run: meta, records };
        let json = serde_json::to_string_pretty(&export).map_err(BenchError::Export)?;
        fs::write(&path, json)?;
        info!(path = %path.display(), "JSON export written");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_iteration_overrides_are_rejected() {
        for flag in ["--iterations", "--vector-iterations"] {
            assert!(Args::try_parse_from(["codec-matrix-bench", flag, "0"]).is_err(), "{flag}");
            let args = Args::try_parse_from(["codec-matrix-bench", flag, "1"]).unwrap();
            assert!(args.iterations.or(args.vector_iterations) == Some(1));
        }
    }
}
