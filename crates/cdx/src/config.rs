//! Command line and environment configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use cdx_fetch::{DEFAULT_BLOB_URL, FetchOptions, PipelineOptions};
use cdx_index::{DEFAULT_COLLECTION, DEFAULT_SERVER, IndexClient, IndexEndpoint, ReaderOptions, ReqwestClient};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "cdx", version, about, long_about = None, propagate_version = true)]
pub struct App {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the URLs captured under one or more URL patterns.
    #[command(alias = "l")]
    Lookup(LookupArgs),
    /// Download the archived records captured under one or more URL patterns.
    #[command(alias = "f")]
    Fetch(FetchArgs),
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Base URL of the CDX index server.
    #[arg(long, global = true, env = "CDX_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Concurrent requests per stage. Defaults to the available parallelism.
    #[arg(long, short = 'j', global = true, env = "CDX_CONCURRENCY")]
    pub concurrency: Option<usize>,

    /// Timeout in seconds for a single index or storage request.
    #[arg(long, global = true, env = "CDX_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Retries for transient failures.
    #[arg(long, global = true, default_value_t = 2)]
    pub retries: u32,

    /// Stop at the first failed page or record.
    #[arg(long, global = true)]
    pub fail_fast: bool,

    /// Log filter when RUST_LOG is unset, e.g. `debug` or `cdx_fetch=trace`.
    #[arg(long, global = true, env = "CDX_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl GlobalArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn reader_options(&self) -> ReaderOptions {
        let options = ReaderOptions::default()
            .timeout(self.timeout())
            .max_retries(self.retries)
            .fail_fast(self.fail_fast);
        match self.concurrency {
            Some(n) => options.concurrency(n),
            None => options,
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        let options = PipelineOptions::default()
            .max_retries(self.retries)
            .fail_fast(self.fail_fast);
        match self.concurrency {
            Some(n) => options.concurrency(n),
            None => options,
        }
    }

    pub fn index_client(&self, http: Arc<ReqwestClient>) -> Arc<IndexClient<Arc<ReqwestClient>>> {
        Arc::new(IndexClient::new(http).with_timeout(self.timeout()))
    }

    /// One endpoint per collection name on `--server`.
    pub fn endpoints(&self, collections: &[String]) -> anyhow::Result<Vec<IndexEndpoint>> {
        collections
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(|c| {
                IndexEndpoint::from_collection(&self.server, c).with_context(|| format!("invalid collection '{c}'"))
            })
            .collect()
    }
}

#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Collections to search, comma separated, e.g. CC-MAIN-2015-06,CC-MAIN-2015-14.
    #[arg(long, short = 'i', env = "CDX_INDICES", value_delimiter = ',', required = true)]
    pub indices: Vec<String>,

    /// Print each URL followed by a tab and its index entry as JSON.
    #[arg(long, short = 'm')]
    pub print_metadata: bool,

    /// URL patterns such as `example.com`, `http://example.com/` or `example.com/maps/*`.
    #[arg(required = true)]
    pub patterns: Vec<String>,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Collections to search, comma separated.
    #[arg(long, short = 'i', env = "CDX_INDICES", value_delimiter = ',', default_value = DEFAULT_COLLECTION)]
    pub indices: Vec<String>,

    /// Base URL that container file names are resolved against.
    #[arg(long, env = "CDX_BLOB_URL", default_value = DEFAULT_BLOB_URL)]
    pub blob_url: String,

    /// Read container files from a local mirror; takes precedence over `--blob-url`.
    #[arg(long)]
    pub mirror: Option<PathBuf>,

    /// Write each record to a file named after its URL.
    #[arg(long, short = 'O')]
    pub output_to_file: bool,

    /// Directory for `--output-to-file`.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Keep records gzipped as stored.
    #[arg(long, short = 'C')]
    pub compress: bool,

    /// URL patterns to fetch.
    #[arg(required = true)]
    pub patterns: Vec<String>,
}

impl FetchArgs {
    pub fn fetch_options(&self, global: &GlobalArgs) -> FetchOptions {
        FetchOptions::default()
            .timeout(global.timeout())
            .keep_compressed(self.compress)
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        App::command().debug_assert();
    }

    #[test]
    fn lookup_requires_indices() {
        let err = App::try_parse_from(["cdx", "lookup", "example.com"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn indices_are_comma_separated() {
        let app = App::try_parse_from(["cdx", "lookup", "-i", "CC-MAIN-2015-06,CC-MAIN-2015-14", "-m", "a.com"]).unwrap();
        let Command::Lookup(args) = app.command else {
            panic!("expected lookup");
        };
        assert_eq!(args.indices, ["CC-MAIN-2015-06", "CC-MAIN-2015-14"]);
        assert!(args.print_metadata);

        let endpoints = app.global.endpoints(&args.indices).unwrap();
        assert_eq!(endpoints[1].as_str(), "http://index.commoncrawl.org/CC-MAIN-2015-14-index");
    }

    #[test]
    fn fetch_defaults_to_the_default_collection() {
        let app = App::try_parse_from(["cdx", "fetch", "-O", "-C", "a.com/*"]).unwrap();
        let Command::Fetch(args) = app.command else {
            panic!("expected fetch");
        };
        assert_eq!(args.indices, [DEFAULT_COLLECTION]);
        assert!(args.output_to_file && args.compress);
        assert!(args.fetch_options(&app.global).keep_compressed);
    }

    #[test]
    fn global_flags_reach_the_option_objects() {
        let app = App::try_parse_from(["cdx", "fetch", "a.com", "-j", "3", "--fail-fast", "--retries", "5"]).unwrap();
        let reader = app.global.reader_options();
        let pipeline = app.global.pipeline_options();
        assert_eq!((reader.concurrency, reader.max_retries, reader.fail_fast), (3, 5, true));
        assert_eq!((pipeline.concurrency, pipeline.max_retries, pipeline.fail_fast), (3, 5, true));
    }
}
