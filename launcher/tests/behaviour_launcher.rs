//! Behavioural tests for the launcher's public API.
//!
//! These scenarios drive the pipeline through the library surface with
//! scripted collaborators from the test-support feature, covering the
//! bootstrap, build, and launch stages end to end without running real
//! commands.

use camino::{Utf8Path, Utf8PathBuf};
use meterbar_launcher::cli::RunConfig;
use meterbar_launcher::error::LauncherError;
use meterbar_launcher::install::download::{ArtefactDownloader, DownloadError};
use meterbar_launcher::install::extraction::{ArchiveExtractor, ExtractionError};
use meterbar_launcher::pipeline::{self, PipelineContext};
use meterbar_launcher::resolver;
use meterbar_launcher::test_utils::{
    ExpectedCall, FakeDirs, FakeEnvPaths, StubExecutor, cwd_lock, output_with_code, success_output,
};
use rstest::rstest;

/// Downloader for scenarios where no tool installation should happen.
/// Any fetch attempt fails the pipeline, surfacing the unexpected call.
struct NoDownloads;

impl ArtefactDownloader for NoDownloads {
    fn download(&self, url: &str, _dest: &Utf8Path) -> Result<(), DownloadError> {
        Err(DownloadError::HttpError {
            url: url.to_owned(),
            reason: "no download expected in this scenario".to_owned(),
        })
    }
}

/// Extractor for scenarios where no archive should be unpacked.
struct NoExtraction;

impl ArchiveExtractor for NoExtraction {
    fn extract(
        &self,
        archive_path: &Utf8Path,
        _dest_dir: &Utf8Path,
    ) -> Result<Vec<String>, ExtractionError> {
        Err(ExtractionError::Io(std::io::Error::other(format!(
            "no extraction expected in this scenario: {archive_path}"
        ))))
    }
}

struct Scenario {
    _temp: tempfile::TempDir,
    app_root: Utf8PathBuf,
    downloader: NoDownloads,
    extractor: NoExtraction,
    dirs: FakeDirs,
    env: FakeEnvPaths,
}

impl Scenario {
    fn new() -> Self {
        let temp = tempfile::tempdir().expect("temp dir");
        let root = Utf8Path::from_path(temp.path()).expect("utf-8 temp dir");
        let app_root = root.join("app");
        std::fs::create_dir_all(&app_root).expect("app root");
        Self {
            dirs: FakeDirs::under(root),
            app_root,
            _temp: temp,
            downloader: NoDownloads,
            extractor: NoExtraction,
            env: FakeEnvPaths::default(),
        }
    }

    fn ctx<'a>(&'a self, config: RunConfig, executor: &'a StubExecutor) -> PipelineContext<'a> {
        PipelineContext {
            config,
            app_root: &self.app_root,
            executor,
            downloader: &self.downloader,
            extractor: &self.extractor,
            dirs: &self.dirs,
            env: &self.env,
            skip_install: false,
            quiet: false,
        }
    }

    fn place_binary(&self, config: &RunConfig) -> Utf8PathBuf {
        let path = resolver::candidate_paths(&self.app_root, config.profile())
            .into_iter()
            .next()
            .expect("at least one candidate");
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        std::fs::write(&path, b"binary").expect("write binary");
        path
    }
}

fn probe_ok(tool: &str) -> ExpectedCall {
    ExpectedCall::new(tool, &["--version"], Ok(success_output()))
}

#[rstest]
#[case::debug(false, &["build"])]
#[case::release(true, &["build", "--release"])]
fn pipeline_builds_the_selected_profile_and_launches(
    #[case] release: bool,
    #[case] build_args: &[&str],
) {
    let _cwd = cwd_lock();
    let scenario = Scenario::new();
    let config = RunConfig {
        release,
        skip_build: false,
        verbose: false,
    };
    let binary = scenario.place_binary(&config);
    let executor = StubExecutor::new(vec![
        probe_ok("cargo"),
        probe_ok("gcc"),
        ExpectedCall::new("cargo", build_args, Ok(success_output())),
        ExpectedCall::new(binary.as_str(), &["tray"], Ok(output_with_code(5))),
    ]);
    let mut stderr = Vec::new();

    let exit = pipeline::run(&scenario.ctx(config, &executor), &mut stderr).expect("pipeline");

    assert_eq!(exit, 5);
    let progress = String::from_utf8(stderr).expect("stderr was not UTF-8");
    assert!(progress.contains("All 2 required tools available."));
    executor.assert_finished();
}

#[test]
fn build_failure_propagates_without_touching_the_binary() {
    let _cwd = cwd_lock();
    let scenario = Scenario::new();
    let config = RunConfig {
        release: false,
        skip_build: false,
        verbose: false,
    };
    scenario.place_binary(&config);
    let executor = StubExecutor::new(vec![
        probe_ok("cargo"),
        probe_ok("gcc"),
        ExpectedCall::new("cargo", &["build"], Ok(output_with_code(2))),
    ]);

    let err =
        pipeline::run(&scenario.ctx(config, &executor), &mut Vec::new()).expect_err("must fail");

    assert!(matches!(err, LauncherError::BuildFailed { code: 2 }));
    executor.assert_finished();
}

#[test]
fn missing_tool_with_skip_install_names_the_tool() {
    let scenario = Scenario::new();
    let config = RunConfig {
        release: false,
        skip_build: true,
        verbose: false,
    };
    let executor = StubExecutor::new(vec![
        probe_ok("cargo"),
        ExpectedCall::new(
            "gcc",
            &["--version"],
            Err(LauncherError::Io(std::io::Error::other("no such file"))),
        ),
    ]);
    let mut ctx = scenario.ctx(config, &executor);
    ctx.skip_install = true;

    let err = pipeline::run(&ctx, &mut Vec::new()).expect_err("must fail");

    let message = err.to_string();
    assert!(message.contains("gcc"));
    assert!(message.contains("restart your terminal"));
    executor.assert_finished();
}

#[test]
fn session_path_changes_are_visible_within_the_process() {
    use meterbar_launcher::path_registry::{EnvPaths, PathRegistry, SystemEnvPaths};

    let temp = tempfile::tempdir().expect("temp dir");
    let state_dir = Utf8Path::from_path(temp.path()).expect("utf-8 temp dir");

    temp_env::with_var("PATH", Some("/usr/bin"), || {
        let env = SystemEnvPaths::new(state_dir);
        let registry = PathRegistry::new(&env);

        let added = registry
            .ensure_on_session_path(Utf8Path::new("/opt/meterbar/tools/bin"))
            .expect("session update");

        assert!(added);
        assert!(env.session_path().starts_with("/opt/meterbar/tools/bin"));
        assert!(env.session_path().contains("/usr/bin"));
    });
}
