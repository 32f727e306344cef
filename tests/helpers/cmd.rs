use assert_cmd::assert::Assert;
use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use predicates::str as p_str;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const DEFAULT_QLGENRC_JSON_PATH: &str = ".qlgenrc.json";
const FIXTURE_ROOT_PATH: &str = "tests/fixtures";
const DEFAULT_SCHEMA_PATH: &str = "tests/fixtures/schema.graphql";
const SCHEMA_FILE_NAME: &str = "schema.graphql";
const OUTPUT_FILE_NAME: &str = "generated.rs";
const EXPECTED_FILE_NAME: &str = "expected.rs";

/// Represents an instance of the qlgen command writing into a temp directory
#[derive(Debug)]
pub struct TestCommandHarness {
    fixture_assert_directory: Option<PathBuf>,
    proc_cmd: Command,
    temp_dir: assert_fs::TempDir,
}

impl Default for TestCommandHarness {
    fn default() -> Self {
        Self::new_with_default_schema()
    }
}

impl TestCommandHarness {
    pub fn new() -> Self {
        // If user adds `KEEP_TEST_TEMPDIRS` arg to `cargo test`, we can keep temp_dir
        let temp_dir = assert_fs::TempDir::new()
            .expect("temp directory creation failure")
            .into_persistent_if(env::var_os("KEEP_TEST_TEMPDIRS").is_some());

        let mut proc_cmd = Command::cargo_bin("qlgen").expect("qlgen bin failure");
        proc_cmd
            .arg("-o")
            .arg(temp_dir.path().join(OUTPUT_FILE_NAME));

        // If user adds `--nocapture` arg to `cargo test`, we can show output
        if env::args().any(|arg| arg == "--nocapture") {
            proc_cmd.stdin(Stdio::inherit());
            proc_cmd.stderr(Stdio::inherit());
        }

        Self {
            proc_cmd,
            temp_dir,
            fixture_assert_directory: None,
        }
    }

    pub fn new_with_default_schema() -> Self {
        let mut harness = Self::new();
        harness.with_schema_file_from_path(SCHEMA_FILE_NAME, Path::new(DEFAULT_SCHEMA_PATH));
        harness
    }

    pub fn directory_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn output_path(&self) -> PathBuf {
        self.temp_dir.path().join(OUTPUT_FILE_NAME)
    }

    pub fn output_contents(&self) -> String {
        fs::read_to_string(self.output_path()).expect("missing generated file")
    }

    pub fn with_schema_file_from_path(&mut self, name: &str, path: &Path) -> &mut Self {
        let child = self.temp_dir.child(name);
        child.write_file(path).expect("write schema failure");
        self.proc_cmd.arg("-s").arg(child.path());
        self
    }

    pub fn with_schema_file_from_contents(&mut self, name: &str, contents: &str) -> &mut Self {
        let child = self.temp_dir.child(name);
        child.write_str(contents).expect("write schema failure");
        self.proc_cmd.arg("-s").arg(child.path());
        self
    }

    pub fn with_query_file_from_contents(&mut self, name: &str, contents: &str) -> &mut Self {
        let child = self.temp_dir.child(name);
        child.write_str(contents).expect("write query failure");
        self.proc_cmd.arg("-q").arg(child.path());
        self
    }

    pub fn with_arg(&mut self, arg: impl AsRef<std::ffi::OsStr>) -> &mut Self {
        self.proc_cmd.arg(arg);
        self
    }

    /// Copy a fixture's schema and documents in and compare the output with
    /// its `expected.rs` after the run
    pub fn with_fixture_directory(
        &mut self,
        fixture_directory_subpath: impl AsRef<Path>,
    ) -> &mut Self {
        if let Some(ref path) = self.fixture_assert_directory {
            panic!(
                "with_fixture_directory() can only be called once, already {}",
                path.display(),
            );
        }

        let subpath_ref = fixture_directory_subpath.as_ref();
        let full_fixture_directory_subpath = &Path::new(FIXTURE_ROOT_PATH).join(subpath_ref);
        self.temp_dir
            .copy_from(full_fixture_directory_subpath, &["*.graphql"])
            .expect("failure to copy graphql files from fixture dir");
        self.fixture_assert_directory = Some(subpath_ref.into());

        let mut document_names = fs::read_dir(full_fixture_directory_subpath)
            .expect("fixture dir read failure")
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".graphql"))
            .collect::<Vec<_>>();
        document_names.sort();
        for name in document_names {
            let flag = if name == SCHEMA_FILE_NAME { "-s" } else { "-q" };
            self.proc_cmd.arg(flag).arg(self.temp_dir.path().join(name));
        }

        // Copy qlgenrc but ignore errors (in case this fixture doesn't have one)
        self.add_config_file_and_arg(DEFAULT_QLGENRC_JSON_PATH, |child| {
            child
                .write_file(&full_fixture_directory_subpath.join(DEFAULT_QLGENRC_JSON_PATH))
                .ok()
        });

        self
    }

    pub fn with_default_rc_file_contents(&mut self, contents: &str) -> &mut Self {
        self.add_config_file_and_arg(DEFAULT_QLGENRC_JSON_PATH, |child| {
            child.write_str(contents).ok()
        });
        self
    }

    /// Run without any expectation on the outcome
    pub fn run(&mut self) -> Assert {
        self.proc_cmd.assert()
    }

    pub fn run_for_failure(&mut self) -> Assert {
        let assert = self.proc_cmd.assert().failure().stderr(p_str::is_empty());
        self.assert_fixture_outputs();
        assert
    }

    pub fn run_for_success(&mut self) -> Assert {
        let assert = self.proc_cmd.assert().success().stderr(p_str::is_empty());
        self.assert_fixture_outputs();
        assert
    }

    fn add_config_file_and_arg(
        &mut self,
        child_path: impl AsRef<Path>,
        callback: impl FnOnce(&assert_fs::fixture::ChildPath) -> Option<()>,
    ) {
        let config_file_child = self.temp_dir.child(child_path);
        if callback(&config_file_child).is_some() {
            // Since this command's CWD is not the temp dir, use an argument to
            // tell qlgen where it is.
            self.proc_cmd.arg("-c").arg(config_file_child.path());
        }
    }

    /// Compare the generated file with the fixture's `expected.rs`. With
    /// `OVERWRITE_FIXTURES` set the expectation is replaced instead.
    fn assert_fixture_outputs(&self) {
        let Some(fixture_directory_subpath) = &self.fixture_assert_directory else {
            return;
        };
        let expected_file_path = Path::new(FIXTURE_ROOT_PATH)
            .join(fixture_directory_subpath)
            .join(EXPECTED_FILE_NAME);
        if env::var_os("OVERWRITE_FIXTURES").is_some() {
            fs::write(&expected_file_path, self.output_contents()).expect("failed to write fixture");
            return;
        }
        let expected_content =
            fs::read_to_string(&expected_file_path).expect("missing expected file");
        self.temp_dir
            .child(OUTPUT_FILE_NAME)
            .assert(p_str::diff(expected_content.trim().to_string()).trim());
    }
}
