//! Common test utilities for lapd integration tests

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;
use zip::ZipArchive;

/// A project directory for integration tests
pub struct TestProject {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to project root
    pub path: PathBuf,
}

impl TestProject {
    /// Create a new empty project
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in the project
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the project
    #[allow(dead_code)]
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in the project
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// lapd command running inside the project, isolated from the caller's env
    #[allow(deprecated)]
    pub fn lapd(&self) -> Command {
        let mut cmd = Command::cargo_bin("lapd").expect("Failed to find lapd binary");
        cmd.current_dir(&self.path)
            .env_remove("LAPD_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Sorted entry names of a zip archive in the project
    #[allow(dead_code)]
    pub fn archive_entries(&self, path: &str) -> Vec<String> {
        let file = File::open(self.path.join(path)).expect("Failed to open archive");
        let archive = ZipArchive::new(file).expect("Failed to read archive");
        let mut names: Vec<String> = archive.file_names().map(ToString::to_string).collect();
        names.sort();
        names
    }

    /// Content of one archive entry
    #[allow(dead_code)]
    pub fn archive_entry(&self, path: &str, name: &str) -> String {
        let file = File::open(self.path.join(path)).expect("Failed to open archive");
        let mut archive = ZipArchive::new(file).expect("Failed to read archive");
        let mut entry = archive.by_name(name).expect("Missing archive entry");
        let mut content = String::new();
        entry
            .read_to_string(&mut content)
            .expect("Failed to read archive entry");
        content
    }
}
