pub mod fixtures;

use axum_test::TestServer;
use plucker_api::setup::routes::setup_routes;
use plucker_api::AppState;
use plucker_core::{Config, RootSet};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Returns the prefixed media browser path.
pub fn api_path(path: &str) -> String {
    format!("{}{}", plucker_api::constants::API_PREFIX, path)
}

/// Test application over fresh Output and Input directories
pub struct TestApp {
    pub server: TestServer,
    pub output: TempDir,
    pub input: TempDir,
}

impl TestApp {
    /// Get the HTTP test client
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn output_dir(&self) -> &Path {
        self.output.path()
    }

    pub fn input_dir(&self) -> &Path {
        self.input.path()
    }

    /// Write a file below the Output root, creating parent directories.
    pub fn write_output(&self, relative: &str, data: &[u8]) {
        let path = self.output.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, data).unwrap();
    }
}

/// Setup a test application with isolated root directories
pub fn setup_test_app() -> TestApp {
    let output = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();

    let roots = RootSet::new([("Output", output.path()), ("Input", input.path())]).unwrap();
    let config = Config::new(roots);
    config.validate().unwrap();

    let state = Arc::new(AppState::new(config.clone()).unwrap());
    let router = setup_routes(&config, state).unwrap();

    TestApp {
        server: TestServer::new(router).unwrap(),
        output,
        input,
    }
}
