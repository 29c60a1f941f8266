//! Temporary plugin layout: manifest, feature files, and TLS material.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::json;
use sse_config::Config;
use tempfile::TempDir;

/// Manifest declaring the prediction function the plugin ships.
const PREDICT_MANIFEST: &str =
    r#"{"Functions":[{"Name":"Predict","Id":0,"Type":0,"ReturnType":0,"Params":{"player":0}}]}"#;

/// A scratch directory the plugin configuration points into.
pub struct PluginDir {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl PluginDir {
    /// Creates the directory with the prediction manifest and features for
    /// one known player.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 path");
        let plugin = Self { _dir: dir, root };
        plugin.write_manifest(PREDICT_MANIFEST);
        plugin.write_file(
            "features/Kevin_Durant.json",
            &json!({"NBA PPG": 25.1, "minutes": 34.5, "age": 27}).to_string(),
        );
        plugin
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn manifest_path(&self) -> Utf8PathBuf {
        self.root.join("FuncDefs.json")
    }

    pub fn write_manifest(&self, json: &str) {
        self.write_file("FuncDefs.json", json);
    }

    pub fn remove_manifest(&self) {
        fs::remove_file(self.manifest_path()).expect("remove manifest");
    }

    pub fn write_file(&self, relative: &str, contents: &str) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, contents).expect("write file");
    }

    /// Configuration binding an ephemeral loopback port.
    pub fn config(&self) -> Config {
        Config {
            port: 0,
            listen_host: String::from("127.0.0.1"),
            definition_file: self.manifest_path(),
            feature_dir: self.root.join("features"),
            backend_username: Some(String::from("ann")),
            backend_api_key: Some(String::from("k3y")),
            workers: 4,
            log_filter: String::from("warn"),
            ..Config::default()
        }
    }
}
