use explab_core::{ClientConfig, DEFAULT_API_BASE_URL};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

// Environment overrides are process-wide; every test here loads under this lock.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Removes the variables it set when dropped, even if the test panics.
struct EnvVars(&'static [(&'static str, &'static str)]);

impl EnvVars {
    fn set(vars: &'static [(&'static str, &'static str)]) -> Self {
        for (name, value) in vars {
            std::env::set_var(name, value);
        }
        Self(vars)
    }
}

impl Drop for EnvVars {
    fn drop(&mut self) {
        for (name, _) in self.0 {
            std::env::remove_var(name);
        }
    }
}

#[test]
fn missing_file_yields_defaults() {
    let _env = env_lock();
    let dir = tempfile::tempdir().expect("create temp dir");
    let cfg = ClientConfig::load_from(&dir.path().join("absent.toml")).expect("load");

    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.poll_interval(), Duration::from_millis(3000));
    assert_eq!(cfg.request_timeout(), None);
}

#[test]
fn file_values_override_defaults() {
    let _env = env_lock();
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("explab.toml");
    std::fs::write(
        &path,
        "api_base_url = \"http://lab.internal:9000\"\npoll_interval_ms = 1500\nrequest_timeout_secs = 20\n",
    )
    .expect("write config");

    let cfg = ClientConfig::load_from(&path).expect("load");

    assert_eq!(cfg.api_base_url, "http://lab.internal:9000");
    assert_eq!(cfg.poll_interval(), Duration::from_millis(1500));
    assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(20)));
}

#[test]
fn rendered_toml_loads_back() {
    let _env = env_lock();
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("explab.toml");
    let original = ClientConfig {
        api_base_url: "https://lab.example.com".to_string(),
        poll_interval_ms: 5000,
        request_timeout_secs: Some(30),
    };
    std::fs::write(&path, original.to_toml().expect("render")).expect("write config");

    assert_eq!(ClientConfig::load_from(&path).expect("load"), original);
}

#[test]
fn env_vars_override_file_values() {
    let _env = env_lock();
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("explab.toml");
    std::fs::write(
        &path,
        "api_base_url = \"http://lab.internal:9000\"\npoll_interval_ms = 1500\nrequest_timeout_secs = 20\n",
    )
    .expect("write config");

    let _vars = EnvVars::set(&[
        ("EXPLAB__API_BASE_URL", "http://env:1"),
        ("EXPLAB__POLL_INTERVAL_MS", "1234"),
    ]);
    let cfg = ClientConfig::load_from(&path).expect("load");

    assert_eq!(cfg.api_base_url, "http://env:1");
    assert_eq!(cfg.poll_interval_ms, 1234);
    assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(20)));
}
