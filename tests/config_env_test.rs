//! 環境変数による上書きと設定ファイルの保存
//!
//! HOME と環境変数をプロセス全体で書き換えるため、このファイルのテストは1つにまとめる。

use contact_extract::config::{Config, ENV_BASE_URL, ENV_RESOURCE_ID};
use contact_extract_common::config::DEFAULT_BASE_URL;
use tempfile::tempdir;

#[test]
fn test_env_override_is_not_saved() {
    let home = tempdir().expect("Failed to create temp dir");
    std::env::set_var("HOME", home.path());
    std::env::remove_var(ENV_RESOURCE_ID);
    std::env::set_var(ENV_BASE_URL, "http://env-only.example");

    // 実行時は環境変数が効く
    let mut config = Config::load().expect("読み込み失敗");
    assert_eq!(config.client.base_url, "http://env-only.example");
    assert!(Config::active_env_overrides()
        .iter()
        .any(|(name, value)| *name == ENV_BASE_URL && value == "http://env-only.example"));

    // ファイルだけを読めば環境変数は入らない
    assert_eq!(Config::load_file().expect("読み込み失敗").client.base_url, DEFAULT_BASE_URL);

    // 実行時の設定から保存しても上書き値はファイルに入らない
    config.set_resource_id("res2".into()).expect("保存失敗");
    assert_eq!(config.client.base_url, DEFAULT_BASE_URL);

    let path = Config::config_path().expect("パス取得失敗");
    assert!(path.starts_with(home.path()));
    let saved = std::fs::read_to_string(&path).expect("設定ファイルが無い");
    assert!(!saved.contains("env-only.example"), "{}", saved);

    std::env::remove_var(ENV_BASE_URL);
    let reloaded = Config::load().expect("読み込み失敗");
    assert_eq!(reloaded.client.base_url, DEFAULT_BASE_URL);
    assert_eq!(reloaded.client.resource_id, "res2");
    assert!(Config::active_env_overrides().is_empty());

    // 既存の値はそのまま、指定したキーだけ変わる
    let mut config = Config::load().expect("読み込み失敗");
    config.set_base_url("https://staging.example.com".into()).expect("保存失敗");
    let reloaded = Config::load_file().expect("読み込み失敗");
    assert_eq!(reloaded.client.base_url, "https://staging.example.com");
    assert_eq!(reloaded.client.resource_id, "res2");
}
