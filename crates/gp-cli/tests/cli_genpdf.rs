use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use gp_lhagrid::Registry;

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_genpdf"))
}

fn repo_root() -> PathBuf {
    // crates/gp-cli -> repo root
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..").canonicalize().unwrap()
}

fn fixture_sets() -> PathBuf {
    repo_root().join("tests/fixtures/sets")
}

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("genpdf_cli_{}_{}_{}", std::process::id(), nanos, name));
    std::fs::create_dir_all(&p).unwrap();
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .env_remove("LHAPDF_DATA_PATH")
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn small_grid_config(dir: &Path) -> PathBuf {
    let path = dir.join("genpdf.yaml");
    std::fs::write(&path, "grid:\n  n_x: 10\n  n_q2: 3\n").unwrap();
    path
}

fn s(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}

#[test]
fn generate_toy_pids() {
    let work = tmp_dir("toy_work");
    let cfg = small_grid_config(&work);
    let out = run(&[
        "generate",
        "debug",
        "21",
        "-1",
        "-p",
        "toy",
        "--work-dir",
        &s(&work),
        "--config",
        &s(&cfg),
        "--info-update",
        "{SetDesc: from the cli}",
    ]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.trim(), s(&work.join("debug")));

    let output = Registry::new(vec![work.clone()]);
    let info = output.load_info("debug").unwrap();
    assert_eq!(info.get("SetDesc").and_then(|v| v.as_str()), Some("from the cli"));
    let block = &output.load_blocks("debug", 0).unwrap()[0];
    assert_eq!(block.xgrid().len(), 10);
    assert_eq!(block.q2grid().len(), 3);
    assert!(block.column(-1).unwrap().iter().any(|&v| v > 0.0));
    assert!(block.column(1).unwrap().iter().all(|&v| v == 0.0));

    let _ = std::fs::remove_dir_all(&work);
}

#[test]
fn generate_accepts_flavor_names() {
    let work = tmp_dir("names_work");
    let cfg = small_grid_config(&work);
    let out = run(&[
        "generate",
        "names",
        "u",
        "dbar",
        "-p",
        "toy",
        "--work-dir",
        &s(&work),
        "--config",
        &s(&cfg),
    ]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));

    let output = Registry::new(vec![work.clone()]);
    let block = &output.load_blocks("names", 0).unwrap()[0];
    assert!(block.column(2).unwrap().iter().any(|&v| v > 0.0));
    assert!(block.column(-1).unwrap().iter().any(|&v| v > 0.0));
    assert!(block.column(21).unwrap().iter().all(|&v| v == 0.0));
    assert!(block.column(1).unwrap().iter().all(|&v| v == 0.0));
    let info = output.load_info("names").unwrap();
    assert_eq!(info.get("ForcePositive").and_then(|v| v.as_u64()), Some(1));

    let _ = std::fs::remove_dir_all(&work);
}

#[test]
fn generate_rejects_invalid_labels() {
    let work = tmp_dir("invalid_work");
    let out = run(&["generate", "debug", "f", "--work-dir", &s(&work)]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid labels"));
    assert!(!work.join("debug").exists());
    let _ = std::fs::remove_dir_all(&work);
}

#[test]
fn generate_evolution_from_installed_parent() {
    let work = tmp_dir("evol_work");
    let fixtures = fixture_sets();
    let out = run(&[
        "generate",
        "gonly",
        "g",
        "-p",
        "myCT14llo_NF3",
        "--data-path",
        &s(&fixtures),
        "--work-dir",
        &s(&work),
    ]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));

    let block = &Registry::new(vec![work.clone()]).load_blocks("gonly", 0).unwrap()[0];
    assert_eq!(block.pids().len(), 14);
    assert!(block.column(2).unwrap().iter().all(|&v| v == 0.0));
    let _ = std::fs::remove_dir_all(&work);
}

#[test]
fn generate_with_combination_weights() {
    let work = tmp_dir("combination_work");
    let cfg = small_grid_config(&work);
    let out = run(&[
        "generate",
        "custom_dir",
        "--combination",
        "0,0,0,0,0,1,-4,0,-4,1,0,0,0,0",
        "-p",
        "toy",
        "--work-dir",
        &s(&work),
        "--config",
        &s(&cfg),
    ]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let info = Registry::new(vec![work.clone()]).load_info("custom_dir").unwrap();
    assert_eq!(info.get("ForcePositive").and_then(|v| v.as_u64()), Some(0));

    let out = run(&["generate", "bad", "--combination", "1,2", "--work-dir", &s(&work)]);
    assert!(!out.status.success());
    let _ = std::fs::remove_dir_all(&work);
}

#[test]
fn install_then_list_and_info() {
    let work = tmp_dir("install_work");
    let share = tmp_dir("install_share");
    let cfg = small_grid_config(&work);
    let data_path = format!("{}:{}", s(&share), s(&fixture_sets()));

    let out = run(&["generate", "debug", "21", "--work-dir", &s(&work), "--config", &s(&cfg)]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));

    let out = run(&["install", "debug", "--work-dir", &s(&work), "--data-path", &data_path]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    assert!(share.join("debug/debug.info").is_file());
    assert!(!work.join("debug").exists());

    let out = run(&["install", "debug", "--work-dir", &s(&work), "--data-path", &data_path]);
    assert!(!out.status.success(), "installing a missing set should fail");

    let out = run(&["list", "--data-path", &data_path]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let names: Vec<String> =
        String::from_utf8_lossy(&out.stdout).lines().map(str::to_string).collect();
    assert!(names.contains(&"debug".to_string()));
    assert!(names.contains(&"myCT14llo_NF3".to_string()));

    let out = run(&["info", "debug", "--data-path", &data_path]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["NumMembers"], 1);
    assert_eq!(v["Flavors"].as_array().unwrap().len(), 14);

    let _ = std::fs::remove_dir_all(&work);
    let _ = std::fs::remove_dir_all(&share);
}

#[test]
fn info_of_unknown_set_fails() {
    let out = run(&["info", "NoSuchSet", "--data-path", &s(&fixture_sets())]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("not found"));
}
