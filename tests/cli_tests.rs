use regex::Regex;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    dir: TempDir,
    pair_csv: PathBuf,
    dipole_json: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let pair_csv = dir.path().join("pair.csv");
        let dipole_json = dir.path().join("dipole.json");

        let mut csv = File::create(&pair_csv).unwrap();
        writeln!(csv, "x,y,q").unwrap();
        writeln!(csv, "0,0,1").unwrap();
        writeln!(csv, "1,0,1").unwrap();

        fs::write(
            &dipole_json,
            r#"{"num_charges": 2, "x0": -1, "y0": 0, "q0": 1, "x1": 1, "y1": 0, "q1": -1}"#,
        )
        .unwrap();

        Self {
            dir,
            pair_csv,
            dipole_json,
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_chargefield"))
        .args(args)
        .output()
        .expect("Failed to run binary")
}

fn s(p: &Path) -> &str {
    p.to_str().unwrap()
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_solve_inline_charges() {
    let ctx = TestContext::new();
    let svg = ctx.path("pair.svg");
    let out = run(&[
        "solve",
        "--charge",
        "0,0,1",
        "--charge",
        "1,0,1",
        "--lres",
        "2",
        "--density",
        "0.5",
        "-o",
        s(&svg),
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    let line =
        Regex::new(r"Charge at \(([-\d.]+), ([-\d.]+)\): \|E\| = (\d\.\d\de[+-]\d\d) N/C")
            .unwrap();
    let caps: Vec<_> = line.captures_iter(&stdout).collect();
    assert_eq!(caps.len(), 2, "stdout: {}", stdout);
    assert_eq!(&caps[0][1], "0.0");
    assert_eq!(&caps[1][1], "1.0");
    assert_eq!(&caps[0][3], "9.00e+09");

    let image = fs::read_to_string(&svg).unwrap();
    assert!(image.starts_with("<svg"));
}

#[test]
fn test_solve_negative_charge_and_json() {
    let ctx = TestContext::new();
    let json = ctx.path("summary.json");
    let out = run(&[
        "solve",
        "-q",
        "-2,0,-2",
        "-f",
        s(&ctx.pair_csv),
        "--lres",
        "2",
        "--density",
        "0.5",
        "-o",
        s(&ctx.path("field.svg")),
        "--json",
        s(&json),
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let summary = read_json(&json);
    assert_eq!(summary["chargeCount"], 3);
    assert_eq!(summary["gridRows"], 24);
    assert_eq!(summary["gridCols"], 24);
    assert_eq!(summary["imageMime"], "image/svg+xml");
    // file charges come before inline ones
    assert_eq!(
        summary["fieldValues"][2].as_str().unwrap(),
        "Charge at (-2.0, 0.0): |E| = 3.25e+09 N/C"
    );
}

#[test]
fn test_solve_preset_base64() {
    let ctx = TestContext::new();
    let out = run(&[
        "solve",
        "--preset",
        "dipole",
        "--lres",
        "2",
        "--density",
        "0.5",
        "-o",
        s(&ctx.path("dipole.svg")),
        "--base64",
    ]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.lines().any(|l| l.starts_with("PHN2Zy")));
}

#[test]
fn test_bad_charge_file_fails() {
    let ctx = TestContext::new();
    let bad = ctx.path("bad.csv");
    fs::write(&bad, "x,y,q\n0,0,1\n1,zero,1\n").unwrap();

    let out = run(&["solve", "-f", s(&bad), "-o", s(&ctx.path("bad.svg"))]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("charge 1"), "stderr: {}", stderr);
    assert!(!ctx.path("bad.svg").exists());
}

#[test]
fn test_bad_region_fails() {
    let ctx = TestContext::new();
    let out = run(&[
        "solve",
        "--x1",
        "2",
        "--x2",
        "-2",
        "-o",
        s(&ctx.path("r.svg")),
    ]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Invalid Sampling Region"));
}

#[test]
fn test_presets_listing() {
    let out = run(&["presets"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    for name in ["single", "dipole", "like_pair", "quadrupole", "triangle", "line"] {
        assert!(stdout.contains(name), "missing {}", name);
    }
}

#[test]
fn test_batch_writes_every_scenario() {
    let ctx = TestContext::new();
    let out_dir = ctx.path("batch");
    let out = run(&[
        "batch",
        s(&ctx.pair_csv),
        s(&ctx.dipole_json),
        "--lres",
        "2",
        "--density",
        "0.5",
        "-o",
        s(&out_dir),
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    for name in ["pair", "dipole"] {
        assert!(out_dir.join(format!("{}.svg", name)).exists());
        let summary = read_json(&out_dir.join(format!("{}.json", name)));
        assert_eq!(summary["chargeCount"], 2);
    }
}

#[test]
fn test_batch_reports_failures() {
    let ctx = TestContext::new();
    let out = run(&[
        "batch",
        s(&ctx.pair_csv),
        s(&ctx.path("missing.csv")),
        "--lres",
        "2",
        "--density",
        "0.5",
        "-o",
        s(&ctx.path("batch")),
    ]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("1 of 2 scenarios failed"));
    assert!(ctx.path("batch").join("pair.svg").exists());
}

#[test]
fn test_config_file_layering() {
    let ctx = TestContext::new();
    let config = ctx.path("config.json");
    fs::write(&config, r#"{"region": {"lres": 3}, "render": {"density": 0.5}}"#).unwrap();

    let from_file = ctx.path("file.json");
    let out = run(&[
        "solve",
        "--config",
        s(&config),
        "--preset",
        "single",
        "-o",
        s(&ctx.path("a.svg")),
        "--json",
        s(&from_file),
    ]);
    assert!(out.status.success());
    assert_eq!(read_json(&from_file)["gridRows"], 36);

    let overridden = ctx.path("cli.json");
    let out = run(&[
        "solve",
        "--config",
        s(&config),
        "--preset",
        "single",
        "--lres",
        "2",
        "-o",
        s(&ctx.path("b.svg")),
        "--json",
        s(&overridden),
    ]);
    assert!(out.status.success());
    assert_eq!(read_json(&overridden)["gridRows"], 24);
}
