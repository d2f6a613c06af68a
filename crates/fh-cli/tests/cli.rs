use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_fighist"))
}

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("fighist_cli_{}_{}_{}", std::process::id(), nanos, name));
    std::fs::create_dir_all(&p).unwrap();
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn write_hist(dir: &Path, name: &str, edges: &[f64], counts: &[f64]) -> String {
    let path = dir.join(name);
    let json = serde_json::json!({ "dim": "1d", "bin_edges": edges, "bin_counts": counts });
    std::fs::write(&path, serde_json::to_string(&json).unwrap()).unwrap();
    path.to_string_lossy().into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn stack_writes_svg_with_labels_and_collab() {
    let dir = tmp_dir("stack");
    let a = write_hist(&dir, "a.json", &[0.0, 1.0, 2.0], &[3.0, 4.0]);
    let b = write_hist(&dir, "b.json", &[0.0, 1.0, 2.0], &[1.0, 2.0]);
    let out_path = dir.join("stack.svg");

    let out = run(&[
        "stack",
        "-i",
        &a,
        "-i",
        &b,
        "--labels",
        "bkg,sig",
        "--band",
        "--collab",
        "MyExp",
        "--status",
        "Preliminary",
        "-o",
        out_path.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "stack should succeed, stderr={}", stderr(&out));

    let svg = std::fs::read_to_string(&out_path).unwrap();
    assert!(svg.contains(">bkg<"));
    assert!(svg.contains(">sig<"));
    assert!(svg.contains(">MyExp</tspan>"));
    assert!(svg.contains("> Preliminary</tspan>"));
}

#[test]
fn stack_with_mismatched_edges_fails() {
    let dir = tmp_dir("stack_mismatch");
    let a = write_hist(&dir, "a.json", &[0.0, 1.0, 2.0], &[3.0, 4.0]);
    let b = write_hist(&dir, "b.json", &[0.0, 1.5, 2.0], &[1.0, 2.0]);
    let out_path = dir.join("never.svg");

    let out = run(&["stack", "-i", &a, "-i", &b, "-o", out_path.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("bin edges of histogram 1"), "stderr={}", stderr(&out));
    assert!(!out_path.exists());
}

#[test]
fn ratio_emits_figure_json() {
    let dir = tmp_dir("ratio");
    let num = write_hist(&dir, "num.json", &[0.0, 1.0, 2.0], &[4.0, 9.0]);
    let den = write_hist(&dir, "den.json", &[0.0, 1.0, 2.0], &[2.0, 3.0]);
    let out_path = dir.join("ratio.json");

    let out = run(&[
        "ratio",
        "--num",
        &num,
        "--den",
        &den,
        "--no-errors",
        "--no-collab",
        "-o",
        out_path.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "ratio should succeed, stderr={}", stderr(&out));

    let fig: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    let plots = fig["panels"][0][1]["plots"].as_array().unwrap();
    let types: Vec<_> = plots.iter().map(|p| p["type"].as_str().unwrap()).collect();
    assert_eq!(types, vec!["scatter", "h_line"]);
    assert_eq!(plots[0]["y"], serde_json::json!([2.0, 3.0]));
}

#[test]
fn draw_with_statbox_and_kind() {
    let dir = tmp_dir("draw");
    let h = write_hist(&dir, "h.json", &[0.0, 1.0, 2.0, 3.0], &[5.0, 7.0, 2.0]);
    let out_path = dir.join("draw.svg");

    let out = run(&[
        "draw",
        "-i",
        &h,
        "--kind",
        "stairs",
        "--statbox",
        "--theme",
        "atlas",
        "-o",
        out_path.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "draw should succeed, stderr={}", stderr(&out));

    let svg = std::fs::read_to_string(&out_path).unwrap();
    assert!(svg.contains("<polyline"));
    assert!(svg.contains("Entries"));
    assert!(svg.contains(">ATLAS</tspan>"));
}

#[test]
fn draw_2d_as_stairs_is_rejected() {
    let dir = tmp_dir("draw2d");
    let path = dir.join("h2.json");
    let json = serde_json::json!({
        "dim": "2d",
        "x_edges": [0.0, 1.0],
        "y_edges": [0.0, 1.0],
        "counts": [[1.0]],
    });
    std::fs::write(&path, json.to_string()).unwrap();

    let out = run(&["draw", "-i", path.to_str().unwrap(), "--kind", "stairs"]);
    assert!(!out.status.success());
    let err = stderr(&out);
    assert!(err.contains("cannot draw a 2D histogram as stairs"), "stderr={err}");
}

#[test]
fn config_file_and_bad_anchor() {
    let dir = tmp_dir("config");
    let h = write_hist(&dir, "h.json", &[0.0, 1.0], &[1.0]);
    let cfg = dir.join("theme.yaml");
    std::fs::write(&cfg, "collab:\n  brand: YamlLab\n  status: ''\n").unwrap();

    let out = run(&["--config", cfg.to_str().unwrap(), "draw", "-i", &h]);
    assert!(out.status.success(), "stderr={}", stderr(&out));
    let svg = String::from_utf8_lossy(&out.stdout);
    assert!(svg.contains(">YamlLab</tspan>"));

    let out = run(&["draw", "-i", &h, "--anchor", "middle"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("invalid anchor"));
}
