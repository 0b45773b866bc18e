//! E2E graph query tests: `slng projects`, `order`, `deps`, `report`, `dot`,
//! `tree` and `unresolved` against an on-disk solution.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SOLUTION: &str = r#"
Microsoft Visual Studio Solution File, Format Version 12.00
# Visual Studio Version 17
Project("{2150E333-8FDC-42A3-9474-1A3956D46DE8}") = "src", "src", "{10000000-0000-0000-0000-000000000001}"
EndProject
Project("{9A19103F-16F7-4668-BE54-9A1E7A4F7556}") = "Web.Api", "src\Web.Api\Web.Api.csproj", "{20000000-0000-0000-0000-000000000002}"
EndProject
Project("{9A19103F-16F7-4668-BE54-9A1E7A4F7556}") = "Data", "src\Data\Data.csproj", "{30000000-0000-0000-0000-000000000003}"
EndProject
Project("{9A19103F-16F7-4668-BE54-9A1E7A4F7556}") = "Core", "src\Core\Core.csproj", "{40000000-0000-0000-0000-000000000004}"
EndProject
Global
	GlobalSection(NestedProjects) = preSolution
		{20000000-0000-0000-0000-000000000002} = {10000000-0000-0000-0000-000000000001}
		{30000000-0000-0000-0000-000000000003} = {10000000-0000-0000-0000-000000000001}
		{40000000-0000-0000-0000-000000000004} = {10000000-0000-0000-0000-000000000001}
	EndGlobalSection
EndGlobal
"#;

const WEB_API: &str = r#"<Project Sdk="Microsoft.NET.Sdk.Web">
  <PropertyGroup><TargetFramework>net8.0</TargetFramework></PropertyGroup>
  <ItemGroup>
    <ProjectReference Include="..\Data\Data.csproj" />
    <ProjectReference Include="..\Core\Core.csproj" />
    <ProjectReference Include="..\Legacy\Legacy.csproj" />
  </ItemGroup>
</Project>
"#;

const DATA: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup><TargetFramework>net8.0</TargetFramework></PropertyGroup>
  <ItemGroup><ProjectReference Include="..\Core\Core.csproj" /></ItemGroup>
</Project>
"#;

const CORE: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup><TargetFramework>netstandard2.0</TargetFramework></PropertyGroup>
</Project>
"#;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// A three-project solution: Web.Api → Data → Core, plus Web.Api → Core.
fn fixture() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "Shop.sln", SOLUTION);
    write(dir.path(), "src/Web.Api/Web.Api.csproj", WEB_API);
    write(dir.path(), "src/Data/Data.csproj", DATA);
    write(dir.path(), "src/Core/Core.csproj", CORE);
    let sln = dir.path().join("Shop.sln");
    (dir, sln)
}

fn slng_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("slng"));
    cmd.current_dir(dir);
    cmd.env("SLNGRAPH_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.join(".config"));
    cmd.env_remove("FORMAT");
    cmd
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = slng_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("slng should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

fn names(value: &Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

#[test]
fn projects_json_lists_summaries_in_build_order() {
    let (dir, sln) = fixture();
    let json = run_json(dir.path(), &["projects", sln.to_str().unwrap()]);
    let summaries = json.as_object().expect("projects keyed by name");

    let order: Vec<&str> = summaries.keys().map(String::as_str).collect();
    assert_eq!(order, vec!["Core", "Data", "Web.Api"]);

    let api = &summaries["Web.Api"];
    assert_eq!(api["name"], "Web.Api");
    assert_eq!(api["sortindex"], 2);
    assert_eq!(api["treepath"], "/src/Web.Api");
    assert_eq!(api["sdk"], "Microsoft.NET.Sdk.Web");
    assert_eq!(api["id"], "20000000-0000-0000-0000-000000000002");
    assert_eq!(names(&api["directrefs"]), vec!["Data", "Core", "Legacy"]);
    assert_eq!(names(&api["allrefs"]), vec!["Core", "Data"]);
}

#[test]
fn projects_text_is_tab_separated() {
    let (dir, sln) = fixture();
    slng_cmd(dir.path())
        .args(["projects", sln.to_str().unwrap(), "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("0\tCore\t"));
}

#[test]
fn order_text_prints_one_project_per_line() {
    let (dir, sln) = fixture();
    slng_cmd(dir.path())
        .args(["order", sln.to_str().unwrap(), "--format", "text"])
        .assert()
        .success()
        .stdout("Core\nData\nWeb.Api\n");
}

#[test]
fn order_waves_json() {
    let (dir, sln) = fixture();
    let json = run_json(dir.path(), &["order", sln.to_str().unwrap(), "--waves"]);

    assert_eq!(json["waves"], serde_json::json!([["Core"], ["Data"], ["Web.Api"]]));
    let core = &json["order"][0];
    assert_eq!(core["name"], "Core");
    assert_eq!(core["leaf_level"], 0);
    assert_eq!(core["root_level"], 2);
}

#[test]
fn keep_stubs_keeps_solution_folders_in_order() {
    let (dir, sln) = fixture();
    slng_cmd(dir.path())
        .args(["order", sln.to_str().unwrap(), "--format", "text", "--keep-stubs"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("/src\n"));
}

#[test]
fn deps_reports_pure_dependencies_case_insensitively() {
    let (dir, sln) = fixture();
    let json = run_json(dir.path(), &["deps", sln.to_str().unwrap(), "web.api"]);

    assert_eq!(json["name"], "Web.Api");
    assert_eq!(names(&json["direct"]), vec!["Data", "Core"]);
    assert_eq!(names(&json["pure"]), vec!["Data"]);
    assert_eq!(names(&json["dependents"]), Vec::<String>::new());

    let core = run_json(dir.path(), &["deps", sln.to_str().unwrap(), "Core"]);
    assert_eq!(names(&core["all_dependents"]), vec!["Data", "Web.Api"]);
}

#[test]
fn report_json_and_reverse() {
    let (dir, sln) = fixture();
    let json = run_json(dir.path(), &["report", sln.to_str().unwrap()]);
    let api = &json["Web.Api"];
    assert_eq!(api["name"], "Web.Api");
    assert_eq!(api["dependsOn"][0]["name"], "Data");
    assert_eq!(api["dependsOn"][0]["dependsOn"][0]["name"], "Core");

    let reverse = run_json(dir.path(), &["report", sln.to_str().unwrap(), "--reverse"]);
    assert_eq!(reverse["Core"]["dependentOf"][0]["name"], "Web.Api");
    assert_eq!(reverse["Core"]["dependentOf"][1]["name"], "Data");
}

#[test]
fn report_dense_json() {
    let (dir, sln) = fixture();
    let json = run_json(dir.path(), &["report", sln.to_str().unwrap(), "--dense"]);
    assert_eq!(
        json["Data"],
        serde_json::json!({ "Data": { "Core": {} } })
    );
}

#[test]
fn report_text_draws_trees() {
    let (dir, sln) = fixture();
    slng_cmd(dir.path())
        .args(["report", sln.to_str().unwrap(), "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Web.Api\n├── Data\n│   └── Core\n└── Core\n"));
}

#[test]
fn dot_to_stdout_marks_redundant_edges() {
    let (dir, sln) = fixture();
    slng_cmd(dir.path())
        .args(["dot", sln.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph dependencies {"))
        .stdout(predicate::str::contains("rankdir=LR;"))
        .stdout(predicate::str::contains(
            "\"Web.Api\" -> \"Core\" [style=dashed, color=grey];",
        ))
        .stdout(predicate::str::contains("\"Web.Api\" -> \"Data\";"));
}

#[test]
fn dot_pure_only_to_file() {
    let (dir, sln) = fixture();
    let out = dir.path().join("deps.dot");
    let output = slng_cmd(dir.path())
        .args([
            "dot",
            sln.to_str().unwrap(),
            "--pure-only",
            "--rankdir",
            "TB",
            "-o",
            out.to_str().unwrap(),
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let written: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(written["nodes"], 3);

    let source = fs::read_to_string(&out).unwrap();
    assert!(source.contains("rankdir=TB;"));
    assert!(!source.contains("style=dashed"));
    assert!(!source.contains("\"Web.Api\" -> \"Core\""));
}

#[test]
fn tree_json_nests_projects_under_folders() {
    let (dir, sln) = fixture();
    let json = run_json(dir.path(), &["tree", sln.to_str().unwrap()]);
    let top = json.as_array().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["name"], "src");
    assert_eq!(top[0]["type"], "Solution Folder");

    let children: Vec<&str> = top[0]["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(children, vec!["Core", "Data", "Web.Api"]);
}

#[test]
fn unresolved_lists_dangling_references() {
    let (dir, sln) = fixture();
    slng_cmd(dir.path())
        .args(["unresolved", sln.to_str().unwrap(), "--format", "text"])
        .assert()
        .success()
        .stdout("Web.Api\tLegacy\t..\\Legacy\\Legacy.csproj\n");
}
