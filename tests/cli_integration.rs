//! CLI integration tests for the mapeditor binary
//!
//! Each test runs the real binary against maps in a temporary directory,
//! with preferences isolated through `MAPEDITOR_CONFIG_DIR`.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const MAP_TMX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.0" orientation="orthogonal" width="2" height="2" tilewidth="32" tileheight="32">
 <tileset firstgid="1" name="ground" tilewidth="32" tileheight="32" tilecount="4" columns="2">
  <image source="ground.png" width="64" height="64"/>
 </tileset>
 <layer name="Ground" width="2" height="2">
  <data encoding="csv">
1,2,
3,0
</data>
 </layer>
</map>
"#;

const OBJECTS_ONLY_TMX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.0" orientation="orthogonal" width="2" height="2" tilewidth="32" tileheight="32">
 <objectgroup name="Spawns">
  <object id="1" name="start" x="16" y="16"/>
 </objectgroup>
</map>
"#;

/// A map directory plus an isolated preferences directory
struct Workspace {
    dir: TempDir,
    config: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.tmx"), MAP_TMX).unwrap();
        Self {
            dir,
            config: TempDir::new().unwrap(),
        }
    }

    fn path(&self, name: &str) -> String {
        self.dir.path().join(name).display().to_string()
    }

    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("mapeditor"));
        cmd.env("MAPEDITOR_CONFIG_DIR", self.config.path());
        cmd
    }

    fn write_config(&self, contents: &str) {
        fs::write(self.config.path().join("config.toml"), contents).unwrap();
    }
}

#[cfg(unix)]
fn install_plugin(dir: &Path, name: &str, manifest: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(format!("mapeditor-writer-{}", name));
    let script = format!(
        r#"#!/bin/sh
if [ "$1" = "--manifest" ]; then
  echo '{manifest}'
  exit 0
fi
cat > "$(dirname "$0")/last-request.json"
echo '{{"success": true}}'
"#
    );
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

// =============================================================================
// Startup Flags
// =============================================================================

#[test]
fn test_version_prints_name_and_version() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("mapeditor "))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_repeated_version_flag_is_accepted() {
    let ws = Workspace::new();

    ws.cmd().args(["-v", "-v"]).assert().success();
}

#[test]
fn test_version_skips_export() {
    let ws = Workspace::new();
    let target = ws.path("b.json");

    ws.cmd()
        .args(["-v", "--export-map", &ws.path("a.tmx"), &target])
        .assert()
        .success();

    assert!(!Path::new(&target).exists());
}

#[test]
fn test_quit_exits_cleanly() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("--quit")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_unknown_flag_is_malformed() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("--bogus")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--bogus"));
}

#[test]
fn test_help_lists_export_flag() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--export-map"));
}

#[test]
fn test_without_export_prints_notice() {
    let ws = Workspace::new();

    ws.cmd()
        .arg(ws.path("a.tmx"))
        .assert()
        .success()
        .stderr(predicate::str::contains("--export-map"));
}

#[test]
fn test_disable_opengl_is_persisted() {
    let ws = Workspace::new();

    ws.cmd().arg("--disable-opengl").assert().success();

    let config = fs::read_to_string(ws.config.path().join("config.toml")).unwrap();
    assert!(config.contains("use_opengl = false"));
}

#[test]
fn test_disable_opengl_applies_with_quit() {
    let ws = Workspace::new();

    ws.cmd().args(["--disable-opengl", "--quit"]).assert().success();

    let config = fs::read_to_string(ws.config.path().join("config.toml")).unwrap();
    assert!(config.contains("use_opengl = false"));
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn test_export_needs_source_and_target() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["--export-map", &ws.path("a.tmx")])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Export syntax is --export-map [format] <source file> <target file>",
        ));
}

#[test]
fn test_export_by_suffix_to_json() {
    let ws = Workspace::new();
    let target = ws.path("b.json");

    ws.cmd()
        .args(["--export-map", &ws.path("a.tmx"), &target])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(json["type"], "map");
    assert_eq!(json["width"], 2);
}

#[test]
fn test_export_suffix_is_case_insensitive() {
    let ws = Workspace::new();
    let target = ws.path("b.JSON");

    ws.cmd()
        .args(["--export-map", &ws.path("a.tmx"), &target])
        .assert()
        .success();

    assert!(Path::new(&target).is_file());
}

#[test]
fn test_export_with_explicit_filter() {
    let ws = Workspace::new();
    let target = ws.path("b.out");

    ws.cmd()
        .args([
            "--export-map",
            "Tiled map files (*.tmx)",
            &ws.path("a.tmx"),
            &target,
        ])
        .assert()
        .success();

    let written = fs::read_to_string(&target).unwrap();
    assert!(written.contains("<map"));
}

#[test]
fn test_export_unknown_filter() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["--export-map", "Nope (*.x)", &ws.path("a.tmx"), &ws.path("b.json")])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No exporter found for target file."));
}

#[test]
fn test_export_unknown_suffix() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["--export-map", &ws.path("a.tmx"), &ws.path("b.png")])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No exporter found for target file."));
}

#[test]
fn test_export_missing_source() {
    let ws = Workspace::new();
    let target = ws.path("b.json");

    ws.cmd()
        .args(["--export-map", &ws.path("missing.tmx"), &target])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load source map."));

    assert!(!Path::new(&target).exists());
}

#[test]
fn test_export_oversized_source_fails_cleanly() {
    let ws = Workspace::new();
    fs::write(
        ws.dir.path().join("big.tmx"),
        r#"<map width="4000000000" height="4000000000" tilewidth="8" tileheight="8">
 <layer name="L"><data encoding="csv">1</data></layer>
</map>"#,
    )
    .unwrap();

    ws.cmd()
        .args(["--export-map", &ws.path("big.tmx"), &ws.path("out.json")])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load source map."));
}

#[test]
fn test_export_write_failure() {
    let ws = Workspace::new();
    fs::write(ws.dir.path().join("objects.tmx"), OBJECTS_ONLY_TMX).unwrap();

    ws.cmd()
        .args(["--export-map", &ws.path("objects.tmx"), &ws.path("b.csv")])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to export map to target file."));
}

#[test]
fn test_export_csv_contents() {
    let ws = Workspace::new();
    let target = ws.path("b.csv");

    ws.cmd()
        .args(["--export-map", &ws.path("a.tmx"), &target])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&target).unwrap(), "0,1\n2,-1\n");
}

#[test]
fn test_export_json_source() {
    let ws = Workspace::new();
    let json = ws.path("b.json");
    let tmx = ws.path("c.tmx");

    ws.cmd()
        .args(["--export-map", &ws.path("a.tmx"), &json])
        .assert()
        .success();
    ws.cmd()
        .args(["--export-map", &json, &tmx])
        .assert()
        .success();

    assert!(fs::read_to_string(&tmx).unwrap().contains("name=\"Ground\""));
}

#[test]
fn test_export_error_as_json() {
    let ws = Workspace::new();

    ws.cmd()
        .args([
            "--output-format",
            "json",
            "--export-map",
            &ws.path("a.tmx"),
            &ws.path("b.png"),
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(r#""kind":"no_writer_found""#));
}

#[test]
fn test_export_success_as_json() {
    let ws = Workspace::new();

    ws.cmd()
        .args([
            "--output-format",
            "json",
            "--export-map",
            &ws.path("a.tmx"),
            &ws.path("b.json"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""writer":"json""#))
        .stdout(predicate::str::contains(r#""layers":1"#));
}

#[test]
fn test_disabled_writer_is_not_used() {
    let ws = Workspace::new();
    ws.write_config("disabled_plugins = [\"json\"]\n");

    ws.cmd()
        .args(["--export-map", &ws.path("a.tmx"), &ws.path("b.json")])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No exporter found for target file."));
}

// =============================================================================
// Plugins
// =============================================================================

#[cfg(unix)]
#[test]
fn test_plugin_writer_selected_by_suffix() {
    let ws = Workspace::new();
    let plugins = TempDir::new().unwrap();
    install_plugin(
        plugins.path(),
        "lua",
        r#"{"name": "lua", "version": "1.0.0", "name_filters": ["Lua files (*.lua)"]}"#,
    );
    let target = ws.path("b.lua");

    ws.cmd()
        .arg("--plugin-dir")
        .arg(plugins.path())
        .args(["--export-map", &ws.path("a.tmx"), &target])
        .assert()
        .success();

    let request: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(plugins.path().join("last-request.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(request["operation"], "write");
    assert_eq!(request["params"]["target"], target);
    assert_eq!(request["params"]["map"]["layers"][0]["name"], "Ground");
}

#[cfg(unix)]
#[test]
fn test_plugin_dir_from_preferences() {
    let ws = Workspace::new();
    let plugins = TempDir::new().unwrap();
    install_plugin(
        plugins.path(),
        "lua",
        r#"{"name": "lua", "version": "1.0.0", "name_filters": ["Lua files (*.lua)"]}"#,
    );
    ws.write_config(&format!(
        "plugin_dirs = [{:?}]\n",
        plugins.path().display().to_string()
    ));

    ws.cmd()
        .args(["--export-map", &ws.path("a.tmx"), &ws.path("b.lua")])
        .assert()
        .success();

    assert!(plugins.path().join("last-request.json").is_file());
}

#[cfg(unix)]
#[test]
fn test_ambiguous_suffix() {
    let ws = Workspace::new();
    let plugins = TempDir::new().unwrap();
    install_plugin(
        plugins.path(),
        "minjson",
        r#"{"name": "minjson", "version": "1.0.0", "name_filters": ["Minified json (*.json)"]}"#,
    );
    let target = ws.path("b.json");

    ws.cmd()
        .arg("--plugin-dir")
        .arg(plugins.path())
        .args(["--export-map", &ws.path("a.tmx"), &target])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Non-unique file extension. Can't determine correct export format.",
        ));

    assert!(!Path::new(&target).exists());
}

#[cfg(unix)]
#[test]
fn test_filter_resolves_ambiguity() {
    let ws = Workspace::new();
    let plugins = TempDir::new().unwrap();
    install_plugin(
        plugins.path(),
        "minjson",
        r#"{"name": "minjson", "version": "1.0.0", "name_filters": ["Minified json (*.json)"]}"#,
    );

    ws.cmd()
        .arg("--plugin-dir")
        .arg(plugins.path())
        .args([
            "--export-map",
            "minified JSON (*.json)",
            &ws.path("a.tmx"),
            &ws.path("b.json"),
        ])
        .assert()
        .success();

    assert!(plugins.path().join("last-request.json").is_file());
}

#[cfg(unix)]
#[test]
fn test_broken_plugin_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let ws = Workspace::new();
    let plugins = TempDir::new().unwrap();
    let path = plugins.path().join("mapeditor-writer-broken");
    fs::write(&path, "#!/bin/sh\nexit 3\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

    ws.cmd()
        .arg("--plugin-dir")
        .arg(plugins.path())
        .args(["--export-map", &ws.path("a.tmx"), &ws.path("b.json")])
        .assert()
        .success()
        .stderr(predicate::str::contains("Ignoring plugin mapeditor-writer-broken"));
}

// =============================================================================
// Format Listing
// =============================================================================

#[test]
fn test_list_formats_text() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("--list-formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tiled map files (*.tmx)"))
        .stdout(predicate::str::contains("Json files (*.json)"))
        .stdout(predicate::str::contains("CSV files (*.csv)"));
}

#[test]
fn test_list_formats_json() {
    let ws = Workspace::new();

    let output = ws
        .cmd()
        .args(["--list-formats", "--output-format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let formats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = formats
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["tmx", "json", "csv"]);
}
