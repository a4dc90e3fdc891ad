use anyhow::Result;
use repo_fixup::{
    BuildFix, FixupConfig, LocalStorage, Patch, PatchEngine, PatchKind, WorkflowPatch,
};
use std::fs;
use tempfile::TempDir;

const FLUTTER_BUILD: &str = "name: Build the flutter version of the RustDesk
jobs:
  build-rustdesk-linux-arm:
    runs-on: ubuntu-20.04
    steps:
      - name: Checkout source code
        uses: actions/checkout@v3

      - uses: rustdesk-org/run-on-arch-action@amd64-support
        name: Build rustdesk library for ${{ matrix.job.arch }}
        with:
          arch: ${{ matrix.job.arch }}
  build-rustdesk-linux-sciter:
    steps:
      - uses: rustdesk-org/run-on-arch-action@amd64-support
        name: Build rustdesk sciter binary
";

fn write_workflow(dir: &TempDir, content: &str) -> Result<()> {
    fs::create_dir_all(dir.path().join(".github/workflows"))?;
    fs::write(dir.path().join(".github/workflows/flutter-build.yml"), content)?;
    Ok(())
}

fn build_script() -> String {
    let mut script = String::from("#!/usr/bin/env python3\nimport os\n");
    for i in 0..660 {
        if i == 100 {
            // 門檻之前的相同指令必須保留
            script.push_str("    system2('cp -a DEBIAN/* tmpdeb/DEBIAN/')\n");
        }
        script.push_str(&format!("    # line {}\n", i));
    }
    script.push_str(
        "def build_flutter_deb(version, features):
    if not skip_cargo:
        # 确保所有的脚本都有执行权限
        system2('chmod -R 755 tmpdeb/DEBIAN')
    else:
        system2('cp -a DEBIAN/* tmpdeb/DEBIAN/')
        system2('mkdir -p tmpdeb/usr/share/rustdesk')
        system2('cp -a DEBIAN/* tmpdeb/DEBIAN/')
    md5_file_folder('tmpdeb/usr/share/rustdesk/files/')
    system2('dpkg-deb -b tmpdeb rustdesk.deb;')
",
    );
    script
}

#[test]
fn test_workflow_patch_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_workflow(&temp_dir, FLUTTER_BUILD)?;

    let engine = PatchEngine::new(LocalStorage::new(temp_dir.path()));
    let patch = WorkflowPatch::with_defaults()?;
    let outcome = engine.run(&patch)?;

    assert_eq!(outcome.patch, PatchKind::WorkflowPermissions);
    assert_eq!(outcome.matches, 2);
    assert!(outcome.written);
    assert_eq!(
        outcome.lines_after,
        outcome.lines_before + outcome.matches * patch.lines_per_insertion()
    );

    let patched = fs::read_to_string(temp_dir.path().join(".github/workflows/flutter-build.yml"))?;
    assert_eq!(patched.matches("Fix permissions for run-on-arch").count(), 2);
    assert!(patched.contains(
        "          .github/set-permissions.sh\n\n\n      - uses: rustdesk-org/run-on-arch-action@amd64-support\n        name: Build rustdesk library"
    ));
    // 原本 marker 前的空行移到步驟區塊之後
    assert!(patched.contains(
        "        uses: actions/checkout@v3\n      - name: Fix permissions for run-on-arch\n"
    ));
    Ok(())
}

#[test]
fn test_workflow_patch_is_not_idempotent() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_workflow(&temp_dir, FLUTTER_BUILD)?;

    let engine = PatchEngine::new(LocalStorage::new(temp_dir.path()));
    let patch = WorkflowPatch::with_defaults()?;
    let first = engine.run(&patch)?;
    let second = engine.run(&patch)?;

    assert_eq!(second.lines_before, first.lines_after);
    assert_eq!(second.line_delta(), first.line_delta());

    let patched = fs::read_to_string(temp_dir.path().join(".github/workflows/flutter-build.yml"))?;
    assert_eq!(patched.matches("chmod +x .github/set-permissions.sh").count(), 4);
    Ok(())
}

#[test]
fn test_build_fix_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let original = build_script();
    fs::write(temp_dir.path().join("build.py"), &original)?;

    let engine = PatchEngine::new(LocalStorage::new(temp_dir.path()));
    let outcome = engine.run(&BuildFix::with_defaults())?;

    assert_eq!(outcome.patch, PatchKind::BuildFix);
    assert_eq!(outcome.matches, 4);
    assert_eq!(outcome.lines_after, outcome.lines_before - 4);

    let fixed = fs::read_to_string(temp_dir.path().join("build.py"))?;
    assert_eq!(fixed.matches("cp -a DEBIAN/* tmpdeb/DEBIAN/").count(), 1);
    assert!(!fixed.contains("    else:\n"));
    assert!(!fixed.contains("mkdir -p tmpdeb/usr/share/rustdesk"));
    assert!(fixed.contains(
        "        system2('chmod -R 755 tmpdeb/DEBIAN')\n    md5_file_folder('tmpdeb/usr/share/rustdesk/files/')\n"
    ));
    Ok(())
}

#[test]
fn test_build_fix_leaves_clean_file_unchanged() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let clean: String = (0..800).map(|i| format!("print({})\n", i)).collect();
    fs::write(temp_dir.path().join("build.py"), &clean)?;

    let engine = PatchEngine::new(LocalStorage::new(temp_dir.path()));
    let outcome = engine.run(&BuildFix::with_defaults())?;

    assert_eq!(outcome.matches, 0);
    assert!(!outcome.changed);
    assert_eq!(fs::read_to_string(temp_dir.path().join("build.py"))?, clean);
    Ok(())
}

#[test]
fn test_dry_run_leaves_files_untouched() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_workflow(&temp_dir, FLUTTER_BUILD)?;

    let engine = PatchEngine::new_with_dry_run(LocalStorage::new(temp_dir.path()), true);
    let outcome = engine.run(&WorkflowPatch::with_defaults()?)?;

    assert!(outcome.changed);
    assert!(!outcome.written);
    assert_eq!(
        fs::read_to_string(temp_dir.path().join(".github/workflows/flutter-build.yml"))?,
        FLUTTER_BUILD
    );
    Ok(())
}

#[test]
fn test_missing_target_is_an_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let engine = PatchEngine::new(LocalStorage::new(temp_dir.path()));

    let err = engine.run(&WorkflowPatch::with_defaults()?).unwrap_err();
    assert_eq!(err.exit_code(), 3);
    Ok(())
}

#[test]
fn test_toml_config_runs_both_patches() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_workflow(&temp_dir, FLUTTER_BUILD)?;
    fs::write(temp_dir.path().join("build.py"), build_script())?;

    let config_content = format!(
        r#"
base_dir = "{}"

[workflow]

[build_fix]
"#,
        temp_dir.path().to_str().unwrap().replace('\\', "/")
    );
    let config_path = temp_dir.path().join("fixup.toml");
    fs::write(&config_path, config_content)?;

    let config = FixupConfig::from_file(&config_path)?;
    config.validate_config()?;

    let engine = PatchEngine::new(LocalStorage::new(config.base_dir()));
    let outcomes = config
        .patches()?
        .iter()
        .map(|patch| engine.run(&**patch))
        .collect::<repo_fixup::Result<Vec<_>>>()?;

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].patch, PatchKind::WorkflowPermissions);
    assert_eq!(outcomes[0].matches, 2);
    assert_eq!(outcomes[1].patch, PatchKind::BuildFix);
    assert_eq!(outcomes[1].matches, 4);

    let json = serde_json::to_value(&outcomes)?;
    assert_eq!(json[0]["patch"], "workflow_permissions");
    assert_eq!(json[1]["path"], "build.py");
    Ok(())
}

#[test]
fn test_custom_patch_through_trait_object() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("ci.yml"), "steps:\n  - uses: foo/bar@v2\n")?;

    let patches: Vec<Box<dyn Patch>> = vec![Box::new(WorkflowPatch::new(
        "ci.yml",
        "- uses: foo/bar@v2",
        "  - run: ./setup.sh\n",
    )?)];

    let engine = PatchEngine::new(LocalStorage::new(temp_dir.path()));
    for patch in &patches {
        engine.run(&**patch)?;
    }

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("ci.yml"))?,
        "steps:\n  - run: ./setup.sh\n\n  - uses: foo/bar@v2\n"
    );
    Ok(())
}
