//! End-to-end tests of the create pipeline with fake collaborators.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use starters::acquire::{cache_module_path, InstallOptions, PackageManager, VersionControl};
use starters::config::Settings;
use starters::fs::{Filesystem, LocalFilesystem};
use starters::setup::{LoadedModule, ModuleLoader, ModuleValue};
use starters::template::PackageSpec;
use starters::ui::MockUI;
use starters::{Result, Starter, StarterError};
use tempfile::TempDir;

/// Files to lay down relative to a clone or package root.
type Files = Vec<(&'static str, &'static str)>;

fn write_files(root: &Path, files: &Files) {
    fs::create_dir_all(root).unwrap();
    for (name, content) in files {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

#[derive(Clone, Default)]
struct FakeVcs {
    repos: Rc<HashMap<String, Files>>,
    clones: Rc<RefCell<Vec<(String, PathBuf)>>>,
}

impl FakeVcs {
    fn with_repo(template: &str, files: Files) -> Self {
        let mut repos = HashMap::new();
        repos.insert(template.to_string(), files);
        Self {
            repos: Rc::new(repos),
            ..Self::default()
        }
    }

    fn clones(&self) -> Vec<(String, PathBuf)> {
        self.clones.borrow().clone()
    }
}

impl VersionControl for FakeVcs {
    fn clone_repository(&self, template: &str, dest: &Path) -> Result<()> {
        self.clones
            .borrow_mut()
            .push((template.to_string(), dest.to_path_buf()));
        match self.repos.get(template) {
            Some(files) => {
                write_files(dest, files);
                Ok(())
            }
            None => Err(StarterError::CommandFailed {
                command: format!("git clone {template}"),
                code: Some(128),
            }),
        }
    }
}

#[derive(Clone, Default)]
struct FakeNpm {
    packages: Rc<HashMap<String, Files>>,
    installs: Rc<RefCell<Vec<(String, InstallOptions)>>>,
}

impl FakeNpm {
    fn with_package(name: &str, files: Files) -> Self {
        let mut packages = HashMap::new();
        packages.insert(name.to_string(), files);
        Self {
            packages: Rc::new(packages),
            ..Self::default()
        }
    }

    fn installs(&self) -> Vec<(String, InstallOptions)> {
        self.installs.borrow().clone()
    }
}

impl PackageManager for FakeNpm {
    fn install(&self, spec: &str, options: &InstallOptions) -> Result<()> {
        self.installs
            .borrow_mut()
            .push((spec.to_string(), options.clone()));
        let name = PackageSpec::parse(spec).name;
        match self.packages.get(&name) {
            Some(files) => {
                write_files(&cache_module_path(&options.prefix, &name), files);
                Ok(())
            }
            None => Err(StarterError::CommandFailed {
                command: format!("npm install {spec}"),
                code: Some(1),
            }),
        }
    }
}

struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    fn cwd(&self) -> &Path {
        self.temp.path()
    }

    fn cache(&self) -> PathBuf {
        self.temp.path().join("cache")
    }

    fn settings(&self) -> Settings {
        Settings {
            cache_dir: self.cache(),
            ..Settings::default()
        }
    }

    fn starter(&self, vcs: &FakeVcs, npm: &FakeNpm) -> Starter {
        Starter::new(&self.settings(), self.cwd())
            .with_vcs(vcs.clone())
            .with_package_manager(npm.clone())
    }
}

fn cd_hints(ui: &MockUI) -> usize {
    ui.messages()
        .iter()
        .filter(|m| m.as_str() == "Access your new project by running the following:")
        .count()
}

#[test]
fn https_clone_without_config_is_done() {
    let ws = Workspace::new();
    let template = "https://github.com/org/repo.git";
    let vcs = FakeVcs::with_repo(template, vec![("README.md", "# repo\n")]);
    let npm = FakeNpm::default();
    let mut ui = MockUI::new();

    let outcome = ws
        .starter(&vcs, &npm)
        .create("my-app", template, None, &mut ui)
        .unwrap();

    assert_eq!(outcome.target, ws.cwd().join("my-app"));
    assert!(!outcome.configured);
    assert_eq!(vcs.clones(), vec![(template.to_string(), ws.cwd().join("my-app"))]);
    assert!(npm.installs().is_empty());
    assert!(ui.has_message("Cloning repository."));
    assert!(ui.has_message("  $ cd my-app"));
    assert_eq!(cd_hints(&ui), 1);
}

#[test]
fn cd_hint_climbs_to_targets_outside_cwd() {
    let ws = Workspace::new();
    let cwd = ws.cwd().join("work");
    fs::create_dir_all(&cwd).unwrap();
    let template = "https://github.com/org/repo.git";
    let vcs = FakeVcs::with_repo(template, vec![("README.md", "# repo\n")]);
    let mut ui = MockUI::new();

    let outcome = Starter::new(&ws.settings(), cwd.clone())
        .with_vcs(vcs)
        .with_package_manager(FakeNpm::default())
        .create("../outside", template, None, &mut ui)
        .unwrap();

    assert_eq!(outcome.target, ws.cwd().join("outside"));
    assert!(ui.has_message("  $ cd ../outside"));
}

#[test]
fn ssh_clone_runs_starter_config() {
    let ws = Workspace::new();
    let template = "git@github.com:org/repo.git";
    let vcs = FakeVcs::with_repo(
        template,
        vec![
            ("README.md", "# ${project_name}\n"),
            (".starter/index.yml", "render: [README.md]\nremove: [.starter]\n"),
        ],
    );
    let npm = FakeNpm::default();
    let mut ui = MockUI::new();

    let outcome = ws
        .starter(&vcs, &npm)
        .create("shop", template, None, &mut ui)
        .unwrap();

    assert!(outcome.configured);
    assert_eq!(
        fs::read_to_string(outcome.target.join("README.md")).unwrap(),
        "# shop\n"
    );
    assert!(!outcome.target.join(".starter").exists());
    assert!(ui.has_message("Running configuration script."));
    assert!(ui
        .successes()
        .contains(&"Configuration complete.".to_string()));
}

#[test]
fn registry_package_installs_into_cache_and_runs() {
    let ws = Workspace::new();
    let npm = FakeNpm::with_package(
        "my-template",
        vec![
            ("package.json", r#"{"name": "my-template", "version": "2.0.0"}"#),
            (
                "index.yml",
                "prompts:\n  - key: license\n    default: MIT\nfiles: template\nrender: [info.txt]\n",
            ),
            ("template/info.txt", "${where} ${license}\n"),
        ],
    );
    let vcs = FakeVcs::default();
    let mut ui = MockUI::new();

    let outcome = ws
        .starter(&vcs, &npm)
        .create("./app", "my-template@2.0.0", None, &mut ui)
        .unwrap();

    let installs = npm.installs();
    assert_eq!(installs.len(), 1);
    assert_eq!(installs[0].0, "my-template@2.0.0");
    assert_eq!(installs[0].1.prefix, ws.cache());
    assert!(installs[0].1.no_save);
    assert!(vcs.clones().is_empty());

    assert_eq!(outcome.target, ws.cwd().join("app"));
    assert!(outcome.configured);
    assert_eq!(
        fs::read_to_string(outcome.target.join("info.txt")).unwrap(),
        "./app MIT\n"
    );
    assert!(ui.has_message("Installing package."));
}

#[test]
fn explicit_cache_dir_overrides_settings() {
    let ws = Workspace::new();
    let other = ws.cwd().join("other-cache");
    let npm = FakeNpm::with_package("tpl", vec![("index.yml", "run: []\n")]);
    let vcs = FakeVcs::default();
    let mut ui = MockUI::new();

    ws.starter(&vcs, &npm)
        .create("app", "tpl", Some(&other), &mut ui)
        .unwrap();

    assert_eq!(npm.installs()[0].1.prefix, other);
    assert!(other.join("node_modules/tpl/index.yml").is_file());
    assert!(!ws.cache().exists());
}

#[test]
fn legacy_config_redispatches_to_github() {
    let ws = Workspace::new();
    let npm = FakeNpm::with_package(
        "old-template",
        vec![("index.json", r#"{"repository": "org/legacy-template"}"#)],
    );
    let vcs = FakeVcs::with_repo(
        "git@github.com:org/legacy-template",
        vec![("README.md", "legacy\n")],
    );
    let mut ui = MockUI::new();

    let outcome = ws
        .starter(&vcs, &npm)
        .create("app", "old-template", None, &mut ui)
        .unwrap();

    assert_eq!(outcome.redirects, 1);
    assert_eq!(
        outcome.templates,
        vec![
            "old-template".to_string(),
            "git@github.com:org/legacy-template".to_string()
        ]
    );
    assert_eq!(
        vcs.clones(),
        vec![(
            "git@github.com:org/legacy-template".to_string(),
            ws.cwd().join("app")
        )]
    );
    assert!(ui.has_warning("This package is using a legacy format."));
    assert_eq!(cd_hints(&ui), 1);
    assert!(ws.cwd().join("app/README.md").is_file());
}

#[test]
fn redirected_pass_sees_resolved_target_as_where() {
    let ws = Workspace::new();
    let npm = FakeNpm::with_package(
        "old-template",
        vec![("index.json", r#"{"repository": "org/legacy-template"}"#)],
    );
    let vcs = FakeVcs::with_repo(
        "git@github.com:org/legacy-template",
        vec![
            ("where.txt", "${where}\n"),
            (".starter/index.yml", "render: [where.txt]\nremove: [.starter]\n"),
        ],
    );
    let mut ui = MockUI::new();

    let outcome = ws
        .starter(&vcs, &npm)
        .create("./app", "old-template", None, &mut ui)
        .unwrap();

    assert!(outcome.configured);
    assert_eq!(outcome.redirects, 1);
    assert_eq!(
        fs::read_to_string(ws.cwd().join("app/where.txt")).unwrap(),
        format!("{}\n", ws.cwd().join("app").display())
    );
    assert!(ui.has_message("  $ cd app"));
}

#[test]
fn second_legacy_hop_exceeds_limit_of_one() {
    let ws = Workspace::new();
    let npm = FakeNpm::with_package(
        "old-template",
        vec![("index.json", r#"{"repository": "org/middle"}"#)],
    );
    let vcs = FakeVcs::with_repo(
        "git@github.com:org/middle",
        vec![(".starter/index.json", r#"{"repository": "org/final"}"#)],
    );
    let settings = Settings {
        max_legacy_redirects: 1,
        ..ws.settings()
    };
    let mut ui = MockUI::new();

    let err = Starter::new(&settings, ws.cwd())
        .with_vcs(vcs.clone())
        .with_package_manager(npm)
        .create("app", "old-template", None, &mut ui)
        .unwrap_err();

    assert!(matches!(err, StarterError::LegacyRedirectLimit { limit: 1 }));
    assert_eq!(
        vcs.clones(),
        vec![("git@github.com:org/middle".to_string(), ws.cwd().join("app"))]
    );
    assert_eq!(cd_hints(&ui), 0);
}

#[test]
fn legacy_redirects_are_bounded() {
    let ws = Workspace::new();
    let npm = FakeNpm::with_package(
        "old-template",
        vec![("index.json", r#"{"repository": "org/legacy-template"}"#)],
    );
    let vcs = FakeVcs::default();
    let settings = Settings {
        max_legacy_redirects: 0,
        ..ws.settings()
    };
    let mut ui = MockUI::new();

    let err = Starter::new(&settings, ws.cwd())
        .with_vcs(vcs.clone())
        .with_package_manager(npm)
        .create("app", "old-template", None, &mut ui)
        .unwrap_err();

    assert!(matches!(err, StarterError::LegacyRedirectLimit { limit: 0 }));
    assert!(vcs.clones().is_empty());
}

#[test]
fn non_empty_target_fails_before_acquisition() {
    let ws = Workspace::new();
    let target = ws.cwd().join("app");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("notes.txt"), "keep me").unwrap();
    let vcs = FakeVcs::with_repo("https://github.com/org/repo.git", vec![]);
    let npm = FakeNpm::default();
    let mut ui = MockUI::new();

    let err = ws
        .starter(&vcs, &npm)
        .create("app", "https://github.com/org/repo.git", None, &mut ui)
        .unwrap_err();

    assert!(matches!(err, StarterError::DirectoryNotEmpty { ref path } if *path == target));
    assert!(ui.has_error(&format!("Directory is not empty: {}", target.display())));
    assert!(vcs.clones().is_empty());
    assert!(npm.installs().is_empty());
    assert_eq!(fs::read_to_string(target.join("notes.txt")).unwrap(), "keep me");
}

#[test]
fn empty_target_behaves_like_missing() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.cwd().join("app")).unwrap();
    let template = "https://github.com/org/repo.git";
    let vcs = FakeVcs::with_repo(template, vec![("README.md", "hi")]);
    let npm = FakeNpm::default();
    let mut ui = MockUI::new();

    let outcome = ws
        .starter(&vcs, &npm)
        .create("app", template, None, &mut ui)
        .unwrap();

    assert!(outcome.target.join("README.md").is_file());
    assert_eq!(vcs.clones().len(), 1);
}

#[test]
fn string_config_is_invalid_shape() {
    let ws = Workspace::new();
    let npm = FakeNpm::with_package("bad-template", vec![("index.yml", "\"hello\"\n")]);
    let vcs = FakeVcs::default();
    let mut ui = MockUI::new();

    let err = ws
        .starter(&vcs, &npm)
        .create("app", "bad-template", None, &mut ui)
        .unwrap_err();

    assert!(matches!(err, StarterError::InvalidConfigShape { ref kind } if kind == "string"));
    assert_eq!(err.to_string(), "Expected a setup routine but got \"string\"");
    assert_eq!(cd_hints(&ui), 0);
}

#[test]
fn clone_failure_is_reported() {
    let ws = Workspace::new();
    let vcs = FakeVcs::default();
    let npm = FakeNpm::default();
    let mut ui = MockUI::new();

    let err = ws
        .starter(&vcs, &npm)
        .create("app", "git@github.com:org/missing.git", None, &mut ui)
        .unwrap_err();

    assert!(matches!(err, StarterError::CloneFailed { .. }));
    assert!(ui.has_error("Error cloning repository."));
}

#[test]
fn package_without_config_fails_to_load() {
    let ws = Workspace::new();
    let npm = FakeNpm::with_package("empty-template", vec![("README.md", "nothing")]);
    let vcs = FakeVcs::default();
    let mut ui = MockUI::new();

    let err = ws
        .starter(&vcs, &npm)
        .create("app", "empty-template", None, &mut ui)
        .unwrap_err();

    assert!(matches!(err, StarterError::ConfigLoadFailed { .. }));
    assert!(ui.has_error("Could not import configuration from"));
}

/// Delegates reads to the local disk and refuses every mutation.
struct ReadOnlyFs;

fn refused() -> StarterError {
    std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into()
}

impl Filesystem for ReadOnlyFs {
    fn exists(&self, path: &Path) -> bool {
        LocalFilesystem.exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        LocalFilesystem.is_dir(path)
    }

    fn is_empty_dir(&self, path: &Path) -> Result<bool> {
        LocalFilesystem.is_empty_dir(path)
    }

    fn remove_dir(&self, _path: &Path) -> Result<()> {
        Err(refused())
    }

    fn remove_all(&self, _path: &Path) -> Result<()> {
        Err(refused())
    }

    fn create_dir_all(&self, _path: &Path) -> Result<()> {
        Err(refused())
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        LocalFilesystem.read(path)
    }

    fn write(&self, _path: &Path, _contents: &[u8]) -> Result<()> {
        Err(refused())
    }

    fn copy_dir(&self, _from: &Path, _to: &Path) -> Result<()> {
        Err(refused())
    }
}

#[test]
fn cache_creation_goes_through_the_filesystem() {
    let ws = Workspace::new();
    let npm = FakeNpm::with_package("tpl", vec![("index.yml", "run: []\n")]);
    let vcs = FakeVcs::default();
    let mut ui = MockUI::new();

    let err = ws
        .starter(&vcs, &npm)
        .with_filesystem(ReadOnlyFs)
        .create("app", "tpl", None, &mut ui)
        .unwrap_err();

    assert!(
        matches!(err, StarterError::Io(ref e) if e.kind() == std::io::ErrorKind::PermissionDenied)
    );
    assert!(npm.installs().is_empty());
    assert!(!ws.cache().exists());
}

#[test]
fn routine_writes_go_through_the_filesystem() {
    let ws = Workspace::new();
    let template = "git@github.com:org/repo.git";
    let vcs = FakeVcs::with_repo(
        template,
        vec![
            ("README.md", "# ${project_name}\n"),
            (".starter/index.yml", "render: [README.md]\n"),
        ],
    );
    let npm = FakeNpm::default();
    let mut ui = MockUI::new();

    let err = ws
        .starter(&vcs, &npm)
        .with_filesystem(ReadOnlyFs)
        .create("shop", template, None, &mut ui)
        .unwrap_err();

    assert!(matches!(err, StarterError::ConfigExecutionFailed { .. }));
    assert_eq!(
        fs::read_to_string(ws.cwd().join("shop/README.md")).unwrap(),
        "# ${project_name}\n"
    );
}

/// Answers every load with a fixed document and records the paths asked for.
#[derive(Clone, Default)]
struct FixedLoader {
    loads: Rc<RefCell<Vec<PathBuf>>>,
}

impl ModuleLoader for FixedLoader {
    fn load(&self, path: &Path) -> Result<LoadedModule> {
        self.loads.borrow_mut().push(path.to_path_buf());
        Ok(LoadedModule {
            root: path.to_path_buf(),
            path: path.join("index.yml"),
            value: ModuleValue::Data(serde_yaml::from_str("run: []").unwrap()),
        })
    }
}

#[test]
fn custom_loader_resolves_package_entry_points() {
    let ws = Workspace::new();
    let npm = FakeNpm::with_package("plain-template", vec![("README.md", "nothing")]);
    let vcs = FakeVcs::default();
    let loader = FixedLoader::default();
    let mut ui = MockUI::new();

    let outcome = ws
        .starter(&vcs, &npm)
        .with_loader(loader.clone())
        .create("app", "plain-template", None, &mut ui)
        .unwrap();

    assert!(outcome.configured);
    assert_eq!(
        *loader.loads.borrow(),
        vec![ws.cache().join("node_modules/plain-template")]
    );
    assert!(ui.has_message("Running configuration script."));
}
