use std::fs;
use std::path::Path;
use toaster::ToasterError;
use toaster::patch::{
    PatchOutcome, SkipReason, add_line, append_to_file, backup_path, delete_file, delete_line,
    file_contains, replace_list, replace_regex, replace_simple,
};

const LOCATOR: &str = r"tests_require\s*=\s*(\[(?:[^\[\]]|\[[^\[\]]*\])*\])";

fn missing_file_outcomes(path: &Path) -> Vec<PatchOutcome> {
    vec![
        delete_line("isort", path).expect("delete_line"),
        append_to_file("testpaths = tests\n", path).expect("append_to_file"),
        add_line("recursive-include .github/workflows *.yml", path).expect("add_line"),
        replace_simple(".travis.yml", ".github/workflows/*.yml", path).expect("replace_simple"),
        replace_regex("(addopts =).*", "${1} --isort", path).expect("replace_regex"),
        replace_list(path, LOCATOR, &["pytest"], &["pytest-invenio>=1.4.0"], "tests_require")
            .expect("replace_list"),
    ]
}

#[test]
fn every_primitive_is_a_no_op_on_missing_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing.txt");

    for outcome in missing_file_outcomes(&path) {
        assert_eq!(outcome, PatchOutcome::Skipped(SkipReason::FileNotFound));
    }
    assert_eq!(file_contains("x", &path).expect("file_contains"), None);
    assert_eq!(
        delete_file(&format!("{}/*.bak", dir.path().display())).expect("delete_file"),
        0
    );
    assert!(!path.exists());
    assert!(!backup_path(&path).exists());
}

#[test]
fn add_line_twice_keeps_a_single_occurrence() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("MANIFEST.in");
    fs::write(&path, "include README.rst\n").unwrap();
    let term = "recursive-include .github/workflows *.yml";

    assert!(add_line(term, &path).expect("first add").is_applied());
    assert_eq!(
        add_line(term, &path).expect("second add"),
        PatchOutcome::Skipped(SkipReason::AlreadyPresent)
    );

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.matches(term).count(), 1);
}

#[test]
fn append_after_unterminated_last_line_starts_a_new_line() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ini = dir.path().join("pytest.ini");
    fs::write(&ini, "[pytest]\naddopts = --pep8").unwrap();
    append_to_file("testpaths = tests invenio_i18n\n", &ini).expect("append");
    assert_eq!(
        fs::read_to_string(&ini).unwrap(),
        "[pytest]\naddopts = --pep8\ntestpaths = tests invenio_i18n\n"
    );

    let empty = dir.path().join("MANIFEST.in");
    fs::write(&empty, "").unwrap();
    add_line("include *.rst", &empty).expect("add_line");
    assert_eq!(fs::read_to_string(&empty).unwrap(), "include *.rst");
}

#[test]
fn replace_simple_round_trip_restores_content() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(".editorconfig");
    let original = "[*.{py,rst,ini}]\nindent_size = 4\n\n[.travis.yml]\nindent_size = 2\n";
    fs::write(&path, original).unwrap();

    replace_simple(".travis.yml", ".github/workflows/*.yml", &path).expect("forward");
    assert!(
        fs::read_to_string(&path)
            .unwrap()
            .contains("[.github/workflows/*.yml]")
    );
    replace_simple(".github/workflows/*.yml", ".travis.yml", &path).expect("backward");

    assert_eq!(fs::read_to_string(&path).unwrap(), original);
    assert!(backup_path(&path).exists());
}

#[test]
fn replace_regex_leaves_a_backup_of_the_previous_content() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("pytest.ini");
    let original = "[pytest]\naddopts = --pep8 --ignore=docs\n";
    fs::write(&path, original).unwrap();

    let outcome = replace_regex("(addopts =).*", "${1} --isort", &path).expect("replace");

    assert_eq!(outcome, PatchOutcome::Applied { changes: 1 });
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "[pytest]\naddopts = --isort\n"
    );
    assert_eq!(fs::read_to_string(backup_path(&path)).unwrap(), original);
}

#[test]
fn delete_line_drops_matching_lines_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("run-tests.sh");
    fs::write(
        &path,
        "pydocstyle invenio_i18n\nisort invenio_i18n -rc -c -df\ncheck-manifest\n",
    )
    .unwrap();

    let outcome = delete_line("isort", &path).expect("delete");

    assert_eq!(outcome, PatchOutcome::Applied { changes: 1 });
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "pydocstyle invenio_i18n\ncheck-manifest\n"
    );
}

#[test]
fn delete_file_removes_glob_matches() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("README.rst.bak"), "x").unwrap();
    fs::write(dir.path().join("pytest.ini.bak"), "x").unwrap();
    fs::write(dir.path().join("pytest.ini"), "x").unwrap();

    let removed = delete_file(&format!("{}/*.bak", dir.path().display())).expect("delete");

    assert_eq!(removed, 2);
    assert!(dir.path().join("pytest.ini").exists());
    assert!(!dir.path().join("README.rst.bak").exists());
}

#[test]
fn replace_list_rewrites_tests_require_in_setup_py() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("setup.py");
    fs::write(
        &path,
        "tests_require = [\n    'pytest-cov>=2.0',\n    'flask',\n    'selenium',\n]\n\nsetup(tests_require=tests_require)\n",
    )
    .unwrap();

    let outcome = replace_list(
        &path,
        LOCATOR,
        &["pytest-cov", "selenium"],
        &["pytest-invenio>=1.4.0"],
        "tests_require",
    )
    .expect("rewrite");

    assert_eq!(outcome, PatchOutcome::Applied { changes: 3 });
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "tests_require = [\n    \"flask\",\n    \"pytest-invenio>=1.4.0\"\n]\n\nsetup(tests_require=tests_require)\n"
    );
}

#[test]
fn replace_list_without_assignment_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("setup.py");
    fs::write(&path, "setup(name='invenio-i18n')\n").unwrap();

    let err = replace_list(&path, LOCATOR, &["pytest"], &["pytest-invenio"], "tests_require")
        .unwrap_err();

    assert!(matches!(err, ToasterError::ListNotFound { .. }), "got {err:?}");
}
