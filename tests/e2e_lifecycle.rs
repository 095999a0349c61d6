//! End-to-end CLI lifecycle against a `SQLite` database in a temp workspace.

mod common;

use common::cli::{ItrWorkspace, run_itr};
use common::test_log;
use serde_json::json;

fn create_fix_auth(workspace: &ItrWorkspace) -> String {
    let run = run_itr(
        workspace,
        [
            "create",
            "apitest",
            "--title",
            "Fix auth",
            "--text",
            "User auth is not working.",
            "--created-by",
            "Mike",
            "--assigned-to",
            "Joe",
            "--status-text",
            "Not yet started",
        ],
        "create",
    );
    assert!(run.status.success(), "create failed: {}", run.stderr);
    let issue = run.json();
    issue["_id"].as_str().expect("created issue has _id").to_string()
}

#[test]
fn e2e_create_update_list_delete() {
    let _log = test_log("e2e_create_update_list_delete");
    let workspace = ItrWorkspace::new();

    let created = run_itr(
        &workspace,
        [
            "create",
            "apitest",
            "--title",
            "Fix auth",
            "--text",
            "User auth is not working.",
            "--created-by",
            "Mike",
            "--assigned-to",
            "Joe",
            "--status-text",
            "Not yet started",
        ],
        "create",
    );
    assert!(created.status.success(), "create failed: {}", created.stderr);
    let issue = created.json();
    let id = issue["_id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);
    assert_eq!(issue["issue_title"], "Fix auth");
    assert_eq!(issue["issue_text"], "User auth is not working.");
    assert_eq!(issue["created_by"], "Mike");
    assert_eq!(issue["assigned_to"], "Joe");
    assert_eq!(issue["status_text"], "Not yet started");
    assert_eq!(issue["open"], true);
    assert_eq!(issue["created_on"], issue["updated_on"]);
    assert!(workspace.db_path().exists());

    let updated = run_itr(
        &workspace,
        [
            "update",
            "apitest",
            "--id",
            &id,
            "--status-text",
            "N/A",
            "--open",
            "false",
        ],
        "update",
    );
    assert!(updated.status.success(), "update failed: {}", updated.stderr);
    assert_eq!(
        updated.json(),
        json!({"result": "successfully updated", "_id": id})
    );

    let listed = run_itr(&workspace, ["list", "apitest"], "list");
    assert!(listed.status.success());
    let issues = listed.json();
    let issues = issues.as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["status_text"], "N/A");
    assert_eq!(issues[0]["open"], false);
    assert_eq!(issues[0]["issue_title"], "Fix auth");
    assert_eq!(issues[0]["assigned_to"], "Joe");
    assert_eq!(issues[0]["created_on"], issue["created_on"]);

    let deleted = run_itr(&workspace, ["delete", "apitest", "--id", &id], "delete");
    assert!(deleted.status.success());
    assert_eq!(
        deleted.json(),
        json!({"result": "successfully deleted", "_id": id})
    );

    let again = run_itr(&workspace, ["delete", "apitest", "--id", &id], "delete_again");
    assert!(again.status.success(), "domain errors exit 0");
    assert_eq!(again.json(), json!({"error": "could not delete", "_id": id}));
}

#[test]
fn e2e_list_filters() {
    let _log = test_log("e2e_list_filters");
    let workspace = ItrWorkspace::new();
    let fix_auth = create_fix_auth(&workspace);

    let other = run_itr(
        &workspace,
        [
            "create",
            "apitest",
            "--body",
            r#"{"issue_title":"Slow page","issue_text":"Takes 10s","created_by":"Ann"}"#,
        ],
        "create_body",
    );
    assert!(other.status.success(), "{}", other.stderr);
    assert_eq!(other.json()["assigned_to"], "");

    let by_mike = run_itr(&workspace, ["list", "apitest", "created_by=Mike"], "by_mike");
    let by_mike = by_mike.json();
    assert_eq!(by_mike.as_array().unwrap().len(), 1);
    assert_eq!(by_mike[0]["_id"], fix_auth.as_str());

    let both = run_itr(
        &workspace,
        ["list", "apitest", "--filter", "open=true", "--filter", "created_by=Ann"],
        "by_ann_open",
    );
    let both = both.json();
    assert_eq!(both.as_array().unwrap().len(), 1);
    assert_eq!(both[0]["issue_title"], "Slow page");

    let unknown = run_itr(&workspace, ["list", "apitest", "severity=high"], "unknown");
    assert_eq!(unknown.json(), json!([]));

    let missing = run_itr(&workspace, ["list", "nowhere"], "missing_project");
    assert!(missing.status.success());
    assert_eq!(missing.json(), json!([]));
}

#[test]
fn e2e_projects_lists_sorted_names() {
    let _log = test_log("e2e_projects_lists_sorted_names");
    let workspace = ItrWorkspace::new();

    let empty = run_itr(&workspace, ["projects"], "projects_empty");
    assert_eq!(empty.json(), json!([]));

    for project in ["zeta", "alpha"] {
        let run = run_itr(
            &workspace,
            [
                "create",
                project,
                "--title",
                "t",
                "--text",
                "x",
                "--created-by",
                "me",
            ],
            &format!("create_{project}"),
        );
        assert!(run.status.success());
    }
    // A failed create still registers its project.
    let failed = run_itr(&workspace, ["create", "mid", "--title", "t"], "create_mid");
    assert_eq!(failed.json(), json!({"error": "required field(s) missing"}));

    let projects = run_itr(&workspace, ["projects"], "projects");
    assert_eq!(projects.json(), json!(["alpha", "mid", "zeta"]));
}

#[test]
fn e2e_pretty_output() {
    let _log = test_log("e2e_pretty_output");
    let workspace = ItrWorkspace::new();
    let id = create_fix_auth(&workspace);

    let run = run_itr(
        &workspace,
        ["--pretty", "delete", "apitest", "--id", &id],
        "pretty_delete",
    );
    assert!(run.stdout.contains("\n  \"result\": \"successfully deleted\""));
    assert_eq!(run.json()["_id"], id.as_str());
}

#[test]
fn e2e_parallel_processes_keep_every_create() {
    let _log = test_log("e2e_parallel_processes_keep_every_create");
    let workspace = ItrWorkspace::new();
    // Creates the database before the processes race on it.
    let seed = create_fix_auth(&workspace);

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let workspace = &workspace;
            scope.spawn(move || {
                for n in 0..5 {
                    let title = format!("worker {worker} issue {n}");
                    let run = run_itr(
                        workspace,
                        [
                            "create",
                            "apitest",
                            "--title",
                            title.as_str(),
                            "--text",
                            "parallel",
                            "--created-by",
                            "Ann",
                        ],
                        &format!("create_{worker}_{n}"),
                    );
                    assert!(run.status.success(), "{}", run.stderr);
                }
            });
        }
        scope.spawn(|| {
            let run = run_itr(
                &workspace,
                ["update", "apitest", "--id", &seed, "--open", "false"],
                "update_seed",
            );
            assert!(run.status.success(), "{}", run.stderr);
        });
    });

    let listed = run_itr(&workspace, ["list", "apitest"], "list");
    let issues = listed.json();
    let issues = issues.as_array().unwrap();
    assert_eq!(issues.len(), 21);
    assert_eq!(issues[0]["_id"], seed.as_str());
    assert_eq!(issues[0]["open"], false);
}
