use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::IndexModel;
use testcontainers::runners::SyncRunner;

mod common;

#[test]
fn e2e_conflicting_index_aborts_with_definition() {
    let container = common::mongo_image().start().expect("start mongo container");
    let uri = common::mongo_uri(&container);

    let db = common::database(&uri);
    db.create_collection("users").run().expect("create users");
    db.collection::<Document>("users")
        .create_index(
            IndexModel::builder()
                .keys(doc! { "username": 1 })
                .options(IndexOptions::builder().name("username_1".to_string()).build())
                .build(),
        )
        .run()
        .expect("pre-existing non-unique index");

    let output = common::run_init(&uri);
    assert!(!output.status.success());
    let stderr = common::stderr(&output);
    assert!(stderr.contains("index conflict on collection 'users'"), "{stderr}");
    assert!(stderr.contains("found existing username_1"), "{stderr}");
    assert!(!stderr.contains("initialized successfully"), "{stderr}");
}

#[test]
fn e2e_unreachable_server_fails_fast() {
    let output = common::base_cmd("mongodb://127.0.0.1:1/swa_database")
        .arg("--server-selection-timeout-ms")
        .arg("500")
        .arg("init")
        .output()
        .expect("run init against closed port");
    assert!(!output.status.success());
    let stderr = common::stderr(&output);
    assert!(stderr.contains("connection error"), "{stderr}");
}

#[test]
fn e2e_read_only_user_gets_permission_error() {
    let container = common::mongo_auth_image()
        .start()
        .expect("start mongo container with auth");

    let root = mongodb::sync::Client::with_uri_str(common::auth_uri(
        &container,
        common::ROOT_USER,
        common::ROOT_PASSWORD,
    ))
    .expect("root client");
    root.database("admin")
        .run_command(doc! {
            "createUser": "reader",
            "pwd": "reader-secret",
            "roles": [{ "role": "read", "db": common::DB_NAME }],
        })
        .run()
        .expect("create read-only user");

    let output = common::base_cmd(&common::auth_uri(&container, "reader", "reader-secret"))
        .arg("--server-selection-timeout-ms")
        .arg("15000")
        .arg("init")
        .output()
        .expect("run init as read-only user");
    assert!(!output.status.success());
    let stderr = common::stderr(&output);
    assert!(stderr.contains("permission denied during create collection"), "{stderr}");
    assert!(!stderr.contains("initialized successfully"), "{stderr}");

    let names = root
        .database(common::DB_NAME)
        .list_collection_names()
        .run()
        .expect("list collections as root");
    assert!(names.is_empty());
}

#[test]
fn e2e_status_reports_before_and_after_init() {
    let container = common::mongo_image().start().expect("start mongo container");
    let uri = common::mongo_uri(&container);

    let before = common::base_cmd(&uri)
        .arg("status")
        .output()
        .expect("status before init");
    assert!(!before.status.success());
    assert!(String::from_utf8_lossy(&before.stdout).contains("MISSING"));

    common::assert_success(&common::run_init(&uri));

    let after = common::base_cmd(&uri)
        .arg("status")
        .arg("--json")
        .output()
        .expect("status after init");
    common::assert_success(&after);
    let status: serde_json::Value = serde_json::from_slice(&after.stdout).expect("json status");
    let collections = status["collections"].as_array().expect("collections");
    assert_eq!(collections.len(), 7);
    for c in collections {
        assert_eq!(c["exists"], true);
        for i in c["indexes"].as_array().expect("indexes") {
            assert_eq!(i["state"], "present");
        }
    }
}
