#![allow(dead_code)]

use std::process::{Command, Output};

use mongodb::bson::Document;
use mongodb::sync::{Client, Database};
use testcontainers::core::{ContainerPort, WaitFor};
use testcontainers::{Container, ContainerRequest, GenericImage, ImageExt};

pub const DB_NAME: &str = "swa_database";

pub const COLLECTIONS: [&str; 7] = [
    "users",
    "promo_codes",
    "games",
    "sessions",
    "stats",
    "devices",
    "slots",
];

/// mongod with the TTL monitor running every second instead of every minute.
pub fn mongo_image() -> ContainerRequest<GenericImage> {
    GenericImage::new("mongo", "7.0")
        .with_wait_for(WaitFor::message_on_stdout("Waiting for connections"))
        .with_exposed_port(ContainerPort::Tcp(27017))
        .with_cmd(vec![
            "mongod".to_string(),
            "--bind_ip_all".to_string(),
            "--setParameter".to_string(),
            "ttlMonitorSleepSecs=1".to_string(),
        ])
}

pub const ROOT_USER: &str = "root";
pub const ROOT_PASSWORD: &str = "root-secret";

/// mongod with authentication enforced and a root user created at startup.
pub fn mongo_auth_image() -> ContainerRequest<GenericImage> {
    GenericImage::new("mongo", "7.0")
        .with_wait_for(WaitFor::message_on_stdout(
            "MongoDB init process complete",
        ))
        .with_exposed_port(ContainerPort::Tcp(27017))
        .with_env_var("MONGO_INITDB_ROOT_USERNAME", ROOT_USER)
        .with_env_var("MONGO_INITDB_ROOT_PASSWORD", ROOT_PASSWORD)
}

pub fn auth_uri(container: &Container<GenericImage>, user: &str, password: &str) -> String {
    let host_port = container
        .get_host_port_ipv4(27017)
        .expect("mapped port for 27017");

    format!(
        "mongodb://{}:{}@127.0.0.1:{}/{}?authSource=admin",
        user, password, host_port, DB_NAME
    )
}

pub fn mongo_uri(container: &Container<GenericImage>) -> String {
    let host_port = container
        .get_host_port_ipv4(27017)
        .expect("mapped port for 27017");

    format!("mongodb://127.0.0.1:{}/{}", host_port, DB_NAME)
}

pub fn database(uri: &str) -> Database {
    Client::with_uri_str(uri)
        .expect("mongo client")
        .database(DB_NAME)
}

pub fn base_cmd(uri: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_swa-db-init"));
    cmd.env("DOTENV_PATH", "/nonexistent/swa-db-init.env")
        .env_remove("SWA_DATABASE")
        .env_remove("SWA_ADMIN_PASSWORD")
        .env_remove("SWA_LOG_FILE")
        .arg("--mongodb-uri")
        .arg(uri);
    cmd
}

pub fn run_init(uri: &str) -> Output {
    base_cmd(uri).arg("init").output().expect("run init")
}

pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "stdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Index definitions per collection, normalized for comparison between runs.
pub fn index_snapshot(db: &Database) -> Vec<(String, Vec<String>)> {
    let mut out = Vec::new();
    for name in COLLECTIONS {
        let mut indexes: Vec<String> = db
            .collection::<Document>(name)
            .list_indexes()
            .run()
            .expect("list indexes")
            .map(|model| {
                let model = model.expect("index model");
                let options = model.options.unwrap_or_default();
                format!(
                    "{} {} unique={} ttl={:?}",
                    options.name.unwrap_or_default(),
                    model.keys,
                    options.unique.unwrap_or(false),
                    options.expire_after.map(|d| d.as_secs())
                )
            })
            .collect();
        indexes.sort();
        out.push((name.to_string(), indexes));
    }
    out
}
