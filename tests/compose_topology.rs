//! Checks the deployment topology declared in `docker-compose.yml`.

use serde_yaml::Value;

fn compose() -> Value {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/docker-compose.yml");
    let text = std::fs::read_to_string(path).unwrap();
    serde_yaml::from_str(&text).unwrap()
}

fn service<'a>(doc: &'a Value, name: &str) -> &'a Value {
    &doc["services"][name]
}

fn strings(v: &Value) -> Vec<&str> {
    v.as_sequence()
        .map(|seq| seq.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

#[test]
fn test_declares_exactly_three_services() {
    let doc = compose();
    let mut names: Vec<&str> = doc["services"]
        .as_mapping()
        .unwrap()
        .keys()
        .filter_map(Value::as_str)
        .collect();
    names.sort();
    assert_eq!(names, vec!["backend", "db", "redis"]);
}

#[test]
fn test_backend() {
    let doc = compose();
    let backend = service(&doc, "backend");

    assert_eq!(backend["build"].as_str(), Some("."));
    assert_eq!(strings(&backend["ports"]), vec!["8000:8000"]);
    assert_eq!(strings(&backend["env_file"]), vec![".env"]);
    assert_eq!(backend["restart"].as_str(), Some("always"));
    assert_eq!(strings(&backend["depends_on"]), vec!["db"]);
}

#[test]
fn test_db_publishes_no_ports_and_persists_data() {
    let doc = compose();
    let db = service(&doc, "db");

    assert_eq!(db["image"].as_str(), Some("postgres:16.4"));
    assert!(db.get("ports").is_none());
    assert_eq!(strings(&db["env_file"]), vec![".env"]);
    assert_eq!(db["restart"].as_str(), Some("always"));
    assert_eq!(
        strings(&db["volumes"]),
        vec!["postgres_data:/var/lib/postgresql/data"]
    );
    assert!(db.get("depends_on").is_none());
}

#[test]
fn test_redis() {
    let doc = compose();
    let redis = service(&doc, "redis");

    assert_eq!(redis["image"].as_str(), Some("redis:alpine"));
    assert_eq!(strings(&redis["ports"]), vec!["6379:6379"]);
    assert_eq!(redis["container_name"].as_str(), Some("redis"));
    assert!(redis.get("restart").is_none());
    assert!(redis.get("volumes").is_none());
    assert!(redis.get("env_file").is_none());
}

#[test]
fn test_named_volume() {
    let doc = compose();
    let volumes = doc["volumes"].as_mapping().unwrap();

    assert_eq!(volumes.len(), 1);
    assert!(volumes.contains_key("postgres_data"));
}

#[test]
fn test_env_example_matches_compose_hosts() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/.env.example");
    let text = std::fs::read_to_string(path).unwrap();

    assert!(text.lines().any(|l| l == "DB_HOST=db"));
    assert!(text.lines().any(|l| l == "REDIS_HOST=redis"));
    assert!(text.lines().any(|l| l == "LISTEN=0.0.0.0:8000"));
}
