use crate::PrViewWorld;
use cucumber::{given, then, when};
use serde_json::{Value, json};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UNREACHABLE_API: &str = "http://127.0.0.1:9";

fn config_dir(world: &mut PrViewWorld) -> PathBuf {
    world
        .config_dir
        .get_or_insert_with(|| TempDir::new().expect("Failed to create config dir for test"))
        .path()
        .to_path_buf()
}

fn repo_file(world: &mut PrViewWorld) -> PathBuf {
    config_dir(world).join("repos.json")
}

async fn mock_server(world: &mut PrViewWorld) -> &MockServer {
    if world.mock_server.is_none() {
        world.mock_server = Some(MockServer::start().await);
    }
    world.mock_server.as_ref().expect("mock server just started")
}

fn pull_json(repo: &str, number: u64, title: &str) -> Value {
    json!({
        "number": number,
        "title": title,
        "html_url": format!("https://github.com/{repo}/pull/{number}"),
        "user": { "login": "octocat" },
        "created_at": "2024-01-15T10:30:00Z"
    })
}

fn stdout(world: &PrViewWorld) -> String {
    String::from_utf8(world.captured_output.clone()).expect("Invalid UTF-8")
}

fn stderr(world: &PrViewWorld) -> String {
    String::from_utf8(world.captured_error.clone()).expect("Invalid UTF-8")
}

#[given("no repositories are tracked")]
async fn given_no_repositories(world: &mut PrViewWorld) {
    let path = repo_file(world);
    let _ = std::fs::remove_file(path);
}

#[given(regex = r#"^the repository list is '(.*)'$"#)]
async fn given_repository_list(world: &mut PrViewWorld, content: String) {
    let path = repo_file(world);
    std::fs::write(&path, content)
        .unwrap_or_else(|e| panic!("Failed to write repository list {:?}: {}", path, e));
}

#[given(regex = r#"^the API lists (\d+) open pull requests for "([^"]*)"$"#)]
async fn given_open_pulls(world: &mut PrViewWorld, count: u64, repo: String) {
    let pulls: Vec<Value> = (1..=count)
        .map(|n| pull_json(&repo, n, &format!("Change number {n}")))
        .collect();
    Mock::given(method("GET"))
        .and(path(format!("/repos/{repo}/pulls")))
        .and(query_param("state", "open"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pulls))
        .mount(mock_server(world).await)
        .await;
}

#[given(regex = r#"^the API returns pull request #(\d+) of "([^"]*)" titled "([^"]*)"$"#)]
async fn given_single_pull(world: &mut PrViewWorld, number: u64, repo: String, title: String) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{repo}/pulls/{number}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(pull_json(&repo, number, &title)))
        .mount(mock_server(world).await)
        .await;
}

#[given(regex = r#"^the API returns status (\d+) for "([^"]*)"$"#)]
async fn given_api_status(world: &mut PrViewWorld, status: u16, repo: String) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{repo}/pulls")))
        .respond_with(ResponseTemplate::new(status).set_body_string("Not Found"))
        .mount(mock_server(world).await)
        .await;
}

#[when(regex = r#"^I run `pr-view(.*)`$"#)]
async fn when_run_pr_view(world: &mut PrViewWorld, rest: String) {
    let dir = config_dir(world);
    let api_url = world
        .mock_server
        .as_ref()
        .map(|s| s.uri())
        .unwrap_or_else(|| UNREACHABLE_API.to_string());

    let binary = env!("CARGO_BIN_EXE_pr-view");
    let output = std::process::Command::new(binary)
        .args(rest.split_whitespace())
        .env("PR_VIEW_CONFIG_DIR", &dir)
        .env("GITHUB_API_URL", api_url)
        .env_remove("GITHUB_TOKEN")
        .env_remove("PR_VIEW_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute pr-view at {:?}: {}", binary, e));

    world.captured_output = output.stdout;
    world.captured_error = output.stderr;
    world.command_status = Some(output.status);
}

#[when(regex = r#"^I run `pr-view(.*)` without a config directory$"#)]
async fn when_run_pr_view_without_config(world: &mut PrViewWorld, rest: String) {
    let binary = env!("CARGO_BIN_EXE_pr-view");
    let output = std::process::Command::new(binary)
        .args(rest.split_whitespace())
        .env_remove("PR_VIEW_CONFIG_DIR")
        .env_remove("HOME")
        .env("GITHUB_API_URL", UNREACHABLE_API)
        .env_remove("GITHUB_TOKEN")
        .env_remove("PR_VIEW_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute pr-view at {:?}: {}", binary, e));

    world.captured_output = output.stdout;
    world.captured_error = output.stderr;
    world.command_status = Some(output.status);
}

#[then("the command should succeed")]
async fn then_command_should_succeed(world: &mut PrViewWorld) {
    assert!(
        world.command_status.is_some_and(|s| s.success()),
        "Command failed with status: {:?}\nstderr:\n{}",
        world.command_status,
        stderr(world)
    );
}

#[then(regex = r#"^the command should fail with exit code (\d+)$"#)]
async fn then_command_should_fail(world: &mut PrViewWorld, code: i32) {
    let status = world.command_status.expect("Command has not been run");
    assert_eq!(
        status.code(),
        Some(code),
        "Unexpected exit status, stderr:\n{}",
        stderr(world)
    );
}

#[then(regex = r#"^the output should be "(.*)"$"#)]
async fn then_output_should_be(world: &mut PrViewWorld, expected_output: String) {
    let output = stdout(world);
    assert_eq!(
        output.trim_end(),
        expected_output,
        "Expected output:\n---\n{}\n---\nActual output:\n---\n{}\n---",
        expected_output,
        output
    );
}

#[then(regex = r#"^the output should contain "(.*)"$"#)]
async fn then_output_should_contain(world: &mut PrViewWorld, expected: String) {
    let output = stdout(world);
    assert!(
        output.contains(&expected),
        "Expected '{}' in output:\n{}",
        expected,
        output
    );
}

#[then(regex = r#"^the error should contain "(.*)"$"#)]
async fn then_error_should_contain(world: &mut PrViewWorld, expected: String) {
    let error = stderr(world);
    assert!(
        error.contains(&expected),
        "Expected '{}' in stderr:\n{}",
        expected,
        error
    );
}

#[then(regex = r#"^the output should be a table with (\d+) rows$"#)]
async fn then_output_should_be_table(world: &mut PrViewWorld, rows: usize) {
    let output = stdout(world);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), rows + 2, "Unexpected table:\n{}", output);

    let header = regex::Regex::new(r"^REPO +URL +TITLE$").unwrap();
    let separator = regex::Regex::new(r"^-{4,}  -{3,}  -{5,}$").unwrap();
    assert!(header.is_match(lines[0]), "Bad header: {:?}", lines[0]);
    assert!(separator.is_match(lines[1]), "Bad separator: {:?}", lines[1]);

    let url_column = lines[1].find("  -").expect("separator has columns") + 2;
    for line in &lines[2..] {
        assert!(
            line.chars().nth(url_column - 1) == Some(' '),
            "Row not aligned with URL column: {:?}",
            line
        );
    }
}

#[then(regex = r#"^the repository list should be '(.*)'$"#)]
async fn then_repository_list_should_be(world: &mut PrViewWorld, expected: String) {
    let path = repo_file(world);
    let actual: Value = match std::fs::read_to_string(&path) {
        Ok(content) => serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("Invalid JSON in {:?}: {}\n{}", path, e, content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => json!([]),
        Err(e) => panic!("Failed to read repository list {:?}: {}", path, e),
    };
    let expected: Value = serde_json::from_str(&expected).expect("Expected value must be JSON");
    assert_eq!(actual, expected);
}
