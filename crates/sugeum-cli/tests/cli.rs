use assert_cmd::Command;
use predicates::prelude::*;

fn sugeum() -> Command {
    let mut cmd = Command::cargo_bin("sugeum").unwrap();
    cmd.env_remove("DEEPSEEK_API_KEY")
        .env_remove("NOTION_API_KEY")
        .env_remove("NOTION_DB_ID");
    cmd
}

#[test]
fn date_resolves_next_week_weekday() {
    sugeum()
        .args(["date", "다음주 수요일", "--today", "2025-01-20"])
        .assert()
        .success()
        .stdout("2025-01-29\n");
}

#[test]
fn date_rejects_unknown_expression() {
    sugeum()
        .args(["date", "언젠가", "--today", "2025-01-20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not resolve"));
}

#[test]
fn date_rejects_bad_reference_date() {
    sugeum()
        .args(["date", "내일", "--today", "2025-13-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --today"));
}

#[test]
fn amount_normalizes_compound_units() {
    sugeum()
        .args(["amount", "2억 3천만원"])
        .assert()
        .success()
        .stdout("230,000,000원\n");

    sugeum()
        .args(["amount", "--raw", "50만"])
        .assert()
        .success()
        .stdout("500000\n");
}

#[test]
fn analyze_rules_only_json() {
    sugeum()
        .args([
            "analyze",
            "북구청 방수 작업 끝나면 1000만원 잔금",
            "--rules-only",
            "--today",
            "2025-01-20",
            "-f",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""who": "북구청""#))
        .stdout(predicate::str::contains(r#""how": "10,000,000원""#))
        .stdout(predicate::str::contains(r#""when_display": "작업 완료 후""#))
        .stdout(predicate::str::contains(r#""source": "rules""#));
}

#[test]
fn analyze_rules_only_csv() {
    sugeum()
        .args([
            "analyze",
            "강남 아파트 타일 500만원 다음주 수요일 계좌이체",
            "--rules-only",
            "--today",
            "2025-01-20",
            "--format",
            "csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("who,what,when,where,why,how"))
        .stdout(predicate::str::contains("강남 아파트,타일공사 (기타),2025-01-29"));
}

#[test]
fn analyze_rejects_empty_note() {
    sugeum()
        .args(["analyze", "   ", "--rules-only"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input text is empty"));
}

#[test]
fn config_init_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let path = path.to_str().unwrap();

    sugeum()
        .args(["-c", path, "config", "init"])
        .assert()
        .success();

    sugeum()
        .args(["-c", path, "config", "get", "provider.model"])
        .assert()
        .success()
        .stdout("\"deepseek-chat\"\n");

    sugeum()
        .args(["-c", path, "config", "set", "limits.llm_calls", "10"])
        .assert()
        .success();

    sugeum()
        .args(["-c", path, "config", "get", "limits.llm_calls"])
        .assert()
        .success()
        .stdout("10\n");

    sugeum()
        .args(["-c", path, "config", "set", "provider.nope", "1"])
        .assert()
        .failure();
}

#[test]
fn missing_explicit_config_is_an_error() {
    sugeum()
        .args(["-c", "/nonexistent/sugeum.json", "analyze", "북구청 잔금", "--rules-only"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}
