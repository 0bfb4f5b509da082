use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

const LUMP_SUM_RATES: &str = "../estimate_core/tests/fixtures/rates_lump_sum.toml";

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("ravel").unwrap();
    cmd.env_remove("RAVEL_RATES").env_remove("GOOGLE_API_KEY");
    cmd
}

fn five_storey_street_facade() -> Vec<&'static str> {
    vec![
        "estimate",
        "--street-width",
        "15",
        "--levels",
        "5",
        "--support",
        "RENDERED_CEMENT",
        "--condition",
        "good",
    ]
}

#[test]
fn estimate_table() {
    cmd()
        .args(five_storey_street_facade())
        .assert()
        .success()
        .stdout(contains("Surface 225.00 m²"))
        .stdout(contains("D3 finish at 91,20 € per m²"))
        .stdout(contains("30 724,20 €"))
        .stdout(contains("33 796,62 €"));
}

#[test]
fn estimate_json() {
    cmd()
        .arg("--json")
        .args(five_storey_street_facade())
        .assert()
        .success()
        .stdout(contains("\"rates_version\": \"1.0.0\""))
        .stdout(contains("\"total\": 3072420"))
        .stdout(contains("\"vat\": 307242"));
}

#[test]
fn estimate_accepts_french_support_names() {
    cmd()
        .args(["estimate", "--street-width", "8", "--support", "brique", "--condition", "average"])
        .assert()
        .success()
        .stdout(contains("Mineral finish"));
}

#[test]
fn unknown_support_fails() {
    cmd()
        .args(["estimate", "--street-width", "15", "--support", "wood", "--condition", "good"])
        .assert()
        .failure()
        .stderr(contains("Unknown support material"));
}

#[test]
fn unknown_support_fails_with_json_error() {
    cmd()
        .args(["--json", "estimate", "--street-width", "15", "--support", "wood", "--condition", "good"])
        .assert()
        .failure()
        .stderr(contains("\"error\":\"INVALID_INPUT\""));
}

#[test]
fn options_file_adds_lines() {
    let dir = TempDir::new().unwrap();
    let options = dir.path().join("options.json");
    std::fs::write(&options, r#"{ "large_windows": 3, "door": "carriage_door" }"#).unwrap();

    cmd()
        .args(five_storey_street_facade())
        .arg("--options")
        .arg(&options)
        .assert()
        .success()
        .stdout(contains("Large windows"))
        .stdout(contains("Carriage door"));
}

#[test]
fn malformed_options_file_fails() {
    let dir = TempDir::new().unwrap();
    let options = dir.path().join("options.json");
    std::fs::write(&options, "{ not json").unwrap();

    cmd()
        .args(five_storey_street_facade())
        .arg("--options")
        .arg(&options)
        .assert()
        .failure()
        .stderr(contains("Serialization error"));
}

#[test]
fn estimate_saves_report_and_pdf() {
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("estimate.json");
    let pdf = dir.path().join("estimate.pdf");

    cmd()
        .args(five_storey_street_facade())
        .arg("--output")
        .arg(&report)
        .arg("--pdf")
        .arg(&pdf)
        .assert()
        .success();

    let saved = std::fs::read_to_string(&report).unwrap();
    assert!(saved.contains("\"total\": 3072420"));
    assert!(std::fs::read(&pdf).unwrap().starts_with(b"%PDF"));
}

#[test]
fn rates_table() {
    cmd()
        .arg("rates")
        .assert()
        .success()
        .stdout(contains("Rate table 1.0.0"))
        .stdout(contains("Cut stone"))
        .stdout(contains("1.0 % of subtotal"));
}

#[test]
fn rates_from_file() {
    cmd()
        .args(["--rates", LUMP_SUM_RATES, "rates"])
        .assert()
        .success()
        .stdout(contains("Rate table 1.1.0"))
        .stdout(contains("350,00 €"));
}

#[test]
fn rates_from_env() {
    cmd()
        .env("RAVEL_RATES", LUMP_SUM_RATES)
        .args(["--json", "rates"])
        .assert()
        .success()
        .stdout(contains("\"version\": \"1.1.0\""));
}

#[test]
fn missing_rates_file_fails() {
    cmd()
        .args(["--rates", "does-not-exist.toml", "rates"])
        .assert()
        .failure()
        .stderr(contains("does-not-exist.toml"));
}

#[test]
fn offline_wizard_delivers_to_outbox() {
    let outbox = TempDir::new().unwrap();
    let script = [
        // address, latitude, longitude
        "12 Rue des Écoles Paris",
        "",
        "",
        // dimensions: menu, kind, levels, level height, street width, zones, side wall
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        // condition: menu, support, condition
        "",
        "1",
        "1",
        // options: menu, 2 window counts, door, 7 metalwork, dormers, shop, mesh, period, 4 damage
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        // contact: menu, name, email, phone, note, lead time, urgent
        "",
        "Camille",
        "camille@example.fr",
        "",
        "",
        "",
        "",
        // leave the estimate
        "q",
    ]
    .join("\n")
        + "\n";

    cmd()
        .args(["wizard", "--offline", "--outbox"])
        .arg(outbox.path())
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Step 6/6: Estimate"))
        .stdout(contains("Total incl. tax"))
        .stdout(contains("A copy was sent to camille@example.fr."));

    let written: Vec<String> = std::fs::read_dir(outbox.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(written.iter().any(|name| name.ends_with(".json")));
    assert!(written.iter().any(|name| name.ends_with(".txt")));
    assert!(written.iter().any(|name| name.ends_with(".pdf")));
}

#[test]
fn wizard_with_no_input_closes_cleanly() {
    let outbox = TempDir::new().unwrap();
    cmd()
        .args(["wizard", "--offline", "--outbox"])
        .arg(outbox.path())
        .write_stdin("")
        .assert()
        .success()
        .stdout(contains("Session closed."));
}
