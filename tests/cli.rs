mod support;

use serde_json::json;
use support::{flexirent, stdout_json, write_json};

fn tenant_sheet() -> serde_json::Value {
    json!({
        "role": "tenant",
        "name": "Ada",
        "tenantLocation": "Lagos",
        "rentFrequency": "Yearly",
        "rentAmount": "1,200,000",
        "painLevel": 4,
        "tenantInterest": "Definitely",
        "email": "ada@example.com",
        "whatsapp": "08031234567"
    })
}

#[test]
fn steps_json_lists_the_tenant_sequence() {
    let home = tempfile::tempdir().expect("create temp dir");
    let output = flexirent(&["steps", "--role", "tenant", "--json"], home.path());
    assert!(output.status.success());

    let steps = stdout_json(&output);
    let keys: Vec<&str> = steps
        .as_array()
        .expect("array of steps")
        .iter()
        .map(|step| step["key"].as_str().expect("key"))
        .collect();
    assert_eq!(
        keys,
        [
            "welcome", "role", "name", "location", "frequency", "amount", "pain", "interest",
            "contact", "closing"
        ]
    );
    assert_eq!(steps[8]["fields"], json!(["email", "whatsapp"]));
    assert_eq!(steps[9]["input"], json!("terminal"));
}

#[test]
fn steps_rejects_unknown_role() {
    let home = tempfile::tempdir().expect("create temp dir");
    let output = flexirent(&["steps", "--role", "investor"], home.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown role"));
}

#[test]
fn dry_run_submit_prints_mapped_row() {
    let home = tempfile::tempdir().expect("create temp dir");
    let answers = write_json(home.path(), "answers.json", &tenant_sheet());
    let output = flexirent(
        &[
            "submit",
            "--answers",
            answers.to_str().expect("utf8 path"),
            "--gateway",
            "dry_run",
            "--json",
        ],
        home.path(),
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report = stdout_json(&output);
    assert_eq!(report["status"], json!("submitted"));
    let row = &report["receipt"]["fields"];
    assert_eq!(row["Role"], json!("Tenant"));
    assert_eq!(row["RentAmount"], json!(1200000));
    assert_eq!(row["PainLevel"], json!(4));
    assert_eq!(row["WhatsApp"], json!("+2348031234567"));
}

#[test]
fn incomplete_sheet_exits_nonzero_with_step_errors() {
    let home = tempfile::tempdir().expect("create temp dir");
    let mut sheet = tenant_sheet();
    sheet["email"] = json!("not-an-email");
    let answers = write_json(home.path(), "answers.json", &sheet);
    let output = flexirent(
        &["submit", "--answers", answers.to_str().expect("utf8 path"), "--json"],
        home.path(),
    );
    assert_eq!(output.status.code(), Some(2));

    let report = stdout_json(&output);
    assert_eq!(report["status"], json!("blocked"));
    assert_eq!(report["step"], json!("contact"));
    assert_eq!(
        report["fieldErrors"]["email"],
        json!("Please enter a valid email address")
    );
}

#[test]
fn airtable_without_credentials_reports_configuration_error() {
    let home = tempfile::tempdir().expect("create temp dir");
    let answers = write_json(home.path(), "answers.json", &tenant_sheet());
    let output = flexirent(
        &[
            "submit",
            "--answers",
            answers.to_str().expect("utf8 path"),
            "--gateway",
            "airtable",
            "--json",
        ],
        home.path(),
    );
    assert_eq!(output.status.code(), Some(2));
    let report = stdout_json(&output);
    assert_eq!(report["status"], json!("failed"));
    assert!(report["serverErrorMessage"]
        .as_str()
        .expect("message")
        .starts_with("Airtable configuration missing"));
}

#[test]
fn config_file_selects_country_code_and_rejects_bad_versions() {
    let home = tempfile::tempdir().expect("create temp dir");
    let config = write_json(
        home.path(),
        "config.json",
        &json!({"schema_version": 1, "default_country_code": "+233"}),
    );
    let answers = write_json(home.path(), "answers.json", &tenant_sheet());
    let output = flexirent(
        &[
            "--config",
            config.to_str().expect("utf8 path"),
            "submit",
            "--answers",
            answers.to_str().expect("utf8 path"),
            "--json",
        ],
        home.path(),
    );
    // A Ghanaian prefix does not pass the Nigerian number check on the
    // server half, so the combined number is refused.
    assert_eq!(output.status.code(), Some(2));
    let report = stdout_json(&output);
    assert_eq!(report["status"], json!("rejected"));
    assert_eq!(report["step"], json!("contact"));

    let bad = write_json(home.path(), "bad.json", &json!({"schema_version": 9}));
    let output = flexirent(
        &["--config", bad.to_str().expect("utf8 path"), "submit", "--answers", "x.json"],
        home.path(),
    );
    assert!(!output.status.success());
}
