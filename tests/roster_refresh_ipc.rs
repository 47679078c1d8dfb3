use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_leaderboardd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn leaderboardd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn result(value: &serde_json::Value) -> &serde_json::Value {
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(true),
        "expected ok response, got {value}"
    );
    value.get("result").expect("result")
}

fn error_code(value: &serde_json::Value) -> &str {
    assert_eq!(value.get("ok").and_then(|v| v.as_bool()), Some(false));
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .expect("error code")
}

const SCORES_CSV: &str =
    "name,T1,הערה T1,total\nAnna,5,keep going,50\nBen,10,great sprint,80\n";
const CREDS_CSV: &str =
    "name,id,email,phone\nAnna,111,Anna@X.com,0521111111\nBen,222,ben@x.com,0522222222\n";

#[test]
fn refresh_builds_ranked_roster_with_badges() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let committed = request(
        &mut stdin,
        &mut reader,
        "1",
        "refresh.commit",
        json!({ "scoresCsv": SCORES_CSV, "credentialsCsv": CREDS_CSV }),
    );
    let res = result(&committed);
    assert_eq!(res.get("committed").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(res.get("studentCount").and_then(|v| v.as_u64()), Some(2));

    let got = request(&mut stdin, &mut reader, "2", "roster.get", json!({}));
    let students = result(&got)
        .get("students")
        .and_then(|v| v.as_array())
        .expect("students")
        .clone();
    assert_eq!(students.len(), 2);

    let ben = &students[0];
    assert_eq!(ben.get("displayName").and_then(|v| v.as_str()), Some("Ben"));
    assert_eq!(ben.get("rank").and_then(|v| v.as_u64()), Some(1));
    assert_eq!(ben.get("totalScore").and_then(|v| v.as_f64()), Some(80.0));
    assert_eq!(ben.get("weeklyScore").and_then(|v| v.as_f64()), Some(10.0));
    assert_eq!(
        ben.get("isWeeklyChampion").and_then(|v| v.as_bool()),
        Some(true)
    );
    let ben_badges: Vec<&str> = ben
        .get("badges")
        .and_then(|v| v.as_array())
        .expect("badges")
        .iter()
        .filter_map(|b| b.get("label").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(ben_badges, vec!["Weekly Champion", "Top Performer"]);
    assert_eq!(ben.get("email").and_then(|v| v.as_str()), Some("ben@x.com"));

    let anna = &students[1];
    assert_eq!(anna.get("rank").and_then(|v| v.as_u64()), Some(2));
    let anna_badges: Vec<&str> = anna
        .get("badges")
        .and_then(|v| v.as_array())
        .expect("badges")
        .iter()
        .filter_map(|b| b.get("label").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(anna_badges, vec!["Top Performer"]);
    // Joined email is normalized to lowercase.
    assert_eq!(
        anna.get("email").and_then(|v| v.as_str()),
        Some("anna@x.com")
    );

    // Task note pairs with the adjacent comment column.
    let tasks = anna
        .get("taskBreakdown")
        .and_then(|v| v.as_array())
        .expect("breakdown");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].get("column").and_then(|v| v.as_str()), Some("T1"));
    assert_eq!(
        tasks[0].get("note").and_then(|v| v.as_str()),
        Some("keep going")
    );

    // Codenames and icons come from the identity palette.
    assert!(ben
        .get("codeName")
        .and_then(|v| v.as_str())
        .is_some_and(|s| !s.is_empty()));

    let one = request(
        &mut stdin,
        &mut reader,
        "3",
        "roster.student",
        json!({ "name": "anna" }),
    );
    let student = result(&one).get("student").expect("student");
    assert_eq!(
        student.get("displayName").and_then(|v| v.as_str()),
        Some("Anna")
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn failed_refresh_keeps_previous_roster() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request(
        &mut stdin,
        &mut reader,
        "1",
        "refresh.commit",
        json!({ "scoresCsv": SCORES_CSV, "credentialsCsv": CREDS_CSV }),
    );

    // Headers only: fatal for this cycle.
    let empty = request(
        &mut stdin,
        &mut reader,
        "2",
        "refresh.commit",
        json!({ "scoresCsv": "name,T1,total\n" }),
    );
    assert_eq!(error_code(&empty), "sheet_empty");

    // No header matches the name keyword set: fatal too.
    let nameless = request(
        &mut stdin,
        &mut reader,
        "3",
        "refresh.commit",
        json!({ "scoresCsv": "T1,total\n5,50\n" }),
    );
    assert_eq!(error_code(&nameless), "no_name_column");

    // The previous snapshot is still being served.
    let got = request(&mut stdin, &mut reader, "4", "roster.get", json!({}));
    let students = result(&got)
        .get("students")
        .and_then(|v| v.as_array())
        .expect("students");
    assert_eq!(students.len(), 2);

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn missing_credentials_sheet_is_soft() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let committed = request(
        &mut stdin,
        &mut reader,
        "1",
        "refresh.commit",
        json!({ "scoresCsv": SCORES_CSV }),
    );
    assert_eq!(
        result(&committed).get("committed").and_then(|v| v.as_bool()),
        Some(true)
    );

    let got = request(&mut stdin, &mut reader, "2", "roster.get", json!({}));
    let students = result(&got)
        .get("students")
        .and_then(|v| v.as_array())
        .expect("students");
    for s in students {
        assert_eq!(s.get("credentialId").and_then(|v| v.as_str()), Some(""));
        assert_eq!(s.get("email").and_then(|v| v.as_str()), Some(""));
        assert_eq!(s.get("phone").and_then(|v| v.as_str()), Some(""));
    }

    // Display-name auth still works without credentials.
    let login = request(
        &mut stdin,
        &mut reader,
        "3",
        "auth.login",
        json!({ "identifier": "BEN" }),
    );
    let res = result(&login);
    assert_eq!(
        res.get("student")
            .and_then(|s| s.get("displayName"))
            .and_then(|v| v.as_str()),
        Some("Ben")
    );

    drop(stdin);
    let _ = child.wait();
}
