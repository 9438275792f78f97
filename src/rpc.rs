//! Launcher host protocol.
//!
//! The host sends `{"method": "...", "parameters": [...]}` and reads
//! `{"result": [...]}` back on stdout. Three methods are understood:
//! `query`, `open_workspace` and `context_menu`.

use crate::cli::RpcArgs;
use crate::query::{OPEN_METHOD, ResultRow, context_menu};
use crate::session::Session;
use crate::ZedwsError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{BufRead, Write};

#[derive(Debug, Deserialize)]
pub struct Request {
    pub method: String,
    #[serde(default)]
    pub parameters: Vec<Value>,
}

#[derive(Debug, Serialize, Default)]
pub struct Response {
    pub result: Vec<ResultRow>,
}

/// First parameter as a string. Context menus arrive as `[[path]]`.
fn first_string(params: &[Value]) -> Option<&str> {
    match params.first()? {
        Value::String(s) => Some(s.as_str()),
        Value::Array(inner) => inner.first()?.as_str(),
        _ => None,
    }
}

pub fn dispatch(session: &mut Session, req: &Request) -> Response {
    match req.method.as_str() {
        "query" => {
            let q = first_string(&req.parameters).unwrap_or("");
            Response {
                result: session.query(q),
            }
        }
        m if m == OPEN_METHOD => {
            match first_string(&req.parameters) {
                Some(path) => {
                    session.open(path);
                }
                None => log::warn!("rpc: {OPEN_METHOD} without a path"),
            }
            Response::default()
        }
        "context_menu" => Response {
            result: first_string(&req.parameters)
                .map(context_menu)
                .unwrap_or_default(),
        },
        other => {
            log::warn!("rpc: unknown method {other:?}");
            Response::default()
        }
    }
}

pub fn handle_line(session: &mut Session, line: &str) -> Result<String, ZedwsError> {
    let req: Request = serde_json::from_str(line)?;
    log::debug!("rpc: {} {:?}", req.method, req.parameters);
    let resp = dispatch(session, &req);
    Ok(serde_json::to_string(&resp)?)
}

/// Answer newline-delimited requests until EOF, keeping one session (and its
/// cache) alive across them. A malformed line gets an empty result.
pub fn serve<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    mut output: W,
) -> Result<(), ZedwsError> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = match handle_line(session, &line) {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("rpc: bad request: {e}");
                serde_json::to_string(&Response::default())?
            }
        };
        writeln!(output, "{reply}")?;
        output.flush()?;
    }
    Ok(())
}

pub fn handle_rpc(session: &mut Session, args: &RpcArgs) -> Result<(), ZedwsError> {
    match &args.request {
        Some(request) => {
            let reply = handle_line(session, request)?;
            println!("{reply}");
            Ok(())
        }
        None => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            serve(session, stdin.lock(), stdout.lock())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZedwsConfig;
    use rusqlite::Connection;
    use std::path::Path;

    fn session_with(dir: &Path, rows: &[(i64, &str)]) -> Session {
        let store = dir.join("db.sqlite");
        let conn = Connection::open(&store).unwrap();
        conn.execute_batch("CREATE TABLE workspaces (workspace_id INTEGER, paths TEXT)")
            .unwrap();
        for (id, p) in rows {
            conn.execute("INSERT INTO workspaces VALUES (?1, ?2)", rusqlite::params![id, p])
                .unwrap();
        }
        Session::new(store, &ZedwsConfig::default())
    }

    fn reply(session: &mut Session, line: &str) -> Value {
        serde_json::from_str(&handle_line(session, line).unwrap()).unwrap()
    }

    #[test]
    fn query_filters_and_formats() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut session = session_with(dir.path(), &[(1, "C:\\src\\zed-ws"), (2, "/home/u/alpha")]);

        let v = reply(&mut session, r#"{"method":"query","parameters":["ALPHA"]}"#);
        let rows = v["result"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Title"], "alpha  (WSL)");
        assert_eq!(rows[0]["JsonRPCAction"]["parameters"][0], "/home/u/alpha");
    }

    #[test]
    fn query_without_parameters_lists_all() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut session = session_with(dir.path(), &[(1, "C:/b"), (2, "C:/a")]);
        let v = reply(&mut session, r#"{"method":"query"}"#);
        let titles: Vec<&str> = v["result"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["Title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["a", "b"]);
    }

    #[test]
    fn context_menu_accepts_nested_context_data() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut session = session_with(dir.path(), &[]);
        let v = reply(
            &mut session,
            r#"{"method":"context_menu","parameters":[["/home/u/a"]]}"#,
        );
        assert_eq!(v["result"][0]["Title"], "Open in Zed (WSL)");
    }

    #[test]
    fn unknown_method_is_empty_result() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut session = session_with(dir.path(), &[]);
        let v = reply(&mut session, r#"{"method":"settings","parameters":[]}"#);
        assert_eq!(v["result"], serde_json::json!([]));
    }

    #[test]
    fn malformed_request_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut session = session_with(dir.path(), &[]);
        assert!(handle_line(&mut session, "{not json").is_err());
    }

    #[test]
    fn serve_answers_each_line_and_survives_garbage() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut session = session_with(dir.path(), &[(1, "C:/a")]);
        let input = "{\"method\":\"query\",\"parameters\":[\"\"]}\n\ngarbage\n{\"method\":\"query\",\"parameters\":[\"zzz\"]}\n";
        let mut out = Vec::new();
        serve(&mut session, input.as_bytes(), &mut out).unwrap();

        let lines: Vec<Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["result"][0]["SubTitle"], "C:/a");
        assert_eq!(lines[1]["result"], serde_json::json!([]));
        assert_eq!(lines[2]["result"], serde_json::json!([]));
    }
}
