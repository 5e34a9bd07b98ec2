//! Runs the `epvp` binary against a mock forum

use mockito::Matcher;
use std::process::{Command, Output, Stdio};

fn thread_html(page: u32, page_count: u32, post_id: u64, body: &str) -> String {
    format!(
        r#"<html><head>
<script type="text/javascript">var SECURITYTOKEN = "guest";</script></head><body>
<table><tr><td class="navbar"><strong>Welcome</strong></td></tr></table>
<div class="pagenav"><table><tr><td class="vbmenu_control">Page {page} of {page_count}</td></tr></table></div>
<table id="post{post_id}">
<tr><td class="thead"><div class="normal">03-01-2015, 17:43</div></td></tr>
<tr>
  <td class="alt2"><a class="bigusername" href="https://www.elitepvpers.com/forum/members/1-admin.html">admin</a></td>
  <td class="alt1" id="td_post_{post_id}"><div id="post_message_{post_id}">{body}</div></td>
</tr>
</table>
</body></html>"#
    )
}

fn epvp(server: &mockito::Server, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_epvp"))
        .arg("--base-url")
        .arg(server.url())
        .args(args)
        .env_remove("EPVP_USERNAME")
        .env_remove("EPVP_PASSWORD")
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .output()
        .unwrap()
}

fn thread_mock(server: &mut mockito::Server, page: u32, html: String) -> mockito::Mock {
    server
        .mock("GET", "/forum/showthread.php")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("t".into(), "3311".into()),
            Matcher::UrlEncoded("page".into(), page.to_string()),
        ]))
        .with_status(200)
        .with_body(html)
        .expect(1)
        .create()
}

#[test]
fn test_thread_pages_as_json() {
    let mut server = mockito::Server::new();
    let first = thread_mock(&mut server, 1, thread_html(1, 2, 101, "welcome"));
    let second = thread_mock(&mut server, 2, thread_html(2, 2, 150, "bump"));

    // asks for more pages than the thread has
    let output = epvp(&server, &["--json", "thread", "3311", "--pages", "5"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let pages: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let pages = pages.as_array().unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0]["title"], "Welcome");
    assert_eq!(pages[0]["posts"][0]["id"], 101);
    assert_eq!(pages[0]["posts"][0]["author"]["name"], "admin");
    assert_eq!(pages[1]["page"], 2);
    assert_eq!(pages[1]["posts"][0]["id"], 150);

    first.assert();
    second.assert();
}

#[test]
fn test_thread_as_text() {
    let mut server = mockito::Server::new();
    let page = thread_mock(&mut server, 1, thread_html(1, 1, 101, "welcome"));

    let output = epvp(&server, &["thread", "3311"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Welcome (page 1/1)"));
    assert!(stdout.contains("#101 admin (#1) at 2015-03-01 17:43"));
    assert!(stdout.contains("  welcome"));
    page.assert();
}

#[test]
fn test_failed_profile_fails_the_run() {
    let mut server = mockito::Server::new();
    let missing = server
        .mock("GET", "/forum/member.php")
        .match_query(Matcher::UrlEncoded("u".into(), "7".into()))
        .with_status(404)
        .expect(1)
        .create();

    let output = epvp(&server, &["profile", "7"]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("profile 7"));
    assert!(stderr.contains("Error: 1 of 1 requests failed"));
    missing.assert();
}

#[test]
fn test_member_command_without_credentials() {
    let server = mockito::Server::new();

    // no username in the environment and nothing on stdin
    let output = epvp(&server, &["messages"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Username is required"));
}

#[test]
fn test_usage_errors() {
    let server = mockito::Server::new();

    let output = epvp(&server, &["thread", "3311", "--pages", "0"]);
    assert_eq!(output.status.code(), Some(2));

    let output = epvp(&server, &["--threads", "0", "profile", "1"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--threads must be at least 1"));
}
