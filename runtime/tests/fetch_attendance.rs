//! Attendance fetching against a mock ASP.NET portal.

mod common;

use common::*;
use uafcalc_grades::RegistrationNumber;
use uafcalc_runtime::acquisition::AttendanceFetcher;
use uafcalc_runtime::ScrapeError;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn reg() -> RegistrationNumber {
    RegistrationNumber::parse(REG).unwrap()
}

async fn mount_form(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn session_redirect() -> ResponseTemplate {
    ResponseTemplate::new(302)
        .insert_header("Location", "/StudentDetail.aspx")
        .insert_header("Set-Cookie", "ASP.NET_SessionId=sess1; path=/; HttpOnly")
}

#[tokio::test]
async fn test_attendance_session_flow() {
    let server = MockServer::start().await;
    mount_form(&server, ATTENDANCE_FORM).await;
    Mock::given(method("POST"))
        .and(path("/default.aspx"))
        .and(body_string_contains("__EVENTVALIDATION=ev-xyz"))
        .and(body_string_contains("ctl00%24Main%24txtReg=2022-ag-7693"))
        .and(body_string_contains("ctl00%24Main%24btnShow=Show"))
        .respond_with(session_redirect())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/StudentDetail.aspx"))
        .and(header("cookie", "ASP.NET_SessionId=sess1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ATTENDANCE_DETAIL))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = AttendanceFetcher::new(&mock_config(&server)).unwrap();
    let records = fetcher.fetch(&reg()).await.unwrap();

    assert_eq!(records.len(), 2);
    let first = &records[0].course;
    assert_eq!(first.sr, "1");
    assert_eq!(first.course_code, "CS-501");
    assert_eq!(first.semester, "Winter 2024-2025");
    assert_eq!(first.mid, "12");
    assert_eq!(first.total, "46.50");
    assert!(first.credit_hours.is_empty());

    let second = &records[1].course;
    assert_eq!(second.teacher_name, "N/A");
    assert_eq!(second.course_title, "CS-502");
    assert_eq!(second.total, "35");
}

#[tokio::test]
async fn test_missing_hidden_field() {
    let server = MockServer::start().await;
    let form = ATTENDANCE_FORM.replace("__EVENTVALIDATION", "__SOMETHING_ELSE");
    mount_form(&server, &form).await;
    Mock::given(method("POST"))
        .respond_with(session_redirect())
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = AttendanceFetcher::new(&mock_config(&server)).unwrap();
    let err = fetcher.fetch(&reg()).await.unwrap_err();
    assert!(
        matches!(err, ScrapeError::HiddenFieldMissing("__EVENTVALIDATION")),
        "{err:?}"
    );
}

#[tokio::test]
async fn test_missing_session_cookie() {
    let server = MockServer::start().await;
    mount_form(&server, ATTENDANCE_FORM).await;
    Mock::given(method("POST"))
        .and(path("/default.aspx"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/StudentDetail.aspx"))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/StudentDetail.aspx"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ATTENDANCE_DETAIL))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = AttendanceFetcher::new(&mock_config(&server)).unwrap();
    let err = fetcher.fetch(&reg()).await.unwrap_err();
    assert!(matches!(err, ScrapeError::SessionCookieMissing), "{err:?}");
}

#[tokio::test]
async fn test_search_must_redirect() {
    let server = MockServer::start().await;
    mount_form(&server, ATTENDANCE_FORM).await;
    Mock::given(method("POST"))
        .and(path("/default.aspx"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ATTENDANCE_FORM))
        .mount(&server)
        .await;

    let fetcher = AttendanceFetcher::new(&mock_config(&server)).unwrap();
    let err = fetcher.fetch(&reg()).await.unwrap_err();
    match err {
        ScrapeError::Transport(msg) => assert!(msg.contains("200"), "{msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_page_loads_follow_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/Login.aspx"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Login.aspx"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ATTENDANCE_FORM))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/default.aspx"))
        .respond_with(session_redirect())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/StudentDetail.aspx"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/Detail.aspx"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Detail.aspx"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ATTENDANCE_DETAIL))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = AttendanceFetcher::new(&mock_config(&server)).unwrap();
    let records = fetcher.fetch(&reg()).await.unwrap();
    assert_eq!(records.len(), 2);
}
