//! Shared fixtures for the mock-portal integration tests.

#![allow(dead_code)]

use std::time::Duration;
use uafcalc_runtime::PortalConfig;
use wiremock::MockServer;

pub const REG: &str = "2022-ag-7693";

pub const LOGIN_PAGE: &str = r#"<html><head><title>Login</title></head><body>
<form id="login" action="/course/uaf_student_result.php" method="post">
  <input type="text" id="REG" name="Register" />
  <input type="hidden" id="token" name="token" />
  <input type="submit" value="Result" />
</form>
<script>document.getElementById('token').value = 'tok-123';</script>
</body></html>"#;

/// Two courses in one semester: 12 + 3 grade points out of 24, so 2.5.
pub const RESULT_PAGE: &str = r#"<html><body>
<h3 align="center">Result Award List</h3>
<table class="table tab-content">
  <tr><td>Registration #</td><td>2022-ag-7693</td></tr>
  <tr><td>Student Full Name</td><td>Ayesha Khan</td></tr>
</table>
<table class="table tab-content">
  <tr>
    <th>Sr</th><th>Semester</th><th>Teacher Name</th><th>Course Code</th>
    <th>Course Title</th><th>Credit Hours</th><th>Mid</th><th>Assignment</th>
    <th>Final</th><th>Practical</th><th>Total</th><th>Grade</th>
  </tr>
  <tr>
    <td>1</td><td>Winter 2022-2023</td><td>Dr. Aslam</td><td>CS-101</td>
    <td>Intro to Computing</td><td>3</td><td>12</td><td>6</td>
    <td>30</td><td>0</td><td>48</td><td>A</td>
  </tr>
  <tr>
    <td>2</td><td>Winter 2022-2023</td><td>Ms. Noor</td><td>MTH-101</td>
    <td>Calculus I</td><td>3(3-0)</td><td>6</td><td>3</td>
    <td>15</td><td>0</td><td>24</td><td>D</td>
  </tr>
</table>
</body></html>"#;

pub const ATTENDANCE_FORM: &str = r#"<html><body>
<form method="post" action="default.aspx" id="aspnetForm">
  <input type="hidden" name="__VIEWSTATE" id="__VIEWSTATE" value="dDwtMTA4MzE0MjEwNTs7Pg==" />
  <input type="hidden" name="__VIEWSTATEGENERATOR" id="__VIEWSTATEGENERATOR" value="CA0B0334" />
  <input type="hidden" name="__EVENTVALIDATION" id="__EVENTVALIDATION" value="ev-xyz" />
  <input name="ctl00$Main$txtReg" type="text" id="ctl00_Main_txtReg" />
  <input type="submit" name="ctl00$Main$btnShow" value="Show" id="ctl00_Main_btnShow" />
</form>
</body></html>"#;

pub const ATTENDANCE_DETAIL: &str = r#"<html><body>
<table id="ctl00_Main_TabContainer1_tbResultInformation_gvResultInformation">
  <tr><th>#</th><th>Reg</th><th>Name</th><th>Semester</th><th>Teacher</th><th>Code</th>
      <th>Title</th><th>Status</th><th>Mid</th><th>Assign</th><th>Final</th>
      <th>Pract</th><th>Total</th><th>Grade</th></tr>
  <tr><td>1</td><td>2022-ag-7693</td><td>Ayesha</td><td>Winter 2024-2025</td><td>Dr. Aslam</td>
      <td>CS-501</td><td>Compilers</td><td>Open</td><td>12.00</td><td>4.50</td>
      <td>30.00</td><td>0.00</td><td>46.50</td><td>B</td></tr>
  <tr><td>2</td><td>2022-ag-7693</td><td>Ayesha</td><td>Winter 2024-2025</td><td></td>
      <td>CS-502</td><td></td><td>Open</td><td>10.00</td><td>5.00</td>
      <td>20.00</td><td>0.00</td><td>35.00</td><td>C</td></tr>
</table>
</body></html>"#;

/// Config pointing both portals at the mock server, with no retry pause.
pub fn mock_config(server: &MockServer) -> PortalConfig {
    PortalConfig {
        retry_delay: Duration::ZERO,
        ..PortalConfig::with_base_url(&server.uri())
    }
}

/// Padding that clears the minimum length check but has no result table.
pub fn markerless_page() -> String {
    format!(
        "<html><body><p>Service temporarily unavailable.</p>{}</body></html>",
        "<!-- padding -->".repeat(20)
    )
}
