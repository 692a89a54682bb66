//! Bare HTML pages. No styling; every interpolated value is escaped.

use axum::response::Html;

use crate::{
    flash::Flash,
    students::{dto::StudentForm, repo_types::Student},
};

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, flash: Option<Flash>, body: &str) -> Html<String> {
    let notice = flash
        .map(|f| {
            format!(
                r#"<p class="flash flash-{}">{}</p>"#,
                f.level().as_str(),
                escape(f.message())
            )
        })
        .unwrap_or_default();
    Html(format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<h1>{title}</h1>\n{notice}\n{body}\n</body></html>\n",
        title = escape(title),
    ))
}

pub fn login_page(flash: Option<Flash>, username: &str) -> Html<String> {
    let body = format!(
        r#"<form method="post" action="/login">
<label>Username <input name="username" value="{}" required></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Log in</button>
</form>"#,
        escape(username)
    );
    layout("Login", flash, &body)
}

pub fn student_list(
    flash: Option<Flash>,
    username: &str,
    students: &[Student],
    q: &str,
) -> Html<String> {
    let mut body = format!(
        r#"<p>Signed in as {} · <a href="/logout">Log out</a></p>
<form method="get" action="/">
<input name="q" value="{}" placeholder="Search name, roll no, course, email">
<button type="submit">Search</button>
</form>
<p><a href="/add">Add student</a></p>
"#,
        escape(username),
        escape(q)
    );

    if students.is_empty() {
        body.push_str("<p>No students found.</p>");
        return layout("Students", flash, &body);
    }

    body.push_str(
        "<table>\n<tr><th>Roll No</th><th>Name</th><th>Course</th><th>Email</th>\
         <th>Phone</th><th>DOB</th><th></th></tr>\n",
    );
    for s in students {
        let form = StudentForm::from(s);
        body.push_str(&format!(
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>
<td><a href="/edit/{id}">Edit</a>
<form method="post" action="/delete/{id}"><button type="submit">Delete</button></form></td></tr>
"#,
            escape(&form.roll_no),
            escape(&form.name),
            escape(&form.course),
            escape(&form.email),
            escape(&form.phone),
            escape(&form.dob),
            id = s.id,
        ));
    }
    body.push_str("</table>");
    layout("Students", flash, &body)
}

/// Which form is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(i32),
}

pub fn student_form(flash: Option<Flash>, mode: FormMode, values: &StudentForm) -> Html<String> {
    let (title, action) = match mode {
        FormMode::Add => ("Add Student", "/add".to_string()),
        FormMode::Edit(id) => ("Edit Student", format!("/edit/{id}")),
    };
    let field = |label: &str, name: &str, value: &str, extra: &str| {
        format!(
            r#"<label>{label} <input name="{name}" value="{}"{extra}></label>"#,
            escape(value)
        )
    };
    let body = format!(
        r#"<form method="post" action="{action}">
{}
{}
{}
{}
{}
{}
<label>Address <textarea name="address">{}</textarea></label>
<button type="submit">Save</button>
</form>
<p><a href="/">Back</a></p>"#,
        field("Roll No", "roll_no", &values.roll_no, " required"),
        field("Name", "name", &values.name, " required"),
        field("Course", "course", &values.course, ""),
        field("Email", "email", &values.email, r#" type="email""#),
        field("Phone", "phone", &values.phone, ""),
        field("Date of birth", "dob", &values.dob, r#" type="date""#),
        escape(&values.address),
    );
    layout(title, flash, &body)
}
