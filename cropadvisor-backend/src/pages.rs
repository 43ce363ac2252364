//! Minimal server-rendered pages.
//!
//! Login and signup post their forms with `fetch` and read the JSON reply;
//! the prediction form is a plain HTML form.

use cropadvisor_model::{CropInfo, SoilSample};

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape(raw: &str) -> String {
    html_escape::encode_safe(raw).into_owned()
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">\
         <title>{title}</title></head><body>{body}</body></html>",
        title = escape(title),
    )
}

const LANGUAGE_PICKER: &str = r#"<label>Language
<select id="lang" onchange="fetch('/set_language',{method:'POST',headers:{'Content-Type':'application/json'},body:JSON.stringify({lang:this.value})})">
<option value="english">English</option><option value="hindi">Hindi</option>
<option value="tamil">Tamil</option><option value="telugu">Telugu</option>
<option value="bengali">Bengali</option><option value="marathi">Marathi</option>
<option value="french">French</option><option value="spanish">Spanish</option>
</select></label>"#;

const JSON_FORM_SCRIPT: &str = r#"<script>
document.querySelector('form').addEventListener('submit', async (ev) => {
  ev.preventDefault();
  const res = await fetch(ev.target.action, {method: 'POST', body: new URLSearchParams(new FormData(ev.target))});
  const data = await res.json();
  if (data.redirect) { window.location = data.redirect; return; }
  document.getElementById('message').textContent = data.message || data.error || '';
});
</script>"#;

fn credentials_form(action: &str, button: &str) -> String {
    format!(
        "<form action=\"{action}\" method=\"post\">\
         <input name=\"username\" placeholder=\"Username\" required>\
         <input name=\"password\" type=\"password\" placeholder=\"Password\" required>\
         <button type=\"submit\">{button}</button></form>\
         <p id=\"message\"></p>"
    )
}

pub fn login_page() -> String {
    let body = format!(
        "<h1>Crop Advisor</h1>{picker}{form}\
         <p>No account? <a href=\"/signup\">Sign up</a></p>{script}",
        picker = LANGUAGE_PICKER,
        form = credentials_form("/login", "Log in"),
        script = JSON_FORM_SCRIPT,
    );
    layout("Crop Advisor - Login", &body)
}

pub fn signup_page() -> String {
    let body = format!(
        "<h1>Create an account</h1>{form}\
         <p>Already registered? <a href=\"/\">Log in</a></p>{script}",
        form = credentials_form("/signup", "Sign up"),
        script = JSON_FORM_SCRIPT,
    );
    layout("Crop Advisor - Sign up", &body)
}

pub fn predict_page(username: &str, lang: &str) -> String {
    let mut inputs = String::new();
    for field in SoilSample::FIELDS {
        inputs.push_str(&format!(
            "<label>{field} <input name=\"{field}\" type=\"number\" step=\"any\" required></label><br>"
        ));
    }
    let body = format!(
        "<h1>Welcome, {user}</h1><p>Language: {lang}</p>{picker}\
         <form action=\"/predict\" method=\"post\">{inputs}\
         <button type=\"submit\">Recommend a crop</button></form>\
         <p><a href=\"/logout\">Log out</a></p>",
        user = escape(username),
        lang = escape(lang),
        picker = LANGUAGE_PICKER,
    );
    layout("Crop Advisor", &body)
}

/// Result page. `info` is expected to be already translated.
pub fn result_page(crop: &str, info: &TranslatedInfo, lang: &str) -> String {
    let body = format!(
        "<h1>Recommended crop: {crop}</h1>\
         <h2>Growing tip</h2><p>{tip}</p>\
         <h2>Fertilizer</h2><p>{fertilizer}</p>\
         <p>Language: {lang}</p>\
         <p><a href=\"/predict_page\">Try another sample</a> | <a href=\"/logout\">Log out</a></p>",
        crop = escape(crop),
        tip = escape(&info.tip),
        fertilizer = escape(&info.fertilizer),
        lang = escape(lang),
    );
    layout("Crop Advisor - Result", &body)
}

/// Crop advice after passing through the translation gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedInfo {
    pub tip: String,
    pub fertilizer: String,
}

impl From<CropInfo> for TranslatedInfo {
    fn from(info: CropInfo) -> Self {
        Self {
            tip: info.tip.to_string(),
            fertilizer: info.fertilizer.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        let out = escape(r#"<b a="1">&"#);
        assert!(out.starts_with("&lt;b a="));
        assert!(out.contains("&amp;"));
        assert!(!out.contains('<') && !out.contains('"'));
    }

    #[test]
    fn predict_page_lists_every_field() {
        let html = predict_page("<alice>", "english");
        for field in SoilSample::FIELDS {
            assert!(html.contains(&format!("name=\"{field}\"")));
        }
        assert!(html.contains("&lt;alice&gt;"));
        assert!(!html.contains("<alice>"));
    }
}
