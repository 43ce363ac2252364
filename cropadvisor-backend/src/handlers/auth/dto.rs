use cropadvisor_auth::DEFAULT_LANGUAGE;

/// Form body of `POST /signup` and `POST /login`.
#[derive(Debug, serde::Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// JSON body of `POST /set_language`.
#[derive(Debug, serde::Deserialize)]
pub struct SetLanguage {
    #[serde(default = "default_language")]
    pub lang: String,
}

impl Default for SetLanguage {
    fn default() -> Self {
        Self {
            lang: default_language(),
        }
    }
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}
