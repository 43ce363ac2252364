use cropadvisor_model::SampleFieldError;
use serde::Serialize;

#[derive(Debug, Serialize, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&SampleFieldError> for ValidationIssue {
    fn from(err: &SampleFieldError) -> Self {
        Self::new(err.field, err.problem.code(), err.to_string())
    }
}

pub fn to_payload(issues: &[ValidationIssue]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for issue in issues {
        map.insert(
            issue.field.clone(),
            serde_json::json!({ "code": issue.code, "message": issue.message }),
        );
    }
    serde_json::json!({ "validation": serde_json::Value::Object(map) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropadvisor_model::FieldProblem;

    #[test]
    fn payload_is_keyed_by_field() {
        let errs = [
            SampleFieldError {
                field: "N",
                problem: FieldProblem::Missing,
            },
            SampleFieldError {
                field: "ph",
                problem: FieldProblem::NotNumeric,
            },
        ];
        let issues: Vec<ValidationIssue> = errs.iter().map(ValidationIssue::from).collect();
        let payload = to_payload(&issues);
        assert_eq!(payload["validation"]["N"]["code"], "required");
        assert_eq!(payload["validation"]["ph"]["code"], "not_numeric");
        assert_eq!(payload["validation"]["ph"]["message"], "ph must be a number");
    }
}
