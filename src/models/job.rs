use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// Job posting as stored in the jobs collection. Stored keys follow the
/// mobile app's schema; English names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    #[serde(rename = "nome_vaga", alias = "title", default, deserialize_with = "text")]
    pub title: String,
    #[serde(rename = "nome_empresa", alias = "companyName", default)]
    pub company_name: Option<String>,
    #[serde(rename = "descricao", alias = "description", default)]
    pub description: Option<String>,
    #[serde(rename = "localizacao", alias = "location", default, deserialize_with = "text")]
    pub location: String,
    #[serde(rename = "modalidade", alias = "workMode", default, deserialize_with = "text")]
    pub work_mode: String,
    #[serde(rename = "regime", alias = "employmentType", default, deserialize_with = "text")]
    pub employment_type: String,
    /// Free text; some postings store a bare number.
    #[serde(rename = "salario", alias = "salary", default, deserialize_with = "text")]
    pub salary: String,
    #[serde(rename = "email", alias = "contactEmail", default, deserialize_with = "text")]
    pub contact_email: String,
}

/// Reads a string, a number rendered as text, or null/absent as empty.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match JsonValue::deserialize(deserializer)? {
        JsonValue::Null => Ok(String::new()),
        JsonValue::String(s) => Ok(s),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected text, found {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_app_schema_with_numeric_salary() {
        let job: JobPosting = serde_json::from_value(json!({
            "id": "J1",
            "nome_vaga": "Desenvolvedor Rust",
            "nome_empresa": "Go 2 Work",
            "localizacao": "Recife",
            "modalidade": "Remoto",
            "regime": "CLT",
            "salario": 7500,
            "email": "vagas@go2work.dev"
        }))
        .unwrap();

        assert_eq!(job.title, "Desenvolvedor Rust");
        assert_eq!(job.company_name.as_deref(), Some("Go 2 Work"));
        assert_eq!(job.salary, "7500");
        assert_eq!(job.description, None);
    }

    #[test]
    fn accepts_english_aliases_and_missing_fields() {
        let job: JobPosting = serde_json::from_value(json!({
            "id": "J2",
            "title": "Backend Engineer",
            "salary": "a combinar"
        }))
        .unwrap();
        assert_eq!(job.title, "Backend Engineer");
        assert_eq!(job.salary, "a combinar");
        assert!(job.location.is_empty());
    }
}
