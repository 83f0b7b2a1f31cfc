use serde::Deserialize;

/// One entry of the urltestdata corpus: a test record or a comment string.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum TestCase {
    Record(TestRecord),
    Comment(String),
}

/// A test record. Failure records set `failure: true` and carry no expected
/// components; success records compare every field that is present.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
#[allow(dead_code)]
pub struct TestRecord {
    pub input: String,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub failure: Option<bool>,
    #[serde(default, rename = "relativeTo")]
    pub relative_to: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub pathname: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
}

pub fn load_test_cases() -> Vec<TestCase> {
    let data = include_str!("../data/urltestdata.json");
    serde_json::from_str(data).expect("invalid test vector JSON")
}
