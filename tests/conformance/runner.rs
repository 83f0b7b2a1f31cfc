use super::loader::{TestCase, TestRecord};
use std::fmt::Write;
use wurl::{ParseOutcome, Url};

#[derive(Debug, Default)]
pub struct TestResult {
    pub passed: usize,
    pub failed: usize,
    pub failures: Vec<Mismatch>,
}

#[derive(Debug)]
pub struct Mismatch {
    pub input: String,
    pub base: Option<String>,
    pub field: &'static str,
    pub expected: String,
    pub actual: String,
}

impl TestResult {
    pub fn report(&self) -> String {
        let mut out = String::new();
        for failure in &self.failures {
            let _ = writeln!(
                out,
                "  input {:?} (base {:?}): {} was {:?}, expected {:?}",
                failure.input, failure.base, failure.field, failure.actual, failure.expected
            );
        }
        out
    }
}

pub fn run_test_cases(cases: Vec<TestCase>) -> TestResult {
    let mut result = TestResult::default();

    for case in cases {
        let record = match case {
            TestCase::Comment(_) => continue,
            TestCase::Record(record) => record,
        };
        check_record(&record, &mut result);
    }

    result
}

fn check_record(record: &TestRecord, result: &mut TestResult) {
    let base = record
        .base
        .as_ref()
        .map(|base| Url::parse(base, None).expect("unparseable base URL in corpus"));

    let outcome = match &base {
        Some(base) => wurl::parse_with_base(&record.input, base),
        None => wurl::parse(&record.input),
    };

    if record.failure == Some(true) {
        if outcome.is_failure() {
            result.passed += 1;
        } else {
            result.failed += 1;
            result.failures.push(Mismatch {
                input: record.input.clone(),
                base: record.base.clone(),
                field: "failure",
                expected: "Failure".into(),
                actual: format!("{outcome:?}"),
            });
        }
        return;
    }

    let url = match outcome {
        ParseOutcome::Success(url) | ParseOutcome::SuccessWithWarnings(url, _) => url,
        ParseOutcome::Failure(errors) => {
            result.failed += 1;
            result.failures.push(Mismatch {
                input: record.input.clone(),
                base: record.base.clone(),
                field: "parse",
                expected: "success".into(),
                actual: format!("{errors:?}"),
            });
            return;
        }
    };

    let mut ok = true;
    let mut check = |field: &'static str, expected: &Option<String>, actual: String| {
        if let Some(expected) = expected {
            if *expected != actual {
                ok = false;
                result.failures.push(Mismatch {
                    input: record.input.clone(),
                    base: record.base.clone(),
                    field,
                    expected: expected.clone(),
                    actual,
                });
            }
        }
    };

    check("href", &record.href, url.to_string());
    check("protocol", &record.protocol, format!("{}:", url.scheme()));
    check("username", &record.username, url.username().to_owned());
    check("password", &record.password, url.password().to_owned());
    check("hostname", &record.hostname, hostname_of(&url));
    check("host", &record.host, host_of(&url));
    check("port", &record.port, port_of(&url));
    check("pathname", &record.pathname, url.path().to_string());
    check("search", &record.search, search_of(&url));
    check("hash", &record.hash, hash_of(&url));

    if ok {
        result.passed += 1;
    } else {
        result.failed += 1;
    }
}

fn hostname_of(url: &Url) -> String {
    url.host().map(ToString::to_string).unwrap_or_default()
}

/// `host` is `hostname:port` when a non-default port is present.
fn host_of(url: &Url) -> String {
    match url.port() {
        Some(port) => format!("{}:{port}", hostname_of(url)),
        None => hostname_of(url),
    }
}

fn port_of(url: &Url) -> String {
    url.port().map(|port| port.to_string()).unwrap_or_default()
}

/// Like the `URL.search` getter: empty unless the query is non-empty.
fn search_of(url: &Url) -> String {
    match url.query() {
        Some(query) if !query.is_empty() => format!("?{query}"),
        _ => String::new(),
    }
}

fn hash_of(url: &Url) -> String {
    match url.fragment() {
        Some(fragment) if !fragment.is_empty() => format!("#{fragment}"),
        _ => String::new(),
    }
}
