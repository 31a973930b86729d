//! Outline fixtures from `tests/fixtures/cases.json`.

mod common;

use mdtree::Options;
use pretty_assertions::assert_eq;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Case {
    name: String,
    markdown: String,
    #[serde(default)]
    options: CaseOptions,
    outline: String,
}

#[derive(Debug, Default, Deserialize)]
struct CaseOptions {
    #[serde(default)]
    math: bool,
    #[serde(default)]
    extra_list_style_type: bool,
}

impl CaseOptions {
    fn to_options(&self) -> Options {
        Options::default()
            .with_math(self.math)
            .with_extra_list_style_type(self.extra_list_style_type)
    }
}

fn load_cases() -> Vec<Case> {
    let json = include_str!("fixtures/cases.json");
    serde_json::from_str(json).expect("cases.json is valid")
}

#[test]
fn fixture_outlines() {
    let cases = load_cases();
    assert!(!cases.is_empty());
    for case in &cases {
        let doc = common::parse_with(&case.markdown, &case.options.to_options());
        assert_eq!(common::outline(&doc), case.outline, "case {:?}", case.name);
    }
}
