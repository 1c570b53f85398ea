use std::fs;
use std::path::Path;

use gdu_core::{CaseFault, SuiteReport, TestCaseRecord};
use roxmltree::{Document, Node};

use crate::ReportError;

pub fn parse_report_xml(path: &Path) -> Result<SuiteReport, ReportError> {
    let source = fs::read_to_string(path).map_err(|source| ReportError::ReadReport {
        path: path.to_path_buf(),
        source,
    })?;
    parse_report_str(&source).map_err(|message| ReportError::ParseReport {
        path: path.to_path_buf(),
        message,
    })
}

pub fn parse_report_str(source: &str) -> Result<SuiteReport, String> {
    let document = Document::parse(source).map_err(|error| error.to_string())?;
    let root = document.root_element();
    if !root.has_tag_name("testsuites") {
        return Err(format!(
            "expected <testsuites> root element, found <{}>",
            root.tag_name().name()
        ));
    }

    let mut cases = Vec::new();
    for suite in root.children().filter(|node| node.has_tag_name("testsuite")) {
        let suite_name = suite.attribute("name").unwrap_or_default();
        for case in suite.children().filter(|node| node.has_tag_name("testcase")) {
            cases.push(TestCaseRecord {
                suite: suite_name.to_string(),
                class_name: case.attribute("classname").unwrap_or_default().to_string(),
                method_name: case.attribute("name").unwrap_or_default().to_string(),
                failure: child_fault(case, "failure"),
                error: child_fault(case, "error"),
            });
        }
    }

    Ok(SuiteReport {
        total: count_attribute(root, "tests")?,
        failures: count_attribute(root, "failures")?,
        errors: count_attribute(root, "errors")?,
        cases,
    })
}

fn count_attribute(node: Node<'_, '_>, name: &str) -> Result<u32, String> {
    let Some(raw) = node.attribute(name) else {
        return Ok(0);
    };
    raw.trim().parse::<u32>().map_err(|_| {
        format!(
            "attribute {}=\"{}\" on <{}> is not a non-negative integer",
            name,
            raw,
            node.tag_name().name()
        )
    })
}

fn child_fault(case: Node<'_, '_>, tag: &str) -> Option<CaseFault> {
    let node = case.children().find(|child| child.has_tag_name(tag))?;
    Some(CaseFault {
        message: node.attribute("message").unwrap_or_default().to_string(),
        body: node
            .descendants()
            .filter(|child| child.is_text())
            .filter_map(|child| child.text())
            .collect(),
    })
}
