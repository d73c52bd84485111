//! Integration Tests for xlsxdataset
//!
//! Workbooks are generated with rust_xlsxwriter into temporary directories and
//! converted through the public API.

use rust_xlsxwriter::*;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xlsxdataset::{ConverterBuilder, DatasetError, OUTPUT_FILE_NAME};

// Helper module for generating test fixtures
mod fixtures {
    use super::*;

    /// Write the `Datasets` directory sheet
    pub fn write_directory(
        workbook: &mut Workbook,
        entries: &[(&str, &str)],
    ) -> Result<(), XlsxError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Datasets")?;
        sheet.write_string(0, 0, "Dataset")?;
        sheet.write_string(0, 1, "Label")?;

        for (i, (id, label)) in entries.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, *id)?;
            // Blank labels stay unwritten
            if !label.is_empty() {
                sheet.write_string(row, 1, *label)?;
            }
        }
        Ok(())
    }

    /// Demographics sheet with a blank middle data row
    pub fn write_dm(workbook: &mut Workbook) -> Result<(), XlsxError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name("DM")?;

        sheet.write_string(0, 0, "SUBJID")?;
        sheet.write_string(0, 1, "AGE")?;
        sheet.write_string(1, 0, "Subject Identifier")?;
        sheet.write_string(1, 1, "Age")?;
        sheet.write_string(2, 0, "Char")?;
        sheet.write_string(2, 1, "Num")?;
        sheet.write_number(3, 0, 8.0)?;
        sheet.write_number(3, 1, 8.0)?;

        sheet.write_string(4, 0, "S1")?;
        sheet.write_number(4, 1, 34.0)?;
        // Row 5 is left blank
        sheet.write_string(6, 0, "S3")?;
        sheet.write_string(6, 1, "40")?;
        Ok(())
    }

    /// Workbook containing a `Datasets` sheet and a `DM` sheet
    pub fn generate_dm_workbook(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        write_directory(&mut workbook, &[("DM", "Demographics")])?;
        write_dm(&mut workbook)?;
        workbook.save(path)
    }

    /// Workbook with Num passthrough values and a column of unknown type
    pub fn generate_mixed_types(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        write_directory(&mut workbook, &[("lb.results", "")])?;

        let sheet = workbook.add_worksheet();
        sheet.set_name("lb.results")?;
        sheet.write_string(0, 0, "LBSTRESN")?;
        sheet.write_string(0, 1, "LBDTC")?;
        sheet.write_string(1, 0, "Numeric Result")?;
        sheet.write_string(1, 1, "Date of Collection")?;
        sheet.write_string(2, 0, "Num")?;
        sheet.write_string(2, 1, "Date")?;
        sheet.write_string(3, 0, "8")?;
        // Length row left blank for the second column

        sheet.write_string(4, 0, "3.5")?;
        sheet.write_string(4, 1, "2024-01-01")?;
        sheet.write_number(5, 0, 3.5)?;
        sheet.write_string(5, 1, "2024-01-02")?;
        sheet.write_string(6, 0, "007")?;
        workbook.save(path)
    }

    /// Workbook whose directory lists a dataset without a matching sheet
    pub fn generate_unmatched(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        write_directory(
            &mut workbook,
            &[("AE", "Adverse Events"), ("DM", "Demographics")],
        )?;
        write_dm(&mut workbook)?;
        let notes = workbook.add_worksheet();
        notes.set_name("Notes")?;
        notes.write_string(0, 0, "not a dataset")?;
        workbook.save(path)
    }

    /// Workbook without a `Datasets` sheet
    pub fn generate_without_directory(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        write_dm(&mut workbook)?;
        workbook.save(path)
    }

    /// Small workbook used to check the exact JSON layout
    pub fn generate_single_column(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        write_directory(&mut workbook, &[("AE", "Adverse Events")])?;

        let sheet = workbook.add_worksheet();
        sheet.set_name("AE")?;
        sheet.write_string(0, 0, "AETERM")?;
        sheet.write_string(1, 0, "Term")?;
        sheet.write_string(2, 0, "Char")?;
        sheet.write_number(3, 0, 20.0)?;
        sheet.write_string(4, 0, "Headache")?;
        workbook.save(path)
    }
}

fn read_json(path: &Path) -> Value {
    let text = fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn create_dirs(root: &Path, dirs: &[&str]) {
    for dir in dirs {
        fs::create_dir_all(root.join(dir)).unwrap();
    }
}

#[test]
fn test_convert_file_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dm.xlsx");
    fixtures::generate_dm_workbook(&path).unwrap();

    let converter = ConverterBuilder::new().build().unwrap();
    let result = converter.convert_file(&path).unwrap();

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "datasets": [{
                "filename": "DM",
                "label": "Demographics",
                "domain": "DM",
                "variables": [
                    {"name": "SUBJID", "label": "Subject Identifier", "type": "Char", "length": 8},
                    {"name": "AGE", "label": "Age", "type": "Num", "length": 8}
                ],
                "records": {
                    "SUBJID": ["S1", "", "S3"],
                    "AGE": [34, null, 40]
                }
            }],
            "standard": {"product": "sdtmig", "version": "3-3"},
            "codelists": []
        })
    );
}

#[test]
fn test_num_passthrough_and_unknown_type() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lb.xlsx");
    fixtures::generate_mixed_types(&path).unwrap();

    let converter = ConverterBuilder::new().build().unwrap();
    let result = converter.convert_file(&path).unwrap();
    let dataset = &result.datasets[0];

    assert_eq!(dataset.filename, "lb.results");
    assert_eq!(dataset.domain, "LB");
    assert_eq!(dataset.label, None);
    assert_eq!(dataset.variables[0].length, 8);
    assert_eq!(dataset.variables[1].length, 0);
    assert_eq!(dataset.variables[1].var_type.as_str(), "Date");

    assert_eq!(dataset.records["LBSTRESN"], json!(["3.5", 3.5, 7]));
    assert_eq!(dataset.records["LBDTC"], json!([null, null, null]));
}

#[test]
fn test_unmatched_identifiers_are_skipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mixed.xlsx");
    fixtures::generate_unmatched(&path).unwrap();

    let converter = ConverterBuilder::new().build().unwrap();
    let result = converter.convert_file(&path).unwrap();

    let names: Vec<&str> = result
        .datasets
        .iter()
        .map(|d| d.filename.as_str())
        .collect();
    assert_eq!(names, vec!["DM"]);
}

#[test]
fn test_missing_directory_sheet() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nodir.xlsx");
    fixtures::generate_without_directory(&path).unwrap();

    let converter = ConverterBuilder::new().build().unwrap();
    match converter.convert_file(&path) {
        Err(DatasetError::SheetNotFound { sheet }) => assert_eq!(sheet, "Datasets"),
        other => panic!("Expected SheetNotFound error, got {:?}", other),
    }
}

#[test]
fn test_convert_to_dir_writes_pretty_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ae.xlsx");
    fixtures::generate_single_column(&path).unwrap();
    let dest = dir.path().join("out").join("CG0001");

    let converter = ConverterBuilder::new().build().unwrap();
    let output = converter.convert_to_dir(&path, &dest).unwrap();

    assert_eq!(output.json_path, dest.join(OUTPUT_FILE_NAME));
    assert_eq!(output.xml_path, None);

    let expected = r#"{
    "datasets": [
        {
            "filename": "AE",
            "label": "Adverse Events",
            "domain": "AE",
            "variables": [
                {
                    "name": "AETERM",
                    "label": "Term",
                    "type": "Char",
                    "length": 20
                }
            ],
            "records": {
                "AETERM": [
                    "Headache"
                ]
            }
        }
    ],
    "standard": {
        "product": "sdtmig",
        "version": "3-3"
    },
    "codelists": []
}"#;
    assert_eq!(fs::read_to_string(&output.json_path).unwrap(), expected);
}

#[test]
fn test_convert_to_dir_copies_sibling_xml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("case.xlsx");
    fixtures::generate_single_column(&path).unwrap();
    let define = b"<?xml version=\"1.0\"?>\n<ODM/>\n";
    fs::write(dir.path().join("case.xml"), define).unwrap();
    let dest = dir.path().join("out");

    let converter = ConverterBuilder::new().build().unwrap();
    let output = converter.convert_to_dir(&path, &dest).unwrap();

    assert_eq!(output.xml_path, Some(dest.join("case.xml")));
    assert_eq!(fs::read(dest.join("case.xml")).unwrap(), define);
}

#[test]
fn test_failed_conversion_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nodir.xlsx");
    fixtures::generate_without_directory(&path).unwrap();
    let dest = dir.path().join("out");

    let converter = ConverterBuilder::new().build().unwrap();
    assert!(converter.convert_to_dir(&path, &dest).is_err());
    assert!(!dest.join(OUTPUT_FILE_NAME).exists());
}

#[test]
fn test_process_rules() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let rules = root.join("rules");
    let datasets = root.join("datasets");
    let output_root = root.join("json_datasets");

    create_dirs(&rules, &["CG0001", "CG0002", "CG0003", "CG0004"]);
    fs::write(rules.join("README.txt"), b"not a rule").unwrap();
    create_dirs(
        &datasets,
        &[
            "CG0001/negative",
            "CG0002/positive",
            "CG0003/negative",
            "group/CG0004/positive",
        ],
    );

    fixtures::generate_dm_workbook(&datasets.join("CG0001/negative/data.xlsx")).unwrap();
    fs::write(datasets.join("CG0001/negative/data.xml"), b"<ODM/>").unwrap();
    fs::write(datasets.join("CG0002/positive/broken.xlsx"), b"not a workbook").unwrap();
    fs::write(datasets.join("CG0003/negative/notes.txt"), b"no spreadsheet").unwrap();
    fixtures::generate_single_column(&datasets.join("group/CG0004/positive/ae.XLSX")).unwrap();

    let converter = ConverterBuilder::new()
        .with_output_root(&output_root)
        .build()
        .unwrap();
    let summary = converter.process_rules(&rules, &datasets).unwrap();

    let converted: Vec<&str> = summary
        .converted
        .iter()
        .map(|c| c.rule_id.as_str())
        .collect();
    assert_eq!(converted, vec!["CG0001", "CG0004"]);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].rule_id, "CG0002");
    assert_eq!(summary.skipped_rules, vec!["CG0003".to_string()]);
    assert!(summary.has_failures());

    let cg0001 = output_root.join("CG0001");
    let json = read_json(&cg0001.join(OUTPUT_FILE_NAME));
    assert_eq!(json["datasets"][0]["filename"], "DM");
    assert_eq!(fs::read(cg0001.join("data.xml")).unwrap(), b"<ODM/>");

    let json = read_json(&output_root.join("CG0004").join(OUTPUT_FILE_NAME));
    assert_eq!(json["datasets"][0]["filename"], "AE");

    assert!(!output_root.join("CG0002").join(OUTPUT_FILE_NAME).exists());
    assert!(!output_root.join("CG0003").exists());
}

#[test]
fn test_process_rules_last_subfolder_wins() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let rules = root.join("rules");
    let datasets = root.join("datasets");
    let output_root = root.join("json_datasets");

    create_dirs(&rules, &["CG0005"]);
    create_dirs(&datasets, &["CG0005/negative", "CG0005/positive"]);
    fixtures::generate_dm_workbook(&datasets.join("CG0005/negative/a.xlsx")).unwrap();
    fixtures::generate_single_column(&datasets.join("CG0005/positive/b.xlsx")).unwrap();

    let converter = ConverterBuilder::new()
        .with_output_root(&output_root)
        .build()
        .unwrap();
    let summary = converter.process_rules(&rules, &datasets).unwrap();

    let sources: Vec<PathBuf> = summary
        .converted
        .iter()
        .map(|c| c.source.clone())
        .collect();
    assert_eq!(
        sources,
        vec![
            datasets.join("CG0005/negative/a.xlsx"),
            datasets.join("CG0005/positive/b.xlsx"),
        ]
    );

    let dest = output_root.join("CG0005");
    assert!(summary
        .converted
        .iter()
        .all(|c| c.output.json_path == dest.join(OUTPUT_FILE_NAME)));

    let json = read_json(&dest.join(OUTPUT_FILE_NAME));
    assert_eq!(json["datasets"].as_array().unwrap().len(), 1);
    assert_eq!(json["datasets"][0]["filename"], "AE");
}

#[test]
fn test_process_rules_without_datasets_tree() {
    let dir = TempDir::new().unwrap();
    let rules = dir.path().join("rules");
    create_dirs(&rules, &["CG0001"]);

    let converter = ConverterBuilder::new()
        .with_output_root(dir.path().join("out"))
        .build()
        .unwrap();
    let summary = converter
        .process_rules(&rules, &dir.path().join("missing"))
        .unwrap();

    assert!(summary.converted.is_empty());
    assert_eq!(summary.skipped_rules, vec!["CG0001".to_string()]);
}

#[test]
fn test_process_rules_with_unreadable_rules_dir() {
    let dir = TempDir::new().unwrap();
    let missing: PathBuf = dir.path().join("no_rules");

    let converter = ConverterBuilder::new()
        .with_output_root(dir.path().join("out"))
        .build()
        .unwrap();

    match converter.process_rules(&missing, dir.path()) {
        Err(DatasetError::RulesDirectory { path, .. }) => assert_eq!(path, missing),
        other => panic!("Expected RulesDirectory error, got {:?}", other),
    }
}
