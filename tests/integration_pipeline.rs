//! End-to-end tests through the public API
//!
//! Each test writes a partner configuration and source files to a temporary
//! directory, runs the pipeline and checks the unified CSV it produces.

use partner_normalizer::{
    ErrorPolicy, NormalizationPipeline, PartnersConfig, PipelineError, PipelineOptions,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CONFIG: &str = r#"
partners:
  northwind:
    partner_code: NW
    file_name: northwind_members.txt
    delimiter: "|"
    mappings:
      external_id: ID
      first_name: Given
      last_name: Family
      dob: Birth
      email: Mail
      phone: Tel
  contoso:
    partner_code: CTS
    file_name: contoso.tsv
    delimiter: "\t"
    mappings:
      external_id: member_number
      first_name: first
      last_name: last
      dob: date_of_birth
      email: email_address
      phone: mobile
"#;

const NORTHWIND: &str = "ID|Given|Family|Birth|Mail|Tel
007| james |BOND|12/31/1999|James.Bond@MI6.gov.uk|(202) 555-0007
";

const CONTOSO: &str = "member_number\tfirst\tlast\tdate_of_birth\temail_address\tmobile
C-100\tmary ann\tsmith\t2001-07-04\t Mary.Smith@Contoso.COM\t1 800 555 0199
\tno\tid\t02/29/2001\tx@y.z\t555-0199
";

fn write_inputs(root: &Path, files: &[(&str, &str)]) -> PartnersConfig {
    let input_dir = root.join("input");
    fs::create_dir_all(&input_dir).unwrap();
    for (name, content) in files {
        fs::write(input_dir.join(name), content).unwrap();
    }

    let config_path = root.join("partners.yaml");
    fs::write(&config_path, CONFIG).unwrap();
    PartnersConfig::load(&config_path).unwrap()
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_unified_output_for_two_partners() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_inputs(
        temp_dir.path(),
        &[("northwind_members.txt", NORTHWIND), ("contoso.tsv", CONTOSO)],
    );
    let output_path = temp_dir.path().join("reports").join("eligibility.csv");

    let pipeline = NormalizationPipeline::new(PipelineOptions::new(temp_dir.path().join("input")));
    let (report, stats) = pipeline.run_to_file(&config, &output_path).await.unwrap();

    assert_eq!(stats.rows_written, 3);
    assert_eq!(report.partners.len(), 2);
    assert_eq!(
        lines(&output_path),
        vec![
            "external_id,first_name,last_name,dob,email,phone,partner_code",
            "007,James,Bond,1999-12-31,james.bond@mi6.gov.uk,202-555-0007,NW",
            "C-100,Mary Ann,Smith,2001-07-04,mary.smith@contoso.com,800-555-0199,CTS",
            ",No,Id,,x@y.z,,CTS",
        ]
    );
}

#[tokio::test]
async fn test_drop_missing_external_id() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_inputs(
        temp_dir.path(),
        &[("northwind_members.txt", NORTHWIND), ("contoso.tsv", CONTOSO)],
    );

    let options = PipelineOptions::new(temp_dir.path().join("input"))
        .with_drop_missing_external_id(true);
    let report = NormalizationPipeline::new(options).run(&config).await.unwrap();

    assert_eq!(report.rows_read, 3);
    assert_eq!(report.rows_filtered, 1);
    assert!(
        report
            .dataset
            .iter()
            .all(|record| record.external_id.as_deref().is_some_and(|id| !id.is_empty()))
    );
}

#[tokio::test]
async fn test_every_partner_shares_the_output_schema() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_inputs(
        temp_dir.path(),
        &[("northwind_members.txt", NORTHWIND), ("contoso.tsv", CONTOSO)],
    );
    let output_path = temp_dir.path().join("eligibility.csv");

    NormalizationPipeline::new(PipelineOptions::new(temp_dir.path().join("input")))
        .run_to_file(&config, &output_path)
        .await
        .unwrap();

    let written = lines(&output_path);
    assert!(written.iter().all(|line| line.split(',').count() == 7));
}

#[tokio::test]
async fn test_missing_partner_file_policies() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_inputs(temp_dir.path(), &[("northwind_members.txt", NORTHWIND)]);
    let input_dir = temp_dir.path().join("input");
    let output_path = temp_dir.path().join("eligibility.csv");

    let err = NormalizationPipeline::new(PipelineOptions::new(&input_dir))
        .run_to_file(&config, &output_path)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::SourceNotFound { .. }));
    assert_eq!(err.partner(), Some("contoso"));
    assert!(!output_path.exists());

    let options = PipelineOptions::new(&input_dir).with_error_policy(ErrorPolicy::Skip);
    let (report, _stats) = NormalizationPipeline::new(options)
        .run_to_file(&config, &output_path)
        .await
        .unwrap();
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].partner_id, "contoso");
    assert_eq!(lines(&output_path).len(), 2);
}
