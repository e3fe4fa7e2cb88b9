//! Pipeline scenario tests
//!
//! Each test lays out a partner configuration and its source files in a
//! temporary directory and runs the full pipeline over them.


use crate::config::PartnersConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const ACME_FILE: &str = "MemberID|FName|LName|DOB|EmailAddress|Phone
007| james |BOND|12/31/1999|James.Bond@MI6.gov.uk |+1 (202) 555-0007
|moneypenny|EVE|1975-04-02|eve@mi6.gov.uk|202.555.0100
  042  |q||31/12/1960|Q@MI6.GOV.UK|555-0199
";

pub const GLOBEX_FILE: &str = "id,given_name,surname,birth_date,mail,telephone,region
G-1,hank,scorpio,01/02/2020,HANK@globex.com,800-555-0199,west
G-2,,,,,,east
";

pub const ACME_CONFIG: &str = r#"
  acme:
    partner_code: ACME
    file_name: acme.txt
    delimiter: "|"
    mappings:
      external_id: MemberID
      first_name: FName
      last_name: LName
      dob: DOB
      email: EmailAddress
      phone: Phone
"#;

pub const GLOBEX_CONFIG: &str = r#"
  globex:
    partner_code: GBX
    file_name: globex.csv
    delimiter: ","
    mappings:
      external_id: id
      first_name: given_name
      last_name: surname
      dob: birth_date
      email: mail
      phone: telephone
"#;

/// Write `files` into a fresh input directory and parse `partner_entries`
/// (YAML fragments nested under `partners:`) in the given order
pub fn setup(partner_entries: &[&str], files: &[(&str, &str)]) -> (TempDir, PathBuf, PartnersConfig) {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("incoming");
    fs::create_dir_all(&input_dir).unwrap();

    for (name, content) in files {
        fs::write(input_dir.join(name), content).unwrap();
    }

    let yaml = format!("partners:{}", partner_entries.concat());
    let config_path = temp_dir.path().join("partners.yaml");
    fs::write(&config_path, &yaml).unwrap();
    let config = PartnersConfig::load(&config_path).unwrap();

    (temp_dir, input_dir, config)
}

/// Output file contents split into lines
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
