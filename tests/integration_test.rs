use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use tracing::Span;

use lincoln_importer::columns::{ColumnResolver, STUDENTS};
use lincoln_importer::records::DatasetKind;
use lincoln_importer::storage::{SchemaMode, SqliteStore};
use lincoln_importer::Importer;

fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path)?;
    file.write_all(bytes)?;
    Ok(path)
}

const STUDENTS_CSV: &str = "\
Family Name,English given name,Sex,Year of birth,Arrival at Lincoln,Departure from Lincoln,Nation
Smith,John,m,about 1890,1890-09-01,sometime in spring,Omaha
Little Bear,Mary,F,1885,09/15/1891,,Ponca
\"O'Neil\",Ann,female,age 12,1892,about 1895,Sioux
";

#[test]
fn test_students_csv_end_to_end() -> Result<()> {
    let dir = tempdir()?;
    let path = write_file(dir.path(), "Lincoln_student_data.csv", STUDENTS_CSV.as_bytes())?;

    let mut store = SqliteStore::open_in_memory(Span::none())?;
    let summary = Importer::new(1900, Span::none()).run_dataset(
        DatasetKind::Students,
        &path,
        &mut store,
        SchemaMode::CreateIfMissing,
    )?;
    assert_eq!(summary.imported, 3);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.convention, "spaced");

    let conn = store.connection();
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM students", [], |r| r.get(0))?;
    assert_eq!(count, 3);

    let (year, uncertain, kind, original): (Option<i32>, bool, Option<String>, Option<String>) =
        conn.query_row(
            "SELECT year_of_birth, year_of_birth_uncertain, year_of_birth_uncertainty_type, \
             year_of_birth_original_text FROM students WHERE family_name = 'Smith'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )?;
    assert_eq!(year, Some(1890));
    assert!(uncertain);
    assert_eq!(kind.as_deref(), Some("approximate"));
    assert_eq!(original.as_deref(), Some("about 1890"));

    let (departure, departure_uncertain, sex): (Option<String>, bool, Option<String>) = conn.query_row(
        "SELECT departure_from_lincoln, departure_from_lincoln_uncertain, sex \
         FROM students WHERE family_name = 'Smith'",
        [],
        |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
    )?;
    assert_eq!(departure, None);
    assert!(!departure_uncertain);
    assert_eq!(sex.as_deref(), Some("M"));

    let (family, arrival, birth_kind): (String, Option<String>, Option<String>) = conn.query_row(
        "SELECT family_name, arrival_at_lincoln, year_of_birth_uncertainty_type \
         FROM students WHERE english_given_name = 'Ann'",
        [],
        |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
    )?;
    assert_eq!(family, "ONeil");
    assert_eq!(arrival.as_deref(), Some("1892-01-01"));
    assert_eq!(birth_kind.as_deref(), Some("estimated_from_age"));

    Ok(())
}

#[test]
fn test_recreate_replaces_rows_in_sqlite_file() -> Result<()> {
    let dir = tempdir()?;
    let path = write_file(dir.path(), "students.csv", STUDENTS_CSV.as_bytes())?;
    let db_path = dir.path().join("out").join("archive.db");
    let importer = Importer::new(1900, Span::none());

    for _ in 0..2 {
        let mut store = SqliteStore::open(&db_path, Span::none())?;
        importer.run_dataset(DatasetKind::Students, &path, &mut store, SchemaMode::CreateIfMissing)?;
    }
    let mut store = SqliteStore::open(&db_path, Span::none())?;
    let count: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM students", [], |r| r.get(0))?;
    assert_eq!(count, 6);

    importer.run_dataset(DatasetKind::Students, &path, &mut store, SchemaMode::Recreate)?;
    let count: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM students", [], |r| r.get(0))?;
    assert_eq!(count, 3);
    Ok(())
}

#[test]
fn test_orphans_windows_1252_pipe_file() -> Result<()> {
    let dir = tempdir()?;
    let mut bytes = Vec::new();
    bytes.extend_from_slice(
        b"Family Name|Given Name|Birth Date|Arrival|Departure|Situation, 1878|References\n",
    );
    bytes.extend_from_slice(b"Ren\xE9|Jos\xE9|c. 1860|1866-04-02|before 1875|at school, Lincoln|Register, p. 4\n");
    bytes.extend_from_slice(b"Doe|Jane|1861-1862|NaT||placed out|\n");
    let path = write_file(dir.path(), "cleaned_orphans_sept1.csv", &bytes)?;

    let mut store = SqliteStore::open_in_memory(Span::none())?;
    let summary = Importer::new(1900, Span::none()).run_dataset(
        DatasetKind::Orphans,
        &path,
        &mut store,
        SchemaMode::CreateIfMissing,
    )?;
    assert_eq!(summary.imported, 2);

    let conn = store.connection();
    let (given, birth, kind, situation, references): (String, String, String, String, String) = conn
        .query_row(
            "SELECT given_name, birth_date, birth_date_uncertainty_type, situation_1878, \"references\" \
             FROM civil_war_orphans WHERE family_name = 'René'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
        )?;
    assert_eq!(given, "José");
    assert_eq!(birth, "1860-01-01");
    assert_eq!(kind, "approximate");
    assert_eq!(situation, "at school, Lincoln");
    assert_eq!(references, "Register, p. 4");

    let (birth, birth_kind, arrival, departure_kind): (String, String, Option<String>, Option<String>) = conn
        .query_row(
            "SELECT birth_date, birth_date_uncertainty_type, arrival, departure_uncertainty_type \
             FROM civil_war_orphans WHERE family_name = 'Doe'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )?;
    assert_eq!(birth, "1861-01-01");
    assert_eq!(birth_kind, "range");
    assert_eq!(arrival, None);
    assert_eq!(departure_kind, None);
    Ok(())
}

#[test]
fn test_resolver_on_spaced_student_headers() -> Result<()> {
    let headers = vec![
        "Family Name".to_string(),
        "English given name".to_string(),
        "Year of birth".to_string(),
    ];
    let mapping = ColumnResolver::new(Span::none()).resolve(&STUDENTS, &headers, None)?;
    assert_eq!(mapping.source_label("family_name"), Some("Family Name"));
    assert_eq!(mapping.source_label("english_given_name"), Some("English given name"));
    assert_eq!(mapping.source_label("year_of_birth"), Some("Year of birth"));
    Ok(())
}
