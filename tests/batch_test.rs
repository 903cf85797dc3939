mod common;

use common::*;
use redmark::aggregate::{discover_documents, process_file, process_folder};
use redmark::config::Settings;
use redmark::error::{DocumentError, Unreadable};
use redmark::extract::Extractor;

#[cfg(test)]
mod batch_tests {
    use super::*;

    fn write_scenario_docx(path: &std::path::Path) {
        let mut fixture = DocxFixture::new();
        for row in scenario_rows() {
            fixture = fixture.row(&row);
        }
        fixture.write(path);
    }

    #[test]
    fn test_batch_with_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        write_scenario_docx(&dir.path().join("a_first.docx"));

        let mut legacy = DocFixture::new();
        for row in scenario_rows() {
            legacy = legacy.row(&row);
        }
        legacy.write(&dir.path().join("b_second.doc"));

        // Truncated copy of a valid file
        let mut bytes = std::fs::read(dir.path().join("a_first.docx")).unwrap();
        bytes.truncate(bytes.len() / 3);
        std::fs::write(dir.path().join("c_broken.docx"), bytes).unwrap();

        let settings = Settings::default();
        let extractor = Extractor::new(&settings).unwrap();
        let outcome = process_folder(dir.path(), &extractor);

        assert_eq!(outcome.documents_processed, 2);
        assert_eq!(outcome.records.len(), 4);
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].path.ends_with("c_broken.docx"));
        assert!(matches!(
            outcome.failures[0].error,
            DocumentError::Unreadable { .. }
        ));
    }

    #[test]
    fn test_mapping_name_is_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("MOD_Kunde.MAP_Adresse.docx");
        write_scenario_docx(&path);

        let settings = Settings::default();
        let extractor = Extractor::new(&settings).unwrap();
        let records = process_file(&path, &extractor).unwrap();

        assert!(!records.is_empty());
        assert!(
            records
                .iter()
                .all(|record| record.mapping_name() == "MOD_Kunde.MAP_Adresse")
        );
    }

    #[test]
    fn test_join_conditions_are_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("joins.docx");
        DocxFixture::new()
            .row(&[plain("JOIN-BEDINGUNGEN"), red("a.id = b.id")])
            .row(&[plain("F1"), red("Neu")])
            .write(&path);

        let settings = Settings::default();
        let extractor = Extractor::new(&settings).unwrap();
        let records = process_file(&path, &extractor).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].change_number(), "F1");
    }

    #[test]
    fn test_discovery_is_recursive_sorted_and_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("sub")).unwrap();
        write_scenario_docx(&dir.path().join("sub").join("b.DOCX"));
        write_scenario_docx(&dir.path().join("a.docx"));
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let paths = discover_documents(dir.path());
        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.docx", "b.DOCX"]);
    }

    #[test]
    fn test_lock_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_scenario_docx(&dir.path().join("mapping.docx"));
        std::fs::write(dir.path().join("~$mapping.docx"), [0u8; 162]).unwrap();

        let settings = Settings::default();
        let extractor = Extractor::new(&settings).unwrap();
        let outcome = process_folder(dir.path(), &extractor);

        assert_eq!(outcome.documents_processed, 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::default();
        let extractor = Extractor::new(&settings).unwrap();
        let outcome = process_folder(dir.path(), &extractor);

        assert_eq!(outcome.documents_processed, 0);
        assert!(outcome.records.is_empty());
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_docx_renamed_to_doc_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let docx = dir.path().join("real.docx");
        write_scenario_docx(&docx);
        let renamed = dir.path().join("renamed.doc");
        std::fs::copy(&docx, &renamed).unwrap();

        let settings = Settings::default();
        let extractor = Extractor::new(&settings).unwrap();
        let err = process_file(&renamed, &extractor).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Unreadable {
                reason: Unreadable::Container(_),
                ..
            }
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "text").unwrap();

        let settings = Settings::default();
        let extractor = Extractor::new(&settings).unwrap();
        let err = process_file(&path, &extractor).unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedFormat { .. }));
    }
}
