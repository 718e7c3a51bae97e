//! Folder ingestion behaviour: ordering, defaults, failure policy, determinism

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};
use dcindex::{DocumentNormalizer, DocumentRecord, Error, IngestionConfig};
use proptest::prelude::*;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn ingest(dir: &Path) -> dcindex::Result<Vec<DocumentRecord>> {
    DocumentNormalizer::ingest_folder_all(dir, &IngestionConfig::default())
}

const THESIS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<oai_dc:dc xmlns:oai_dc="http://www.openarchives.org/OAI/2.0/oai_dc/"
           xmlns:dc="http://purl.org/dc/elements/1.1/">
  <dc:title>Motor de búsqueda</dc:title>
  <dc:creator>Soler, Raúl</dc:creator>
  <dc:contributor>Nogueras, Javier</dc:contributor>
  <dc:type>TAZ-TFM</dc:type>
  <dc:date>2025</dc:date>
  <dc:publisher>Informática e Ingeniería de Sistemas</dc:publisher>
  <dc:subject>recuperación de información</dc:subject>
  <dc:description>Índices invertidos y ranking</dc:description>
  <dc:identifier>http://example.org/record/42</dc:identifier>
</oai_dc:dc>
"#;

#[test]
fn records_follow_lexicographic_file_name_order() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b.txt", "a.xml", "C.txt", "a.txt", "10.txt", "2.txt"] {
        if name.ends_with(".xml") {
            write(dir.path(), name, "<r>x</r>");
        } else {
            write(dir.path(), name, "x");
        }
    }

    let paths: Vec<String> = ingest(dir.path()).unwrap().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["10.txt", "2.txt", "C.txt", "a.txt", "a.xml", "b.txt"]);
}

#[test]
fn unrecognized_extensions_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.txt", "alpha");
    write(dir.path(), "b.pdf", "not ingested");
    write(dir.path(), "c.XML", "<r/>");
    write(dir.path(), "README", "no extension");

    let records = ingest(dir.path()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].path, "a.txt");
}

#[test]
fn missing_folder_yields_empty_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    assert_eq!(
        DocumentNormalizer::ingest_folder(&missing, &IngestionConfig::default()).count(),
        0
    );
    assert!(ingest(&missing).unwrap().is_empty());
}

#[test]
fn plain_text_blank_lines_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "doc.txt", "a\n\nb\n");

    let records = ingest(dir.path()).unwrap();
    assert_eq!(records[0].content, "a b");
    assert_eq!(records[0].title, "");
    assert_eq!(records[0].author_names, "");
}

#[test]
fn xml_metadata_maps_onto_record_fields() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "thesis.xml", THESIS_XML);

    let record = ingest(dir.path()).unwrap().remove(0);
    assert_eq!(record.path, "thesis.xml");
    assert_eq!(record.title, "Motor de búsqueda");
    assert_eq!(record.author_names, "Soler, Raúl");
    assert_eq!(record.contributor_names, "Nogueras, Javier");
    assert_eq!(record.work_type, "TAZ-TFM");
    assert_eq!(record.date, "2025");
    assert_eq!(record.publisher_or_department, "Informática e Ingeniería de Sistemas");
    assert_eq!(record.subjects, "recuperación de información");
    assert_eq!(record.description, "Índices invertidos y ranking");
    assert_eq!(record.identifier, "http://example.org/record/42");
    assert_eq!(
        record.content,
        "Motor de búsqueda Soler, Raúl Nogueras, Javier TAZ-TFM 2025 \
         Informática e Ingeniería de Sistemas recuperación de información \
         Índices invertidos y ranking http://example.org/record/42"
    );
}

#[test]
fn xml_without_matching_elements_has_empty_fields() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "bare.xml", "<record><body>Some text</body></record>");

    let record = ingest(dir.path()).unwrap().remove(0);
    assert_eq!(record.content, "Some text");
    for field in [
        &record.title,
        &record.work_type,
        &record.author_names,
        &record.contributor_names,
        &record.subjects,
        &record.description,
        &record.date,
        &record.publisher_or_department,
        &record.identifier,
    ] {
        assert_eq!(field, "");
    }

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["authorNames"], "");
    assert!(!json["identifier"].is_null());
}

#[test]
fn repeated_titles_join_with_single_space() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "t.xml",
        concat!(
            r#"<r xmlns:dc="http://purl.org/dc/elements/1.1/">"#,
            "<dc:title>Foo</dc:title><title>  </title><title>Bar</title></r>",
        ),
    );

    assert_eq!(ingest(dir.path()).unwrap()[0].title, "Foo Bar");
}

#[test]
fn malformed_xml_aborts_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.txt", "first");
    write(dir.path(), "b.xml", "<record><title>unclosed</record>");
    write(dir.path(), "c.txt", "never reached");

    let mut iter = DocumentNormalizer::ingest_folder(dir.path(), &IngestionConfig::default());
    assert_eq!(iter.next().unwrap().unwrap().path, "a.txt");
    match iter.next() {
        Some(Err(Error::MalformedDocument { filename, .. })) => assert_eq!(filename, "b.xml"),
        other => panic!("expected malformed document, got {:?}", other),
    }
    assert!(iter.next().is_none());

    assert!(matches!(ingest(dir.path()), Err(Error::MalformedDocument { .. })));
}

#[test]
fn skip_failed_isolates_bad_files() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.txt", "first");
    write(dir.path(), "b.xml", "<record>");
    write(dir.path(), "c.txt", "third");

    let config = IngestionConfig { skip_failed: true };
    let records = DocumentNormalizer::ingest_folder_all(dir.path(), &config).unwrap();
    let paths: Vec<_> = records.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["a.txt", "c.txt"]);
}

#[test]
fn modified_timestamp_uses_file_mtime_with_literal_offset() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.txt", "x");
    write(dir.path(), "b.xml", "<r>y</r>");

    let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    for name in ["a.txt", "b.xml"] {
        fs::File::options()
            .write(true)
            .open(dir.path().join(name))
            .unwrap()
            .set_modified(mtime)
            .unwrap();
    }

    let local: DateTime<Local> = mtime.into();
    let expected = local.format("%a, %d %b %Y %H:%M:%S +0000").to_string();
    for record in ingest(dir.path()).unwrap() {
        assert_eq!(record.modified_timestamp, expected);
    }
}

#[test]
fn ingestion_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.txt", "uno\n\ndos");
    write(dir.path(), "b.xml", THESIS_XML);
    write(dir.path(), "c.txt", "tres");

    let first = ingest(dir.path()).unwrap();
    let second = ingest(dir.path()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

proptest! {
    #[test]
    fn output_order_is_sorted_file_names(
        names in proptest::collection::btree_set("[a-z0-9]{1,8}", 1..8)
    ) {
        let dir = tempfile::tempdir().unwrap();
        for name in &names {
            write(dir.path(), &format!("{}.txt", name), name);
        }

        let paths: Vec<String> = ingest(dir.path()).unwrap().into_iter().map(|r| r.path).collect();
        let mut expected: Vec<String> = names.iter().map(|n| format!("{}.txt", n)).collect();
        expected.sort();
        prop_assert_eq!(paths, expected);
    }

    #[test]
    fn plain_text_content_has_no_line_breaks(
        lines in proptest::collection::vec("[a-z ]{0,6}", 0..10)
    ) {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "doc.txt", &lines.join("\n"));

        let record = ingest(dir.path()).unwrap().remove(0);
        prop_assert!(!record.content.contains('\n'));
        let expected: Vec<&str> = lines
            .iter()
            .map(String::as_str)
            .filter(|l| !l.trim().is_empty())
            .collect();
        prop_assert_eq!(record.content, expected.join(" "));
    }
}
